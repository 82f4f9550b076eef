//! Port for account and profile persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::PersistenceError;
use crate::domain::{NewUser, User, UserId, UserProfile};

/// Storage for user accounts and their optional profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Duplicate usernames or emails surface as
    /// [`PersistenceError::ConstraintViolation`].
    async fn insert(&self, user: &NewUser) -> Result<User, PersistenceError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError>;

    /// Fetch an account by its exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PersistenceError>;

    /// Stamp the last successful login.
    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), PersistenceError>;

    /// Insert or replace the profile for `profile.user_id`.
    async fn upsert_profile(&self, profile: &UserProfile)
    -> Result<UserProfile, PersistenceError>;

    /// Fetch the profile for a user, if one was saved.
    async fn find_profile(&self, id: UserId) -> Result<Option<UserProfile>, PersistenceError>;
}
