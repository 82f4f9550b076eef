//! Accounts and profiles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{MemoryStore, reject_duplicate, require_row};
use crate::domain::ports::{PersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId, UserProfile};

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, PersistenceError> {
        self.with_tables(|tables| {
            reject_duplicate(
                tables.users.values().any(|row| row.username == user.username),
                "users_username_key",
            )?;
            reject_duplicate(
                tables.users.values().any(|row| row.email == user.email),
                "users_email_key",
            )?;
            Ok(tables.users.insert_with(|id| User {
                id: UserId::new(id),
                username: user.username.clone(),
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                role: user.role,
                created_at: user.created_at,
                last_login: None,
            }))
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.users.get(id.get()).cloned()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .users
                .values()
                .find(|row| row.username.as_ref() == username)
                .cloned())
        })
    }

    async fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), PersistenceError> {
        self.with_tables(|tables| {
            if let Some(row) = tables.users.get_mut(id.get()) {
                row.last_login = Some(at);
            }
            Ok(())
        })
    }

    async fn upsert_profile(
        &self,
        profile: &UserProfile,
    ) -> Result<UserProfile, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.users.contains(profile.user_id.get()),
                "user_profiles_user_id_fkey",
            )?;
            tables.profiles.insert(profile.user_id, profile.clone());
            Ok(profile.clone())
        })
    }

    async fn find_profile(&self, id: UserId) -> Result<Option<UserProfile>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.profiles.get(&id).cloned()))
    }
}
