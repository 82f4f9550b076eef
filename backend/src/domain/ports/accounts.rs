//! Driving port for registration, login, profiles and student records.

use std::net::IpAddr;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    Actor, Assessment, Error, LoginCredentials, Registration, Submission, User, UserId,
    UserProfile,
};

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub avatar_path: Option<String>,
    pub color_scheme: Option<String>,
    pub bio: Option<String>,
    pub is_public: bool,
}

/// Academic record of one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub student_id: UserId,
    pub username: String,
    pub submissions: Vec<Submission>,
    pub assessments: Vec<Assessment>,
}

/// Account use-cases consumed by inbound adapters.
#[async_trait]
pub trait Accounts: Send + Sync {
    /// Create an account from a validated registration.
    ///
    /// # Errors
    /// `Conflict` when the username or email is taken.
    async fn register(
        &self,
        registration: Registration,
        origin: Option<IpAddr>,
    ) -> Result<User, Error>;

    /// Check credentials and stamp the login time.
    ///
    /// # Errors
    /// `Unauthorized` for unknown users and wrong passwords alike.
    async fn login(
        &self,
        credentials: &LoginCredentials,
        origin: Option<IpAddr>,
    ) -> Result<User, Error>;

    /// Account of the acting user.
    async fn current_user(&self, actor: &Actor) -> Result<User, Error>;

    /// Replace the acting user's profile.
    async fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error>;

    /// Submissions and assessments of a student, subject to student data
    /// access rules.
    async fn student_record(&self, actor: &Actor, student: UserId)
    -> Result<StudentRecord, Error>;
}
