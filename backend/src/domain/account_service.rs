//! Account service: registration, login, profiles and student records.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::permissions::PermissionEngine;
use crate::domain::ports::{
    Accounts, ProfileUpdate, StudentRecord, SubmissionRepository, UserRepository,
};
use crate::domain::service_support::{
    AuditTrail, Repositories, found, map_persistence_error, map_write_error, optional_bounded_text,
};
use crate::domain::{
    Actor, AuditAction, AuditTarget, Email, Error, LoginCredentials, NewUser, PASSWORD_MIN,
    PasswordHash, Registration, TargetKind, User, UserId, UserProfile, UserRole, Username,
};

const AVATAR_PATH_MAX: usize = 255;
const COLOR_SCHEME_MAX: usize = 50;

/// Implements [`Accounts`] over the user and submission repositories.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    permissions: PermissionEngine,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Create the service from the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            users: Arc::clone(&repos.users),
            submissions: Arc::clone(&repos.submissions),
            permissions: PermissionEngine::new(repos),
            audit: AuditTrail::new(repos),
            clock: Arc::clone(&repos.clock),
        }
    }

    /// Create an account with any role, including `admin`.
    ///
    /// Used for operator bootstrap; self-service registration goes through
    /// [`Accounts::register`], which refuses the admin role.
    pub async fn provision(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, Error> {
        let username =
            Username::new(username).map_err(|err| Error::invalid_request(err.to_string()))?;
        let email = Email::new(email).map_err(|err| Error::invalid_request(err.to_string()))?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "password must be at least {PASSWORD_MIN} characters"
            )));
        }
        self.create_account(username, email, password, role, None)
            .await
    }

    async fn create_account(
        &self,
        username: Username,
        email: Email,
        password: &str,
        role: UserRole,
        origin: Option<IpAddr>,
    ) -> Result<User, Error> {
        let password_hash = PasswordHash::generate(password)
            .map_err(|err| Error::internal(format!("failed to hash password: {err}")))?;
        let new_user = NewUser {
            username,
            email,
            password_hash,
            role,
            created_at: self.clock.utc(),
        };
        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_write_error("username or email already registered"))?;
        info!(user_id = %user.id, role = %user.role, "account created");
        self.audit
            .append(
                Some(user.id),
                origin,
                AuditAction::Register,
                Some(AuditTarget::new(TargetKind::User, user.id)),
            )
            .await;
        Ok(user)
    }

    async fn reject_login(&self, username: &str, origin: Option<IpAddr>) -> Error {
        info!(username, "login rejected");
        self.audit
            .append(None, origin, AuditAction::LoginFailed, None)
            .await;
        Error::unauthorized("invalid username or password")
    }
}

#[async_trait]
impl Accounts for AccountService {
    async fn register(
        &self,
        registration: Registration,
        origin: Option<IpAddr>,
    ) -> Result<User, Error> {
        self.create_account(
            registration.username().clone(),
            registration.email().clone(),
            registration.password(),
            registration.role(),
            origin,
        )
        .await
    }

    async fn login(
        &self,
        credentials: &LoginCredentials,
        origin: Option<IpAddr>,
    ) -> Result<User, Error> {
        let Some(mut user) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?
        else {
            return Err(self.reject_login(credentials.username(), origin).await);
        };

        let verified = match user.password_hash.verify(credentials.password()) {
            Ok(verified) => verified,
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "stored password hash is unreadable");
                false
            }
        };
        if !verified {
            return Err(self.reject_login(credentials.username(), origin).await);
        }

        let now = self.clock.utc();
        self.users
            .record_login(user.id, now)
            .await
            .map_err(map_persistence_error)?;
        user.last_login = Some(now);
        self.audit
            .append(
                Some(user.id),
                origin,
                AuditAction::Login,
                Some(AuditTarget::new(TargetKind::User, user.id)),
            )
            .await;
        Ok(user)
    }

    async fn current_user(&self, actor: &Actor) -> Result<User, Error> {
        self.permissions.account(actor).await
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error> {
        let user = self.permissions.account(actor).await?;
        let profile = UserProfile {
            user_id: user.id,
            avatar_path: optional_bounded_text("avatarPath", update.avatar_path, AVATAR_PATH_MAX)?,
            color_scheme: optional_bounded_text(
                "colorScheme",
                update.color_scheme,
                COLOR_SCHEME_MAX,
            )?,
            bio: update.bio,
            is_public: update.is_public,
        };
        let saved = self
            .users
            .upsert_profile(&profile)
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::UpdateProfile,
                AuditTarget::new(TargetKind::User, user.id),
            )
            .await;
        Ok(saved)
    }

    async fn student_record(
        &self,
        actor: &Actor,
        student: UserId,
    ) -> Result<StudentRecord, Error> {
        if !self
            .permissions
            .can_access_student_data(actor, student)
            .await?
        {
            return Err(Error::forbidden("not allowed to view this student's data"));
        }
        let account = found(
            self.users
                .find_by_id(student)
                .await
                .map_err(map_persistence_error)?,
            "student",
        )?;
        let submissions = self
            .submissions
            .submissions_of_student(student)
            .await
            .map_err(map_persistence_error)?;
        let assessments = self
            .submissions
            .assessments_of_student(student)
            .await
            .map_err(map_persistence_error)?;
        Ok(StudentRecord {
            student_id: account.id,
            username: account.username.to_string(),
            submissions,
            assessments,
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
