//! Authentication primitives: credentials, registrations, password hashes.
//!
//! Inbound payload parsing stays outside the domain; these constructors
//! validate raw strings before a handler talks to a service. Plain-text
//! passwords are held in [`Zeroizing`] buffers and only ever leave this
//! module as argon2 PHC strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

use super::user::{Email, UserRole, UserValidationError, Username};

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use komodo_hub::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ranger", "password").unwrap();
/// assert_eq!(creds.username(), "ranger");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation errors for a registration request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Username or email failed validation.
    #[error(transparent)]
    Field(#[from] UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length.
        min: usize,
    },
    /// Administrator accounts cannot be self-registered.
    #[error("the {role} role cannot be self-assigned")]
    ReservedRole {
        /// Role that was requested.
        role: UserRole,
    },
}

/// Validated self-service registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: Email,
    password: Zeroizing<String>,
    role: UserRole,
}

impl Registration {
    /// Validate raw registration fields.
    pub fn try_new(
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Self, RegistrationValidationError> {
        let username = Username::new(username)?;
        let email = Email::new(email)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if role == UserRole::Admin {
            return Err(RegistrationValidationError::ReservedRole { role });
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plain-text password; hash before storing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Requested account role.
    pub fn role(&self) -> UserRole {
        self.role
    }
}

/// Failure while hashing or parsing a stored password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hash failure: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// Argon2id PHC-format password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plain-text password with a fresh random salt.
    pub fn generate(password: &str) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordHashError {
                message: err.to_string(),
            })
    }

    /// Wrap a PHC string loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check a plain-text password against this hash.
    pub fn verify(&self, password: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            argon2::PasswordHash::new(&self.0).map_err(|err| PasswordHashError {
                message: err.to_string(),
            })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// PHC string for storage.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
