//! Session cookie settings.
//!
//! Turns the configured key file, cookie toggles and build mode into the
//! signing key and cookie policy used by the session middleware.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;

const SESSION_KEY_MIN_LEN: usize = 64;
/// Shortest master key `Key::derive_from` accepts.
const DERIVE_MIN_LEN: usize = 32;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing keys and lax cookie settings.
    Debug,
    /// Release builds require a real key of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use komodo_hub::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session options as loaded from application settings.
#[derive(Debug, Clone)]
pub struct SessionOptions<'a> {
    /// File holding the session key material.
    pub key_file: &'a Path,
    /// Generate a throwaway key when the key file cannot be read.
    pub allow_ephemeral: bool,
    /// Mark the cookie `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy name.
    pub same_site: &'a str,
}

/// Session settings ready for the middleware.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// The `SameSite` policy name is not recognised.
    #[error("invalid SameSite policy '{value}'; expected {expected}")]
    InvalidSameSite {
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("SameSite=None requires secure session cookies")]
    InsecureSameSiteNone,
}

/// Validate session options for the given build mode.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// use komodo_hub::inbound::http::session_config::{
///     BuildMode, SessionOptions, session_settings,
/// };
///
/// let options = SessionOptions {
///     key_file: Path::new("/nonexistent/session_key"),
///     allow_ephemeral: true,
///     cookie_secure: true,
///     same_site: "Strict",
/// };
/// let settings = session_settings(&options, BuildMode::Release).unwrap();
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings(
    options: &SessionOptions<'_>,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if !options.cookie_secure && !mode.is_debug() {
        warn!("session cookies are not marked Secure");
    }
    let same_site = parse_same_site(options.same_site, options.cookie_secure, mode)?;
    let key = load_key(options.key_file, mode, options.allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure: options.cookie_secure,
        same_site,
    })
}

fn parse_same_site(
    value: &str,
    cookie_secure: bool,
    mode: BuildMode,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without Secure; browsers may reject the cookie");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn load_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = if mode.is_debug() {
                DERIVE_MIN_LEN
            } else {
                SESSION_KEY_MIN_LEN
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key; sessions end on restart"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}

#[cfg(test)]
mod tests;
