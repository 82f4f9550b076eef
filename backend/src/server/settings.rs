//! Application settings loaded via OrthoConfig.
//!
//! Values layer defaults, `KOMODO_*` environment variables and CLI flags.
//! The boolean switches are not exposed as flags: clap reports an absent
//! switch as `false`, which would mask the environment and the defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_SAME_SITE: &str = "Lax";
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Runtime configuration for the Komodo Hub server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KOMODO")]
pub struct AppSettings {
    /// PostgreSQL connection URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a throwaway session key in release builds.
    #[ortho_config(default = false, skip_cli)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`.
    #[ortho_config(skip_cli)]
    pub cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies.
    pub same_site: Option<String>,
    /// Directory holding uploaded submission files and photos.
    pub upload_dir: Option<PathBuf>,
    /// Username of a platform admin created at startup when missing.
    pub admin_username: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

/// Credentials for the bootstrap admin account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured address is malformed.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Configured pool size, defaulting to 10.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies are `Secure`; on unless switched off.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn same_site(&self) -> &str {
        self.same_site.as_deref().unwrap_or(DEFAULT_SAME_SITE)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Bootstrap admin credentials, present only when all three are set.
    pub fn admin_bootstrap(&self) -> Option<AdminBootstrap<'_>> {
        match (&self.admin_username, &self.admin_email, &self.admin_password) {
            (Some(username), Some(email), Some(password)) => Some(AdminBootstrap {
                username,
                email,
                password,
            }),
            _ => None,
        }
    }
}
