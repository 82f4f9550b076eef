//! Builders for the repositories and HTTP state behind the server.

use std::path::Path;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use tracing::{info, warn};

use komodo_hub::domain::{AccountService, Repositories, UserRole};
use komodo_hub::inbound::http::state::HttpState;
use komodo_hub::outbound::memory::MemoryStore;
use komodo_hub::outbound::persistence::{DbPool, PoolConfig, diesel_repositories, run_migrations};

use super::settings::{AdminBootstrap, AppSettings};

/// Repositories backed by PostgreSQL when a database URL is configured,
/// otherwise by a fresh in-memory store.
///
/// Pending migrations are applied on a blocking thread before the pool is
/// built.
///
/// # Errors
///
/// Fails when migrations cannot run or the pool cannot be built.
pub(super) async fn build_repositories(settings: &AppSettings) -> Result<Repositories> {
    let clock = Arc::new(DefaultClock);
    let Some(database_url) = settings.database_url.clone() else {
        warn!("no database configured; using the in-memory store");
        return Ok(MemoryStore::new().repositories(clock));
    };

    let migration_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("failed to apply migrations")?;
    info!(applied, "database schema is current");

    let config = PoolConfig::new(database_url)
        .with_max_size(settings.pool_max_size())
        .with_min_idle(Some(1));
    let pool = DbPool::new(config)
        .await
        .wrap_err("failed to build database pool")?;
    Ok(diesel_repositories(&pool, clock))
}

/// Create the configured platform admin unless the username is taken.
///
/// # Errors
///
/// Fails when the account cannot be looked up or created.
pub(super) async fn bootstrap_admin(repos: &Repositories, admin: &AdminBootstrap<'_>) -> Result<()> {
    let existing = repos
        .users
        .find_by_username(admin.username)
        .await
        .wrap_err("failed to look up bootstrap admin")?;
    if let Some(user) = existing {
        if user.role != UserRole::Admin {
            warn!(username = admin.username, role = %user.role, "bootstrap admin username belongs to a non-admin");
        }
        return Ok(());
    }
    AccountService::new(repos)
        .provision(admin.username, admin.email, admin.password, UserRole::Admin)
        .await
        .map_err(|err| eyre!("failed to create bootstrap admin: {err}"))?;
    info!(username = admin.username, "bootstrap admin created");
    Ok(())
}

/// Make sure the upload directory exists.
pub(super) fn ensure_upload_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .wrap_err_with(|| format!("failed to create upload directory {}", path.display()))
}

pub(super) fn build_http_state(repos: &Repositories) -> web::Data<HttpState> {
    web::Data::new(HttpState::from_repositories(repos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn memory_settings() -> AppSettings {
        AppSettings {
            database_url: None,
            bind_addr: None,
            pool_max_size: None,
            session_key_file: None,
            session_allow_ephemeral: false,
            cookie_secure: None,
            same_site: None,
            upload_dir: None,
            admin_username: None,
            admin_email: None,
            admin_password: None,
        }
    }

    const ADMIN: AdminBootstrap<'static> = AdminBootstrap {
        username: "root",
        email: "root@komodo.test",
        password: "correct-horse",
    };

    #[rstest]
    #[tokio::test]
    async fn missing_database_url_uses_the_memory_store() {
        let repos = build_repositories(&memory_settings()).await.expect("repositories");
        let found = repos.users.find_by_username("nobody").await.expect("lookup");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_admin_is_idempotent() {
        let repos = build_repositories(&memory_settings()).await.expect("repositories");
        bootstrap_admin(&repos, &ADMIN).await.expect("first run");
        bootstrap_admin(&repos, &ADMIN).await.expect("second run");

        let admin = repos
            .users
            .find_by_username("root")
            .await
            .expect("lookup")
            .expect("admin exists");
        assert_eq!(admin.role, UserRole::Admin);
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_rejects_weak_passwords() {
        let repos = build_repositories(&memory_settings()).await.expect("repositories");
        let weak = AdminBootstrap {
            password: "short",
            ..ADMIN
        };
        assert!(bootstrap_admin(&repos, &weak).await.is_err());
    }

    #[rstest]
    fn upload_dir_is_created() {
        let dir = std::env::temp_dir().join(format!("komodo-uploads-{}", uuid::Uuid::new_v4()));
        ensure_upload_dir(&dir).expect("create");
        assert!(dir.is_dir());
        std::fs::remove_dir(&dir).expect("cleanup");
    }
}
