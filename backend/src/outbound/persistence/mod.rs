//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository port of the domain has a Diesel implementation here,
//! backed by a `bb8` pool of `diesel-async` connections.
//!
//! - Row structs (`models.rs`) and the schema (`schema.rs`) stay private to
//!   this module; repositories translate them into domain types.
//! - Database failures are mapped onto `PersistenceError`, keeping the
//!   constraint name for uniqueness and foreign key violations.
//! - Multi-row writes (organization plus founder, assessment plus grading)
//!   run inside one transaction.
//!
//! # Example
//!
//! ```ignore
//! use komodo_hub::outbound::persistence::{DbPool, PoolConfig, diesel_repositories};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/komodo")).await?;
//! let repositories = diesel_repositories(&pool, Arc::new(DefaultClock));
//! ```

use std::sync::Arc;

use mockable::Clock;

use crate::domain::Repositories;

mod diesel_access_log_repository;
mod diesel_analytics_repository;
mod diesel_class_repository;
mod diesel_library_repository;
mod diesel_message_repository;
mod diesel_organization_repository;
mod diesel_program_repository;
mod diesel_submission_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_access_log_repository::DieselAccessLogRepository;
pub use diesel_analytics_repository::DieselAnalyticsRepository;
pub use diesel_class_repository::DieselClassRepository;
pub use diesel_library_repository::DieselLibraryRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_organization_repository::DieselOrganizationRepository;
pub use diesel_program_repository::DieselProgramRepository;
pub use diesel_submission_repository::DieselSubmissionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};

/// Bundle one Diesel repository per port, all sharing `pool`.
pub fn diesel_repositories(pool: &DbPool, clock: Arc<dyn Clock>) -> Repositories {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        organizations: Arc::new(DieselOrganizationRepository::new(pool.clone())),
        classes: Arc::new(DieselClassRepository::new(pool.clone())),
        programs: Arc::new(DieselProgramRepository::new(pool.clone())),
        submissions: Arc::new(DieselSubmissionRepository::new(pool.clone())),
        library: Arc::new(DieselLibraryRepository::new(pool.clone())),
        messages: Arc::new(DieselMessageRepository::new(pool.clone())),
        access_log: Arc::new(DieselAccessLogRepository::new(pool.clone())),
        analytics: Arc::new(DieselAnalyticsRepository::new(pool.clone())),
        clock,
    }
}
