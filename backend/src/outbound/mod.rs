//! Outbound adapters implementing the domain's repository ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM.
//! - **memory**: a process-local store with the same constraint semantics,
//!   used when no database is configured and throughout the tests.
//!
//! Adapters translate between domain types and storage representations.
//! They contain no business logic.

pub mod memory;
pub mod persistence;
