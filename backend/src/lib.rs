//! Komodo Hub backend: a hexagonal core for schools, communities, programs
//! and the wildlife library, with Diesel and in-memory persistence adapters
//! and an Actix Web inbound adapter.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
