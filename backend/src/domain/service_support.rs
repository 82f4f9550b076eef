//! Shared plumbing for the domain services: the repository bundle, error
//! translation and the access log writer.

use std::net::IpAddr;
use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    AccessLogRepository, AnalyticsRepository, ClassRepository, LibraryRepository,
    MessageRepository, OrganizationRepository, PersistenceError, ProgramRepository,
    SubmissionRepository, UserRepository,
};
use crate::domain::{
    Actor, AuditAction, AuditTarget, Error, LISTING_LIMIT_MAX, NewAccessLogEntry, UserId,
};

/// Every driven port the services depend on, plus the clock.
///
/// Cloning is cheap; each service keeps only the handles it needs.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub classes: Arc<dyn ClassRepository>,
    pub programs: Arc<dyn ProgramRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub library: Arc<dyn LibraryRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub access_log: Arc<dyn AccessLogRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub clock: Arc<dyn Clock>,
}

/// Translate a read failure.
pub(crate) fn map_persistence_error(error: PersistenceError) -> Error {
    match error {
        PersistenceError::Unavailable { message } => {
            Error::service_unavailable(format!("store unavailable: {message}"))
        }
        PersistenceError::ConstraintViolation { constraint } => {
            Error::conflict("conflicting record exists").with_details(json!({
                "constraint": constraint,
            }))
        }
        PersistenceError::Query { message } => Error::internal(format!("store error: {message}")),
    }
}

/// Translate a write failure, reporting constraint violations with a
/// caller-facing conflict message.
pub(crate) fn map_write_error(conflict_message: &'static str) -> impl Fn(PersistenceError) -> Error {
    move |error| match error {
        PersistenceError::ConstraintViolation { constraint } => {
            Error::conflict(conflict_message).with_details(json!({
                "constraint": constraint,
            }))
        }
        other => map_persistence_error(other),
    }
}

/// Unwrap a lookup, turning `None` into `NotFound`.
pub(crate) fn found<T>(value: Option<T>, what: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::not_found(format!("{what} not found")))
}

/// Trim a required free-text field and check its length.
pub(crate) fn bounded_text(field: &str, raw: &str, max: usize) -> Result<String, Error> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(Error::invalid_request(format!("{field} must not be empty"))
            .with_details(json!({ "field": field })));
    }
    if value.chars().count() > max {
        return Err(
            Error::invalid_request(format!("{field} must be at most {max} characters"))
                .with_details(json!({ "field": field, "max": max })),
        );
    }
    Ok(value.to_owned())
}

/// Trim an optional text field, treating blank as absent, and check its
/// length.
pub(crate) fn optional_bounded_text(
    field: &str,
    raw: Option<String>,
    max: usize,
) -> Result<Option<String>, Error> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| bounded_text(field, &value, max))
        .transpose()
}

/// Clamp a caller-supplied listing size into `1..=LISTING_LIMIT_MAX`.
pub(crate) fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, LISTING_LIMIT_MAX)
}

/// Appends access log entries on behalf of the services.
///
/// Entries are written after the audited mutation has committed. A failed
/// append is logged and does not fail the operation.
#[derive(Clone)]
pub(crate) struct AuditTrail {
    log: Arc<dyn AccessLogRepository>,
    clock: Arc<dyn Clock>,
}

impl AuditTrail {
    pub(crate) fn new(repos: &Repositories) -> Self {
        Self {
            log: Arc::clone(&repos.access_log),
            clock: Arc::clone(&repos.clock),
        }
    }

    /// Record an action performed by `actor`.
    pub(crate) async fn record(&self, actor: &Actor, action: AuditAction, target: AuditTarget) {
        self.append(Some(actor.user_id()), actor.origin(), action, Some(target))
            .await;
    }

    /// Record an action with an explicit, possibly anonymous, user.
    pub(crate) async fn append(
        &self,
        user_id: Option<UserId>,
        origin: Option<IpAddr>,
        action: AuditAction,
        target: Option<AuditTarget>,
    ) {
        let entry = NewAccessLogEntry {
            user_id,
            action,
            target,
            origin,
            recorded_at: self.clock.utc(),
        };
        if let Err(err) = self.log.append(&entry).await {
            warn!(action = %action, error = %err, "failed to append access log entry");
        }
    }
}
