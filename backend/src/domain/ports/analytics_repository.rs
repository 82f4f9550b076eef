//! Port for the aggregate reads behind the analytics dashboard.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::PersistenceError;
use crate::domain::{
    AnalyticsRecord, ContentTypeCount, ProgramPopularity, RoleCount, SightingStatistics,
    SubscriptionCount,
};

/// Read-only aggregates over the whole store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Account count per role, ordered by role name.
    async fn user_demographics(&self) -> Result<Vec<RoleCount>, PersistenceError>;

    /// Organization count per type and subscription state.
    async fn subscription_counts(&self) -> Result<Vec<SubscriptionCount>, PersistenceError>;

    /// Programs with active enrollments, most enrolled first.
    async fn program_popularity(
        &self,
        limit: u32,
    ) -> Result<Vec<ProgramPopularity>, PersistenceError>;

    /// Content count per type split by visibility, ordered by type name.
    async fn content_counts(&self) -> Result<Vec<ContentTypeCount>, PersistenceError>;

    async fn sighting_statistics(&self) -> Result<SightingStatistics, PersistenceError>;

    /// Distinct users with an access log entry in `[from, until)`.
    async fn active_users_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<u64, PersistenceError>;

    /// Newest sample of every metric type, ordered by metric type.
    async fn latest_metrics(&self) -> Result<Vec<AnalyticsRecord>, PersistenceError>;

    /// Samples of one metric recorded at or after `since`, newest first.
    async fn metric_history(
        &self,
        metric_type: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsRecord>, PersistenceError>;
}
