//! Driving port for the admin analytics views.

use async_trait::async_trait;

use crate::domain::{Actor, AnalyticsDashboard, AnalyticsRecord, Error};

/// Platform analytics, restricted to platform admins.
#[async_trait]
pub trait Analytics: Send + Sync {
    /// Snapshot of users, subscriptions, programs, content, sightings and
    /// recorded metrics.
    async fn dashboard(&self, actor: &Actor) -> Result<AnalyticsDashboard, Error>;

    /// Samples of `metric_type` from the last `days` days, newest first.
    async fn metric_history(
        &self,
        actor: &Actor,
        metric_type: &str,
        days: u32,
    ) -> Result<Vec<AnalyticsRecord>, Error>;
}
