//! Admin analytics: the platform dashboard and metric histories.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveTime};
use mockable::Clock;

use crate::domain::permissions::{PermissionEngine, RoleGate};
use crate::domain::ports::{Analytics, AnalyticsRepository};
use crate::domain::service_support::{Repositories, bounded_text, map_persistence_error};
use crate::domain::{
    Actor, AnalyticsDashboard, AnalyticsRecord, ContentStatistics, Error,
    METRIC_HISTORY_DAYS_MAX, PROGRAM_POPULARITY_TOP, SubscriptionStatus,
};

const METRIC_TYPE_MAX: usize = 50;

/// Implements [`Analytics`].
#[derive(Clone)]
pub struct AnalyticsService {
    analytics: Arc<dyn AnalyticsRepository>,
    permissions: PermissionEngine,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    /// Create the service from the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            analytics: Arc::clone(&repos.analytics),
            permissions: PermissionEngine::new(repos),
            clock: Arc::clone(&repos.clock),
        }
    }
}

#[async_trait]
impl Analytics for AnalyticsService {
    async fn dashboard(&self, actor: &Actor) -> Result<AnalyticsDashboard, Error> {
        self.permissions
            .require_role(actor, RoleGate::ViewAnalytics)
            .await?;
        let now = self.clock.utc();
        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        let user_demographics = self
            .analytics
            .user_demographics()
            .await
            .map_err(map_persistence_error)?;
        let subscriptions = self
            .analytics
            .subscription_counts()
            .await
            .map_err(map_persistence_error)?;
        let program_popularity = self
            .analytics
            .program_popularity(PROGRAM_POPULARITY_TOP)
            .await
            .map_err(map_persistence_error)?;
        let content = self
            .analytics
            .content_counts()
            .await
            .map_err(map_persistence_error)?;
        let sightings = self
            .analytics
            .sighting_statistics()
            .await
            .map_err(map_persistence_error)?;
        let daily_active_users = self
            .analytics
            .active_users_between(day_start, day_start + Duration::days(1))
            .await
            .map_err(map_persistence_error)?;
        let latest_metrics = self
            .analytics
            .latest_metrics()
            .await
            .map_err(map_persistence_error)?;

        Ok(AnalyticsDashboard {
            generated_at: now,
            total_users: user_demographics.iter().map(|row| row.count).sum(),
            user_demographics,
            active_subscriptions: subscriptions
                .iter()
                .filter(|row| row.status == SubscriptionStatus::Active)
                .map(|row| row.count)
                .sum(),
            subscriptions,
            program_popularity,
            content: ContentStatistics::from_counts(content),
            sightings,
            daily_active_users,
            latest_metrics,
        })
    }

    async fn metric_history(
        &self,
        actor: &Actor,
        metric_type: &str,
        days: u32,
    ) -> Result<Vec<AnalyticsRecord>, Error> {
        self.permissions
            .require_role(actor, RoleGate::ViewAnalytics)
            .await?;
        let metric_type = bounded_text("metricType", metric_type, METRIC_TYPE_MAX)?;
        let days = days.clamp(1, METRIC_HISTORY_DAYS_MAX);
        let since = self.clock.utc() - Duration::days(i64::from(days));
        self.analytics
            .metric_history(&metric_type, since)
            .await
            .map_err(map_persistence_error)
    }
}
