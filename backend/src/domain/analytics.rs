//! Read-side aggregates for the admin analytics dashboard and the
//! student data access audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    AccessLogEntry, AnalyticsRecord, ContentType, OrganizationType, ProgramId, ProgramType,
    SubscriptionStatus, UserRole,
};

/// Programs listed in the popularity ranking.
pub const PROGRAM_POPULARITY_TOP: u32 = 10;
/// Default window of a metric history, in days.
pub const METRIC_HISTORY_DAYS_DEFAULT: u32 = 30;
/// Longest metric history window, in days.
pub const METRIC_HISTORY_DAYS_MAX: u32 = 365;

/// Accounts holding one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCount {
    pub role: UserRole,
    pub count: u64,
}

/// Organizations of one type in one subscription state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCount {
    pub org_type: OrganizationType,
    pub status: SubscriptionStatus,
    pub count: u64,
}

/// Active enrollments of one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPopularity {
    pub program_id: ProgramId,
    pub name: String,
    pub program_type: ProgramType,
    pub enrollment_count: u64,
}

/// Content items of one type split by visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeCount {
    pub content_type: ContentType,
    pub public: u64,
    pub private: u64,
}

/// Library totals with a per-type breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatistics {
    pub by_type: Vec<ContentTypeCount>,
    pub public_count: u64,
    pub private_count: u64,
    pub total_count: u64,
}

impl ContentStatistics {
    /// Sum the per-type counts into totals.
    #[must_use]
    pub fn from_counts(by_type: Vec<ContentTypeCount>) -> Self {
        let public_count = by_type.iter().map(|row| row.public).sum();
        let private_count = by_type.iter().map(|row| row.private).sum();
        Self {
            by_type,
            public_count,
            private_count,
            total_count: public_count + private_count,
        }
    }
}

/// Sighting totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingStatistics {
    pub total_sightings: u64,
    pub unique_species: u64,
    pub unique_reporters: u64,
    pub verified_count: u64,
}

/// Platform-wide snapshot shown to admins.
///
/// Every figure is computed on request; building the dashboard writes
/// nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDashboard {
    pub generated_at: DateTime<Utc>,
    pub user_demographics: Vec<RoleCount>,
    pub total_users: u64,
    pub subscriptions: Vec<SubscriptionCount>,
    pub active_subscriptions: u64,
    /// Most enrolled programs, at most [`PROGRAM_POPULARITY_TOP`].
    pub program_popularity: Vec<ProgramPopularity>,
    pub content: ContentStatistics,
    pub sightings: SightingStatistics,
    /// Distinct users with an access log entry since midnight UTC.
    pub daily_active_users: u64,
    /// Newest sample of every recorded metric type.
    pub latest_metrics: Vec<AnalyticsRecord>,
}

/// Access log entry about a student together with who performed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAccessRecord {
    #[serde(flatten)]
    pub entry: AccessLogEntry,
    /// `None` when the accessor's account no longer exists.
    pub accessor_name: Option<String>,
    pub accessor_role: Option<UserRole>,
}
