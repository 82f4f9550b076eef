//! PostgreSQL-backed [`AnalyticsRepository`].
//!
//! Grouped counts run as raw SQL through `sql_query`; the metric reads use
//! the query DSL against `business_analytics`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text, Timestamptz};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AnalyticsRepository, PersistenceError};
use crate::domain::{
    AnalyticsRecord, ContentTypeCount, ProgramId, ProgramPopularity, RoleCount,
    SightingStatistics, SubscriptionCount,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AnalyticsRow, decode};
use super::pool::DbPool;
use super::schema::business_analytics;

const USER_DEMOGRAPHICS_SQL: &str =
    "SELECT role AS label, COUNT(*) AS count FROM users GROUP BY role ORDER BY role";

const SUBSCRIPTION_COUNTS_SQL: &str = "\
SELECT org_type, subscription_status AS status, COUNT(*) AS count \
FROM organizations \
GROUP BY org_type, subscription_status \
ORDER BY org_type, subscription_status";

const PROGRAM_POPULARITY_SQL: &str = "\
SELECT p.id, p.name, p.program_type, COUNT(e.id) AS count \
FROM programs p \
JOIN program_enrollments e ON e.program_id = p.id AND e.status = 'active' \
GROUP BY p.id, p.name, p.program_type \
ORDER BY count DESC, p.id \
LIMIT $1";

const CONTENT_COUNTS_SQL: &str = "\
SELECT content_type, \
       COUNT(*) FILTER (WHERE is_public) AS public, \
       COUNT(*) FILTER (WHERE NOT is_public) AS private \
FROM content_library \
GROUP BY content_type \
ORDER BY content_type";

const SIGHTING_STATISTICS_SQL: &str = "\
SELECT COUNT(*) AS total, \
       COUNT(DISTINCT species_name) AS species, \
       COUNT(DISTINCT reported_by) AS reporters, \
       COUNT(*) FILTER (WHERE verified) AS verified \
FROM species_sightings";

const ACTIVE_USERS_SQL: &str = "\
SELECT COUNT(DISTINCT user_id) AS count \
FROM access_logs \
WHERE recorded_at >= $1 AND recorded_at < $2";

#[derive(QueryableByName)]
struct LabelCountRow {
    #[diesel(sql_type = Text)]
    label: String,
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct SubscriptionCountRow {
    #[diesel(sql_type = Text)]
    org_type: String,
    #[diesel(sql_type = Text)]
    status: String,
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct ProgramPopularityRow {
    #[diesel(sql_type = BigInt)]
    id: i64,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    program_type: String,
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct ContentCountRow {
    #[diesel(sql_type = Text)]
    content_type: String,
    #[diesel(sql_type = BigInt)]
    public: i64,
    #[diesel(sql_type = BigInt)]
    private: i64,
}

#[derive(QueryableByName)]
struct SightingStatisticsRow {
    #[diesel(sql_type = BigInt)]
    total: i64,
    #[diesel(sql_type = BigInt)]
    species: i64,
    #[diesel(sql_type = BigInt)]
    reporters: i64,
    #[diesel(sql_type = BigInt)]
    verified: i64,
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// `COUNT(*)` never goes negative; clamp rather than fail if it somehow does.
fn unsigned(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Diesel adapter for the dashboard aggregates.
#[derive(Clone)]
pub struct DieselAnalyticsRepository {
    pool: DbPool,
}

impl DieselAnalyticsRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for DieselAnalyticsRepository {
    async fn user_demographics(&self) -> Result<Vec<RoleCount>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LabelCountRow> = diesel::sql_query(USER_DEMOGRAPHICS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                Ok(RoleCount {
                    role: decode(&row.label)?,
                    count: unsigned(row.count),
                })
            })
            .collect()
    }

    async fn subscription_counts(&self) -> Result<Vec<SubscriptionCount>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SubscriptionCountRow> = diesel::sql_query(SUBSCRIPTION_COUNTS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                Ok(SubscriptionCount {
                    org_type: decode(&row.org_type)?,
                    status: decode(&row.status)?,
                    count: unsigned(row.count),
                })
            })
            .collect()
    }

    async fn program_popularity(
        &self,
        limit: u32,
    ) -> Result<Vec<ProgramPopularity>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProgramPopularityRow> = diesel::sql_query(PROGRAM_POPULARITY_SQL)
            .bind::<BigInt, _>(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                Ok(ProgramPopularity {
                    program_id: ProgramId::new(row.id),
                    name: row.name,
                    program_type: decode(&row.program_type)?,
                    enrollment_count: unsigned(row.count),
                })
            })
            .collect()
    }

    async fn content_counts(&self) -> Result<Vec<ContentTypeCount>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ContentCountRow> = diesel::sql_query(CONTENT_COUNTS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                Ok(ContentTypeCount {
                    content_type: decode(&row.content_type)?,
                    public: unsigned(row.public),
                    private: unsigned(row.private),
                })
            })
            .collect()
    }

    async fn sighting_statistics(&self) -> Result<SightingStatistics, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: SightingStatisticsRow = diesel::sql_query(SIGHTING_STATISTICS_SQL)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(SightingStatistics {
            total_sightings: unsigned(row.total),
            unique_species: unsigned(row.species),
            unique_reporters: unsigned(row.reporters),
            verified_count: unsigned(row.verified),
        })
    }

    async fn active_users_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<u64, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CountRow = diesel::sql_query(ACTIVE_USERS_SQL)
            .bind::<Timestamptz, _>(from)
            .bind::<Timestamptz, _>(until)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(unsigned(row.count))
    }

    async fn latest_metrics(&self) -> Result<Vec<AnalyticsRecord>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AnalyticsRow> = business_analytics::table
            .distinct_on(business_analytics::metric_type)
            .order((
                business_analytics::metric_type,
                business_analytics::recorded_at.desc(),
                business_analytics::id.desc(),
            ))
            .select(AnalyticsRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(AnalyticsRecord::from).collect())
    }

    async fn metric_history(
        &self,
        metric_type: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsRecord>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AnalyticsRow> = business_analytics::table
            .filter(business_analytics::metric_type.eq(metric_type))
            .filter(business_analytics::recorded_at.ge(since))
            .order((
                business_analytics::recorded_at.desc(),
                business_analytics::id.desc(),
            ))
            .select(AnalyticsRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(AnalyticsRecord::from).collect())
    }
}
