//! Aggregate reads for the analytics dashboard.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::MemoryStore;
use crate::domain::ports::{AnalyticsRepository, PersistenceError};
use crate::domain::{
    AnalyticsRecord, ContentType, ContentTypeCount, ProgramEnrollmentStatus, ProgramPopularity,
    RoleCount, SightingStatistics, SubscriptionCount, UserRole,
};

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

#[async_trait]
impl AnalyticsRepository for MemoryStore {
    async fn user_demographics(&self) -> Result<Vec<RoleCount>, PersistenceError> {
        self.with_tables(|tables| {
            let mut by_role: BTreeMap<&'static str, (UserRole, u64)> = BTreeMap::new();
            for user in tables.users.values() {
                by_role.entry(user.role.as_str()).or_insert((user.role, 0)).1 += 1;
            }
            Ok(by_role
                .into_values()
                .map(|(role, count)| RoleCount { role, count })
                .collect())
        })
    }

    async fn subscription_counts(&self) -> Result<Vec<SubscriptionCount>, PersistenceError> {
        self.with_tables(|tables| {
            let mut groups: BTreeMap<(&'static str, &'static str), SubscriptionCount> =
                BTreeMap::new();
            for org in tables.organizations.values() {
                groups
                    .entry((org.org_type.as_str(), org.subscription_status.as_str()))
                    .or_insert(SubscriptionCount {
                        org_type: org.org_type,
                        status: org.subscription_status,
                        count: 0,
                    })
                    .count += 1;
            }
            Ok(groups.into_values().collect())
        })
    }

    async fn program_popularity(
        &self,
        limit: u32,
    ) -> Result<Vec<ProgramPopularity>, PersistenceError> {
        self.with_tables(|tables| {
            let mut active: BTreeMap<i64, usize> = BTreeMap::new();
            for enrollment in tables.program_enrollments.values() {
                if enrollment.status == ProgramEnrollmentStatus::Active {
                    *active.entry(enrollment.program_id.get()).or_default() += 1;
                }
            }
            let mut ranking: Vec<ProgramPopularity> = active
                .into_iter()
                .filter_map(|(program_id, enrolled)| {
                    tables.programs.get(program_id).map(|program| ProgramPopularity {
                        program_id: program.id,
                        name: program.name.clone(),
                        program_type: program.program_type,
                        enrollment_count: count(enrolled),
                    })
                })
                .collect();
            ranking.sort_by_key(|row| (Reverse(row.enrollment_count), row.program_id.get()));
            ranking.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            Ok(ranking)
        })
    }

    async fn content_counts(&self) -> Result<Vec<ContentTypeCount>, PersistenceError> {
        self.with_tables(|tables| {
            let mut by_type: BTreeMap<&'static str, ContentTypeCount> = BTreeMap::new();
            for item in tables.content.values() {
                let row = by_type
                    .entry(item.content_type.as_str())
                    .or_insert_with(|| empty_count(item.content_type));
                if item.is_public {
                    row.public += 1;
                } else {
                    row.private += 1;
                }
            }
            Ok(by_type.into_values().collect())
        })
    }

    async fn sighting_statistics(&self) -> Result<SightingStatistics, PersistenceError> {
        self.with_tables(|tables| {
            let sightings: Vec<_> = tables.sightings.values().collect();
            let species: BTreeSet<&str> = sightings
                .iter()
                .map(|s| s.species_name.as_str())
                .collect();
            let reporters: BTreeSet<i64> =
                sightings.iter().map(|s| s.reported_by.get()).collect();
            Ok(SightingStatistics {
                total_sightings: count(sightings.len()),
                unique_species: count(species.len()),
                unique_reporters: count(reporters.len()),
                verified_count: count(sightings.iter().filter(|s| s.verified).count()),
            })
        })
    }

    async fn active_users_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<u64, PersistenceError> {
        self.with_tables(|tables| {
            let users: BTreeSet<i64> = tables
                .access_log
                .values()
                .filter(|entry| entry.recorded_at >= from && entry.recorded_at < until)
                .filter_map(|entry| entry.user_id.map(|id| id.get()))
                .collect();
            Ok(count(users.len()))
        })
    }

    async fn latest_metrics(&self) -> Result<Vec<AnalyticsRecord>, PersistenceError> {
        self.with_tables(|tables| {
            let mut latest: BTreeMap<&str, &AnalyticsRecord> = BTreeMap::new();
            for record in tables.analytics.values() {
                let newer = latest
                    .get(record.metric_type.as_str())
                    .is_none_or(|seen| (record.recorded_at, record.id) > (seen.recorded_at, seen.id));
                if newer {
                    latest.insert(record.metric_type.as_str(), record);
                }
            }
            Ok(latest.into_values().cloned().collect())
        })
    }

    async fn metric_history(
        &self,
        metric_type: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsRecord>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<AnalyticsRecord> = tables
                .analytics
                .values()
                .filter(|record| record.metric_type == metric_type && record.recorded_at >= since)
                .cloned()
                .collect();
            rows.sort_by_key(|row| Reverse((row.recorded_at, row.id)));
            Ok(rows)
        })
    }
}

const fn empty_count(content_type: ContentType) -> ContentTypeCount {
    ContentTypeCount {
        content_type,
        public: 0,
        private: 0,
    }
}
