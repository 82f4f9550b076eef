//! Content library, species sightings, teacher notes and analytics records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::vocabulary::define_vocabulary;
use super::{AnalyticsId, ContentId, NoteId, OrganizationId, SightingId, UserId};

/// Maximum content title length.
pub const CONTENT_TITLE_MAX: usize = 300;
/// Maximum species name length.
pub const SPECIES_NAME_MAX: usize = 100;
/// Maximum sighting location length.
pub const LOCATION_MAX: usize = 200;
/// Upper bound on listing sizes.
pub const LISTING_LIMIT_MAX: u32 = 100;

define_vocabulary! {
    /// Kind of library item.
    pub enum ContentType as "content type" {
        Article => "article",
        Essay => "essay",
        Report => "report",
        Sighting => "sighting",
        Photo => "photo",
        Video => "video",
        EducationalMaterial => "educational_material",
    }
}

/// Library item owned by a user and optionally an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub content_type: ContentType,
    pub body: Option<String>,
    pub created_by: UserId,
    pub organization_id: Option<OrganizationId>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a library item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub title: String,
    pub content_type: ContentType,
    pub body: Option<String>,
    pub created_by: UserId,
    pub organization_id: Option<OrganizationId>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Reported observation of a species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sighting {
    pub id: SightingId,
    pub species_name: String,
    pub location: String,
    pub observed_at: DateTime<Utc>,
    pub description: Option<String>,
    pub photo_path: Option<String>,
    pub reported_by: UserId,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a sighting; `verified` always starts false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSighting {
    pub species_name: String,
    pub location: String,
    pub observed_at: DateTime<Utc>,
    pub description: Option<String>,
    pub photo_path: Option<String>,
    pub reported_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Browse filter for sightings. Species takes precedence over location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SightingFilter {
    pub species_name: Option<String>,
    pub location: Option<String>,
    pub verified_only: bool,
}

define_vocabulary! {
    /// Kind of entity a teacher note is attached to.
    pub enum NoteTargetType as "note target" {
        Submission => "submission",
        Content => "content",
        Sighting => "sighting",
    }
}

/// Teacher annotation on a submission, content item or sighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub teacher_id: UserId,
    pub target_type: NoteTargetType,
    pub target_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub teacher_id: UserId,
    pub target_type: NoteTargetType,
    pub target_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Business metric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRecord {
    pub id: AnalyticsId,
    pub metric_type: String,
    pub metric_value: Option<f64>,
    pub metric_data: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

/// Insert payload for an analytics record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalyticsRecord {
    pub metric_type: String,
    pub metric_value: Option<f64>,
    pub metric_data: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}
