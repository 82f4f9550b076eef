//! Driving port for content, sightings, notes and analytics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{
    Actor, AnalyticsRecord, Content, ContentId, ContentType, Error, Note, NoteTargetType,
    OrganizationId, Sighting, SightingFilter, SightingId,
};

/// Fields for a new library item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadContentRequest {
    pub title: String,
    pub content_type: ContentType,
    pub body: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub is_public: bool,
}

/// Fields for a sighting report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSightingRequest {
    pub species_name: String,
    pub location: String,
    pub observed_at: DateTime<Utc>,
    pub description: Option<String>,
    pub photo_path: Option<String>,
}

/// Fields for a teacher note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddNoteRequest {
    pub target_type: NoteTargetType,
    pub target_id: i64,
    pub text: String,
}

/// Fields for an analytics sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordAnalyticsRequest {
    pub metric_type: String,
    pub metric_value: Option<f64>,
    pub metric_data: Option<Value>,
}

/// Library use-cases consumed by inbound adapters.
#[async_trait]
pub trait Library: Send + Sync {
    /// Upload a content item, optionally on behalf of an organization.
    async fn upload_content(
        &self,
        actor: &Actor,
        request: UploadContentRequest,
    ) -> Result<Content, Error>;

    /// Fetch a content item the caller may see. Hidden items are reported as
    /// missing.
    async fn view_content(&self, actor: Option<Actor>, content: ContentId)
    -> Result<Content, Error>;

    /// Public content, newest first.
    async fn public_content(
        &self,
        content_type: Option<ContentType>,
        limit: u32,
    ) -> Result<Vec<Content>, Error>;

    /// Report a species sighting.
    async fn report_sighting(
        &self,
        actor: &Actor,
        request: ReportSightingRequest,
    ) -> Result<Sighting, Error>;

    /// Mark a sighting verified.
    async fn verify_sighting(&self, actor: &Actor, sighting: SightingId)
    -> Result<Sighting, Error>;

    /// Browse sightings; no login needed.
    async fn browse_sightings(
        &self,
        filter: SightingFilter,
        limit: u32,
    ) -> Result<Vec<Sighting>, Error>;

    /// Attach a teacher note to a submission, content item or sighting.
    async fn add_note(&self, actor: &Actor, request: AddNoteRequest) -> Result<Note, Error>;

    /// Record an analytics sample.
    async fn record_analytics(
        &self,
        actor: &Actor,
        request: RecordAnalyticsRequest,
    ) -> Result<AnalyticsRecord, Error>;
}
