//! Port for library content, sightings, notes and analytics.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{
    AnalyticsRecord, Content, ContentId, ContentType, NewAnalyticsRecord, NewContent, NewNote,
    NewSighting, Note, NoteTargetType, OrganizationId, Sighting, SightingFilter, SightingId,
};

/// Storage for user-contributed material.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Insert a content item.
    async fn insert_content(&self, content: &NewContent) -> Result<Content, PersistenceError>;

    /// Fetch a content item by id.
    async fn find_content(&self, id: ContentId) -> Result<Option<Content>, PersistenceError>;

    /// Public content, newest first, optionally filtered by type.
    async fn public_content(
        &self,
        content_type: Option<ContentType>,
        limit: u32,
    ) -> Result<Vec<Content>, PersistenceError>;

    /// Content attached to an organization, newest first.
    async fn organization_content(
        &self,
        organization: OrganizationId,
        include_private: bool,
    ) -> Result<Vec<Content>, PersistenceError>;

    /// Insert an unverified sighting.
    async fn insert_sighting(&self, sighting: &NewSighting)
    -> Result<Sighting, PersistenceError>;

    /// Fetch a sighting by id.
    async fn find_sighting(&self, id: SightingId) -> Result<Option<Sighting>, PersistenceError>;

    /// Mark a sighting verified, returning the updated row.
    async fn verify_sighting(&self, id: SightingId) -> Result<Option<Sighting>, PersistenceError>;

    /// Sightings matching the filter, most recently observed first.
    async fn browse_sightings(
        &self,
        filter: &SightingFilter,
        limit: u32,
    ) -> Result<Vec<Sighting>, PersistenceError>;

    /// Insert a teacher note.
    async fn insert_note(&self, note: &NewNote) -> Result<Note, PersistenceError>;

    /// Notes attached to one target, oldest first.
    async fn notes_for(
        &self,
        target_type: NoteTargetType,
        target_id: i64,
    ) -> Result<Vec<Note>, PersistenceError>;

    /// Insert an analytics record.
    async fn insert_analytics(
        &self,
        record: &NewAnalyticsRecord,
    ) -> Result<AnalyticsRecord, PersistenceError>;
}
