//! Library content, sightings, notes and analytics.

use std::cmp::Reverse;

use async_trait::async_trait;

use super::{MemoryStore, require_row};
use crate::domain::ports::{LibraryRepository, PersistenceError};
use crate::domain::{
    AnalyticsId, AnalyticsRecord, Content, ContentId, ContentType, NewAnalyticsRecord,
    NewContent, NewNote, NewSighting, Note, NoteId, NoteTargetType, OrganizationId, Sighting,
    SightingFilter, SightingId,
};

fn limit_rows<T>(mut rows: Vec<T>, limit: u32) -> Vec<T> {
    rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    rows
}

/// Species takes precedence; the location fragment applies only without one.
fn matches_filter(sighting: &Sighting, filter: &SightingFilter) -> bool {
    if filter.verified_only && !sighting.verified {
        return false;
    }
    match (&filter.species_name, &filter.location) {
        (Some(species), _) => sighting.species_name == *species,
        (None, Some(location)) => sighting
            .location
            .to_lowercase()
            .contains(&location.to_lowercase()),
        (None, None) => true,
    }
}

#[async_trait]
impl LibraryRepository for MemoryStore {
    async fn insert_content(&self, content: &NewContent) -> Result<Content, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.users.contains(content.created_by.get()),
                "content_library_created_by_fkey",
            )?;
            if let Some(org) = content.organization_id {
                require_row(
                    tables.organizations.contains(org.get()),
                    "content_library_org_id_fkey",
                )?;
            }
            Ok(tables.content.insert_with(|id| Content {
                id: ContentId::new(id),
                title: content.title.clone(),
                content_type: content.content_type,
                body: content.body.clone(),
                created_by: content.created_by,
                organization_id: content.organization_id,
                is_public: content.is_public,
                created_at: content.created_at,
            }))
        })
    }

    async fn find_content(&self, id: ContentId) -> Result<Option<Content>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.content.get(id.get()).cloned()))
    }

    async fn public_content(
        &self,
        content_type: Option<ContentType>,
        limit: u32,
    ) -> Result<Vec<Content>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<Content> = tables
                .content
                .values()
                .filter(|row| row.is_public)
                .filter(|row| content_type.is_none_or(|wanted| row.content_type == wanted))
                .cloned()
                .collect();
            rows.sort_by_key(|row| Reverse((row.created_at, row.id)));
            Ok(limit_rows(rows, limit))
        })
    }

    async fn organization_content(
        &self,
        organization: OrganizationId,
        include_private: bool,
    ) -> Result<Vec<Content>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<Content> = tables
                .content
                .values()
                .filter(|row| row.organization_id == Some(organization))
                .filter(|row| include_private || row.is_public)
                .cloned()
                .collect();
            rows.sort_by_key(|row| Reverse((row.created_at, row.id)));
            Ok(rows)
        })
    }

    async fn insert_sighting(
        &self,
        sighting: &NewSighting,
    ) -> Result<Sighting, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.users.contains(sighting.reported_by.get()),
                "species_sightings_reported_by_fkey",
            )?;
            Ok(tables.sightings.insert_with(|id| Sighting {
                id: SightingId::new(id),
                species_name: sighting.species_name.clone(),
                location: sighting.location.clone(),
                observed_at: sighting.observed_at,
                description: sighting.description.clone(),
                photo_path: sighting.photo_path.clone(),
                reported_by: sighting.reported_by,
                verified: false,
                created_at: sighting.created_at,
            }))
        })
    }

    async fn find_sighting(&self, id: SightingId) -> Result<Option<Sighting>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.sightings.get(id.get()).cloned()))
    }

    async fn verify_sighting(&self, id: SightingId) -> Result<Option<Sighting>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables.sightings.get_mut(id.get()).map(|row| {
                row.verified = true;
                row.clone()
            }))
        })
    }

    async fn browse_sightings(
        &self,
        filter: &SightingFilter,
        limit: u32,
    ) -> Result<Vec<Sighting>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<Sighting> = tables
                .sightings
                .values()
                .filter(|row| matches_filter(row, filter))
                .cloned()
                .collect();
            rows.sort_by_key(|row| Reverse((row.observed_at, row.id)));
            Ok(limit_rows(rows, limit))
        })
    }

    async fn insert_note(&self, note: &NewNote) -> Result<Note, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.users.contains(note.teacher_id.get()),
                "notes_teacher_id_fkey",
            )?;
            Ok(tables.notes.insert_with(|id| Note {
                id: NoteId::new(id),
                teacher_id: note.teacher_id,
                target_type: note.target_type,
                target_id: note.target_id,
                text: note.text.clone(),
                created_at: note.created_at,
            }))
        })
    }

    async fn notes_for(
        &self,
        target_type: NoteTargetType,
        target_id: i64,
    ) -> Result<Vec<Note>, PersistenceError> {
        self.with_tables(|tables| {
            let mut rows: Vec<Note> = tables
                .notes
                .values()
                .filter(|row| row.target_type == target_type && row.target_id == target_id)
                .cloned()
                .collect();
            rows.sort_by_key(|row| (row.created_at, row.id));
            Ok(rows)
        })
    }

    async fn insert_analytics(
        &self,
        record: &NewAnalyticsRecord,
    ) -> Result<AnalyticsRecord, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables.analytics.insert_with(|id| AnalyticsRecord {
                id: AnalyticsId::new(id),
                metric_type: record.metric_type.clone(),
                metric_value: record.metric_value,
                metric_data: record.metric_data.clone(),
                recorded_at: record.recorded_at,
            }))
        })
    }
}
