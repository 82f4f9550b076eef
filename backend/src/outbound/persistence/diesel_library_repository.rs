//! PostgreSQL-backed [`LibraryRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LibraryRepository, PersistenceError};
use crate::domain::{
    AnalyticsRecord, Content, ContentId, ContentType, NewAnalyticsRecord, NewContent, NewNote,
    NewSighting, Note, NoteTargetType, OrganizationId, Sighting, SightingFilter, SightingId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    AnalyticsRow, ContentRow, NewAnalyticsRow, NewContentRow, NewNoteRow, NewSightingRow, NoteRow,
    SightingRow, convert_rows,
};
use super::pool::DbPool;
use super::schema::{business_analytics, content_library, notes, species_sightings};

/// Diesel adapter for library content, sightings, notes and analytics.
#[derive(Clone)]
pub struct DieselLibraryRepository {
    pool: DbPool,
}

impl DieselLibraryRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Substring pattern for `ILIKE` with the wildcard characters of `term`
/// escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl LibraryRepository for DieselLibraryRepository {
    async fn insert_content(&self, content: &NewContent) -> Result<Content, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewContentRow {
            title: content.title.as_str(),
            content_type: content.content_type.as_str(),
            body: content.body.as_deref(),
            created_by: content.created_by.get(),
            org_id: content.organization_id.map(i64::from),
            is_public: content.is_public,
            created_at: content.created_at,
        };
        let stored: ContentRow = diesel::insert_into(content_library::table)
            .values(&row)
            .returning(ContentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Content::try_from(stored)
    }

    async fn find_content(&self, id: ContentId) -> Result<Option<Content>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ContentRow> = content_library::table
            .find(id.get())
            .select(ContentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Content::try_from).transpose()
    }

    async fn public_content(
        &self,
        content_type: Option<ContentType>,
        limit: u32,
    ) -> Result<Vec<Content>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = content_library::table
            .select(ContentRow::as_select())
            .filter(content_library::is_public.eq(true))
            .into_boxed();
        if let Some(kind) = content_type {
            query = query.filter(content_library::content_type.eq(kind.as_str()));
        }
        let rows: Vec<ContentRow> = query
            .order((content_library::created_at.desc(), content_library::id.desc()))
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn organization_content(
        &self,
        organization: OrganizationId,
        include_private: bool,
    ) -> Result<Vec<Content>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = content_library::table
            .select(ContentRow::as_select())
            .filter(content_library::org_id.eq(organization.get()))
            .into_boxed();
        if !include_private {
            query = query.filter(content_library::is_public.eq(true));
        }
        let rows: Vec<ContentRow> = query
            .order((content_library::created_at.desc(), content_library::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn insert_sighting(
        &self,
        sighting: &NewSighting,
    ) -> Result<Sighting, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSightingRow {
            species_name: sighting.species_name.as_str(),
            location: sighting.location.as_str(),
            observed_at: sighting.observed_at,
            description: sighting.description.as_deref(),
            photo_path: sighting.photo_path.as_deref(),
            reported_by: sighting.reported_by.get(),
            created_at: sighting.created_at,
        };
        let stored: SightingRow = diesel::insert_into(species_sightings::table)
            .values(&row)
            .returning(SightingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn find_sighting(&self, id: SightingId) -> Result<Option<Sighting>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SightingRow> = species_sightings::table
            .find(id.get())
            .select(SightingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn verify_sighting(&self, id: SightingId) -> Result<Option<Sighting>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SightingRow> = diesel::update(species_sightings::table.find(id.get()))
            .set(species_sightings::verified.eq(true))
            .returning(SightingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn browse_sightings(
        &self,
        filter: &SightingFilter,
        limit: u32,
    ) -> Result<Vec<Sighting>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = species_sightings::table
            .select(SightingRow::as_select())
            .into_boxed();
        match (&filter.species_name, &filter.location) {
            (Some(species), _) => {
                query = query.filter(species_sightings::species_name.eq(species.clone()));
            }
            (None, Some(location)) => {
                query = query.filter(species_sightings::location.ilike(contains_pattern(location)));
            }
            (None, None) => {}
        }
        if filter.verified_only {
            query = query.filter(species_sightings::verified.eq(true));
        }
        let rows: Vec<SightingRow> = query
            .order((
                species_sightings::observed_at.desc(),
                species_sightings::id.desc(),
            ))
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Sighting::from).collect())
    }

    async fn insert_note(&self, note: &NewNote) -> Result<Note, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewNoteRow {
            teacher_id: note.teacher_id.get(),
            target_type: note.target_type.as_str(),
            target_id: note.target_id,
            text: note.text.as_str(),
            created_at: note.created_at,
        };
        let stored: NoteRow = diesel::insert_into(notes::table)
            .values(&row)
            .returning(NoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Note::try_from(stored)
    }

    async fn notes_for(
        &self,
        target_type: NoteTargetType,
        target_id: i64,
    ) -> Result<Vec<Note>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NoteRow> = notes::table
            .filter(notes::target_type.eq(target_type.as_str()))
            .filter(notes::target_id.eq(target_id))
            .order((notes::created_at.asc(), notes::id.asc()))
            .select(NoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn insert_analytics(
        &self,
        record: &NewAnalyticsRecord,
    ) -> Result<AnalyticsRecord, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAnalyticsRow {
            metric_type: record.metric_type.as_str(),
            metric_value: record.metric_value,
            metric_data: record.metric_data.as_ref(),
            recorded_at: record.recorded_at,
        };
        let stored: AnalyticsRow = diesel::insert_into(business_analytics::table)
            .values(&row)
            .returning(AnalyticsRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("harbour", "%harbour%")]
    #[case("50%_off", "%50\\%\\_off%")]
    #[case("a\\b", "%a\\\\b%")]
    fn location_terms_match_literally(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }
}
