//! Library service: content, sightings, teacher notes and analytics.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::permissions::{PermissionEngine, RoleGate};
use crate::domain::ports::{
    AddNoteRequest, Library, LibraryRepository, OrganizationRepository, RecordAnalyticsRequest,
    ReportSightingRequest, SubmissionRepository, UploadContentRequest,
};
use crate::domain::service_support::{
    AuditTrail, Repositories, bounded_text, clamp_limit, found, map_persistence_error,
    optional_bounded_text,
};
use crate::domain::{
    Actor, AnalyticsRecord, AuditAction, AuditTarget, CONTENT_TITLE_MAX, Content, ContentId,
    ContentType, Error, LOCATION_MAX, NewAnalyticsRecord, NewContent, NewNote, NewSighting, Note,
    NoteTargetType, SPECIES_NAME_MAX, Sighting, SightingFilter, SightingId, SubmissionId,
    TargetKind,
};

const NOTE_TEXT_MAX: usize = 2000;
const METRIC_TYPE_MAX: usize = 50;
const PHOTO_PATH_MAX: usize = 255;

/// Implements [`Library`].
#[derive(Clone)]
pub struct LibraryService {
    library: Arc<dyn LibraryRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    permissions: PermissionEngine,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
}

impl LibraryService {
    /// Create the service from the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            library: Arc::clone(&repos.library),
            organizations: Arc::clone(&repos.organizations),
            submissions: Arc::clone(&repos.submissions),
            permissions: PermissionEngine::new(repos),
            audit: AuditTrail::new(repos),
            clock: Arc::clone(&repos.clock),
        }
    }

    async fn note_target_exists(&self, target_type: NoteTargetType, id: i64) -> Result<bool, Error> {
        let exists = match target_type {
            NoteTargetType::Submission => self
                .submissions
                .find_by_id(SubmissionId::new(id))
                .await
                .map_err(map_persistence_error)?
                .is_some(),
            NoteTargetType::Content => self
                .library
                .find_content(ContentId::new(id))
                .await
                .map_err(map_persistence_error)?
                .is_some(),
            NoteTargetType::Sighting => self
                .library
                .find_sighting(SightingId::new(id))
                .await
                .map_err(map_persistence_error)?
                .is_some(),
        };
        Ok(exists)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl Library for LibraryService {
    async fn upload_content(
        &self,
        actor: &Actor,
        request: UploadContentRequest,
    ) -> Result<Content, Error> {
        let author = self.permissions.account(actor).await?;
        let title = bounded_text("title", &request.title, CONTENT_TITLE_MAX)?;
        if let Some(organization) = request.organization_id {
            let membership = self
                .organizations
                .find_membership(organization, author.id)
                .await
                .map_err(map_persistence_error)?;
            if membership.is_none() {
                return Err(Error::forbidden(
                    "only members may publish on behalf of an organization",
                ));
            }
        }
        let content = self
            .library
            .insert_content(&NewContent {
                title,
                content_type: request.content_type,
                body: request.body,
                created_by: author.id,
                organization_id: request.organization_id,
                is_public: request.is_public,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::UploadContent,
                AuditTarget::new(TargetKind::Content, content.id),
            )
            .await;
        Ok(content)
    }

    async fn view_content(
        &self,
        actor: Option<Actor>,
        content: ContentId,
    ) -> Result<Content, Error> {
        let content = found(
            self.library
                .find_content(content)
                .await
                .map_err(map_persistence_error)?,
            "content",
        )?;
        if self
            .permissions
            .can_view_content(actor.as_ref(), &content)
            .await?
        {
            Ok(content)
        } else {
            Err(Error::not_found("content not found"))
        }
    }

    async fn public_content(
        &self,
        content_type: Option<ContentType>,
        limit: u32,
    ) -> Result<Vec<Content>, Error> {
        self.library
            .public_content(content_type, clamp_limit(limit))
            .await
            .map_err(map_persistence_error)
    }

    async fn report_sighting(
        &self,
        actor: &Actor,
        request: ReportSightingRequest,
    ) -> Result<Sighting, Error> {
        let reporter = self.permissions.account(actor).await?;
        let species_name = bounded_text("speciesName", &request.species_name, SPECIES_NAME_MAX)?;
        let location = bounded_text("location", &request.location, LOCATION_MAX)?;
        let photo_path = optional_bounded_text("photoPath", request.photo_path, PHOTO_PATH_MAX)?;
        let now = self.clock.utc();
        if request.observed_at > now {
            return Err(Error::invalid_request("observation time is in the future"));
        }
        let sighting = self
            .library
            .insert_sighting(&NewSighting {
                species_name,
                location,
                observed_at: request.observed_at,
                description: request.description,
                photo_path,
                reported_by: reporter.id,
                created_at: now,
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::ReportSighting,
                AuditTarget::new(TargetKind::Sighting, sighting.id),
            )
            .await;
        Ok(sighting)
    }

    async fn verify_sighting(
        &self,
        actor: &Actor,
        sighting: SightingId,
    ) -> Result<Sighting, Error> {
        self.permissions
            .require_role(actor, RoleGate::VerifySighting)
            .await?;
        let verified = found(
            self.library
                .verify_sighting(sighting)
                .await
                .map_err(map_persistence_error)?,
            "sighting",
        )?;
        self.audit
            .record(
                actor,
                AuditAction::VerifySighting,
                AuditTarget::new(TargetKind::Sighting, verified.id),
            )
            .await;
        Ok(verified)
    }

    async fn browse_sightings(
        &self,
        filter: SightingFilter,
        limit: u32,
    ) -> Result<Vec<Sighting>, Error> {
        let filter = SightingFilter {
            species_name: non_blank(filter.species_name),
            location: non_blank(filter.location),
            verified_only: filter.verified_only,
        };
        self.library
            .browse_sightings(&filter, clamp_limit(limit))
            .await
            .map_err(map_persistence_error)
    }

    async fn add_note(&self, actor: &Actor, request: AddNoteRequest) -> Result<Note, Error> {
        let teacher = self
            .permissions
            .require_role(actor, RoleGate::AddNote)
            .await?;
        let text = bounded_text("text", &request.text, NOTE_TEXT_MAX)?;
        if !self
            .note_target_exists(request.target_type, request.target_id)
            .await?
        {
            return Err(Error::not_found(format!("{} not found", request.target_type)));
        }
        let note = self
            .library
            .insert_note(&NewNote {
                teacher_id: teacher.id,
                target_type: request.target_type,
                target_id: request.target_id,
                text,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::AddNote,
                AuditTarget::new(TargetKind::Note, note.id),
            )
            .await;
        Ok(note)
    }

    async fn record_analytics(
        &self,
        actor: &Actor,
        request: RecordAnalyticsRequest,
    ) -> Result<AnalyticsRecord, Error> {
        self.permissions
            .require_role(actor, RoleGate::RecordAnalytics)
            .await?;
        let metric_type = bounded_text("metricType", &request.metric_type, METRIC_TYPE_MAX)?;
        if request.metric_value.is_some_and(|value| !value.is_finite()) {
            return Err(Error::invalid_request("metric value must be a finite number"));
        }
        let record = self
            .library
            .insert_analytics(&NewAnalyticsRecord {
                metric_type,
                metric_value: request.metric_value,
                metric_data: request.metric_data,
                recorded_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::RecordAnalytics,
                AuditTarget::new(TargetKind::Analytics, record.id),
            )
            .await;
        Ok(record)
    }
}

#[cfg(test)]
#[path = "library_service_tests.rs"]
mod tests;
