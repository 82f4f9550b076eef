//! Programs, program enrollments, activities and canvases.

use async_trait::async_trait;

use super::{MemoryStore, require_row};
use crate::domain::ports::{PersistenceError, ProgramRepository};
use crate::domain::{
    Activity, ActivityId, Canvas, CanvasId, CanvasUpsert, NewActivity, NewProgram,
    NewProgramEnrollment, Program, ProgramEnrollee, ProgramEnrollment, ProgramEnrollmentId,
    ProgramEnrollmentStatus, ProgramId,
};

#[async_trait]
impl ProgramRepository for MemoryStore {
    async fn insert_program(&self, program: &NewProgram) -> Result<Program, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables.programs.insert_with(|id| Program {
                id: ProgramId::new(id),
                name: program.name.clone(),
                description: program.description.clone(),
                program_type: program.program_type,
                created_at: program.created_at,
            }))
        })
    }

    async fn find_program(&self, id: ProgramId) -> Result<Option<Program>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.programs.get(id.get()).cloned()))
    }

    async fn enroll(
        &self,
        enrollment: &NewProgramEnrollment,
    ) -> Result<ProgramEnrollment, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.programs.contains(enrollment.program_id.get()),
                "program_enrollments_program_id_fkey",
            )?;
            match enrollment.enrollee {
                ProgramEnrollee::User(user) => require_row(
                    tables.users.contains(user.get()),
                    "program_enrollments_user_id_fkey",
                )?,
                ProgramEnrollee::Organization(org) => require_row(
                    tables.organizations.contains(org.get()),
                    "program_enrollments_org_id_fkey",
                )?,
            }
            Ok(tables.program_enrollments.insert_with(|id| ProgramEnrollment {
                id: ProgramEnrollmentId::new(id),
                program_id: enrollment.program_id,
                enrollee: enrollment.enrollee,
                enrolled_on: enrollment.enrolled_on,
                status: ProgramEnrollmentStatus::Active,
            }))
        })
    }

    async fn enrollments_of(
        &self,
        program: ProgramId,
        enrollee: ProgramEnrollee,
    ) -> Result<Vec<ProgramEnrollment>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .program_enrollments
                .values()
                .filter(|row| row.program_id == program && row.enrollee == enrollee)
                .cloned()
                .collect())
        })
    }

    async fn programs_of(
        &self,
        enrollee: ProgramEnrollee,
    ) -> Result<Vec<ProgramEnrollment>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .program_enrollments
                .values()
                .filter(|row| row.enrollee == enrollee)
                .cloned()
                .collect())
        })
    }

    async fn insert_activity(&self, activity: &NewActivity) -> Result<Activity, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.programs.contains(activity.program_id.get()),
                "activities_program_id_fkey",
            )?;
            if let Some(class) = activity.class_id {
                require_row(
                    tables.classes.contains(class.get()),
                    "activities_class_id_fkey",
                )?;
            }
            Ok(tables.activities.insert_with(|id| Activity {
                id: ActivityId::new(id),
                program_id: activity.program_id,
                class_id: activity.class_id,
                name: activity.name.clone(),
                activity_type: activity.activity_type,
                description: activity.description.clone(),
                created_by: activity.created_by,
                created_at: activity.created_at,
            }))
        })
    }

    async fn find_activity(&self, id: ActivityId) -> Result<Option<Activity>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.activities.get(id.get()).cloned()))
    }

    async fn save_canvas(&self, canvas: &CanvasUpsert) -> Result<Canvas, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.programs.contains(canvas.program_id.get()),
                "creative_canvas_program_id_fkey",
            )?;
            let existing = tables
                .canvases
                .values_mut()
                .find(|row| row.user_id == canvas.user_id && row.program_id == canvas.program_id);
            if let Some(row) = existing {
                row.assets = canvas.assets.clone();
                row.updated_at = canvas.saved_at;
                return Ok(row.clone());
            }
            Ok(tables.canvases.insert_with(|id| Canvas {
                id: CanvasId::new(id),
                user_id: canvas.user_id,
                program_id: canvas.program_id,
                assets: canvas.assets.clone(),
                created_at: canvas.saved_at,
                updated_at: canvas.saved_at,
            }))
        })
    }
}
