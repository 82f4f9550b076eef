//! PostgreSQL-backed [`ProgramRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersistenceError, ProgramRepository};
use crate::domain::{
    Activity, ActivityId, Canvas, CanvasUpsert, NewActivity, NewProgram, NewProgramEnrollment,
    Program, ProgramEnrollee, ProgramEnrollment, ProgramId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    ActivityRow, CanvasRow, NewActivityRow, NewCanvasRow, NewProgramEnrollmentRow, NewProgramRow,
    ProgramEnrollmentRow, ProgramRow, convert_rows,
};
use super::pool::DbPool;
use super::schema::{activities, creative_canvas, program_enrollments, programs};

/// Diesel adapter for programs, enrollments, activities and canvases.
#[derive(Clone)]
pub struct DieselProgramRepository {
    pool: DbPool,
}

impl DieselProgramRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramRepository for DieselProgramRepository {
    async fn insert_program(&self, program: &NewProgram) -> Result<Program, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProgramRow {
            name: program.name.as_str(),
            description: program.description.as_deref(),
            program_type: program.program_type.as_str(),
            created_at: program.created_at,
        };
        let stored: ProgramRow = diesel::insert_into(programs::table)
            .values(&row)
            .returning(ProgramRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Program::try_from(stored)
    }

    async fn find_program(&self, id: ProgramId) -> Result<Option<Program>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProgramRow> = programs::table
            .find(id.get())
            .select(ProgramRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Program::try_from).transpose()
    }

    async fn enroll(
        &self,
        enrollment: &NewProgramEnrollment,
    ) -> Result<ProgramEnrollment, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user_id, org_id) = enrollment.enrollee.to_columns();
        let row = NewProgramEnrollmentRow {
            program_id: enrollment.program_id.get(),
            user_id,
            org_id,
            enrolled_on: enrollment.enrolled_on,
        };
        let stored: ProgramEnrollmentRow = diesel::insert_into(program_enrollments::table)
            .values(&row)
            .returning(ProgramEnrollmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        ProgramEnrollment::try_from(stored)
    }

    async fn enrollments_of(
        &self,
        program: ProgramId,
        enrollee: ProgramEnrollee,
    ) -> Result<Vec<ProgramEnrollment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user_id, org_id) = enrollee.to_columns();
        let rows: Vec<ProgramEnrollmentRow> = program_enrollments::table
            .filter(program_enrollments::program_id.eq(program.get()))
            .filter(program_enrollments::user_id.is_not_distinct_from(user_id))
            .filter(program_enrollments::org_id.is_not_distinct_from(org_id))
            .order(program_enrollments::id.asc())
            .select(ProgramEnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn programs_of(
        &self,
        enrollee: ProgramEnrollee,
    ) -> Result<Vec<ProgramEnrollment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user_id, org_id) = enrollee.to_columns();
        let rows: Vec<ProgramEnrollmentRow> = program_enrollments::table
            .filter(program_enrollments::user_id.is_not_distinct_from(user_id))
            .filter(program_enrollments::org_id.is_not_distinct_from(org_id))
            .order(program_enrollments::id.asc())
            .select(ProgramEnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn insert_activity(&self, activity: &NewActivity) -> Result<Activity, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewActivityRow {
            program_id: activity.program_id.get(),
            class_id: activity.class_id.map(i64::from),
            name: activity.name.as_str(),
            activity_type: activity.activity_type.as_str(),
            description: activity.description.as_deref(),
            created_by: activity.created_by.get(),
            created_at: activity.created_at,
        };
        let stored: ActivityRow = diesel::insert_into(activities::table)
            .values(&row)
            .returning(ActivityRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Activity::try_from(stored)
    }

    async fn find_activity(&self, id: ActivityId) -> Result<Option<Activity>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ActivityRow> = activities::table
            .find(id.get())
            .select(ActivityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Activity::try_from).transpose()
    }

    async fn save_canvas(&self, canvas: &CanvasUpsert) -> Result<Canvas, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCanvasRow {
            user_id: canvas.user_id.get(),
            program_id: canvas.program_id.get(),
            assets: &canvas.assets,
            created_at: canvas.saved_at,
            updated_at: canvas.saved_at,
        };
        let stored: CanvasRow = diesel::insert_into(creative_canvas::table)
            .values(&row)
            .on_conflict((creative_canvas::user_id, creative_canvas::program_id))
            .do_update()
            .set((
                creative_canvas::assets.eq(excluded(creative_canvas::assets)),
                creative_canvas::updated_at.eq(excluded(creative_canvas::updated_at)),
            ))
            .returning(CanvasRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }
}
