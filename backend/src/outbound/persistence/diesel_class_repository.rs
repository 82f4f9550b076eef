//! PostgreSQL-backed [`ClassRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ClassRepository, PersistenceError};
use crate::domain::{Class, ClassId, Enrollment, NewClass, NewEnrollment, OrganizationId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ClassRow, EnrollmentRow, NewClassRow, NewEnrollmentRow, convert_rows};
use super::pool::DbPool;
use super::schema::{class_enrollments, classes};

/// Diesel adapter for classes and class enrollments.
#[derive(Clone)]
pub struct DieselClassRepository {
    pool: DbPool,
}

impl DieselClassRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassRepository for DieselClassRepository {
    async fn insert(&self, class: &NewClass) -> Result<Class, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewClassRow {
            org_id: class.organization_id.get(),
            teacher_id: class.teacher_id.get(),
            name: class.name.as_str(),
            syllabus: class.syllabus.as_deref(),
            created_at: class.created_at,
        };
        let stored: ClassRow = diesel::insert_into(classes::table)
            .values(&row)
            .returning(ClassRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn find_by_id(&self, id: ClassId) -> Result<Option<Class>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ClassRow> = classes::table
            .find(id.get())
            .select(ClassRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn taught_by(&self, teacher: UserId) -> Result<Vec<Class>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ClassRow> = classes::table
            .filter(classes::teacher_id.eq(teacher.get()))
            .order(classes::id.asc())
            .select(ClassRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Class::from).collect())
    }

    async fn in_organization(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Class>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ClassRow> = classes::table
            .filter(classes::org_id.eq(organization.get()))
            .order(classes::id.asc())
            .select(ClassRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Class::from).collect())
    }

    async fn enroll(&self, enrollment: &NewEnrollment) -> Result<Enrollment, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewEnrollmentRow {
            class_id: enrollment.class_id.get(),
            student_id: enrollment.student_id.get(),
            enrolled_on: enrollment.enrolled_on,
        };
        let stored: EnrollmentRow = diesel::insert_into(class_enrollments::table)
            .values(&row)
            .returning(EnrollmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Enrollment::try_from(stored)
    }

    async fn find_enrollment(
        &self,
        class: ClassId,
        student: UserId,
    ) -> Result<Option<Enrollment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EnrollmentRow> = class_enrollments::table
            .filter(class_enrollments::class_id.eq(class.get()))
            .filter(class_enrollments::student_id.eq(student.get()))
            .select(EnrollmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Enrollment::try_from).transpose()
    }

    async fn enrollments_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Enrollment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EnrollmentRow> = class_enrollments::table
            .filter(class_enrollments::student_id.eq(student.get()))
            .order(class_enrollments::id.asc())
            .select(EnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }

    async fn enrollments_in(&self, class: ClassId) -> Result<Vec<Enrollment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EnrollmentRow> = class_enrollments::table
            .filter(class_enrollments::class_id.eq(class.get()))
            .order(class_enrollments::id.asc())
            .select(EnrollmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_rows(rows)
    }
}
