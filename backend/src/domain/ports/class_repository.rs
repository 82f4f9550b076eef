//! Port for class and class enrollment persistence.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{Class, ClassId, Enrollment, NewClass, NewEnrollment, OrganizationId, UserId};

/// Storage for classes and the students enrolled in them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Insert a class.
    async fn insert(&self, class: &NewClass) -> Result<Class, PersistenceError>;

    /// Fetch a class by id.
    async fn find_by_id(&self, id: ClassId) -> Result<Option<Class>, PersistenceError>;

    /// Classes taught by `teacher`.
    async fn taught_by(&self, teacher: UserId) -> Result<Vec<Class>, PersistenceError>;

    /// Classes belonging to an organization.
    async fn in_organization(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Class>, PersistenceError>;

    /// Insert an active enrollment. A second enrollment for the same (class,
    /// student) pair surfaces as [`PersistenceError::ConstraintViolation`].
    async fn enroll(&self, enrollment: &NewEnrollment) -> Result<Enrollment, PersistenceError>;

    /// Fetch the enrollment of `student` in `class`, whatever its status.
    async fn find_enrollment(
        &self,
        class: ClassId,
        student: UserId,
    ) -> Result<Option<Enrollment>, PersistenceError>;

    /// Enrollments held by `student`.
    async fn enrollments_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Enrollment>, PersistenceError>;

    /// Enrollments in `class`.
    async fn enrollments_in(&self, class: ClassId) -> Result<Vec<Enrollment>, PersistenceError>;
}
