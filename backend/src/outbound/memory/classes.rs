//! Classes and class enrollments.

use async_trait::async_trait;

use super::{MemoryStore, reject_duplicate, require_row};
use crate::domain::ports::{ClassRepository, PersistenceError};
use crate::domain::{
    Class, ClassId, Enrollment, EnrollmentId, EnrollmentStatus, NewClass, NewEnrollment,
    OrganizationId, UserId,
};

#[async_trait]
impl ClassRepository for MemoryStore {
    async fn insert(&self, class: &NewClass) -> Result<Class, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.organizations.contains(class.organization_id.get()),
                "classes_org_id_fkey",
            )?;
            require_row(
                tables.users.contains(class.teacher_id.get()),
                "classes_teacher_id_fkey",
            )?;
            Ok(tables.classes.insert_with(|id| Class {
                id: ClassId::new(id),
                organization_id: class.organization_id,
                teacher_id: class.teacher_id,
                name: class.name.clone(),
                syllabus: class.syllabus.clone(),
                created_at: class.created_at,
            }))
        })
    }

    async fn find_by_id(&self, id: ClassId) -> Result<Option<Class>, PersistenceError> {
        self.with_tables(|tables| Ok(tables.classes.get(id.get()).cloned()))
    }

    async fn taught_by(&self, teacher: UserId) -> Result<Vec<Class>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .classes
                .values()
                .filter(|row| row.teacher_id == teacher)
                .cloned()
                .collect())
        })
    }

    async fn in_organization(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Class>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .classes
                .values()
                .filter(|row| row.organization_id == organization)
                .cloned()
                .collect())
        })
    }

    async fn enroll(&self, enrollment: &NewEnrollment) -> Result<Enrollment, PersistenceError> {
        self.with_tables(|tables| {
            require_row(
                tables.classes.contains(enrollment.class_id.get()),
                "class_enrollments_class_id_fkey",
            )?;
            require_row(
                tables.users.contains(enrollment.student_id.get()),
                "class_enrollments_student_id_fkey",
            )?;
            reject_duplicate(
                tables.enrollments.values().any(|row| {
                    row.class_id == enrollment.class_id && row.student_id == enrollment.student_id
                }),
                "class_enrollments_class_student_key",
            )?;
            Ok(tables.enrollments.insert_with(|id| Enrollment {
                id: EnrollmentId::new(id),
                class_id: enrollment.class_id,
                student_id: enrollment.student_id,
                enrolled_on: enrollment.enrolled_on,
                status: EnrollmentStatus::Active,
            }))
        })
    }

    async fn find_enrollment(
        &self,
        class: ClassId,
        student: UserId,
    ) -> Result<Option<Enrollment>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .enrollments
                .values()
                .find(|row| row.class_id == class && row.student_id == student)
                .cloned())
        })
    }

    async fn enrollments_of_student(
        &self,
        student: UserId,
    ) -> Result<Vec<Enrollment>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .enrollments
                .values()
                .filter(|row| row.student_id == student)
                .cloned()
                .collect())
        })
    }

    async fn enrollments_in(&self, class: ClassId) -> Result<Vec<Enrollment>, PersistenceError> {
        self.with_tables(|tables| {
            Ok(tables
                .enrollments
                .values()
                .filter(|row| row.class_id == class)
                .cloned()
                .collect())
        })
    }
}
