//! Translation of pool and Diesel failures into [`PersistenceError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::PersistenceError;

use super::pool::PoolError;

/// Map a pool checkout or build failure.
pub(crate) fn map_pool_error(error: PoolError) -> PersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PersistenceError::unavailable(message)
        }
    }
}

/// Map a Diesel failure, preserving the name of any violated constraint.
pub(crate) fn map_diesel_error(error: DieselError) -> PersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation,
            info,
        ) => PersistenceError::constraint_violation(
            info.constraint_name()
                .or_else(|| info.column_name())
                .unwrap_or("unnamed constraint"),
        ),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::unavailable("database connection error")
        }
        DieselError::NotFound => PersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => PersistenceError::query("database query error"),
        _ => PersistenceError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo {
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("class_enrollments")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo { constraint }))
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, "class_enrollments_class_student_key")]
    #[case(DatabaseErrorKind::ForeignKeyViolation, "classes_teacher_id_fkey")]
    #[case(DatabaseErrorKind::CheckViolation, "program_enrollments_enrollee_check")]
    fn constraint_failures_keep_their_name(
        #[case] kind: DatabaseErrorKind,
        #[case] constraint: &'static str,
    ) {
        let mapped = map_diesel_error(database_error(kind, Some(constraint)));
        assert_eq!(mapped, PersistenceError::constraint_violation(constraint));
    }

    #[rstest]
    fn closed_connections_are_unavailable() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(mapped, PersistenceError::Unavailable { .. }));
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        let mapped = map_diesel_error(DieselError::NotFound);
        assert_eq!(mapped, PersistenceError::query("record not found"));
    }

    #[rstest]
    fn pool_errors_are_unavailable() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, PersistenceError::unavailable("timed out"));
    }
}
