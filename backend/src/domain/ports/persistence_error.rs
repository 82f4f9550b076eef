//! Failure taxonomy shared by every repository port.

use super::define_port_error;

define_port_error! {
    /// Errors raised by repository adapters.
    ///
    /// Adapters never retry; the domain decides whether a failure is a
    /// recoverable outcome or fatal.
    pub enum PersistenceError {
        /// The store could not be reached or no connection was available.
        Unavailable { message: String } => "store unavailable: {message}",
        /// A uniqueness, foreign-key or check constraint rejected the write.
        ConstraintViolation { constraint: String } => "constraint violated: {constraint}",
        /// Any other statement failure.
        Query { message: String } => "store query failed: {message}",
    }
}

impl PersistenceError {
    /// Whether the error reports a rejected constraint.
    #[must_use]
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_are_detectable() {
        assert!(PersistenceError::constraint_violation("class_enrollments_class_student_key")
            .is_constraint_violation());
        assert!(!PersistenceError::unavailable("timeout").is_constraint_violation());
    }

    #[test]
    fn messages_name_the_constraint() {
        let err = PersistenceError::constraint_violation("assessments_submission_key");
        assert_eq!(
            err.to_string(),
            "constraint violated: assessments_submission_key"
        );
    }
}
