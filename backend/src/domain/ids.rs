//! Store-assigned entity identifiers.
//!
//! Every entity is keyed by a 64-bit integer allocated by the store on
//! insert. Each entity kind gets its own newtype so ids cannot be swapped
//! between tables by accident.

use serde::{Deserialize, Serialize};

macro_rules! define_entity_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(i64);

            impl $name {
                /// Wrap a raw store identifier.
                #[must_use]
                pub const fn new(raw: i64) -> Self {
                    Self(raw)
                }

                /// Raw store identifier.
                #[must_use]
                pub const fn get(self) -> i64 {
                    self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<$name> for i64 {
                fn from(value: $name) -> Self {
                    value.0
                }
            }
        )*
    };
}

define_entity_id! {
    /// Identifier of a registered user.
    UserId,
    /// Identifier of a school or community organization.
    OrganizationId,
    /// Identifier of an organization membership.
    MembershipId,
    /// Identifier of a class.
    ClassId,
    /// Identifier of a class enrollment.
    EnrollmentId,
    /// Identifier of a program.
    ProgramId,
    /// Identifier of a program enrollment.
    ProgramEnrollmentId,
    /// Identifier of an activity.
    ActivityId,
    /// Identifier of a submission.
    SubmissionId,
    /// Identifier of an assessment.
    AssessmentId,
    /// Identifier of a content library item.
    ContentId,
    /// Identifier of a species sighting.
    SightingId,
    /// Identifier of a message.
    MessageId,
    /// Identifier of a creative canvas.
    CanvasId,
    /// Identifier of a teacher note.
    NoteId,
    /// Identifier of an analytics record.
    AnalyticsId,
    /// Identifier of an access log entry.
    AccessLogId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialise_as_bare_integers() {
        let value = serde_json::to_value(ClassId::new(42)).expect("serialise id");
        assert_eq!(value, serde_json::json!(42));
    }

    #[test]
    fn ids_display_raw_value() {
        assert_eq!(UserId::new(7).to_string(), "7");
    }
}
