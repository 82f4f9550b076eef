//! Pure authorization rules over already-loaded facts.

use crate::domain::{
    Class, Content, Enrollment, EnrollmentStatus, Membership, OrganizationId, UserId, UserRole,
};

/// Action guarded by a global account role allow-list.
///
/// Gates are coarse and independent of the organization-scoped rules; a
/// service applies both where both are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    CreateOrganization,
    CreateClass,
    CreateProgram,
    CreateActivity,
    GradeSubmission,
    RecordAnalytics,
    EnrollInClass,
    SubmitAssignment,
    VerifySighting,
    AddNote,
    UpdateSubscription,
    ReadAccessLogs,
    ViewAnalytics,
}

impl RoleGate {
    /// Account roles allowed through this gate.
    #[must_use]
    pub const fn allowed_roles(self) -> &'static [UserRole] {
        use UserRole::{Admin, CommunityChair, Principal, SchoolAdmin, Student, Teacher};
        match self {
            Self::CreateOrganization | Self::CreateProgram => &[Admin, Principal, CommunityChair],
            Self::CreateClass | Self::GradeSubmission => &[Teacher, SchoolAdmin],
            Self::CreateActivity => &[Teacher, Admin],
            Self::RecordAnalytics
            | Self::ViewAnalytics
            | Self::UpdateSubscription
            | Self::ReadAccessLogs => &[Admin],
            Self::EnrollInClass | Self::SubmitAssignment => &[Student],
            Self::VerifySighting => &[Admin, Teacher, CommunityChair],
            Self::AddNote => &[Teacher],
        }
    }

    /// Whether `role` passes the gate.
    #[must_use]
    pub fn permits(self, role: UserRole) -> bool {
        self.allowed_roles().contains(&role)
    }

    /// Short description used in denial messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::CreateOrganization => "create organizations",
            Self::CreateClass => "create classes",
            Self::CreateProgram => "create programs",
            Self::CreateActivity => "create activities",
            Self::GradeSubmission => "grade submissions",
            Self::RecordAnalytics => "record analytics",
            Self::EnrollInClass => "enroll in classes",
            Self::SubmitAssignment => "submit assignments",
            Self::VerifySighting => "verify sightings",
            Self::AddNote => "add notes",
            Self::UpdateSubscription => "update subscriptions",
            Self::ReadAccessLogs => "read access logs",
            Self::ViewAnalytics => "view analytics",
        }
    }
}

/// Branch through which student data access was granted or refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentDataAccess {
    /// The student reading their own data.
    SelfAccess,
    Admin,
    /// Principal sharing an organization with the student.
    Principal,
    /// Teacher of a class the student is actively enrolled in.
    Teacher,
    Denied,
}

impl StudentDataAccess {
    #[must_use]
    pub const fn is_granted(self) -> bool {
        !matches!(self, Self::Denied)
    }

    /// Whether the grant must be mirrored into the access log.
    #[must_use]
    pub const fn is_audited(self) -> bool {
        matches!(self, Self::Admin | Self::Principal | Self::Teacher)
    }
}

/// Whether two membership lists name a common organization.
#[must_use]
pub fn shares_organization(left: &[Membership], right: &[Membership]) -> bool {
    left.iter().any(|a| {
        right
            .iter()
            .any(|b| a.organization_id == b.organization_id)
    })
}

/// Whether any of `classes` has an active enrollment among `enrollments`.
#[must_use]
pub fn teaches_enrolled_student(classes: &[Class], enrollments: &[Enrollment]) -> bool {
    enrollments
        .iter()
        .filter(|enrollment| enrollment.status == EnrollmentStatus::Active)
        .any(|enrollment| classes.iter().any(|class| class.id == enrollment.class_id))
}

/// Whether `user` teaches or is actively enrolled in `class`.
#[must_use]
pub fn class_participant(user: UserId, class: &Class, enrollment: Option<&Enrollment>) -> bool {
    class.teacher_id == user
        || enrollment.is_some_and(|e| e.class_id == class.id && e.status == EnrollmentStatus::Active)
}

/// Content visibility for an optional viewer and the viewer's memberships.
#[must_use]
pub fn content_visible(
    content: &Content,
    viewer: Option<UserId>,
    viewer_memberships: &[Membership],
) -> bool {
    if content.is_public {
        return true;
    }
    let Some(viewer) = viewer else {
        return false;
    };
    if content.created_by == viewer {
        return true;
    }
    content
        .organization_id
        .is_some_and(|org| holds_membership(viewer_memberships, org))
}

/// Whether the membership list includes `organization`.
#[must_use]
pub fn holds_membership(memberships: &[Membership], organization: OrganizationId) -> bool {
    memberships
        .iter()
        .any(|membership| membership.organization_id == organization)
}
