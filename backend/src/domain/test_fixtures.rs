//! Shared builders for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    MockAccessLogRepository, MockAnalyticsRepository, MockClassRepository, MockLibraryRepository,
    MockMessageRepository, MockOrganizationRepository, MockProgramRepository,
    MockSubmissionRepository, MockUserRepository,
};
use crate::domain::service_support::Repositories;
use crate::domain::{
    Actor, Class, ClassId, Email, Enrollment, EnrollmentId, EnrollmentStatus, Membership,
    MembershipId, MembershipRole, OrganizationId, PasswordHash, User, UserId, UserRole, Username,
};

/// Clock pinned to one instant.
pub(crate) struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 9, 30, 0)
        .single()
        .expect("valid fixture time")
}

pub(crate) fn today() -> NaiveDate {
    fixed_now().date_naive()
}

/// One mock per repository port. Unused mocks panic on any call.
pub(crate) struct MockPorts {
    pub users: MockUserRepository,
    pub organizations: MockOrganizationRepository,
    pub classes: MockClassRepository,
    pub programs: MockProgramRepository,
    pub submissions: MockSubmissionRepository,
    pub library: MockLibraryRepository,
    pub messages: MockMessageRepository,
    pub access_log: MockAccessLogRepository,
    pub analytics: MockAnalyticsRepository,
}

impl MockPorts {
    pub(crate) fn new() -> Self {
        Self {
            users: MockUserRepository::new(),
            organizations: MockOrganizationRepository::new(),
            classes: MockClassRepository::new(),
            programs: MockProgramRepository::new(),
            submissions: MockSubmissionRepository::new(),
            library: MockLibraryRepository::new(),
            messages: MockMessageRepository::new(),
            access_log: MockAccessLogRepository::new(),
            analytics: MockAnalyticsRepository::new(),
        }
    }

    /// Accept any number of access log appends.
    pub(crate) fn allow_audit(mut self) -> Self {
        self.access_log.expect_append().returning(|_| Ok(()));
        self
    }

    /// Answer account lookups for `user`.
    pub(crate) fn with_account(mut self, user: User) -> Self {
        let id = user.id;
        self.users
            .expect_find_by_id()
            .withf(move |requested| *requested == id)
            .returning(move |_| Ok(Some(user.clone())));
        self
    }

    pub(crate) fn into_repositories(self) -> Repositories {
        Repositories {
            users: Arc::new(self.users),
            organizations: Arc::new(self.organizations),
            classes: Arc::new(self.classes),
            programs: Arc::new(self.programs),
            submissions: Arc::new(self.submissions),
            library: Arc::new(self.library),
            messages: Arc::new(self.messages),
            access_log: Arc::new(self.access_log),
            analytics: Arc::new(self.analytics),
            clock: Arc::new(FixtureClock(fixed_now())),
        }
    }
}

pub(crate) fn actor(id: i64) -> Actor {
    Actor::new(UserId::new(id), None)
}

pub(crate) fn user(id: i64, role: UserRole) -> User {
    User {
        id: UserId::new(id),
        username: Username::new(format!("user{id}")).expect("valid username"),
        email: Email::new(format!("user{id}@example.org")).expect("valid email"),
        password_hash: PasswordHash::from_phc("$argon2id$fixture"),
        role,
        created_at: fixed_now(),
        last_login: None,
    }
}

pub(crate) fn membership(org: i64, user: i64, role: MembershipRole) -> Membership {
    Membership {
        id: MembershipId::new(org * 1000 + user),
        organization_id: OrganizationId::new(org),
        user_id: UserId::new(user),
        role,
        access_code: None,
        joined_on: today(),
    }
}

pub(crate) fn class(id: i64, org: i64, teacher: i64) -> Class {
    Class {
        id: ClassId::new(id),
        organization_id: OrganizationId::new(org),
        teacher_id: UserId::new(teacher),
        name: format!("Class {id}"),
        syllabus: None,
        created_at: fixed_now(),
    }
}

pub(crate) fn enrollment(class: i64, student: i64, status: EnrollmentStatus) -> Enrollment {
    Enrollment {
        id: EnrollmentId::new(class * 1000 + student),
        class_id: ClassId::new(class),
        student_id: UserId::new(student),
        enrolled_on: today(),
        status,
    }
}
