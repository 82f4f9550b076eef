//! Program service: programs, program enrollments and creative canvases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;

use crate::domain::permissions::{PermissionEngine, RoleGate};
use crate::domain::ports::{CreateProgramRequest, OrganizationRepository, ProgramRepository, Programs};
use crate::domain::service_support::{
    AuditTrail, Repositories, bounded_text, found, map_persistence_error, map_write_error,
};
use crate::domain::{
    Actor, AuditAction, AuditTarget, Canvas, CanvasUpsert, Error, NewProgram,
    NewProgramEnrollment, PROGRAM_NAME_MAX, Program, ProgramEnrollee, ProgramEnrollment,
    ProgramEnrollmentStatus, ProgramId, TargetKind,
};

/// Implements [`Programs`].
#[derive(Clone)]
pub struct ProgramService {
    programs: Arc<dyn ProgramRepository>,
    organizations: Arc<dyn OrganizationRepository>,
    permissions: PermissionEngine,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
}

impl ProgramService {
    /// Create the service from the shared repositories.
    pub fn new(repos: &Repositories) -> Self {
        Self {
            programs: Arc::clone(&repos.programs),
            organizations: Arc::clone(&repos.organizations),
            permissions: PermissionEngine::new(repos),
            audit: AuditTrail::new(repos),
            clock: Arc::clone(&repos.clock),
        }
    }

    async fn program(&self, id: ProgramId) -> Result<Program, Error> {
        found(
            self.programs
                .find_program(id)
                .await
                .map_err(map_persistence_error)?,
            "program",
        )
    }

    async fn authorize_enrollee(&self, actor: &Actor, enrollee: ProgramEnrollee) -> Result<(), Error> {
        match enrollee {
            ProgramEnrollee::User(user) if user == actor.user_id() => {
                self.permissions.account(actor).await.map(|_| ())
            }
            ProgramEnrollee::User(_) => Err(Error::forbidden(
                "users may only enroll themselves in programs",
            )),
            ProgramEnrollee::Organization(organization) => {
                found(
                    self.organizations
                        .find_by_id(organization)
                        .await
                        .map_err(map_persistence_error)?,
                    "organization",
                )?;
                if self
                    .permissions
                    .can_manage_organization(actor, organization)
                    .await?
                {
                    Ok(())
                } else {
                    Err(Error::forbidden(
                        "only organization managers may enroll the organization",
                    ))
                }
            }
        }
    }
}

#[async_trait]
impl Programs for ProgramService {
    async fn create_program(
        &self,
        actor: &Actor,
        request: CreateProgramRequest,
    ) -> Result<Program, Error> {
        self.permissions
            .require_role(actor, RoleGate::CreateProgram)
            .await?;
        let name = bounded_text("name", &request.name, PROGRAM_NAME_MAX)?;
        let program = self
            .programs
            .insert_program(&NewProgram {
                name,
                description: request.description,
                program_type: request.program_type,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::CreateProgram,
                AuditTarget::new(TargetKind::Program, program.id),
            )
            .await;
        Ok(program)
    }

    async fn enroll_in_program(
        &self,
        actor: &Actor,
        program: ProgramId,
        enrollee: ProgramEnrollee,
    ) -> Result<ProgramEnrollment, Error> {
        self.authorize_enrollee(actor, enrollee).await?;
        let program = self.program(program).await?;
        let existing = self
            .programs
            .enrollments_of(program.id, enrollee)
            .await
            .map_err(map_persistence_error)?;
        if existing
            .iter()
            .any(|e| e.status == ProgramEnrollmentStatus::Active)
        {
            return Err(Error::conflict("already enrolled in program"));
        }
        let enrollment = self
            .programs
            .enroll(&NewProgramEnrollment {
                program_id: program.id,
                enrollee,
                enrolled_on: self.clock.utc().date_naive(),
            })
            .await
            .map_err(map_write_error("already enrolled in program"))?;
        self.audit
            .record(
                actor,
                AuditAction::EnrollProgram,
                AuditTarget::new(TargetKind::Program, program.id),
            )
            .await;
        Ok(enrollment)
    }

    async fn save_canvas(
        &self,
        actor: &Actor,
        program: ProgramId,
        assets: Value,
    ) -> Result<Canvas, Error> {
        let account = self.permissions.account(actor).await?;
        let program = self.program(program).await?;
        let canvas = self
            .programs
            .save_canvas(&CanvasUpsert {
                user_id: account.id,
                program_id: program.id,
                assets,
                saved_at: self.clock.utc(),
            })
            .await
            .map_err(map_persistence_error)?;
        self.audit
            .record(
                actor,
                AuditAction::SaveCanvas,
                AuditTarget::new(TargetKind::Canvas, canvas.id),
            )
            .await;
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::test_fixtures::{MockPorts, actor, fixed_now, membership, today, user};
    use crate::domain::{
        CanvasId, ErrorCode, MembershipRole, Organization, OrganizationId, OrganizationType,
        ProgramEnrollmentId, ProgramType, SubscriptionStatus, UserId, UserRole,
    };

    fn service(ports: MockPorts) -> ProgramService {
        ProgramService::new(&ports.into_repositories())
    }

    fn program(id: ProgramId) -> Program {
        Program {
            id,
            name: "Komodo Watch".to_owned(),
            description: None,
            program_type: ProgramType::National,
            created_at: fixed_now(),
        }
    }

    fn enrollment(
        enrollee: ProgramEnrollee,
        status: ProgramEnrollmentStatus,
    ) -> ProgramEnrollment {
        ProgramEnrollment {
            id: ProgramEnrollmentId::new(1),
            program_id: ProgramId::new(2),
            enrollee,
            enrolled_on: today(),
            status,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn students_cannot_create_programs() {
        let ports = MockPorts::new().with_account(user(3, UserRole::Student));
        let err = service(ports)
            .create_program(
                &actor(3),
                CreateProgramRequest {
                    name: "Reef".to_owned(),
                    description: None,
                    program_type: ProgramType::Local,
                },
            )
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn users_may_only_enroll_themselves() {
        let err = service(MockPorts::new())
            .enroll_in_program(&actor(3), ProgramId::new(2), ProgramEnrollee::User(UserId::new(4)))
            .await
            .expect_err("other user");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(MembershipRole::Chairman, true)]
    #[case(MembershipRole::Member, false)]
    #[tokio::test]
    async fn organization_enrollment_needs_a_manager(
        #[case] role: MembershipRole,
        #[case] allowed: bool,
    ) {
        let mut ports = MockPorts::new().allow_audit();
        ports.organizations.expect_find_by_id().return_once(|id| {
            Ok(Some(Organization {
                id,
                org_type: OrganizationType::Community,
                name: "Rangers".to_owned(),
                profile: None,
                is_public: true,
                subscription_status: SubscriptionStatus::Active,
                created_at: fixed_now(),
            }))
        });
        ports
            .organizations
            .expect_find_membership()
            .return_once(move |org, who| Ok(Some(membership(org.get(), who.get(), role))));
        ports
            .programs
            .expect_find_program()
            .returning(|id| Ok(Some(program(id))));
        ports
            .programs
            .expect_enrollments_of()
            .returning(|_, _| Ok(Vec::new()));
        ports
            .programs
            .expect_enroll()
            .returning(|e| Ok(enrollment(e.enrollee, ProgramEnrollmentStatus::Active)));

        let enrollee = ProgramEnrollee::Organization(OrganizationId::new(6));
        let result = service(ports)
            .enroll_in_program(&actor(3), ProgramId::new(2), enrollee)
            .await;
        assert_eq!(result.is_ok(), allowed);
        if let Err(err) = result {
            assert_eq!(err.code(), ErrorCode::Forbidden);
        }
    }

    #[rstest]
    #[case(ProgramEnrollmentStatus::Active, false)]
    #[case(ProgramEnrollmentStatus::Dropped, true)]
    #[tokio::test]
    async fn only_active_duplicates_conflict(
        #[case] previous: ProgramEnrollmentStatus,
        #[case] allowed: bool,
    ) {
        let enrollee = ProgramEnrollee::User(UserId::new(3));
        let mut ports = MockPorts::new()
            .with_account(user(3, UserRole::Student))
            .allow_audit();
        ports
            .programs
            .expect_find_program()
            .returning(|id| Ok(Some(program(id))));
        ports
            .programs
            .expect_enrollments_of()
            .returning(move |_, e| Ok(vec![enrollment(e, previous)]));
        ports
            .programs
            .expect_enroll()
            .returning(|e| Ok(enrollment(e.enrollee, ProgramEnrollmentStatus::Active)));

        let result = service(ports)
            .enroll_in_program(&actor(3), ProgramId::new(2), enrollee)
            .await;
        match result {
            Ok(created) => {
                assert!(allowed);
                assert_eq!(created.enrollee, enrollee);
            }
            Err(err) => {
                assert!(!allowed);
                assert_eq!(err.code(), ErrorCode::Conflict);
            }
        }
    }

    #[rstest]
    #[tokio::test]
    async fn canvas_is_saved_for_the_actor() {
        let mut ports = MockPorts::new()
            .with_account(user(3, UserRole::Student))
            .allow_audit();
        ports
            .programs
            .expect_find_program()
            .returning(|id| Ok(Some(program(id))));
        ports
            .programs
            .expect_save_canvas()
            .withf(|c| c.user_id == UserId::new(3) && c.saved_at == fixed_now())
            .times(1)
            .returning(|c| {
                Ok(Canvas {
                    id: CanvasId::new(1),
                    user_id: c.user_id,
                    program_id: c.program_id,
                    assets: c.assets.clone(),
                    created_at: c.saved_at,
                    updated_at: c.saved_at,
                })
            });

        let canvas = service(ports)
            .save_canvas(&actor(3), ProgramId::new(2), json!({"shapes": 3}))
            .await
            .expect("saved");
        assert_eq!(canvas.assets, json!({"shapes": 3}));
    }
}
