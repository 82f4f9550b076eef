//! Driving port for programs and canvases.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    Actor, Canvas, Error, Program, ProgramEnrollee, ProgramEnrollment, ProgramId, ProgramType,
};

/// Fields for a new program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProgramRequest {
    pub name: String,
    pub description: Option<String>,
    pub program_type: ProgramType,
}

/// Program use-cases consumed by inbound adapters.
#[async_trait]
pub trait Programs: Send + Sync {
    /// Create a program.
    async fn create_program(
        &self,
        actor: &Actor,
        request: CreateProgramRequest,
    ) -> Result<Program, Error>;

    /// Enroll the actor, or an organization the actor manages.
    async fn enroll_in_program(
        &self,
        actor: &Actor,
        program: ProgramId,
        enrollee: ProgramEnrollee,
    ) -> Result<ProgramEnrollment, Error>;

    /// Save the actor's canvas for a program, replacing any earlier one.
    async fn save_canvas(
        &self,
        actor: &Actor,
        program: ProgramId,
        assets: Value,
    ) -> Result<Canvas, Error>;
}
