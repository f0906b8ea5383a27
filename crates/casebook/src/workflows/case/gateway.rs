use super::domain::CaseId;
use super::inputs::{CloseCaseInput, DebriefInput, PreparationInput};
use super::record::CaseRecord;

/// Boundary to the case backend. Every mutating call returns the refreshed
/// case so callers can swap their snapshot in one step.
pub trait CaseGateway: Send + Sync {
    fn fetch_case(&self, id: CaseId) -> Result<CaseRecord, GatewayError>;
    fn save_preparation(
        &self,
        id: CaseId,
        preparation: &PreparationInput,
    ) -> Result<CaseRecord, GatewayError>;
    fn mark_executed(&self, id: CaseId) -> Result<CaseRecord, GatewayError>;
    fn save_debrief(&self, id: CaseId, debrief: &DebriefInput)
        -> Result<CaseRecord, GatewayError>;
    fn close_case(&self, id: CaseId, metrics: &CloseCaseInput)
        -> Result<CaseRecord, GatewayError>;
}

/// Failures reported by the backend or its transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Caso no encontrado")]
    NotFound,
    #[error("{0}")]
    Rejected(String),
    #[error("servicio no disponible: {0}")]
    Unavailable(String),
}
