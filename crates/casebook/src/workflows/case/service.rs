use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ActionKey, CaseId, CaseStatus};
use super::engine::{is_debrief_complete, is_preparation_locked, primary_action, ActionContext};
use super::gateway::{CaseGateway, GatewayError};
use super::inputs::{CloseCaseInput, DebriefInput, PreparationInput};
use super::record::CaseRecord;
use super::validation::{validate_close, validate_debrief, ValidationError};

/// Applies case actions against the backend after checking them locally.
///
/// A refused action never reaches the gateway, and the caller's snapshot is
/// only borrowed, so a failure leaves it exactly as it was.
pub struct CaseWorkflowService<G> {
    gateway: Arc<G>,
}

impl<G> CaseWorkflowService<G>
where
    G: CaseGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub fn load(&self, id: CaseId) -> Result<CaseRecord, CaseActionError> {
        Ok(self.gateway.fetch_case(id)?)
    }

    /// Saves the preparation. The status stays `en_preparacion`; moving on
    /// to `preparado` is decided by the backend.
    pub fn save_preparation(
        &self,
        case: &CaseRecord,
        preparation: &PreparationInput,
    ) -> Result<CaseRecord, CaseActionError> {
        if is_preparation_locked(case.status) {
            return Err(refuse(
                case,
                ActionKey::SavePreparation,
                ValidationError::PreparationLocked,
            ));
        }

        info!(case_id = %case.id, action = %ActionKey::SavePreparation, "dispatching case action");
        Ok(self.gateway.save_preparation(case.id, preparation)?)
    }

    pub fn confirm_execution(&self, case: &CaseRecord) -> Result<CaseRecord, CaseActionError> {
        if case.status != CaseStatus::Preparado {
            return Err(refuse(case, ActionKey::Execute, ValidationError::NotPrepared));
        }

        info!(case_id = %case.id, action = %ActionKey::Execute, "dispatching case action");
        Ok(self.gateway.mark_executed(case.id)?)
    }

    /// Submits the debrief with its gating fields trimmed.
    pub fn save_debrief(
        &self,
        case: &CaseRecord,
        draft: &DebriefInput,
    ) -> Result<CaseRecord, CaseActionError> {
        match case.status {
            CaseStatus::EjecutadoPendienteDebrief => {}
            CaseStatus::Cerrado => {
                return Err(refuse(case, ActionKey::SaveDebrief, ValidationError::AlreadyClosed))
            }
            CaseStatus::EnPreparacion | CaseStatus::Preparado => {
                return Err(refuse(case, ActionKey::SaveDebrief, ValidationError::NotExecuted))
            }
        }

        let debrief = draft.trimmed();
        if let Err(error) = validate_debrief(&debrief) {
            return Err(refuse(case, ActionKey::SaveDebrief, error));
        }

        info!(case_id = %case.id, action = %ActionKey::SaveDebrief, "dispatching case action");
        Ok(self.gateway.save_debrief(case.id, &debrief)?)
    }

    /// Closes the case. Both the stored debrief and the submitted metrics
    /// must pass before the backend is asked to close.
    pub fn close_case(
        &self,
        case: &CaseRecord,
        metrics: &CloseCaseInput,
    ) -> Result<CaseRecord, CaseActionError> {
        match case.status {
            CaseStatus::EjecutadoPendienteDebrief => {}
            CaseStatus::Cerrado => {
                return Err(refuse(case, ActionKey::Close, ValidationError::AlreadyClosed))
            }
            CaseStatus::EnPreparacion | CaseStatus::Preparado => {
                return Err(refuse(case, ActionKey::Close, ValidationError::NotExecuted))
            }
        }

        if !is_debrief_complete(&case.debrief) {
            return Err(refuse(
                case,
                ActionKey::Close,
                ValidationError::DebriefPendingBeforeClose,
            ));
        }
        if let Err(error) = validate_close(metrics) {
            return Err(refuse(case, ActionKey::Close, error));
        }

        info!(case_id = %case.id, action = %ActionKey::Close, "dispatching case action");
        Ok(self.gateway.close_case(case.id, metrics)?)
    }

    /// Runs whichever action the workflow currently recommends.
    pub fn perform_primary_action(
        &self,
        case: &CaseRecord,
        preparation: &PreparationInput,
        context: &ActionContext,
    ) -> Result<CaseRecord, CaseActionError> {
        let action = primary_action(Some(case), context);
        if context.loading && action.key != ActionKey::Closed {
            warn!(case_id = %case.id, action = %action.key, "case action already in flight");
            return Err(CaseActionError::InFlight { action: action.key });
        }
        match action.key {
            ActionKey::SavePreparation => self.save_preparation(case, preparation),
            ActionKey::Execute => self.confirm_execution(case),
            ActionKey::SaveDebrief => self.save_debrief(case, &context.draft_debrief),
            ActionKey::Close => self.close_case(case, &context.draft_close),
            ActionKey::Closed | ActionKey::None => Err(CaseActionError::InvalidState {
                status: case.status,
                action: action.key,
            }),
        }
    }
}

fn refuse(case: &CaseRecord, action: ActionKey, error: ValidationError) -> CaseActionError {
    warn!(
        case_id = %case.id,
        status = %case.status,
        %action,
        reason = %error,
        "case action refused"
    );
    CaseActionError::Validation(error)
}

/// Error raised by the workflow service.
#[derive(Debug, thiserror::Error)]
pub enum CaseActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("la acción {action} no está disponible para un caso en estado {status}")]
    InvalidState { status: CaseStatus, action: ActionKey },
    #[error("ya hay una acción en curso; esperá a que termine antes de {action}")]
    InFlight { action: ActionKey },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl CaseActionError {
    /// Message for the status banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidState { .. })
    }
}
