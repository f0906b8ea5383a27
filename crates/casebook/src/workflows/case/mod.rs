//! Case lifecycle: status vocabulary, payloads, gating rules, and the
//! derived view of the four-step workflow track.

pub mod analysis;
pub mod board;
pub mod domain;
pub mod engine;
pub mod gateway;
mod highlight;
pub mod inputs;
pub mod record;
mod router;
pub mod service;
pub mod validation;
mod view;

#[cfg(test)]
mod tests;

pub use analysis::{AnalysisOutput, PreparationLevel};
pub use board::CaseBoard;
pub use domain::{ActionKey, CaseId, CaseStatus, FeedbackMode, StepState, WorkflowStep};
pub use engine::{
    active_step, classify_step, confidence_delta, cycle_days, effective_step,
    is_debrief_complete, is_preparation_locked, primary_action, resolve_action_key,
    ActionContext, PrimaryAction, StepView,
};
pub use gateway::{CaseGateway, GatewayError};
pub use highlight::HighlightTracker;
pub use inputs::{CaseCreate, CloseCaseInput, DebriefInput, PreparationInput};
pub use record::{CaseListItem, CaseRecord, FinalMemo};
pub use router::case_router;
pub use service::{CaseActionError, CaseWorkflowService};
pub use validation::{validate_close, validate_confidence_start, validate_debrief, ValidationError};
pub use view::CaseWorkflowView;
