//! Pure derivations over a case snapshot: debrief completeness, the single
//! recommended action, and the per-step classification of the workflow track.
//!
//! None of these functions keep state; callers recompute them whenever the
//! case snapshot, the drafts, or the loading flag change.

use super::domain::{ActionKey, CaseStatus, StepState, WorkflowStep};
use super::inputs::{CloseCaseInput, DebriefInput};
use super::record::CaseRecord;
use super::validation::validate_close;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MIN_LESSON_CHARS: usize = 3;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub fn is_debrief_complete(debrief: &DebriefInput) -> bool {
    !debrief.real_result.explicit_objective_achieved.trim().is_empty()
        && debrief.transferable_lesson.trim().chars().count() >= MIN_LESSON_CHARS
}

pub fn is_preparation_locked(status: CaseStatus) -> bool {
    status != CaseStatus::EnPreparacion
}

/// Everything besides the stored case that affects whether the recommended
/// action can fire right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionContext {
    pub loading: bool,
    pub draft_debrief: DebriefInput,
    pub draft_close: CloseCaseInput,
}

impl ActionContext {
    /// Drafts seeded from what the backend already stores for the case.
    pub fn for_case(case: &CaseRecord) -> Self {
        Self {
            loading: false,
            draft_debrief: case.debrief.clone(),
            draft_close: case.close_draft(),
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrimaryAction {
    pub key: ActionKey,
    pub label: &'static str,
    pub disabled: bool,
}

impl PrimaryAction {
    pub const fn no_case() -> Self {
        Self {
            key: ActionKey::None,
            label: ActionKey::None.label(),
            disabled: true,
        }
    }
}

/// Total over every status and completeness combination; never `None`.
pub fn resolve_action_key(status: CaseStatus, debrief_complete: bool) -> ActionKey {
    match status {
        CaseStatus::EnPreparacion => ActionKey::SavePreparation,
        CaseStatus::Preparado => ActionKey::Execute,
        CaseStatus::EjecutadoPendienteDebrief if debrief_complete => ActionKey::Close,
        CaseStatus::EjecutadoPendienteDebrief => ActionKey::SaveDebrief,
        CaseStatus::Cerrado => ActionKey::Closed,
    }
}

pub fn primary_action(case: Option<&CaseRecord>, context: &ActionContext) -> PrimaryAction {
    let Some(case) = case else {
        return PrimaryAction::no_case();
    };

    let key = resolve_action_key(case.status, is_debrief_complete(&case.debrief));
    let disabled = match key {
        ActionKey::SavePreparation | ActionKey::Execute => context.loading,
        ActionKey::SaveDebrief => {
            context.loading || !is_debrief_complete(&context.draft_debrief)
        }
        ActionKey::Close => context.loading || validate_close(&context.draft_close).is_err(),
        ActionKey::Closed | ActionKey::None => true,
    };

    PrimaryAction {
        key,
        label: key.label(),
        disabled,
    }
}

/// Step the highlight follows. Once the debrief is complete the track moves
/// on to the close step before the status does.
pub fn effective_step(status: CaseStatus, debrief_complete: bool) -> WorkflowStep {
    if status == CaseStatus::EjecutadoPendienteDebrief && debrief_complete {
        WorkflowStep::Close
    } else {
        status.step()
    }
}

/// The step currently in progress; closed cases have none.
pub fn active_step(status: CaseStatus, debrief_complete: bool) -> Option<WorkflowStep> {
    if status.is_terminal() {
        None
    } else {
        Some(effective_step(status, debrief_complete))
    }
}

pub fn classify_step(step: WorkflowStep, status: CaseStatus, debrief_complete: bool) -> StepState {
    if status.is_terminal() {
        return StepState::Done;
    }

    let ready_to_close = status == CaseStatus::EjecutadoPendienteDebrief && debrief_complete;

    if step.rank() < status.rank() || (step == WorkflowStep::Debrief && ready_to_close) {
        StepState::Done
    } else if active_step(status, debrief_complete) == Some(step) {
        StepState::Active
    } else {
        StepState::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step: WorkflowStep,
    pub label: &'static str,
    pub state: StepState,
    pub state_label: &'static str,
    pub action_key: ActionKey,
    pub shows_action: bool,
}

pub fn step_views(
    status: CaseStatus,
    debrief_complete: bool,
    primary: &PrimaryAction,
) -> Vec<StepView> {
    WorkflowStep::ordered()
        .into_iter()
        .map(|step| {
            let state = classify_step(step, status, debrief_complete);
            StepView {
                step,
                label: step.label(),
                state,
                state_label: state.label(),
                action_key: step.action_key(),
                shows_action: primary.key == step.action_key(),
            }
        })
        .collect()
}

/// Absent when either end is missing or the difference does not fit.
pub fn confidence_delta(start: Option<i32>, end: Option<i32>) -> Option<i32> {
    end?.checked_sub(start?)
}

/// Whole days from creation to close, rounded and floored at zero.
pub fn cycle_days(created_at: DateTime<Utc>, closed_at: Option<DateTime<Utc>>) -> Option<i64> {
    let elapsed = closed_at? - created_at;
    let days = (elapsed.num_milliseconds() as f64 / MILLIS_PER_DAY).round() as i64;
    Some(days.max(0))
}
