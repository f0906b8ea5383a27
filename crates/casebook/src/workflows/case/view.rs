use super::analysis::AnalysisOutput;
use super::domain::{CaseId, CaseStatus, WorkflowStep};
use super::engine::{
    active_step, confidence_delta, cycle_days, effective_step, is_debrief_complete,
    is_preparation_locked, primary_action, step_views, ActionContext, PrimaryAction, StepView,
};
use super::record::CaseRecord;
use serde::Serialize;

/// Everything the case screen derives from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CaseWorkflowView {
    pub case_id: CaseId,
    pub title: String,
    pub status: CaseStatus,
    pub status_label: &'static str,
    pub next_step_label: &'static str,
    pub debrief_complete: bool,
    pub preparation_locked: bool,
    pub primary_action: PrimaryAction,
    pub steps: Vec<StepView>,
    pub effective_step: WorkflowStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_step: Option<WorkflowStep>,
    pub confidence_start: Option<i32>,
    pub confidence_end: Option<i32>,
    pub confidence_delta: Option<i32>,
    pub cycle_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analysis_priorities: Vec<String>,
    pub has_final_memo: bool,
}

impl CaseWorkflowView {
    pub fn build(case: &CaseRecord, context: &ActionContext) -> Self {
        let debrief_complete = is_debrief_complete(&case.debrief);
        let primary = primary_action(Some(case), context);
        let analysis = case.analysis();
        let analysis_priorities = analysis
            .as_ref()
            .map(AnalysisOutput::top_priorities)
            .unwrap_or_default();

        Self {
            case_id: case.id,
            title: case.title.clone(),
            status: case.status,
            status_label: case.status.label(),
            next_step_label: case.status.next_step_label(),
            debrief_complete,
            preparation_locked: is_preparation_locked(case.status),
            primary_action: primary,
            steps: step_views(case.status, debrief_complete, &primary),
            effective_step: effective_step(case.status, debrief_complete),
            active_step: active_step(case.status, debrief_complete),
            confidence_start: case.confidence_start,
            confidence_end: case.confidence_end,
            confidence_delta: confidence_delta(case.confidence_start, case.confidence_end),
            cycle_days: cycle_days(case.created_at, case.closed_at),
            analysis,
            analysis_priorities,
            has_final_memo: case.final_memo.is_some(),
        }
    }
}
