//! Leader evaluations of students and the advisor that turns their history
//! into a recommended next action.

pub mod advisor;
pub mod domain;

#[cfg(test)]
mod tests;

pub use advisor::{
    coaching_suggestion, dimension_averages, history_window, suggest_next_action,
    weakest_dimension, CoachingSuggestion, DimensionAverage, HISTORY_WINDOW,
    NO_HISTORY_SUGGESTION, NO_TARGET_SUGGESTION,
};
pub use domain::{
    CoachingDimension, DimensionScores, EvaluationDraftError, LeaderEvaluation,
    LeaderEvaluationDraft, PeriodLabel, StudentId,
};
