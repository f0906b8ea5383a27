//! Next-action advisor for leader evaluations.
//!
//! Looks at the most recent evaluations of one student, finds the dimension
//! with the lowest mean score and turns it into a 30-day recommendation.
//! Missing data never fails; it degrades to one of two fixed defaults.

use serde::Serialize;

use super::domain::{CoachingDimension, LeaderEvaluation, StudentId};

/// Most recent evaluations considered per student.
pub const HISTORY_WINDOW: usize = 4;

pub const NO_TARGET_SUGGESTION: &str = "Durante 30 días, preparar cada negociación con objetivo explícito, MAAN y criterio de cierre antes de ejecutar.";
pub const NO_HISTORY_SUGGESTION: &str = "Durante 30 días, registrar 1 caso por semana y cerrar cada debrief con una acción concreta en 24h.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionAverage {
    pub dimension: CoachingDimension,
    pub label: &'static str,
    pub average: f64,
}

/// The target's newest evaluations, newest first. `history` is expected in
/// that order already.
pub fn history_window(history: &[LeaderEvaluation], target: StudentId) -> Vec<&LeaderEvaluation> {
    history
        .iter()
        .filter(|evaluation| evaluation.target_user_id == target)
        .take(HISTORY_WINDOW)
        .collect()
}

/// Mean score per dimension in declaration order; empty when there is no
/// target or no matching history.
pub fn dimension_averages(
    history: &[LeaderEvaluation],
    target: Option<StudentId>,
) -> Vec<DimensionAverage> {
    let Some(target) = target.and_then(StudentId::selected) else {
        return Vec::new();
    };
    let window = history_window(history, target);
    if window.is_empty() {
        return Vec::new();
    }

    let count = window.len() as f64;
    CoachingDimension::ordered()
        .into_iter()
        .map(|dimension| {
            let total: i64 = window
                .iter()
                .map(|evaluation| i64::from(dimension.score(evaluation)))
                .sum();
            DimensionAverage {
                dimension,
                label: dimension.label(),
                average: total as f64 / count,
            }
        })
        .collect()
}

/// Lowest mean wins; ties go to the dimension declared first.
pub fn weakest_dimension(
    history: &[LeaderEvaluation],
    target: Option<StudentId>,
) -> Option<CoachingDimension> {
    lowest(&dimension_averages(history, target))
}

fn lowest(averages: &[DimensionAverage]) -> Option<CoachingDimension> {
    let mut ranked = averages.to_vec();
    ranked.sort_by(|left, right| left.average.total_cmp(&right.average));
    ranked.first().map(|entry| entry.dimension)
}

pub fn suggest_next_action(history: &[LeaderEvaluation], target: Option<StudentId>) -> String {
    coaching_suggestion(history, target).next_action
}

/// Advisor output with the figures behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachingSuggestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<StudentId>,
    pub evaluations_considered: usize,
    pub averages: Vec<DimensionAverage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weakest: Option<CoachingDimension>,
    pub next_action: String,
}

pub fn coaching_suggestion(
    history: &[LeaderEvaluation],
    target: Option<StudentId>,
) -> CoachingSuggestion {
    let target = target.and_then(StudentId::selected);
    let evaluations_considered = target
        .map(|target| history_window(history, target).len())
        .unwrap_or(0);
    let averages = dimension_averages(history, target);
    let weakest = lowest(&averages);

    let next_action = match (target, weakest) {
        (None, _) => NO_TARGET_SUGGESTION.to_string(),
        (Some(_), None) => NO_HISTORY_SUGGESTION.to_string(),
        (Some(_), Some(dimension)) => format!(
            "En los próximos 30 días, enfocar mejora en {}: {}",
            dimension.label(),
            dimension.coaching_action()
        ),
    };

    CoachingSuggestion {
        target,
        evaluations_considered,
        averages,
        weakest,
        next_action,
    }
}
