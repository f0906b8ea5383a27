use chrono::{NaiveDate, NaiveDateTime};

use crate::workflows::coaching::domain::{DimensionScores, LeaderEvaluation, StudentId};

pub(super) const STUDENT: StudentId = StudentId(42);

pub(super) fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, day)
        .and_then(|date| date.and_hms_opt(10, 0, 0))
        .expect("valid timestamp")
}

pub(super) fn scores(
    preparation: i32,
    execution: i32,
    collaboration: i32,
    autonomy: i32,
    confidence: i32,
) -> DimensionScores {
    DimensionScores {
        preparation_score: preparation,
        execution_score: execution,
        collaboration_score: collaboration,
        autonomy_score: autonomy,
        confidence_score: confidence,
    }
}

pub(super) fn evaluation(id: i64, target: StudentId, scores: DimensionScores) -> LeaderEvaluation {
    LeaderEvaluation {
        id,
        evaluator_user_id: 1,
        target_user_id: target,
        cohort_id: Some(3),
        follow_up_date: None,
        period_label: "2025-05".to_string(),
        scores,
        summary_note: String::new(),
        next_action: String::new(),
        created_at: at(28 - id as u32),
    }
}
