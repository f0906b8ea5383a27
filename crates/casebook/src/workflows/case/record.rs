use super::analysis::AnalysisOutput;
use super::domain::{CaseId, CaseStatus, FeedbackMode};
use super::inputs::{CloseCaseInput, DebriefInput, PreparationInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Closing synthesis generated by the backend once a case closes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalMemo {
    pub strategic_synthesis: String,
    pub observations_and_next_steps: Vec<String>,
    pub open_inconsistencies: Vec<String>,
    pub observed_thinking_pattern: String,
    pub consolidated_transferable_principle: String,
}

/// Full case as read back from the backend after every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: CaseId,
    pub title: String,
    #[serde(default)]
    pub mode: FeedbackMode,
    pub status: CaseStatus,
    #[serde(default)]
    pub confidence_start: Option<i32>,
    #[serde(default)]
    pub confidence_end: Option<i32>,
    #[serde(default)]
    pub agreement_quality_result: Option<i32>,
    #[serde(default)]
    pub agreement_quality_relationship: Option<i32>,
    #[serde(default)]
    pub agreement_quality_sustainability: Option<i32>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub preparation: PreparationInput,
    #[serde(default)]
    pub debrief: DebriefInput,
    /// Raw analyzer output; read it through [`CaseRecord::analysis`].
    #[serde(default)]
    pub analysis: Value,
    #[serde(default, deserialize_with = "deserialize_final_memo")]
    pub final_memo: Option<FinalMemo>,
    #[serde(default)]
    pub clarity_score: i32,
    #[serde(default)]
    pub inconsistency_count: i32,
}

impl CaseRecord {
    /// Fresh case as the backend creates it.
    pub fn new(id: CaseId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            mode: FeedbackMode::default(),
            status: CaseStatus::EnPreparacion,
            confidence_start: None,
            confidence_end: None,
            agreement_quality_result: None,
            agreement_quality_relationship: None,
            agreement_quality_sustainability: None,
            created_at,
            closed_at: None,
            preparation: PreparationInput::default(),
            debrief: DebriefInput::default(),
            analysis: Value::Null,
            final_memo: None,
            clarity_score: 0,
            inconsistency_count: 0,
        }
    }

    pub fn analysis(&self) -> Option<AnalysisOutput> {
        AnalysisOutput::normalize(&self.analysis)
    }

    /// Stored closing metrics, when all four were recorded.
    pub fn close_metrics(&self) -> Option<CloseCaseInput> {
        Some(CloseCaseInput {
            confidence_end: self.confidence_end?,
            agreement_quality_result: self.agreement_quality_result?,
            agreement_quality_relationship: self.agreement_quality_relationship?,
            agreement_quality_sustainability: self.agreement_quality_sustainability?,
        })
    }

    /// Initial values for the close form: stored metrics, else form defaults.
    pub fn close_draft(&self) -> CloseCaseInput {
        let defaults = CloseCaseInput::default();
        CloseCaseInput {
            confidence_end: self.confidence_end.unwrap_or(defaults.confidence_end),
            agreement_quality_result: self
                .agreement_quality_result
                .unwrap_or(defaults.agreement_quality_result),
            agreement_quality_relationship: self
                .agreement_quality_relationship
                .unwrap_or(defaults.agreement_quality_relationship),
            agreement_quality_sustainability: self
                .agreement_quality_sustainability
                .unwrap_or(defaults.agreement_quality_sustainability),
        }
    }

    pub fn list_item(&self) -> CaseListItem {
        CaseListItem {
            id: self.id,
            title: self.title.clone(),
            mode: self.mode,
            status: self.status,
            clarity_score: self.clarity_score,
            inconsistency_count: self.inconsistency_count,
            created_at: self.created_at,
            closed_at: self.closed_at,
            confidence_start: self.confidence_start,
            confidence_end: self.confidence_end,
        }
    }
}

/// Compact listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseListItem {
    pub id: CaseId,
    pub title: String,
    #[serde(default)]
    pub mode: FeedbackMode,
    pub status: CaseStatus,
    #[serde(default)]
    pub clarity_score: i32,
    #[serde(default)]
    pub inconsistency_count: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub confidence_start: Option<i32>,
    #[serde(default)]
    pub confidence_end: Option<i32>,
}

/// The backend sends `{}` until a memo exists.
fn deserialize_final_memo<'de, D>(deserializer: D) -> Result<Option<FinalMemo>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Object(map)) if !map.is_empty() => {
            serde_json::from_value(Value::Object(map)).ok()
        }
        _ => None,
    })
}
