use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const SCORE_RANGE: std::ops::RangeInclusive<i32> = 1..=5;
pub const DEFAULT_SCORE: i32 = 3;
pub const SUMMARY_NOTE_MAX_CHARS: usize = 600;
pub const NEXT_ACTION_MAX_CHARS: usize = 280;

/// Student being evaluated. Zero is how an unselected target travels on the
/// wire, so only positive ids count as a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub i64);

impl StudentId {
    pub fn selected(self) -> Option<Self> {
        (self.0 > 0).then_some(self)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five coaching dimensions, in the order ties are broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingDimension {
    Preparation,
    Execution,
    Collaboration,
    Autonomy,
    Confidence,
}

impl CoachingDimension {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Preparation,
            Self::Execution,
            Self::Collaboration,
            Self::Autonomy,
            Self::Confidence,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Preparation => "preparación",
            Self::Execution => "ejecución",
            Self::Collaboration => "colaboración",
            Self::Autonomy => "autonomía",
            Self::Confidence => "confianza",
        }
    }

    /// Canned habit recommended when this dimension is the weakest.
    pub const fn coaching_action(self) -> &'static str {
        match self {
            Self::Preparation => {
                "usar una checklist previa de 5 minutos (objetivo, MAAN, concesión máxima)."
            }
            Self::Execution => "simular apertura y anclaje 2 veces antes de la reunión real.",
            Self::Collaboration => {
                "cerrar cada reunión con resumen conjunto y próximos pasos acordados."
            }
            Self::Autonomy => {
                "definir decisión de retiro y criterio de concesión sin escalar todo al líder."
            }
            Self::Confidence => {
                "practicar 10 minutos semanales de role-play en escenarios de objeción."
            }
        }
    }

    pub fn score(self, evaluation: &LeaderEvaluation) -> i32 {
        evaluation.scores.get(self)
    }
}

impl fmt::Display for CoachingDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One score per dimension, flattened into the evaluation payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionScores {
    pub preparation_score: i32,
    pub execution_score: i32,
    pub collaboration_score: i32,
    pub autonomy_score: i32,
    pub confidence_score: i32,
}

impl DimensionScores {
    pub const fn uniform(score: i32) -> Self {
        Self {
            preparation_score: score,
            execution_score: score,
            collaboration_score: score,
            autonomy_score: score,
            confidence_score: score,
        }
    }

    pub fn get(&self, dimension: CoachingDimension) -> i32 {
        match dimension {
            CoachingDimension::Preparation => self.preparation_score,
            CoachingDimension::Execution => self.execution_score,
            CoachingDimension::Collaboration => self.collaboration_score,
            CoachingDimension::Autonomy => self.autonomy_score,
            CoachingDimension::Confidence => self.confidence_score,
        }
    }
}

impl Default for DimensionScores {
    fn default() -> Self {
        Self::uniform(DEFAULT_SCORE)
    }
}

/// Stored evaluation as returned by the history listing, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderEvaluation {
    pub id: i64,
    pub evaluator_user_id: i64,
    pub target_user_id: StudentId,
    #[serde(default)]
    pub cohort_id: Option<i64>,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDateTime>,
    pub period_label: String,
    #[serde(flatten)]
    pub scores: DimensionScores,
    #[serde(default)]
    pub summary_note: String,
    #[serde(default)]
    pub next_action: String,
    pub created_at: NaiveDateTime,
}

/// `YYYY-MM` bucket an evaluation is filed under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PeriodLabel(String);

impl PeriodLabel {
    pub fn parse(value: &str) -> Result<Self, EvaluationDraftError> {
        let bytes = value.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit)
            && NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_ok();
        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(EvaluationDraftError::InvalidPeriod(value.to_string()))
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Create payload for a new evaluation, as edited in the leader form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderEvaluationDraft {
    #[serde(default)]
    pub target_user_id: StudentId,
    #[serde(default)]
    pub cohort_id: Option<i64>,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub period_label: Option<String>,
    #[serde(flatten)]
    pub scores: DimensionScores,
    #[serde(default)]
    pub summary_note: String,
    #[serde(default)]
    pub next_action: String,
}

impl Default for LeaderEvaluationDraft {
    fn default() -> Self {
        Self {
            target_user_id: StudentId(0),
            cohort_id: None,
            follow_up_date: None,
            period_label: None,
            scores: DimensionScores::default(),
            summary_note: String::new(),
            next_action: String::new(),
        }
    }
}

impl LeaderEvaluationDraft {
    pub fn for_target(target: StudentId) -> Self {
        Self {
            target_user_id: target,
            ..Self::default()
        }
    }

    pub fn target(&self) -> Option<StudentId> {
        self.target_user_id.selected()
    }

    /// Explicit label, else the follow-up month, else the month of `today`.
    pub fn effective_period(&self, today: NaiveDate) -> Result<PeriodLabel, EvaluationDraftError> {
        match self.period_label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => PeriodLabel::parse(label),
            _ => Ok(self
                .follow_up_date
                .map(|date| PeriodLabel::from_date(date.date()))
                .unwrap_or_else(|| PeriodLabel::from_date(today))),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<PeriodLabel, EvaluationDraftError> {
        if self.target().is_none() {
            return Err(EvaluationDraftError::MissingTarget);
        }

        for dimension in CoachingDimension::ordered() {
            let score = self.scores.get(dimension);
            if !SCORE_RANGE.contains(&score) {
                return Err(EvaluationDraftError::ScoreOutOfRange { dimension, score });
            }
        }

        if self.summary_note.chars().count() > SUMMARY_NOTE_MAX_CHARS {
            return Err(EvaluationDraftError::SummaryTooLong);
        }
        if self.next_action.chars().count() > NEXT_ACTION_MAX_CHARS {
            return Err(EvaluationDraftError::NextActionTooLong);
        }

        self.effective_period(today)
    }

    /// Validated copy with the effective period written into the payload.
    pub fn into_payload(mut self, today: NaiveDate) -> Result<Self, EvaluationDraftError> {
        let period = self.validate(today)?;
        self.period_label = Some(period.as_str().to_string());
        Ok(self)
    }

    /// Pre-fills the next action with the advisor's recommendation for the
    /// draft's target.
    pub fn with_suggested_next_action(mut self, history: &[LeaderEvaluation]) -> Self {
        self.next_action = super::advisor::suggest_next_action(history, self.target());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationDraftError {
    #[error("Seleccioná un alumno para cargar la evaluación líder.")]
    MissingTarget,
    #[error("El puntaje de {dimension} debe estar entre 1 y 5 (recibido {score}).")]
    ScoreOutOfRange {
        dimension: CoachingDimension,
        score: i32,
    },
    #[error("El resumen admite hasta 600 caracteres.")]
    SummaryTooLong,
    #[error("La próxima acción admite hasta 280 caracteres.")]
    NextActionTooLong,
    #[error("period_label inválido (usar YYYY-MM): {0}")]
    InvalidPeriod(String),
}
