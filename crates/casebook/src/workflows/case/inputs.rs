//! Write payloads exchanged with the case backend.
//!
//! Every text field defaults to blank so partially stored payloads read back
//! without failing; the backend owns field-level length rules.

use super::domain::FeedbackMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSection {
    pub negotiation_type: String,
    pub impact_level: String,
    pub counterpart_relationship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveSection {
    pub explicit_objective: String,
    pub real_objective: String,
    pub minimum_acceptable_result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerAlternativesSection {
    pub maan: String,
    pub counterpart_perceived_strength: String,
    pub breakpoint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySection {
    pub estimated_zopa: String,
    pub concession_sequence: String,
    pub counterpart_hypothesis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSection {
    pub emotional_variable: String,
    pub main_risk: String,
    pub key_signal: String,
}

/// Pre-negotiation analysis written by the student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreparationInput {
    pub context: ContextSection,
    pub objective: ObjectiveSection,
    pub power_alternatives: PowerAlternativesSection,
    pub strategy: StrategySection,
    pub risk: RiskSection,
}

impl PreparationInput {
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealResultSection {
    pub explicit_objective_achieved: String,
    pub real_objective_achieved: String,
    pub what_remains_open: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservedDynamicsSection {
    pub where_power_shifted: String,
    pub decisive_objection: String,
    pub concession_that_changed_structure: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfDiagnosisSection {
    pub main_strategic_error: String,
    pub main_strategic_success: String,
    pub decision_to_change: String,
}

/// Post-negotiation reflection. Completeness gates case closure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebriefInput {
    pub real_result: RealResultSection,
    pub observed_dynamics: ObservedDynamicsSection,
    pub self_diagnosis: SelfDiagnosisSection,
    pub transferable_lesson: String,
    pub free_disclaimer: String,
}

impl DebriefInput {
    /// Shorthand for the two fields that decide completeness.
    pub fn with_required(objective_achieved: &str, transferable_lesson: &str) -> Self {
        Self {
            real_result: RealResultSection {
                explicit_objective_achieved: objective_achieved.to_string(),
                ..RealResultSection::default()
            },
            transferable_lesson: transferable_lesson.to_string(),
            ..Self::default()
        }
    }

    /// Copy with the gating fields trimmed, as submitted to the backend.
    pub fn trimmed(&self) -> Self {
        let mut debrief = self.clone();
        debrief.real_result.explicit_objective_achieved = self
            .real_result
            .explicit_objective_achieved
            .trim()
            .to_string();
        debrief.transferable_lesson = self.transferable_lesson.trim().to_string();
        debrief
    }
}

/// Metrics captured when the case is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseCaseInput {
    pub confidence_end: i32,
    pub agreement_quality_result: i32,
    pub agreement_quality_relationship: i32,
    pub agreement_quality_sustainability: i32,
}

impl Default for CloseCaseInput {
    /// Form defaults used before the student adjusts the sliders.
    fn default() -> Self {
        Self {
            confidence_end: 7,
            agreement_quality_result: 4,
            agreement_quality_relationship: 4,
            agreement_quality_sustainability: 4,
        }
    }
}

/// Payload for a new blank case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCreate {
    pub title: String,
    #[serde(default)]
    pub mode: FeedbackMode,
    #[serde(default)]
    pub confidence_start: Option<i32>,
}
