use serde::{Deserialize, Serialize};
use serde_json::Value;

const PRIORITY_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PreparationLevel {
    #[default]
    Inicial,
    Estructurado,
    Avanzado,
}

impl PreparationLevel {
    /// Unknown or missing levels fall back to the lowest one.
    pub fn parse_lenient(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("Estructurado") => Self::Estructurado,
            Some("Avanzado") => Self::Avanzado,
            _ => Self::Inicial,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Inicial => "Inicial",
            Self::Estructurado => "Estructurado",
            Self::Avanzado => "Avanzado",
        }
    }
}

/// Feedback produced by the external analyzer for a saved preparation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub clarification_questions: Vec<String>,
    pub observations: Vec<String>,
    pub suggestions: Vec<String>,
    pub next_steps: Vec<String>,
    pub inconsistencies: Vec<String>,
    pub preparation_level: PreparationLevel,
}

impl AnalysisOutput {
    /// Reads whatever the analyzer stored. Returns `None` when nothing usable
    /// was stored; shape errors inside an object degrade to empty lists.
    pub fn normalize(raw: &Value) -> Option<Self> {
        let object = raw.as_object()?;
        if object.is_empty() {
            return None;
        }

        let list = |field: &str| -> Vec<String> {
            match object.get(field) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            }
        };

        Some(Self {
            clarification_questions: list("clarification_questions"),
            observations: list("observations"),
            suggestions: list("suggestions"),
            next_steps: list("next_steps"),
            inconsistencies: list("inconsistencies"),
            preparation_level: PreparationLevel::parse_lenient(object.get("preparation_level")),
        })
    }

    /// First distinct items across inconsistencies, questions, suggestions
    /// and next steps, in that order.
    pub fn top_priorities(&self) -> Vec<String> {
        let mut ordered: Vec<String> = Vec::new();
        let candidates = self
            .inconsistencies
            .iter()
            .chain(&self.clarification_questions)
            .chain(&self.suggestions)
            .chain(&self.next_steps);

        for item in candidates {
            if ordered.len() == PRIORITY_LIMIT {
                break;
            }
            if !ordered.contains(item) {
                ordered.push(item.clone());
            }
        }

        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_or_non_object_payloads_are_absent() {
        assert!(AnalysisOutput::normalize(&json!({})).is_none());
        assert!(AnalysisOutput::normalize(&Value::Null).is_none());
        assert!(AnalysisOutput::normalize(&json!(["observations"])).is_none());
    }

    #[test]
    fn malformed_fields_degrade_to_defaults() {
        let raw = json!({
            "observations": "not a list",
            "suggestions": ["Definí un MAAN", 7, null],
            "preparation_level": "Experto"
        });

        let analysis = AnalysisOutput::normalize(&raw).expect("object payload normalizes");

        assert!(analysis.observations.is_empty());
        assert!(analysis.clarification_questions.is_empty());
        assert_eq!(analysis.suggestions, vec!["Definí un MAAN".to_string()]);
        assert_eq!(analysis.preparation_level, PreparationLevel::Inicial);
    }

    #[test]
    fn valid_level_is_kept() {
        let raw = json!({ "preparation_level": "Avanzado" });
        let analysis = AnalysisOutput::normalize(&raw).expect("normalizes");
        assert_eq!(analysis.preparation_level, PreparationLevel::Avanzado);
    }

    #[test]
    fn priorities_are_distinct_and_capped() {
        let analysis = AnalysisOutput {
            inconsistencies: vec!["Objetivo ambiguo".to_string()],
            clarification_questions: vec![
                "Objetivo ambiguo".to_string(),
                "¿Cuál es tu MAAN?".to_string(),
            ],
            suggestions: vec!["Anclá primero".to_string(), "Sumá evidencia".to_string()],
            ..AnalysisOutput::default()
        };

        assert_eq!(
            analysis.top_priorities(),
            vec![
                "Objetivo ambiguo".to_string(),
                "¿Cuál es tu MAAN?".to_string(),
                "Anclá primero".to_string(),
            ]
        );
    }
}
