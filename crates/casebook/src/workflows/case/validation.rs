use super::engine::is_debrief_complete;
use super::inputs::{CaseCreate, CloseCaseInput, DebriefInput};
use std::ops::RangeInclusive;

pub const CONFIDENCE_RANGE: RangeInclusive<i32> = 1..=10;
pub const AGREEMENT_QUALITY_RANGE: RangeInclusive<i32> = 1..=5;
pub const TITLE_LENGTH: RangeInclusive<usize> = 3..=120;

/// Local validation failures. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Para registrar el debrief completá objetivo explícito y una lección transferible de al menos 3 caracteres.")]
    IncompleteDebrief,
    #[error("Registrá el debrief antes de cerrar el caso.")]
    DebriefPendingBeforeClose,
    #[error("Completá métricas de cierre válidas (confianza 1-10 y calidad 1-5).")]
    CloseMetricsOutOfRange,
    #[error("Definí una confianza inicial entre 1 y 10.")]
    ConfidenceStartOutOfRange,
    #[error("Ingresá un título de caso")]
    MissingTitle,
    #[error("El título debe tener entre 3 y 120 caracteres.")]
    TitleLength,
    #[error("No se puede editar la preparación de un caso que ya avanzó.")]
    PreparationLocked,
    #[error("Solo un caso preparado puede pasar a ejecutado")]
    NotPrepared,
    #[error("Debrief solo disponible luego de ejecutar")]
    NotExecuted,
    #[error("El caso ya está cerrado.")]
    AlreadyClosed,
}

pub fn validate_debrief(debrief: &DebriefInput) -> Result<(), ValidationError> {
    if is_debrief_complete(debrief) {
        Ok(())
    } else {
        Err(ValidationError::IncompleteDebrief)
    }
}

pub fn validate_close(metrics: &CloseCaseInput) -> Result<(), ValidationError> {
    let qualities = [
        metrics.agreement_quality_result,
        metrics.agreement_quality_relationship,
        metrics.agreement_quality_sustainability,
    ];

    if CONFIDENCE_RANGE.contains(&metrics.confidence_end)
        && qualities
            .iter()
            .all(|quality| AGREEMENT_QUALITY_RANGE.contains(quality))
    {
        Ok(())
    } else {
        Err(ValidationError::CloseMetricsOutOfRange)
    }
}

pub fn validate_confidence_start(confidence: i32) -> Result<(), ValidationError> {
    if CONFIDENCE_RANGE.contains(&confidence) {
        Ok(())
    } else {
        Err(ValidationError::ConfidenceStartOutOfRange)
    }
}

impl CaseCreate {
    /// Checks a blank-case request before it is sent. Confidence is checked
    /// first, matching the order the form reports problems in.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(confidence) = self.confidence_start {
            validate_confidence_start(confidence)?;
        }

        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if !TITLE_LENGTH.contains(&title.chars().count()) {
            return Err(ValidationError::TitleLength);
        }

        Ok(())
    }
}
