use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::case::{CaseActionError, GatewayError, ValidationError};
use crate::workflows::coaching::EvaluationDraftError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    CaseAction(CaseActionError),
    EvaluationDraft(EvaluationDraftError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::CaseAction(CaseActionError::Validation(_))
            | AppError::EvaluationDraft(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::CaseAction(CaseActionError::InvalidState { .. }) | AppError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::CaseAction(CaseActionError::Gateway(GatewayError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::CaseAction(CaseActionError::InFlight { .. }) => StatusCode::CONFLICT,
            AppError::CaseAction(CaseActionError::Gateway(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid payload: {}", err),
            // Case and evaluation messages are shown to users verbatim.
            AppError::CaseAction(err) => write!(f, "{}", err.user_message()),
            AppError::EvaluationDraft(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::CaseAction(err) => Some(err),
            AppError::EvaluationDraft(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<CaseActionError> for AppError {
    fn from(value: CaseActionError) -> Self {
        Self::CaseAction(value)
    }
}

impl From<GatewayError> for AppError {
    fn from(value: GatewayError) -> Self {
        Self::CaseAction(CaseActionError::Gateway(value))
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::CaseAction(CaseActionError::Validation(value))
    }
}

impl From<EvaluationDraftError> for AppError {
    fn from(value: EvaluationDraftError) -> Self {
        Self::EvaluationDraft(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_are_unprocessable() {
        let error = AppError::from(ValidationError::CloseMetricsOutOfRange);
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            error.to_string(),
            "Completá métricas de cierre válidas (confianza 1-10 y calidad 1-5)."
        );
    }

    #[test]
    fn missing_case_maps_to_not_found() {
        let error = AppError::from(CaseActionError::Gateway(GatewayError::NotFound));
        assert_eq!(error.status(), StatusCode::NOT_FOUND);

        let error = AppError::from(CaseActionError::Gateway(GatewayError::Unavailable(
            "timeout".to_string(),
        )));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn in_flight_action_is_a_conflict() {
        let error = AppError::from(CaseActionError::InFlight {
            action: crate::workflows::case::ActionKey::Execute,
        });
        assert_eq!(error.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn evaluation_draft_errors_keep_their_message() {
        let error = AppError::from(EvaluationDraftError::MissingTarget);
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            error.to_string(),
            "Seleccioná un alumno para cargar la evaluación líder."
        );
    }
}
