use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use casebook::error::AppError;
use casebook::workflows::case::{
    case_router, validate_close, ActionContext, CaseGateway, CaseRecord, CaseWorkflowService,
    CaseWorkflowView, CloseCaseInput, DebriefInput,
};
use casebook::workflows::coaching::{
    coaching_suggestion, CoachingSuggestion, LeaderEvaluation, LeaderEvaluationDraft, StudentId,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Snapshot plus drafts, as held by a client that wants the derived view.
#[derive(Debug, Deserialize)]
pub(crate) struct WorkflowViewRequest {
    pub(crate) case: CaseRecord,
    #[serde(default)]
    pub(crate) draft_debrief: Option<DebriefInput>,
    #[serde(default)]
    pub(crate) draft_close: Option<CloseCaseInput>,
    #[serde(default)]
    pub(crate) loading: bool,
}

impl WorkflowViewRequest {
    fn context(&self) -> ActionContext {
        let mut context = ActionContext::for_case(&self.case).loading(self.loading);
        if let Some(draft) = &self.draft_debrief {
            context.draft_debrief = draft.clone();
        }
        if let Some(draft) = self.draft_close {
            context.draft_close = draft;
        }
        context
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoachingSuggestionRequest {
    #[serde(default)]
    pub(crate) target_user_id: Option<StudentId>,
    #[serde(default)]
    pub(crate) history: Vec<LeaderEvaluation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationDraftRequest {
    pub(crate) draft: LeaderEvaluationDraft,
    #[serde(default)]
    pub(crate) history: Vec<LeaderEvaluation>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationDraftResponse {
    pub(crate) period_label: String,
    pub(crate) payload: LeaderEvaluationDraft,
}

pub(crate) fn with_case_routes<G>(service: Arc<CaseWorkflowService<G>>) -> Router
where
    G: CaseGateway + 'static,
{
    case_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/workflow/view", post(workflow_view_endpoint))
        .route("/api/v1/workflow/close/validate", post(close_validate_endpoint))
        .route("/api/v1/coaching/suggestion", post(coaching_suggestion_endpoint))
        .route(
            "/api/v1/coaching/evaluations/validate",
            post(evaluation_validate_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn workflow_view_endpoint(
    Json(request): Json<WorkflowViewRequest>,
) -> Json<CaseWorkflowView> {
    let context = request.context();
    Json(CaseWorkflowView::build(&request.case, &context))
}

pub(crate) async fn close_validate_endpoint(
    Json(metrics): Json<CloseCaseInput>,
) -> Result<StatusCode, AppError> {
    validate_close(&metrics)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn coaching_suggestion_endpoint(
    Json(request): Json<CoachingSuggestionRequest>,
) -> Json<CoachingSuggestion> {
    Json(coaching_suggestion(&request.history, request.target_user_id))
}

pub(crate) async fn evaluation_validate_endpoint(
    Json(request): Json<EvaluationDraftRequest>,
) -> Result<Json<EvaluationDraftResponse>, AppError> {
    let EvaluationDraftRequest {
        mut draft,
        history,
        today,
    } = request;

    if draft.next_action.trim().is_empty() {
        draft = draft.with_suggested_next_action(&history);
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let payload = draft.into_payload(today)?;
    let period_label = payload.period_label.clone().unwrap_or_default();

    Ok(Json(EvaluationDraftResponse {
        period_label,
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{sample_cases, InMemoryCaseGateway};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use casebook::workflows::case::{ActionKey, CaseId, CaseStatus};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn router(ready: bool) -> Router {
        let gateway = InMemoryCaseGateway::with_cases(sample_cases(Utc::now()));
        let service = Arc::new(CaseWorkflowService::new(Arc::new(gateway)));
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        };
        with_case_routes(service).layer(Extension(state))
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    fn sample_case(status: CaseStatus) -> CaseRecord {
        let created_at = Utc
            .with_ymd_and_hms(2025, 4, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let mut case = CaseRecord::new(CaseId(11), "Compra de equipos", created_at);
        case.status = status;
        case
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = router(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = router(true)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn workflow_view_uses_client_drafts() {
        let case = sample_case(CaseStatus::EjecutadoPendienteDebrief);
        let request = WorkflowViewRequest {
            case,
            draft_debrief: Some(DebriefInput::with_required("Logrado", "abc")),
            draft_close: None,
            loading: false,
        };

        let Json(view) = workflow_view_endpoint(Json(request)).await;

        assert!(!view.debrief_complete);
        assert_eq!(view.primary_action.key, ActionKey::SaveDebrief);
        assert!(!view.primary_action.disabled);
    }

    #[tokio::test]
    async fn workflow_view_route_honours_loading_flag() {
        let case = sample_case(CaseStatus::Preparado);
        let response = router(true)
            .oneshot(post_json(
                "/api/v1/workflow/view",
                json!({ "case": case, "loading": true }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["primary_action"]["key"], json!("execute"));
        assert_eq!(payload["primary_action"]["disabled"], json!(true));
        assert_eq!(payload["status_label"], json!("Listo para ejecutar"));
    }

    #[tokio::test]
    async fn close_validation_reports_message() {
        let response = router(true)
            .oneshot(post_json(
                "/api/v1/workflow/close/validate",
                json!({
                    "confidence_end": 5,
                    "agreement_quality_result": 6,
                    "agreement_quality_relationship": 5,
                    "agreement_quality_sustainability": 5
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json_body(response).await;
        assert_eq!(
            payload["error"],
            json!("Completá métricas de cierre válidas (confianza 1-10 y calidad 1-5).")
        );

        let response = router(true)
            .oneshot(post_json(
                "/api/v1/workflow/close/validate",
                json!({
                    "confidence_end": 5,
                    "agreement_quality_result": 5,
                    "agreement_quality_relationship": 5,
                    "agreement_quality_sustainability": 5
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn coaching_suggestion_route_names_weakest_dimension() {
        let response = router(true)
            .oneshot(post_json(
                "/api/v1/coaching/suggestion",
                json!({
                    "target_user_id": 42,
                    "history": [{
                        "id": 1,
                        "evaluator_user_id": 2,
                        "target_user_id": 42,
                        "period_label": "2025-05",
                        "preparation_score": 5,
                        "execution_score": 5,
                        "collaboration_score": 5,
                        "autonomy_score": 1,
                        "confidence_score": 5,
                        "created_at": "2025-05-12T10:00:00"
                    }]
                }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["weakest"], json!("autonomy"));
        assert!(payload["next_action"]
            .as_str()
            .expect("next action text")
            .contains("autonomía"));
    }

    #[tokio::test]
    async fn evaluation_validation_fills_period_and_next_action() {
        let request = EvaluationDraftRequest {
            draft: LeaderEvaluationDraft::for_target(StudentId(42)),
            history: Vec::new(),
            today: NaiveDate::from_ymd_opt(2025, 7, 3),
        };

        let Json(body) = evaluation_validate_endpoint(Json(request))
            .await
            .expect("draft is valid");

        assert_eq!(body.period_label, "2025-07");
        assert!(body.payload.next_action.starts_with("Durante 30 días, registrar"));
    }

    #[tokio::test]
    async fn evaluation_without_target_is_unprocessable() {
        let response = router(true)
            .oneshot(post_json(
                "/api/v1/coaching/evaluations/validate",
                json!({ "draft": { "target_user_id": 0 } }),
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn seeded_case_walks_through_execution() {
        let response = router(true)
            .oneshot(post_json("/api/v1/cases/2/execute", json!({})))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["status"], json!("ejecutado_pendiente_debrief"));
        assert_eq!(payload["primary_action"]["key"], json!("save_debrief"));
    }
}
