use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::case::domain::CaseStatus;
use crate::workflows::case::router::{execute_handler, view_handler};
use crate::workflows::case::{case_router, CaseWorkflowService};

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}

fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn view_handler_returns_workflow_view() {
    let (service, _gateway) = service_for(ready_to_close());

    let axum::Json(view) = view_handler(State(Arc::new(service)), Path(7))
        .await
        .expect("case found");

    assert_eq!(view.status, CaseStatus::EjecutadoPendienteDebrief);
    assert!(view.debrief_complete);
}

#[tokio::test]
async fn execute_handler_rejects_unprepared_case() {
    let (service, gateway) = service_for(case_in(CaseStatus::EnPreparacion));

    let response = execute_handler(State(Arc::new(service)), Path(7))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        json!("Solo un caso preparado puede pasar a ejecutado")
    );
    assert_eq!(gateway.calls(), vec!["fetch_case"]);
}

#[tokio::test]
async fn unknown_case_is_not_found() {
    let (service, _gateway) = service_for(case_in(CaseStatus::Preparado));
    let router = case_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/cases/404")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Caso no encontrado"));
}

#[tokio::test]
async fn debrief_route_trims_and_advances_track() {
    let (service, _gateway) = service_for(case_in(CaseStatus::EjecutadoPendienteDebrief));
    let router = case_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/cases/7/debrief",
            json!({
                "real_result": { "explicit_objective_achieved": " Parcial " },
                "transferable_lesson": " Cerrar con resumen escrito "
            }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["debrief_complete"], json!(true));
    assert_eq!(payload["primary_action"]["key"], json!("close"));
    assert_eq!(payload["effective_step"], json!("close"));
}

#[tokio::test]
async fn close_route_validates_metrics_before_dispatch() {
    let (service, gateway) = service_for(ready_to_close());
    let router = case_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/cases/7/close",
            json!({
                "confidence_end": 11,
                "agreement_quality_result": 4,
                "agreement_quality_relationship": 4,
                "agreement_quality_sustainability": 4
            }),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(gateway.calls(), vec!["fetch_case"]);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/cases/7/close",
            serde_json::to_value(valid_close()).expect("serialize metrics"),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("cerrado"));
    assert_eq!(payload["confidence_delta"], json!(5));
    assert_eq!(payload["cycle_days"], json!(4));
    assert_eq!(payload["has_final_memo"], json!(true));
}

#[tokio::test]
async fn gateway_outage_is_internal_error() {
    let service = CaseWorkflowService::new(Arc::new(UnavailableGateway));
    let router = case_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/cases/7")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
