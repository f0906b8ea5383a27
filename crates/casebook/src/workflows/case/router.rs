use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use super::domain::CaseId;
use super::engine::ActionContext;
use super::gateway::CaseGateway;
use super::inputs::{CloseCaseInput, DebriefInput, PreparationInput};
use super::record::CaseRecord;
use super::service::CaseWorkflowService;
use super::view::CaseWorkflowView;
use crate::error::AppError;

type SharedService<G> = State<Arc<CaseWorkflowService<G>>>;

/// Case endpoints. Every response is the workflow view of the refreshed case.
pub fn case_router<G>(service: Arc<CaseWorkflowService<G>>) -> Router
where
    G: CaseGateway + 'static,
{
    Router::new()
        .route("/api/v1/cases/:case_id", get(view_handler::<G>))
        .route(
            "/api/v1/cases/:case_id/preparation",
            put(preparation_handler::<G>),
        )
        .route("/api/v1/cases/:case_id/execute", post(execute_handler::<G>))
        .route("/api/v1/cases/:case_id/debrief", put(debrief_handler::<G>))
        .route("/api/v1/cases/:case_id/close", post(close_handler::<G>))
        .with_state(service)
}

fn view_of(case: &CaseRecord) -> Json<CaseWorkflowView> {
    Json(CaseWorkflowView::build(case, &ActionContext::for_case(case)))
}

pub(crate) async fn view_handler<G>(
    State(service): SharedService<G>,
    Path(case_id): Path<i64>,
) -> Result<Json<CaseWorkflowView>, AppError>
where
    G: CaseGateway + 'static,
{
    let case = service.load(CaseId(case_id))?;
    Ok(view_of(&case))
}

pub(crate) async fn preparation_handler<G>(
    State(service): SharedService<G>,
    Path(case_id): Path<i64>,
    Json(preparation): Json<PreparationInput>,
) -> Result<Json<CaseWorkflowView>, AppError>
where
    G: CaseGateway + 'static,
{
    let case = service.load(CaseId(case_id))?;
    let updated = service.save_preparation(&case, &preparation)?;
    Ok(view_of(&updated))
}

pub(crate) async fn execute_handler<G>(
    State(service): SharedService<G>,
    Path(case_id): Path<i64>,
) -> Result<Json<CaseWorkflowView>, AppError>
where
    G: CaseGateway + 'static,
{
    let case = service.load(CaseId(case_id))?;
    let updated = service.confirm_execution(&case)?;
    Ok(view_of(&updated))
}

pub(crate) async fn debrief_handler<G>(
    State(service): SharedService<G>,
    Path(case_id): Path<i64>,
    Json(debrief): Json<DebriefInput>,
) -> Result<Json<CaseWorkflowView>, AppError>
where
    G: CaseGateway + 'static,
{
    let case = service.load(CaseId(case_id))?;
    let updated = service.save_debrief(&case, &debrief)?;
    Ok(view_of(&updated))
}

pub(crate) async fn close_handler<G>(
    State(service): SharedService<G>,
    Path(case_id): Path<i64>,
    Json(metrics): Json<CloseCaseInput>,
) -> Result<Json<CaseWorkflowView>, AppError>
where
    G: CaseGateway + 'static,
{
    let case = service.load(CaseId(case_id))?;
    let updated = service.close_case(&case, &metrics)?;
    Ok(view_of(&updated))
}
