use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::workflows::case::domain::{CaseId, CaseStatus};
use crate::workflows::case::gateway::{CaseGateway, GatewayError};
use crate::workflows::case::inputs::{CloseCaseInput, DebriefInput, PreparationInput};
use crate::workflows::case::record::{CaseRecord, FinalMemo};
use crate::workflows::case::service::CaseWorkflowService;

pub(super) fn case_in(status: CaseStatus) -> CaseRecord {
    let created_at = Utc
        .with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut case = CaseRecord::new(CaseId(7), "Renegociación de alquiler", created_at);
    case.status = status;
    case.confidence_start = Some(4);
    case
}

pub(super) fn complete_debrief() -> DebriefInput {
    DebriefInput::with_required("Logrado", "Anclar con datos de mercado")
}

pub(super) fn ready_to_close() -> CaseRecord {
    let mut case = case_in(CaseStatus::EjecutadoPendienteDebrief);
    case.debrief = complete_debrief();
    case
}

pub(super) fn valid_close() -> CloseCaseInput {
    CloseCaseInput {
        confidence_end: 9,
        agreement_quality_result: 4,
        agreement_quality_relationship: 5,
        agreement_quality_sustainability: 3,
    }
}

/// Stand-in backend that applies the same transitions the real one does and
/// records every call it receives.
#[derive(Default)]
pub(super) struct MemoryGateway {
    cases: Mutex<HashMap<CaseId, CaseRecord>>,
    calls: Mutex<Vec<&'static str>>,
}

impl MemoryGateway {
    pub(super) fn with_case(case: CaseRecord) -> Self {
        let gateway = Self::default();
        gateway
            .cases
            .lock()
            .expect("cases mutex poisoned")
            .insert(case.id, case);
        gateway
    }

    pub(super) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn update(
        &self,
        call: &'static str,
        id: CaseId,
        apply: impl FnOnce(&mut CaseRecord),
    ) -> Result<CaseRecord, GatewayError> {
        self.calls.lock().expect("calls mutex poisoned").push(call);
        let mut cases = self.cases.lock().expect("cases mutex poisoned");
        let case = cases.get_mut(&id).ok_or(GatewayError::NotFound)?;
        apply(case);
        Ok(case.clone())
    }
}

impl CaseGateway for MemoryGateway {
    fn fetch_case(&self, id: CaseId) -> Result<CaseRecord, GatewayError> {
        self.update("fetch_case", id, |_| {})
    }

    fn save_preparation(
        &self,
        id: CaseId,
        preparation: &PreparationInput,
    ) -> Result<CaseRecord, GatewayError> {
        self.update("save_preparation", id, |case| {
            case.preparation = preparation.clone();
        })
    }

    fn mark_executed(&self, id: CaseId) -> Result<CaseRecord, GatewayError> {
        self.update("mark_executed", id, |case| {
            case.status = CaseStatus::EjecutadoPendienteDebrief;
        })
    }

    fn save_debrief(&self, id: CaseId, debrief: &DebriefInput) -> Result<CaseRecord, GatewayError> {
        self.update("save_debrief", id, |case| {
            case.debrief = debrief.clone();
        })
    }

    fn close_case(&self, id: CaseId, metrics: &CloseCaseInput) -> Result<CaseRecord, GatewayError> {
        self.update("close_case", id, |case| {
            case.status = CaseStatus::Cerrado;
            case.confidence_end = Some(metrics.confidence_end);
            case.agreement_quality_result = Some(metrics.agreement_quality_result);
            case.agreement_quality_relationship = Some(metrics.agreement_quality_relationship);
            case.agreement_quality_sustainability = Some(metrics.agreement_quality_sustainability);
            case.closed_at = Some(case.created_at + chrono::Duration::days(4));
            case.final_memo = Some(FinalMemo {
                strategic_synthesis: "Cierre con margen".to_string(),
                ..FinalMemo::default()
            });
        })
    }
}

pub(super) struct UnavailableGateway;

impl CaseGateway for UnavailableGateway {
    fn fetch_case(&self, _id: CaseId) -> Result<CaseRecord, GatewayError> {
        Err(GatewayError::Unavailable("timeout".to_string()))
    }

    fn save_preparation(
        &self,
        _id: CaseId,
        _preparation: &PreparationInput,
    ) -> Result<CaseRecord, GatewayError> {
        Err(GatewayError::Unavailable("timeout".to_string()))
    }

    fn mark_executed(&self, _id: CaseId) -> Result<CaseRecord, GatewayError> {
        Err(GatewayError::Rejected(
            "Solo un caso preparado puede pasar a ejecutado".to_string(),
        ))
    }

    fn save_debrief(
        &self,
        _id: CaseId,
        _debrief: &DebriefInput,
    ) -> Result<CaseRecord, GatewayError> {
        Err(GatewayError::Unavailable("timeout".to_string()))
    }

    fn close_case(
        &self,
        _id: CaseId,
        _metrics: &CloseCaseInput,
    ) -> Result<CaseRecord, GatewayError> {
        Err(GatewayError::Unavailable("timeout".to_string()))
    }
}

pub(super) fn service_for(
    case: CaseRecord,
) -> (CaseWorkflowService<MemoryGateway>, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::with_case(case));
    (CaseWorkflowService::new(gateway.clone()), gateway)
}
