use casebook::error::AppError;
use casebook::workflows::case::{
    CaseGateway, CaseId, CaseListItem, CaseRecord, CaseStatus, CloseCaseInput, DebriefInput,
    FinalMemo, GatewayError, PreparationInput,
};
use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for the case backend. It applies the backend's
/// status transitions, including the review step that moves a case from
/// `en_preparacion` to `preparado`, which the workflow itself never does.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseGateway {
    cases: Arc<Mutex<BTreeMap<CaseId, CaseRecord>>>,
}

impl InMemoryCaseGateway {
    pub(crate) fn with_cases(cases: impl IntoIterator<Item = CaseRecord>) -> Self {
        let gateway = Self::default();
        if let Ok(mut guard) = gateway.cases.lock() {
            guard.extend(cases.into_iter().map(|case| (case.id, case)));
        }
        gateway
    }

    pub(crate) fn list(&self) -> Result<Vec<CaseListItem>, GatewayError> {
        Ok(self.guard()?.values().map(CaseRecord::list_item).collect())
    }

    /// Backend-side review that marks a prepared case ready to execute.
    pub(crate) fn mark_prepared(&self, id: CaseId) -> Result<CaseRecord, GatewayError> {
        self.update(id, |case| {
            if case.status != CaseStatus::EnPreparacion {
                return Err(GatewayError::Rejected(
                    "Solo un caso en preparación puede marcarse como preparado".to_string(),
                ));
            }
            case.status = CaseStatus::Preparado;
            Ok(())
        })
    }

    fn guard(&self) -> Result<MutexGuard<'_, BTreeMap<CaseId, CaseRecord>>, GatewayError> {
        self.cases
            .lock()
            .map_err(|_| GatewayError::Unavailable("case store poisoned".to_string()))
    }

    fn update(
        &self,
        id: CaseId,
        apply: impl FnOnce(&mut CaseRecord) -> Result<(), GatewayError>,
    ) -> Result<CaseRecord, GatewayError> {
        let mut guard = self.guard()?;
        let case = guard.get_mut(&id).ok_or(GatewayError::NotFound)?;
        apply(case)?;
        Ok(case.clone())
    }
}

impl CaseGateway for InMemoryCaseGateway {
    fn fetch_case(&self, id: CaseId) -> Result<CaseRecord, GatewayError> {
        self.guard()?.get(&id).cloned().ok_or(GatewayError::NotFound)
    }

    fn save_preparation(
        &self,
        id: CaseId,
        preparation: &PreparationInput,
    ) -> Result<CaseRecord, GatewayError> {
        self.update(id, |case| {
            case.preparation = preparation.clone();
            Ok(())
        })
    }

    fn mark_executed(&self, id: CaseId) -> Result<CaseRecord, GatewayError> {
        self.update(id, |case| {
            if case.status != CaseStatus::Preparado {
                return Err(GatewayError::Rejected(
                    "Solo un caso preparado puede pasar a ejecutado".to_string(),
                ));
            }
            case.status = CaseStatus::EjecutadoPendienteDebrief;
            Ok(())
        })
    }

    fn save_debrief(&self, id: CaseId, debrief: &DebriefInput) -> Result<CaseRecord, GatewayError> {
        self.update(id, |case| {
            if case.status != CaseStatus::EjecutadoPendienteDebrief {
                return Err(GatewayError::Rejected(
                    "Debrief solo disponible luego de ejecutar".to_string(),
                ));
            }
            case.debrief = debrief.clone();
            Ok(())
        })
    }

    fn close_case(&self, id: CaseId, metrics: &CloseCaseInput) -> Result<CaseRecord, GatewayError> {
        self.update(id, |case| {
            if case.status != CaseStatus::EjecutadoPendienteDebrief {
                return Err(GatewayError::Rejected(
                    "Solo un caso con debrief puede cerrarse".to_string(),
                ));
            }
            case.status = CaseStatus::Cerrado;
            case.confidence_end = Some(metrics.confidence_end);
            case.agreement_quality_result = Some(metrics.agreement_quality_result);
            case.agreement_quality_relationship = Some(metrics.agreement_quality_relationship);
            case.agreement_quality_sustainability = Some(metrics.agreement_quality_sustainability);
            case.closed_at = Some(Utc::now());
            case.final_memo = Some(closing_memo(case));
            Ok(())
        })
    }
}

fn closing_memo(case: &CaseRecord) -> FinalMemo {
    FinalMemo {
        strategic_synthesis: format!(
            "Objetivo explícito: {}.",
            case.debrief.real_result.explicit_objective_achieved
        ),
        observations_and_next_steps: vec![case.debrief.self_diagnosis.decision_to_change.clone()]
            .into_iter()
            .filter(|entry| !entry.trim().is_empty())
            .collect(),
        consolidated_transferable_principle: case.debrief.transferable_lesson.clone(),
        ..FinalMemo::default()
    }
}

/// Cases the HTTP service starts with, one per status.
pub(crate) fn sample_cases(now: DateTime<Utc>) -> Vec<CaseRecord> {
    let statuses = [
        (1, "Renegociación de alquiler", CaseStatus::EnPreparacion),
        (2, "Aumento salarial", CaseStatus::Preparado),
        (3, "Contrato con proveedor", CaseStatus::EjecutadoPendienteDebrief),
    ];

    statuses
        .into_iter()
        .map(|(id, title, status)| {
            let mut case = CaseRecord::new(CaseId(id), title, now - chrono::Duration::days(id));
            case.status = status;
            case.confidence_start = Some(5);
            case
        })
        .collect()
}

pub(crate) fn read_json_file<T>(path: &Path) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_review_moves_case_to_prepared() {
        let gateway = InMemoryCaseGateway::with_cases(sample_cases(Utc::now()));

        let prepared = gateway.mark_prepared(CaseId(1)).expect("review passes");
        assert_eq!(prepared.status, CaseStatus::Preparado);

        let error = gateway.mark_prepared(CaseId(1)).expect_err("already prepared");
        assert!(matches!(error, GatewayError::Rejected(_)));
    }

    #[test]
    fn list_reports_every_seeded_case() {
        let gateway = InMemoryCaseGateway::with_cases(sample_cases(Utc::now()));
        let items = gateway.list().expect("list");

        assert_eq!(items.len(), 3);
        assert_eq!(items[2].status, CaseStatus::EjecutadoPendienteDebrief);
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert!(parse_date("2025-06-01").is_ok());
        let error = parse_date("01/06/2025").expect_err("wrong format");
        assert!(error.contains("YYYY-MM-DD"));
    }
}
