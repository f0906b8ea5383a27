use super::domain::CaseStatus;
use super::record::CaseListItem;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: CaseStatus,
    pub status_label: &'static str,
    pub count: usize,
}

/// Case list rollup shown above the case selector.
#[derive(Debug, Clone, Serialize)]
pub struct CaseBoard {
    pub total: usize,
    pub pending_debrief: usize,
    pub by_status: Vec<StatusCountEntry>,
}

impl CaseBoard {
    pub fn from_items(items: &[CaseListItem]) -> Self {
        let mut counts: HashMap<CaseStatus, usize> = HashMap::new();
        for item in items {
            *counts.entry(item.status).or_default() += 1;
        }

        let by_status = CaseStatus::ordered()
            .into_iter()
            .map(|status| StatusCountEntry {
                status,
                status_label: status.label(),
                count: counts.get(&status).copied().unwrap_or(0),
            })
            .collect();

        Self {
            total: items.len(),
            pending_debrief: counts
                .get(&CaseStatus::EjecutadoPendienteDebrief)
                .copied()
                .unwrap_or(0),
            by_status,
        }
    }
}
