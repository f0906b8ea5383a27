use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a case by the external backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub i64);

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted lifecycle state of a case, terminal state last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    EnPreparacion,
    Preparado,
    EjecutadoPendienteDebrief,
    Cerrado,
}

impl CaseStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::EnPreparacion,
            Self::Preparado,
            Self::EjecutadoPendienteDebrief,
            Self::Cerrado,
        ]
    }

    pub const fn rank(self) -> u8 {
        match self {
            Self::EnPreparacion => 0,
            Self::Preparado => 1,
            Self::EjecutadoPendienteDebrief => 2,
            Self::Cerrado => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnPreparacion => "en_preparacion",
            Self::Preparado => "preparado",
            Self::EjecutadoPendienteDebrief => "ejecutado_pendiente_debrief",
            Self::Cerrado => "cerrado",
        }
    }

    /// Human-readable status shown next to the case title.
    pub const fn label(self) -> &'static str {
        match self {
            Self::EnPreparacion => "En preparación",
            Self::Preparado => "Listo para ejecutar",
            Self::EjecutadoPendienteDebrief => "Falta debrief",
            Self::Cerrado => "Cerrado",
        }
    }

    pub const fn next_step_label(self) -> &'static str {
        match self {
            Self::EnPreparacion => "Guardar preparación",
            Self::Preparado => "Confirmar ejecución",
            Self::EjecutadoPendienteDebrief => "Registrar debrief",
            Self::Cerrado => "Revisar memo final",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cerrado)
    }

    /// The workflow step that owns this status.
    pub const fn step(self) -> WorkflowStep {
        match self {
            Self::EnPreparacion => WorkflowStep::Preparation,
            Self::Preparado => WorkflowStep::Execution,
            Self::EjecutadoPendienteDebrief => WorkflowStep::Debrief,
            Self::Cerrado => WorkflowStep::Close,
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback register requested for the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackMode {
    Curso,
    #[default]
    Profesional,
}

impl FeedbackMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Curso => "curso",
            Self::Profesional => "profesional",
        }
    }
}

/// Fixed, ordered steps rendered on the workflow track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Preparation,
    Execution,
    Debrief,
    Close,
}

impl WorkflowStep {
    pub const fn ordered() -> [Self; 4] {
        [Self::Preparation, Self::Execution, Self::Debrief, Self::Close]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Preparation => "Preparación",
            Self::Execution => "Ejecución",
            Self::Debrief => "Debrief",
            Self::Close => "Cierre",
        }
    }

    pub const fn status(self) -> CaseStatus {
        match self {
            Self::Preparation => CaseStatus::EnPreparacion,
            Self::Execution => CaseStatus::Preparado,
            Self::Debrief => CaseStatus::EjecutadoPendienteDebrief,
            Self::Close => CaseStatus::Cerrado,
        }
    }

    pub const fn rank(self) -> u8 {
        self.status().rank()
    }

    /// Primary action that is offered from this step's slot on the track.
    pub const fn action_key(self) -> ActionKey {
        match self {
            Self::Preparation => ActionKey::SavePreparation,
            Self::Execution => ActionKey::Execute,
            Self::Debrief => ActionKey::SaveDebrief,
            Self::Close => ActionKey::Close,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Done,
    Active,
    Pending,
}

impl StepState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Done => "Completado",
            Self::Active => "En curso",
            Self::Pending => "Pendiente",
        }
    }
}

/// Keys of the single recommended action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    None,
    SavePreparation,
    Execute,
    SaveDebrief,
    Close,
    Closed,
}

impl ActionKey {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Sin caso seleccionado",
            Self::SavePreparation => "Guardar preparación",
            Self::Execute => "Confirmar ejecución",
            Self::SaveDebrief => "Registrar debrief",
            Self::Close => "Cerrar caso",
            Self::Closed => "Caso cerrado",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SavePreparation => "save_preparation",
            Self::Execute => "execute",
            Self::SaveDebrief => "save_debrief",
            Self::Close => "close",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
