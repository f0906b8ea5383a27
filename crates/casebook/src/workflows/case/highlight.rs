use super::domain::{CaseId, WorkflowStep};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pulse {
    step: WorkflowStep,
    expires_at: Instant,
}

/// Single-shot pulse on the workflow track.
///
/// A pulse fires when the observed `(case, effective step)` pair changes and
/// lapses after `duration`. A newer pulse replaces a pending one, so at most
/// one is ever live. The clock is passed in by the caller.
#[derive(Debug, Clone)]
pub struct HighlightTracker {
    duration: Duration,
    last_seen: Option<(CaseId, WorkflowStep)>,
    pulse: Option<Pulse>,
}

impl HighlightTracker {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last_seen: None,
            pulse: None,
        }
    }

    /// Records the current step. Returns `true` when a new pulse fired.
    pub fn observe(&mut self, case_id: CaseId, step: WorkflowStep, now: Instant) -> bool {
        if self.last_seen == Some((case_id, step)) {
            return false;
        }

        self.last_seen = Some((case_id, step));
        self.pulse = Some(Pulse {
            step,
            expires_at: now + self.duration,
        });
        true
    }

    pub fn highlighted(&self, now: Instant) -> Option<WorkflowStep> {
        self.pulse
            .filter(|pulse| now < pulse.expires_at)
            .map(|pulse| pulse.step)
    }

    /// Forget the observed case, e.g. when the selection is cleared.
    pub fn reset(&mut self) {
        self.last_seen = None;
        self.pulse = None;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
