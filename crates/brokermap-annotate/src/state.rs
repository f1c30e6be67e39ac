//! Workflow bookkeeping as a reducer over geocode results.
//!
//! [`WorkflowState::apply`] folds one tagged result at a time. Each ordinal
//! is counted once, so `attempted` reaches `total_requested` exactly once and
//! the step that gets it there is the only one carrying a [`Completion`],
//! whatever order results arrive in.

use brokermap_core::{Coordinates, GeocodeOutcome, GeocodeResult};
use serde::Serialize;

use crate::marker::MarkerRecord;

/// Identifies one subject load. Results carry it so a session can reject
/// anything produced for a previous subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedResult {
    pub session: SessionId,
    pub result: GeocodeResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    StaleSession,
    UnknownOrdinal,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// At least one marker was placed; the viewport should be fitted.
    Fit,
    /// Every lookup came back empty or failed; leave the default view.
    NothingResolved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Ignored {
        ordinal: usize,
        reason: IgnoreReason,
    },
    Recorded {
        ordinal: usize,
        marker: Option<MarkerRecord>,
        completion: Option<Completion>,
    },
}

#[derive(Debug, Clone)]
pub struct WorkflowState {
    session: SessionId,
    total_requested: usize,
    attempted: usize,
    resolved: usize,
    empty: usize,
    failed: usize,
    markers: Vec<MarkerRecord>,
    answered: Vec<bool>,
}

impl WorkflowState {
    #[must_use]
    pub fn new(session: SessionId, total_requested: usize) -> Self {
        Self {
            session,
            total_requested,
            attempted: 0,
            resolved: 0,
            empty: 0,
            failed: 0,
            markers: Vec::with_capacity(total_requested),
            answered: vec![false; total_requested],
        }
    }

    pub fn apply(&mut self, tagged: TaggedResult) -> Step {
        let TaggedResult { session, result } = tagged;
        let ordinal = result.ordinal;

        if session != self.session {
            return Step::Ignored {
                ordinal,
                reason: IgnoreReason::StaleSession,
            };
        }
        let Some(answered) = self.answered.get_mut(ordinal) else {
            return Step::Ignored {
                ordinal,
                reason: IgnoreReason::UnknownOrdinal,
            };
        };
        if *answered {
            return Step::Ignored {
                ordinal,
                reason: IgnoreReason::Duplicate,
            };
        }
        *answered = true;
        self.attempted += 1;

        let marker = match result.outcome {
            GeocodeOutcome::Resolved { coordinates } if coordinates.is_valid() => {
                self.resolved += 1;
                let marker = MarkerRecord::new(ordinal, &result.query, coordinates);
                self.markers.push(marker.clone());
                Some(marker)
            }
            GeocodeOutcome::Resolved { .. } | GeocodeOutcome::Empty => {
                self.empty += 1;
                None
            }
            GeocodeOutcome::Failed { .. } => {
                self.failed += 1;
                None
            }
        };

        let completion = (self.attempted == self.total_requested).then(|| {
            if self.markers.is_empty() {
                Completion::NothingResolved
            } else {
                Completion::Fit
            }
        });

        Step::Recorded {
            ordinal,
            marker,
            completion,
        }
    }

    #[must_use]
    pub fn session(&self) -> SessionId {
        self.session
    }

    #[must_use]
    pub fn total_requested(&self) -> usize {
        self.total_requested
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    #[must_use]
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    #[must_use]
    pub fn empty(&self) -> usize {
        self.empty
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.attempted == self.total_requested
    }

    #[must_use]
    pub fn markers(&self) -> &[MarkerRecord] {
        &self.markers
    }

    /// Marker positions in arrival order.
    #[must_use]
    pub fn resolved_coordinates(&self) -> Vec<Coordinates> {
        self.markers.iter().map(|m| m.coordinates).collect()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
