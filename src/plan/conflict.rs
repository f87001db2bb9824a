//! Choosing among matching plan entries.
//!
//! Selection is a pure function of the candidate list. The strategy declared
//! by the first candidate governs the whole selection.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{trace, warn};

use crate::phases::{ConflictResolutionStrategy, Priority};

use super::compiler::DecisionPlanEntry;

/// A plan entry whose phase is open and whose rule accepted the event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub entry_index: usize,
    pub phase_number: u32,
    pub label: String,
    pub priority: Priority,
    pub strategy: ConflictResolutionStrategy,
}

impl Candidate {
    #[must_use]
    pub fn from_entry(entry_index: usize, entry: &DecisionPlanEntry) -> Self {
        Self {
            entry_index,
            phase_number: entry.phase_number,
            label: entry.label.clone(),
            priority: entry.priority,
            strategy: entry.strategy,
        }
    }
}

/// Identification of one entry taking part in a conflict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingEntry {
    pub entry_index: usize,
    pub phase_number: u32,
    pub label: String,
}

impl fmt::Display for ConflictingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} phase {} ({})", self.entry_index, self.phase_number, self.label)
    }
}

/// More than one entry matched under [`ConflictResolutionStrategy::Exclusive`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("exclusive phases matched together: {}", join(.entries))]
pub struct ConflictError {
    pub entries: Vec<ConflictingEntry>,
}

fn join(entries: &[ConflictingEntry]) -> String {
    entries.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Pick the entry to apply, as an index into the plan.
///
/// `Ok(None)` only for an empty candidate list.
pub fn select(candidates: &[Candidate]) -> Result<Option<usize>, ConflictError> {
    let Some(first) = candidates.first() else {
        return Ok(None);
    };
    let strategy = first.strategy;
    if candidates.iter().any(|c| c.strategy != strategy) {
        warn!(
            governing = ?strategy,
            candidates = candidates.len(),
            "candidates declare different conflict strategies"
        );
    }

    let chosen = match strategy {
        ConflictResolutionStrategy::FirstWins => first,
        ConflictResolutionStrategy::LastWins => candidates.last().unwrap_or(first),
        ConflictResolutionStrategy::HighestPriority => {
            // Strict `>` keeps the earliest maximum.
            candidates
                .iter()
                .fold(first, |best, c| if c.priority > best.priority { c } else { best })
        }
        ConflictResolutionStrategy::Exclusive => {
            if candidates.len() > 1 {
                return Err(ConflictError {
                    entries: candidates
                        .iter()
                        .map(|c| ConflictingEntry {
                            entry_index: c.entry_index,
                            phase_number: c.phase_number,
                            label: c.label.clone(),
                        })
                        .collect(),
                });
            }
            first
        }
    };
    trace!(strategy = ?strategy, entry = chosen.entry_index, "conflict resolved");
    Ok(Some(chosen.entry_index))
}
