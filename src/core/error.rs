//! Error and rejection types.
//!
//! Expected rejections (a closed phase, a wrong piece, a missing path) are
//! values: they travel back to the caller in an
//! [`EventResult`](crate::engine::EventResult) tagged with an
//! [`EventRejectionReason`]. [`EngineError`] is what rules and mutators return
//! internally; the engine folds every non-fatal variant into a rejection.
//! Only a malformed game definition (an `Exclusive` conflict, a bad phase
//! tree) escapes as `Err`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::ConflictError;

/// Why an event was not applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventRejectionReason {
    /// The event was applied.
    #[default]
    None,
    /// No active phase accepts the event.
    PhaseClosed,
    /// An active phase accepted the event but nothing changed.
    NotApplicable,
    /// The actor does not own the piece, or the piece is not where the event says.
    InvalidOwnership,
    /// No resolver tier produced a usable path.
    PathNotFound,
    /// A matched rule's condition returned `Invalid`.
    RuleRejected,
    /// Malformed payload or a mutator failure.
    InvalidEvent,
    /// A broken compilation invariant. Should never happen.
    EngineInvariant,
}

impl EventRejectionReason {
    /// Whether this reason means the event was applied.
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::None
    }
}

impl std::fmt::Display for EventRejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::PhaseClosed => "phase closed",
            Self::NotApplicable => "not applicable",
            Self::InvalidOwnership => "invalid ownership",
            Self::PathNotFound => "path not found",
            Self::RuleRejected => "rule rejected",
            Self::InvalidEvent => "invalid event",
            Self::EngineInvariant => "engine invariant",
        };
        f.write_str(name)
    }
}

/// Errors raised while compiling or dispatching.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A rule's condition rejected the event.
    #[error("rule rejected event ({reason}): {message}")]
    RuleRejected {
        reason: EventRejectionReason,
        message: String,
    },

    /// More than one entry matched under the `Exclusive` strategy.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// A mutator could not produce a new state.
    #[error("mutation failed: {0}")]
    Mutation(String),

    /// An event or rule referenced an artifact the game does not define.
    #[error("unknown artifact: {0}")]
    UnknownArtifact(String),

    /// The phase tree or game definition is malformed.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// An internal invariant was broken.
    #[error("engine invariant violated: {0}")]
    Invariant(String),
}

impl EngineError {
    /// Build a `RuleRejected` error.
    pub fn rejected(reason: EventRejectionReason, message: impl Into<String>) -> Self {
        Self::RuleRejected {
            reason,
            message: message.into(),
        }
    }

    /// The rejection this error surfaces as, `None` for fatal errors.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<EventRejectionReason> {
        match self {
            Self::RuleRejected { reason, .. } => Some(*reason),
            Self::Mutation(_) | Self::UnknownArtifact(_) => Some(EventRejectionReason::InvalidEvent),
            Self::Invariant(_) => Some(EventRejectionReason::EngineInvariant),
            Self::Conflict(_) | Self::InvalidDefinition(_) => None,
        }
    }

    /// Whether this error indicates a malformed game definition.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.rejection_reason().is_none()
    }

    /// Human-readable detail without the variant prefix.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::RuleRejected { message, .. } => message.clone(),
            Self::Mutation(m) | Self::UnknownArtifact(m) | Self::InvalidDefinition(m) | Self::Invariant(m) => {
                m.clone()
            }
            Self::Conflict(conflict) => conflict.to_string(),
        }
    }
}

impl From<BuildError> for EngineError {
    fn from(err: BuildError) -> Self {
        Self::InvalidDefinition(err.to_string())
    }
}

/// Errors raised while assembling a [`Game`](crate::board::Game).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("game has no players")]
    NoPlayers,

    #[error("too many players: {0} (at most 255)")]
    TooManyPlayers(usize),

    #[error("duplicate {kind} id `{id}`")]
    Duplicate { kind: &'static str, id: String },

    #[error("unknown {kind} `{id}`")]
    Unknown { kind: &'static str, id: String },

    #[error("tile `{from}` already has a relation in direction `{direction}`")]
    DuplicateRelation { from: String, direction: String },

    #[error("relation from `{0}` has zero distance")]
    ZeroDistance(String),

    #[error("piece `{0}` has no starting tile")]
    Unplaced(String),

    #[error("invalid grid dimensions {width}x{height}")]
    InvalidGrid { width: usize, height: usize },
}

impl BuildError {
    pub(crate) fn unknown(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::Unknown {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn duplicate(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::Duplicate {
            kind,
            id: id.to_string(),
        }
    }
}
