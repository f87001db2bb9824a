//! Tri-state conditions.
//!
//! A condition answers `Valid` ("applies and accepts"), `Invalid` ("applies
//! and rejects") or `Ignore` ("does not apply here"). Keeping `Ignore` apart
//! from `Invalid` is what lets composites tell an inapplicable branch from a
//! failing one:
//!
//! | mode | children                 | result    |
//! |------|--------------------------|-----------|
//! | ALL  | any `Invalid`            | `Invalid` |
//! | ALL  | all `Ignore` (or none)   | `Ignore`  |
//! | ALL  | otherwise                | `Valid`   |
//! | ANY  | any `Valid`              | `Valid`   |
//! | ANY  | all `Ignore` (or none)   | `Ignore`  |
//! | ANY  | otherwise                | `Invalid` |
//!
//! [`StateCondition`] looks at state only and gates phases.
//! [`EventCondition`] also sees the event and belongs to rules.

mod event;
mod movement;
mod state;

pub use event::{AlwaysValid, CompositeEventCondition, EventCondition, FnCondition, StateOnly};
pub use movement::{
    CustomNameIs, DestinationNotOwnOccupied, DiceValuesInRange, DistanceMatchesDice, FromMatchesPieceTile,
    PathExists, PieceOwnedByActivePlayer,
};
pub use state::{GameStateCondition, StateCondition};

use serde::{Deserialize, Serialize};

use crate::core::EventRejectionReason;

/// Outcome of a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionResult {
    Valid,
    Invalid,
    Ignore,
}

/// A condition's answer with its reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResponse {
    pub result: ConditionResult,
    pub reason: Option<String>,
    /// How an `Invalid` answer should be reported to the caller.
    pub rejection: Option<EventRejectionReason>,
}

impl ConditionResponse {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            result: ConditionResult::Valid,
            reason: None,
            rejection: None,
        }
    }

    /// `Invalid`, reported as `RuleRejected`.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            result: ConditionResult::Invalid,
            reason: Some(reason.into()),
            rejection: None,
        }
    }

    /// `Invalid` with an explicit rejection classification.
    pub fn reject(rejection: EventRejectionReason, reason: impl Into<String>) -> Self {
        Self {
            result: ConditionResult::Invalid,
            reason: Some(reason.into()),
            rejection: Some(rejection),
        }
    }

    pub fn ignore(reason: impl Into<String>) -> Self {
        Self {
            result: ConditionResult::Ignore,
            reason: Some(reason.into()),
            rejection: None,
        }
    }

    #[must_use]
    pub fn not_applicable() -> Self {
        Self::ignore("not applicable")
    }

    /// `Valid` when `ok`, otherwise `Invalid` with `reason`.
    pub fn check(ok: bool, reason: impl FnOnce() -> String) -> Self {
        if ok {
            Self::valid()
        } else {
            Self::invalid(reason())
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.result == ConditionResult::Valid
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.result == ConditionResult::Invalid
    }

    #[must_use]
    pub fn is_ignore(&self) -> bool {
        self.result == ConditionResult::Ignore
    }

    /// The rejection this answer maps to if it is `Invalid`.
    #[must_use]
    pub fn rejection_reason(&self) -> EventRejectionReason {
        self.rejection.unwrap_or(EventRejectionReason::RuleRejected)
    }

    /// Reason text, or a placeholder.
    #[must_use]
    pub fn message(&self) -> String {
        self.reason.clone().unwrap_or_else(|| format!("{:?}", self.result))
    }
}

/// How a composite combines its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeMode {
    All,
    Any,
}

impl CompositeMode {
    /// Combine child responses. Children are pulled lazily and evaluation
    /// stops as soon as the result is decided.
    pub fn aggregate(self, children: impl IntoIterator<Item = ConditionResponse>) -> ConditionResponse {
        match self {
            Self::All => {
                let mut any_valid = false;
                for child in children {
                    match child.result {
                        ConditionResult::Invalid => return child,
                        ConditionResult::Valid => any_valid = true,
                        ConditionResult::Ignore => {}
                    }
                }
                if any_valid {
                    ConditionResponse::valid()
                } else {
                    ConditionResponse::not_applicable()
                }
            }
            Self::Any => {
                let mut failures: Vec<ConditionResponse> = Vec::new();
                for child in children {
                    match child.result {
                        ConditionResult::Valid => return child,
                        ConditionResult::Invalid => failures.push(child),
                        ConditionResult::Ignore => {}
                    }
                }
                match failures.len() {
                    0 => ConditionResponse::not_applicable(),
                    1 => failures.remove(0),
                    _ => {
                        let reason = failures
                            .iter()
                            .map(ConditionResponse::message)
                            .collect::<Vec<_>>()
                            .join("; ");
                        ConditionResponse {
                            result: ConditionResult::Invalid,
                            reason: Some(reason),
                            rejection: failures[0].rejection,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ConditionResponse {
        ConditionResponse::valid()
    }

    fn invalid(r: &str) -> ConditionResponse {
        ConditionResponse::invalid(r)
    }

    fn ignore() -> ConditionResponse {
        ConditionResponse::not_applicable()
    }

    #[test]
    fn test_all_mode() {
        assert!(CompositeMode::All.aggregate([ignore(), ignore()]).is_ignore());
        assert!(CompositeMode::All.aggregate(Vec::new()).is_ignore());
        assert!(CompositeMode::All.aggregate([valid(), ignore()]).is_valid());
        assert!(CompositeMode::All.aggregate([valid(), invalid("x"), valid()]).is_invalid());
    }

    #[test]
    fn test_any_mode() {
        assert!(CompositeMode::Any.aggregate([ignore(), ignore()]).is_ignore());
        assert!(CompositeMode::Any.aggregate([invalid("a"), valid()]).is_valid());
        let combined = CompositeMode::Any.aggregate([invalid("a"), ignore(), invalid("b")]);
        assert!(combined.is_invalid());
        assert_eq!(combined.reason.as_deref(), Some("a; b"));
    }

    #[test]
    fn test_all_short_circuits() {
        let mut evaluated = 0;
        let children = [valid(), invalid("stop"), valid()].into_iter().inspect(|_| evaluated += 1);
        let result = CompositeMode::All.aggregate(children);
        assert_eq!(result.reason.as_deref(), Some("stop"));
        assert_eq!(evaluated, 2);
    }

    #[test]
    fn test_rejection_defaults_to_rule_rejected() {
        assert_eq!(invalid("x").rejection_reason(), EventRejectionReason::RuleRejected);
        assert_eq!(
            ConditionResponse::reject(EventRejectionReason::PathNotFound, "far").rejection_reason(),
            EventRejectionReason::PathNotFound
        );
    }
}
