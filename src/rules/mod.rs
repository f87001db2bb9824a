//! Rules: typed event handlers and their composites.
//!
//! [`Rule`] is a closed enum over the event types, so dispatch is a match on
//! the rule variant followed by a typed projection of the event. A rule asked
//! about an event of another type reports `Ignore` and changes nothing.

mod composite;
mod event_rule;
mod mutators;

pub use composite::CompositeRule;
pub use event_rule::GameEventRule;
pub use mutators::{
    ClearDiceMutator, EventMutator, FnMutator, MovePieceMutator, MutatorChain, NextPlayerMutator, NullMutator,
    RollDiceMutator, SetCustomValueMutator,
};

use crate::conditions::{CompositeMode, ConditionResponse};
use crate::core::{EngineError, ExclusivityGroup, GameState};
use crate::engine::GameEngine;
use crate::events::{CustomEvent, EventKind, GameEvent, MovePieceEvent, RollDiceEvent};

/// Any rule the engine can hold.
#[derive(Clone, Debug)]
pub enum Rule {
    Move(GameEventRule<MovePieceEvent>),
    Roll(GameEventRule<RollDiceEvent>),
    Custom(GameEventRule<CustomEvent>),
    Composite(CompositeRule),
}

impl Rule {
    /// ALL-composite of rules.
    pub fn all(name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        Self::Composite(CompositeRule::new(name, CompositeMode::All, rules))
    }

    /// ANY-composite of rules.
    pub fn any(name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        Self::Composite(CompositeRule::new(name, CompositeMode::Any, rules))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Move(rule) => rule.name(),
            Self::Roll(rule) => rule.name(),
            Self::Custom(rule) => rule.name(),
            Self::Composite(rule) => rule.name(),
        }
    }

    /// Event kind this rule can handle.
    #[must_use]
    pub fn event_kind(&self) -> EventKind {
        match self {
            Self::Move(_) => EventKind::Move,
            Self::Roll(_) => EventKind::Roll,
            Self::Custom(_) => EventKind::Custom,
            Self::Composite(rule) => rule.event_kind(),
        }
    }

    /// Exclusivity tag of the rule (or of its condition).
    #[must_use]
    pub fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        match self {
            Self::Move(rule) => rule.exclusivity_group(),
            Self::Roll(rule) => rule.exclusivity_group(),
            Self::Custom(rule) => rule.exclusivity_group(),
            Self::Composite(rule) => rule.exclusivity_group(),
        }
    }

    /// Would this rule accept `event` in `state`?
    pub fn check(&self, engine: &GameEngine, state: &GameState, event: &GameEvent) -> ConditionResponse {
        match self {
            Self::Move(rule) => rule.check_event(engine, state, event),
            Self::Roll(rule) => rule.check_event(engine, state, event),
            Self::Custom(rule) => rule.check_event(engine, state, event),
            Self::Composite(rule) => rule.check(engine, state, event),
        }
    }

    /// Apply the rule.
    pub fn handle_event(&self, engine: &GameEngine, state: &GameState, event: &GameEvent) -> Result<GameState, EngineError> {
        match self {
            Self::Move(rule) => rule.handle_event(engine, state, event),
            Self::Roll(rule) => rule.handle_event(engine, state, event),
            Self::Custom(rule) => rule.handle_event(engine, state, event),
            Self::Composite(rule) => rule.handle_event(engine, state, event),
        }
    }
}

impl From<GameEventRule<MovePieceEvent>> for Rule {
    fn from(rule: GameEventRule<MovePieceEvent>) -> Self {
        Self::Move(rule)
    }
}

impl From<GameEventRule<RollDiceEvent>> for Rule {
    fn from(rule: GameEventRule<RollDiceEvent>) -> Self {
        Self::Roll(rule)
    }
}

impl From<GameEventRule<CustomEvent>> for Rule {
    fn from(rule: GameEventRule<CustomEvent>) -> Self {
        Self::Custom(rule)
    }
}

impl From<CompositeRule> for Rule {
    fn from(rule: CompositeRule) -> Self {
        Self::Composite(rule)
    }
}
