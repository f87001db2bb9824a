//! A rule for one event type.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::conditions::{AlwaysValid, ConditionResponse, ConditionResult, EventCondition};
use crate::core::{EngineError, EventRejectionReason, ExclusivityGroup, GameState};
use crate::engine::GameEngine;
use crate::events::{GameEvent, TypedEvent};

use super::mutators::EventMutator;

/// Handles events of type `E` in three fixed steps: an optional pre-mutation,
/// the validity check (against the pre-mutated state), and the post-mutation.
///
/// | check     | result                                        |
/// |-----------|-----------------------------------------------|
/// | `Valid`   | post-mutation applied to the pre-mutated state |
/// | `Ignore`  | the original state; the pre-mutation is dropped |
/// | `Invalid` | `EngineError::RuleRejected`                    |
pub struct GameEventRule<E: TypedEvent> {
    name: String,
    before: Option<Arc<dyn EventMutator<E>>>,
    condition: Arc<dyn EventCondition<E>>,
    after: Arc<dyn EventMutator<E>>,
    group: Option<ExclusivityGroup>,
}

impl<E: TypedEvent> GameEventRule<E> {
    /// A rule applying `after` whenever `condition` is valid.
    pub fn new(
        name: impl Into<String>,
        condition: impl EventCondition<E> + 'static,
        after: impl EventMutator<E> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            before: None,
            condition: Arc::new(condition),
            after: Arc::new(after),
            group: None,
        }
    }

    /// A rule that accepts every event of its type.
    pub fn always(name: impl Into<String>, after: impl EventMutator<E> + 'static) -> Self {
        Self::new(name, AlwaysValid, after)
    }

    /// Run `before` ahead of the check.
    #[must_use]
    pub fn with_before(mut self, before: impl EventMutator<E> + 'static) -> Self {
        self.before = Some(Arc::new(before));
        self
    }

    /// Replace the condition with a shared one.
    #[must_use]
    pub fn with_condition(mut self, condition: Arc<dyn EventCondition<E>>) -> Self {
        self.condition = condition;
        self
    }

    /// Tag the rule with an exclusivity group.
    #[must_use]
    pub fn with_exclusivity_group(mut self, group: impl Into<ExclusivityGroup>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule's own tag, falling back to its condition's tag.
    #[must_use]
    pub fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        self.group.as_ref().or_else(|| self.condition.exclusivity_group())
    }

    fn stage(&self, engine: &GameEngine, state: &GameState, event: &E) -> Result<GameState, EngineError> {
        match &self.before {
            Some(before) => before.mutate(engine, state, event),
            None => Ok(state.clone()),
        }
    }

    /// Evaluate the check for a typed event.
    pub fn check(&self, engine: &GameEngine, state: &GameState, event: &E) -> ConditionResponse {
        match self.stage(engine, state, event) {
            Ok(staged) => self.condition.evaluate(engine, &staged, event),
            Err(err) => ConditionResponse::reject(
                err.rejection_reason().unwrap_or(EventRejectionReason::InvalidEvent),
                err.detail(),
            ),
        }
    }

    /// Apply the rule to a typed event.
    pub fn handle(&self, engine: &GameEngine, state: &GameState, event: &E) -> Result<GameState, EngineError> {
        let staged = self.stage(engine, state, event)?;
        let response = self.condition.evaluate(engine, &staged, event);
        trace!(rule = %self.name, result = ?response.result, "rule check");
        match response.result {
            ConditionResult::Valid => self.after.mutate(engine, &staged, event),
            ConditionResult::Ignore => Ok(state.clone()),
            ConditionResult::Invalid => Err(EngineError::rejected(response.rejection_reason(), response.message())),
        }
    }

    /// [`check`](Self::check) for an untyped event; other event types are not applicable.
    pub fn check_event(&self, engine: &GameEngine, state: &GameState, event: &GameEvent) -> ConditionResponse {
        match E::from_event(event) {
            Some(event) => self.check(engine, state, event),
            None => ConditionResponse::not_applicable(),
        }
    }

    /// [`handle`](Self::handle) for an untyped event; other event types leave the state as is.
    pub fn handle_event(
        &self,
        engine: &GameEngine,
        state: &GameState,
        event: &GameEvent,
    ) -> Result<GameState, EngineError> {
        match E::from_event(event) {
            Some(event) => self.handle(engine, state, event),
            None => Ok(state.clone()),
        }
    }
}

impl<E: TypedEvent> Clone for GameEventRule<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            before: self.before.clone(),
            condition: Arc::clone(&self.condition),
            after: Arc::clone(&self.after),
            group: self.group.clone(),
        }
    }
}

impl<E: TypedEvent> fmt::Debug for GameEventRule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEventRule")
            .field("name", &self.name)
            .field("kind", &E::KIND)
            .field("condition", &self.condition)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}
