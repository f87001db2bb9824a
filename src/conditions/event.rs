//! Conditions over a state and a typed event.

use std::fmt;
use std::sync::Arc;

use crate::core::{ExclusivityGroup, GameState};
use crate::engine::GameEngine;
use crate::events::TypedEvent;

use super::{CompositeMode, ConditionResponse, StateCondition};

/// A rule's validity check for events of type `E`.
pub trait EventCondition<E: TypedEvent>: Send + Sync + fmt::Debug {
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &E) -> ConditionResponse;

    /// Exclusivity tag carried by this condition.
    fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        None
    }

    /// Downcast used to flatten nested composites.
    fn as_composite(&self) -> Option<&CompositeEventCondition<E>> {
        None
    }
}

/// Accepts every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysValid;

impl<E: TypedEvent> EventCondition<E> for AlwaysValid {
    fn evaluate(&self, _engine: &GameEngine, _state: &GameState, _event: &E) -> ConditionResponse {
        ConditionResponse::valid()
    }
}

/// Lifts a [`StateCondition`] to an event condition.
#[derive(Clone, Debug)]
pub struct StateOnly(pub StateCondition);

impl<E: TypedEvent> EventCondition<E> for StateOnly {
    fn evaluate(&self, _engine: &GameEngine, state: &GameState, _event: &E) -> ConditionResponse {
        self.0.evaluate(state)
    }

    fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        self.0.exclusivity_group()
    }
}

/// ALL/ANY composite of event conditions, flattened on construction.
pub struct CompositeEventCondition<E: TypedEvent> {
    mode: CompositeMode,
    children: Vec<Arc<dyn EventCondition<E>>>,
    group: Option<ExclusivityGroup>,
}

impl<E: TypedEvent> CompositeEventCondition<E> {
    pub fn new(mode: CompositeMode, children: impl IntoIterator<Item = Arc<dyn EventCondition<E>>>) -> Self {
        let mut flat: Vec<Arc<dyn EventCondition<E>>> = Vec::new();
        for child in children {
            match child.as_composite() {
                Some(inner) if inner.mode == mode && inner.group.is_none() => {
                    flat.extend(inner.children.iter().cloned());
                }
                _ => flat.push(child),
            }
        }
        Self {
            mode,
            children: flat,
            group: None,
        }
    }

    pub fn all(children: impl IntoIterator<Item = Arc<dyn EventCondition<E>>>) -> Self {
        Self::new(CompositeMode::All, children)
    }

    pub fn any(children: impl IntoIterator<Item = Arc<dyn EventCondition<E>>>) -> Self {
        Self::new(CompositeMode::Any, children)
    }

    /// Tag the composite with an exclusivity group.
    #[must_use]
    pub fn with_exclusivity_group(mut self, group: impl Into<ExclusivityGroup>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn mode(&self) -> CompositeMode {
        self.mode
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<E: TypedEvent> fmt::Debug for CompositeEventCondition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeEventCondition")
            .field("mode", &self.mode)
            .field("children", &self.children)
            .field("group", &self.group)
            .finish()
    }
}

impl<E: TypedEvent> EventCondition<E> for CompositeEventCondition<E> {
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &E) -> ConditionResponse {
        self.mode
            .aggregate(self.children.iter().map(|c| c.evaluate(engine, state, event)))
    }

    fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        self.group.as_ref()
    }

    fn as_composite(&self) -> Option<&CompositeEventCondition<E>> {
        Some(self)
    }
}

/// Closure-backed condition.
pub struct FnCondition<F> {
    name: &'static str,
    check: F,
}

impl<F> FnCondition<F> {
    pub fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

impl<F> fmt::Debug for FnCondition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnCondition").field(&self.name).finish()
    }
}

impl<E, F> EventCondition<E> for FnCondition<F>
where
    E: TypedEvent,
    F: Fn(&GameEngine, &GameState, &E) -> ConditionResponse + Send + Sync,
{
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &E) -> ConditionResponse {
        (self.check)(engine, state, event)
    }
}
