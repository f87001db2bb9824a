//! ALL/ANY composites of rules.

use tracing::trace;

use crate::conditions::{CompositeMode, ConditionResponse, ConditionResult};
use crate::core::{EngineError, ExclusivityGroup, GameState};
use crate::engine::GameEngine;
use crate::events::{EventKind, GameEvent};

use super::Rule;

/// A rule built from child rules.
///
/// The check aggregates children like a condition composite. Handling differs
/// by mode: ALL lets every valid child mutate in declaration order, threading
/// the state; ANY lets only the first valid child mutate.
#[derive(Clone, Debug)]
pub struct CompositeRule {
    name: String,
    mode: CompositeMode,
    children: Vec<Rule>,
    group: Option<ExclusivityGroup>,
}

impl CompositeRule {
    /// Build a composite. Untagged children of the same mode are flattened in.
    pub fn new(name: impl Into<String>, mode: CompositeMode, children: impl IntoIterator<Item = Rule>) -> Self {
        let mut flat = Vec::new();
        for child in children {
            match child {
                Rule::Composite(inner) if inner.mode == mode && inner.group.is_none() => flat.extend(inner.children),
                other => flat.push(other),
            }
        }
        Self {
            name: name.into(),
            mode,
            children: flat,
            group: None,
        }
    }

    #[must_use]
    pub fn with_exclusivity_group(mut self, group: impl Into<ExclusivityGroup>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mode(&self) -> CompositeMode {
        self.mode
    }

    #[must_use]
    pub fn children(&self) -> &[Rule] {
        &self.children
    }

    #[must_use]
    pub fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        self.group.as_ref()
    }

    /// The children's shared event kind, or `Any` if they differ.
    #[must_use]
    pub fn event_kind(&self) -> EventKind {
        let mut kinds = self.children.iter().map(Rule::event_kind);
        match kinds.next() {
            Some(first) if kinds.all(|k| k == first) => first,
            _ => EventKind::Any,
        }
    }

    pub fn check(&self, engine: &GameEngine, state: &GameState, event: &GameEvent) -> ConditionResponse {
        self.mode
            .aggregate(self.children.iter().map(|c| c.check(engine, state, event)))
    }

    pub fn handle_event(
        &self,
        engine: &GameEngine,
        state: &GameState,
        event: &GameEvent,
    ) -> Result<GameState, EngineError> {
        match self.mode {
            CompositeMode::All => {
                let mut current = state.clone();
                for child in &self.children {
                    let response = child.check(engine, &current, event);
                    match response.result {
                        ConditionResult::Valid => current = child.handle_event(engine, &current, event)?,
                        ConditionResult::Ignore => {}
                        ConditionResult::Invalid => {
                            return Err(EngineError::rejected(response.rejection_reason(), response.message()));
                        }
                    }
                }
                Ok(current)
            }
            CompositeMode::Any => {
                for child in &self.children {
                    if child.check(engine, state, event).is_valid() {
                        trace!(composite = %self.name, child = child.name(), "first valid child");
                        return child.handle_event(engine, state, event);
                    }
                }
                Ok(state.clone())
            }
        }
    }
}
