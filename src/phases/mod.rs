//! The declarative phase tree.
//!
//! A game's flow is a tree of [`GamePhase`]s. Leaves carry a [`Rule`];
//! composite phases group children under a shared condition. The tree is
//! compiled once into a [`DecisionPlan`](crate::plan::DecisionPlan) and never
//! consulted again at dispatch time.
//!
//! ```
//! use rust_boards::conditions::StateCondition;
//! use rust_boards::phases::{GamePhase, Priority};
//!
//! let root = GamePhase::composite(0, "turn", StateCondition::Always)
//!     .with_child(GamePhase::new(1, "roll", StateCondition::dice_not_rolled("d6")))
//!     .with_child(GamePhase::new(2, "move", StateCondition::dice_rolled("d6")).with_priority(Priority::HIGH));
//! assert_eq!(root.children().len(), 2);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conditions::StateCondition;
use crate::core::ExclusivityGroup;
use crate::rules::Rule;

/// Ordering weight used by [`ConflictResolutionStrategy::HighestPriority`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(pub i32);

impl Priority {
    pub const LOW: Priority = Priority(0);
    pub const NORMAL: Priority = Priority(100);
    pub const HIGH: Priority = Priority(200);
    pub const CRITICAL: Priority = Priority(300);

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::LOW => write!(f, "low"),
            Self::NORMAL => write!(f, "normal"),
            Self::HIGH => write!(f, "high"),
            Self::CRITICAL => write!(f, "critical"),
            Self(other) => write!(f, "{other}"),
        }
    }
}

/// Which of several matching entries applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictResolutionStrategy {
    /// Earliest entry in compiled order.
    #[default]
    FirstWins,
    /// Greatest [`Priority`]; ties go to the earliest entry.
    HighestPriority,
    /// Latest entry in compiled order.
    LastWins,
    /// Exactly one entry may match. More than one is a definition error.
    Exclusive,
}

/// A node of the phase tree.
#[derive(Clone, Debug)]
pub struct GamePhase {
    number: u32,
    label: String,
    condition: StateCondition,
    rule: Option<Rule>,
    children: Vec<GamePhase>,
    composite: bool,
    priority: Priority,
    group: Option<ExclusivityGroup>,
    strategy: ConflictResolutionStrategy,
}

impl GamePhase {
    /// A leaf phase. Attach its rule with [`with_rule`](Self::with_rule).
    pub fn new(number: u32, label: impl Into<String>, condition: StateCondition) -> Self {
        Self {
            number,
            label: label.into(),
            condition,
            rule: None,
            children: Vec::new(),
            composite: false,
            priority: Priority::default(),
            group: None,
            strategy: ConflictResolutionStrategy::default(),
        }
    }

    /// A composite phase whose condition gates every descendant.
    pub fn composite(number: u32, label: impl Into<String>, condition: StateCondition) -> Self {
        Self {
            composite: true,
            ..Self::new(number, label, condition)
        }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Append a child. Turns this phase into a composite.
    #[must_use]
    pub fn with_child(mut self, child: GamePhase) -> Self {
        self.composite = true;
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = GamePhase>) -> Self {
        self.composite = true;
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_exclusivity_group(mut self, group: impl Into<ExclusivityGroup>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: ConflictResolutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn condition(&self) -> &StateCondition {
        &self.condition
    }

    #[must_use]
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    #[must_use]
    pub fn children(&self) -> &[GamePhase] {
        &self.children
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.composite
    }

    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        self.group.as_ref()
    }

    #[must_use]
    pub fn strategy(&self) -> ConflictResolutionStrategy {
        self.strategy
    }

    /// Number of phases in this subtree, this one included.
    #[must_use]
    pub fn phase_count(&self) -> usize {
        1 + self.children.iter().map(GamePhase::phase_count).sum::<usize>()
    }
}
