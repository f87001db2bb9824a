//! Conditions over a game state alone.

use std::fmt;
use std::sync::Arc;

use crate::core::{CustomId, DiceId, ExclusivityGroup, GameState, PieceId, PlayerId, TileId};

use super::{CompositeMode, ConditionResponse, ConditionResult};

/// A game-supplied state predicate.
pub trait GameStateCondition: Send + Sync + fmt::Debug {
    fn evaluate(&self, state: &GameState) -> ConditionResponse;

    /// Exclusivity tag carried by this condition.
    fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        None
    }
}

/// A predicate over [`GameState`] used to open and close phases.
#[derive(Clone, Debug)]
pub enum StateCondition {
    /// Always valid.
    Always,

    /// Always invalid, with a reason.
    Never(String),

    /// Always `Ignore`.
    NotApplicable,

    /// The given player holds the turn.
    ActivePlayerIs(PlayerId),

    /// A piece stands on a tile.
    PieceOn { piece: PieceId, tile: TileId },

    /// A die shows a value.
    DiceRolled(DiceId),

    /// A die shows no value.
    DiceNotRolled(DiceId),

    /// A custom value is at least `min` (missing counts as 0).
    CustomAtLeast { key: CustomId, min: i64 },

    /// Swaps `Valid` and `Invalid`; `Ignore` stays `Ignore`.
    Not(Box<StateCondition>),

    All(Vec<StateCondition>),

    Any(Vec<StateCondition>),

    /// Tags a condition with an exclusivity group.
    Grouped {
        group: ExclusivityGroup,
        condition: Box<StateCondition>,
    },

    /// Game-supplied predicate.
    Custom(Arc<dyn GameStateCondition>),
}

impl StateCondition {
    pub fn never(reason: impl Into<String>) -> Self {
        Self::Never(reason.into())
    }

    pub fn piece_on(piece: impl Into<PieceId>, tile: impl Into<TileId>) -> Self {
        Self::PieceOn {
            piece: piece.into(),
            tile: tile.into(),
        }
    }

    pub fn dice_rolled(dice: impl Into<DiceId>) -> Self {
        Self::DiceRolled(dice.into())
    }

    pub fn dice_not_rolled(dice: impl Into<DiceId>) -> Self {
        Self::DiceNotRolled(dice.into())
    }

    pub fn custom_at_least(key: impl Into<CustomId>, min: i64) -> Self {
        Self::CustomAtLeast { key: key.into(), min }
    }

    pub fn custom(condition: impl GameStateCondition + 'static) -> Self {
        Self::Custom(Arc::new(condition))
    }

    /// ALL-composite. Nested ALL-composites are flattened into it.
    ///
    /// ```
    /// use rust_boards::conditions::StateCondition;
    ///
    /// let inner = StateCondition::all([StateCondition::Always, StateCondition::dice_rolled("d6")]);
    /// let outer = StateCondition::all([inner, StateCondition::Always]);
    /// assert!(matches!(&outer, StateCondition::All(children) if children.len() == 3));
    /// ```
    pub fn all(conditions: impl IntoIterator<Item = StateCondition>) -> Self {
        Self::All(flatten(conditions, CompositeMode::All))
    }

    /// ANY-composite. Nested ANY-composites are flattened into it.
    pub fn any(conditions: impl IntoIterator<Item = StateCondition>) -> Self {
        Self::Any(flatten(conditions, CompositeMode::Any))
    }

    /// Combine with AND.
    #[must_use]
    pub fn and(self, other: StateCondition) -> Self {
        Self::all([self, other])
    }

    /// Combine with OR.
    #[must_use]
    pub fn or(self, other: StateCondition) -> Self {
        Self::any([self, other])
    }

    /// Negate.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Tag with an exclusivity group.
    #[must_use]
    pub fn with_exclusivity_group(self, group: impl Into<ExclusivityGroup>) -> Self {
        Self::Grouped {
            group: group.into(),
            condition: Box::new(self),
        }
    }

    /// The exclusivity tag carried by this condition, if any.
    #[must_use]
    pub fn exclusivity_group(&self) -> Option<&ExclusivityGroup> {
        match self {
            Self::Grouped { group, .. } => Some(group),
            Self::Custom(condition) => condition.exclusivity_group(),
            _ => None,
        }
    }

    /// Whether this condition is trivially `Valid`.
    #[must_use]
    pub fn is_always(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Grouped { condition, .. } => condition.is_always(),
            _ => false,
        }
    }

    /// Evaluate against a state.
    #[must_use]
    pub fn evaluate(&self, state: &GameState) -> ConditionResponse {
        match self {
            Self::Always => ConditionResponse::valid(),
            Self::Never(reason) => ConditionResponse::invalid(reason.clone()),
            Self::NotApplicable => ConditionResponse::not_applicable(),
            Self::ActivePlayerIs(player) => ConditionResponse::check(state.active_player() == Some(*player), || {
                format!("{} is not the active player", player)
            }),
            Self::PieceOn { piece, tile } => {
                ConditionResponse::check(state.piece_tile(piece) == Some(tile), || format!("{} is not on {}", piece, tile))
            }
            Self::DiceRolled(dice) => {
                ConditionResponse::check(state.dice_value(dice).is_some(), || format!("{} has not been rolled", dice))
            }
            Self::DiceNotRolled(dice) => {
                ConditionResponse::check(state.dice_value(dice).is_none(), || format!("{} is already rolled", dice))
            }
            Self::CustomAtLeast { key, min } => {
                let value = state.custom_value(key, 0);
                ConditionResponse::check(value >= *min, || format!("{} is {} (needs {})", key, value, min))
            }
            Self::Not(inner) => {
                let response = inner.evaluate(state);
                match response.result {
                    ConditionResult::Valid => ConditionResponse::invalid("negated condition holds"),
                    ConditionResult::Invalid => ConditionResponse::valid(),
                    ConditionResult::Ignore => response,
                }
            }
            Self::All(children) => CompositeMode::All.aggregate(children.iter().map(|c| c.evaluate(state))),
            Self::Any(children) => CompositeMode::Any.aggregate(children.iter().map(|c| c.evaluate(state))),
            Self::Grouped { condition, .. } => condition.evaluate(state),
            Self::Custom(condition) => condition.evaluate(state),
        }
    }
}

fn flatten(conditions: impl IntoIterator<Item = StateCondition>, mode: CompositeMode) -> Vec<StateCondition> {
    let mut flat = Vec::new();
    for condition in conditions {
        match (mode, condition) {
            (CompositeMode::All, StateCondition::All(children)) => flat.extend(children),
            (CompositeMode::Any, StateCondition::Any(children)) => flat.extend(children),
            (_, other) => flat.push(other),
        }
    }
    flat
}
