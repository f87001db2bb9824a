//! Events: the only way game state advances.
//!
//! [`GameEvent`] is a closed set. Rules are typed by the event they handle
//! through [`TypedEvent`], so matching an event against a rule is an enum
//! match, never a runtime type test.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{DiceId, PieceId, TileId};
use crate::paths::TilePath;

/// Coarse event classification used to pre-filter plan entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Move,
    Roll,
    Custom,
    /// Accepts every event.
    Any,
}

impl EventKind {
    /// Whether an entry of this kind can match `event`.
    #[must_use]
    pub fn accepts(self, event: &GameEvent) -> bool {
        self == Self::Any || self == event.kind()
    }
}

/// Move a piece between two tiles.
///
/// `path` belongs to the engine: before any rule sees the event it is
/// replaced with the resolver chain's answer for the current state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePieceEvent {
    pub piece: PieceId,
    pub from: TileId,
    pub to: TileId,
    pub path: Option<TilePath>,
}

impl MovePieceEvent {
    pub fn new(piece: impl Into<PieceId>, from: impl Into<TileId>, to: impl Into<TileId>) -> Self {
        Self {
            piece: piece.into(),
            from: from.into(),
            to: to.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: TilePath) -> Self {
        self.path = Some(path);
        self
    }

    /// Distance of the resolved path, if any.
    #[must_use]
    pub fn distance(&self) -> Option<u32> {
        self.path.as_ref().map(TilePath::distance)
    }
}

/// One die and the face it landed on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub dice: DiceId,
    pub value: u32,
}

/// Dice were rolled. Values are produced outside the engine (see
/// [`GameRng`](crate::core::GameRng)).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollDiceEvent {
    pub rolls: Vec<DiceRoll>,
}

impl RollDiceEvent {
    pub fn new(rolls: impl IntoIterator<Item = (DiceId, u32)>) -> Self {
        Self {
            rolls: rolls
                .into_iter()
                .map(|(dice, value)| DiceRoll { dice, value })
                .collect(),
        }
    }

    /// A single die roll.
    pub fn single(dice: impl Into<DiceId>, value: u32) -> Self {
        Self::new([(dice.into(), value)])
    }
}

/// A game-defined event (pass, resign, draw a card...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub name: String,
    pub values: Vec<i64>,
}

impl CustomEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.values.push(value);
        self
    }
}

/// Every event the engine dispatches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Move(MovePieceEvent),
    Roll(RollDiceEvent),
    Custom(CustomEvent),
}

impl GameEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Move(_) => EventKind::Move,
            Self::Roll(_) => EventKind::Roll,
            Self::Custom(_) => EventKind::Custom,
        }
    }
}

impl From<MovePieceEvent> for GameEvent {
    fn from(event: MovePieceEvent) -> Self {
        Self::Move(event)
    }
}

impl From<RollDiceEvent> for GameEvent {
    fn from(event: RollDiceEvent) -> Self {
        Self::Roll(event)
    }
}

impl From<CustomEvent> for GameEvent {
    fn from(event: CustomEvent) -> Self {
        Self::Custom(event)
    }
}

/// An event payload type a rule can be written against.
pub trait TypedEvent: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: EventKind;

    /// Borrow the payload if `event` is of this type.
    fn from_event(event: &GameEvent) -> Option<&Self>;
}

impl TypedEvent for MovePieceEvent {
    const KIND: EventKind = EventKind::Move;

    fn from_event(event: &GameEvent) -> Option<&Self> {
        match event {
            GameEvent::Move(e) => Some(e),
            _ => None,
        }
    }
}

impl TypedEvent for RollDiceEvent {
    const KIND: EventKind = EventKind::Roll;

    fn from_event(event: &GameEvent) -> Option<&Self> {
        match event {
            GameEvent::Roll(e) => Some(e),
            _ => None,
        }
    }
}

impl TypedEvent for CustomEvent {
    const KIND: EventKind = EventKind::Custom;

    fn from_event(event: &GameEvent) -> Option<&Self> {
        match event {
            GameEvent::Custom(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_filter() {
        let roll: GameEvent = RollDiceEvent::single("d6", 3).into();
        assert_eq!(roll.kind(), EventKind::Roll);
        assert!(EventKind::Roll.accepts(&roll));
        assert!(EventKind::Any.accepts(&roll));
        assert!(!EventKind::Move.accepts(&roll));
    }

    #[test]
    fn test_typed_projection() {
        let event: GameEvent = MovePieceEvent::new("rook", "a1", "a4").into();
        assert!(MovePieceEvent::from_event(&event).is_some());
        assert!(RollDiceEvent::from_event(&event).is_none());
        assert!(CustomEvent::from_event(&event).is_none());
        assert_eq!(MovePieceEvent::from_event(&event).unwrap().distance(), None);
    }

    #[test]
    fn test_move_path_is_validated_on_load() {
        let empty = r#"{"piece":"rook","from":"a1","to":"a4","path":[]}"#;
        assert!(serde_json::from_str::<MovePieceEvent>(empty).is_err());

        let none = r#"{"piece":"rook","from":"a1","to":"a4","path":null}"#;
        let event: MovePieceEvent = serde_json::from_str(none).unwrap();
        assert_eq!(event, MovePieceEvent::new("rook", "a1", "a4"));

        let one = r#"{"piece":"rook","from":"a1","to":"a2","path":[{"from":"a1","to":"a2","direction":"north","distance":4}]}"#;
        let event: MovePieceEvent = serde_json::from_str(one).unwrap();
        assert_eq!(event.distance(), Some(4));
    }

    #[test]
    fn test_serialization() {
        let event: GameEvent = CustomEvent::new("pass").with_value(2).into();
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
