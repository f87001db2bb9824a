//! Built-in event conditions for moves, rolls and custom events.

use crate::core::{DiceId, EventRejectionReason, GameState};
use crate::engine::GameEngine;
use crate::events::{CustomEvent, MovePieceEvent, RollDiceEvent};

use super::{ConditionResponse, EventCondition};

/// The moving piece belongs to the player holding the turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceOwnedByActivePlayer;

impl EventCondition<MovePieceEvent> for PieceOwnedByActivePlayer {
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &MovePieceEvent) -> ConditionResponse {
        let Some(owner) = engine.game().owner_of(&event.piece) else {
            return ConditionResponse::reject(EventRejectionReason::InvalidOwnership, format!("unknown {}", event.piece));
        };
        match state.active_player() {
            Some(active) if active == owner => ConditionResponse::valid(),
            Some(active) => ConditionResponse::reject(
                EventRejectionReason::InvalidOwnership,
                format!("{} belongs to {}, not {}", event.piece, owner, active),
            ),
            None => ConditionResponse::reject(EventRejectionReason::InvalidOwnership, "no active player"),
        }
    }
}

/// The event's `from` tile is where the piece currently stands.
#[derive(Clone, Copy, Debug, Default)]
pub struct FromMatchesPieceTile;

impl EventCondition<MovePieceEvent> for FromMatchesPieceTile {
    fn evaluate(&self, _engine: &GameEngine, state: &GameState, event: &MovePieceEvent) -> ConditionResponse {
        match state.piece_tile(&event.piece) {
            Some(tile) if tile == &event.from => ConditionResponse::valid(),
            Some(tile) => ConditionResponse::reject(
                EventRejectionReason::InvalidOwnership,
                format!("{} is on {}, not {}", event.piece, tile, event.from),
            ),
            None => ConditionResponse::reject(
                EventRejectionReason::InvalidOwnership,
                format!("{} is not on the board", event.piece),
            ),
        }
    }
}

/// A path connecting `from` and `to` was resolved.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathExists;

impl EventCondition<MovePieceEvent> for PathExists {
    fn evaluate(&self, _engine: &GameEngine, _state: &GameState, event: &MovePieceEvent) -> ConditionResponse {
        match &event.path {
            Some(path) if path.from() == Some(&event.from) && path.to() == Some(&event.to) => ConditionResponse::valid(),
            Some(_) => ConditionResponse::reject(EventRejectionReason::PathNotFound, "path does not connect the move"),
            None => ConditionResponse::reject(
                EventRejectionReason::PathNotFound,
                format!("no path from {} to {}", event.from, event.to),
            ),
        }
    }
}

/// The path distance equals the value of one of the listed dice.
#[derive(Clone, Debug)]
pub struct DistanceMatchesDice {
    pub dice: Vec<DiceId>,
}

impl DistanceMatchesDice {
    pub fn new(dice: impl IntoIterator<Item = impl Into<DiceId>>) -> Self {
        Self {
            dice: dice.into_iter().map(Into::into).collect(),
        }
    }
}

impl EventCondition<MovePieceEvent> for DistanceMatchesDice {
    fn evaluate(&self, _engine: &GameEngine, state: &GameState, event: &MovePieceEvent) -> ConditionResponse {
        let Some(distance) = event.distance() else {
            return ConditionResponse::reject(EventRejectionReason::PathNotFound, "move has no path");
        };
        let rolled: Vec<u32> = self.dice.iter().filter_map(|d| state.dice_value(d)).collect();
        if rolled.contains(&distance) {
            ConditionResponse::valid()
        } else {
            ConditionResponse::reject(
                EventRejectionReason::PathNotFound,
                format!("distance {} matches no rolled value {:?}", distance, rolled),
            )
        }
    }
}

/// The destination holds no piece of the mover's owner.
#[derive(Clone, Copy, Debug, Default)]
pub struct DestinationNotOwnOccupied;

impl EventCondition<MovePieceEvent> for DestinationNotOwnOccupied {
    fn evaluate(&self, engine: &GameEngine, state: &GameState, event: &MovePieceEvent) -> ConditionResponse {
        let game = engine.game();
        let owner = game.owner_of(&event.piece);
        let blocked = state
            .pieces_on(&event.to)
            .any(|p| p != &event.piece && game.owner_of(p) == owner);
        ConditionResponse::check(!blocked, || format!("{} is occupied by an own piece", event.to))
    }
}

/// Every rolled die exists and shows a face it has.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiceValuesInRange;

impl EventCondition<RollDiceEvent> for DiceValuesInRange {
    fn evaluate(&self, engine: &GameEngine, _state: &GameState, event: &RollDiceEvent) -> ConditionResponse {
        if event.rolls.is_empty() {
            return ConditionResponse::reject(EventRejectionReason::InvalidEvent, "no dice rolled");
        }
        for roll in &event.rolls {
            let Some(die) = engine.game().die(&roll.dice) else {
                return ConditionResponse::reject(EventRejectionReason::InvalidEvent, format!("unknown {}", roll.dice));
            };
            if roll.value == 0 || roll.value > die.sides {
                return ConditionResponse::reject(
                    EventRejectionReason::InvalidEvent,
                    format!("{} cannot show {}", roll.dice, roll.value),
                );
            }
        }
        ConditionResponse::valid()
    }
}

/// Applies only to custom events with the given name; others are ignored.
#[derive(Clone, Debug)]
pub struct CustomNameIs(pub String);

impl CustomNameIs {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl EventCondition<CustomEvent> for CustomNameIs {
    fn evaluate(&self, _engine: &GameEngine, _state: &GameState, event: &CustomEvent) -> ConditionResponse {
        if event.name == self.0 {
            ConditionResponse::valid()
        } else {
            ConditionResponse::ignore(format!("event `{}` is not `{}`", event.name, self.0))
        }
    }
}
