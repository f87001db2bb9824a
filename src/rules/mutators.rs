//! State mutators.
//!
//! A mutator returns either a complete successor state or an error; it never
//! hands back a half-applied state.

use std::fmt;
use std::sync::Arc;

use crate::core::{ArtifactState, CustomId, DiceId, EngineError, GameState};
use crate::engine::GameEngine;
use crate::events::{MovePieceEvent, RollDiceEvent, TypedEvent};

/// Produces the next state for an event of type `E`.
pub trait EventMutator<E: TypedEvent>: Send + Sync + fmt::Debug {
    fn mutate(&self, engine: &GameEngine, state: &GameState, event: &E) -> Result<GameState, EngineError>;
}

/// Returns the input state unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMutator;

impl<E: TypedEvent> EventMutator<E> for NullMutator {
    fn mutate(&self, _engine: &GameEngine, state: &GameState, _event: &E) -> Result<GameState, EngineError> {
        Ok(state.clone())
    }
}

/// Moves the piece along its resolved path.
///
/// Opponent pieces on the destination are captured when `capture` is set;
/// otherwise an occupied destination fails the mutation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovePieceMutator {
    pub capture: bool,
}

impl MovePieceMutator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn capturing() -> Self {
        Self { capture: true }
    }
}

impl EventMutator<MovePieceEvent> for MovePieceMutator {
    fn mutate(&self, engine: &GameEngine, state: &GameState, event: &MovePieceEvent) -> Result<GameState, EngineError> {
        let game = engine.game();
        let owner = game
            .owner_of(&event.piece)
            .ok_or_else(|| EngineError::UnknownArtifact(event.piece.to_string()))?;
        if event.path.is_none() {
            return Err(EngineError::Mutation(format!("{} has no path to {}", event.piece, event.to)));
        }

        let mut updates = Vec::new();
        for other in state.pieces_on(&event.to).filter(|p| *p != &event.piece) {
            if !self.capture {
                return Err(EngineError::Mutation(format!("{} is occupied by {}", event.to, other)));
            }
            if game.owner_of(other) == Some(owner) {
                return Err(EngineError::Mutation(format!("cannot capture own {}", other)));
            }
            updates.push(ArtifactState::captured(other.clone()));
        }
        updates.push(ArtifactState::piece(event.piece.clone(), event.to.clone()));
        Ok(state.next(updates))
    }
}

/// Records rolled values.
#[derive(Clone, Copy, Debug, Default)]
pub struct RollDiceMutator;

impl EventMutator<RollDiceEvent> for RollDiceMutator {
    fn mutate(&self, _engine: &GameEngine, state: &GameState, event: &RollDiceEvent) -> Result<GameState, EngineError> {
        Ok(state.next(
            event
                .rolls
                .iter()
                .map(|roll| ArtifactState::dice(roll.dice.clone(), Some(roll.value))),
        ))
    }
}

/// Clears the listed dice back to unrolled.
#[derive(Clone, Debug)]
pub struct ClearDiceMutator {
    pub dice: Vec<DiceId>,
}

impl ClearDiceMutator {
    pub fn new(dice: impl IntoIterator<Item = impl Into<DiceId>>) -> Self {
        Self {
            dice: dice.into_iter().map(Into::into).collect(),
        }
    }
}

impl<E: TypedEvent> EventMutator<E> for ClearDiceMutator {
    fn mutate(&self, _engine: &GameEngine, state: &GameState, _event: &E) -> Result<GameState, EngineError> {
        Ok(state.next(self.dice.iter().map(|d| ArtifactState::dice(d.clone(), None))))
    }
}

/// Passes the turn to the next player in index order.
#[derive(Clone, Copy, Debug, Default)]
pub struct NextPlayerMutator;

impl<E: TypedEvent> EventMutator<E> for NextPlayerMutator {
    fn mutate(&self, engine: &GameEngine, state: &GameState, _event: &E) -> Result<GameState, EngineError> {
        let current = state
            .active_player()
            .ok_or_else(|| EngineError::Invariant("no active player".into()))?;
        let next = current.next(engine.game().player_count());
        Ok(state.next([
            ArtifactState::active_player(current, false),
            ArtifactState::active_player(next, true),
        ]))
    }
}

/// Sets a custom value.
#[derive(Clone, Debug)]
pub struct SetCustomValueMutator {
    pub key: CustomId,
    pub value: i64,
}

impl SetCustomValueMutator {
    pub fn new(key: impl Into<CustomId>, value: i64) -> Self {
        Self { key: key.into(), value }
    }
}

impl<E: TypedEvent> EventMutator<E> for SetCustomValueMutator {
    fn mutate(&self, _engine: &GameEngine, state: &GameState, _event: &E) -> Result<GameState, EngineError> {
        Ok(state.next([ArtifactState::custom(self.key.clone(), self.value)]))
    }
}

/// Runs mutators in order, threading the state. Fails as a whole if any step fails.
pub struct MutatorChain<E: TypedEvent> {
    steps: Vec<Arc<dyn EventMutator<E>>>,
}

impl<E: TypedEvent> MutatorChain<E> {
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    #[must_use]
    pub fn then(mut self, mutator: impl EventMutator<E> + 'static) -> Self {
        self.steps.push(Arc::new(mutator));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<E: TypedEvent> Default for MutatorChain<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TypedEvent> fmt::Debug for MutatorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.steps).finish()
    }
}

impl<E: TypedEvent> EventMutator<E> for MutatorChain<E> {
    fn mutate(&self, engine: &GameEngine, state: &GameState, event: &E) -> Result<GameState, EngineError> {
        let mut current = state.clone();
        for step in &self.steps {
            current = step.mutate(engine, &current, event)?;
        }
        Ok(current)
    }
}

/// Closure-backed mutator.
pub struct FnMutator<F> {
    name: &'static str,
    apply: F,
}

impl<F> FnMutator<F> {
    pub fn new(name: &'static str, apply: F) -> Self {
        Self { name, apply }
    }
}

impl<F> fmt::Debug for FnMutator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnMutator").field(&self.name).finish()
    }
}

impl<E, F> EventMutator<E> for FnMutator<F>
where
    E: TypedEvent,
    F: Fn(&GameEngine, &GameState, &E) -> Result<GameState, EngineError> + Send + Sync,
{
    fn mutate(&self, engine: &GameEngine, state: &GameState, event: &E) -> Result<GameState, EngineError> {
        (self.apply)(engine, state, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameBuilder, GridDirections, Pattern, Piece};
    use crate::conditions::StateCondition;
    use crate::core::{EngineConfig, PieceId, PlayerId, TileId};
    use crate::events::{CustomEvent, GameEvent};
    use crate::phases::GamePhase;

    fn engine() -> (GameEngine, GameState) {
        let (game, state) = GameBuilder::new("grid")
            .grid(4, 4, GridDirections::Orthogonal)
            .with_player("white")
            .with_player("black")
            .with_dice("d6", 6)
            .with_piece(Piece::new("w", PlayerId::new(0)).with_pattern(Pattern::rays(["north", "east"])))
            .with_piece(Piece::new("b", PlayerId::new(1)))
            .place("w", "a1")
            .place("b", "c1")
            .build()
            .unwrap();
        let engine = GameEngine::new(game, GamePhase::new(1, "idle", StateCondition::Always), EngineConfig::default())
            .unwrap();
        (engine, state)
    }

    fn prepared(engine: &GameEngine, state: &GameState, to: &str) -> MovePieceEvent {
        match engine.prepare_event(state, MovePieceEvent::new("w", "a1", to).into()) {
            GameEvent::Move(e) => e,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_move_and_capture() {
        let (engine, state) = engine();
        let quiet = prepared(&engine, &state, "b1");
        let next = MovePieceMutator::new().mutate(&engine, &state, &quiet).unwrap();
        assert_eq!(next.piece_tile(&PieceId::new("w")), Some(&TileId::new("b1")));
        assert_eq!(state.piece_tile(&PieceId::new("w")), Some(&TileId::new("a1")));

        let attack = prepared(&engine, &state, "c1");
        let err = MovePieceMutator::new().mutate(&engine, &state, &attack).unwrap_err();
        assert!(matches!(err, EngineError::Mutation(_)));

        let next = MovePieceMutator::capturing().mutate(&engine, &state, &attack).unwrap();
        assert!(next.is_captured(&PieceId::new("b")));
        assert_eq!(next.piece_tile(&PieceId::new("w")), Some(&TileId::new("c1")));
    }

    #[test]
    fn test_move_without_path_fails() {
        let (engine, state) = engine();
        let event = MovePieceEvent::new("w", "a1", "b1");
        assert!(MovePieceMutator::new().mutate(&engine, &state, &event).is_err());
    }

    #[test]
    fn test_turn_and_dice_mutators() {
        let (engine, state) = engine();
        let rolled = RollDiceMutator
            .mutate(&engine, &state, &RollDiceEvent::single("d6", 4))
            .unwrap();
        assert_eq!(rolled.dice_value(&DiceId::new("d6")), Some(4));

        let pass = CustomEvent::new("pass");
        let chain: MutatorChain<CustomEvent> = MutatorChain::new()
            .then(ClearDiceMutator::new(["d6"]))
            .then(NextPlayerMutator)
            .then(SetCustomValueMutator::new("turns", 1));
        let next = chain.mutate(&engine, &rolled, &pass).unwrap();
        assert_eq!(next.dice_value(&DiceId::new("d6")), None);
        assert_eq!(next.active_player(), Some(PlayerId::new(1)));
        assert_eq!(next.custom_value(&CustomId::new("turns"), 0), 1);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_null_and_fn_mutators() {
        let (engine, state) = engine();
        let pass = CustomEvent::new("pass");
        let same = NullMutator.mutate(&engine, &state, &pass).unwrap();
        assert!(same.is_same(&state));

        let failing = FnMutator::new("fail", |_: &GameEngine, _: &GameState, _: &CustomEvent| {
            Err(EngineError::Mutation("nope".into()))
        });
        let chain: MutatorChain<CustomEvent> = MutatorChain::new().then(NextPlayerMutator).then(failing);
        assert!(chain.mutate(&engine, &state, &pass).is_err());
    }
}
