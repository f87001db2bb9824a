//! # rust-boards
//!
//! A deterministic, phase-driven rules engine for turn-based board games.
//!
//! ## Design Principles
//!
//! 1. **Immutable State**: every event produces a new [`GameState`] snapshot
//!    sharing structure with the old one (`im::OrdMap`). Nothing is mutated
//!    in place, so any snapshot can be kept, compared or hashed.
//!
//! 2. **Compiled Flow**: the phase tree is flattened once into a
//!    [`DecisionPlan`]. Dispatch is a linear scan with event-kind and
//!    exclusivity-group prefilters.
//!
//! 3. **Layered Paths**: movement paths come from the first of three
//!    resolver tiers that answers. All tiers agree on every path.
//!
//! ## Architecture
//!
//! - **Rejections are values**: a closed phase or an illegal move comes back
//!   as an [`EventResult`] with an [`EventRejectionReason`]. Only a broken
//!   game definition is an error.
//!
//! - **Shared engine**: [`GameEngine`] is `Send + Sync`; each caller owns a
//!   [`GameProgress`] (state + event chain) and advances it independently.
//!
//! ## Modules
//!
//! - `core`: ids, players, state snapshots, event chain, RNG, config, errors
//! - `board`: tiles, directions, relations, pieces, patterns, game builder
//! - `events`: the closed set of game events
//! - `conditions`: state and event conditions, ALL/ANY composites
//! - `rules`: typed event rules, mutators, composite rules
//! - `phases`: the declarative phase tree
//! - `plan`: phase tree compilation and conflict resolution
//! - `paths`: bitboard, compiled and legacy path resolvers, metrics
//! - `engine`: event dispatch and game progress
//! - `games`: small fixture games
//!
//! ```
//! use rust_boards::games::RaceBuilder;
//! use rust_boards::{EngineConfig, GameEvent, RollDiceEvent};
//!
//! let race = RaceBuilder::new().start(EngineConfig::default()).unwrap();
//! let event: GameEvent = RollDiceEvent::single("d6", 4).into();
//! let next = race.handle_event(&event).unwrap();
//! assert_eq!(next.events().len(), 1);
//! ```

pub mod core;
pub mod board;
pub mod events;
pub mod conditions;
pub mod rules;
pub mod phases;
pub mod plan;
pub mod paths;
pub mod engine;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    ArtifactId, ArtifactState, BuildError, CustomId, DiceId, DirectionId, EngineConfig, EngineError, EventChain,
    EventRejectionReason, ExclusivityGroup, GameRng, GameRngState, GameState, PieceId, PlayerId, PlayerMap, TileId,
};

pub use crate::board::{Board, Game, GameBuilder, GridDirections, Pattern, Piece};

pub use crate::events::{CustomEvent, EventKind, GameEvent, MovePieceEvent, RollDiceEvent, TypedEvent};

pub use crate::conditions::{
    CompositeMode, ConditionResponse, ConditionResult, EventCondition, GameStateCondition, StateCondition,
};

pub use crate::rules::{CompositeRule, EventMutator, GameEventRule, Rule};

pub use crate::phases::{ConflictResolutionStrategy, GamePhase, Priority};

pub use crate::plan::{ConflictError, DecisionPlan, PlanSummary};

pub use crate::paths::{PathMetricsSnapshot, PathResolver, ResolverChain, ResolverTier, TilePath};

pub use crate::engine::{EventResult, GameEngine, GameProgress};
