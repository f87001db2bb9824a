//! Core engine types: ids, players, state, event history, RNG, configuration, errors.
//!
//! Everything here is game-agnostic. Games describe themselves through
//! [`board::GameBuilder`](crate::board::GameBuilder) and phase trees rather than
//! by extending these types.

pub mod chain;
pub mod config;
pub mod error;
pub mod ids;
pub mod player;
pub mod rng;
pub mod state;

pub use chain::{EventChain, EventChainIter};
pub use config::EngineConfig;
pub use error::{BuildError, EngineError, EventRejectionReason};
pub use ids::{ArtifactId, BoardId, CustomId, DiceId, DirectionId, ExclusivityGroup, PieceId, TileId};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{
    ActivePlayerState, ArtifactState, CapturedPieceState, CustomState, DiceState, GameState,
    PieceState, StateKind,
};
