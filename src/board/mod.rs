//! Game definitions: board topology, movement patterns, pieces, dice.
//!
//! A [`Game`] is built once with [`GameBuilder`] and shared read-only by every
//! engine and resolver that plays on it.

mod builder;
mod game;
mod pattern;
mod topology;

pub use builder::GameBuilder;
pub use game::{Dice, Game, Piece};
pub use pattern::{Pattern, PatternVisitor};
pub use topology::{grid_tile_name, Board, GridDirections, TileRelation};
