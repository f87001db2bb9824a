//! Small ready-made games for tests, benches and docs.
//!
//! - [`race`]: players roll a die and move their runner that many tiles
//!   along their own lane.
//! - [`sliders`]: an 8x8 board with rooks, bishops, queens, knights and
//!   kings that capture by displacement.

pub mod race;
pub mod sliders;

pub use race::RaceBuilder;
pub use sliders::SlidersBuilder;
