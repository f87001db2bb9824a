//! Seats at the table.
//!
//! A [`PlayerId`] is a dense `u8` index and turn order is index order, so
//! "next player" is modular arithmetic. [`PlayerMap`] stores one value per
//! seat; the bitboard resolver keeps an occupancy mask per owner in one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Zero-based seat index. A game has between 1 and 255 players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    /// Seat index as a `usize`, for slice access.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that moves after this one in a game of `player_count`.
    ///
    /// ```
    /// use rust_boards::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        let seats = player_count.clamp(1, u8::MAX as usize);
        Self(((self.index() + 1) % seats) as u8)
    }

    /// Every seat of a `player_count` game, in turn order.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        let seats = player_count.min(u8::MAX as usize) as u8;
        (0..seats).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A participant: seat plus display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// One `T` per seat, indexed by [`PlayerId`].
///
/// Indexing with a seat outside the map panics like slice indexing does;
/// [`get`](Self::get) is the checked form.
///
/// ```
/// use rust_boards::core::{PlayerId, PlayerMap};
///
/// let mut captured: PlayerMap<u32> = PlayerMap::filled(2, 0);
/// captured[PlayerId::new(1)] += 3;
/// assert_eq!(captured[PlayerId::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build a map by calling `init` for every seat of a `player_count` game.
    pub fn new(player_count: usize, init: impl FnMut(PlayerId) -> T) -> Self {
        debug_assert!((1..=255).contains(&player_count), "player count out of range");
        Self {
            seats: PlayerId::all(player_count).map(init).collect(),
        }
    }

    /// Every seat starts with a clone of `value`.
    pub fn filled(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            seats: vec![value; player_count.min(u8::MAX as usize)],
        }
    }

    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.seats.get(player.index())
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.seats.get_mut(player.index())
    }

    /// Seats and their values, in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }
}
