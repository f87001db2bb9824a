//! Dense board indexing and `u128` occupancy masks for the sliding fast path.
//!
//! Everything here is derived from a [`Board`] or a [`GameState`] and is never
//! the source of truth. Boards with more than 128 tiles get no services.

use std::ops::{BitAnd, BitOr, Not};

use crate::board::{Board, Game};
use crate::core::{DirectionId, GameState, PieceState, PlayerMap, TileId};

/// Maximum number of tiles a [`Bitboard`] can index.
pub const MAX_TILES: usize = 128;

/// A set of tile indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u128);

impl Bitboard {
    pub const EMPTY: Self = Self(0);

    /// A board with only `index` set.
    #[must_use]
    pub const fn single(index: usize) -> Self {
        Self(1u128 << index)
    }

    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        self.0 & (1u128 << index) != 0
    }

    #[must_use]
    pub const fn with(self, index: usize) -> Self {
        Self(self.0 | (1u128 << index))
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Set indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(index)
        })
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Index-based view of a board: tile and direction indices plus a
/// `[direction][tile]` neighbor table.
#[derive(Clone, Debug)]
pub struct BoardShape {
    tile_count: usize,
    direction_count: usize,
    neighbors: Vec<Option<u8>>,
}

impl BoardShape {
    /// Index a board, `None` if it has more than [`MAX_TILES`] tiles.
    #[must_use]
    pub fn new(board: &Board) -> Option<Self> {
        let tile_count = board.tiles().len();
        if tile_count > MAX_TILES {
            return None;
        }
        let direction_count = board.directions().len();
        let mut neighbors = vec![None; direction_count * tile_count];
        for relation in board.relations() {
            let (Some(from), Some(to), Some(dir)) = (
                board.tile_index(&relation.from),
                board.tile_index(&relation.to),
                board.direction_index(&relation.direction),
            ) else {
                continue;
            };
            neighbors[dir * tile_count + from] = Some(to as u8);
        }
        Some(Self {
            tile_count,
            direction_count,
            neighbors,
        })
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    #[must_use]
    pub fn direction_count(&self) -> usize {
        self.direction_count
    }

    /// Tile reached by stepping `direction` from `tile`.
    #[must_use]
    pub fn neighbor(&self, direction: usize, tile: usize) -> Option<usize> {
        self.neighbors
            .get(direction * self.tile_count + tile)
            .copied()
            .flatten()
            .map(usize::from)
    }
}

/// Empty-board rays: `rays[direction][tile]` holds every tile a slider on
/// `tile` could reach moving in `direction` with nothing in the way.
#[derive(Clone, Debug)]
pub struct AttackRays {
    tile_count: usize,
    rays: Vec<Bitboard>,
}

impl AttackRays {
    #[must_use]
    pub fn new(shape: &BoardShape) -> Self {
        let n = shape.tile_count();
        let mut rays = vec![Bitboard::EMPTY; shape.direction_count() * n];
        for dir in 0..shape.direction_count() {
            for tile in 0..n {
                let mut ray = Bitboard::EMPTY;
                let mut seen = Bitboard::single(tile);
                let mut cur = tile;
                while let Some(next) = shape.neighbor(dir, cur) {
                    if seen.contains(next) {
                        break;
                    }
                    seen = seen.with(next);
                    ray = ray.with(next);
                    cur = next;
                }
                rays[dir * n + tile] = ray;
            }
        }
        Self { tile_count: n, rays }
    }

    #[must_use]
    pub fn ray(&self, direction: usize, tile: usize) -> Bitboard {
        self.rays
            .get(direction * self.tile_count + tile)
            .copied()
            .unwrap_or_default()
    }
}

/// Occupancy masks rebuilt from a state snapshot.
#[derive(Clone, Debug)]
pub struct Occupancy {
    pub all: Bitboard,
    pub by_player: PlayerMap<Bitboard>,
}

impl Occupancy {
    /// Collect every on-board piece. Pieces the game does not define count
    /// toward `all` only.
    #[must_use]
    pub fn from_state(game: &Game, state: &GameState) -> Self {
        let board = game.board();
        let mut all = Bitboard::EMPTY;
        let mut by_player: PlayerMap<Bitboard> = PlayerMap::with_default(game.player_count().max(1));
        for piece in state.get_states::<PieceState>() {
            let Some(index) = board.tile_index(&piece.tile) else {
                continue;
            };
            if index >= MAX_TILES {
                continue;
            }
            all = all.with(index);
            if let Some(mask) = game.owner_of(&piece.piece).and_then(|o| by_player.get_mut(o)) {
                *mask = mask.with(index);
            }
        }
        Self { all, by_player }
    }
}

/// Precomputed services for one board.
#[derive(Clone, Debug)]
pub struct BitboardServices {
    pub shape: BoardShape,
    pub rays: AttackRays,
    tiles: Vec<TileId>,
    directions: Vec<DirectionId>,
}

impl BitboardServices {
    /// `None` when the board is too large for a [`Bitboard`].
    #[must_use]
    pub fn new(board: &Board) -> Option<Self> {
        let shape = BoardShape::new(board)?;
        let rays = AttackRays::new(&shape);
        Some(Self {
            shape,
            rays,
            tiles: board.tiles().to_vec(),
            directions: board.directions().to_vec(),
        })
    }

    #[must_use]
    pub fn tile(&self, index: usize) -> Option<&TileId> {
        self.tiles.get(index)
    }

    #[must_use]
    pub fn direction(&self, index: usize) -> Option<&DirectionId> {
        self.directions.get(index)
    }
}
