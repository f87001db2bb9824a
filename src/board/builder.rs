//! Assembles a [`Game`] and its initial [`GameState`].

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::core::{
    ArtifactState, BoardId, BuildError, CustomId, DiceId, DirectionId, GameState, PieceId, Player,
    PlayerId, TileId,
};

use super::game::{Dice, Game, Piece};
use super::topology::{grid_tile_name, Board, GridDirections, TileRelation};

/// Builder for a game definition.
///
/// ```
/// use rust_boards::board::{GameBuilder, GridDirections, Pattern, Piece};
/// use rust_boards::core::{PlayerId, TileId, PieceId};
///
/// let (game, state) = GameBuilder::new("demo")
///     .grid(3, 3, GridDirections::Orthogonal)
///     .with_player("white")
///     .with_player("black")
///     .with_piece(Piece::new("rook", PlayerId::new(0)).with_pattern(Pattern::rays(["north", "east"])))
///     .place("rook", "a1")
///     .build()
///     .unwrap();
///
/// assert_eq!(game.board().tiles().len(), 9);
/// assert_eq!(state.piece_tile(&PieceId::new("rook")), Some(&TileId::new("a1")));
/// assert_eq!(state.active_player(), Some(PlayerId::new(0)));
/// ```
#[derive(Clone, Debug)]
pub struct GameBuilder {
    board_id: BoardId,
    tiles: Vec<TileId>,
    directions: Vec<DirectionId>,
    relations: Vec<TileRelation>,
    players: Vec<String>,
    pieces: Vec<Piece>,
    dice: Vec<Dice>,
    placements: Vec<(PieceId, TileId)>,
    custom: Vec<(CustomId, i64)>,
    starting_player: PlayerId,
    grid_error: Option<BuildError>,
}

impl GameBuilder {
    /// Start a game on a board named `board_id`.
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
            tiles: Vec::new(),
            directions: Vec::new(),
            relations: Vec::new(),
            players: Vec::new(),
            pieces: Vec::new(),
            dice: Vec::new(),
            placements: Vec::new(),
            custom: Vec::new(),
            starting_player: PlayerId::new(0),
            grid_error: None,
        }
    }

    #[must_use]
    pub fn with_tile(mut self, tile: impl Into<TileId>) -> Self {
        self.tiles.push(tile.into());
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: impl Into<DirectionId>) -> Self {
        let direction = direction.into();
        if !self.directions.contains(&direction) {
            self.directions.push(direction);
        }
        self
    }

    /// Add a unit-distance relation.
    #[must_use]
    pub fn with_relation(
        self,
        from: impl Into<TileId>,
        direction: impl Into<DirectionId>,
        to: impl Into<TileId>,
    ) -> Self {
        self.with_tile_relation(TileRelation::new(from, direction, to))
    }

    #[must_use]
    pub fn with_tile_relation(mut self, relation: TileRelation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Add a `width` x `height` grid of tiles (`a1` is the south-west corner)
    /// with relations in the requested directions.
    ///
    /// An empty grid is reported by [`build`](Self::build).
    #[must_use]
    pub fn grid(mut self, width: usize, height: usize, directions: GridDirections) -> Self {
        if width == 0 || height == 0 || width > 26 {
            self.grid_error.get_or_insert(BuildError::InvalidGrid { width, height });
            return self;
        }

        for y in 0..height {
            for x in 0..width {
                self.tiles.push(TileId::new(grid_tile_name(x, y)));
            }
        }
        for &(name, _, _) in directions.offsets() {
            self = self.with_direction(name);
        }
        for y in 0..height {
            for x in 0..width {
                for &(name, dx, dy) in directions.offsets() {
                    let nx = x as i64 + i64::from(dx);
                    let ny = y as i64 + i64::from(dy);
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        continue;
                    }
                    self.relations.push(TileRelation::new(
                        grid_tile_name(x, y),
                        name,
                        grid_tile_name(nx as usize, ny as usize),
                    ));
                }
            }
        }
        self
    }

    #[must_use]
    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.players.push(name.into());
        self
    }

    #[must_use]
    pub fn with_piece(mut self, piece: Piece) -> Self {
        self.pieces.push(piece);
        self
    }

    #[must_use]
    pub fn with_dice(mut self, id: impl Into<DiceId>, sides: u32) -> Self {
        self.dice.push(Dice::new(id, sides));
        self
    }

    /// Put a piece on its starting tile.
    #[must_use]
    pub fn place(mut self, piece: impl Into<PieceId>, tile: impl Into<TileId>) -> Self {
        self.placements.push((piece.into(), tile.into()));
        self
    }

    /// Seed a custom value in the initial state.
    #[must_use]
    pub fn with_custom_value(mut self, key: impl Into<CustomId>, value: i64) -> Self {
        self.custom.push((key.into(), value));
        self
    }

    /// Player holding the first turn (defaults to player 0).
    #[must_use]
    pub fn starting_player(mut self, player: PlayerId) -> Self {
        self.starting_player = player;
        self
    }

    /// Validate and produce the game plus its initial state.
    pub fn build(self) -> Result<(Game, GameState), BuildError> {
        if let Some(err) = self.grid_error {
            return Err(err);
        }
        if self.players.is_empty() {
            return Err(BuildError::NoPlayers);
        }
        if self.players.len() > 255 {
            return Err(BuildError::TooManyPlayers(self.players.len()));
        }
        let player_count = self.players.len();

        let board = Board::new(self.board_id, self.tiles, self.directions, self.relations)?;

        let mut piece_ids = FxHashSet::default();
        for piece in &self.pieces {
            if !piece_ids.insert(piece.id.clone()) {
                return Err(BuildError::duplicate("piece", piece.id.as_str()));
            }
            if piece.owner.index() >= player_count {
                return Err(BuildError::unknown("player", piece.owner));
            }
            if let Some(direction) = piece
                .patterns
                .iter()
                .flat_map(|p| p.directions())
                .find(|d| !board.contains_direction(d))
            {
                return Err(BuildError::unknown("direction", direction.as_str()));
            }
        }

        let mut dice_ids = FxHashSet::default();
        for die in &self.dice {
            if !dice_ids.insert(die.id.clone()) {
                return Err(BuildError::duplicate("dice", die.id.as_str()));
            }
        }

        if self.starting_player.index() >= player_count {
            return Err(BuildError::unknown("player", self.starting_player));
        }

        let mut placed = FxHashSet::default();
        let mut states = Vec::with_capacity(self.placements.len() + self.dice.len() + player_count);
        for (piece, tile) in &self.placements {
            if !piece_ids.contains(piece) {
                return Err(BuildError::unknown("piece", piece.as_str()));
            }
            if !board.contains_tile(tile) {
                return Err(BuildError::unknown("tile", tile.as_str()));
            }
            if !placed.insert(piece.clone()) {
                return Err(BuildError::duplicate("placement", piece.as_str()));
            }
            states.push(ArtifactState::piece(piece.clone(), tile.clone()));
        }
        if let Some(piece) = self.pieces.iter().find(|p| !placed.contains(&p.id)) {
            return Err(BuildError::Unplaced(piece.id.as_str().to_string()));
        }

        states.extend(self.dice.iter().map(|d| ArtifactState::dice(d.id.clone(), None)));
        states.extend(
            PlayerId::all(player_count)
                .map(|p| ArtifactState::active_player(p, p == self.starting_player)),
        );
        states.extend(
            self.custom
                .into_iter()
                .map(|(key, value)| ArtifactState::custom(key, value)),
        );

        let players = self
            .players
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(PlayerId::new(i as u8), name))
            .collect();
        let game = Game::from_parts(board, players, self.pieces, self.dice);
        let state = GameState::new(states);

        debug!(
            board = %game.board().id(),
            tiles = game.board().tiles().len(),
            pieces = game.pieces().len(),
            players = game.player_count(),
            "built game"
        );

        Ok((game, state))
    }
}
