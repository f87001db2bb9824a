//! The three resolver tiers agree, and metrics account for every attempt.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use rust_boards::board::{grid_tile_name, Game, GameBuilder, Pattern, Piece, TileRelation};
use rust_boards::core::{EngineConfig, GameState, PlayerId, TileId};
use rust_boards::games::sliders::{piece_id, PieceKind, SlidersBuilder};
use rust_boards::paths::{
    CompiledPatternResolver, LegacyPatternResolver, PathResolver, ResolutionOutcome, ResolverChain, SkipReason,
    SlidingFastPath, TierOutcome,
};

/// A board with the placements' tiles deduplicated (first one wins).
fn board(placements: &[(usize, u8, usize)]) -> (Arc<Game>, GameState, PieceKind, PlayerId) {
    let mut used = HashSet::new();
    let mut builder = SlidersBuilder::new();
    let mut mover = None;
    for &(kind, owner, tile) in placements {
        if !used.insert(tile) {
            continue;
        }
        let kind = PieceKind::ALL[kind];
        let owner = PlayerId::new(owner);
        mover.get_or_insert((kind, owner));
        builder = builder.with(kind, owner, grid_tile_name(tile % 8, tile / 8));
    }
    let (game, state) = builder.build().unwrap();
    let (kind, owner) = mover.unwrap();
    (Arc::new(game), state, kind, owner)
}

fn placement_strategy() -> impl Strategy<Value = Vec<(usize, u8, usize)>> {
    prop::collection::vec((0..PieceKind::ALL.len(), 0..2u8, 0..64usize), 1..16)
}

const DIRECTIONS: [&str; 3] = ["d0", "d1", "d2"];

fn tile(index: usize) -> TileId {
    TileId::new(format!("t{index}"))
}

/// An arbitrary directed graph: `links[tile * 3 + d]` is the relation leaving
/// `tile` in direction `d`, with its distance. Cycles and self loops allowed.
#[derive(Clone, Debug)]
struct Graph {
    tiles: usize,
    links: Vec<Option<(usize, u32)>>,
    blockers: Vec<(usize, u8)>,
    slider: bool,
    from: usize,
    to: usize,
}

fn graph_strategy() -> impl Strategy<Value = Graph> {
    (3..10usize).prop_flat_map(|tiles| {
        (
            prop::collection::vec(prop::option::weighted(0.8, (0..tiles, 1..5u32)), tiles * DIRECTIONS.len()),
            prop::collection::vec((0..tiles, 0..2u8), 0..4),
            any::<bool>(),
            0..tiles,
            0..tiles,
        )
            .prop_map(move |(links, blockers, slider, from, to)| Graph {
                tiles,
                links,
                blockers,
                slider,
                from,
                to,
            })
    })
}

fn mover(slider: bool) -> Piece {
    let piece = Piece::new("mover", PlayerId::new(0));
    if slider {
        piece.with_patterns([Pattern::rays(["d2", "d0", "d1"]), Pattern::ray("d1")])
    } else {
        piece.with_patterns([
            Pattern::step("d0"),
            Pattern::fixed(["d1", "d2"]),
            Pattern::ray("d2"),
            Pattern::steps_any(["d1", "d0"]),
        ])
    }
}

fn build_graph(case: &Graph) -> (Arc<Game>, GameState) {
    let mut builder = GameBuilder::new("graph").with_player("white").with_player("black");
    for index in 0..case.tiles {
        builder = builder.with_tile(tile(index));
    }
    for direction in DIRECTIONS {
        builder = builder.with_direction(direction);
    }
    for (slot, link) in case.links.iter().enumerate() {
        if let Some((to, distance)) = *link {
            let relation = TileRelation::new(tile(slot / DIRECTIONS.len()), DIRECTIONS[slot % DIRECTIONS.len()], tile(to));
            builder = builder.with_tile_relation(relation.with_distance(distance));
        }
    }
    builder = builder.with_piece(mover(case.slider)).place("mover", tile(case.from));

    let mut used = HashSet::from([case.from]);
    for (i, &(at, owner)) in case.blockers.iter().enumerate() {
        if !used.insert(at) {
            continue;
        }
        let id = format!("blocker-{i}");
        builder = builder
            .with_piece(Piece::new(id.as_str(), PlayerId::new(owner)))
            .place(id.as_str(), tile(at));
    }
    let (game, state) = builder.build().unwrap();
    (Arc::new(game), state)
}

/// Asks every tier directly and checks they give the same answer.
fn assert_tiers_agree(game: &Arc<Game>, state: &GameState, piece: &Piece, from: &TileId, to: &TileId) -> Result<(), TestCaseError> {
    let legacy = LegacyPatternResolver::new(Arc::clone(game))
        .try_resolve(piece, from, to, state)
        .into_path();
    let compiled = CompiledPatternResolver::new(Arc::clone(game))
        .try_resolve(piece, from, to, state)
        .into_path();
    prop_assert_eq!(&compiled, &legacy);

    match SlidingFastPath::new(Arc::clone(game)).try_resolve(piece, from, to, state) {
        TierOutcome::Resolved(path) => prop_assert_eq!(Some(path), legacy.clone()),
        TierOutcome::Skipped(SkipReason::RayMiss) | TierOutcome::NotFound => prop_assert_eq!(legacy.clone(), None),
        TierOutcome::Skipped(SkipReason::NotSlider) => prop_assert!(!piece.is_slider()),
        TierOutcome::Skipped(reason) => prop_assert!(false, "unexpected skip {:?}", reason),
    }

    let full = ResolverChain::for_game(Arc::clone(game), &EngineConfig::default());
    prop_assert_eq!(full.resolve(piece, from, to, state), legacy);
    Ok(())
}

proptest! {
    /// Compiled and legacy tiers always agree; the fast path agrees whenever
    /// it answers.
    #[test]
    fn prop_tiers_agree(placements in placement_strategy(), target in 0..64usize) {
        let (game, state, kind, owner) = board(&placements);
        let id = piece_id(owner, kind, 0);
        let piece = game.piece(&id).unwrap().clone();
        let from = state.piece_tile(&id).unwrap().clone();
        let to = TileId::new(grid_tile_name(target % 8, target / 8));

        assert_tiers_agree(&game, &state, &piece, &from, &to)?;
    }

    /// Weighted, cyclic graphs where several directions can reach the same
    /// tile: every tier still picks the same path.
    #[test]
    fn prop_tiers_agree_on_weighted_graphs(case in graph_strategy()) {
        let (game, state) = build_graph(&case);
        let piece = game.piece(&"mover".into()).unwrap().clone();
        assert_tiers_agree(&game, &state, &piece, &tile(case.from), &tile(case.to))?;
    }

    /// Every chain configuration returns the same path.
    #[test]
    fn prop_chain_configurations_agree(placements in placement_strategy(), target in 0..64usize) {
        let (game, state, kind, owner) = board(&placements);
        let id = piece_id(owner, kind, 0);
        let piece = game.piece(&id).unwrap();
        let from = state.piece_tile(&id).unwrap();
        let to = TileId::new(grid_tile_name(target % 8, target / 8));

        let full = ResolverChain::for_game(Arc::clone(&game), &EngineConfig::default());
        let no_fast = ResolverChain::for_game(
            Arc::clone(&game),
            &EngineConfig::default().with_sliding_fast_path(false),
        );
        let legacy = ResolverChain::for_game(Arc::clone(&game), &EngineConfig::legacy_only());

        let expected = legacy.resolve(piece, from, &to, &state);
        prop_assert_eq!(full.resolve(piece, from, &to, &state), expected.clone());
        prop_assert_eq!(no_fast.resolve(piece, from, &to, &state), expected.clone());

        // Resolution is idempotent.
        prop_assert_eq!(full.resolve(piece, from, &to, &state), expected);
    }

    /// `attempts == hits + skips` after any sequence of resolutions.
    #[test]
    fn prop_metrics_conserved(placements in placement_strategy(), targets in prop::collection::vec(0..64usize, 1..32)) {
        let (game, state, _, _) = board(&placements);
        let chain = ResolverChain::for_game(Arc::clone(&game), &EngineConfig::default());
        for (i, target) in targets.iter().enumerate() {
            let piece = &game.pieces()[i % game.pieces().len()];
            let Some(from) = state.piece_tile(&piece.id) else { continue };
            let to = TileId::new(grid_tile_name(target % 8, target / 8));
            let _ = chain.resolve(piece, from, &to, &state);
        }
        let snapshot = chain.metrics_snapshot().unwrap();
        prop_assert_eq!(snapshot.attempts, targets.len() as u64);
        prop_assert!(snapshot.is_conserved());
    }
}

#[test]
fn test_terminal_outcomes() {
    let (game, state) = SlidersBuilder::standard().build().unwrap();
    let game = Arc::new(game);
    let chain = ResolverChain::for_game(Arc::clone(&game), &EngineConfig::default());
    let resolve = |owner: u8, kind: PieceKind, to: &str| {
        let id = piece_id(PlayerId::new(owner), kind, 0);
        let piece = game.piece(&id).unwrap();
        let from = state.piece_tile(&id).unwrap();
        chain.resolve_traced(piece, from, &TileId::new(to), &state).1
    };

    assert_eq!(resolve(0, PieceKind::Rook, "a5"), ResolutionOutcome::FastPathHit);
    assert_eq!(resolve(0, PieceKind::Knight, "c3"), ResolutionOutcome::CompiledHit);
    // Blocked by the own knight on b1.
    assert_eq!(
        resolve(0, PieceKind::Rook, "c1"),
        ResolutionOutcome::Skipped(SkipReason::RayMiss)
    );
    assert_eq!(
        resolve(0, PieceKind::King, "e5"),
        ResolutionOutcome::Skipped(SkipReason::NotSlider)
    );

    let snapshot = chain.metrics_snapshot().unwrap();
    assert_eq!(snapshot.attempts, 4);
    assert_eq!(snapshot.fast_path_hits, 1);
    assert_eq!(snapshot.compiled_hits, 1);
    assert_eq!(snapshot.skipped_ray_miss, 1);
    assert_eq!(snapshot.skipped_not_slider, 1);
    assert!(snapshot.is_conserved());

    let legacy = ResolverChain::for_game(Arc::clone(&game), &EngineConfig::legacy_only());
    let id = piece_id(PlayerId::new(0), PieceKind::Knight, 0);
    let outcome = legacy
        .resolve_traced(game.piece(&id).unwrap(), state.piece_tile(&id).unwrap(), &TileId::new("c3"), &state)
        .1;
    assert_eq!(outcome, ResolutionOutcome::LegacyHit);
}

#[test]
fn test_equal_weight_rays_keep_declaration_order() {
    // s -d0-> m -d0-> t costs 2 + 2; s -d1-> t costs 4; s -d2-> u -d2-> t costs 5.
    let (game, state) = GameBuilder::new("fork")
        .with_tile("s")
        .with_tile("m")
        .with_tile("t")
        .with_tile("u")
        .with_direction("d0")
        .with_direction("d1")
        .with_direction("d2")
        .with_tile_relation(TileRelation::new("s", "d0", "m").with_distance(2))
        .with_tile_relation(TileRelation::new("m", "d0", "t").with_distance(2))
        .with_tile_relation(TileRelation::new("s", "d1", "t").with_distance(4))
        .with_tile_relation(TileRelation::new("s", "d2", "u").with_distance(4))
        .with_tile_relation(TileRelation::new("u", "d2", "t"))
        .with_relation("t", "d0", "s")
        .with_player("solo")
        .with_piece(Piece::new("p0", PlayerId::new(0)).with_pattern(Pattern::rays(["d0", "d1", "d2"])))
        .with_piece(Piece::new("p1", PlayerId::new(0)).with_pattern(Pattern::rays(["d1", "d0", "d2"])))
        .with_piece(Piece::new("p2", PlayerId::new(0)).with_pattern(Pattern::rays(["d2", "d0", "d1"])))
        .place("p0", "s")
        .place("p1", "s")
        .place("p2", "s")
        .build()
        .unwrap();
    let game = Arc::new(game);
    let (from, to) = (TileId::new("s"), TileId::new("t"));

    for (id, steps) in [("p0", 2), ("p1", 1), ("p2", 2)] {
        let piece = game.piece(&id.into()).unwrap();
        for config in [EngineConfig::default(), EngineConfig::default().with_sliding_fast_path(false), EngineConfig::legacy_only()] {
            let chain = ResolverChain::for_game(Arc::clone(&game), &config);
            let path = chain.resolve(piece, &from, &to, &state).unwrap();
            assert_eq!(path.distance(), 4, "{id}");
            assert_eq!(path.len(), steps, "{id}");
        }
    }
}

#[test]
fn test_metrics_disabled() {
    let (game, _) = SlidersBuilder::standard().build().unwrap();
    let chain = ResolverChain::for_game(Arc::new(game), &EngineConfig::default().with_path_metrics(false));
    assert!(chain.metrics_snapshot().is_none());
}
