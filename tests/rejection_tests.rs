//! Mapping of refused events to rejection reasons.

use rust_boards::board::TileRelation;
use rust_boards::core::{DiceId, EngineConfig, EventRejectionReason, PieceId, PlayerId, TileId};
use rust_boards::events::{CustomEvent, MovePieceEvent, RollDiceEvent};
use rust_boards::games::race::{runner, DIE};
use rust_boards::games::RaceBuilder;
use rust_boards::paths::TilePath;
use rust_boards::{GameEvent, GameProgress};

fn rolled(value: u32) -> GameProgress {
    RaceBuilder::new()
        .start(EngineConfig::default())
        .unwrap()
        .handle_event(&RollDiceEvent::single(DIE, value).into())
        .unwrap()
}

fn white() -> PieceId {
    runner(PlayerId::new(0))
}

#[test]
fn test_wrong_from_tile_is_invalid_ownership() {
    let game = rolled(2);
    let event: GameEvent = MovePieceEvent::new(white(), "b1", "d1").into();
    let result = game.handle_event_result(&event).unwrap();
    assert!(!result.applied);
    assert_eq!(result.reason, EventRejectionReason::InvalidOwnership);
    assert!(result.state.is_same(game.state()));
}

#[test]
fn test_no_open_phase_is_phase_closed() {
    let game = RaceBuilder::new().start(EngineConfig::default()).unwrap();
    let event: GameEvent = CustomEvent::new("pass").into();
    let result = game.handle_event_result(&event).unwrap();
    assert_eq!(result.reason, EventRejectionReason::PhaseClosed);

    // Benign through the progress API: same snapshot back.
    let same = game.handle_event(&event).unwrap();
    assert!(same.state().is_same(game.state()));
    assert!(same.events().is_empty());
}

#[test]
fn test_distance_mismatch_is_path_not_found() {
    let game = rolled(4);
    let event: GameEvent = MovePieceEvent::new(white(), "a1", "c1").into();
    let result = game.handle_event_result(&event).unwrap();
    assert_eq!(result.reason, EventRejectionReason::PathNotFound);
    assert!(result.message.unwrap().contains("distance 2"));

    let err = game.handle_event(&event).unwrap_err();
    assert_eq!(err.rejection_reason(), Some(EventRejectionReason::PathNotFound));
    assert!(!err.is_fatal());
}

#[test]
fn test_unreachable_target_is_path_not_found() {
    let game = rolled(1);
    // Lanes never connect: a1 cannot reach a2 moving east.
    let event: GameEvent = MovePieceEvent::new(white(), "a1", "a2").into();
    let result = game.handle_event_result(&event).unwrap();
    assert_eq!(result.reason, EventRejectionReason::PathNotFound);
}

#[test]
fn test_attached_path_cannot_leave_the_board() {
    let game = rolled(2);
    // c2 is in the other lane; no relation leads there from a1.
    let warp = TilePath::new([TileRelation::new("a1", "warp", "c2").with_distance(2)]).unwrap();
    let event: GameEvent = MovePieceEvent::new(white(), "a1", "c2").with_path(warp).into();
    let result = game.handle_event_result(&event).unwrap();
    assert!(!result.applied);
    assert_eq!(result.reason, EventRejectionReason::PathNotFound);
    assert_eq!(result.state.piece_tile(&white()), Some(&TileId::new("a1")));
}

#[test]
fn test_attached_path_is_replaced_by_resolved_one() {
    let game = rolled(2);
    // Claims distance 2 for a three-step move; the board says 3.
    let short = TilePath::new([TileRelation::new("a1", "east", "d1").with_distance(2)]).unwrap();
    let event: GameEvent = MovePieceEvent::new(white(), "a1", "d1").with_path(short).into();
    let result = game.handle_event_result(&event).unwrap();
    assert_eq!(result.reason, EventRejectionReason::PathNotFound);

    // A legal move is recorded with the board's own path.
    let bogus = TilePath::new([TileRelation::new("a1", "warp", "c1").with_distance(2)]).unwrap();
    let event: GameEvent = MovePieceEvent::new(white(), "a1", "c1").with_path(bogus).into();
    let next = game.handle_event(&event).unwrap();
    let Some(GameEvent::Move(recorded)) = next.events().last() else {
        panic!("expected the move to be recorded");
    };
    let path = recorded.path.as_ref().unwrap();
    assert_eq!(path.len(), 2);
    assert!(path.relations().iter().all(|r| r.direction.as_str() == "east"));
}

#[test]
fn test_closed_move_phase_resolves_no_path() {
    let game = RaceBuilder::new().start(EngineConfig::default()).unwrap();
    let event: GameEvent = MovePieceEvent::new(white(), "a1", "c1").into();
    let result = game.handle_event_result(&event).unwrap();
    assert_eq!(result.reason, EventRejectionReason::PhaseClosed);
    assert_eq!(game.engine().path_metrics().unwrap().attempts, 0);

    let game = rolled(2);
    game.handle_event_result(&event).unwrap();
    assert_eq!(game.engine().path_metrics().unwrap().attempts, 1);
}

#[test]
fn test_bad_die_face_is_invalid_event() {
    let game = RaceBuilder::new().start(EngineConfig::default()).unwrap();
    let result = game
        .handle_event_result(&RollDiceEvent::single(DIE, 0).into())
        .unwrap();
    assert_eq!(result.reason, EventRejectionReason::InvalidEvent);
    assert_eq!(result.state.dice_value(&DiceId::new(DIE)), None);
}

#[test]
fn test_rejections_leave_inputs_untouched() {
    let game = rolled(3);
    let before_hash = game.state().state_hash().unwrap();
    let before_events = game.events().len();

    for event in [
        GameEvent::from(MovePieceEvent::new(white(), "a1", "b1")),
        GameEvent::from(MovePieceEvent::new(runner(PlayerId::new(1)), "a2", "d2")),
        GameEvent::from(RollDiceEvent::single(DIE, 5)),
    ] {
        let result = game.handle_event_result(&event).unwrap();
        assert!(!result.applied, "{event:?} should be refused");
    }

    assert_eq!(game.state().state_hash().unwrap(), before_hash);
    assert_eq!(game.events().len(), before_events);
    assert_eq!(game.state().piece_tile(&white()), Some(&TileId::new("a1")));
}

#[test]
fn test_identical_inputs_identical_results() {
    let game = rolled(2);
    let event: GameEvent = MovePieceEvent::new(white(), "a1", "c1").into();
    let first = game.handle_event_result(&event).unwrap();
    let second = game.handle_event_result(&event).unwrap();
    assert_eq!(first, second);
    assert!(first.applied);
}
