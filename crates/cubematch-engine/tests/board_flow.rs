//! End-to-end checks against the crate's public surface.

use cubematch_engine::{Board, BoardConfig, BoardEvent, BoardPhase, BoardSeed, Coord};

fn config() -> BoardConfig {
    BoardConfig {
        extents: Coord::new(4, 4, 4),
        min_match_size: 3,
        num_kinds: 7,
        num_colours: 7,
    }
}

#[test]
fn test_swap_cycle_returns_to_idle() {
    let mut board = Board::new(config(), BoardSeed::from_bytes([21; 16])).unwrap();
    assert_eq!(board.phase(), BoardPhase::Idle);
    assert!(board.grid().is_well_formed());

    assert!(board.select(Coord::new(0, 0, 0)).unwrap().is_empty());
    let events = board.select(Coord::new(1, 0, 0)).unwrap();
    assert!(matches!(events.as_slice(), [BoardEvent::Swapped { .. }]));

    board.run_to_idle().unwrap();
    assert_eq!(board.phase(), BoardPhase::Idle);
    assert!(board.grid().is_well_formed());
}

#[test]
fn test_saved_board_restores_through_public_api() {
    let board = Board::new(config(), BoardSeed::from_bytes([22; 16])).unwrap();
    let revived = Board::restore(config(), board.saved()).unwrap();
    assert_eq!(revived.grid(), board.grid());
}
