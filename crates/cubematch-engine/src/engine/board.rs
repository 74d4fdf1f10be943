use serde::{Deserialize, Serialize};

use crate::{
    InvalidConfiguration, OutOfBounds, UnreachableTermination,
    core::{
        coord::Coord,
        grid::BoardGrid,
        matching::MatchSet,
        piece::Piece,
    },
};

use super::{
    generator::{self, BoardConfig, BoardSeed},
    gravity::{self, PieceMove},
    topology::{Orientation, Topology},
};

/// The phase the board is currently in.
///
/// Input is accepted only while `Idle`; the remaining phases cycle
/// `Swapping → Checking → (Dropping → Checking)* → Idle` as the consumer
/// reports each phase's visual playback finished via [`Board::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BoardPhase {
    Idle,
    Swapping,
    Checking,
    Dropping,
}

/// Observable outcome of a phase, carrying what the presentation layer needs
/// to animate. The logical state change has already happened when the event
/// is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Two pieces exchanged grid positions.
    Swapped { a: Coord, b: Coord },
    /// A qualifying match was cleared; `cells` lists every removed cell.
    MatchRemoved { piece: Piece, cells: Vec<Coord> },
    /// A gravity pass moved the listed pieces.
    PiecesDropped { moves: Vec<PieceMove> },
}

/// Serializable board state: the dense grid plus the orientation bit is all
/// that is needed to restore a board mid-session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBoard {
    pub grid: BoardGrid,
    pub orientation: Orientation,
}

/// The simulation core's single entry point.
///
/// Owns the grid, the face topology, and the phase machine; everything the
/// outside world does goes through [`select`](Self::select) and
/// [`advance`](Self::advance).
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    grid: BoardGrid,
    topology: Topology,
    phase: BoardPhase,
    selection: Vec<Coord>,
    pending_swap: Option<(Coord, Coord)>,
    drop_progress: bool,
}

impl Board {
    /// Generates a fresh board with no initial matches.
    pub fn new(config: BoardConfig, seed: BoardSeed) -> Result<Self, InvalidConfiguration> {
        let grid = generator::generate_board(&config, seed)?;
        let topology = Topology::new(config.extents);
        Ok(Self::from_parts(config, grid, topology))
    }

    /// Restores a board from saved state. The saved grid must agree with the
    /// configured extents and satisfy the face-cell population invariant.
    pub fn restore(config: BoardConfig, saved: SavedBoard) -> Result<Self, InvalidConfiguration> {
        config.validate()?;
        if saved.grid.extents() != config.extents {
            return Err(InvalidConfiguration::SavedExtents {
                saved: saved.grid.extents(),
                configured: config.extents,
            });
        }
        if !saved.grid.is_well_formed() {
            return Err(InvalidConfiguration::SavedGrid);
        }
        let topology = Topology::with_orientation(config.extents, saved.orientation);
        Ok(Self::from_parts(config, saved.grid, topology))
    }

    fn from_parts(config: BoardConfig, grid: BoardGrid, topology: Topology) -> Self {
        Self {
            config,
            grid,
            topology,
            phase: BoardPhase::Idle,
            selection: Vec::new(),
            pending_swap: None,
            drop_progress: true,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> BoardPhase {
        self.phase
    }

    #[must_use]
    pub const fn grid(&self) -> &BoardGrid {
        &self.grid
    }

    #[must_use]
    pub const fn topology(&self) -> &Topology {
        &self.topology
    }

    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> &[Coord] {
        &self.selection
    }

    /// The current state for persistence.
    #[must_use]
    pub fn saved(&self) -> SavedBoard {
        SavedBoard {
            grid: self.grid.clone(),
            orientation: self.topology.orientation(),
        }
    }

    /// Handles a piece being picked (touched) by the player.
    ///
    /// Ignored outside the `Idle` phase. Picking a cell whose piece was
    /// cleared by a stalled cascade is also ignored: only actual pieces can
    /// be swapped. Re-picking the buffered cell is a no-op; picking a
    /// non-adjacent cell restarts the selection with it; picking a cell
    /// adjacent to the buffered one performs the swap immediately and enters
    /// `Swapping`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the coordinate is outside the grid or not a
    /// populated face cell; the board state is left unchanged.
    pub fn select(&mut self, coord: Coord) -> Result<Vec<BoardEvent>, OutOfBounds> {
        if !self.phase.is_idle() {
            return Ok(Vec::new());
        }
        let Some(piece) = self.grid.piece_at(coord) else {
            return Err(OutOfBounds { coord });
        };
        if piece.is_empty() {
            return Ok(Vec::new());
        }
        if self.selection.contains(&coord) {
            return Ok(Vec::new());
        }
        match self.selection.first().copied() {
            Some(first) if first.is_adjacent(coord) => {
                self.selection.clear();
                Ok(self.begin_swap(first, coord))
            }
            Some(_) => {
                self.selection.clear();
                self.selection.push(coord);
                Ok(Vec::new())
            }
            None => {
                self.selection.push(coord);
                Ok(Vec::new())
            }
        }
    }

    fn begin_swap(&mut self, a: Coord, b: Coord) -> Vec<BoardEvent> {
        self.topology.remember_orientation(&[a, b]);
        self.grid.swap(a, b);
        self.pending_swap = Some((a, b));
        self.drop_progress = true;
        self.phase = BoardPhase::Swapping;
        vec![BoardEvent::Swapped { a, b }]
    }

    /// Drives the board one phase forward.
    ///
    /// The consumer calls this once the current phase's visual playback has
    /// finished; each call performs the next phase's work synchronously and
    /// returns the events it produced. A no-op while `Idle`.
    pub fn advance(&mut self) -> Result<Vec<BoardEvent>, UnreachableTermination> {
        match self.phase {
            BoardPhase::Idle => Ok(Vec::new()),
            BoardPhase::Swapping => Ok(self.finish_swap()),
            BoardPhase::Checking => self.check(),
            BoardPhase::Dropping => {
                self.phase = BoardPhase::Checking;
                Ok(Vec::new())
            }
        }
    }

    /// Drives [`advance`](Self::advance) until the board returns to `Idle`,
    /// concatenating all events. Convenience for headless consumers.
    pub fn run_to_idle(&mut self) -> Result<Vec<BoardEvent>, UnreachableTermination> {
        let mut events = Vec::new();
        while !self.phase.is_idle() {
            events.extend(self.advance()?);
        }
        Ok(events)
    }

    /// Evaluates the just-swapped pair for matches and clears any that
    /// qualify. The swap stands even when nothing matched.
    fn finish_swap(&mut self) -> Vec<BoardEvent> {
        let mut events = Vec::new();
        if let Some((a, b)) = self.pending_swap.take() {
            // Both swapped cells are evaluated independently before anything
            // is cleared; overlapping matches are each processed in full.
            let matches: Vec<(Piece, MatchSet)> = [a, b]
                .into_iter()
                .filter_map(|cell| {
                    let set = MatchSet::scan(self.grid.slots(), cell).ok()?;
                    let piece = self.grid.piece_at(cell)?;
                    (set.qualifies(self.config.min_match_size)).then_some((piece, set))
                })
                .collect();

            if !matches.is_empty() {
                let all_cells: Vec<Coord> = matches
                    .iter()
                    .flat_map(|(_, set)| set.cells())
                    .collect();
                self.topology.remember_orientation(&all_cells);
                for (piece, set) in &matches {
                    let cells = set.cells();
                    for &cell in &cells {
                        self.grid.clear_piece(cell);
                    }
                    events.push(BoardEvent::MatchRemoved {
                        piece: *piece,
                        cells,
                    });
                }
            }
        }
        self.phase = BoardPhase::Checking;
        events
    }

    /// Decides whether another gravity pass is worthwhile.
    ///
    /// Empty face cells are permanent once the cascade stops making progress
    /// (nothing refills the board), so a pass that moved no piece ends the
    /// cascade even though empties remain.
    fn check(&mut self) -> Result<Vec<BoardEvent>, UnreachableTermination> {
        if self.drop_progress && self.grid.has_empty_face_cells() {
            let moves = gravity::resolve_gravity(&mut self.grid, &self.topology)?;
            self.drop_progress = !moves.is_empty();
            self.phase = BoardPhase::Dropping;
            if moves.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![BoardEvent::PiecesDropped { moves }])
            }
        } else {
            self.phase = BoardPhase::Idle;
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        core::{
            grid::{Grid, Slot},
            piece::{PieceColour, PieceKind},
        },
        engine::topology::Face,
    };

    use super::*;

    const EXTENTS: Coord = Coord::new(3, 3, 3);

    fn config() -> BoardConfig {
        BoardConfig {
            extents: EXTENTS,
            min_match_size: 3,
            num_kinds: 7,
            num_colours: 7,
        }
    }

    /// A board whose face cells alternate between two pieces by parity, so
    /// no cell matches any neighbour. Individual cells are then overridden
    /// to craft scenarios.
    fn checkerboard(overrides: &[(Coord, Piece)]) -> Board {
        let mut grid: Grid<Slot> = Grid::new(EXTENTS, None);
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    let c = Coord::new(x, y, z);
                    if c.z == 0 || c.x == 2 || c.y == 2 {
                        let piece = if (x + y + z) % 2 == 0 {
                            Piece::new(PieceKind::Cube, PieceColour::Red)
                        } else {
                            Piece::new(PieceKind::Sphere, PieceColour::Blue)
                        };
                        grid.set(c, Some(piece)).unwrap();
                    }
                }
            }
        }
        let board_grid = BoardGrid::from_grid(grid);
        let mut board = Board::restore(
            config(),
            SavedBoard {
                grid: board_grid,
                orientation: Orientation::default(),
            },
        )
        .unwrap();
        for &(c, piece) in overrides {
            board.grid.set_piece(c, piece);
        }
        board
    }

    fn diamond() -> Piece {
        Piece::new(PieceKind::Diamond, PieceColour::Green)
    }

    #[test]
    fn test_selection_buffer_no_op_reselect() {
        let mut board = Board::new(config(), BoardSeed::from_bytes([3; 16])).unwrap();
        let cell = Coord::new(0, 0, 0);
        assert!(board.select(cell).unwrap().is_empty());
        assert!(board.select(cell).unwrap().is_empty());
        assert_eq!(board.selection(), &[cell]);
        assert!(board.phase().is_idle());
    }

    #[test]
    fn test_selection_restarts_on_non_adjacent_pick() {
        let mut board = Board::new(config(), BoardSeed::from_bytes([3; 16])).unwrap();
        board.select(Coord::new(0, 0, 0)).unwrap();
        board.select(Coord::new(2, 2, 0)).unwrap();
        assert_eq!(board.selection(), &[Coord::new(2, 2, 0)]);
        assert!(board.phase().is_idle());
    }

    #[test]
    fn test_selection_rejects_unaddressable_cells() {
        let mut board = Board::new(config(), BoardSeed::from_bytes([3; 16])).unwrap();
        let outside = Coord::new(5, 0, 0);
        assert_eq!(board.select(outside), Err(OutOfBounds { coord: outside }));
        let interior = Coord::new(1, 1, 1);
        assert_eq!(board.select(interior), Err(OutOfBounds { coord: interior }));
        assert!(board.selection().is_empty());
        assert!(board.phase().is_idle());
    }

    #[test]
    fn test_selection_ignores_empty_cells() {
        // A hole left by a stalled cascade cannot be picked or swapped.
        let hole = Coord::new(2, 2, 2);
        let mut board = checkerboard(&[(hole, Piece::EMPTY)]);

        assert!(board.select(hole).unwrap().is_empty());
        assert!(board.selection().is_empty());

        board.select(Coord::new(2, 2, 1)).unwrap();
        assert!(board.select(hole).unwrap().is_empty());
        assert_eq!(board.selection(), &[Coord::new(2, 2, 1)]);
        assert!(board.phase().is_idle());
    }

    #[test]
    fn test_selection_ignored_outside_idle() {
        let mut board = checkerboard(&[]);
        board.select(Coord::new(0, 0, 0)).unwrap();
        board.select(Coord::new(1, 0, 0)).unwrap();
        assert!(board.phase().is_swapping());
        // Picks during an active cascade are dropped on the floor.
        assert!(board.select(Coord::new(2, 0, 0)).unwrap().is_empty());
        assert!(board.selection().is_empty());
    }

    #[test]
    fn test_swap_without_match_stands() {
        let mut board = checkerboard(&[]);
        let a = Coord::new(0, 0, 0);
        let b = Coord::new(1, 0, 0);
        let piece_a = board.grid().piece_at(a).unwrap();
        let piece_b = board.grid().piece_at(b).unwrap();

        board.select(a).unwrap();
        let events = board.select(b).unwrap();
        assert_eq!(events, vec![BoardEvent::Swapped { a, b }]);
        assert!(board.phase().is_swapping());
        // The model swap is immediate.
        assert_eq!(board.grid().piece_at(a), Some(piece_b));
        assert_eq!(board.grid().piece_at(b), Some(piece_a));

        // No match: the swap stands, no removal happens, and with no empty
        // cells the board settles straight back to idle.
        let events = board.advance().unwrap();
        assert!(events.is_empty());
        assert!(board.phase().is_checking());
        board.advance().unwrap();
        assert!(board.phase().is_idle());
        assert_eq!(board.grid().piece_at(a), Some(piece_b));
    }

    #[test]
    fn test_swap_completing_column_clears_and_drops() {
        // Swapping (0,0,0) and (1,0,0) completes a vertical run of diamonds
        // at x=1 on the front face.
        let mut board = checkerboard(&[
            (Coord::new(0, 0, 0), diamond()),
            (Coord::new(1, 1, 0), diamond()),
            (Coord::new(1, 2, 0), diamond()),
        ]);
        let a = Coord::new(0, 0, 0);
        let b = Coord::new(1, 0, 0);
        board.select(a).unwrap();
        board.select(b).unwrap();
        assert!(board.phase().is_swapping());

        let events = board.advance().unwrap();
        assert!(board.phase().is_checking());
        let [BoardEvent::MatchRemoved { piece, cells }] = events.as_slice() else {
            panic!("expected a single match removal, got {events:?}");
        };
        assert_eq!(*piece, diamond());
        let mut sorted = cells.clone();
        sorted.sort_by_key(|c| c.y);
        assert_eq!(
            sorted,
            vec![Coord::new(1, 0, 0), Coord::new(1, 1, 0), Coord::new(1, 2, 0)]
        );
        for cell in &sorted {
            assert!(board.grid().piece_at(*cell).unwrap().is_empty());
        }

        let events = board.advance().unwrap();
        assert!(board.phase().is_dropping());
        assert!(matches!(
            events.as_slice(),
            [BoardEvent::PiecesDropped { moves }] if !moves.is_empty()
        ));

        board.run_to_idle().unwrap();
        assert!(board.phase().is_idle());
        assert!(board.grid().is_well_formed());
    }

    #[test]
    fn test_both_swapped_cells_can_match_independently() {
        // Swapping the middle pair completes a diamond column at x=0 and a
        // sphere column at x=1 simultaneously.
        let sphere = Piece::new(PieceKind::Sphere, PieceColour::Purple);
        let mut board = checkerboard(&[
            (Coord::new(0, 0, 0), diamond()),
            (Coord::new(0, 2, 0), diamond()),
            (Coord::new(1, 1, 0), diamond()),
            (Coord::new(0, 1, 0), sphere),
            (Coord::new(1, 0, 0), sphere),
            (Coord::new(1, 2, 0), sphere),
        ]);
        board.select(Coord::new(0, 1, 0)).unwrap();
        board.select(Coord::new(1, 1, 0)).unwrap();

        let events = board.advance().unwrap();
        assert_eq!(events.len(), 2);
        for event in &events {
            let BoardEvent::MatchRemoved { cells, .. } = event else {
                panic!("expected match removals, got {event:?}");
            };
            assert_eq!(cells.len(), 3);
        }
    }

    #[test]
    fn test_match_updates_orientation() {
        // A vertical run on the side face: swapping (2,2,2) into (2,2,1)
        // completes diamonds at (2,0,1), (2,1,1), (2,2,1) - all side-face
        // cells, so the activity re-aims the top face toward the side.
        let mut board = checkerboard(&[
            (Coord::new(2, 0, 1), diamond()),
            (Coord::new(2, 1, 1), diamond()),
            (Coord::new(2, 2, 2), diamond()),
        ]);
        assert_eq!(board.topology().orientation(), Orientation::TowardFront);

        board.select(Coord::new(2, 2, 2)).unwrap();
        board.select(Coord::new(2, 2, 1)).unwrap();
        let events = board.advance().unwrap();
        assert!(matches!(events.as_slice(), [BoardEvent::MatchRemoved { .. }]));
        assert_eq!(board.topology().orientation(), Orientation::TowardSide);

        // A later drop on the top face follows the new direction.
        assert_eq!(board.topology().down_direction(Face::Top), Coord::POS_X);
    }

    #[test]
    fn test_cascade_terminates_with_unreachable_empty_cell() {
        // (2,2,2) is empty and nothing can flow into it under the default
        // orientation; a matchless swap elsewhere must settle back to idle
        // after exactly one checking -> dropping -> checking cycle.
        let mut board = checkerboard(&[(Coord::new(2, 2, 2), Piece::EMPTY)]);
        board.select(Coord::new(0, 0, 0)).unwrap();
        board.select(Coord::new(1, 0, 0)).unwrap();

        board.advance().unwrap(); // swapping -> checking
        assert!(board.phase().is_checking());
        let events = board.advance().unwrap(); // checking -> dropping (no moves)
        assert!(board.phase().is_dropping());
        assert!(events.is_empty());
        board.advance().unwrap(); // dropping -> checking
        assert!(board.phase().is_checking());
        board.advance().unwrap(); // checking -> idle, cascade stalled
        assert!(board.phase().is_idle());
        assert!(board.grid().has_empty_face_cells());
    }

    #[test]
    fn test_face_cell_invariant_through_full_cascade() {
        let mut board = checkerboard(&[
            (Coord::new(0, 0, 0), diamond()),
            (Coord::new(1, 1, 0), diamond()),
            (Coord::new(1, 2, 0), diamond()),
        ]);
        board.select(Coord::new(0, 0, 0)).unwrap();
        board.select(Coord::new(1, 0, 0)).unwrap();
        board.run_to_idle().unwrap();

        assert!(board.grid().is_well_formed());
        for c in [Coord::new(1, 1, 1), Coord::new(0, 1, 1), Coord::new(1, 0, 1)] {
            assert_eq!(board.grid().piece_at(c), None);
        }
    }

    #[test]
    fn test_saved_board_roundtrip() {
        let mut board = Board::new(config(), BoardSeed::from_bytes([9; 16])).unwrap();
        board.select(Coord::new(0, 0, 0)).unwrap();
        board.select(Coord::new(1, 0, 0)).unwrap();
        board.run_to_idle().unwrap();

        let saved = board.saved();
        let json = serde_json::to_string(&saved).unwrap();
        let restored: SavedBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(saved, restored);

        let revived = Board::restore(config(), restored).unwrap();
        assert_eq!(revived.grid(), board.grid());
        assert_eq!(
            revived.topology().orientation(),
            board.topology().orientation()
        );
        assert!(revived.phase().is_idle());
    }

    #[test]
    fn test_restore_rejects_mismatched_extents() {
        let board = Board::new(config(), BoardSeed::from_bytes([9; 16])).unwrap();
        let saved = board.saved();
        let mut other = config();
        other.extents = Coord::new(4, 4, 4);
        assert!(matches!(
            Board::restore(other, saved),
            Err(InvalidConfiguration::SavedExtents { .. })
        ));
    }
}
