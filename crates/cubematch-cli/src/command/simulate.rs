use std::path::PathBuf;

use cubematch_engine::{Board, BoardConfig, BoardEvent, Coord};
use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    command::generate::GenerateArg,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Load a saved board JSON instead of generating one
    #[arg(long)]
    board: Option<PathBuf>,
    #[clap(flatten)]
    generate: GenerateArg,
    /// Number of random swaps to play
    #[arg(long, default_value_t = 20)]
    swaps: usize,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let mut board = match &arg.board {
        Some(path) => {
            let saved = util::read_board_file(path)?;
            let config = BoardConfig {
                extents: saved.grid.extents(),
                ..arg.generate.config()
            };
            Board::restore(config, saved)?
        }
        None => {
            let (board, seed) = arg.generate.board()?;
            eprintln!("Generated board with seed {seed}");
            board
        }
    };

    let mut rng = rand::rng();
    let mut stats = SimulationStats::default();
    for _ in 0..arg.swaps {
        let Some((a, b)) = random_adjacent_pair(&board, &mut rng) else {
            break;
        };
        let mut events = board.select(a)?;
        events.extend(board.select(b)?);
        events.extend(board.run_to_idle()?);
        stats.record(&events);
    }

    eprintln!(
        "Played {} swaps: {} matches removed ({} pieces), {} gravity moves",
        stats.swaps, stats.matches, stats.cleared_pieces, stats.gravity_moves,
    );
    print!("{}", util::render_faces(&board));

    if arg.generate.output.is_some() {
        Output::save_json(&board.saved(), arg.generate.output.clone())?;
    }
    Ok(())
}

#[derive(Debug, Default)]
struct SimulationStats {
    swaps: usize,
    matches: usize,
    cleared_pieces: usize,
    gravity_moves: usize,
}

impl SimulationStats {
    fn record(&mut self, events: &[BoardEvent]) {
        for event in events {
            match event {
                BoardEvent::Swapped { .. } => self.swaps += 1,
                BoardEvent::MatchRemoved { cells, .. } => {
                    self.matches += 1;
                    self.cleared_pieces += cells.len();
                }
                BoardEvent::PiecesDropped { moves } => self.gravity_moves += moves.len(),
            }
        }
    }
}

/// Picks a uniformly random occupied face cell and one of its occupied
/// neighbours. Returns `None` only when no cell has a swap partner left.
fn random_adjacent_pair<R>(board: &Board, rng: &mut R) -> Option<(Coord, Coord)>
where
    R: Rng,
{
    let cells: Vec<Coord> = board
        .grid()
        .face_cells()
        .filter(|&c| board.grid().piece_at(c).is_some_and(|piece| !piece.is_empty()))
        .collect();
    // Rejection sampling; a populated board always has adjacent pairs, so a
    // bounded number of attempts is plenty.
    for _ in 0..cells.len().max(1) * 4 {
        let &a = cells.choose(rng)?;
        let neighbours: Vec<Coord> = [
            Coord::POS_X,
            Coord::NEG_X,
            Coord::POS_Y,
            Coord::NEG_Y,
            Coord::POS_Z,
            Coord::NEG_Z,
        ]
        .into_iter()
        .map(|dir| a + dir)
        .filter(|&b| board.grid().piece_at(b).is_some_and(|piece| !piece.is_empty()))
        .collect();
        if let Some(&b) = neighbours.choose(rng) {
            return Some((a, b));
        }
    }
    None
}
