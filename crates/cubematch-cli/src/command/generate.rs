use std::path::PathBuf;

use cubematch_engine::{Board, BoardConfig, BoardSeed, Coord};
use rand::Rng as _;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Board extents along x
    #[arg(long, default_value_t = 8)]
    width: i32,
    /// Board extents along y
    #[arg(long, default_value_t = 8)]
    height: i32,
    /// Board extents along z
    #[arg(long, default_value_t = 8)]
    depth: i32,
    /// Minimum run length that counts as a match
    #[arg(long, default_value_t = 3)]
    min_match_size: usize,
    /// Number of distinct piece shapes to roll from
    #[arg(long, default_value_t = 7)]
    num_kinds: usize,
    /// Number of distinct piece colours to roll from
    #[arg(long, default_value_t = 7)]
    num_colours: usize,
    /// 32-digit hex seed; a random seed is rolled when omitted
    #[arg(long)]
    seed: Option<BoardSeed>,
    /// Also write the board as JSON to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

impl GenerateArg {
    pub(crate) fn config(&self) -> BoardConfig {
        BoardConfig {
            extents: Coord::new(self.width, self.height, self.depth),
            min_match_size: self.min_match_size,
            num_kinds: self.num_kinds,
            num_colours: self.num_colours,
        }
    }

    pub(crate) fn board(&self) -> anyhow::Result<(Board, BoardSeed)> {
        let seed = self
            .seed
            .unwrap_or_else(|| rand::rng().random::<BoardSeed>());
        let board = Board::new(self.config(), seed)?;
        Ok((board, seed))
    }
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let (board, seed) = arg.board()?;
    eprintln!("Generated board with seed {seed}");

    print!("{}", util::render_faces(&board));

    if arg.output.is_some() {
        Output::save_json(&board.saved(), arg.output.clone())?;
    }
    Ok(())
}
