use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    InvalidConfiguration,
    core::{
        coord::Coord,
        grid::{BoardGrid, Grid, Slot},
        matching::{self, MatchSet},
        piece::{Piece, PieceColour, PieceKind},
    },
};

/// Construction parameters for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub extents: Coord,
    pub min_match_size: usize,
    pub num_kinds: usize,
    pub num_colours: usize,
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if self.extents.x < 1 || self.extents.y < 1 || self.extents.z < 1 {
            return Err(InvalidConfiguration::Extents {
                extents: self.extents,
            });
        }
        if self.min_match_size < 2 {
            return Err(InvalidConfiguration::MatchSize {
                size: self.min_match_size,
            });
        }
        if self.num_kinds < 1 || self.num_kinds > PieceKind::PLAYABLE.len() {
            return Err(InvalidConfiguration::KindCount {
                count: self.num_kinds,
            });
        }
        if self.num_colours < 1 || self.num_colours > PieceColour::ALL.len() {
            return Err(InvalidConfiguration::ColourCount {
                count: self.num_colours,
            });
        }
        Ok(())
    }
}

/// Seed for deterministic board generation.
///
/// A 128-bit seed driving the generator's RNG; the same seed and
/// configuration always produce the same board. Serializes as a 32-character
/// hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSeed([u8; 16]);

impl BoardSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for BoardSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("invalid board seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    pub input: String,
}

impl FromStr for BoardSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError { input: s.into() });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError { input: s.into() })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for BoardSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BoardSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows `rng.random::<BoardSeed>()` for ad-hoc seed generation.
impl Distribution<BoardSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BoardSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BoardSeed(seed)
    }
}

/// Produces an initial board with no pre-existing matches.
///
/// Kind and colour indices are rolled independently over the full extents,
/// each de-matched in a single sweep, then only the three active faces are
/// materialised; strictly interior cells stay unpopulated for the life of
/// the board.
pub fn generate_board(config: &BoardConfig, seed: BoardSeed) -> Result<BoardGrid, InvalidConfiguration> {
    config.validate()?;
    let mut rng = Pcg32::from_seed(seed.as_bytes());

    let mut kinds = random_values(&mut rng, config.extents, config.num_kinds);
    remove_matches(&mut kinds, config.min_match_size, config.num_kinds);
    let mut colours = random_values(&mut rng, config.extents, config.num_colours);
    remove_matches(&mut colours, config.min_match_size, config.num_colours);

    let mut grid: Grid<Slot> = Grid::new(config.extents, None);
    for coord in face_coords(config.extents) {
        let kind = value_at(&kinds, coord);
        let colour = value_at(&colours, coord);
        let piece = Piece::new(
            PieceKind::from_index(kind).expect("kind indices are below the validated kind count"),
            PieceColour::from_index(colour)
                .expect("colour indices are below the validated colour count"),
        );
        grid.set(coord, Some(piece))
            .expect("face coordinates are in bounds");
    }
    Ok(BoardGrid::from_grid(grid))
}

fn face_coords(extents: Coord) -> impl Iterator<Item = Coord> {
    (0..extents.z).flat_map(move |z| {
        (0..extents.y).flat_map(move |y| {
            (0..extents.x)
                .map(move |x| Coord::new(x, y, z))
                .filter(move |c| c.z == 0 || c.x == extents.x - 1 || c.y == extents.y - 1)
        })
    })
}

fn value_at(values: &Grid<u8>, coord: Coord) -> usize {
    let &value = values
        .get(coord)
        .expect("face coordinates are in bounds of the value grid");
    usize::from(value)
}

#[expect(clippy::cast_possible_truncation)]
fn random_values<R>(rng: &mut R, extents: Coord, num_values: usize) -> Grid<u8>
where
    R: Rng,
{
    let mut values = Grid::new(extents, 0_u8);
    for z in 0..extents.z {
        for y in 0..extents.y {
            for x in 0..extents.x {
                let value = rng.random_range(0..num_values) as u8;
                values
                    .set(Coord::new(x, y, z), value)
                    .expect("loop bounds stay within extents");
            }
        }
    }
    values
}

/// Single-sweep de-matching pass.
///
/// A qualifying cell is replaced with a value absent from its entire
/// 6-neighbourhood, so the replacement can neither extend nor seed a run.
/// Because every qualifying run is caught at its first cell in sweep order,
/// one sweep already reaches a match-free fixed point. When every candidate
/// value is adjacent, the cell falls back to value 0.
#[expect(clippy::cast_possible_truncation)]
fn remove_matches(values: &mut Grid<u8>, min_match_size: usize, num_values: usize) {
    let extents = values.extents();
    for z in 0..extents.z {
        for y in 0..extents.y {
            for x in 0..extents.x {
                let coord = Coord::new(x, y, z);
                let set = MatchSet::scan(values, coord)
                    .expect("loop bounds stay within extents");
                if !set.qualifies(min_match_size) {
                    continue;
                }
                let neighbours = matching::adjacent_values(values, coord);
                let replacement = (0..num_values as u8)
                    .find(|value| !neighbours.contains(value))
                    .unwrap_or(0);
                values
                    .set(coord, replacement)
                    .expect("loop bounds stay within extents");
            }
        }
    }
}
