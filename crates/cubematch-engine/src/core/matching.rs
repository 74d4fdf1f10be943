use arrayvec::ArrayVec;

use crate::OutOfBounds;

use super::{
    coord::{Axis, Coord},
    grid::Grid,
    piece::Piece,
};

/// Match equality for grid contents.
///
/// Distinct from `PartialEq`: empty pieces are structurally comparable but
/// must never participate in match runs, and unpopulated slots match nothing.
pub trait Matchable {
    fn matches(&self, other: &Self) -> bool;
}

impl Matchable for u8 {
    fn matches(&self, other: &Self) -> bool {
        self == other
    }
}

impl Matchable for Option<Piece> {
    fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.matches(*b),
            _ => false,
        }
    }
}

/// The maximal axis-aligned runs of matching cells through one root cell.
///
/// Per axis, `offsets` holds the signed unit offsets from the root at which a
/// matching cell was found, accumulated outward in each direction until the
/// first mismatch or the grid boundary. The root itself is implicit, so a run
/// of *k* cells stores *k − 1* offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    root: Coord,
    offsets: [Vec<i32>; 3],
}

impl MatchSet {
    /// Scans the three axes through `root`, both directions each.
    ///
    /// Read-only and idempotent: scanning twice without intervening mutation
    /// yields identical results.
    pub fn scan<T>(grid: &Grid<T>, root: Coord) -> Result<Self, OutOfBounds>
    where
        T: Matchable,
    {
        let item = grid.get(root)?;
        let mut offsets: [Vec<i32>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for (axis_offsets, axis) in offsets.iter_mut().zip(Axis::ALL) {
            for direction in [-1, 1] {
                let mut distance = 1;
                loop {
                    let offset = distance * direction;
                    let Ok(neighbour) = grid.get(root.offset_along(axis, offset)) else {
                        break;
                    };
                    if !item.matches(neighbour) {
                        break;
                    }
                    axis_offsets.push(offset);
                    distance += 1;
                }
            }
        }
        Ok(Self { root, offsets })
    }

    #[must_use]
    pub const fn root(&self) -> Coord {
        self.root
    }

    #[must_use]
    pub fn offsets(&self, axis: Axis) -> &[i32] {
        match axis {
            Axis::X => &self.offsets[0],
            Axis::Y => &self.offsets[1],
            Axis::Z => &self.offsets[2],
        }
    }

    /// Whether any single axis accumulated a run of at least `min_size`
    /// cells, root included.
    #[must_use]
    pub fn qualifies(&self, min_size: usize) -> bool {
        self.offsets
            .iter()
            .any(|axis_offsets| axis_offsets.len() + 1 >= min_size)
    }

    /// The root cell plus every matched cell, as a flat list.
    #[must_use]
    pub fn cells(&self) -> Vec<Coord> {
        let mut cells = vec![self.root];
        for (axis_offsets, axis) in self.offsets.iter().zip(Axis::ALL) {
            cells.extend(
                axis_offsets
                    .iter()
                    .map(|&offset| self.root.offset_along(axis, offset)),
            );
        }
        cells
    }
}

/// The values of the up-to-6 lattice neighbours of `coord` that are in bounds.
pub fn adjacent_values<T>(grid: &Grid<T>, coord: Coord) -> ArrayVec<T, 6>
where
    T: Copy,
{
    let mut values = ArrayVec::new();
    for axis in Axis::ALL {
        for direction in [-1, 1] {
            if let Ok(value) = grid.get(coord.offset_along(axis, direction)) {
                values.push(*value);
            }
        }
    }
    values
}
