use std::fmt;

use derive_more::{Add, AddAssign, Sub};
use serde::{Deserialize, Serialize};

/// A point on the 3-D integer lattice of the board.
///
/// `Coord` is a plain value type: it is copied, never shared, and never
/// mutated in place once handed to a consumer. Axes are used consistently as
/// (column, vertical, depth).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Add,
    AddAssign,
    Sub,
    Serialize,
    Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub const ZERO: Self = Self::new(0, 0, 0);
    pub const POS_X: Self = Self::new(1, 0, 0);
    pub const POS_Y: Self = Self::new(0, 1, 0);
    pub const POS_Z: Self = Self::new(0, 0, 1);
    pub const NEG_X: Self = Self::new(-1, 0, 0);
    pub const NEG_Y: Self = Self::new(0, -1, 0);
    pub const NEG_Z: Self = Self::new(0, 0, -1);

    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// Whether `other` is exactly one lattice step away along a single axis.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.manhattan_distance(other) == 1
    }

    #[must_use]
    pub const fn axis(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Returns this point displaced by `offset` cells along `axis`.
    #[must_use]
    pub const fn offset_along(self, axis: Axis, offset: i32) -> Self {
        match axis {
            Axis::X => Self::new(self.x + offset, self.y, self.z),
            Axis::Y => Self::new(self.x, self.y + offset, self.z),
            Axis::Z => Self::new(self.x, self.y, self.z + offset),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three lattice axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    #[must_use]
    pub const fn unit(self) -> Coord {
        match self {
            Self::X => Coord::POS_X,
            Self::Y => Coord::POS_Y,
            Self::Z => Coord::POS_Z,
        }
    }
}
