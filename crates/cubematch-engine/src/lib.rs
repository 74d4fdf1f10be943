pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

pub use crate::core::coord::Coord;

/// A coordinate landed outside the grid extents, or on a cell that is never
/// populated (strictly interior to the cuboid).
///
/// This is always a programming error at the call boundary; the public
/// selection interface rejects such coordinates without changing any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("coordinate {coord} is not an addressable board cell")]
pub struct OutOfBounds {
    pub coord: Coord,
}

/// Construction parameters that cannot produce a playable board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidConfiguration {
    #[display("board extents must be positive on every axis, got {extents}")]
    Extents { extents: Coord },
    #[display("minimum match size must be at least 2, got {size}")]
    MatchSize { size: usize },
    #[display("piece kind count must be between 1 and 7, got {count}")]
    KindCount { count: usize },
    #[display("piece colour count must be between 1 and 7, got {count}")]
    ColourCount { count: usize },
    #[display("saved grid extents {saved} do not match configured extents {configured}")]
    SavedExtents { saved: Coord, configured: Coord },
    #[display("saved grid violates the face-cell population invariant")]
    SavedGrid,
}

/// Gravity resolution exceeded its theoretical step bound.
///
/// A piece can settle after at most `X + Y + Z` unit steps; going past that
/// means the face topology tables are inconsistent. Treated as an assertion
/// failure, not a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece starting at {coord} exceeded the gravity step bound")]
pub struct UnreachableTermination {
    pub coord: Coord,
}
