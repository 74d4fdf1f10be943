//! Board simulation logic and state management.
//!
//! This module provides the high-level logic that orchestrates the core data
//! structures into a playable board:
//!
//! - [`Board`] - Phase machine driving swaps, match removal, and gravity
//! - [`BoardConfig`] / [`BoardSeed`] - Deterministic board generation inputs
//! - [`Topology`] - The three active cuboid faces and their drop directions
//! - [`PieceMove`] - A single piece's gravity path for playback
//!
//! # Board Flow
//!
//! A typical session progresses as follows:
//!
//! 1. Generate a [`Board`] from a [`BoardConfig`] and [`BoardSeed`]
//! 2. The player picks two adjacent face cells via [`Board::select`]
//! 3. [`Board::advance`] evaluates the swap, clears qualifying matches,
//!    and runs gravity passes until the cascade stops making progress
//! 4. The board returns to idle and accepts the next pick

pub use self::{board::*, generator::*, gravity::*, topology::*};

pub(crate) mod board;
pub(crate) mod generator;
pub(crate) mod gravity;
pub(crate) mod topology;
