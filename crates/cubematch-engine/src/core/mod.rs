pub use self::{coord::*, grid::*, matching::*, piece::*};

pub(crate) mod coord;
pub(crate) mod grid;
pub(crate) mod matching;
pub(crate) mod piece;
