use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::coord::Coord;

/// One of the three active outer faces of the cuboid.
///
/// There is no global "down" on a cube surface, so each face carries its own
/// 2-D (column, row) layout and gravity direction:
///
/// - [`Front`](Face::Front) — the `z == 0` plane, columns along x, rows along
///   y; gravity is `-y`.
/// - [`Side`](Face::Side) — the `x == X-1` plane, columns along z, rows along
///   y; gravity is `-y`.
/// - [`Top`](Face::Top) — the `y == Y-1` plane, columns along z, rows along
///   x. This face sits above the other two, so its gravity direction is
///   ambiguous and follows the remembered [`Orientation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Front,
    Side,
    Top,
}

impl Face {
    /// Fixed resolution order for gravity passes.
    pub const ALL: [Self; 3] = [Self::Front, Self::Side, Self::Top];
}

/// The remembered preference resolving the [`Top`](Face::Top) face's gravity.
///
/// Updated from the faces the player most recently interacted with, so that
/// pieces on the top face slide toward whichever vertical face currently
/// reads as "below" them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Top-face pieces slide toward the front face (`-z`).
    #[default]
    TowardFront,
    /// Top-face pieces slide toward the side face (`+x`).
    TowardSide,
}

/// Maps the three active faces onto the 3-D grid and owns the orientation
/// bit. No other component mutates the orientation; it changes only through
/// [`Topology::remember_orientation`] (and deserialization of saved state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    extents: Coord,
    orientation: Orientation,
}

impl Topology {
    #[must_use]
    pub fn new(extents: Coord) -> Self {
        Self {
            extents,
            orientation: Orientation::default(),
        }
    }

    #[must_use]
    pub const fn with_orientation(extents: Coord, orientation: Orientation) -> Self {
        Self {
            extents,
            orientation,
        }
    }

    #[must_use]
    pub const fn extents(&self) -> Coord {
        self.extents
    }

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The (columns, rows) extents of a face's 2-D coordinate system.
    #[must_use]
    pub const fn face_extents(&self, face: Face) -> (i32, i32) {
        match face {
            Face::Front => (self.extents.x, self.extents.y),
            Face::Side => (self.extents.z, self.extents.y),
            Face::Top => (self.extents.z, self.extents.x),
        }
    }

    /// Maps a face-local (column, row) pair onto the lattice. Bijective over
    /// the face's valid range.
    #[must_use]
    pub const fn face_cell(&self, face: Face, column: i32, row: i32) -> Coord {
        match face {
            Face::Front => Coord::new(column, row, 0),
            Face::Side => Coord::new(self.extents.x - 1, row, column),
            Face::Top => Coord::new(row, self.extents.y - 1, column),
        }
    }

    /// The unit direction a piece on `face` falls along.
    #[must_use]
    pub const fn down_direction(&self, face: Face) -> Coord {
        match face {
            Face::Front | Face::Side => Coord::NEG_Y,
            Face::Top => match self.orientation {
                Orientation::TowardFront => Coord::NEG_Z,
                Orientation::TowardSide => Coord::POS_X,
            },
        }
    }

    /// The faces an in-bounds cell belongs to: 1 for a plain face cell, 2 on
    /// a shared edge, 3 at the shared corner. Empty for interior cells.
    #[must_use]
    pub fn faces_of(&self, coord: Coord) -> ArrayVec<Face, 3> {
        let mut faces = ArrayVec::new();
        if coord.z == 0 {
            faces.push(Face::Front);
        }
        if coord.x == self.extents.x - 1 {
            faces.push(Face::Side);
        }
        if coord.y == self.extents.y - 1 {
            faces.push(Face::Top);
        }
        faces
    }

    /// Re-aims the top face's gravity from recent player activity.
    ///
    /// Tallies face membership over the given cells; if one vertical face is
    /// strictly predominant, the orientation bit follows it. Ties and purely
    /// top-face activity leave the bit unchanged.
    pub fn remember_orientation(&mut self, cells: &[Coord]) {
        let mut front = 0_usize;
        let mut side = 0_usize;
        for &cell in cells {
            for face in self.faces_of(cell) {
                match face {
                    Face::Front => front += 1,
                    Face::Side => side += 1,
                    Face::Top => {}
                }
            }
        }
        if front > side {
            self.orientation = Orientation::TowardFront;
        } else if side > front {
            self.orientation = Orientation::TowardSide;
        }
    }

    /// Whether a cell lies on the top face's boundary with a vertical face,
    /// making it eligible for a cross-face gravity transition.
    #[must_use]
    pub const fn is_shared_edge(&self, coord: Coord) -> bool {
        coord.y == self.extents.y - 1 && (coord.z == 0 || coord.x == self.extents.x - 1)
    }

    /// The face a piece at a shared-edge cell transitions to when its current
    /// face's drop direction is blocked.
    #[must_use]
    pub const fn adjacent_face(&self, coord: Coord, current: Face) -> Option<Face> {
        if !self.is_shared_edge(coord) {
            return None;
        }
        match current {
            Face::Top => {
                if coord.z == 0 {
                    Some(Face::Front)
                } else {
                    Some(Face::Side)
                }
            }
            Face::Front | Face::Side => Some(Face::Top),
        }
    }
}
