use std::fmt;

use serde::{Deserialize, Serialize};

/// The shape of a board piece.
///
/// `Empty` is a distinguished sentinel: an `Empty` piece occupies its grid
/// slot like any other piece, but it never matches anything, other `Empty`
/// pieces included. This keeps vacated cells from either blocking or joining
/// match runs as if they were an extra shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Capsule,
    Cone,
    Cube,
    Cylinder,
    Diamond,
    Doughnut,
    Sphere,
    Empty,
}

impl PieceKind {
    /// The kinds a generator may place; excludes the `Empty` sentinel.
    pub const PLAYABLE: [Self; 7] = [
        Self::Capsule,
        Self::Cone,
        Self::Cube,
        Self::Cylinder,
        Self::Diamond,
        Self::Doughnut,
        Self::Sphere,
    ];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::PLAYABLE.get(index).copied()
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Capsule => 'A',
            Self::Cone => 'N',
            Self::Cube => 'B',
            Self::Cylinder => 'Y',
            Self::Diamond => 'D',
            Self::Doughnut => 'O',
            Self::Sphere => 'S',
            Self::Empty => '.',
        }
    }
}

/// The colour of a board piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColour {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    White,
    Purple,
}

impl PieceColour {
    pub const ALL: [Self; 7] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Orange,
        Self::White,
        Self::Purple,
    ];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
            Self::Yellow => 'y',
            Self::Orange => 'o',
            Self::White => 'w',
            Self::Purple => 'p',
        }
    }
}

/// A board piece: a shape plus a colour, stored directly in grid slots.
///
/// Pieces are plain values with no identity. Swapping, removal, and
/// compaction only ever replace slot contents; a removed piece becomes the
/// same slot holding an `Empty`-kind value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    kind: PieceKind,
    colour: PieceColour,
}

impl Piece {
    /// A fresh empty slot value. The colour is irrelevant: empty pieces never
    /// match anything.
    pub const EMPTY: Self = Self::new(PieceKind::Empty, PieceColour::White);

    #[must_use]
    pub const fn new(kind: PieceKind, colour: PieceColour) -> Self {
        Self { kind, colour }
    }

    #[must_use]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn colour(self) -> PieceColour {
        self.colour
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.kind.is_empty()
    }

    /// This piece with its kind replaced by the `Empty` sentinel.
    ///
    /// The colour is retained; it carries no meaning once the slot is empty.
    #[must_use]
    pub const fn cleared(self) -> Self {
        Self {
            kind: PieceKind::Empty,
            colour: self.colour,
        }
    }

    /// Match equality: kind and colour both equal, and neither side empty.
    #[must_use]
    pub fn matches(self, other: Self) -> bool {
        !self.is_empty() && !other.is_empty() && self == other
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "..")
        } else {
            write!(f, "{}{}", self.kind.as_char(), self.colour.as_char())
        }
    }
}
