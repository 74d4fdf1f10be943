use serde::{Deserialize, Serialize};

use crate::OutOfBounds;

use super::{coord::Coord, piece::Piece};

/// A dense 3-D array with extents fixed at construction, indexed by [`Coord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    extents: Coord,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a grid of the given extents with every cell set to `fill`.
    ///
    /// # Panics
    ///
    /// Panics if any extent is non-positive; callers validate extents through
    /// board configuration before constructing grids.
    #[must_use]
    pub fn new(extents: Coord, fill: T) -> Self
    where
        T: Clone,
    {
        assert!(
            extents.x > 0 && extents.y > 0 && extents.z > 0,
            "grid extents must be positive, got {extents}",
        );
        let volume = usize::try_from(extents.x * extents.y * extents.z)
            .expect("positive extents produce a positive volume");
        Self {
            extents,
            cells: vec![fill; volume],
        }
    }

    #[must_use]
    pub const fn extents(&self) -> Coord {
        self.extents
    }

    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.x < self.extents.x
            && coord.y >= 0
            && coord.y < self.extents.y
            && coord.z >= 0
            && coord.z < self.extents.z
    }

    #[expect(clippy::cast_sign_loss)]
    fn index(&self, coord: Coord) -> usize {
        debug_assert!(self.in_bounds(coord));
        (coord.x + self.extents.x * (coord.y + self.extents.y * coord.z)) as usize
    }

    pub fn get(&self, coord: Coord) -> Result<&T, OutOfBounds> {
        if !self.in_bounds(coord) {
            return Err(OutOfBounds { coord });
        }
        Ok(&self.cells[self.index(coord)])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Result<&mut T, OutOfBounds> {
        if !self.in_bounds(coord) {
            return Err(OutOfBounds { coord });
        }
        let index = self.index(coord);
        Ok(&mut self.cells[index])
    }

    pub fn set(&mut self, coord: Coord, value: T) -> Result<(), OutOfBounds> {
        *self.get_mut(coord)? = value;
        Ok(())
    }

    /// Exchanges the contents of two cells.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is out of bounds; internal callers always
    /// pass bounds-checked coordinates.
    pub fn swap(&mut self, a: Coord, b: Coord) {
        assert!(self.in_bounds(a), "swap source {a} out of bounds");
        assert!(self.in_bounds(b), "swap target {b} out of bounds");
        let (i, j) = (self.index(a), self.index(b));
        self.cells.swap(i, j);
    }

    /// Iterates every coordinate, x varying fastest, then y, then z.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let extents = self.extents;
        (0..extents.z).flat_map(move |z| {
            (0..extents.y).flat_map(move |y| (0..extents.x).map(move |x| Coord::new(x, y, z)))
        })
    }
}

/// A grid slot: `Some` where a cell is populated, `None` for cells that are
/// never instantiated (strictly interior to the cuboid).
pub type Slot = Option<Piece>;

/// The live board grid.
///
/// Cells on the three active faces (`z == 0`, `x == X-1`, or `y == Y-1`)
/// always hold exactly one [`Piece`] value, possibly the empty sentinel;
/// every other cell stays unpopulated and is never read by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardGrid {
    grid: Grid<Slot>,
}

impl BoardGrid {
    #[must_use]
    pub const fn from_grid(grid: Grid<Slot>) -> Self {
        Self { grid }
    }

    #[must_use]
    pub const fn extents(&self) -> Coord {
        self.grid.extents()
    }

    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        self.grid.in_bounds(coord)
    }

    /// Read access to the underlying slots, e.g. for match scanning.
    #[must_use]
    pub const fn slots(&self) -> &Grid<Slot> {
        &self.grid
    }

    /// Whether an in-bounds coordinate lies on one of the three active faces.
    #[must_use]
    pub const fn is_face_cell(&self, coord: Coord) -> bool {
        let extents = self.grid.extents();
        self.in_bounds(coord)
            && (coord.z == 0 || coord.x == extents.x - 1 || coord.y == extents.y - 1)
    }

    /// The piece at `coord`, or `None` for out-of-bounds or unpopulated cells.
    #[must_use]
    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        self.grid.get(coord).ok().copied().flatten()
    }

    /// Overwrites the piece in a populated cell.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is not a face cell.
    pub fn set_piece(&mut self, coord: Coord, piece: Piece) {
        assert!(self.is_face_cell(coord), "cell {coord} is not a face cell");
        self.grid
            .set(coord, Some(piece))
            .expect("face cells are in bounds");
    }

    /// Replaces the piece at a face cell with the empty sentinel, retaining
    /// its colour.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is not a populated face cell.
    pub fn clear_piece(&mut self, coord: Coord) {
        let piece = self
            .piece_at(coord)
            .unwrap_or_else(|| panic!("cell {coord} is not populated"));
        self.set_piece(coord, piece.cleared());
    }

    /// Exchanges the contents of two face cells.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is out of bounds.
    pub fn swap(&mut self, a: Coord, b: Coord) {
        self.grid.swap(a, b);
    }

    pub fn face_cells(&self) -> impl Iterator<Item = Coord> {
        let extents = self.extents();
        self.grid.coords().filter(move |c| {
            c.z == 0 || c.x == extents.x - 1 || c.y == extents.y - 1
        })
    }

    /// Every face cell currently holding the empty sentinel.
    #[must_use]
    pub fn empty_face_cells(&self) -> Vec<Coord> {
        self.face_cells()
            .filter(|&c| self.piece_at(c).is_some_and(Piece::is_empty))
            .collect()
    }

    #[must_use]
    pub fn has_empty_face_cells(&self) -> bool {
        self.face_cells()
            .any(|c| self.piece_at(c).is_some_and(Piece::is_empty))
    }

    /// Checks the face-cell population invariant: every face cell `Some`,
    /// every interior cell `None`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.grid.coords().all(|c| {
            let populated = self.grid.get(c).is_ok_and(|slot| slot.is_some());
            populated == self.is_face_cell(c)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::core::piece::{PieceColour, PieceKind};

    use super::*;

    #[test]
    fn test_bounds_checks() {
        let grid: Grid<u8> = Grid::new(Coord::new(2, 3, 4), 0);
        assert!(grid.in_bounds(Coord::new(1, 2, 3)));
        assert!(!grid.in_bounds(Coord::new(2, 0, 0)));
        assert!(!grid.in_bounds(Coord::new(0, -1, 0)));
        assert_eq!(
            grid.get(Coord::new(0, 0, 4)),
            Err(OutOfBounds {
                coord: Coord::new(0, 0, 4)
            })
        );
    }

    #[test]
    fn test_set_get_and_swap() {
        let mut grid: Grid<u8> = Grid::new(Coord::new(3, 3, 3), 0);
        grid.set(Coord::new(1, 2, 0), 7).unwrap();
        grid.set(Coord::new(2, 2, 2), 9).unwrap();
        assert_eq!(grid.get(Coord::new(1, 2, 0)), Ok(&7));
        grid.swap(Coord::new(1, 2, 0), Coord::new(2, 2, 2));
        assert_eq!(grid.get(Coord::new(1, 2, 0)), Ok(&9));
        assert_eq!(grid.get(Coord::new(2, 2, 2)), Ok(&7));
    }

    #[test]
    fn test_coords_cover_volume_once() {
        let grid: Grid<u8> = Grid::new(Coord::new(2, 2, 2), 0);
        let coords: Vec<_> = grid.coords().collect();
        assert_eq!(coords.len(), 8);
        assert_eq!(coords[0], Coord::ZERO);
        // x varies fastest
        assert_eq!(coords[1], Coord::new(1, 0, 0));
        assert_eq!(coords[2], Coord::new(0, 1, 0));
    }

    fn board_3x3x3() -> BoardGrid {
        let mut grid: Grid<Slot> = Grid::new(Coord::new(3, 3, 3), None);
        let extents = grid.extents();
        for c in grid.coords().collect::<Vec<_>>() {
            if c.z == 0 || c.x == extents.x - 1 || c.y == extents.y - 1 {
                grid.set(c, Some(Piece::new(PieceKind::Cube, PieceColour::Red)))
                    .unwrap();
            }
        }
        BoardGrid::from_grid(grid)
    }

    #[test]
    fn test_face_cells_of_3x3x3() {
        let board = board_3x3x3();
        // 27 cells total, 2x2x2 strictly interior block excluded.
        assert_eq!(board.face_cells().count(), 19);
        assert!(board.is_face_cell(Coord::new(0, 0, 0)));
        assert!(board.is_face_cell(Coord::new(2, 0, 1)));
        assert!(board.is_face_cell(Coord::new(0, 2, 1)));
        assert!(!board.is_face_cell(Coord::new(0, 0, 1)));
        assert!(!board.is_face_cell(Coord::new(1, 1, 2)));
    }

    #[test]
    fn test_well_formed_and_empty_scan() {
        let mut board = board_3x3x3();
        assert!(board.is_well_formed());
        assert!(!board.has_empty_face_cells());

        board.clear_piece(Coord::new(1, 0, 0));
        assert!(board.is_well_formed());
        assert_eq!(board.empty_face_cells(), vec![Coord::new(1, 0, 0)]);
    }

    #[test]
    fn test_interior_cells_unpopulated() {
        let board = board_3x3x3();
        assert_eq!(board.piece_at(Coord::new(1, 1, 1)), None);
        assert_eq!(board.piece_at(Coord::new(0, 1, 2)), None);
    }
}
