use crate::{
    UnreachableTermination,
    core::{coord::Coord, grid::BoardGrid, piece::Piece},
};

use super::topology::{Face, Topology};

/// The path one piece travelled during a single gravity pass.
///
/// Ephemeral: produced fresh each cascade for the presentation layer to
/// animate, never persisted. `steps` holds the ordered unit directions from
/// `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceMove {
    pub piece: Piece,
    pub from: Coord,
    pub to: Coord,
    pub steps: Vec<Coord>,
}

/// Runs one full gravity compaction over the board.
///
/// Faces are processed in [`Face::ALL`] order, cells in (row, column) order.
/// Each occupied piece repeatedly steps along its active face's down
/// direction into empty cells; when blocked at a shared edge it tries the
/// adjacent face's direction once and, on success, continues on that face.
/// A piece always prefers its current face; the adjacent face is a fallback.
///
/// Returns a move record for every piece that travelled at least one step.
/// On an already-settled board the grid is left untouched and the list is
/// empty.
pub fn resolve_gravity(
    grid: &mut BoardGrid,
    topology: &Topology,
) -> Result<Vec<PieceMove>, UnreachableTermination> {
    let extents = grid.extents();
    let step_bound = usize::try_from(extents.x + extents.y + extents.z)
        .expect("grid extents are validated positive");
    let mut moves = Vec::new();

    for face in Face::ALL {
        let (columns, rows) = topology.face_extents(face);
        for row in 0..rows {
            for column in 0..columns {
                let start = topology.face_cell(face, column, row);
                let Some(piece) = grid.piece_at(start) else {
                    continue;
                };
                if piece.is_empty() {
                    continue;
                }

                let steps = settle_piece(grid, topology, start, face, step_bound)?;
                if !steps.is_empty() {
                    let to = steps.iter().fold(start, |pos, &step| pos + step);
                    moves.push(PieceMove {
                        piece,
                        from: start,
                        to,
                        steps,
                    });
                }
            }
        }
    }
    Ok(moves)
}

/// Drops a single piece as far as topology and emptiness allow, mutating the
/// grid step by step.
fn settle_piece(
    grid: &mut BoardGrid,
    topology: &Topology,
    start: Coord,
    face: Face,
    step_bound: usize,
) -> Result<Vec<Coord>, UnreachableTermination> {
    let mut position = start;
    let mut active = face;
    let mut steps = Vec::new();

    loop {
        if steps.len() >= step_bound {
            return Err(UnreachableTermination { coord: start });
        }

        let down = topology.down_direction(active);
        if is_open(grid, position + down) {
            grid.swap(position, position + down);
            position += down;
            steps.push(down);
            continue;
        }

        if let Some(adjacent) = topology.adjacent_face(position, active) {
            let adjacent_down = topology.down_direction(adjacent);
            if adjacent_down != down && is_open(grid, position + adjacent_down) {
                grid.swap(position, position + adjacent_down);
                position += adjacent_down;
                steps.push(adjacent_down);
                active = adjacent;
                continue;
            }
        }

        return Ok(steps);
    }
}

fn is_open(grid: &BoardGrid, coord: Coord) -> bool {
    grid.piece_at(coord).is_some_and(Piece::is_empty)
}
