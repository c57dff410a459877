use crate::direction::Dir4;
use crate::grid::Grid;
use crate::position::{GridPosition, Position, Rect, TILE_SIZE};
use crate::world::ObjectIndex;

use super::EntityId;

/// Read-only view of everything that can stop a mover.
#[derive(Clone, Copy)]
pub(crate) struct Terrain<'a> {
    pub(crate) grid: &'a Grid,
    pub(crate) objects: &'a ObjectIndex,
}

impl<'a> Terrain<'a> {
    pub(crate) fn new(grid: &'a Grid, objects: &'a ObjectIndex) -> Self {
        Self { grid, objects }
    }

    /// In bounds, open tile, and no placed object there collides with `id`.
    pub(crate) fn is_passable(&self, cell: GridPosition, id: EntityId) -> bool {
        self.grid.in_bounds(cell) && !self.grid.collides(cell) && !self.objects.blocks(cell, id)
    }

    /// Candidate center after moving `speed` pixels, if the cell it lands in is passable.
    pub(crate) fn straight_move(
        &self,
        id: EntityId,
        from: Position,
        dir: Dir4,
        speed: i32,
    ) -> Option<Position> {
        let candidate = from.step(dir, speed);
        self.is_passable(candidate.cell(), id).then_some(candidate)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Tile containing this corner of `solid` placed at `center`.
    fn cell(self, center: Position, solid: Rect) -> GridPosition {
        let left = (center.x + solid.x).div_euclid(TILE_SIZE);
        let right = (center.x + solid.x + solid.width - 1).div_euclid(TILE_SIZE);
        let top = (center.y + solid.y).div_euclid(TILE_SIZE);
        let bottom = (center.y + solid.y + solid.height - 1).div_euclid(TILE_SIZE);
        match self {
            Corner::TopLeft => GridPosition::new(top, left),
            Corner::TopRight => GridPosition::new(top, right),
            Corner::BottomLeft => GridPosition::new(bottom, left),
            Corner::BottomRight => GridPosition::new(bottom, right),
        }
    }

    fn is_free(self, grid: &Grid, center: Position, solid: Rect) -> bool {
        !grid.collides(self.cell(center, solid))
    }
}

/// The two corners that lead a move in `dir`, each paired with the
/// perpendicular slide toward its side.
fn leading_corners(dir: Dir4) -> [(Corner, Dir4); 2] {
    match dir {
        Dir4::Right => [(Corner::TopRight, Dir4::Up), (Corner::BottomRight, Dir4::Down)],
        Dir4::Left => [(Corner::TopLeft, Dir4::Up), (Corner::BottomLeft, Dir4::Down)],
        Dir4::Up => [(Corner::TopLeft, Dir4::Left), (Corner::TopRight, Dir4::Right)],
        Dir4::Down => [(Corner::BottomLeft, Dir4::Left), (Corner::BottomRight, Dir4::Right)],
    }
}

/// The center coordinate along `slide` lies strictly inside the tile that
/// holds the edge facing `slide`.
fn edge_contains_center(slide: Dir4, center: Position, solid: Rect) -> bool {
    let (coord, edge) = match slide {
        Dir4::Up => (center.y, center.y + solid.y),
        Dir4::Down => (center.y, center.y + solid.y + solid.height - 1),
        Dir4::Left => (center.x, center.x + solid.x),
        Dir4::Right => (center.x, center.x + solid.x + solid.width - 1),
    };
    let tile_start = edge.div_euclid(TILE_SIZE) * TILE_SIZE;
    tile_start < coord && coord < tile_start + TILE_SIZE
}

/// Tile-only movement with corner sliding, so a mover that is slightly off a
/// corridor gets nudged into it instead of stopping dead.
pub(crate) fn slide_move(
    grid: &Grid,
    from: Position,
    solid: Rect,
    dir: Dir4,
    speed: i32,
) -> Option<Position> {
    let straight = from.step(dir, speed);
    let corners = leading_corners(dir);
    let free = corners.map(|(corner, _)| corner.is_free(grid, straight, solid));
    if free.iter().all(|&f| f) {
        return Some(straight);
    }

    for ((corner, slide), was_free) in corners.into_iter().zip(free) {
        if !was_free {
            continue;
        }
        let slid = from.step(slide, speed);
        if corner.is_free(grid, slid, solid) && edge_contains_center(slide, slid, solid) {
            return Some(slid);
        }
    }
    None
}
