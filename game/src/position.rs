use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::direction::Dir4;

/// Edge length of a tile in pixels.
pub(crate) const TILE_SIZE: i32 = 64;

/// Continuous pixel coordinate. Entities store their center here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub(crate) struct Position {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Position {
    pub(crate) fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub(crate) fn cell(self) -> GridPosition {
        GridPosition::new(self.y.div_euclid(TILE_SIZE), self.x.div_euclid(TILE_SIZE))
    }

    pub(crate) fn step(self, dir: Dir4, distance: i32) -> Self {
        let delta = dir.delta();
        self + PositionDelta::new(delta.dx * distance, delta.dy * distance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PositionDelta {
    pub(crate) dx: i32,
    pub(crate) dy: i32,
}

impl PositionDelta {
    pub(crate) fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl Add<PositionDelta> for Position {
    type Output = Position;

    fn add(self, delta: PositionDelta) -> Position {
        Position::new(self.x + delta.dx, self.y + delta.dy)
    }
}

impl Sub for Position {
    type Output = PositionDelta;

    fn sub(self, other: Position) -> PositionDelta {
        PositionDelta::new(self.x - other.x, self.y - other.y)
    }
}

/// Discrete tile coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub(crate) struct GridPosition {
    pub(crate) row: i32,
    pub(crate) col: i32,
}

impl GridPosition {
    pub(crate) fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Pixel center of the cell, where entities stand.
    pub(crate) fn center(self) -> Position {
        let origin = self.origin();
        Position::new(origin.x + TILE_SIZE / 2, origin.y + TILE_SIZE / 2)
    }

    /// Top-left pixel of the cell, where objects are anchored.
    pub(crate) fn origin(self) -> Position {
        Position::new(self.col * TILE_SIZE, self.row * TILE_SIZE)
    }

    pub(crate) fn rect(self) -> Rect {
        let origin = self.origin();
        Rect::new(origin.x, origin.y, TILE_SIZE, TILE_SIZE)
    }

    pub(crate) fn neighbor(self, dir: Dir4) -> Self {
        let delta = dir.delta();
        Self::new(self.row + delta.dy, self.col + delta.dx)
    }

    /// `bounds` is `(rows, cols)`.
    pub(crate) fn in_bounds(self, bounds: (usize, usize)) -> bool {
        let (rows, cols) = bounds;
        let row_in_bounds = self.row >= 0 && (self.row as usize) < rows;
        let col_in_bounds = self.col >= 0 && (self.col as usize) < cols;
        row_in_bounds && col_in_bounds
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl Rect {
    pub(crate) fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn offset(self, by: Position) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Overlap of positive area. Rectangles that only share an edge do not intersect.
    pub(crate) fn intersects(self, other: Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_to_cell_uses_floor_division() {
        assert_eq!(Position::new(0, 0).cell(), GridPosition::new(0, 0));
        assert_eq!(Position::new(63, 64).cell(), GridPosition::new(1, 0));
        assert_eq!(Position::new(-1, 10).cell(), GridPosition::new(0, -1));
    }

    #[test]
    fn center_and_origin() {
        let cell = GridPosition::new(2, 3);
        assert_eq!(cell.origin(), Position::new(192, 128));
        assert_eq!(cell.center(), Position::new(224, 160));
        assert_eq!(cell.center().cell(), cell);
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 64, 64);
        assert!(!a.intersects(Rect::new(64, 0, 64, 64)));
        assert!(a.intersects(Rect::new(63, 63, 1, 1)));
        assert!(!a.intersects(Rect::new(10, 10, 0, 5)));
    }
}
