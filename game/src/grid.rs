use serde::{Deserialize, Serialize};

use crate::position::GridPosition;

mod parse;
pub(crate) use parse::{EnemySpawn, LevelMetadata};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tile {
    Ground,
    Wall,
    CrackedWall,
}

impl Tile {
    pub(crate) fn collides(self) -> bool {
        matches!(self, Tile::Wall | Tile::CrackedWall)
    }

    pub(crate) fn is_destructible(self) -> bool {
        matches!(self, Tile::CrackedWall)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Biome {
    #[default]
    Forest,
    Desert,
    Winter,
}

#[derive(Clone, Debug)]
pub(crate) struct Grid {
    tiles: Vec<Vec<Tile>>,
    rows: usize,
    cols: usize,
    biome: Biome,
}

impl Grid {
    pub(crate) fn new(tiles: Vec<Vec<Tile>>, biome: Biome) -> Self {
        let rows = tiles.len();
        let cols = tiles.first().map_or(0, Vec::len);
        debug_assert!(tiles.iter().all(|row| row.len() == cols));
        Self {
            tiles,
            rows,
            cols,
            biome,
        }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    pub(crate) fn biome(&self) -> Biome {
        self.biome
    }

    pub(crate) fn bounds(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub(crate) fn in_bounds(&self, cell: GridPosition) -> bool {
        cell.in_bounds(self.bounds())
    }

    /// Cells outside the grid read as walls.
    pub(crate) fn at(&self, cell: GridPosition) -> Tile {
        if self.in_bounds(cell) {
            self.tiles[cell.row as usize][cell.col as usize]
        } else {
            Tile::Wall
        }
    }

    pub(crate) fn collides(&self, cell: GridPosition) -> bool {
        self.at(cell).collides()
    }

    /// Turns a cracked wall into ground. Returns false for any other tile.
    pub(crate) fn destruct_cracked_wall(&mut self, cell: GridPosition) -> bool {
        if !self.at(cell).is_destructible() {
            return false;
        }
        self.tiles[cell.row as usize][cell.col as usize] = Tile::Ground;
        true
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (GridPosition, Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .map(move |(col, &tile)| (GridPosition::new(row as i32, col as i32), tile))
        })
    }

    pub(crate) fn cells_of(&self, tile: Tile) -> impl Iterator<Item = GridPosition> + '_ {
        self.entries()
            .filter(move |&(_, t)| t == tile)
            .map(|(cell, _)| cell)
    }
}
