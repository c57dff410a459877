use std::collections::BTreeSet;
use std::time::Duration;

use crate::direction::Dir4;
use crate::entity::{Body, EntityId};
use crate::grid::{Grid, Tile};
use crate::position::GridPosition;

use super::ObjectIndex;
use super::objects::GameObject;

pub(crate) const FUSE: Duration = Duration::from_millis(3500);

/// Cells a blast reaches along each axis, the origin included.
pub(crate) const BLAST_RANGE: usize = 3;

/// The origin plus, per direction, open ground up to the range limit. A
/// cracked wall is reached but stops that direction.
pub(crate) fn blast_cells(grid: &Grid, origin: GridPosition) -> Vec<GridPosition> {
    let mut cells = vec![origin];
    for dir in Dir4::all() {
        let mut cell = origin;
        for _ in 1..BLAST_RANGE {
            cell = cell.neighbor(dir);
            if !grid.in_bounds(cell) {
                break;
            }
            match grid.at(cell) {
                Tile::Wall => break,
                Tile::Ground => cells.push(cell),
                Tile::CrackedWall => {
                    cells.push(cell);
                    break;
                }
            }
        }
    }
    cells
}

/// Outcome of the detonations of one tick.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Detonation {
    pub(crate) blasted: BTreeSet<GridPosition>,
    /// One entry per explosive that hit the entity.
    pub(crate) damaged: Vec<EntityId>,
}

/// Detonates every origin whose fuse ran out.
///
/// Each blast cell gets an explosion, and every entity standing in one takes
/// a point of damage from each explosive whose blast covers it. Other
/// dynamite caught in a blast keeps burning its own fuse.
pub(crate) fn detonate(
    origins: &[GridPosition],
    now: Duration,
    grid: &Grid,
    objects: &mut ObjectIndex,
    bodies: &mut [&mut Body],
) -> Detonation {
    let mut result = Detonation::default();

    for &origin in origins {
        log::info!("dynamite at {origin:?} detonates");
        let mut hit = BTreeSet::new();
        for cell in blast_cells(grid, origin) {
            if result.blasted.insert(cell) {
                objects.add(GameObject::explosion(cell, now));
            }

            let area = cell.rect();
            for body in bodies.iter_mut() {
                if body.footprint().intersects(area) && hit.insert(body.id()) {
                    body.damage(now);
                    result.damaged.push(body.id());
                }
            }
        }
    }
    result
}
