use std::collections::{HashMap, HashSet, VecDeque};

use rand::Rng;

use crate::direction::Dir4;
use crate::position::GridPosition;

use super::{EntityId, Terrain};

/// How an enemy picks its next waypoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Navigator {
    /// Wanders along freshly generated random paths.
    RandomWalk { path_length: usize },
    /// Walks an authored route back and forth.
    Patrol { forward: bool },
    /// Wanders like `RandomWalk` until the player is within `scan_range`
    /// tiles, then follows the shortest path to them.
    Pursuit {
        path_length: usize,
        scan_range: i32,
        chasing: bool,
    },
}

/// Waypoints plus the index of the one currently being walked to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Route {
    waypoints: Vec<GridPosition>,
    index: usize,
}

impl Route {
    pub(crate) fn new(waypoints: Vec<GridPosition>) -> Self {
        Self {
            waypoints,
            index: 0,
        }
    }

    pub(crate) fn waypoints(&self) -> &[GridPosition] {
        &self.waypoints
    }

    pub(crate) fn current(&self) -> Option<GridPosition> {
        self.waypoints.get(self.index).copied()
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.index >= self.waypoints.len()
    }

    pub(crate) fn advance(&mut self) {
        self.index += 1;
    }

    fn last(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Moves to the next waypoint in the travel direction, turning around at
    /// either end of the route.
    pub(crate) fn step_patrol(&mut self, forward: &mut bool) {
        let last = self.last();
        let index = self.index.min(last);
        self.index = match (*forward, index) {
            (true, i) if i < last => i + 1,
            (true, i) => {
                *forward = false;
                i.saturating_sub(1)
            }
            (false, 0) => {
                *forward = true;
                1.min(last)
            }
            (false, i) => i - 1,
        };
    }

    /// Turns around after a blocked move. The index steps once in the new
    /// direction and is clamped to the route.
    pub(crate) fn reverse_patrol(&mut self, forward: &mut bool) {
        let last = self.last() as i64;
        let next = if *forward {
            self.index as i64 - 1
        } else {
            self.index as i64 + 1
        };
        *forward = !*forward;
        if next < 0 {
            self.index = 0;
            *forward = true;
        } else if next > last {
            self.index = last as usize;
            *forward = false;
        } else {
            self.index = next as usize;
        }
    }

    /// Clamps to the final waypoint and heads back.
    pub(crate) fn restart_patrol_from_end(&mut self, forward: &mut bool) {
        self.index = self.last();
        *forward = false;
    }
}

/// A self-avoiding random walk of up to `length` cells starting next to
/// `from`. A mover with nowhere to go gets a path holding only its own cell.
pub(crate) fn random_path(
    terrain: &Terrain,
    id: EntityId,
    from: GridPosition,
    length: usize,
    rng: &mut impl Rng,
) -> Vec<GridPosition> {
    let mut path = Vec::with_capacity(length);
    let mut visited = HashSet::from([from]);
    let mut current = from;

    while path.len() < length {
        let open: Vec<GridPosition> = Dir4::all()
            .into_iter()
            .map(|dir| current.neighbor(dir))
            .filter(|next| !visited.contains(next) && terrain.is_passable(*next, id))
            .collect();
        if open.is_empty() {
            break;
        }
        let next = open[rng.random_range(0..open.len())];
        path.push(next);
        visited.insert(next);
        current = next;
    }

    if path.is_empty() {
        path.push(from);
    }
    path
}

/// Breadth-first search over passable cells. The result starts at `start`
/// and ends at `goal`, or is empty when `goal` cannot be reached.
pub(crate) fn shortest_path(
    terrain: &Terrain,
    id: EntityId,
    start: GridPosition,
    goal: GridPosition,
) -> Vec<GridPosition> {
    if start == goal {
        return vec![start];
    }

    let mut parents: HashMap<GridPosition, GridPosition> = HashMap::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            let mut path = vec![goal];
            let mut cell = goal;
            while let Some(&parent) = parents.get(&cell) {
                path.push(parent);
                cell = parent;
            }
            path.reverse();
            return path;
        }

        for dir in Dir4::all() {
            let next = current.neighbor(dir);
            if visited.contains(&next) || !terrain.is_passable(next, id) {
                continue;
            }
            visited.insert(next);
            parents.insert(next, current);
            queue.push_back(next);
        }
    }

    Vec::new()
}

/// Rebases a fresh chase path on the waypoint already being walked to, so a
/// replan never yanks the mover backwards mid-step.
pub(crate) fn splice(
    mut path: Vec<GridPosition>,
    current: Option<GridPosition>,
    terrain: &Terrain,
    id: EntityId,
) -> Vec<GridPosition> {
    if let Some(target) = current {
        let start = match path.iter().position(|&cell| cell == target) {
            Some(i) => i,
            None => {
                path.insert(0, target);
                0
            }
        };
        path.drain(..start);
    }
    if path
        .first()
        .is_some_and(|&head| terrain.objects.blocks(head, id))
    {
        path.remove(0);
    }
    path
}
