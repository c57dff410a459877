use std::collections::BTreeMap;
use std::iter;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::Clock;
use crate::entity::{Body, Enemy, EnemyKind, EntityId, Player, Terrain};
use crate::grid::{Grid, Tile};
use crate::levels::Level;
use crate::position::{GridPosition, Rect};

mod explosive;
mod object_index;
mod objects;

pub(crate) use object_index::ObjectIndex;
pub(crate) use objects::{Capability, DoorState, GameObject, HiddenItemKind, ObjectKind};

use objects::ObjectEvent;

/// One running level: terrain, placed objects, the player and the enemies,
/// all advanced together by [`World::update`].
pub(crate) struct World {
    level: Level,
    clock: Clock,
    rng: StdRng,
    grid: Grid,
    objects: ObjectIndex,
    player: Player,
    enemies: Vec<Enemy>,
    kills: BTreeMap<EnemyKind, u32>,
}

impl World {
    pub(crate) fn new(level: Level, seed: u64) -> Self {
        let clock = Clock::new();
        let player = Player::new(
            level.metadata.player.cell,
            level.metadata.player.health,
            level.metadata.player.dynamites,
            clock.now(),
        );
        let mut world = Self {
            grid: level.grid.clone(),
            level,
            clock,
            rng: StdRng::seed_from_u64(seed),
            objects: ObjectIndex::default(),
            player,
            enemies: Vec::new(),
            kills: BTreeMap::new(),
        };
        world.reset();
        world
    }

    /// Rebuilds everything from the level data, rerolling hidden items.
    pub(crate) fn reset(&mut self) {
        let now = self.clock.now();
        self.clock.resume();
        self.grid = self.level.grid.clone();
        self.objects = ObjectIndex::default();
        self.kills.clear();
        let spawn = &self.level.metadata.player;
        self.player = Player::new(spawn.cell, spawn.health, spawn.dynamites, now);

        self.place_hidden_items(now);
        self.objects
            .add(GameObject::hidden(self.level.key, HiddenItemKind::Key, now));
        self.objects.add(GameObject::door(self.level.door, now));

        let terrain = Terrain::new(&self.grid, &self.objects);
        self.enemies = self
            .level
            .metadata
            .enemies
            .iter()
            .enumerate()
            .map(|(i, spawn)| {
                let id = EntityId(i as u32 + 1);
                Enemy::spawn(id, spawn, &terrain, now, &mut self.rng)
            })
            .collect();

        log::info!(
            "level {:?} reset with {} enemies",
            self.level.name,
            self.enemies.len()
        );
    }

    fn place_hidden_items(&mut self, now: Duration) {
        let config = &self.level.metadata.hidden_items;
        let total: f64 = config.weights.values().sum();
        if total <= 0.0 {
            return;
        }

        let cracked: Vec<GridPosition> = self.grid.cells_of(Tile::CrackedWall).collect();
        for cell in cracked {
            if self.rng.random::<f64>() >= config.chance {
                continue;
            }
            let mut roll = self.rng.random::<f64>() * total;
            let item = config
                .weights
                .iter()
                .find_map(|(&kind, &weight)| {
                    if roll < weight {
                        Some(kind)
                    } else {
                        roll -= weight;
                        None
                    }
                })
                .or_else(|| config.weights.keys().next_back().copied());
            if let Some(item) = item {
                self.objects.add(GameObject::hidden(cell, item, now));
            }
        }
    }

    pub(crate) fn update(&mut self, dt: Duration) {
        self.clock.advance(dt);
        if self.clock.is_paused() {
            return;
        }
        let now = self.clock.now();

        self.update_objects(now);

        let terrain = Terrain::new(&self.grid, &self.objects);
        if let Some(cell) = self.player.update(now, &terrain) {
            self.interact(cell);
        }

        let terrain = Terrain::new(&self.grid, &self.objects);
        for enemy in &mut self.enemies {
            enemy.update(now, &terrain, &mut self.player, &mut self.rng);
        }

        let kills = &mut self.kills;
        self.enemies.retain(|enemy| {
            if !enemy.is_finished() {
                return true;
            }
            log::debug!("{:?} {:?} killed", enemy.kind(), enemy.body().id());
            *kills.entry(enemy.kind()).or_default() += 1;
            false
        });
    }

    fn update_objects(&mut self, now: Duration) {
        let footprints: Vec<(EntityId, Rect)> = self
            .bodies()
            .map(|body| (body.id(), body.footprint()))
            .collect();

        let mut events = Vec::new();
        let grid = &mut self.grid;
        self.objects
            .update(|object| events.extend(object.update(now, grid, &footprints)));

        let mut fuses = Vec::new();
        for event in events {
            match event {
                ObjectEvent::FuseBurnedOut(cell) => fuses.push(cell),
                ObjectEvent::Uncovered(cell) => {
                    if let Some(item) = self.objects.get_by_capability_mut(cell, Capability::Reveal) {
                        item.reveal();
                        log::debug!("uncovered {:?} at {cell:?}", item.hidden_item());
                    }
                }
            }
        }

        if !fuses.is_empty() {
            let mut bodies: Vec<&mut Body> = iter::once(self.player.body_mut())
                .chain(self.enemies.iter_mut().map(Enemy::body_mut))
                .collect();
            let blast = explosive::detonate(&fuses, now, &self.grid, &mut self.objects, &mut bodies);
            log::debug!(
                "{} blast cells, {} hits",
                blast.blasted.len(),
                blast.damaged.len()
            );
            self.objects.prune();
        }
    }

    fn bodies(&self) -> impl Iterator<Item = &Body> {
        iter::once(self.player.body()).chain(self.enemies.iter().map(Enemy::body))
    }

    /// Drops a dynamite under the player. Entities already on the cell may
    /// walk off it freely.
    pub(crate) fn place_explosive(&mut self) -> bool {
        let cell = self.player.body().cell();
        if self.clock.is_paused()
            || self.player.body().is_dead()
            || self.player.dynamites() < 1
            || self.objects.is_occupied(cell)
        {
            return false;
        }

        let now = self.clock.now();
        let area = cell.rect();
        let exempt = self
            .bodies()
            .filter(|body| body.solid_rect().intersects(area))
            .map(Body::id)
            .collect();
        self.objects.add(GameObject::dynamite(cell, exempt, now));
        self.player.use_dynamite(now);
        log::debug!("dynamite placed at {cell:?}");
        true
    }

    fn interact(&mut self, cell: GridPosition) {
        let now = self.clock.now();
        let condition_met = self.is_level_condition_completed();
        let Some(object) = self.objects.get_by_capability_mut(cell, Capability::Interact) else {
            return;
        };

        if object.door_state().is_some() {
            if condition_met && object.open(now) {
                log::info!("door at {cell:?} starts opening");
            }
            return;
        }

        let Some(item) = object.hidden_item() else {
            return;
        };
        match item {
            HiddenItemKind::Key => self.player.store_key(),
            HiddenItemKind::AddHealth => self.player.body_mut().add_health(),
            HiddenItemKind::AddDynamite => self.player.add_dynamite(),
            HiddenItemKind::Damage => self.player.body_mut().damage(now),
        }
        object.finish();
        log::debug!("player picked up {item:?}");
    }

    /// Pauses or resumes simulated time.
    pub(crate) fn game_timer(&mut self, running: bool) {
        if running != self.clock.is_paused() {
            return;
        }
        let now = self.clock.now();
        if running {
            self.player.resume(now);
            self.enemies.iter_mut().for_each(|e| e.resume(now));
            self.clock.resume();
            log::debug!("game resumed at {now:?}");
        } else {
            self.clock.pause();
            self.player.pause(now);
            self.enemies.iter_mut().for_each(|e| e.pause(now));
            log::debug!("game paused at {now:?}");
        }
    }

    #[cfg(test)]
    pub(crate) fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub(crate) fn is_level_condition_completed(&self) -> bool {
        let kills_met = self
            .level
            .metadata
            .required_kills
            .iter()
            .all(|(kind, &needed)| self.kills(*kind) >= needed);
        kills_met && self.player.has_key()
    }

    pub(crate) fn is_level_completed(&self) -> bool {
        let door_open = self
            .objects
            .get(self.level.door)
            .iter()
            .any(|o| o.door_state() == Some(DoorState::Open));
        door_open && self.player.body().cell() == self.level.door
    }

    pub(crate) fn is_game_over(&self) -> bool {
        self.player.is_finished()
    }

    pub(crate) fn kills(&self, kind: EnemyKind) -> u32 {
        self.kills.get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn required_kills(&self, kind: EnemyKind) -> u32 {
        self.level
            .metadata
            .required_kills
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn level(&self) -> &Level {
        &self.level
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn objects(&self) -> &ObjectIndex {
        &self.objects
    }

    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub(crate) fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    #[cfg(test)]
    pub(crate) fn now(&self) -> Duration {
        self.clock.now()
    }
}
