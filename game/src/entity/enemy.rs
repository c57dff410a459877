use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::Timer;
use crate::direction::Dir4;
use crate::grid::EnemySpawn;
use crate::position::TILE_SIZE;

use super::navigation::{self, Navigator, Route};
use super::{Body, EntityId, EntityState, FrameTable, Player, Terrain};

const ATTACK_WAIT: Duration = Duration::from_secs(2);
const ATTACK_COOLDOWN: Duration = Duration::from_secs(1);
const WAYPOINT_WAIT: Duration = Duration::from_millis(1500);
const PURSUIT_FAILURE_WAIT: Duration = Duration::from_secs(1);
const SCAN_RANGE: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum EnemyKind {
    Goblin,
    Slime,
    Vampire,
}

impl EnemyKind {
    pub(crate) fn frames(self) -> FrameTable {
        match self {
            EnemyKind::Goblin => FrameTable::GOBLIN,
            EnemyKind::Slime => FrameTable::SLIME,
            EnemyKind::Vampire => FrameTable::VAMPIRE,
        }
    }

    pub(crate) fn all() -> [Self; 3] {
        [Self::Goblin, Self::Slime, Self::Vampire]
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    kind: EnemyKind,
    body: Body,
    facing: Dir4,
    route: Route,
    navigator: Navigator,
    /// While running the enemy stands still.
    wait: Timer,
    attack_cooldown: Timer,
}

impl Enemy {
    pub(crate) fn spawn(
        id: EntityId,
        spawn: &EnemySpawn,
        terrain: &Terrain,
        now: Duration,
        rng: &mut impl Rng,
    ) -> Self {
        let body = Body::new(
            id,
            spawn.cell,
            spawn.health,
            spawn.speed,
            spawn.kind.frames(),
            now,
        );
        let (navigator, route) = match spawn.kind {
            EnemyKind::Goblin => (
                Navigator::RandomWalk {
                    path_length: spawn.path_length,
                },
                Route::new(navigation::random_path(
                    terrain,
                    id,
                    spawn.cell,
                    spawn.path_length,
                    rng,
                )),
            ),
            EnemyKind::Slime => (
                Navigator::Patrol { forward: true },
                Route::new(spawn.route.clone()),
            ),
            EnemyKind::Vampire => (
                Navigator::Pursuit {
                    path_length: spawn.path_length,
                    scan_range: SCAN_RANGE,
                    chasing: false,
                },
                Route::new(navigation::random_path(
                    terrain,
                    id,
                    spawn.cell,
                    spawn.path_length,
                    rng,
                )),
            ),
        };
        Self {
            kind: spawn.kind,
            body,
            facing: Dir4::Down,
            route,
            navigator,
            wait: Timer::new(Duration::ZERO),
            attack_cooldown: Timer::new(ATTACK_COOLDOWN),
        }
    }

    pub(crate) fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub(crate) fn body(&self) -> &Body {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub(crate) fn facing(&self) -> Dir4 {
        self.facing
    }

    pub(crate) fn route(&self) -> &Route {
        &self.route
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.body.is_finished()
    }

    pub(crate) fn update(
        &mut self,
        now: Duration,
        terrain: &Terrain,
        player: &mut Player,
        rng: &mut impl Rng,
    ) {
        if self.body.update_animation(now) == Some(EntityState::Attack) {
            self.after_attack(now);
        }
        if matches!(self.body.state(), EntityState::Death | EntityState::Hurt) {
            return;
        }

        self.check_player_collision(now, player);
        if self.body.state() == EntityState::Attack {
            return;
        }

        if !self.wait.is_end(now) {
            self.body.set_state(EntityState::Idle, now);
        } else if self.try_move(now, terrain, player, rng) {
            self.body.set_state(EntityState::Walk, now);
        }
    }

    pub(crate) fn pause(&mut self, now: Duration) {
        self.body.pause(now);
        self.wait.stop(now);
        self.attack_cooldown.stop(now);
    }

    pub(crate) fn resume(&mut self, now: Duration) {
        self.body.resume(now);
        self.wait.resume(now);
        self.attack_cooldown.resume(now);
    }

    fn set_wait(&mut self, duration: Duration, now: Duration) {
        self.wait.set_duration(duration);
        self.wait.start(now);
    }

    fn after_attack(&mut self, now: Duration) {
        self.body.set_state(EntityState::Idle, now);
        self.set_wait(ATTACK_WAIT, now);
        self.attack_cooldown.start(now);
    }

    fn check_player_collision(&mut self, now: Duration, player: &mut Player) {
        let target = player.body();
        if self.body.state() == EntityState::Attack
            || !self.attack_cooldown.is_end(now)
            || !target.footprint().intersects(self.body.solid_rect())
            || target.is_dead()
        {
            return;
        }
        if let Some(dir) = Dir4::toward(target.position() - self.body.position()) {
            self.facing = dir;
        }
        self.body.set_state(EntityState::Attack, now);
        player.body_mut().damage(now);
    }

    /// Returns true when the enemy actually moved.
    fn try_move(
        &mut self,
        now: Duration,
        terrain: &Terrain,
        player: &Player,
        rng: &mut impl Rng,
    ) -> bool {
        if let Navigator::Pursuit {
            scan_range,
            chasing,
            ..
        } = &mut self.navigator
        {
            *chasing = false;
            let offset = player.body().position() - self.body.position();
            if offset.dx.abs() / TILE_SIZE <= *scan_range && offset.dy.abs() / TILE_SIZE <= *scan_range {
                let id = self.body.id();
                let path = navigation::shortest_path(terrain, id, self.body.cell(), player.body().cell());
                if !path.is_empty() {
                    *chasing = true;
                    let spliced = navigation::splice(path, self.route.current(), terrain, id);
                    log::debug!("{:?} {:?} chasing along {} cells", self.kind, id, spliced.len());
                    self.route = Route::new(spliced);
                    if self.route.waypoints().is_empty() {
                        return false;
                    }
                }
            }
        }

        let Some(target_cell) = self.route.current() else {
            self.on_path_end(now, terrain, rng);
            return false;
        };
        let target = target_cell.center();
        let Some(dir) = Dir4::toward(target - self.body.position()) else {
            self.on_arrival(now, terrain, rng);
            return false;
        };

        match terrain.straight_move(self.body.id(), self.body.position(), dir, self.body.speed()) {
            Some(next) => {
                self.body.set_position(next);
                self.facing = dir;
                let remaining = target - next;
                let speed = self.body.speed();
                if remaining.dx.abs() <= speed && remaining.dy.abs() <= speed {
                    self.body.set_position(target);
                    self.on_arrival(now, terrain, rng);
                }
                true
            }
            None => {
                self.on_move_failure(now, terrain, rng);
                false
            }
        }
    }

    fn regenerate_path(&mut self, terrain: &Terrain, path_length: usize, rng: &mut impl Rng) {
        let path = navigation::random_path(terrain, self.body.id(), self.body.cell(), path_length, rng);
        log::debug!("{:?} {:?} wanders along {:?}", self.kind, self.body.id(), path);
        self.route = Route::new(path);
    }

    fn on_arrival(&mut self, now: Duration, terrain: &Terrain, rng: &mut impl Rng) {
        match &mut self.navigator {
            Navigator::Patrol { forward } => {
                self.route.step_patrol(forward);
                self.set_wait(WAYPOINT_WAIT, now);
            }
            Navigator::RandomWalk { .. } | Navigator::Pursuit { .. } => {
                self.route.advance();
                if self.route.is_exhausted() {
                    self.on_path_end(now, terrain, rng);
                }
            }
        }
    }

    fn on_path_end(&mut self, now: Duration, terrain: &Terrain, rng: &mut impl Rng) {
        match &mut self.navigator {
            Navigator::Patrol { forward } => {
                self.route.restart_patrol_from_end(forward);
            }
            Navigator::RandomWalk { path_length } | Navigator::Pursuit { path_length, .. } => {
                let path_length = *path_length;
                self.regenerate_path(terrain, path_length, rng);
            }
        }
        self.set_wait(WAYPOINT_WAIT, now);
    }

    fn on_move_failure(&mut self, now: Duration, terrain: &Terrain, rng: &mut impl Rng) {
        match &mut self.navigator {
            Navigator::RandomWalk { path_length } => {
                let path_length = *path_length;
                self.set_wait(WAYPOINT_WAIT, now);
                self.regenerate_path(terrain, path_length, rng);
            }
            Navigator::Patrol { forward } => {
                self.route.reverse_patrol(forward);
                self.set_wait(WAYPOINT_WAIT, now);
            }
            Navigator::Pursuit {
                path_length,
                chasing,
                ..
            } => {
                let (path_length, chasing) = (*path_length, *chasing);
                if !chasing {
                    self.regenerate_path(terrain, path_length, rng);
                }
                self.set_wait(PURSUIT_FAILURE_WAIT, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::grid::{Biome, Grid};
    use crate::position::{GridPosition, Position};
    use crate::world::{GameObject, ObjectIndex};

    const HALL: &str = "\
#,#,#,#,#,#,#,#,#
#,.,.,.,.,.,.,.,#
#,.,#,#,#,#,#,.,#
#,.,.,.,.,.,.,.,#
#,K,D,#,#,#,#,#,#
";

    fn cell(row: i32, col: i32) -> GridPosition {
        GridPosition::new(row, col)
    }

    fn spawn(kind: EnemyKind, at: GridPosition, route: Vec<GridPosition>) -> EnemySpawn {
        EnemySpawn {
            kind,
            cell: at,
            route,
            path_length: 4,
            speed: 1,
            health: 1,
        }
    }

    struct Fixture {
        grid: Grid,
        objects: ObjectIndex,
        player: Player,
        rng: StdRng,
        now: Duration,
    }

    impl Fixture {
        fn new(player_cell: GridPosition) -> Self {
            Self {
                grid: Grid::from_csv(HALL, Biome::Forest).unwrap().0,
                objects: ObjectIndex::default(),
                player: Player::new(player_cell, 4, 3, Duration::ZERO),
                rng: StdRng::seed_from_u64(11),
                now: Duration::ZERO,
            }
        }

        fn spawn(&mut self, spawn: &EnemySpawn) -> Enemy {
            let terrain = Terrain::new(&self.grid, &self.objects);
            Enemy::spawn(EntityId(1), spawn, &terrain, self.now, &mut self.rng)
        }

        fn block(&mut self, at: GridPosition) {
            self.objects.add(GameObject::dynamite(at, Vec::new(), self.now));
        }

        fn tick(&mut self, enemy: &mut Enemy) {
            self.now += crate::clock::TICK;
            let terrain = Terrain::new(&self.grid, &self.objects);
            enemy.update(self.now, &terrain, &mut self.player, &mut self.rng);
        }
    }

    #[test]
    fn patrol_reaches_end_then_targets_previous_waypoint() {
        let mut fx = Fixture::new(cell(3, 7));
        let route = vec![cell(1, 1), cell(1, 3), cell(1, 5)];
        let mut slime = fx.spawn(&spawn(EnemyKind::Slime, cell(1, 1), route));

        for _ in 0..2000 {
            fx.tick(&mut slime);
            if slime.body().position() == cell(1, 5).center() {
                break;
            }
        }
        assert_eq!(slime.body().position(), cell(1, 5).center());
        assert_eq!(slime.route().current(), Some(cell(1, 3)));
    }

    #[test]
    fn patrol_waits_at_each_waypoint() {
        let mut fx = Fixture::new(cell(3, 7));
        let route = vec![cell(1, 1), cell(1, 2)];
        let mut slime = fx.spawn(&spawn(EnemyKind::Slime, cell(1, 1), route));

        // First tick arrives at the starting waypoint and starts waiting.
        fx.tick(&mut slime);
        let start = slime.body().position();
        for _ in 0..60 {
            fx.tick(&mut slime);
        }
        assert_eq!(slime.body().position(), start);
        assert_eq!(slime.body().state(), EntityState::Idle);
    }

    #[test]
    fn pursuit_out_of_range_keeps_random_walk_path() {
        let mut fx = Fixture::new(cell(3, 7));
        let mut vampire = fx.spawn(&spawn(EnemyKind::Vampire, cell(1, 1), Vec::new()));
        let path = vampire.route().waypoints().to_vec();
        assert!(!path.is_empty() && path.len() <= 4);
        for step in &path {
            assert!(!fx.grid.collides(*step));
        }

        fx.tick(&mut vampire);
        assert_eq!(vampire.route().waypoints(), path.as_slice());
        assert!(matches!(
            vampire.navigator,
            Navigator::Pursuit { chasing: false, .. }
        ));
    }

    #[test]
    fn pursuit_in_range_chases_the_player() {
        let mut fx = Fixture::new(cell(1, 3));
        let mut vampire = fx.spawn(&spawn(EnemyKind::Vampire, cell(1, 1), Vec::new()));
        fx.tick(&mut vampire);
        assert!(matches!(
            vampire.navigator,
            Navigator::Pursuit { chasing: true, .. }
        ));
        assert_eq!(vampire.route().waypoints().last(), Some(&cell(1, 3)));
    }

    #[test]
    fn touching_the_player_attacks_once_per_cooldown() {
        let mut fx = Fixture::new(cell(1, 2));
        let mut goblin = fx.spawn(&spawn(EnemyKind::Goblin, cell(1, 1), Vec::new()));
        // Put the player's center just inside the goblin's rectangle.
        fx.player
            .body_mut()
            .set_position(Position::new(cell(1, 1).center().x + 31, cell(1, 1).center().y));

        fx.tick(&mut goblin);
        assert_eq!(goblin.body().state(), EntityState::Attack);
        assert_eq!(goblin.facing(), Dir4::Right);
        assert_eq!(fx.player.body().health(), 3);

        for _ in 0..30 {
            fx.tick(&mut goblin);
        }
        assert_eq!(fx.player.body().health(), 3);
    }

    #[test]
    fn attack_completion_waits_then_cools_down() {
        let mut fx = Fixture::new(cell(1, 2));
        let mut goblin = fx.spawn(&spawn(EnemyKind::Goblin, cell(1, 1), Vec::new()));
        fx.player
            .body_mut()
            .set_position(Position::new(cell(1, 1).center().x + 31, cell(1, 1).center().y));
        fx.tick(&mut goblin);

        // The attack animation runs under a second, then the cooldown starts.
        for _ in 0..70 {
            fx.tick(&mut goblin);
        }
        assert_eq!(goblin.body().state(), EntityState::Idle);
        assert_eq!(goblin.body().position(), cell(1, 1).center());
        assert_eq!(fx.player.body().health(), 3);

        // One second later the cooldown is over and contact attacks again.
        for _ in 0..60 {
            fx.tick(&mut goblin);
        }
        assert_eq!(goblin.body().state(), EntityState::Attack);
        assert_eq!(fx.player.body().health(), 2);
    }

    #[test]
    fn paused_enemy_keeps_waiting() {
        let mut fx = Fixture::new(cell(3, 7));
        let mut slime = fx.spawn(&spawn(EnemyKind::Slime, cell(1, 1), vec![cell(1, 1), cell(1, 2)]));
        fx.tick(&mut slime);
        slime.pause(fx.now);
        fx.now += Duration::from_secs(10);
        slime.resume(fx.now);
        for _ in 0..60 {
            fx.tick(&mut slime);
        }
        assert_eq!(slime.body().position(), cell(1, 1).center());
    }

    /// A center one pixel short of the right edge of `at`.
    fn right_edge(at: GridPosition) -> Position {
        Position::new(at.neighbor(Dir4::Right).origin().x - 1, at.center().y)
    }

    #[test]
    fn blocked_random_walk_replans_and_waits() {
        let mut fx = Fixture::new(cell(3, 7));
        let mut goblin = fx.spawn(&spawn(EnemyKind::Goblin, cell(1, 1), Vec::new()));
        fx.block(cell(1, 2));
        goblin.route = Route::new(vec![cell(1, 2), cell(1, 3)]);
        let start = right_edge(cell(1, 1));
        goblin.body.set_position(start);

        fx.tick(&mut goblin);
        assert_eq!(goblin.body().position(), start);
        assert_eq!(goblin.route().current(), Some(cell(2, 1)));
        assert!(!goblin.route().waypoints().contains(&cell(1, 2)));

        for _ in 0..80 {
            fx.tick(&mut goblin);
        }
        assert_eq!(goblin.body().position(), start);
        assert_eq!(goblin.body().state(), EntityState::Idle);
    }

    #[test]
    fn blocked_patrol_turns_around_and_waits() {
        let mut fx = Fixture::new(cell(3, 7));
        let route = vec![cell(1, 1), cell(1, 2), cell(1, 3)];
        let mut slime = fx.spawn(&spawn(EnemyKind::Slime, cell(1, 1), route));
        fx.block(cell(1, 2));
        slime.route.advance();
        let start = right_edge(cell(1, 1));
        slime.body.set_position(start);

        fx.tick(&mut slime);
        assert_eq!(slime.route().current(), Some(cell(1, 1)));
        assert!(matches!(slime.navigator, Navigator::Patrol { forward: false }));

        for _ in 0..80 {
            fx.tick(&mut slime);
        }
        assert_eq!(slime.body().position(), start);
    }

    #[test]
    fn blocked_chase_keeps_its_path() {
        // The spliced path heads for (3, 1) straight through the wall below.
        let mut fx = Fixture::new(cell(3, 2));
        let mut vampire = fx.spawn(&spawn(EnemyKind::Vampire, cell(1, 2), Vec::new()));
        vampire.route = Route::new(vec![cell(3, 1)]);
        let start = Position::new(cell(1, 2).center().x, cell(2, 2).origin().y - 1);
        vampire.body.set_position(start);

        fx.tick(&mut vampire);
        assert!(matches!(
            vampire.navigator,
            Navigator::Pursuit { chasing: true, .. }
        ));
        assert_eq!(vampire.route().waypoints(), &[cell(3, 1), cell(3, 2)]);

        for _ in 0..50 {
            fx.tick(&mut vampire);
        }
        assert_eq!(vampire.body().position(), start);
        assert_eq!(vampire.route().waypoints(), &[cell(3, 1), cell(3, 2)]);
    }

    #[test]
    fn blocked_wander_out_of_range_replans() {
        let mut fx = Fixture::new(cell(3, 7));
        let mut vampire = fx.spawn(&spawn(EnemyKind::Vampire, cell(1, 1), Vec::new()));
        fx.block(cell(1, 2));
        vampire.route = Route::new(vec![cell(1, 2), cell(1, 3)]);
        let start = right_edge(cell(1, 1));
        vampire.body.set_position(start);

        fx.tick(&mut vampire);
        assert!(matches!(
            vampire.navigator,
            Navigator::Pursuit { chasing: false, .. }
        ));
        assert_eq!(vampire.route().current(), Some(cell(2, 1)));

        for _ in 0..50 {
            fx.tick(&mut vampire);
        }
        assert_eq!(vampire.body().position(), start);
    }
}
