use std::time::Duration;

use crate::direction::Dir4;
use crate::position::GridPosition;

use super::{Body, EntityId, EntityState, FrameTable, Terrain, collision};

const SPEED: i32 = 2;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    body: Body,
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    facing: Dir4,
    has_key: bool,
    dynamites: u32,
}

impl Player {
    pub(crate) fn new(cell: GridPosition, health: i32, dynamites: u32, now: Duration) -> Self {
        Self {
            body: Body::new(EntityId::PLAYER, cell, health, SPEED, FrameTable::PLAYER, now),
            up: false,
            down: false,
            left: false,
            right: false,
            facing: Dir4::Down,
            has_key: false,
            dynamites,
        }
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

    pub(crate) fn set_up(&mut self, held: bool) {
        self.up = held;
    }

    pub(crate) fn set_down(&mut self, held: bool) {
        self.down = held;
    }

    pub(crate) fn set_left(&mut self, held: bool) {
        self.left = held;
    }

    pub(crate) fn set_right(&mut self, held: bool) {
        self.right = held;
    }

    pub(crate) fn release_all(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
    }

    pub(crate) fn is_held(&self, dir: Dir4) -> bool {
        match dir {
            Dir4::Up => self.up,
            Dir4::Down => self.down,
            Dir4::Left => self.left,
            Dir4::Right => self.right,
        }
    }

    /// Up beats Down beats Left beats Right when several are held.
    fn held_direction(&self) -> Option<Dir4> {
        Dir4::all().into_iter().find(|&dir| self.is_held(dir))
    }

    pub(crate) fn has_key(&self) -> bool {
        self.has_key
    }

    pub(crate) fn store_key(&mut self) {
        self.has_key = true;
    }

    pub(crate) fn dynamites(&self) -> u32 {
        self.dynamites
    }

    pub(crate) fn add_dynamite(&mut self) {
        self.dynamites += 1;
    }

    /// Spends one dynamite and plays the throw animation. False if none are left.
    pub(crate) fn use_dynamite(&mut self, now: Duration) -> bool {
        if self.dynamites == 0 {
            return false;
        }
        self.dynamites -= 1;
        self.body.set_state(EntityState::Attack, now);
        true
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.body.is_finished()
    }

    /// Returns the cell the player moved into, if it moved this tick.
    pub(crate) fn update(&mut self, now: Duration, terrain: &Terrain) -> Option<GridPosition> {
        if self.body.update_animation(now) == Some(EntityState::Attack) {
            self.body.set_state(EntityState::Idle, now);
        }
        if !self.body.state().is_repeatable() {
            return None;
        }

        let Some(dir) = self.held_direction() else {
            self.body.set_state(EntityState::Idle, now);
            return None;
        };
        self.facing = dir;

        let next = collision::slide_move(
            terrain.grid,
            self.body.position(),
            self.body.solid_area(),
            dir,
            self.body.speed(),
        )?;
        if terrain.objects.blocks(next.cell(), self.body.id()) {
            return None;
        }
        self.body.set_state(EntityState::Walk, now);
        self.body.set_position(next);
        Some(next.cell())
    }

    pub(crate) fn pause(&mut self, now: Duration) {
        self.body.pause(now);
    }

    pub(crate) fn resume(&mut self, now: Duration) {
        self.body.resume(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TICK;
    use crate::grid::{Biome, Grid};
    use crate::position::Position;
    use crate::world::{GameObject, ObjectIndex};

    const ROOM: &str = "\
#,#,#,#,#
#,.,.,.,#
#,.,#,.,#
#,K,D,.,#
#,#,#,#,#
";

    fn grid() -> Grid {
        Grid::from_csv(ROOM, Biome::Forest).unwrap().0
    }

    fn cell(row: i32, col: i32) -> GridPosition {
        GridPosition::new(row, col)
    }

    #[test]
    fn up_wins_over_other_keys() {
        let mut player = Player::new(cell(1, 1), 4, 3, Duration::ZERO);
        player.set_right(true);
        player.set_down(true);
        assert_eq!(player.held_direction(), Some(Dir4::Down));
        player.set_up(true);
        assert_eq!(player.held_direction(), Some(Dir4::Up));
    }

    #[test]
    fn walks_two_pixels_per_tick() {
        let grid = grid();
        let objects = ObjectIndex::default();
        let terrain = Terrain::new(&grid, &objects);
        let mut player = Player::new(cell(1, 1), 4, 3, Duration::ZERO);
        player.set_right(true);

        let moved = player.update(TICK, &terrain);
        assert_eq!(moved, Some(cell(1, 1)));
        assert_eq!(player.body().position(), Position::new(98, 96));
        assert_eq!(player.body().state(), EntityState::Walk);
        assert_eq!(player.facing(), Dir4::Right);

        player.set_right(false);
        assert_eq!(player.update(TICK * 2, &terrain), None);
        assert_eq!(player.body().state(), EntityState::Idle);
    }

    #[test]
    fn placed_objects_block_unless_exempt() {
        let grid = grid();
        let start = Position::new(cell(1, 2).center().x - 33, 96);
        let mut objects = ObjectIndex::default();
        objects.add(GameObject::dynamite(cell(1, 2), Vec::new(), Duration::ZERO));
        let terrain = Terrain::new(&grid, &objects);

        let mut player = Player::new(cell(1, 1), 4, 3, Duration::ZERO);
        player.body_mut().set_position(start);
        player.set_right(true);
        assert_eq!(player.update(TICK, &terrain), None);
        assert_eq!(player.body().position(), start);

        let mut objects = ObjectIndex::default();
        objects.add(GameObject::dynamite(
            cell(1, 2),
            vec![EntityId::PLAYER],
            Duration::ZERO,
        ));
        let terrain = Terrain::new(&grid, &objects);
        assert_eq!(player.update(TICK, &terrain), Some(cell(1, 2)));
    }

    #[test]
    fn throwing_dynamite_freezes_movement_until_done() {
        let grid = grid();
        let objects = ObjectIndex::default();
        let terrain = Terrain::new(&grid, &objects);
        let mut player = Player::new(cell(1, 1), 4, 1, Duration::ZERO);

        assert!(player.use_dynamite(Duration::ZERO));
        assert!(!player.use_dynamite(Duration::ZERO));
        assert_eq!(player.dynamites(), 0);

        player.set_right(true);
        let mut now = Duration::ZERO;
        for _ in 0..10 {
            now += TICK;
            assert_eq!(player.update(now, &terrain), None);
        }
        for _ in 0..40 {
            now += TICK;
            player.update(now, &terrain);
        }
        assert_eq!(player.body().state(), EntityState::Walk);
    }
}
