use std::time::Duration;

use crate::clock::Timer;
use crate::position::{GridPosition, Position, Rect, TILE_SIZE};

mod collision;
mod enemy;
mod navigation;
mod player;
mod state;

pub(crate) use collision::Terrain;
pub(crate) use enemy::{Enemy, EnemyKind};
pub(crate) use player::Player;
pub(crate) use state::{EntityState, FrameTable};

/// Stable handle used wherever one part of the world refers to an entity
/// across ticks (for example the exemption list of a freshly placed dynamite).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EntityId(pub(crate) u32);

impl EntityId {
    pub(crate) const PLAYER: EntityId = EntityId(0);
}

/// State shared by the player and every enemy: where it is, how healthy it is
/// and which animation cycle it is in.
#[derive(Clone, Debug)]
pub(crate) struct Body {
    id: EntityId,
    position: Position,
    health: i32,
    speed: i32,
    /// Relative to `position`, which is the center of the entity.
    solid_area: Rect,
    state: EntityState,
    frame: usize,
    animation: Timer,
    frames: FrameTable,
    finished: bool,
}

impl Body {
    pub(crate) fn new(
        id: EntityId,
        cell: GridPosition,
        health: i32,
        speed: i32,
        frames: FrameTable,
        now: Duration,
    ) -> Self {
        let mut animation = Timer::new(frames.frame_delay(EntityState::Idle));
        animation.start(now);
        Self {
            id,
            position: cell.center(),
            health,
            speed,
            solid_area: Rect::new(-TILE_SIZE / 2, -TILE_SIZE / 2, TILE_SIZE, TILE_SIZE),
            state: EntityState::Idle,
            frame: 0,
            animation,
            frames,
            finished: false,
        }
    }

    pub(crate) fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn cell(&self) -> GridPosition {
        self.position.cell()
    }

    pub(crate) fn speed(&self) -> i32 {
        self.speed
    }

    pub(crate) fn health(&self) -> i32 {
        self.health
    }

    pub(crate) fn state(&self) -> EntityState {
        self.state
    }

    pub(crate) fn frame(&self) -> usize {
        self.frame
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn solid_area(&self) -> Rect {
        self.solid_area
    }

    /// Collision rectangle in world pixels.
    pub(crate) fn solid_rect(&self) -> Rect {
        self.solid_area.offset(self.position)
    }

    /// The single pixel at the entity's center, used for "is it standing in this cell" tests.
    pub(crate) fn footprint(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, 1, 1)
    }

    /// Switching to the current state again is a no-op.
    pub(crate) fn set_state(&mut self, state: EntityState, now: Duration) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.frame = 0;
        self.animation.set_duration(self.frames.frame_delay(state));
        self.animation.start(now);
    }

    pub(crate) fn damage(&mut self, now: Duration) {
        if self.is_dead() {
            return;
        }
        self.set_state(EntityState::Hurt, now);
        self.health -= 1;
    }

    pub(crate) fn add_health(&mut self) {
        self.health += 1;
    }

    /// Advances the animation. Returns the state whose cycle just completed,
    /// after the built-in exits (hurt and death) have been applied.
    pub(crate) fn update_animation(&mut self, now: Duration) -> Option<EntityState> {
        if !self.animation.is_end(now) {
            return None;
        }

        let mut completed = None;
        self.frame += 1;
        if self.frame >= self.frames.frames(self.state) {
            self.frame = 0;
            completed = Some(self.state);
            match self.state {
                EntityState::Hurt if self.is_dead() => self.set_state(EntityState::Death, now),
                EntityState::Hurt => self.set_state(EntityState::Idle, now),
                EntityState::Death => self.finished = true,
                _ => {}
            }
        }

        self.animation.set_duration(self.frames.frame_delay(self.state));
        self.animation.start(now);
        completed
    }

    pub(crate) fn pause(&mut self, now: Duration) {
        self.animation.stop(now);
    }

    pub(crate) fn resume(&mut self, now: Duration) {
        self.animation.resume(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn goblin_body() -> Body {
        Body::new(
            EntityId(1),
            GridPosition::new(1, 1),
            1,
            1,
            FrameTable::GOBLIN,
            Duration::ZERO,
        )
    }

    /// Steps the animation at the current frame delay until `done` says stop.
    fn run_until(body: &mut Body, now: &mut Duration, mut done: impl FnMut(&Body) -> bool) {
        for _ in 0..10_000 {
            if done(body) {
                return;
            }
            *now += ms(1);
            body.update_animation(*now);
        }
        panic!("animation never reached the expected state");
    }

    #[test]
    fn spawns_centered_and_idle() {
        let body = goblin_body();
        assert_eq!(body.position(), Position::new(96, 96));
        assert_eq!(body.state(), EntityState::Idle);
        assert_eq!(body.solid_rect(), Rect::new(64, 64, 64, 64));
        assert_eq!(body.footprint(), Rect::new(96, 96, 1, 1));
    }

    #[test]
    fn lethal_damage_runs_hurt_then_death_then_finishes() {
        let mut body = goblin_body();
        let mut now = ms(10);
        body.damage(now);
        assert_eq!(body.state(), EntityState::Hurt);
        assert_eq!(body.health(), 0);

        // Hurt is 6 frames of 125 ms each.
        run_until(&mut body, &mut now, |b| b.state() != EntityState::Hurt);
        assert_eq!(body.state(), EntityState::Death);
        assert!(now >= ms(760));
        assert!(!body.is_finished());

        run_until(&mut body, &mut now, Body::is_finished);
        assert_eq!(body.state(), EntityState::Death);
    }

    #[test]
    fn survivable_damage_returns_to_idle() {
        let mut body = Body::new(
            EntityId(1),
            GridPosition::new(0, 0),
            2,
            1,
            FrameTable::SLIME,
            Duration::ZERO,
        );
        let mut now = Duration::ZERO;
        body.damage(now);
        run_until(&mut body, &mut now, |b| b.state() != EntityState::Hurt);
        assert_eq!(body.state(), EntityState::Idle);
        assert_eq!(body.health(), 1);
    }

    #[test]
    fn damage_when_dead_is_a_no_op() {
        let mut body = goblin_body();
        body.damage(ms(0));
        body.damage(ms(1));
        assert_eq!(body.health(), 0);
    }

    #[test]
    fn setting_same_state_keeps_frame() {
        let mut body = goblin_body();
        body.set_state(EntityState::Walk, ms(0));
        body.update_animation(ms(100));
        assert_eq!(body.frame(), 1);
        body.set_state(EntityState::Walk, ms(100));
        assert_eq!(body.frame(), 1);
    }

    #[test]
    fn attack_cycle_is_reported_once_complete() {
        let mut body = goblin_body();
        body.set_state(EntityState::Attack, ms(0));
        let mut completed = Vec::new();
        for step in 1..=8 {
            completed.push(body.update_animation(ms(100 * step)));
        }
        assert!(completed[..7].iter().all(Option::is_none));
        assert_eq!(completed[7], Some(EntityState::Attack));
    }

    #[test]
    fn paused_body_holds_its_frame() {
        let mut body = goblin_body();
        body.pause(ms(100));
        body.update_animation(ms(10_000));
        assert_eq!(body.frame(), 0);
        body.resume(ms(10_000));
        // 225 ms per idle frame, 100 ms already spent before the pause.
        body.update_animation(ms(10_124));
        assert_eq!(body.frame(), 0);
        body.update_animation(ms(10_125));
        assert_eq!(body.frame(), 1);
    }
}
