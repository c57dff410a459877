use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntityState {
    Idle,
    Walk,
    Hurt,
    Attack,
    Death,
}

impl EntityState {
    /// Full cycle length before per-kind overrides.
    pub(crate) fn base_cycle(self) -> Duration {
        Duration::from_millis(match self {
            EntityState::Idle => 900,
            EntityState::Walk => 700,
            EntityState::Hurt => 750,
            EntityState::Attack => 800,
            EntityState::Death => 1200,
        })
    }

    pub(crate) fn is_repeatable(self) -> bool {
        matches!(self, EntityState::Idle | EntityState::Walk)
    }
}

/// Frame counts per state for one kind of entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrameTable {
    idle: usize,
    walk: usize,
    hurt: usize,
    attack: usize,
    death: usize,
    attack_cycle: Option<Duration>,
}

impl FrameTable {
    pub(crate) const PLAYER: FrameTable = FrameTable {
        idle: 4,
        walk: 6,
        hurt: 5,
        attack: 2,
        death: 7,
        attack_cycle: Some(Duration::from_millis(500)),
    };
    pub(crate) const GOBLIN: FrameTable = FrameTable::uniform_cycles(4, 8, 6, 8, 8);
    pub(crate) const SLIME: FrameTable = FrameTable::uniform_cycles(6, 8, 5, 10, 10);
    pub(crate) const VAMPIRE: FrameTable = FrameTable::uniform_cycles(4, 6, 4, 12, 11);

    const fn uniform_cycles(idle: usize, walk: usize, hurt: usize, attack: usize, death: usize) -> Self {
        Self {
            idle,
            walk,
            hurt,
            attack,
            death,
            attack_cycle: None,
        }
    }

    pub(crate) fn frames(&self, state: EntityState) -> usize {
        match state {
            EntityState::Idle => self.idle,
            EntityState::Walk => self.walk,
            EntityState::Hurt => self.hurt,
            EntityState::Attack => self.attack,
            EntityState::Death => self.death,
        }
    }

    pub(crate) fn cycle(&self, state: EntityState) -> Duration {
        match (state, self.attack_cycle) {
            (EntityState::Attack, Some(cycle)) => cycle,
            _ => state.base_cycle(),
        }
    }

    pub(crate) fn frame_delay(&self, state: EntityState) -> Duration {
        self.cycle(state) / self.frames(state).max(1) as u32
    }
}
