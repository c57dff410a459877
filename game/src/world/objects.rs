use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::Timer;
use crate::entity::EntityId;
use crate::grid::Grid;
use crate::position::{GridPosition, Position, Rect};

use super::explosive::FUSE;

/// Occupancy class. A cell holds at most one object per tier, and higher
/// tiers draw on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Tier {
    Effect = 1,
    PlayerWeapon = 2,
    Other = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum HiddenItemKind {
    Key,
    AddHealth,
    AddDynamite,
    Damage,
}

/// What a lookup by capability asks an object to be able to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Capability {
    /// Reacts when the player steps onto the cell.
    Interact,
    /// Dormant until a blast uncovers it.
    Reveal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DoorState {
    Closed,
    Opening,
    Open,
}

#[derive(Clone, Debug)]
pub(crate) enum ObjectKind {
    Dynamite {
        fuse: Timer,
        /// Entities standing on the cell when it was placed. They may walk off it.
        exempt: Vec<EntityId>,
    },
    Explosion,
    Door(DoorState),
    Hidden {
        item: HiddenItemKind,
        active: bool,
    },
}

impl ObjectKind {
    fn frames(&self) -> usize {
        match self {
            ObjectKind::Dynamite { .. } => 2,
            ObjectKind::Explosion => 6,
            ObjectKind::Door(_) => 4,
            ObjectKind::Hidden {
                item: HiddenItemKind::Key,
                ..
            } => 9,
            ObjectKind::Hidden { .. } => 1,
        }
    }

    fn frame_delay(&self) -> Duration {
        Duration::from_millis(match self {
            ObjectKind::Dynamite { .. } => 300,
            ObjectKind::Explosion => 180,
            ObjectKind::Door(_) => 350,
            ObjectKind::Hidden {
                item: HiddenItemKind::Key,
                ..
            } => 180,
            ObjectKind::Hidden { .. } => 0,
        })
    }

    pub(crate) fn tier(&self) -> Tier {
        match self {
            ObjectKind::Explosion => Tier::Effect,
            ObjectKind::Dynamite { .. } => Tier::PlayerWeapon,
            ObjectKind::Door(_) | ObjectKind::Hidden { .. } => Tier::Other,
        }
    }
}

/// Frame counter for an object's looping animation.
#[derive(Clone, Debug)]
struct Animation {
    frame: usize,
    frames: usize,
    timer: Timer,
}

impl Animation {
    fn new(kind: &ObjectKind, now: Duration) -> Self {
        let mut timer = Timer::new(kind.frame_delay());
        timer.start(now);
        Self {
            frame: 0,
            frames: kind.frames(),
            timer,
        }
    }

    /// True when the last frame just wrapped back to the first.
    fn advance(&mut self, now: Duration) -> bool {
        if !self.timer.is_end(now) {
            return false;
        }
        self.frame += 1;
        let wrapped = self.frame >= self.frames;
        if wrapped {
            self.frame = 0;
        }
        self.timer.start(now);
        wrapped
    }

    fn restart(&mut self, now: Duration) {
        self.frame = 0;
        self.timer.start(now);
    }
}

/// Something that happened during an object tick that needs access to the
/// rest of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ObjectEvent {
    FuseBurnedOut(GridPosition),
    Uncovered(GridPosition),
}

#[derive(Clone, Debug)]
pub(crate) struct GameObject {
    cell: GridPosition,
    kind: ObjectKind,
    animation: Animation,
    finished: bool,
}

impl GameObject {
    fn new(cell: GridPosition, kind: ObjectKind, now: Duration) -> Self {
        Self {
            cell,
            animation: Animation::new(&kind, now),
            kind,
            finished: false,
        }
    }

    pub(crate) fn dynamite(cell: GridPosition, exempt: Vec<EntityId>, now: Duration) -> Self {
        let mut fuse = Timer::new(FUSE);
        fuse.start(now);
        Self::new(cell, ObjectKind::Dynamite { fuse, exempt }, now)
    }

    pub(crate) fn explosion(cell: GridPosition, now: Duration) -> Self {
        Self::new(cell, ObjectKind::Explosion, now)
    }

    pub(crate) fn door(cell: GridPosition, now: Duration) -> Self {
        Self::new(cell, ObjectKind::Door(DoorState::Closed), now)
    }

    /// Hidden items start dormant under a cracked wall.
    pub(crate) fn hidden(cell: GridPosition, item: HiddenItemKind, now: Duration) -> Self {
        Self::new(
            cell,
            ObjectKind::Hidden {
                item,
                active: false,
            },
            now,
        )
    }

    pub(crate) fn cell(&self) -> GridPosition {
        self.cell
    }

    pub(crate) fn origin(&self) -> Position {
        self.cell.origin()
    }

    pub(crate) fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub(crate) fn tier(&self) -> Tier {
        self.kind.tier()
    }

    pub(crate) fn frame(&self) -> usize {
        self.animation.frame
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn finish(&mut self) {
        self.finished = true;
    }

    /// Dormant hidden items are skipped by the per-tick update.
    pub(crate) fn is_available(&self) -> bool {
        !matches!(self.kind, ObjectKind::Hidden { active: false, .. })
    }

    pub(crate) fn offers(&self, capability: Capability) -> bool {
        match (&self.kind, capability) {
            (ObjectKind::Door(_), Capability::Interact) => true,
            (ObjectKind::Hidden { active, .. }, Capability::Interact) => *active,
            (ObjectKind::Hidden { active, .. }, Capability::Reveal) => !*active,
            _ => false,
        }
    }

    /// Only live dynamite collides, and never with the entities it was placed under.
    pub(crate) fn collides_with(&self, id: EntityId) -> bool {
        match &self.kind {
            ObjectKind::Dynamite { exempt, .. } => !self.finished && !exempt.contains(&id),
            _ => false,
        }
    }

    pub(crate) fn door_state(&self) -> Option<DoorState> {
        match self.kind {
            ObjectKind::Door(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn hidden_item(&self) -> Option<HiddenItemKind> {
        match self.kind {
            ObjectKind::Hidden { item, .. } => Some(item),
            _ => None,
        }
    }

    pub(crate) fn reveal(&mut self) {
        if let ObjectKind::Hidden { active, .. } = &mut self.kind {
            *active = true;
        }
    }

    /// Starts the opening animation of a closed door.
    pub(crate) fn open(&mut self, now: Duration) -> bool {
        match &mut self.kind {
            ObjectKind::Door(state @ DoorState::Closed) => {
                *state = DoorState::Opening;
                self.animation.restart(now);
                true
            }
            _ => false,
        }
    }

    /// `footprints` lists every entity's center pixel for dynamite exemptions.
    pub(crate) fn update(
        &mut self,
        now: Duration,
        grid: &mut Grid,
        footprints: &[(EntityId, Rect)],
    ) -> Option<ObjectEvent> {
        let cell_rect = self.cell.rect();
        match &mut self.kind {
            ObjectKind::Dynamite { fuse, exempt } => {
                exempt.retain(|id| {
                    footprints
                        .iter()
                        .any(|(other, footprint)| other == id && footprint.intersects(cell_rect))
                });
                if fuse.is_end(now) {
                    self.finished = true;
                    return Some(ObjectEvent::FuseBurnedOut(self.cell));
                }
                self.animation.advance(now);
                None
            }
            ObjectKind::Explosion => {
                if self.animation.advance(now) {
                    self.finished = true;
                }
                grid.destruct_cracked_wall(self.cell);
                Some(ObjectEvent::Uncovered(self.cell))
            }
            ObjectKind::Door(state) => {
                if *state == DoorState::Opening && self.animation.advance(now) {
                    *state = DoorState::Open;
                    log::info!("door at {:?} is open", self.cell);
                }
                None
            }
            ObjectKind::Hidden { .. } => {
                self.animation.advance(now);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> GridPosition {
        GridPosition::new(1, 1)
    }

    #[test]
    fn capabilities_follow_activation() {
        let mut item = GameObject::hidden(cell(), HiddenItemKind::AddHealth, Duration::ZERO);
        assert!(item.offers(Capability::Reveal));
        assert!(!item.offers(Capability::Interact));
        assert!(!item.is_available());

        item.reveal();
        assert!(item.offers(Capability::Interact));
        assert!(!item.offers(Capability::Reveal));
        assert!(item.is_available());

        let door = GameObject::door(cell(), Duration::ZERO);
        assert!(door.offers(Capability::Interact));
        assert!(!GameObject::explosion(cell(), Duration::ZERO).offers(Capability::Interact));
    }

    #[test]
    fn door_opens_after_its_animation() {
        let (mut grid, _) = Grid::from_csv("#,#,#\n#,K,#\n#,D,#\n", crate::grid::Biome::Forest).unwrap();
        let mut door = GameObject::door(cell(), Duration::ZERO);
        assert!(door.open(Duration::ZERO));
        assert!(!door.open(Duration::ZERO));
        for step in 1..4 {
            door.update(Duration::from_millis(350 * step), &mut grid, &[]);
            assert_eq!(door.door_state(), Some(DoorState::Opening));
        }
        door.update(Duration::from_millis(1400), &mut grid, &[]);
        assert_eq!(door.door_state(), Some(DoorState::Open));
    }

    #[test]
    fn exemption_ends_when_entity_leaves_cell() {
        let (mut grid, _) = Grid::from_csv("#,#,#\n#,K,#\n#,D,#\n", crate::grid::Biome::Forest).unwrap();
        let id = EntityId(3);
        let mut dynamite = GameObject::dynamite(cell(), vec![id], Duration::ZERO);
        assert!(!dynamite.collides_with(id));

        let inside = Rect::new(96, 96, 1, 1);
        dynamite.update(Duration::from_millis(10), &mut grid, &[(id, inside)]);
        assert!(!dynamite.collides_with(id));

        let outside = Rect::new(96, 128, 1, 1);
        dynamite.update(Duration::from_millis(20), &mut grid, &[(id, outside)]);
        assert!(dynamite.collides_with(id));
    }

    #[test]
    fn fuse_burns_out_after_three_and_a_half_seconds() {
        let (mut grid, _) = Grid::from_csv("#,#,#\n#,K,#\n#,D,#\n", crate::grid::Biome::Forest).unwrap();
        let mut dynamite = GameObject::dynamite(cell(), Vec::new(), Duration::ZERO);
        assert_eq!(dynamite.update(Duration::from_millis(3499), &mut grid, &[]), None);
        assert_eq!(
            dynamite.update(Duration::from_millis(3500), &mut grid, &[]),
            Some(ObjectEvent::FuseBurnedOut(cell()))
        );
        assert!(dynamite.is_finished());
    }

    #[test]
    fn explosion_clears_cracked_wall_and_finishes() {
        let (mut grid, _) = Grid::from_csv("#,#,#\n#,K,#\n#,D,#\n", crate::grid::Biome::Forest).unwrap();
        let mut explosion = GameObject::explosion(cell(), Duration::ZERO);
        explosion.update(Duration::from_millis(1), &mut grid, &[]);
        assert_eq!(grid.at(cell()), crate::grid::Tile::Ground);
        for step in 1..=6 {
            explosion.update(Duration::from_millis(180 * step), &mut grid, &[]);
        }
        assert!(explosion.is_finished());
    }
}
