use std::collections::BTreeMap;

use crate::entity::EntityId;
use crate::position::GridPosition;

use super::objects::{Capability, GameObject};

/// Placed objects keyed by the cell they occupy.
#[derive(Clone, Debug, Default)]
pub(crate) struct ObjectIndex {
    cells: BTreeMap<GridPosition, Vec<GameObject>>,
}

impl ObjectIndex {
    /// Replaces any occupant of the same tier.
    pub(crate) fn add(&mut self, object: GameObject) {
        let occupants = self.cells.entry(object.cell()).or_default();
        occupants.retain(|other| other.tier() != object.tier());
        occupants.push(object);
    }

    pub(crate) fn get(&self, cell: GridPosition) -> &[GameObject] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn get_mut(&mut self, cell: GridPosition) -> impl Iterator<Item = &mut GameObject> {
        self.cells.get_mut(&cell).into_iter().flatten()
    }

    pub(crate) fn is_occupied(&self, cell: GridPosition) -> bool {
        !self.get(cell).is_empty()
    }

    #[cfg(test)]
    pub(crate) fn get_by_capability(
        &self,
        cell: GridPosition,
        capability: Capability,
    ) -> Option<&GameObject> {
        self.get(cell).iter().find(|o| o.offers(capability))
    }

    pub(crate) fn get_by_capability_mut(
        &mut self,
        cell: GridPosition,
        capability: Capability,
    ) -> Option<&mut GameObject> {
        self.get_mut(cell).find(|o| o.offers(capability))
    }

    /// Whether anything at `cell` stops entity `id` from entering.
    pub(crate) fn blocks(&self, cell: GridPosition, id: EntityId) -> bool {
        self.get(cell).iter().any(|o| o.collides_with(id))
    }

    /// Ticks every available object, then drops whatever finished.
    pub(crate) fn update(&mut self, mut tick: impl FnMut(&mut GameObject)) {
        self.cells
            .values_mut()
            .flatten()
            .filter(|o| o.is_available())
            .for_each(&mut tick);
        self.prune();
    }

    pub(crate) fn prune(&mut self) {
        for occupants in self.cells.values_mut() {
            occupants.retain(|o| !o.is_finished());
        }
        self.cells.retain(|_, occupants| !occupants.is_empty());
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.cells.values().flatten()
    }

    /// Draw order: lowest tier first so the highest ends up on top.
    pub(crate) fn sorted_by_priority(&self) -> Vec<&GameObject> {
        let mut objects: Vec<&GameObject> = self.iter().collect();
        objects.sort_by_key(|o| o.tier());
        objects
    }
}
