#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative container state for the grid stash.
//!
//! Every grid is a [`Container`] owning its [`OccupancyGrid`] and placed
//! items. The [`Stash`] registers containers in order and hands out item
//! identifiers that stay unique across all of them, so an item can travel
//! between containers without renumbering.

pub mod container;
pub mod crafting;
pub mod occupancy;
pub mod placement;

pub use container::{Container, ContainerError, Placement};
pub use crafting::{CraftOutput, CraftReport, CraftStation, RecipeMatcher};
pub use occupancy::OccupancyGrid;

use grid_stash_core::{ContainerId, Event, ItemId, ItemSpec, PlacedItem, SlotFilter};
use tracing::warn;

/// Registry of every container taking part in a session.
#[derive(Clone, Debug, Default)]
pub struct Stash {
    containers: Vec<Container>,
    next_item_id: u32,
}

impl Stash {
    /// Creates an empty stash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new empty container and returns its identifier.
    ///
    /// Registration order is the order the router checks containers in.
    pub fn register(
        &mut self,
        label: impl Into<String>,
        columns: u32,
        rows: u32,
        filter: SlotFilter,
    ) -> ContainerId {
        let index = u32::try_from(self.containers.len()).unwrap_or(u32::MAX);
        let id = ContainerId::new(index);
        self.containers
            .push(Container::new(id, label, columns, rows).with_filter(filter));
        id
    }

    /// Looks up a registered container.
    #[must_use]
    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.iter().find(|container| container.id() == id)
    }

    /// Looks up a registered container for mutation.
    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers
            .iter_mut()
            .find(|container| container.id() == id)
    }

    /// Looks up a container by label.
    #[must_use]
    pub fn container_by_label(&self, label: &str) -> Option<&Container> {
        self.containers
            .iter()
            .find(|container| container.label() == label)
    }

    /// Iterates over containers in registration order.
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    /// Creates an unplaced item with a fresh identifier.
    pub fn create_item(&mut self, spec: &ItemSpec, stack_count: u32) -> PlacedItem {
        let id = ItemId::new(self.next_item_id);
        self.next_item_id = self.next_item_id.saturating_add(1);
        PlacedItem::from_spec(id, spec, stack_count)
    }

    /// Finds the container holding an item.
    #[must_use]
    pub fn locate(&self, item: ItemId) -> Option<(ContainerId, &PlacedItem)> {
        self.containers.iter().find_map(|container| {
            container
                .item(item)
                .map(|placed| (container.id(), placed))
        })
    }

    /// Re-inserts a persisted item at its recorded position.
    ///
    /// Identifier allocation continues past the restored identifier.
    pub fn restore_item(
        &mut self,
        container: ContainerId,
        item: PlacedItem,
        out_events: &mut Vec<Event>,
    ) -> Result<ItemId, ContainerError> {
        let next = item.id().get().saturating_add(1);
        let id = self
            .container_mut(container)
            .ok_or(ContainerError::UnknownContainer(container))?
            .add_item(item, out_events)?;
        self.next_item_id = self.next_item_id.max(next);
        Ok(id)
    }

    /// Adds looted items to a container, returning those that did not fit.
    pub fn pick_up_loot(
        &mut self,
        container: ContainerId,
        loot: Vec<PlacedItem>,
        out_events: &mut Vec<Event>,
    ) -> Result<Vec<PlacedItem>, ContainerError> {
        let target = self
            .container_mut(container)
            .ok_or(ContainerError::UnknownContainer(container))?;
        let unplaced = target.add_items(loot, out_events);
        if !unplaced.is_empty() {
            warn!(
                container = ?container,
                count = unplaced.len(),
                "container is full; loot left unplaced"
            );
        }
        Ok(unplaced)
    }

    /// Checks the occupancy invariant of every container.
    #[must_use]
    pub fn verify_occupancy(&self) -> bool {
        self.containers.iter().all(Container::verify_occupancy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_stash_core::{CellCoord, Footprint, ItemCategory};

    fn gem() -> ItemSpec {
        ItemSpec {
            type_key: "gem".to_owned(),
            category: ItemCategory::General,
            footprint: Footprint::new(1, 1),
            stackable: false,
            max_stack: 1,
        }
    }

    #[test]
    fn item_ids_are_unique_across_containers() {
        let mut stash = Stash::new();
        let first = stash.create_item(&gem(), 1);
        let second = stash.create_item(&gem(), 1);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn restore_item_advances_identifier_allocation() {
        let mut stash = Stash::new();
        let bag = stash.register("bag", 2, 2, SlotFilter::Any);
        let mut events = Vec::new();
        let mut restored = PlacedItem::from_spec(ItemId::new(41), &gem(), 1);
        restored.set_position(CellCoord::new(1, 1));

        let id = stash
            .restore_item(bag, restored, &mut events)
            .expect("restored gem fits");

        assert_eq!(id, ItemId::new(41));
        assert_eq!(stash.create_item(&gem(), 1).id(), ItemId::new(42));
        assert_eq!(stash.locate(id).map(|(container, _)| container), Some(bag));
    }

    #[test]
    fn pick_up_loot_reports_unknown_containers() {
        let mut stash = Stash::new();
        let loot = vec![stash.create_item(&gem(), 1)];
        let mut events = Vec::new();
        let error = stash
            .pick_up_loot(ContainerId::new(7), loot, &mut events)
            .expect_err("nothing registered");
        assert_eq!(error, ContainerError::UnknownContainer(ContainerId::new(7)));
    }

    #[test]
    fn registration_order_is_preserved() {
        let mut stash = Stash::new();
        let bag = stash.register("bag", 4, 4, SlotFilter::Any);
        let chest = stash.register("chest", 6, 4, SlotFilter::Any);
        let ids: Vec<ContainerId> = stash.containers().map(Container::id).collect();
        assert_eq!(ids, vec![bag, chest]);
        assert_eq!(stash.container_by_label("chest").map(Container::id), Some(chest));
    }
}
