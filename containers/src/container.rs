//! Authoritative item bookkeeping for a single grid.

use grid_stash_core::{
    CellCoord, CellRect, ContainerId, Event, Footprint, ItemId, PlacedItem, RemovalReason,
    SlotFilter,
};
use thiserror::Error;

use crate::occupancy::OccupancyGrid;

/// Reasons a container refuses a command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// No container with the provided identifier is registered.
    #[error("container {0:?} is not registered")]
    UnknownContainer(ContainerId),
    /// The item is not held by the container.
    #[error("item {item:?} is not held by container {container:?}")]
    ItemMissing {
        /// Container that was asked.
        container: ContainerId,
        /// Item that was requested.
        item: ItemId,
    },
    /// The item is already held by the container.
    #[error("item {item:?} is already held by container {container:?}")]
    DuplicateItem {
        /// Container that already holds the item.
        container: ContainerId,
        /// Item that was offered twice.
        item: ItemId,
    },
    /// The requested cells leave the grid or are covered.
    #[error("cells {region:?} of container {container:?} are not free")]
    AreaUnavailable {
        /// Container that was asked.
        container: ContainerId,
        /// Cells the item would cover.
        region: CellRect,
    },
    /// The container's slot filter refuses the item.
    #[error("container {container:?} does not accept item {item:?}")]
    SlotTypeRejected {
        /// Container that refused the item.
        container: ContainerId,
        /// Item that was refused.
        item: ItemId,
    },
    /// The item's stack count does not fit its stack limit.
    #[error("item {item:?} holds {stack_count} units but stacks to {max_stack}")]
    InvalidStack {
        /// Container that refused the item.
        container: ContainerId,
        /// Item that was refused.
        item: ItemId,
        /// Units the item claims to hold.
        stack_count: u32,
        /// Stack limit carried by the item.
        max_stack: u32,
    },
    /// The item is not lifted out of its cells, so it cannot be settled.
    #[error("item {item:?} in container {container:?} is not being dragged")]
    NotLifted {
        /// Container holding the item.
        container: ContainerId,
        /// Item that was expected to be lifted.
        item: ItemId,
    },
}

/// Outcome of a first-fit search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Anchor cell of the free area.
    pub position: CellCoord,
    /// Footprint that fits at the anchor.
    pub footprint: Footprint,
    /// Whether the fit required turning the footprint a quarter.
    pub rotated: bool,
}

#[derive(Clone, Debug)]
struct Entry {
    item: PlacedItem,
    lifted: bool,
}

/// Grid-backed container owning its occupancy and placed items.
///
/// Items are kept in insertion order. A lifted item is one picked up by a
/// drag: it stays in the container but its cells are free until it settles
/// or is removed.
#[derive(Clone, Debug)]
pub struct Container {
    id: ContainerId,
    label: String,
    grid: OccupancyGrid,
    entries: Vec<Entry>,
    filter: SlotFilter,
    active: bool,
}

impl Container {
    /// Creates an empty, active container accepting every item.
    #[must_use]
    pub fn new(id: ContainerId, label: impl Into<String>, columns: u32, rows: u32) -> Self {
        Self {
            id,
            label: label.into(),
            grid: OccupancyGrid::new(columns, rows),
            entries: Vec::new(),
            filter: SlotFilter::Any,
            active: true,
        }
    }

    /// Restricts the items the container accepts.
    #[must_use]
    pub fn with_filter(mut self, filter: SlotFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Identifier assigned at registration.
    #[must_use]
    pub const fn id(&self) -> ContainerId {
        self.id
    }

    /// Human readable name of the container.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Read-only access to the occupancy grid.
    #[must_use]
    pub const fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Slot filter applied to incoming items.
    #[must_use]
    pub const fn filter(&self) -> &SlotFilter {
        &self.filter
    }

    /// Whether the router considers the container as a drop target.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Shows or hides the container from the router.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Reports whether the slot filter admits the item.
    #[must_use]
    pub fn accepts(&self, item: &PlacedItem) -> bool {
        self.filter.accepts(item)
    }

    /// Iterates over every held item, lifted ones included, in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.entries.iter().map(|entry| &entry.item)
    }

    /// Iterates over items that occupy cells.
    pub fn settled_items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.entries
            .iter()
            .filter(|entry| !entry.lifted)
            .map(|entry| &entry.item)
    }

    /// Number of held items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the container holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a held item.
    #[must_use]
    pub fn item(&self, item: ItemId) -> Option<&PlacedItem> {
        self.entry(item).map(|entry| &entry.item)
    }

    /// Reports whether the item is currently lifted by a drag.
    #[must_use]
    pub fn is_lifted(&self, item: ItemId) -> bool {
        self.entry(item).is_some_and(|entry| entry.lifted)
    }

    /// Settled item covering the provided cell, if any.
    #[must_use]
    pub fn item_at(&self, cell: CellCoord) -> Option<&PlacedItem> {
        self.settled_items().find(|item| item.rect().contains(cell))
    }

    /// Reports whether the area lies in the grid and is uncovered.
    #[must_use]
    pub fn is_area_free(&self, start: CellCoord, footprint: Footprint) -> bool {
        self.grid.is_area_free(start, footprint)
    }

    /// Finds the first free anchor for the footprint.
    ///
    /// The upright footprint is scanned first; a non-square footprint is then
    /// scanned again turned a quarter.
    #[must_use]
    pub fn try_find_placement(&self, footprint: Footprint) -> Option<Placement> {
        if let Some(position) = self.grid.first_fit(footprint) {
            return Some(Placement {
                position,
                footprint,
                rotated: false,
            });
        }

        if footprint.is_square() {
            return None;
        }

        let rotated = footprint.rotated();
        self.grid.first_fit(rotated).map(|position| Placement {
            position,
            footprint: rotated,
            rotated: true,
        })
    }

    /// Runs [`Self::try_find_placement`] for the item and applies the result.
    ///
    /// On success the item's position is updated, and when only the turned
    /// footprint fits, its footprint and rotation are updated too. Returns
    /// `false` and leaves the item untouched when nothing fits.
    pub fn fit_item(&self, item: &mut PlacedItem) -> bool {
        let Some(placement) = self.try_find_placement(item.footprint()) else {
            return false;
        };

        if placement.rotated {
            let _ = item.rotate();
        }
        item.set_position(placement.position);
        true
    }

    /// Inserts an item at its recorded position.
    ///
    /// The position must have been validated as free.
    pub fn add_item(
        &mut self,
        item: PlacedItem,
        out_events: &mut Vec<Event>,
    ) -> Result<ItemId, ContainerError> {
        let id = item.id();
        if self.entry(id).is_some() {
            return Err(ContainerError::DuplicateItem {
                container: self.id,
                item: id,
            });
        }
        if item.max_stack() == 0 || item.stack_count() > item.max_stack() {
            return Err(ContainerError::InvalidStack {
                container: self.id,
                item: id,
                stack_count: item.stack_count(),
                max_stack: item.max_stack(),
            });
        }
        if !self.accepts(&item) {
            return Err(ContainerError::SlotTypeRejected {
                container: self.id,
                item: id,
            });
        }
        let region = item.rect();
        if !self.is_area_free(region.origin(), region.footprint()) {
            return Err(ContainerError::AreaUnavailable {
                container: self.id,
                region,
            });
        }

        self.mark(region, true, out_events);
        self.entries.push(Entry {
            item,
            lifted: false,
        });
        out_events.push(Event::ItemAdded {
            container: self.id,
            item: id,
            region,
        });
        Ok(id)
    }

    /// Removes a held item, freeing its cells unless it is lifted.
    pub fn remove_item(
        &mut self,
        item: ItemId,
        reason: RemovalReason,
        out_events: &mut Vec<Event>,
    ) -> Result<PlacedItem, ContainerError> {
        let index = self.position_of(item)?;
        let entry = self.entries.remove(index);
        if !entry.lifted {
            self.mark(entry.item.rect(), false, out_events);
        }

        out_events.push(Event::ItemRemoved {
            container: self.id,
            item,
            reason,
        });
        Ok(entry.item)
    }

    /// Moves a settled item, vacating its old cells and covering the new ones.
    ///
    /// Returns `false` without changing anything when the item is missing or
    /// lifted, or the destination is not free once the item's own cells are
    /// discounted.
    pub fn move_item(
        &mut self,
        item: ItemId,
        new_position: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Ok(index) = self.position_of(item) else {
            return false;
        };
        if self.entries[index].lifted {
            return false;
        }

        let current = self.entries[index].item.rect();
        let destination = CellRect::new(new_position, current.footprint());
        self.grid.occupy(current, false);
        if !self
            .grid
            .is_area_free(destination.origin(), destination.footprint())
        {
            self.grid.occupy(current, true);
            return false;
        }

        self.grid.occupy(destination, true);
        self.entries[index].item.set_position(new_position);
        out_events.push(Event::OccupancyChanged { container: self.id });
        out_events.push(Event::ItemMoved {
            container: self.id,
            item,
            region: destination,
        });
        true
    }

    /// Frees the cells of a settled item so it can be dragged.
    ///
    /// Returns a copy of the item record as it was before the lift.
    pub fn lift(
        &mut self,
        item: ItemId,
        out_events: &mut Vec<Event>,
    ) -> Result<PlacedItem, ContainerError> {
        let index = self.position_of(item)?;
        if self.entries[index].lifted {
            return Ok(self.entries[index].item.clone());
        }

        let region = self.entries[index].item.rect();
        self.mark(region, false, out_events);
        self.entries[index].lifted = true;
        Ok(self.entries[index].item.clone())
    }

    /// Puts a lifted item back into the grid using the provided record.
    ///
    /// The record carries the position, orientation and stack count to
    /// settle with. Fails without changes when the area is not free.
    pub fn settle(
        &mut self,
        record: PlacedItem,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ContainerError> {
        let id = record.id();
        let index = self.position_of(id)?;
        if !self.entries[index].lifted {
            return Err(ContainerError::NotLifted {
                container: self.id,
                item: id,
            });
        }
        let region = record.rect();
        if !self.is_area_free(region.origin(), region.footprint()) {
            return Err(ContainerError::AreaUnavailable {
                container: self.id,
                region,
            });
        }

        let previous_stack = self.entries[index].item.stack_count();
        let stack_count = record.stack_count();
        self.mark(region, true, out_events);
        self.entries[index] = Entry {
            item: record,
            lifted: false,
        };
        out_events.push(Event::ItemMoved {
            container: self.id,
            item: id,
            region,
        });
        if previous_stack != stack_count {
            out_events.push(Event::StackChanged {
                container: self.id,
                item: id,
                stack_count,
            });
        }
        Ok(())
    }

    /// Moves units from `source` into the held item `target`.
    ///
    /// Returns the number of units moved; zero when the stacks do not match
    /// or the target is full.
    pub fn add_to_stack(
        &mut self,
        target: ItemId,
        source: &mut PlacedItem,
        out_events: &mut Vec<Event>,
    ) -> Result<u32, ContainerError> {
        let index = self.position_of(target)?;
        let moved = self.entries[index].item.absorb(source);
        if moved > 0 {
            out_events.push(Event::StackChanged {
                container: self.id,
                item: target,
                stack_count: self.entries[index].item.stack_count(),
            });
        }
        Ok(moved)
    }

    /// Overrides the stack count of a held item.
    pub fn set_stack_count(
        &mut self,
        item: ItemId,
        stack_count: u32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ContainerError> {
        let index = self.position_of(item)?;
        let held = &mut self.entries[index].item;
        if held.stack_count() == stack_count {
            return Ok(());
        }

        held.set_stack_count(stack_count);
        out_events.push(Event::StackChanged {
            container: self.id,
            item,
            stack_count: held.stack_count(),
        });
        Ok(())
    }

    /// Merges a stackable item into settled stacks of the same type.
    ///
    /// Stacks are filled in insertion order. Returns the units merged; the
    /// remainder stays in `incoming`.
    pub fn merge_into_stacks(
        &mut self,
        incoming: &mut PlacedItem,
        out_events: &mut Vec<Event>,
    ) -> u32 {
        if !incoming.is_stackable() {
            return 0;
        }

        let mut merged = 0;
        for entry in self.entries.iter_mut().filter(|entry| !entry.lifted) {
            if incoming.stack_count() == 0 {
                break;
            }
            let moved = entry.item.absorb(incoming);
            if moved > 0 {
                merged += moved;
                out_events.push(Event::StackChanged {
                    container: self.id,
                    item: entry.item.id(),
                    stack_count: entry.item.stack_count(),
                });
            }
        }
        merged
    }

    /// Adds a batch of items, returning those that could not be placed.
    ///
    /// Stackable items first merge into existing stacks; items fully merged
    /// disappear from the batch. The rest are placed largest area first, each
    /// at its first fit, rotated if only the turned footprint fits.
    pub fn add_items(
        &mut self,
        batch: Vec<PlacedItem>,
        out_events: &mut Vec<Event>,
    ) -> Vec<PlacedItem> {
        let mut pending: Vec<PlacedItem> = Vec::with_capacity(batch.len());
        for mut item in batch {
            if self.accepts(&item) {
                let _ = self.merge_into_stacks(&mut item, out_events);
            }
            if !item.is_stackable() || item.stack_count() > 0 {
                pending.push(item);
            }
        }

        pending.sort_by(|a, b| b.footprint().area().cmp(&a.footprint().area()));

        let mut unplaced = Vec::new();
        for mut item in pending {
            if !self.accepts(&item) || self.entry(item.id()).is_some() {
                unplaced.push(item);
                continue;
            }

            let original = item.clone();
            if !self.fit_item(&mut item) {
                unplaced.push(original);
                continue;
            }

            if self.add_item(item, out_events).is_err() {
                unplaced.push(original);
            }
        }
        unplaced
    }

    /// Removes every item at once, returning them in insertion order.
    pub fn clear(&mut self, out_events: &mut Vec<Event>) -> Vec<PlacedItem> {
        let items: Vec<PlacedItem> = self.entries.drain(..).map(|entry| entry.item).collect();
        self.grid.reset();
        out_events.push(Event::Cleared { container: self.id });
        out_events.push(Event::OccupancyChanged { container: self.id });
        items
    }

    /// Recomputes occupancy from settled items and compares it with the grid.
    ///
    /// Returns `false` when two settled items overlap, an item leaves the
    /// grid, or the grid disagrees with the union of item rectangles.
    #[must_use]
    pub fn verify_occupancy(&self) -> bool {
        let (columns, rows) = self.grid.dimensions();
        let mut expected = OccupancyGrid::new(columns, rows);
        for item in self.settled_items() {
            let region = item.rect();
            if !expected.is_area_free(region.origin(), region.footprint()) {
                return false;
            }
            expected.occupy(region, true);
        }
        expected == self.grid
    }

    fn entry(&self, item: ItemId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.item.id() == item)
    }

    fn position_of(&self, item: ItemId) -> Result<usize, ContainerError> {
        self.entries
            .iter()
            .position(|entry| entry.item.id() == item)
            .ok_or(ContainerError::ItemMissing {
                container: self.id,
                item,
            })
    }

    fn mark(&mut self, region: CellRect, value: bool, out_events: &mut Vec<Event>) {
        assert!(
            self.grid.is_uniform(region, !value),
            "occupancy of container {:?} out of sync at {region:?}",
            self.id,
        );
        self.grid.occupy(region, value);
        out_events.push(Event::OccupancyChanged { container: self.id });
    }
}
