//! Transient state of the item currently held by the pointer.

use grid_stash_core::{
    CellCoord, ContainerId, Footprint, PlacedItem, PlacementResult, Rotation, ScreenPoint,
};

/// Phase of the drag lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragState {
    /// No item is held.
    #[default]
    Idle,
    /// An item is attached to the pointer but has not been evaluated yet.
    PickedUp,
    /// The held item has a cached evaluation against the hovered grid.
    Hovering,
    /// A release is being committed or reverted.
    Resolving,
}

/// Where a dragged item came from and how it was oriented there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragOrigin {
    /// Container the item was lifted from.
    pub container: ContainerId,
    /// Anchor cell before the lift.
    pub position: CellCoord,
    /// Footprint before the lift.
    pub footprint: Footprint,
    /// Rotation before the lift.
    pub rotation: Rotation,
}

/// Item held by the pointer together with its origin and last evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    item: PlacedItem,
    origin: Option<DragOrigin>,
    orphaned: bool,
    last_container: Option<ContainerId>,
    last_result: Option<PlacementResult>,
    last_pointer: Option<ScreenPoint>,
    state: DragState,
}

impl DragSession {
    pub(crate) fn picked_up(item: PlacedItem, container: ContainerId) -> Self {
        let origin = DragOrigin {
            container,
            position: item.position(),
            footprint: item.footprint(),
            rotation: item.rotation(),
        };
        Self {
            item,
            origin: Some(origin),
            orphaned: false,
            last_container: Some(container),
            last_result: None,
            last_pointer: None,
            state: DragState::PickedUp,
        }
    }

    /// Session for an item with no origin; `left` is the container it was
    /// last removed from, if it ever had one.
    pub(crate) fn orphan(item: PlacedItem, left: Option<ContainerId>) -> Self {
        Self {
            item,
            origin: None,
            orphaned: true,
            last_container: left,
            last_result: None,
            last_pointer: None,
            state: DragState::PickedUp,
        }
    }

    /// Working copy of the held item, reflecting rotation and stack changes.
    #[must_use]
    pub const fn item(&self) -> &PlacedItem {
        &self.item
    }

    /// Origin the item returns to on drop-back; `None` for orphans.
    #[must_use]
    pub const fn origin(&self) -> Option<&DragOrigin> {
        self.origin.as_ref()
    }

    /// Whether the item has no home and must stay on the pointer.
    #[must_use]
    pub const fn is_orphaned(&self) -> bool {
        self.orphaned
    }

    /// Container whose visuals last showed the item.
    #[must_use]
    pub const fn last_container(&self) -> Option<ContainerId> {
        self.last_container
    }

    /// Most recent hover evaluation.
    #[must_use]
    pub const fn last_result(&self) -> Option<&PlacementResult> {
        self.last_result.as_ref()
    }

    /// Pointer position of the most recent hover.
    #[must_use]
    pub const fn last_pointer(&self) -> Option<ScreenPoint> {
        self.last_pointer
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    pub(crate) fn record(&mut self, pointer: ScreenPoint, result: PlacementResult) {
        self.last_pointer = Some(pointer);
        self.last_result = Some(result);
        self.state = DragState::Hovering;
    }

    pub(crate) fn rotate(&mut self) -> bool {
        self.item.rotate()
    }

    pub(crate) fn begin_resolving(&mut self) {
        self.state = DragState::Resolving;
    }

    pub(crate) fn set_stack_count(&mut self, stack_count: u32) {
        self.item.set_stack_count(stack_count);
    }

    /// Record for settling the item back at its origin, keeping the current stack.
    pub(crate) fn origin_record(&self) -> Option<PlacedItem> {
        let origin = self.origin?;
        let mut record = self.item.clone();
        record.set_position(origin.position);
        record.set_orientation(origin.footprint, origin.rotation);
        Some(record)
    }

    /// Detaches the session from its origin and re-attaches it to the pointer.
    pub(crate) fn into_orphan(mut self) -> Self {
        self.origin = None;
        self.orphaned = true;
        self.reattached()
    }

    pub(crate) fn reattached(mut self) -> Self {
        self.last_result = None;
        self.state = DragState::PickedUp;
        self
    }
}
