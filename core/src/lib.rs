#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the grid stash engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! containers, and the drag system. Containers own placed items and mutate
//! them in response to drag commits, broadcasting [`Event`] values that the
//! visual layer consumes. Placement queries answer with [`PlacementResult`]
//! values whose [`ConflictKind`] tells the drag system how a release resolves.
//! Adapters translate pointer positions into cell coordinates through the
//! [`ScreenMapping`] seam so nothing below the adapters knows about pixels.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Unique identifier assigned to an item by the stash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a container when it is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(u32);

impl ContainerId {
    /// Creates a new container identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the top row of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Width and height of an item measured in whole cells.
///
/// Deserialization refuses zero dimensions instead of raising them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Footprint {
    width: u32,
    height: u32,
}

/// A footprint with a zero dimension was supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("footprint {width}x{height} must cover at least one cell")]
pub struct EmptyFootprint {
    /// Width that was supplied.
    pub width: u32,
    /// Height that was supplied.
    pub height: u32,
}

impl Footprint {
    /// Creates a new footprint. Zero dimensions are raised to one cell.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        let width = if width == 0 { 1 } else { width };
        let height = if height == 0 { 1 } else { height };
        Self { width, height }
    }

    /// Creates a footprint, refusing zero dimensions.
    pub const fn try_new(width: u32, height: u32) -> Result<Self, EmptyFootprint> {
        if width == 0 || height == 0 {
            return Err(EmptyFootprint { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width of the footprint in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the footprint in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells covered by the footprint.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reports whether rotating the footprint leaves it unchanged.
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns the footprint turned by a quarter, swapping width and height.
    #[must_use]
    pub const fn rotated(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl<'de> Deserialize<'de> for Footprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename = "Footprint")]
        struct Dimensions {
            width: u32,
            height: u32,
        }

        let Dimensions { width, height } = Dimensions::deserialize(deserializer)?;
        Self::try_new(width, height).map_err(serde::de::Error::custom)
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
///
/// The rectangle covers `[origin, origin + footprint)` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    footprint: Footprint,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and a footprint.
    #[must_use]
    pub const fn new(origin: CellCoord, footprint: Footprint) -> Self {
        Self { origin, footprint }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Exclusive column bound of the rectangle.
    #[must_use]
    pub const fn end_column(&self) -> u64 {
        self.origin.column as u64 + self.footprint.width as u64
    }

    /// Exclusive row bound of the rectangle.
    #[must_use]
    pub const fn end_row(&self) -> u64 {
        self.origin.row as u64 + self.footprint.height as u64
    }

    /// Reports whether the rectangle fits inside a grid of the given size.
    #[must_use]
    pub const fn fits_within(&self, columns: u32, rows: u32) -> bool {
        self.end_column() <= columns as u64 && self.end_row() <= rows as u64
    }

    /// Reports whether the provided cell lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column >= self.origin.column
            && cell.row >= self.origin.row
            && (cell.column as u64) < self.end_column()
            && (cell.row as u64) < self.end_row()
    }

    /// Reports whether two rectangles share at least one cell.
    #[must_use]
    pub const fn intersects(&self, other: &CellRect) -> bool {
        (self.origin.column as u64) < other.end_column()
            && (other.origin.column as u64) < self.end_column()
            && (self.origin.row as u64) < other.end_row()
            && (other.origin.row as u64) < self.end_row()
    }

    /// Iterates over the covered cells in row-major order, top row first.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let footprint = self.footprint;
        (0..footprint.height).flat_map(move |dy| {
            (0..footprint.width).map(move |dx| {
                CellCoord::new(
                    origin.column.saturating_add(dx),
                    origin.row.saturating_add(dy),
                )
            })
        })
    }
}

/// Quarter-turn orientation applied to an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// Upright orientation as defined by the item specification.
    #[default]
    Deg0,
    /// Rotated a quarter turn clockwise.
    Deg90,
    /// Rotated half a turn.
    Deg180,
    /// Rotated three quarter turns clockwise.
    Deg270,
}

impl Rotation {
    /// Returns the orientation reached after another quarter turn.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// Orientation expressed in whole degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

/// Broad item category used by container slot filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Items without a dedicated category.
    #[default]
    General,
    /// Melee and ranged weapons.
    Weapon,
    /// Wearable protection.
    Armor,
    /// Food, potions and other single-use items.
    Consumable,
    /// Crafting inputs.
    Material,
    /// Utility tools.
    Tool,
}

/// Item definition supplied by the item-definition provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Key shared by all items of the same type; stacks only merge on equal keys.
    pub type_key: String,
    /// Category consulted by container slot filters.
    #[serde(default)]
    pub category: ItemCategory,
    /// Upright footprint of the item.
    pub footprint: Footprint,
    /// Whether items of this type merge into stacks.
    #[serde(default)]
    pub stackable: bool,
    /// Largest stack a single item may hold.
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

const fn default_max_stack() -> u32 {
    1
}

/// Item tracked by a container, together with its placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    id: ItemId,
    type_key: String,
    category: ItemCategory,
    position: CellCoord,
    footprint: Footprint,
    rotation: Rotation,
    stack_count: u32,
    stackable: bool,
    max_stack: u32,
}

impl PlacedItem {
    /// Creates an item from its specification, anchored at the grid origin.
    ///
    /// The stack count is clamped to the specification's maximum.
    #[must_use]
    pub fn from_spec(id: ItemId, spec: &ItemSpec, stack_count: u32) -> Self {
        let max_stack = spec.max_stack.max(1);
        Self {
            id,
            type_key: spec.type_key.clone(),
            category: spec.category,
            position: CellCoord::new(0, 0),
            footprint: spec.footprint,
            rotation: Rotation::Deg0,
            stack_count: stack_count.min(max_stack),
            stackable: spec.stackable,
            max_stack,
        }
    }

    /// Identifier allocated to the item.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Type key shared by all items of the same definition.
    #[must_use]
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    /// Category of the item.
    #[must_use]
    pub const fn category(&self) -> ItemCategory {
        self.category
    }

    /// Upper-left cell occupied by the item.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Footprint in the item's current orientation.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Current orientation.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Number of units held by the item.
    #[must_use]
    pub const fn stack_count(&self) -> u32 {
        self.stack_count
    }

    /// Whether the item merges with others of the same type.
    #[must_use]
    pub const fn is_stackable(&self) -> bool {
        self.stackable
    }

    /// Largest stack the item may hold.
    #[must_use]
    pub const fn max_stack(&self) -> u32 {
        self.max_stack
    }

    /// Cells covered by the item at its current position and orientation.
    #[must_use]
    pub const fn rect(&self) -> CellRect {
        CellRect::new(self.position, self.footprint)
    }

    /// Units the stack can still absorb before reaching its maximum.
    #[must_use]
    pub const fn space_available(&self) -> u32 {
        self.max_stack.saturating_sub(self.stack_count)
    }

    /// Reports whether `incoming` may merge units into this item.
    #[must_use]
    pub fn accepts_stack_from(&self, incoming: &PlacedItem) -> bool {
        self.stackable
            && incoming.stackable
            && self.type_key == incoming.type_key
            && self.space_available() > 0
    }

    /// Moves the item's anchor to the provided cell.
    pub fn set_position(&mut self, position: CellCoord) {
        self.position = position;
    }

    /// Replaces the orientation, keeping footprint and rotation in sync.
    pub fn set_orientation(&mut self, footprint: Footprint, rotation: Rotation) {
        self.footprint = footprint;
        self.rotation = rotation;
    }

    /// Overrides the stack count, clamped to the item's maximum.
    pub fn set_stack_count(&mut self, stack_count: u32) {
        self.stack_count = stack_count.min(self.max_stack);
    }

    /// Turns the item a quarter. Returns `false` for square footprints,
    /// where rotation has no effect on placement.
    pub fn rotate(&mut self) -> bool {
        if self.footprint.is_square() {
            return false;
        }

        self.footprint = self.footprint.rotated();
        self.rotation = self.rotation.advance();
        true
    }

    /// Moves as many units as fit from `source` into this stack.
    ///
    /// Returns the number of units transferred.
    pub fn absorb(&mut self, source: &mut PlacedItem) -> u32 {
        if !self.accepts_stack_from(source) {
            return 0;
        }

        let moved = self.space_available().min(source.stack_count);
        self.stack_count += moved;
        source.stack_count -= moved;
        moved
    }
}

/// Restricts which items a container accepts, as equipment slots do.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotFilter {
    /// Every item is accepted.
    #[default]
    Any,
    /// Only items whose category is listed are accepted.
    Categories(Vec<ItemCategory>),
    /// Only items whose type key is listed are accepted.
    TypeKeys(Vec<String>),
}

impl SlotFilter {
    /// Reports whether the filter admits the provided item.
    #[must_use]
    pub fn accepts(&self, item: &PlacedItem) -> bool {
        match self {
            Self::Any => true,
            Self::Categories(categories) => categories.contains(&item.category()),
            Self::TypeKeys(keys) => keys.iter().any(|key| key == item.type_key()),
        }
    }
}

/// Classification of a candidate placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// The candidate area is free and the item may be placed.
    None,
    /// The candidate rectangle leaves the grid, or the pointer is off-grid.
    OutOfBounds,
    /// The candidate rectangle covers more than one item.
    IntersectsMultiple,
    /// The candidate rectangle covers exactly one item that would be swapped.
    SwapEligible,
    /// The candidate rectangle covers one item of the same type with spare capacity.
    StackEligible,
    /// The container refuses items of this kind.
    InvalidSlotType,
}

impl ConflictKind {
    /// Reports whether a release with this result commits a mutation.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::None | Self::SwapEligible | Self::StackEligible)
    }
}

/// Screen-space position measured in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate, increasing to the right.
    pub x: f32,
    /// Vertical pixel coordinate, increasing downward.
    pub y: f32,
}

impl ScreenPoint {
    /// Creates a new screen point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Outcome of evaluating a candidate placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementResult {
    /// Classification of the candidate.
    pub conflict: ConflictKind,
    /// Cell at which the item would be anchored.
    pub suggested_position: CellCoord,
    /// Screen position of the suggested cell, filled in by the router.
    pub pixel_position: Option<ScreenPoint>,
    /// Item covered by the candidate when exactly one is involved.
    pub overlapping_item: Option<ItemId>,
    /// Container the candidate was evaluated against.
    pub target_container: Option<ContainerId>,
}

impl PlacementResult {
    /// Creates a result for the provided conflict at a suggested cell.
    #[must_use]
    pub const fn new(conflict: ConflictKind, suggested_position: CellCoord) -> Self {
        Self {
            conflict,
            suggested_position,
            pixel_position: None,
            overlapping_item: None,
            target_container: None,
        }
    }

    /// Result reported when the pointer is not over any eligible grid.
    #[must_use]
    pub const fn off_grid() -> Self {
        Self::new(ConflictKind::OutOfBounds, CellCoord::new(0, 0))
    }

    /// Attaches the overlapping item.
    #[must_use]
    pub const fn with_overlap(mut self, item: ItemId) -> Self {
        self.overlapping_item = Some(item);
        self
    }

    /// Attaches the container the result was evaluated against.
    #[must_use]
    pub const fn with_target(mut self, container: ContainerId) -> Self {
        self.target_container = Some(container);
        self
    }

    /// Attaches the screen position of the suggested cell.
    #[must_use]
    pub const fn with_pixel_position(mut self, point: ScreenPoint) -> Self {
        self.pixel_position = Some(point);
        self
    }
}

/// Drop preview derived from the latest hover result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Telegraph {
    /// Container the preview is drawn over.
    pub container: ContainerId,
    /// Cells the dragged item would cover.
    pub region: CellRect,
    /// Classification driving the preview's tone.
    pub conflict: ConflictKind,
    /// Screen position of the region's upper-left corner, when known.
    pub pixel_position: Option<ScreenPoint>,
}

/// Why an item left a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// The item is gone for good and its resources may be released.
    Destroy,
    /// The item will be re-added elsewhere; observers must keep its resources.
    Transfer,
}

/// Change notifications broadcast by containers after mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// An item was inserted into a container.
    ItemAdded {
        /// Container that received the item.
        container: ContainerId,
        /// Item that was inserted.
        item: ItemId,
        /// Cells covered by the item.
        region: CellRect,
    },
    /// An item left a container.
    ItemRemoved {
        /// Container the item left.
        container: ContainerId,
        /// Item that was removed.
        item: ItemId,
        /// Whether the item is destroyed or moving elsewhere.
        reason: RemovalReason,
    },
    /// An item changed position or orientation inside its container.
    ItemMoved {
        /// Container holding the item.
        container: ContainerId,
        /// Item that moved.
        item: ItemId,
        /// Cells covered after the move.
        region: CellRect,
    },
    /// An item's stack count changed.
    StackChanged {
        /// Container holding the item.
        container: ContainerId,
        /// Item whose stack changed.
        item: ItemId,
        /// Stack count after the change.
        stack_count: u32,
    },
    /// Every item was removed from a container at once.
    Cleared {
        /// Container that was emptied.
        container: ContainerId,
    },
    /// Cells of a container's occupancy grid flipped.
    OccupancyChanged {
        /// Container whose grid changed.
        container: ContainerId,
    },
}

/// Adapter seam translating pointer positions into grid cells.
///
/// Implemented by the visual collaborator, which owns on-screen geometry.
pub trait ScreenMapping {
    /// Reports whether the pointer lies inside the container's on-screen grid.
    fn contains(&self, container: ContainerId, pointer: ScreenPoint) -> bool;

    /// Computes the cell an item of `footprint` would be anchored at when
    /// held under the pointer.
    ///
    /// Returns `None` when the anchor would fall left of or above the grid.
    fn candidate_origin(
        &self,
        container: ContainerId,
        pointer: ScreenPoint,
        footprint: Footprint,
    ) -> Option<CellCoord>;

    /// Screen position of a cell's upper-left corner.
    fn cell_to_screen(&self, container: ContainerId, cell: CellCoord) -> Option<ScreenPoint>;
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, CellRect, ConflictKind, EmptyFootprint, Footprint, ItemCategory, ItemId,
        ItemSpec, PlacedItem, Rotation, SlotFilter,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn potion_spec() -> ItemSpec {
        ItemSpec {
            type_key: "potion".to_owned(),
            category: ItemCategory::Consumable,
            footprint: Footprint::new(1, 1),
            stackable: true,
            max_stack: 10,
        }
    }

    #[test]
    fn placed_item_round_trips_through_bincode() {
        let mut item = PlacedItem::from_spec(ItemId::new(3), &potion_spec(), 4);
        item.set_position(CellCoord::new(2, 5));
        assert_round_trip(&item);
    }

    #[test]
    fn conflict_kind_round_trips_through_bincode() {
        assert_round_trip(&ConflictKind::StackEligible);
    }

    #[test]
    fn zero_footprint_is_raised_to_one_cell() {
        let footprint = Footprint::new(0, 3);
        assert_eq!(footprint.width(), 1);
        assert_eq!(footprint.height(), 3);
    }

    #[test]
    fn decoding_refuses_zero_footprint() {
        let bytes = bincode::serialize(&(0_u32, 3_u32)).expect("serialize");

        assert!(bincode::deserialize::<Footprint>(&bytes).is_err());
        assert_eq!(
            Footprint::try_new(0, 3),
            Err(EmptyFootprint {
                width: 0,
                height: 3
            })
        );
        assert_round_trip(&Footprint::new(2, 3));
    }

    #[test]
    fn rectangles_sharing_an_edge_do_not_intersect() {
        let left = CellRect::new(CellCoord::new(0, 0), Footprint::new(2, 2));
        let right = CellRect::new(CellCoord::new(2, 0), Footprint::new(2, 2));
        let overlapping = CellRect::new(CellCoord::new(1, 1), Footprint::new(2, 2));

        assert!(!left.intersects(&right));
        assert!(left.intersects(&overlapping));
        assert!(right.intersects(&overlapping));
    }

    #[test]
    fn rect_cells_are_row_major() {
        let rect = CellRect::new(CellCoord::new(1, 1), Footprint::new(2, 2));
        let cells: Vec<CellCoord> = rect.cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(2, 2),
            ]
        );
    }

    #[test]
    fn rotate_swaps_non_square_footprints_only() {
        let spec = ItemSpec {
            type_key: "spear".to_owned(),
            category: ItemCategory::Weapon,
            footprint: Footprint::new(1, 3),
            stackable: false,
            max_stack: 1,
        };
        let mut spear = PlacedItem::from_spec(ItemId::new(1), &spec, 1);
        assert!(spear.rotate());
        assert_eq!(spear.footprint(), Footprint::new(3, 1));
        assert_eq!(spear.rotation(), Rotation::Deg90);

        let mut potion = PlacedItem::from_spec(ItemId::new(2), &potion_spec(), 1);
        assert!(!potion.rotate());
        assert_eq!(potion.rotation(), Rotation::Deg0);
    }

    #[test]
    fn absorb_moves_only_available_space() {
        let mut target = PlacedItem::from_spec(ItemId::new(1), &potion_spec(), 5);
        let mut source = PlacedItem::from_spec(ItemId::new(2), &potion_spec(), 8);

        assert_eq!(target.absorb(&mut source), 5);
        assert_eq!(target.stack_count(), 10);
        assert_eq!(source.stack_count(), 3);
        assert_eq!(target.absorb(&mut source), 0, "full stacks accept nothing");
    }

    #[test]
    fn slot_filter_checks_category_and_type_key() {
        let potion = PlacedItem::from_spec(ItemId::new(1), &potion_spec(), 1);

        assert!(SlotFilter::Any.accepts(&potion));
        assert!(SlotFilter::Categories(vec![ItemCategory::Consumable]).accepts(&potion));
        assert!(!SlotFilter::Categories(vec![ItemCategory::Armor]).accepts(&potion));
        assert!(SlotFilter::TypeKeys(vec!["potion".to_owned()]).accepts(&potion));
        assert!(!SlotFilter::TypeKeys(vec!["sword".to_owned()]).accepts(&potion));
    }
}
