#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Screen-space presentation contracts for grid stash adapters.
//!
//! This crate owns everything that knows about pixels: where each container's
//! grid sits on screen, how a pointer maps to an anchor cell, how a drop
//! preview is tinted, and which item sprites exist. The sprite registry is
//! driven only by container events.

use glam::Vec2;
use grid_stash_core::{
    CellCoord, CellRect, ConflictKind, ContainerId, Event, Footprint, ItemId, RemovalReason,
    ScreenMapping, ScreenPoint, Telegraph,
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Tint for a valid drop.
pub const VALID_TINT: Color = Color::from_rgb_u8(76, 175, 80);
/// Tint for a drop that swaps or stacks.
pub const INTERACT_TINT: Color = Color::from_rgb_u8(255, 179, 0);
/// Tint for a drop that will be refused.
pub const REJECT_TINT: Color = Color::from_rgb_u8(229, 57, 53);

/// Preview tint for a conflict; `None` hides the preview.
#[must_use]
pub const fn telegraph_color(conflict: ConflictKind) -> Option<Color> {
    match conflict {
        ConflictKind::None => Some(VALID_TINT),
        ConflictKind::SwapEligible | ConflictKind::StackEligible => Some(INTERACT_TINT),
        ConflictKind::IntersectsMultiple | ConflictKind::InvalidSlotType => Some(REJECT_TINT),
        ConflictKind::OutOfBounds => None,
    }
}

/// Placement of a single container grid on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Screen position of the grid's upper-left corner.
    pub origin: Vec2,
    /// Side length of a cell in pixels.
    pub cell_size: f32,
    /// Number of columns drawn.
    pub columns: u32,
    /// Number of rows drawn.
    pub rows: u32,
}

impl GridLayout {
    /// Creates a new grid layout.
    ///
    /// Returns an error when the cell size is not a positive finite number.
    pub fn new(
        origin: Vec2,
        cell_size: f32,
        columns: u32,
        rows: u32,
    ) -> Result<Self, RenderingError> {
        if !cell_size.is_finite() || cell_size <= f32::EPSILON {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            origin,
            cell_size,
            columns,
            rows,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Determines whether a screen position lies on the grid.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        let local = position - self.origin;
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.width() && local.y < self.height()
    }

    /// Anchor cell for an item of `footprint` centered under `position`.
    ///
    /// The anchor is not clamped to the grid; callers detect overflow through
    /// the placement query. Returns `None` when the anchor would lie left of
    /// or above the grid. A pointer on the grid's left or top edge still
    /// anchors at the first column or row.
    #[must_use]
    pub fn candidate_origin(&self, position: Vec2, footprint: Footprint) -> Option<CellCoord> {
        let local = (position - self.origin) / self.cell_size;
        let half = Vec2::new(footprint.width() as f32, footprint.height() as f32) * 0.5;
        let offset = local - half;
        if offset.x < -0.5 || offset.y < -0.5 {
            return None;
        }

        let anchor = offset.round().max(Vec2::ZERO);
        Some(CellCoord::new(anchor.x as u32, anchor.y as u32))
    }

    /// Screen position of a cell's upper-left corner.
    #[must_use]
    pub fn cell_to_screen(&self, cell: CellCoord) -> Vec2 {
        self.origin + Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_size
    }

    /// Screen size of a footprint.
    #[must_use]
    pub fn footprint_size(&self, footprint: Footprint) -> Vec2 {
        Vec2::new(footprint.width() as f32, footprint.height() as f32) * self.cell_size
    }
}

/// Screen geometry of every container, implementing the pointer mapping seam.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenLayout {
    grids: BTreeMap<ContainerId, GridLayout>,
}

impl ScreenLayout {
    /// Creates an empty screen layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a container grid on screen, returning any previous layout.
    pub fn insert(&mut self, container: ContainerId, layout: GridLayout) -> Option<GridLayout> {
        self.grids.insert(container, layout)
    }

    /// Layout of a container, if it is shown.
    #[must_use]
    pub fn layout(&self, container: ContainerId) -> Option<&GridLayout> {
        self.grids.get(&container)
    }
}

impl ScreenMapping for ScreenLayout {
    fn contains(&self, container: ContainerId, pointer: ScreenPoint) -> bool {
        self.layout(container)
            .is_some_and(|layout| layout.contains(to_vec(pointer)))
    }

    fn candidate_origin(
        &self,
        container: ContainerId,
        pointer: ScreenPoint,
        footprint: Footprint,
    ) -> Option<CellCoord> {
        self.layout(container)?
            .candidate_origin(to_vec(pointer), footprint)
    }

    fn cell_to_screen(&self, container: ContainerId, cell: CellCoord) -> Option<ScreenPoint> {
        self.layout(container)
            .map(|layout| to_point(layout.cell_to_screen(cell)))
    }
}

fn to_vec(point: ScreenPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

fn to_point(vector: Vec2) -> ScreenPoint {
    ScreenPoint::new(vector.x, vector.y)
}

/// Drawable drop preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelegraphPresentation {
    /// Container the preview is drawn over.
    pub container: ContainerId,
    /// Screen position of the preview's upper-left corner.
    pub origin: Vec2,
    /// Screen size of the preview.
    pub size: Vec2,
    /// Fill tint.
    pub color: Color,
}

impl TelegraphPresentation {
    /// Converts a drop preview to screen space.
    ///
    /// Returns `None` for hidden conflicts or containers without a layout.
    #[must_use]
    pub fn from_telegraph(telegraph: &Telegraph, screen: &ScreenLayout) -> Option<Self> {
        let color = telegraph_color(telegraph.conflict)?;
        let layout = screen.layout(telegraph.container)?;
        let origin = telegraph
            .pixel_position
            .map_or_else(|| layout.cell_to_screen(telegraph.region.origin()), to_vec);

        Some(Self {
            container: telegraph.container,
            origin,
            size: layout.footprint_size(telegraph.region.footprint()),
            color: color.with_alpha(0.45),
        })
    }
}

/// On-screen representation of a placed item, keyed by its identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemSprite {
    /// Container currently showing the sprite; `None` while in transfer.
    pub container: Option<ContainerId>,
    /// Cells covered by the item.
    pub region: CellRect,
    /// Stack count badge, once a stack change has been observed.
    pub stack_count: Option<u32>,
}

/// Sprite bookkeeping driven solely by container events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisualRegistry {
    sprites: BTreeMap<ItemId, ItemSprite>,
    dirty: BTreeSet<ContainerId>,
}

impl VisualRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a batch of container events.
    pub fn apply(&mut self, events: &[Event]) {
        for event in events {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: &Event) {
        match *event {
            Event::ItemAdded {
                container,
                item,
                region,
            } => {
                let sprite = self.sprites.entry(item).or_insert(ItemSprite {
                    container: None,
                    region,
                    stack_count: None,
                });
                sprite.container = Some(container);
                sprite.region = region;
                let _ = self.dirty.insert(container);
            }
            Event::ItemRemoved {
                container,
                item,
                reason,
            } => {
                match reason {
                    RemovalReason::Destroy => {
                        let _ = self.sprites.remove(&item);
                    }
                    RemovalReason::Transfer => {
                        if let Some(sprite) = self.sprites.get_mut(&item) {
                            sprite.container = None;
                        }
                    }
                }
                let _ = self.dirty.insert(container);
            }
            Event::ItemMoved {
                container,
                item,
                region,
            } => {
                if let Some(sprite) = self.sprites.get_mut(&item) {
                    sprite.region = region;
                }
                let _ = self.dirty.insert(container);
            }
            Event::StackChanged {
                container,
                item,
                stack_count,
            } => {
                if let Some(sprite) = self.sprites.get_mut(&item) {
                    sprite.stack_count = Some(stack_count);
                }
                let _ = self.dirty.insert(container);
            }
            Event::Cleared { container } => {
                self.sprites
                    .retain(|_, sprite| sprite.container != Some(container));
                let _ = self.dirty.insert(container);
            }
            Event::OccupancyChanged { container } => {
                let _ = self.dirty.insert(container);
            }
        }
    }

    /// Sprite registered for an item.
    #[must_use]
    pub fn sprite(&self, item: ItemId) -> Option<&ItemSprite> {
        self.sprites.get(&item)
    }

    /// Sprites shown in a container, ordered by item identifier.
    pub fn sprites_in(
        &self,
        container: ContainerId,
    ) -> impl Iterator<Item = (ItemId, &ItemSprite)> + '_ {
        self.sprites
            .iter()
            .filter(move |(_, sprite)| sprite.container == Some(container))
            .map(|(item, sprite)| (*item, sprite))
    }

    /// Number of live sprites, including those in transfer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether no sprites are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Drains the containers that need a redraw.
    pub fn take_dirty(&mut self) -> Vec<ContainerId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Cells must have a positive on-screen size.
    #[error("cell size must be positive (received {cell_size})")]
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
}
