//! Text rendering of containers from the visual registry.

use std::fmt::Write as _;

use grid_stash_containers::Container;
use grid_stash_core::ItemId;
use grid_stash_rendering::VisualRegistry;

const GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const EMPTY: char = '.';

fn glyph(item: ItemId) -> char {
    char::from(GLYPHS[item.get() as usize % GLYPHS.len()])
}

/// Draws the container grid followed by a legend of its items.
///
/// Cells come from the sprites the visual registry tracks; items currently
/// held by the pointer are left out of the grid.
pub(crate) fn render_container(container: &Container, visuals: &VisualRegistry) -> String {
    let (columns, rows) = container.grid().dimensions();
    let mut cells = vec![EMPTY; columns as usize * rows as usize];

    for (item, sprite) in visuals.sprites_in(container.id()) {
        if container.is_lifted(item) {
            continue;
        }
        for cell in sprite.region.cells() {
            if cell.column() < columns && cell.row() < rows {
                let index = cell.row() as usize * columns as usize + cell.column() as usize;
                cells[index] = glyph(item);
            }
        }
    }

    let mut out = format!("{} ({columns}x{rows})", container.label());
    if !container.is_active() {
        out.push_str(" [inactive]");
    }
    out.push('\n');
    for row in cells.chunks(columns.max(1) as usize) {
        out.push_str("  ");
        out.extend(row.iter());
        out.push('\n');
    }

    for item in container.items() {
        let _ = write!(
            out,
            "  {} {} x{} at ({}, {}) {}deg",
            glyph(item.id()),
            item.type_key(),
            item.stack_count(),
            item.position().column(),
            item.position().row(),
            item.rotation().degrees(),
        );
        if container.is_lifted(item.id()) {
            out.push_str(" [held]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_stash_core::{CellCoord, ContainerId, Footprint, ItemCategory, ItemSpec, PlacedItem};

    #[test]
    fn render_draws_items_from_sprites() {
        let mut container = Container::new(ContainerId::new(0), "bag", 4, 2);
        let mut events = Vec::new();
        let spec = ItemSpec {
            type_key: "plank".to_owned(),
            category: ItemCategory::Material,
            footprint: Footprint::new(2, 1),
            stackable: false,
            max_stack: 1,
        };
        let mut plank = PlacedItem::from_spec(ItemId::new(1), &spec, 1);
        plank.set_position(CellCoord::new(1, 1));
        let _ = container.add_item(plank, &mut events).expect("plank fits");
        let mut visuals = VisualRegistry::new();
        visuals.apply(&events);

        let rendered = render_container(&container, &visuals);

        assert_eq!(
            rendered,
            "bag (4x2)\n  ....\n  .BB.\n  B plank x1 at (1, 1) 0deg\n"
        );
    }
}
