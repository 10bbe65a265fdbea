//! Pure placement queries evaluated against a container snapshot.

use grid_stash_core::{CellCoord, CellRect, ConflictKind, Footprint, PlacedItem, PlacementResult};

use crate::container::Container;

/// Classifies placing `dragged` with `footprint` anchored at `candidate`.
///
/// The dragged item itself never counts as an obstacle. A container slot
/// filter refusing the item overrides every other outcome.
///
/// # Panics
///
/// Panics when no item covers the candidate but the grid reports covered
/// cells there, which means the container's bookkeeping is corrupt.
#[must_use]
pub fn evaluate(
    container: &Container,
    candidate: CellCoord,
    footprint: Footprint,
    dragged: &PlacedItem,
) -> PlacementResult {
    let result = classify(container, candidate, footprint, dragged);
    let result = if container.accepts(dragged) {
        result
    } else {
        PlacementResult {
            conflict: ConflictKind::InvalidSlotType,
            overlapping_item: None,
            ..result
        }
    };
    result.with_target(container.id())
}

/// Settled items, other than `dragged`, whose cells intersect the rectangle.
#[must_use]
pub fn overlapping_items<'a>(
    container: &'a Container,
    rect: CellRect,
    dragged: &PlacedItem,
) -> Vec<&'a PlacedItem> {
    container
        .settled_items()
        .filter(|item| item.id() != dragged.id() && item.rect().intersects(&rect))
        .collect()
}

fn classify(
    container: &Container,
    candidate: CellCoord,
    footprint: Footprint,
    dragged: &PlacedItem,
) -> PlacementResult {
    let rect = CellRect::new(candidate, footprint);
    let (columns, rows) = container.grid().dimensions();
    if !rect.fits_within(columns, rows) {
        return PlacementResult::new(ConflictKind::OutOfBounds, candidate);
    }

    let overlaps = overlapping_items(container, rect, dragged);
    match overlaps.as_slice() {
        [] => {
            assert!(
                container.is_area_free(candidate, footprint),
                "container {:?} reports covered cells at {rect:?} with no item there",
                container.id(),
            );
            PlacementResult::new(ConflictKind::None, candidate)
        }
        [existing] => {
            let conflict = if existing.accepts_stack_from(dragged) {
                ConflictKind::StackEligible
            } else {
                ConflictKind::SwapEligible
            };
            PlacementResult::new(conflict, candidate).with_overlap(existing.id())
        }
        _ => PlacementResult::new(ConflictKind::IntersectsMultiple, candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_stash_core::{ContainerId, ItemCategory, ItemId, ItemSpec, SlotFilter};

    fn spec(type_key: &str, width: u32, height: u32) -> ItemSpec {
        ItemSpec {
            type_key: type_key.to_owned(),
            category: ItemCategory::General,
            footprint: Footprint::new(width, height),
            stackable: false,
            max_stack: 1,
        }
    }

    fn potion(stack_count: u32) -> (ItemSpec, u32) {
        (
            ItemSpec {
                stackable: true,
                max_stack: 10,
                category: ItemCategory::Consumable,
                ..spec("potion", 1, 1)
            },
            stack_count,
        )
    }

    fn place(container: &mut Container, id: u32, spec: &ItemSpec, stack: u32, cell: CellCoord) {
        let mut item = PlacedItem::from_spec(ItemId::new(id), spec, stack);
        item.set_position(cell);
        let mut events = Vec::new();
        let _ = container.add_item(item, &mut events).expect("item fits");
    }

    fn dragged(spec: &ItemSpec, stack: u32) -> PlacedItem {
        PlacedItem::from_spec(ItemId::new(100), spec, stack)
    }

    #[test]
    fn free_area_is_valid() {
        let container = Container::new(ContainerId::new(2), "bag", 4, 4);
        let gem = spec("gem", 1, 1);
        let result = evaluate(
            &container,
            CellCoord::new(3, 3),
            Footprint::new(1, 1),
            &dragged(&gem, 1),
        );

        assert_eq!(result.conflict, ConflictKind::None);
        assert_eq!(result.suggested_position, CellCoord::new(3, 3));
        assert_eq!(result.target_container, Some(ContainerId::new(2)));
        assert_eq!(result.overlapping_item, None);
    }

    #[test]
    fn rectangles_past_the_edge_are_out_of_bounds_even_when_empty() {
        let mut container = Container::new(ContainerId::new(0), "bag", 4, 4);
        let block = spec("block", 2, 2);
        let square = dragged(&block, 1);

        for candidate in [
            CellCoord::new(3, 0),
            CellCoord::new(0, 3),
            CellCoord::new(3, 3),
            CellCoord::new(9, 9),
        ] {
            let result = evaluate(&container, candidate, Footprint::new(2, 2), &square);
            assert_eq!(result.conflict, ConflictKind::OutOfBounds);
        }

        place(&mut container, 1, &block, 1, CellCoord::new(2, 2));
        let result = evaluate(&container, CellCoord::new(3, 3), Footprint::new(2, 2), &square);
        assert_eq!(result.conflict, ConflictKind::OutOfBounds);
    }

    #[test]
    fn single_overlap_with_different_type_is_a_swap() {
        let mut container = Container::new(ContainerId::new(0), "bag", 4, 4);
        let block = spec("block", 2, 2);
        place(&mut container, 1, &block, 1, CellCoord::new(0, 0));

        let result = evaluate(
            &container,
            CellCoord::new(1, 1),
            Footprint::new(1, 1),
            &dragged(&spec("gem", 1, 1), 1),
        );

        assert_eq!(result.conflict, ConflictKind::SwapEligible);
        assert_eq!(result.overlapping_item, Some(ItemId::new(1)));
    }

    #[test]
    fn single_overlap_with_same_stackable_type_is_a_stack() {
        let mut container = Container::new(ContainerId::new(0), "bag", 4, 4);
        let (potion_spec, _) = potion(0);
        place(&mut container, 1, &potion_spec, 5, CellCoord::new(1, 1));

        let result = evaluate(
            &container,
            CellCoord::new(1, 1),
            Footprint::new(1, 1),
            &dragged(&potion_spec, 8),
        );

        assert_eq!(result.conflict, ConflictKind::StackEligible);
        assert_eq!(result.overlapping_item, Some(ItemId::new(1)));
    }

    #[test]
    fn full_stack_falls_back_to_swap() {
        let mut container = Container::new(ContainerId::new(0), "bag", 4, 4);
        let (potion_spec, full) = potion(10);
        place(&mut container, 1, &potion_spec, full, CellCoord::new(1, 1));

        let result = evaluate(
            &container,
            CellCoord::new(1, 1),
            Footprint::new(1, 1),
            &dragged(&potion_spec, 2),
        );

        assert_eq!(result.conflict, ConflictKind::SwapEligible);
    }

    #[test]
    fn covering_two_items_is_rejected() {
        let mut container = Container::new(ContainerId::new(0), "bag", 4, 4);
        let gem = spec("gem", 1, 1);
        place(&mut container, 1, &gem, 1, CellCoord::new(0, 0));
        place(&mut container, 2, &gem, 1, CellCoord::new(1, 0));

        let result = evaluate(
            &container,
            CellCoord::new(0, 0),
            Footprint::new(2, 2),
            &dragged(&spec("block", 2, 2), 1),
        );

        assert_eq!(result.conflict, ConflictKind::IntersectsMultiple);
        assert_eq!(result.overlapping_item, None);
    }

    #[test]
    fn dragged_item_does_not_collide_with_itself() {
        let mut container = Container::new(ContainerId::new(0), "bag", 4, 4);
        let plank = spec("plank", 3, 1);
        place(&mut container, 1, &plank, 1, CellCoord::new(0, 0));
        let mut events = Vec::new();
        let lifted = container
            .lift(ItemId::new(1), &mut events)
            .expect("plank is present");

        let result = evaluate(&container, CellCoord::new(1, 0), lifted.footprint(), &lifted);
        assert_eq!(result.conflict, ConflictKind::None);
    }

    #[test]
    fn slot_filter_overrides_every_other_outcome() {
        let mut container = Container::new(ContainerId::new(0), "ring", 2, 2)
            .with_filter(SlotFilter::TypeKeys(vec!["ring".to_owned()]));
        let ring = spec("ring", 1, 1);
        place(&mut container, 1, &ring, 1, CellCoord::new(0, 0));
        let gem = dragged(&spec("gem", 1, 1), 1);

        for candidate in [CellCoord::new(1, 1), CellCoord::new(0, 0), CellCoord::new(5, 5)] {
            let result = evaluate(&container, candidate, Footprint::new(1, 1), &gem);
            assert_eq!(result.conflict, ConflictKind::InvalidSlotType);
            assert_eq!(result.overlapping_item, None);
        }
    }
}
