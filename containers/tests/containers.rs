use grid_stash_containers::{placement, Container, Stash};
use grid_stash_core::{
    CellCoord, ConflictKind, ContainerId, Footprint, ItemCategory, ItemId, ItemSpec, PlacedItem,
    RemovalReason, Rotation, SlotFilter,
};

fn spec(type_key: &str, width: u32, height: u32) -> ItemSpec {
    ItemSpec {
        type_key: type_key.to_owned(),
        category: ItemCategory::General,
        footprint: Footprint::new(width, height),
        stackable: false,
        max_stack: 1,
    }
}

#[test]
fn first_fit_places_two_blocks_side_by_side() {
    let mut stash = Stash::new();
    let bag = stash.register("bag", 4, 4, SlotFilter::Any);
    let block = spec("block", 2, 2);
    let first = stash.create_item(&block, 1);
    let second = stash.create_item(&block, 1);
    let (first_id, second_id) = (first.id(), second.id());
    let mut events = Vec::new();

    for item in [first, second] {
        let unplaced = stash
            .pick_up_loot(bag, vec![item], &mut events)
            .expect("bag registered");
        assert!(unplaced.is_empty());
    }

    let container = stash.container(bag).expect("bag registered");
    assert_eq!(
        container.item(first_id).map(PlacedItem::position),
        Some(CellCoord::new(0, 0))
    );
    assert_eq!(
        container.item(second_id).map(PlacedItem::position),
        Some(CellCoord::new(2, 0))
    );
}

#[test]
fn place_then_remove_restores_grid_bit_for_bit() {
    let mut container = Container::new(ContainerId::new(0), "bag", 5, 4);
    let mut events = Vec::new();
    let mut anchor = PlacedItem::from_spec(ItemId::new(1), &spec("anchor", 2, 1), 1);
    anchor.set_position(CellCoord::new(3, 3));
    let _ = container.add_item(anchor, &mut events).expect("anchor fits");
    let before = container.grid().clone();

    let mut item = PlacedItem::from_spec(ItemId::new(2), &spec("shield", 2, 3), 1);
    assert!(container.fit_item(&mut item));
    let id = container.add_item(item, &mut events).expect("shield fits");
    assert_ne!(container.grid(), &before);

    let _ = container
        .remove_item(id, RemovalReason::Destroy, &mut events)
        .expect("shield present");
    assert_eq!(container.grid().cells(), before.cells());
}

#[test]
fn long_item_rotates_into_only_free_row() {
    let mut stash = Stash::new();
    let bag = stash.register("bag", 3, 3, SlotFilter::Any);
    let mut events = Vec::new();
    let mut slab = stash.create_item(&spec("slab", 3, 2), 1);
    slab.set_position(CellCoord::new(0, 0));
    let _ = stash
        .container_mut(bag)
        .expect("bag registered")
        .add_item(slab, &mut events)
        .expect("slab fits");

    let staff = stash.create_item(&spec("staff", 1, 3), 1);
    let staff_id = staff.id();
    let container = stash.container(bag).expect("bag registered");
    assert!(
        container.grid().first_fit(staff.footprint()).is_none(),
        "upright staff cannot fit"
    );

    let unplaced = stash
        .pick_up_loot(bag, vec![staff], &mut events)
        .expect("bag registered");
    assert!(unplaced.is_empty());

    let placed = stash
        .container(bag)
        .and_then(|container| container.item(staff_id))
        .expect("staff placed");
    assert_eq!(placed.position(), CellCoord::new(0, 2));
    assert_eq!(placed.footprint(), Footprint::new(3, 1));
    assert_eq!(placed.rotation(), Rotation::Deg90);
}

#[test]
fn out_of_bounds_ignores_occupancy() {
    let mut stash = Stash::new();
    let bag = stash.register("bag", 3, 2, SlotFilter::Any);
    let mut events = Vec::new();
    let loot: Vec<PlacedItem> = (0..6).map(|_| stash.create_item(&spec("gem", 1, 1), 1)).collect();
    let unplaced = stash
        .pick_up_loot(bag, loot, &mut events)
        .expect("bag registered");
    assert!(unplaced.is_empty());

    let container = stash.container(bag).expect("bag registered");
    let rod = PlacedItem::from_spec(ItemId::new(999), &spec("rod", 1, 2), 1);
    for column in 0..5 {
        for row in 0..4 {
            let candidate = CellCoord::new(column, row);
            let result = placement::evaluate(container, candidate, rod.footprint(), &rod);
            let fits = column < 3 && row + 2 <= 2;
            if !fits {
                assert_eq!(
                    result.conflict,
                    ConflictKind::OutOfBounds,
                    "candidate {candidate:?} leaves the grid"
                );
            } else {
                assert_ne!(result.conflict, ConflictKind::OutOfBounds);
            }
        }
    }
}

#[test]
fn occupancy_matches_items_through_mixed_operations() {
    let mut stash = Stash::new();
    let bag = stash.register("bag", 6, 5, SlotFilter::Any);
    let mut events = Vec::new();
    let shapes = [(1, 1), (2, 1), (1, 3), (2, 2), (3, 1), (1, 2), (2, 3), (1, 1)];
    let loot: Vec<PlacedItem> = shapes
        .iter()
        .enumerate()
        .map(|(index, (width, height))| {
            stash.create_item(&spec(&format!("shape-{index}"), *width, *height), 1)
        })
        .collect();

    let unplaced = stash
        .pick_up_loot(bag, loot, &mut events)
        .expect("bag registered");
    assert!(stash.verify_occupancy());

    let container = stash.container_mut(bag).expect("bag registered");
    let ids: Vec<ItemId> = container.items().map(PlacedItem::id).collect();
    for (step, id) in ids.iter().enumerate() {
        match step % 3 {
            0 => {
                let _ = container
                    .remove_item(*id, RemovalReason::Destroy, &mut events)
                    .expect("item present");
            }
            1 => {
                let _ = container.move_item(*id, CellCoord::new(5, 4), &mut events);
            }
            _ => {
                let _ = container.lift(*id, &mut events).expect("item present");
                let record = container.item(*id).cloned().expect("item present");
                container.settle(record, &mut events).expect("own cells are free");
            }
        }
        assert!(container.verify_occupancy(), "desync after step {step}");
    }

    let retry = container.add_items(unplaced, &mut events);
    assert!(container.verify_occupancy());
    assert!(retry.len() <= shapes.len());
}
