#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Drag system that routes pointer input to containers and commits drops.
//!
//! The [`Router`] owns the single [`DragSession`]. Pointer moves evaluate the
//! held item against whichever active container lies under the pointer, and a
//! release dispatches on the cached [`ConflictKind`]: place, stack, swap, or
//! drop back to the origin. Orphaned items, which have no origin, stay on the
//! pointer instead of being dropped back.

pub mod session;

pub use session::{DragOrigin, DragSession, DragState};

use grid_stash_containers::{placement, ContainerError, Stash};
use grid_stash_core::{
    CellCoord, CellRect, ConflictKind, ContainerId, Event, Footprint, ItemId, PlacedItem,
    PlacementResult, RemovalReason, ScreenMapping, ScreenPoint, Telegraph,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a pick-up request is refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DragError {
    /// Another item is already attached to the pointer.
    #[error("a drag session is already active")]
    SessionActive,
    /// The pointer is not over any active container.
    #[error("pointer is not over an active container")]
    OffGrid,
    /// No settled item covers the requested cell.
    #[error("no item at {cell:?} in container {container:?}")]
    NothingAtCell {
        /// Container that was searched.
        container: ContainerId,
        /// Cell under the pointer.
        cell: CellCoord,
    },
    /// The container refused the lift.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// What a release or cancel did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// No item was held.
    NoSession,
    /// The item was placed in a free area.
    Placed {
        /// Container the item came from; `None` for orphans.
        from: Option<ContainerId>,
        /// Container now holding the item.
        container: ContainerId,
        /// Item that was placed.
        item: ItemId,
        /// Anchor cell of the placement.
        position: CellCoord,
    },
    /// Units of the held item merged into a stack.
    Stacked {
        /// Stack that received the units.
        target: ItemId,
        /// Units moved.
        moved: u32,
        /// Units left in the held item; zero means it was destroyed.
        remaining: u32,
    },
    /// The held item and the covered item traded places.
    Swapped {
        /// Item that was dropped.
        item: ItemId,
        /// Item that was displaced.
        displaced: ItemId,
    },
    /// The item returned to its origin.
    DroppedBack {
        /// Container the item returned to.
        container: ContainerId,
        /// Item that returned.
        item: ItemId,
    },
    /// The item had nowhere to go and stays attached to the pointer.
    Reattached {
        /// Item still held.
        item: ItemId,
    },
}

/// Finds the drop target under the pointer and evaluates the held item there.
///
/// Active containers are checked in registration order; the first whose
/// on-screen grid contains the pointer and whose evaluation is not
/// [`ConflictKind::OutOfBounds`] wins. With no winner the pointer is off-grid.
#[must_use]
pub fn resolve_hovered_container<M>(
    stash: &Stash,
    mapping: &M,
    pointer: ScreenPoint,
    dragged: &PlacedItem,
) -> PlacementResult
where
    M: ScreenMapping + ?Sized,
{
    let footprint = dragged.footprint();
    for container in stash.containers().filter(|container| container.is_active()) {
        let id = container.id();
        if !mapping.contains(id, pointer) {
            continue;
        }
        let Some(candidate) = mapping.candidate_origin(id, pointer, footprint) else {
            continue;
        };

        let result = placement::evaluate(container, candidate, footprint, dragged);
        if result.conflict == ConflictKind::OutOfBounds {
            continue;
        }

        return match mapping.cell_to_screen(id, candidate) {
            Some(point) => result.with_pixel_position(point),
            None => result,
        };
    }

    PlacementResult::off_grid()
}

/// Owner of the drag session and entry point for pointer input.
#[derive(Clone, Debug, Default)]
pub struct Router {
    session: Option<DragSession>,
}

impl Router {
    /// Creates an idle router.
    #[must_use]
    pub const fn new() -> Self {
        Self { session: None }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.session
            .as_ref()
            .map_or(DragState::Idle, DragSession::state)
    }

    /// Active session, if an item is held.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Whether an item is attached to the pointer.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Lifts the settled item covering `cell` and attaches it to the pointer.
    pub fn pick_up(
        &mut self,
        stash: &mut Stash,
        container: ContainerId,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<ItemId, DragError> {
        if self.session.is_some() {
            return Err(DragError::SessionActive);
        }

        let source = stash
            .container_mut(container)
            .ok_or(ContainerError::UnknownContainer(container))?;
        let item = source
            .item_at(cell)
            .map(PlacedItem::id)
            .ok_or(DragError::NothingAtCell { container, cell })?;
        let record = source.lift(item, out_events)?;

        debug!(?item, ?container, ?cell, "item picked up");
        self.session = Some(DragSession::picked_up(record, container));
        Ok(item)
    }

    /// Handles a pointer press at a screen position.
    pub fn pick_up_at<M>(
        &mut self,
        stash: &mut Stash,
        mapping: &M,
        pointer: ScreenPoint,
        out_events: &mut Vec<Event>,
    ) -> Result<ItemId, DragError>
    where
        M: ScreenMapping + ?Sized,
    {
        if self.session.is_some() {
            return Err(DragError::SessionActive);
        }

        let single_cell = Footprint::new(1, 1);
        let hit = stash
            .containers()
            .filter(|container| container.is_active())
            .filter(|container| mapping.contains(container.id(), pointer))
            .find_map(|container| {
                mapping
                    .candidate_origin(container.id(), pointer, single_cell)
                    .map(|cell| (container.id(), cell))
            });
        let (container, cell) = hit.ok_or(DragError::OffGrid)?;
        self.pick_up(stash, container, cell, out_events)
    }

    /// Attaches an item with no home to the pointer as an orphan.
    ///
    /// Returns the item unchanged when another item is already held.
    pub fn adopt(&mut self, item: PlacedItem) -> Result<ItemId, PlacedItem> {
        if self.session.is_some() {
            return Err(item);
        }

        let id = item.id();
        debug!(item = ?id, "orphan attached to pointer");
        self.session = Some(DragSession::orphan(item, None));
        Ok(id)
    }

    /// Turns the held item a quarter and re-evaluates at the last pointer position.
    ///
    /// Returns `false` when nothing is held or the footprint is square.
    pub fn rotate<M>(&mut self, stash: &Stash, mapping: &M) -> bool
    where
        M: ScreenMapping + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.rotate() {
            return false;
        }

        if let Some(pointer) = session.last_pointer() {
            let result = resolve_hovered_container(stash, mapping, pointer, session.item());
            session.record(pointer, result);
        }
        true
    }

    /// Re-evaluates the held item for a pointer move and caches the result.
    pub fn hover<M>(
        &mut self,
        stash: &Stash,
        mapping: &M,
        pointer: ScreenPoint,
    ) -> Option<PlacementResult>
    where
        M: ScreenMapping + ?Sized,
    {
        let session = self.session.as_mut()?;
        let result = resolve_hovered_container(stash, mapping, pointer, session.item());
        session.record(pointer, result);
        Some(result)
    }

    /// Preview of the cached evaluation; `None` while off-grid or idle.
    #[must_use]
    pub fn preview(&self) -> Option<Telegraph> {
        let session = self.session.as_ref()?;
        let result = session.last_result()?;
        let container = result.target_container?;
        Some(Telegraph {
            container,
            region: CellRect::new(result.suggested_position, session.item().footprint()),
            conflict: result.conflict,
            pixel_position: result.pixel_position,
        })
    }

    /// Commits the held item according to the cached evaluation.
    pub fn release(&mut self, stash: &mut Stash, out_events: &mut Vec<Event>) -> DragOutcome {
        let Some(mut session) = self.session.take() else {
            return DragOutcome::NoSession;
        };
        session.begin_resolving();

        let result = session.last_result().copied();
        let outcome = match result {
            Some(PlacementResult {
                conflict: ConflictKind::None,
                target_container: Some(target),
                suggested_position,
                ..
            }) => self.commit_place(session, target, suggested_position, stash, out_events),
            Some(PlacementResult {
                conflict: ConflictKind::StackEligible,
                target_container: Some(target),
                overlapping_item: Some(overlapping),
                ..
            }) => self.commit_stack(session, target, overlapping, stash, out_events),
            Some(PlacementResult {
                conflict: ConflictKind::SwapEligible,
                target_container: Some(target),
                overlapping_item: Some(overlapping),
                suggested_position,
                ..
            }) => self.commit_swap(
                session,
                target,
                overlapping,
                suggested_position,
                stash,
                out_events,
            ),
            _ => self.drop_back(session, stash, out_events),
        };

        debug!(?outcome, state = ?self.state(), "drag resolved");
        outcome
    }

    /// Aborts the drag through drop-back.
    pub fn cancel(&mut self, stash: &mut Stash, out_events: &mut Vec<Event>) -> DragOutcome {
        let Some(mut session) = self.session.take() else {
            return DragOutcome::NoSession;
        };
        session.begin_resolving();
        self.drop_back(session, stash, out_events)
    }

    fn commit_place(
        &mut self,
        session: DragSession,
        target: ContainerId,
        position: CellCoord,
        stash: &mut Stash,
        out_events: &mut Vec<Event>,
    ) -> DragOutcome {
        let item = session.item().id();
        let footprint = session.item().footprint();
        let still_free = stash.container(target).is_some_and(|container| {
            container.is_area_free(position, footprint) && container.accepts(session.item())
        });
        if !still_free {
            warn!(?item, ?target, ?position, "cached placement went stale; dropping back");
            return self.drop_back(session, stash, out_events);
        }

        let mut record = session.item().clone();
        record.set_position(position);
        let from = session.origin().map(|origin| origin.container);

        if from == Some(target) {
            let settled = stash
                .container_mut(target)
                .ok_or(ContainerError::UnknownContainer(target))
                .and_then(|container| container.settle(record, out_events));
            return match settled {
                Ok(()) => DragOutcome::Placed {
                    from,
                    container: target,
                    item,
                    position,
                },
                Err(error) => {
                    warn!(%error, "self-drop failed; dropping back");
                    self.drop_back(session, stash, out_events)
                }
            };
        }

        if let Some(source) = from {
            if let Err(error) =
                remove_from(stash, source, item, RemovalReason::Transfer, out_events)
            {
                warn!(%error, "source lost track of the dragged item");
            }
        }

        let added = stash
            .container_mut(target)
            .ok_or(ContainerError::UnknownContainer(target))
            .and_then(|container| container.add_item(record, out_events));
        match added {
            Ok(_) => DragOutcome::Placed {
                from,
                container: target,
                item,
                position,
            },
            Err(error) => {
                warn!(%error, "transfer failed; item stays on the pointer");
                self.reattach(session.into_orphan())
            }
        }
    }

    fn commit_stack(
        &mut self,
        mut session: DragSession,
        target: ContainerId,
        overlapping: ItemId,
        stash: &mut Stash,
        out_events: &mut Vec<Event>,
    ) -> DragOutcome {
        let mut incoming = session.item().clone();
        let merged = stash
            .container_mut(target)
            .ok_or(ContainerError::UnknownContainer(target))
            .and_then(|container| container.add_to_stack(overlapping, &mut incoming, out_events));
        let moved = match merged {
            Ok(moved) if moved > 0 => moved,
            Ok(_) => return self.drop_back(session, stash, out_events),
            Err(error) => {
                warn!(%error, "stack target vanished; dropping back");
                return self.drop_back(session, stash, out_events);
            }
        };

        let remaining = incoming.stack_count();
        session.set_stack_count(remaining);
        let outcome = DragOutcome::Stacked {
            target: overlapping,
            moved,
            remaining,
        };

        if remaining > 0 {
            let _ = self.drop_back(session, stash, out_events);
            return outcome;
        }

        let item = session.item().id();
        match (session.origin(), session.last_container()) {
            (Some(origin), _) => {
                if let Err(error) =
                    remove_from(stash, origin.container, item, RemovalReason::Destroy, out_events)
                {
                    warn!(%error, "emptied stack was already gone");
                }
            }
            (None, Some(container)) => {
                debug!(?item, ?container, "emptied orphan destroyed");
                out_events.push(Event::ItemRemoved {
                    container,
                    item,
                    reason: RemovalReason::Destroy,
                });
            }
            (None, None) => debug!(?item, "emptied orphan was never shown"),
        }
        outcome
    }

    fn commit_swap(
        &mut self,
        session: DragSession,
        target: ContainerId,
        displaced_id: ItemId,
        position: CellCoord,
        stash: &mut Stash,
        out_events: &mut Vec<Event>,
    ) -> DragOutcome {
        let item = session.item().id();
        let origin = session.origin().copied();

        let displaced = match remove_from(
            stash,
            target,
            displaced_id,
            RemovalReason::Transfer,
            out_events,
        ) {
            Ok(displaced) => displaced,
            Err(error) => {
                warn!(%error, "swap partner vanished; dropping back");
                return self.drop_back(session, stash, out_events);
            }
        };

        if let Some(origin) = origin {
            if let Err(error) =
                remove_from(stash, origin.container, item, RemovalReason::Transfer, out_events)
            {
                warn!(%error, "source lost track of the dragged item");
                restore(stash, target, displaced, out_events);
                return self.drop_back(session, stash, out_events);
            }
        }

        let mut dropped = session.item().clone();
        dropped.set_position(position);
        let placed = stash
            .container_mut(target)
            .ok_or(ContainerError::UnknownContainer(target))
            .and_then(|container| container.add_item(dropped, out_events));
        if let Err(error) = placed {
            debug!(%error, "dragged item does not fit the swap slot; rolling back");
            return self.roll_back_swap(session, target, displaced, stash, out_events);
        }

        let Some(origin) = origin else {
            debug!(
                ?item,
                displaced = ?displaced_id,
                "orphan swapped in; displaced item is now held"
            );
            self.session = Some(DragSession::orphan(displaced, Some(target)));
            return DragOutcome::Swapped {
                item,
                displaced: displaced_id,
            };
        };

        let mut homed = displaced.clone();
        homed.set_position(origin.position);
        let rehomed = stash
            .container_mut(origin.container)
            .ok_or(ContainerError::UnknownContainer(origin.container))
            .and_then(|container| container.add_item(homed, out_events));
        if let Err(error) = rehomed {
            debug!(%error, "displaced item does not fit the origin; rolling back");
            if let Err(error) =
                remove_from(stash, target, item, RemovalReason::Transfer, out_events)
            {
                panic!("swap rollback lost the dragged item: {error}");
            }
            return self.roll_back_swap(session, target, displaced, stash, out_events);
        }

        DragOutcome::Swapped {
            item,
            displaced: displaced_id,
        }
    }

    /// Undoes both swap removals: the displaced item returns to its cells and
    /// the dragged item is re-added at its origin.
    fn roll_back_swap(
        &mut self,
        session: DragSession,
        target: ContainerId,
        displaced: PlacedItem,
        stash: &mut Stash,
        out_events: &mut Vec<Event>,
    ) -> DragOutcome {
        restore(stash, target, displaced, out_events);

        let item = session.item().id();
        let (Some(origin), Some(record)) = (session.origin().copied(), session.origin_record())
        else {
            return self.reattach(session);
        };

        let readded = stash
            .container_mut(origin.container)
            .ok_or(ContainerError::UnknownContainer(origin.container))
            .and_then(|container| container.add_item(record, out_events));
        match readded {
            Ok(_) => DragOutcome::DroppedBack {
                container: origin.container,
                item,
            },
            Err(error) => {
                warn!(%error, "origin no longer free after rollback; item stays on the pointer");
                self.reattach(session.into_orphan())
            }
        }
    }

    fn drop_back(
        &mut self,
        session: DragSession,
        stash: &mut Stash,
        out_events: &mut Vec<Event>,
    ) -> DragOutcome {
        let item = session.item().id();
        let (Some(origin), Some(record)) = (session.origin().copied(), session.origin_record())
        else {
            return self.reattach(session);
        };

        let settled = stash
            .container_mut(origin.container)
            .ok_or(ContainerError::UnknownContainer(origin.container))
            .and_then(|container| container.settle(record, out_events));
        match settled {
            Ok(()) => DragOutcome::DroppedBack {
                container: origin.container,
                item,
            },
            Err(error) => {
                warn!(%error, "origin no longer free; item stays on the pointer");
                let _ = remove_from(
                    stash,
                    origin.container,
                    item,
                    RemovalReason::Transfer,
                    out_events,
                );
                self.reattach(session.into_orphan())
            }
        }
    }

    fn reattach(&mut self, session: DragSession) -> DragOutcome {
        let session = session.reattached();
        let item = session.item().id();
        self.session = Some(session);
        DragOutcome::Reattached { item }
    }
}

fn remove_from(
    stash: &mut Stash,
    container: ContainerId,
    item: ItemId,
    reason: RemovalReason,
    out_events: &mut Vec<Event>,
) -> Result<PlacedItem, ContainerError> {
    stash
        .container_mut(container)
        .ok_or(ContainerError::UnknownContainer(container))?
        .remove_item(item, reason, out_events)
}

fn restore(
    stash: &mut Stash,
    container: ContainerId,
    item: PlacedItem,
    out_events: &mut Vec<Event>,
) {
    let restored = stash
        .container_mut(container)
        .ok_or(ContainerError::UnknownContainer(container))
        .and_then(|target| target.add_item(item, out_events));
    if let Err(error) = restored {
        panic!("swap rollback could not restore the displaced item: {error}");
    }
}
