//! Craft station that turns the contents of a bench container into outputs.
//!
//! Recipe matching belongs to an external collaborator plugged in through
//! [`RecipeMatcher`]. Without one, crafting reports the gap once and does nothing.

use grid_stash_core::{ContainerId, Event, ItemId, ItemSpec, PlacedItem, RemovalReason};
use tracing::{debug, error, warn};

use crate::{container::ContainerError, Stash};

/// Recipe resolved for the current bench contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CraftOutput {
    /// Bench items used by the recipe, each with the units it gives up.
    ///
    /// An item giving up its whole stack is destroyed; otherwise its stack
    /// shrinks by the listed units.
    pub consumed: Vec<(ItemId, u32)>,
    /// Item definitions produced, each with its stack count.
    pub produced: Vec<(ItemSpec, u32)>,
}

/// Collaborator that matches bench contents against known recipes.
pub trait RecipeMatcher {
    /// Returns the recipe matching the provided ingredients, if any.
    fn match_recipe(&self, ingredients: &[PlacedItem]) -> Option<CraftOutput>;
}

/// Summary of a craft attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CraftReport {
    /// Whether a recipe matched and its ingredients were consumed.
    pub crafted: bool,
    /// Items placed on the bench as recipe output.
    pub produced: Vec<ItemId>,
    /// Output items that did not fit on the bench.
    pub unplaced: Vec<PlacedItem>,
}

/// Commit logic behind a craft bench's craft button.
pub struct CraftStation {
    bench: ContainerId,
    matcher: Option<Box<dyn RecipeMatcher>>,
    reported_missing_matcher: bool,
}

impl std::fmt::Debug for CraftStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CraftStation")
            .field("bench", &self.bench)
            .field("has_matcher", &self.matcher.is_some())
            .finish()
    }
}

impl CraftStation {
    /// Creates a station for the bench container with no matcher registered.
    #[must_use]
    pub fn new(bench: ContainerId) -> Self {
        Self {
            bench,
            matcher: None,
            reported_missing_matcher: false,
        }
    }

    /// Registers the recipe matcher.
    pub fn set_matcher(&mut self, matcher: Box<dyn RecipeMatcher>) {
        self.matcher = Some(matcher);
    }

    /// Container used as the crafting bench.
    #[must_use]
    pub const fn bench(&self) -> ContainerId {
        self.bench
    }

    /// Consumes the matched ingredients and places the recipe output.
    ///
    /// Without a matcher the call is a no-op that logs an error the first
    /// time. Output that does not fit is returned in the report.
    pub fn craft(
        &mut self,
        stash: &mut Stash,
        out_events: &mut Vec<Event>,
    ) -> Result<CraftReport, ContainerError> {
        let Some(matcher) = self.matcher.as_ref() else {
            if !self.reported_missing_matcher {
                error!(bench = ?self.bench, "no recipe matcher registered; crafting disabled");
                self.reported_missing_matcher = true;
            }
            return Ok(CraftReport::default());
        };

        let bench = stash
            .container(self.bench)
            .ok_or(ContainerError::UnknownContainer(self.bench))?;
        let ingredients: Vec<PlacedItem> = bench.settled_items().cloned().collect();
        let Some(recipe) = matcher.match_recipe(&ingredients) else {
            debug!(bench = ?self.bench, "bench contents match no recipe");
            return Ok(CraftReport::default());
        };

        let mut spent = Vec::with_capacity(recipe.consumed.len());
        for (id, units) in &recipe.consumed {
            let Some(item) = ingredients.iter().find(|item| item.id() == *id) else {
                return Err(ContainerError::ItemMissing {
                    container: self.bench,
                    item: *id,
                });
            };
            spent.push((*id, item.stack_count().saturating_sub(*units)));
        }

        let outputs: Vec<PlacedItem> = recipe
            .produced
            .iter()
            .map(|(spec, count)| stash.create_item(spec, *count))
            .collect();
        let produced_ids: Vec<ItemId> = outputs.iter().map(PlacedItem::id).collect();

        let bench = stash
            .container_mut(self.bench)
            .ok_or(ContainerError::UnknownContainer(self.bench))?;
        for (id, left) in spent {
            if left == 0 {
                let _ = bench.remove_item(id, RemovalReason::Destroy, out_events)?;
            } else {
                bench.set_stack_count(id, left, out_events)?;
            }
        }
        let unplaced = bench.add_items(outputs, out_events);
        if !unplaced.is_empty() {
            warn!(
                bench = ?self.bench,
                count = unplaced.len(),
                "craft output does not fit on the bench"
            );
        }

        let produced = produced_ids
            .into_iter()
            .filter(|id| bench.item(*id).is_some())
            .collect();
        Ok(CraftReport {
            crafted: true,
            produced,
            unplaced,
        })
    }
}
