//! Recipe matcher backed by the `[[recipes]]` configuration tables.

use grid_stash_containers::{CraftOutput, RecipeMatcher};
use grid_stash_core::{ItemId, ItemSpec, PlacedItem};
use tracing::debug;

use crate::config::StashConfig;

#[derive(Clone, Debug, PartialEq)]
struct Recipe {
    name: String,
    inputs: Vec<(String, u32)>,
    output: (ItemSpec, u32),
}

/// Matches bench contents against configured recipes in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ConfiguredRecipes {
    recipes: Vec<Recipe>,
}

impl ConfiguredRecipes {
    pub(crate) fn from_config(config: &StashConfig) -> Self {
        let recipes = config
            .recipes
            .iter()
            .filter_map(|recipe| {
                let output = config.item(&recipe.output.item)?.clone();
                Some(Recipe {
                    name: recipe.name.clone(),
                    inputs: recipe
                        .inputs
                        .iter()
                        .map(|input| (input.item.clone(), input.count))
                        .collect(),
                    output: (output, recipe.output.count),
                })
            })
            .collect();
        Self { recipes }
    }
}

impl RecipeMatcher for ConfiguredRecipes {
    fn match_recipe(&self, ingredients: &[PlacedItem]) -> Option<CraftOutput> {
        self.recipes.iter().find_map(|recipe| {
            let consumed = gather(recipe, ingredients)?;
            debug!(recipe = %recipe.name, "bench contents match recipe");
            Some(CraftOutput {
                consumed,
                produced: vec![recipe.output.clone()],
            })
        })
    }
}

/// Takes units from bench items, in bench order, until every input is
/// covered. The last item drawn for an input only gives up what is missing.
fn gather(recipe: &Recipe, ingredients: &[PlacedItem]) -> Option<Vec<(ItemId, u32)>> {
    let mut consumed = Vec::new();
    for (type_key, needed) in &recipe.inputs {
        let mut missing = *needed;
        for item in ingredients.iter().filter(|item| item.type_key() == type_key) {
            if missing == 0 {
                break;
            }
            let taken = item.stack_count().min(missing);
            if taken == 0 {
                continue;
            }
            missing -= taken;
            consumed.push((item.id(), taken));
        }
        if missing > 0 {
            return None;
        }
    }
    Some(consumed)
}
