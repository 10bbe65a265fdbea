use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{bail, Context, Result};
use grid_stash_core::{ItemCategory, ItemSpec, SlotFilter};
use serde::Deserialize;

/// Configuration used when no file is passed on the command line.
pub(crate) const DEFAULT_CONFIG: &str = r#"
cell_size = 32.0
bench = "bench"

[[containers]]
label = "backpack"
columns = 6
rows = 4
origin = [0.0, 0.0]

[[containers]]
label = "chest"
columns = 8
rows = 5
origin = [0.0, 160.0]

[[containers]]
label = "hands"
columns = 2
rows = 4
origin = [288.0, 0.0]
accepts = ["weapon", "tool"]

[[containers]]
label = "bench"
columns = 3
rows = 3
origin = [288.0, 160.0]

[[items]]
type_key = "sword"
category = "weapon"
footprint = { width = 1, height = 3 }

[[items]]
type_key = "shield"
category = "armor"
footprint = { width = 2, height = 2 }

[[items]]
type_key = "potion"
category = "consumable"
footprint = { width = 1, height = 1 }
stackable = true
max_stack = 10

[[items]]
type_key = "rope"
category = "tool"
footprint = { width = 1, height = 2 }

[[items]]
type_key = "plank"
category = "material"
footprint = { width = 2, height = 1 }

[[items]]
type_key = "table"
footprint = { width = 3, height = 2 }

[[loot]]
container = "backpack"
item = "sword"

[[loot]]
container = "backpack"
item = "shield"

[[loot]]
container = "backpack"
item = "potion"
count = 6

[[loot]]
container = "backpack"
item = "potion"
count = 7

[[loot]]
container = "backpack"
item = "rope"

[[loot]]
container = "bench"
item = "plank"

[[loot]]
container = "bench"
item = "plank"

[[recipes]]
name = "table"
inputs = [{ item = "plank", count = 2 }]
output = { item = "table" }
"#;

/// Containers, item definitions and starting loot for a session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StashConfig {
    /// Side length of a cell in pixels.
    #[serde(default = "default_cell_size")]
    pub(crate) cell_size: f32,
    /// Container acting as crafting bench.
    #[serde(default)]
    pub(crate) bench: Option<String>,
    /// Containers in registration order.
    pub(crate) containers: Vec<ContainerConfig>,
    /// Known item definitions.
    #[serde(default)]
    pub(crate) items: Vec<ItemSpec>,
    /// Items packed when the session starts.
    #[serde(default)]
    pub(crate) loot: Vec<LootConfig>,
    /// Recipes offered by the bench.
    #[serde(default)]
    pub(crate) recipes: Vec<RecipeConfig>,
}

/// Container declaration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ContainerConfig {
    pub(crate) label: String,
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    /// Screen position of the upper-left corner.
    pub(crate) origin: [f32; 2],
    /// Accepted categories; empty accepts everything.
    #[serde(default)]
    pub(crate) accepts: Vec<ItemCategory>,
    #[serde(default = "default_active")]
    pub(crate) active: bool,
}

impl ContainerConfig {
    pub(crate) fn filter(&self) -> SlotFilter {
        if self.accepts.is_empty() {
            SlotFilter::Any
        } else {
            SlotFilter::Categories(self.accepts.clone())
        }
    }
}

/// Starting loot entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LootConfig {
    pub(crate) container: String,
    pub(crate) item: String,
    #[serde(default = "default_count")]
    pub(crate) count: u32,
}

/// Item reference with a unit count.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Ingredient {
    pub(crate) item: String,
    #[serde(default = "default_count")]
    pub(crate) count: u32,
}

/// Recipe turning bench ingredients into a single output.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RecipeConfig {
    pub(crate) name: String,
    pub(crate) inputs: Vec<Ingredient>,
    pub(crate) output: Ingredient,
}

const fn default_cell_size() -> f32 {
    32.0
}

const fn default_active() -> bool {
    true
}

const fn default_count() -> u32 {
    1
}

impl StashConfig {
    /// Reads the configuration file, or the built-in default when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::from_toml_str(DEFAULT_CONFIG);
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read stash configuration at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid stash configuration at {}", path.display()))
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse stash configuration toml contents")?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn item(&self, type_key: &str) -> Option<&ItemSpec> {
        self.items.iter().find(|spec| spec.type_key == type_key)
    }

    fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            bail!("cell_size must be positive (received {})", self.cell_size);
        }
        if self.containers.is_empty() {
            bail!("configuration declares no containers");
        }

        let mut labels = BTreeSet::new();
        for container in &self.containers {
            if !labels.insert(container.label.as_str()) {
                bail!("duplicate container label `{}`", container.label);
            }
            if container.columns == 0 || container.rows == 0 {
                bail!(
                    "container `{}` must have at least one column and row",
                    container.label
                );
            }
        }

        let mut keys = BTreeSet::new();
        for spec in &self.items {
            if !keys.insert(spec.type_key.as_str()) {
                bail!("duplicate item definition `{}`", spec.type_key);
            }
            if spec.max_stack == 0 {
                bail!("item `{}` must stack to at least one unit", spec.type_key);
            }
        }

        for entry in &self.loot {
            if !labels.contains(entry.container.as_str()) {
                bail!("loot targets unknown container `{}`", entry.container);
            }
            if !keys.contains(entry.item.as_str()) {
                bail!("loot references unknown item `{}`", entry.item);
            }
        }

        for recipe in &self.recipes {
            let referenced = recipe.inputs.iter().chain(Some(&recipe.output));
            for ingredient in referenced {
                if !keys.contains(ingredient.item.as_str()) {
                    bail!(
                        "recipe `{}` references unknown item `{}`",
                        recipe.name,
                        ingredient.item
                    );
                }
            }
        }

        if let Some(bench) = &self.bench {
            if !labels.contains(bench.as_str()) {
                bail!("bench names unknown container `{bench}`");
            }
        }

        Ok(())
    }
}
