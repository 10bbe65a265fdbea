//! Live session assembled from the configuration.

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use grid_stash_containers::{Container, CraftReport, CraftStation, Stash};
use grid_stash_core::{CellCoord, ContainerId, Event, ScreenPoint};
use grid_stash_rendering::{GridLayout, ScreenLayout, TelegraphPresentation, VisualRegistry};
use grid_stash_system_drag::{DragOutcome, Router};
use tracing::{info, warn};

use crate::{
    ascii,
    config::StashConfig,
    layout_transfer::{LayoutTransferError, StashLayoutSnapshot},
    recipes::ConfiguredRecipes,
    script::DragStep,
};

/// Containers, screen geometry, visuals and the drag router of one session.
pub(crate) struct Workspace {
    stash: Stash,
    screen: ScreenLayout,
    visuals: VisualRegistry,
    router: Router,
    station: Option<CraftStation>,
    events: Vec<Event>,
}

impl Workspace {
    /// Registers every configured container and places it on screen.
    pub(crate) fn from_config(config: &StashConfig) -> Result<Self> {
        let mut stash = Stash::new();
        let mut screen = ScreenLayout::new();

        for declared in &config.containers {
            let id = stash.register(
                declared.label.clone(),
                declared.columns,
                declared.rows,
                declared.filter(),
            );
            if let Some(container) = stash.container_mut(id) {
                container.set_active(declared.active);
            }
            let layout = GridLayout::new(
                Vec2::from(declared.origin),
                config.cell_size,
                declared.columns,
                declared.rows,
            )
            .with_context(|| format!("invalid layout for container `{}`", declared.label))?;
            let _ = screen.insert(id, layout);
        }

        let station = config
            .bench
            .as_deref()
            .and_then(|label| stash.container_by_label(label))
            .map(|bench| {
                let mut station = CraftStation::new(bench.id());
                if !config.recipes.is_empty() {
                    station.set_matcher(Box::new(ConfiguredRecipes::from_config(config)));
                }
                station
            });

        Ok(Self {
            stash,
            screen,
            visuals: VisualRegistry::new(),
            router: Router::new(),
            station,
            events: Vec::new(),
        })
    }

    /// Packs the configured starting loot.
    ///
    /// The first item that fits nowhere is attached to the pointer; the rest
    /// are reported and discarded. Returns the number of unplaced items.
    pub(crate) fn pack_loot(&mut self, config: &StashConfig) -> Result<usize> {
        let mut leftovers = Vec::new();
        for entry in &config.loot {
            let spec = config
                .item(&entry.item)
                .ok_or_else(|| anyhow!("unknown item `{}`", entry.item))?;
            let container = self
                .container_id(&entry.container)
                .ok_or_else(|| anyhow!("unknown container `{}`", entry.container))?;
            let loot = vec![self.stash.create_item(spec, entry.count)];
            let unplaced = self
                .stash
                .pick_up_loot(container, loot, &mut self.events)
                .with_context(|| format!("failed to pack loot into `{}`", entry.container))?;
            leftovers.extend(unplaced);
        }
        self.flush();

        let unplaced = leftovers.len();
        let mut leftovers = leftovers.into_iter();
        if let Some(first) = leftovers.next() {
            if let Ok(item) = self.router.adopt(first) {
                info!(?item, "unplaced loot attached to the pointer");
            }
        }
        for dropped in leftovers {
            warn!(item = ?dropped.id(), kind = dropped.type_key(), "unplaced loot discarded");
        }
        Ok(unplaced)
    }

    /// Applies one pointer step and describes what happened.
    pub(crate) fn apply(&mut self, step: &DragStep) -> Result<String> {
        let summary = match step {
            DragStep::Pick {
                container,
                column,
                row,
            } => {
                let id = self
                    .container_id(container)
                    .ok_or_else(|| anyhow!("unknown container `{container}`"))?;
                match self.router.pick_up(
                    &mut self.stash,
                    id,
                    CellCoord::new(*column, *row),
                    &mut self.events,
                ) {
                    Ok(item) => format!("picked up {item:?}"),
                    Err(error) => format!("pick-up refused: {error}"),
                }
            }
            DragStep::Grab { x, y } => {
                match self.router.pick_up_at(
                    &mut self.stash,
                    &self.screen,
                    ScreenPoint::new(*x, *y),
                    &mut self.events,
                ) {
                    Ok(item) => format!("picked up {item:?}"),
                    Err(error) => format!("pick-up refused: {error}"),
                }
            }
            DragStep::Hover { x, y } => {
                let _ = self
                    .router
                    .hover(&self.stash, &self.screen, ScreenPoint::new(*x, *y));
                self.describe_preview()
            }
            DragStep::Rotate => {
                if self.router.rotate(&self.stash, &self.screen) {
                    format!("rotated; {}", self.describe_preview())
                } else {
                    "nothing to rotate".to_owned()
                }
            }
            DragStep::Release => {
                describe_outcome(self.router.release(&mut self.stash, &mut self.events))
            }
            DragStep::Cancel => {
                describe_outcome(self.router.cancel(&mut self.stash, &mut self.events))
            }
        };
        self.flush();
        Ok(summary)
    }

    /// Runs the bench's craft action.
    pub(crate) fn craft(&mut self) -> Result<CraftReport> {
        let station = self
            .station
            .as_mut()
            .ok_or_else(|| anyhow!("no bench container configured"))?;
        let report = station
            .craft(&mut self.stash, &mut self.events)
            .context("craft failed")?;
        self.flush();
        Ok(report)
    }

    /// Replays an encoded layout into the registered containers.
    pub(crate) fn import(&mut self, layout: &str) -> Result<usize, LayoutTransferError> {
        let restored =
            StashLayoutSnapshot::decode(layout)?.restore(&mut self.stash, &mut self.events);
        self.flush();
        restored
    }

    /// Encodes the current layout for transfer.
    pub(crate) fn export(&self) -> String {
        StashLayoutSnapshot::capture(&self.stash).encode()
    }

    /// Text rendering of every container, plus the item held by the pointer.
    pub(crate) fn render(&self) -> String {
        let mut out: String = self
            .stash
            .containers()
            .map(|container| ascii::render_container(container, &self.visuals))
            .collect::<Vec<_>>()
            .join("\n");
        if let Some(session) = self.router.session() {
            out.push_str(&format!(
                "\nheld: {} x{} ({:?}){}\n",
                session.item().type_key(),
                session.item().stack_count(),
                self.router.state(),
                if session.is_orphaned() { " [orphaned]" } else { "" },
            ));
        }
        out
    }

    /// Whether every container's grid agrees with its items.
    pub(crate) fn is_consistent(&self) -> bool {
        self.stash.verify_occupancy()
    }

    fn container_id(&self, label: &str) -> Option<ContainerId> {
        self.stash.container_by_label(label).map(Container::id)
    }

    fn describe_preview(&self) -> String {
        let Some(telegraph) = self.router.preview() else {
            return "off-grid".to_owned();
        };
        let label = self
            .stash
            .container(telegraph.container)
            .map_or("?", Container::label);
        let origin = telegraph.region.origin();
        match TelegraphPresentation::from_telegraph(&telegraph, &self.screen) {
            Some(presentation) => format!(
                "{:?} over {label} at ({}, {}), preview {}x{} px at ({}, {})",
                telegraph.conflict,
                origin.column(),
                origin.row(),
                presentation.size.x,
                presentation.size.y,
                presentation.origin.x,
                presentation.origin.y,
            ),
            None => format!("{:?} over {label}", telegraph.conflict),
        }
    }

    fn flush(&mut self) {
        self.visuals.apply(&self.events);
        self.events.clear();
    }
}

fn describe_outcome(outcome: DragOutcome) -> String {
    match outcome {
        DragOutcome::NoSession => "nothing held".to_owned(),
        DragOutcome::Placed {
            from,
            container,
            item,
            position,
        } => format!(
            "placed {item:?} in {container:?} at ({}, {}) from {from:?}",
            position.column(),
            position.row()
        ),
        DragOutcome::Stacked {
            target,
            moved,
            remaining,
        } => format!("moved {moved} onto {target:?}, {remaining} left"),
        DragOutcome::Swapped { item, displaced } => format!("swapped {item:?} with {displaced:?}"),
        DragOutcome::DroppedBack { container, item } => {
            format!("{item:?} dropped back into {container:?}")
        }
        DragOutcome::Reattached { item } => format!("{item:?} stays on the pointer"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::DEMO_SCRIPT;

    fn packed() -> (StashConfig, Workspace) {
        let config = StashConfig::load(None).expect("default config parses");
        let mut workspace = Workspace::from_config(&config).expect("default layout is valid");
        let unplaced = workspace.pack_loot(&config).expect("loot packs");
        assert_eq!(unplaced, 0);
        (config, workspace)
    }

    #[test]
    fn demo_script_keeps_containers_consistent() {
        let (_, mut workspace) = packed();

        for step in DEMO_SCRIPT {
            let step: DragStep = step.parse().expect("demo step parses");
            let _ = workspace.apply(&step).expect("demo step applies");
            assert!(workspace.is_consistent(), "desync after {step}");
        }

        let hands = workspace.stash.container_by_label("hands").expect("hands");
        assert_eq!(hands.items().map(|item| item.type_key()).collect::<Vec<_>>(), vec!["sword"]);
        let chest = workspace.stash.container_by_label("chest").expect("chest");
        assert_eq!(chest.items().map(|item| item.type_key()).collect::<Vec<_>>(), vec!["rope"]);
        assert!(!workspace.router.is_dragging());
    }

    #[test]
    fn craft_turns_planks_into_a_table() {
        let (_, mut workspace) = packed();

        let report = workspace.craft().expect("bench configured");

        assert!(report.crafted);
        assert_eq!(report.produced.len(), 1);
        let bench = workspace.stash.container_by_label("bench").expect("bench");
        assert_eq!(bench.items().map(|item| item.type_key()).collect::<Vec<_>>(), vec!["table"]);
        assert!(workspace.is_consistent());
    }

    #[test]
    fn exported_layout_imports_into_a_fresh_workspace() {
        let (config, workspace) = packed();
        let layout = workspace.export();

        let mut fresh = Workspace::from_config(&config).expect("default layout is valid");
        let restored = fresh.import(&layout).expect("layout replays");

        assert_eq!(restored, 7);
        assert_eq!(fresh.export(), layout);
        assert_eq!(fresh.render(), workspace.render());
    }

    #[test]
    fn grab_on_the_grid_corner_picks_the_corner_item() {
        let (_, mut workspace) = packed();
        let corner = workspace
            .stash
            .container_by_label("backpack")
            .and_then(|backpack| backpack.item_at(CellCoord::new(0, 0)))
            .map(|item| item.id())
            .expect("backpack corner is filled");

        let summary = workspace
            .apply(&DragStep::Grab { x: 0.0, y: 0.0 })
            .expect("grab applies");

        assert_eq!(summary, format!("picked up {corner:?}"));
        assert!(workspace.router.is_dragging());
    }
}
