#![allow(clippy::missing_errors_doc)]

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use grid_stash_containers::{Container, ContainerError, Stash};
use grid_stash_core::{Event, PlacedItem};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "stash";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "stash:v1";
/// Delimiter used to separate the prefix, item count and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of the placed items of every container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StashLayoutSnapshot {
    /// Containers in registration order.
    pub(crate) containers: Vec<ContainerLayout>,
}

/// Placed items of a single container, keyed by its label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ContainerLayout {
    pub(crate) label: String,
    pub(crate) items: Vec<PlacedItem>,
}

impl StashLayoutSnapshot {
    /// Captures every item, including lifted ones at their origin.
    #[must_use]
    pub(crate) fn capture(stash: &Stash) -> Self {
        let containers = stash
            .containers()
            .map(|container| ContainerLayout {
                label: container.label().to_owned(),
                items: container.items().cloned().collect(),
            })
            .collect();
        Self { containers }
    }

    /// Number of items across all containers.
    #[must_use]
    pub(crate) fn item_count(&self) -> usize {
        self.containers
            .iter()
            .map(|container| container.items.len())
            .sum()
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let json = serde_json::to_vec(&self.containers)
            .expect("layout snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}:{encoded}", self.item_count())
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let count = parts.next().ok_or(LayoutTransferError::MissingCount)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let declared = count
            .trim()
            .parse::<usize>()
            .map_err(|_| LayoutTransferError::InvalidCount(count.to_owned()))?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let containers: Vec<ContainerLayout> =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        let snapshot = Self { containers };
        let actual = snapshot.item_count();
        if actual != declared {
            return Err(LayoutTransferError::CountMismatch { declared, actual });
        }
        Ok(snapshot)
    }

    /// Replays every item into the container with the matching label.
    ///
    /// Occupancy is re-derived by adding each item at its recorded position.
    /// Returns the number of items restored.
    pub(crate) fn restore(
        &self,
        stash: &mut Stash,
        out_events: &mut Vec<Event>,
    ) -> Result<usize, LayoutTransferError> {
        let mut restored = 0;
        for layout in &self.containers {
            let container = stash
                .container_by_label(&layout.label)
                .map(Container::id)
                .ok_or_else(|| LayoutTransferError::UnknownContainer(layout.label.clone()))?;
            for item in &layout.items {
                let _ = stash.restore_item(container, item.clone(), out_events)?;
                restored += 1;
            }
        }
        Ok(restored)
    }
}

/// Errors that can occur while decoding or replaying layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("clipboard payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include the item count.
    #[error("layout string is missing the item count")]
    MissingCount,
    /// The encoded snapshot did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The item count could not be parsed.
    #[error("could not parse item count '{0}'")]
    InvalidCount(String),
    /// The payload holds a different number of items than announced.
    #[error("layout announces {declared} items but carries {actual}")]
    CountMismatch {
        /// Count written in the header.
        declared: usize,
        /// Count found in the payload.
        actual: usize,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The layout names a container that is not registered.
    #[error("layout references unknown container '{0}'")]
    UnknownContainer(String),
    /// A container refused one of the recorded items.
    #[error("could not restore layout: {0}")]
    Restore(#[from] ContainerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_stash_core::{CellCoord, Footprint, ItemCategory, ItemSpec, SlotFilter};

    fn stash_with_bag() -> Stash {
        let mut stash = Stash::new();
        let _ = stash.register("bag", 4, 3, SlotFilter::Any);
        let _ = stash.register("chest", 6, 4, SlotFilter::Any);
        stash
    }

    fn potion() -> ItemSpec {
        ItemSpec {
            type_key: "potion".to_owned(),
            category: ItemCategory::Consumable,
            footprint: Footprint::new(1, 1),
            stackable: true,
            max_stack: 10,
        }
    }

    fn plank() -> ItemSpec {
        ItemSpec {
            type_key: "plank".to_owned(),
            category: ItemCategory::Material,
            footprint: Footprint::new(2, 1),
            stackable: false,
            max_stack: 1,
        }
    }

    #[test]
    fn restore_rebuilds_placed_items_and_occupancy() {
        let mut source = stash_with_bag();
        let mut events = Vec::new();
        let chest = source.container_by_label("chest").map(Container::id).expect("chest");
        let bag = source.container_by_label("bag").map(Container::id).expect("bag");
        let loot = vec![source.create_item(&potion(), 7), source.create_item(&plank(), 1)];
        let _ = source.pick_up_loot(chest, loot, &mut events).expect("chest registered");
        let mut staff = source.create_item(&plank(), 1);
        assert!(staff.rotate());
        staff.set_position(CellCoord::new(3, 0));
        let _ = source.restore_item(bag, staff, &mut events).expect("staff fits");

        let encoded = StashLayoutSnapshot::capture(&source).encode();
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:3:")));

        let mut target = stash_with_bag();
        let restored = StashLayoutSnapshot::decode(&encoded)
            .expect("snapshot decodes")
            .restore(&mut target, &mut events)
            .expect("layout replays");

        assert_eq!(restored, 3);
        assert_eq!(
            StashLayoutSnapshot::capture(&target),
            StashLayoutSnapshot::capture(&source)
        );
        for (left, right) in source.containers().zip(target.containers()) {
            assert_eq!(left.grid(), right.grid());
        }
        assert!(target.verify_occupancy());
    }

    #[test]
    fn decode_rejects_foreign_prefix_and_count_mismatch() {
        let snapshot = StashLayoutSnapshot {
            containers: vec![ContainerLayout {
                label: "bag".to_owned(),
                items: Vec::new(),
            }],
        };
        let encoded = snapshot.encode();
        let payload = encoded.rsplit(FIELD_DELIMITER).next().expect("payload segment");

        assert!(matches!(
            StashLayoutSnapshot::decode(&format!("maze:v1:0:{payload}")),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "maze"
        ));
        assert!(matches!(
            StashLayoutSnapshot::decode(&format!("{SNAPSHOT_HEADER}:2:{payload}")),
            Err(LayoutTransferError::CountMismatch { declared: 2, actual: 0 })
        ));
        assert!(matches!(
            StashLayoutSnapshot::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn restore_reports_unknown_containers() {
        let snapshot = StashLayoutSnapshot {
            containers: vec![ContainerLayout {
                label: "vault".to_owned(),
                items: Vec::new(),
            }],
        };
        let mut stash = stash_with_bag();

        let error = snapshot
            .restore(&mut stash, &mut Vec::new())
            .expect_err("vault is not registered");
        assert!(matches!(error, LayoutTransferError::UnknownContainer(label) if label == "vault"));
    }

    fn encode_raw(items: serde_json::Value) -> String {
        let containers = serde_json::json!([{ "label": "bag", "items": items }]);
        let count = containers[0]["items"].as_array().map_or(0, Vec::len);
        let json = serde_json::to_vec(&containers).expect("serialize");
        format!("{SNAPSHOT_HEADER}:{count}:{}", STANDARD_NO_PAD.encode(json))
    }

    fn raw_item(width: u32, column: u32, stack_count: u32, max_stack: u32) -> serde_json::Value {
        serde_json::json!({
            "id": 5,
            "type_key": "potion",
            "category": "consumable",
            "position": { "column": column, "row": 0 },
            "footprint": { "width": width, "height": 1 },
            "rotation": "Deg0",
            "stack_count": stack_count,
            "stackable": true,
            "max_stack": max_stack,
        })
    }

    #[test]
    fn decode_rejects_zero_footprints() {
        let encoded = encode_raw(serde_json::json!([raw_item(0, 4, 1, 10)]));

        assert!(matches!(
            StashLayoutSnapshot::decode(&encoded),
            Err(LayoutTransferError::InvalidPayload(_))
        ));
    }

    #[test]
    fn restore_rejects_overfull_and_unbounded_stacks() {
        for (stack_count, max_stack) in [(99, 10), (1, 0)] {
            let encoded = encode_raw(serde_json::json!([raw_item(1, 0, stack_count, max_stack)]));
            let snapshot = StashLayoutSnapshot::decode(&encoded).expect("well-formed payload");
            let mut stash = stash_with_bag();

            let error = snapshot
                .restore(&mut stash, &mut Vec::new())
                .expect_err("stack limit enforced");

            assert!(
                matches!(
                    error,
                    LayoutTransferError::Restore(ContainerError::InvalidStack { .. })
                ),
                "unexpected error: {error}"
            );
            assert!(stash.containers().all(Container::is_empty));
            assert!(stash.verify_occupancy());
        }
    }
}
