//! Pointer steps accepted by the `drag` subcommand.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Script used when `drag` is invoked without steps.
pub(crate) const DEMO_SCRIPT: &[&str] = &[
    "pick:backpack:0:0",
    "hover:304:48",
    "release",
    "grab:112:16",
    "hover:144:16",
    "release",
    "pick:backpack:5:0",
    "hover:48:192",
    "rotate",
    "release",
];

/// Single pointer action.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DragStep {
    /// Lift the item covering a cell of a labelled container.
    Pick {
        container: String,
        column: u32,
        row: u32,
    },
    /// Press the pointer at a screen position.
    Grab { x: f32, y: f32 },
    /// Move the pointer.
    Hover { x: f32, y: f32 },
    Rotate,
    Release,
    Cancel,
}

/// A step string did not follow any known form.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid drag step `{0}`; see `grid-stash drag --help` for the accepted forms")]
pub(crate) struct StepParseError(String);

impl FromStr for DragStep {
    type Err = StepParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || StepParseError(value.to_owned());
        let parts: Vec<&str> = value.trim().split(':').collect();
        match parts.as_slice() {
            ["pick", container, column, row] => Ok(Self::Pick {
                container: (*container).to_owned(),
                column: column.parse().map_err(|_| invalid())?,
                row: row.parse().map_err(|_| invalid())?,
            }),
            ["grab", x, y] => Ok(Self::Grab {
                x: x.parse().map_err(|_| invalid())?,
                y: y.parse().map_err(|_| invalid())?,
            }),
            ["hover", x, y] => Ok(Self::Hover {
                x: x.parse().map_err(|_| invalid())?,
                y: y.parse().map_err(|_| invalid())?,
            }),
            ["rotate"] => Ok(Self::Rotate),
            ["release"] => Ok(Self::Release),
            ["cancel"] => Ok(Self::Cancel),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for DragStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pick {
                container,
                column,
                row,
            } => write!(f, "pick {container} ({column}, {row})"),
            Self::Grab { x, y } => write!(f, "grab ({x}, {y})"),
            Self::Hover { x, y } => write!(f, "hover ({x}, {y})"),
            Self::Rotate => write!(f, "rotate"),
            Self::Release => write!(f, "release"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}
