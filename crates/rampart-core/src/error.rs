//! Error types.
//!
//! Only user-facing commands and configuration loading can fail. The tick
//! loop itself never returns an error: a stale handle or an empty target
//! degrades to a no-op for that entity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::TowerKind;

/// Why a cell cannot take a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementBlock {
    OutOfBounds,
    Occupied,
    OnPath,
}

/// Failure outcome of a placement, upgrade or sale. State is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandError {
    #[error("insufficient funds: need {required} gold, have {available}")]
    InsufficientFunds {
        required: u32,
        available: u32,
    },

    #[error("invalid placement: {reason:?}")]
    InvalidPlacement {
        reason: PlacementBlock,
    },

    #[error("no tower at the selected location")]
    NoEntityAtLocation,

    #[error("tower kind {kind:?} is not in the catalog")]
    UnknownTowerKind {
        kind: TowerKind,
    },
}

/// Failure to load or validate a [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
