//! Player commands and command receipts.
//!
//! Simulation-control commands are queued and processed at the next tick
//! boundary. Economy commands (place/upgrade/sell) are answered immediately
//! by the engine with one of the receipts below or a
//! [`crate::error::CommandError`].

use serde::{Deserialize, Serialize};

use crate::enums::TowerKind;
use crate::types::{Position, TowerId};

/// Queued simulation-control actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Leave `Setup` and start the countdown to the first wave.
    StartGame,
    /// Call the next wave now instead of waiting for the countdown.
    StartNextWave,
    Pause,
    Resume,
    TogglePause,
    /// Select the game speed (clamped to `1..=MAX_SPEED_MULTIPLIER`).
    SetSpeed {
        multiplier: u8,
    },
}

/// A tower was built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerPlaced {
    pub tower: TowerId,
    pub kind: TowerKind,
    /// Cell centre the tower snapped to.
    pub position: Position,
    pub cost: u32,
    pub gold_remaining: u32,
}

/// A tower was upgraded in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerUpgraded {
    pub tower: TowerId,
    pub level: u32,
    pub cost: u32,
    pub gold_remaining: u32,
}

/// A tower was sold and its cell freed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerSold {
    pub tower: TowerId,
    pub refund: u32,
    pub gold_remaining: u32,
}
