//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Tower type tag. Selects base stats from the tower catalog and the
/// secondary effect a projectile applies on hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    Kinetic,
    Plasma,
    Frost,
    Lightning,
    Nano,
    Fusion,
}

impl TowerKind {
    pub const ALL: [TowerKind; 6] = [
        TowerKind::Kinetic,
        TowerKind::Plasma,
        TowerKind::Frost,
        TowerKind::Lightning,
        TowerKind::Nano,
        TowerKind::Fusion,
    ];
}

/// Enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Scout,
    Warrior,
    Tank,
    Flyer,
    Boss,
}

/// Top-level match phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, waiting for `StartGame`. Towers may already be placed.
    #[default]
    Setup,
    Active,
    Paused,
    /// Every configured wave was cleared. Terminal.
    Won,
    /// Lives reached zero. Terminal.
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Wave controller phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Between waves; the countdown to the next wave is running.
    #[default]
    Idle,
    /// Wave active, enemies still being created.
    Spawning,
    /// Every enemy of the wave was created; waiting for the field to clear.
    Draining,
}
