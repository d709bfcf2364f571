//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EnemyId;

/// A mobile agent walking the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Index of the waypoint the enemy last reached; it travels toward
    /// `path_index + 1`. Also the targeting priority key.
    pub path_index: usize,
    pub health: u32,
    pub max_health: u32,
    /// Catalog speed before status effects (path units per 1/60 s).
    pub base_speed: f64,
    /// Gold granted when this enemy is removed as a kill.
    pub reward: u32,
    pub is_dead: bool,
    pub reached_end: bool,
}

/// A timed modifier attached to one enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatusEffect {
    /// Multiplies the enemy's speed while active.
    Slow {
        remaining_secs: f64,
        multiplier: f64,
    },
}

/// Active status effects of an enemy. Effects of the same kind coexist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}

/// A stationary tower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub kind: TowerKind,
    pub level: u32,
    /// Catalog cost at placement, the base for upgrade quotes.
    pub base_cost: u32,
    pub damage: f64,
    pub range: f64,
    /// Shots per second.
    pub fire_rate: f64,
    pub sell_value: u32,
    /// Simulation time of the last shot (ms). `None` until the first shot.
    pub last_shot_ms: Option<f64>,
    /// Current target. A relation only: the enemy may be removed at any time,
    /// so every use re-validates the handle.
    pub target: Option<EnemyId>,
    pub kills: u32,
}
