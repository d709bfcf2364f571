//! Game state snapshot: the complete visible state handed to rendering and
//! UI collaborators after each tick. Read-only by construction.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EnemyId, Position, SimTime, TowerId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub speed: u8,
    pub stats: StatsView,
    pub wave: WaveView,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
    pub gold: u32,
    pub lives: u32,
    pub score: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveView {
    /// Current wave number (1-based).
    pub number: u32,
    pub max_waves: u32,
    pub phase: WavePhase,
    /// True while Spawning or Draining.
    pub active: bool,
    pub spawned: u32,
    pub size: u32,
    /// Seconds until the next wave starts (meaningful while Idle).
    pub countdown_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: u32,
    pub max_health: u32,
    pub path_index: usize,
    /// Product of active slow multipliers (1.0 when unaffected).
    pub speed_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub id: TowerId,
    pub kind: TowerKind,
    pub position: Position,
    pub level: u32,
    pub damage: f64,
    pub range: f64,
    pub fire_rate: f64,
    pub kills: u32,
    pub sell_value: u32,
    pub upgrade_cost: u32,
    pub target: Option<EnemyId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    /// Where the shot was fired from.
    pub origin: Position,
    pub kind: TowerKind,
    pub target: Option<EnemyId>,
}
