//! Events emitted by the simulation for notification and effect feedback.
//!
//! Collected during a tick and drained into the next snapshot.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EnemyId, TowerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted {
        wave: u32,
        enemies: u32,
    },
    /// `wave` is the number of the wave that was just cleared.
    WaveCompleted {
        wave: u32,
        bonus: u32,
    },
    EnemySpawned {
        enemy: EnemyId,
        kind: EnemyKind,
    },
    TowerFired {
        tower: TowerId,
        target: EnemyId,
    },
    EnemyHit {
        enemy: EnemyId,
        damage: u32,
    },
    ChainHit {
        from: EnemyId,
        to: EnemyId,
        damage: u32,
    },
    EnemySlowed {
        enemy: EnemyId,
        multiplier: f64,
    },
    /// An enemy was removed as a kill. `credited` is the tower whose target
    /// still pointed at it, if any.
    EnemyKilled {
        enemy: EnemyId,
        reward: u32,
        credited: Option<TowerId>,
    },
    /// An enemy walked off the end of the path.
    EnemyLeaked {
        enemy: EnemyId,
        lives_remaining: u32,
    },
    TowerPlaced {
        tower: TowerId,
        kind: TowerKind,
    },
    TowerUpgraded {
        tower: TowerId,
        level: u32,
    },
    TowerSold {
        tower: TowerId,
        refund: u32,
    },
    Paused,
    Resumed,
    SpeedChanged {
        multiplier: u8,
    },
    Victory {
        score: u64,
    },
    Defeat {
        score: u64,
    },
}
