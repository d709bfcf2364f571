//! Fundamental geometric, timing and handle types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position on the play field (pixels). x = right, y = down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<Position> for DVec2 {
    fn from(p: Position) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Position::new(v.x, v.y)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks that actually advanced the simulation.
    pub tick: u64,
    /// Elapsed simulation time in seconds (already scaled by game speed).
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` simulated seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }

    /// Elapsed simulation time in milliseconds. Tower cooldowns are expressed
    /// against this clock.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_secs * 1000.0
    }
}

/// Opaque handle to a live enemy.
///
/// Holds the generational bits of the underlying ECS entity, so a handle to a
/// removed enemy never resolves to a newer one that reused its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u64);

/// Opaque handle to a placed tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(pub u64);
