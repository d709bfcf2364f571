//! Pooled homing projectiles.
//!
//! A projectile is self-contained: it carries the damage and the firing
//! tower's kind, so its hit resolves the same way even if the tower was sold
//! while it was in flight.

use rampart_core::constants::PROJECTILE_SPEED;
use rampart_core::enums::TowerKind;
use rampart_core::types::{EnemyId, Position};

use crate::pool::Pooled;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub active: bool,
    pub position: Position,
    /// Firing tower's position.
    pub origin: Position,
    /// Weak reference; re-validated every tick.
    pub target: Option<EnemyId>,
    /// Travel speed (px/s).
    pub speed: f64,
    pub damage: u32,
    pub kind: TowerKind,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            active: false,
            position: Position::default(),
            origin: Position::default(),
            target: None,
            speed: PROJECTILE_SPEED,
            damage: 0,
            kind: TowerKind::Kinetic,
        }
    }
}

impl Projectile {
    pub fn launch(&mut self, origin: Position, target: EnemyId, damage: u32, kind: TowerKind) {
        self.active = true;
        self.position = origin;
        self.origin = origin;
        self.target = Some(target);
        self.speed = PROJECTILE_SPEED;
        self.damage = damage;
        self.kind = kind;
    }
}

impl Pooled for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.target = None;
    }
}
