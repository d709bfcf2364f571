//! Snapshot system: queries the ECS world and builds a complete
//! GameStateSnapshot.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use rampart_core::components::*;
use rampart_core::config::EconomyConfig;
use rampart_core::enums::GamePhase;
use rampart_core::events::GameEvent;
use rampart_core::state::*;
use rampart_core::types::{Position, SimTime};

use crate::economy::{self, MatchStats};
use crate::handles::{enemy_id, tower_id};
use crate::pool::Pool;
use crate::projectile::Projectile;
use crate::systems::status_effects;
use crate::systems::wave_spawner::WaveController;

/// Everything outside the ECS world a snapshot reads.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub speed: u8,
    pub stats: &'a MatchStats,
    pub waves: &'a WaveController,
    pub projectiles: &'a Pool<Projectile>,
    pub economy: &'a EconomyConfig,
}

pub fn build_snapshot(
    world: &World,
    ctx: SnapshotContext<'_>,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        speed: ctx.speed,
        stats: ctx.stats.view(),
        wave: ctx.waves.view(),
        enemies: build_enemies(world),
        towers: build_towers(world, ctx.economy),
        projectiles: build_projectiles(ctx.projectiles),
        events,
    }
}

/// Enemies flagged dead or at the end are left out; cleanup removes them on
/// the next tick.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    world
        .query::<(&Position, &Enemy, &StatusEffects)>()
        .iter()
        .filter(|(_, (_, enemy, _))| !enemy.is_dead && !enemy.reached_end)
        .map(|(entity, (pos, enemy, effects))| EnemyView {
            id: enemy_id(entity),
            kind: enemy.kind,
            position: *pos,
            health: enemy.health,
            max_health: enemy.max_health,
            path_index: enemy.path_index,
            speed_multiplier: status_effects::speed_multiplier(effects),
        })
        .collect()
}

fn build_towers(world: &World, eco: &EconomyConfig) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<(&Position, &Tower)>()
        .iter()
        .map(|(entity, (pos, tower))| TowerView {
            id: tower_id(entity),
            kind: tower.kind,
            position: *pos,
            level: tower.level,
            damage: tower.damage,
            range: tower.range,
            fire_rate: tower.fire_rate,
            kills: tower.kills,
            sell_value: tower.sell_value,
            upgrade_cost: economy::upgrade_quote(tower, eco),
            target: tower.target,
        })
        .collect();

    towers.sort_by_key(|t| t.id);
    towers
}

fn build_projectiles(pool: &Pool<Projectile>) -> Vec<ProjectileView> {
    pool.iter_active()
        .map(|p| ProjectileView {
            position: p.position,
            origin: p.origin,
            kind: p.kind,
            target: p.target,
        })
        .collect()
}
