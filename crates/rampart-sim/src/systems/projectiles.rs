//! Projectile flight and hit resolution.
//!
//! Projectiles home on their target's current position. A projectile whose
//! target is gone or already dead returns to the pool without effect. Hits
//! only mark enemies dead; rewards are paid when cleanup removes them.

use glam::DVec2;
use hecs::{Entity, World};
use tracing::trace;

use rampart_core::components::{Enemy, StatusEffect, StatusEffects};
use rampart_core::config::{GameConfig, HitEffect};
use rampart_core::constants::PROJECTILE_HIT_RADIUS;
use rampart_core::enums::TowerKind;
use rampart_core::events::GameEvent;
use rampart_core::types::{EnemyId, Position};

use crate::handles::{enemy_entity, enemy_id};
use crate::pool::Pool;
use crate::projectile::Projectile;
use crate::systems::status_effects;

pub fn run(
    world: &mut World,
    projectiles: &mut Pool<Projectile>,
    config: &GameConfig,
    dt: f64,
    events: &mut Vec<GameEvent>,
) {
    for index in 0..projectiles.len() {
        let Some(projectile) = projectiles.get_mut(index) else {
            continue;
        };
        if !projectile.active {
            continue;
        }

        let Some((target, target_pos)) = projectile
            .target
            .and_then(|id| live_enemy_position(world, id).map(|pos| (id, pos)))
        else {
            trace!(slot = index, "projectile target gone, releasing");
            projectiles.release(index);
            continue;
        };

        let to_target = DVec2::from(target_pos) - DVec2::from(projectile.position);
        let distance = to_target.length();
        if distance < PROJECTILE_HIT_RADIUS {
            let (damage, kind) = (projectile.damage, projectile.kind);
            projectiles.release(index);
            resolve_hit(world, target, damage, kind, config, events);
        } else {
            let travel = (projectile.speed * dt).min(distance);
            projectile.position =
                (DVec2::from(projectile.position) + to_target / distance * travel).into();
        }
    }
}

/// Position of a live (present and not dead) enemy.
fn live_enemy_position(world: &World, id: EnemyId) -> Option<Position> {
    let entity = enemy_entity(id)?;
    let enemy = world.get::<&Enemy>(entity).ok()?;
    if enemy.is_dead {
        return None;
    }
    world.get::<&Position>(entity).ok().map(|pos| *pos)
}

/// Subtract `damage`, clamping at zero. Zero health marks the enemy dead.
pub fn apply_damage(enemy: &mut Enemy, damage: u32) {
    enemy.health = enemy.health.saturating_sub(damage);
    if enemy.health == 0 {
        enemy.is_dead = true;
    }
}

/// Apply a hit on `target` and the secondary effect of the firing tower kind.
pub fn resolve_hit(
    world: &mut World,
    target: EnemyId,
    damage: u32,
    kind: TowerKind,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    let Some(entity) = enemy_entity(target) else {
        return;
    };
    let origin = match world.get::<&Position>(entity) {
        Ok(pos) => *pos,
        Err(_) => {
            trace!(enemy = target.0, "hit on a removed enemy dropped");
            return;
        }
    };
    match world.get::<&mut Enemy>(entity) {
        Ok(mut enemy) => apply_damage(&mut enemy, damage),
        Err(_) => return,
    }
    events.push(GameEvent::EnemyHit {
        enemy: target,
        damage,
    });

    match config.tower(kind).and_then(|spec| spec.effect) {
        Some(HitEffect::Slow {
            multiplier,
            duration_secs,
        }) => {
            if let Ok(mut effects) = world.get::<&mut StatusEffects>(entity) {
                status_effects::apply(
                    &mut effects,
                    StatusEffect::Slow {
                        remaining_secs: duration_secs,
                        multiplier,
                    },
                );
                events.push(GameEvent::EnemySlowed {
                    enemy: target,
                    multiplier,
                });
            }
        }
        Some(HitEffect::Chain {
            radius,
            damage,
            max_targets,
        }) => chain(world, entity, origin, radius, damage, max_targets, events),
        None => {}
    }
}

/// Single-hop secondary damage to up to `max_targets` other live enemies
/// within `radius` of the primary.
fn chain(
    world: &mut World,
    primary: Entity,
    origin: Position,
    radius: f64,
    damage: u32,
    max_targets: usize,
    events: &mut Vec<GameEvent>,
) {
    let from = enemy_id(primary);
    let mut chained = 0;
    for (entity, (pos, enemy)) in world.query_mut::<(&Position, &mut Enemy)>() {
        if chained >= max_targets {
            break;
        }
        if entity == primary || enemy.is_dead || origin.range_to(pos) > radius {
            continue;
        }
        apply_damage(enemy, damage);
        chained += 1;
        events.push(GameEvent::ChainHit {
            from,
            to: enemy_id(entity),
            damage,
        });
    }
}
