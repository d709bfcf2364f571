//! Tests for the simulation engine: determinism, clock control, combat
//! resolution, the wave controller, and the economy surface.

use proptest::prelude::*;

use rampart_core::commands::PlayerCommand;
use rampart_core::components::{Enemy, Tower};
use rampart_core::config::GameConfig;
use rampart_core::enums::*;
use rampart_core::error::{CommandError, PlacementBlock};
use rampart_core::events::GameEvent;
use rampart_core::state::GameStateSnapshot;
use rampart_core::types::{EnemyId, Position, TowerId};

use crate::economy;
use crate::engine::{SimConfig, SimulationEngine};
use crate::handles::{enemy_id, tower_entity};
use crate::path::Path;
use crate::systems::projectiles;

// ---- Helpers ----

/// A straight path along row 6 of the stock 20×12 field.
fn straight_path() -> Path {
    let waypoints = vec![Position::new(20.0, 260.0), Position::new(780.0, 260.0)];
    Path::new(waypoints).unwrap()
}

/// Stock tuning with waves only started on request.
fn sandbox_config() -> GameConfig {
    let mut game = GameConfig::default();
    game.waves.auto_start = false;
    game
}

fn sandbox_with(game: GameConfig) -> SimulationEngine {
    let mut engine =
        SimulationEngine::with_path(SimConfig { seed: 7, game }, straight_path()).unwrap();
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick(0.0);
    engine
}

fn sandbox() -> SimulationEngine {
    sandbox_with(sandbox_config())
}

fn stationary_enemies() -> GameConfig {
    let mut game = sandbox_config();
    for enemy in &mut game.enemies {
        enemy.speed = 0.0;
    }
    game
}

fn tower(engine: &SimulationEngine, id: TowerId) -> Tower {
    let entity = tower_entity(id).unwrap();
    let t = engine.world().get::<&Tower>(entity).unwrap();
    (*t).clone()
}

fn enemy(engine: &SimulationEngine, entity: hecs::Entity) -> Option<Enemy> {
    engine
        .world()
        .get::<&Enemy>(entity)
        .ok()
        .map(|e| (*e).clone())
}

fn count(snap: &GameStateSnapshot, pred: impl Fn(&GameEvent) -> bool) -> usize {
    snap.events.iter().filter(|e| pred(e)).count()
}

fn killed(ev: &GameEvent, id: EnemyId) -> bool {
    matches!(ev, GameEvent::EnemyKilled { enemy, .. } if *enemy == id)
}

/// Place up to `count` towers on free cells bordering the path.
fn build_along_path(engine: &mut SimulationEngine, count: usize) {
    let cs = engine.config().field.cell_size;
    let spots: Vec<Position> = engine
        .grid()
        .free_cells()
        .filter(|cell| {
            let grid = engine.grid();
            let (x, y) = (cell.center.x, cell.center.y);
            [(0.0, cs), (0.0, -cs), (cs, 0.0), (-cs, 0.0)]
                .iter()
                .any(|(dx, dy)| grid.cell_at(x + dx, y + dy).is_some_and(|n| n.on_path))
        })
        .map(|cell| cell.center)
        .take(count)
        .collect();
    for (i, spot) in spots.iter().enumerate() {
        let _ = engine.place_tower(TowerKind::ALL[i % TowerKind::ALL.len()], spot.x, spot.y);
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let make = || {
        let mut engine = SimulationEngine::new(SimConfig {
            seed: 12345,
            ..Default::default()
        })
        .unwrap();
        build_along_path(&mut engine, 6);
        engine.queue_command(PlayerCommand::StartGame);
        engine
    };
    let mut engine_a = make();
    let mut engine_b = make();

    for _ in 0..1500 {
        let json_a = serde_json::to_string(&engine_a.tick(0.05)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(0.05)).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_seed_selects_path() {
    let paths: Vec<Path> = (1..=5)
        .map(|seed| {
            SimulationEngine::new(SimConfig {
                seed,
                ..Default::default()
            })
            .unwrap()
            .path()
            .clone()
        })
        .collect();
    assert!(paths.windows(2).any(|pair| pair[0] != pair[1]));
}

#[test]
fn test_match_file_defaults() {
    let sim: SimConfig = serde_json::from_str(r#"{ "seed": 5 }"#).unwrap();
    assert_eq!(sim.seed, 5);
    assert_eq!(sim.game.waves.max_waves, 20);

    let engine = SimulationEngine::new(sim.clone()).unwrap();
    let again = SimulationEngine::new(sim).unwrap();
    assert_eq!(engine.path(), again.path());
}

#[test]
fn test_invalid_config_rejected() {
    let mut game = GameConfig::default();
    game.enemies.clear();
    assert!(SimulationEngine::new(SimConfig { seed: 1, game }).is_err());
}

// ---- Phase control ----

#[test]
fn test_setup_phase_does_not_advance() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        let snap = engine.tick(0.05);
        assert_eq!(snap.phase, GamePhase::Setup);
    }
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.time().elapsed_secs, 0.0);
}

#[test]
fn test_pause_freezes_state() {
    let mut engine = sandbox();
    let e = engine.spawn_test_enemy(EnemyKind::Scout, Position::new(100.0, 260.0), 0);
    engine.tick(0.05);
    let before = *engine.world().get::<&Position>(e).unwrap();
    let time_before = engine.time();

    engine.queue_command(PlayerCommand::Pause);
    let snap = engine.tick(0.05);
    assert_eq!(snap.phase, GamePhase::Paused);
    assert_eq!(count(&snap, |ev| *ev == GameEvent::Paused), 1);
    for _ in 0..10 {
        engine.tick(0.05);
    }
    assert_eq!(*engine.world().get::<&Position>(e).unwrap(), before);
    assert_eq!(engine.time().tick, time_before.tick);

    engine.queue_command(PlayerCommand::TogglePause);
    let snap = engine.tick(0.05);
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(count(&snap, |ev| *ev == GameEvent::Resumed), 1);
    assert_eq!(engine.time().tick, time_before.tick + 1);
    assert!(engine.world().get::<&Position>(e).unwrap().x > before.x);
}

#[test]
fn test_delta_clamp_and_speed() {
    let mut engine = sandbox();

    engine.tick(1.0);
    assert!((engine.time().elapsed_secs - 0.05).abs() < 1e-12);

    engine.queue_command(PlayerCommand::SetSpeed { multiplier: 3 });
    let snap = engine.tick(0.02);
    assert_eq!(snap.speed, 3);
    assert!((engine.time().elapsed_secs - 0.11).abs() < 1e-12);

    engine.queue_command(PlayerCommand::SetSpeed { multiplier: 9 });
    let snap = engine.tick(0.0);
    assert_eq!(snap.speed, 3);
    assert_eq!(
        count(&snap, |ev| *ev == GameEvent::SpeedChanged { multiplier: 3 }),
        1
    );

    let elapsed = engine.time().elapsed_secs;
    engine.tick(-1.0);
    assert_eq!(engine.time().elapsed_secs, elapsed);
}

// ---- Combat scenarios ----

#[test]
fn test_fire_rate_one_fires_three_times_in_three_seconds() {
    let mut engine = sandbox_with(stationary_enemies());
    let placed = engine.place_tower(TowerKind::Plasma, 220.0, 220.0).unwrap();
    let boss = engine.spawn_test_enemy(EnemyKind::Boss, Position::new(220.0, 260.0), 0);
    let fired = GameEvent::TowerFired {
        tower: placed.tower,
        target: enemy_id(boss),
    };

    let mut shots = 0;
    for _ in 0..60 {
        let snap = engine.tick(0.05);
        shots += count(&snap, |ev| *ev == fired);
    }
    assert_eq!(shots, 3);
}

#[test]
fn test_three_hits_kill_exactly_once() {
    let mut engine = sandbox();
    let e = engine.spawn_test_enemy(EnemyKind::Scout, Position::new(400.0, 260.0), 0);
    let id = enemy_id(e);
    let config = engine.config().clone();
    let mut events = Vec::new();

    for _ in 0..2 {
        projectiles::resolve_hit(
            engine.world_mut(),
            id,
            8,
            TowerKind::Kinetic,
            &config,
            &mut events,
        );
    }
    let hurt = enemy(&engine, e).unwrap();
    assert_eq!(hurt.health, 4);
    assert!(!hurt.is_dead);

    projectiles::resolve_hit(
        engine.world_mut(),
        id,
        8,
        TowerKind::Kinetic,
        &config,
        &mut events,
    );
    let dead = enemy(&engine, e).unwrap();
    assert_eq!(dead.health, 0);
    assert!(dead.is_dead);
    assert!(engine.snapshot().enemies.iter().all(|v| v.id != id));

    let gold = engine.stats().gold;
    let snap = engine.tick(0.05);
    assert_eq!(count(&snap, |ev| killed(ev, id)), 1);
    assert_eq!(engine.stats().gold, gold + 5);
    assert!(enemy(&engine, e).is_none());

    let snap = engine.tick(0.05);
    assert_eq!(
        count(&snap, |ev| matches!(ev, GameEvent::EnemyKilled { .. })),
        0
    );
    assert_eq!(engine.stats().gold, gold + 5);
}

#[test]
fn test_insufficient_funds_leaves_state_unchanged() {
    let mut engine = sandbox();
    engine.stats_mut().gold = 10;

    let err = engine
        .place_tower(TowerKind::Kinetic, 140.0, 220.0)
        .unwrap_err();
    assert_eq!(
        err,
        CommandError::InsufficientFunds {
            required: 15,
            available: 10
        }
    );
    assert_eq!(engine.stats().gold, 10);
    let cell = engine.grid().cell_at(140.0, 220.0).unwrap();
    assert!(cell.tower.is_none());
    assert_eq!(engine.world().query::<&Tower>().iter().count(), 0);
}

#[test]
fn test_chain_hits_only_in_radius_neighbours() {
    let mut engine = sandbox_with(stationary_enemies());
    let primary = engine.spawn_test_enemy(EnemyKind::Tank, Position::new(300.0, 260.0), 0);
    let near_a = engine.spawn_test_enemy(EnemyKind::Tank, Position::new(330.0, 260.0), 0);
    let near_b = engine.spawn_test_enemy(EnemyKind::Tank, Position::new(300.0, 300.0), 0);
    let far = engine.spawn_test_enemy(EnemyKind::Tank, Position::new(400.0, 260.0), 0);
    let config = engine.config().clone();
    let mut events = Vec::new();

    projectiles::resolve_hit(
        engine.world_mut(),
        enemy_id(primary),
        12,
        TowerKind::Lightning,
        &config,
        &mut events,
    );

    assert_eq!(enemy(&engine, primary).unwrap().health, 68);
    assert_eq!(enemy(&engine, near_a).unwrap().health, 72);
    assert_eq!(enemy(&engine, near_b).unwrap().health, 72);
    assert_eq!(enemy(&engine, far).unwrap().health, 80);

    let chained: Vec<_> = events
        .iter()
        .filter_map(|ev| match ev {
            GameEvent::ChainHit { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(chained.len(), 2);
    assert!(!chained.contains(&enemy_id(primary)));
}

#[test]
fn test_last_life_lost_ends_match_same_tick() {
    let mut engine = sandbox();
    engine.stats_mut().lives = 1;
    engine.queue_command(PlayerCommand::StartNextWave);
    let scout = engine.spawn_test_enemy(EnemyKind::Scout, Position::new(780.0, 260.0), 1);
    let leaked = GameEvent::EnemyLeaked {
        enemy: enemy_id(scout),
        lives_remaining: 0,
    };

    // Reaches the end on this tick, is removed on the next.
    let snap = engine.tick(0.05);
    assert_eq!(snap.phase, GamePhase::Active);
    let snap = engine.tick(0.05);
    assert_eq!(snap.stats.lives, 0);
    assert_eq!(snap.phase, GamePhase::Lost);
    assert_eq!(count(&snap, |ev| *ev == leaked), 1);
    assert_eq!(count(&snap, |ev| matches!(ev, GameEvent::Defeat { .. })), 1);

    let spawned = engine.waves().spawned;
    let time = engine.time();
    for _ in 0..100 {
        let snap = engine.tick(0.05);
        assert_eq!(snap.phase, GamePhase::Lost);
        assert!(snap.events.is_empty());
    }
    assert_eq!(engine.waves().spawned, spawned);
    assert_eq!(engine.time().tick, time.tick);
    assert_eq!(engine.world().query::<&Enemy>().iter().count(), 0);
}

#[test]
fn test_sold_tower_shot_still_lands_and_slows() {
    let mut engine = sandbox_with(stationary_enemies());
    let placed = engine.place_tower(TowerKind::Frost, 140.0, 220.0).unwrap();
    let e = engine.spawn_test_enemy(EnemyKind::Boss, Position::new(160.0, 260.0), 0);

    let snap = engine.tick(0.05);
    assert_eq!(
        count(&snap, |ev| matches!(ev, GameEvent::TowerFired { .. })),
        1
    );
    assert_eq!(snap.projectiles.len(), 1);
    engine.sell_tower(placed.tower).unwrap();

    let mut slowed = 0;
    for _ in 0..10 {
        let snap = engine.tick(0.05);
        slowed += count(&snap, |ev| {
            *ev == GameEvent::EnemySlowed {
                enemy: enemy_id(e),
                multiplier: 0.5,
            }
        });
    }
    assert_eq!(slowed, 1);
    assert_eq!(enemy(&engine, e).unwrap().health, 195);
    assert_eq!(engine.projectiles().active_count(), 0);
}

#[test]
fn test_extreme_wave_curve_keeps_ticking() {
    let game = GameConfig::from_json_str(
        r#"{ "waves": { "per_wave_increment": 4294967295, "auto_start": false } }"#,
    )
    .unwrap();
    let mut engine = sandbox_with(game);
    engine.queue_command(PlayerCommand::StartNextWave);
    let snap = engine.tick(0.05);
    assert_eq!(snap.wave.size, u32::MAX);
    assert_eq!(snap.wave.phase, WavePhase::Spawning);
    assert_eq!(snap.phase, GamePhase::Active);
}

// ---- Kill attribution ----

#[test]
fn test_kill_credited_to_current_target_holder() {
    let mut engine = sandbox();
    let placed = engine.place_tower(TowerKind::Fusion, 140.0, 220.0).unwrap();
    let e = engine.spawn_test_enemy(EnemyKind::Scout, Position::new(100.0, 260.0), 0);
    let id = enemy_id(e);

    let mut credited = None;
    for _ in 0..40 {
        let snap = engine.tick(0.05);
        for ev in &snap.events {
            if let GameEvent::EnemyKilled { enemy, credited: c, .. } = ev {
                if *enemy == id {
                    credited = Some(*c);
                }
            }
        }
        if credited.is_some() {
            break;
        }
    }

    assert_eq!(credited, Some(Some(placed.tower)));
    let t = tower(&engine, placed.tower);
    assert_eq!(t.kills, 1);
    assert!(t.target.is_none());
    assert_eq!(engine.stats().gold, 100 - 50 + 5);
    assert_eq!(engine.stats().score, 50 + 50);
}

#[test]
fn test_retargeted_tower_gets_no_credit() {
    let mut engine = sandbox_with(stationary_enemies());
    let placed = engine
        .place_tower(TowerKind::Kinetic, 140.0, 220.0)
        .unwrap();
    let victim = engine.spawn_test_enemy(EnemyKind::Scout, Position::new(600.0, 260.0), 0);
    let other = engine.spawn_test_enemy(EnemyKind::Scout, Position::new(700.0, 260.0), 0);

    {
        let world = engine.world_mut();
        world
            .get::<&mut Tower>(tower_entity(placed.tower).unwrap())
            .unwrap()
            .target = Some(enemy_id(other));
        world.get::<&mut Enemy>(victim).unwrap().is_dead = true;
    }

    let snap = engine.tick(0.05);
    let expected = GameEvent::EnemyKilled {
        enemy: enemy_id(victim),
        reward: 5,
        credited: None,
    };
    assert_eq!(count(&snap, |ev| *ev == expected), 1);
    assert_eq!(tower(&engine, placed.tower).kills, 0);
}

// ---- Projectile pool ----

#[test]
fn test_projectile_dropped_when_target_removed() {
    let mut engine = sandbox_with(stationary_enemies());
    engine
        .place_tower(TowerKind::Kinetic, 140.0, 220.0)
        .unwrap();
    let e = engine.spawn_test_enemy(EnemyKind::Boss, Position::new(220.0, 260.0), 0);

    let snap = engine.tick(0.05);
    assert_eq!(snap.projectiles.len(), 1);
    assert_eq!(snap.projectiles[0].origin, Position::new(140.0, 220.0));

    engine.world_mut().despawn(e).unwrap();
    let snap = engine.tick(0.05);
    assert!(snap.projectiles.is_empty());
    assert_eq!(engine.projectiles().active_count(), 0);
    assert!(engine.projectiles().iter().all(|p| p.target.is_none()));
}

#[test]
fn test_match_invariants_hold_every_tick() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 3,
        ..Default::default()
    })
    .unwrap();
    build_along_path(&mut engine, 6);
    engine.queue_commands([
        PlayerCommand::StartGame,
        PlayerCommand::SetSpeed { multiplier: 3 },
    ]);

    let mut completions = 0;
    for _ in 0..4000 {
        let snap = engine.tick(0.05);
        for view in &snap.enemies {
            assert!(view.health <= view.max_health);
        }
        assert!(snap.wave.spawned <= snap.wave.size);
        let pool = engine.projectiles();
        assert!(pool.active_count() <= pool.len());
        assert!(pool.iter().all(|p| p.active || p.target.is_none()));
        completions += count(&snap, |ev| matches!(ev, GameEvent::WaveCompleted { .. }));
        if snap.phase.is_terminal() {
            break;
        }
    }
    assert_eq!(completions as u32, engine.waves().wave - 1);
}

// ---- Waves ----

#[test]
fn test_first_wave_starts_after_initial_delay() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    engine.queue_command(PlayerCommand::StartGame);
    let first = GameEvent::WaveStarted {
        wave: 1,
        enemies: 7,
    };

    let mut started_at = None;
    for i in 0..25 {
        let snap = engine.tick(0.05);
        if count(&snap, |ev| *ev == first) == 1 {
            started_at = Some(i);
            break;
        }
    }
    let started_at = started_at.expect("first wave never started");
    assert!((18..=21).contains(&started_at));

    let mut first_spawn = None;
    for i in 1..=25 {
        let snap = engine.tick(0.05);
        if count(&snap, |ev| matches!(ev, GameEvent::EnemySpawned { .. })) > 0 {
            first_spawn = Some(i);
            break;
        }
    }
    let first_spawn = first_spawn.expect("no enemy spawned");
    assert!((20..=21).contains(&first_spawn));
}

#[test]
fn test_start_next_wave_only_while_idle() {
    let mut engine = sandbox();
    engine.queue_command(PlayerCommand::StartNextWave);
    let snap = engine.tick(0.05);
    let first = GameEvent::WaveStarted {
        wave: 1,
        enemies: 7,
    };
    assert_eq!(count(&snap, |ev| *ev == first), 1);
    assert_eq!(snap.wave.phase, WavePhase::Spawning);
    assert!(snap.wave.active);

    engine.queue_command(PlayerCommand::StartNextWave);
    let snap = engine.tick(0.05);
    assert_eq!(
        count(&snap, |ev| matches!(ev, GameEvent::WaveStarted { .. })),
        0
    );
}

#[test]
fn test_short_match_reaches_victory() {
    let mut game = GameConfig::default();
    game.waves.max_waves = 2;
    game.waves.base_count = 2;
    game.waves.per_wave_increment = 0;
    game.waves.spawn_interval_secs = 0.1;
    game.waves.initial_delay_secs = 0.1;
    game.waves.inter_wave_delay_secs = 0.5;
    let waypoints = vec![Position::new(20.0, 260.0), Position::new(100.0, 260.0)];
    let path = Path::new(waypoints).unwrap();
    let mut engine = SimulationEngine::with_path(SimConfig { seed: 9, game }, path).unwrap();
    engine.queue_command(PlayerCommand::StartGame);

    let mut completed = Vec::new();
    let mut victories = 0;
    for _ in 0..2000 {
        let snap = engine.tick(0.05);
        assert!(snap.wave.spawned <= snap.wave.size);
        for ev in &snap.events {
            match ev {
                GameEvent::WaveCompleted { wave, bonus } => completed.push((*wave, *bonus)),
                GameEvent::Victory { .. } => victories += 1,
                _ => {}
            }
        }
        if snap.phase.is_terminal() {
            break;
        }
    }

    assert_eq!(engine.phase(), GamePhase::Won);
    assert_eq!(completed, vec![(1, 30), (2, 35)]);
    assert_eq!(victories, 1);
    assert_eq!(engine.stats().lives, 16);
    assert_eq!(engine.stats().gold, 100 + 30 + 35);
    assert_eq!(engine.stats().score, (30 + 35) * 5);

    let time = engine.time();
    engine.tick(0.05);
    assert_eq!(engine.time().tick, time.tick);
}

// ---- Economy ----

#[test]
fn test_place_upgrade_sell_cycle() {
    let mut engine = sandbox();
    let placed = engine
        .place_tower(TowerKind::Kinetic, 150.0, 230.0)
        .unwrap();
    assert_eq!(placed.position, Position::new(140.0, 220.0));
    assert_eq!(placed.gold_remaining, 85);
    assert_eq!(engine.stats().score, 15);
    assert_eq!(engine.tower_at(130.0, 230.0), Some(placed.tower));
    assert_eq!(engine.upgrade_cost(placed.tower), Some(18));

    let up = engine.upgrade_tower(placed.tower).unwrap();
    assert_eq!((up.level, up.cost, up.gold_remaining), (2, 18, 67));
    assert_eq!(tower(&engine, placed.tower).sell_value, 14);

    let up = engine.upgrade_tower_at(140.0, 220.0).unwrap();
    assert_eq!((up.level, up.cost, up.gold_remaining), (3, 27, 40));
    assert_eq!(tower(&engine, placed.tower).sell_value, 19);

    let sold = engine.sell_tower_at(145.0, 225.0).unwrap();
    assert_eq!(sold.refund, 19);
    assert_eq!(sold.gold_remaining, 59);
    let cell = engine.grid().cell_at(140.0, 220.0).unwrap();
    assert!(cell.tower.is_none());
    assert_eq!(engine.tower_at(140.0, 220.0), None);

    assert_eq!(
        engine.sell_tower(placed.tower),
        Err(CommandError::NoEntityAtLocation)
    );
    assert_eq!(
        engine.upgrade_tower(placed.tower),
        Err(CommandError::NoEntityAtLocation)
    );
    assert_eq!(
        engine.sell_tower_at(400.0, 60.0),
        Err(CommandError::NoEntityAtLocation)
    );
}

#[test]
fn test_upgrade_without_gold_is_refused() {
    let mut engine = sandbox();
    let placed = engine
        .place_tower(TowerKind::Kinetic, 140.0, 220.0)
        .unwrap();
    engine.stats_mut().gold = 5;
    assert_eq!(
        engine.upgrade_tower(placed.tower),
        Err(CommandError::InsufficientFunds {
            required: 18,
            available: 5
        })
    );
    assert_eq!(tower(&engine, placed.tower).level, 1);
    assert_eq!(engine.stats().gold, 5);
}

#[test]
fn test_placement_rules() {
    let mut engine = sandbox();
    let on_path = engine.place_tower(TowerKind::Kinetic, 100.0, 260.0);
    assert_eq!(
        on_path,
        Err(CommandError::InvalidPlacement {
            reason: PlacementBlock::OnPath
        })
    );
    assert_eq!(
        engine.place_tower(TowerKind::Kinetic, -5.0, 10.0),
        Err(CommandError::InvalidPlacement {
            reason: PlacementBlock::OutOfBounds
        })
    );
    assert_eq!(
        engine.place_tower(TowerKind::Kinetic, 900.0, 10.0),
        Err(CommandError::InvalidPlacement {
            reason: PlacementBlock::OutOfBounds
        })
    );

    engine
        .place_tower(TowerKind::Kinetic, 140.0, 220.0)
        .unwrap();
    assert_eq!(
        engine.place_tower(TowerKind::Plasma, 150.0, 210.0),
        Err(CommandError::InvalidPlacement {
            reason: PlacementBlock::Occupied
        })
    );
    assert_eq!(engine.stats().gold, 85);
}

#[test]
fn test_unknown_tower_kind() {
    let mut game = sandbox_config();
    game.towers.retain(|spec| spec.kind != TowerKind::Nano);
    let mut engine = sandbox_with(game);
    assert_eq!(
        engine.place_tower(TowerKind::Nano, 140.0, 220.0),
        Err(CommandError::UnknownTowerKind {
            kind: TowerKind::Nano
        })
    );
}

// ---- Status effects ----

#[test]
fn test_slows_stack_then_expire() {
    let mut engine = sandbox();
    let e = engine.spawn_test_enemy(EnemyKind::Boss, Position::new(100.0, 260.0), 0);
    let config = engine.config().clone();
    let mut events = Vec::new();
    for _ in 0..2 {
        projectiles::resolve_hit(
            engine.world_mut(),
            enemy_id(e),
            5,
            TowerKind::Frost,
            &config,
            &mut events,
        );
    }

    let snap = engine.snapshot();
    let view = snap.enemies.iter().find(|v| v.id == enemy_id(e)).unwrap();
    assert!((view.speed_multiplier - 0.25).abs() < 1e-12);

    // Quarter speed: 0.8 × 0.25 × 60 × 0.05 px.
    let x0 = engine.world().get::<&Position>(e).unwrap().x;
    engine.tick(0.05);
    let x1 = engine.world().get::<&Position>(e).unwrap().x;
    assert!((x1 - x0 - 0.6).abs() < 1e-9);

    for _ in 0..41 {
        engine.tick(0.05);
    }
    let snap = engine.snapshot();
    let view = snap.enemies.iter().find(|v| v.id == enemy_id(e)).unwrap();
    assert_eq!(view.speed_multiplier, 1.0);
}

// ---- Cooldown ----

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_tower_never_fires_faster_than_cooldown(
        fire_rate in 0.5f64..4.0,
        deltas in proptest::collection::vec(0.0f64..0.08, 50..200),
    ) {
        let mut engine = sandbox_with(stationary_enemies());
        let placed = engine
            .place_tower(TowerKind::Kinetic, 220.0, 220.0)
            .unwrap();
        let e = engine.spawn_test_enemy(EnemyKind::Boss, Position::new(220.0, 260.0), 0);
        {
            let world = engine.world_mut();
            let mut target = world.get::<&mut Enemy>(e).unwrap();
            target.health = 1_000_000;
            target.max_health = 1_000_000;
        }
        engine
            .world_mut()
            .get::<&mut Tower>(tower_entity(placed.tower).unwrap())
            .unwrap()
            .fire_rate = fire_rate;

        let cooldown_ms = 1000.0 / fire_rate;
        let mut last: Option<f64> = None;
        for dt in deltas {
            let snap = engine.tick(dt);
            if count(&snap, |ev| matches!(ev, GameEvent::TowerFired { .. })) > 0 {
                let now = snap.time.elapsed_ms();
                if let Some(prev) = last {
                    prop_assert!(now - prev >= cooldown_ms);
                }
                last = Some(now);
            }
        }
    }

    #[test]
    fn prop_health_stays_in_bounds(
        max in 1u32..500,
        hits in proptest::collection::vec(0u32..60, 0..40),
    ) {
        let mut target = Enemy {
            kind: EnemyKind::Tank,
            path_index: 0,
            health: max,
            max_health: max,
            base_speed: 1.2,
            reward: 20,
            is_dead: false,
            reached_end: false,
        };
        for damage in hits {
            projectiles::apply_damage(&mut target, damage);
            prop_assert!(target.health <= target.max_health);
            prop_assert_eq!(target.is_dead, target.health == 0);
        }
    }

    #[test]
    fn prop_upgrades_are_monotonic(
        kind in proptest::sample::select(TowerKind::ALL.to_vec()),
        levels in 1usize..10,
    ) {
        let config = GameConfig::default();
        let spec = config.tower(kind).unwrap();
        let mut world = hecs::World::new();
        let entity = crate::world_setup::spawn_tower(
            &mut world,
            spec,
            Position::new(60.0, 60.0),
            &config.economy,
        );
        let mut t = world.get::<&mut Tower>(entity).unwrap();
        for _ in 0..levels {
            let before = (*t).clone();
            prop_assert!(economy::upgrade_quote(&t, &config.economy) > 0);
            economy::apply_upgrade(&mut t, &config.economy);
            prop_assert!(t.damage >= before.damage);
            prop_assert!(t.range >= before.range);
            prop_assert!(t.fire_rate >= before.fire_rate);
            prop_assert!(t.sell_value > before.sell_value);
            prop_assert_eq!(t.level, before.level + 1);
        }
    }
}
