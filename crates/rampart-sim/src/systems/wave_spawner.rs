//! Wave controller and spawning system.
//!
//! `Idle` (countdown running) → `Spawning` (creating enemies) → `Draining`
//! (all created, waiting for the field to clear) → `Idle` again, or victory
//! once the wave counter passes the configured maximum.

use hecs::World;
use rand::Rng;
use tracing::{debug, info};

use rampart_core::config::{GameConfig, WaveConfig};
use rampart_core::enums::WavePhase;
use rampart_core::events::GameEvent;
use rampart_core::state::WaveView;

use crate::handles::enemy_id;
use crate::path::Path;
use crate::world_setup;

/// Wave bookkeeping. Owned by the engine, mutated only here.
#[derive(Debug, Clone)]
pub struct WaveController {
    /// Current wave number (1-based). Incremented when a wave is cleared.
    pub wave: u32,
    pub max_waves: u32,
    pub phase: WavePhase,
    pub spawned: u32,
    pub size: u32,
    /// Seconds since the last spawn (or wave start).
    pub spawn_timer: f64,
    /// Seconds until the next wave starts while `Idle`.
    pub countdown: f64,
}

/// Outcome of clearing a wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveCompletion {
    pub cleared: u32,
    pub bonus: u32,
    pub victory: bool,
}

impl WaveController {
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            wave: 1,
            max_waves: config.max_waves,
            phase: WavePhase::Idle,
            spawned: 0,
            size: 0,
            spawn_timer: 0.0,
            countdown: config.initial_delay_secs,
        }
    }

    /// True while Spawning or Draining.
    pub fn is_active(&self) -> bool {
        self.phase != WavePhase::Idle
    }

    /// Enter `Spawning` for the current wave number. Returns the wave size.
    pub fn begin_wave(&mut self, config: &WaveConfig) -> u32 {
        self.size = config.wave_size(self.wave);
        self.spawned = 0;
        self.spawn_timer = 0.0;
        self.countdown = 0.0;
        self.phase = if self.size == 0 {
            WavePhase::Draining
        } else {
            WavePhase::Spawning
        };
        self.size
    }

    pub fn advance_timers(&mut self, dt: f64) {
        self.spawn_timer += dt;
        if self.phase == WavePhase::Idle && self.countdown > 0.0 {
            self.countdown -= dt;
        }
    }

    pub fn spawn_due(&self, interval_secs: f64) -> bool {
        self.phase == WavePhase::Spawning
            && self.spawn_timer > interval_secs
            && self.spawned < self.size
    }

    pub fn record_spawn(&mut self) {
        self.spawned += 1;
        self.spawn_timer = 0.0;
        if self.spawned >= self.size {
            self.phase = WavePhase::Draining;
        }
    }

    /// Close the wave if every enemy has been created and none is left on
    /// the field. Fires at most once per wave.
    pub fn try_complete(
        &mut self,
        live_enemies: usize,
        config: &WaveConfig,
    ) -> Option<WaveCompletion> {
        if !self.is_active() || self.spawned < self.size || live_enemies > 0 {
            return None;
        }
        let cleared = self.wave;
        self.wave += 1;
        self.phase = WavePhase::Idle;
        self.countdown = config.inter_wave_delay_secs;
        Some(WaveCompletion {
            cleared,
            bonus: config.completion_bonus(self.wave),
            victory: self.wave > self.max_waves,
        })
    }

    pub fn should_auto_start(&self, config: &WaveConfig) -> bool {
        config.auto_start && self.phase == WavePhase::Idle && self.countdown <= 0.0
    }

    pub fn view(&self) -> WaveView {
        WaveView {
            number: self.wave,
            max_waves: self.max_waves,
            phase: self.phase,
            active: self.is_active(),
            spawned: self.spawned,
            size: self.size,
            countdown_secs: self.countdown.max(0.0),
        }
    }
}

/// Start the current wave and announce it.
pub fn start_wave(
    controller: &mut WaveController,
    config: &WaveConfig,
    events: &mut Vec<GameEvent>,
) {
    let enemies = controller.begin_wave(config);
    info!(wave = controller.wave, enemies, "wave started");
    events.push(GameEvent::WaveStarted {
        wave: controller.wave,
        enemies,
    });
}

/// Advance wave timers and create at most one enemy.
pub fn run(
    world: &mut World,
    rng: &mut impl Rng,
    controller: &mut WaveController,
    config: &GameConfig,
    path: &Path,
    dt: f64,
    events: &mut Vec<GameEvent>,
) {
    controller.advance_timers(dt);
    if !controller.spawn_due(config.waves.spawn_interval_secs) {
        return;
    }
    let Some(spec) = world_setup::pick_enemy(config, rng) else {
        return;
    };
    let multiplier = config.waves.stat_multiplier(controller.wave);
    let entity = world_setup::spawn_enemy(world, spec, path.start(), multiplier);
    controller.record_spawn();
    debug!(
        wave = controller.wave,
        kind = ?spec.kind,
        spawned = controller.spawned,
        size = controller.size,
        "enemy spawned"
    );
    events.push(GameEvent::EnemySpawned {
        enemy: enemy_id(entity),
        kind: spec.kind,
    });
}
