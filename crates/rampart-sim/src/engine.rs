//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing: same seed plus same inputs gives the same
//! snapshots.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rampart_core::commands::{PlayerCommand, TowerPlaced, TowerSold, TowerUpgraded};
use rampart_core::components::{Enemy, Tower};
use rampart_core::config::GameConfig;
use rampart_core::constants::{TOWER_SELECTION_RADIUS, WAVE_BONUS_SCORE_FACTOR};
use rampart_core::enums::{GamePhase, TowerKind, WavePhase};
use rampart_core::error::{CommandError, ConfigError};
use rampart_core::events::GameEvent;
use rampart_core::state::GameStateSnapshot;
use rampart_core::types::{Position, SimTime, TowerId};

use crate::clock::SimClock;
use crate::economy::{self, MatchStats};
use crate::grid::Grid;
use crate::handles::{tower_entity, tower_id};
use crate::path::Path;
use crate::pool::Pool;
use crate::projectile::Projectile;
use crate::systems;
use crate::systems::snapshot::SnapshotContext;
use crate::systems::targeting::TargetCandidate;
use crate::systems::wave_spawner::WaveController;
use crate::world_setup;

/// Configuration for starting a new simulation. Missing fields in a match
/// file fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same path and same waves.
    pub seed: u64,
    /// Catalogs and tuning.
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: GameConfig,
    clock: SimClock,
    phase: GamePhase,
    rng: ChaCha8Rng,
    path: Path,
    grid: Grid,
    waves: WaveController,
    stats: MatchStats,
    projectiles: Pool<Projectile>,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    candidates: Vec<TargetCandidate>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create an engine on a path generated from the seed.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config.game, ChaCha8Rng::seed_from_u64(config.seed))
    }

    /// Create an engine drawing from an explicit generator.
    pub fn with_rng(game: GameConfig, mut rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        game.validate()?;
        let path = Path::generate(&game.field, &mut rng);
        Ok(Self::assemble(game, rng, path))
    }

    /// Create an engine on a fixed path instead of a generated one.
    pub fn with_path(config: SimConfig, path: Path) -> Result<Self, ConfigError> {
        config.game.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self::assemble(config.game, rng, path))
    }

    fn assemble(config: GameConfig, rng: ChaCha8Rng, path: Path) -> Self {
        let mut grid = Grid::new(&config.field);
        grid.mark_path(&path);
        Self {
            world: World::new(),
            clock: SimClock::default(),
            phase: GamePhase::default(),
            rng,
            path,
            grid,
            waves: WaveController::new(&config.waves),
            stats: MatchStats::new(&config.economy),
            projectiles: Pool::with_capacity(32),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            candidates: Vec::new(),
            events: Vec::new(),
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one host frame of `delta_secs` and return
    /// the resulting snapshot. Time only moves while the game is `Active`.
    pub fn tick(&mut self, delta_secs: f64) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let dt = self.clock.advance(delta_secs);
            self.run_systems(dt);
        }

        self.snapshot()
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotContext {
                time: self.clock.time(),
                phase: self.phase,
                speed: self.clock.speed(),
                stats: &self.stats,
                waves: &self.waves,
                projectiles: &self.projectiles,
                economy: &self.config.economy,
            },
            events,
        )
    }

    // --- Player actions ---

    /// Build a tower on the cell containing `(x, y)`. The tower snaps to the
    /// cell centre.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        x: f64,
        y: f64,
    ) -> Result<TowerPlaced, CommandError> {
        let spec = self
            .config
            .tower(kind)
            .ok_or(CommandError::UnknownTowerKind { kind })?;
        let index = self
            .grid
            .placement_check(x, y)
            .map_err(|reason| CommandError::InvalidPlacement { reason })?;
        let gold_remaining = self.stats.spend(spec.cost)?;
        self.stats.add_score(spec.cost as u64);

        let position = self.grid.cells()[index].center;
        let entity =
            world_setup::spawn_tower(&mut self.world, spec, position, &self.config.economy);
        self.grid.occupy(index, entity);

        let tower = tower_id(entity);
        debug!(
            tower = tower.0,
            ?kind,
            x = position.x,
            y = position.y,
            "tower placed"
        );
        self.events.push(GameEvent::TowerPlaced { tower, kind });
        Ok(TowerPlaced {
            tower,
            kind,
            position,
            cost: spec.cost,
            gold_remaining,
        })
    }

    /// The tower within selection radius of `(x, y)`, if any.
    pub fn tower_at(&self, x: f64, y: f64) -> Option<TowerId> {
        let point = Position::new(x, y);
        self.world
            .query::<(&Position, &Tower)>()
            .iter()
            .find(|(_, (pos, _))| pos.range_to(&point) <= TOWER_SELECTION_RADIUS)
            .map(|(entity, _)| tower_id(entity))
    }

    /// Price of the tower's next level.
    pub fn upgrade_cost(&self, tower: TowerId) -> Option<u32> {
        let entity = tower_entity(tower)?;
        let tower = self.world.get::<&Tower>(entity).ok()?;
        Some(economy::upgrade_quote(&tower, &self.config.economy))
    }

    pub fn upgrade_tower(&mut self, tower: TowerId) -> Result<TowerUpgraded, CommandError> {
        let entity = self.resolve_tower(tower)?;
        let cost = self
            .upgrade_cost(tower)
            .ok_or(CommandError::NoEntityAtLocation)?;
        let gold_remaining = self.stats.spend(cost)?;

        let level = {
            let mut t = self
                .world
                .get::<&mut Tower>(entity)
                .map_err(|_| CommandError::NoEntityAtLocation)?;
            economy::apply_upgrade(&mut t, &self.config.economy);
            t.level
        };

        debug!(tower = tower.0, level, cost, "tower upgraded");
        self.events.push(GameEvent::TowerUpgraded { tower, level });
        Ok(TowerUpgraded {
            tower,
            level,
            cost,
            gold_remaining,
        })
    }

    pub fn upgrade_tower_at(&mut self, x: f64, y: f64) -> Result<TowerUpgraded, CommandError> {
        let tower = self
            .tower_at(x, y)
            .ok_or(CommandError::NoEntityAtLocation)?;
        self.upgrade_tower(tower)
    }

    /// Remove the tower and refund its sell value. Its projectiles already in
    /// flight still land.
    pub fn sell_tower(&mut self, tower: TowerId) -> Result<TowerSold, CommandError> {
        let entity = self.resolve_tower(tower)?;
        let refund = self
            .world
            .get::<&Tower>(entity)
            .map(|t| t.sell_value)
            .map_err(|_| CommandError::NoEntityAtLocation)?;

        let _ = self.world.despawn(entity);
        self.grid.vacate(entity);
        self.stats.earn(refund);

        debug!(tower = tower.0, refund, "tower sold");
        self.events.push(GameEvent::TowerSold { tower, refund });
        Ok(TowerSold {
            tower,
            refund,
            gold_remaining: self.stats.gold,
        })
    }

    pub fn sell_tower_at(&mut self, x: f64, y: f64) -> Result<TowerSold, CommandError> {
        let tower = self
            .tower_at(x, y)
            .ok_or(CommandError::NoEntityAtLocation)?;
        self.sell_tower(tower)
    }

    fn resolve_tower(&self, tower: TowerId) -> Result<Entity, CommandError> {
        tower_entity(tower)
            .filter(|&entity| self.world.get::<&Tower>(entity).is_ok())
            .ok_or(CommandError::NoEntityAtLocation)
    }

    // --- Read-only accessors ---

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.clock.time()
    }

    pub fn speed(&self) -> u8 {
        self.clock.speed()
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn waves(&self) -> &WaveController {
        &self.waves
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn projectiles(&self) -> &Pool<Projectile> {
        &self.projectiles
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    // --- Test hooks ---

    /// Spawn an enemy directly (bypassing the wave controller).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        kind: rampart_core::enums::EnemyKind,
        position: Position,
        path_index: usize,
    ) -> Entity {
        let spec = self
            .config
            .enemy(kind)
            .cloned()
            .unwrap_or_else(|| self.config.enemies[0].clone());
        let entity = world_setup::spawn_enemy(&mut self.world, &spec, position, 1.0);
        if let Ok(mut enemy) = self.world.get::<&mut Enemy>(entity) {
            enemy.path_index = path_index;
        }
        entity
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn stats_mut(&mut self) -> &mut MatchStats {
        &mut self.stats
    }

    #[cfg(test)]
    pub fn waves_mut(&mut self) -> &mut WaveController {
        &mut self.waves
    }

    // --- Internals ---

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if self.phase == GamePhase::Setup {
                    self.phase = GamePhase::Active;
                    info!(
                        first_wave_in = self.waves.countdown,
                        gold = self.stats.gold,
                        lives = self.stats.lives,
                        "game started"
                    );
                }
            }
            PlayerCommand::StartNextWave => {
                if self.phase == GamePhase::Active && self.waves.phase == WavePhase::Idle {
                    systems::wave_spawner::start_wave(
                        &mut self.waves,
                        &self.config.waves,
                        &mut self.events,
                    );
                }
            }
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
            PlayerCommand::TogglePause => match self.phase {
                GamePhase::Active => self.pause(),
                GamePhase::Paused => self.resume(),
                _ => {}
            },
            PlayerCommand::SetSpeed { multiplier } => {
                let applied = self.clock.set_speed(multiplier);
                self.events.push(GameEvent::SpeedChanged {
                    multiplier: applied,
                });
            }
        }
    }

    fn pause(&mut self) {
        if self.phase == GamePhase::Active {
            self.phase = GamePhase::Paused;
            self.events.push(GameEvent::Paused);
        }
    }

    fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Active;
            self.events.push(GameEvent::Resumed);
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        // 1. Wave timers and spawning
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.waves,
            &self.config,
            &self.path,
            dt,
            &mut self.events,
        );
        // 2. Remove enemies flagged dead or at the end last tick
        systems::cleanup::run(
            &mut self.world,
            &mut self.stats,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 3. Defeat, independent of wave state
        if self.stats.lives == 0 {
            self.finish(GamePhase::Lost);
            return;
        }
        // 4. Path following and effect decay
        systems::movement::run(&mut self.world, &self.path, dt);
        // 5. Tower targeting and firing
        systems::targeting::run(
            &mut self.world,
            &mut self.projectiles,
            self.clock.time().elapsed_ms(),
            &mut self.candidates,
            &mut self.events,
        );
        // 6. Projectile flight and hits
        systems::projectiles::run(
            &mut self.world,
            &mut self.projectiles,
            &self.config,
            dt,
            &mut self.events,
        );
        // 7. Wave completion
        let live_enemies = self.world.query::<&Enemy>().iter().count();
        if let Some(done) = self.waves.try_complete(live_enemies, &self.config.waves) {
            self.stats.earn(done.bonus);
            let bonus_score = done.bonus as u64 * WAVE_BONUS_SCORE_FACTOR;
            self.stats.add_score(bonus_score);
            info!(wave = done.cleared, bonus = done.bonus, "wave completed");
            self.events.push(GameEvent::WaveCompleted {
                wave: done.cleared,
                bonus: done.bonus,
            });
            if done.victory {
                self.finish(GamePhase::Won);
                return;
            }
        }
        // 8. Next wave when the countdown runs out
        if self.waves.should_auto_start(&self.config.waves) {
            systems::wave_spawner::start_wave(
                &mut self.waves,
                &self.config.waves,
                &mut self.events,
            );
        }
    }

    fn finish(&mut self, phase: GamePhase) {
        self.phase = phase;
        let score = self.stats.score;
        match phase {
            GamePhase::Won => {
                info!(score, wave = self.waves.wave, "victory");
                self.events.push(GameEvent::Victory { score });
            }
            GamePhase::Lost => {
                info!(score, wave = self.waves.wave, "defeat");
                self.events.push(GameEvent::Defeat { score });
            }
            _ => {}
        }
    }
}
