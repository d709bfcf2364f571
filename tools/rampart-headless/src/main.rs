//! rampart-headless: plays a full match without a front end.
//!
//! A simple auto-builder places and upgrades towers along the path. The
//! match summary is printed to stdout as JSON; logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Play the stock balance with seed 7 at triple speed
//! cargo run -p rampart-headless -- run --seed 7 --speed 3
//!
//! # Play a custom match file
//! cargo run -p rampart-headless -- template > match.json
//! cargo run -p rampart-headless -- run --config match.json --budget-towers 12
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rampart_core::commands::PlayerCommand;
use rampart_core::enums::{GamePhase, TowerKind};
use rampart_core::events::GameEvent;
use rampart_core::state::GameStateSnapshot;
use rampart_core::types::{Position, TowerId};
use rampart_sim::{SimConfig, SimulationEngine};

/// Host frame length fed to `tick`.
const FRAME_SECS: f64 = 1.0 / 60.0;

/// Frames between auto-builder decisions.
const BUILD_EVERY_FRAMES: u64 = 30;

#[derive(Parser)]
#[command(name = "rampart-headless")]
#[command(about = "Headless tower-defense match runner")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match and print its summary
    Run {
        /// Match file (JSON seed plus game config)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed, overrides the match file
        #[arg(short, long)]
        seed: Option<u64>,

        /// Simulation speed multiplier (1-3)
        #[arg(long, default_value = "1")]
        speed: u8,

        /// Give up after this many host frames
        #[arg(long, default_value = "200000")]
        max_ticks: u64,

        /// Towers the auto-builder may place before it only upgrades
        #[arg(long, default_value = "8")]
        budget_towers: usize,
    },

    /// Print the default match file
    Template,
}

/// Result of one headless match.
#[derive(Debug, Serialize)]
struct MatchSummary {
    seed: u64,
    outcome: GamePhase,
    wave: u32,
    max_waves: u32,
    lives: u32,
    gold: u32,
    score: u64,
    towers: usize,
    kills: u32,
    leaks: u32,
    ticks: u64,
    simulated_secs: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Run {
            config,
            seed,
            speed,
            max_ticks,
            budget_towers,
        } => {
            let mut sim = match config {
                Some(path) => load_match(&path)?,
                None => SimConfig::default(),
            };
            if let Some(seed) = seed {
                sim.seed = seed;
            }
            let summary = play(sim, speed, max_ticks, budget_towers)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Template => {
            println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
        }
    }

    Ok(())
}

fn load_match(path: &Path) -> Result<SimConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading match file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing match file {}", path.display()))
}

fn play(sim: SimConfig, speed: u8, max_ticks: u64, budget_towers: usize) -> Result<MatchSummary> {
    let seed = sim.seed;
    let mut engine = SimulationEngine::new(sim).context("invalid game config")?;
    let mut builder = AutoBuilder::new(&engine, budget_towers);

    engine.queue_commands([
        PlayerCommand::StartGame,
        PlayerCommand::SetSpeed { multiplier: speed },
    ]);
    info!(seed, speed, "match started");

    let mut snap = engine.tick(0.0);
    let (mut kills, mut leaks) = (0, 0);
    for frame in 0..max_ticks {
        if frame % BUILD_EVERY_FRAMES == 0 {
            builder.act(&mut engine, &snap);
        }
        snap = engine.tick(FRAME_SECS);
        for event in &snap.events {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::EnemyLeaked { .. } => leaks += 1,
                GameEvent::WaveCompleted { wave, bonus } => {
                    info!(wave, bonus, lives = snap.stats.lives, "wave cleared");
                }
                _ => {}
            }
        }
        if snap.phase.is_terminal() {
            break;
        }
    }

    let time = engine.time();
    info!(outcome = ?snap.phase, ticks = time.tick, "match finished");
    Ok(MatchSummary {
        seed,
        outcome: snap.phase,
        wave: snap.wave.number.min(snap.wave.max_waves),
        max_waves: snap.wave.max_waves,
        lives: snap.stats.lives,
        gold: snap.stats.gold,
        score: snap.stats.score,
        towers: snap.towers.len(),
        kills,
        leaks,
        ticks: time.tick,
        simulated_secs: time.elapsed_secs,
    })
}

/// Places the strongest affordable tower on cells bordering the path,
/// nearest the path's midpoint first. Once the budget is spent it upgrades
/// the cheapest tower it can afford.
struct AutoBuilder {
    spots: Vec<Position>,
    budget: usize,
    placed: usize,
}

impl AutoBuilder {
    fn new(engine: &SimulationEngine, budget: usize) -> Self {
        let grid = engine.grid();
        let cs = engine.config().field.cell_size;
        let waypoints = engine.path().waypoints();
        let mid = waypoints
            .get(waypoints.len() / 2)
            .copied()
            .unwrap_or_default();

        let mut spots: Vec<Position> = grid
            .free_cells()
            .map(|cell| cell.center)
            .filter(|c| {
                [(0.0, cs), (0.0, -cs), (cs, 0.0), (-cs, 0.0)]
                    .iter()
                    .any(|(dx, dy)| grid.cell_at(c.x + dx, c.y + dy).is_some_and(|n| n.on_path))
            })
            .collect();
        spots.sort_by(|a, b| a.range_to(&mid).total_cmp(&b.range_to(&mid)));
        spots.reverse();

        debug!(candidates = spots.len(), budget, "auto-builder ready");
        Self {
            spots,
            budget,
            placed: 0,
        }
    }

    fn act(&mut self, engine: &mut SimulationEngine, snap: &GameStateSnapshot) {
        if self.placed < self.budget && self.try_place(engine) {
            return;
        }
        self.try_upgrade(engine, snap);
    }

    fn try_place(&mut self, engine: &mut SimulationEngine) -> bool {
        let gold = engine.stats().gold;
        let Some(kind) = best_affordable(engine, gold) else {
            return false;
        };
        // Spots are kept farthest-first so `pop` yields the nearest.
        while let Some(spot) = self.spots.pop() {
            match engine.place_tower(kind, spot.x, spot.y) {
                Ok(placed) => {
                    self.placed += 1;
                    debug!(
                        tower = placed.tower.0,
                        ?kind,
                        gold = placed.gold_remaining,
                        "auto-built"
                    );
                    return true;
                }
                Err(err) => debug!(%err, x = spot.x, y = spot.y, "spot skipped"),
            }
        }
        false
    }

    fn try_upgrade(&self, engine: &mut SimulationEngine, snap: &GameStateSnapshot) {
        let gold = engine.stats().gold;
        let cheapest: Option<TowerId> = snap
            .towers
            .iter()
            .filter(|t| t.upgrade_cost <= gold)
            .min_by_key(|t| t.upgrade_cost)
            .map(|t| t.id);
        if let Some(tower) = cheapest {
            if let Ok(up) = engine.upgrade_tower(tower) {
                debug!(
                    tower = tower.0,
                    level = up.level,
                    cost = up.cost,
                    "auto-upgraded"
                );
            }
        }
    }
}

fn best_affordable(engine: &SimulationEngine, gold: u32) -> Option<TowerKind> {
    engine
        .config()
        .towers
        .iter()
        .filter(|spec| spec.cost <= gold)
        .max_by_key(|spec| spec.cost)
        .map(|spec| spec.kind)
}
