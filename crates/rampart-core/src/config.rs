//! Tuning catalogs consumed at engine construction.
//!
//! Everything here is static data: retuning a tower, an enemy or the wave
//! curve never touches simulation logic. `GameConfig::default()` is the stock
//! balance; any subset of fields can be overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::enums::{EnemyKind, TowerKind};
use crate::error::ConfigError;

/// Secondary effect a tower's projectiles apply to the enemy they hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HitEffect {
    /// Attach a timed speed multiplier to the hit enemy.
    Slow {
        multiplier: f64,
        duration_secs: f64,
    },
    /// Deal flat damage to up to `max_targets` other live enemies within
    /// `radius` of the hit enemy. Single hop.
    Chain {
        radius: f64,
        damage: u32,
        max_targets: usize,
    },
}

/// Base stats for one tower type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerSpec {
    pub kind: TowerKind,
    pub name: String,
    pub cost: u32,
    pub damage: f64,
    pub range: f64,
    /// Shots per second.
    pub fire_rate: f64,
    #[serde(default)]
    pub effect: Option<HitEffect>,
}

/// Base stats for one enemy archetype (before wave scaling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub kind: EnemyKind,
    pub name: String,
    pub health: u32,
    pub speed: f64,
    pub reward: u32,
}

/// Wave sizing, timing and scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Clearing this wave wins the match.
    pub max_waves: u32,
    pub base_count: u32,
    pub per_wave_increment: u32,
    /// An enemy is created once the spawn timer exceeds this.
    pub spawn_interval_secs: f64,
    /// Countdown between a cleared wave and the next one.
    pub inter_wave_delay_secs: f64,
    /// Countdown before the first wave after `StartGame`.
    pub initial_delay_secs: f64,
    /// Start the next wave when the countdown expires. When false, waves only
    /// start on an explicit `StartNextWave`.
    pub auto_start: bool,
    /// Health and reward grow by this fraction per wave after the first.
    pub scaling_per_wave: f64,
    pub bonus_base: u32,
    pub bonus_per_wave: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            max_waves: 20,
            base_count: 5,
            per_wave_increment: 2,
            spawn_interval_secs: 1.0,
            inter_wave_delay_secs: 15.0,
            initial_delay_secs: 1.0,
            auto_start: true,
            scaling_per_wave: 0.2,
            bonus_base: 20,
            bonus_per_wave: 5,
        }
    }
}

impl WaveConfig {
    /// Number of enemies created during `wave`.
    pub fn wave_size(&self, wave: u32) -> u32 {
        self.base_count
            .saturating_add(wave.saturating_mul(self.per_wave_increment))
    }

    /// Health/reward multiplier for enemies of `wave` (1-based).
    pub fn stat_multiplier(&self, wave: u32) -> f64 {
        1.0 + wave.saturating_sub(1) as f64 * self.scaling_per_wave
    }

    /// Gold granted when the wave counter advances to `new_wave`.
    pub fn completion_bonus(&self, new_wave: u32) -> u32 {
        self.bonus_base
            .saturating_add(new_wave.saturating_mul(self.bonus_per_wave))
    }
}

/// Starting resources and the tower price/upgrade curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_gold: u32,
    pub starting_lives: u32,
    /// Fraction of the catalog cost refunded by a level-1 sale.
    pub sell_ratio: f64,
    pub upgrade_cost_factor: f64,
    pub upgrade_damage_factor: f64,
    pub upgrade_range_factor: f64,
    pub upgrade_fire_rate_factor: f64,
    pub upgrade_sell_factor: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: 100,
            starting_lives: 20,
            sell_ratio: 0.7,
            upgrade_cost_factor: 0.6,
            upgrade_damage_factor: 1.3,
            upgrade_range_factor: 1.1,
            upgrade_fire_rate_factor: 1.2,
            upgrade_sell_factor: 1.4,
        }
    }
}

impl EconomyConfig {
    pub fn initial_sell_value(&self, cost: u32) -> u32 {
        (cost as f64 * self.sell_ratio).floor() as u32
    }

    /// Price of taking a tower from `level` to `level + 1`.
    pub fn upgrade_cost(&self, base_cost: u32, level: u32) -> u32 {
        let next = level.saturating_add(1) as f64;
        (base_cost as f64 * next * self.upgrade_cost_factor).floor() as u32
    }

    /// Sell value after one more upgrade. Always strictly greater than
    /// `current`, even where flooring would swallow the growth.
    pub fn upgraded_sell_value(&self, current: u32) -> u32 {
        let grown = (current as f64 * self.upgrade_sell_factor).floor() as u32;
        grown.max(current.saturating_add(1))
    }
}

/// Play-field layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub cols: usize,
    pub rows: usize,
    /// Cell edge length (px).
    pub cell_size: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 12,
            cell_size: 40.0,
        }
    }
}

/// Complete tuning for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub towers: Vec<TowerSpec>,
    pub enemies: Vec<EnemySpec>,
    pub waves: WaveConfig,
    pub economy: EconomyConfig,
    pub field: FieldConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            towers: default_towers(),
            enemies: default_enemies(),
            waves: WaveConfig::default(),
            economy: EconomyConfig::default(),
            field: FieldConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a JSON document and validate it. Missing sections fall back to
    /// the stock balance.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tower(&self, kind: TowerKind) -> Option<&TowerSpec> {
        self.towers.iter().find(|spec| spec.kind == kind)
    }

    pub fn enemy(&self, kind: EnemyKind) -> Option<&EnemySpec> {
        self.enemies.iter().find(|spec| spec.kind == kind)
    }

    /// Reject catalogs the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.towers.is_empty() {
            return Err(ConfigError::Invalid("tower catalog is empty".into()));
        }
        if self.enemies.is_empty() {
            return Err(ConfigError::Invalid("enemy catalog is empty".into()));
        }
        for (i, spec) in self.towers.iter().enumerate() {
            if self.towers[..i].iter().any(|other| other.kind == spec.kind) {
                return Err(ConfigError::Invalid(format!(
                    "tower {:?} listed twice",
                    spec.kind
                )));
            }
            if !(spec.fire_rate > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "tower {:?} needs a positive fire rate",
                    spec.kind
                )));
            }
            if !(spec.range > 0.0) || spec.damage < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "tower {:?} has invalid range or damage",
                    spec.kind
                )));
            }
        }
        for spec in &self.enemies {
            if spec.health == 0 || spec.speed < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "enemy {:?} has invalid health or speed",
                    spec.kind
                )));
            }
        }
        if self.waves.max_waves == 0 {
            return Err(ConfigError::Invalid("max_waves must be at least 1".into()));
        }
        if self.waves.spawn_interval_secs < 0.0 || self.waves.scaling_per_wave < 0.0 {
            return Err(ConfigError::Invalid(
                "wave timing and scaling must be non-negative".into(),
            ));
        }
        let eco = &self.economy;
        if eco.upgrade_damage_factor < 1.0
            || eco.upgrade_range_factor < 1.0
            || eco.upgrade_fire_rate_factor < 1.0
        {
            return Err(ConfigError::Invalid(
                "upgrade factors must not shrink tower stats".into(),
            ));
        }
        if self.field.cols < 2 || self.field.rows < 3 || !(self.field.cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "field {}x{} cannot hold a path",
                self.field.cols, self.field.rows
            )));
        }
        Ok(())
    }
}

fn default_towers() -> Vec<TowerSpec> {
    let tower = |kind, name: &str, cost, damage, range, fire_rate, effect| TowerSpec {
        kind,
        name: name.to_string(),
        cost,
        damage,
        range,
        fire_rate,
        effect,
    };
    vec![
        tower(
            TowerKind::Kinetic,
            "Kinetic Tower",
            15,
            8.0,
            100.0,
            1.5,
            None,
        ),
        tower(TowerKind::Plasma, "Plasma Tower", 25, 15.0, 80.0, 1.0, None),
        tower(
            TowerKind::Frost,
            "Frost Tower",
            20,
            5.0,
            70.0,
            0.8,
            Some(HitEffect::Slow {
                multiplier: 0.5,
                duration_secs: 2.0,
            }),
        ),
        tower(
            TowerKind::Lightning,
            "Lightning Tower",
            35,
            12.0,
            90.0,
            1.2,
            Some(HitEffect::Chain {
                radius: 60.0,
                damage: 8,
                max_targets: 3,
            }),
        ),
        tower(TowerKind::Nano, "Nano Tower", 30, 10.0, 60.0, 2.0, None),
        tower(
            TowerKind::Fusion,
            "Fusion Tower",
            50,
            25.0,
            120.0,
            0.6,
            None,
        ),
    ]
}

fn default_enemies() -> Vec<EnemySpec> {
    let enemy = |kind, name: &str, health, speed, reward| EnemySpec {
        kind,
        name: name.to_string(),
        health,
        speed,
        reward,
    };
    vec![
        enemy(EnemyKind::Scout, "Scout", 20, 2.5, 5),
        enemy(EnemyKind::Warrior, "Warrior", 40, 1.8, 10),
        enemy(EnemyKind::Tank, "Tank", 80, 1.2, 20),
        enemy(EnemyKind::Flyer, "Flyer", 30, 3.0, 15),
        enemy(EnemyKind::Boss, "Boss", 200, 0.8, 50),
    ]
}
