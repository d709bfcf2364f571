//! Match resources and the tower upgrade curve.
//!
//! Stored on the engine, NOT as ECS entities.

use rampart_core::components::Tower;
use rampart_core::config::EconomyConfig;
use rampart_core::error::CommandError;
use rampart_core::state::StatsView;

/// Gold, lives and score for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchStats {
    pub gold: u32,
    pub lives: u32,
    pub score: u64,
}

impl MatchStats {
    pub fn new(economy: &EconomyConfig) -> Self {
        Self {
            gold: economy.starting_gold,
            lives: economy.starting_lives,
            score: 0,
        }
    }

    /// Deduct `cost` gold, or report the shortfall and leave gold untouched.
    pub fn spend(&mut self, cost: u32) -> Result<u32, CommandError> {
        if self.gold < cost {
            return Err(CommandError::InsufficientFunds {
                required: cost,
                available: self.gold,
            });
        }
        self.gold -= cost;
        Ok(self.gold)
    }

    pub fn earn(&mut self, gold: u32) {
        self.gold = self.gold.saturating_add(gold);
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Remove one life; returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn view(&self) -> StatsView {
        StatsView {
            gold: self.gold,
            lives: self.lives,
            score: self.score,
        }
    }
}

/// Price of the tower's next level.
pub fn upgrade_quote(tower: &Tower, economy: &EconomyConfig) -> u32 {
    economy.upgrade_cost(tower.base_cost, tower.level)
}

/// Raise the tower one level in place. Kills, target and cooldown are kept.
pub fn apply_upgrade(tower: &mut Tower, economy: &EconomyConfig) {
    tower.level = tower.level.saturating_add(1);
    tower.damage *= economy.upgrade_damage_factor;
    tower.range *= economy.upgrade_range_factor;
    tower.fire_rate *= economy.upgrade_fire_rate_factor;
    tower.sell_value = economy.upgraded_sell_value(tower.sell_value);
}
