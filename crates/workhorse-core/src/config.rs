//! Simulation configuration - prices, rule set and the level catalog.
//!
//! The built-in level catalog is data-driven: it lives in
//! `data/levels.json` and is embedded at compile time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use workhorse_logic::level::LevelCatalog;
use workhorse_logic::registry::RuleSet;

use crate::error::ConfigError;

const BUILTIN_LEVELS_JSON: &str = include_str!("../../../data/levels.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Balance after a fresh level load or restart.
    pub starting_currency: i64,
    pub worker_price: i64,
    pub workspace_price: i64,
    pub reveal_cost: i64,
    pub fire_cost: i64,
    /// Share of the project reward paid when moving past a failed level.
    pub consolation_fraction: f64,
    pub rule_set: RuleSet,
    pub levels: LevelCatalog,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_currency: 50,
            worker_price: 20,
            workspace_price: 20,
            reveal_cost: 15,
            fire_cost: 40,
            consolation_fraction: 0.3,
            rule_set: RuleSet::Abilities,
            levels: builtin_levels(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for level in self.levels.levels() {
            if !seen.insert(level.id.as_str()) {
                return Err(ConfigError::DuplicateLevel(level.id.clone()));
            }
            if level.turn_limit == 0 {
                return Err(ConfigError::InvalidTurnLimit(level.id.clone()));
            }
        }
        if !(0.0..=1.0).contains(&self.consolation_fraction) {
            return Err(ConfigError::InvalidFraction(self.consolation_fraction));
        }
        Ok(())
    }

    /// Consolation reward for advancing past a failed level.
    pub fn consolation_reward(&self, project_reward: i64) -> i64 {
        (project_reward as f64 * self.consolation_fraction).round() as i64
    }
}

/// Parse a level catalog from JSON.
pub fn parse_levels(json: &str) -> Result<LevelCatalog, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// The catalog shipped in `data/levels.json`.
pub fn builtin_levels() -> LevelCatalog {
    match parse_levels(BUILTIN_LEVELS_JSON) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::warn!("Built-in level catalog failed to parse: {}", e);
            LevelCatalog::default()
        }
    }
}
