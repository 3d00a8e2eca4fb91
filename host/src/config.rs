use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skirmish_battle::{BattleConfig, BattleSession, SideSetup};

/// Settings for hosting sessions, usually read from a TOML file.
///
/// Every field is optional in the file; missing ones keep their defaults.
///
/// ```toml
/// time_unit_ms = 1000
/// seed = 42
///
/// [battle]
/// turn_time_budget = 30
/// max_swaps_per_turn = 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Rules handed to every session started from this config
    pub battle: BattleConfig,
    /// Length of one turn-budget unit in milliseconds
    pub time_unit_ms: u64,
    /// Seed for the session's random source; fresh entropy when absent
    pub seed: Option<u64>,
    /// Pause before an AI-controlled combatant acts, in milliseconds
    pub ai_think_ms: u64,
    /// Capacity of the command channel between handles and the actor
    pub command_buffer: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            time_unit_ms: 1000,
            seed: None,
            ai_think_ms: 0,
            command_buffer: 32,
        }
    }
}

impl HostConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: HostConfig = toml::from_str(source).context("Failed to parse host config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read host config {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("Invalid host config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.battle.validate().context("Invalid battle rules")?;
        if self.time_unit_ms == 0 {
            anyhow::bail!("time_unit_ms must be positive");
        }
        if self.command_buffer == 0 {
            anyhow::bail!("command_buffer must be positive");
        }
        Ok(())
    }

    /// Convert budget units into wall time
    pub fn units(&self, units: u32) -> Duration {
        Duration::from_millis(self.time_unit_ms.saturating_mul(units as u64))
    }

    pub fn ai_think(&self) -> Duration {
        Duration::from_millis(self.ai_think_ms)
    }

    /// Start a session with these rules
    pub fn start_session(&self, side_a: SideSetup, side_b: SideSetup) -> Result<BattleSession> {
        BattleSession::start(side_a, side_b, self.battle.clone()).context("Failed to start battle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_battle::TimeoutAction;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.time_unit_ms, 1000);
        assert_eq!(config.seed, None);
        assert_eq!(config.units(20), Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = HostConfig::from_toml_str(
            r#"
            time_unit_ms = 10
            seed = 7

            [battle]
            turn_time_budget = 30
            max_swaps_per_turn = 2
            timeout_action = "defend"
            "#,
        )
        .unwrap();

        assert_eq!(config.time_unit_ms, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.battle.turn_time_budget, 30);
        assert_eq!(config.battle.max_swaps_per_turn, 2);
        assert_eq!(config.battle.timeout_action, TimeoutAction::Defend);
        // Untouched rules keep their defaults
        assert_eq!(config.battle.damage_variance, BattleConfig::default().damage_variance);
        assert_eq!(config.units(30), Duration::from_millis(300));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let err = HostConfig::from_toml_str(
            r#"
            [battle]
            max_critical_chance = 1.5
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("max_critical_chance"));
    }

    #[test]
    fn test_zero_time_unit_rejected() {
        assert!(HostConfig::from_toml_str("time_unit_ms = 0").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = HostConfig::load("/nonexistent/skirmish.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read host config"));
    }
}
