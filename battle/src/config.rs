//! Battle configuration.
//!
//! Every numeric constant the engine uses lives here with its default.
//! Configs are supplied when a session starts and never change afterwards.

use crate::ai::AiTuning;
use crate::error::{BattleError, Result};

/// Action synthesized when the turn budget runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimeoutAction {
    #[default]
    Attack,
    Defend,
    Meditate,
}

/// Area-effect falloff tuning
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AreaTuning {
    /// Reducer used by the flat pattern when the skill doesn't carry its own
    pub flat_reducer: f64,
    /// Reducer for non-primary targets of the focused pattern
    pub focused_secondary: f64,
    /// Tiers the decreasing pattern picks between for non-primary targets.
    /// The pick is a coin flip per target, so two reserves can land on
    /// different tiers in the same hit.
    pub decreasing_tiers: (f64, f64),
    /// Multiplier applied to reserve members of a roster
    pub reserve_factor: f64,
}

impl Default for AreaTuning {
    fn default() -> Self {
        Self {
            flat_reducer: 0.6,
            focused_secondary: 0.4,
            decreasing_tiers: (0.7, 0.4),
            reserve_factor: 0.8,
        }
    }
}

/// Tunable constants for one battle session
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    // === Damage ===
    /// Width of the symmetric variance band around 1.0
    pub damage_variance: f64,
    pub defense_efficiency: f64,
    pub special_defense_efficiency: f64,
    pub skill_multiplier: f64,
    /// Multiplier on incoming single-target damage while defending
    pub defending_reduction: f64,
    pub max_critical_chance: f64,
    pub critical_base_chance: f64,
    /// Class advantage bonus, in percent of the incoming damage
    pub advantage_bonus_percent: u32,
    /// Class disadvantage, in percent of the incoming damage
    pub advantage_reduction_percent: u32,
    pub area: AreaTuning,

    // === Resources ===
    pub meditate_resource_range: (u32, u32),
    pub meditate_health_range: (u32, u32),
    pub meditate_health_chance: f64,
    /// Fraction of max health restored by an emergency heal without an amount
    pub emergency_heal_fraction: f64,
    /// Max resource for combatants whose record has none, indexed by side
    pub default_resource: [u32; 2],

    // === Turns ===
    /// Time budget per turn, in host time units
    pub turn_time_budget: u32,
    /// How long before expiry the warning fires, 0 disables it
    pub warning_lead: u32,
    pub max_swaps_per_turn: u32,
    pub timeout_action: TimeoutAction,

    pub ai: AiTuning,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            damage_variance: 0.4,
            defense_efficiency: 0.7,
            special_defense_efficiency: 0.5,
            skill_multiplier: 1.5,
            defending_reduction: 0.5,
            max_critical_chance: 0.3,
            critical_base_chance: 0.1,
            advantage_bonus_percent: 110,
            advantage_reduction_percent: 90,
            area: AreaTuning::default(),
            meditate_resource_range: (15, 25),
            meditate_health_range: (10, 15),
            meditate_health_chance: 0.3,
            emergency_heal_fraction: 0.3,
            default_resource: [50, 30],
            turn_time_budget: 20,
            warning_lead: 5,
            max_swaps_per_turn: 1,
            timeout_action: TimeoutAction::Attack,
            ai: AiTuning::default(),
        }
    }
}

impl BattleConfig {
    /// Config with variance and critical hits turned off
    pub fn deterministic() -> Self {
        Self {
            damage_variance: 0.0,
            max_critical_chance: 0.0,
            ..Self::default()
        }
    }

    /// Reject values the formulas can't work with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..2.0).contains(&self.damage_variance) {
            return Err(invalid("damage_variance must be in [0, 2)"));
        }

        let probabilities = [
            ("max_critical_chance", self.max_critical_chance),
            ("critical_base_chance", self.critical_base_chance),
            ("meditate_health_chance", self.meditate_health_chance),
            ("emergency_heal_fraction", self.emergency_heal_fraction),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(&format!("{name} must be in [0, 1]")));
            }
        }

        let factors = [
            ("defense_efficiency", self.defense_efficiency),
            ("special_defense_efficiency", self.special_defense_efficiency),
            ("skill_multiplier", self.skill_multiplier),
            ("defending_reduction", self.defending_reduction),
            ("area.flat_reducer", self.area.flat_reducer),
            ("area.focused_secondary", self.area.focused_secondary),
            ("area.reserve_factor", self.area.reserve_factor),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(&format!("{name} must be a non-negative number")));
            }
        }

        if self.meditate_resource_range.0 > self.meditate_resource_range.1 {
            return Err(invalid("meditate_resource_range is inverted"));
        }
        if self.meditate_health_range.0 > self.meditate_health_range.1 {
            return Err(invalid("meditate_health_range is inverted"));
        }
        if self.turn_time_budget == 0 {
            return Err(invalid("turn_time_budget must be positive"));
        }
        if self.warning_lead >= self.turn_time_budget {
            return Err(invalid("warning_lead must be shorter than turn_time_budget"));
        }

        self.ai.validate()
    }
}

fn invalid(reason: &str) -> BattleError {
    BattleError::InvalidConfig(reason.to_string())
}
