//! Weighted-random action selection for AI-controlled combatants

use crate::error::{BattleError, Result};
use crate::rng::BattleRng;

/// Action kinds the selector chooses between, in walk order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiChoice {
    Attack,
    Skill,
    Defend,
    Meditate,
}

impl AiChoice {
    pub const ORDER: [AiChoice; 4] = [
        AiChoice::Attack,
        AiChoice::Skill,
        AiChoice::Defend,
        AiChoice::Meditate,
    ];
}

/// Base weights per action kind, roughly summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorProfile {
    pub attack: f64,
    pub skill: f64,
    pub defend: f64,
    pub meditate: f64,
}

impl BehaviorProfile {
    pub const fn new(attack: f64, skill: f64, defend: f64, meditate: f64) -> Self {
        Self {
            attack,
            skill,
            defend,
            meditate,
        }
    }

    pub const fn aggressive() -> Self {
        Self::new(0.7, 0.2, 0.1, 0.0)
    }

    pub const fn passive() -> Self {
        Self::new(0.3, 0.3, 0.4, 0.0)
    }

    pub const fn pack() -> Self {
        Self::new(0.5, 0.3, 0.2, 0.0)
    }

    pub const fn ambush() -> Self {
        Self::new(0.8, 0.15, 0.05, 0.0)
    }

    pub const fn guardian() -> Self {
        Self::new(0.4, 0.3, 0.3, 0.0)
    }

    pub const fn caster() -> Self {
        Self::new(0.2, 0.6, 0.2, 0.0)
    }

    pub const fn tank() -> Self {
        Self::new(0.3, 0.2, 0.5, 0.0)
    }

    /// Look up a preset by name; unknown names get the aggressive profile
    pub fn from_protocol(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "passive" => Self::passive(),
            "pack" => Self::pack(),
            "ambush" => Self::ambush(),
            "guardian" => Self::guardian(),
            "caster" => Self::caster(),
            "tank" => Self::tank(),
            _ => Self::aggressive(),
        }
    }

    pub fn weight(&self, choice: AiChoice) -> f64 {
        match choice {
            AiChoice::Attack => self.attack,
            AiChoice::Skill => self.skill,
            AiChoice::Defend => self.defend,
            AiChoice::Meditate => self.meditate,
        }
    }
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self::aggressive()
    }
}

/// Thresholds and weight shifts applied on top of a profile
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiTuning {
    /// Own health fraction below which the AI turns defensive
    pub low_health_threshold: f64,
    /// Opponent health fraction below which the AI presses the attack
    pub opponent_low_threshold: f64,
    /// Shift toward defend (and away from attack) at low health
    pub defensive_shift: (f64, f64, f64),
    /// Shift toward attack (and away from defend) when the opponent is low
    pub pressing_shift: (f64, f64, f64),
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            low_health_threshold: 0.3,
            opponent_low_threshold: 0.5,
            // (defend +, skill +, attack -)
            defensive_shift: (0.2, 0.1, 0.3),
            // (attack +, skill +, defend -)
            pressing_shift: (0.2, 0.1, 0.3),
        }
    }
}

impl AiTuning {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("ai.low_health_threshold", self.low_health_threshold),
            ("ai.opponent_low_threshold", self.opponent_low_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BattleError::InvalidConfig(format!("{name} must be in [0, 1]")));
            }
        }
        Ok(())
    }
}

/// Live battle facts the selector looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiContext {
    pub own_health_fraction: f64,
    pub opponent_health_fraction: f64,
    pub resource: u32,
    /// Cost of the skill the AI would use, if it has one
    pub skill_cost: Option<u32>,
}

impl AiContext {
    pub fn can_cast(&self) -> bool {
        self.skill_cost.is_some_and(|cost| self.resource >= cost)
    }
}

/// Profile weights after situational shifts, never negative
pub fn adjusted_weights(profile: &BehaviorProfile, ctx: &AiContext, tuning: &AiTuning) -> BehaviorProfile {
    let mut weights = *profile;

    if ctx.own_health_fraction < tuning.low_health_threshold {
        let (defend, skill, attack) = tuning.defensive_shift;
        weights.defend += defend;
        weights.skill += skill;
        weights.attack -= attack;
    }

    if ctx.opponent_health_fraction < tuning.opponent_low_threshold {
        let (attack, skill, defend) = tuning.pressing_shift;
        weights.attack += attack;
        weights.skill += skill;
        weights.defend -= defend;
    }

    weights.attack = weights.attack.max(0.0);
    weights.skill = weights.skill.max(0.0);
    weights.defend = weights.defend.max(0.0);
    weights.meditate = weights.meditate.max(0.0);

    weights
}

/// Weighted walk over [`AiChoice::ORDER`]; the first cumulative weight at or
/// above the draw wins, attack if none does
pub fn pick_weighted(weights: &BehaviorProfile, draw: f64) -> AiChoice {
    let mut cumulative = 0.0;
    for choice in AiChoice::ORDER {
        let weight = weights.weight(choice);
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if draw <= cumulative {
            return choice;
        }
    }
    AiChoice::Attack
}

/// Choose an action kind for an AI-controlled combatant
pub fn select_action(
    profile: &BehaviorProfile,
    ctx: &AiContext,
    tuning: &AiTuning,
    rng: &mut dyn BattleRng,
) -> AiChoice {
    let weights = adjusted_weights(profile, ctx, tuning);
    let choice = pick_weighted(&weights, rng.next_unit());

    match choice {
        AiChoice::Skill if !ctx.can_cast() => {
            tracing::debug!(resource = ctx.resource, "AI cannot afford a skill, attacking");
            AiChoice::Attack
        }
        other => other,
    }
}
