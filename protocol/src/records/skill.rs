//! Skill descriptors supplied by the content collaborator

use serde::{Deserialize, Serialize};

fn default_area_multiplier() -> f64 {
    2.0
}

fn default_flat_base() -> u32 {
    25
}

fn default_true() -> bool {
    true
}

/// Opaque skill record: a cost plus a single-target or area configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDescriptor {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    /// Priority modifier contributed by this skill
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub target: SkillTarget,
    #[serde(default)]
    pub inflicts: Option<StatusInfliction>,
}

impl SkillDescriptor {
    pub fn single(name: impl Into<String>, cost: u32) -> Self {
        Self {
            name: name.into(),
            cost,
            priority: 0,
            target: SkillTarget::Single,
            inflicts: None,
        }
    }

    pub fn area(name: impl Into<String>, cost: u32, effect: AreaEffect) -> Self {
        Self {
            name: name.into(),
            cost,
            priority: 0,
            target: SkillTarget::Area(effect),
            inflicts: None,
        }
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn inflicting(mut self, status: impl Into<String>, duration: u32) -> Self {
        self.inflicts = Some(StatusInfliction {
            status: status.into(),
            duration,
        });
        self
    }

    pub fn is_area(&self) -> bool {
        matches!(self.target, SkillTarget::Area(_))
    }
}

/// What a skill hits
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SkillTarget {
    /// The opposing active combatant, using the skill damage formula
    #[default]
    Single,
    /// Every living member of the opposing side, with positional falloff
    Area(AreaEffect),
}

/// How area damage falls off between the primary target and the others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AreaPattern {
    /// Same reducer for every target
    Flat,
    /// Full damage on the primary target, heavy falloff on the rest
    Focused,
    /// Full damage on the primary target, a random lesser tier for the rest
    Decreasing,
}

impl AreaPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaPattern::Flat => "flat",
            AreaPattern::Focused => "focused",
            AreaPattern::Decreasing => "decreasing",
        }
    }
}

/// Area-effect configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaEffect {
    pub pattern: AreaPattern,
    #[serde(default = "default_area_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_flat_base")]
    pub flat_base: u32,
    /// Special hits use special defense instead of defense
    #[serde(default)]
    pub special: bool,
    /// Reducer for the flat pattern; the engine default applies when absent
    #[serde(default)]
    pub reducer: Option<f64>,
    /// Reserve members take reduced damage
    #[serde(default = "default_true")]
    pub reserve_protection: bool,
}

impl AreaEffect {
    pub fn new(pattern: AreaPattern) -> Self {
        Self {
            pattern,
            multiplier: default_area_multiplier(),
            flat_base: default_flat_base(),
            special: false,
            reducer: None,
            reserve_protection: true,
        }
    }

    pub fn ice_storm() -> Self {
        Self {
            pattern: AreaPattern::Flat,
            multiplier: 2.2,
            flat_base: 45,
            special: true,
            reducer: Some(0.6),
            reserve_protection: true,
        }
    }

    pub fn fire_burst() -> Self {
        Self {
            pattern: AreaPattern::Focused,
            multiplier: 2.5,
            flat_base: 50,
            special: true,
            reducer: None,
            reserve_protection: true,
        }
    }

    pub fn shock_wave() -> Self {
        Self {
            pattern: AreaPattern::Decreasing,
            multiplier: 2.0,
            flat_base: 35,
            special: false,
            reducer: None,
            reserve_protection: true,
        }
    }

    pub fn arrow_rain() -> Self {
        Self {
            pattern: AreaPattern::Flat,
            multiplier: 1.8,
            flat_base: 30,
            special: false,
            reducer: Some(0.7),
            reserve_protection: true,
        }
    }

    /// Look up a named preset
    pub fn preset(name: &str) -> Option<Self> {
        let normalized = name.to_lowercase().replace([' ', '-', '_'], "");

        match normalized.as_str() {
            "icestorm" => Some(Self::ice_storm()),
            "fireburst" => Some(Self::fire_burst()),
            "shockwave" => Some(Self::shock_wave()),
            "arrowrain" => Some(Self::arrow_rain()),
            _ => None,
        }
    }
}

/// Status effect a skill attaches to its primary target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfliction {
    pub status: String,
    pub duration: u32,
}
