//! Timed status effects

/// Status effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusKind {
    Poison,
    Burn,
    /// Deals no damage but prevents acting
    Stun,
}

impl StatusKind {
    /// Parse from a skill record's status tag
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "poison" | "psn" | "veneno" => Some(StatusKind::Poison),
            "burn" | "brn" | "queimadura" => Some(StatusKind::Burn),
            "stun" | "atordoado" => Some(StatusKind::Stun),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Poison => "Poison",
            StatusKind::Burn => "Burn",
            StatusKind::Stun => "Stun",
        }
    }

    /// Damage per tick as a percentage of max health
    pub fn damage_percent(&self) -> u32 {
        match self {
            StatusKind::Poison => 10,
            StatusKind::Burn => 8,
            StatusKind::Stun => 0,
        }
    }

    pub fn incapacitates(&self) -> bool {
        matches!(self, StatusKind::Stun)
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An active effect and the rounds it has left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining: u32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, duration: u32) -> Self {
        Self {
            kind,
            remaining: duration,
        }
    }

    /// Damage this effect deals per tick to a combatant with `max_health`
    pub fn tick_damage(&self, max_health: u32) -> u32 {
        max_health * self.kind.damage_percent() / 100
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}
