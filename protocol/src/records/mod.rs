mod skill;
mod tests;

pub use skill::{AreaEffect, AreaPattern, SkillDescriptor, SkillTarget, StatusInfliction};

use crate::ParseError;
use serde::{Deserialize, Serialize};

/// Number of members in a team roster
pub const ROSTER_SIZE: usize = 3;

/// Character record supplied by the character-data collaborator.
///
/// Stats are optional at the record level; the engine decides which ones are
/// required and fills in documented defaults for the rest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombatantRecord {
    pub id: Option<String>,
    pub name: String,
    /// Class tag, matched case-insensitively by the engine
    pub class: Option<String>,
    #[serde(alias = "hp")]
    pub max_health: Option<u32>,
    pub attack: Option<u32>,
    pub defense: Option<u32>,
    pub special_defense: Option<u32>,
    pub speed: Option<u32>,
    pub critical: Option<f64>,
    #[serde(alias = "mana")]
    pub max_resource: Option<u32>,
    pub skills: Vec<SkillDescriptor>,
    /// Behavior profile name, present for AI-controlled combatants only
    pub ai_profile: Option<String>,
}

impl CombatantRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the three stats every combatant must carry
    pub fn with_core_stats(mut self, max_health: u32, attack: u32, defense: u32) -> Self {
        self.max_health = Some(max_health);
        self.attack = Some(attack);
        self.defense = Some(defense);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_resource(mut self, max_resource: u32) -> Self {
        self.max_resource = Some(max_resource);
        self
    }

    pub fn with_skill(mut self, skill: SkillDescriptor) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_ai_profile(mut self, profile: impl Into<String>) -> Self {
        self.ai_profile = Some(profile.into());
        self
    }

    /// Identity used in logs and snapshots, falling back to the name
    pub fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    fn check_name(&self) -> Result<(), ParseError> {
        if self.name.trim().is_empty() {
            return Err(ParseError::MissingField("name".into()));
        }
        Ok(())
    }
}

/// Parse a single combatant record from JSON
pub fn parse_combatant(json: &str) -> Result<CombatantRecord, ParseError> {
    let json = json.trim();
    if json.is_empty() {
        return Err(ParseError::EmptyRecord);
    }

    let record: CombatantRecord =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
    record.check_name()?;

    Ok(record)
}

/// Parse a team roster (a JSON array of exactly three combatant records)
pub fn parse_roster(json: &str) -> Result<Vec<CombatantRecord>, ParseError> {
    let json = json.trim();
    if json.is_empty() {
        return Err(ParseError::EmptyRecord);
    }

    let members: Vec<CombatantRecord> =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;

    if members.len() != ROSTER_SIZE {
        return Err(ParseError::RosterSize {
            expected: ROSTER_SIZE,
            actual: members.len(),
        });
    }

    for member in &members {
        member.check_name()?;
    }

    Ok(members)
}

/// Parse a skill descriptor from JSON
pub fn parse_skill(json: &str) -> Result<SkillDescriptor, ParseError> {
    let json = json.trim();
    if json.is_empty() {
        return Err(ParseError::EmptyRecord);
    }

    let skill: SkillDescriptor =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;

    if skill.name.trim().is_empty() {
        return Err(ParseError::MissingField("name".into()));
    }

    Ok(skill)
}
