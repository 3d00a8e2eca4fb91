//! Combatant runtime state

use skirmish_protocol::{CombatantRecord, SkillDescriptor};

use super::action::PriorityModifier;
use super::class::CombatClass;
use super::status::{StatusEffect, StatusKind};
use crate::ai::BehaviorProfile;
use crate::error::{BattleError, Result};

/// Speed assumed when a record doesn't carry one
pub const DEFAULT_SPEED: u32 = 50;

/// Critical factor assumed when a record doesn't carry one
pub const DEFAULT_CRITICAL: f64 = 2.0;

/// Base stats, fixed for the whole battle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub special_defense: u32,
    pub speed: u32,
    /// Critical damage multiplier, also scales the critical chance
    pub critical_factor: f64,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack: 10,
            defense: 10,
            special_defense: 10,
            speed: DEFAULT_SPEED,
            critical_factor: DEFAULT_CRITICAL,
        }
    }
}

/// One participant's state during battle
#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub class: CombatClass,
    pub stats: CombatStats,

    // === Health and resource ===
    pub max_health: u32,
    pub health: u32,
    pub max_resource: u32,
    pub resource: u32,

    // === Turn state ===
    /// Set by Defend, halves incoming single-target damage until cleared
    pub defending: bool,
    /// Active effects in application order
    pub status_effects: Vec<StatusEffect>,
    /// Persistent modifiers added to the priority of matching actions
    pub priority_modifiers: Vec<PriorityModifier>,

    pub skills: Vec<SkillDescriptor>,
    /// Present for AI-controlled combatants only
    pub ai_profile: Option<BehaviorProfile>,
}

impl Combatant {
    /// Create a combatant at full health and resource
    pub fn new(name: impl Into<String>, max_health: u32, stats: CombatStats) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            class: CombatClass::Unaligned,
            stats,
            max_health,
            health: max_health,
            max_resource: 0,
            resource: 0,
            defending: false,
            status_effects: Vec::new(),
            priority_modifiers: Vec::new(),
            skills: Vec::new(),
            ai_profile: None,
        }
    }

    /// Build from a character record, filling in defaults for optional stats
    pub fn from_record(record: &CombatantRecord, default_resource: u32) -> Result<Self> {
        let missing = |stat: &'static str| BattleError::MissingStat {
            name: record.name.clone(),
            stat,
        };

        let max_health = record.max_health.ok_or_else(|| missing("max_health"))?;
        if max_health == 0 {
            return Err(missing("max_health"));
        }
        let attack = record.attack.ok_or_else(|| missing("attack"))?;
        let defense = record.defense.ok_or_else(|| missing("defense"))?;

        let stats = CombatStats {
            attack,
            defense,
            special_defense: record.special_defense.unwrap_or(defense),
            speed: record.speed.unwrap_or(DEFAULT_SPEED),
            critical_factor: record
                .critical
                .filter(|c| c.is_finite() && *c >= 1.0)
                .unwrap_or(DEFAULT_CRITICAL),
        };

        let max_resource = record.max_resource.unwrap_or(default_resource);

        Ok(Self {
            id: record.identity().to_string(),
            name: record.name.clone(),
            class: record
                .class
                .as_deref()
                .map(CombatClass::from_protocol)
                .unwrap_or_default(),
            stats,
            max_health,
            health: max_health,
            max_resource,
            resource: max_resource,
            defending: false,
            status_effects: Vec::new(),
            priority_modifiers: Vec::new(),
            skills: record.skills.clone(),
            ai_profile: record
                .ai_profile
                .as_deref()
                .map(BehaviorProfile::from_protocol),
        })
    }

    pub fn with_class(mut self, class: CombatClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_resource(mut self, max_resource: u32) -> Self {
        self.max_resource = max_resource;
        self.resource = max_resource;
        self
    }

    pub fn with_skill(mut self, skill: SkillDescriptor) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_ai(mut self, profile: BehaviorProfile) -> Self {
        self.ai_profile = Some(profile);
        self
    }

    /// Pull health and resource back within their maxima
    pub fn clamp_to_max(&mut self) {
        self.health = self.health.min(self.max_health);
        self.resource = self.resource.min(self.max_resource);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_incapacitated(&self) -> bool {
        self.status_effects.iter().any(|e| e.kind.incapacitates())
    }

    /// Alive and not incapacitated
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.is_incapacitated()
    }

    pub fn is_ai_controlled(&self) -> bool {
        self.ai_profile.is_some()
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    /// Health as a rounded percentage
    pub fn health_percent(&self) -> u32 {
        (self.health_fraction() * 100.0).round() as u32
    }

    /// Subtract damage, returning the amount actually removed
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Add health up to the maximum, returning the amount actually restored
    pub fn restore_health(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_health.saturating_sub(self.health));
        self.health += restored;
        restored
    }

    /// Add resource up to the maximum, returning the amount actually restored
    pub fn restore_resource(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_resource.saturating_sub(self.resource));
        self.resource += restored;
        restored
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.resource >= cost
    }

    pub fn spend_resource(&mut self, cost: u32) -> Result<()> {
        if !self.can_afford(cost) {
            return Err(BattleError::InsufficientResource {
                required: cost,
                available: self.resource,
            });
        }
        self.resource -= cost;
        Ok(())
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.status_effects.iter().any(|e| e.kind == kind)
    }

    /// Attach an effect; an existing effect of the same kind is refreshed in place
    pub fn add_status(&mut self, effect: StatusEffect) {
        if effect.remaining == 0 {
            return;
        }
        match self.status_effects.iter_mut().find(|e| e.kind == effect.kind) {
            Some(existing) => existing.remaining = existing.remaining.max(effect.remaining),
            None => self.status_effects.push(effect),
        }
    }

    pub fn remove_status(&mut self, kind: StatusKind) -> bool {
        let before = self.status_effects.len();
        self.status_effects.retain(|e| e.kind != kind);
        self.status_effects.len() != before
    }

    /// First skill in the loadout the combatant can pay for
    pub fn first_affordable_skill(&self) -> Option<&SkillDescriptor> {
        self.skills.iter().find(|s| self.can_afford(s.cost))
    }

    pub fn find_skill(&self, name: &str) -> Option<&SkillDescriptor> {
        self.skills.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::BehaviorProfile;

    fn create_test_combatant() -> Combatant {
        Combatant::new("Kael", 100, CombatStats::default()).with_resource(50)
    }

    #[test]
    fn test_from_record_defaults() {
        let record = CombatantRecord::new("Mira")
            .with_core_stats(80, 30, 12)
            .with_class("arcano");
        let combatant = Combatant::from_record(&record, 50).unwrap();

        assert_eq!(combatant.id, "Mira");
        assert_eq!(combatant.class, CombatClass::Arcanist);
        assert_eq!(combatant.health, 80);
        assert_eq!(combatant.stats.special_defense, 12);
        assert_eq!(combatant.stats.speed, DEFAULT_SPEED);
        assert_eq!(combatant.stats.critical_factor, DEFAULT_CRITICAL);
        assert_eq!(combatant.max_resource, 50);
        assert_eq!(combatant.resource, 50);
        assert!(!combatant.defending);
        assert!(combatant.status_effects.is_empty());
        assert!(combatant.ai_profile.is_none());
    }

    #[test]
    fn test_from_record_missing_stat() {
        let mut record = CombatantRecord::new("Broken").with_core_stats(80, 30, 12);
        record.attack = None;

        let result = Combatant::from_record(&record, 50);
        assert!(matches!(
            result,
            Err(BattleError::MissingStat { stat: "attack", .. })
        ));
    }

    #[test]
    fn test_from_record_ai_profile() {
        let record = CombatantRecord::new("Wolf")
            .with_core_stats(60, 20, 8)
            .with_ai_profile("pack");
        let combatant = Combatant::from_record(&record, 30).unwrap();

        assert_eq!(combatant.ai_profile, Some(BehaviorProfile::pack()));
        assert_eq!(combatant.max_resource, 30);
        assert!(combatant.is_ai_controlled());
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut combatant = create_test_combatant();

        assert_eq!(combatant.take_damage(30), 30);
        assert_eq!(combatant.health, 70);
        assert_eq!(combatant.take_damage(500), 70);
        assert_eq!(combatant.health, 0);
        assert!(!combatant.is_alive());

        assert_eq!(combatant.restore_health(250), 100);
        assert_eq!(combatant.health, 100);
    }

    #[test]
    fn test_restore_when_over_max() {
        let mut c = Combatant::new("Ayla", 100, CombatStats::default()).with_resource(50);
        c.health = 150;
        c.resource = 70;

        assert_eq!(c.restore_health(20), 0);
        assert_eq!(c.restore_resource(20), 0);

        c.clamp_to_max();
        assert_eq!((c.health, c.resource), (100, 50));
    }

    #[test]
    fn test_spend_resource() {
        let mut combatant = create_test_combatant();

        assert!(combatant.spend_resource(20).is_ok());
        assert_eq!(combatant.resource, 30);

        let result = combatant.spend_resource(40);
        assert!(matches!(
            result,
            Err(BattleError::InsufficientResource {
                required: 40,
                available: 30
            })
        ));
        assert_eq!(combatant.resource, 30);

        assert_eq!(combatant.restore_resource(100), 20);
        assert_eq!(combatant.resource, 50);
    }

    #[test]
    fn test_status_refresh_keeps_order() {
        let mut combatant = create_test_combatant();
        combatant.add_status(StatusEffect::new(StatusKind::Poison, 2));
        combatant.add_status(StatusEffect::new(StatusKind::Burn, 3));
        combatant.add_status(StatusEffect::new(StatusKind::Poison, 4));

        assert_eq!(combatant.status_effects.len(), 2);
        assert_eq!(combatant.status_effects[0].kind, StatusKind::Poison);
        assert_eq!(combatant.status_effects[0].remaining, 4);

        assert!(combatant.remove_status(StatusKind::Poison));
        assert!(!combatant.has_status(StatusKind::Poison));
        assert!(combatant.has_status(StatusKind::Burn));
    }

    #[test]
    fn test_stun_incapacitates() {
        let mut combatant = create_test_combatant();
        assert!(combatant.can_act());

        combatant.add_status(StatusEffect::new(StatusKind::Stun, 1));
        assert!(combatant.is_alive());
        assert!(!combatant.can_act());
    }

    #[test]
    fn test_first_affordable_skill() {
        let combatant = create_test_combatant()
            .with_skill(SkillDescriptor::single("Meteor", 80))
            .with_skill(SkillDescriptor::single("Spark", 10));

        assert_eq!(combatant.first_affordable_skill().unwrap().name, "Spark");
        assert!(combatant.find_skill("meteor").is_some());
    }

    #[test]
    fn test_health_percent() {
        let mut combatant = create_test_combatant();
        combatant.take_damage(33);
        assert_eq!(combatant.health_percent(), 67);
    }
}
