//! Meditation, emergency heals and status-effect ticking

use crate::config::BattleConfig;
use crate::rng::BattleRng;
use crate::types::{Combatant, StatusKind};

/// What a meditation restored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeditationOutcome {
    pub resource_restored: u32,
    pub health_restored: u32,
    /// The health roll succeeded, even if health was already full
    pub health_roll: bool,
}

/// Damage one effect dealt during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusDamage {
    pub kind: StatusKind,
    pub damage: u32,
    pub expired: bool,
}

/// Everything a combatant's status tick did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTick {
    pub effects: Vec<StatusDamage>,
    pub total_damage: u32,
    pub defeated: bool,
}

/// Restore resource, maybe health, and drop the defensive stance
pub fn meditate(
    combatant: &mut Combatant,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> MeditationOutcome {
    let (min, max) = config.meditate_resource_range;
    let resource_restored = combatant.restore_resource(rng.range_inclusive(min, max));

    let health_roll = rng.roll(config.meditate_health_chance);
    let health_restored = if health_roll {
        let (min, max) = config.meditate_health_range;
        combatant.restore_health(rng.range_inclusive(min, max))
    } else {
        0
    };

    combatant.defending = false;

    MeditationOutcome {
        resource_restored,
        health_restored,
        health_roll,
    }
}

/// Amount an emergency heal restores before clamping
pub fn emergency_heal_amount(combatant: &Combatant, amount: Option<u32>, config: &BattleConfig) -> u32 {
    amount.unwrap_or_else(|| {
        (combatant.max_health as f64 * config.emergency_heal_fraction).floor() as u32
    })
}

/// Heal, returning the amount actually restored
pub fn emergency_heal(combatant: &mut Combatant, amount: Option<u32>, config: &BattleConfig) -> u32 {
    let amount = emergency_heal_amount(combatant, amount, config);
    combatant.restore_health(amount)
}

/// Apply one round of every active effect, in stored order.
///
/// Each effect deals its damage, loses one round, and is dropped once it
/// reaches zero. A combatant already at zero health is left untouched.
pub fn tick_status(combatant: &mut Combatant) -> StatusTick {
    let mut tick = StatusTick::default();
    if !combatant.is_alive() {
        return tick;
    }

    let max_health = combatant.max_health;
    let mut dealt = Vec::with_capacity(combatant.status_effects.len());
    for effect in combatant.status_effects.iter_mut() {
        let damage = effect.tick_damage(max_health);
        effect.remaining = effect.remaining.saturating_sub(1);
        dealt.push(StatusDamage {
            kind: effect.kind,
            damage,
            expired: effect.is_expired(),
        });
    }
    combatant.status_effects.retain(|e| !e.is_expired());

    for entry in dealt {
        tick.total_damage += combatant.take_damage(entry.damage);
        tick.effects.push(entry);
    }
    tick.defeated = !combatant.is_alive();

    tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use crate::types::{CombatStats, StatusEffect};
    use proptest::prelude::*;

    fn create_test_combatant() -> Combatant {
        Combatant::new("Mira", 100, CombatStats::default()).with_resource(100)
    }

    #[test]
    fn test_meditate_with_health_roll() {
        let config = BattleConfig::default();
        let mut combatant = create_test_combatant();
        combatant.resource = 10;
        combatant.health = 50;
        combatant.defending = true;

        // resource draw, health chance, health draw
        let mut rng = ScriptedRng::new([0.5, 0.1, 0.0]);
        let outcome = meditate(&mut combatant, &config, &mut rng);

        assert!(outcome.health_roll);
        assert!((15..=25).contains(&outcome.resource_restored));
        assert_eq!(outcome.resource_restored, 20);
        assert!((10..=15).contains(&outcome.health_restored));
        assert_eq!(combatant.resource, 30);
        assert_eq!(combatant.health, 60);
        assert!(!combatant.defending);
    }

    #[test]
    fn test_meditate_without_health_roll() {
        let config = BattleConfig::default();
        let mut combatant = create_test_combatant();
        combatant.resource = 0;
        combatant.health = 50;

        let mut rng = ScriptedRng::new([0.0, 0.95]);
        let outcome = meditate(&mut combatant, &config, &mut rng);

        assert!(!outcome.health_roll);
        assert_eq!(outcome.resource_restored, 15);
        assert_eq!(outcome.health_restored, 0);
        assert_eq!(combatant.health, 50);
    }

    #[test]
    fn test_meditate_clamps_to_max() {
        let config = BattleConfig::default();
        let mut combatant = create_test_combatant();
        combatant.resource = 95;
        combatant.health = 98;

        let mut rng = ScriptedRng::new([0.99, 0.0, 0.99]);
        let outcome = meditate(&mut combatant, &config, &mut rng);

        assert_eq!(outcome.resource_restored, 5);
        assert_eq!(outcome.health_restored, 2);
        assert_eq!(combatant.resource, 100);
        assert_eq!(combatant.health, 100);
    }

    #[test]
    fn test_emergency_heal_default_fraction() {
        let config = BattleConfig::default();
        let mut combatant = create_test_combatant();
        combatant.health = 10;

        assert_eq!(emergency_heal(&mut combatant, None, &config), 30);
        assert_eq!(combatant.health, 40);

        assert_eq!(emergency_heal(&mut combatant, Some(500), &config), 60);
        assert_eq!(combatant.health, 100);
    }

    #[test]
    fn test_tick_poison_and_burn() {
        let mut combatant = create_test_combatant();
        combatant.add_status(StatusEffect::new(StatusKind::Poison, 2));
        combatant.add_status(StatusEffect::new(StatusKind::Burn, 1));

        let tick = tick_status(&mut combatant);
        assert_eq!(tick.total_damage, 18);
        assert_eq!(combatant.health, 82);
        assert_eq!(tick.effects[0].kind, StatusKind::Poison);
        assert!(!tick.effects[0].expired);
        assert!(tick.effects[1].expired);

        assert_eq!(combatant.status_effects.len(), 1);
        assert_eq!(combatant.status_effects[0].remaining, 1);

        let tick = tick_status(&mut combatant);
        assert_eq!(tick.total_damage, 10);
        assert!(combatant.status_effects.is_empty());
    }

    #[test]
    fn test_tick_preserves_order_of_survivors() {
        let mut combatant = create_test_combatant();
        combatant.add_status(StatusEffect::new(StatusKind::Burn, 3));
        combatant.add_status(StatusEffect::new(StatusKind::Stun, 1));
        combatant.add_status(StatusEffect::new(StatusKind::Poison, 3));

        tick_status(&mut combatant);
        let kinds: Vec<StatusKind> = combatant.status_effects.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![StatusKind::Burn, StatusKind::Poison]);
    }

    #[test]
    fn test_tick_can_defeat() {
        let mut combatant = create_test_combatant();
        combatant.health = 5;
        combatant.add_status(StatusEffect::new(StatusKind::Poison, 3));

        let tick = tick_status(&mut combatant);
        assert!(tick.defeated);
        assert_eq!(tick.total_damage, 5);
        assert_eq!(combatant.health, 0);

        let tick = tick_status(&mut combatant);
        assert!(tick.effects.is_empty());
    }

    proptest! {
        #[test]
        fn prop_meditate_stays_in_bounds(
            health in 0u32..=100,
            resource in 0u32..=100,
            draws in proptest::collection::vec(0.0f64..1.0, 3),
        ) {
            let config = BattleConfig::default();
            let mut combatant = create_test_combatant();
            combatant.health = health.max(1);
            combatant.resource = resource;
            let mut rng = ScriptedRng::new(draws);

            meditate(&mut combatant, &config, &mut rng);
            prop_assert!(combatant.health <= combatant.max_health);
            prop_assert!(combatant.resource <= combatant.max_resource);
        }
    }
}
