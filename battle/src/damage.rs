//! Damage and outcome formulas.
//!
//! Everything here is a pure function of its inputs plus the random source.
//! Nothing mutates a [`Combatant`]; callers apply the returned amounts.
//!
//! Single-target pipeline, in order:
//!
//! ```text
//! base (>= 1) -> variance (floor) -> critical (floor) -> class advantage (round)
//!     -> defending (floor) -> at least 1
//! ```

use skirmish_protocol::{AreaEffect, AreaPattern};

use crate::config::BattleConfig;
use crate::rng::BattleRng;
use crate::types::{Advantage, CombatClass, CombatStats, Combatant, Side, advantage};

/// Which single-target formula to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrikeKind {
    Basic,
    Skill,
}

/// Outcome of a critical-hit check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalRoll {
    pub critical: bool,
    pub chance: f64,
    pub multiplier: f64,
}

/// Result of a single-target hit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub damage: u32,
    pub critical: bool,
    pub advantage: Advantage,
    /// The defending reduction was applied
    pub defended: bool,
}

/// Result of one area-effect hit on one roster member
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaHit {
    pub member: usize,
    pub primary: bool,
    pub reserve: bool,
    pub reducer: f64,
    pub damage: u32,
    pub critical: bool,
}

/// attack - floor(defense * efficiency), at least 1
pub fn basic_attack_base(attacker: &CombatStats, defender: &CombatStats, config: &BattleConfig) -> u32 {
    let mitigation = (defender.defense as f64 * config.defense_efficiency).floor() as i64;
    (attacker.attack as i64 - mitigation).max(1) as u32
}

/// floor(attack * multiplier) - floor(special defense * efficiency), at least 1
pub fn skill_base(attacker: &CombatStats, defender: &CombatStats, config: &BattleConfig) -> u32 {
    let raw = (attacker.attack as f64 * config.skill_multiplier).floor() as i64;
    let mitigation =
        (defender.special_defense as f64 * config.special_defense_efficiency).floor() as i64;
    (raw - mitigation).max(1) as u32
}

/// Scale by a factor drawn uniformly from [1 - v/2, 1 + v/2]
pub fn apply_variance(damage: u32, variance: f64, rng: &mut dyn BattleRng) -> u32 {
    let factor = (1.0 - variance / 2.0) + rng.next_unit() * variance;
    (damage as f64 * factor).floor() as u32
}

/// Chance is the critical factor times the base rate, capped
pub fn roll_critical(
    critical_factor: f64,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> CriticalRoll {
    let chance = (critical_factor * config.critical_base_chance).min(config.max_critical_chance);
    let critical = rng.roll(chance);

    CriticalRoll {
        critical,
        chance,
        multiplier: if critical { critical_factor } else { 1.0 },
    }
}

/// Scale by an integer percentage, rounding to nearest with exact halves going down
fn scale_percent(value: u32, percent: u32) -> u32 {
    let scaled = value as u64 * percent as u64;
    ((scaled + 49) / 100) as u32
}

/// Apply the class-advantage bonus or reduction
pub fn apply_class_advantage(
    damage: u32,
    attacker: CombatClass,
    defender: CombatClass,
    config: &BattleConfig,
) -> (u32, Advantage) {
    let adv = advantage(attacker, defender);
    let damage = match adv {
        Advantage::Attacker => scale_percent(damage, config.advantage_bonus_percent),
        Advantage::Defender => scale_percent(damage, config.advantage_reduction_percent),
        Advantage::Neutral => damage,
    };
    (damage, adv)
}

pub fn apply_defending(damage: u32, config: &BattleConfig) -> u32 {
    (damage as f64 * config.defending_reduction).floor() as u32
}

/// Full single-target pipeline for a basic attack or skill
pub fn strike(
    attacker: &Combatant,
    defender: &Combatant,
    kind: StrikeKind,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Hit {
    let base = match kind {
        StrikeKind::Basic => basic_attack_base(&attacker.stats, &defender.stats, config),
        StrikeKind::Skill => skill_base(&attacker.stats, &defender.stats, config),
    };

    let mut damage = apply_variance(base, config.damage_variance, rng);

    let crit = roll_critical(attacker.stats.critical_factor, config, rng);
    if crit.critical {
        damage = (damage as f64 * crit.multiplier).floor() as u32;
    }

    let (mut damage, adv) = apply_class_advantage(damage, attacker.class, defender.class, config);

    if defender.defending {
        damage = apply_defending(damage, config);
    }

    Hit {
        damage: damage.max(1),
        critical: crit.critical,
        advantage: adv,
        defended: defender.defending,
    }
}

/// (attack * multiplier + flat base) * 100 / (100 + defense or special defense)
pub fn area_base(attacker: &CombatStats, defender: &CombatStats, effect: &AreaEffect) -> f64 {
    let mitigation = if effect.special {
        defender.special_defense
    } else {
        defender.defense
    };
    (attacker.attack as f64 * effect.multiplier + effect.flat_base as f64)
        * (100.0 / (100.0 + mitigation as f64))
}

/// Positional reducer for one target
pub fn area_reducer(
    effect: &AreaEffect,
    primary: bool,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> f64 {
    match effect.pattern {
        AreaPattern::Flat => effect.reducer.unwrap_or(config.area.flat_reducer),
        AreaPattern::Focused if primary => 1.0,
        AreaPattern::Focused => config.area.focused_secondary,
        AreaPattern::Decreasing if primary => 1.0,
        AreaPattern::Decreasing => {
            let (near, far) = config.area.decreasing_tiers;
            if rng.coin_flip() { near } else { far }
        }
    }
}

/// One area hit against one member
pub fn area_hit(
    attacker: &Combatant,
    defender: &Combatant,
    member: usize,
    primary: bool,
    effect: &AreaEffect,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> AreaHit {
    let reducer = area_reducer(effect, primary, config, rng);
    let reduced = (area_base(&attacker.stats, &defender.stats, effect) * reducer).floor() as u32;

    let mut damage = apply_variance(reduced, config.damage_variance, rng);

    let crit = roll_critical(attacker.stats.critical_factor, config, rng);
    if crit.critical {
        damage = (damage as f64 * crit.multiplier).floor() as u32;
    }

    let reserve = !primary && effect.reserve_protection;
    if reserve {
        damage = (damage as f64 * config.area.reserve_factor).floor() as u32;
    }

    AreaHit {
        member,
        primary,
        reserve,
        reducer,
        damage: damage.max(1),
        critical: crit.critical,
    }
}

/// Area hits against every living member of a side, active member first
pub fn resolve_area(
    attacker: &Combatant,
    targets: &Side,
    effect: &AreaEffect,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<AreaHit> {
    let mut hits = Vec::with_capacity(targets.members.len());

    let active = targets.active_index;
    if targets.active().is_alive() {
        hits.push(area_hit(attacker, targets.active(), active, true, effect, config, rng));
    }

    for (idx, member) in targets.get_bench() {
        hits.push(area_hit(attacker, member, idx, false, effect, config, rng));
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use crate::types::SideId;
    use proptest::prelude::*;

    fn fighter(attack: u32, defense: u32) -> Combatant {
        let stats = CombatStats {
            attack,
            defense,
            special_defense: defense,
            ..CombatStats::default()
        };
        Combatant::new("Fighter", 200, stats)
    }

    #[test]
    fn test_basic_attack_with_class_advantage() {
        let config = BattleConfig::deterministic();
        let attacker = fighter(100, 10).with_class(CombatClass::Fighter);
        let defender = fighter(10, 50).with_class(CombatClass::Armsmaster);
        let mut rng = ScriptedRng::constant(0.5);

        assert_eq!(basic_attack_base(&attacker.stats, &defender.stats, &config), 65);

        let hit = strike(&attacker, &defender, StrikeKind::Basic, &config, &mut rng);
        assert_eq!(hit.damage, 71);
        assert_eq!(hit.advantage, Advantage::Attacker);
        assert!(!hit.critical);
    }

    #[test]
    fn test_class_disadvantage() {
        let config = BattleConfig::deterministic();
        let attacker = fighter(100, 10).with_class(CombatClass::Armsmaster);
        let defender = fighter(10, 50).with_class(CombatClass::Fighter);
        let mut rng = ScriptedRng::constant(0.5);

        let hit = strike(&attacker, &defender, StrikeKind::Basic, &config, &mut rng);
        assert_eq!(hit.damage, 58);
        assert_eq!(hit.advantage, Advantage::Defender);
    }

    #[test]
    fn test_class_advantage_exact_halves_round_down() {
        let config = BattleConfig::default();

        let (bonus, _) =
            apply_class_advantage(65, CombatClass::Fighter, CombatClass::Armsmaster, &config);
        let (small, _) =
            apply_class_advantage(5, CombatClass::Fighter, CombatClass::Armsmaster, &config);
        let (reduced, _) =
            apply_class_advantage(15, CombatClass::Armsmaster, CombatClass::Fighter, &config);

        assert_eq!((bonus, small, reduced), (71, 5, 13));
    }

    #[test]
    fn test_defending_halves_damage() {
        let config = BattleConfig::deterministic();
        let attacker = fighter(75, 10);
        let mut defender = fighter(10, 50);
        defender.defending = true;
        let mut rng = ScriptedRng::constant(0.5);

        let hit = strike(&attacker, &defender, StrikeKind::Basic, &config, &mut rng);
        assert_eq!(hit.damage, 20);
        assert!(hit.defended);
    }

    #[test]
    fn test_skill_base() {
        let config = BattleConfig::default();
        let attacker = fighter(41, 0);
        let mut defender = fighter(0, 0);
        defender.stats.special_defense = 21;

        // floor(41 * 1.5) - floor(21 * 0.5) = 61 - 10
        assert_eq!(skill_base(&attacker.stats, &defender.stats, &config), 51);
    }

    #[test]
    fn test_minimum_damage() {
        let config = BattleConfig::deterministic();
        let attacker = fighter(5, 0);
        let mut defender = fighter(0, 500);
        defender.defending = true;
        let mut rng = ScriptedRng::constant(0.0);

        assert_eq!(basic_attack_base(&attacker.stats, &defender.stats, &config), 1);
        let hit = strike(&attacker, &defender, StrikeKind::Basic, &config, &mut rng);
        assert_eq!(hit.damage, 1);
    }

    #[test]
    fn test_variance_bounds() {
        let mut low = ScriptedRng::constant(0.0);
        assert_eq!(apply_variance(100, 0.4, &mut low), 80);

        let mut mid = ScriptedRng::constant(0.5);
        assert_eq!(apply_variance(100, 0.4, &mut mid), 100);

        let mut off = ScriptedRng::constant(0.9);
        assert_eq!(apply_variance(100, 0.0, &mut off), 100);
    }

    #[test]
    fn test_critical_chance_capped() {
        let config = BattleConfig::default();

        let mut rng = ScriptedRng::constant(0.29);
        let roll = roll_critical(5.0, &config, &mut rng);
        assert_eq!(roll.chance, 0.3);
        assert!(roll.critical);
        assert_eq!(roll.multiplier, 5.0);

        let mut rng = ScriptedRng::constant(0.25);
        let roll = roll_critical(2.0, &config, &mut rng);
        assert!((roll.chance - 0.2).abs() < 1e-9);
        assert!(!roll.critical);
        assert_eq!(roll.multiplier, 1.0);
    }

    #[test]
    fn test_critical_hit_multiplies() {
        let config = BattleConfig {
            damage_variance: 0.0,
            ..BattleConfig::default()
        };
        let attacker = fighter(50, 0);
        let defender = fighter(0, 0);
        // variance draw, then a critical draw under the 0.2 chance
        let mut rng = ScriptedRng::new([0.5, 0.05]);

        let hit = strike(&attacker, &defender, StrikeKind::Basic, &config, &mut rng);
        assert!(hit.critical);
        assert_eq!(hit.damage, 100);
    }

    fn create_test_roster(defense: u32) -> Side {
        let members = ["Kael", "Mira", "Tor"]
            .into_iter()
            .map(|name| {
                let stats = CombatStats {
                    defense,
                    special_defense: defense,
                    ..CombatStats::default()
                };
                Combatant::new(name, 300, stats)
            })
            .collect();
        Side::roster(SideId::B, members).unwrap()
    }

    fn area_effect(pattern: AreaPattern) -> AreaEffect {
        AreaEffect {
            multiplier: 2.0,
            flat_base: 50,
            ..AreaEffect::new(pattern)
        }
    }

    #[test]
    fn test_area_base_formula() {
        let attacker = fighter(100, 0);
        let defender = fighter(0, 0);
        assert_eq!(
            area_base(&attacker.stats, &defender.stats, &area_effect(AreaPattern::Flat)),
            250.0
        );

        let mut special = area_effect(AreaPattern::Flat);
        special.special = true;
        let mut spirited = fighter(0, 0);
        spirited.stats.special_defense = 100;
        assert_eq!(area_base(&attacker.stats, &spirited.stats, &special), 125.0);
    }

    #[test]
    fn test_focused_area() {
        let config = BattleConfig::deterministic();
        let attacker = fighter(100, 0);
        let targets = create_test_roster(0);
        let mut rng = ScriptedRng::constant(0.5);

        let hits = resolve_area(&attacker, &targets, &area_effect(AreaPattern::Focused), &config, &mut rng);
        assert_eq!(hits.len(), 3);

        assert!(hits[0].primary);
        assert_eq!(hits[0].member, 0);
        assert_eq!(hits[0].damage, 250);

        // 250 * 0.4 = 100, then reserve protection 0.8
        assert!(hits[1].reserve);
        assert_eq!(hits[1].damage, 80);
        assert_eq!(hits[2].damage, 80);
    }

    #[test]
    fn test_flat_area_uses_default_reducer() {
        let config = BattleConfig::deterministic();
        let attacker = fighter(100, 0);
        let targets = create_test_roster(0);
        let mut rng = ScriptedRng::constant(0.5);

        let mut effect = area_effect(AreaPattern::Flat);
        effect.reserve_protection = false;
        let hits = resolve_area(&attacker, &targets, &effect, &config, &mut rng);

        assert!(hits.iter().all(|h| h.damage == 150));
        assert!(hits.iter().all(|h| h.reducer == 0.6));
    }

    #[test]
    fn test_decreasing_area_coin_flip() {
        let config = BattleConfig::deterministic();
        let attacker = fighter(100, 0);
        let targets = create_test_roster(0);
        // primary: variance, crit; each secondary: coin, variance, crit
        let mut rng = ScriptedRng::new([0.5, 0.5, 0.1, 0.5, 0.5, 0.9, 0.5, 0.5]);

        let hits = resolve_area(&attacker, &targets, &area_effect(AreaPattern::Decreasing), &config, &mut rng);
        assert_eq!(hits[0].damage, 250);
        assert_eq!(hits[1].reducer, 0.7);
        assert_eq!(hits[1].damage, 140);
        assert_eq!(hits[2].reducer, 0.4);
        assert_eq!(hits[2].damage, 80);
    }

    #[test]
    fn test_area_skips_fainted_and_starts_with_active() {
        let config = BattleConfig::deterministic();
        let attacker = fighter(100, 0);
        let mut targets = create_test_roster(0);
        targets.active_index = 2;
        targets.members[1].health = 0;
        let mut rng = ScriptedRng::constant(0.5);

        let hits = resolve_area(&attacker, &targets, &area_effect(AreaPattern::Focused), &config, &mut rng);
        let members: Vec<usize> = hits.iter().map(|h| h.member).collect();
        assert_eq!(members, vec![2, 0]);
        assert!(hits[0].primary);
    }

    proptest! {
        #[test]
        fn prop_strike_never_below_one(
            attack in 0u32..500,
            defense in 0u32..500,
            draw in 0.0f64..1.0,
            defending in any::<bool>(),
        ) {
            let config = BattleConfig::default();
            let attacker = fighter(attack, 0);
            let mut defender = fighter(0, defense);
            defender.defending = defending;
            let mut rng = ScriptedRng::constant(draw);

            let hit = strike(&attacker, &defender, StrikeKind::Basic, &config, &mut rng);
            prop_assert!(hit.damage >= 1);
        }

        #[test]
        fn prop_advantage_never_both(damage in 1u32..10_000) {
            let config = BattleConfig::default();
            for a in CombatClass::TRIANGLE {
                for b in CombatClass::TRIANGLE {
                    let (scaled, adv) = apply_class_advantage(damage, a, b, &config);
                    match adv {
                        Advantage::Attacker => prop_assert!(scaled >= damage),
                        Advantage::Defender => prop_assert!(scaled <= damage),
                        Advantage::Neutral => prop_assert_eq!(scaled, damage),
                    }
                }
            }
        }
    }
}
