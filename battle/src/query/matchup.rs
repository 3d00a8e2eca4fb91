//! Class matchup helpers

use crate::config::BattleConfig;
use crate::damage::{self, apply_class_advantage};
use crate::types::{Advantage, CombatClass, Combatant, Side, advantage};

/// Class matchup seen from the attacker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvantageInfo {
    pub attacker: CombatClass,
    pub defender: CombatClass,
    /// Advantage for the attacker's hits
    pub offense: Advantage,
    /// Advantage for the defender's hits back
    pub defense: Advantage,
    /// Damage percentage the attacker's hits receive
    pub modifier_percent: u32,
    pub text: String,
}

/// Describe the matchup in both directions
pub fn advantage_info(attacker: CombatClass, defender: CombatClass, config: &BattleConfig) -> AdvantageInfo {
    let offense = advantage(attacker, defender);
    let defense = advantage(defender, attacker);

    let modifier_percent = match offense {
        Advantage::Attacker => config.advantage_bonus_percent,
        Advantage::Defender => config.advantage_reduction_percent,
        Advantage::Neutral => 100,
    };

    let text = match offense {
        Advantage::Attacker => format!(
            "{} has the advantage over {} (+{}%)",
            attacker,
            defender,
            modifier_percent.saturating_sub(100)
        ),
        Advantage::Defender => format!(
            "{} is at a disadvantage against {} (-{}%)",
            attacker,
            defender,
            100u32.saturating_sub(modifier_percent)
        ),
        Advantage::Neutral => format!("{attacker} vs {defender} is neutral"),
    };

    AdvantageInfo {
        attacker,
        defender,
        offense,
        defense,
        modifier_percent,
        text,
    }
}

/// Basic-attack damage with no variance or critical hit, before the
/// defending stance
pub fn estimate_basic_damage(attacker: &Combatant, defender: &Combatant, config: &BattleConfig) -> u32 {
    let base = damage::basic_attack_base(&attacker.stats, &defender.stats, config);
    let (damage, _) = apply_class_advantage(base, attacker.class, defender.class, config);
    damage.max(1)
}

/// Does this class take boosted damage from the given class?
pub fn threatened_by(defender: CombatClass, attacker: CombatClass) -> bool {
    attacker.beats(defender)
}

/// Living reserve that fares best against an opposing class.
///
/// Prefers a reserve that beats the opponent, then one that is not beaten
/// by it; ties go to the lowest index. `None` when no reserve can fight.
pub fn best_swap_target(side: &Side, opponent: CombatClass) -> Option<usize> {
    side.get_bench()
        .map(|(idx, member)| {
            let score = match advantage(member.class, opponent) {
                Advantage::Attacker => 2,
                Advantage::Neutral => 1,
                Advantage::Defender => 0,
            };
            (idx, score)
        })
        .max_by(|(ia, sa), (ib, sb)| sa.cmp(sb).then_with(|| ib.cmp(ia)))
        .map(|(idx, _)| idx)
}
