//! Action execution and end-of-turn bookkeeping

use skirmish_protocol::{AreaEffect, LogKind, SkillDescriptor, SkillTarget};

use super::{ActionOutcome, BattleSession, SkipReason, StatusReport};
use crate::damage::{self, StrikeKind};
use crate::error::Result;
use crate::resources;
use crate::rng::BattleRng;
use crate::scheduler::{ActionExecutor, PriorityQueueEntry};
use crate::types::{Action, ActionKind, ActorRef, SideId, StatusEffect, StatusKind};

/// Drives scheduler draining against a session
pub(super) struct Resolver<'a, 'r> {
    session: &'a mut BattleSession,
    rng: &'a mut (dyn BattleRng + 'r),
}

impl<'a, 'r> Resolver<'a, 'r> {
    pub(super) fn new(session: &'a mut BattleSession, rng: &'a mut (dyn BattleRng + 'r)) -> Self {
        Self { session, rng }
    }
}

impl ActionExecutor for Resolver<'_, '_> {
    fn is_eligible(&self, actor: ActorRef) -> bool {
        let side = self.session.side(actor.side);
        side.active_index == actor.member
            && side.member(actor.member).is_some_and(|c| c.can_act())
    }

    fn execute(&mut self, entry: &PriorityQueueEntry) -> Result<ActionOutcome> {
        self.session.execute_action(&entry.action, &mut *self.rng)
    }

    fn is_finished(&self) -> bool {
        self.session.winner.is_some()
    }

    fn on_skipped(&mut self, entry: &PriorityQueueEntry, reason: &SkipReason) {
        let name = self
            .session
            .member(entry.action.actor)
            .map(|c| c.name.clone())
            .unwrap_or_else(|_| entry.action.actor.to_string());
        let kind = match reason {
            SkipReason::Failed(_) => LogKind::Error,
            SkipReason::Ineligible | SkipReason::BattleEnded => LogKind::Action,
        };
        let message = format!("{} {} skipped: {}", name, entry.action.tag(), reason);
        self.session.push_log(kind, message);
    }
}

impl BattleSession {
    fn execute_action(&mut self, action: &Action, rng: &mut dyn BattleRng) -> Result<ActionOutcome> {
        let actor = action.actor;

        match &action.kind {
            ActionKind::Attack { .. } => self.execute_strike(actor, None, rng),

            ActionKind::Skill(skill) => {
                self.member_mut(actor)?.spend_resource(skill.cost)?;
                match &skill.target {
                    SkillTarget::Single => self.execute_strike(actor, Some(skill), rng),
                    SkillTarget::Area(effect) => self.execute_area(actor, skill, effect, rng),
                }
            }

            ActionKind::Defend => {
                let combatant = self.member_mut(actor)?;
                combatant.defending = true;
                let message = format!("{} takes a defensive stance", combatant.name);
                self.push_log(LogKind::Defend, message);
                Ok(ActionOutcome::Defend { actor })
            }

            ActionKind::Meditate => {
                let config = self.config.clone();
                let combatant = self.member_mut(actor)?;
                let outcome = resources::meditate(combatant, &config, rng);

                let mut message = format!(
                    "{} meditates and recovers {} resource",
                    combatant.name, outcome.resource_restored
                );
                if outcome.health_restored > 0 {
                    message.push_str(&format!(" and {} health", outcome.health_restored));
                }
                self.push_log(LogKind::Heal, message);
                Ok(ActionOutcome::Meditate { actor, outcome })
            }

            ActionKind::Swap { to } => {
                let limit = self.config.max_swaps_per_turn;
                let side = &mut self.sides[actor.side.index()];
                side.swap(actor.member, *to, limit)?;
                let message = format!(
                    "{} swaps out for {}",
                    side.members[actor.member].name, side.members[*to].name
                );
                self.push_log(LogKind::Swap, message);
                Ok(ActionOutcome::Swap { actor, to: *to })
            }

            ActionKind::EmergencyHeal { amount } => {
                let config = self.config.clone();
                let combatant = self.member_mut(actor)?;
                let restored = resources::emergency_heal(combatant, *amount, &config);
                let message = format!("{} recovers {} health", combatant.name, restored);
                self.push_log(LogKind::Heal, message);
                Ok(ActionOutcome::EmergencyHeal { actor, restored })
            }
        }
    }

    /// Basic attack, or a single-target skill when `skill` is set
    fn execute_strike(
        &mut self,
        actor: ActorRef,
        skill: Option<&SkillDescriptor>,
        rng: &mut dyn BattleRng,
    ) -> Result<ActionOutcome> {
        let target_side = actor.side.opponent();
        let target = ActorRef::new(target_side, self.side(target_side).active_index);
        let kind = if skill.is_some() {
            StrikeKind::Skill
        } else {
            StrikeKind::Basic
        };

        let (hit, attacker_name) = {
            let attacker = self.member(actor)?;
            let defender = self.member(target)?;
            (
                damage::strike(attacker, defender, kind, &self.config, rng),
                attacker.name.clone(),
            )
        };

        self.member_mut(actor)?.defending = false;

        let defender = self.member_mut(target)?;
        defender.take_damage(hit.damage);
        let defeated = !defender.is_alive();
        let defender_name = defender.name.clone();

        let inflicted = match skill {
            Some(skill) if !defeated => self.apply_infliction(target, skill)?,
            _ => None,
        };

        let mut message = match skill {
            Some(skill) => format!(
                "{} uses {} on {} for {} damage",
                attacker_name, skill.name, defender_name, hit.damage
            ),
            None => format!(
                "{} attacks {} for {} damage",
                attacker_name, defender_name, hit.damage
            ),
        };
        if hit.critical {
            message.push_str(" (critical)");
        }
        if hit.defended {
            message.push_str(" (defended)");
        }
        let kind = if skill.is_some() {
            LogKind::Skill
        } else {
            LogKind::Attack
        };
        self.push_log(kind, message);

        if defeated {
            self.push_log(LogKind::Damage, format!("{defender_name} is defeated"));
        }
        self.after_damage(target_side);

        Ok(ActionOutcome::Strike {
            actor,
            target,
            skill: skill.map(|s| s.name.clone()),
            hit,
            target_defeated: defeated,
            inflicted,
        })
    }

    fn execute_area(
        &mut self,
        actor: ActorRef,
        skill: &SkillDescriptor,
        effect: &AreaEffect,
        rng: &mut dyn BattleRng,
    ) -> Result<ActionOutcome> {
        let target_side = actor.side.opponent();

        let (hits, attacker_name) = {
            let attacker = self.member(actor)?;
            (
                damage::resolve_area(attacker, self.side(target_side), effect, &self.config, rng),
                attacker.name.clone(),
            )
        };

        self.member_mut(actor)?.defending = false;

        let mut defeated = Vec::new();
        for hit in &hits {
            let target = ActorRef::new(target_side, hit.member);
            let member = self.member_mut(target)?;
            member.take_damage(hit.damage);
            let name = member.name.clone();
            let fell = !member.is_alive();

            let mut message = format!("{} takes {} area damage", name, hit.damage);
            if hit.critical {
                message.push_str(" (critical)");
            }
            self.push_log(LogKind::Damage, message);

            if fell {
                defeated.push(hit.member);
                self.push_log(LogKind::Damage, format!("{name} is defeated"));
            } else if hit.primary {
                self.apply_infliction(target, skill)?;
            }
        }

        let total: u32 = hits.iter().map(|h| h.damage).sum();
        let message = format!(
            "{} unleashes {}: {} damage across {} targets",
            attacker_name,
            skill.name,
            total,
            hits.len()
        );
        self.push_log(LogKind::Skill, message);
        self.after_damage(target_side);

        Ok(ActionOutcome::Area {
            actor,
            skill: skill.name.clone(),
            target_side,
            hits,
            defeated,
        })
    }

    fn apply_infliction(&mut self, target: ActorRef, skill: &SkillDescriptor) -> Result<Option<StatusKind>> {
        let Some(infliction) = &skill.inflicts else {
            return Ok(None);
        };
        let Some(kind) = StatusKind::from_protocol(&infliction.status) else {
            tracing::warn!(
                skill = %skill.name,
                status = %infliction.status,
                "unknown status on skill, ignoring"
            );
            return Ok(None);
        };
        if infliction.duration == 0 {
            return Ok(None);
        }

        let combatant = self.member_mut(target)?;
        combatant.add_status(StatusEffect::new(kind, infliction.duration));
        let message = format!("{} is afflicted by {}", combatant.name, kind);
        self.push_log(LogKind::Status, message);
        Ok(Some(kind))
    }

    /// Settle a side after it took damage: record defeat or bring in a reserve
    fn after_damage(&mut self, side_id: SideId) {
        let side = &mut self.sides[side_id.index()];
        if side.is_defeated() {
            if self.winner.is_none() {
                self.winner = Some(side_id.opponent());
            }
            return;
        }

        if let Some(next) = side.promote_next_alive() {
            let message = format!("{} enters the battle", side.members[next].name);
            self.push_log(LogKind::Swap, message);
        }
    }

    /// Status ticks at the close of a round, then drop the defensive stance of
    /// the side about to act
    pub(super) fn end_of_turn(&mut self) -> Vec<StatusReport> {
        let mut reports = Vec::new();

        if self.acting == SideId::B {
            for side_id in SideId::BOTH {
                for member in 0..self.side(side_id).members.len() {
                    let combatant = &mut self.sides[side_id.index()].members[member];
                    if !combatant.is_alive() || combatant.status_effects.is_empty() {
                        continue;
                    }

                    let tick = resources::tick_status(combatant);
                    let name = combatant.name.clone();
                    for effect in &tick.effects {
                        if effect.damage > 0 {
                            let message =
                                format!("{} takes {} damage from {}", name, effect.damage, effect.kind);
                            self.push_log(LogKind::Status, message);
                        }
                        if effect.expired {
                            self.push_log(LogKind::Status, format!("{} wears off {}", effect.kind, name));
                        }
                    }
                    if tick.defeated {
                        self.push_log(LogKind::Damage, format!("{name} is defeated"));
                    }

                    reports.push(StatusReport {
                        target: ActorRef::new(side_id, member),
                        tick,
                    });
                }

                self.after_damage(side_id);
                if self.winner.is_some() {
                    return reports;
                }
            }
        }

        let next = self.acting.opponent();
        for member in &mut self.sides[next.index()].members {
            member.defending = false;
        }

        reports
    }
}
