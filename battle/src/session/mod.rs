//! Battle session state machine.
//!
//! A [`BattleSession`] owns both sides and moves through
//!
//! ```text
//! AwaitingDeclaration -> Declared -> Processing -> AwaitingDeclaration | Ended
//! ```
//!
//! `Processing` only exists inside [`BattleSession::resolve_turn`]. Every
//! operation takes the session by exclusive reference and runs to completion.
//! Rejected calls leave the session untouched.

mod outcome;
mod resolve;
mod snapshot;

pub use outcome::{
    ActionOutcome, Declaration, Resolution, SkipReason, StatusReport, SwapOutcome,
    TimeoutResolution, TurnInfo, TurnStats,
};
pub use snapshot::{BattleSnapshot, CombatantSnapshot, SideSnapshot};

use std::sync::Arc;

use skirmish_protocol::{CombatantRecord, LogEntry, LogKind};

use crate::ai::{self, AiChoice, AiContext};
use crate::clock::{Clock, SystemClock};
use crate::config::{BattleConfig, TimeoutAction};
use crate::error::{BattleError, Result};
use crate::rng::BattleRng;
use crate::scheduler::{PriorityQueueEntry, PriorityScheduler};
use crate::types::{
    Action, ActionKind, ActionTag, ActorRef, Combatant, PriorityModifier, Side, SideId,
    StatusEffect,
};

/// Experience range for the winning side
pub const VICTORY_EXPERIENCE: (u32, u32) = (50, 100);

/// Experience range for the losing side
pub const DEFEAT_EXPERIENCE: (u32, u32) = (10, 30);

/// Turn life-cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TurnPhase {
    AwaitingDeclaration,
    Declared,
    Processing,
    Ended,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::AwaitingDeclaration => "awaiting-declaration",
            TurnPhase::Declared => "declared",
            TurnPhase::Processing => "processing",
            TurnPhase::Ended => "ended",
        }
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for one side of a new battle
#[derive(Debug, Clone, PartialEq)]
pub enum SideSetup {
    Solo(CombatantRecord),
    Roster(Vec<CombatantRecord>),
}

impl SideSetup {
    fn build(&self, id: SideId, default_resource: u32) -> Result<Side> {
        match self {
            SideSetup::Solo(record) => Ok(Side::solo(
                id,
                Combatant::from_record(record, default_resource)?,
            )),
            SideSetup::Roster(records) => {
                let members = records
                    .iter()
                    .map(|r| Combatant::from_record(r, default_resource))
                    .collect::<Result<Vec<_>>>()?;
                Side::roster(id, members)
            }
        }
    }
}

/// One battle between side A and side B
#[derive(Debug)]
pub struct BattleSession {
    config: BattleConfig,
    sides: [Side; 2],
    acting: SideId,
    round: u32,
    /// Turns opened so far, starting at 1
    turn: u32,
    phase: TurnPhase,
    scheduler: PriorityScheduler,
    declared: Option<Action>,
    log: Vec<LogEntry>,
    winner: Option<SideId>,
    clock: Arc<dyn Clock>,
    turn_started_at: u64,
    stats: TurnStats,
}

impl BattleSession {
    /// Start a battle from character records using the system clock
    pub fn start(side_a: SideSetup, side_b: SideSetup, config: BattleConfig) -> Result<Self> {
        Self::start_with_clock(side_a, side_b, config, Arc::new(SystemClock))
    }

    /// Start a battle from character records with an injected clock
    pub fn start_with_clock(
        side_a: SideSetup,
        side_b: SideSetup,
        config: BattleConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let a = side_a.build(SideId::A, config.default_resource[0])?;
        let b = side_b.build(SideId::B, config.default_resource[1])?;
        Self::from_sides(a, b, config, clock)
    }

    /// Start a battle from already-built sides, keeping their runtime state
    pub fn from_sides(
        mut side_a: Side,
        mut side_b: Side,
        config: BattleConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        for (side, expected) in [(&mut side_a, SideId::A), (&mut side_b, SideId::B)] {
            if side.id != expected {
                return Err(BattleError::InvalidRoster(format!(
                    "side {} supplied in slot {}",
                    side.id, expected
                )));
            }
            if side.is_defeated() {
                return Err(BattleError::InvalidRoster(format!(
                    "side {} has no living members",
                    side.id
                )));
            }
            for member in &mut side.members {
                member.clamp_to_max();
            }
            side.promote_next_alive();
            side.reset_turn_counters();
        }

        let now = clock.now_millis();
        let mut session = Self {
            config,
            sides: [side_a, side_b],
            acting: SideId::A,
            round: 1,
            turn: 1,
            phase: TurnPhase::AwaitingDeclaration,
            scheduler: PriorityScheduler::new(),
            declared: None,
            log: Vec::new(),
            winner: None,
            clock,
            turn_started_at: now,
            stats: TurnStats {
                total_turns: 1,
                ..TurnStats::default()
            },
        };

        let message = format!(
            "Battle started: {} vs {}",
            session.sides[0].active().name,
            session.sides[1].active().name
        );
        tracing::info!(
            side_a = %session.sides[0].active().name,
            side_b = %session.sides[1].active().name,
            "battle started"
        );
        session.push_log(LogKind::System, message);

        Ok(session)
    }

    // === Accessors ===

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn acting_side(&self) -> SideId {
        self.acting
    }

    pub fn winner(&self) -> Option<SideId> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::Ended
    }

    pub fn side(&self, id: SideId) -> &Side {
        &self.sides[id.index()]
    }

    pub fn sides(&self) -> impl Iterator<Item = &Side> {
        self.sides.iter()
    }

    /// Combatant currently fighting for the acting side
    pub fn acting_combatant(&self) -> &Combatant {
        self.side(self.acting).active()
    }

    pub fn member(&self, actor: ActorRef) -> Result<&Combatant> {
        self.side(actor.side)
            .member(actor.member)
            .ok_or(BattleError::UnknownMember {
                side: actor.side,
                member: actor.member,
            })
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Log entries appended after the first `from` entries
    pub fn log_since(&self, from: usize) -> &[LogEntry] {
        self.log.get(from..).unwrap_or(&[])
    }

    pub fn stats(&self) -> &TurnStats {
        &self.stats
    }

    pub fn declared_action(&self) -> Option<&Action> {
        self.declared.as_ref()
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::from(self)
    }

    /// The acting combatant has a behavior profile
    pub fn is_ai_turn(&self) -> bool {
        !self.is_over() && self.acting_combatant().is_ai_controlled()
    }

    /// Milliseconds since the current turn opened
    pub fn elapsed_millis(&self) -> u64 {
        self.clock.now_millis().saturating_sub(self.turn_started_at)
    }

    // === Operations ===

    /// Record the acting side's action for this turn
    pub fn declare_action(&mut self, kind: ActionKind) -> Result<Declaration> {
        self.declare_with_priority(kind, None)
    }

    /// Record an action whose base tier is replaced by `priority` when set
    pub fn declare_with_priority(
        &mut self,
        kind: ActionKind,
        priority: Option<i8>,
    ) -> Result<Declaration> {
        self.check_declarable(&kind)?;

        let now = self.clock.now_millis();
        let decision_millis = now.saturating_sub(self.turn_started_at);
        let actor = ActorRef::new(self.acting, self.side(self.acting).active_index);
        let tag = kind.tag();

        let message = format!("{} prepares {}", self.acting_combatant().name, tag);
        let mut action = Action::new(actor, kind, now);
        action.priority_override = priority;
        self.declared = Some(action);
        self.stats.decision_millis.push(decision_millis);
        self.phase = TurnPhase::Declared;
        self.push_log(LogKind::Action, message);

        tracing::debug!(actor = %actor, action = %tag, decision_millis, "action declared");

        Ok(Declaration {
            actor,
            action: tag,
            declared_at: now,
            decision_millis,
        })
    }

    /// Swap the acting roster's active member without using the turn
    pub fn request_swap(&mut self, from: usize, to: usize) -> Result<SwapOutcome> {
        self.expect_phase(TurnPhase::AwaitingDeclaration)?;

        let limit = self.config.max_swaps_per_turn;
        let side = &mut self.sides[self.acting.index()];
        side.swap(from, to, limit)?;

        let message = format!(
            "{} swaps out for {}",
            side.members[from].name, side.members[to].name
        );
        let outcome = SwapOutcome {
            side: self.acting,
            from,
            to,
            swaps_remaining: side.swaps_remaining(limit),
        };
        self.push_log(LogKind::Swap, message);

        tracing::debug!(side = %self.acting, from, to, "swap");
        Ok(outcome)
    }

    /// Resolve the declared action and close the turn
    pub fn resolve_turn(&mut self, rng: &mut dyn BattleRng) -> Result<Resolution> {
        self.expect_phase(TurnPhase::Declared)?;
        let Some(action) = self.declared.clone() else {
            return Err(BattleError::WrongPhase {
                expected: TurnPhase::Declared,
                actual: TurnPhase::AwaitingDeclaration,
            });
        };
        let (speed, modifiers) = {
            let actor = self.member(action.actor)?;
            (actor.stats.speed, actor.priority_modifiers.clone())
        };

        self.declared = None;
        self.phase = TurnPhase::Processing;
        let message = format!("Resolving turn {}", self.turn);
        self.push_log(LogKind::System, message);

        let mut queue = std::mem::take(&mut self.scheduler);
        queue.enqueue(action, speed, &modifiers);
        let outcomes = queue.drain(&mut resolve::Resolver::new(self, rng));
        self.scheduler = queue;

        let status = if self.winner.is_none() {
            self.end_of_turn()
        } else {
            Vec::new()
        };

        match self.winner {
            Some(winner) => self.finish(winner),
            None => self.advance_turn(),
        }

        Ok(Resolution {
            outcomes,
            status,
            phase: self.phase,
            round: self.round,
            next_side: (!self.is_over()).then_some(self.acting),
            winner: self.winner,
        })
    }

    /// Called by the turn timer when the budget runs out before a declaration
    pub fn cancel_on_timeout(&mut self, rng: &mut dyn BattleRng) -> Result<TimeoutResolution> {
        self.expect_phase(TurnPhase::AwaitingDeclaration)?;

        let kind = match self.config.timeout_action {
            TimeoutAction::Attack => ActionKind::attack(),
            TimeoutAction::Defend => ActionKind::Defend,
            TimeoutAction::Meditate => ActionKind::Meditate,
        };

        self.stats.timeouts += 1;
        let message = format!(
            "{} ran out of time, {} chosen automatically",
            self.acting_combatant().name,
            kind.tag()
        );
        self.push_log(LogKind::Timeout, message);
        tracing::warn!(side = %self.acting, round = self.round, "turn timed out");

        let declaration = self.declare_action(kind)?;
        let resolution = self.resolve_turn(rng)?;

        Ok(TimeoutResolution {
            declaration,
            resolution,
        })
    }

    /// Pick an action for an AI-controlled acting combatant
    pub fn choose_ai_action(&self, rng: &mut dyn BattleRng) -> Option<ActionKind> {
        if self.is_over() {
            return None;
        }
        let actor = self.acting_combatant();
        let profile = actor.ai_profile?;
        let opponent = self.side(self.acting.opponent()).active();
        let skill = actor.first_affordable_skill().cloned();

        let ctx = AiContext {
            own_health_fraction: actor.health_fraction(),
            opponent_health_fraction: opponent.health_fraction(),
            resource: actor.resource,
            skill_cost: skill.as_ref().map(|s| s.cost),
        };

        let kind = match ai::select_action(&profile, &ctx, &self.config.ai, rng) {
            AiChoice::Attack => ActionKind::attack(),
            AiChoice::Defend => ActionKind::Defend,
            AiChoice::Meditate => ActionKind::Meditate,
            AiChoice::Skill => skill.map(ActionKind::Skill).unwrap_or_else(ActionKind::attack),
        };
        Some(kind)
    }

    /// Would declaring this action succeed and the actor be able to carry it out?
    pub fn can_execute(&self, kind: &ActionKind) -> Result<()> {
        self.check_declarable(kind)?;
        let actor = self.acting_combatant();
        if !actor.can_act() {
            return Err(BattleError::ActorIneligible(ActorRef::new(
                self.acting,
                self.side(self.acting).active_index,
            )));
        }
        Ok(())
    }

    /// Snapshot of the current turn for a presentation layer
    pub fn turn_info(&self) -> TurnInfo {
        let side = self.side(self.acting);
        let actor = side.active();
        let limit = self.config.max_swaps_per_turn;
        let swaps_remaining = side.swaps_remaining(limit);

        let mut available_actions = Vec::new();
        if self.phase == TurnPhase::AwaitingDeclaration && actor.can_act() {
            available_actions.extend([
                ActionTag::Attack,
                ActionTag::QuickAttack,
                ActionTag::Defend,
                ActionTag::Meditate,
            ]);
            if actor.first_affordable_skill().is_some() {
                available_actions.push(ActionTag::Skill);
            }
            available_actions.push(ActionTag::EmergencyHeal);
            if swaps_remaining > 0 && side.get_bench().next().is_some() {
                available_actions.push(ActionTag::Swap);
            }
        }

        TurnInfo {
            acting: self.acting,
            round: self.round,
            turn: self.turn,
            phase: self.phase,
            swaps_remaining,
            can_act: actor.can_act(),
            ai_controlled: actor.is_ai_controlled(),
            elapsed_millis: self.elapsed_millis(),
            time_budget: self.config.turn_time_budget,
            available_actions,
        }
    }

    /// Execution order the declared action would get, including anything queued
    pub fn preview_order(&self) -> Vec<PriorityQueueEntry> {
        let mut queue = self.scheduler.clone();
        if let Some(action) = &self.declared {
            if let Ok(actor) = self.member(action.actor) {
                queue.enqueue(action.clone(), actor.stats.speed, &actor.priority_modifiers);
            }
        }
        queue.preview().to_vec()
    }

    /// Attach a persistent priority modifier to a combatant
    pub fn add_priority_modifier(&mut self, actor: ActorRef, modifier: PriorityModifier) -> Result<()> {
        self.expect_not_over()?;
        let name = modifier.name.clone();
        let combatant = self.member_mut(actor)?;
        combatant.priority_modifiers.retain(|m| m.name != name);
        combatant.priority_modifiers.push(modifier);
        Ok(())
    }

    /// Remove a priority modifier by name, returning whether it existed
    pub fn remove_priority_modifier(&mut self, actor: ActorRef, name: &str) -> Result<bool> {
        self.expect_not_over()?;
        let combatant = self.member_mut(actor)?;
        let before = combatant.priority_modifiers.len();
        combatant.priority_modifiers.retain(|m| m.name != name);
        Ok(combatant.priority_modifiers.len() != before)
    }

    /// Attach a status effect from outside the action flow
    pub fn inflict_status(&mut self, target: ActorRef, effect: StatusEffect) -> Result<()> {
        self.expect_not_over()?;
        let combatant = self.member_mut(target)?;
        if !combatant.is_alive() {
            return Err(BattleError::ActorIneligible(target));
        }
        let message = format!("{} is afflicted by {}", combatant.name, effect.kind);
        combatant.add_status(effect);
        self.push_log(LogKind::Status, message);
        Ok(())
    }

    /// Experience awarded to a side once the battle is over
    pub fn experience_reward(&self, side: SideId, rng: &mut dyn BattleRng) -> Option<u32> {
        let winner = self.winner?;
        let (min, max) = if winner == side {
            VICTORY_EXPERIENCE
        } else {
            DEFEAT_EXPERIENCE
        };
        Some(rng.range_inclusive(min, max))
    }

    // === Internals ===

    fn expect_phase(&self, expected: TurnPhase) -> Result<()> {
        if self.phase != expected {
            return Err(BattleError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn expect_not_over(&self) -> Result<()> {
        if self.is_over() {
            return Err(BattleError::WrongPhase {
                expected: TurnPhase::AwaitingDeclaration,
                actual: TurnPhase::Ended,
            });
        }
        Ok(())
    }

    fn check_declarable(&self, kind: &ActionKind) -> Result<()> {
        self.expect_phase(TurnPhase::AwaitingDeclaration)?;

        let actor = self.acting_combatant();
        match kind {
            ActionKind::Swap { .. } => Err(BattleError::UnsupportedAction(ActionTag::Swap)),
            ActionKind::Skill(skill) if !actor.can_afford(skill.cost) => {
                Err(BattleError::InsufficientResource {
                    required: skill.cost,
                    available: actor.resource,
                })
            }
            ActionKind::Attack { .. }
            | ActionKind::Defend
            | ActionKind::Meditate
            | ActionKind::Skill(_)
            | ActionKind::EmergencyHeal { .. } => Ok(()),
        }
    }

    fn member_mut(&mut self, actor: ActorRef) -> Result<&mut Combatant> {
        self.sides[actor.side.index()]
            .member_mut(actor.member)
            .ok_or(BattleError::UnknownMember {
                side: actor.side,
                member: actor.member,
            })
    }

    fn push_log(&mut self, kind: LogKind, message: impl Into<String>) {
        let entry = LogEntry::new(kind, message, self.clock.now_millis(), self.round);
        self.log.push(entry);
    }

    fn finish(&mut self, winner: SideId) {
        self.phase = TurnPhase::Ended;
        self.declared = None;

        let message = format!("{} wins the battle", self.side(winner).active().name);
        self.push_log(LogKind::System, message);
        tracing::info!(winner = %winner, round = self.round, turns = self.turn, "battle ended");
    }

    fn advance_turn(&mut self) {
        self.acting = self.acting.opponent();
        if self.acting == SideId::A {
            self.round += 1;
        }
        self.turn += 1;
        self.stats.total_turns += 1;
        self.turn_started_at = self.clock.now_millis();
        for side in &mut self.sides {
            side.reset_turn_counters();
        }
        self.phase = TurnPhase::AwaitingDeclaration;

        let message = format!("Turn {}: {} to act", self.turn, self.acting_combatant().name);
        self.push_log(LogKind::System, message);
    }
}
