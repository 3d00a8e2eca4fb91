//! Results returned by session operations

use crate::damage::{AreaHit, Hit};
use crate::resources::{MeditationOutcome, StatusTick};
use crate::types::{ActionTag, ActorRef, SideId, StatusKind};

use super::TurnPhase;

/// Why a queued action did not execute
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkipReason {
    /// The actor fainted, was swapped out or is incapacitated
    Ineligible,
    /// Execution raised an error, which was logged
    Failed(String),
    /// The battle ended before this action's turn came
    BattleEnded,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Ineligible => write!(f, "cannot act"),
            SkipReason::Failed(reason) => write!(f, "failed ({reason})"),
            SkipReason::BattleEnded => write!(f, "battle already over"),
        }
    }
}

/// What one queued action did
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ActionOutcome {
    /// Basic attack or single-target skill
    Strike {
        actor: ActorRef,
        target: ActorRef,
        skill: Option<String>,
        hit: Hit,
        target_defeated: bool,
        inflicted: Option<StatusKind>,
    },
    Area {
        actor: ActorRef,
        skill: String,
        target_side: SideId,
        hits: Vec<AreaHit>,
        /// Members reduced to zero health by this skill
        defeated: Vec<usize>,
    },
    Defend {
        actor: ActorRef,
    },
    Meditate {
        actor: ActorRef,
        outcome: MeditationOutcome,
    },
    EmergencyHeal {
        actor: ActorRef,
        restored: u32,
    },
    Swap {
        actor: ActorRef,
        to: usize,
    },
    Skipped {
        actor: ActorRef,
        action: ActionTag,
        reason: SkipReason,
    },
}

impl ActionOutcome {
    pub fn actor(&self) -> ActorRef {
        match self {
            ActionOutcome::Strike { actor, .. }
            | ActionOutcome::Area { actor, .. }
            | ActionOutcome::Defend { actor }
            | ActionOutcome::Meditate { actor, .. }
            | ActionOutcome::EmergencyHeal { actor, .. }
            | ActionOutcome::Swap { actor, .. }
            | ActionOutcome::Skipped { actor, .. } => *actor,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ActionOutcome::Skipped { .. })
    }

    /// Total damage dealt to opponents
    pub fn damage_dealt(&self) -> u32 {
        match self {
            ActionOutcome::Strike { hit, .. } => hit.damage,
            ActionOutcome::Area { hits, .. } => hits.iter().map(|h| h.damage).sum(),
            ActionOutcome::Defend { .. }
            | ActionOutcome::Meditate { .. }
            | ActionOutcome::EmergencyHeal { .. }
            | ActionOutcome::Swap { .. }
            | ActionOutcome::Skipped { .. } => 0,
        }
    }
}

/// Result of `declare_action`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    pub actor: ActorRef,
    pub action: ActionTag,
    pub declared_at: u64,
    /// Time between the turn opening and the declaration
    pub decision_millis: u64,
}

/// Result of `request_swap`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapOutcome {
    pub side: SideId,
    pub from: usize,
    pub to: usize,
    pub swaps_remaining: u32,
}

/// Status damage one combatant took at the end of a round
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusReport {
    pub target: ActorRef,
    pub tick: StatusTick,
}

/// Result of `resolve_turn`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    /// Per-action outcomes in execution order
    pub outcomes: Vec<ActionOutcome>,
    pub status: Vec<StatusReport>,
    pub phase: TurnPhase,
    pub round: u32,
    /// Side to act next, unset once the battle is over
    pub next_side: Option<SideId>,
    pub winner: Option<SideId>,
}

impl Resolution {
    pub fn is_terminal(&self) -> bool {
        self.phase == TurnPhase::Ended
    }
}

/// Result of `cancel_on_timeout`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeoutResolution {
    pub declaration: Declaration,
    pub resolution: Resolution,
}

/// Turn counters kept for the whole session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnStats {
    pub total_turns: u32,
    pub timeouts: u32,
    /// Decision time of every declared turn, in milliseconds
    pub decision_millis: Vec<u64>,
}

impl TurnStats {
    pub fn average_decision_millis(&self) -> Option<u64> {
        if self.decision_millis.is_empty() {
            return None;
        }
        Some(self.decision_millis.iter().sum::<u64>() / self.decision_millis.len() as u64)
    }
}

/// What the acting side can do right now
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnInfo {
    pub acting: SideId,
    pub round: u32,
    pub turn: u32,
    pub phase: TurnPhase,
    pub swaps_remaining: u32,
    /// The acting combatant is alive and not incapacitated
    pub can_act: bool,
    pub ai_controlled: bool,
    pub elapsed_millis: u64,
    /// Turn budget in time units
    pub time_budget: u32,
    pub available_actions: Vec<ActionTag>,
}
