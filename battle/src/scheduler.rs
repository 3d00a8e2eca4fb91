//! Priority-ordered action queue.
//!
//! Entries are ordered by final priority (high first), then the actor's speed
//! at enqueue time (high first), then declaration time and enqueue order
//! (early first). Draining re-checks each actor right before it acts.

use std::cmp::Ordering;

use crate::error::Result;
use crate::session::{ActionOutcome, SkipReason};
use crate::types::{Action, ActionTag, ActorRef, MAX_PRIORITY, MIN_PRIORITY, PriorityModifier};

/// A queued action with its resolved ordering keys
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityQueueEntry {
    pub action: Action,
    /// Final priority, always within [MIN_PRIORITY, MAX_PRIORITY]
    pub priority: i8,
    /// Actor speed when the action was queued
    pub speed: u32,
    /// Enqueue order
    pub sequence: u64,
}

/// Runs queued actions against live battle state
pub trait ActionExecutor {
    /// The actor is alive and not incapacitated
    fn is_eligible(&self, actor: ActorRef) -> bool;

    /// Carry out one action
    fn execute(&mut self, entry: &PriorityQueueEntry) -> Result<ActionOutcome>;

    /// The battle reached a terminal state
    fn is_finished(&self) -> bool;

    /// Called for every entry that is discarded instead of executed
    fn on_skipped(&mut self, _entry: &PriorityQueueEntry, _reason: &SkipReason) {}
}

/// Base tier (or override), plus the action's own modifier, plus every
/// persistent modifier that applies to this action kind, clamped
pub fn final_priority(action: &Action, modifiers: &[PriorityModifier]) -> i8 {
    let tag = action.tag();
    let persistent: i32 = modifiers
        .iter()
        .filter(|m| m.applies(tag))
        .map(|m| m.value as i32)
        .sum();

    let total = action.base_priority() as i32 + action.kind.instance_modifier() as i32 + persistent;
    total.clamp(MIN_PRIORITY as i32, MAX_PRIORITY as i32) as i8
}

fn execution_order(a: &PriorityQueueEntry, b: &PriorityQueueEntry) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.speed.cmp(&a.speed))
        .then_with(|| a.action.submitted_at.cmp(&b.action.submitted_at))
        .then_with(|| a.sequence.cmp(&b.sequence))
}

/// Pending actions for the current resolution pass
#[derive(Debug, Clone, Default)]
pub struct PriorityScheduler {
    /// Kept sorted in execution order
    entries: Vec<PriorityQueueEntry>,
    next_sequence: u64,
}

impl PriorityScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action, returning its final priority
    pub fn enqueue(&mut self, action: Action, speed: u32, modifiers: &[PriorityModifier]) -> i8 {
        let priority = final_priority(&action, modifiers);
        let entry = PriorityQueueEntry {
            action,
            priority,
            speed,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;

        tracing::debug!(
            actor = %entry.action.actor,
            action = %entry.action.tag(),
            priority,
            speed,
            "action queued"
        );

        self.entries.push(entry);
        self.entries.sort_by(execution_order);
        priority
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Queued entries in the order they would execute
    pub fn preview(&self) -> &[PriorityQueueEntry] {
        &self.entries
    }

    /// Remove and return the next entry to execute
    pub fn pop_next(&mut self) -> Option<PriorityQueueEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Is anything queued above the given priority?
    pub fn has_higher_priority_than(&self, priority: i8) -> bool {
        self.entries.iter().any(|e| e.priority > priority)
    }

    pub fn count_of(&self, tag: ActionTag) -> usize {
        self.entries.iter().filter(|e| e.action.tag() == tag).count()
    }

    /// Drop every queued action of one actor, returning how many were removed
    pub fn remove_actor(&mut self, actor: ActorRef) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.action.actor != actor);
        before - self.entries.len()
    }

    /// Execute queued actions in order until the queue empties or the
    /// battle ends. Entries left after the battle ends are skipped.
    pub fn drain<E: ActionExecutor + ?Sized>(&mut self, executor: &mut E) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::with_capacity(self.entries.len());

        while let Some(entry) = self.pop_next() {
            if executor.is_finished() {
                outcomes.push(skip(executor, &entry, SkipReason::BattleEnded));
                continue;
            }

            if !executor.is_eligible(entry.action.actor) {
                tracing::debug!(actor = %entry.action.actor, "actor no longer eligible, skipping");
                outcomes.push(skip(executor, &entry, SkipReason::Ineligible));
                continue;
            }

            match executor.execute(&entry) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::warn!(
                        actor = %entry.action.actor,
                        action = %entry.action.tag(),
                        error = %e,
                        "action failed during resolution"
                    );
                    outcomes.push(skip(executor, &entry, SkipReason::Failed(e.to_string())));
                }
            }
        }

        outcomes
    }
}

fn skip<E: ActionExecutor + ?Sized>(
    executor: &mut E,
    entry: &PriorityQueueEntry,
    reason: SkipReason,
) -> ActionOutcome {
    executor.on_skipped(entry, &reason);
    ActionOutcome::Skipped {
        actor: entry.action.actor,
        action: entry.action.tag(),
        reason,
    }
}
