//! One side of a battle: a solo combatant or a three-member roster

use skirmish_protocol::ROSTER_SIZE;

use super::combatant::Combatant;
use crate::error::{BattleError, Result};

/// Side identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SideId {
    A,
    B,
}

impl SideId {
    pub const BOTH: [SideId; 2] = [SideId::A, SideId::B];

    pub fn index(&self) -> usize {
        match self {
            SideId::A => 0,
            SideId::B => 1,
        }
    }

    pub fn opponent(&self) -> SideId {
        match self {
            SideId::A => SideId::B,
            SideId::B => SideId::A,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SideId::A => "A",
            SideId::B => "B",
        }
    }
}

impl std::fmt::Display for SideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Solo (1v1) or roster (3v3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Formation {
    Solo,
    Roster,
}

/// One side's combatants and per-turn counters
#[derive(Debug, Clone)]
pub struct Side {
    pub id: SideId,
    pub formation: Formation,

    /// Members in roster order; a solo side has exactly one
    pub members: Vec<Combatant>,

    /// Member currently in the fight
    pub active_index: usize,

    /// Swaps made during the current turn
    pub swaps_used: u32,
}

impl Side {
    pub fn solo(id: SideId, combatant: Combatant) -> Self {
        Self {
            id,
            formation: Formation::Solo,
            members: vec![combatant],
            active_index: 0,
            swaps_used: 0,
        }
    }

    /// Build a roster; it must have exactly three members
    pub fn roster(id: SideId, members: Vec<Combatant>) -> Result<Self> {
        if members.len() != ROSTER_SIZE {
            return Err(BattleError::InvalidRoster(format!(
                "side {} has {} members, expected {}",
                id,
                members.len(),
                ROSTER_SIZE
            )));
        }

        Ok(Self {
            id,
            formation: Formation::Roster,
            members,
            active_index: 0,
            swaps_used: 0,
        })
    }

    pub fn is_roster(&self) -> bool {
        self.formation == Formation::Roster
    }

    pub fn active(&self) -> &Combatant {
        &self.members[self.active_index]
    }

    pub fn active_mut(&mut self) -> &mut Combatant {
        &mut self.members[self.active_index]
    }

    pub fn member(&self, index: usize) -> Option<&Combatant> {
        self.members.get(index)
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.members.get_mut(index)
    }

    /// Iterate over reserves that can still fight
    pub fn get_bench(&self) -> impl Iterator<Item = (usize, &Combatant)> {
        let active = self.active_index;
        self.members
            .iter()
            .enumerate()
            .filter(move |(idx, c)| *idx != active && c.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.members.iter().filter(|c| c.is_alive()).count()
    }

    /// No living member remains
    pub fn is_defeated(&self) -> bool {
        self.members.iter().all(|c| !c.is_alive())
    }

    pub fn swaps_remaining(&self, limit: u32) -> u32 {
        if !self.is_roster() {
            return 0;
        }
        limit.saturating_sub(self.swaps_used)
    }

    /// Check a swap request without applying it
    pub fn validate_swap(&self, from: usize, to: usize, limit: u32) -> Result<()> {
        if !self.is_roster() {
            return Err(BattleError::SwapNotAllowed);
        }
        if self.swaps_used >= limit {
            return Err(BattleError::SwapBudgetExceeded { limit });
        }
        if from != self.active_index || to >= self.members.len() {
            return Err(BattleError::InvalidSwapTarget { from, to });
        }
        if to == self.active_index {
            return Err(BattleError::SwapTargetActive(to));
        }
        if !self.members[to].is_alive() {
            return Err(BattleError::SwapTargetFainted(to));
        }
        Ok(())
    }

    /// Apply a validated swap, consuming one unit of the swap budget
    pub fn swap(&mut self, from: usize, to: usize, limit: u32) -> Result<()> {
        self.validate_swap(from, to, limit)?;
        self.set_active(to);
        self.swaps_used += 1;
        Ok(())
    }

    /// Replace a fallen active member with the first living reserve.
    ///
    /// Returns the promoted index; does not count against the swap budget.
    pub fn promote_next_alive(&mut self) -> Option<usize> {
        if self.active().is_alive() {
            return None;
        }
        let next = self.get_bench().map(|(idx, _)| idx).next()?;
        self.set_active(next);
        Some(next)
    }

    pub fn reset_turn_counters(&mut self) {
        self.swaps_used = 0;
    }

    fn set_active(&mut self, index: usize) {
        self.active_mut().defending = false;
        self.active_index = index;
    }
}
