//! Read-only projections of a session

use crate::types::{CombatClass, Combatant, Formation, Side, SideId, StatusEffect};

use super::{BattleSession, TurnPhase};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub id: String,
    pub name: String,
    pub class: CombatClass,
    pub health: u32,
    pub max_health: u32,
    pub resource: u32,
    pub max_resource: u32,
    pub defending: bool,
    pub status_effects: Vec<StatusEffect>,
    pub alive: bool,
}

impl From<&Combatant> for CombatantSnapshot {
    fn from(c: &Combatant) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            class: c.class,
            health: c.health,
            max_health: c.max_health,
            resource: c.resource,
            max_resource: c.max_resource,
            defending: c.defending,
            status_effects: c.status_effects.clone(),
            alive: c.is_alive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideSnapshot {
    pub id: SideId,
    pub formation: Formation,
    pub active_index: usize,
    pub swaps_used: u32,
    pub members: Vec<CombatantSnapshot>,
}

impl SideSnapshot {
    pub fn active(&self) -> Option<&CombatantSnapshot> {
        self.members.get(self.active_index)
    }
}

impl From<&Side> for SideSnapshot {
    fn from(side: &Side) -> Self {
        Self {
            id: side.id,
            formation: side.formation,
            active_index: side.active_index,
            swaps_used: side.swaps_used,
            members: side.members.iter().map(CombatantSnapshot::from).collect(),
        }
    }
}

/// Everything a presentation layer needs to draw the battle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub round: u32,
    pub turn: u32,
    pub phase: TurnPhase,
    pub acting: SideId,
    pub winner: Option<SideId>,
    pub sides: [SideSnapshot; 2],
    /// Number of log entries so far
    pub log_len: usize,
}

impl BattleSnapshot {
    pub fn side(&self, id: SideId) -> &SideSnapshot {
        &self.sides[id.index()]
    }
}

impl From<&BattleSession> for BattleSnapshot {
    fn from(session: &BattleSession) -> Self {
        Self {
            round: session.round(),
            turn: session.turn(),
            phase: session.phase(),
            acting: session.acting_side(),
            winner: session.winner(),
            sides: [
                SideSnapshot::from(session.side(SideId::A)),
                SideSnapshot::from(session.side(SideId::B)),
            ],
            log_len: session.log().len(),
        }
    }
}
