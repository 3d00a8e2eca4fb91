//! Domain types for combat state

mod action;
mod class;
mod combatant;
mod side;
mod status;

pub use action::{
    Action, ActionKind, ActionTag, ActorRef, MAX_PRIORITY, MIN_PRIORITY, PriorityModifier,
};
pub use class::{Advantage, BEATS, CombatClass, advantage};
pub use combatant::{CombatStats, Combatant, DEFAULT_CRITICAL, DEFAULT_SPEED};
pub use side::{Formation, Side, SideId};
pub use status::{StatusEffect, StatusKind};
