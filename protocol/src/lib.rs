//! Record shapes exchanged between the skirmish engine and its collaborators.
//!
//! Incoming records (combatants and skills) come from the character-data and
//! content collaborators; outgoing log entries go to a presentation layer.

use thiserror::Error;

pub mod log;
pub mod records;

pub use log::{LogEntry, LogKind};
pub use records::{
    AreaEffect, AreaPattern, CombatantRecord, ROSTER_SIZE, SkillDescriptor, SkillTarget,
    StatusInfliction, parse_combatant, parse_roster, parse_skill,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid record format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty record")]
    EmptyRecord,

    #[error("Roster must have exactly {expected} members, got {actual}")]
    RosterSize { expected: usize, actual: usize },
}
