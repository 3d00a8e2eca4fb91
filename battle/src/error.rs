//! Engine error taxonomy

use skirmish_protocol::ParseError;
use thiserror::Error;

use crate::session::TurnPhase;
use crate::types::{ActionTag, ActorRef, SideId};

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Operation requires phase {expected}, battle is {actual}")]
    WrongPhase {
        expected: TurnPhase,
        actual: TurnPhase,
    },

    #[error("Action {0} cannot be declared here")]
    UnsupportedAction(ActionTag),

    #[error("Swaps are only available to team rosters")]
    SwapNotAllowed,

    #[error("Swap budget of {limit} per turn exhausted")]
    SwapBudgetExceeded { limit: u32 },

    #[error("Invalid swap from member {from} to member {to}")]
    InvalidSwapTarget { from: usize, to: usize },

    #[error("Swap target {0} has fainted")]
    SwapTargetFainted(usize),

    #[error("Swap target {0} is already active")]
    SwapTargetActive(usize),

    #[error("Insufficient resource: requires {required}, has {available}")]
    InsufficientResource { required: u32, available: u32 },

    #[error("Combatant {name} is missing required stat: {stat}")]
    MissingStat { name: String, stat: &'static str },

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} cannot act")]
    ActorIneligible(ActorRef),

    #[error("No member {member} on side {side}")]
    UnknownMember { side: SideId, member: usize },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, BattleError>;
