//! Turn-based combat engine for 1v1 and 3v3 battles.
//!
//! This crate owns the battle rules: class advantage, damage formulas,
//! resources and status effects, the priority scheduler, AI action selection
//! and the per-battle state machine.
//!
//! # Overview
//!
//! `skirmish-battle` sits between `skirmish-protocol` (record shapes) and a
//! host that drives sessions in real time:
//!
//! ```text
//! skirmish-protocol (records, log entries)
//!        │
//!        ▼
//! skirmish-battle (rules + session state machine) ← THIS CRATE
//!        │
//!        └─> skirmish-host (async actor, turn timer, AI turns)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`CombatClass`] - Class tags with the advantage triangle
//! - [`Combatant`] - One fighter's stats and runtime state
//! - [`Side`] - A solo combatant or a three-member roster
//! - [`StatusKind`], [`StatusEffect`] - Damage-over-time and incapacitation
//! - [`ActionKind`] - Closed set of actions a combatant can take
//!
//! ## Engine
//! - [`BattleSession`] - Main entry point; declare, resolve, swap, time out
//! - [`PriorityScheduler`] - Ordered execution of declared actions
//! - [`BattleConfig`] - Every tunable constant, with validated defaults
//! - [`BattleRng`], [`Clock`] - Injected randomness and time
//!
//! # Example Usage
//!
//! ```ignore
//! use skirmish_battle::{ActionKind, BattleConfig, BattleSession, SeededRng, SideSetup};
//! use skirmish_protocol::CombatantRecord;
//!
//! let a = CombatantRecord::new("Ayla").with_core_stats(120, 40, 15);
//! let b = CombatantRecord::new("Brom").with_core_stats(100, 35, 20);
//! let mut session =
//!     BattleSession::start(SideSetup::Solo(a), SideSetup::Solo(b), BattleConfig::default())?;
//! let mut rng = SeededRng::from_seed(42);
//!
//! while !session.is_over() {
//!     session.declare_action(ActionKind::attack())?;
//!     let resolution = session.resolve_turn(&mut rng)?;
//!     println!("round {} -> {:?}", resolution.round, resolution.winner);
//! }
//! ```

pub mod ai;
pub mod clock;
pub mod config;
pub mod damage;
pub mod error;
pub mod query;
pub mod resources;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod types;

// Re-export main types at crate root for convenience
pub use ai::{AiChoice, AiContext, AiTuning, BehaviorProfile};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AreaTuning, BattleConfig, TimeoutAction};
pub use error::{BattleError, Result};
pub use rng::{BattleRng, ScriptedRng, SeededRng};
pub use scheduler::{ActionExecutor, PriorityQueueEntry, PriorityScheduler};
pub use session::{
    ActionOutcome, BattleSession, BattleSnapshot, Declaration, Resolution, SideSetup, SkipReason,
    SwapOutcome, TimeoutResolution, TurnInfo, TurnPhase, TurnStats,
};
pub use types::{
    Action, ActionKind, ActionTag, ActorRef, Advantage, CombatClass, CombatStats, Combatant,
    PriorityModifier, Side, SideId, StatusEffect, StatusKind,
};

// Re-export commonly used protocol types
pub use skirmish_protocol::{CombatantRecord, LogEntry, LogKind, SkillDescriptor};
