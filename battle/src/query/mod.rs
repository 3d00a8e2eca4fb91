//! Query helpers for decision making
//!
//! Read-only analysis of class matchups and rosters, useful for presentation
//! layers and for choosing a swap target.

mod matchup;

pub use matchup::{
    // Class-level queries
    AdvantageInfo,
    advantage_info,
    // Roster queries
    best_swap_target,
    estimate_basic_damage,
    threatened_by,
};
