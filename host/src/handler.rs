use std::time::Duration;

use async_trait::async_trait;
use skirmish_battle::{BattleSnapshot, Resolution, SideId, TimeoutResolution, TurnInfo};
use skirmish_protocol::LogEntry;

/// Trait for reacting to a hosted battle.
///
/// All methods have default no-op implementations, so you only need to
/// implement the events you care about.
///
/// # Example
///
/// ```ignore
/// struct Announcer;
///
/// #[async_trait]
/// impl Handler for Announcer {
///     async fn on_log(&mut self, entry: &LogEntry) {
///         println!("{entry}");
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send {
    /// Called when a side's turn opens and its timer starts.
    async fn on_turn_started(&mut self, info: &TurnInfo) {
        let _ = info;
    }

    /// Called once per turn when the warning lead is reached.
    async fn on_time_warning(&mut self, side: SideId, remaining: Duration) {
        let _ = (side, remaining);
    }

    /// Called after a timed-out turn was resolved with the fallback action.
    async fn on_timeout(&mut self, timeout: &TimeoutResolution) {
        let _ = timeout;
    }

    /// Called after every resolved turn, including timed-out ones.
    async fn on_turn_resolved(&mut self, resolution: &Resolution) {
        let _ = resolution;
    }

    /// Called for every new battle log entry, in order.
    async fn on_log(&mut self, entry: &LogEntry) {
        let _ = entry;
    }

    /// Called once when a side wins.
    async fn on_battle_ended(&mut self, winner: SideId, snapshot: &BattleSnapshot) {
        let _ = (winner, snapshot);
    }
}
