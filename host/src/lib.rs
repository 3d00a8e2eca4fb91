//! Async host for skirmish battles.
//!
//! Each battle runs in its own task. The task owns the [`BattleSession`],
//! serves commands sent through a cloneable [`SessionHandle`], restarts a
//! [`TurnTimer`] whenever a turn opens, resolves expired turns with
//! `cancel_on_timeout`, and plays AI-controlled combatants on its own.
//! Everything that happens is reported to a [`Handler`].
//!
//! ```ignore
//! let config = HostConfig::load("skirmish.toml")?;
//! let session = config.start_session(side_a, side_b)?;
//! let (handle, task) = spawn_session(session, config, MyHandler);
//!
//! handle.declare(ActionKind::attack()).await?;
//! let final_state = task.await?;
//! ```

mod actor;
mod config;
mod handle;
mod handler;
mod timer;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use skirmish_battle::{BattleSession, BattleSnapshot};

pub use actor::SessionActor;
pub use config::HostConfig;
pub use handle::SessionHandle;
pub use handler::Handler;
pub use timer::{TimerEvent, TokioClock, TurnTimer};

/// Spawn a task hosting `session`, returning its handle and the task that
/// yields the final snapshot
pub fn spawn_session<H>(
    session: BattleSession,
    config: HostConfig,
    handler: H,
) -> (SessionHandle, JoinHandle<BattleSnapshot>)
where
    H: Handler + 'static,
{
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));
    let actor = SessionActor::new(session, handler, config, rx);
    let task = tokio::spawn(actor.run());
    (SessionHandle::new(tx), task)
}
