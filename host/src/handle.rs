use anyhow::{Result, anyhow};
use skirmish_battle::{
    ActionKind, BattleError, BattleSnapshot, Resolution, SwapOutcome, TurnInfo,
};
use tokio::sync::{mpsc, oneshot};

/// Requests the actor serves, each with its reply channel
#[derive(Debug)]
pub(crate) enum Command {
    /// Declare for the acting side and resolve the turn right away
    Declare {
        kind: ActionKind,
        reply: oneshot::Sender<std::result::Result<Resolution, BattleError>>,
    },
    Swap {
        from: usize,
        to: usize,
        reply: oneshot::Sender<std::result::Result<SwapOutcome, BattleError>>,
    },
    TurnInfo {
        reply: oneshot::Sender<TurnInfo>,
    },
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    Shutdown,
}

/// Cloneable handle for driving a hosted session.
///
/// This can be passed to handlers, UI tasks or network code and cloned freely.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| anyhow!("Session closed"))?;
        rx.await.map_err(|_| anyhow!("Session closed before replying"))
    }

    /// Declare the acting side's action; resolves to the turn's outcome
    pub async fn declare(&self, kind: ActionKind) -> Result<Resolution> {
        let result = self.request(|reply| Command::Declare { kind, reply }).await?;
        Ok(result?)
    }

    /// Swap the acting roster's active member
    pub async fn swap(&self, from: usize, to: usize) -> Result<SwapOutcome> {
        let result = self.request(|reply| Command::Swap { from, to, reply }).await?;
        Ok(result?)
    }

    pub async fn turn_info(&self) -> Result<TurnInfo> {
        self.request(|reply| Command::TurnInfo { reply }).await
    }

    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Stop the actor; the session is dropped
    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| anyhow!("Session closed"))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
