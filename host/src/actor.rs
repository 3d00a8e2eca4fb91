//! One task per battle: owns the session, serves handle commands, runs the
//! turn timer and plays AI turns.

use std::collections::VecDeque;

use skirmish_battle::{ActionKind, BattleError, BattleSession, BattleSnapshot, Resolution, SeededRng};
use tokio::sync::mpsc;

use crate::config::HostConfig;
use crate::handle::Command;
use crate::handler::Handler;
use crate::timer::{TimerEvent, TurnTimer};

pub struct SessionActor<H> {
    session: BattleSession,
    handler: H,
    config: HostConfig,
    rng: SeededRng,
    commands: mpsc::Receiver<Command>,
    timer: TurnTimer,
    /// Log entries already forwarded to the handler
    log_cursor: usize,
    /// Turn-taking commands received while an AI was thinking
    deferred: VecDeque<Command>,
}

impl<H: Handler> SessionActor<H> {
    pub(crate) fn new(
        session: BattleSession,
        handler: H,
        config: HostConfig,
        commands: mpsc::Receiver<Command>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => SeededRng::from_seed(seed),
            None => SeededRng::from_entropy(),
        };
        let timer = Self::turn_timer(&session, &config);

        Self {
            session,
            handler,
            config,
            rng,
            commands,
            timer,
            log_cursor: 0,
            deferred: VecDeque::new(),
        }
    }

    fn turn_timer(session: &BattleSession, config: &HostConfig) -> TurnTimer {
        let rules = session.config();
        TurnTimer::start(
            config.units(rules.turn_time_budget),
            config.units(rules.warning_lead),
        )
    }

    /// Run until the battle ends, a shutdown is requested or every handle
    /// is dropped. Returns the final state.
    pub async fn run(mut self) -> BattleSnapshot {
        self.begin_turn().await;

        while !self.session.is_over() {
            if self.session.is_ai_turn() {
                if !self.play_ai_turn().await {
                    break;
                }
                continue;
            }

            if let Some(command) = self.deferred.pop_front() {
                self.handle_command(command).await;
                continue;
            }

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => {
                        tracing::debug!(round = self.session.round(), "session host stopping");
                        break;
                    }
                    Some(command) => self.handle_command(command).await,
                },
                event = self.timer.next_event() => self.handle_timer(event).await,
            }
        }

        self.flush_log().await;
        let snapshot = self.session.snapshot();
        if let Some(winner) = self.session.winner() {
            self.handler.on_battle_ended(winner, &snapshot).await;
        }
        snapshot
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Declare { kind, reply } => {
                let result = self.declare_and_resolve(kind);
                let resolved = result.as_ref().ok().cloned();
                let _ = reply.send(result);

                match resolved {
                    Some(resolution) => self.after_resolution(&resolution).await,
                    None => self.flush_log().await,
                }
            }
            Command::Swap { from, to, reply } => {
                let result = self.session.request_swap(from, to);
                let _ = reply.send(result);
                self.flush_log().await;
            }
            Command::TurnInfo { reply } => {
                let _ = reply.send(self.session.turn_info());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    fn declare_and_resolve(
        &mut self,
        kind: ActionKind,
    ) -> Result<Resolution, BattleError> {
        self.session.declare_action(kind)?;
        self.session.resolve_turn(&mut self.rng)
    }

    async fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Warning { remaining } => {
                let side = self.session.acting_side();
                tracing::debug!(side = %side, remaining_ms = remaining.as_millis() as u64, "turn time warning");
                self.handler.on_time_warning(side, remaining).await;
            }
            TimerEvent::Expired => match self.session.cancel_on_timeout(&mut self.rng) {
                Ok(timeout) => {
                    self.handler.on_timeout(&timeout).await;
                    self.after_resolution(&timeout.resolution).await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, phase = %self.session.phase(), "timeout could not be applied");
                }
            },
        }
    }

    /// Returns false when the AI could not make progress or a shutdown
    /// arrived while it was thinking
    async fn play_ai_turn(&mut self) -> bool {
        if !self.think().await {
            tracing::debug!(round = self.session.round(), "session host stopping");
            return false;
        }

        let kind = self
            .session
            .choose_ai_action(&mut self.rng)
            .unwrap_or_else(ActionKind::attack);

        let resolution = match self.declare_and_resolve(kind) {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::warn!(
                    side = %self.session.acting_side(),
                    error = %e,
                    "AI action rejected, falling back to timeout action"
                );
                match self.session.cancel_on_timeout(&mut self.rng) {
                    Ok(timeout) => timeout.resolution,
                    Err(e) => {
                        tracing::warn!(error = %e, "AI turn could not be resolved");
                        return false;
                    }
                }
            }
        };

        self.after_resolution(&resolution).await;
        true
    }

    /// Wait out the AI think delay while still answering queries.
    /// Returns false on shutdown.
    async fn think(&mut self) -> bool {
        let think = self.config.ai_think();
        if think.is_zero() {
            return true;
        }

        let delay = tokio::time::sleep(think);
        tokio::pin!(delay);
        let mut handles_open = true;

        loop {
            tokio::select! {
                _ = &mut delay => return true,
                command = self.commands.recv(), if handles_open => match command {
                    Some(Command::Shutdown) => return false,
                    // AI battles keep running without handles
                    None => handles_open = false,
                    Some(Command::TurnInfo { reply }) => {
                        let _ = reply.send(self.session.turn_info());
                    }
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(self.session.snapshot());
                    }
                    Some(command) => self.deferred.push_back(command),
                },
            }
        }
    }

    async fn after_resolution(&mut self, resolution: &Resolution) {
        self.handler.on_turn_resolved(resolution).await;
        if resolution.is_terminal() {
            self.flush_log().await;
        } else {
            self.begin_turn().await;
        }
    }

    /// Open the acting side's turn: restart the timer and notify
    async fn begin_turn(&mut self) {
        self.flush_log().await;
        if self.session.is_over() {
            return;
        }
        self.timer = Self::turn_timer(&self.session, &self.config);
        let info = self.session.turn_info();
        self.handler.on_turn_started(&info).await;
    }

    async fn flush_log(&mut self) {
        for entry in self.session.log_since(self.log_cursor) {
            self.handler.on_log(entry).await;
        }
        self.log_cursor = self.session.log().len();
    }
}
