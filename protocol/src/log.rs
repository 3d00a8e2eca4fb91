//! Battle log entries emitted for the presentation layer

use serde::{Deserialize, Serialize};

/// Category of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    System,
    Action,
    Attack,
    Skill,
    Defend,
    Heal,
    Damage,
    Status,
    Swap,
    Timeout,
    Error,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::System => "system",
            LogKind::Action => "action",
            LogKind::Attack => "attack",
            LogKind::Skill => "skill",
            LogKind::Defend => "defend",
            LogKind::Heal => "heal",
            LogKind::Damage => "damage",
            LogKind::Status => "status",
            LogKind::Swap => "swap",
            LogKind::Timeout => "timeout",
            LogKind::Error => "error",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One append-only battle log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
    /// Milliseconds as reported by the session clock
    pub timestamp: u64,
    pub round: u32,
}

impl LogEntry {
    pub fn new(kind: LogKind, message: impl Into<String>, timestamp: u64, round: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp,
            round,
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[round {}] {}: {}", self.round, self.kind, self.message)
    }
}
