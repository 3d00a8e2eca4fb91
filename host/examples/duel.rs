//! AI Duel Example
//!
//! Hosts a 3v3 battle between two AI rosters and prints the battle log as it
//! happens. Pass a TOML host config path as the first argument to override
//! the rules; set RUST_LOG=debug to see engine tracing.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use skirmish_battle::{BattleSnapshot, SideId, SideSetup, TurnInfo};
use skirmish_host::{Handler, HostConfig, spawn_session};
use skirmish_protocol::{AreaEffect, CombatantRecord, LogEntry, SkillDescriptor};

struct Narrator;

#[async_trait]
impl Handler for Narrator {
    async fn on_turn_started(&mut self, info: &TurnInfo) {
        println!("--- round {} / turn {}: side {} ---", info.round, info.turn, info.acting);
    }

    async fn on_time_warning(&mut self, side: SideId, remaining: Duration) {
        println!("[side {}] {:.1}s left", side, remaining.as_secs_f64());
    }

    async fn on_log(&mut self, entry: &LogEntry) {
        println!("{}", entry);
    }

    async fn on_battle_ended(&mut self, winner: SideId, snapshot: &BattleSnapshot) {
        println!("Side {} wins after {} turns", winner, snapshot.turn);
    }
}

fn roster(prefix: &str, profile: &str) -> Vec<CombatantRecord> {
    vec![
        CombatantRecord::new(format!("{prefix} Vanguard"))
            .with_core_stats(140, 45, 25)
            .with_class("fighter")
            .with_speed(55)
            .with_ai_profile(profile)
            .with_skill(SkillDescriptor::single("Cleave", 15)),
        CombatantRecord::new(format!("{prefix} Sentinel"))
            .with_core_stats(160, 38, 35)
            .with_class("armsmaster")
            .with_speed(40)
            .with_ai_profile("tank")
            .with_skill(SkillDescriptor::area("Arrow Rain", 25, AreaEffect::arrow_rain())),
        CombatantRecord::new(format!("{prefix} Magus"))
            .with_core_stats(110, 52, 18)
            .with_class("arcanist")
            .with_speed(60)
            .with_ai_profile("caster")
            .with_skill(
                SkillDescriptor::area("Fire Burst", 30, AreaEffect::fire_burst()).inflicting("burn", 2),
            ),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skirmish_battle=info".parse()?),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig {
            ai_think_ms: 200,
            ..HostConfig::default()
        },
    };

    let session = config.start_session(
        SideSetup::Roster(roster("North", "aggressive")),
        SideSetup::Roster(roster("South", "ambush")),
    )?;

    let (_handle, task) = spawn_session(session, config, Narrator);
    let snapshot = task.await?;

    for side in &snapshot.sides {
        let alive = side.members.iter().filter(|m| m.alive).count();
        println!("Side {}: {} of {} standing", side.id, alive, side.members.len());
    }

    Ok(())
}
