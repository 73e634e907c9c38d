// ChatBuddy Entry Point
// Wires configuration, logging and the session loop to the terminal

use anyhow::{Context, Result};
use chatbuddy_core::brain::{LexiconScorer, ResponseSelector};
use chatbuddy_core::config::{ChatConfig, Cli};
use chatbuddy_core::session::{ChannelSource, ChatSession, ReadlineSource};
use chatbuddy_core::session_log::SessionLog;
use chatbuddy_core::telemetry;
use clap::Parser;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use tracing::{error, info};

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = ChatConfig::from_cli(cli).context("Invalid configuration")?;
    telemetry::init_tracing(config.log_format)?;

    let profile = config.load_profile().context("Failed to load profile")?;
    let selector = ResponseSelector::from_profile(profile, Arc::new(LexiconScorer::new()))
        .context("Invalid profile")?;

    let mut session = ChatSession::new(config.bot_name.clone(), &selector, config.rng());
    let mut stdout = io::stdout();

    let summary = if io::stdin().is_terminal() {
        let mut source = ReadlineSource::new().context("Failed to open terminal")?;
        session.run(&mut source, &mut stdout)?
    } else {
        let mut source = ChannelSource::stdin().context("Failed to set Ctrl+C handler")?;
        session.run(&mut source, &mut stdout)?
    };

    info!(
        "Session {} ended after {} turns ({:?})",
        summary.session_id, summary.turns, summary.end_reason
    );

    if let Some(path) = &config.session_log {
        if let Err(e) = SessionLog::new(path).record(&summary) {
            error!("Failed to record session history: {}", e);
        }
    }

    Ok(())
}
