//! fitbot entry point
//!
//! Wires the flow dispatcher to a storage backend and runs a console
//! chat loop. Lines are text events, `/start` is the start command, and
//! a leading `#` sends a callback token (the console keyboard prints
//! tokens as `#token`).

mod console;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use fitbot_core::{ChatTransport, FlowError, FlowEvent, ProfileRepository, UserId};
use fitbot_flows::Dispatcher;
use fitbot_persistence::{InMemoryProfileRepository, ScyllaConfig};
use tracing_subscriber::EnvFilter;

use console::ConsoleTransport;

/// Identity used for the single console conversation
const CONSOLE_USER: UserId = UserId(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env = std::env::var("FITBOT_ENV").ok();
    let settings =
        fitbot_config::load_settings(env.as_deref()).context("failed to load settings")?;

    tracing::info!(
        environment = ?settings.environment,
        persistence = settings.persistence.enabled,
        tiers = settings.tariffs.tiers.len(),
        "Starting fitbot"
    );

    let transport = Arc::new(ConsoleTransport::new(settings.bot.temp_message_ttl_secs));

    if settings.persistence.enabled {
        let layer = fitbot_persistence::init(ScyllaConfig {
            hosts: settings.persistence.scylla_hosts.clone(),
            keyspace: settings.persistence.keyspace.clone(),
            replication_factor: settings.persistence.replication_factor,
        })
        .await
        .context("failed to initialize ScyllaDB")?;

        let dispatcher = Dispatcher::new(
            Arc::new(layer.profiles),
            transport,
            settings.messages,
            settings.tariffs,
        );
        run_console(dispatcher).await
    } else {
        tracing::info!("Persistence disabled, using in-memory stores");
        let dispatcher = Dispatcher::new(
            Arc::new(InMemoryProfileRepository::new()),
            transport,
            settings.messages,
            settings.tariffs,
        );
        run_console(dispatcher).await
    }
}

async fn run_console<R, T>(dispatcher: Dispatcher<R, T>) -> anyhow::Result<()>
where
    R: ProfileRepository,
    T: ChatTransport,
{
    println!("fitbot console. Type /start to begin, /quit to exit.");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        let event = parse_event(line);
        match dispatcher.handle(CONSOLE_USER, Some("console"), event).await {
            Ok(true) => {}
            Ok(false) => println!("(not understood here)"),
            Err(FlowError::Repo(err)) => {
                tracing::error!(error = %err, "Event failed on persistence")
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn parse_event(line: &str) -> FlowEvent {
    if line == "/start" {
        FlowEvent::Start
    } else if let Some(token) = line.strip_prefix('#') {
        FlowEvent::callback(token)
    } else {
        FlowEvent::text(line)
    }
}
