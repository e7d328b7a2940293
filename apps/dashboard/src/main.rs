use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ConnectionEvent, ConnectionManager, DashboardState};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod summary;

use commands::{parse_input, Input, HELP};
use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(about = "Spectator and control console for the bomb server")]
struct Args {
    /// WebSocket url of the bomb server, e.g. ws://localhost:8081/ws
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    ui_version: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// tracing filter directive, overrides RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log_filter {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter '{directive}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = load_settings(&args.config, |key| std::env::var(key).ok())?;
    if let Some(v) = args.server_url {
        settings.server_url = v;
    }
    if let Some(v) = args.ui_version {
        settings.ui_version = v;
    }
    if let Some(v) = args.password {
        settings.password = Some(v);
    }
    let connection = settings.connection()?;

    let manager = ConnectionManager::new(connection);
    let sender = manager.sender();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let connection_task = tokio::spawn(manager.run(events_tx));

    let mut state = DashboardState::new(settings.log_capacity);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    println!("type 'help' for commands");

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                let closed = matches!(event, ConnectionEvent::Closed(_));
                state.handle(event);
                if closed {
                    break;
                }
            }
            line = stdin.next_line(), if stdin_open => {
                let Some(line) = line.context("failed to read stdin")? else {
                    stdin_open = false;
                    continue;
                };
                let input = match parse_input(&line) {
                    Ok(Some(input)) => input,
                    Ok(None) => continue,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                match input {
                    Input::Send(command) => {
                        if let Err(err) = state.check_command(&command) {
                            println!("{err}");
                        } else if sender.send(command.clone()).await {
                            info!(command = command.kind(), "command sent");
                        } else {
                            warn!(command = command.kind(), "not connected, command dropped");
                        }
                    }
                    Input::Status => {
                        for line in summary::status_lines(state.snapshot(), state.registry()) {
                            println!("{line}");
                        }
                        let available: Vec<&str> = state
                            .available_commands()
                            .iter()
                            .map(|command| command.kind())
                            .collect();
                        println!("available: {}", available.join(", "));
                    }
                    Input::Log(count) => {
                        for line in state.log().iter().take(count) {
                            println!("{} {line}", line.at.format("%H:%M:%S"));
                        }
                    }
                    Input::Help => println!("{HELP}"),
                    Input::Quit => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    connection_task.abort();
    Ok(())
}
