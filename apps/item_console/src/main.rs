use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::{load_settings_from, normalize_server_url},
    load_settings, DropOutcome, FetchOutcome, HttpItemService, ListEvent, ListSyncEngine,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod view;

use commands::{parse_command, ConsoleCommand, HELP};

#[derive(Parser, Debug)]
#[command(about = "Searchable, scrollable, reorderable item list in the terminal")]
struct Args {
    /// Base URL of the item service; overrides the settings file and environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Settings file to read instead of ./item_list.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings()?,
    };
    if let Some(server_url) = &args.server_url {
        settings.server_url = normalize_server_url(server_url)?;
    }
    info!("item console: server={}", settings.server_url);

    let engine = ListSyncEngine::new(
        Arc::new(HttpItemService::new(settings.server_url.clone())),
        settings.tuning(),
    );
    let printer = spawn_event_printer(&engine);

    println!("{HELP}");
    if let FetchOutcome::Failed(err) = engine.initialize().await {
        eprintln!("initial load failed: {err}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        dispatch(&engine, command).await;
    }

    engine.shutdown().await;
    printer.abort();
    Ok(())
}

async fn dispatch(engine: &Arc<ListSyncEngine>, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Search(text) => engine.on_search_input(text).await,
        ConsoleCommand::SubmitSearch => {
            engine.submit_search().await;
        }
        ConsoleCommand::Scroll => {
            let rows = engine.snapshot().await.items.len();
            if engine.on_scroll(view::bottom_metrics(rows)).await == FetchOutcome::Skipped {
                println!("nothing more to load");
            }
        }
        ConsoleCommand::Toggle(id) => {
            let toggle = engine.toggle_selection(id).await;
            let state = if toggle.selected { "checked" } else { "unchecked" };
            println!("item {id} {state}");
        }
        ConsoleCommand::Drag { dragged, target } => {
            engine.begin_drag(dragged).await;
            match engine.on_drop(target).await {
                DropOutcome::Moved { .. } => print!("{}", view::render(&engine.snapshot().await)),
                DropOutcome::Ignored => println!("cannot drop item {dragged} onto item {target}"),
            }
        }
        ConsoleCommand::Reload => {
            engine.reload().await;
        }
        ConsoleCommand::Show => print!("{}", view::render(&engine.snapshot().await)),
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => {}
    }
}

/// Re-renders whenever the window changes; debounced searches land here.
fn spawn_event_printer(engine: &Arc<ListSyncEngine>) -> tokio::task::JoinHandle<()> {
    let mut events = BroadcastStream::new(engine.subscribe_events());
    let engine = Arc::downgrade(engine);
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let Ok(event) = event else {
                continue;
            };
            let Some(engine) = engine.upgrade() else {
                break;
            };
            match event {
                ListEvent::WindowReplaced { .. } | ListEvent::WindowAppended { .. } => {
                    print!("{}", view::render(&engine.snapshot().await));
                }
                ListEvent::Error(message) => eprintln!("error: {message}"),
                _ => {}
            }
        }
    })
}
