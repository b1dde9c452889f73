//! lndeck — terminal admin panel for a Lightning wallet engine.
//!
//! This binary connects to the local wallet engine daemon via a Unix socket
//! and provides an interactive terminal interface for:
//! - Viewing the engine's peers and payment channels
//! - Connecting new peers (`lightning:` URIs)
//! - Opening channels and cooperatively closing them
//!
//! # Usage
//!
//! ```bash
//! lndeck                              # Use the default socket path
//! lndeck --socket /tmp/lndeckd.sock   # Point at a specific engine socket
//! lndeck --interval 10                # Refresh every 10 seconds
//! lndeck --explorer http://localhost:8080   # Self-hosted explorer links
//! ```
//!
//! The wallet engine owns all state; lndeck only renders snapshots of it
//! and dispatches commands. Logs go to a file under the platform data dir
//! (the terminal itself belongs to the UI) — set `LNDECK_LOG` to adjust
//! the filter.

mod app;
mod engine_client;
mod event;
mod refresh;
mod ui;

use anyhow::{Context, Result};
use app::{Action, App, Command};
use clap::Parser;
use crossterm::event::EventStream;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use lndeck_core::config::AppConfig;
use lndeck_core::engine::WalletEngine;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use refresh::{CollectionKind, RefreshScheduler};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// lndeck — Lightning wallet engine admin TUI.
#[derive(Parser, Debug)]
#[command(name = "lndeck", about = "Admin panel for the wallet engine's peers and channels")]
struct Cli {
    /// Path to the engine daemon's Unix socket.
    /// Overrides the config file for this run.
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// Seconds between automatic refreshes of the peer and channel lists.
    #[arg(short, long)]
    interval: Option<u64>,

    /// Block-explorer base URL (e.g. a self-hosted mempool instance).
    #[arg(long)]
    explorer: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging().context("initializing logging")?;

    let mut config = AppConfig::load()
        .context("loading config file")?
        .unwrap_or_default();
    if let Some(socket) = cli.socket {
        config.engine_socket = Some(socket);
    }
    if let Some(interval) = cli.interval {
        config.refresh_interval_secs = interval;
    }
    if let Some(explorer) = cli.explorer {
        config.explorer_base = Some(explorer);
    }

    // Connect before touching the terminal, so a missing daemon produces
    // a readable error instead of a broken alternate screen.
    let socket = config.socket_path();
    let engine = engine_client::connect(&socket).await.with_context(|| {
        format!(
            "connecting to the wallet engine at {} (is the engine daemon running?)",
            socket.display()
        )
    })?;
    let engine: Arc<dyn WalletEngine> = Arc::new(engine);

    info!(socket = %socket.display(), "connected to wallet engine");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, engine, &config).await;

    // Restore terminal even if the app errored
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "application error");
    }
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: Arc<dyn WalletEngine>,
    config: &AppConfig,
) -> Result<()> {
    let mut app = App::new(config.explorer_base.clone());

    // Completed engine calls post their results back here as actions.
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    for command in app.startup_commands() {
        spawn_command(engine.clone(), command, action_tx.clone());
    }

    // One shared scheduler drives both collections; the app skips a
    // collection whose previous fetch hasn't finished yet.
    let mut scheduler = RefreshScheduler::new(
        config.refresh_interval(),
        vec![CollectionKind::Peers, CollectionKind::Channels],
    );

    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::layout::render(frame, &app))?;

        let action = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => event::handle_event(&event, &app),
                Some(Err(e)) => {
                    warn!(error = %e, "terminal event error");
                    None
                }
                // The terminal input stream ended; nothing left to drive us.
                None => Some(Action::Quit),
            },

            batch = scheduler.tick() => Some(Action::Tick(batch)),

            Some(action) = action_rx.recv() => Some(action),
        };

        if let Some(action) = action {
            for command in app.handle_action(action) {
                spawn_command(engine.clone(), command, action_tx.clone());
            }
        }

        if app.should_quit {
            // In-flight engine calls now complete into a dropped receiver
            // and are discarded — no state updates after this point.
            break;
        }
    }

    info!("lndeck shutdown");
    Ok(())
}

/// Executes one command as a spawned engine call; the completion comes
/// back through `tx` as an action (or is dropped if the app already quit).
fn spawn_command(
    engine: Arc<dyn WalletEngine>,
    command: Command,
    tx: mpsc::UnboundedSender<Action>,
) {
    tokio::spawn(async move {
        let action = match command {
            Command::FetchNodes => Action::NodesFetched(engine.list_nodes().await),
            Command::FetchNetwork => Action::NetworkFetched(engine.network().await),
            Command::FetchPeers => Action::PeersFetched(engine.list_peers().await),
            Command::FetchChannels => Action::ChannelsFetched(engine.list_channels().await),
            Command::ConnectPeer { node, uri } => {
                Action::ConnectFinished(engine.connect_peer(&node, &uri).await)
            }
            Command::DisconnectPeer { node, pubkey } => {
                Action::PeerActionFinished(engine.disconnect_peer(&node, &pubkey).await)
            }
            Command::DeletePeer { node, pubkey } => {
                Action::PeerActionFinished(engine.delete_peer(&node, &pubkey).await)
            }
            Command::OpenChannel {
                node,
                pubkey,
                amount_sats,
            } => Action::OpenFinished(engine.open_channel(&node, &pubkey, amount_sats).await),
            Command::CloseChannel { outpoint } => {
                Action::CloseFinished(engine.close_channel(&outpoint).await)
            }
        };
        let _ = tx.send(action);
    });
}

/// Sets up tracing to a log file under the platform data directory.
///
/// The terminal is owned by ratatui, so nothing may log to stdout/stderr.
fn init_logging() -> Result<()> {
    let dir = AppConfig::data_dir().context("could not determine data directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let log_path = dir.join("lndeck.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env("LNDECK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}
