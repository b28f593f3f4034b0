//! Seen It CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`seenit_engine`] (game state) and [`seenit_tui`] (rendering),
//! providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> load config + rank store -> App::new() -> TerminalSession::new() -> run_app()
//! ```
//!
//! # Event Loop
//!
//! A fixed 16ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`seenit_tui::InputPump`])
//! 3. Advance application state (`app.tick()`, delivers fetched pools)
//! 4. Render frame

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use seenit_engine::{
    App, CatalogClient, FileRankStore, MemoryRankStore, Progression, RankLadder, RankStore,
    SeenItConfig,
};
use seenit_tui::{InputPump, draw, handle_events};
use seenit_utils::{DataDir, DataDirSource};

fn init_tracing(data_dir: &DataDir) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file(data_dir);

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file(data_dir: &DataDir) -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates(data_dir) {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates(data_dir: &DataDir) -> Vec<PathBuf> {
    // Primary: ~/.seenit/logs/seenit.log
    let mut candidates = vec![data_dir.log_path()];

    // Fallback: ./.seenit/logs/seenit.log (useful in constrained environments)
    if data_dir.source() == DataDirSource::System {
        candidates.push(DataDir::fallback().log_path());
    }

    candidates
}

/// Open the file-backed rank store, or keep progress in memory for this
/// session when the data directory is unusable.
fn open_rank_store(data_dir: &DataDir) -> Box<dyn RankStore> {
    match data_dir.ensure_exists() {
        Ok(()) => Box::new(FileRankStore::new(data_dir.progress_path())),
        Err(e) => {
            tracing::warn!(
                path = %data_dir.path().display(),
                "Data dir unavailable, progress will not be saved: {e}"
            );
            Box::new(MemoryRankStore::new())
        }
    }
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode and the alternate screen are restored on drop, so the terminal
/// stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let data_dir = DataDir::resolve();
    init_tracing(&data_dir);

    let config = SeenItConfig::load().ok().flatten().unwrap_or_default();
    let catalog_settings = config
        .resolve_catalog()
        .context("invalid catalog configuration")?;
    let ui_options = config.ui_options();

    let catalog = CatalogClient::new(catalog_settings.base_url.clone(), catalog_settings.timeout_secs)
        .context("failed to build catalog client")?;
    let progression = Progression::load(RankLadder::standard(), open_rank_store(&data_dir));

    tracing::info!(
        base_url = %catalog_settings.base_url,
        source = %catalog_settings.selector,
        "Starting"
    );
    let mut app = App::new(progression, catalog, catalog_settings.selector, ui_options);

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    let view = app.view();
    println!(
        "{} {} · best score this session: {}",
        view.tier.icon(),
        view.tier.name(),
        view.best_score
    );

    Ok(())
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend + Write,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
