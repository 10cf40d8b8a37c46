mod config;
mod state;
mod theme;
mod ui;
mod view;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use gsd_core::PlanningRoot;
use notify::{
    event::{CreateKind, RemoveKind},
    Config as WatchConfig, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::OpenOptions,
    io,
    path::Path,
    sync::{
        mpsc::{self, Receiver},
        Mutex,
    },
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE: Duration = Duration::from_millis(800);
const POLL_RATE: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    init_logging();
    let config = config::Config::from_args(config::Args::parse())?;

    if config.dump {
        let snapshot = PlanningRoot::new(&config.project_root).snapshot();
        let json = serde_json::to_string_pretty(&snapshot.to_json()?)?;
        println!("{json}");
        return Ok(());
    }

    let mut app = state::App::new(config.project_root.clone(), config.auto_refresh);
    app.refresh();
    info!(root = %config.project_root.display(), auto_refresh = app.auto_refresh, "starting dashboard");

    let (watcher, watch_rx) = setup_watcher(app.planning.planning_path());
    let mut terminal = setup_terminal().context("failed to initialise terminal")?;
    let result = run_app(&mut terminal, &mut app, watch_rx);
    restore_terminal(&mut terminal).context("failed to restore terminal")?;
    drop(watcher);

    if let Err(err) = result {
        eprintln!("gsd-dashboard: {err}");
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Ok(path) = std::env::var("GSD_LOG_FILE") {
        let path = path.trim();
        if !path.is_empty() {
            if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                return;
            }
        }
    }

    let stdout_enabled = std::env::var("GSD_LOG_STDOUT")
        .ok()
        .and_then(|value| config::parse_bool_flag(&value))
        .unwrap_or(false);
    if stdout_enabled {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init();
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut state::App,
    watch_rx: Option<Receiver<()>>,
) -> Result<()> {
    let input_poll = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut last_poll = Instant::now();

    loop {
        if let Some(title) = app.take_title_change() {
            execute!(terminal.backend_mut(), SetTitle(title))?;
        }
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(input_poll)? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    app.handle_key(key);
                }
            }
        }

        match &watch_rx {
            Some(rx) => {
                let mut changed = false;
                while rx.try_recv().is_ok() {
                    changed = true;
                }
                if changed {
                    app.on_planning_changed();
                }
            }
            None => {
                if last_poll.elapsed() >= POLL_RATE {
                    app.on_planning_changed();
                    last_poll = Instant::now();
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick();
            last_tick = Instant::now();
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Watches the planning directory recursively. Without one (or when the
/// platform watcher fails) the loop polls instead.
fn setup_watcher(planning_dir: &Path) -> (Option<RecommendedWatcher>, Option<Receiver<()>>) {
    if !planning_dir.is_dir() {
        return (None, None);
    }

    let (tx, rx) = mpsc::sync_channel(1);
    let mut watcher = match RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                if is_markdown_event(&event) {
                    let _ = tx.try_send(());
                }
            }
        },
        WatchConfig::default(),
    ) {
        Ok(watcher) => watcher,
        Err(err) => {
            warn!(error = %err, "file watcher unavailable; polling instead");
            return (None, None);
        }
    };

    if let Err(err) = watcher.watch(planning_dir, RecursiveMode::Recursive) {
        warn!(error = %err, dir = %planning_dir.display(), "watch failed; polling instead");
        return (None, None);
    }

    (Some(watcher), Some(rx))
}

fn is_markdown_event(event: &notify::Event) -> bool {
    if matches!(
        event.kind,
        EventKind::Access(_)
            | EventKind::Create(CreateKind::Folder)
            | EventKind::Remove(RemoveKind::Folder)
    ) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|path| path.extension().is_some_and(|ext| ext == "md") && !path.is_dir())
}
