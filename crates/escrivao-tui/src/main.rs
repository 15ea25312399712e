use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use escrivao_core::config_file::{self, ConfigFile};
use escrivao_core::{ActiveTab, Config};
use escrivao_pdf_mupdf::MupdfBackend;

mod action;
mod app;
mod backend;
mod export;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_FPS: u32 = 10;

/// Escrivão TUI: summarize police documents with Gemini from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF to work on (http(s) URL, file:// URL or local path)
    url: Option<String>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Read configuration from this TOML file instead of the default cascade
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Logs go to a file; the terminal belongs to the UI
    let _log_guard = init_logging();

    let file = match &args.config {
        Some(path) => config_file::load_from_path(path).ok_or_else(|| {
            anyhow::anyhow!("could not read config file {}", path.display())
        })?,
        None => config_file::load_config(),
    };
    let mut config = Config::from_file(&file);
    config.apply_env(|k| std::env::var(k).ok());

    let (theme_name, fps) = display_settings(&file, args.theme.as_deref());
    let theme = theme::Theme::by_name(&theme_name);

    let tab = Arc::new(ActiveTab::new(None));
    let orchestrator = Arc::new(escrivao_core::build_orchestrator(
        &config,
        tab.clone(),
        Arc::new(MupdfBackend::from_config(file.pdf.as_ref())),
    )?);
    let stored_key = orchestrator.stored_credential().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read stored credential");
        None
    });
    tracing::info!(
        model = %config.api.model,
        has_key = stored_key.is_some(),
        "starting tui"
    );

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(tab, args.url, theme).with_stored_key(stored_key);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();
    app.backend_cmd_tx = Some(cmd_tx);

    tokio::spawn(backend::run(orchestrator, cmd_rx, event_tx, cancel.clone()));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let tick_rate = Duration::from_millis(1000 / u64::from(fps.max(1)));

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = cancel.cancelled() => {
                app.should_quit = true;
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt, &app.input_mode));
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    tracing::info!("tui exited");

    Ok(())
}

/// Theme and frame rate: CLI flag over config file over defaults.
fn display_settings(file: &ConfigFile, cli_theme: Option<&str>) -> (String, u32) {
    let display = file.display.clone().unwrap_or_default();
    let theme = cli_theme
        .map(str::to_string)
        .or(display.theme)
        .unwrap_or_else(|| "hacker".to_string());
    let fps = display.fps.filter(|f| *f > 0).unwrap_or(DEFAULT_FPS);
    (theme, fps)
}

/// Daily rolling log under `<cache_dir>/escrivao/logs`, filtered by
/// `RUST_LOG` (default `info`). Returns the writer guard to keep alive.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::cache_dir()?.join("escrivao").join("logs");
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(dir, "escrivao-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
