//! CLI Detective: Terminal Crime Investigation
//!
//! Pick a case, question the case file in plain English, and name the
//! killer before the clock runs out.

use anyhow::{Context, Result};
use clap::Parser;
use cli_detective::tui::App;
use cli_detective::{CaseCatalog, QuestionEngine};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILE: &str = "cli-detective.log";

#[derive(Parser, Debug)]
#[command(name = "cli-detective", version, about = "Solve murder mysteries from your terminal")]
struct Cli {
    /// Open this case straight away instead of showing the case list
    #[arg(long, value_name = "ID")]
    case: Option<u32>,

    /// Load cases from a JSON file instead of the built-in set
    #[arg(long, value_name = "PATH")]
    cases: Option<PathBuf>,

    /// Override every case's time limit
    #[arg(long, value_name = "SECONDS")]
    time_limit: Option<u64>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Where to write logs; the screen belongs to the game
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Logs go to a file, and only when asked for
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    if cli.verbose == 0 && cli.log_file.is_none() {
        return Ok(None);
    }

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(Path::new)
        .context("log file path has no file name")?;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(Some(guard))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    info!(version = cli_detective::VERSION, "Starting CLI Detective");

    let catalog = match &cli.cases {
        Some(path) => CaseCatalog::from_path(path)
            .with_context(|| format!("failed to load cases from {}", path.display()))?,
        None => CaseCatalog::builtin().context("built-in cases are broken")?,
    };

    let mut app = App::new(catalog, QuestionEngine::default());
    if let Some(secs) = cli.time_limit {
        app = app.with_time_limit(Duration::from_secs(secs));
    }
    // Fail before touching the terminal
    if let Some(id) = cli.case {
        app.open_case(id)?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let outcome: std::io::Result<()> = (|| {
        while app.running {
            terminal.draw(|frame| app.render(frame))?;
            if !app.handle_input()? {
                break;
            }
        }
        Ok(())
    })();

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome?;

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  Thanks for playing CLI Detective!                     ║");
    println!("║                                                        ║");
    println!("║  The truth is always in the case file.                 ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    info!("Exiting");
    Ok(())
}
