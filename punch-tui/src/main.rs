use anyhow::{Context, Result};
use clap::Parser;
use punch_client::Connector;
use punch_tui::app::App;
use punch_tui::cli::{Cli, Commands};
use punch_tui::config::KioskConfig;
use punch_tui::runtime::{self, DevBackend, Driver};
use punch_tui::terminal::TerminalGuard;
use punch_tui::{logging, time_utils};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Simulated round trip of the dev backend.
const DEV_LATENCY: Duration = Duration::from_millis(800);

fn main() -> Result<()> {
    // Resolve the local offset while the process is still single-threaded.
    let offset = time_utils::local_offset();
    let cli = Cli::parse();

    dotenvy::from_filename(".env.punch").ok();

    let command = cli.command.unwrap_or(Commands::Run);
    if let Commands::ConfigPath = command {
        let path = match &cli.overrides.config {
            Some(path) => path.clone(),
            None => KioskConfig::config_path()?,
        };
        if KioskConfig::ensure_default_file(&path)? {
            println!("Created default config at:");
        }
        println!("{}", path.display());
        return Ok(());
    }

    let config = KioskConfig::load(&cli.overrides)?;
    let log_path = logging::init()?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        member = %config.member(),
        log = %log_path.display(),
        "starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let app = App::new(config.query_enabled, offset);
        match command {
            Commands::Dev => {
                let backend = DevBackend::seeded(offset, DEV_LATENCY, config.member());
                run(Driver::new(app, backend, config.member())).await
            }
            _ => run(Driver::new(app, config.endpoint(), config.member())).await,
        }
    })
}

async fn run<C: Connector>(mut driver: Driver<C>) -> Result<()> {
    let title = format!("NW 打卡系統 - v{}", env!("CARGO_PKG_VERSION"));

    // Setup terminal
    let guard = TerminalGuard::enter(&title).context("Failed to set up terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("Failed to set up terminal")?;

    // Run the app
    let res = runtime::run_app(&mut terminal, &mut driver, guard.reports_release()).await;
    driver.shutdown();

    // Restore terminal
    drop(terminal);
    drop(guard);

    match res {
        Err(err) if err.is_terminated() => {
            tracing::info!("Shutdown!");
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "an error occurred");
            Err(err.into())
        }
        Ok(()) => Ok(()),
    }
}

