//! Progress widgets demo
//!
//! Drives an arc and a line progress bar from a simulated progress feed in
//! the terminal. Pass a JSON style file as the first argument to restyle the
//! bars.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use progress_widgets::app::{App, AppConfig};
use progress_widgets::event::EventHandler;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let mut config = AppConfig::new();
    config.style_path = std::env::args_os().nth(1).map(PathBuf::from);

    init_logging(&config)?;

    // Style errors surface before the terminal is taken over.
    let mut app = App::new(config.clone()).await?;
    let mut event_handler = EventHandler::new(config.tick_rate());

    setup_terminal()?;
    let result = app.run_with_crossterm(&mut event_handler).await;
    restore_terminal()?;

    result
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_file = File::create(&config.log_path)
        .wrap_err_with(|| format!("failed to create log file {}", config.log_path.display()))?;

    // The alternate screen belongs to the UI, so logs go to a file.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn setup_terminal() -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}
