use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use pipecon_infrastructure::ConsoleConfig;

mod commands;
mod console;
mod forms;
mod helper;
mod render;

use commands::Command;
use console::{Console, Flow};
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "pipecon")]
#[command(version, about = "Interactive console for a mock content-ranking pipeline", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/pipecon/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session to start in (default: `console.default_session`)
    #[arg(long)]
    session: Option<String>,

    /// Log filter for stderr, e.g. `debug` or `audit=info,warn`
    #[arg(long)]
    log_level: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// `--log-level`, then `RUST_LOG`, then the config file, then `warn`.
fn init_tracing(cli_filter: Option<&str>, config_filter: Option<&str>) {
    let filter = match cli_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config_filter.unwrap_or("warn"))),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::load_default()?,
    };
    init_tracing(cli.log_level.as_deref(), config.console.log_filter.as_deref());

    let session_id = cli
        .session
        .clone()
        .unwrap_or_else(|| config.console.default_session.clone());
    let history = config.history_path();
    let console = Console::start(config, &session_id).await?;

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));
    if let Some(path) = &history {
        if rl.load_history(path).is_err() {
            tracing::debug!(target: "console", path = %path.display(), "No history loaded");
        }
    }

    println!("{}", "=== pipecon ===".bright_magenta().bold());
    println!("{}", "Type /help for commands, or 'quit' to exit.".bright_black());
    println!();

    // ===== Main REPL Loop =====
    loop {
        let prompt = console.prompt().await;
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match trimmed.parse::<Command>() {
                    Ok(command) => command,
                    Err(err) => {
                        render::error(&err);
                        continue;
                    }
                };
                match console.execute(command, &mut rl).await {
                    Ok(Flow::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(Flow::Continue) => {}
                    Err(err) => render::error(&err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    if let Some(path) = &history {
        ensure_parent_dir(path);
        if let Err(err) = rl.save_history(path) {
            tracing::warn!(target: "console", path = %path.display(), %err, "Failed to save history");
        }
    }
    Ok(())
}

/// Creates the directory holding `path`. Failures are logged, not fatal.
fn ensure_parent_dir(path: &Path) -> bool {
    let Some(parent) = path.parent() else {
        return true;
    };
    match std::fs::create_dir_all(parent) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(target: "console", path = %parent.display(), %err, "Failed to create history directory");
            false
        }
    }
}
