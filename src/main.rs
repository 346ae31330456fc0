mod geometry;
mod gesture;
mod mpris;
mod state;
mod transition;
mod ui;
mod volume_sync;

use crate::state::ProgressState;
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture},
    execute,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Application configuration from CLI
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Draggable sound bar for the terminal")]
pub struct Config {
    /// Sync the committed value to an MPRIS player's volume
    #[arg(long)]
    pub mpris: bool,
    /// MPRIS bus name to control (default: first active, non-blocked player)
    #[arg(long, value_name = "SERVICE")]
    pub player: Option<String>,
    /// Blocklist for MPRIS player service names (comma-separated, case-insensitive).
    /// If empty, the SOUNDBAR_BLOCK env var will be used as a fallback.
    #[arg(
        long = "block",
        value_name = "SERVICE1,SERVICE2",
        value_delimiter = ','
    )]
    pub block: Vec<String>,
    /// Print the final committed value to stdout on exit
    #[arg(long)]
    pub print: bool,
    /// Write diagnostics to this file (the terminal is owned by the UI)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Log at debug level instead of info
    #[arg(long)]
    pub debug_log: bool,
    /// Make every transition instantaneous
    #[arg(long)]
    pub no_animation: bool,
}

fn block_from_env_if_empty(cfg: &mut Config) {
    if cfg.block.is_empty()
        && let Ok(s) = std::env::var("SOUNDBAR_BLOCK")
    {
        cfg.block = parse_block_list(&s);
    }
}

fn parse_block_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

fn init_logging(cfg: &Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(path) = &cfg.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let default_level = if cfg.debug_log { "soundbar=debug" } else { "soundbar=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Restore the terminal before the default hook prints the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        default_hook(info);
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut cfg = Config::parse();
    block_from_env_if_empty(&mut cfg);
    init_logging(&cfg)?;
    install_panic_hook();

    let progress = if cfg.mpris {
        match volume_sync::initial_volume(&cfg).await {
            Some(volume) => ProgressState::resume(volume),
            None => ProgressState::new(),
        }
    } else {
        ProgressState::new()
    };
    tracing::info!(committed = progress.committed, mpris = cfg.mpris, "starting sound bar");

    let result = ui::run_interactive(progress, cfg.clone()).await;

    // Print error if any, for better diagnostics
    match result {
        Ok(committed) => {
            tracing::info!(committed, "sound bar closed");
            if cfg.print {
                println!("{:.3}", committed);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "sound bar failed");
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_list() {
        assert_eq!(parse_block_list(" Firefox, ,chromium "), vec!["firefox", "chromium"]);
        assert!(parse_block_list("").is_empty());
    }

    #[test]
    fn test_cli_flags() {
        let cfg = Config::try_parse_from([
            "soundbar",
            "--mpris",
            "--player",
            "org.mpris.MediaPlayer2.mpv",
            "--block",
            "firefox,chromium",
            "--print",
            "--no-animation",
        ])
        .unwrap();
        assert!(cfg.mpris);
        assert_eq!(cfg.player.as_deref(), Some("org.mpris.MediaPlayer2.mpv"));
        assert_eq!(cfg.block, vec!["firefox", "chromium"]);
        assert!(cfg.print);
        assert!(cfg.no_animation);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn test_cli_defaults() {
        let cfg = Config::try_parse_from(["soundbar"]).unwrap();
        assert!(!cfg.mpris);
        assert!(cfg.block.is_empty());
        assert!(!cfg.debug_log);
    }
}
