//! Command-line interface for clinsim
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Simulated ambient clinical documentation backend
#[derive(Parser, Debug)]
#[command(
    name = "clinsim",
    version,
    about = "Simulated ambient clinical documentation backend"
)]
pub struct Cli {
    /// Subcommand to execute (default: run)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for reproducible runs (default: OS entropy)
    #[arg(long, global = true, value_name = "N")]
    pub seed: Option<u64>,

    /// Suppress log output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a run duration string.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`, `2h`), and compound (`1h30m`).
fn parse_run_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run a simulated session and stream its events to stdout
    Run {
        /// Stop automatically after this long (default: run until Ctrl-C). Examples: 30s, 2m
        #[arg(long, value_name = "DURATION", value_parser = parse_run_duration)]
        duration: Option<Duration>,

        /// Session identifier (default: derived from the clock)
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// List stored clinical notes
    Notes,

    /// Show one stored note as JSON
    Note {
        /// Note identifier (e.g. note_001)
        id: String,
    },

    /// Extract clinical entities from a piece of text
    Tag {
        /// Text to analyze
        text: String,
    },

    /// Show downstream system health
    Status,

    /// Submit a note to downstream systems
    Finalize {
        /// Note identifier to submit
        note_id: String,

        /// Target systems (comma-separated)
        #[arg(long, value_name = "SYSTEMS", value_delimiter = ',', required = true)]
        targets: Vec<String>,
    },
}
