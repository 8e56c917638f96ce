//! CLI module for Auditorium.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Auditorium - Live audio rooms with AI answers
///
/// Serves the rooms API: upload audio chunks to a room, then ask questions
/// answered from what was said.
#[derive(Parser, Debug)]
#[command(name = "auditorium")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List rooms with their question counts
    Rooms,

    /// Insert sample rooms into the database
    Seed {
        /// Number of rooms to create
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Delete all existing rooms, questions and audio chunks first
        #[arg(long)]
        reset: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
