//! Command-line interface definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Biolink - link-in-bio and invitation pages with built-in analytics
#[derive(Parser)]
#[command(name = "biolink")]
#[command(version)]
#[command(about = "Link-in-bio and invitation page service", long_about = None)]
pub struct Cli {
    /// Path to config.toml
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Grant or revoke premium for a user
    Premium {
        /// User id as issued by the identity provider
        user_id: String,

        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print a sample config.toml with all defaults
    Generate {
        /// Write to this file instead of stdout
        output: Option<PathBuf>,
    },
}
