//! Command-line interface definition for Maguai
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat and catalog browsing commands.

use clap::{Parser, Subcommand};

/// Maguai - chat with a catalog of AI personas
///
/// Pick one of 150 personas and hold a conversation with it over the
/// Gemini API.
#[derive(Parser, Debug, Clone)]
#[command(name = "maguai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Maguai
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Persona id to start with (e.g. maguai-12)
        #[arg(short, long)]
        model: Option<String>,

        /// Start with thinking mode enabled
        #[arg(short, long)]
        thinking: bool,
    },

    /// Browse the persona catalog
    Models {
        /// Catalog subcommand
        #[command(subcommand)]
        command: ModelCommand,
    },
}

/// Catalog subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List personas, optionally filtered
    List {
        /// Case-insensitive substring matched against name and category
        #[arg(short, long)]
        filter: Option<String>,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Show detailed information about a persona
    Info {
        /// Persona id
        #[arg(short, long)]
        model: String,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat {
                model: None,
                thinking: false,
            },
        }
    }
}
