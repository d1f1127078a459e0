//! Command-line interface definitions

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "notion-sync-cli",
    about = "Sync cached Canvas assignments into a Notion database",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create Notion pages for cached assignments not yet in the database
    Sync,
    /// Check that the configured Notion integration key authenticates
    Verify,
    /// List databases shared with the integration
    Databases,
    /// Show a single database and its resolved title
    Database {
        /// Database id, as shown by `databases`
        id: String,
    },
    /// Read or write stored settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print all stored settings
    Show,
    /// Store a setting (use an empty value to disable an optional property)
    Set { key: String, value: String },
}
