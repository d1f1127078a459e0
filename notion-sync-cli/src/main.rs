use anyhow::Result;
use clap::Parser;

use notion_sync_cli::api::ClientManager;
use notion_sync_cli::cli::{Cli, Commands, ConfigCommands, commands};
use notion_sync_cli::storage::JsonFileStorage;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let manager = ClientManager::new();
    let storage = JsonFileStorage::new(JsonFileStorage::default_path()?);

    match cli.command {
        Commands::Sync => commands::sync::handle_sync(&manager, &storage).await,
        Commands::Verify => commands::verify::handle_verify(&manager, &storage).await,
        Commands::Databases => commands::databases::handle_databases(&manager, &storage).await,
        Commands::Database { id } => {
            commands::databases::handle_database(&manager, &storage, &id).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::handle_show(&storage).await,
            ConfigCommands::Set { key, value } => {
                commands::config::handle_set(&storage, &key, &value).await
            }
        },
    }
}
