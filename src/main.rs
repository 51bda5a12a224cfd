//! Userbox CLI - the screen over the user store

use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use userbox::config;
use userbox::source::{LocalUserDataSource, UserDataSource};
use userbox::storage::UserStore;
use userbox::viewmodel::ViewModelFactory;

#[derive(Parser)]
#[command(name = "userbox")]
#[command(version = "0.1.0")]
#[command(about = "Local user profile store with live-updating reads")]
#[command(long_about = r#"
Userbox keeps a single user profile in a local SQLite database and exposes
it as a live stream: writes made through this store handle show up in every
subscriber immediately.

Example usage:
  userbox set "alice"
  userbox show
  userbox watch
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides userbox.toml)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current display name
    Show {
        /// Emit the full record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the display name, creating the record on first write
    Set {
        /// The new display name
        name: String,
    },

    /// Delete every stored record
    Clear,

    /// Follow the display name as it changes
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let db_path = config::resolve_database_path(cli.database)?;
    config::ensure_db_dir(&db_path)?;
    tracing::debug!("Opening database {:?}", db_path);

    let store = UserStore::open(&db_path)?;
    let source = Arc::new(LocalUserDataSource::new(store)?);
    let factory = ViewModelFactory::new(source.clone());

    match cli.command {
        Commands::Show { json } => match source.latest_user() {
            Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
            Some(user) => println!("{}", user.display_name),
            None => println!("no user"),
        },

        Commands::Set { name } => {
            let view_model = factory.user_view_model();
            if let Some(existing) = source.latest_user() {
                view_model.adopt_user(existing).await;
            }
            view_model.update_user_name(&name).await?;
            println!("✅ Saved: {}", name);
        }

        Commands::Clear => {
            source.delete_all_users().await?;
            println!("🗑️  All users deleted");
        }

        Commands::Watch => {
            let view_model = factory.user_view_model();
            let mut names = view_model.user_name();
            println!("👀 Watching {:?} for changes...", db_path);
            while let Some(name) = names.next().await {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
