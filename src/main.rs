//! Command-line interface for acelerato-sync
//!
//! # Usage Examples
//!
//! ```bash
//! # Sync all tickets into the chamados table
//! acelerato-sync tickets
//!
//! # Sync time entries, stopping after 5 pages (bounded test run)
//! acelerato-sync time-entries --max-pages 5
//!
//! # Sync survey feedbacks with a different baseline date
//! acelerato-sync feedbacks --min-creation-date 01/01/2025
//! ```
//!
//! Configuration comes from the environment: `API_URL_TICKETS`,
//! `API_URL_APONTAMENTOS`, `API_URL_FEEDBACKS`, `API_EMAIL`, `API_TOKEN`,
//! `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`. Every value can
//! also be passed as a flag. Fatal failures (store connection lost for good)
//! exit nonzero; fetch failures end pagination but not the process.

use acelerato_sync::{config::ApiOpts, config::StoreOpts, sync, target};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "acelerato-sync")]
#[command(about = "A tool for syncing Acelerato helpdesk records into MySQL")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync helpdesk tickets into the chamados table
    Tickets {
        /// Tickets endpoint URL
        #[arg(long, env = "API_URL_TICKETS")]
        endpoint: String,

        /// Only fetch tickets created on or after this date (dd/mm/yyyy)
        #[arg(long, default_value = "02/04/2025")]
        min_creation_date: String,

        /// API credentials
        #[command(flatten)]
        api: ApiOpts,

        /// MySQL store options
        #[command(flatten)]
        store: StoreOpts,

        /// Stop after this many pages (safety cap for bounded test runs)
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Sync time entries into the apontamentos table
    TimeEntries {
        /// Time-entries endpoint URL
        #[arg(long, env = "API_URL_APONTAMENTOS")]
        endpoint: String,

        /// Only fetch time entries from this date onwards (dd/mm/yyyy)
        #[arg(long, default_value = "01/04/2025")]
        start_date: String,

        /// API credentials
        #[command(flatten)]
        api: ApiOpts,

        /// MySQL store options
        #[command(flatten)]
        store: StoreOpts,

        /// Stop after this many pages (safety cap for bounded test runs)
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Sync satisfaction-survey feedbacks into the feedbacks table
    Feedbacks {
        /// Feedbacks endpoint URL
        #[arg(long, env = "API_URL_FEEDBACKS")]
        endpoint: String,

        /// Only fetch feedbacks for tickets created on or after this date (dd/mm/yyyy)
        #[arg(long, default_value = "02/04/2025")]
        min_creation_date: String,

        /// API credentials
        #[command(flatten)]
        api: ApiOpts,

        /// MySQL store options
        #[command(flatten)]
        store: StoreOpts,

        /// Stop after this many pages (safety cap for bounded test runs)
        #[arg(long)]
        max_pages: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tickets {
            endpoint,
            min_creation_date,
            api,
            store,
            max_pages,
        } => {
            let target = target::tickets(endpoint, min_creation_date);
            sync::run_sync(&api, &store, &target, max_pages).await?;
        }
        Commands::TimeEntries {
            endpoint,
            start_date,
            api,
            store,
            max_pages,
        } => {
            let target = target::time_entries(endpoint, start_date);
            sync::run_sync(&api, &store, &target, max_pages).await?;
        }
        Commands::Feedbacks {
            endpoint,
            min_creation_date,
            api,
            store,
            max_pages,
        } => {
            let target = target::feedbacks(endpoint, min_creation_date);
            sync::run_sync(&api, &store, &target, max_pages).await?;
        }
    }

    Ok(())
}
