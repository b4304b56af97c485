use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trip_planner::cli::{
    handle_audit_command, handle_export_command, handle_import_command, handle_person_command,
    handle_sync_command, handle_trip_command, handle_validate_command,
};
use trip_planner::config::{CachePaths, Settings};
use trip_planner::Workspace;

#[derive(Parser)]
#[command(
    name = "trip",
    version,
    about = "Plan trips, track who joins them and what they spend",
    long_about = "Manages trips, their hosts and members, and trip expenses. \
                  All state lives in JSON files under ./cache in the current \
                  directory; run 'trip init' to create it."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the cache folder and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Member and host management commands
    #[command(subcommand, alias = "people")]
    Person(trip_planner::cli::PersonCommands),

    /// Trip management commands
    #[command(subcommand)]
    Trip(trip_planner::cli::TripCommands),

    /// Import a people or trip document
    #[command(subcommand)]
    Import(trip_planner::cli::ImportCommands),

    /// Export people or trips to a document
    #[command(subcommand)]
    Export(trip_planner::cli::ExportCommands),

    /// Rebuild people's spendings and trip lists from the trips
    Sync,

    /// Check for duplicate IDs and invalid trips
    Validate,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TRIP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let paths = CachePaths::with_working_dir(std::env::current_dir()?);
            paths.ensure_cache_dir()?;
            let settings = Settings::load_or_create(&paths)?;
            settings.save(&paths)?;

            println!("Initialized trip cache at: {}", paths.cache_dir().display());
            println!();
            println!("Run 'trip person add-host' and 'trip trip add' to get started.");
        }
        Some(Commands::Config) => {
            let paths = CachePaths::from_current_dir()?;
            let settings = Settings::load_or_create(&paths)?;

            println!("Trip Planner Configuration");
            println!("==========================");
            println!("Cache directory: {}", paths.cache_dir().display());
            println!("Trip cache:      {}", paths.trip_cache_file().display());
            println!("People cache:    {}", paths.people_cache_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency label:      {}", settings.currency_label);
            println!("  Thousands separator: '{}'", settings.thousands_separator);
            println!("  Audit enabled:       {}", settings.audit_enabled);
        }
        Some(Commands::Person(cmd)) => {
            let mut workspace = Workspace::open_current_dir()?;
            handle_person_command(&mut workspace, cmd)?;
        }
        Some(Commands::Trip(cmd)) => {
            let mut workspace = Workspace::open_current_dir()?;
            handle_trip_command(&mut workspace, cmd)?;
        }
        Some(Commands::Import(cmd)) => {
            let mut workspace = Workspace::open_current_dir()?;
            handle_import_command(&mut workspace, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            let workspace = Workspace::open_current_dir()?;
            handle_export_command(&workspace, cmd)?;
        }
        Some(Commands::Sync) => {
            let mut workspace = Workspace::open_current_dir()?;
            handle_sync_command(&mut workspace)?;
        }
        Some(Commands::Validate) => {
            let workspace = Workspace::open_current_dir()?;
            if !handle_validate_command(&workspace)? {
                drop(workspace);
                std::process::exit(1);
            }
        }
        Some(Commands::Audit { limit }) => {
            let workspace = Workspace::open_current_dir()?;
            handle_audit_command(&workspace, limit)?;
        }
        None => {
            println!("Trip Planner - trips, people and expenses");
            println!();
            println!("Run 'trip --help' for usage information.");
            println!("Run 'trip init' to create the cache folder here.");
        }
    }

    Ok(())
}
