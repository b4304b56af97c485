//! Data CLI commands
//!
//! Import, export, sync, validation and audit log commands.

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::TripResult;
use crate::workspace::Workspace;

/// Import subcommands
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import members and hosts from a people document
    People {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Import trips from a trip document (import people first)
    Trips {
        /// Path to the JSON file
        file: PathBuf,
    },
}

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export every member and host
    People {
        /// Output path
        file: PathBuf,
    },
    /// Export every trip
    Trips {
        /// Output path
        file: PathBuf,
    },
}

/// Handle an import command
pub fn handle_import_command(workspace: &mut Workspace, cmd: ImportCommands) -> TripResult<()> {
    let (kind, summary) = match cmd {
        ImportCommands::People { file } => ("people", workspace.import_people(&file)?),
        ImportCommands::Trips { file } => ("trips", workspace.import_trips(&file)?),
    };

    println!(
        "Imported {}: {} added, {} updated, {} skipped",
        kind, summary.added, summary.updated, summary.skipped
    );
    println!("Run 'trip sync' to refresh spendings and trip lists.");
    Ok(())
}

/// Handle an export command
pub fn handle_export_command(workspace: &Workspace, cmd: ExportCommands) -> TripResult<()> {
    match cmd {
        ExportCommands::People { file } => {
            let count = workspace.export_people(&file)?;
            println!("Exported {} people to {}", count, file.display());
        }
        ExportCommands::Trips { file } => {
            let count = workspace.export_trips(&file)?;
            println!("Exported {} trips to {}", count, file.display());
        }
    }
    Ok(())
}

/// Rebuild people's trip data from the trips
pub fn handle_sync_command(workspace: &mut Workspace) -> TripResult<()> {
    let report = workspace.sync()?;

    println!(
        "Synced: {} member(s) and {} host(s) updated",
        report.members_updated, report.hosts_updated
    );
    for (trip_id, person_id) in &report.dangling {
        println!("  Warning: {} references unknown person {}", trip_id, person_id);
    }
    Ok(())
}

/// Report duplicate IDs and invalid trips; returns whether the data is valid
pub fn handle_validate_command(workspace: &Workspace) -> TripResult<bool> {
    let report = workspace.validate();

    if report.is_valid() {
        println!(
            "OK: {} people, {} trips",
            workspace.people().person_count(),
            workspace.trips().trip_count()
        );
        return Ok(true);
    }

    for issue in &report.people {
        println!("  {}", issue);
    }
    for (trip_id, error) in &report.trips {
        println!("  Trip {}: {}", trip_id, error);
    }
    println!(
        "Found {} problem(s)",
        report.people.len() + report.trips.len()
    );
    Ok(false)
}

/// Print recent audit log entries
pub fn handle_audit_command(workspace: &Workspace, limit: usize) -> TripResult<()> {
    let Some(logger) = workspace.audit_logger() else {
        println!("Audit log is disabled in settings.");
        return Ok(());
    };

    let entries = logger.read_recent(limit)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
