//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the workspace and services.

pub mod data;
pub mod person;
pub mod trip;

pub use data::{
    handle_audit_command, handle_export_command, handle_import_command, handle_sync_command,
    handle_validate_command, ExportCommands, ImportCommands,
};
pub use person::{handle_person_command, PersonCommands};
pub use trip::{handle_trip_command, TripCommands};
