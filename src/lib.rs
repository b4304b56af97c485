//! Trip planner - trips, participants and expenses with JSON-file persistence
//!
//! This library provides the core of a small travel-planning tool: managers
//! that own the trips and the people taking part in them, change
//! notifications for dependent views, and the JSON documents the state is
//! cached in and exchanged through.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Cache folder resolution and user settings
//! - `error`: Custom error types
//! - `models`: Entity model (trips, members, hosts, expenses) and ID factories
//! - `managers`: Observer/subject plus the person and trip managers
//! - `storage`: JSON documents, atomic file writes and persistence ports
//! - `services`: Cross-entity operations, sync, filtering and sorting
//! - `audit`: Append-only audit log fed by manager notifications
//! - `display`: Plain-text formatting for the command line
//! - `cli`: Command handlers for the `trip` binary
//! - `workspace`: Both managers opened against one cache folder
//!
//! # Example
//!
//! ```rust,no_run
//! use trip_planner::Workspace;
//!
//! let mut workspace = Workspace::open_current_dir()?;
//! let report = workspace.sync()?;
//! println!("{} members updated", report.members_updated);
//! # Ok::<(), trip_planner::TripError>(())
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod managers;
pub mod models;
pub mod services;
pub mod storage;
pub mod workspace;

pub use error::{TripError, TripResult};
pub use workspace::Workspace;
