//! Audit logging for the trip planner
//!
//! Records every create, update and delete the managers announce in an
//! append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: one log line with timestamp, operation, entity type and
//!   entity ID.
//! - `AuditLogger`: appends entries to the log file as line-delimited JSON
//!   (JSONL) and reads them back.
//! - `AuditObserver`: an `Observer` that turns change notifications into
//!   entries.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use trip_planner::audit::{AuditLogger, AuditObserver};
//! use trip_planner::managers::TripManager;
//! use trip_planner::storage::MemoryTripStore;
//!
//! let trips = TripManager::open(MemoryTripStore::new(), None).unwrap();
//! let audit = Rc::new(AuditObserver::new(AuditLogger::new("cache/audit.log")));
//! trips.add_observer(&audit);
//! ```

mod entry;
mod logger;
mod observer;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
pub use observer::AuditObserver;
