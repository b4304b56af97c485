//! Service layer for the trip planner
//!
//! The service layer provides business logic on top of the managers,
//! handling validation, back-references, and cross-entity operations.

pub mod filter;
pub mod person;
pub mod sync;
pub mod trip;

pub use filter::{sort_trips, TripFilter, TripSortKey};
pub use person::PersonService;
pub use sync::{SyncReport, SyncService};
pub use trip::{NewTrip, TripDetails, TripService};
