//! Entity managers
//!
//! The person and trip managers own the authoritative collections, announce
//! every change through a `Subject` and persist through a store.

pub mod observer;
pub mod person;
pub mod trip;

pub use observer::{ChangeEvent, EventLog, Observer, Subject};
pub use person::{IntegrityIssue, PersonManager};
pub use trip::TripManager;
