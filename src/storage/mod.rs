//! Storage layer for the trip planner
//!
//! Provides JSON file storage with atomic writes, the record mapping for
//! the trip and people documents, and the persistence ports the managers
//! write through.

pub mod file_io;
pub mod json;
pub mod memory;
pub mod store;

pub use json::{
    export_people_info_to_json, export_trips_info_to_json, import_people_info_from_json,
    import_trip_info_from_json,
};
pub use memory::{MemoryPeopleStore, MemoryTripStore};
pub use store::{
    JsonPeopleStore, JsonTripStore, PeopleSnapshot, PeopleStore, PersonLookup, TripStore,
};
