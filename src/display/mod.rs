//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for trips and people.

pub mod person;
pub mod trip;

pub use person::{format_people_list, format_person_details};
pub use trip::{format_expenses, format_trip_details, format_trip_list};
