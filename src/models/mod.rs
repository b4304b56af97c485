//! Core data models for the trip planner
//!
//! This module contains the entity model: people (members and hosts),
//! trips, expenses, and the small value types they are built from.

pub mod category;
pub mod date;
pub mod expense;
pub mod gender;
pub mod host;
pub mod ids;
pub mod member;
pub mod money;
pub mod person;
pub mod status;
pub mod trip;

pub use category::ExpenseCategory;
pub use date::{DateParseError, TripDate};
pub use expense::{Expense, ExpenseValidationError, Spending};
pub use gender::Gender;
pub use host::Host;
pub use ids::{generate_person_id, generate_trip_id};
pub use member::Member;
pub use money::{Money, MoneyParseError};
pub use person::{Person, PersonInfo, Role};
pub use status::TripStatus;
pub use trip::{Trip, TripValidationError};
