//! Deterministic ID generation
//!
//! People: upper-cased first letter of each name word, `_`, then the birth
//! month and day (`MMDD`). Trips: the letters of the destination upper-cased,
//! `_`, then the start month and day.
//!
//! IDs are only unique as long as no two people share initials and birthday
//! (or two trips share destination and start day). Callers that need
//! uniqueness check against the managers before inserting.

use super::date::TripDate;

fn month_day(date: TripDate) -> String {
    format!("{:02}{:02}", date.month, date.day)
}

/// Generate a person ID from a full name and date of birth
///
/// # Examples
/// ```
/// use trip_planner::models::{generate_person_id, TripDate};
/// assert_eq!(generate_person_id("Jane Doe", TripDate::new(15, 3, 1995)), "JD_0315");
/// ```
pub fn generate_person_id(full_name: &str, date_of_birth: TripDate) -> String {
    let initials: String = full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    format!("{}_{}", initials, month_day(date_of_birth))
}

/// Generate a trip ID from a destination and start date
///
/// # Examples
/// ```
/// use trip_planner::models::{generate_trip_id, TripDate};
/// assert_eq!(generate_trip_id("Paris", TripDate::new(1, 6, 2025)), "PARIS_0601");
/// ```
pub fn generate_trip_id(destination: &str, start_date: TripDate) -> String {
    let letters: String = destination
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_uppercase)
        .collect();

    format!("{}_{}", letters, month_day(start_date))
}
