//! Trip model
//!
//! A trip references its host and members by ID. Person details are looked
//! up through the person manager when needed, so a trip never holds a stale
//! copy of someone's profile.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::TripDate;
use super::expense::Expense;
use super::ids::generate_trip_id;
use super::money::Money;
use super::status::TripStatus;

/// A journey with a host, members and expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    destination: String,
    #[serde(default)]
    pub description: String,
    pub start_date: TripDate,
    pub end_date: TripDate,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    host_id: Option<String>,
    #[serde(default)]
    member_ids: Vec<String>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

impl Trip {
    /// Create a trip with an explicit ID; the destination is stored upper-cased
    pub fn new(
        id: impl Into<String>,
        destination: &str,
        description: impl Into<String>,
        start_date: TripDate,
        end_date: TripDate,
        status: TripStatus,
    ) -> Self {
        Self {
            id: id.into(),
            destination: destination.to_uppercase(),
            description: description.into(),
            start_date,
            end_date,
            status,
            host_id: None,
            member_ids: Vec::new(),
            expenses: Vec::new(),
        }
    }

    /// Create a planned trip whose ID is derived from destination and start date
    ///
    /// # Examples
    /// ```
    /// use trip_planner::models::{Trip, TripDate};
    /// let trip = Trip::create("Paris", "Summer", TripDate::new(1, 6, 2025), TripDate::new(7, 6, 2025));
    /// assert_eq!(trip.id, "PARIS_0601");
    /// ```
    pub fn create(
        destination: &str,
        description: impl Into<String>,
        start_date: TripDate,
        end_date: TripDate,
    ) -> Self {
        let id = generate_trip_id(destination, start_date);
        Self::new(
            id,
            destination,
            description,
            start_date,
            end_date,
            TripStatus::Planned,
        )
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn set_destination(&mut self, destination: &str) {
        self.destination = destination.to_uppercase();
    }

    // Host

    pub fn host_id(&self) -> Option<&str> {
        self.host_id.as_deref()
    }

    pub fn has_host(&self) -> bool {
        self.host_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn set_host(&mut self, host_id: impl Into<String>) {
        self.host_id = Some(host_id.into());
    }

    pub fn clear_host(&mut self) {
        self.host_id = None;
    }

    // Members

    pub fn member_ids(&self) -> &[String] {
        &self.member_ids
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == member_id)
    }

    /// Add a member unless already present; returns whether it was added
    pub fn add_member(&mut self, member_id: impl Into<String>) -> bool {
        let member_id = member_id.into();
        if self.has_member(&member_id) {
            return false;
        }
        self.member_ids.push(member_id);
        true
    }

    pub fn remove_member(&mut self, member_id: &str) -> bool {
        match self.member_ids.iter().position(|id| id == member_id) {
            Some(pos) => {
                self.member_ids.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replace the member list, dropping repeated IDs
    pub fn set_members(&mut self, member_ids: Vec<String>) {
        self.member_ids.clear();
        for id in member_ids {
            self.add_member(id);
        }
    }

    // Expenses

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Append an expense; non-positive amounts are ignored
    ///
    /// Returns whether the expense was recorded.
    pub fn add_expense(&mut self, expense: Expense) -> bool {
        if !expense.amount.is_positive() {
            return false;
        }
        self.expenses.push(expense);
        true
    }

    pub fn remove_expense(&mut self, index: usize) -> Option<Expense> {
        if index < self.expenses.len() {
            Some(self.expenses.remove(index))
        } else {
            None
        }
    }

    pub fn set_expenses(&mut self, expenses: Vec<Expense>) {
        self.expenses = expenses;
    }

    /// Expenses paid by one member
    pub fn expenses_by<'a>(&'a self, member_id: &'a str) -> impl Iterator<Item = &'a Expense> + 'a {
        self.expenses
            .iter()
            .filter(move |e| e.person_in_charge == member_id)
    }

    /// Sum of all expenses
    pub fn total_expense(&self) -> Money {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    /// Length of the trip in days, inclusive, when both dates are real calendar dates
    pub fn duration_days(&self) -> Option<i64> {
        let start = self.start_date.to_naive()?;
        let end = self.end_date.to_naive()?;
        Some((end - start).num_days() + 1)
    }

    /// Validate the trip
    pub fn validate(&self) -> Result<(), TripValidationError> {
        if self.id.trim().is_empty() {
            return Err(TripValidationError::EmptyId);
        }

        if self.destination.trim().is_empty() {
            return Err(TripValidationError::EmptyDestination);
        }

        if self.end_date < self.start_date {
            return Err(TripValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }

        Ok(())
    }
}

/// Trips compare on identity, description, destination, dates, status,
/// members and host; expenses are not part of equality.
impl PartialEq for Trip {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.description == other.description
            && self.destination == other.destination
            && self.start_date == other.start_date
            && self.end_date == other.end_date
            && self.status == other.status
            && self.member_ids == other.member_ids
            && self.host_id == other.host_id
    }
}

impl Eq for Trip {}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} - {}, {})",
            self.id, self.destination, self.start_date, self.end_date, self.status
        )
    }
}

/// Validation errors for trips
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripValidationError {
    EmptyId,
    EmptyDestination,
    EndBeforeStart { start: TripDate, end: TripDate },
}

impl fmt::Display for TripValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Trip ID cannot be empty"),
            Self::EmptyDestination => write!(f, "Trip destination cannot be empty"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "Trip ends ({}) before it starts ({})", end, start)
            }
        }
    }
}

impl std::error::Error for TripValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;

    fn paris() -> Trip {
        Trip::create(
            "Paris",
            "Summer in Paris",
            TripDate::new(1, 6, 2025),
            TripDate::new(7, 6, 2025),
        )
    }

    fn expense(amount: i64, pic: &str) -> Expense {
        Expense::new(
            TripDate::new(2, 6, 2025),
            ExpenseCategory::Food,
            Money::from_vnd(amount),
            "",
            pic,
        )
    }

    #[test]
    fn test_create() {
        let trip = paris();
        assert_eq!(trip.id, "PARIS_0601");
        assert_eq!(trip.destination(), "PARIS");
        assert_eq!(trip.status, TripStatus::Planned);
        assert!(!trip.has_host());
        assert_eq!(trip.duration_days(), Some(7));
    }

    #[test]
    fn test_add_member_dedups() {
        let mut trip = paris();
        assert!(trip.add_member("AB_0202"));
        assert!(!trip.add_member("AB_0202"));
        assert_eq!(trip.member_ids(), ["AB_0202".to_string()]);

        trip.set_members(vec!["X_0101".into(), "Y_0202".into(), "X_0101".into()]);
        assert_eq!(trip.member_ids().len(), 2);

        assert!(trip.remove_member("X_0101"));
        assert!(!trip.remove_member("X_0101"));
    }

    #[test]
    fn test_add_expense_ignores_non_positive() {
        let mut trip = paris();
        assert!(trip.add_expense(expense(500_000, "AB_0202")));
        assert!(!trip.add_expense(expense(0, "AB_0202")));
        assert!(!trip.add_expense(expense(-10, "AB_0202")));

        assert_eq!(trip.expenses().len(), 1);
        assert_eq!(trip.total_expense(), Money::from_vnd(500_000));
    }

    #[test]
    fn test_total_expense_follows_set_expenses() {
        let mut trip = paris();
        trip.add_expense(expense(100, "AB_0202"));
        trip.set_expenses(vec![expense(300, "AB_0202"), expense(200, "CD_0303")]);

        assert_eq!(trip.total_expense(), Money::from_vnd(500));
        assert_eq!(trip.expenses_by("CD_0303").count(), 1);

        let removed = trip.remove_expense(0).unwrap();
        assert_eq!(removed.amount, Money::from_vnd(300));
        assert!(trip.remove_expense(5).is_none());
        assert_eq!(trip.total_expense(), Money::from_vnd(200));
    }

    #[test]
    fn test_host() {
        let mut trip = paris();
        trip.set_host("JS_0101");
        assert!(trip.has_host());
        assert_eq!(trip.host_id(), Some("JS_0101"));

        trip.clear_host();
        assert!(!trip.has_host());
    }

    #[test]
    fn test_equality_ignores_expenses() {
        let a = paris();
        let mut b = paris();
        b.add_expense(expense(10, "AB_0202"));
        assert_eq!(a, b);

        b.add_member("AB_0202");
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate() {
        assert!(paris().validate().is_ok());

        let backwards = Trip::create(
            "Rome",
            "",
            TripDate::new(10, 7, 2025),
            TripDate::new(1, 7, 2025),
        );
        assert!(matches!(
            backwards.validate(),
            Err(TripValidationError::EndBeforeStart { .. })
        ));

        let nowhere = Trip::new("X", "  ", "", TripDate::default(), TripDate::default(), TripStatus::Planned);
        assert_eq!(nowhere.validate(), Err(TripValidationError::EmptyDestination));
    }
}
