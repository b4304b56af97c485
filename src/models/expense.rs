//! Expense model
//!
//! An expense belongs to a trip and is attributed to one of the trip's
//! members by ID. Equality covers every field, so two expenses are equal
//! when their date, amount, category, note and person in charge match.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::ExpenseCategory;
use super::date::TripDate;
use super::money::Money;

/// A dated, categorized outlay within a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub date: TripDate,
    pub category: ExpenseCategory,
    pub amount: Money,
    #[serde(default)]
    pub note: String,
    /// ID of the member who paid
    pub person_in_charge: String,
}

impl Expense {
    pub fn new(
        date: TripDate,
        category: ExpenseCategory,
        amount: Money,
        note: impl Into<String>,
        person_in_charge: impl Into<String>,
    ) -> Self {
        Self {
            date,
            category,
            amount,
            note: note.into(),
            person_in_charge: person_in_charge.into(),
        }
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.person_in_charge.trim().is_empty() {
            return Err(ExpenseValidationError::MissingPersonInCharge);
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.date, self.category, self.amount, self.person_in_charge
        )
    }
}

/// A member's share of spending: an expense tagged with its trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spending {
    pub trip_id: String,
    pub expense: Expense,
}

impl Spending {
    pub fn new(trip_id: impl Into<String>, expense: Expense) -> Self {
        Self {
            trip_id: trip_id.into(),
            expense,
        }
    }

    pub fn amount(&self) -> Money {
        self.expense.amount
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    MissingPersonInCharge,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
            Self::MissingPersonInCharge => write!(f, "Expense has no person in charge"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunch() -> Expense {
        Expense::new(
            TripDate::new(2, 6, 2025),
            ExpenseCategory::Food,
            Money::from_vnd(500_000),
            "Lunch",
            "AB_0202",
        )
    }

    #[test]
    fn test_equality_uses_all_fields() {
        let a = lunch();
        let mut b = lunch();
        assert_eq!(a, b);

        b.person_in_charge = "JS_0101".into();
        assert_ne!(a, b);

        let mut c = lunch();
        c.note = "Dinner".into();
        assert_ne!(a, c);
    }

    #[test]
    fn test_validate() {
        assert!(lunch().validate().is_ok());

        let mut free = lunch();
        free.amount = Money::zero();
        assert_eq!(
            free.validate(),
            Err(ExpenseValidationError::NonPositiveAmount(Money::zero()))
        );

        let mut orphan = lunch();
        orphan.person_in_charge = " ".into();
        assert_eq!(
            orphan.validate(),
            Err(ExpenseValidationError::MissingPersonInCharge)
        );
    }

    #[test]
    fn test_spending_amount() {
        let spending = Spending::new("PARIS_0601", lunch());
        assert_eq!(spending.amount(), Money::from_vnd(500_000));
    }
}
