//! Expense categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an expense was spent on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Drink,
    Gas,
    Accommodation,
    #[default]
    Others,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Food,
        ExpenseCategory::Drink,
        ExpenseCategory::Gas,
        ExpenseCategory::Accommodation,
        ExpenseCategory::Others,
    ];

    /// Canonical label used in JSON documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Drink => "Drink",
            Self::Gas => "Gas",
            Self::Accommodation => "Accommodation",
            Self::Others => "Others",
        }
    }

    /// Map a stored label to a category, treating anything unknown as `Others`
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "drink" | "drinks" => Ok(Self::Drink),
            "gas" | "fuel" => Ok(Self::Gas),
            "accommodation" | "hotel" => Ok(Self::Accommodation),
            "others" | "other" => Ok(Self::Others),
            _ => Err(format!("Unknown expense category: {}", s)),
        }
    }
}
