//! Member model
//!
//! A member joins trips and pays for expenses. `joined_trip_ids` and
//! `spendings` mirror what the trips say about this member; the total spent
//! is always computed from `spendings`, never stored separately.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::TripDate;
use super::expense::{Expense, Spending};
use super::gender::Gender;
use super::ids::generate_person_id;
use super::money::Money;
use super::person::PersonInfo;

/// A trip participant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Member {
    pub info: PersonInfo,

    /// Trips this member has joined, in join order
    #[serde(default)]
    pub joined_trip_ids: Vec<String>,

    #[serde(default)]
    pub emergency_contact: String,

    #[serde(default)]
    pub has_driver_license: bool,

    /// Interests, deduplicated on insert
    #[serde(default)]
    pub interests: Vec<String>,

    #[serde(default)]
    spendings: Vec<Spending>,
}

impl Member {
    /// Wrap a profile as a member with no trips or spendings
    pub fn new(info: PersonInfo) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    /// Create a member whose ID is derived from name and birth date
    ///
    /// # Examples
    /// ```
    /// use trip_planner::models::{Gender, Member, TripDate};
    /// let member = Member::create("Ann Bee", Gender::Female, TripDate::new(2, 2, 1992));
    /// assert_eq!(member.id(), "AB_0202");
    /// ```
    pub fn create(full_name: &str, gender: Gender, date_of_birth: TripDate) -> Self {
        let id = generate_person_id(full_name, date_of_birth);
        Self::new(PersonInfo::new(id, full_name, gender, date_of_birth))
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn full_name(&self) -> &str {
        &self.info.full_name
    }

    /// Most recently joined trip, if any
    pub fn last_joined_trip_id(&self) -> Option<&str> {
        self.joined_trip_ids.last().map(String::as_str)
    }

    pub fn joined_trip_count(&self) -> usize {
        self.joined_trip_ids.len()
    }

    pub fn has_joined_trip(&self, trip_id: &str) -> bool {
        self.joined_trip_ids.iter().any(|id| id == trip_id)
    }

    /// Record that this member joined a trip (no-op if already joined)
    pub fn join_trip(&mut self, trip_id: impl Into<String>) {
        let trip_id = trip_id.into();
        if !self.has_joined_trip(&trip_id) {
            self.joined_trip_ids.push(trip_id);
        }
    }

    pub fn leave_trip(&mut self, trip_id: &str) {
        if let Some(pos) = self.joined_trip_ids.iter().position(|id| id == trip_id) {
            self.joined_trip_ids.remove(pos);
        }
    }

    /// Add an interest unless it is already listed
    pub fn add_interest(&mut self, interest: impl Into<String>) {
        let interest = interest.into();
        if !self.interests.contains(&interest) {
            self.interests.push(interest);
        }
    }

    pub fn spendings(&self) -> &[Spending] {
        &self.spendings
    }

    pub fn spendings_for_trip(&self, trip_id: &str) -> Vec<&Spending> {
        self.spendings
            .iter()
            .filter(|s| s.trip_id == trip_id)
            .collect()
    }

    pub fn add_spending(&mut self, trip_id: impl Into<String>, expense: Expense) {
        self.spendings.push(Spending::new(trip_id, expense));
    }

    /// Remove the first spending matching both trip and expense
    ///
    /// Returns whether a spending was removed.
    pub fn remove_spending(&mut self, trip_id: &str, expense: &Expense) -> bool {
        let found = self
            .spendings
            .iter()
            .position(|s| s.trip_id == trip_id && &s.expense == expense);

        match found {
            Some(pos) => {
                self.spendings.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every spending recorded against a trip, returning how many were removed
    pub fn remove_spendings_for_trip(&mut self, trip_id: &str) -> usize {
        let before = self.spendings.len();
        self.spendings.retain(|s| s.trip_id != trip_id);
        before - self.spendings.len()
    }

    pub fn set_spendings(&mut self, spendings: Vec<Spending>) {
        self.spendings = spendings;
    }

    pub fn clear_spendings(&mut self) {
        self.spendings.clear();
    }

    /// Sum of all spendings
    pub fn total_spent(&self) -> Money {
        self.spendings.iter().map(Spending::amount).sum()
    }

    /// Sum of spendings for one trip
    pub fn total_spent_on(&self, trip_id: &str) -> Money {
        self.spendings
            .iter()
            .filter(|s| s.trip_id == trip_id)
            .map(Spending::amount)
            .sum()
    }
}

/// Members are identified by ID alone
impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.info.id == other.info.id
    }
}

impl Eq for Member {}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  -  {}  -  {}", self.id(), self.full_name(), self.info.age())
    }
}
