//! Trip service
//!
//! Multi-step trip operations that touch both managers. The trip is the
//! source of truth for who hosts and joins it; the matching member and host
//! back-references are updated here so the people cache stays in step.

use tracing::{info, warn};

use crate::error::{TripError, TripResult};
use crate::managers::{PersonManager, TripManager};
use crate::models::{Expense, Host, Member, Money, Trip, TripDate, TripStatus};

/// Input for creating a new trip
#[derive(Debug, Clone, Default)]
pub struct NewTrip {
    pub destination: String,
    pub description: String,
    pub start_date: TripDate,
    pub end_date: TripDate,
    pub host_id: Option<String>,
    pub member_ids: Vec<String>,
}

/// A trip with its host and members resolved
#[derive(Debug, Clone)]
pub struct TripDetails {
    pub trip: Trip,
    pub host: Option<Host>,
    pub members: Vec<Member>,
    /// Referenced IDs with no matching person
    pub missing: Vec<String>,
}

impl TripDetails {
    pub fn total_expense(&self) -> Money {
        self.trip.total_expense()
    }

    /// Total spent on this trip by each resolved member
    pub fn spending_by_member(&self) -> Vec<(&Member, Money)> {
        self.members
            .iter()
            .map(|m| (m, self.trip.expenses_by(m.id()).map(|e| e.amount).sum::<Money>()))
            .collect()
    }
}

/// Service for trip management
pub struct TripService<'a> {
    trips: &'a mut TripManager,
    people: &'a mut PersonManager,
}

impl<'a> TripService<'a> {
    /// Create a new trip service
    pub fn new(trips: &'a mut TripManager, people: &'a mut PersonManager) -> Self {
        Self { trips, people }
    }

    /// Create a trip with a generated ID
    pub fn create_trip(&mut self, new: NewTrip) -> TripResult<Trip> {
        let mut trip = Trip::create(
            &new.destination,
            new.description,
            new.start_date,
            new.end_date,
        );

        trip.validate()
            .map_err(|e| TripError::Validation(e.to_string()))?;

        if self.trips.contains_id(&trip.id) {
            return Err(TripError::Duplicate {
                entity_type: "Trip",
                identifier: trip.id.clone(),
            });
        }

        if let Some(host_id) = &new.host_id {
            if self.people.find_host_by_id(host_id).is_none() {
                return Err(TripError::host_not_found(host_id));
            }
            trip.set_host(host_id.clone());
        }

        for member_id in &new.member_ids {
            if self.people.find_member_by_id(member_id).is_none() {
                return Err(TripError::member_not_found(member_id));
            }
        }
        trip.set_members(new.member_ids);

        info!(id = %trip.id, destination = %trip.destination(), "Creating trip");
        self.trips.add_trip(trip.clone())?;

        if let Some(host_id) = trip.host_id() {
            self.edit_host(host_id, |h| h.host_trip(trip.id.clone()))?;
        }
        for member_id in trip.member_ids() {
            self.edit_member(member_id, |m| m.join_trip(trip.id.clone()))?;
        }

        Ok(trip)
    }

    /// Add a member to a trip; `Ok(false)` if they were already on it
    pub fn add_member(&mut self, trip_id: &str, member_id: &str) -> TripResult<bool> {
        let mut trip = self.get(trip_id)?;
        if self.people.find_member_by_id(member_id).is_none() {
            return Err(TripError::member_not_found(member_id));
        }

        if !trip.add_member(member_id) {
            return Ok(false);
        }

        self.trips.update_trip(trip_id, trip)?;
        self.edit_member(member_id, |m| m.join_trip(trip_id))?;
        Ok(true)
    }

    /// Take a member off a trip along with the expenses they paid for on it
    pub fn remove_member(&mut self, trip_id: &str, member_id: &str) -> TripResult<bool> {
        let mut trip = self.get(trip_id)?;
        if !trip.remove_member(member_id) {
            return Ok(false);
        }

        let remaining: Vec<Expense> = trip
            .expenses()
            .iter()
            .filter(|e| e.person_in_charge != member_id)
            .cloned()
            .collect();
        trip.set_expenses(remaining);

        self.trips.update_trip(trip_id, trip)?;
        self.edit_member(member_id, |m| {
            m.leave_trip(trip_id);
            m.remove_spendings_for_trip(trip_id);
        })?;
        Ok(true)
    }

    /// Assign or clear the host of a trip
    pub fn set_host(&mut self, trip_id: &str, host_id: Option<&str>) -> TripResult<()> {
        let mut trip = self.get(trip_id)?;

        if let Some(host_id) = host_id {
            if self.people.find_host_by_id(host_id).is_none() {
                return Err(TripError::host_not_found(host_id));
            }
        }

        let previous = trip.host_id().map(str::to_string);
        if previous.as_deref() == host_id {
            return Ok(());
        }

        match host_id {
            Some(id) => trip.set_host(id),
            None => trip.clear_host(),
        }
        self.trips.update_trip(trip_id, trip)?;

        if let Some(previous) = previous {
            self.edit_host(&previous, |h| h.unhost_trip(trip_id))?;
        }
        if let Some(host_id) = host_id {
            self.edit_host(host_id, |h| h.host_trip(trip_id))?;
        }
        Ok(())
    }

    /// Record an expense paid by one of the trip's members
    pub fn add_expense(&mut self, trip_id: &str, expense: Expense) -> TripResult<()> {
        expense
            .validate()
            .map_err(|e| TripError::Validation(e.to_string()))?;

        let mut trip = self.get(trip_id)?;
        if !trip.has_member(&expense.person_in_charge) {
            return Err(TripError::Validation(format!(
                "{} is not a member of trip {}",
                expense.person_in_charge, trip_id
            )));
        }

        trip.add_expense(expense.clone());
        self.trips.update_trip(trip_id, trip)?;

        let payer = expense.person_in_charge.clone();
        self.edit_member(&payer, |m| m.add_spending(trip_id, expense))?;
        Ok(())
    }

    /// Remove the expense at `index` and return it
    pub fn remove_expense(&mut self, trip_id: &str, index: usize) -> TripResult<Expense> {
        let mut trip = self.get(trip_id)?;
        let expense = trip.remove_expense(index).ok_or_else(|| TripError::NotFound {
            entity_type: "Expense",
            identifier: format!("{}#{}", trip_id, index),
        })?;

        self.trips.update_trip(trip_id, trip)?;
        self.edit_member(&expense.person_in_charge, |m| {
            m.remove_spending(trip_id, &expense);
        })?;
        Ok(expense)
    }

    /// Delete a trip and every back-reference to it
    pub fn remove_trip(&mut self, trip_id: &str) -> TripResult<Trip> {
        let trip = self.get(trip_id)?;
        self.trips.remove_trip(trip_id)?;

        if let Some(host_id) = trip.host_id() {
            self.edit_host(host_id, |h| h.unhost_trip(trip_id))?;
        }
        for member_id in trip.member_ids() {
            self.edit_member(member_id, |m| {
                m.leave_trip(trip_id);
                m.remove_spendings_for_trip(trip_id);
            })?;
        }

        info!(id = %trip_id, "Removed trip");
        Ok(trip)
    }

    pub fn set_status(&mut self, trip_id: &str, status: TripStatus) -> TripResult<()> {
        let mut trip = self.get(trip_id)?;
        if trip.status == status {
            return Ok(());
        }

        trip.status = status;
        self.trips.update_trip(trip_id, trip)?;
        Ok(())
    }

    /// Delete a person and detach them from every trip
    ///
    /// Expenses they paid for are dropped from the trips they were on. An ID
    /// held by both a member and a host is detached in both roles, so both
    /// records go.
    pub fn remove_person(&mut self, person_id: &str) -> TripResult<()> {
        if !self.people.contains_id(person_id) {
            return Err(TripError::person_not_found(person_id));
        }

        let affected: Vec<Trip> = self
            .trips
            .trips_involving(person_id)
            .into_iter()
            .cloned()
            .collect();

        for mut trip in affected {
            if trip.host_id() == Some(person_id) {
                trip.clear_host();
            }
            if trip.remove_member(person_id) {
                let remaining: Vec<Expense> = trip
                    .expenses()
                    .iter()
                    .filter(|e| e.person_in_charge != person_id)
                    .cloned()
                    .collect();
                trip.set_expenses(remaining);
            }
            let id = trip.id.clone();
            self.trips.update_trip(&id, trip)?;
        }

        self.people.remove_member(person_id)?;
        self.people.remove_host(person_id)?;
        info!(id = %person_id, "Removed person");
        Ok(())
    }

    /// Get a trip with its host and members resolved
    pub fn details(&self, trip_id: &str) -> TripResult<TripDetails> {
        let trip = self.get(trip_id)?;
        let mut missing = Vec::new();

        let host = match trip.host_id() {
            Some(id) => {
                let host = self.people.host_by_id(id);
                if host.is_none() {
                    missing.push(id.to_string());
                }
                host
            }
            None => None,
        };

        let mut members = Vec::with_capacity(trip.member_ids().len());
        for id in trip.member_ids() {
            match self.people.member_by_id(id) {
                Some(member) => members.push(member),
                None => missing.push(id.clone()),
            }
        }

        Ok(TripDetails {
            trip,
            host,
            members,
            missing,
        })
    }

    /// Get a trip by ID
    pub fn get(&self, trip_id: &str) -> TripResult<Trip> {
        self.trips
            .find_trip_by_id(trip_id)
            .cloned()
            .ok_or_else(|| TripError::trip_not_found(trip_id))
    }

    fn edit_member(&mut self, id: &str, edit: impl FnOnce(&mut Member)) -> TripResult<()> {
        let Some(mut member) = self.people.member_by_id(id) else {
            warn!(%id, "Trip references unknown member");
            return Ok(());
        };

        edit(&mut member);
        self.people.update_member(id, member)?;
        Ok(())
    }

    fn edit_host(&mut self, id: &str, edit: impl FnOnce(&mut Host)) -> TripResult<()> {
        let Some(mut host) = self.people.host_by_id(id) else {
            warn!(%id, "Trip references unknown host");
            return Ok(());
        };

        edit(&mut host);
        self.people.update_host(id, host)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, Gender};
    use crate::storage::{MemoryPeopleStore, MemoryTripStore};

    fn create_test_managers() -> (TripManager, PersonManager) {
        let mut people = PersonManager::open(MemoryPeopleStore::new()).unwrap();
        people
            .add_host(Host::create("John Smith", Gender::Male, TripDate::new(1, 1, 1980)))
            .unwrap();
        people
            .add_member(Member::create("Ann Bee", Gender::Female, TripDate::new(2, 2, 1992)))
            .unwrap();
        people
            .add_member(Member::create("Carl Dunn", Gender::Male, TripDate::new(3, 3, 1993)))
            .unwrap();

        let trips = TripManager::open(MemoryTripStore::new(), Some(&people)).unwrap();
        (trips, people)
    }

    fn paris() -> NewTrip {
        NewTrip {
            destination: "Paris".into(),
            description: "Summer in France".into(),
            start_date: TripDate::new(1, 6, 2025),
            end_date: TripDate::new(7, 6, 2025),
            host_id: Some("JS_0101".into()),
            member_ids: vec!["AB_0202".into()],
        }
    }

    fn food(amount: i64, payer: &str) -> Expense {
        Expense::new(
            TripDate::new(2, 6, 2025),
            ExpenseCategory::Food,
            Money::from_vnd(amount),
            "Dinner",
            payer,
        )
    }

    #[test]
    fn test_create_trip_links_people() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);

        let trip = service.create_trip(paris()).unwrap();
        assert_eq!(trip.id, "PARIS_0601");
        assert_eq!(trip.host_id(), Some("JS_0101"));

        assert!(people.find_host_by_id("JS_0101").unwrap().has_hosted_trip("PARIS_0601"));
        assert!(people.find_member_by_id("AB_0202").unwrap().has_joined_trip("PARIS_0601"));
        assert_eq!(trips.trip_count(), 1);
    }

    #[test]
    fn test_create_trip_rejects_bad_input() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);

        service.create_trip(paris()).unwrap();
        let duplicate = service.create_trip(paris());
        assert!(matches!(duplicate, Err(TripError::Duplicate { .. })));

        let mut backwards = paris();
        backwards.start_date = TripDate::new(2, 6, 2025);
        backwards.end_date = TripDate::new(1, 6, 2025);
        assert!(service.create_trip(backwards).unwrap_err().is_validation());

        let mut unknown_host = paris();
        unknown_host.start_date = TripDate::new(5, 6, 2025);
        unknown_host.host_id = Some("AB_0202".into());
        assert!(service.create_trip(unknown_host).unwrap_err().is_not_found());
    }

    #[test]
    fn test_add_expense_updates_member() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();

        service.add_expense("PARIS_0601", food(500_000, "AB_0202")).unwrap();

        let details = service.details("PARIS_0601").unwrap();
        assert_eq!(details.total_expense(), Money::from_vnd(500_000));
        assert_eq!(
            details.spending_by_member()[0].1,
            Money::from_vnd(500_000)
        );

        let member = people.find_member_by_id("AB_0202").unwrap();
        assert_eq!(member.total_spent(), Money::from_vnd(500_000));
    }

    #[test]
    fn test_add_expense_rejects_non_member_and_bad_amount() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();

        let outsider = service.add_expense("PARIS_0601", food(100, "CD_0303"));
        assert!(outsider.unwrap_err().is_validation());

        let zero = service.add_expense("PARIS_0601", food(0, "AB_0202"));
        assert!(zero.unwrap_err().is_validation());

        assert!(service.get("PARIS_0601").unwrap().expenses().is_empty());
    }

    #[test]
    fn test_remove_expense() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();
        service.add_expense("PARIS_0601", food(200, "AB_0202")).unwrap();

        let removed = service.remove_expense("PARIS_0601", 0).unwrap();
        assert_eq!(removed.amount, Money::from_vnd(200));
        assert!(service.remove_expense("PARIS_0601", 0).unwrap_err().is_not_found());

        assert!(people.find_member_by_id("AB_0202").unwrap().spendings().is_empty());
    }

    #[test]
    fn test_add_and_remove_member() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();

        assert!(service.add_member("PARIS_0601", "CD_0303").unwrap());
        assert!(!service.add_member("PARIS_0601", "CD_0303").unwrap());
        service.add_expense("PARIS_0601", food(300, "CD_0303")).unwrap();

        assert!(service.remove_member("PARIS_0601", "CD_0303").unwrap());
        assert!(!service.remove_member("PARIS_0601", "CD_0303").unwrap());

        let trip = service.get("PARIS_0601").unwrap();
        assert_eq!(trip.member_ids(), ["AB_0202".to_string()]);
        assert!(trip.expenses().is_empty());

        let member = people.find_member_by_id("CD_0303").unwrap();
        assert!(!member.has_joined_trip("PARIS_0601"));
        assert!(member.spendings().is_empty());
    }

    #[test]
    fn test_set_host_moves_back_reference() {
        let (mut trips, mut people) = create_test_managers();
        people
            .add_host(Host::create("Eve Fox", Gender::Female, TripDate::new(4, 4, 1984)))
            .unwrap();
        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();

        service.set_host("PARIS_0601", Some("EF_0404")).unwrap();
        assert!(!people.find_host_by_id("JS_0101").unwrap().has_hosted_trip("PARIS_0601"));
        assert!(people.find_host_by_id("EF_0404").unwrap().has_hosted_trip("PARIS_0601"));

        let mut service = TripService::new(&mut trips, &mut people);
        service.set_host("PARIS_0601", None).unwrap();
        assert!(!service.get("PARIS_0601").unwrap().has_host());
    }

    #[test]
    fn test_remove_trip_cleans_people() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();
        service.add_expense("PARIS_0601", food(500, "AB_0202")).unwrap();

        service.remove_trip("PARIS_0601").unwrap();
        assert!(service.remove_trip("PARIS_0601").unwrap_err().is_not_found());

        assert_eq!(trips.trip_count(), 0);
        let member = people.find_member_by_id("AB_0202").unwrap();
        assert_eq!(member.joined_trip_count(), 0);
        assert_eq!(member.total_spent(), Money::zero());
        assert!(!people.find_host_by_id("JS_0101").unwrap().has_hosted_trip("PARIS_0601"));
    }

    #[test]
    fn test_remove_person_detaches_from_trips() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();
        service.add_expense("PARIS_0601", food(500, "AB_0202")).unwrap();

        service.remove_person("AB_0202").unwrap();
        service.remove_person("JS_0101").unwrap();

        let trip = service.get("PARIS_0601").unwrap();
        assert!(trip.member_ids().is_empty());
        assert!(!trip.has_host());
        assert!(trip.expenses().is_empty());
        assert_eq!(people.person_count(), 1);
    }

    #[test]
    fn test_remove_person_with_shared_id_clears_both_roles() {
        let (mut trips, mut people) = create_test_managers();
        let twin = Member::new(people.host_by_id("JS_0101").unwrap().info);
        people.add_member(twin).unwrap();

        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();
        service.add_member("PARIS_0601", "JS_0101").unwrap();

        service.remove_person("JS_0101").unwrap();

        let trip = service.get("PARIS_0601").unwrap();
        assert!(!trip.has_host());
        assert!(!trip.has_member("JS_0101"));
        assert!(!people.contains_id("JS_0101"));
    }

    #[test]
    fn test_details_reports_missing_people() {
        let (mut trips, mut people) = create_test_managers();
        let mut trip = Trip::create("Rome", "", TripDate::new(1, 9, 2025), TripDate::new(2, 9, 2025));
        trip.set_host("GHOST_0101");
        trip.add_member("AB_0202");
        trips.add_trip(trip).unwrap();

        let service = TripService::new(&mut trips, &mut people);
        let details = service.details("ROME_0901").unwrap();

        assert!(details.host.is_none());
        assert_eq!(details.members.len(), 1);
        assert_eq!(details.missing, vec!["GHOST_0101".to_string()]);
    }

    #[test]
    fn test_set_status() {
        let (mut trips, mut people) = create_test_managers();
        let mut service = TripService::new(&mut trips, &mut people);
        service.create_trip(paris()).unwrap();

        service.set_status("PARIS_0601", TripStatus::Completed).unwrap();
        assert_eq!(service.get("PARIS_0601").unwrap().status, TripStatus::Completed);
        assert!(service
            .set_status("NOPE_0101", TripStatus::Ongoing)
            .unwrap_err()
            .is_not_found());
    }
}
