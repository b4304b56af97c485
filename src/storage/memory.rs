//! In-memory stores
//!
//! Clones share the same state, so a test can hand one clone to a manager
//! and inspect what was saved through another.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{TripError, TripResult};
use crate::models::{Host, Member, Trip};

use super::store::{PeopleSnapshot, PeopleStore, PersonLookup, TripStore};

#[derive(Debug, Default)]
struct MemoryState<T> {
    saved: Option<T>,
    save_count: usize,
    fail_saves: bool,
}

impl<T: Clone> MemoryState<T> {
    fn store(&mut self, value: T) -> TripResult<()> {
        if self.fail_saves {
            return Err(TripError::Storage("in-memory store rejected save".into()));
        }
        self.saved = Some(value);
        self.save_count += 1;
        Ok(())
    }
}

/// People store that keeps its snapshot in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPeopleStore {
    state: Rc<RefCell<MemoryState<PeopleSnapshot>>>,
}

impl MemoryPeopleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved snapshot
    pub fn with_snapshot(snapshot: PeopleSnapshot) -> Self {
        let store = Self::new();
        store.state.borrow_mut().saved = Some(snapshot);
        store
    }

    /// Last saved snapshot
    pub fn saved(&self) -> Option<PeopleSnapshot> {
        self.state.borrow().saved.clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.state.borrow().save_count
    }

    /// Make every subsequent save fail
    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }
}

impl PeopleStore for MemoryPeopleStore {
    fn load(&self) -> TripResult<Option<PeopleSnapshot>> {
        Ok(self.saved())
    }

    fn save(&self, members: &[Member], hosts: &[Host]) -> TripResult<()> {
        self.state
            .borrow_mut()
            .store(PeopleSnapshot::new(members.to_vec(), hosts.to_vec()))
    }
}

/// Trip store that keeps its trips in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTripStore {
    state: Rc<RefCell<MemoryState<Vec<Trip>>>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trips(trips: Vec<Trip>) -> Self {
        let store = Self::new();
        store.state.borrow_mut().saved = Some(trips);
        store
    }

    pub fn saved(&self) -> Option<Vec<Trip>> {
        self.state.borrow().saved.clone()
    }

    pub fn save_count(&self) -> usize {
        self.state.borrow().save_count
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }
}

impl TripStore for MemoryTripStore {
    fn load(&self, people: Option<&dyn PersonLookup>) -> TripResult<Option<Vec<Trip>>> {
        let Some(mut trips) = self.saved() else {
            return Ok(None);
        };

        // Mirror the JSON store: references that do not resolve are dropped
        if let Some(people) = people {
            for trip in &mut trips {
                if trip.host_id().is_some_and(|id| !people.has_host(id)) {
                    trip.clear_host();
                }
                let members: Vec<String> = trip
                    .member_ids()
                    .iter()
                    .filter(|id| people.has_member(id))
                    .cloned()
                    .collect();
                trip.set_members(members);
                let expenses = trip
                    .expenses()
                    .iter()
                    .filter(|e| people.has_member(&e.person_in_charge))
                    .cloned()
                    .collect();
                trip.set_expenses(expenses);
            }
        }

        Ok(Some(trips))
    }

    fn save(&self, trips: &[Trip]) -> TripResult<()> {
        self.state.borrow_mut().store(trips.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, TripDate};

    #[test]
    fn test_people_store_shares_state_between_clones() {
        let store = MemoryPeopleStore::new();
        let handle = store.clone();
        assert!(store.load().unwrap().is_none());

        let member = Member::create("Ann Bee", Gender::Female, TripDate::new(2, 2, 1992));
        store.save(&[member], &[]).unwrap();

        assert_eq!(handle.save_count(), 1);
        assert_eq!(handle.saved().unwrap().members.len(), 1);
    }

    #[test]
    fn test_failing_saves() {
        let store = MemoryTripStore::new();
        store.set_fail_saves(true);
        assert!(matches!(store.save(&[]), Err(TripError::Storage(_))));
        assert_eq!(store.save_count(), 0);

        store.set_fail_saves(false);
        store.save(&[]).unwrap();
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_trip_load_filters_unknown_people() {
        let mut trip = Trip::create(
            "Paris",
            "",
            TripDate::new(1, 6, 2025),
            TripDate::new(2, 6, 2025),
        );
        trip.set_host("JS_0101");
        trip.add_member("AB_0202");
        let store = MemoryTripStore::with_trips(vec![trip]);

        let people = PeopleSnapshot::default();
        let trips = store.load(Some(&people)).unwrap().unwrap();
        assert!(!trips[0].has_host());
        assert!(trips[0].member_ids().is_empty());

        let unfiltered = store.load(None).unwrap().unwrap();
        assert!(unfiltered[0].has_host());
    }
}
