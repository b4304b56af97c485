//! Trip manager
//!
//! Owns the list of trips. Mutations notify observers and write the trip
//! cache; no cross-entity checks happen here. Keeping members and hosts in
//! step with trips is the job of `TripService` and `SyncService`.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::CachePaths;
use crate::error::TripResult;
use crate::models::{Trip, TripStatus};
use crate::storage::{JsonTripStore, PersonLookup, TripStore};

use super::observer::{ChangeEvent, Observer, Subject};

/// Owner of all trips
pub struct TripManager {
    trips: Vec<Trip>,
    store: Box<dyn TripStore>,
    subject: Subject,
}

impl TripManager {
    /// Open a manager over `store`
    ///
    /// `people` resolves host, member and expense references in the stored
    /// trips; references that do not resolve are dropped.
    pub fn open(
        store: impl TripStore + 'static,
        people: Option<&dyn PersonLookup>,
    ) -> TripResult<Self> {
        let trips = store.load(people)?.unwrap_or_default();
        debug!(trips = trips.len(), "Trip manager loaded");

        Ok(Self {
            trips,
            store: Box::new(store),
            subject: Subject::new(),
        })
    }

    /// Open a manager over `cache/cache.json`
    pub fn open_cache(paths: &CachePaths, people: &dyn PersonLookup) -> TripResult<Self> {
        Self::open(JsonTripStore::from_paths(paths), Some(people))
    }

    pub fn add_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        self.subject.add_observer(observer);
    }

    pub fn remove_observer<O: Observer + 'static>(&self, observer: &Rc<O>) -> bool {
        self.subject.remove_observer(observer)
    }

    pub fn add_trip(&mut self, trip: Trip) -> TripResult<()> {
        let id = trip.id.clone();
        self.trips.push(trip);

        debug!(%id, "Added trip");
        self.subject.notify(&ChangeEvent::TripAdded(id));
        self.persist()
    }

    /// Remove the first trip with this ID; `Ok(false)` if there is none
    pub fn remove_trip(&mut self, id: &str) -> TripResult<bool> {
        let Some(pos) = self.trips.iter().position(|t| t.id == id) else {
            return Ok(false);
        };

        self.trips.remove(pos);

        debug!(%id, "Removed trip");
        self.subject.notify(&ChangeEvent::TripRemoved(id.to_string()));
        self.persist()?;
        Ok(true)
    }

    /// Replace the trip whose ID is `original_id`; `Ok(false)` if there is none
    pub fn update_trip(&mut self, original_id: &str, updated: Trip) -> TripResult<bool> {
        let Some(slot) = self.trips.iter_mut().find(|t| t.id == original_id) else {
            return Ok(false);
        };

        let id = updated.id.clone();
        *slot = updated;

        debug!(%original_id, %id, "Updated trip");
        self.subject.notify(&ChangeEvent::TripUpdated(id));
        self.persist()?;
        Ok(true)
    }

    /// Swap in a whole new set of trips
    ///
    /// Observers hear about removed IDs first, then added IDs, then IDs
    /// present before and after.
    pub fn replace_all(&mut self, trips: Vec<Trip>) -> TripResult<()> {
        let before: HashSet<String> = self.trips.iter().map(|t| t.id.clone()).collect();
        let after: HashSet<String> = trips.iter().map(|t| t.id.clone()).collect();

        let mut events: Vec<ChangeEvent> = self
            .trips
            .iter()
            .filter(|t| !after.contains(&t.id))
            .map(|t| ChangeEvent::TripRemoved(t.id.clone()))
            .collect();
        events.extend(
            trips
                .iter()
                .filter(|t| !before.contains(&t.id))
                .map(|t| ChangeEvent::TripAdded(t.id.clone())),
        );
        events.extend(
            trips
                .iter()
                .filter(|t| before.contains(&t.id))
                .map(|t| ChangeEvent::TripUpdated(t.id.clone())),
        );

        self.trips = trips;
        for event in &events {
            self.subject.notify(event);
        }

        debug!(trips = self.trips.len(), "Replaced all trips");
        self.persist()
    }

    pub fn find_trip_by_id(&self, id: &str) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    /// Mutable access to a trip
    ///
    /// Edits made through the reference are not announced or written until
    /// `save` is called.
    pub fn find_trip_by_id_mut(&mut self, id: &str) -> Option<&mut Trip> {
        self.trips.iter_mut().find(|t| t.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_trip_by_id(id).is_some()
    }

    pub fn all_trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn trips_with_status(&self, status: TripStatus) -> Vec<&Trip> {
        self.trips.iter().filter(|t| t.status == status).collect()
    }

    /// Trips in which this person is host or member
    pub fn trips_involving(&self, person_id: &str) -> Vec<&Trip> {
        self.trips
            .iter()
            .filter(|t| t.host_id() == Some(person_id) || t.has_member(person_id))
            .collect()
    }

    /// Write the current trips through the store
    pub fn save(&self) -> TripResult<()> {
        self.persist()
    }

    fn persist(&self) -> TripResult<()> {
        self.store.save(&self.trips)
    }
}

impl fmt::Debug for TripManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripManager")
            .field("trips", &self.trips.len())
            .field("subject", &self.subject)
            .finish()
    }
}

impl Drop for TripManager {
    fn drop(&mut self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, "Failed to save trip cache on shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::observer::EventLog;
    use crate::models::TripDate;
    use crate::storage::MemoryTripStore;
    use std::cell::RefCell;

    fn paris() -> Trip {
        Trip::create(
            "Paris",
            "Summer",
            TripDate::new(1, 6, 2025),
            TripDate::new(7, 6, 2025),
        )
    }

    fn rome() -> Trip {
        Trip::create(
            "Rome",
            "Autumn",
            TripDate::new(10, 10, 2025),
            TripDate::new(15, 10, 2025),
        )
    }

    fn manager() -> (TripManager, MemoryTripStore) {
        let store = MemoryTripStore::new();
        let manager = TripManager::open(store.clone(), None).unwrap();
        (manager, store)
    }

    struct Ordered {
        name: &'static str,
        journal: Rc<RefCell<Vec<String>>>,
    }

    impl Observer for Ordered {
        fn on_trip_added(&self, trip_id: &str) {
            self.journal
                .borrow_mut()
                .push(format!("{} {}", self.name, trip_id));
        }
    }

    #[test]
    fn test_observers_notified_in_registration_order() {
        let (mut manager, _store) = manager();
        let journal = Rc::new(RefCell::new(Vec::new()));
        let o1 = Rc::new(Ordered {
            name: "O1",
            journal: Rc::clone(&journal),
        });
        let o2 = Rc::new(Ordered {
            name: "O2",
            journal: Rc::clone(&journal),
        });
        manager.add_observer(&o1);
        manager.add_observer(&o2);

        manager.add_trip(paris()).unwrap();

        assert_eq!(
            *journal.borrow(),
            vec!["O1 PARIS_0601".to_string(), "O2 PARIS_0601".to_string()]
        );
    }

    #[test]
    fn test_add_remove_update() {
        let (mut manager, store) = manager();
        let log = EventLog::new();
        manager.add_observer(&log);

        manager.add_trip(paris()).unwrap();
        manager.add_trip(rome()).unwrap();

        let mut edited = paris();
        edited.status = TripStatus::Ongoing;
        assert!(manager.update_trip("PARIS_0601", edited).unwrap());
        assert!(!manager.update_trip("NOWHERE_0101", rome()).unwrap());

        assert!(manager.remove_trip("ROME_1010").unwrap());
        assert!(!manager.remove_trip("ROME_1010").unwrap());

        assert_eq!(manager.trip_count(), 1);
        assert_eq!(manager.trips_with_status(TripStatus::Ongoing).len(), 1);
        assert_eq!(store.save_count(), 4);
        assert_eq!(
            log.events(),
            vec![
                ChangeEvent::TripAdded("PARIS_0601".into()),
                ChangeEvent::TripAdded("ROME_1010".into()),
                ChangeEvent::TripUpdated("PARIS_0601".into()),
                ChangeEvent::TripRemoved("ROME_1010".into()),
            ]
        );
    }

    #[test]
    fn test_find_trip() {
        let (mut manager, _store) = manager();
        manager.add_trip(paris()).unwrap();

        assert!(manager.find_trip_by_id("PARIS_0601").is_some());
        assert!(manager.find_trip_by_id("ROME_1010").is_none());

        manager
            .find_trip_by_id_mut("PARIS_0601")
            .unwrap()
            .add_member("AB_0202");
        assert_eq!(manager.trips_involving("AB_0202").len(), 1);
    }

    #[test]
    fn test_replace_all() {
        let (mut manager, store) = manager();
        manager.add_trip(paris()).unwrap();
        let log = EventLog::new();
        manager.add_observer(&log);

        manager.replace_all(vec![rome(), paris()]).unwrap();

        assert_eq!(
            log.events(),
            vec![
                ChangeEvent::TripAdded("ROME_1010".into()),
                ChangeEvent::TripUpdated("PARIS_0601".into()),
            ]
        );
        assert_eq!(store.saved().unwrap().len(), 2);
    }

    #[test]
    fn test_open_loads_and_drop_saves() {
        let store = MemoryTripStore::with_trips(vec![paris()]);
        let manager = TripManager::open(store.clone(), None).unwrap();
        assert_eq!(manager.trip_count(), 1);
        assert_eq!(store.save_count(), 0);

        drop(manager);
        assert_eq!(store.save_count(), 1);
    }
}
