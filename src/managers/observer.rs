//! Change notifications
//!
//! Managers own a `Subject` and announce every add, remove and update. The
//! subject only holds weak references, so registering an observer never
//! keeps it alive; dropped observers are pruned on the next dispatch.
//!
//! Dispatch is synchronous and in registration order. The list of live
//! observers is copied before any callback runs, so a callback that
//! registers or removes observers affects the next notification, not the
//! current one.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Receives change notifications from the managers
///
/// Every method has an empty default body; implement only what you need.
pub trait Observer {
    fn on_trip_added(&self, _trip_id: &str) {}
    fn on_trip_removed(&self, _trip_id: &str) {}
    fn on_trip_updated(&self, _trip_id: &str) {}
    fn on_person_added(&self, _person_id: &str) {}
    fn on_person_removed(&self, _person_id: &str) {}
    fn on_person_updated(&self, _person_id: &str) {}
}

/// One change, as delivered to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    TripAdded(String),
    TripRemoved(String),
    TripUpdated(String),
    PersonAdded(String),
    PersonRemoved(String),
    PersonUpdated(String),
}

impl ChangeEvent {
    /// ID of the entity that changed
    pub fn entity_id(&self) -> &str {
        match self {
            Self::TripAdded(id)
            | Self::TripRemoved(id)
            | Self::TripUpdated(id)
            | Self::PersonAdded(id)
            | Self::PersonRemoved(id)
            | Self::PersonUpdated(id) => id,
        }
    }

    /// Call the matching observer method
    pub fn dispatch(&self, observer: &dyn Observer) {
        match self {
            Self::TripAdded(id) => observer.on_trip_added(id),
            Self::TripRemoved(id) => observer.on_trip_removed(id),
            Self::TripUpdated(id) => observer.on_trip_updated(id),
            Self::PersonAdded(id) => observer.on_person_added(id),
            Self::PersonRemoved(id) => observer.on_person_removed(id),
            Self::PersonUpdated(id) => observer.on_person_updated(id),
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TripAdded(_) => "trip added",
            Self::TripRemoved(_) => "trip removed",
            Self::TripUpdated(_) => "trip updated",
            Self::PersonAdded(_) => "person added",
            Self::PersonRemoved(_) => "person removed",
            Self::PersonUpdated(_) => "person updated",
        };
        write!(f, "{}: {}", label, self.entity_id())
    }
}

/// Ordered, non-owning list of observers
#[derive(Default)]
pub struct Subject {
    observers: RefCell<Vec<Weak<dyn Observer>>>,
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; registering the same one twice is a no-op
    pub fn add_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        let weak: Weak<O> = Rc::downgrade(observer);
        let weak: Weak<dyn Observer> = weak;
        let mut observers = self.observers.borrow_mut();
        if !observers.iter().any(|o| same_observer(o, &weak)) {
            observers.push(weak);
        }
    }

    /// Unregister an observer; returns whether it was registered
    pub fn remove_observer<O: Observer + 'static>(&self, observer: &Rc<O>) -> bool {
        let weak: Weak<O> = Rc::downgrade(observer);
        let weak: Weak<dyn Observer> = weak;
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|o| !same_observer(o, &weak));
        observers.len() != before
    }

    /// Number of observers still alive
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    /// Deliver an event to every live observer, in registration order
    pub fn notify(&self, event: &ChangeEvent) {
        let live: Vec<Rc<dyn Observer>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };

        for observer in live {
            event.dispatch(observer.as_ref());
        }
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observer_count())
            .finish()
    }
}

fn same_observer(a: &Weak<dyn Observer>, b: &Weak<dyn Observer>) -> bool {
    std::ptr::eq(a.as_ptr() as *const (), b.as_ptr() as *const ())
}

/// Observer that records every event it receives
///
/// Useful for tests and for callers that want to batch up changes and act
/// on them later.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<ChangeEvent>>,
}

impl EventLog {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<ChangeEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn push(&self, event: ChangeEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Observer for EventLog {
    fn on_trip_added(&self, trip_id: &str) {
        self.push(ChangeEvent::TripAdded(trip_id.to_string()));
    }

    fn on_trip_removed(&self, trip_id: &str) {
        self.push(ChangeEvent::TripRemoved(trip_id.to_string()));
    }

    fn on_trip_updated(&self, trip_id: &str) {
        self.push(ChangeEvent::TripUpdated(trip_id.to_string()));
    }

    fn on_person_added(&self, person_id: &str) {
        self.push(ChangeEvent::PersonAdded(person_id.to_string()));
    }

    fn on_person_removed(&self, person_id: &str) {
        self.push(ChangeEvent::PersonRemoved(person_id.to_string()));
    }

    fn on_person_updated(&self, person_id: &str) {
        self.push(ChangeEvent::PersonUpdated(person_id.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Appends `name:event` to a shared journal
    struct Named {
        name: &'static str,
        journal: Rc<RefCell<Vec<String>>>,
    }

    impl Observer for Named {
        fn on_trip_added(&self, trip_id: &str) {
            self.journal
                .borrow_mut()
                .push(format!("{}:{}", self.name, trip_id));
        }
    }

    #[test]
    fn test_notify_in_registration_order() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::new(Named {
            name: "O1",
            journal: Rc::clone(&journal),
        });
        let second = Rc::new(Named {
            name: "O2",
            journal: Rc::clone(&journal),
        });

        let subject = Subject::new();
        subject.add_observer(&first);
        subject.add_observer(&second);
        subject.notify(&ChangeEvent::TripAdded("PARIS_0601".into()));

        assert_eq!(*journal.borrow(), vec!["O1:PARIS_0601", "O2:PARIS_0601"]);
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let log = EventLog::new();
        let subject = Subject::new();
        subject.add_observer(&log);
        subject.add_observer(&log);
        assert_eq!(subject.observer_count(), 1);

        subject.notify(&ChangeEvent::PersonAdded("AB_0202".into()));
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn test_remove_observer() {
        let log = EventLog::new();
        let subject = Subject::new();
        subject.add_observer(&log);

        assert!(subject.remove_observer(&log));
        assert!(!subject.remove_observer(&log));

        subject.notify(&ChangeEvent::TripRemoved("X".into()));
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_dropped_observers_are_pruned() {
        let subject = Subject::new();
        {
            let log = EventLog::new();
            subject.add_observer(&log);
            assert_eq!(subject.observer_count(), 1);
        }
        assert_eq!(subject.observer_count(), 0);
        subject.notify(&ChangeEvent::TripUpdated("X".into()));
    }

    /// Unregisters itself from inside a callback
    struct OneShot {
        subject: Rc<Subject>,
        me: RefCell<Option<Rc<OneShot>>>,
        calls: RefCell<usize>,
    }

    impl Observer for OneShot {
        fn on_person_updated(&self, _person_id: &str) {
            *self.calls.borrow_mut() += 1;
            if let Some(me) = self.me.borrow_mut().take() {
                self.subject.remove_observer(&me);
            }
        }
    }

    #[test]
    fn test_observer_can_unregister_during_dispatch() {
        let subject = Rc::new(Subject::new());
        let one_shot = Rc::new(OneShot {
            subject: Rc::clone(&subject),
            me: RefCell::new(None),
            calls: RefCell::new(0),
        });
        *one_shot.me.borrow_mut() = Some(Rc::clone(&one_shot));
        let log = EventLog::new();

        subject.add_observer(&one_shot);
        subject.add_observer(&log);

        subject.notify(&ChangeEvent::PersonUpdated("AB_0202".into()));
        subject.notify(&ChangeEvent::PersonUpdated("AB_0202".into()));

        assert_eq!(*one_shot.calls.borrow(), 1);
        assert_eq!(log.events().len(), 2);
    }

    #[test]
    fn test_event_display() {
        let event = ChangeEvent::TripAdded("PARIS_0601".into());
        assert_eq!(event.to_string(), "trip added: PARIS_0601");
        assert_eq!(event.entity_id(), "PARIS_0601");
    }
}
