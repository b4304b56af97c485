//! Observer that writes every change to the audit log

use tracing::warn;

use crate::managers::{ChangeEvent, Observer};

use super::entry::AuditEntry;
use super::logger::AuditLogger;

/// Appends one audit entry per change notification
///
/// Observers cannot fail the change that triggered them, so write errors are
/// logged and dropped.
#[derive(Debug)]
pub struct AuditObserver {
    logger: AuditLogger,
}

impl AuditObserver {
    pub fn new(logger: AuditLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &AuditLogger {
        &self.logger
    }

    fn record(&self, event: ChangeEvent) {
        if let Err(e) = self.logger.log(&AuditEntry::from(&event)) {
            warn!(error = %e, %event, "Failed to write audit entry");
        }
    }
}

impl Observer for AuditObserver {
    fn on_trip_added(&self, trip_id: &str) {
        self.record(ChangeEvent::TripAdded(trip_id.to_string()));
    }

    fn on_trip_removed(&self, trip_id: &str) {
        self.record(ChangeEvent::TripRemoved(trip_id.to_string()));
    }

    fn on_trip_updated(&self, trip_id: &str) {
        self.record(ChangeEvent::TripUpdated(trip_id.to_string()));
    }

    fn on_person_added(&self, person_id: &str) {
        self.record(ChangeEvent::PersonAdded(person_id.to_string()));
    }

    fn on_person_removed(&self, person_id: &str) {
        self.record(ChangeEvent::PersonRemoved(person_id.to_string()));
    }

    fn on_person_updated(&self, person_id: &str) {
        self.record(ChangeEvent::PersonUpdated(person_id.to_string()));
    }
}
