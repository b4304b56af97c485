//! Host model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::TripDate;
use super::gender::Gender;
use super::ids::generate_person_id;
use super::person::PersonInfo;

/// The person organizing one or more trips
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Host {
    pub info: PersonInfo,

    /// Trips this host is responsible for, deduplicated on insert
    #[serde(default)]
    pub hosted_trip_ids: Vec<String>,

    #[serde(default)]
    pub emergency_contact: String,
}

impl Host {
    pub fn new(info: PersonInfo) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    /// Create a host whose ID is derived from name and birth date
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

    pub fn has_hosted_trip(&self, trip_id: &str) -> bool {
        self.hosted_trip_ids.iter().any(|id| id == trip_id)
    }

    pub fn host_trip(&mut self, trip_id: impl Into<String>) {
        let trip_id = trip_id.into();
        if !self.has_hosted_trip(&trip_id) {
            self.hosted_trip_ids.push(trip_id);
        }
    }

    pub fn unhost_trip(&mut self, trip_id: &str) {
        self.hosted_trip_ids.retain(|id| id != trip_id);
    }

    pub fn clear_hosted_trips(&mut self) {
        self.hosted_trip_ids.clear();
    }
}

/// Hosts are identified by ID alone
impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        self.info.id == other.info.id
    }
}

impl Eq for Host {}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  -  {}  -  {}", self.id(), self.full_name(), self.info.age())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        let host = Host::create("John Smith", Gender::Male, TripDate::new(1, 1, 1990));
        assert_eq!(host.id(), "JS_0101");
        assert!(host.hosted_trip_ids.is_empty());
    }

    #[test]
    fn test_host_trip_dedups() {
        let mut host = Host::create("John Smith", Gender::Male, TripDate::new(1, 1, 1990));
        host.host_trip("PARIS_0601");
        host.host_trip("PARIS_0601");
        host.host_trip("ROME_0710");
        assert_eq!(host.hosted_trip_ids, vec!["PARIS_0601", "ROME_0710"]);

        host.unhost_trip("PARIS_0601");
        assert!(!host.has_hosted_trip("PARIS_0601"));

        host.clear_hosted_trips();
        assert!(host.hosted_trip_ids.is_empty());
    }
}
