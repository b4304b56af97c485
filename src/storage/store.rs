//! Persistence ports for the managers
//!
//! Managers never touch the filesystem directly. They persist through a
//! `PeopleStore` or `TripStore`, so the same mutation logic runs against the
//! JSON cache files in production and an in-memory store in tests.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::CachePaths;
use crate::error::TripResult;
use crate::models::{Host, Member, Trip};

use super::file_io::read_json_value;
use super::json::{decode_people, decode_trips, export_people_info_to_json, export_trips_info_to_json};

/// Answers "does this person exist" while trips are being decoded
pub trait PersonLookup {
    fn has_member(&self, id: &str) -> bool;
    fn has_host(&self, id: &str) -> bool;
}

/// Members and hosts read from a people document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeopleSnapshot {
    pub members: Vec<Member>,
    pub hosts: Vec<Host>,
}

impl PeopleSnapshot {
    pub fn new(members: Vec<Member>, hosts: Vec<Host>) -> Self {
        Self { members, hosts }
    }

    pub fn len(&self) -> usize {
        self.members.len() + self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.hosts.is_empty()
    }
}

impl PersonLookup for PeopleSnapshot {
    fn has_member(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id() == id)
    }

    fn has_host(&self, id: &str) -> bool {
        self.hosts.iter().any(|h| h.id() == id)
    }
}

/// Where the person manager keeps its snapshot
pub trait PeopleStore {
    /// Load the saved snapshot, or `None` if nothing has been saved yet
    fn load(&self) -> TripResult<Option<PeopleSnapshot>>;

    /// Replace the saved snapshot
    fn save(&self, members: &[Member], hosts: &[Host]) -> TripResult<()>;
}

/// Where the trip manager keeps its snapshot
pub trait TripStore {
    /// Load the saved trips, resolving references through `people` when given
    fn load(&self, people: Option<&dyn PersonLookup>) -> TripResult<Option<Vec<Trip>>>;

    /// Replace the saved trips
    fn save(&self, trips: &[Trip]) -> TripResult<()>;
}

/// People cache backed by `cache/people_cache.json`
#[derive(Debug, Clone)]
pub struct JsonPeopleStore {
    path: PathBuf,
}

impl JsonPeopleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &CachePaths) -> Self {
        Self::new(paths.people_cache_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PeopleStore for JsonPeopleStore {
    fn load(&self) -> TripResult<Option<PeopleSnapshot>> {
        let Some(root) = read_json_value(&self.path)? else {
            debug!(path = %self.path.display(), "No people cache yet");
            return Ok(None);
        };

        let snapshot = decode_people(root)?;
        info!(
            members = snapshot.members.len(),
            hosts = snapshot.hosts.len(),
            "Loaded people cache"
        );
        Ok(Some(snapshot))
    }

    fn save(&self, members: &[Member], hosts: &[Host]) -> TripResult<()> {
        export_people_info_to_json(members, hosts, &self.path)?;
        debug!(
            members = members.len(),
            hosts = hosts.len(),
            "Saved people cache"
        );
        Ok(())
    }
}

/// Trip cache backed by `cache/cache.json`
#[derive(Debug, Clone)]
pub struct JsonTripStore {
    path: PathBuf,
}

impl JsonTripStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_paths(paths: &CachePaths) -> Self {
        Self::new(paths.trip_cache_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TripStore for JsonTripStore {
    fn load(&self, people: Option<&dyn PersonLookup>) -> TripResult<Option<Vec<Trip>>> {
        let Some(root) = read_json_value(&self.path)? else {
            debug!(path = %self.path.display(), "No trip cache yet");
            return Ok(None);
        };

        let trips = decode_trips(root, people)?;
        info!(trips = trips.len(), "Loaded trip cache");
        Ok(Some(trips))
    }

    fn save(&self, trips: &[Trip]) -> TripResult<()> {
        export_trips_info_to_json(trips, &self.path)?;
        debug!(trips = trips.len(), "Saved trip cache");
        Ok(())
    }
}
