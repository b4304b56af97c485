//! Person manager
//!
//! Single owner of every member and host. Each mutation updates the
//! in-memory lists, invalidates the merged people view, notifies observers
//! and then writes the full snapshot through the store.
//!
//! No duplicate-ID check happens here; `PersonService` does that before
//! inserting. `validate_data_integrity` reports duplicates after the fact.

use std::cell::{Cell, OnceCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::CachePaths;
use crate::error::TripResult;
use crate::models::{Host, Member, Person, Role};
use crate::storage::{JsonPeopleStore, PeopleStore, PersonLookup};

use super::observer::{ChangeEvent, Observer, Subject};

/// A problem found by `integrity_issues`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// The same ID appears on more than one member
    DuplicateMember(String),
    /// The same ID appears on more than one host
    DuplicateHost(String),
    /// The ID is used by a member and a host
    MemberAndHost(String),
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateMember(id) => write!(f, "Duplicate member ID found: {}", id),
            Self::DuplicateHost(id) => write!(f, "Duplicate host ID found: {}", id),
            Self::MemberAndHost(id) => write!(f, "ID exists as both member and host: {}", id),
        }
    }
}

/// Owner of all members and hosts
pub struct PersonManager {
    members: Vec<Member>,
    hosts: Vec<Host>,
    /// Hosts then members; cleared by every mutating path
    people_view: OnceCell<Vec<Person>>,
    view_rebuilds: Cell<usize>,
    store: Box<dyn PeopleStore>,
    subject: Subject,
}

impl PersonManager {
    /// Open a manager over `store`, installing whatever it already holds
    ///
    /// Cached entries are installed in bulk: no notifications, no rewrite.
    pub fn open(store: impl PeopleStore + 'static) -> TripResult<Self> {
        let mut manager = Self {
            members: Vec::new(),
            hosts: Vec::new(),
            people_view: OnceCell::new(),
            view_rebuilds: Cell::new(0),
            store: Box::new(store),
            subject: Subject::new(),
        };

        if let Some(snapshot) = manager.store.load()? {
            manager.members = snapshot.members;
            manager.hosts = snapshot.hosts;
            debug!(
                members = manager.members.len(),
                hosts = manager.hosts.len(),
                "Person manager loaded"
            );
        }

        Ok(manager)
    }

    /// Open a manager over `cache/people_cache.json`
    pub fn open_cache(paths: &CachePaths) -> TripResult<Self> {
        Self::open(JsonPeopleStore::from_paths(paths))
    }

    // Observers

    pub fn add_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        self.subject.add_observer(observer);
    }

    pub fn remove_observer<O: Observer + 'static>(&self, observer: &Rc<O>) -> bool {
        self.subject.remove_observer(observer)
    }

    // Adding

    /// Add a member or host according to its role
    pub fn add_person(&mut self, person: Person) -> TripResult<()> {
        match person {
            Person::Member(m) => self.add_member(m),
            Person::Host(h) => self.add_host(h),
        }
    }

    pub fn add_member(&mut self, member: Member) -> TripResult<()> {
        let id = member.id().to_string();
        self.members.push(member);
        self.invalidate_view();

        debug!(%id, "Added member");
        self.subject.notify(&ChangeEvent::PersonAdded(id));
        self.persist()
    }

    pub fn add_host(&mut self, host: Host) -> TripResult<()> {
        let id = host.id().to_string();
        self.hosts.push(host);
        self.invalidate_view();

        debug!(%id, "Added host");
        self.subject.notify(&ChangeEvent::PersonAdded(id));
        self.persist()
    }

    /// Add several members, notifying for each and writing once
    pub fn add_multiple_members(&mut self, members: Vec<Member>) -> TripResult<()> {
        if members.is_empty() {
            return Ok(());
        }

        for member in members {
            let id = member.id().to_string();
            self.members.push(member);
            self.invalidate_view();
            self.subject.notify(&ChangeEvent::PersonAdded(id));
        }
        self.persist()
    }

    /// Add several hosts, notifying for each and writing once
    pub fn add_multiple_hosts(&mut self, hosts: Vec<Host>) -> TripResult<()> {
        if hosts.is_empty() {
            return Ok(());
        }

        for host in hosts {
            let id = host.id().to_string();
            self.hosts.push(host);
            self.invalidate_view();
            self.subject.notify(&ChangeEvent::PersonAdded(id));
        }
        self.persist()
    }

    // Removing

    /// Remove a member, or failing that a host, by ID
    pub fn remove_person(&mut self, id: &str) -> TripResult<bool> {
        if self.remove_member(id)? {
            return Ok(true);
        }
        self.remove_host(id)
    }

    /// Remove the first member with this ID; `Ok(false)` if there is none
    pub fn remove_member(&mut self, id: &str) -> TripResult<bool> {
        let Some(pos) = self.members.iter().position(|m| m.id() == id) else {
            return Ok(false);
        };

        self.members.remove(pos);
        self.invalidate_view();

        debug!(%id, "Removed member");
        self.subject.notify(&ChangeEvent::PersonRemoved(id.to_string()));
        self.persist()?;
        Ok(true)
    }

    /// Remove the first host with this ID; `Ok(false)` if there is none
    pub fn remove_host(&mut self, id: &str) -> TripResult<bool> {
        let Some(pos) = self.hosts.iter().position(|h| h.id() == id) else {
            return Ok(false);
        };

        self.hosts.remove(pos);
        self.invalidate_view();

        debug!(%id, "Removed host");
        self.subject.notify(&ChangeEvent::PersonRemoved(id.to_string()));
        self.persist()?;
        Ok(true)
    }

    // Updating

    /// Replace `original` with `updated`
    ///
    /// When the roles differ the original is removed and the updated person
    /// added in its place; this succeeds only if the removal did.
    pub fn update_person(&mut self, original: &Person, updated: Person) -> TripResult<bool> {
        match (original.role(), updated) {
            (Role::Member, Person::Member(m)) => self.update_member(original.id(), m),
            (Role::Host, Person::Host(h)) => self.update_host(original.id(), h),
            (role, updated) => {
                let removed = match role {
                    Role::Member => self.remove_member(original.id())?,
                    Role::Host => self.remove_host(original.id())?,
                };
                if !removed {
                    return Ok(false);
                }
                self.add_person(updated)?;
                Ok(true)
            }
        }
    }

    /// Replace the member whose ID is `original_id`
    pub fn update_member(&mut self, original_id: &str, updated: Member) -> TripResult<bool> {
        let Some(slot) = self.members.iter_mut().find(|m| m.id() == original_id) else {
            return Ok(false);
        };

        let id = updated.id().to_string();
        *slot = updated;
        self.invalidate_view();

        debug!(%original_id, %id, "Updated member");
        self.subject.notify(&ChangeEvent::PersonUpdated(id));
        self.persist()?;
        Ok(true)
    }

    /// Replace the host whose ID is `original_id`
    pub fn update_host(&mut self, original_id: &str, updated: Host) -> TripResult<bool> {
        let Some(slot) = self.hosts.iter_mut().find(|h| h.id() == original_id) else {
            return Ok(false);
        };

        let id = updated.id().to_string();
        *slot = updated;
        self.invalidate_view();

        debug!(%original_id, %id, "Updated host");
        self.subject.notify(&ChangeEvent::PersonUpdated(id));
        self.persist()?;
        Ok(true)
    }

    /// Replace every member matched by ID, notifying for each and writing once
    ///
    /// Returns how many members were replaced; unknown IDs are ignored.
    pub fn update_members(&mut self, updated: Vec<Member>) -> TripResult<usize> {
        let mut replaced = 0;
        for member in updated {
            if let Some(slot) = self.members.iter_mut().find(|m| m.id() == member.id()) {
                let id = member.id().to_string();
                *slot = member;
                replaced += 1;
                self.invalidate_view();
                self.subject.notify(&ChangeEvent::PersonUpdated(id));
            }
        }

        if replaced > 0 {
            self.persist()?;
        }
        Ok(replaced)
    }

    /// Replace every host matched by ID, notifying for each and writing once
    pub fn update_hosts(&mut self, updated: Vec<Host>) -> TripResult<usize> {
        let mut replaced = 0;
        for host in updated {
            if let Some(slot) = self.hosts.iter_mut().find(|h| h.id() == host.id()) {
                let id = host.id().to_string();
                *slot = host;
                replaced += 1;
                self.invalidate_view();
                self.subject.notify(&ChangeEvent::PersonUpdated(id));
            }
        }

        if replaced > 0 {
            self.persist()?;
        }
        Ok(replaced)
    }

    /// Swap in a whole new set of people
    ///
    /// Observers hear about removed IDs first, then added IDs, then IDs
    /// present before and after.
    pub fn replace_all(&mut self, members: Vec<Member>, hosts: Vec<Host>) -> TripResult<()> {
        let before: Vec<String> = unique(self.ids());

        self.members = members;
        self.hosts = hosts;
        self.invalidate_view();

        let after: Vec<String> = unique(self.ids());
        let before_set: HashSet<&str> = before.iter().map(String::as_str).collect();
        let after_set: HashSet<&str> = after.iter().map(String::as_str).collect();

        let removed = before.iter().filter(|id| !after_set.contains(id.as_str()));
        let added = after.iter().filter(|id| !before_set.contains(id.as_str()));
        let kept = after.iter().filter(|id| before_set.contains(id.as_str()));

        let events: Vec<ChangeEvent> = removed
            .cloned()
            .map(ChangeEvent::PersonRemoved)
            .chain(added.cloned().map(ChangeEvent::PersonAdded))
            .chain(kept.cloned().map(ChangeEvent::PersonUpdated))
            .collect();
        for event in &events {
            self.subject.notify(event);
        }

        debug!(
            members = self.members.len(),
            hosts = self.hosts.len(),
            "Replaced all people"
        );
        self.persist()
    }

    // Lookup

    /// Find a member, or failing that a host, by ID
    pub fn find_person_by_id(&self, id: &str) -> Option<Person> {
        self.find_member_by_id(id)
            .cloned()
            .map(Person::Member)
            .or_else(|| self.find_host_by_id(id).cloned().map(Person::Host))
    }

    pub fn find_member_by_id(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id() == id)
    }

    pub fn find_host_by_id(&self, id: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.id() == id)
    }

    /// Mutable access to a member
    ///
    /// Edits made through the reference are not announced or written until
    /// `save` is called.
    pub fn find_member_by_id_mut(&mut self, id: &str) -> Option<&mut Member> {
        self.invalidate_view();
        self.members.iter_mut().find(|m| m.id() == id)
    }

    /// Mutable access to a host; see `find_member_by_id_mut`
    pub fn find_host_by_id_mut(&mut self, id: &str) -> Option<&mut Host> {
        self.invalidate_view();
        self.hosts.iter_mut().find(|h| h.id() == id)
    }

    /// Owned copy of a member
    pub fn member_by_id(&self, id: &str) -> Option<Member> {
        self.find_member_by_id(id).cloned()
    }

    /// Owned copy of a host
    pub fn host_by_id(&self, id: &str) -> Option<Host> {
        self.find_host_by_id(id).cloned()
    }

    /// Whether any member or host has this ID
    pub fn contains_id(&self, id: &str) -> bool {
        self.find_member_by_id(id).is_some() || self.find_host_by_id(id).is_some()
    }

    /// Merged view of everyone: hosts first, then members
    ///
    /// Built on first read after a mutation and reused until the next one.
    pub fn all_people(&self) -> &[Person] {
        self.people_view.get_or_init(|| {
            self.view_rebuilds.set(self.view_rebuilds.get() + 1);
            let view: Vec<Person> = self
                .hosts
                .iter()
                .cloned()
                .map(Person::Host)
                .chain(self.members.iter().cloned().map(Person::Member))
                .collect();
            debug!(people = view.len(), "Rebuilt people view");
            view
        })
    }

    /// How many times the merged view has been built
    pub fn people_view_rebuilds(&self) -> usize {
        self.view_rebuilds.get()
    }

    pub fn all_members(&self) -> &[Member] {
        &self.members
    }

    pub fn all_hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn person_count(&self) -> usize {
        self.members.len() + self.hosts.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    // Diagnostics

    /// Every duplicate-ID problem across members and hosts
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            let mut order = Vec::new();
            for id in ids {
                let count = counts.entry(id).or_insert(0);
                *count += 1;
                if *count == 2 {
                    order.push(id.to_string());
                }
            }
            order
        }

        let mut issues: Vec<IntegrityIssue> = duplicates(self.members.iter().map(Member::id))
            .into_iter()
            .map(IntegrityIssue::DuplicateMember)
            .collect();

        issues.extend(
            duplicates(self.hosts.iter().map(Host::id))
                .into_iter()
                .map(IntegrityIssue::DuplicateHost),
        );

        let host_ids: HashSet<&str> = self.hosts.iter().map(Host::id).collect();
        let mut reported = HashSet::new();
        for member in &self.members {
            if host_ids.contains(member.id()) && reported.insert(member.id()) {
                issues.push(IntegrityIssue::MemberAndHost(member.id().to_string()));
            }
        }

        issues
    }

    /// `true` when no ID is used twice; problems are logged
    pub fn validate_data_integrity(&self) -> bool {
        let issues = self.integrity_issues();
        for issue in &issues {
            warn!(%issue, "Person data integrity problem");
        }
        issues.is_empty()
    }

    /// Write the current snapshot through the store
    pub fn save(&self) -> TripResult<()> {
        self.persist()
    }

    fn persist(&self) -> TripResult<()> {
        self.store.save(&self.members, &self.hosts)
    }

    fn invalidate_view(&mut self) {
        self.people_view.take();
    }

    fn ids(&self) -> impl Iterator<Item = &str> {
        self.hosts
            .iter()
            .map(Host::id)
            .chain(self.members.iter().map(Member::id))
    }
}

/// IDs in first-seen order, without repeats
fn unique<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

impl PersonLookup for PersonManager {
    fn has_member(&self, id: &str) -> bool {
        self.find_member_by_id(id).is_some()
    }

    fn has_host(&self, id: &str) -> bool {
        self.find_host_by_id(id).is_some()
    }
}

impl fmt::Debug for PersonManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonManager")
            .field("members", &self.members.len())
            .field("hosts", &self.hosts.len())
            .field("subject", &self.subject)
            .finish()
    }
}

impl Drop for PersonManager {
    fn drop(&mut self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, "Failed to save people cache on shutdown");
        }
    }
}
