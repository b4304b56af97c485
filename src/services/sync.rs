//! Sync service
//!
//! Rebuilds the derived trip data held on people (joined trips, hosted trips
//! and spendings) from the trips themselves. Run after importing trips or
//! people from files, when the two caches may disagree.

use tracing::{info, warn};

use crate::error::TripResult;
use crate::managers::{PersonManager, TripManager};
use crate::models::{Host, Member, Spending, Trip};

/// Summary of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub members_updated: usize,
    pub hosts_updated: usize,
    /// `(trip_id, person_id)` pairs where the person does not exist
    pub dangling: Vec<(String, String)>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.members_updated == 0 && self.hosts_updated == 0 && self.dangling.is_empty()
    }
}

/// Service that brings people back in line with trips
pub struct SyncService<'a> {
    trips: &'a TripManager,
    people: &'a mut PersonManager,
}

impl<'a> SyncService<'a> {
    pub fn new(trips: &'a TripManager, people: &'a mut PersonManager) -> Self {
        Self { trips, people }
    }

    /// Rebuild every member's spendings and joined trips and every host's
    /// hosted trips from the trip list
    ///
    /// Only people whose derived data actually changed are written back, in
    /// one batch per role.
    pub fn sync_people_with_trips(&mut self) -> TripResult<SyncReport> {
        let trips = self.trips.all_trips();

        let members: Vec<Member> = self
            .people
            .all_members()
            .iter()
            .filter_map(|m| rebuild_member(m, trips))
            .collect();

        let hosts: Vec<Host> = self
            .people
            .all_hosts()
            .iter()
            .filter_map(|h| rebuild_host(h, trips))
            .collect();

        let dangling = dangling_references(trips, self.people);
        for (trip_id, person_id) in &dangling {
            warn!(%trip_id, %person_id, "Trip references unknown person");
        }

        let report = SyncReport {
            members_updated: self.people.update_members(members)?,
            hosts_updated: self.people.update_hosts(hosts)?,
            dangling,
        };

        info!(
            members = report.members_updated,
            hosts = report.hosts_updated,
            "Synced people with trips"
        );
        Ok(report)
    }
}

/// The member with derived data recomputed, or `None` if nothing changed
fn rebuild_member(member: &Member, trips: &[Trip]) -> Option<Member> {
    let joined: Vec<String> = trips
        .iter()
        .filter(|t| t.has_member(member.id()))
        .map(|t| t.id.clone())
        .collect();

    let spendings: Vec<Spending> = trips
        .iter()
        .flat_map(|t| {
            t.expenses_by(member.id())
                .map(move |e| Spending::new(t.id.clone(), e.clone()))
        })
        .collect();

    if joined == member.joined_trip_ids && spendings == member.spendings() {
        return None;
    }

    let mut updated = member.clone();
    updated.joined_trip_ids = joined;
    updated.set_spendings(spendings);
    Some(updated)
}

fn rebuild_host(host: &Host, trips: &[Trip]) -> Option<Host> {
    let hosted: Vec<String> = trips
        .iter()
        .filter(|t| t.host_id() == Some(host.id()))
        .map(|t| t.id.clone())
        .collect();

    if hosted == host.hosted_trip_ids {
        return None;
    }

    let mut updated = host.clone();
    updated.hosted_trip_ids = hosted;
    Some(updated)
}

fn dangling_references(trips: &[Trip], people: &PersonManager) -> Vec<(String, String)> {
    let mut dangling = Vec::new();
    for trip in trips {
        if let Some(host_id) = trip.host_id() {
            if people.find_host_by_id(host_id).is_none() {
                dangling.push((trip.id.clone(), host_id.to_string()));
            }
        }
        for member_id in trip.member_ids() {
            if people.find_member_by_id(member_id).is_none() {
                dangling.push((trip.id.clone(), member_id.clone()));
            }
        }
    }
    dangling
}
