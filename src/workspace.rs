//! Workspace: both managers opened against one cache folder
//!
//! The binary works through a `Workspace`. It loads settings, opens the
//! person manager first so the trip cache can resolve its references,
//! rebuilds the people's trip lists from the trips, and attaches the audit
//! observer to both managers when auditing is enabled.

use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::audit::{AuditLogger, AuditObserver};
use crate::config::{CachePaths, Settings};
use crate::error::TripResult;
use crate::managers::{IntegrityIssue, PersonManager, TripManager};
use crate::models::{Host, Member, TripValidationError};
use crate::services::{PersonService, SyncReport, SyncService, TripService};
use crate::storage::{
    export_people_info_to_json, export_trips_info_to_json, import_people_info_from_json,
    import_trip_info_from_json,
};

/// Outcome of importing a document into the workspace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records with IDs not seen before
    pub added: usize,
    /// Records that replaced an existing entity with the same ID
    pub updated: usize,
    /// Records skipped because their ID belongs to a different kind of entity
    pub skipped: usize,
}

/// Problems found by `Workspace::validate`
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub people: Vec<IntegrityIssue>,
    pub trips: Vec<(String, TripValidationError)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.people.is_empty() && self.trips.is_empty()
    }
}

/// The trip planner's working state
pub struct Workspace {
    paths: CachePaths,
    settings: Settings,
    people: PersonManager,
    trips: TripManager,
    audit: Option<Rc<AuditObserver>>,
}

impl Workspace {
    /// Open the cache folder under the process working directory
    pub fn open_current_dir() -> TripResult<Self> {
        Self::open(CachePaths::from_current_dir()?)
    }

    /// Open both caches under `paths`
    pub fn open(paths: CachePaths) -> TripResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        let mut people = PersonManager::open_cache(&paths)?;
        let trips = TripManager::open_cache(&paths, &people)?;

        // Person caches written before trip lists were stored come back empty
        let report = SyncService::new(&trips, &mut people).sync_people_with_trips()?;
        if !report.is_clean() {
            debug!(
                members = report.members_updated,
                hosts = report.hosts_updated,
                "Refreshed people from trips on open"
            );
        }

        let audit = settings.audit_enabled.then(|| {
            let observer = Rc::new(AuditObserver::new(AuditLogger::new(paths.audit_log())));
            people.add_observer(&observer);
            trips.add_observer(&observer);
            observer
        });

        info!(
            people = people.person_count(),
            trips = trips.trip_count(),
            "Opened workspace"
        );

        Ok(Self {
            paths,
            settings,
            people,
            trips,
            audit,
        })
    }

    pub fn paths(&self) -> &CachePaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn people(&self) -> &PersonManager {
        &self.people
    }

    pub fn people_mut(&mut self) -> &mut PersonManager {
        &mut self.people
    }

    pub fn trips(&self) -> &TripManager {
        &self.trips
    }

    pub fn trips_mut(&mut self) -> &mut TripManager {
        &mut self.trips
    }

    /// The audit logger, when auditing is enabled
    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_deref().map(AuditObserver::logger)
    }

    pub fn person_service(&mut self) -> PersonService<'_> {
        PersonService::new(&mut self.people)
    }

    pub fn trip_service(&mut self) -> TripService<'_> {
        TripService::new(&mut self.trips, &mut self.people)
    }

    /// Rebuild people's trip back-references from the trips
    pub fn sync(&mut self) -> TripResult<SyncReport> {
        SyncService::new(&self.trips, &mut self.people).sync_people_with_trips()
    }

    /// Merge a people document into the workspace
    ///
    /// People with new IDs are added and existing people of the same role
    /// are replaced. An ID already used by the other role is skipped.
    pub fn import_people(&mut self, path: impl AsRef<Path>) -> TripResult<ImportSummary> {
        let snapshot = import_people_info_from_json(path)?;
        let mut summary = ImportSummary::default();

        let mut new_members = Vec::new();
        let mut known_members = Vec::new();
        for member in snapshot.members {
            if self.people.find_member_by_id(member.id()).is_some() {
                known_members.push(member);
            } else if self.people.contains_id(member.id()) {
                warn!(id = %member.id(), "Skipping imported member: ID belongs to a host");
                summary.skipped += 1;
            } else {
                new_members.push(member);
            }
        }

        let mut new_hosts = Vec::new();
        let mut known_hosts = Vec::new();
        for host in snapshot.hosts {
            if self.people.find_host_by_id(host.id()).is_some() {
                known_hosts.push(host);
            } else if self.people.contains_id(host.id())
                || new_members.iter().any(|m: &Member| m.id() == host.id())
            {
                warn!(id = %host.id(), "Skipping imported host: ID belongs to a member");
                summary.skipped += 1;
            } else {
                new_hosts.push(host);
            }
        }

        summary.added = new_members.len() + new_hosts.len();
        self.people.add_multiple_members(new_members)?;
        self.people.add_multiple_hosts(new_hosts)?;
        summary.updated = self.people.update_members(known_members)?
            + self.people.update_hosts(known_hosts)?;

        info!(
            added = summary.added,
            updated = summary.updated,
            skipped = summary.skipped,
            "Imported people"
        );
        Ok(summary)
    }

    /// Merge a trip document into the workspace
    ///
    /// References are resolved against the people already loaded, so import
    /// people first. Trips with existing IDs are replaced.
    pub fn import_trips(&mut self, path: impl AsRef<Path>) -> TripResult<ImportSummary> {
        let trips = import_trip_info_from_json(path, Some(&self.people))?;
        let mut summary = ImportSummary::default();

        for trip in trips {
            let id = trip.id.clone();
            if self.trips.update_trip(&id, trip.clone())? {
                summary.updated += 1;
            } else {
                self.trips.add_trip(trip)?;
                summary.added += 1;
            }
        }

        info!(
            added = summary.added,
            updated = summary.updated,
            "Imported trips"
        );
        Ok(summary)
    }

    /// Write every person to a people document; returns how many were written
    pub fn export_people(&self, path: impl AsRef<Path>) -> TripResult<usize> {
        export_people_info_to_json(self.people.all_members(), self.people.all_hosts(), path)?;
        Ok(self.people.person_count())
    }

    /// Write every trip to a trip document; returns how many were written
    pub fn export_trips(&self, path: impl AsRef<Path>) -> TripResult<usize> {
        export_trips_info_to_json(self.trips.all_trips(), path)?;
        Ok(self.trips.trip_count())
    }

    /// Check people for duplicate IDs and trips for invalid fields
    pub fn validate(&self) -> ValidationReport {
        let trips = self
            .trips
            .all_trips()
            .iter()
            .filter_map(|t| t.validate().err().map(|e| (t.id.clone(), e)))
            .collect();

        ValidationReport {
            people: self.people.integrity_issues(),
            trips,
        }
    }

    /// Write both caches now
    pub fn save(&self) -> TripResult<()> {
        self.people.save()?;
        self.trips.save()
    }

    /// Register a host directly; shorthand for the person service
    pub fn register_host(&mut self, host: Host) -> TripResult<Host> {
        self.person_service().register_host(host)
    }

    /// Register a member directly; shorthand for the person service
    pub fn register_member(&mut self, member: Member) -> TripResult<Member> {
        self.person_service().register_member(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpenseCategory, Gender, Money, TripDate};
    use crate::services::NewTrip;
    use tempfile::TempDir;

    fn create_test_workspace() -> (TempDir, Workspace) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CachePaths::with_working_dir(temp_dir.path());
        paths.ensure_cache_dir().unwrap();
        let workspace = Workspace::open(paths).unwrap();
        (temp_dir, workspace)
    }

    fn populate(workspace: &mut Workspace) {
        workspace
            .register_host(Host::create("John Smith", Gender::Male, TripDate::new(1, 1, 1990)))
            .unwrap();
        workspace
            .register_member(Member::create("Ann Bee", Gender::Female, TripDate::new(2, 2, 1992)))
            .unwrap();

        let mut service = workspace.trip_service();
        service
            .create_trip(NewTrip {
                destination: "Paris".into(),
                description: "Summer".into(),
                start_date: TripDate::new(1, 6, 2025),
                end_date: TripDate::new(7, 6, 2025),
                host_id: Some("JS_0101".into()),
                member_ids: vec!["AB_0202".into()],
            })
            .unwrap();
        service
            .add_expense(
                "PARIS_0601",
                Expense::new(
                    TripDate::new(2, 6, 2025),
                    ExpenseCategory::Food,
                    Money::from_vnd(500_000),
                    "",
                    "AB_0202",
                ),
            )
            .unwrap();
    }

    #[test]
    fn test_open_requires_nothing_but_cache_dir() {
        let (_temp, workspace) = create_test_workspace();
        assert_eq!(workspace.people().person_count(), 0);
        assert_eq!(workspace.trips().trip_count(), 0);
        assert!(workspace.audit_logger().is_some());
    }

    #[test]
    fn test_export_clear_reimport_sync() {
        let (temp, mut workspace) = create_test_workspace();
        populate(&mut workspace);

        let people_file = temp.path().join("people.json");
        let trips_file = temp.path().join("trips.json");
        assert_eq!(workspace.export_people(&people_file).unwrap(), 2);
        assert_eq!(workspace.export_trips(&trips_file).unwrap(), 1);

        workspace.trips_mut().replace_all(Vec::new()).unwrap();
        workspace.people_mut().replace_all(Vec::new(), Vec::new()).unwrap();

        let people = workspace.import_people(&people_file).unwrap();
        assert_eq!(people.added, 2);
        let trips = workspace.import_trips(&trips_file).unwrap();
        assert_eq!(trips.added, 1);

        // Drop the derived data so sync has to rebuild it
        workspace
            .people_mut()
            .find_member_by_id_mut("AB_0202")
            .unwrap()
            .clear_spendings();
        workspace.sync().unwrap();

        let trip = workspace.trips().find_trip_by_id("PARIS_0601").unwrap();
        assert_eq!(trip.host_id(), Some("JS_0101"));
        assert!(trip.has_member("AB_0202"));

        let member = workspace.people().find_member_by_id("AB_0202").unwrap();
        assert_eq!(member.total_spent(), Money::from_vnd(500_000));
    }

    #[test]
    fn test_reopen_restores_state() {
        let (temp, mut workspace) = create_test_workspace();
        populate(&mut workspace);
        drop(workspace);

        let workspace = Workspace::open(CachePaths::resolve(temp.path()).unwrap()).unwrap();
        assert_eq!(workspace.people().person_count(), 2);
        let trip = workspace.trips().find_trip_by_id("PARIS_0601").unwrap();
        assert_eq!(trip.total_expense(), Money::from_vnd(500_000));
        assert_eq!(trip.member_ids(), ["AB_0202".to_string()]);
    }

    #[test]
    fn test_reopen_keeps_trip_lists() {
        let (temp, mut workspace) = create_test_workspace();
        populate(&mut workspace);
        drop(workspace);

        let mut workspace = Workspace::open(CachePaths::resolve(temp.path()).unwrap()).unwrap();
        let member = workspace.people().find_member_by_id("AB_0202").unwrap();
        assert!(member.has_joined_trip("PARIS_0601"));
        let host = workspace.people().find_host_by_id("JS_0101").unwrap();
        assert!(host.has_hosted_trip("PARIS_0601"));

        assert!(workspace.sync().unwrap().is_clean());
    }

    #[test]
    fn test_open_rebuilds_trip_lists_missing_from_cache() {
        let (temp, mut workspace) = create_test_workspace();
        populate(&mut workspace);
        let people_file = workspace.paths().people_cache_file();
        drop(workspace);

        let text = std::fs::read_to_string(&people_file).unwrap();
        let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        for record in doc.as_array_mut().unwrap() {
            let record = record.as_object_mut().unwrap();
            record.remove("joined_trip_ids");
            record.remove("hosted_trip_ids");
            record.remove("spendings");
        }
        std::fs::write(&people_file, doc.to_string()).unwrap();

        let workspace = Workspace::open(CachePaths::resolve(temp.path()).unwrap()).unwrap();
        let member = workspace.people().find_member_by_id("AB_0202").unwrap();
        assert!(member.has_joined_trip("PARIS_0601"));
        assert_eq!(member.total_spent(), Money::from_vnd(500_000));
        assert!(workspace
            .people()
            .find_host_by_id("JS_0101")
            .unwrap()
            .has_hosted_trip("PARIS_0601"));
    }

    #[test]
    fn test_import_updates_existing_and_skips_role_clash() {
        let (temp, mut workspace) = create_test_workspace();
        populate(&mut workspace);

        let file = temp.path().join("people.json");
        let clash = Member::create("Jane Sparrow", Gender::Female, TripDate::new(1, 1, 1999));
        let mut ann = Member::create("Ann Bee", Gender::Female, TripDate::new(2, 2, 1992));
        ann.info.email = "ann@example.com".into();
        export_people_info_to_json(&[ann, clash], &[], &file).unwrap();

        let summary = workspace.import_people(&file).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                added: 0,
                updated: 1,
                skipped: 1
            }
        );
        assert_eq!(
            workspace.people().find_member_by_id("AB_0202").unwrap().info.email,
            "ann@example.com"
        );
    }

    #[test]
    fn test_audit_log_records_changes() {
        let (_temp, mut workspace) = create_test_workspace();
        populate(&mut workspace);

        let logger = workspace.audit_logger().unwrap();
        // two registrations, the trip, then back-reference and expense updates
        assert!(logger.entry_count().unwrap() >= 3);
    }

    #[test]
    fn test_validate() {
        let (_temp, mut workspace) = create_test_workspace();
        populate(&mut workspace);
        assert!(workspace.validate().is_valid());

        workspace
            .people_mut()
            .add_member(Member::create("Ann Bee", Gender::Female, TripDate::new(2, 2, 1992)))
            .unwrap();
        assert_eq!(workspace.validate().people.len(), 1);
    }
}
