//! Person service
//!
//! Registration with duplicate checks on top of the person manager. IDs are
//! unique across members and hosts together.

use tracing::info;

use crate::error::{TripError, TripResult};
use crate::managers::PersonManager;
use crate::models::{Host, Member, Person, PersonInfo};

/// Service for registering and looking up people
pub struct PersonService<'a> {
    people: &'a mut PersonManager,
}

impl<'a> PersonService<'a> {
    /// Create a new person service
    pub fn new(people: &'a mut PersonManager) -> Self {
        Self { people }
    }

    /// Register a member, rejecting IDs already used by anyone
    pub fn register_member(&mut self, member: Member) -> TripResult<Member> {
        self.check_new(&member.info, "Member")?;

        info!(id = %member.id(), "Registering member");
        self.people.add_member(member.clone())?;
        Ok(member)
    }

    /// Register a host, rejecting IDs already used by anyone
    pub fn register_host(&mut self, host: Host) -> TripResult<Host> {
        self.check_new(&host.info, "Host")?;

        info!(id = %host.id(), "Registering host");
        self.people.add_host(host.clone())?;
        Ok(host)
    }

    /// Get a person by ID
    pub fn get(&self, id: &str) -> TripResult<Person> {
        self.people
            .find_person_by_id(id)
            .ok_or_else(|| TripError::person_not_found(id))
    }

    /// All people, hosts first
    pub fn list(&self) -> &[Person] {
        self.people.all_people()
    }

    fn check_new(&self, info: &PersonInfo, entity_type: &'static str) -> TripResult<()> {
        if info.id.trim().is_empty() {
            return Err(TripError::Validation("Person ID cannot be empty".into()));
        }

        if info.full_name.trim().is_empty() {
            return Err(TripError::Validation("Full name cannot be empty".into()));
        }

        if self.people.contains_id(&info.id) {
            return Err(TripError::Duplicate {
                entity_type,
                identifier: info.id.clone(),
            });
        }

        Ok(())
    }
}
