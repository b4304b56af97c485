//! JSON document mapping for trips and people
//!
//! Both documents are arrays of flat records. Import is best-effort: the
//! document root must parse as an array, but each record is decoded on its
//! own and a bad record is logged and skipped. Export always writes the whole
//! collection, hosts before members for the people document.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{TripError, TripResult};
use crate::models::{
    Expense, ExpenseCategory, Gender, Host, Member, Money, PersonInfo, Role, Spending, Trip,
    TripDate, TripStatus,
};

use super::file_io::{read_json_value_required, write_json_atomic};
use super::store::{PeopleSnapshot, PersonLookup};

/// A value that either decoded as `T` or is kept raw so the caller can skip it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(Value),
}

impl<T> Lenient<T> {
    fn into_valid(self) -> Option<T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid(_) => None,
        }
    }
}

/// Decode a field, falling back to its default when the value has the wrong type
///
/// A bad field is dropped on its own so the rest of the record still loads.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// One expense inside a trip record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default, deserialize_with = "or_default")]
    pub date: String,
    #[serde(default, deserialize_with = "or_default")]
    pub category: String,
    #[serde(default, deserialize_with = "or_default")]
    pub amount: i64,
    #[serde(default, deserialize_with = "or_default")]
    pub note: String,
    #[serde(rename = "personInCharge", default, deserialize_with = "or_default")]
    pub person_in_charge: String,
}

impl ExpenseRecord {
    fn from_expense(expense: &Expense) -> Self {
        Self {
            date: expense.date.to_string(),
            category: expense.category.as_str().to_string(),
            amount: expense.amount.vnd(),
            note: expense.note.clone(),
            person_in_charge: expense.person_in_charge.clone(),
        }
    }

    fn into_expense(self) -> Result<Expense, String> {
        if self.date.is_empty() {
            return Err("missing date".into());
        }
        if self.amount <= 0 {
            return Err(format!("non-positive amount {}", self.amount));
        }
        if self.person_in_charge.is_empty() {
            return Err("missing personInCharge".into());
        }

        let date = TripDate::parse(&self.date).map_err(|e| e.to_string())?;
        Ok(Expense::new(
            date,
            ExpenseCategory::from_label(&self.category),
            Money::from_vnd(self.amount),
            self.note,
            self.person_in_charge,
        ))
    }
}

/// One spending inside a member record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpendingRecord {
    #[serde(default, deserialize_with = "or_default")]
    pub trip_id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub date: String,
    #[serde(default, deserialize_with = "or_default")]
    pub category: String,
    #[serde(default, deserialize_with = "or_default")]
    pub amount: i64,
    #[serde(default, deserialize_with = "or_default")]
    pub note: String,
    #[serde(rename = "personInCharge", default, deserialize_with = "or_default")]
    pub person_in_charge: String,
}

impl SpendingRecord {
    fn from_spending(spending: &Spending) -> Self {
        let expense = ExpenseRecord::from_expense(&spending.expense);
        Self {
            trip_id: spending.trip_id.clone(),
            date: expense.date,
            category: expense.category,
            amount: expense.amount,
            note: expense.note,
            person_in_charge: expense.person_in_charge,
        }
    }

    fn into_spending(self) -> Result<Spending, String> {
        if self.trip_id.is_empty() {
            return Err("missing trip_id".into());
        }

        let expense = ExpenseRecord {
            date: self.date,
            category: self.category,
            amount: self.amount,
            note: self.note,
            person_in_charge: self.person_in_charge,
        }
        .into_expense()?;

        Ok(Spending::new(self.trip_id, expense))
    }
}

/// One trip in the trip document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(default, deserialize_with = "or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub destination: String,
    #[serde(default, deserialize_with = "or_default")]
    pub description: String,
    #[serde(default, deserialize_with = "or_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "or_default")]
    pub end_date: String,
    #[serde(default = "default_status", deserialize_with = "or_default")]
    pub status: String,
    #[serde(default, deserialize_with = "or_default")]
    pub host_id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub member_ids: Vec<Lenient<String>>,
    #[serde(default, deserialize_with = "or_default")]
    pub expenses: Vec<Lenient<ExpenseRecord>>,
}

fn default_status() -> String {
    TripStatus::Planned.as_str().to_string()
}

impl TripRecord {
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            destination: trip.destination().to_string(),
            description: trip.description.clone(),
            start_date: trip.start_date.to_string(),
            end_date: trip.end_date.to_string(),
            status: trip.status.as_str().to_string(),
            host_id: trip.host_id().unwrap_or_default().to_string(),
            member_ids: trip.member_ids().iter().cloned().map(Lenient::Valid).collect(),
            expenses: trip
                .expenses()
                .iter()
                .map(|e| Lenient::Valid(ExpenseRecord::from_expense(e)))
                .collect(),
        }
    }

    /// Build a trip, resolving host, members and expenses through `people`
    ///
    /// Without a lookup only the scalar fields are kept. References that do
    /// not resolve are dropped.
    pub fn into_trip(self, people: Option<&dyn PersonLookup>) -> Result<Trip, String> {
        if self.id.is_empty()
            || self.destination.is_empty()
            || self.start_date.is_empty()
            || self.end_date.is_empty()
        {
            return Err("missing required trip fields".into());
        }

        let start = TripDate::parse(&self.start_date).map_err(|e| e.to_string())?;
        let end = TripDate::parse(&self.end_date).map_err(|e| e.to_string())?;

        let mut trip = Trip::new(
            &self.id,
            &self.destination,
            self.description,
            start,
            end,
            TripStatus::from_label(&self.status),
        );

        let Some(people) = people else {
            return Ok(trip);
        };

        if !self.host_id.is_empty() {
            if people.has_host(&self.host_id) {
                trip.set_host(self.host_id);
            } else {
                debug!(trip = %trip.id, host = %self.host_id, "Dropping unknown host");
            }
        }

        for member_id in self.member_ids.into_iter().filter_map(Lenient::into_valid) {
            if member_id.is_empty() {
                continue;
            }
            if people.has_member(&member_id) {
                trip.add_member(member_id);
            } else {
                debug!(trip = %trip.id, member = %member_id, "Dropping unknown member");
            }
        }

        for (index, raw) in self.expenses.into_iter().enumerate() {
            let Some(record) = raw.into_valid() else {
                warn!(trip = %trip.id, index, "Skipping malformed expense record");
                continue;
            };
            match record.into_expense() {
                Ok(expense) if people.has_member(&expense.person_in_charge) => {
                    trip.add_expense(expense);
                }
                Ok(expense) => {
                    debug!(
                        trip = %trip.id,
                        person = %expense.person_in_charge,
                        "Dropping expense with unknown person in charge"
                    );
                }
                Err(reason) => {
                    warn!(trip = %trip.id, index, %reason, "Skipping invalid expense record");
                }
            }
        }

        Ok(trip)
    }
}

/// One person in the people document
///
/// Member-only fields are absent from host records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default, deserialize_with = "or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub date_of_birth: String,
    #[serde(default, deserialize_with = "or_default")]
    pub email: String,
    #[serde(default, deserialize_with = "or_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "or_default")]
    pub address: String,
    #[serde(default, deserialize_with = "or_default")]
    pub gender: String,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub emergency_contact: String,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub interests: Option<Vec<Lenient<String>>>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub spendings: Option<Vec<Lenient<SpendingRecord>>>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_spent: Option<i64>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub has_driver_license: Option<bool>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub joined_trip_ids: Option<Vec<Lenient<String>>>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub hosted_trip_ids: Option<Vec<Lenient<String>>>,
}

fn trip_id_list(ids: &[String]) -> Option<Vec<Lenient<String>>> {
    Some(ids.iter().cloned().map(Lenient::Valid).collect())
}

fn valid_trip_ids(ids: Option<Vec<Lenient<String>>>) -> impl Iterator<Item = String> {
    ids.unwrap_or_default()
        .into_iter()
        .filter_map(Lenient::into_valid)
        .filter(|id| !id.is_empty())
}

/// A decoded person record, before it is sorted into members or hosts
enum DecodedPerson {
    Member(Member),
    Host(Host),
}

impl PersonRecord {
    fn common(info: &PersonInfo, role: Role, emergency_contact: &str) -> Self {
        Self {
            id: info.id.clone(),
            full_name: info.full_name.clone(),
            date_of_birth: info.date_of_birth.to_string(),
            email: info.email.clone(),
            phone_number: info.phone_number.clone(),
            address: info.address.clone(),
            gender: info.gender.as_str().to_string(),
            role: Some(role.as_str().to_string()),
            emergency_contact: emergency_contact.to_string(),
            ..Self::default()
        }
    }

    pub fn from_host(host: &Host) -> Self {
        Self {
            hosted_trip_ids: trip_id_list(&host.hosted_trip_ids),
            ..Self::common(&host.info, Role::Host, &host.emergency_contact)
        }
    }

    pub fn from_member(member: &Member) -> Self {
        Self {
            interests: Some(
                member
                    .interests
                    .iter()
                    .cloned()
                    .map(Lenient::Valid)
                    .collect(),
            ),
            spendings: Some(
                member
                    .spendings()
                    .iter()
                    .map(|s| Lenient::Valid(SpendingRecord::from_spending(s)))
                    .collect(),
            ),
            total_spent: Some(member.total_spent().vnd()),
            has_driver_license: Some(member.has_driver_license),
            joined_trip_ids: trip_id_list(&member.joined_trip_ids),
            ..Self::common(&member.info, Role::Member, &member.emergency_contact)
        }
    }

    fn decode(self) -> Result<DecodedPerson, String> {
        let role = match self.role.as_deref() {
            None => return Err("missing role".into()),
            Some(label) => label.parse::<Role>()?,
        };

        if self.id.is_empty() {
            return Err("missing id".into());
        }
        if self.full_name.is_empty() || self.date_of_birth.is_empty() || self.gender.is_empty() {
            return Err("missing required person fields".into());
        }

        let date_of_birth = TripDate::parse(&self.date_of_birth).map_err(|e| e.to_string())?;
        let info = PersonInfo {
            id: self.id,
            full_name: self.full_name,
            date_of_birth,
            email: self.email,
            phone_number: self.phone_number,
            address: self.address,
            gender: Gender::from_label(&self.gender),
        };

        match role {
            Role::Host => {
                let mut host = Host::new(info);
                host.emergency_contact = self.emergency_contact;
                for trip_id in valid_trip_ids(self.hosted_trip_ids) {
                    host.host_trip(trip_id);
                }
                Ok(DecodedPerson::Host(host))
            }
            Role::Member => {
                let mut member = Member::new(info);
                member.emergency_contact = self.emergency_contact;
                member.has_driver_license = self.has_driver_license.unwrap_or(false);
                for trip_id in valid_trip_ids(self.joined_trip_ids) {
                    member.join_trip(trip_id);
                }

                for interest in self.interests.unwrap_or_default() {
                    if let Some(interest) = interest.into_valid() {
                        member.add_interest(interest);
                    }
                }

                let mut spendings = Vec::new();
                for raw in self.spendings.unwrap_or_default() {
                    match raw.into_valid().map(SpendingRecord::into_spending) {
                        Some(Ok(spending)) => spendings.push(spending),
                        Some(Err(reason)) => {
                            warn!(member = %member.id(), %reason, "Skipping invalid spending record");
                        }
                        None => {
                            warn!(member = %member.id(), "Skipping malformed spending record");
                        }
                    }
                }
                member.set_spendings(spendings);

                if let Some(stored) = self.total_spent {
                    let computed = member.total_spent().vnd();
                    if stored != computed {
                        warn!(
                            member = %member.id(),
                            stored,
                            computed,
                            "Stored total_spent disagrees with spendings; using spendings"
                        );
                    }
                }

                Ok(DecodedPerson::Member(member))
            }
        }
    }
}

fn expect_array(root: Value, what: &str) -> TripResult<Vec<Value>> {
    match root {
        Value::Array(items) => Ok(items),
        _ => Err(TripError::Import(format!(
            "Invalid JSON structure: expected array of {}",
            what
        ))),
    }
}

/// Decode a people document
pub fn decode_people(root: Value) -> TripResult<PeopleSnapshot> {
    let items = expect_array(root, "people")?;
    let mut snapshot = PeopleSnapshot::default();

    for (index, item) in items.into_iter().enumerate() {
        let decoded = serde_json::from_value::<PersonRecord>(item)
            .map_err(|e| e.to_string())
            .and_then(PersonRecord::decode);

        match decoded {
            Ok(DecodedPerson::Member(m)) => snapshot.members.push(m),
            Ok(DecodedPerson::Host(h)) => snapshot.hosts.push(h),
            Err(reason) => warn!(index, %reason, "Skipping person record"),
        }
    }

    Ok(snapshot)
}

/// Encode people as a document: hosts first, then members
pub fn encode_people(members: &[Member], hosts: &[Host]) -> Vec<PersonRecord> {
    hosts
        .iter()
        .map(PersonRecord::from_host)
        .chain(members.iter().map(PersonRecord::from_member))
        .collect()
}

/// Decode a trip document
///
/// Fails if the document held records but none of them could be used.
pub fn decode_trips(root: Value, people: Option<&dyn PersonLookup>) -> TripResult<Vec<Trip>> {
    let items = expect_array(root, "trips")?;
    let total = items.len();
    let mut trips = Vec::with_capacity(total);

    for (index, item) in items.into_iter().enumerate() {
        let decoded = serde_json::from_value::<TripRecord>(item)
            .map_err(|e| e.to_string())
            .and_then(|record| record.into_trip(people));

        match decoded {
            Ok(trip) => trips.push(trip),
            Err(reason) => warn!(index, %reason, "Skipping trip record"),
        }
    }

    if trips.is_empty() && total > 0 {
        return Err(TripError::Import(format!(
            "Failed to import any trips from JSON file ({} records rejected)",
            total
        )));
    }

    Ok(trips)
}

pub fn encode_trips(trips: &[Trip]) -> Vec<TripRecord> {
    trips.iter().map(TripRecord::from_trip).collect()
}

/// Read members and hosts from a people document
pub fn import_people_info_from_json<P: AsRef<Path>>(path: P) -> TripResult<PeopleSnapshot> {
    let root = read_json_value_required(path)?;
    decode_people(root)
}

/// Write members and hosts to a people document
pub fn export_people_info_to_json<P: AsRef<Path>>(
    members: &[Member],
    hosts: &[Host],
    path: P,
) -> TripResult<()> {
    let path = path.as_ref();
    write_json_atomic(path, &encode_people(members, hosts)).map_err(|e| {
        TripError::Export(format!("Cannot write {}: {}", path.display(), e))
    })
}

/// Read trips from a trip document
///
/// `people` resolves host, member and expense references; without it only
/// the scalar trip fields are imported.
pub fn import_trip_info_from_json<P: AsRef<Path>>(
    path: P,
    people: Option<&dyn PersonLookup>,
) -> TripResult<Vec<Trip>> {
    let root = read_json_value_required(path)?;
    decode_trips(root, people)
}

/// Write trips to a trip document
pub fn export_trips_info_to_json<P: AsRef<Path>>(trips: &[Trip], path: P) -> TripResult<()> {
    let path = path.as_ref();
    write_json_atomic(path, &encode_trips(trips)).map_err(|e| {
        TripError::Export(format!("Cannot write {}: {}", path.display(), e))
    })
}
