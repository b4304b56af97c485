//! People taking part in trips
//!
//! `PersonInfo` holds the profile fields shared by both roles. `Person` is the
//! role-tagged view used wherever members and hosts are handled together.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::date::TripDate;
use super::gender::Gender;
use super::host::Host;
use super::member::Member;

/// Role discriminator for a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Member,
    Host,
}

impl Role {
    /// Label stored in the `role` field of person records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Host => "Host",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Member" | "member" => Ok(Self::Member),
            "Host" | "host" => Ok(Self::Host),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Profile fields common to members and hosts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonInfo {
    pub id: String,
    pub full_name: String,
    pub date_of_birth: TripDate,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gender: Gender,
}

impl PersonInfo {
    /// Create a profile with the required fields; contact fields start empty
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        gender: Gender,
        date_of_birth: TripDate,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            date_of_birth,
            gender,
            ..Self::default()
        }
    }

    /// Age in years as of today (by calendar year only)
    pub fn age(&self) -> i32 {
        self.age_on(TripDate::today())
    }

    /// Age in years as of `today` (by calendar year only)
    pub fn age_on(&self, today: TripDate) -> i32 {
        today.year - self.date_of_birth.year
    }

    /// `email,phone,address`
    pub fn contact_info(&self) -> String {
        format!("{},{},{}", self.email, self.phone_number, self.address)
    }
}

/// A member or a host
#[derive(Debug, Clone, PartialEq)]
pub enum Person {
    Member(Member),
    Host(Host),
}

impl Person {
    pub fn role(&self) -> Role {
        match self {
            Self::Member(_) => Role::Member,
            Self::Host(_) => Role::Host,
        }
    }

    pub fn id(&self) -> &str {
        &self.info().id
    }

    pub fn info(&self) -> &PersonInfo {
        match self {
            Self::Member(m) => &m.info,
            Self::Host(h) => &h.info,
        }
    }

    pub fn info_mut(&mut self) -> &mut PersonInfo {
        match self {
            Self::Member(m) => &mut m.info,
            Self::Host(h) => &mut h.info,
        }
    }

    pub fn as_member(&self) -> Option<&Member> {
        match self {
            Self::Member(m) => Some(m),
            Self::Host(_) => None,
        }
    }

    pub fn as_host(&self) -> Option<&Host> {
        match self {
            Self::Host(h) => Some(h),
            Self::Member(_) => None,
        }
    }
}

impl From<Member> for Person {
    fn from(member: Member) -> Self {
        Self::Member(member)
    }
}

impl From<Host> for Person {
    fn from(host: Host) -> Self {
        Self::Host(host)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.info().full_name, self.id(), self.role())
    }
}
