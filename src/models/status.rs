//! Trip lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a trip is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TripStatus {
    #[default]
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [TripStatus; 4] = [
        TripStatus::Planned,
        TripStatus::Ongoing,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    /// Canonical label used in JSON documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Map a stored label to a status, treating anything unknown as `Planned`
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    /// Whether the trip is over, one way or another
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown trip status: {}", s)),
        }
    }
}
