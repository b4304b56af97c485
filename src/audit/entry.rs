//! Audit entry data structures
//!
//! Defines the structure of audit log entries including operation types,
//! entity types, and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::managers::ChangeEvent;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// Entity was deleted
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Trip,
    Person,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Trip => write!(f, "Trip"),
            EntityType::Person => write!(f, "Person"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// ID of the affected entity
    pub entity_id: String,
}

impl AuditEntry {
    /// Create an entry stamped with the current time
    pub fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        )
    }
}

impl From<&ChangeEvent> for AuditEntry {
    fn from(event: &ChangeEvent) -> Self {
        let (operation, entity_type) = match event {
            ChangeEvent::TripAdded(_) => (Operation::Create, EntityType::Trip),
            ChangeEvent::TripRemoved(_) => (Operation::Delete, EntityType::Trip),
            ChangeEvent::TripUpdated(_) => (Operation::Update, EntityType::Trip),
            ChangeEvent::PersonAdded(_) => (Operation::Create, EntityType::Person),
            ChangeEvent::PersonRemoved(_) => (Operation::Delete, EntityType::Person),
            ChangeEvent::PersonUpdated(_) => (Operation::Update, EntityType::Person),
        };
        Self::new(operation, entity_type, event.entity_id())
    }
}
