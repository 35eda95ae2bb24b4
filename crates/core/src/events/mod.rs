//! Outbox event records for reliable relay.
//!
//! State-changing operations return an `OutboxEvent` alongside the new
//! state. The host persists the event in the same transaction as the
//! state change; a separate relay process delivers it later. The core
//! never publishes to a message bus itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use obralis_shared::types::OutboxEventId;

/// Kinds of domain events emitted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A budget version was locked as a baseline.
    VersionBaselined,
    /// A baselined budget version was approved.
    VersionApproved,
    /// A certification was issued and sealed.
    CertificationIssued,
    /// An issued certification was approved.
    CertificationApproved,
    /// An issued certification was rejected.
    CertificationRejected,
}

impl EventType {
    /// Returns the dotted event name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VersionBaselined => "version.baselined",
            Self::VersionApproved => "version.approved",
            Self::CertificationIssued => "certification.issued",
            Self::CertificationApproved => "certification.approved",
            Self::CertificationRejected => "certification.rejected",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The entity kind an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A budget version.
    BudgetVersion,
    /// A progress certification.
    Certification,
}

impl EntityType {
    /// Returns the string representation of the entity kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BudgetVersion => "budget_version",
            Self::Certification => "certification",
        }
    }
}

/// A domain event staged for the outbox table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    /// Unique identifier of the event record.
    pub id: OutboxEventId,
    /// Kind of event.
    pub event_type: EventType,
    /// Kind of entity the event refers to.
    pub entity_type: EntityType,
    /// Id of the entity the event refers to.
    pub entity_id: Uuid,
    /// JSON payload for relay consumers.
    pub payload: serde_json::Value,
    /// When the triggering state change happened.
    pub occurred_at: DateTime<Utc>,
}

impl OutboxEvent {
    /// Creates a new event record.
    #[must_use]
    pub fn new(
        event_type: EventType,
        entity_type: EntityType,
        entity_id: Uuid,
        payload: serde_json::Value,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OutboxEventId::new(),
            event_type,
            entity_type,
            entity_id,
            payload,
            occurred_at,
        }
    }
}
