//! Type-safe event identifier.
//!
//! [`EventId`] is a newtype wrapper around [`uuid::Uuid`] providing type
//! safety so that event identifiers cannot be confused with other UUIDs
//! (registration ids, request ids, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a schedulable event.
///
/// Assigned at event creation time by the administrative process that
/// owns the `events` table; this service only ever reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(uuid::Uuid);

impl EventId {
    /// Creates an `EventId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Consumes the id and returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn into_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for EventId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EventId> for uuid::Uuid {
    fn from(id: EventId) -> Self {
        id.0
    }
}
