//! Registration model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::EventId;

/// Durable record that a given account registered for a given event.
///
/// At most one registration exists per `(event_id, chat_id)` pair; the
/// store's unique constraint enforces the invariant. Rows are created
/// exclusively by the registration write path and never updated or
/// deleted by this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Registration row identifier.
    pub id: Uuid,
    /// Event the user registered for.
    pub event_id: EventId,
    /// Numeric chat/account identifier of the registrant.
    pub chat_id: i64,
    /// Display name of the registrant (not unique).
    pub username: String,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Builds a new registration with a fresh id and the current timestamp.
    #[must_use]
    pub fn new(event_id: EventId, chat_id: i64, username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            chat_id,
            username: username.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_request_fields() {
        let event_id = EventId::from_uuid(Uuid::from_u128(1));
        let reg = Registration::new(event_id, 42, "ana");
        assert_eq!(reg.event_id, event_id);
        assert_eq!(reg.chat_id, 42);
        assert_eq!(reg.username, "ana");
    }

    #[test]
    fn new_assigns_distinct_ids() {
        let event_id = EventId::from_uuid(Uuid::from_u128(1));
        let a = Registration::new(event_id, 1, "a");
        let b = Registration::new(event_id, 2, "b");
        assert_ne!(a.id, b.id);
    }
}
