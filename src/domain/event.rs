//! Event model.

use chrono::{DateTime, Utc};

use super::EventId;

/// A schedulable activity users can register for.
///
/// Rows in the `events` table are created and updated by an external
/// administrative process; this service treats them as read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Globally unique event identifier.
    pub id: EventId,
    /// Human-readable event title.
    pub title: String,
    /// Free-form event description.
    pub description: String,
    /// When the event starts.
    pub starts_at: DateTime<Utc>,
}
