//! Event DTOs for the read endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Event, EventId};

/// A single event as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDto {
    /// Globally unique event identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: EventId,
    /// Human-readable event title.
    pub title: String,
    /// Free-form event description.
    pub description: String,
    /// When the event starts.
    pub starts_at: DateTime<Utc>,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            starts_at: event.starts_at,
        }
    }
}

/// Response body for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// All known events, oldest start first.
    pub events: Vec<EventDto>,
}
