//! Announcement envelope published after a successful registration.

use serde::{Deserialize, Serialize};

use super::EventId;

/// Topic every registration announcement is published to.
pub const REGISTER_USER_TOPIC: &str = "register.user";

/// Wire payload announcing a stored registration to downstream consumers.
///
/// A projection of [`super::Registration`] with no identity or lifecycle
/// of its own: it is constructed, published once, and discarded within a
/// single write-path invocation. Serialized as compact JSON
/// (`{"chat_id": .., "username": .., "event_id": ..}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementEnvelope {
    /// Numeric chat/account identifier of the registrant.
    pub chat_id: i64,
    /// Display name of the registrant.
    pub username: String,
    /// Event the user registered for.
    pub event_id: EventId,
}
