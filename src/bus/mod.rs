//! Announcement bus: the publish capability and its Kafka implementation.
//!
//! [`AnnouncementBus`] is the contract the registration coordinator
//! consumes; [`kafka::KafkaAnnouncementBus`] is the production
//! implementation over a Kafka-compatible broker. Tests substitute
//! in-memory fakes.

pub mod kafka;

use std::future::Future;

pub use kafka::KafkaAnnouncementBus;

/// Errors surfaced by the announcement bus.
///
/// The bus never retries internally; retry policy, if any, belongs to
/// the caller. A failed publish does not affect already-persisted data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// The broker cannot be reached or rejected the write.
    #[error("bus unavailable: {0}")]
    Unavailable(String),

    /// Topic provisioning failed for a reason other than the topic
    /// already existing.
    #[error("topic provisioning failed: {0}")]
    Provisioning(String),
}

/// At-least-once durable publish channel for registration announcements.
pub trait AnnouncementBus: Send + Sync {
    /// Provisions the given topics, treating "already exists" as success.
    ///
    /// Called once at process startup by the supervisor, never on the
    /// per-request path. A failure here is fatal: the process must not
    /// start without its announcement channel.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Provisioning`] when a topic cannot be created
    /// and does not already exist.
    fn ensure_topics(&self, topics: &[String]) -> impl Future<Output = Result<(), BusError>> + Send;

    /// Publishes `payload` to `topic`.
    ///
    /// Delivery guarantees beyond a successful return belong to the
    /// broker; this layer does not retry.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Unavailable`] when the broker cannot be
    /// reached or rejects the write.
    fn publish(
        &self,
        topic: &str,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), BusError>> + Send;
}
