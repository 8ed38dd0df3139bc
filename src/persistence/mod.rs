//! Persistence layer: the event store capability and its PostgreSQL
//! implementation.
//!
//! [`EventStore`] is the contract the registration coordinator consumes;
//! [`postgres::PostgresEventStore`] is the production implementation
//! backed by `sqlx::PgPool`. Tests substitute in-memory fakes.

pub mod postgres;

use std::future::Future;

pub use postgres::PostgresEventStore;

use crate::domain::{Event, EventId};

/// Errors surfaced by the event store.
///
/// The store never retries internally; callers decide retry policy based
/// on the variant. [`StoreError::Unavailable`] is transient and safely
/// retryable (inserts are idempotent); the other variants are terminal
/// without a changed request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The requested event does not exist.
    #[error("event not found: {0}")]
    NotFound(EventId),

    /// A registration referenced an event that does not exist
    /// (foreign-key violation).
    #[error("event does not exist: {0}")]
    UnknownEvent(EventId),

    /// Connectivity or query failure; the operation may be retried.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable relational record of events and registrations.
///
/// Implementations own all on-disk representation and provide their own
/// internal concurrency control; the `(event_id, chat_id)` unique
/// constraint is the sole serialization point for concurrent duplicate
/// registrations.
pub trait EventStore: Send + Sync {
    /// Returns all events, empty when none exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on connectivity or query
    /// failure.
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, StoreError>> + Send;

    /// Returns the event with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no row matches and
    /// [`StoreError::Unavailable`] on connectivity or query failure.
    fn get_event(&self, event_id: EventId)
    -> impl Future<Output = Result<Event, StoreError>> + Send;

    /// Records a registration for `(event_id, chat_id)`.
    ///
    /// Idempotent: a repeat call with the same pair is a no-op that still
    /// reports success, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEvent`] when the event does not exist
    /// and [`StoreError::Unavailable`] on connectivity failure.
    fn insert_registration(
        &self,
        event_id: EventId,
        chat_id: i64,
        username: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
