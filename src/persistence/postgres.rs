//! PostgreSQL implementation of the event store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{EventStore, StoreError};
use crate::domain::{Event, EventId, Registration};

/// PostgreSQL-backed event store using `sqlx::PgPool`.
///
/// The pool is built once by the supervisor and shared across all
/// in-flight requests; `sqlx` provides the internal concurrency control.
#[derive(Debug, Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    /// Creates a new store backed by the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl EventStore for PostgresEventStore {
    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, String, String, DateTime<Utc>)>(
            "SELECT id, title, description, starts_at FROM events ORDER BY starts_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, title, description, starts_at)| Event {
                id: EventId::from_uuid(id),
                title,
                description,
                starts_at,
            })
            .collect())
    }

    async fn get_event(&self, event_id: EventId) -> Result<Event, StoreError> {
        let row = sqlx::query_as::<_, (Uuid, String, String, DateTime<Utc>)>(
            "SELECT id, title, description, starts_at FROM events WHERE id = $1",
        )
        .bind(event_id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        row.map(|(id, title, description, starts_at)| Event {
            id: EventId::from_uuid(id),
            title,
            description,
            starts_at,
        })
        .ok_or(StoreError::NotFound(event_id))
    }

    async fn insert_registration(
        &self,
        event_id: EventId,
        chat_id: i64,
        username: &str,
    ) -> Result<(), StoreError> {
        let reg = Registration::new(event_id, chat_id, username);

        // ON CONFLICT DO NOTHING makes the duplicate case a successful
        // no-op; concurrent duplicates resolve to a single row through
        // the unique constraint.
        sqlx::query(
            "INSERT INTO registrations (id, event_id, chat_id, username, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (event_id, chat_id) DO NOTHING",
        )
        .bind(reg.id)
        .bind(reg.event_id.into_uuid())
        .bind(reg.chat_id)
        .bind(&reg.username)
        .bind(reg.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(event_id, &e))?;

        Ok(())
    }
}

/// Maps an insert failure to the store taxonomy: a foreign-key violation
/// means the event does not exist; anything else is treated as the store
/// being unavailable.
fn map_insert_error(event_id: EventId, err: &sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) =>
        {
            StoreError::UnknownEvent(event_id)
        }
        _ => StoreError::Unavailable(err.to_string()),
    }
}
