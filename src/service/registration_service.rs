//! Registration service: the persist-then-announce coordination path.

use std::time::Duration;

use crate::bus::AnnouncementBus;
use crate::domain::{AnnouncementEnvelope, Event, EventId};
use crate::error::{GatewayError, RequestPhase};
use crate::persistence::EventStore;

/// Why an announcement did not reach the bus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnounceFailure {
    /// The broker could not be reached or rejected the write.
    #[error("bus unavailable: {0}")]
    Unavailable(String),

    /// The envelope could not be serialized.
    #[error("envelope encoding failed: {0}")]
    Encode(String),

    /// The per-call deadline expired while publishing.
    #[error("deadline exceeded while announcing")]
    DeadlineExceeded,
}

/// Caller-visible result of a registration request.
///
/// Both variants mean the registration is durably stored. The
/// distinction matters for retries: after [`Self::Registered`] there is
/// nothing to do, while after [`Self::AnnounceFailed`] a retry would
/// risk a duplicate announcement (the insert itself stays idempotent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Registration stored and announcement published.
    Registered,
    /// Registration stored but the announcement was not published.
    AnnounceFailed(AnnounceFailure),
}

impl RegistrationOutcome {
    /// Returns `true` when the announcement reached the bus.
    #[must_use]
    pub const fn announced(&self) -> bool {
        matches!(self, Self::Registered)
    }
}

/// Coordination layer for event reads and registration writes.
///
/// Owns the two-step write protocol: persist (authoritative), then
/// announce (best-effort). Holds no mutable state of its own; all
/// shared state lives in the injected store and bus, so one instance
/// serves all in-flight requests concurrently.
#[derive(Debug, Clone)]
pub struct RegistrationService<S, B> {
    store: S,
    bus: B,
    topic: String,
    deadline: Duration,
}

impl<S: EventStore, B: AnnouncementBus> RegistrationService<S, B> {
    /// Creates a new `RegistrationService`.
    ///
    /// `topic` is where announcement envelopes are published; `deadline`
    /// bounds each store or bus call individually.
    #[must_use]
    pub fn new(store: S, bus: B, topic: String, deadline: Duration) -> Self {
        Self {
            store,
            bus,
            topic,
            deadline,
        }
    }

    /// Returns all events.
    ///
    /// Pure pass-through to the store; an empty store yields an empty
    /// vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StoreUnavailable`] on store failure and
    /// [`GatewayError::DeadlineExceeded`] when the call outlives the
    /// configured deadline.
    pub async fn list_events(&self) -> Result<Vec<Event>, GatewayError> {
        let events = tokio::time::timeout(self.deadline, self.store.list_events())
            .await
            .map_err(|_| GatewayError::DeadlineExceeded(RequestPhase::Read))??;
        Ok(events)
    }

    /// Returns the event with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown id,
    /// [`GatewayError::StoreUnavailable`] on store failure and
    /// [`GatewayError::DeadlineExceeded`] when the call outlives the
    /// configured deadline.
    pub async fn get_event(&self, event_id: EventId) -> Result<Event, GatewayError> {
        let event = tokio::time::timeout(self.deadline, self.store.get_event(event_id))
            .await
            .map_err(|_| GatewayError::DeadlineExceeded(RequestPhase::Read))??;
        Ok(event)
    }

    /// Registers a user for an event and announces the registration.
    ///
    /// Two strictly ordered steps, no distributed transaction:
    ///
    /// 1. Persist via the store. The durability boundary: once this
    ///    succeeds the registration has happened, regardless of what
    ///    follows. Idempotent on `(event_id, chat_id)`, so callers may
    ///    retry a failed or timed-out persist freely.
    /// 2. Announce via the bus. Best-effort: a failure here is returned
    ///    as [`RegistrationOutcome::AnnounceFailed`] (still `Ok`) and
    ///    never unwinds the persisted row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty username,
    /// [`GatewayError::UnknownEvent`] when the event does not exist,
    /// [`GatewayError::StoreUnavailable`] on store failure and
    /// [`GatewayError::DeadlineExceeded`] when the persist step outlives
    /// the deadline. An announce failure is not an error.
    pub async fn register_user(
        &self,
        event_id: EventId,
        chat_id: i64,
        username: &str,
    ) -> Result<RegistrationOutcome, GatewayError> {
        if username.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "username cannot be empty".to_string(),
            ));
        }

        tokio::time::timeout(
            self.deadline,
            self.store.insert_registration(event_id, chat_id, username),
        )
        .await
        .map_err(|_| GatewayError::DeadlineExceeded(RequestPhase::Persist))??;

        tracing::info!(%event_id, chat_id, username, "registration persisted");

        let envelope = AnnouncementEnvelope {
            chat_id,
            username: username.to_string(),
            event_id,
        };

        Ok(self.announce(&envelope).await)
    }

    /// Publishes the envelope, folding every failure mode into the soft
    /// [`RegistrationOutcome::AnnounceFailed`] result. The registration
    /// is already durable at this point; failures are logged, never
    /// swallowed silently.
    async fn announce(&self, envelope: &AnnouncementEnvelope) -> RegistrationOutcome {
        let payload = match serde_json::to_vec(envelope) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    event_id = %envelope.event_id,
                    chat_id = envelope.chat_id,
                    error = %e,
                    "failed to encode announcement; registration is persisted"
                );
                return RegistrationOutcome::AnnounceFailed(AnnounceFailure::Encode(e.to_string()));
            }
        };

        match tokio::time::timeout(self.deadline, self.bus.publish(&self.topic, &payload)).await {
            Ok(Ok(())) => {
                tracing::info!(
                    event_id = %envelope.event_id,
                    chat_id = envelope.chat_id,
                    topic = %self.topic,
                    "registration announced"
                );
                RegistrationOutcome::Registered
            }
            Ok(Err(e)) => {
                tracing::error!(
                    event_id = %envelope.event_id,
                    chat_id = envelope.chat_id,
                    topic = %self.topic,
                    error = %e,
                    "failed to announce registration; registration is persisted"
                );
                RegistrationOutcome::AnnounceFailed(AnnounceFailure::Unavailable(e.to_string()))
            }
            Err(_) => {
                tracing::error!(
                    event_id = %envelope.event_id,
                    chat_id = envelope.chat_id,
                    topic = %self.topic,
                    "announcement deadline expired; registration is persisted"
                );
                RegistrationOutcome::AnnounceFailed(AnnounceFailure::DeadlineExceeded)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use tokio_test::assert_ok;

    use super::*;
    use crate::bus::BusError;
    use crate::domain::{REGISTER_USER_TOPIC, Registration};
    use crate::persistence::StoreError;

    const DEADLINE: Duration = Duration::from_millis(50);

    fn event_id(n: u128) -> EventId {
        EventId::from_uuid(uuid::Uuid::from_u128(n))
    }

    fn sample_event(n: u128) -> Event {
        Event {
            id: event_id(n),
            title: format!("event-{n}"),
            description: "a test event".to_string(),
            starts_at: Utc::now(),
        }
    }

    /// In-memory store mimicking the production semantics: idempotent
    /// insert on `(event_id, chat_id)` and a foreign-key check against
    /// the known events.
    #[derive(Clone)]
    struct MemoryStore {
        events: Arc<Vec<Event>>,
        registrations: Arc<Mutex<Vec<Registration>>>,
        available: bool,
    }

    impl MemoryStore {
        fn with_events(events: Vec<Event>) -> Self {
            Self {
                events: Arc::new(events),
                registrations: Arc::new(Mutex::new(Vec::new())),
                available: true,
            }
        }

        fn unavailable() -> Self {
            Self {
                events: Arc::new(Vec::new()),
                registrations: Arc::new(Mutex::new(Vec::new())),
                available: false,
            }
        }

        fn rows(&self) -> Vec<Registration> {
            let Ok(rows) = self.registrations.lock() else {
                panic!("poisoned lock");
            };
            rows.clone()
        }
    }

    impl EventStore for MemoryStore {
        async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
            if !self.available {
                return Err(StoreError::Unavailable("store down".to_string()));
            }
            Ok(self.events.as_ref().clone())
        }

        async fn get_event(&self, event_id: EventId) -> Result<Event, StoreError> {
            if !self.available {
                return Err(StoreError::Unavailable("store down".to_string()));
            }
            self.events
                .iter()
                .find(|e| e.id == event_id)
                .cloned()
                .ok_or(StoreError::NotFound(event_id))
        }

        async fn insert_registration(
            &self,
            event_id: EventId,
            chat_id: i64,
            username: &str,
        ) -> Result<(), StoreError> {
            if !self.available {
                return Err(StoreError::Unavailable("store down".to_string()));
            }
            if !self.events.iter().any(|e| e.id == event_id) {
                return Err(StoreError::UnknownEvent(event_id));
            }
            let Ok(mut rows) = self.registrations.lock() else {
                panic!("poisoned lock");
            };
            if !rows
                .iter()
                .any(|r| r.event_id == event_id && r.chat_id == chat_id)
            {
                rows.push(Registration::new(event_id, chat_id, username));
            }
            Ok(())
        }
    }

    /// A store whose calls never complete, for deadline tests.
    struct HangingStore;

    impl EventStore for HangingStore {
        async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
            std::future::pending().await
        }

        async fn get_event(&self, _event_id: EventId) -> Result<Event, StoreError> {
            std::future::pending().await
        }

        async fn insert_registration(
            &self,
            _event_id: EventId,
            _chat_id: i64,
            _username: &str,
        ) -> Result<(), StoreError> {
            std::future::pending().await
        }
    }

    /// Records every publish for assertions.
    #[derive(Clone, Default)]
    struct RecordingBus {
        published: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    }

    impl RecordingBus {
        fn messages(&self) -> Vec<(String, Vec<u8>)> {
            let Ok(messages) = self.published.lock() else {
                panic!("poisoned lock");
            };
            messages.clone()
        }
    }

    impl AnnouncementBus for RecordingBus {
        async fn ensure_topics(&self, _topics: &[String]) -> Result<(), BusError> {
            Ok(())
        }

        async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), BusError> {
            let Ok(mut messages) = self.published.lock() else {
                panic!("poisoned lock");
            };
            messages.push((topic.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    /// Rejects every publish, as an unreachable broker would.
    struct DownBus;

    impl AnnouncementBus for DownBus {
        async fn ensure_topics(&self, _topics: &[String]) -> Result<(), BusError> {
            Err(BusError::Unavailable("broker down".to_string()))
        }

        async fn publish(&self, _topic: &str, _payload: &[u8]) -> Result<(), BusError> {
            Err(BusError::Unavailable("broker down".to_string()))
        }
    }

    /// A bus whose publish never completes, for deadline tests.
    struct HangingBus;

    impl AnnouncementBus for HangingBus {
        async fn ensure_topics(&self, _topics: &[String]) -> Result<(), BusError> {
            Ok(())
        }

        async fn publish(&self, _topic: &str, _payload: &[u8]) -> Result<(), BusError> {
            std::future::pending().await
        }
    }

    fn make_service<S: EventStore, B: AnnouncementBus>(
        store: S,
        bus: B,
    ) -> RegistrationService<S, B> {
        RegistrationService::new(store, bus, REGISTER_USER_TOPIC.to_string(), DEADLINE)
    }

    #[tokio::test]
    async fn register_persists_and_announces() {
        let store = MemoryStore::with_events(vec![sample_event(1)]);
        let bus = RecordingBus::default();
        let service = make_service(store.clone(), bus.clone());

        let outcome = service.register_user(event_id(1), 42, "ana").await;
        assert_eq!(outcome, Ok(RegistrationOutcome::Registered));

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        let Some(row) = rows.first() else {
            panic!("expected one registration");
        };
        assert_eq!(row.event_id, event_id(1));
        assert_eq!(row.chat_id, 42);

        let messages = bus.messages();
        let Some((topic, payload)) = messages.first() else {
            panic!("expected one announcement");
        };
        assert_eq!(topic, REGISTER_USER_TOPIC);
        let decoded: Result<AnnouncementEnvelope, _> = serde_json::from_slice(payload);
        let Ok(decoded) = decoded else {
            panic!("invalid envelope payload");
        };
        assert_eq!(
            decoded,
            AnnouncementEnvelope {
                chat_id: 42,
                username: "ana".to_string(),
                event_id: event_id(1),
            }
        );
    }

    #[tokio::test]
    async fn duplicate_registration_is_idempotent_success() {
        let store = MemoryStore::with_events(vec![sample_event(1)]);
        let bus = RecordingBus::default();
        let service = make_service(store.clone(), bus);

        let first = service.register_user(event_id(1), 42, "ana").await;
        let second = service.register_user(event_id(1), 42, "ana").await;

        assert_eq!(first, Ok(RegistrationOutcome::Registered));
        assert_eq!(second, Ok(RegistrationOutcome::Registered));
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn bus_down_still_persists_and_reports_soft_failure() {
        let store = MemoryStore::with_events(vec![sample_event(1)]);
        let service = make_service(store.clone(), DownBus);

        let outcome = service.register_user(event_id(1), 7, "bo").await;
        let Ok(RegistrationOutcome::AnnounceFailed(cause)) = outcome else {
            panic!("expected a soft announce failure");
        };
        assert!(matches!(cause, AnnounceFailure::Unavailable(_)));

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        let Some(row) = rows.first() else {
            panic!("expected one registration");
        };
        assert_eq!(row.chat_id, 7);
    }

    #[tokio::test]
    async fn persist_failure_is_hard_and_skips_announce() {
        let bus = RecordingBus::default();
        let service = make_service(MemoryStore::unavailable(), bus.clone());

        let outcome = service.register_user(event_id(1), 42, "ana").await;
        assert!(matches!(outcome, Err(GatewayError::StoreUnavailable(_))));
        assert!(bus.messages().is_empty());
    }

    #[tokio::test]
    async fn unknown_event_is_constraint_violation() {
        let store = MemoryStore::with_events(vec![sample_event(1)]);
        let service = make_service(store.clone(), RecordingBus::default());

        let outcome = service.register_user(event_id(99), 42, "ana").await;
        assert!(matches!(outcome, Err(GatewayError::UnknownEvent(_))));
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn empty_username_is_rejected() {
        let service = make_service(
            MemoryStore::with_events(vec![sample_event(1)]),
            RecordingBus::default(),
        );

        let outcome = service.register_user(event_id(1), 42, "  ").await;
        assert!(matches!(outcome, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn persist_deadline_is_a_hard_failure() {
        let service = make_service(HangingStore, RecordingBus::default());

        let outcome = service.register_user(event_id(1), 42, "ana").await;
        assert!(matches!(
            outcome,
            Err(GatewayError::DeadlineExceeded(RequestPhase::Persist))
        ));
    }

    #[tokio::test]
    async fn announce_deadline_is_a_soft_failure() {
        let store = MemoryStore::with_events(vec![sample_event(1)]);
        let service = make_service(store.clone(), HangingBus);

        let outcome = service.register_user(event_id(1), 42, "ana").await;
        assert_eq!(
            outcome,
            Ok(RegistrationOutcome::AnnounceFailed(
                AnnounceFailure::DeadlineExceeded
            ))
        );
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn list_events_passes_through() {
        let events = vec![sample_event(1), sample_event(2)];
        let service = make_service(
            MemoryStore::with_events(events.clone()),
            RecordingBus::default(),
        );

        let listed = service.list_events().await;
        assert_eq!(listed, Ok(events));
    }

    #[tokio::test]
    async fn empty_store_lists_no_events() {
        let service = make_service(MemoryStore::with_events(Vec::new()), RecordingBus::default());
        let listed = assert_ok!(service.list_events().await);
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn get_event_matches_list_entry() {
        let events = vec![sample_event(1), sample_event(2)];
        let service = make_service(
            MemoryStore::with_events(events.clone()),
            RecordingBus::default(),
        );

        let listed = assert_ok!(service.list_events().await);
        for expected in &listed {
            let got = service.get_event(expected.id).await;
            assert_eq!(got.as_ref(), Ok(expected));
        }
    }

    #[tokio::test]
    async fn get_unknown_event_is_not_found() {
        let service = make_service(
            MemoryStore::with_events(vec![sample_event(1)]),
            RecordingBus::default(),
        );

        let outcome = service.get_event(event_id(99)).await;
        assert!(matches!(outcome, Err(GatewayError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn read_deadline_is_reported_as_read_phase() {
        let service = make_service(HangingStore, RecordingBus::default());
        let outcome = service.list_events().await;
        assert!(matches!(
            outcome,
            Err(GatewayError::DeadlineExceeded(RequestPhase::Read))
        ));
    }

    #[test]
    fn outcome_reports_announced_flag() {
        assert!(RegistrationOutcome::Registered.announced());
        assert!(
            !RegistrationOutcome::AnnounceFailed(AnnounceFailure::DeadlineExceeded).announced()
        );
    }
}
