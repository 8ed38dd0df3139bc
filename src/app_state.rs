//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::bus::KafkaAnnouncementBus;
use crate::persistence::PostgresEventStore;
use crate::service::RegistrationService;

/// The registration service over the production store and bus.
pub type GatewayService = RegistrationService<PostgresEventStore, KafkaAnnouncementBus>;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registration service for all business logic.
    pub registration_service: Arc<GatewayService>,
}
