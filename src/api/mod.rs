//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api/v1`. This layer is a stateless
//! translation boundary: it decodes requests, calls the registration
//! service, and encodes results. No business rules live here.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// OpenAPI document for the gateway.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "event-gateway",
        description = "Event listing and user registration with durable storage and Kafka announcements"
    ),
    paths(
        handlers::event::list_events,
        handlers::event::get_event,
        handlers::registration::register_user,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::EventDto,
        dto::EventListResponse,
        dto::RegisterUserRequest,
        dto::RegisterUserResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Events", description = "Event read operations"),
        (name = "Registrations", description = "Registration write path"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
