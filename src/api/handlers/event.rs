//! Event read handlers: list and get.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{EventDto, EventListResponse};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /events` — List all events.
///
/// # Errors
///
/// Returns [`GatewayError`] when the store is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns every known event, oldest start time first. An empty list is a normal response, not an error.",
    responses(
        (status = 200, description = "Event list", body = EventListResponse),
        (status = 500, description = "Store unreachable", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let events = state.registration_service.list_events().await?;
    let events = events.into_iter().map(EventDto::from).collect();
    Ok(Json(EventListResponse { events }))
}

/// `GET /events/:id` — Get a single event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event details",
    description = "Returns the event with the given id.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event details", body = EventDto),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state
        .registration_service
        .get_event(EventId::from_uuid(id))
        .await?;
    Ok(Json(EventDto::from(event)))
}

/// Event read routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
}
