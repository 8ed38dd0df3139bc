//! Registration write handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{RegisterUserRequest, RegisterUserResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /registrations` — Register a user for an event.
///
/// Idempotent on `(event_id, chat_id)`: repeating a request returns
/// success without creating a second registration. A persist failure is
/// a hard error; an announce failure still returns 200 with
/// `announced: false` and a warning, because the registration itself is
/// durable at that point.
///
/// # Errors
///
/// Returns [`GatewayError`] when the registration could not be
/// persisted.
#[utoipa::path(
    post,
    path = "/api/v1/registrations",
    tag = "Registrations",
    summary = "Register a user for an event",
    description = "Durably records the registration, then announces it to downstream consumers. The announce step is best-effort: its failure is reported in the response body, not as an HTTP error.",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Registration stored (announcement status in body)", body = RegisterUserResponse),
        (status = 422, description = "Event does not exist", body = ErrorResponse),
        (status = 500, description = "Store unreachable", body = ErrorResponse),
        (status = 504, description = "Deadline exceeded while persisting", body = ErrorResponse),
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let outcome = state
        .registration_service
        .register_user(req.event_id, req.chat_id, &req.username)
        .await?;
    Ok(Json(RegisterUserResponse::from(outcome)))
}

/// Registration routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/registrations", post(register_user))
}
