//! Registration DTOs for the write endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::EventId;
use crate::service::RegistrationOutcome;

/// Request body for `POST /registrations`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    /// Event to register for.
    #[schema(value_type = uuid::Uuid)]
    pub event_id: EventId,
    /// Numeric chat/account identifier of the registrant.
    pub chat_id: i64,
    /// Display name of the registrant.
    pub username: String,
}

/// Response body for `POST /registrations`.
///
/// `registered` is authoritative: when `true` the registration row
/// exists regardless of `announced`. A `false` `announced` flag means
/// the downstream notification may not have been sent; retrying the
/// request would not duplicate the registration but may duplicate the
/// announcement.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterUserResponse {
    /// Whether the registration is durably stored.
    pub registered: bool,
    /// Whether the announcement reached the bus.
    pub announced: bool,
    /// Present when the announcement failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<RegistrationOutcome> for RegisterUserResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        match outcome {
            RegistrationOutcome::Registered => Self {
                registered: true,
                announced: true,
                warning: None,
            },
            RegistrationOutcome::AnnounceFailed(cause) => Self {
                registered: true,
                announced: false,
                warning: Some(format!(
                    "registration recorded but announcement failed: {cause}"
                )),
            },
        }
    }
}
