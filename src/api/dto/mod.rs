//! Request/response DTOs for the REST API.

pub mod event_dto;
pub mod registration_dto;

pub use event_dto::{EventDto, EventListResponse};
pub use registration_dto::{RegisterUserRequest, RegisterUserResponse};
