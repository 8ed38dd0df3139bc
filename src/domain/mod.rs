//! Domain layer: core types of the registration service.
//!
//! This module contains the data model shared by the store, the bus, and
//! the coordination layer: event identity, the read-only event record,
//! the durable registration record, and the announcement envelope
//! published after a successful registration.

pub mod announcement;
pub mod event;
pub mod event_id;
pub mod registration;

pub use announcement::{AnnouncementEnvelope, REGISTER_USER_TOPIC};
pub use event::Event;
pub use event_id::EventId;
pub use registration::Registration;
