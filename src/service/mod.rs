//! Service layer: registration coordination.
//!
//! [`RegistrationService`] orchestrates the read paths and the
//! persist-then-announce write path over the store and bus capabilities.

pub mod registration_service;

pub use registration_service::{AnnounceFailure, RegistrationOutcome, RegistrationService};
