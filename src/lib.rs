//! # event-gateway
//!
//! REST API gateway for event registrations: lists events, records user
//! registrations durably in PostgreSQL, and announces each stored
//! registration to downstream consumers over a Kafka-compatible broker.
//!
//! The interesting part is the registration write path: a dual write
//! across two independent systems of record with no shared transaction.
//! The store write is authoritative and idempotent per
//! `(event_id, chat_id)`; the bus publish is best-effort, and its
//! failure is surfaced to the caller as a distinct soft result instead
//! of being collapsed into a generic error or silently dropped.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── RegistrationService (service/)
//!     │       │
//!     │       ├── 1. EventStore (persistence/)  ◄── source of truth
//!     │       └── 2. AnnouncementBus (bus/)     ◄── best-effort fan-out
//!     │
//!     └── PostgreSQL / Kafka
//! ```

pub mod api;
pub mod app_state;
pub mod bus;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
