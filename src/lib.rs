//! # unchained
//!
//! REST API for managing polls.
//!
//! A poll is a named set of options with an expiration date. This crate
//! exposes create / read / update / delete endpoints for polls and stores
//! them either in process memory or in PostgreSQL.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PollService (service/)
//!     │
//!     ├── PollRepository (persistence/)
//!     │     ├── InMemoryPollRepository
//!     │     └── PostgresPollRepository
//!     │
//!     └── Poll, PollId, Page (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
