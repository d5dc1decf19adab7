//! Service layer.
//!
//! [`PollService`] is the single entry point handlers use to reach the
//! [`crate::persistence::PollRepository`].

pub mod poll_service;

pub use poll_service::PollService;
