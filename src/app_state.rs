//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::PollRepository;
use crate::service::PollService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Poll service for all resource operations.
    pub poll_service: Arc<PollService>,
}

impl AppState {
    /// Wires a service over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn PollRepository>) -> Self {
        Self {
            poll_service: Arc::new(PollService::new(repository)),
        }
    }
}
