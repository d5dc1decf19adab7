//! Poll service: delegates every operation to the repository.

use std::sync::Arc;

use crate::domain::{Page, PageRequest, Poll, PollId};
use crate::error::ApiError;
use crate::persistence::{PollRepository, Saved};

/// Façade over a [`PollRepository`].
///
/// Applies no business rules. Each method is exactly one repository call,
/// so each method is one unit of work on the store.
#[derive(Debug, Clone)]
pub struct PollService {
    repository: Arc<dyn PollRepository>,
}

impl PollService {
    /// Creates a new `PollService`.
    #[must_use]
    pub fn new(repository: Arc<dyn PollRepository>) -> Self {
        Self { repository }
    }

    /// Returns a reference to the inner repository.
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn PollRepository> {
        &self.repository
    }

    /// Saves a poll, inserting it if it has no identifier (or an identifier
    /// that matches no row) and replacing the stored row otherwise.
    ///
    /// # Errors
    ///
    /// Propagates repository failures unchanged.
    pub async fn save(&self, poll: Poll) -> Result<Saved, ApiError> {
        tracing::debug!(?poll, "request to save poll");
        let saved = self.repository.save(poll).await?;
        if let Some(id) = saved.poll().id {
            tracing::info!(%id, created = saved.is_created(), "poll saved");
        }
        Ok(saved)
    }

    /// Returns every stored poll.
    ///
    /// # Errors
    ///
    /// Propagates repository failures unchanged.
    pub async fn find_all(&self) -> Result<Vec<Poll>, ApiError> {
        tracing::debug!("request to get all polls");
        self.repository.find_all().await
    }

    /// Returns one page of polls, sorted as requested.
    ///
    /// # Errors
    ///
    /// Propagates repository failures unchanged.
    pub async fn find_page(&self, request: &PageRequest) -> Result<Page<Poll>, ApiError> {
        let mut all = self.find_all().await?;
        if !request.sort().is_empty() {
            all.sort_by(|a, b| request.compare(a, b));
        }
        Ok(Page::slice(all, request))
    }

    /// Returns the poll stored under `id`, if any.
    ///
    /// # Errors
    ///
    /// Propagates repository failures unchanged.
    pub async fn find_one(&self, id: PollId) -> Result<Option<Poll>, ApiError> {
        tracing::debug!(%id, "request to get poll");
        self.repository.find_by_id(id).await
    }

    /// Deletes the poll stored under `id`. Deleting an absent poll is a
    /// no-op; the return value tells whether anything was removed.
    ///
    /// # Errors
    ///
    /// Propagates repository failures unchanged.
    pub async fn delete(&self, id: PollId) -> Result<bool, ApiError> {
        tracing::debug!(%id, "request to delete poll");
        let removed = self.repository.delete_by_id(id).await?;
        if removed {
            tracing::info!(%id, "poll deleted");
        }
        Ok(removed)
    }
}
