//! Persistence layer: the poll repository trait and its backends.
//!
//! [`PollRepository`] is the generic key-by-identifier store the service
//! delegates to. Each call is one atomic unit of work: read-only for
//! queries, read-write for mutations. Two backends are provided:
//!
//! - [`InMemoryPollRepository`]: `RwLock`-guarded map, used in development
//!   and by the test suite.
//! - [`PostgresPollRepository`]: `sqlx::PgPool`, one transaction per call.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Poll, PollId};
use crate::error::ApiError;

pub use memory::InMemoryPollRepository;
pub use postgres::PostgresPollRepository;

/// Outcome of [`PollRepository::save`].
#[derive(Debug, Clone)]
pub enum Saved {
    /// A new row was inserted and assigned an identifier.
    Created(Poll),
    /// An existing row was replaced.
    Updated(Poll),
}

impl Saved {
    /// Returns the persisted poll.
    #[must_use]
    pub fn into_poll(self) -> Poll {
        match self {
            Self::Created(poll) | Self::Updated(poll) => poll,
        }
    }

    /// Borrows the persisted poll.
    #[must_use]
    pub const fn poll(&self) -> &Poll {
        match self {
            Self::Created(poll) | Self::Updated(poll) => poll,
        }
    }

    /// Returns `true` if the save inserted a new row.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Generic storage for [`Poll`] entities.
#[async_trait]
pub trait PollRepository: Send + Sync + std::fmt::Debug {
    /// Inserts or replaces a poll.
    ///
    /// A poll without an identifier is inserted under a freshly allocated
    /// one. A poll whose identifier matches a stored row replaces all of
    /// that row's fields. A poll whose identifier matches nothing is
    /// inserted under a freshly allocated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] on storage failure.
    async fn save(&self, poll: Poll) -> Result<Saved, ApiError>;

    /// Returns every stored poll in ascending identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] on storage failure.
    async fn find_all(&self) -> Result<Vec<Poll>, ApiError>;

    /// Returns the poll stored under `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] on storage failure.
    async fn find_by_id(&self, id: PollId) -> Result<Option<Poll>, ApiError>;

    /// Removes the poll stored under `id`. Returns `true` if a row was
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] on storage failure.
    async fn delete_by_id(&self, id: PollId) -> Result<bool, ApiError>;

    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
