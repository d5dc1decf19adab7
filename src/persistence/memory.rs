//! In-memory poll storage.
//!
//! [`InMemoryPollRepository`] keeps every poll in a `BTreeMap` behind a
//! single [`tokio::sync::RwLock`]. Queries hold the read lock and mutations
//! the write lock for the whole call, so each call is atomic and concurrent
//! readers never observe a half-applied save.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PollRepository, Saved};
use crate::domain::{Poll, PollId};
use crate::error::ApiError;

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<PollId, Poll>,
}

impl Table {
    fn allocate_id(&mut self) -> PollId {
        let id = PollId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}

/// Process-local poll store with a sequence starting at 1.
#[derive(Debug)]
pub struct InMemoryPollRepository {
    table: RwLock<Table>,
}

impl InMemoryPollRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Returns the number of stored polls.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Returns `true` if no polls are stored.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

impl Default for InMemoryPollRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PollRepository for InMemoryPollRepository {
    async fn save(&self, mut poll: Poll) -> Result<Saved, ApiError> {
        let mut table = self.table.write().await;
        if let Some(id) = poll.id
            && let Some(row) = table.rows.get_mut(&id)
        {
            *row = poll.clone();
            return Ok(Saved::Updated(poll));
        }
        let id = table.allocate_id();
        poll.id = Some(id);
        table.rows.insert(id, poll.clone());
        Ok(Saved::Created(poll))
    }

    async fn find_all(&self) -> Result<Vec<Poll>, ApiError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: PollId) -> Result<Option<Poll>, ApiError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: PollId) -> Result<bool, ApiError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
