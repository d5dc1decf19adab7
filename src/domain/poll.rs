//! The `Poll` entity.

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;

use super::PollId;

/// A named set of options with an expiration date.
///
/// `id` is `None` until the poll has been saved once. The data fields are
/// free-form and nullable; nothing is validated.
///
/// # Equality
///
/// Two polls are equal when both carry the same identifier, whatever their
/// other fields hold. A poll without an identifier is equal only to itself.
#[derive(Debug, Clone, Default)]
pub struct Poll {
    /// Store-assigned identifier.
    pub id: Option<PollId>,
    /// Display name.
    pub name: Option<String>,
    /// Serialized set of choices.
    pub options: Option<String>,
    /// Last day the poll is open.
    pub expiration: Option<NaiveDate>,
}

impl Poll {
    /// Creates a transient (unsaved) poll.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        options: impl Into<String>,
        expiration: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            options: Some(options.into()),
            expiration: Some(expiration),
        }
    }

    /// Returns the poll with `id` set.
    #[must_use]
    pub fn with_id(mut self, id: PollId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns `true` if the poll has never been saved.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.id.is_none()
    }
}

impl PartialEq for Poll {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Poll {}

impl Hash for Poll {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
