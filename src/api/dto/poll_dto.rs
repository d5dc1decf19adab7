//! Poll DTO shared by request and response bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Poll, PollId};

/// JSON representation of a poll.
///
/// ```json
/// { "id": 1, "name": "Lunch", "options": "pizza,sushi", "expiration": "2024-05-17" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PollDto {
    /// Store identifier. Must be absent on create.
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub id: Option<PollId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Serialized set of choices.
    #[serde(default)]
    pub options: Option<String>,
    /// Last day the poll is open (ISO `YYYY-MM-DD`).
    #[serde(default)]
    pub expiration: Option<NaiveDate>,
}

impl From<Poll> for PollDto {
    fn from(poll: Poll) -> Self {
        Self {
            id: poll.id,
            name: poll.name,
            options: poll.options,
            expiration: poll.expiration,
        }
    }
}

impl From<PollDto> for Poll {
    fn from(dto: PollDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            options: dto.options,
            expiration: dto.expiration,
        }
    }
}
