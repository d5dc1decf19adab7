//! Domain layer: the poll entity, its identifier, and listing pages.

pub mod page;
pub mod poll;
pub mod poll_id;

pub use page::{Page, PageRequest, SortOrder};
pub use poll::Poll;
pub use poll_id::PollId;
