//! Paging and sorting of poll listings.
//!
//! A [`PageRequest`] names a zero-based page, a page size and zero or more
//! [`SortOrder`] clauses, applied left to right. [`Page`] carries one slice of results together with the
//! total element count, which the HTTP layer turns into `X-Total-Count` and
//! `Link` headers.

use std::cmp::Ordering;
use std::str::FromStr;

use super::Poll;
use crate::error::ApiError;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// Poll attribute a listing can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortProperty {
    /// Store identifier.
    Id,
    /// Poll name.
    Name,
    /// Serialized options.
    Options,
    /// Expiration date.
    Expiration,
}

/// A single `property,direction` sort clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    /// Attribute to compare.
    pub property: SortProperty,
    /// Comparison direction.
    pub direction: Direction,
}

impl SortOrder {
    /// Compares two polls on this clause. Missing values sort first in
    /// ascending order.
    #[must_use]
    pub fn compare(&self, a: &Poll, b: &Poll) -> Ordering {
        let ordering = match self.property {
            SortProperty::Id => a.id.cmp(&b.id),
            SortProperty::Name => a.name.cmp(&b.name),
            SortProperty::Options => a.options.cmp(&b.options),
            SortProperty::Expiration => a.expiration.cmp(&b.expiration),
        };
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ApiError;

    /// Parses `property` or `property,asc|desc` (direction is
    /// case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let property = match parts.next().unwrap_or_default() {
            "id" => SortProperty::Id,
            "name" => SortProperty::Name,
            "options" => SortProperty::Options,
            "expiration" => SortProperty::Expiration,
            other => {
                return Err(ApiError::InvalidRequest(format!(
                    "unknown sort property: {other:?}"
                )));
            }
        };
        let direction = match parts.next() {
            None => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(d) => {
                return Err(ApiError::InvalidRequest(format!(
                    "unknown sort direction: {d:?}"
                )));
            }
        };
        if parts.next().is_some() {
            return Err(ApiError::InvalidRequest(format!("malformed sort: {s:?}")));
        }
        Ok(Self {
            property,
            direction,
        })
    }
}

/// Which slice of a listing to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Creates a request for zero-based `page`. A `size` of zero means
    /// [`DEFAULT_PAGE_SIZE`]; larger sizes are capped at [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn new(page: u32, size: u32, sort: Vec<SortOrder>) -> Self {
        let size = if size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            size.min(MAX_PAGE_SIZE)
        };
        Self { page, size, sort }
    }

    /// Zero-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Elements per page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Requested sort clauses, most significant first.
    #[must_use]
    pub fn sort(&self) -> &[SortOrder] {
        &self.sort
    }

    /// Compares two polls on every sort clause in turn; later clauses only
    /// break ties left by earlier ones.
    #[must_use]
    pub fn compare(&self, a: &Poll, b: &Poll) -> Ordering {
        self.sort
            .iter()
            .fold(Ordering::Equal, |ordering, order| {
                ordering.then_with(|| order.compare(a, b))
            })
    }

    /// Number of elements preceding this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, Vec::new())
    }
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Elements on this page.
    pub content: Vec<T>,
    /// Zero-based page number.
    pub number: u32,
    /// Requested page size.
    pub size: u32,
    /// Elements across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Cuts the page described by `request` out of an already ordered list.
    #[must_use]
    pub fn slice(all: Vec<T>, request: &PageRequest) -> Self {
        let total_elements = u64::try_from(all.len()).unwrap_or(u64::MAX);
        let content = all
            .into_iter()
            .skip(request.offset())
            .take(request.size() as usize)
            .collect();
        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
        }
    }

    /// Number of pages needed to hold every element.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }
}
