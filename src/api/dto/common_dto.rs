//! Shared DTO types used across list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::page::DEFAULT_PAGE_SIZE;
use crate::domain::{PageRequest, SortOrder};
use crate::error::ApiError;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (0-indexed). Defaults to 0.
    #[serde(default)]
    pub page: u32,
    /// Items per page (max 2000). Defaults to 20, as does `0`.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Sort clauses, `property[,asc|desc]`, e.g. `sort=name,desc&sort=id`.
    /// Repeat the parameter to break ties.
    #[serde(default)]
    pub sort: Vec<String>,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

impl PaginationParams {
    /// Converts the raw query into a [`PageRequest`], clamping the size.
    /// Blank sort clauses are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if any `sort` clause names an
    /// unknown property or direction.
    pub fn to_page_request(&self) -> Result<PageRequest, ApiError> {
        let sort = self
            .sort
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<SortOrder>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageRequest::new(self.page, self.size, sort))
    }
}
