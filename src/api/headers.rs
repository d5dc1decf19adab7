//! Response header helpers: entity alerts and pagination links.
//!
//! Clients display the `X-unchainedApp-alert` key as a notification and read
//! `X-Total-Count` / `Link` to drive their pagers.

use axum::http::header::{LINK, LOCATION};
use axum::http::{HeaderMap, HeaderValue};

use crate::domain::Page;
use crate::error::ApiError;

/// Application name used as the prefix of alert keys.
pub const APPLICATION_NAME: &str = "unchainedApp";

/// Header carrying the alert message key.
pub const ALERT_HEADER: &str = "x-unchainedapp-alert";

/// Header carrying the error message key.
pub const ERROR_HEADER: &str = "x-unchainedapp-error";

/// Header carrying the alert parameter (an entity id or name).
pub const PARAMS_HEADER: &str = "x-unchainedapp-params";

/// Header carrying the total element count of a paged listing.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::Internal(format!("invalid header value {value:?}: {e}")))
}

fn alert(entity: &str, action: &str, param: &str) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();
    map.insert(
        ALERT_HEADER,
        header_value(&format!("{APPLICATION_NAME}.{entity}.{action}"))?,
    );
    map.insert(PARAMS_HEADER, header_value(param)?);
    Ok(map)
}

/// Alert headers for a newly created entity, plus its `Location`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if a value is not a valid header.
pub fn entity_creation_alert(
    entity: &str,
    location: &str,
    param: &str,
) -> Result<HeaderMap, ApiError> {
    let mut map = alert(entity, "created", param)?;
    map.insert(LOCATION, header_value(location)?);
    Ok(map)
}

/// Alert headers for an updated entity.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if a value is not a valid header.
pub fn entity_update_alert(entity: &str, param: &str) -> Result<HeaderMap, ApiError> {
    alert(entity, "updated", param)
}

/// Alert headers for a deleted entity.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if a value is not a valid header.
pub fn entity_deletion_alert(entity: &str, param: &str) -> Result<HeaderMap, ApiError> {
    alert(entity, "deleted", param)
}

fn page_uri(base_url: &str, page: u64, size: u32) -> String {
    format!("{base_url}?page={page}&size={size}")
}

/// Builds the `Link` header value for `page`: `next` and `prev` when they
/// exist, then `last` and `first`.
#[must_use]
pub fn link_header<T>(page: &Page<T>, base_url: &str) -> String {
    let number = u64::from(page.number);
    let total_pages = page.total_pages();
    let mut links = Vec::with_capacity(4);

    if number.saturating_add(1) < total_pages {
        links.push(format!(
            "<{}>; rel=\"next\"",
            page_uri(base_url, number.saturating_add(1), page.size)
        ));
    }
    if number > 0 {
        links.push(format!(
            "<{}>; rel=\"prev\"",
            page_uri(base_url, number.saturating_sub(1), page.size)
        ));
    }
    let last = total_pages.saturating_sub(1);
    links.push(format!(
        "<{}>; rel=\"last\"",
        page_uri(base_url, last, page.size)
    ));
    links.push(format!(
        "<{}>; rel=\"first\"",
        page_uri(base_url, 0, page.size)
    ));
    links.join(",")
}

/// `X-Total-Count` and `Link` headers for a paged listing.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if a value is not a valid header.
pub fn pagination_headers<T>(page: &Page<T>, base_url: &str) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();
    map.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total_elements));
    map.insert(LINK, header_value(&link_header(page, base_url))?);
    Ok(map)
}
