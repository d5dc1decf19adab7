//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::PollDto;
use super::handlers::{poll, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "unchained", description = "Poll management API"),
    paths(
        poll::create_poll,
        poll::update_poll,
        poll::list_polls,
        poll::get_poll,
        poll::delete_poll,
        system::health_handler,
    ),
    components(schemas(PollDto, ErrorResponse, ErrorBody, system::HealthResponse)),
    tags(
        (name = "Polls", description = "Poll CRUD"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;
