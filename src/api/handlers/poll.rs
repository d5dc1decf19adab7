//! Poll CRUD handlers: create, update, list, get, delete.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::{Query, QueryRejection};

use crate::api::dto::{PaginationParams, PollDto};
use crate::api::headers;
use crate::app_state::AppState;
use crate::domain::{Poll, PollId};
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::Saved;

/// Collection path of the poll resource.
pub const POLLS_PATH: &str = "/api/polls";

const ENTITY_NAME: &str = "poll";

/// Turns a save outcome into `201 Created` (with `Location`) or `200 OK`.
fn saved_response(saved: Saved) -> Result<Response, ApiError> {
    let created = saved.is_created();
    let poll = saved.into_poll();
    let id = poll
        .id
        .ok_or_else(|| ApiError::Internal("saved poll has no id".to_string()))?;
    let param = id.to_string();
    let body = Json(PollDto::from(poll));

    if created {
        let location = format!("{POLLS_PATH}/{id}");
        let alert = headers::entity_creation_alert(ENTITY_NAME, &location, &param)?;
        Ok((StatusCode::CREATED, alert, body).into_response())
    } else {
        let alert = headers::entity_update_alert(ENTITY_NAME, &param)?;
        Ok((StatusCode::OK, alert, body).into_response())
    }
}

/// `POST /api/polls` — Create a new poll.
///
/// # Errors
///
/// Returns [`ApiError::IdExists`] if the body carries an `id`, or
/// [`ApiError::InvalidRequest`] if the body is not a valid poll.
#[utoipa::path(
    post,
    path = "/api/polls",
    tag = "Polls",
    summary = "Create a poll",
    description = "Stores a new poll and assigns its identifier. The body must not carry an `id`.",
    request_body = PollDto,
    responses(
        (status = 201, description = "Poll created", body = PollDto),
        (status = 400, description = "Body already carries an id, or is malformed", body = ErrorResponse),
    )
)]
pub async fn create_poll(
    State(state): State<AppState>,
    payload: Result<Json<PollDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    if dto.id.is_some() {
        return Err(ApiError::IdExists {
            entity: ENTITY_NAME,
        });
    }
    let saved = state.poll_service.save(Poll::from(dto)).await?;
    saved_response(saved)
}

/// `PUT /api/polls` — Replace a poll, creating it if it does not exist.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] on a malformed body, or
/// [`ApiError`] on storage failure.
#[utoipa::path(
    put,
    path = "/api/polls",
    tag = "Polls",
    summary = "Update a poll",
    description = "Replaces every field of the poll named by `id`. A body without an `id`, or with an `id` that matches no poll, creates a new poll under a fresh identifier instead.",
    request_body = PollDto,
    responses(
        (status = 200, description = "Poll updated", body = PollDto),
        (status = 201, description = "Poll created", body = PollDto),
        (status = 400, description = "Malformed body", body = ErrorResponse),
    )
)]
pub async fn update_poll(
    State(state): State<AppState>,
    payload: Result<Json<PollDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    let saved = state.poll_service.save(Poll::from(dto)).await?;
    saved_response(saved)
}

/// `GET /api/polls` — List polls, one page at a time.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] on an unknown sort clause or a
/// malformed query string.
#[utoipa::path(
    get,
    path = "/api/polls",
    tag = "Polls",
    summary = "List polls",
    description = "Returns one page of polls as a JSON array. The total count is in `X-Total-Count` and neighbouring pages in `Link`.",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of polls", body = Vec<PollDto>),
        (status = 400, description = "Invalid paging or sort parameters", body = ErrorResponse),
    )
)]
pub async fn list_polls(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let request = params.to_page_request()?;
    let page = state.poll_service.find_page(&request).await?;
    let pagination = headers::pagination_headers(&page, POLLS_PATH)?;

    let data: Vec<PollDto> = page.content.into_iter().map(PollDto::from).collect();
    Ok((pagination, Json(data)))
}

/// `GET /api/polls/{id}` — Get one poll.
///
/// # Errors
///
/// Returns [`ApiError::PollNotFound`] if no poll has this id.
#[utoipa::path(
    get,
    path = "/api/polls/{id}",
    tag = "Polls",
    summary = "Get a poll",
    params(
        ("id" = i64, Path, description = "Poll identifier"),
    ),
    responses(
        (status = 200, description = "Poll", body = PollDto),
        (status = 400, description = "Identifier is not a number", body = ErrorResponse),
        (status = 404, description = "Poll not found", body = ErrorResponse),
    )
)]
pub async fn get_poll(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let id = PollId::new(id);
    let poll = state
        .poll_service
        .find_one(id)
        .await?
        .ok_or(ApiError::PollNotFound(id))?;
    Ok(Json(PollDto::from(poll)))
}

/// `DELETE /api/polls/{id}` — Delete a poll.
///
/// Succeeds whether or not the poll existed.
///
/// # Errors
///
/// Returns [`ApiError`] on storage failure.
#[utoipa::path(
    delete,
    path = "/api/polls/{id}",
    tag = "Polls",
    summary = "Delete a poll",
    params(
        ("id" = i64, Path, description = "Poll identifier"),
    ),
    responses(
        (status = 200, description = "Poll deleted, or was already absent"),
        (status = 400, description = "Identifier is not a number", body = ErrorResponse),
    )
)]
pub async fn delete_poll(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let id = PollId::new(id);
    state.poll_service.delete(id).await?;
    let alert = headers::entity_deletion_alert(ENTITY_NAME, &id.to_string())?;
    Ok((StatusCode::OK, alert))
}

/// Poll resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            POLLS_PATH,
            get(list_polls).post(create_poll).put(update_poll),
        )
        .route("/api/polls/{id}", get(get_poll).delete(delete_poll))
}
