//! End-to-end tests for the poll REST resource.
//!
//! Each test starts the real router on an ephemeral port, backed by the
//! in-memory store, and drives it over HTTP with `reqwest`.

#![allow(clippy::panic)]

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, LINK, LOCATION};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use unchained::api;
use unchained::api::dto::PollDto;
use unchained::app_state::AppState;
use unchained::domain::{Poll, PollId};
use unchained::persistence::InMemoryPollRepository;
use unchained::service::PollService;

const DEFAULT_NAME: &str = "AAAAAAAAAA";
const UPDATED_NAME: &str = "BBBBBBBBBB";
const DEFAULT_OPTIONS: &str = "AAAAAAAAAA";
const UPDATED_OPTIONS: &str = "BBBBBBBBBB";

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    service: Arc<PollService>,
}

impl TestApp {
    async fn spawn() -> Self {
        let state = AppState::new(Arc::new(InMemoryPollRepository::new()));
        let service = Arc::clone(&state.poll_service);
        let app = api::build_router().with_state(state);

        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind ephemeral port");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("listener has an address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            service,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn count(&self) -> usize {
        let Ok(all) = self.service.find_all().await else {
            panic!("store is readable");
        };
        all.len()
    }

    async fn stored(&self) -> Poll {
        let Ok(all) = self.service.find_all().await else {
            panic!("store is readable");
        };
        let Some(last) = all.into_iter().last() else {
            panic!("store is empty");
        };
        last
    }

    async fn insert(&self, poll: Poll) -> PollId {
        let Ok(saved) = self.service.save(poll).await else {
            panic!("insert succeeds");
        };
        let Some(id) = saved.into_poll().id else {
            panic!("saved poll has an id");
        };
        id
    }
}

fn default_expiration() -> NaiveDate {
    NaiveDate::default()
}

fn updated_expiration() -> NaiveDate {
    Local::now().date_naive()
}

fn default_poll() -> Poll {
    Poll::new(DEFAULT_NAME, DEFAULT_OPTIONS, default_expiration())
}

fn default_body() -> Value {
    json!({
        "name": DEFAULT_NAME,
        "options": DEFAULT_OPTIONS,
        "expiration": "1970-01-01",
    })
}

async fn send(request: reqwest::RequestBuilder) -> reqwest::Response {
    let Ok(response) = request.send().await else {
        panic!("request reaches the server");
    };
    response
}

async fn body<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> T {
    let Ok(value) = response.json::<T>().await else {
        panic!("response body is valid JSON");
    };
    value
}

/// Asserts a `400` carrying the JSON error body for an unreadable request.
async fn assert_invalid_request(response: reqwest::Response) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, CONTENT_TYPE.as_str()), "application/json");
    let error: Value = body(response).await;
    assert_eq!(error["error"]["code"], 1002);
    assert!(error["error"]["message"].is_string());
}

fn header<'a>(response: &'a reqwest::Response, name: &str) -> &'a str {
    let Some(value) = response.headers().get(name) else {
        panic!("missing header {name}");
    };
    let Ok(value) = value.to_str() else {
        panic!("header {name} is not ASCII");
    };
    value
}

#[tokio::test]
async fn create_poll() {
    let app = TestApp::spawn().await;
    let before = app.count().await;

    let response = send(app.client.post(app.url("/api/polls")).json(&default_body())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(header(&response, "x-unchainedapp-alert"), "unchainedApp.poll.created");
    let location = header(&response, LOCATION.as_str()).to_string();

    let created: PollDto = body(response).await;
    let Some(id) = created.id else {
        panic!("response carries the new id");
    };
    assert_eq!(location, format!("/api/polls/{id}"));

    assert_eq!(app.count().await, before + 1);
    let stored = app.stored().await;
    assert_eq!(stored.name.as_deref(), Some(DEFAULT_NAME));
    assert_eq!(stored.options.as_deref(), Some(DEFAULT_OPTIONS));
    assert_eq!(stored.expiration, Some(default_expiration()));
}

#[tokio::test]
async fn create_poll_with_existing_id() {
    let app = TestApp::spawn().await;
    let before = app.count().await;

    let mut payload = default_body();
    payload["id"] = json!(1);
    let response = send(app.client.post(app.url("/api/polls")).json(&payload)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, "x-unchainedapp-error"), "error.idexists");
    assert_eq!(header(&response, "x-unchainedapp-params"), "poll");
    let error: Value = body(response).await;
    assert_eq!(error["error"]["details"], "idexists");

    assert_eq!(app.count().await, before);
}

#[tokio::test]
async fn get_all_polls() {
    let app = TestApp::spawn().await;
    let id = app.insert(default_poll()).await;

    let response = send(app.client.get(app.url("/api/polls?sort=id,desc"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-total-count"), "1");

    let polls: Vec<PollDto> = body(response).await;
    let Some(found) = polls.iter().find(|p| p.id == Some(id)) else {
        panic!("listing contains the stored poll");
    };
    assert_eq!(found.name.as_deref(), Some(DEFAULT_NAME));
    assert_eq!(found.options.as_deref(), Some(DEFAULT_OPTIONS));
    assert_eq!(found.expiration, Some(default_expiration()));
}

#[tokio::test]
async fn get_all_polls_sorted_descending() {
    let app = TestApp::spawn().await;
    for _ in 0..3 {
        app.insert(default_poll()).await;
    }

    let response = send(app.client.get(app.url("/api/polls?sort=id,desc"))).await;
    let polls: Vec<PollDto> = body(response).await;
    let ids: Vec<i64> = polls.iter().filter_map(|p| p.id).map(PollId::get).collect();
    assert_eq!(ids, [3, 2, 1]);
}

#[tokio::test]
async fn get_all_polls_paginates() {
    let app = TestApp::spawn().await;
    for _ in 0..5 {
        app.insert(default_poll()).await;
    }

    let response = send(app.client.get(app.url("/api/polls?page=1&size=2"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-total-count"), "5");
    assert_eq!(
        header(&response, LINK.as_str()),
        "</api/polls?page=2&size=2>; rel=\"next\",\
         </api/polls?page=0&size=2>; rel=\"prev\",\
         </api/polls?page=2&size=2>; rel=\"last\",\
         </api/polls?page=0&size=2>; rel=\"first\""
    );

    let polls: Vec<PollDto> = body(response).await;
    let ids: Vec<i64> = polls.iter().filter_map(|p| p.id).map(PollId::get).collect();
    assert_eq!(ids, [3, 4]);
}

#[tokio::test]
async fn get_all_polls_rejects_unknown_sort() {
    let app = TestApp::spawn().await;
    let response = send(app.client.get(app.url("/api/polls?sort=votes,asc"))).await;
    assert_invalid_request(response).await;
}

#[tokio::test]
async fn get_all_polls_sorts_on_every_clause() {
    let app = TestApp::spawn().await;
    for name in ["b", "a", "b", "a"] {
        app.insert(Poll::new(name, DEFAULT_OPTIONS, default_expiration())).await;
    }

    let response = send(app.client.get(app.url("/api/polls?sort=name,desc&sort=id"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let polls: Vec<PollDto> = body(response).await;
    let ids: Vec<i64> = polls.iter().filter_map(|p| p.id).map(PollId::get).collect();
    assert_eq!(ids, [1, 3, 2, 4]);
}

#[tokio::test]
async fn get_all_polls_with_zero_size_uses_default_page() {
    let app = TestApp::spawn().await;
    for _ in 0..3 {
        app.insert(default_poll()).await;
    }

    let response = send(app.client.get(app.url("/api/polls?size=0"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, LINK.as_str()),
        "</api/polls?page=0&size=20>; rel=\"last\",</api/polls?page=0&size=20>; rel=\"first\""
    );
    let polls: Vec<PollDto> = body(response).await;
    assert_eq!(polls.len(), 3);
}

#[tokio::test]
async fn get_all_polls_rejects_negative_page() {
    let app = TestApp::spawn().await;
    let response = send(app.client.get(app.url("/api/polls?page=-1"))).await;
    assert_invalid_request(response).await;
}

#[tokio::test]
async fn create_poll_with_malformed_body() {
    let app = TestApp::spawn().await;
    let before = app.count().await;

    let response = send(
        app.client
            .post(app.url("/api/polls"))
            .header(CONTENT_TYPE, "application/json")
            .body("{\"name\": "),
    )
    .await;
    assert_invalid_request(response).await;
    assert_eq!(app.count().await, before);
}

#[tokio::test]
async fn create_poll_with_invalid_expiration() {
    let app = TestApp::spawn().await;
    let mut payload = default_body();
    payload["expiration"] = json!("2024-13-40");

    let response = send(app.client.post(app.url("/api/polls")).json(&payload)).await;
    assert_invalid_request(response).await;
}

#[tokio::test]
async fn update_poll_with_malformed_body() {
    let app = TestApp::spawn().await;
    let response = send(
        app.client
            .put(app.url("/api/polls"))
            .header(CONTENT_TYPE, "application/json")
            .body("not json"),
    )
    .await;
    assert_invalid_request(response).await;
}

#[tokio::test]
async fn get_poll_with_non_numeric_id() {
    let app = TestApp::spawn().await;
    let response = send(app.client.get(app.url("/api/polls/abc"))).await;
    assert_invalid_request(response).await;
}

#[tokio::test]
async fn delete_poll_with_non_numeric_id() {
    let app = TestApp::spawn().await;
    let response = send(app.client.delete(app.url("/api/polls/abc"))).await;
    assert_invalid_request(response).await;
}

#[tokio::test]
async fn get_poll() {
    let app = TestApp::spawn().await;
    let id = app.insert(default_poll()).await;

    let response = send(app.client.get(app.url(&format!("/api/polls/{id}")))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let poll: Value = body(response).await;
    assert_eq!(poll["id"], json!(id.get()));
    assert_eq!(poll["name"], DEFAULT_NAME);
    assert_eq!(poll["options"], DEFAULT_OPTIONS);
    assert_eq!(poll["expiration"], "1970-01-01");
}

#[tokio::test]
async fn get_non_existing_poll() {
    let app = TestApp::spawn().await;
    let response = send(app.client.get(app.url(&format!("/api/polls/{}", i64::MAX)))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_poll() {
    let app = TestApp::spawn().await;
    let id = app.insert(default_poll()).await;
    let before = app.count().await;

    let updated = PollDto {
        id: Some(id),
        name: Some(UPDATED_NAME.to_string()),
        options: Some(UPDATED_OPTIONS.to_string()),
        expiration: Some(updated_expiration()),
    };
    let response = send(app.client.put(app.url("/api/polls")).json(&updated)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-unchainedapp-alert"), "unchainedApp.poll.updated");
    assert_eq!(header(&response, "x-unchainedapp-params"), id.to_string());

    assert_eq!(app.count().await, before);
    let stored = app.stored().await;
    assert_eq!(stored.name.as_deref(), Some(UPDATED_NAME));
    assert_eq!(stored.options.as_deref(), Some(UPDATED_OPTIONS));
    assert_eq!(stored.expiration, Some(updated_expiration()));
}

#[tokio::test]
async fn update_non_existing_poll() {
    let app = TestApp::spawn().await;
    let before = app.count().await;

    // Without an id the poll is created instead of updated.
    let response = send(app.client.put(app.url("/api/polls")).json(&default_body())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(app.count().await, before + 1);
}

#[tokio::test]
async fn update_with_unknown_id_creates_under_fresh_id() {
    let app = TestApp::spawn().await;
    let before = app.count().await;

    let mut payload = default_body();
    payload["id"] = json!(777);
    let response = send(app.client.put(app.url("/api/polls")).json(&payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: PollDto = body(response).await;
    assert_ne!(created.id, Some(PollId::new(777)));
    assert_eq!(app.count().await, before + 1);
}

#[tokio::test]
async fn delete_poll() {
    let app = TestApp::spawn().await;
    let id = app.insert(default_poll()).await;
    let before = app.count().await;

    let response = send(app.client.delete(app.url(&format!("/api/polls/{id}")))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-unchainedapp-alert"), "unchainedApp.poll.deleted");

    assert_eq!(app.count().await, before - 1);
}

#[tokio::test]
async fn delete_non_existing_poll_still_succeeds() {
    let app = TestApp::spawn().await;
    app.insert(default_poll()).await;
    let before = app.count().await;

    let response = send(app.client.delete(app.url("/api/polls/4242"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.count().await, before);
}

#[tokio::test]
async fn health_reports_storage_backend() {
    let app = TestApp::spawn().await;
    let response = send(app.client.get(app.url("/health"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let health: Value = body(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["storage"], "memory");
}
