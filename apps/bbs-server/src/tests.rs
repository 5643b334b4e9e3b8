//! End-to-end tests of the gated API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::{App, http::header, middleware::DefaultHeaders, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use bbs_core::OriginGate;
use bbs_core::domain::PostRecord;
use bbs_core::error::RepoError;
use bbs_core::ports::{FixedClock, PostStore};
use bbs_infra::InMemoryPostStore;

use crate::handlers;
use crate::middleware::origin_gate::OriginGateMiddleware;
use crate::observability::RequestIdMiddleware;
use crate::observability::request_id::REQUEST_ID_HEADER;
use crate::state::AppState;

const SECRET: &str = "https://mysite.example/";

/// In-memory store that counts every call reaching it.
#[derive(Default)]
struct CountingStore {
    inner: InMemoryPostStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostStore for CountingStore {
    async fn put(&self, record: PostRecord) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.put(record).await
    }

    async fn query_latest(&self, limit: usize) -> Result<Vec<PostRecord>, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.query_latest(limit).await
    }
}

struct UnavailableStore;

#[async_trait]
impl PostStore for UnavailableStore {
    async fn put(&self, _record: PostRecord) -> Result<(), RepoError> {
        Err(RepoError::Query("ProvisionedThroughputExceededException".to_string()))
    }

    async fn query_latest(&self, _limit: usize) -> Result<Vec<PostRecord>, RepoError> {
        Err(RepoError::Connection("dispatch failure".to_string()))
    }
}

fn production_gate() -> OriginGate {
    OriginGate::new(Some(SECRET.to_string()), false).unwrap()
}

fn counting_state(millis: i64) -> (AppState, Arc<CountingStore>, Arc<FixedClock>) {
    let store = Arc::new(CountingStore::default());
    let clock = Arc::new(FixedClock::new(millis));
    let state = AppState::with_store(store.clone(), clock.clone());
    (state, store, clock)
}

macro_rules! gated_app {
    ($gate:expr, $state:expr) => {
        test::init_service(
            App::new()
                .wrap(OriginGateMiddleware::new($gate))
                .wrap(DefaultHeaders::new().add((header::CACHE_CONTROL, "no-store")))
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state))
                .configure(handlers::configure_routes),
        )
        .await
    };
}

fn list_request(referer: Option<&str>) -> test::TestRequest {
    let req = test::TestRequest::get().uri("/api/listPosts");
    match referer {
        Some(value) => req.insert_header((header::REFERER, value.to_string())),
        None => req,
    }
}

fn write_request(referer: Option<&str>, body: Value) -> test::TestRequest {
    let req = test::TestRequest::post()
        .uri("/api/writePost")
        .set_json(body);
    match referer {
        Some(value) => req.insert_header((header::REFERER, value.to_string())),
        None => req,
    }
}

#[actix_web::test]
async fn test_write_then_list_single_post() {
    let (state, store, _clock) = counting_state(1_000_000);
    let app = gated_app!(production_gate(), state);

    let resp = test::call_service(
        &app,
        write_request(Some(SECRET), json!({"newPost": "hello"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"result": "success"}));

    let stored = store.inner.query_latest(10).await.unwrap();
    assert_eq!(
        stored,
        vec![PostRecord {
            created_at: 1_000_000,
            content: Some("hello".to_string()),
            ttl: 173_800,
        }]
    );

    let resp = test::call_service(&app, list_request(Some(SECRET)).to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"posts": [{"post": "hello", "createdAt": 1_000_000}]})
    );
}

#[actix_web::test]
async fn test_list_returns_newest_hundred_of_hundred_and_one() {
    let (state, _store, clock) = counting_state(1_700_000_000_000);
    let app = gated_app!(production_gate(), state);

    for i in 0..101 {
        let resp = test::call_service(
            &app,
            write_request(Some(SECRET), json!({"newPost": format!("post {i}")})).to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        clock.advance(1);
    }

    let resp = test::call_service(&app, list_request(Some(SECRET)).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 100);
    assert_eq!(posts[0]["post"], "post 100");
    assert_eq!(posts[0]["createdAt"], 1_700_000_000_100_i64);
    assert_eq!(posts[99]["post"], "post 1");

    let stamps: Vec<i64> = posts
        .iter()
        .map(|p| p["createdAt"].as_i64().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] > w[1]));
    assert!(posts.iter().all(|p| p["post"] != "post 0"));
}

#[actix_web::test]
async fn test_foreign_referer_never_reaches_store() {
    let (state, store, _clock) = counting_state(0);
    let app = gated_app!(production_gate(), state);

    let resp = test::call_service(&app, list_request(Some("evil.example.com")).to_request()).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Forbidden");
    assert_eq!(body["instance"], "/api/listPosts");

    let resp = test::call_service(
        &app,
        write_request(Some("evil.example.com"), json!({"newPost": "spam"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);

    let resp = test::call_service(&app, write_request(None, json!({"newPost": "spam"})).to_request()).await;
    assert_eq!(resp.status(), 403);

    assert_eq!(store.calls(), 0);
}

#[actix_web::test]
async fn test_gate_covers_every_path() {
    let (state, _store, _clock) = counting_state(0);
    let app = gated_app!(production_gate(), state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::get().uri("/no/such/route").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((header::REFERER, SECRET))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}

#[actix_web::test]
async fn test_development_mode_skips_gate() {
    let (state, store, _clock) = counting_state(0);
    let app = gated_app!(OriginGate::development(), state);

    let resp = test::call_service(&app, write_request(None, json!({"newPost": "dev"})).to_request()).await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, list_request(Some("evil.example.com")).to_request()).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(store.calls(), 2);
}

#[actix_web::test]
async fn test_absent_new_post_is_stored_and_listed() {
    let (state, _store, clock) = counting_state(2_000);
    let app = gated_app!(production_gate(), state);

    for body in [json!({}), json!({"newPost": null})] {
        let resp = test::call_service(&app, write_request(Some(SECRET), body).to_request()).await;
        assert_eq!(resp.status(), 200);
        clock.advance(1);
    }

    let resp = test::call_service(&app, list_request(Some(SECRET)).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"posts": [{"createdAt": 2_001}, {"createdAt": 2_000}]})
    );
}

#[actix_web::test]
async fn test_malformed_body_is_rejected_before_storage() {
    let (state, store, _clock) = counting_state(0);
    let app = gated_app!(production_gate(), state);

    let resp = test::call_service(
        &app,
        write_request(Some(SECRET), json!({"newPost": 42})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");

    let req = test::TestRequest::post()
        .uri("/api/writePost")
        .insert_header((header::REFERER, SECRET))
        .set_payload("not json")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    // An empty body is not an object either.
    let req = test::TestRequest::post()
        .uri("/api/writePost")
        .insert_header((header::REFERER, SECRET))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");

    assert_eq!(store.calls(), 0);
}

#[actix_web::test]
async fn test_storage_failure_is_internal_error() {
    let state = AppState::with_store(Arc::new(UnavailableStore), Arc::new(FixedClock::new(0)));
    let app = gated_app!(production_gate(), state);

    let resp = test::call_service(
        &app,
        write_request(Some(SECRET), json!({"newPost": "x"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Internal Server Error");
    assert!(body.get("detail").is_none());

    let resp = test::call_service(&app, list_request(Some(SECRET)).to_request()).await;
    assert_eq!(resp.status(), 500);
}

#[actix_web::test]
async fn test_responses_are_uncacheable_and_tagged() {
    let (state, _store, _clock) = counting_state(0);
    let app = gated_app!(production_gate(), state);

    for referer in [Some(SECRET), None] {
        let resp = test::call_service(&app, list_request(referer).to_request()).await;
        assert_eq!(
            resp.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    }

    let resp = test::call_service(
        &app,
        list_request(None)
            .insert_header((REQUEST_ID_HEADER, "trace-1"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["request_id"], "trace-1");
}

#[actix_web::test]
async fn test_in_memory_state_exposes_store_for_sweeping() {
    let state = AppState::in_memory(Arc::new(FixedClock::new(0)));
    let store = state.memory_store.clone().unwrap();
    let app = gated_app!(production_gate(), state);

    let resp = test::call_service(
        &app,
        write_request(Some(SECRET), json!({"newPost": "kept"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(store.len().await, 1);
}
