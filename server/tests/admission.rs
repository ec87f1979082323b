//! End-to-end admission behavior through the HTTP surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use sahayata::memory_store::MemoryDocStore;
use sahayata::{routes, AppBuilder};
use sahayata_types::doc_store::{DocStore, Filter, ListOptions};
use sahayata_types::error::{Error, ShResult};

fn router() -> Router {
	let app = AppBuilder::new().build().unwrap();
	routes::init(app)
}

async fn send(
	router: &Router,
	method: &str,
	uri: &str,
	client: &str,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let mut builder = Request::builder()
		.method(method)
		.uri(uri)
		.header("x-forwarded-for", client);
	let body = match body {
		Some(value) => {
			builder = builder.header("content-type", "application/json");
			Body::from(value.to_string())
		}
		None => Body::empty(),
	};
	let request = builder.body(body).unwrap();
	let response = router.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	let value = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap()
	};
	(status, value)
}

async fn mint_session(router: &Router, client: &str) -> String {
	let (status, body) = send(router, "POST", "/api/session", client, None).await;
	assert_eq!(status, StatusCode::CREATED);
	body["data"]["sessionId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_forum_post_accepted_and_listed() {
	let router = router();
	let sid = mint_session(&router, "203.0.113.1").await;

	let (status, body) = send(
		&router,
		"POST",
		"/api/samvad",
		"203.0.113.1",
		Some(json!({ "sessionId": sid, "topic": "exams", "text": "Feeling anxious about finals" })),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);
	assert!(body["data"]["id"].as_str().is_some());

	let (status, body) = send(&router, "GET", "/api/samvad?topic=exams", "203.0.113.1", None).await;
	assert_eq!(status, StatusCode::OK);
	let posts = body["data"].as_array().unwrap();
	assert_eq!(posts.len(), 1);
	assert_eq!(posts[0]["text"], "Feeling anxious about finals");
}

#[tokio::test]
async fn test_duplicate_post_conflicts() {
	let router = router();
	let sid = mint_session(&router, "203.0.113.2").await;
	let body = json!({ "sessionId": sid, "text": "The same message twice" });

	let (status, _) = send(&router, "POST", "/api/samvad", "203.0.113.2", Some(body.clone())).await;
	assert_eq!(status, StatusCode::CREATED);

	let (status, envelope) = send(&router, "POST", "/api/samvad", "203.0.113.2", Some(body)).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(envelope["error"]["code"], "E-ADMISSION");
}

#[tokio::test]
async fn test_forum_rate_limit_enforced() {
	let router = router();
	let sid = mint_session(&router, "203.0.113.3").await;

	// Forum class allows 5 posts per window; the sixth must bounce
	// even with fresh content.
	for n in 0..5 {
		let (status, _) = send(
			&router,
			"POST",
			"/api/samvad",
			"203.0.113.3",
			Some(json!({ "sessionId": sid, "text": format!("distinct message number {}", n) })),
		)
		.await;
		assert_eq!(status, StatusCode::CREATED);
	}
	let (status, envelope) = send(
		&router,
		"POST",
		"/api/samvad",
		"203.0.113.3",
		Some(json!({ "sessionId": sid, "text": "one distinct message too many" })),
	)
	.await;
	assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
	assert_eq!(envelope["error"]["code"], "E-ADMISSION");
}

#[tokio::test]
async fn test_rate_limit_is_per_client() {
	let router = router();
	let sid_a = mint_session(&router, "203.0.113.4").await;
	let sid_b = mint_session(&router, "203.0.113.5").await;

	for n in 0..5 {
		let (status, _) = send(
			&router,
			"POST",
			"/api/samvad",
			"203.0.113.4",
			Some(json!({ "sessionId": sid_a, "text": format!("message from the first client {}", n) })),
		)
		.await;
		assert_eq!(status, StatusCode::CREATED);
	}
	// A different client identity still has a fresh window.
	let (status, _) = send(
		&router,
		"POST",
		"/api/samvad",
		"203.0.113.5",
		Some(json!({ "sessionId": sid_b, "text": "message from the second client" })),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_spam_and_length_rejections() {
	let router = router();
	let sid = mint_session(&router, "203.0.113.6").await;

	let (status, _) = send(
		&router,
		"POST",
		"/api/samvad",
		"203.0.113.6",
		Some(json!({ "sessionId": sid, "text": "check this out https://example.com/very/long/path" })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = send(
		&router,
		"POST",
		"/api/samvad",
		"203.0.113.6",
		Some(json!({ "sessionId": sid, "text": "ab" })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = send(
		&router,
		"POST",
		"/api/samvad",
		"203.0.113.6",
		Some(json!({ "sessionId": sid, "text": Value::Null })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_professionals_search_rate_limited() {
	let router = router();

	for _ in 0..2 {
		let (status, _) = send(&router, "GET", "/api/professionals", "203.0.113.7", None).await;
		assert_eq!(status, StatusCode::OK);
	}
	let (status, _) = send(&router, "GET", "/api/professionals", "203.0.113.7", None).await;
	assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_auth_rejects_bad_credentials() {
	let router = router();

	let (status, _) = send(
		&router,
		"POST",
		"/api/auth",
		"203.0.113.8",
		Some(json!({
			"action": "login",
			"email": "nobody@example.org",
			"password": "wrong-password",
		})),
	)
	.await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, _) = send(
		&router,
		"POST",
		"/api/auth",
		"203.0.113.8",
		Some(json!({ "action": "login", "email": "not-an-email", "password": "short" })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_then_login() {
	let router = router();

	let (status, _) = send(
		&router,
		"POST",
		"/api/auth",
		"203.0.113.9",
		Some(json!({
			"action": "register",
			"email": "dr.rao@example.org",
			"password": "a-long-password",
			"name": "Dr. Rao",
		})),
	)
	.await;
	assert_eq!(status, StatusCode::OK);

	let (status, body) = send(
		&router,
		"POST",
		"/api/auth",
		"203.0.113.9",
		Some(json!({
			"action": "login",
			"email": "DR.RAO@example.org",
			"password": "a-long-password",
		})),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["data"]["token"].as_str().is_some());
}

#[tokio::test]
async fn test_register_requires_name() {
	let router = router();

	for name in ["", " x "] {
		let (status, body) = send(
			&router,
			"POST",
			"/api/auth",
			"203.0.113.14",
			Some(json!({
				"action": "register",
				"email": "anon@example.org",
				"password": "a-long-password",
				"name": name,
			})),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"]["code"], "E-VALIDATION");
	}
}

#[tokio::test]
async fn test_tool_catalogue_served() {
	let router = router();

	let (status, body) = send(&router, "GET", "/api/abhyas", "203.0.113.10", None).await;
	assert_eq!(status, StatusCode::OK);
	let tools = body["data"]["tools"].as_array().unwrap();
	assert_eq!(tools.len(), 10);
	assert_eq!(tools[0]["key"], "breathing");
}

#[tokio::test]
async fn test_tool_completion_awards_points_once() {
	let store = Arc::new(MemoryDocStore::new());
	let app = AppBuilder::new().store(store.clone()).build().unwrap();
	let router = routes::init(app);
	let sid = mint_session(&router, "203.0.113.10").await;

	// Textless writes: rate limit and session quota apply, content
	// checks do not.
	for key in ["breathing", "breathing", "thought-diary"] {
		let (status, _) = send(
			&router,
			"POST",
			"/api/abhyas",
			"203.0.113.10",
			Some(json!({ "sessionId": sid, "key": key })),
		)
		.await;
		assert_eq!(status, StatusCode::CREATED);
	}

	// Three completions logged, but the repeat earns nothing
	assert_eq!(store.count("abhyas_done").await.unwrap(), 3);
	let filter: Filter = vec![("sid".into(), json!(sid))];
	let progress = store.find_one("progress", filter).await.unwrap().unwrap();
	assert_eq!(progress["totalPoints"], 20);
	assert_eq!(progress["completedTools"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_journey_lifecycle() {
	let router = router();
	let sid = mint_session(&router, "203.0.113.12").await;

	let (status, body) = send(
		&router,
		"POST",
		"/api/journeys",
		"203.0.113.12",
		Some(json!({
			"sessionId": sid,
			"action": "create",
			"title": "Evening wind-down",
			"activities": ["Stretch for 5 minutes", "Write one worry down"],
		})),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);
	let key = body["data"]["key"].as_str().unwrap().to_string();
	assert!(key.starts_with("custom-"));
	assert_eq!(body["data"]["steps"], 2);
	assert_eq!(body["data"]["points"], 40);

	// Catalogue: four core journeys plus the custom one
	let (status, body) = send(
		&router,
		"GET",
		&format!("/api/journeys?sessionId={}", sid),
		"203.0.113.12",
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["journeys"].as_array().unwrap().len(), 5);

	for expected_step in 1..=2 {
		let (status, body) = send(
			&router,
			"POST",
			"/api/journeys",
			"203.0.113.12",
			Some(json!({ "sessionId": sid, "action": "progress", "journeyKey": key })),
		)
		.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["data"]["currentStep"], expected_step);
	}

	let (status, body) = send(
		&router,
		"POST",
		"/api/journeys",
		"203.0.113.12",
		Some(json!({ "sessionId": sid, "action": "delete", "journeyKey": key })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["isCore"], false);

	// Gone from the catalogue, progress dropped with it
	let (_, body) = send(
		&router,
		"GET",
		&format!("/api/journeys?sessionId={}", sid),
		"203.0.113.12",
		None,
	)
	.await;
	assert_eq!(body["data"]["journeys"].as_array().unwrap().len(), 4);
	assert!(body["data"]["progress"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_core_journey_delete_only_hides() {
	let router = router();
	let sid = mint_session(&router, "203.0.113.13").await;

	let (status, body) = send(
		&router,
		"POST",
		"/api/journeys",
		"203.0.113.13",
		Some(json!({ "sessionId": sid, "action": "delete", "journeyKey": "stress-relief" })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["isCore"], true);

	// Hidden for this session only
	let (_, body) = send(
		&router,
		"GET",
		&format!("/api/journeys?sessionId={}", sid),
		"203.0.113.13",
		None,
	)
	.await;
	assert_eq!(body["data"]["journeys"].as_array().unwrap().len(), 3);

	// Anonymous catalogue still shows all four core journeys
	let (_, body) = send(&router, "GET", "/api/journeys", "203.0.113.13", None).await;
	assert_eq!(body["data"]["journeys"].as_array().unwrap().len(), 4);
}

// FailOnceStore //
//***************//

/// Store whose first insert fails, for exercising the
/// commit-after-persist contract over HTTP.
struct FailOnceStore {
	inner: MemoryDocStore,
	failed: AtomicBool,
}

#[async_trait]
impl DocStore for FailOnceStore {
	async fn insert(&self, collection: &str, doc: Value) -> ShResult<Box<str>> {
		if !self.failed.swap(true, Ordering::SeqCst) {
			return Err(Error::ServiceUnavailable("store offline".into()));
		}
		self.inner.insert(collection, doc).await
	}

	async fn list(&self, collection: &str, opts: ListOptions) -> ShResult<Vec<Value>> {
		self.inner.list(collection, opts).await
	}

	async fn find_one(&self, collection: &str, filter: Filter) -> ShResult<Option<Value>> {
		self.inner.find_one(collection, filter).await
	}

	async fn upsert(&self, collection: &str, filter: Filter, doc: Value) -> ShResult<()> {
		self.inner.upsert(collection, filter, doc).await
	}

	async fn remove(&self, collection: &str, filter: Filter) -> ShResult<usize> {
		self.inner.remove(collection, filter).await
	}

	async fn count(&self, collection: &str) -> ShResult<usize> {
		self.inner.count(collection).await
	}
}

#[tokio::test]
async fn test_failed_persist_leaves_no_fingerprint() {
	let store = Arc::new(FailOnceStore {
		inner: MemoryDocStore::new(),
		failed: AtomicBool::new(false),
	});
	let app = AppBuilder::new().store(store).build().unwrap();
	let router = routes::init(app);
	let sid = mint_session(&router, "203.0.113.11").await;
	let body = json!({ "sessionId": sid, "text": "A post that initially fails to save" });

	let (status, _) = send(&router, "POST", "/api/samvad", "203.0.113.11", Some(body.clone())).await;
	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

	// The write never landed, so retrying identical content must not
	// trip duplicate suppression.
	let (status, _) = send(&router, "POST", "/api/samvad", "203.0.113.11", Some(body)).await;
	assert_eq!(status, StatusCode::CREATED);
}

// vim: ts=4
