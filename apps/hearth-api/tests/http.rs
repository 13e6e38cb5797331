use std::sync::Arc;

use axum::{
	body::{self, Body},
	http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::Value;
use tower::util::ServiceExt;

use hearth_api::{routes, state::AppState};
use hearth_index::QdrantIndex;
use hearth_service::{HearthService, Providers};
use hearth_testkit::{CannedGeneration, MockEmbedding, ScriptedData, test_config};

fn app_state(data: Arc<ScriptedData>, generation: Arc<CannedGeneration>) -> AppState {
	let cfg = test_config();
	let index = QdrantIndex::new(&cfg.index).expect("index client should build");
	let service = HearthService::with_providers(
		cfg,
		index,
		Providers::new(Arc::new(MockEmbedding::new(3)), generation, data),
	);

	AppState::with_service(service)
}

async fn body_json(response: axum::response::Response) -> Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("body should be readable");

	serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn health_returns_ok() {
	let state =
		app_state(Arc::new(ScriptedData::new()), Arc::new(CannedGeneration::answering("unused")));
	let response = routes::router(state)
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
		.await
		.expect("response");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn partitions_lists_every_partition() {
	let state =
		app_state(Arc::new(ScriptedData::new()), Arc::new(CannedGeneration::answering("unused")));
	let response = routes::router(state)
		.oneshot(Request::builder().uri("/v1/partitions").body(Body::empty()).expect("request"))
		.await
		.expect("response");

	assert_eq!(response.status(), StatusCode::OK);

	let json = body_json(response).await;
	let names = json["partitions"].as_array().expect("partitions array");

	assert_eq!(names.len(), 10);
	assert!(names.iter().any(|name| name == "units"));
}

#[tokio::test]
async fn ask_rejects_blank_queries() {
	let state =
		app_state(Arc::new(ScriptedData::new()), Arc::new(CannedGeneration::answering("unused")));
	let request = Request::builder()
		.method("POST")
		.uri("/v1/ask")
		.header(CONTENT_TYPE, "application/json")
		.body(Body::from(r#"{"query": "  "}"#))
		.expect("request");
	let response = routes::router(state).oneshot(request).await.expect("response");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = body_json(response).await;

	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn ask_returns_answer_and_metadata() {
	let data = Arc::new(
		ScriptedData::new().respond("/units/summary/", serde_json::json!({ "total_units": 24 })),
	);
	let state = app_state(data, Arc::new(CannedGeneration::answering("There are 24 units.")));
	let request = Request::builder()
		.method("POST")
		.uri("/v1/ask")
		.header(CONTENT_TYPE, "application/json")
		.body(Body::from(r#"{"query": "how many apartment buildings?"}"#))
		.expect("request");
	let response = routes::router(state).oneshot(request).await.expect("response");

	assert_eq!(response.status(), StatusCode::OK);

	let json = body_json(response).await;

	assert_eq!(json["answer"], "There are 24 units.");
	assert!(json["trace_id"].as_str().is_some());
	assert!(json["metadata"]["sources"].as_array().is_some());
}

#[tokio::test]
async fn summary_is_cached_between_requests() {
	let data =
		Arc::new(ScriptedData::new().respond("/summary", serde_json::json!({ "occupied": 20 })));
	let state = app_state(data.clone(), Arc::new(CannedGeneration::answering("unused")));
	let app = routes::router(state);

	for _ in 0..3 {
		let response = app
			.clone()
			.oneshot(Request::builder().uri("/v1/summary").body(Body::empty()).expect("request"))
			.await
			.expect("response");

		assert_eq!(response.status(), StatusCode::OK);

		let json = body_json(response).await;

		assert_eq!(json["occupied"], 20);
	}

	// Two follow-up requests were served from the TTL cache.
	assert_eq!(data.attempts("/summary"), 1);
}

#[tokio::test]
async fn summary_failure_is_not_masked_or_cached() {
	let data = Arc::new(ScriptedData::new().fail("/summary"));
	let state = app_state(data.clone(), Arc::new(CannedGeneration::answering("unused")));
	let app = routes::router(state);

	let response = app
		.clone()
		.oneshot(Request::builder().uri("/v1/summary").body(Body::empty()).expect("request"))
		.await
		.expect("response");

	assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

	let json = body_json(response).await;

	assert_eq!(json["error_code"], "provider_error");

	// A failed compute is retried by the next request rather than served
	// from the cache.
	let attempts_after_first = data.attempts("/summary");
	let _ = app
		.oneshot(Request::builder().uri("/v1/summary").body(Body::empty()).expect("request"))
		.await
		.expect("response");

	assert!(data.attempts("/summary") > attempts_after_first);
}

#[tokio::test]
async fn bills_summary_accepts_an_explicit_period() {
	let data = Arc::new(
		ScriptedData::new().respond("/bills/summary/", serde_json::json!({ "period_total": 5 })),
	);
	let state = app_state(data, Arc::new(CannedGeneration::answering("unused")));
	let response = routes::router(state)
		.oneshot(
			Request::builder()
				.uri("/v1/summary/bills?period=2025-09")
				.body(Body::empty())
				.expect("request"),
		)
		.await
		.expect("response");

	assert_eq!(response.status(), StatusCode::OK);

	let json = body_json(response).await;

	assert_eq!(json["period_total"], 5);
}
