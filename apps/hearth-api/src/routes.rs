use std::time::Duration;

use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use hearth_domain::Partition;
use hearth_service::{AskRequest, AskResponse, ServiceError};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/ask", post(ask))
		.route("/v1/summary", get(summary))
		.route("/v1/summary/bills", get(bills_summary))
		.route("/v1/partitions", get(partitions))
		.route("/v1/examples", get(examples))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn ask(
	State(state): State<AppState>,
	Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
	let response = state.service.ask(payload).await?;
	Ok(Json(response))
}

async fn summary(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	let ttl = Duration::from_secs(state.service.cfg.cache.summary_ttl_secs);
	let service = state.service.clone();
	let value = state
		.cache
		.get_or_compute("property_summary", ttl, || async move {
			service.fetch_aggregate("PropertySummary", "/summary", Vec::new()).await
		})
		.await?;
	Ok(Json(value))
}

#[derive(Debug, Deserialize)]
struct BillsSummaryParams {
	period: Option<String>,
}

async fn bills_summary(
	State(state): State<AppState>,
	Query(params): Query<BillsSummaryParams>,
) -> Result<Json<Value>, ApiError> {
	let period = params.period.unwrap_or_else(current_month);
	let ttl = Duration::from_secs(state.service.cfg.cache.summary_ttl_secs);
	let key = format!("bills_summary:{period}");
	let service = state.service.clone();
	let value = state
		.cache
		.get_or_compute(&key, ttl, || async move {
			service
				.fetch_aggregate(
					"BillsSummary",
					"/bills/summary/",
					vec![("period".to_string(), period)],
				)
				.await
		})
		.await?;
	Ok(Json(value))
}

async fn partitions() -> Json<Value> {
	let names: Vec<&str> = Partition::ALL.iter().map(|partition| partition.as_str()).collect();
	Json(serde_json::json!({ "partitions": names }))
}

async fn examples() -> Json<Value> {
	Json(serde_json::json!({
		"example_queries": [
			"What floor is unit U-101 on?",
			"Is the swimming pool available for unit U-101?",
			"Has the 2025-09 rent for U-101 been paid?",
			"Which maintenance requests are still pending?",
			"What is the contact number for tenant T-001?",
		]
	}))
}

fn current_month() -> String {
	let now = OffsetDateTime::now_utc();
	format!("{:04}-{:02}", now.year(), now.month() as u8)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::Provider { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message),
			ServiceError::Index { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "index_error", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };
		(self.status, Json(body)).into_response()
	}
}
