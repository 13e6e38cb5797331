use std::time::Duration;

use color_eyre::Result;
use reqwest::{Client, header::ACCEPT};
use serde_json::Value;

/// One GET against the property-data service. The path is joined onto the
/// configured base; params become the query string. Timeouts and non-2xx
/// statuses surface as errors for the fan-out layer's retry policy.
pub async fn fetch(
	cfg: &hearth_config::DataApi,
	path: &str,
	params: &[(String, String)],
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, path);
	let mut request = client.get(url).header(ACCEPT, "application/json");

	if !params.is_empty() {
		request = request.query(params);
	}
	if let Some(token) = cfg.auth_token.as_deref() {
		request = request.bearer_auth(token);
	}

	let res = request.send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(json)
}
