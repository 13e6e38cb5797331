use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use serde_json::Value;
use tokio::{sync::Semaphore, task::JoinSet, time};

use hearth_config::{Config, DataApi};

use crate::{DataProvider, jobs::EndpointJob};

const MAX_BACKOFF_EXP: u32 = 6;

/// The materialized result of one endpoint job. Failures are values, never
/// propagated errors, so one bad endpoint cannot abort its siblings.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
	pub tag: String,
	pub path: String,
	pub result: Result<Value, String>,
	pub elapsed: Duration,
}

impl FetchOutcome {
	pub fn is_ok(&self) -> bool {
		self.result.is_ok()
	}
}

/// Runs at most `max_jobs` jobs through a pool of `max_workers` concurrent
/// fetches. Outcomes come back in job-list order regardless of completion
/// order.
pub(crate) async fn run_jobs(
	cfg: Arc<Config>,
	data: Arc<dyn DataProvider>,
	mut jobs: Vec<EndpointJob>,
) -> Vec<FetchOutcome> {
	let limits = &cfg.data_api;
	let max_jobs = limits.max_jobs as usize;

	if jobs.len() > max_jobs {
		tracing::debug!(dropped = jobs.len() - max_jobs, "Truncating endpoint job list.");
		jobs.truncate(max_jobs);
	}

	let semaphore = Arc::new(Semaphore::new(limits.max_workers as usize));
	let mut slots: Vec<Option<FetchOutcome>> = Vec::new();

	slots.resize_with(jobs.len(), || None);

	let mut tasks = JoinSet::new();

	for (slot, job) in jobs.into_iter().enumerate() {
		let cfg = cfg.clone();
		let data = data.clone();
		let semaphore = semaphore.clone();

		tasks.spawn(async move {
			let _permit = semaphore.acquire_owned().await.ok();
			let outcome = safe_fetch(&cfg.data_api, data.as_ref(), &job).await;

			(slot, outcome)
		});
	}

	while let Some(joined) = tasks.join_next().await {
		match joined {
			Ok((slot, outcome)) => {
				if outcome.is_ok() {
					tracing::debug!(
						tag = outcome.tag.as_str(),
						path = outcome.path.as_str(),
						elapsed_ms = outcome.elapsed.as_millis() as u64,
						"Endpoint fetch succeeded."
					);
				} else {
					tracing::warn!(
						tag = outcome.tag.as_str(),
						path = outcome.path.as_str(),
						elapsed_ms = outcome.elapsed.as_millis() as u64,
						"Endpoint fetch failed."
					);
				}

				slots[slot] = Some(outcome);
			},
			Err(err) => {
				tracing::warn!(error = %err, "Endpoint fetch task failed to join.");
			},
		}
	}

	slots.into_iter().flatten().collect()
}

/// One job with a hard per-attempt timeout and exponential backoff between
/// attempts. Performs exactly `retries + 1` attempts in the worst case and
/// always returns an outcome value.
pub(crate) async fn safe_fetch(
	cfg: &DataApi,
	data: &dyn DataProvider,
	job: &EndpointJob,
) -> FetchOutcome {
	let started = Instant::now();
	let timeout = Duration::from_millis(cfg.timeout_ms);
	let mut last_error = String::new();

	for attempt in 0..=cfg.retries {
		match time::timeout(timeout, data.fetch(cfg, &job.path, &job.params)).await {
			Ok(Ok(payload)) =>
				return FetchOutcome {
					tag: job.tag.clone(),
					path: job.path.clone(),
					result: Ok(payload),
					elapsed: started.elapsed(),
				},
			Ok(Err(err)) => last_error = err.to_string(),
			Err(_) => last_error = format!("Timed out after {}ms.", cfg.timeout_ms),
		}

		if attempt < cfg.retries {
			time::sleep(backoff_delay(cfg.backoff_base_ms, attempt)).await;
		}
	}

	FetchOutcome {
		tag: job.tag.clone(),
		path: job.path.clone(),
		result: Err(last_error),
		elapsed: started.elapsed(),
	}
}

/// Delay before the retry that follows failed attempt `attempt` (0-based).
/// Doubles each attempt, capped so the shift cannot overflow.
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
	let exp = attempt.min(MAX_BACKOFF_EXP);

	Duration::from_millis(base_ms.saturating_mul(1 << exp))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backoff_doubles_per_attempt() {
		assert_eq!(backoff_delay(100, 0), Duration::from_millis(100));
		assert_eq!(backoff_delay(100, 1), Duration::from_millis(200));
		assert_eq!(backoff_delay(100, 2), Duration::from_millis(400));
	}

	#[test]
	fn backoff_never_decreases() {
		let delays: Vec<Duration> =
			(0..10).map(|attempt| backoff_delay(50, attempt)).collect();

		assert!(delays.windows(2).all(|pair| pair[0] <= pair[1]));
	}

	#[test]
	fn backoff_exponent_is_capped() {
		assert_eq!(backoff_delay(1, 6), backoff_delay(1, 60));
	}
}
