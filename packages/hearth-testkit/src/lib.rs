//! Deterministic provider doubles and a config factory for exercising the
//! orchestration core without network services.

use std::{
	collections::{HashMap, HashSet},
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use color_eyre::eyre;
use serde_json::{Map, Value};

use hearth_config::{
	Cache, Config, DataApi, EmbeddingProviderConfig, GenerationProviderConfig, Index, Providers,
	Retrieval, Service,
};
use hearth_service::{BoxFuture, DataProvider, EmbeddingProvider, GenerationProvider};

/// A config wired for tests: tiny vectors, fast backoff, localhost
/// endpoints that are never actually contacted.
pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:8080".to_string(),
			log_level: "info".to_string(),
			bind_localhost_only: true,
		},
		index: Index {
			url: "http://localhost:6334".to_string(),
			collection_prefix: "hearth_test".to_string(),
			vector_dim: 3,
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-embedding".to_string(),
				dimensions: 3,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			generation: GenerationProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-generation".to_string(),
				temperature: 0.1,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		data_api: DataApi {
			api_base: "http://localhost:8000".to_string(),
			timeout_ms: 1_000,
			max_jobs: 4,
			max_workers: 3,
			retries: 2,
			backoff_base_ms: 5,
			auth_token: None,
		},
		retrieval: Retrieval {
			top_k: 2,
			snippet_k: 2,
			max_context_chars: 8_000,
			embedding_cache_capacity: 64,
		},
		cache: Cache { summary_ttl_secs: 30 },
	}
}

/// Hash-derived embeddings: identical text always embeds to the identical
/// vector, different texts almost never collide. Calls are counted so tests
/// can assert on cache behavior.
pub struct MockEmbedding {
	dimensions: usize,
	calls: AtomicUsize,
	texts_embedded: AtomicUsize,
}

impl MockEmbedding {
	pub fn new(dimensions: usize) -> Self {
		Self { dimensions, calls: AtomicUsize::new(0), texts_embedded: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn texts_embedded(&self) -> usize {
		self.texts_embedded.load(Ordering::SeqCst)
	}

	fn vector_for(&self, text: &str) -> Vec<f32> {
		let hash =
			text.bytes().fold(0_u64, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u64));

		(0..self.dimensions)
			.map(|idx| {
				let seed = hash.wrapping_add(idx as u64);

				((seed % 1_000) as f32 / 1_000.0) - 0.5
			})
			.collect()
	}
}

impl EmbeddingProvider for MockEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);

			Ok(texts.iter().map(|text| self.vector_for(text)).collect())
		})
	}
}

/// An embedding provider that always errors, for skip-and-log paths.
pub struct FailingEmbedding;

impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async { Err(eyre::eyre!("embedding service unavailable")) })
	}
}

/// Scripted data endpoints: paths listed in `responses` succeed with their
/// canned payload, paths in `failing` always error, anything else 404s.
/// Per-path attempt counts and peak in-flight concurrency are recorded.
pub struct ScriptedData {
	responses: HashMap<String, Value>,
	failing: HashSet<String>,
	attempts: Mutex<HashMap<String, u32>>,
	in_flight: AtomicUsize,
	peak_in_flight: AtomicUsize,
	delay: Option<Duration>,
}

impl ScriptedData {
	pub fn new() -> Self {
		Self {
			responses: HashMap::new(),
			failing: HashSet::new(),
			attempts: Mutex::new(HashMap::new()),
			in_flight: AtomicUsize::new(0),
			peak_in_flight: AtomicUsize::new(0),
			delay: None,
		}
	}

	pub fn respond(mut self, path: &str, payload: Value) -> Self {
		self.responses.insert(path.to_string(), payload);

		self
	}

	pub fn fail(mut self, path: &str) -> Self {
		self.failing.insert(path.to_string());

		self
	}

	/// Adds latency to every fetch so concurrency limits become visible.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn attempts(&self, path: &str) -> u32 {
		self.attempts
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.get(path)
			.copied()
			.unwrap_or(0)
	}

	pub fn peak_in_flight(&self) -> usize {
		self.peak_in_flight.load(Ordering::SeqCst)
	}
}

impl Default for ScriptedData {
	fn default() -> Self {
		Self::new()
	}
}

impl DataProvider for ScriptedData {
	fn fetch<'a>(
		&'a self,
		_cfg: &'a DataApi,
		path: &'a str,
		_params: &'a [(String, String)],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async move {
			{
				let mut attempts = self.attempts.lock().unwrap_or_else(|err| err.into_inner());

				*attempts.entry(path.to_string()).or_insert(0) += 1;
			}

			let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;

			self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}

			self.in_flight.fetch_sub(1, Ordering::SeqCst);

			if self.failing.contains(path) {
				return Err(eyre::eyre!("scripted failure for {path}"));
			}

			self.responses
				.get(path)
				.cloned()
				.ok_or_else(|| eyre::eyre!("no scripted response for {path}"))
		})
	}
}

/// Canned generation: a fixed answer, a scripted failure, or an empty
/// string to exercise the fallback policy.
pub struct CannedGeneration {
	answer: Option<String>,
}

impl CannedGeneration {
	pub fn answering(answer: &str) -> Self {
		Self { answer: Some(answer.to_string()) }
	}

	pub fn failing() -> Self {
		Self { answer: None }
	}
}

impl GenerationProvider for CannedGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a GenerationProviderConfig,
		_prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move {
			match self.answer.as_ref() {
				Some(answer) => Ok(answer.clone()),
				None => Err(eyre::eyre!("generation service unavailable")),
			}
		})
	}
}
