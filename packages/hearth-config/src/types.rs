use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub index: Index,
	pub providers: Providers,
	pub data_api: DataApi,
	pub retrieval: Retrieval,
	pub cache: Cache,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default)]
	pub bind_localhost_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct Index {
	pub url: String,
	/// Partition collections are named `<collection_prefix>_<partition>`.
	pub collection_prefix: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub generation: GenerationProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct GenerationProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct DataApi {
	pub api_base: String,
	pub timeout_ms: u64,
	pub max_jobs: u32,
	pub max_workers: u32,
	pub retries: u32,
	pub backoff_base_ms: u64,
	#[serde(default)]
	pub auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Retrieval {
	pub top_k: u32,
	pub snippet_k: u32,
	pub max_context_chars: u32,
	pub embedding_cache_capacity: u32,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
	pub summary_ttl_secs: u64,
}
