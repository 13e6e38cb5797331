use serde_json::Map;

use hearth_config::{
	Cache, Config, DataApi, EmbeddingProviderConfig, GenerationProviderConfig, Index, Providers,
	Retrieval, Service,
};

fn valid_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:8080".to_string(),
			log_level: "info".to_string(),
			bind_localhost_only: true,
		},
		index: Index {
			url: "http://localhost:6334".to_string(),
			collection_prefix: "hearth".to_string(),
			vector_dim: 3,
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "p".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "m".to_string(),
				dimensions: 3,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			generation: GenerationProviderConfig {
				provider_id: "p".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "m".to_string(),
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
			backoff_base_ms: 100,
			auth_token: None,
		},
		retrieval: Retrieval {
			top_k: 2,
			snippet_k: 2,
			max_context_chars: 4_000,
			embedding_cache_capacity: 64,
		},
		cache: Cache { summary_ttl_secs: 30 },
	}
}

#[test]
fn accepts_valid_config() {
	assert!(hearth_config::validate(&valid_config()).is_ok());
}

#[test]
fn rejects_empty_http_bind() {
	let mut cfg = valid_config();
	cfg.service.http_bind = " ".to_string();

	let err = hearth_config::validate(&cfg).expect_err("expected validation error");

	assert!(err.to_string().contains("service.http_bind"));
}

#[test]
fn rejects_dimension_mismatch() {
	let mut cfg = valid_config();
	cfg.providers.embedding.dimensions = 4;

	let err = hearth_config::validate(&cfg).expect_err("expected validation error");

	assert!(err.to_string().contains("must match index.vector_dim"));
}

#[test]
fn rejects_zero_workers() {
	let mut cfg = valid_config();
	cfg.data_api.max_workers = 0;

	let err = hearth_config::validate(&cfg).expect_err("expected validation error");

	assert!(err.to_string().contains("data_api.max_workers"));
}

#[test]
fn rejects_empty_provider_key() {
	let mut cfg = valid_config();
	cfg.providers.generation.api_key = String::new();

	let err = hearth_config::validate(&cfg).expect_err("expected validation error");

	assert!(err.to_string().contains("generation api_key"));
}

#[test]
fn rejects_zero_ttl() {
	let mut cfg = valid_config();
	cfg.cache.summary_ttl_secs = 0;

	let err = hearth_config::validate(&cfg).expect_err("expected validation error");

	assert!(err.to_string().contains("cache.summary_ttl_secs"));
}
