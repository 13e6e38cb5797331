mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, Config, DataApi, EmbeddingProviderConfig, GenerationProviderConfig, Index, Providers,
	Retrieval, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.index.url.trim().is_empty() {
		return Err(Error::Validation { message: "index.url must be non-empty.".to_string() });
	}
	if cfg.index.collection_prefix.trim().is_empty() {
		return Err(Error::Validation {
			message: "index.collection_prefix must be non-empty.".to_string(),
		});
	}
	if cfg.index.vector_dim == 0 {
		return Err(Error::Validation {
			message: "index.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.index.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match index.vector_dim.".to_string(),
		});
	}
	if cfg.data_api.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "data_api.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.data_api.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "data_api.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.data_api.max_jobs == 0 {
		return Err(Error::Validation {
			message: "data_api.max_jobs must be greater than zero.".to_string(),
		});
	}
	if cfg.data_api.max_workers == 0 {
		return Err(Error::Validation {
			message: "data_api.max_workers must be greater than zero.".to_string(),
		});
	}
	if cfg.data_api.backoff_base_ms == 0 {
		return Err(Error::Validation {
			message: "data_api.backoff_base_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.snippet_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.snippet_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.max_context_chars == 0 {
		return Err(Error::Validation {
			message: "retrieval.max_context_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.embedding_cache_capacity == 0 {
		return Err(Error::Validation {
			message: "retrieval.embedding_cache_capacity must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.summary_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "cache.summary_ttl_secs must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("generation", &cfg.providers.generation.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for base in [
		&mut cfg.providers.embedding.api_base,
		&mut cfg.providers.generation.api_base,
		&mut cfg.data_api.api_base,
	] {
		while base.ends_with('/') {
			base.pop();
		}
	}

	if cfg.data_api.auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
		cfg.data_api.auth_token = None;
	}
}
