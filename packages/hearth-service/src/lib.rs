pub mod ask;
pub mod embed;
pub mod evidence;
pub mod fanout;
pub mod jobs;
pub mod similarity;
pub mod ttl;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use hearth_config::{Config, DataApi, EmbeddingProviderConfig, GenerationProviderConfig};
use hearth_index::QdrantIndex;
use hearth_providers::{data, embedding, generation};

pub use ask::{AskRequest, AskResponse, FALLBACK_ANSWER};
pub use embed::EmbeddingCache;
pub use error::{Error as ServiceError, Result as ServiceResult};
pub use evidence::{EvidenceBundle, EvidenceMetadata, SourceRecord};
pub use fanout::FetchOutcome;
pub use jobs::EndpointJob;
pub use ttl::TtlCache;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait DataProvider
where
	Self: Send + Sync,
{
	fn fetch<'a>(
		&'a self,
		cfg: &'a DataApi,
		path: &'a str,
		params: &'a [(String, String)],
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
	pub data: Arc<dyn DataProvider>,
}

pub struct HearthService {
	pub cfg: Arc<Config>,
	pub index: Arc<QdrantIndex>,
	pub providers: Providers,
	pub(crate) embeddings: EmbeddingCache,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(generation::generate(cfg, prompt))
	}
}

impl DataProvider for DefaultProviders {
	fn fetch<'a>(
		&'a self,
		cfg: &'a DataApi,
		path: &'a str,
		params: &'a [(String, String)],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(data::fetch(cfg, path, params))
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generation: Arc<dyn GenerationProvider>,
		data: Arc<dyn DataProvider>,
	) -> Self {
		Self { embedding, generation, data }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { embedding: provider.clone(), generation: provider.clone(), data: provider }
	}
}

impl HearthService {
	pub fn new(cfg: Config, index: QdrantIndex) -> Self {
		Self::with_providers(cfg, index, Providers::default())
	}

	pub fn with_providers(cfg: Config, index: QdrantIndex, providers: Providers) -> Self {
		let embeddings = EmbeddingCache::new(cfg.retrieval.embedding_cache_capacity as usize);

		Self { cfg: Arc::new(cfg), index: Arc::new(index), providers, embeddings }
	}
}
