use std::{num::NonZeroUsize, sync::Mutex};

use lru::LruCache;

use hearth_config::EmbeddingProviderConfig;

use crate::{EmbeddingProvider, ServiceError, ServiceResult};

/// Bounded text-to-vector memo. Retrieval branches embed overlapping
/// expansion sets concurrently, so the map sits behind a mutex; capacity is
/// enforced by LRU eviction.
pub struct EmbeddingCache {
	entries: Mutex<LruCache<String, Vec<f32>>>,
}

impl EmbeddingCache {
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

		Self { entries: Mutex::new(LruCache::new(capacity)) }
	}

	pub fn get(&self, text: &str) -> Option<Vec<f32>> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).get(text).cloned()
	}

	pub fn put(&self, text: String, vector: Vec<f32>) {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).put(text, vector);
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Embeds `texts` in input order, serving cached vectors and batching
	/// only the misses through the provider.
	pub async fn embed_all(
		&self,
		provider: &dyn EmbeddingProvider,
		cfg: &EmbeddingProviderConfig,
		texts: &[String],
	) -> ServiceResult<Vec<Vec<f32>>> {
		let mut resolved: Vec<Option<Vec<f32>>> = texts.iter().map(|text| self.get(text)).collect();
		let missing: Vec<String> = texts
			.iter()
			.zip(&resolved)
			.filter(|(_, slot)| slot.is_none())
			.map(|(text, _)| text.clone())
			.collect();

		if !missing.is_empty() {
			let embedded = provider.embed(cfg, &missing).await?;

			if embedded.len() != missing.len() {
				return Err(ServiceError::Provider {
					message: "Embedding provider returned mismatched vector count.".to_string(),
				});
			}

			let mut fresh = embedded.into_iter();

			for (slot, text) in resolved.iter_mut().zip(texts) {
				if slot.is_some() {
					continue;
				}

				let Some(vector) = fresh.next() else {
					break;
				};

				if vector.len() != cfg.dimensions as usize {
					return Err(ServiceError::Provider {
						message: "Embedding vector dimension mismatch.".to_string(),
					});
				}

				self.put(text.clone(), vector.clone());

				*slot = Some(vector);
			}
		}

		Ok(resolved.into_iter().flatten().collect())
	}
}
