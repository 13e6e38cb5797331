use std::sync::Arc;

use serde_json::Value;

use hearth_index::QdrantIndex;
use hearth_service::{HearthService, TtlCache};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<HearthService>,
	pub cache: Arc<TtlCache<Value>>,
}
impl AppState {
	pub fn new(config: hearth_config::Config) -> color_eyre::Result<Self> {
		let index = QdrantIndex::new(&config.index)?;

		Ok(Self::with_service(HearthService::new(config, index)))
	}

	pub fn with_service(service: HearthService) -> Self {
		Self { service: Arc::new(service), cache: Arc::new(TtlCache::new()) }
	}
}
