use qdrant_client::qdrant::{Condition, Filter, Query, QueryPointsBuilder, value::Kind};

use hearth_domain::Partition;

use crate::{Error, Result};

pub const TEXT_PAYLOAD_KEY: &str = "text";
pub const UNIT_PAYLOAD_KEY: &str = "unit_id";

/// One retrieved snippet. `distance` is `1 - cosine score`, so lower means
/// more relevant and results from different partitions merge on one scale.
#[derive(Debug, Clone)]
pub struct IndexHit {
	pub partition: Partition,
	pub text: String,
	pub distance: f32,
}

pub struct QdrantIndex {
	pub client: qdrant_client::Qdrant,
	pub collection_prefix: String,
	pub vector_dim: u32,
}
impl QdrantIndex {
	pub fn new(cfg: &hearth_config::Index) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection_prefix: cfg.collection_prefix.clone(),
			vector_dim: cfg.vector_dim,
		})
	}

	pub fn collection_for(&self, partition: Partition) -> String {
		format!("{}_{}", self.collection_prefix, partition)
	}

	/// Nearest-vector query against one partition's collection, optionally
	/// restricted to a single unit id.
	pub async fn query_partition(
		&self,
		partition: Partition,
		vector: &[f32],
		top_k: u32,
		unit_id: Option<&str>,
	) -> Result<Vec<IndexHit>> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::Message(format!(
				"Query vector has dimension {} but the index expects {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		let mut search = QueryPointsBuilder::new(self.collection_for(partition))
			.query(Query::new_nearest(vector.to_vec()))
			.limit(top_k as u64)
			.with_payload(true);

		if let Some(unit_id) = unit_id {
			search =
				search.filter(Filter::must([Condition::matches(UNIT_PAYLOAD_KEY, unit_id.to_string())]));
		}

		let response = self.client.query(search).await?;
		let hits = response
			.result
			.into_iter()
			.filter_map(|point| {
				let text = point.payload.get(TEXT_PAYLOAD_KEY).and_then(|value| {
					match value.kind.as_ref() {
						Some(Kind::StringValue(text)) => Some(text.clone()),
						_ => None,
					}
				})?;

				Some(IndexHit { partition, text, distance: 1.0 - point.score })
			})
			.collect();

		Ok(hits)
	}
}
