use tokio::task::JoinSet;

use hearth_domain::{RouteDecision, vector};
use hearth_index::IndexHit;

use crate::HearthService;

impl HearthService {
	/// Embeds the expansion set, forms the centroid, and queries every
	/// routed partition concurrently. One partition failing never aborts
	/// the others; an unembeddable query yields no hits rather than an
	/// error.
	pub(crate) async fn retrieve_similar(
		&self,
		route: &RouteDecision,
		expansions: &[String],
	) -> Vec<IndexHit> {
		let vectors = match self
			.embeddings
			.embed_all(
				self.providers.embedding.as_ref(),
				&self.cfg.providers.embedding,
				expansions,
			)
			.await
		{
			Ok(vectors) => vectors,
			Err(err) => {
				tracing::warn!(error = %err, "Expansion embedding failed. Skipping similarity retrieval.");

				return Vec::new();
			},
		};
		let centroid = vector::mean(&vectors);

		if centroid.is_empty() {
			return Vec::new();
		}

		let top_k = self.cfg.retrieval.top_k;
		let mut tasks = JoinSet::new();

		for &partition in &route.partitions {
			let index = self.index.clone();
			let centroid = centroid.clone();
			let unit_id = route.entities.unit_id.clone();

			tasks.spawn(async move {
				let hits =
					index.query_partition(partition, &centroid, top_k, unit_id.as_deref()).await;

				(partition, hits)
			});
		}

		let mut merged = Vec::new();

		while let Some(joined) = tasks.join_next().await {
			match joined {
				Ok((_, Ok(hits))) => merged.extend(hits),
				Ok((partition, Err(err))) => {
					tracing::warn!(partition = %partition, error = %err, "Similarity query failed.");
				},
				Err(err) => {
					tracing::warn!(error = %err, "Similarity task failed to join.");
				},
			}
		}

		merged.sort_by(|a, b| a.distance.total_cmp(&b.distance));
		merged.truncate(top_k as usize);

		merged
	}
}
