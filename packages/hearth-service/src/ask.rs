use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use hearth_domain::{Partition, expand, route};

use crate::{
	HearthService, ServiceError, ServiceResult,
	evidence::{self, EvidenceBundle, EvidenceMetadata},
	fanout,
	jobs::{self, EndpointJob},
};

/// Returned whenever no usable answer can be produced. Must stay literal
/// and identical across failure causes.
pub const FALLBACK_ANSWER: &str = "I don't know based on available data.";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AskRequest {
	pub query: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AskResponse {
	pub trace_id: Uuid,
	pub answer: String,
	pub partitions: Vec<Partition>,
	pub metadata: EvidenceMetadata,
}

impl HearthService {
	/// The primary retrieval entry point: routes the query, expands it,
	/// then runs similarity retrieval and the endpoint fan-out
	/// concurrently, merging both into one bounded evidence bundle.
	pub async fn route_and_retrieve(&self, query: &str) -> ServiceResult<EvidenceBundle> {
		let decision = route::route(query, OffsetDateTime::now_utc());
		let expansions = expand::expand(query);

		tracing::debug!(
			partitions = ?decision.partitions,
			expansion_count = expansions.len(),
			"Routed query."
		);

		let endpoint_jobs = jobs::build_jobs(&decision, query);
		let (hits, outcomes) = tokio::join!(
			self.retrieve_similar(&decision, &expansions),
			fanout::run_jobs(self.cfg.clone(), self.providers.data.clone(), endpoint_jobs),
		);

		Ok(evidence::assemble(
			&decision.partitions,
			&outcomes,
			&hits,
			self.cfg.retrieval.snippet_k as usize,
			self.cfg.retrieval.max_context_chars as usize,
		))
	}

	pub async fn ask(&self, request: AskRequest) -> ServiceResult<AskResponse> {
		let query = request.query.trim();

		if query.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Query must be non-empty.".to_string(),
			});
		}

		let bundle = self.route_and_retrieve(query).await?;
		let answer = if bundle.is_empty() {
			tracing::info!("No evidence retrieved. Returning fallback answer.");

			FALLBACK_ANSWER.to_string()
		} else {
			self.generate_answer(query, &bundle.context).await
		};

		Ok(AskResponse {
			trace_id: Uuid::new_v4(),
			answer,
			partitions: bundle.metadata.partitions.clone(),
			metadata: bundle.metadata,
		})
	}

	/// One endpoint read with the standard retry policy, for aggregate
	/// consumers like the cached summary routes. Unlike the fan-out path
	/// the failure is surfaced, since a lone aggregate read has no sibling
	/// evidence to fall back on.
	pub async fn fetch_aggregate(
		&self,
		tag: &str,
		path: &str,
		params: Vec<(String, String)>,
	) -> ServiceResult<Value> {
		let job = EndpointJob::with_params(tag, path, params);
		let outcome =
			fanout::safe_fetch(&self.cfg.data_api, self.providers.data.as_ref(), &job).await;

		outcome.result.map_err(|message| ServiceError::Provider { message })
	}

	async fn generate_answer(&self, query: &str, context: &str) -> String {
		let prompt = build_prompt(query, context);

		match self.providers.generation.generate(&self.cfg.providers.generation, &prompt).await {
			Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
			Ok(_) => {
				tracing::warn!("Generation returned an empty answer. Using fallback.");

				FALLBACK_ANSWER.to_string()
			},
			Err(err) => {
				tracing::warn!(error = %err, "Generation failed. Using fallback.");

				FALLBACK_ANSWER.to_string()
			},
		}
	}
}

fn build_prompt(query: &str, context: &str) -> String {
	format!(
		"You are a property management assistant.\n\
		Answer the question using ONLY the retrieved context below.\n\
		If the answer cannot be found in the context, reply exactly: \"{FALLBACK_ANSWER}\"\n\
		\n\
		### Question:\n\
		{query}\n\
		\n\
		### Retrieved context:\n\
		{context}\n\
		\n\
		### Answer:"
	)
}
