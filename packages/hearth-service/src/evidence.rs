use serde::Serialize;

use hearth_domain::Partition;
use hearth_index::IndexHit;

use crate::fanout::FetchOutcome;

/// Provenance and timing for one attempted endpoint source, kept for
/// logging and tests even when the fetch failed.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRecord {
	pub tag: String,
	pub path: String,
	pub ok: bool,
	pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvidenceMetadata {
	pub partitions: Vec<Partition>,
	pub endpoint_successes: u32,
	pub endpoint_failures: u32,
	pub similarity_hits: u32,
	pub sources: Vec<SourceRecord>,
}

/// The assembled context handed to the generation service, plus the
/// structured metadata describing where it came from.
#[derive(Debug, Clone)]
pub struct EvidenceBundle {
	pub context: String,
	pub metadata: EvidenceMetadata,
}

impl EvidenceBundle {
	pub fn is_empty(&self) -> bool {
		self.context.trim().is_empty()
	}
}

/// Merges endpoint outcomes and similarity hits into one bounded context.
/// Endpoint payloads are the primary evidence; similarity snippets are a
/// capped supplemental block, and become the whole context only when no
/// endpoint succeeded.
pub fn assemble(
	partitions: &[Partition],
	outcomes: &[FetchOutcome],
	hits: &[IndexHit],
	snippet_k: usize,
	max_context_chars: usize,
) -> EvidenceBundle {
	let endpoint_block = endpoint_sections(outcomes).join("\n\n");
	let snippet_block = snippet_sections(hits, snippet_k).join("\n\n");
	let mut context = if endpoint_block.is_empty() {
		snippet_block
	} else if snippet_block.is_empty() {
		endpoint_block
	} else {
		format!("{endpoint_block}\n\n--- SEMANTIC MATCHES (short) ---\n{snippet_block}")
	};

	truncate_chars(&mut context, max_context_chars);

	let endpoint_successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count() as u32;
	let metadata = EvidenceMetadata {
		partitions: partitions.to_vec(),
		endpoint_successes,
		endpoint_failures: outcomes.len() as u32 - endpoint_successes,
		similarity_hits: hits.len() as u32,
		sources: outcomes
			.iter()
			.map(|outcome| SourceRecord {
				tag: outcome.tag.clone(),
				path: outcome.path.clone(),
				ok: outcome.is_ok(),
				elapsed_ms: outcome.elapsed.as_millis() as u64,
			})
			.collect(),
	};

	EvidenceBundle { context, metadata }
}

fn endpoint_sections(outcomes: &[FetchOutcome]) -> Vec<String> {
	outcomes
		.iter()
		.filter_map(|outcome| {
			let payload = outcome.result.as_ref().ok()?;
			let body = match serde_json::to_string_pretty(payload) {
				Ok(body) => body,
				Err(_) => payload.to_string(),
			};

			Some(format!(
				"--- SOURCE: {} ({}) ---\n#elapsed: {:.2}s\n{}",
				outcome.tag,
				outcome.path,
				outcome.elapsed.as_secs_f64(),
				body
			))
		})
		.collect()
}

fn snippet_sections(hits: &[IndexHit], snippet_k: usize) -> Vec<String> {
	hits.iter()
		.take(snippet_k)
		.enumerate()
		.map(|(rank, hit)| {
			format!(
				"--- Match {} ({}) ---\ndistance: {:.4}\n{}",
				rank + 1,
				hit.partition,
				hit.distance,
				hit.text
			)
		})
		.collect()
}

fn truncate_chars(text: &mut String, max_chars: usize) {
	if text.chars().count() <= max_chars {
		return;
	}

	let truncated: String = text.chars().take(max_chars).collect();

	*text = truncated;
	text.push_str("...");
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	fn ok_outcome(tag: &str, path: &str) -> FetchOutcome {
		FetchOutcome {
			tag: tag.to_string(),
			path: path.to_string(),
			result: Ok(serde_json::json!({ "total": 3 })),
			elapsed: Duration::from_millis(12),
		}
	}

	fn err_outcome(tag: &str, path: &str) -> FetchOutcome {
		FetchOutcome {
			tag: tag.to_string(),
			path: path.to_string(),
			result: Err("connection refused".to_string()),
			elapsed: Duration::from_millis(7),
		}
	}

	fn hit(text: &str, distance: f32) -> IndexHit {
		IndexHit { partition: Partition::Units, text: text.to_string(), distance }
	}

	#[test]
	fn endpoint_evidence_comes_first() {
		let bundle = assemble(
			&[Partition::Units],
			&[ok_outcome("UnitsSummary", "/units/summary/")],
			&[hit("unit snippet", 0.1)],
			2,
			10_000,
		);

		assert!(bundle.context.starts_with("--- SOURCE: UnitsSummary"));
		assert!(bundle.context.contains("--- SEMANTIC MATCHES (short) ---"));
	}

	#[test]
	fn falls_back_to_similarity_when_all_endpoints_fail() {
		let bundle = assemble(
			&[Partition::Units],
			&[err_outcome("UnitsSummary", "/units/summary/"), err_outcome("Summary", "/summary")],
			&[hit("unit snippet", 0.1)],
			2,
			10_000,
		);

		assert!(bundle.context.starts_with("--- Match 1"));
		assert!(!bundle.context.contains("--- SOURCE:"));
		assert_eq!(bundle.metadata.endpoint_successes, 0);
		assert_eq!(bundle.metadata.endpoint_failures, 2);
	}

	#[test]
	fn snippet_block_is_capped() {
		let hits: Vec<IndexHit> =
			(0..10).map(|idx| hit(&format!("snippet {idx}"), idx as f32)).collect();
		let bundle = assemble(&[Partition::Units], &[], &hits, 2, 10_000);

		assert!(bundle.context.contains("--- Match 2"));
		assert!(!bundle.context.contains("--- Match 3"));
		assert_eq!(bundle.metadata.similarity_hits, 10);
	}

	#[test]
	fn context_is_bounded() {
		let long = "x".repeat(500);
		let bundle = assemble(&[Partition::Units], &[], &[hit(&long, 0.0)], 1, 100);

		assert_eq!(bundle.context.chars().count(), 103);
		assert!(bundle.context.ends_with("..."));
	}

	#[test]
	fn empty_inputs_make_an_empty_bundle() {
		let bundle = assemble(&[Partition::Units], &[], &[], 2, 1_000);

		assert!(bundle.is_empty());
	}
}
