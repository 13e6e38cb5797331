use serde::Serialize;
use time::OffsetDateTime;

use crate::{
	entity::{self, Entities},
	partition::Partition,
};

/// Routing output for one query: which partitions to consult and which
/// entities were recognized. The partition list is never empty.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDecision {
	pub partitions: Vec<Partition>,
	pub entities: Entities,
}

pub fn route(query: &str, now: OffsetDateTime) -> RouteDecision {
	RouteDecision { partitions: detect_partitions(query), entities: entity::extract(query, now) }
}

/// Selects every partition with at least one whole-word keyword match,
/// falling back to the default partition on unrouted queries.
pub fn detect_partitions(query: &str) -> Vec<Partition> {
	let lowered = query.to_lowercase();
	let selected: Vec<Partition> = Partition::ALL
		.into_iter()
		.filter(|partition| {
			partition.keywords().iter().any(|keyword| entity::contains_word(&lowered, keyword))
		})
		.collect();

	if selected.is_empty() { vec![Partition::DEFAULT] } else { selected }
}
