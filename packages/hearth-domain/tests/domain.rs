use time::macros::datetime;

use hearth_domain::{Partition, expand, route, vector};

#[test]
fn every_query_routes_somewhere() {
	let queries = [
		"What floor is unit U-101 on?",
		"who pays the most rent",
		"random words entirely",
		"",
		"!!!",
	];

	for query in queries {
		assert!(!route::detect_partitions(query).is_empty(), "{query:?} routed nowhere");
	}
}

#[test]
fn unit_floor_scenario_routes_and_extracts() {
	let decision = route::route("What floor is unit U-101 on?", datetime!(2025-09-15 0:00 UTC));

	assert!(decision.partitions.contains(&Partition::Units));
	assert_eq!(decision.entities.unit_id.as_deref(), Some("U-101"));

	let expansions = expand::expand("What floor is unit U-101 on?");

	assert!(expansions.contains(&"What floor is unit U-101 on?".to_string()));
	assert!(expansions.contains(&"Unit U-101".to_string()));
}

#[test]
fn expansion_is_sorted_deduplicated_and_stable() {
	let first = expand::expand("rent for tenant T-001 in U-101");
	let second = expand::expand("rent for tenant T-001 in U-101");

	assert_eq!(first, second);

	let mut normalized = first.clone();

	normalized.sort();
	normalized.dedup();

	assert_eq!(first, normalized);
}

#[test]
fn centroid_keeps_dimensionality() {
	let vectors = vec![vec![1.0_f32, 0.0, -1.0]; 8];
	let centroid = vector::mean(&vectors);

	assert_eq!(centroid.len(), 3);
	assert_eq!(centroid, vec![1.0_f32, 0.0, -1.0]);
}
