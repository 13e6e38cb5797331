use regex::Regex;

/// Expands a raw query into phrase variants for centroid embedding. The
/// output always contains the original query, is deduplicated, and is
/// sorted so identical input yields byte-identical output.
pub fn expand(query: &str) -> Vec<String> {
	let mut expansions = vec![query.to_string()];
	let lowered = query.to_lowercase();

	if let Some(unit_id) = Regex::new(r"(?i)\bU-\d{3}\b")
		.ok()
		.and_then(|re| re.find(query))
		.map(|m| m.as_str().to_uppercase())
	{
		expansions.push(format!("Unit {unit_id}"));
		expansions.push(format!("Apartment {unit_id}"));
		expansions.push(format!("Property {unit_id}"));
	}
	if lowered.contains("rent") {
		expansions.extend(["lease", "rental fee", "monthly rent"].map(str::to_string));
	}
	if lowered.contains("tenant") {
		expansions.extend(["occupant", "resident", "renter"].map(str::to_string));
	}

	expansions.sort();
	expansions.dedup();

	expansions
}
