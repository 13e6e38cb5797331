use regex::Regex;
use serde::Serialize;
use time::OffsetDateTime;

const ROLE_KEYWORDS: [&str; 6] =
	["plumber", "electrician", "security", "janitor", "maintenance", "guard"];
const STATUS_KEYWORDS: [&str; 5] = ["paid", "unpaid", "due", "pending", "resolved"];

/// Identifiers and qualifiers pulled out of a raw query. All extraction is
/// regex-based and deterministic for a fixed `now`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
	pub unit_id: Option<String>,
	pub tenant_id: Option<String>,
	pub amenity_id: Option<String>,
	pub bill_id: Option<String>,
	pub period: Option<String>,
	pub status: Option<String>,
	pub role_keywords: Vec<String>,
}

impl Entities {
	pub fn is_empty(&self) -> bool {
		self.unit_id.is_none()
			&& self.tenant_id.is_none()
			&& self.amenity_id.is_none()
			&& self.bill_id.is_none()
			&& self.period.is_none()
			&& self.status.is_none()
			&& self.role_keywords.is_empty()
	}
}

/// `now` is passed in rather than read from the clock so "this month"
/// resolves reproducibly.
pub fn extract(query: &str, now: OffsetDateTime) -> Entities {
	let lowered = query.to_lowercase();

	Entities {
		unit_id: find_upper(query, r"(?i)\bU-\d{3}\b"),
		tenant_id: find_upper(query, r"(?i)\bT-\d{3}\b"),
		amenity_id: find_upper(query, r"(?i)\bA-\d{3}\b"),
		bill_id: find(query, r"(?i)\bBILL[-_ ]?\d+\b"),
		period: extract_period(query, &lowered, now),
		status: STATUS_KEYWORDS
			.iter()
			.find(|status| contains_word(&lowered, status))
			.map(|status| status.to_string()),
		role_keywords: ROLE_KEYWORDS
			.iter()
			.filter(|role| contains_word(&lowered, role))
			.map(|role| role.to_string())
			.collect(),
	}
}

fn extract_period(query: &str, lowered: &str, now: OffsetDateTime) -> Option<String> {
	if let Some(period) = find(query, r"\b(20\d{2}-\d{2})\b") {
		return Some(period);
	}
	if lowered.contains("this month") {
		return Some(format!("{:04}-{:02}", now.year(), now.month() as u8));
	}

	None
}

fn find(text: &str, pattern: &str) -> Option<String> {
	Regex::new(pattern).ok().and_then(|re| re.find(text)).map(|m| m.as_str().to_string())
}

fn find_upper(text: &str, pattern: &str) -> Option<String> {
	find(text, pattern).map(|value| value.to_uppercase())
}

pub(crate) fn contains_word(lowered: &str, word: &str) -> bool {
	Regex::new(&format!(r"\b{}\b", regex::escape(word)))
		.map(|re| re.is_match(lowered))
		.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn extracts_ids_case_insensitively() {
		let entities = extract("bills for u-101 and tenant t-001", datetime!(2025-09-15 0:00 UTC));

		assert_eq!(entities.unit_id.as_deref(), Some("U-101"));
		assert_eq!(entities.tenant_id.as_deref(), Some("T-001"));
		assert_eq!(entities.amenity_id, None);
	}

	#[test]
	fn extracts_bill_id_variants() {
		let now = datetime!(2025-09-15 0:00 UTC);

		assert_eq!(extract("show BILL-42", now).bill_id.as_deref(), Some("BILL-42"));
		assert_eq!(extract("show bill 42", now).bill_id.as_deref(), Some("bill 42"));
	}

	#[test]
	fn extracts_explicit_period() {
		let entities = extract("rent for 2025-09 please", datetime!(2025-10-01 0:00 UTC));

		assert_eq!(entities.period.as_deref(), Some("2025-09"));
	}

	#[test]
	fn resolves_this_month_from_now() {
		let entities = extract("unpaid bills this month", datetime!(2025-09-15 0:00 UTC));

		assert_eq!(entities.period.as_deref(), Some("2025-09"));
		assert_eq!(entities.status.as_deref(), Some("unpaid"));
	}

	#[test]
	fn collects_role_keywords() {
		let entities =
			extract("which plumber or electrician is assigned", datetime!(2025-09-15 0:00 UTC));

		assert_eq!(entities.role_keywords, vec!["plumber".to_string(), "electrician".to_string()]);
	}

	#[test]
	fn plain_query_has_no_entities() {
		assert!(extract("hello there", datetime!(2025-09-15 0:00 UTC)).is_empty());
	}
}
