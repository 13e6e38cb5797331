use serde::{Deserialize, Serialize};

/// A logical subset of the property dataset, independently queryable in the
/// similarity index and served by its own family of data endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
	Units,
	Tenants,
	Amenities,
	Maintenance,
	Contracts,
	Rent,
	ElecBill,
	WaterBill,
	Expenses,
	Staff,
}

impl Partition {
	pub const ALL: [Self; 10] = [
		Self::Units,
		Self::Tenants,
		Self::Amenities,
		Self::Maintenance,
		Self::Contracts,
		Self::Rent,
		Self::ElecBill,
		Self::WaterBill,
		Self::Expenses,
		Self::Staff,
	];
	/// Fallback when no keyword routes anywhere.
	pub const DEFAULT: Self = Self::Units;

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Units => "units",
			Self::Tenants => "tenants",
			Self::Amenities => "amenities",
			Self::Maintenance => "maintenance",
			Self::Contracts => "contracts",
			Self::Rent => "rent",
			Self::ElecBill => "elec_bill",
			Self::WaterBill => "water_bill",
			Self::Expenses => "expenses",
			Self::Staff => "staff",
		}
	}

	pub(crate) fn keywords(self) -> &'static [&'static str] {
		match self {
			Self::Units => &[
				"unit", "apartment", "floor", "level", "number", "room", "block", "building", "lot",
			],
			Self::Tenants => &["tenant", "name", "contact", "email", "occupant", "resident"],
			Self::Amenities => &[
				"pool",
				"gym",
				"facility",
				"facilities",
				"amenity",
				"recreation",
				"assigned units",
				"swimming",
			],
			Self::Maintenance => &[
				"issue", "repair", "broken", "clogged", "maintenance", "status", "request", "fix",
			],
			Self::Contracts => &[
				"contract",
				"lease",
				"rent agreement",
				"deposit",
				"start date",
				"end date",
				"monthly rent",
			],
			Self::Rent => &["rent", "payment", "paid", "unpaid", "due", "month"],
			Self::ElecBill => &["electricity", "elec", "bill", "power", "paid", "unpaid"],
			Self::WaterBill => &["water", "bill", "paid", "unpaid"],
			Self::Expenses =>
				&["expense", "cost", "category", "amount", "date", "repair", "maintenance"],
			Self::Staff => &["staff", "employee", "worker", "assigned", "role", "contact"],
		}
	}
}

impl std::fmt::Display for Partition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
