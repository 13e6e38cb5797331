use ahash::AHashSet;

use hearth_domain::{Partition, RouteDecision};

/// One remote read to attempt: a tag for provenance, the endpoint path, and
/// its query parameters. Jobs are compared by `(path, params)` only; the
/// tag is display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointJob {
	pub tag: String,
	pub path: String,
	pub params: Vec<(String, String)>,
}

impl EndpointJob {
	pub fn new(tag: &str, path: impl Into<String>) -> Self {
		Self { tag: tag.to_string(), path: path.into(), params: Vec::new() }
	}

	pub fn with_params(tag: &str, path: impl Into<String>, params: Vec<(String, String)>) -> Self {
		Self { tag: tag.to_string(), path: path.into(), params }
	}
}

/// Maps a route decision onto the endpoint menu of each selected partition.
/// Summary endpoints are always included; entity-scoped endpoints only when
/// the entity was extracted. Two global fallbacks keep the evidence bundle
/// from emptying on unmatched queries. Pure; no I/O.
pub fn build_jobs(route: &RouteDecision, query: &str) -> Vec<EndpointJob> {
	let mut jobs = Vec::new();
	let entities = &route.entities;
	let unit = entities.unit_id.as_deref();
	let tenant = entities.tenant_id.as_deref();

	for &partition in &route.partitions {
		match partition {
			Partition::Units => {
				jobs.push(EndpointJob::new("UnitsSummary", "/units/summary/"));
				if let Some(unit) = unit {
					jobs.push(EndpointJob::new("Unit", format!("/units/{unit}")));
					jobs.push(EndpointJob::new("UnitTenant", format!("/units/{unit}/tenant")));
					jobs.push(EndpointJob::new("UnitBills", format!("/units/{unit}/bills")));
					jobs.push(EndpointJob::new(
						"UnitMaintenance",
						format!("/units/{unit}/maintenance"),
					));
					jobs.push(EndpointJob::new("UnitAmenities", format!("/units/{unit}/amenities")));
				}
			},
			Partition::Tenants =>
				if let Some(tenant) = tenant {
					jobs.push(EndpointJob::new("Tenants", "/tenants/"));
					jobs.push(EndpointJob::new("Tenant", format!("/tenants/{tenant}")));
					jobs.push(EndpointJob::new(
						"TenantContract",
						format!("/tenants/{tenant}/contract"),
					));
					jobs.push(EndpointJob::new("TenantBills", format!("/tenants/{tenant}/bills")));
					jobs.push(EndpointJob::new("TenantRent", format!("/tenants/{tenant}/rent")));
					jobs.push(EndpointJob::new(
						"TenantMaintenance",
						format!("/tenants/{tenant}/maintenance"),
					));
				} else if let Some(unit) = unit {
					jobs.push(EndpointJob::new("Tenants", "/tenants/"));
					jobs.push(EndpointJob::new("TenantByUnit", format!("/tenants/unit/{unit}")));
				} else {
					jobs.push(EndpointJob::new("Tenants", "/tenants/"));
					jobs.push(EndpointJob::with_params(
						"TenantSearch",
						"/tenants/search/",
						vec![("q".to_string(), query.to_string())],
					));
				},
			Partition::Amenities =>
				if let Some(amenity) = entities.amenity_id.as_deref() {
					jobs.push(EndpointJob::new("Amenity", format!("/amenities/{amenity}")));
				} else if let Some(unit) = unit {
					jobs.push(EndpointJob::new(
						"AmenitiesForUnit",
						format!("/amenities/units/{unit}"),
					));
				} else {
					jobs.push(EndpointJob::new("Amenities", "/amenities/"));
					jobs.push(EndpointJob::with_params(
						"AmenitySearch",
						"/amenities/search/",
						vec![("q".to_string(), query.to_string())],
					));
				},
			Partition::Maintenance => {
				jobs.push(EndpointJob::new("MaintenanceSummary", "/maintenance/summary/"));
				jobs.push(EndpointJob::new("MaintPending", "/maintenance/pending/"));
				jobs.push(EndpointJob::new("MaintResolved", "/maintenance/resolved/"));
				if let Some(unit) = unit {
					jobs.push(EndpointJob::new(
						"MaintenanceForUnit",
						format!("/maintenance/unit/{unit}"),
					));
				}
			},
			Partition::Contracts => {
				jobs.push(EndpointJob::new("Contracts", "/contracts/"));
				jobs.push(EndpointJob::new("ContractsExpiring", "/contracts/expiring/"));
				if let Some(tenant) = tenant {
					jobs.push(EndpointJob::new(
						"ContractByTenant",
						format!("/contracts/tenant/{tenant}"),
					));
				}
			},
			Partition::Rent => {
				jobs.push(EndpointJob::new("RentMonthly", "/rent/summary/monthly"));
				jobs.push(EndpointJob::new("RentUnpaid", "/rent/unpaid/"));
				if let Some(unit) = unit {
					jobs.push(EndpointJob::new("RentForUnit", format!("/rent/unit/{unit}")));
					if let Some(period) = entities.period.as_deref() {
						jobs.push(EndpointJob::new(
							"RentUnitMonth",
							format!("/rent/unit/{unit}/month/{period}"),
						));
					}
				}
				if let Some(tenant) = tenant {
					jobs.push(EndpointJob::new("RentByTenant", format!("/rent/tenant/{tenant}")));
				}
			},
			Partition::ElecBill | Partition::WaterBill => {
				jobs.push(EndpointJob::new("BillsSummary", "/bills/summary/"));
				jobs.push(EndpointJob::new("ElectricBills", "/bills/electric/"));
				jobs.push(EndpointJob::new("WaterBills", "/bills/water/"));
				if let Some(bill) = entities.bill_id.as_deref() {
					jobs.push(EndpointJob::new("ElectricBill", format!("/bills/electric/{bill}")));
					jobs.push(EndpointJob::new("WaterBill", format!("/bills/water/{bill}")));
				}
				if let Some(unit) = unit {
					jobs.push(EndpointJob::new("BillsForUnit", format!("/bills/unit/{unit}")));
				}
			},
			Partition::Expenses => {
				jobs.push(EndpointJob::new("ExpensesByCategory", "/expenses/summary/by-category"));
				jobs.push(EndpointJob::new("Expenses", "/expenses/"));
				jobs.push(EndpointJob::new("ExpenseCategories", "/expenses/categories/"));
			},
			Partition::Staff => {
				jobs.push(EndpointJob::new("StaffSummary", "/staff/summary/"));
				jobs.push(EndpointJob::new("StaffRoles", "/staff/roles/"));
				if let Some(role) = entities.role_keywords.first() {
					jobs.push(EndpointJob::new("StaffByRole", format!("/staff/role/{role}")));
				}
			},
		}
	}

	jobs.push(EndpointJob::new("PropertySummary", "/summary"));
	jobs.push(EndpointJob::new("BillsSummary", "/bills/summary/"));

	dedupe(jobs)
}

/// Exact `(path, params)` dedupe, first occurrence wins.
fn dedupe(jobs: Vec<EndpointJob>) -> Vec<EndpointJob> {
	let mut seen = AHashSet::new();

	jobs.into_iter().filter(|job| seen.insert((job.path.clone(), job.params.clone()))).collect()
}
