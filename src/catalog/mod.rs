//! Catalog records and how they are fetched.

/// Demo catalog and common-appliance table.
pub mod builtin;
/// Listings, match outcomes, and the fetch boundary.
pub mod store;
pub mod types;

pub use builtin::{COMMON_APPLIANCES, CommonAppliance, DemoCatalog, common_appliance};
pub use store::{Catalog, CatalogRecord, CatalogSource, JsonCatalog, Listing, MatchOutcome};
pub use types::{Battery, BatteryChemistry, Charger, Inverter, Mppt, Panel, VoltageRange};
