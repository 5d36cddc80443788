//! Electrical sizing for campervan solar systems.
//!
//! Panels are grouped into strings, matched against MPPT charge controllers
//! with temperature derating, and the daily energy balance sizes the battery
//! bank, inverter and DC-DC charger.

/// Catalog records, listings, and the fetch boundary.
pub mod catalog;
pub mod config;
/// String, controller, storage and inverter sizing.
pub mod design;
pub mod error;
pub mod io;
