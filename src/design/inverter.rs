//! Inverter sizing against peak load, and DC-DC charging contribution.

use std::fmt;

use crate::catalog::{Charger, Inverter, Listing, MatchOutcome};

/// Surge rating required per watt of peak load.
pub const SURGE_FACTOR: f64 = 2.0;
/// Highest load percentage at which an inverter is still offered.
pub const SELECTABLE_LOAD_PCT: f64 = 90.0;

/// How heavily an inverter is loaded by the peak draw.
///
/// Unlike MPPT loads there is no separate incompatible band above 100 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverterStatus {
    /// Above 90 %.
    Overloaded,
    /// Above 60 %.
    Optimal,
    RoomForGrowth,
}

impl InverterStatus {
    pub fn from_percentage(pct: f64) -> Self {
        if pct > 90.0 {
            InverterStatus::Overloaded
        } else if pct > 60.0 {
            InverterStatus::Optimal
        } else {
            InverterStatus::RoomForGrowth
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            InverterStatus::Overloaded => "Overloaded - Consider larger inverter",
            InverterStatus::Optimal => "Optimal Load",
            InverterStatus::RoomForGrowth => "Room for Growth",
        }
    }
}

impl fmt::Display for InverterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InverterStatus::Overloaded => write!(f, "overloaded"),
            InverterStatus::Optimal => write!(f, "optimal"),
            InverterStatus::RoomForGrowth => write!(f, "room-for-growth"),
        }
    }
}

/// Load of the peak draw on one inverter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverterLoad {
    pub percentage: f64,
    pub status: InverterStatus,
}

impl InverterLoad {
    /// Whether the inverter should be offered for this load.
    pub fn is_selectable(&self) -> bool {
        self.percentage <= SELECTABLE_LOAD_PCT
    }
}

/// Classifies `peak_load_w` against the continuous and surge ratings.
pub fn load(inverter: &Inverter, peak_load_w: f64) -> InverterLoad {
    let continuous_pct = peak_load_w / inverter.watts * 100.0;
    let peak_pct = peak_load_w / inverter.peak_watts * 100.0;
    let percentage = continuous_pct.max(peak_pct);
    InverterLoad {
        percentage,
        status: InverterStatus::from_percentage(percentage),
    }
}

/// Conversion loss at peak load (W).
pub fn efficiency_loss_w(inverter: &Inverter, peak_load_w: f64) -> f64 {
    (100.0 - inverter.efficiency) * peak_load_w * 0.01
}

/// First inverter in catalog order that carries `peak_load_w` continuously
/// with [`SURGE_FACTOR`] surge headroom.
pub fn recommend(listing: &Listing<Inverter>, peak_load_w: f64) -> MatchOutcome<&Inverter> {
    match listing {
        Listing::Unavailable { .. } => MatchOutcome::CatalogUnavailable,
        Listing::Available(inverters) => inverters
            .iter()
            .find(|i| i.watts >= peak_load_w && i.peak_watts >= peak_load_w * SURGE_FACTOR)
            .map_or(MatchOutcome::NoMatch, MatchOutcome::Found),
    }
}

/// Energy a DC-DC charger delivers during `driving_hours` of driving (Wh).
pub fn daily_charge_wh(charger: &Charger, driving_hours: f64) -> f64 {
    charger.max_output_current * charger.output_voltage * charger.efficiency * driving_hours
}
