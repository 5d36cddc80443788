//! Catalog record types shared by the sizing engine.
//!
//! Field names follow the document-store JSON shape (`_id`, camelCase,
//! `amphhours`, battery `type`), so records deserialize straight from a
//! catalog listing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A solar panel model, or a placed instance of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Catalog or placement identity.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub model: String,
    /// Rated power at STC (W).
    pub watts: f64,
    /// Rated voltage at STC (V).
    pub volts: f64,
    /// Rated current at STC (A).
    pub amps: f64,
    /// Physical width (cm).
    pub width: f64,
    /// Physical height (cm).
    pub height: f64,
}

impl Panel {
    /// Returns a copy of this panel model placed under a new identity.
    pub fn placed(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    /// Returns `true` when every electrical and physical rating is positive.
    pub fn is_valid(&self) -> bool {
        [self.watts, self.volts, self.amps, self.width, self.height]
            .iter()
            .all(|v| *v > 0.0)
    }
}

/// An MPPT solar charge controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mppt {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub model: String,
    /// Maximum PV input voltage (V).
    pub max_volts: f64,
    /// Maximum PV input current (A).
    pub max_amps: f64,
    /// Maximum PV input power (W).
    pub max_watts: f64,
    /// Minimum operating voltage (V). When absent the low-voltage check is
    /// skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_volts: Option<f64>,
}

/// A DC-to-AC inverter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inverter {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub model: String,
    /// Continuous output rating (W).
    pub watts: f64,
    /// Surge output rating (W).
    pub peak_watts: f64,
    /// Conversion efficiency in percent (0-100).
    pub efficiency: f64,
}

/// Battery chemistry; determines the usable depth of discharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryChemistry {
    Flooded,
    #[serde(rename = "AGM")]
    Agm,
    Lithium,
    /// Any chemistry label the catalog carries that is not recognised.
    #[serde(other)]
    Unknown,
}

impl BatteryChemistry {
    /// Fraction of rated capacity that may be drawn before damage.
    pub fn depth_of_discharge(self) -> f64 {
        match self {
            BatteryChemistry::Lithium => 0.8,
            BatteryChemistry::Agm | BatteryChemistry::Flooded | BatteryChemistry::Unknown => 0.5,
        }
    }
}

impl fmt::Display for BatteryChemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatteryChemistry::Flooded => write!(f, "Flooded"),
            BatteryChemistry::Agm => write!(f, "AGM"),
            BatteryChemistry::Lithium => write!(f, "Lithium"),
            BatteryChemistry::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A house battery model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub model: String,
    /// Rated capacity (Ah).
    #[serde(rename = "amphhours")]
    pub amp_hours: f64,
    #[serde(rename = "type")]
    pub chemistry: BatteryChemistry,
}

/// Accepted input voltage window of a DC-DC charger (V).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageRange {
    pub min: f64,
    pub max: f64,
}

/// A DC-DC (alternator) charger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charger {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub model: String,
    pub input_voltage_range: VoltageRange,
    /// Output voltage (V).
    pub output_voltage: f64,
    /// Maximum output current (A).
    pub max_output_current: f64,
    /// Conversion efficiency as a fraction (0-1).
    pub efficiency: f64,
}

impl Charger {
    /// Nominal output power (W).
    pub fn output_watts(&self) -> f64 {
        self.output_voltage * self.max_output_current
    }
}
