//! Linear temperature derating of string values.
//!
//! Projects STC values to the coldest and hottest expected operating
//! temperatures with fixed percent-per-degree coefficients. Only voltage is
//! derated; current and power pass through at their STC values.

use super::string::StringProfile;

/// Voltage temperature coefficient (%/°C).
pub const VOLTAGE_TEMP_COEFFICIENT: f64 = -0.3;
/// Current temperature coefficient (%/°C). Not applied to current.
pub const CURRENT_TEMP_COEFFICIENT: f64 = 0.04;
/// Coldest expected operating temperature (°C).
pub const MIN_OPERATING_TEMP: f64 = -10.0;
/// Hottest expected operating temperature (°C).
pub const MAX_OPERATING_TEMP: f64 = 70.0;
/// Standard test condition temperature (°C).
pub const STC_TEMP: f64 = 25.0;

/// Temperature-adjusted string values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeratedProfile {
    /// Voltage at the coldest operating temperature (V).
    pub max_voltage: f64,
    /// Voltage at the hottest operating temperature (V).
    pub min_voltage: f64,
    pub amps: f64,
    pub watts: f64,
}

fn voltage_at(volts: f64, temp: f64) -> f64 {
    volts * (1.0 + (temp - STC_TEMP) * VOLTAGE_TEMP_COEFFICIENT / 100.0)
}

/// Derates an STC profile to worst-case operating voltages.
pub fn derate(profile: &StringProfile) -> DeratedProfile {
    DeratedProfile {
        max_voltage: voltage_at(profile.volts, MIN_OPERATING_TEMP),
        min_voltage: voltage_at(profile.volts, MAX_OPERATING_TEMP),
        amps: profile.amps,
        watts: profile.watts,
    }
}
