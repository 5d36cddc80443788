//! Daily energy balance and battery runtime sizing.
//!
//! All battery figures assume a 12 V house bus.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Battery, Panel};

/// Nominal house battery bus voltage (V).
pub const BUS_VOLTAGE: f64 = 12.0;

/// An electrical load in the daily consumption profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appliance {
    pub id: String,
    pub name: String,
    /// Power draw of one unit while running (W).
    pub watts: f64,
    pub hours_per_day: f64,
    pub quantity: u32,
}

impl Appliance {
    /// Energy used per day by all units (Wh).
    pub fn daily_wh(&self) -> f64 {
        self.watts * self.hours_per_day * f64::from(self.quantity)
    }

    /// Draw when all units run at once (W).
    pub fn peak_w(&self) -> f64 {
        self.watts * f64::from(self.quantity)
    }
}

/// Solar resource at the design location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Equivalent hours per day of full-rated sun (0-24).
    pub peak_sun_hours: f64,
}

/// Sum of daily appliance energy (Wh).
pub fn daily_consumption_wh(appliances: &[Appliance]) -> f64 {
    appliances.iter().map(Appliance::daily_wh).sum()
}

/// Instantaneous draw with every appliance on (W). Ignores duty cycle.
pub fn peak_load_w(appliances: &[Appliance]) -> f64 {
    appliances.iter().map(Appliance::peak_w).sum()
}

/// Daily solar yield of `panels` at `peak_sun_hours` (Wh).
pub fn daily_production_wh<'a, I>(panels: I, peak_sun_hours: f64) -> f64
where
    I: IntoIterator<Item = &'a Panel>,
{
    panels.into_iter().map(|p| p.watts).sum::<f64>() * peak_sun_hours
}

/// Daily production against consumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    pub daily_production_wh: f64,
    pub daily_consumption_wh: f64,
    /// Production minus consumption; positive is a surplus.
    pub net_energy_wh: f64,
    pub peak_load_w: f64,
    pub is_net_positive: bool,
}

impl EnergyBalance {
    /// Computes the balance for an appliance list, the placed panels, and the
    /// location's sun hours.
    pub fn compute<'a, I>(appliances: &[Appliance], panels: I, peak_sun_hours: f64) -> Self
    where
        I: IntoIterator<Item = &'a Panel>,
    {
        let daily_production_wh = daily_production_wh(panels, peak_sun_hours);
        let daily_consumption_wh = daily_consumption_wh(appliances);
        Self {
            daily_production_wh,
            daily_consumption_wh,
            net_energy_wh: daily_production_wh - daily_consumption_wh,
            peak_load_w: peak_load_w(appliances),
            is_net_positive: daily_production_wh >= daily_consumption_wh,
        }
    }
}

/// Rated capacity of `quantity` batteries in parallel (Ah).
pub fn total_ah(battery: &Battery, quantity: u32) -> f64 {
    battery.amp_hours * f64::from(quantity)
}

/// Capacity usable within the chemistry's depth-of-discharge limit (Ah).
pub fn usable_ah(battery: &Battery, quantity: u32) -> f64 {
    total_ah(battery, quantity) * battery.chemistry.depth_of_discharge()
}

/// How long a battery bank lasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Runtime {
    Hours(f64),
    /// Production covers consumption; the bank never runs down.
    Indefinite,
}

impl Runtime {
    pub fn hours(self) -> Option<f64> {
        match self {
            Runtime::Hours(h) => Some(h),
            Runtime::Indefinite => None,
        }
    }

    pub fn days(self) -> Option<f64> {
        self.hours().map(|h| h / 24.0)
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runtime::Hours(h) => write!(f, "{h:.1} hours ({:.1} days)", h / 24.0),
            Runtime::Indefinite => write!(f, "indefinite"),
        }
    }
}

/// Runtime of a battery bank against the daily energy balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeEstimate {
    pub total_ah: f64,
    pub usable_ah: f64,
    pub daily_consumption_ah: f64,
    /// `None` when nothing is consumed.
    pub without_solar_hours: Option<f64>,
    pub with_solar: Runtime,
    pub is_net_positive: bool,
}

impl RuntimeEstimate {
    /// Sizes `quantity` x `battery` against `balance`.
    pub fn compute(battery: &Battery, quantity: u32, balance: &EnergyBalance) -> Self {
        let total_ah = total_ah(battery, quantity);
        let usable_ah = usable_ah(battery, quantity);
        let daily_consumption_ah = balance.daily_consumption_wh / BUS_VOLTAGE;

        let without_solar_hours =
            (daily_consumption_ah > 0.0).then(|| usable_ah / daily_consumption_ah * 24.0);

        let net_consumption_wh =
            (balance.daily_consumption_wh - balance.daily_production_wh).max(0.0);
        let net_consumption_ah = net_consumption_wh / BUS_VOLTAGE;
        let with_solar = if net_consumption_ah > 0.0 {
            Runtime::Hours(usable_ah / net_consumption_ah * 24.0)
        } else {
            Runtime::Indefinite
        };

        Self {
            total_ah,
            usable_ah,
            daily_consumption_ah,
            without_solar_hours,
            with_solar,
            is_net_positive: balance.is_net_positive,
        }
    }
}
