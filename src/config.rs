//! TOML design files and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{Panel, common_appliance};
use crate::design::{Appliance, DesignSession, Location, Topology};

/// Top-level design parsed from TOML.
///
/// Every section is optional. Load from TOML with
/// [`DesignConfig::from_toml_file`] or pick a built-in design with
/// [`DesignConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignConfig {
    /// Solar resource; no location means no solar production.
    #[serde(default)]
    pub location: Option<LocationConfig>,
    /// Placed panels, in placement order.
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
    #[serde(default)]
    pub strings: Vec<StringConfig>,
    #[serde(default)]
    pub appliances: Vec<ApplianceConfig>,
    #[serde(default)]
    pub battery: Option<BatteryConfig>,
    /// DC-DC charger fed by the vehicle alternator.
    #[serde(default)]
    pub charger: Option<ChargerConfig>,
    /// Explicit inverter choice; the recommendation is used when absent.
    #[serde(default)]
    pub inverter: Option<InverterConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    /// Equivalent hours of full-rated sun per day (0-24).
    pub peak_sun_hours: f64,
}

/// A placed panel with its full electrical and physical spec.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelConfig {
    pub id: String,
    pub model: String,
    pub watts: f64,
    pub volts: f64,
    pub amps: f64,
    /// Physical width (cm).
    pub width: f64,
    /// Physical height (cm).
    pub height: f64,
}

impl PanelConfig {
    fn to_panel(&self) -> Panel {
        Panel {
            id: self.id.clone(),
            model: self.model.clone(),
            watts: self.watts,
            volts: self.volts,
            amps: self.amps,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringConfig {
    /// Display name; defaults to `String <n>`.
    #[serde(default)]
    pub name: Option<String>,
    pub topology: Topology,
    /// Member panel ids. Members are wired in placement order.
    pub panels: Vec<String>,
    /// Catalog id of the assigned MPPT controller.
    #[serde(default)]
    pub mppt: Option<String>,
}

/// An appliance entry. `watts` and `hours_per_day` fall back to the
/// common-appliance table when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceConfig {
    pub name: String,
    #[serde(default)]
    pub watts: Option<f64>,
    #[serde(default)]
    pub hours_per_day: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl ApplianceConfig {
    fn resolved_watts(&self) -> Option<f64> {
        self.watts
            .or_else(|| common_appliance(&self.name).map(|c| c.watts))
    }

    fn resolved_hours(&self) -> Option<f64> {
        self.hours_per_day
            .or_else(|| common_appliance(&self.name).map(|c| c.default_hours))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryConfig {
    /// Catalog battery id.
    pub id: String,
    /// Batteries in parallel (>= 1).
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChargerConfig {
    /// Catalog charger id.
    pub id: String,
    /// Hours of driving per day (0-24).
    #[serde(default)]
    pub driving_hours: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InverterConfig {
    pub id: String,
}

fn default_quantity() -> u32 {
    1
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"strings[0].panels"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

const WEEKENDER: &str = include_str!("../designs/weekender.toml");
const FULL_TIME: &str = include_str!("../designs/full_time.toml");

impl DesignConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["weekender", "full_time"];

    /// Loads a design from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "weekender" => Self::from_toml_str(WEEKENDER),
            "full_time" => Self::from_toml_str(FULL_TIME),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a design from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("design", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a design from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the design is valid. Catalog ids are not
    /// checked here; unknown ids surface in the report instead.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(loc) = &self.location {
            if !(0.0..=24.0).contains(&loc.peak_sun_hours) {
                errors.push(ConfigError::new(
                    "location.peak_sun_hours",
                    "must be in [0, 24]",
                ));
            }
        }

        let mut panel_ids = HashSet::new();
        for (i, p) in self.panels.iter().enumerate() {
            if p.id.trim().is_empty() {
                errors.push(ConfigError::new(format!("panels[{i}].id"), "must not be empty"));
            } else if !panel_ids.insert(p.id.as_str()) {
                errors.push(ConfigError::new(
                    format!("panels[{i}].id"),
                    format!("duplicate panel id \"{}\"", p.id),
                ));
            }
            for (name, value) in [
                ("watts", p.watts),
                ("volts", p.volts),
                ("amps", p.amps),
                ("width", p.width),
                ("height", p.height),
            ] {
                if value <= 0.0 {
                    errors.push(ConfigError::new(format!("panels[{i}].{name}"), "must be > 0"));
                }
            }
        }

        for (i, s) in self.strings.iter().enumerate() {
            let field = format!("strings[{i}].panels");
            if s.panels.len() < 2 {
                errors.push(ConfigError::new(&field, "a string needs at least 2 panels"));
            }
            let mut seen = HashSet::new();
            for id in &s.panels {
                if !panel_ids.contains(id.as_str()) {
                    errors.push(ConfigError::new(&field, format!("unknown panel id \"{id}\"")));
                }
                if !seen.insert(id.as_str()) {
                    errors.push(ConfigError::new(&field, format!("panel \"{id}\" listed twice")));
                }
            }
        }

        for (i, a) in self.appliances.iter().enumerate() {
            match a.resolved_watts() {
                Some(w) if w < 0.0 => errors.push(ConfigError::new(
                    format!("appliances[{i}].watts"),
                    "must be >= 0",
                )),
                Some(_) => {}
                None => errors.push(ConfigError::new(
                    format!("appliances[{i}].watts"),
                    format!("required: \"{}\" is not a common appliance", a.name),
                )),
            }
            match a.resolved_hours() {
                Some(h) if !(0.0..=24.0).contains(&h) => errors.push(ConfigError::new(
                    format!("appliances[{i}].hours_per_day"),
                    "must be in [0, 24]",
                )),
                Some(_) => {}
                None => errors.push(ConfigError::new(
                    format!("appliances[{i}].hours_per_day"),
                    format!("required: \"{}\" is not a common appliance", a.name),
                )),
            }
        }

        if let Some(b) = &self.battery {
            if b.quantity == 0 {
                errors.push(ConfigError::new("battery.quantity", "must be >= 1"));
            }
        }

        if let Some(c) = &self.charger {
            if !(0.0..=24.0).contains(&c.driving_hours) {
                errors.push(ConfigError::new("charger.driving_hours", "must be in [0, 24]"));
            }
        }

        errors
    }

    /// Replays the design as session edits.
    ///
    /// Panels are placed in file order, then each string is created from a
    /// fresh selection of its members.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` hit while replaying. A design that
    /// passes [`validate`](Self::validate) replays without error.
    pub fn build_session(&self) -> Result<DesignSession, ConfigError> {
        let mut session = DesignSession::new();

        if let Some(loc) = &self.location {
            session = session.set_location(Location {
                peak_sun_hours: loc.peak_sun_hours,
            });
        }

        for (i, p) in self.panels.iter().enumerate() {
            session = session
                .add_panel(p.to_panel())
                .map_err(|e| ConfigError::new(format!("panels[{i}].id"), e.to_string()))?;
        }

        for (i, s) in self.strings.iter().enumerate() {
            session = s
                .panels
                .iter()
                .fold(session, |acc, id| acc.toggle_panel_selection(id))
                .create_string(s.topology, s.name.as_deref(), s.mppt.as_deref())
                .map_err(|e| ConfigError::new(format!("strings[{i}].panels"), e.to_string()))?;
        }

        for (i, a) in self.appliances.iter().enumerate() {
            let (Some(watts), Some(hours_per_day)) = (a.resolved_watts(), a.resolved_hours())
            else {
                return Err(ConfigError::new(
                    format!("appliances[{i}]"),
                    format!("\"{}\" needs watts and hours_per_day", a.name),
                ));
            };
            session = session.add_appliance(Appliance {
                id: format!("appliance-{}", i + 1),
                name: a.name.clone(),
                watts,
                hours_per_day,
                quantity: a.quantity,
            });
        }

        if let Some(b) = &self.battery {
            session = session.select_battery(&b.id, b.quantity);
        }
        if let Some(c) = &self.charger {
            session = session
                .select_charger(Some(c.id.as_str()))
                .set_driving_hours(c.driving_hours);
        }
        if let Some(inv) = &self.inverter {
            session = session.select_inverter(Some(inv.id.as_str()));
        }

        Ok(session)
    }
}
