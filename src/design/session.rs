//! Design session state and the edits that evolve it.
//!
//! A [`DesignSession`] is a plain value. Every edit takes the session by value
//! and returns the next one, so a caller can keep earlier states around and
//! tests need no UI harness.

use std::collections::BTreeMap;

use tracing::debug;

use super::energy::{Appliance, EnergyBalance, Location};
use super::string::{PanelString, StringProfile, Topology, aggregate};
use crate::catalog::Panel;
use crate::error::DesignError;

/// Minimum number of panels in a string.
pub const MIN_STRING_PANELS: usize = 2;

/// Partial update of a placed panel's ratings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelUpdate {
    pub model: Option<String>,
    pub watts: Option<f64>,
    pub volts: Option<f64>,
    pub amps: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// The chosen battery bank.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySelection {
    pub battery_id: String,
    /// Batteries in parallel (at least 1).
    pub quantity: u32,
}

/// Everything the user has placed and chosen so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignSession {
    panels: Vec<Panel>,
    selected: Vec<String>,
    strings: Vec<PanelString>,
    mppt_assignments: BTreeMap<String, String>,
    appliances: Vec<Appliance>,
    location: Option<Location>,
    battery: Option<BatterySelection>,
    charger_id: Option<String>,
    driving_hours: f64,
    inverter_id: Option<String>,
    next_string_seq: u32,
}

impl DesignSession {
    pub fn new() -> Self {
        Self::default()
    }

    // --- panels ---

    /// Places a panel.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::InvalidPanel` if any rating or dimension is not
    /// positive, or `DesignError::DuplicatePanel` if a panel with the same id
    /// is already placed.
    pub fn add_panel(mut self, panel: Panel) -> Result<Self, DesignError> {
        if !panel.is_valid() {
            return Err(DesignError::InvalidPanel { id: panel.id });
        }
        if self.panel(&panel.id).is_some() {
            return Err(DesignError::DuplicatePanel { id: panel.id });
        }
        self.panels.push(panel);
        Ok(self)
    }

    /// Applies `update` to the panel with `id`.
    ///
    /// Unknown ids are ignored, as are updates that would leave a rating or
    /// dimension at or below zero.
    #[must_use]
    pub fn update_panel(mut self, id: &str, update: PanelUpdate) -> Self {
        let Some(p) = self.panels.iter_mut().find(|p| p.id == id) else {
            return self;
        };
        let updated = Panel {
            id: p.id.clone(),
            model: update.model.unwrap_or_else(|| p.model.clone()),
            watts: update.watts.unwrap_or(p.watts),
            volts: update.volts.unwrap_or(p.volts),
            amps: update.amps.unwrap_or(p.amps),
            width: update.width.unwrap_or(p.width),
            height: update.height.unwrap_or(p.height),
        };
        if updated.is_valid() {
            *p = updated;
        } else {
            debug!(panel = id, "invalid panel update ignored");
        }
        self
    }

    /// Removes a panel from the roof, the selection, and every string.
    ///
    /// Strings left with fewer than [`MIN_STRING_PANELS`] panels are removed
    /// along with their controller assignment.
    #[must_use]
    pub fn remove_panel(mut self, id: &str) -> Self {
        self.panels.retain(|p| p.id != id);
        self.selected.retain(|pid| pid != id);

        let mut dropped = Vec::new();
        self.strings.retain_mut(|s| {
            s.panel_ids.retain(|pid| pid != id);
            let keep = s.panel_ids.len() >= MIN_STRING_PANELS;
            if !keep {
                dropped.push(s.id.clone());
            }
            keep
        });
        for string_id in &dropped {
            debug!(string = %string_id, panel = id, "string dissolved by panel removal");
            self.mppt_assignments.remove(string_id);
        }
        self
    }

    /// Adds or removes `id` from the selection used by [`Self::create_string`].
    #[must_use]
    pub fn toggle_panel_selection(mut self, id: &str) -> Self {
        if let Some(pos) = self.selected.iter().position(|pid| pid == id) {
            self.selected.remove(pos);
        } else if self.panel(id).is_some() {
            self.selected.push(id.to_string());
        }
        self
    }

    // --- strings ---

    /// Joins the selected panels into a new string and clears the selection.
    ///
    /// Member order follows placement order. The string is named `name`, or
    /// `String <n>` when no name is given, and is assigned
    /// `recommended_mppt` when one is given.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::TooFewPanels` if fewer than
    /// [`MIN_STRING_PANELS`] panels are selected; the session is unchanged.
    pub fn create_string(
        mut self,
        topology: Topology,
        name: Option<&str>,
        recommended_mppt: Option<&str>,
    ) -> Result<Self, DesignError> {
        let panel_ids: Vec<String> = self
            .panels
            .iter()
            .filter(|p| self.selected.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();
        if panel_ids.len() < MIN_STRING_PANELS {
            return Err(DesignError::TooFewPanels {
                count: panel_ids.len(),
            });
        }

        self.next_string_seq += 1;
        let seq = self.next_string_seq;
        let id = format!("string-{seq}");
        let name = name.map_or_else(|| format!("String {seq}"), str::to_string);
        debug!(string = %id, %name, %topology, panels = panel_ids.len(), "string created");

        if let Some(mppt_id) = recommended_mppt {
            self.mppt_assignments.insert(id.clone(), mppt_id.to_string());
        }
        self.strings.push(PanelString {
            id,
            name,
            panel_ids,
            topology,
        });
        self.selected.clear();
        Ok(self)
    }

    /// Deletes a string and its controller assignment.
    #[must_use]
    pub fn delete_string(mut self, string_id: &str) -> Self {
        self.strings.retain(|s| s.id != string_id);
        self.mppt_assignments.remove(string_id);
        self
    }

    /// Assigns a controller to a string, replacing any earlier assignment.
    /// Unknown strings are ignored.
    #[must_use]
    pub fn assign_mppt(mut self, string_id: &str, mppt_id: &str) -> Self {
        if self.string(string_id).is_some() {
            self.mppt_assignments
                .insert(string_id.to_string(), mppt_id.to_string());
        } else {
            debug!(string = string_id, "assignment to unknown string ignored");
        }
        self
    }

    // --- loads and storage ---

    #[must_use]
    pub fn add_appliance(mut self, appliance: Appliance) -> Self {
        self.appliances.push(appliance);
        self
    }

    #[must_use]
    pub fn remove_appliance(mut self, id: &str) -> Self {
        self.appliances.retain(|a| a.id != id);
        self
    }

    #[must_use]
    pub fn set_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Chooses a battery bank; `quantity` is raised to at least 1.
    #[must_use]
    pub fn select_battery(mut self, battery_id: &str, quantity: u32) -> Self {
        self.battery = Some(BatterySelection {
            battery_id: battery_id.to_string(),
            quantity: quantity.max(1),
        });
        self
    }

    #[must_use]
    pub fn select_charger(mut self, charger_id: Option<&str>) -> Self {
        self.charger_id = charger_id.map(str::to_string);
        self
    }

    #[must_use]
    pub fn set_driving_hours(mut self, hours: f64) -> Self {
        self.driving_hours = hours;
        self
    }

    #[must_use]
    pub fn select_inverter(mut self, inverter_id: Option<&str>) -> Self {
        self.inverter_id = inverter_id.map(str::to_string);
        self
    }

    // --- queries ---

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn selected_panels(&self) -> &[String] {
        &self.selected
    }

    pub fn strings(&self) -> &[PanelString] {
        &self.strings
    }

    pub fn string(&self, id: &str) -> Option<&PanelString> {
        self.strings.iter().find(|s| s.id == id)
    }

    /// Controller assigned to `string_id`, if any.
    pub fn assignment(&self, string_id: &str) -> Option<&str> {
        self.mppt_assignments.get(string_id).map(String::as_str)
    }

    pub fn appliances(&self) -> &[Appliance] {
        &self.appliances
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Peak sun hours of the location, or 0 when none is set.
    pub fn peak_sun_hours(&self) -> f64 {
        self.location.map_or(0.0, |l| l.peak_sun_hours)
    }

    pub fn battery(&self) -> Option<&BatterySelection> {
        self.battery.as_ref()
    }

    pub fn charger_id(&self) -> Option<&str> {
        self.charger_id.as_deref()
    }

    pub fn driving_hours(&self) -> f64 {
        self.driving_hours
    }

    pub fn inverter_id(&self) -> Option<&str> {
        self.inverter_id.as_deref()
    }

    /// Current member panels of `string`, resolved by id.
    pub fn string_panels<'a>(&'a self, string: &'a PanelString) -> impl Iterator<Item = &'a Panel> {
        string.panel_ids.iter().filter_map(|id| self.panel(id))
    }

    /// Electrical profile of a string from its current panels.
    pub fn string_profile(&self, string_id: &str) -> Option<StringProfile> {
        let string = self.string(string_id)?;
        Some(aggregate(self.string_panels(string), string.topology))
    }

    /// Rated power of every placed panel (W).
    pub fn total_panel_watts(&self) -> f64 {
        self.panels.iter().map(|p| p.watts).sum()
    }

    /// Daily balance of all placed panels against the appliance list.
    pub fn energy_balance(&self) -> EnergyBalance {
        EnergyBalance::compute(&self.appliances, &self.panels, self.peak_sun_hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(id: &str, watts: f64, volts: f64, amps: f64) -> Panel {
        Panel {
            id: id.to_string(),
            model: "test".to_string(),
            watts,
            volts,
            amps,
            width: 100.0,
            height: 50.0,
        }
    }

    fn session_with_panels(n: usize) -> DesignSession {
        (0..n).fold(DesignSession::new(), |s, i| {
            s.add_panel(panel(&format!("p{i}"), 300.0, 40.0, 7.5))
                .expect("unique ids")
        })
    }

    fn select(session: DesignSession, ids: &[&str]) -> DesignSession {
        ids.iter().fold(session, |s, id| s.toggle_panel_selection(id))
    }

    #[test]
    fn duplicate_panel_is_rejected() {
        let err = session_with_panels(1)
            .add_panel(panel("p0", 100.0, 20.0, 5.0))
            .expect_err("duplicate id");
        assert_eq!(err, DesignError::DuplicatePanel { id: "p0".into() });
    }

    #[test]
    fn non_positive_panel_is_rejected() {
        let err = session_with_panels(1)
            .add_panel(panel("bad", -300.0, 0.0, 7.5))
            .expect_err("negative watts");
        assert_eq!(err, DesignError::InvalidPanel { id: "bad".into() });
    }

    #[test]
    fn invalid_update_leaves_panel_unchanged() {
        let before = session_with_panels(2);
        let after = before.clone().update_panel(
            "p1",
            PanelUpdate {
                watts: Some(-50.0),
                volts: Some(20.0),
                ..PanelUpdate::default()
            },
        );
        assert_eq!(after, before);
        assert_eq!(after.total_panel_watts(), 600.0);

        let after = after.update_panel(
            "p1",
            PanelUpdate {
                model: Some("Mono 250W".into()),
                watts: Some(250.0),
                ..PanelUpdate::default()
            },
        );
        assert_eq!(after.panel("p1").map(|p| p.model.as_str()), Some("Mono 250W"));
        assert_eq!(after.total_panel_watts(), 550.0);
    }

    #[test]
    fn string_needs_two_selected_panels() {
        let s = select(session_with_panels(3), &["p0"]);
        let err = s
            .create_string(Topology::Series, None, None)
            .expect_err("one panel is not a string");
        assert_eq!(err, DesignError::TooFewPanels { count: 1 });
    }

    #[test]
    fn create_string_names_assigns_and_clears_selection() {
        let s = select(session_with_panels(4), &["p0", "p1", "p2", "p3"])
            .create_string(Topology::Series, None, Some("mppt-1"))
            .expect("four panels");
        assert_eq!(s.strings().len(), 1);
        let string = &s.strings()[0];
        assert_eq!(string.name, "String 1");
        assert_eq!(s.assignment(&string.id), Some("mppt-1"));
        assert!(s.selected_panels().is_empty());

        let profile = s.string_profile(&string.id).expect("string exists");
        assert_eq!(profile.volts, 160.0);
        assert_eq!(profile.watts, 1200.0);
    }

    #[test]
    fn toggle_twice_deselects() {
        let s = select(session_with_panels(2), &["p0", "p0", "p1"]);
        assert_eq!(s.selected_panels(), ["p1".to_string()]);
    }

    #[test]
    fn selecting_unknown_panel_is_ignored() {
        let s = select(session_with_panels(2), &["nope"]);
        assert!(s.selected_panels().is_empty());
    }

    #[test]
    fn last_assignment_wins() {
        let s = select(session_with_panels(2), &["p0", "p1"])
            .create_string(Topology::Parallel, Some("Roof"), None)
            .expect("two panels");
        let id = s.strings()[0].id.clone();
        let s = s.assign_mppt(&id, "a").assign_mppt(&id, "b");
        assert_eq!(s.assignment(&id), Some("b"));
        assert_eq!(s.assign_mppt("ghost", "a").assignment("ghost"), None);
    }

    #[test]
    fn removing_panel_dissolves_two_panel_string() {
        let s = select(session_with_panels(3), &["p0", "p1"])
            .create_string(Topology::Series, None, Some("m"))
            .expect("two panels");
        let id = s.strings()[0].id.clone();
        let s = s.remove_panel("p1");
        assert!(s.strings().is_empty());
        assert_eq!(s.assignment(&id), None);
        assert_eq!(s.panels().len(), 2);
    }

    #[test]
    fn removing_panel_shrinks_larger_string() {
        let s = select(session_with_panels(3), &["p0", "p1", "p2"])
            .create_string(Topology::Series, None, None)
            .expect("three panels");
        let id = s.strings()[0].id.clone();
        let s = s.remove_panel("p2");
        assert_eq!(s.string(&id).map(|st| st.panel_ids.len()), Some(2));
        assert_eq!(s.string_profile(&id).map(|p| p.volts), Some(80.0));
    }

    #[test]
    fn profile_follows_panel_updates() {
        let s = select(session_with_panels(2), &["p0", "p1"])
            .create_string(Topology::Series, None, None)
            .expect("two panels");
        let id = s.strings()[0].id.clone();
        let s = s.update_panel(
            "p0",
            PanelUpdate {
                volts: Some(20.0),
                ..PanelUpdate::default()
            },
        );
        assert_eq!(s.string_profile(&id).map(|p| p.volts), Some(60.0));
    }

    #[test]
    fn delete_string_drops_assignment() {
        let s = select(session_with_panels(2), &["p0", "p1"])
            .create_string(Topology::Series, None, Some("m"))
            .expect("two panels");
        let id = s.strings()[0].id.clone();
        let s = s.delete_string(&id);
        assert!(s.strings().is_empty());
        assert_eq!(s.assignment(&id), None);
    }

    #[test]
    fn edits_leave_earlier_state_untouched() {
        let before = session_with_panels(2);
        let after = before.clone().remove_panel("p0");
        assert_eq!(before.panels().len(), 2);
        assert_eq!(after.panels().len(), 1);
    }

    #[test]
    fn battery_quantity_is_at_least_one() {
        let s = DesignSession::new().select_battery("b", 0);
        assert_eq!(s.battery().map(|b| b.quantity), Some(1));
    }

    #[test]
    fn energy_balance_counts_every_placed_panel() {
        let s = session_with_panels(3)
            .set_location(Location { peak_sun_hours: 4.0 })
            .add_appliance(Appliance {
                id: "fridge".into(),
                name: "Refrigerator".into(),
                watts: 60.0,
                hours_per_day: 24.0,
                quantity: 1,
            });
        let b = s.energy_balance();
        assert_eq!(s.total_panel_watts(), 900.0);
        assert_eq!(b.daily_production_wh, 3600.0);
        assert_eq!(b.daily_consumption_wh, 1440.0);
        assert!(b.is_net_positive);

        let b = s.remove_appliance("fridge").energy_balance();
        assert_eq!(b.daily_consumption_wh, 0.0);
    }

    #[test]
    fn no_location_means_no_production() {
        assert_eq!(session_with_panels(2).energy_balance().daily_production_wh, 0.0);
    }
}
