//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use van_solar_designer::catalog::{Catalog, DemoCatalog, Panel};
use van_solar_designer::design::{Appliance, DesignSession, Location, Topology};

/// Snapshot of the built-in demo catalog.
pub fn demo_catalog() -> Catalog {
    Catalog::fetch(&DemoCatalog)
}

/// A placed panel with a 150 x 70 cm footprint.
pub fn panel(id: &str, watts: f64, volts: f64, amps: f64) -> Panel {
    Panel {
        id: id.to_string(),
        model: format!("Test {watts}W"),
        watts,
        volts,
        amps,
        width: 150.0,
        height: 70.0,
    }
}

pub fn appliance(name: &str, watts: f64, hours_per_day: f64, quantity: u32) -> Appliance {
    Appliance {
        id: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        watts,
        hours_per_day,
        quantity,
    }
}

/// Places `panels` in order, strings all of them with `topology`, and sets
/// 5 peak sun hours.
pub fn strung_session(panels: Vec<Panel>, topology: Topology) -> DesignSession {
    let ids: Vec<String> = panels.iter().map(|p| p.id.clone()).collect();
    let placed = panels.into_iter().fold(DesignSession::new(), |s, p| {
        s.add_panel(p).expect("fixture panel ids are unique")
    });
    ids.iter()
        .fold(placed, |s, id| s.toggle_panel_selection(id))
        .create_string(topology, Some("Roof"), None)
        .expect("fixture strings have at least 2 panels")
        .set_location(Location { peak_sun_hours: 5.0 })
}
