//! Aggregation of panel ratings into string-level electrical values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Panel;

/// Ratio of open-circuit voltage to rated voltage assumed for every panel.
pub const OPEN_CIRCUIT_FACTOR: f64 = 1.25;

/// How the panels of a string are wired together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Series,
    Parallel,
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Series => write!(f, "series"),
            Topology::Parallel => write!(f, "parallel"),
        }
    }
}

/// A named group of panels wired as one electrical unit.
///
/// Holds panel identities only; the panels themselves live in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelString {
    pub id: String,
    pub name: String,
    pub panel_ids: Vec<String>,
    pub topology: Topology,
}

/// Aggregate STC values of a string.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StringProfile {
    /// String voltage (V).
    pub volts: f64,
    /// String current (A).
    pub amps: f64,
    /// String power (W).
    pub watts: f64,
    /// Estimated open-circuit voltage (V).
    pub open_circuit_volts: f64,
}

/// Reduces `panels` wired as `topology` into a [`StringProfile`].
///
/// Series strings add voltage and take the first panel's current; parallel
/// strings add current and take the first panel's voltage. No mismatch check
/// is made. An empty slice yields an all-zero profile.
pub fn aggregate<'a, I>(panels: I, topology: Topology) -> StringProfile
where
    I: IntoIterator<Item = &'a Panel>,
{
    let mut panels = panels.into_iter().peekable();
    let Some(first) = panels.peek().copied() else {
        return StringProfile::default();
    };

    let (sum_volts, sum_amps, sum_watts) = panels.fold((0.0, 0.0, 0.0), |(v, a, w), p| {
        (v + p.volts, a + p.amps, w + p.watts)
    });

    match topology {
        Topology::Series => StringProfile {
            volts: sum_volts,
            amps: first.amps,
            watts: sum_watts,
            open_circuit_volts: sum_volts * OPEN_CIRCUIT_FACTOR,
        },
        Topology::Parallel => StringProfile {
            volts: first.volts,
            amps: sum_amps,
            watts: sum_watts,
            open_circuit_volts: first.volts * OPEN_CIRCUIT_FACTOR,
        },
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

    #[test]
    fn four_panel_series_string() {
        let panels: Vec<Panel> = (0..4)
            .map(|i| panel(&format!("p{i}"), 300.0, 40.0, 7.5))
            .collect();
        let profile = aggregate(&panels, Topology::Series);
        assert_eq!(profile.volts, 160.0);
        assert_eq!(profile.amps, 7.5);
        assert_eq!(profile.watts, 1200.0);
        assert_eq!(profile.open_circuit_volts, 200.0);
    }

    #[test]
    fn parallel_string_adds_current() {
        let panels = vec![panel("a", 200.0, 20.0, 10.0), panel("b", 200.0, 20.0, 10.0)];
        let profile = aggregate(&panels, Topology::Parallel);
        assert_eq!(profile.volts, 20.0);
        assert_eq!(profile.amps, 20.0);
        assert_eq!(profile.watts, 400.0);
        assert_eq!(profile.open_circuit_volts, 25.0);
    }

    #[test]
    fn series_current_comes_from_first_panel() {
        let panels = vec![panel("a", 100.0, 20.0, 5.0), panel("b", 200.0, 20.0, 10.0)];
        assert_eq!(aggregate(&panels, Topology::Series).amps, 5.0);
    }

    #[test]
    fn mixed_voltage_parallel_uses_first_panel_voltage() {
        let a = panel("a", 200.0, 20.0, 10.0);
        let b = panel("b", 300.0, 40.0, 7.5);
        let forward = aggregate([&a, &b], Topology::Parallel);
        let reverse = aggregate([&b, &a], Topology::Parallel);
        assert_eq!(forward.volts, 20.0);
        assert_eq!(reverse.volts, 40.0);
        assert_eq!(forward.watts, reverse.watts);
        assert_eq!(forward.amps, reverse.amps);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let none: Vec<Panel> = Vec::new();
        assert_eq!(aggregate(&none, Topology::Series), StringProfile::default());
        assert_eq!(aggregate(&none, Topology::Parallel), StringProfile::default());
    }

    #[test]
    fn topology_labels() {
        assert_eq!(Topology::Series.to_string(), "series");
        assert_eq!(Topology::Parallel.to_string(), "parallel");
    }
}
