//! Matching strings against MPPT charge controllers.
//!
//! A controller is compatible when the derated string stays within its
//! ratings stretched by [`SAFETY_MARGIN`]. Compatible controllers are ranked
//! by how close their worst-case utilization sits to
//! [`TARGET_UTILIZATION`], so neither oversized nor undersized units win.

use std::fmt;

use tracing::debug;

use super::derating::DeratedProfile;
use super::string::StringProfile;
use crate::catalog::{Listing, MatchOutcome, Mppt};

/// Multiplier applied to controller ratings to allow operating headroom.
pub const SAFETY_MARGIN: f64 = 1.3;
/// Preferred worst-case utilization of a controller's rated capacity.
pub const TARGET_UTILIZATION: f64 = 0.75;
/// Load value reported for a string below the controller's minimum voltage.
pub const INCOMPATIBLE_LOAD_PCT: f64 = 150.0;
/// Headroom between the string's highest voltage and a controller's
/// voltage rating (V).
pub const VOLTAGE_BUFFER: f64 = 5.0;

/// Lowest controller voltage rating worth shopping for: the higher of the
/// string's STC and open-circuit voltage plus [`VOLTAGE_BUFFER`].
///
/// Advisory only; [`is_compatible`] does not apply the buffer.
pub fn min_rating_volts(profile: &StringProfile) -> f64 {
    profile.volts.max(profile.open_circuit_volts) + VOLTAGE_BUFFER
}

/// Returns `true` if `mppt` can take the derated string.
pub fn is_compatible(derated: &DeratedProfile, mppt: &Mppt) -> bool {
    let voltage_ok = derated.max_voltage <= mppt.max_volts * SAFETY_MARGIN;
    let amps_ok = derated.amps <= mppt.max_amps * SAFETY_MARGIN;
    let power_ok = derated.watts <= mppt.max_watts * SAFETY_MARGIN;
    let min_voltage_ok = mppt.min_volts.is_none_or(|min| derated.min_voltage >= min);

    debug!(
        model = %mppt.model,
        needed_v = derated.max_voltage,
        allowed_v = mppt.max_volts * SAFETY_MARGIN,
        voltage_ok,
        needed_a = derated.amps,
        allowed_a = mppt.max_amps * SAFETY_MARGIN,
        amps_ok,
        needed_w = derated.watts,
        allowed_w = mppt.max_watts * SAFETY_MARGIN,
        power_ok,
        min_voltage_ok,
        "mppt compatibility check"
    );

    voltage_ok && amps_ok && power_ok && min_voltage_ok
}

/// Worst-case utilization of `mppt` by the derated string (1.0 = at rating).
pub fn fit(derated: &DeratedProfile, mppt: &Mppt) -> f64 {
    (derated.max_voltage / mppt.max_volts)
        .max(derated.watts / mppt.max_watts)
        .max(derated.amps / mppt.max_amps)
}

/// A compatible controller with its utilization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMppt<'a> {
    pub mppt: &'a Mppt,
    pub fit: f64,
}

/// Compatible controllers, best fit first.
///
/// The sort is stable: controllers with equal distance from the target keep
/// their catalog order.
pub fn rank<'a>(derated: &DeratedProfile, mppts: &'a [Mppt]) -> Vec<RankedMppt<'a>> {
    let mut ranked: Vec<RankedMppt<'a>> = mppts
        .iter()
        .filter(|m| is_compatible(derated, m))
        .map(|mppt| RankedMppt {
            mppt,
            fit: fit(derated, mppt),
        })
        .collect();
    ranked.sort_by(|a, b| {
        (TARGET_UTILIZATION - a.fit)
            .abs()
            .total_cmp(&(TARGET_UTILIZATION - b.fit).abs())
    });
    ranked
}

/// The best-fitting compatible controller in `listing`.
pub fn recommend<'a>(
    derated: &DeratedProfile,
    listing: &'a Listing<Mppt>,
) -> MatchOutcome<RankedMppt<'a>> {
    match listing {
        Listing::Unavailable { .. } => MatchOutcome::CatalogUnavailable,
        Listing::Available(mppts) => match rank(derated, mppts).into_iter().next() {
            Some(best) => MatchOutcome::Found(best),
            None => {
                debug!("no suitable mppt found");
                MatchOutcome::NoMatch
            }
        },
    }
}

/// How heavily an assigned controller is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Above 100 %: ratings exceeded or below minimum voltage.
    Incompatible,
    /// Above 90 %.
    NearLimit,
    /// Above 60 %.
    Optimal,
    RoomForGrowth,
}

impl LoadStatus {
    /// Classifies a load percentage.
    pub fn from_percentage(pct: f64) -> Self {
        if pct > 100.0 {
            LoadStatus::Incompatible
        } else if pct > 90.0 {
            LoadStatus::NearLimit
        } else if pct > 60.0 {
            LoadStatus::Optimal
        } else {
            LoadStatus::RoomForGrowth
        }
    }

    /// Advice shown next to the load figure.
    pub fn description(self) -> &'static str {
        match self {
            LoadStatus::Incompatible => "Incompatible - Voltage/Power exceeded",
            LoadStatus::NearLimit => "Near Limit - Consider larger MPPT",
            LoadStatus::Optimal => "Optimal Load",
            LoadStatus::RoomForGrowth => "Room for Growth",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Incompatible => write!(f, "incompatible"),
            LoadStatus::NearLimit => write!(f, "near-limit"),
            LoadStatus::Optimal => write!(f, "optimal"),
            LoadStatus::RoomForGrowth => write!(f, "room-for-growth"),
        }
    }
}

/// Load of a string on its assigned controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MpptLoad {
    pub percentage: f64,
    pub status: LoadStatus,
}

/// Classifies the load a derated string places on `mppt`.
///
/// Voltage and power are measured against margined ratings, current against
/// the bare rating. A string that sags below `min_volts` in the heat reports
/// [`INCOMPATIBLE_LOAD_PCT`].
pub fn load(derated: &DeratedProfile, mppt: &Mppt) -> MpptLoad {
    if let Some(min_volts) = mppt.min_volts {
        if derated.min_voltage / min_volts * 100.0 < 100.0 {
            return MpptLoad {
                percentage: INCOMPATIBLE_LOAD_PCT,
                status: LoadStatus::Incompatible,
            };
        }
    }

    let volt_pct = derated.max_voltage / (mppt.max_volts * SAFETY_MARGIN) * 100.0;
    let watt_pct = derated.watts / (mppt.max_watts * SAFETY_MARGIN) * 100.0;
    let amp_pct = derated.amps / mppt.max_amps * 100.0;
    let percentage = volt_pct.max(watt_pct).max(amp_pct);

    MpptLoad {
        percentage,
        status: LoadStatus::from_percentage(percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::derating::derate;

    fn mppt(
        id: &str,
        max_volts: f64,
        max_amps: f64,
        max_watts: f64,
        min_volts: Option<f64>,
    ) -> Mppt {
        Mppt {
            id: id.to_string(),
            model: id.to_string(),
            max_volts,
            max_amps,
            max_watts,
            min_volts,
        }
    }

    fn derated(max_voltage: f64, min_voltage: f64, amps: f64, watts: f64) -> DeratedProfile {
        DeratedProfile {
            max_voltage,
            min_voltage,
            amps,
            watts,
        }
    }

    #[test]
    fn four_panel_series_fits_250v_controller() {
        let stc = StringProfile {
            volts: 160.0,
            amps: 7.5,
            watts: 1200.0,
            open_circuit_volts: 200.0,
        };
        let d = derate(&stc);
        let m = mppt("m", 250.0, 15.0, 3000.0, None);
        assert!(is_compatible(&d, &m));
    }

    #[test]
    fn min_rating_buffers_the_highest_string_voltage() {
        let stc = StringProfile {
            volts: 160.0,
            amps: 7.5,
            watts: 1200.0,
            open_circuit_volts: 200.0,
        };
        assert_eq!(min_rating_volts(&stc), 200.0 + VOLTAGE_BUFFER);
        assert_eq!(min_rating_volts(&StringProfile::default()), VOLTAGE_BUFFER);

        // advisory: a controller rated exactly at the string voltage still passes
        let m = mppt("m", 200.0, 15.0, 3000.0, None);
        assert!(is_compatible(&derated(200.0, 150.0, 7.5, 1200.0), &m));
    }

    #[test]
    fn each_limit_is_checked_with_margin() {
        let m = mppt("m", 100.0, 10.0, 500.0, None);
        assert!(is_compatible(&derated(130.0, 80.0, 13.0, 650.0), &m));
        assert!(!is_compatible(&derated(130.1, 80.0, 1.0, 1.0), &m));
        assert!(!is_compatible(&derated(1.0, 0.5, 13.1, 1.0), &m));
        assert!(!is_compatible(&derated(1.0, 0.5, 1.0, 650.1), &m));
    }

    #[test]
    fn min_volts_only_checked_when_present() {
        let d = derated(40.0, 15.0, 5.0, 200.0);
        assert!(is_compatible(&d, &mppt("none", 100.0, 20.0, 400.0, None)));
        assert!(!is_compatible(&d, &mppt("min", 100.0, 20.0, 400.0, Some(17.0))));
        assert!(is_compatible(&d, &mppt("low", 100.0, 20.0, 400.0, Some(15.0))));
    }

    #[test]
    fn ranking_prefers_target_utilization() {
        let d = derated(75.0, 50.0, 5.0, 100.0);
        let mppts = vec![
            mppt("oversized", 300.0, 100.0, 5000.0, None),
            mppt("snug", 100.0, 100.0, 5000.0, None),
            mppt("tight", 80.0, 100.0, 5000.0, None),
        ];
        let ranked = rank(&d, &mppts);
        let ids: Vec<&str> = ranked.iter().map(|r| r.mppt.id.as_str()).collect();
        assert_eq!(ids, ["snug", "tight", "oversized"]);
        assert!((ranked[0].fit - 0.75).abs() < 1e-12);
    }

    #[test]
    fn ranking_is_stable_for_equal_fit() {
        let d = derated(50.0, 40.0, 5.0, 100.0);
        let mppts = vec![
            mppt("first", 100.0, 50.0, 1000.0, None),
            mppt("second", 100.0, 50.0, 1000.0, None),
            mppt("third", 100.0, 50.0, 1000.0, None),
        ];
        let ids: Vec<&str> = rank(&d, &mppts).iter().map(|r| r.mppt.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn incompatible_controllers_are_filtered() {
        let d = derated(200.0, 150.0, 5.0, 100.0);
        let mppts = vec![mppt("small", 100.0, 50.0, 1000.0, None)];
        assert!(rank(&d, &mppts).is_empty());
    }

    #[test]
    fn recommend_distinguishes_unavailable_from_no_match() {
        let d = derated(200.0, 150.0, 5.0, 100.0);
        let empty: Listing<Mppt> = Listing::Available(Vec::new());
        assert_eq!(recommend(&d, &empty), MatchOutcome::NoMatch);

        let offline: Listing<Mppt> = Listing::Unavailable {
            reason: "offline".to_string(),
        };
        assert_eq!(recommend(&d, &offline), MatchOutcome::CatalogUnavailable);

        let ok = Listing::Available(vec![mppt("big", 250.0, 50.0, 1000.0, None)]);
        let found = recommend(&d, &ok).found().map(|r| r.mppt.id.clone());
        assert_eq!(found.as_deref(), Some("big"));
    }

    #[test]
    fn load_below_min_voltage_is_sentinel() {
        let d = derated(40.0, 15.0, 5.0, 200.0);
        let l = load(&d, &mppt("m", 100.0, 20.0, 400.0, Some(17.0)));
        assert_eq!(l.percentage, INCOMPATIBLE_LOAD_PCT);
        assert_eq!(l.status, LoadStatus::Incompatible);
    }

    #[test]
    fn load_takes_worst_dimension() {
        // volts: 65 / 130 = 50 %, watts: 260 / 520 = 50 %, amps: 15 / 20 = 75 %
        let d = derated(65.0, 50.0, 15.0, 260.0);
        let l = load(&d, &mppt("m", 100.0, 20.0, 400.0, None));
        assert!((l.percentage - 75.0).abs() < 1e-9);
        assert_eq!(l.status, LoadStatus::Optimal);
    }

    #[test]
    fn load_status_bands() {
        assert_eq!(LoadStatus::from_percentage(150.0), LoadStatus::Incompatible);
        assert_eq!(LoadStatus::from_percentage(100.5), LoadStatus::Incompatible);
        assert_eq!(LoadStatus::from_percentage(100.0), LoadStatus::NearLimit);
        assert_eq!(LoadStatus::from_percentage(90.0), LoadStatus::Optimal);
        assert_eq!(LoadStatus::from_percentage(60.0), LoadStatus::RoomForGrowth);
        assert_eq!(LoadStatus::from_percentage(0.0), LoadStatus::RoomForGrowth);
    }
}
