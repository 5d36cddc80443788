//! Full design report assembled from a session and a catalog snapshot.

use std::fmt;

use tracing::warn;

use super::derating::{DeratedProfile, derate};
use super::energy::{EnergyBalance, RuntimeEstimate};
use super::inverter::{self, InverterLoad};
use super::mppt::{self, MpptLoad};
use super::session::DesignSession;
use super::string::{StringProfile, Topology};
use crate::catalog::{BatteryChemistry, Catalog, Inverter, Listing, MatchOutcome};

/// A compatible controller for a string.
#[derive(Debug, Clone, PartialEq)]
pub struct MpptSuggestion {
    pub id: String,
    pub model: String,
    /// Worst-case utilization (1.0 = at rating).
    pub fit: f64,
}

/// The controller assigned to a string and how it is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedMppt {
    pub id: String,
    pub model: String,
    pub load: MpptLoad,
}

/// Electrical results for one string.
#[derive(Debug, Clone, PartialEq)]
pub struct StringReport {
    pub id: String,
    pub name: String,
    pub topology: Topology,
    pub panel_count: usize,
    pub profile: StringProfile,
    pub derated: DeratedProfile,
    /// Lowest controller voltage rating with buffer (V).
    pub min_rating_volts: f64,
    /// Compatible controllers, best fit first.
    pub suggestions: Vec<MpptSuggestion>,
    pub best: MatchOutcome<MpptSuggestion>,
    /// `None` when nothing is assigned or the assigned id is not in the catalog.
    pub assigned: Option<AssignedMppt>,
}

/// Battery bank runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageReport {
    pub model: String,
    pub chemistry: BatteryChemistry,
    pub quantity: u32,
    pub estimate: RuntimeEstimate,
}

/// One inverter judged against the peak load.
#[derive(Debug, Clone, PartialEq)]
pub struct InverterAssessment {
    pub id: String,
    pub model: String,
    pub load: InverterLoad,
    pub efficiency_loss_w: f64,
}

impl InverterAssessment {
    fn new(inv: &Inverter, peak_load_w: f64) -> Self {
        Self {
            id: inv.id.clone(),
            model: inv.model.clone(),
            load: inverter::load(inv, peak_load_w),
            efficiency_loss_w: inverter::efficiency_loss_w(inv, peak_load_w),
        }
    }
}

/// Inverter sizing for the appliance list.
#[derive(Debug, Clone, PartialEq)]
pub struct InverterReport {
    pub peak_load_w: f64,
    pub recommended: MatchOutcome<InverterAssessment>,
    /// Catalog inverters that can carry the peak load, in catalog order.
    pub candidates: Vec<InverterAssessment>,
    /// The chosen inverter, falling back to the recommendation.
    pub selected: Option<InverterAssessment>,
}

/// DC-DC charging while driving.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingReport {
    pub model: String,
    pub output_watts: f64,
    pub driving_hours: f64,
    pub daily_charge_wh: f64,
}

/// Derived results for a whole design.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignReport {
    pub strings: Vec<StringReport>,
    pub energy: EnergyBalance,
    pub storage: Option<StorageReport>,
    /// `None` when there are no appliances to size for.
    pub inverter: Option<InverterReport>,
    pub charging: Option<ChargingReport>,
}

impl DesignReport {
    /// Runs every sizing step for `session` against `catalog`.
    pub fn build(session: &DesignSession, catalog: &Catalog) -> Self {
        let strings = session
            .strings()
            .iter()
            .map(|s| {
                let profile = session.string_profile(&s.id).unwrap_or_default();
                let derated = derate(&profile);
                let suggestions: Vec<MpptSuggestion> = mppt::rank(&derated, catalog.mppts.items())
                    .into_iter()
                    .map(|r| MpptSuggestion {
                        id: r.mppt.id.clone(),
                        model: r.mppt.model.clone(),
                        fit: r.fit,
                    })
                    .collect();
                let best = match &catalog.mppts {
                    Listing::Unavailable { .. } => MatchOutcome::CatalogUnavailable,
                    Listing::Available(_) => suggestions
                        .first()
                        .cloned()
                        .map_or(MatchOutcome::NoMatch, MatchOutcome::Found),
                };
                let assigned = session.assignment(&s.id).and_then(|mppt_id| {
                    let Some(m) = catalog.mppts.get(mppt_id) else {
                        warn!(string = %s.id, mppt = mppt_id, "assigned mppt not in catalog");
                        return None;
                    };
                    Some(AssignedMppt {
                        id: m.id.clone(),
                        model: m.model.clone(),
                        load: mppt::load(&derated, m),
                    })
                });
                StringReport {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    topology: s.topology,
                    panel_count: s.panel_ids.len(),
                    min_rating_volts: mppt::min_rating_volts(&profile),
                    profile,
                    derated,
                    suggestions,
                    best,
                    assigned,
                }
            })
            .collect();

        let energy = session.energy_balance();

        let storage = session.battery().and_then(|sel| {
            let Some(battery) = catalog.batteries.get(&sel.battery_id) else {
                warn!(battery = %sel.battery_id, "selected battery not in catalog");
                return None;
            };
            Some(StorageReport {
                model: battery.model.clone(),
                chemistry: battery.chemistry,
                quantity: sel.quantity,
                estimate: RuntimeEstimate::compute(battery, sel.quantity, &energy),
            })
        });

        let inverter_report = (!session.appliances().is_empty()).then(|| {
            let peak = energy.peak_load_w;
            let recommended = match inverter::recommend(&catalog.inverters, peak) {
                MatchOutcome::Found(i) => MatchOutcome::Found(InverterAssessment::new(i, peak)),
                MatchOutcome::NoMatch => MatchOutcome::NoMatch,
                MatchOutcome::CatalogUnavailable => MatchOutcome::CatalogUnavailable,
            };
            let assessed: Vec<InverterAssessment> = catalog
                .inverters
                .items()
                .iter()
                .map(|i| InverterAssessment::new(i, peak))
                .collect();
            let selected = match session.inverter_id() {
                Some(id) => match assessed.iter().find(|c| c.id == id) {
                    Some(chosen) => {
                        if !chosen.load.is_selectable() {
                            warn!(
                                inverter = id,
                                load_pct = chosen.load.percentage,
                                "selected inverter is overloaded"
                            );
                        }
                        Some(chosen.clone())
                    }
                    None => {
                        warn!(inverter = id, "selected inverter not in catalog");
                        None
                    }
                },
                None => recommended.clone().found(),
            };
            let candidates = assessed
                .into_iter()
                .filter(|c| c.load.is_selectable())
                .collect();
            InverterReport {
                peak_load_w: peak,
                recommended,
                candidates,
                selected,
            }
        });

        let charging = session.charger_id().and_then(|id| {
            let Some(charger) = catalog.chargers.get(id) else {
                warn!(charger = id, "selected charger not in catalog");
                return None;
            };
            Some(ChargingReport {
                model: charger.model.clone(),
                output_watts: charger.output_watts(),
                driving_hours: session.driving_hours(),
                daily_charge_wh: inverter::daily_charge_wh(charger, session.driving_hours()),
            })
        });

        Self {
            strings,
            energy,
            storage,
            inverter: inverter_report,
            charging,
        }
    }
}

fn outcome_label<T>(outcome: &MatchOutcome<T>, name: impl Fn(&T) -> String) -> String {
    match outcome {
        MatchOutcome::Found(t) => name(t),
        MatchOutcome::NoMatch => "no suitable match".to_string(),
        MatchOutcome::CatalogUnavailable => "catalog unavailable".to_string(),
    }
}

impl fmt::Display for DesignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Strings ---")?;
        if self.strings.is_empty() {
            writeln!(f, "(no strings)")?;
        }
        for s in &self.strings {
            writeln!(f, "{} [{} x{}]", s.name, s.topology, s.panel_count)?;
            writeln!(
                f,
                "  STC:              {:.1} V / {:.1} A / {:.0} W (Voc {:.1} V)",
                s.profile.volts, s.profile.amps, s.profile.watts, s.profile.open_circuit_volts
            )?;
            writeln!(
                f,
                "  Temp adjusted:    {:.1} V max / {:.1} V min",
                s.derated.max_voltage, s.derated.min_voltage
            )?;
            writeln!(f, "  Min MPPT rating:  {:.1} V", s.min_rating_volts)?;
            writeln!(
                f,
                "  Best MPPT:        {}",
                outcome_label(&s.best, |m| format!("{} ({:.0}% fit)", m.model, m.fit * 100.0))
            )?;
            if let Some(a) = &s.assigned {
                writeln!(
                    f,
                    "  Assigned MPPT:    {} - {} ({:.1}% load)",
                    a.model,
                    a.load.status.description(),
                    a.load.percentage
                )?;
            }
        }

        let e = &self.energy;
        writeln!(f, "\n--- Energy ---")?;
        writeln!(f, "Daily production:   {:.0} Wh", e.daily_production_wh)?;
        writeln!(f, "Daily consumption:  {:.0} Wh", e.daily_consumption_wh)?;
        writeln!(f, "Net energy:         {:+.0} Wh", e.net_energy_wh)?;
        writeln!(f, "Peak load:          {:.0} W", e.peak_load_w)?;

        if let Some(st) = &self.storage {
            let est = &st.estimate;
            writeln!(f, "\n--- Storage ---")?;
            writeln!(f, "Battery:            {} x{} ({})", st.model, st.quantity, st.chemistry)?;
            writeln!(
                f,
                "Capacity:           {:.0} Ah total / {:.1} Ah usable",
                est.total_ah, est.usable_ah
            )?;
            writeln!(f, "Daily draw:         {:.1} Ah @ 12V", est.daily_consumption_ah)?;
            match est.without_solar_hours {
                Some(h) => writeln!(
                    f,
                    "Runtime w/o solar:  {h:.1} hours ({:.1} days)",
                    h / 24.0
                )?,
                None => writeln!(f, "Runtime w/o solar:  undefined (no consumption)")?,
            }
            writeln!(f, "Runtime w/ solar:   {}", est.with_solar)?;
        }

        if let Some(inv) = &self.inverter {
            writeln!(f, "\n--- Inverter ---")?;
            writeln!(
                f,
                "Recommended:        {}",
                outcome_label(&inv.recommended, |i| i.model.clone())
            )?;
            if let Some(sel) = &inv.selected {
                writeln!(
                    f,
                    "Selected:           {} - {} ({:.1}% load, {:.0} W loss)",
                    sel.model,
                    sel.load.status.description(),
                    sel.load.percentage,
                    sel.efficiency_loss_w
                )?;
            }
        }

        if let Some(c) = &self.charging {
            writeln!(f, "\n--- DC-DC Charging ---")?;
            writeln!(f, "Charger:            {} ({:.0} W)", c.model, c.output_watts)?;
            writeln!(
                f,
                "Daily charge:       {:.0} Wh/day ({} h driving)",
                c.daily_charge_wh, c.driving_hours
            )?;
        }

        Ok(())
    }
}
