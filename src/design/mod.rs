/// Temperature derating of string voltages.
pub mod derating;
pub mod energy;
/// Inverter sizing and DC-DC charging.
pub mod inverter;
pub mod mppt;
pub mod report;
pub mod session;
/// String aggregation.
pub mod string;

pub use derating::{DeratedProfile, derate};
pub use energy::{Appliance, EnergyBalance, Location, Runtime, RuntimeEstimate};
pub use inverter::{InverterLoad, InverterStatus};
pub use mppt::{LoadStatus, MpptLoad, RankedMppt};
pub use report::{DesignReport, StringReport};
pub use session::{BatterySelection, DesignSession, PanelUpdate};
pub use string::{PanelString, StringProfile, Topology, aggregate};
