//! Built-in reference data: a demo catalog and a table of common appliances.

use super::store::CatalogSource;
use super::types::{Battery, BatteryChemistry, Charger, Inverter, Mppt, Panel, VoltageRange};
use crate::error::CatalogError;

/// A common appliance with typical power draw and daily use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommonAppliance {
    pub name: &'static str,
    pub watts: f64,
    pub default_hours: f64,
}

const fn common(name: &'static str, watts: f64, default_hours: f64) -> CommonAppliance {
    CommonAppliance {
        name,
        watts,
        default_hours,
    }
}

/// Appliances offered as quick picks when building a consumption profile.
pub const COMMON_APPLIANCES: &[CommonAppliance] = &[
    common("Refrigerator", 60.0, 24.0),
    common("LED Lights", 10.0, 6.0),
    common("Laptop", 65.0, 4.0),
    common("Water Pump", 100.0, 1.0),
    common("Fan", 30.0, 8.0),
    common("Phone Charger", 5.0, 3.0),
    common("Microwave", 1000.0, 0.5),
    common("Coffee Maker", 900.0, 0.5),
    common("TV", 100.0, 4.0),
    common("Inverter Losses", 50.0, 24.0),
];

/// Looks up a common appliance by name (ASCII case-insensitive).
pub fn common_appliance(name: &str) -> Option<&'static CommonAppliance> {
    COMMON_APPLIANCES
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
}

/// Catalog source backed by a fixed set of typical campervan components.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoCatalog;

fn panel(
    id: &str,
    model: &str,
    watts: f64,
    volts: f64,
    amps: f64,
    width: f64,
    height: f64,
) -> Panel {
    Panel {
        id: id.to_string(),
        model: model.to_string(),
        watts,
        volts,
        amps,
        width,
        height,
    }
}

fn mppt(
    id: &str,
    model: &str,
    max_volts: f64,
    max_amps: f64,
    max_watts: f64,
    min_volts: Option<f64>,
) -> Mppt {
    Mppt {
        id: id.to_string(),
        model: model.to_string(),
        max_volts,
        max_amps,
        max_watts,
        min_volts,
    }
}

fn inverter(id: &str, model: &str, watts: f64, peak_watts: f64, efficiency: f64) -> Inverter {
    Inverter {
        id: id.to_string(),
        model: model.to_string(),
        watts,
        peak_watts,
        efficiency,
    }
}

fn battery(id: &str, model: &str, amp_hours: f64, chemistry: BatteryChemistry) -> Battery {
    Battery {
        id: id.to_string(),
        model: model.to_string(),
        amp_hours,
        chemistry,
    }
}

fn charger(
    id: &str,
    model: &str,
    input: (f64, f64),
    output_voltage: f64,
    max_output_current: f64,
    efficiency: f64,
) -> Charger {
    Charger {
        id: id.to_string(),
        model: model.to_string(),
        input_voltage_range: VoltageRange {
            min: input.0,
            max: input.1,
        },
        output_voltage,
        max_output_current,
        efficiency,
    }
}

impl CatalogSource for DemoCatalog {
    fn panels(&self) -> Result<Vec<Panel>, CatalogError> {
        Ok(vec![
            panel("mono-100", "Mono 100W", 100.0, 20.0, 5.0, 105.0, 54.0),
            panel("flex-175", "Flexible 175W", 175.0, 19.5, 9.0, 145.0, 67.0),
            panel("mono-200", "Mono 200W", 200.0, 20.0, 10.0, 150.0, 70.0),
            panel("mono-300", "Mono 300W", 300.0, 40.0, 7.5, 165.0, 99.0),
        ])
    }

    fn mppts(&self) -> Result<Vec<Mppt>, CatalogError> {
        Ok(vec![
            mppt(
                "smartsolar-75-15",
                "SmartSolar MPPT 75/15",
                75.0,
                13.0,
                220.0,
                None,
            ),
            mppt(
                "smartsolar-100-20",
                "SmartSolar MPPT 100/20",
                100.0,
                20.0,
                290.0,
                None,
            ),
            mppt(
                "smartsolar-100-30",
                "SmartSolar MPPT 100/30",
                100.0,
                35.0,
                440.0,
                Some(17.0),
            ),
            mppt(
                "smartsolar-150-35",
                "SmartSolar MPPT 150/35",
                150.0,
                40.0,
                500.0,
                Some(17.0),
            ),
            mppt(
                "smartsolar-150-60",
                "SmartSolar MPPT 150/60",
                150.0,
                50.0,
                860.0,
                Some(17.0),
            ),
            mppt(
                "smartsolar-250-100",
                "SmartSolar MPPT 250/100",
                250.0,
                70.0,
                1450.0,
                None,
            ),
        ])
    }

    fn inverters(&self) -> Result<Vec<Inverter>, CatalogError> {
        Ok(vec![
            inverter("phoenix-12-250", "Phoenix 12/250", 250.0, 400.0, 89.0),
            inverter("phoenix-12-500", "Phoenix 12/500", 500.0, 900.0, 90.0),
            inverter("phoenix-12-800", "Phoenix 12/800", 800.0, 1600.0, 91.0),
            inverter("phoenix-12-1200", "Phoenix 12/1200", 1200.0, 2400.0, 92.0),
            inverter(
                "multiplus-12-1600",
                "MultiPlus 12/1600",
                1600.0,
                3000.0,
                93.0,
            ),
            inverter(
                "multiplus-12-3000",
                "MultiPlus 12/3000",
                3000.0,
                6000.0,
                94.0,
            ),
        ])
    }

    fn batteries(&self) -> Result<Vec<Battery>, CatalogError> {
        Ok(vec![
            battery(
                "flooded-110",
                "Leisure 110Ah",
                110.0,
                BatteryChemistry::Flooded,
            ),
            battery(
                "agm-100",
                "AGM Deep Cycle 100Ah",
                100.0,
                BatteryChemistry::Agm,
            ),
            battery(
                "lifepo4-100",
                "LiFePO4 100Ah",
                100.0,
                BatteryChemistry::Lithium,
            ),
            battery(
                "lifepo4-200",
                "LiFePO4 200Ah",
                200.0,
                BatteryChemistry::Lithium,
            ),
        ])
    }

    fn chargers(&self) -> Result<Vec<Charger>, CatalogError> {
        Ok(vec![
            charger(
                "orion-12-12-18",
                "Orion-Tr Smart 12/12-18",
                (10.0, 17.0),
                14.2,
                18.0,
                0.87,
            ),
            charger(
                "orion-12-12-30",
                "Orion-Tr Smart 12/12-30",
                (10.0, 17.0),
                14.2,
                30.0,
                0.87,
            ),
            charger(
                "orion-24-12-30",
                "Orion-Tr Smart 24/12-30",
                (20.0, 35.0),
                14.2,
                30.0,
                0.88,
            ),
        ])
    }
}
