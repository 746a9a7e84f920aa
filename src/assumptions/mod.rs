//! Product constants: MYGA and FIA rate/charge tables and GLWB rider terms

mod product;
pub mod loader;

pub use product::{
    FiaConstants, GlwbConstants, IndexCapParticipation, MygaConstants, PayoutBand, PayoutFactors,
    YearSchedule,
};
pub use loader::{LoadedConstants, DEFAULT_CONSTANTS_PATH};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Container for every product's constant tables.
///
/// Read-only during calculation; shared by every compare slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductConstants {
    #[serde(default)]
    pub myga: MygaConstants,
    #[serde(default)]
    pub fia: FiaConstants,
    #[serde(default)]
    pub glwb: GlwbConstants,
}

impl ProductConstants {
    /// Load a reference-data JSON document; omitted products keep defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let constants = serde_json::from_reader(BufReader::new(file))?;
        debug!("Loaded product constants from {}", path.display());
        Ok(constants)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load constants from CSV files in the default location (data/constants/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_dir(Path::new(DEFAULT_CONSTANTS_PATH))
    }

    /// Load constants from CSV files in a specific directory
    pub fn from_csv_dir(path: &Path) -> Result<Self> {
        let loaded = LoadedConstants::load_from(path)?;
        debug!("Loaded product constants from {}", path.display());
        Ok(Self::from_loaded(&loaded))
    }

    /// Overlay loaded tables on the defaults
    pub fn from_loaded(loaded: &LoadedConstants) -> Self {
        let mut constants = Self::default();

        let schedule = |rates: &Option<Vec<_>>, target: &mut YearSchedule| {
            if let Some(rates) = rates {
                *target = YearSchedule::from_loaded(rates);
            }
        };

        schedule(&loaded.myga_year_rates, &mut constants.myga.year_rates);
        schedule(&loaded.myga_surrender_charges, &mut constants.myga.surrender_charges);
        schedule(&loaded.myga_free_withdrawal, &mut constants.myga.free_withdrawal);
        schedule(&loaded.fia_surrender_charges, &mut constants.fia.surrender_charges);
        schedule(&loaded.fia_free_withdrawal, &mut constants.fia.free_withdrawal);
        schedule(&loaded.fia_premium_bonus_recapture, &mut constants.fia.premium_bonus_recapture);

        let scalar = |name: &str, target: &mut rust_decimal::Decimal| {
            if let Some(value) = loaded.scalar(name) {
                *target = value;
            }
        };

        scalar("myga.mgir", &mut constants.myga.mgir);
        scalar("fia.premium_bonus", &mut constants.fia.premium_bonus);
        scalar("fia.free_total_wd", &mut constants.fia.free_total_withdrawal);
        scalar("fia.fixed_rate", &mut constants.fia.fixed_rate);
        let caps = &mut constants.fia.index_account_cap_part;
        scalar("fia.ptp_w_cap_rate", &mut caps.ptp_w_cap_rate);
        scalar("fia.ptp_w_part_rate_500", &mut caps.ptp_w_part_rate_500);
        scalar("fia.ptp_w_part_rate_marc5", &mut caps.ptp_w_part_rate_marc5);
        scalar("fia.ptp_w_part_rate_tca", &mut caps.ptp_w_part_rate_tca);
        scalar("glwb.benefit_base_bonus", &mut constants.glwb.benefit_base_bonus);
        scalar("glwb.rider_charge", &mut constants.glwb.rider_charge);
        scalar("glwb.rollup", &mut constants.glwb.rollup);

        if let Some(period) = loaded.scalar("glwb.rollup_period").and_then(|p| p.to_u32()) {
            constants.glwb.rollup_period = period;
        }

        constants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_csv_matches_defaults() {
        let from_csv = ProductConstants::from_csv().expect("Failed to load constants");
        assert_eq!(from_csv, ProductConstants::default());
    }

    #[test]
    fn test_reference_data_json() {
        let json = r#"{
            "myga": {
                "mgir": 0.04,
                "year_rates": {"1": 0.06, "2": 0.055},
                "surrender_charges": {"1": 0.07, "2": 0.06},
                "free_wd": {"1": 0, "2": 0.1}
            }
        }"#;

        let constants = ProductConstants::from_json_str(json).unwrap();

        assert_eq!(constants.myga.mgir, dec!(0.04));
        assert_eq!(constants.myga.year_rates.get(2), Some(dec!(0.055)));
        assert_eq!(constants.myga.free_withdrawal.get(2), Some(dec!(0.1)));
        // Omitted products keep defaults
        assert_eq!(constants.fia, FiaConstants::default());
        assert_eq!(constants.glwb.rollup_period, 10);
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let defaults = ProductConstants::default();
        let json = serde_json::to_string(&defaults).unwrap();
        assert_eq!(ProductConstants::from_json_str(&json).unwrap(), defaults);
    }
}
