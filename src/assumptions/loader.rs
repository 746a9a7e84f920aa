//! CSV-based constants loader
//!
//! Loads product constant tables from CSV files in data/constants/

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{IllustrationError, Result};
use crate::types::Rate;

/// Default path to constants directory
pub const DEFAULT_CONSTANTS_PATH: &str = "data/constants";

pub const MYGA_YEAR_RATES_FILE: &str = "myga_year_rates.csv";
pub const MYGA_SURRENDER_CHARGES_FILE: &str = "myga_surrender_charges.csv";
pub const MYGA_FREE_WITHDRAWAL_FILE: &str = "myga_free_withdrawal.csv";
pub const FIA_SURRENDER_CHARGES_FILE: &str = "fia_surrender_charges.csv";
pub const FIA_FREE_WITHDRAWAL_FILE: &str = "fia_free_withdrawal.csv";
pub const FIA_BONUS_RECAPTURE_FILE: &str = "fia_premium_bonus_recapture.csv";
pub const SCALARS_FILE: &str = "scalars.csv";

/// Load a year schedule from CSV (columns: year, rate)
/// Returns None when the file is absent
pub fn load_year_schedule(path: &Path) -> Result<Option<Vec<(u32, Rate)>>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut rates = Vec::new();

    for result in reader.records() {
        let record = result?;
        let year: u32 = parse_field(&record, 0, path)?;
        let rate: Decimal = parse_field(&record, 1, path)?;
        rates.push((year, rate));
    }

    Ok(Some(rates))
}

/// Load named scalar constants from CSV (columns: name, value)
pub fn load_scalars(path: &Path) -> Result<HashMap<String, Decimal>> {
    let mut scalars = HashMap::new();
    if !path.exists() {
        return Ok(scalars);
    }

    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    for result in reader.records() {
        let record = result?;
        let name = record.get(0).unwrap_or_default().trim().to_string();
        let value: Decimal = parse_field(&record, 1, path)?;
        scalars.insert(name, value);
    }

    Ok(scalars)
}

fn parse_field<T: std::str::FromStr>(record: &csv::StringRecord, idx: usize, path: &Path) -> Result<T> {
    let raw = record.get(idx).unwrap_or_default().trim();
    raw.parse().map_err(|_| {
        IllustrationError::invalid(
            &path.display().to_string(),
            format!("cannot parse '{}' in column {}", raw, idx + 1),
        )
    })
}

/// All constant tables found in a directory; absent files are `None`
#[derive(Debug, Default)]
pub struct LoadedConstants {
    pub myga_year_rates: Option<Vec<(u32, Rate)>>,
    pub myga_surrender_charges: Option<Vec<(u32, Rate)>>,
    pub myga_free_withdrawal: Option<Vec<(u32, Rate)>>,
    pub fia_surrender_charges: Option<Vec<(u32, Rate)>>,
    pub fia_free_withdrawal: Option<Vec<(u32, Rate)>>,
    pub fia_premium_bonus_recapture: Option<Vec<(u32, Rate)>>,
    pub scalars: HashMap<String, Decimal>,
}

impl LoadedConstants {
    /// Load all constants from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONSTANTS_PATH))
    }

    /// Load all constants from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(IllustrationError::invalid(
                "constants",
                format!("{} is not a directory", path.display()),
            ));
        }

        Ok(Self {
            myga_year_rates: load_year_schedule(&path.join(MYGA_YEAR_RATES_FILE))?,
            myga_surrender_charges: load_year_schedule(&path.join(MYGA_SURRENDER_CHARGES_FILE))?,
            myga_free_withdrawal: load_year_schedule(&path.join(MYGA_FREE_WITHDRAWAL_FILE))?,
            fia_surrender_charges: load_year_schedule(&path.join(FIA_SURRENDER_CHARGES_FILE))?,
            fia_free_withdrawal: load_year_schedule(&path.join(FIA_FREE_WITHDRAWAL_FILE))?,
            fia_premium_bonus_recapture: load_year_schedule(&path.join(FIA_BONUS_RECAPTURE_FILE))?,
            scalars: load_scalars(&path.join(SCALARS_FILE))?,
        })
    }

    pub fn scalar(&self, name: &str) -> Option<Decimal> {
        self.scalars.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_default_constants() {
        let result = LoadedConstants::load_default();
        assert!(result.is_ok(), "Failed to load constants: {:?}", result.err());

        let constants = result.unwrap();

        let year_rates = constants.myga_year_rates.clone().expect("myga year rates");
        assert_eq!(year_rates.len(), 5);
        assert_eq!(year_rates[0], (1, dec!(0.055)));

        let fia_sc = constants.fia_surrender_charges.clone().expect("fia surrender charges");
        assert_eq!(fia_sc.len(), 10);

        assert_eq!(constants.scalars.get("myga.mgir"), Some(&dec!(0.045)));
        assert_eq!(constants.scalar("glwb.rollup_period"), Some(dec!(10)));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(LoadedConstants::load_from(Path::new("data/does-not-exist")).is_err());
    }
}
