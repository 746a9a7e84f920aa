//! Product constant tables: rate schedules, surrender charges, free withdrawals, GLWB terms

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Rate;

/// Rates keyed by policy year (1-indexed).
///
/// Reference data arrives keyed either by number or by string; both
/// deserialize to the same schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearSchedule {
    rates: BTreeMap<u32, Rate>,
}

impl YearSchedule {
    /// Create from loaded CSV data
    pub fn from_loaded(rates: &[(u32, Rate)]) -> Self {
        Self {
            rates: rates.iter().copied().collect(),
        }
    }

    /// Consecutive schedule starting at year 1
    pub fn from_rates(rates: &[Rate]) -> Self {
        Self {
            rates: rates
                .iter()
                .enumerate()
                .map(|(i, rate)| (i as u32 + 1, *rate))
                .collect(),
        }
    }

    /// Rate for the year, if the schedule has one
    pub fn get(&self, year: u32) -> Option<Rate> {
        self.rates.get(&year).copied()
    }

    /// Rate for the year, 0 when absent
    pub fn rate_or_zero(&self, year: u32) -> Rate {
        self.get(year).unwrap_or(Decimal::ZERO)
    }

    /// Entries in year order
    pub fn iter(&self) -> impl Iterator<Item = (u32, Rate)> + '_ {
        self.rates.iter().map(|(year, rate)| (*year, *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// MYGA constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MygaConstants {
    /// Minimum guaranteed interest rate; credited in the second term and
    /// for first-term years missing from `year_rates`
    pub mgir: Rate,

    /// First-term guaranteed rate by term year
    pub year_rates: YearSchedule,

    pub surrender_charges: YearSchedule,

    /// Fraction of current value withdrawable penalty-free, by year
    #[serde(rename = "free_wd")]
    pub free_withdrawal: YearSchedule,
}

impl Default for MygaConstants {
    fn default() -> Self {
        Self {
            mgir: dec!(0.045),
            year_rates: YearSchedule::from_rates(&[
                dec!(0.055), // Year 1
                dec!(0.050), // Year 2
                dec!(0.048), // Year 3
                dec!(0.046), // Year 4
                dec!(0.045), // Year 5
            ]),
            surrender_charges: YearSchedule::from_rates(&[
                dec!(0.08),
                dec!(0.07),
                dec!(0.06),
                dec!(0.05),
                dec!(0.04),
                dec!(0.03),
                dec!(0.02),
                dec!(0.01),
                dec!(0.00),
                dec!(0.00),
            ]),
            free_withdrawal: YearSchedule::from_rates(&[
                dec!(0.00), // No free withdrawal in year 1
                dec!(0.10),
                dec!(0.10),
                dec!(0.10),
                dec!(0.10),
                dec!(0.10),
                dec!(0.10),
                dec!(0.10),
                dec!(0.10),
                dec!(0.10),
            ]),
        }
    }
}

impl MygaConstants {
    /// Credited rate for a projection year
    pub fn credited_rate(&self, year: u32, first_term_years: u32) -> Rate {
        if year <= first_term_years {
            self.year_rates.get(year).unwrap_or(self.mgir)
        } else {
            self.mgir
        }
    }
}

/// Cap and participation rates for the FIA index strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexCapParticipation {
    pub ptp_w_cap_rate: Rate,
    pub ptp_w_part_rate_500: Rate,
    pub ptp_w_part_rate_marc5: Rate,
    pub ptp_w_part_rate_tca: Rate,
}

impl Default for IndexCapParticipation {
    fn default() -> Self {
        Self {
            ptp_w_cap_rate: dec!(0.06),       // 6% cap
            ptp_w_part_rate_500: dec!(0.85),   // 85% participation
            ptp_w_part_rate_marc5: dec!(0.80), // 80% participation
            ptp_w_part_rate_tca: dec!(0.75),   // 75% participation
        }
    }
}

/// FIA constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiaConstants {
    /// Applied once to the premium at issue
    pub premium_bonus: Rate,

    /// Bonus recapture by year; carried for reference data, not used by the
    /// surrender value
    pub premium_bonus_recapture: YearSchedule,

    /// Flat free withdrawal fraction, every year
    #[serde(rename = "free_total_wd")]
    pub free_total_withdrawal: Rate,

    /// Fixed account crediting rate
    pub fixed_rate: Rate,

    pub index_account_cap_part: IndexCapParticipation,

    pub surrender_charges: YearSchedule,

    #[serde(rename = "free_wd")]
    pub free_withdrawal: YearSchedule,
}

impl Default for FiaConstants {
    fn default() -> Self {
        Self {
            premium_bonus: dec!(0.10),
            premium_bonus_recapture: YearSchedule::from_rates(&[
                dec!(0.10),
                dec!(0.09),
                dec!(0.08),
                dec!(0.07),
                dec!(0.06),
                dec!(0.05),
                dec!(0.04),
                dec!(0.03),
                dec!(0.02),
                dec!(0.01),
            ]),
            free_total_withdrawal: dec!(0.10),
            fixed_rate: dec!(0.03),
            index_account_cap_part: IndexCapParticipation::default(),
            surrender_charges: YearSchedule::from_rates(&[
                dec!(0.09),
                dec!(0.08),
                dec!(0.07),
                dec!(0.06),
                dec!(0.05),
                dec!(0.04),
                dec!(0.03),
                dec!(0.02),
                dec!(0.01),
                dec!(0.00),
            ]),
            free_withdrawal: YearSchedule::from_rates(&[dec!(0.10); 10]),
        }
    }
}

/// One payout age band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutBand {
    pub min_age: u32,
    pub max_age: u32,
    pub factor: Rate,
}

/// GLWB payout factors by attained age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutFactors {
    single_life: Vec<PayoutBand>,
    #[serde(default)]
    joint_life: Option<Vec<PayoutBand>>,
}

impl Default for PayoutFactors {
    fn default() -> Self {
        let band = |min_age, max_age, factor| PayoutBand { min_age, max_age, factor };
        Self {
            single_life: vec![
                band(50, 55, dec!(0.046)),
                band(56, 60, dec!(0.050)),
                band(61, 65, dec!(0.055)),
                band(66, 70, dec!(0.060)),
                band(71, 75, dec!(0.065)),
                band(76, 80, dec!(0.070)),
                band(81, 85, dec!(0.080)),
                band(86, 120, dec!(0.090)),
            ],
            joint_life: None,
        }
    }
}

impl PayoutFactors {
    pub fn with_joint_life(mut self, bands: Vec<PayoutBand>) -> Self {
        self.joint_life = Some(bands);
        self
    }

    /// Single life payout factor for attained age
    pub fn get_single_life(&self, attained_age: u32) -> Rate {
        Self::lookup(&self.single_life, attained_age)
    }

    /// Joint life factor, falling back to single life when no joint table is configured
    pub fn get_joint_life(&self, attained_age: u32) -> Rate {
        match &self.joint_life {
            Some(bands) => Self::lookup(bands, attained_age),
            None => self.get_single_life(attained_age),
        }
    }

    fn lookup(bands: &[PayoutBand], attained_age: u32) -> Rate {
        if let Some(band) = bands
            .iter()
            .find(|b| attained_age >= b.min_age && attained_age <= b.max_age)
        {
            return band.factor;
        }
        // Below the first band pays nothing; beyond the table uses the oldest band
        match bands.first() {
            Some(first) if attained_age < first.min_age => Decimal::ZERO,
            _ => bands.last().map(|b| b.factor).unwrap_or(Decimal::ZERO),
        }
    }
}

/// GLWB rider constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlwbConstants {
    /// Bonus applied to premium for the initial benefit base
    pub benefit_base_bonus: Rate,

    /// Annual rider charge as a fraction of benefit base
    pub rider_charge: Rate,

    /// Simple annual rollup rate
    pub rollup: Rate,

    /// Maximum years of rollup
    pub rollup_period: u32,

    #[serde(default)]
    pub payout_factors: PayoutFactors,
}

impl Default for GlwbConstants {
    fn default() -> Self {
        Self {
            benefit_base_bonus: dec!(0.05),
            rider_charge: dec!(0.0095),
            rollup: dec!(0.05),
            rollup_period: 10,
            payout_factors: PayoutFactors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrender_charges() {
        let sc = MygaConstants::default().surrender_charges;

        assert_eq!(sc.get(1), Some(dec!(0.08)));
        assert_eq!(sc.get(5), Some(dec!(0.04)));
        assert_eq!(sc.get(10), Some(dec!(0.00)));
        assert_eq!(sc.get(11), None);
        assert_eq!(sc.rate_or_zero(20), Decimal::ZERO);
    }

    #[test]
    fn test_myga_credited_rate() {
        let myga = MygaConstants::default();

        assert_eq!(myga.credited_rate(1, 5), dec!(0.055));
        assert_eq!(myga.credited_rate(4, 5), dec!(0.046));
        // Second term always uses the MGIR
        assert_eq!(myga.credited_rate(6, 5), dec!(0.045));
        // First-term year missing from the table falls back to MGIR
        assert_eq!(myga.credited_rate(7, 7), dec!(0.045));
        // Short first term: year 3 is already second term
        assert_eq!(myga.credited_rate(3, 2), dec!(0.045));
    }

    #[test]
    fn test_string_and_numeric_year_keys() {
        let by_string: YearSchedule = serde_json::from_str(r#"{"1": 0.09, "2": 0.08}"#).unwrap();
        let by_number = YearSchedule::from_loaded(&[(1, dec!(0.09)), (2, dec!(0.08))]);
        assert_eq!(by_string, by_number);
    }

    #[test]
    fn test_payout_factors() {
        let pf = PayoutFactors::default();

        assert_eq!(pf.get_single_life(52), dec!(0.046));
        assert_eq!(pf.get_single_life(65), dec!(0.055));
        assert_eq!(pf.get_single_life(77), dec!(0.070));
        assert_eq!(pf.get_single_life(125), dec!(0.090));
        assert_eq!(pf.get_single_life(45), Decimal::ZERO);
        assert_eq!(pf.get_joint_life(65), dec!(0.055));

        let joint = pf.with_joint_life(vec![PayoutBand { min_age: 50, max_age: 120, factor: dec!(0.045) }]);
        assert_eq!(joint.get_joint_life(65), dec!(0.045));
    }
}
