//! Index return generation for FIA crediting buckets
//!
//! The engine asks an [`IndexReturnSource`] for each bucket's realized return
//! every year. [`SeededIndexReturns`] is a development stub that samples
//! uniform returns scaled by the product's caps and participation rates; it
//! is not a market model. [`FixedIndexReturns`] supplies deterministic
//! returns for tests and level-rate illustrations.

use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assumptions::{FiaConstants, IndexCapParticipation};
use crate::client::IndexAllocation;
use crate::types::Rate;

/// Seed used when a caller does not pick one
pub const DEFAULT_INDEX_SEED: u64 = 20_240_601;

/// FIA crediting buckets, in sampling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexBucket {
    /// Point-to-point with cap
    PtpWCap,
    /// Point-to-point with participation, S&P 500
    PtpW500,
    /// Point-to-point with participation, MARC5
    PtpWMarc5,
    /// Point-to-point with participation, TCA
    PtpWTca,
    /// Fixed interest account
    Fixed,
}

impl IndexBucket {
    pub const ALL: [IndexBucket; 5] = [
        IndexBucket::PtpWCap,
        IndexBucket::PtpW500,
        IndexBucket::PtpWMarc5,
        IndexBucket::PtpWTca,
        IndexBucket::Fixed,
    ];

    /// Client's allocation share for this bucket
    pub fn allocation(&self, allocation: &IndexAllocation) -> Rate {
        match self {
            IndexBucket::PtpWCap => allocation.ptp_w_cap,
            IndexBucket::PtpW500 => allocation.ptp_w_participation_500,
            IndexBucket::PtpWMarc5 => allocation.ptp_w_participation_marc5,
            IndexBucket::PtpWTca => allocation.ptp_w_participation_tca,
            IndexBucket::Fixed => allocation.fixed_account,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            IndexBucket::PtpWCap => "ptp_w_cap",
            IndexBucket::PtpW500 => "ptp_w_500",
            IndexBucket::PtpWMarc5 => "ptp_w_marc5",
            IndexBucket::PtpWTca => "ptp_w_tca",
            IndexBucket::Fixed => "fixed",
        }
    }
}

impl fmt::Display for IndexBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Supplies the realized annual return of a bucket
pub trait IndexReturnSource {
    fn index_return(&mut self, year: u32, bucket: IndexBucket) -> Rate;
}

impl<F> IndexReturnSource for F
where
    F: FnMut(u32, IndexBucket) -> Rate,
{
    fn index_return(&mut self, year: u32, bucket: IndexBucket) -> Rate {
        self(year, bucket)
    }
}

/// Seeded uniform sampling of bucket returns (development stub)
#[derive(Debug, Clone)]
pub struct SeededIndexReturns {
    rng: StdRng,
    seed: u64,
    caps: IndexCapParticipation,
    fixed_rate: Rate,
}

impl SeededIndexReturns {
    pub fn new(seed: u64, constants: &FiaConstants) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            caps: constants.index_account_cap_part,
            fixed_rate: constants.fixed_rate,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1) as a decimal
    fn uniform(&mut self) -> Decimal {
        let u: f64 = self.rng.gen();
        Decimal::from_f64_retain(u)
            .map(|d| d.round_dp(12))
            .unwrap_or(Decimal::ZERO)
    }
}

impl IndexReturnSource for SeededIndexReturns {
    fn index_return(&mut self, _year: u32, bucket: IndexBucket) -> Rate {
        match bucket {
            IndexBucket::PtpWCap => (self.uniform() * dec!(0.12)).min(self.caps.ptp_w_cap_rate),
            IndexBucket::PtpW500 => self.uniform() * dec!(0.15) * self.caps.ptp_w_part_rate_500,
            IndexBucket::PtpWMarc5 => self.uniform() * dec!(0.12) * self.caps.ptp_w_part_rate_marc5,
            IndexBucket::PtpWTca => self.uniform() * dec!(0.10) * self.caps.ptp_w_part_rate_tca,
            IndexBucket::Fixed => self.fixed_rate,
        }
    }
}

/// Deterministic bucket returns, optionally overridden per year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedIndexReturns {
    by_bucket: BTreeMap<IndexBucket, Rate>,
    by_year: BTreeMap<(u32, IndexBucket), Rate>,
}

impl FixedIndexReturns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the fixed account earns anything
    pub fn fixed_only(constants: &FiaConstants) -> Self {
        Self::new().with_bucket(IndexBucket::Fixed, constants.fixed_rate)
    }

    /// Every bucket earns the same rate every year
    pub fn level(rate: Rate) -> Self {
        IndexBucket::ALL
            .iter()
            .fold(Self::new(), |returns, bucket| returns.with_bucket(*bucket, rate))
    }

    pub fn with_bucket(mut self, bucket: IndexBucket, rate: Rate) -> Self {
        self.by_bucket.insert(bucket, rate);
        self
    }

    pub fn with_year(mut self, year: u32, bucket: IndexBucket, rate: Rate) -> Self {
        self.by_year.insert((year, bucket), rate);
        self
    }
}

impl IndexReturnSource for FixedIndexReturns {
    fn index_return(&mut self, year: u32, bucket: IndexBucket) -> Rate {
        self.by_year
            .get(&(year, bucket))
            .or_else(|| self.by_bucket.get(&bucket))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// How a runner generates FIA index returns
#[derive(Debug, Clone, PartialEq)]
pub enum IndexReturnModel {
    /// Seeded stub; reseeded for every projection so identical inputs match
    Stochastic { seed: u64 },
    Fixed(FixedIndexReturns),
}

impl Default for IndexReturnModel {
    fn default() -> Self {
        IndexReturnModel::Stochastic { seed: DEFAULT_INDEX_SEED }
    }
}

impl IndexReturnModel {
    /// Fresh source for one projection
    pub fn source(&self, constants: &FiaConstants) -> ModelReturns {
        match self {
            IndexReturnModel::Stochastic { seed } => {
                ModelReturns::Seeded(SeededIndexReturns::new(*seed, constants))
            }
            IndexReturnModel::Fixed(returns) => ModelReturns::Fixed(returns.clone()),
        }
    }
}

/// Source built from an [`IndexReturnModel`]
#[derive(Debug, Clone)]
pub enum ModelReturns {
    Seeded(SeededIndexReturns),
    Fixed(FixedIndexReturns),
}

impl IndexReturnSource for ModelReturns {
    fn index_return(&mut self, year: u32, bucket: IndexBucket) -> Rate {
        match self {
            ModelReturns::Seeded(source) => source.index_return(year, bucket),
            ModelReturns::Fixed(source) => source.index_return(year, bucket),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_returns_reproducible() {
        let fia = FiaConstants::default();
        let mut a = SeededIndexReturns::new(42, &fia);
        let mut b = SeededIndexReturns::new(42, &fia);

        for year in 1..=10 {
            for bucket in IndexBucket::ALL {
                assert_eq!(a.index_return(year, bucket), b.index_return(year, bucket));
            }
        }
    }

    #[test]
    fn test_seeded_returns_respect_caps() {
        let fia = FiaConstants::default();
        let mut source = SeededIndexReturns::new(7, &fia);

        for year in 1..=200 {
            let cap = source.index_return(year, IndexBucket::PtpWCap);
            assert!(cap >= Decimal::ZERO && cap <= dec!(0.06));

            let sp500 = source.index_return(year, IndexBucket::PtpW500);
            assert!(sp500 >= Decimal::ZERO && sp500 < dec!(0.15) * dec!(0.85));

            let marc5 = source.index_return(year, IndexBucket::PtpWMarc5);
            assert!(marc5 >= Decimal::ZERO && marc5 < dec!(0.12) * dec!(0.80));

            let tca = source.index_return(year, IndexBucket::PtpWTca);
            assert!(tca >= Decimal::ZERO && tca < dec!(0.10) * dec!(0.75));

            assert_eq!(source.index_return(year, IndexBucket::Fixed), dec!(0.03));
        }
    }

    #[test]
    fn test_fixed_returns_year_override() {
        let mut returns = FixedIndexReturns::level(dec!(0.02)).with_year(3, IndexBucket::PtpW500, dec!(0.09));

        assert_eq!(returns.index_return(1, IndexBucket::PtpW500), dec!(0.02));
        assert_eq!(returns.index_return(3, IndexBucket::PtpW500), dec!(0.09));
        assert_eq!(returns.index_return(3, IndexBucket::Fixed), dec!(0.02));
        assert_eq!(FixedIndexReturns::new().index_return(1, IndexBucket::Fixed), Decimal::ZERO);
    }

    #[test]
    fn test_closure_source() {
        let mut source = |year: u32, _bucket: IndexBucket| Decimal::from(year) / dec!(100);
        assert_eq!(source.index_return(4, IndexBucket::PtpWTca), dec!(0.04));
    }
}
