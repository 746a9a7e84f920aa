//! FIA projection engine: blended index and fixed-account crediting

use log::debug;
use rust_decimal::Decimal;

use super::cashflows::{ProjectionResult, YearRow};
use super::glwb::GlwbTracker;
use super::index::{IndexBucket, IndexReturnSource};
use super::state::ProjectionState;
use super::step::step_year;
use crate::assumptions::{FiaConstants, GlwbConstants};
use crate::client::{ClientProductParameters, IndexAllocation, ProductType};
use crate::types::{Money, Rate};

/// Projects a fixed index annuity
#[derive(Debug, Clone)]
pub struct FiaEngine {
    constants: FiaConstants,
    glwb: GlwbConstants,
}

impl FiaEngine {
    pub fn new(constants: FiaConstants, glwb: GlwbConstants) -> Self {
        Self { constants, glwb }
    }

    pub fn constants(&self) -> &FiaConstants {
        &self.constants
    }

    /// Account value at issue: premium plus the one-time premium bonus
    pub fn issue_value(&self, premium: Money) -> Money {
        premium * (Decimal::ONE + self.constants.premium_bonus)
    }

    /// Allocation-weighted return for one year, sampling buckets in order
    pub fn weighted_return<R>(&self, year: u32, allocation: &IndexAllocation, returns: &mut R) -> Rate
    where
        R: IndexReturnSource + ?Sized,
    {
        IndexBucket::ALL
            .iter()
            .map(|bucket| returns.index_return(year, *bucket) * bucket.allocation(allocation))
            .sum()
    }

    /// Run projection over `first_term_years` years.
    ///
    /// Allocations are used as given; they are not normalized to 100%.
    pub fn project<R>(&self, params: &ClientProductParameters, returns: &mut R) -> ProjectionResult
    where
        R: IndexReturnSource + ?Sized,
    {
        let issue_value = self.issue_value(params.premium);
        let mut result = ProjectionResult::new(ProductType::Fia, params.client_age, params.premium, issue_value);
        let mut state = ProjectionState::at_issue(params, issue_value);

        let mut glwb = params
            .glwb
            .elected
            .then(|| GlwbTracker::new(&self.glwb, params.glwb, params.premium));
        let mut glwb_rows = Vec::new();

        for _year in 1..=params.first_term_years {
            state.advance_year(params);

            let rate = self.weighted_return(state.year, &params.allocation, returns);
            let step = step_year(state.current_value, state.year, rate, &params.withdrawal, &self.constants);

            debug!(
                "FIA year {}: weighted return {} withdrawal {} value {}",
                state.year, rate, step.withdrawal, step.accumulation_value
            );

            if let Some(tracker) = glwb.as_mut() {
                glwb_rows.push(tracker.advance(state.year, state.attained_age));
            }

            state.current_value = step.accumulation_value;
            result.add_row(YearRow::from_step(state.year, state.attained_age, params.premium, &step));
        }

        if glwb.is_some() {
            result.glwb = Some(glwb_rows);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{GlwbElection, WithdrawalPlan};
    use crate::projection::{FixedIndexReturns, SeededIndexReturns};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn test_params(first: u32) -> ClientProductParameters {
        let birthday = NaiveDate::from_ymd_opt(1965, 5, 1).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        ClientProductParameters::new(birthday, as_of, dec!(50000), first).with_allocation(IndexAllocation {
            ptp_w_cap: dec!(0.2),
            ptp_w_participation_500: dec!(0.2),
            ptp_w_participation_marc5: dec!(0.2),
            ptp_w_participation_tca: dec!(0.2),
            fixed_account: dec!(0.2),
        })
    }

    fn engine() -> FiaEngine {
        FiaEngine::new(FiaConstants::default(), GlwbConstants::default())
    }

    #[test]
    fn test_premium_bonus_applied_once() {
        let engine = engine();
        let mut zero = FixedIndexReturns::new();
        let result = engine.project(&test_params(10), &mut zero);

        assert_eq!(result.issue_value, dec!(55000));
        assert_eq!(result.rows[0].beginning_value, dec!(55000));
        // No crediting and no withdrawals: the bonus is never reapplied
        for row in &result.rows {
            assert_eq!(row.accumulation_value, dec!(55000));
        }
    }

    #[test]
    fn test_weighted_return() {
        let engine = engine();
        let mut returns = FixedIndexReturns::new()
            .with_bucket(IndexBucket::PtpWCap, dec!(0.06))
            .with_bucket(IndexBucket::PtpW500, dec!(0.10))
            .with_bucket(IndexBucket::Fixed, dec!(0.03));

        let rate = engine.weighted_return(1, &test_params(1).allocation, &mut returns);
        assert_eq!(rate, dec!(0.038));

        let result = engine.project(&test_params(1), &mut returns);
        assert_eq!(result.rows[0].accumulation_value, dec!(55000) * dec!(1.038));
    }

    #[test]
    fn test_allocations_are_not_normalized() {
        let engine = engine();
        let params = test_params(1).with_allocation(IndexAllocation {
            fixed_account: dec!(0.5),
            ..Default::default()
        });
        let mut returns = FixedIndexReturns::fixed_only(engine.constants());

        let result = engine.project(&params, &mut returns);
        assert_eq!(result.rows[0].credited_rate, dec!(0.015));
    }

    #[test]
    fn test_flat_free_withdrawal_and_string_keyed_charges() {
        let engine = engine();
        // 15% of value in year 2: 10% free, 5% excess charged at 8%
        let params = test_params(3).with_withdrawal(WithdrawalPlan::percentage(dec!(15), 2, 2));
        let mut zero = FixedIndexReturns::new();
        let result = engine.project(&params, &mut zero);

        let year2 = &result.rows[1];
        assert_eq!(year2.withdrawal, dec!(8250));
        assert_eq!(year2.free_allowance, dec!(5500));
        assert_eq!(year2.penalty, dec!(2750) * dec!(0.08));
        assert_eq!(year2.accumulation_value, dec!(55000) - dec!(8250) - dec!(220));
        assert_eq!(result.rows[2].withdrawal, Decimal::ZERO);
    }

    #[test]
    fn test_seeded_projection_is_reproducible() {
        let engine = engine();
        let params = test_params(10);

        let first = engine.project(&params, &mut SeededIndexReturns::new(99, engine.constants()));
        let second = engine.project(&params, &mut SeededIndexReturns::new(99, engine.constants()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_glwb_side_ledger_leaves_values_alone() {
        let engine = engine();
        let plain = test_params(10);
        let with_glwb = plain.clone().with_glwb(GlwbElection {
            elected: true,
            activation_age: 65,
            joint: false,
        });

        let mut returns = FixedIndexReturns::level(dec!(0.03));
        let base = engine.project(&plain, &mut returns);
        let rider = engine.project(&with_glwb, &mut returns);

        assert!(base.glwb.is_none());
        let ledger = rider.glwb.as_ref().expect("glwb ledger");
        assert_eq!(ledger.len(), 10);
        assert_eq!(base.rows, rider.rows);
        // Client is 60; income starts in year 5 (age 65)
        assert!(!ledger[3].income_active);
        assert!(ledger[4].income_active);
    }
}
