//! The annual growth / withdrawal / surrender step shared by both engines

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::assumptions::{FiaConstants, MygaConstants};
use crate::client::{WithdrawalPlan, WithdrawalType};
use crate::types::{Money, Rate};

/// Normalized view of a product's charge tables.
///
/// MYGA free withdrawals vary by year while FIA uses one flat fraction; both
/// engines go through this accessor so the stepping logic stays identical.
pub trait ChargeSchedule {
    /// Surrender charge for the year, `None` when the schedule has no entry
    fn surrender_charge(&self, year: u32) -> Option<Rate>;

    /// Fraction of current value withdrawable without penalty
    fn free_withdrawal_fraction(&self, year: u32) -> Rate;
}

impl ChargeSchedule for MygaConstants {
    fn surrender_charge(&self, year: u32) -> Option<Rate> {
        self.surrender_charges.get(year)
    }

    fn free_withdrawal_fraction(&self, year: u32) -> Rate {
        self.free_withdrawal.rate_or_zero(year)
    }
}

impl ChargeSchedule for FiaConstants {
    fn surrender_charge(&self, year: u32) -> Option<Rate> {
        self.surrender_charges.get(year)
    }

    fn free_withdrawal_fraction(&self, _year: u32) -> Rate {
        self.free_total_withdrawal
    }
}

/// Outcome of one projection year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearStep {
    pub beginning_value: Money,
    pub credited_rate: Rate,
    pub credited_interest: Money,
    /// Nominal withdrawal taken (0 outside the withdrawal window)
    pub withdrawal: Money,
    pub free_allowance: Money,
    /// Surrender charge levied on the withdrawal above the free allowance
    pub penalty: Money,
    /// Charge rate used for the surrender value (0 when unscheduled)
    pub surrender_charge: Rate,
    /// Value after growth, withdrawal and penalty; may be negative
    pub accumulation_value: Money,
    /// Never negative
    pub surrender_value: Money,
}

/// Nominal withdrawal for a year, given the post-growth value
pub fn nominal_withdrawal(plan: &WithdrawalPlan, post_growth_value: Money) -> Money {
    match plan.withdrawal_type {
        WithdrawalType::None => Decimal::ZERO,
        WithdrawalType::Fixed => plan.amount,
        WithdrawalType::Percentage => post_growth_value * (plan.amount / dec!(100)),
    }
}

/// Advance one projection year.
///
/// Growth is credited first, then the withdrawal (if `year` is inside the
/// plan's window) comes off in full. The free allowance only decides how
/// much of that withdrawal is penalized. The surrender value applies the
/// year's charge to the post-withdrawal value whether or not anything was
/// withdrawn.
pub fn step_year<S: ChargeSchedule + ?Sized>(
    beginning_value: Money,
    year: u32,
    credited_rate: Rate,
    plan: &WithdrawalPlan,
    schedule: &S,
) -> YearStep {
    let mut value = beginning_value * (Decimal::ONE + credited_rate);
    let credited_interest = value - beginning_value;
    let scheduled_charge = schedule.surrender_charge(year);

    let mut withdrawal = Decimal::ZERO;
    let mut free_allowance = Decimal::ZERO;
    let mut penalty = Decimal::ZERO;

    if plan.applies_in(year) {
        withdrawal = nominal_withdrawal(plan, value);
        free_allowance = value * schedule.free_withdrawal_fraction(year);
        let excess = (withdrawal - free_allowance).max(Decimal::ZERO);

        value -= withdrawal;

        if excess > Decimal::ZERO {
            if let Some(charge) = scheduled_charge.filter(|c| !c.is_zero()) {
                penalty = excess * charge;
                value -= penalty;
            }
        }
    }

    let surrender_charge = scheduled_charge.unwrap_or(Decimal::ZERO);
    let surrender_value = (value * (Decimal::ONE - surrender_charge)).max(Decimal::ZERO);

    YearStep {
        beginning_value,
        credited_rate,
        credited_interest,
        withdrawal,
        free_allowance,
        penalty,
        surrender_charge,
        accumulation_value: value,
        surrender_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_before_withdrawal() {
        let myga = MygaConstants::default();
        // Year 2: 10% free, 7% surrender charge
        let plan = WithdrawalPlan::fixed(dec!(1000), 1, 10);
        let step = step_year(dec!(100000), 2, dec!(0.05), &plan, &myga);

        assert_eq!(step.credited_interest, dec!(5000));
        assert_eq!(step.free_allowance, dec!(10500));
        assert_eq!(step.withdrawal, dec!(1000));
        assert_eq!(step.penalty, Decimal::ZERO);
        assert_eq!(step.accumulation_value, dec!(104000));
        assert_eq!(step.surrender_value, dec!(104000) * dec!(0.93));
    }

    #[test]
    fn test_excess_withdrawal_is_penalized() {
        let myga = MygaConstants::default();
        // Year 1: no free withdrawal, 8% charge on the whole withdrawal
        let plan = WithdrawalPlan::fixed(dec!(5000), 1, 1);
        let step = step_year(dec!(50000), 1, dec!(0.055), &plan, &myga);

        assert_eq!(step.free_allowance, Decimal::ZERO);
        assert_eq!(step.penalty, dec!(400));
        assert_eq!(step.accumulation_value, dec!(52750) - dec!(5000) - dec!(400));
    }

    #[test]
    fn test_withdrawal_equal_to_free_allowance_has_no_penalty() {
        let fia = FiaConstants::default();
        let plan = WithdrawalPlan::percentage(dec!(10), 1, 10);
        let step = step_year(dec!(80000), 3, dec!(0.04), &plan, &fia);

        assert_eq!(step.withdrawal, step.free_allowance);
        assert_eq!(step.penalty, Decimal::ZERO);
        assert_eq!(step.accumulation_value, dec!(83200) - step.withdrawal);
    }

    #[test]
    fn test_zero_charge_year_never_penalizes() {
        let fia = FiaConstants::default();
        // Year 10 carries a 0% charge
        let plan = WithdrawalPlan::fixed(dec!(50000), 10, 10);
        let step = step_year(dec!(60000), 10, Decimal::ZERO, &plan, &fia);

        assert_eq!(step.penalty, Decimal::ZERO);
        assert_eq!(step.accumulation_value, dec!(10000));
        assert_eq!(step.surrender_value, dec!(10000));
    }

    #[test]
    fn test_overdrawn_value_goes_negative_but_surrender_value_floors() {
        let myga = MygaConstants::default();
        let plan = WithdrawalPlan::fixed(dec!(20000), 3, 3);
        let step = step_year(dec!(10000), 3, dec!(0.048), &plan, &myga);

        assert!(step.accumulation_value < Decimal::ZERO);
        assert_eq!(step.surrender_value, Decimal::ZERO);
    }

    #[test]
    fn test_unscheduled_year_has_no_surrender_charge() {
        let myga = MygaConstants::default();
        let step = step_year(dec!(1000), 15, dec!(0.045), &WithdrawalPlan::none(), &myga);

        assert_eq!(step.surrender_charge, Decimal::ZERO);
        assert_eq!(step.surrender_value, step.accumulation_value);
    }
}
