//! Fail-fast checks applied at the request boundary
//!
//! The engines accept anything representable and never fail; these checks
//! reject parameter sets that would produce a meaningless ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::client::{ClientProductParameters, IndexAllocation, ProductType, WithdrawalPlan, WithdrawalType};
use crate::error::{IllustrationError, Result};

/// Allowed gap between the allocation total and 100%
pub const ALLOCATION_TOLERANCE: Decimal = dec!(0.0001);

/// Longest ledger, first and second terms combined
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Largest premium or fixed withdrawal accepted. Keeps a full-length ledger
/// at any plausible crediting rate inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(10000000000);

/// Validate parameters for `product` as of the calculation date
pub fn validate(params: &ClientProductParameters, product: ProductType, as_of: NaiveDate) -> Result<()> {
    if params.premium <= Decimal::ZERO {
        return Err(IllustrationError::invalid("premium", "must be greater than zero"));
    }

    if params.first_term_years == 0 {
        return Err(IllustrationError::invalid("first_term", "must be at least one year"));
    }

    validate_limits(params)?;

    if params.birthday > as_of {
        return Err(IllustrationError::invalid(
            "birthday",
            format!("{} is after the calculation date {}", params.birthday, as_of),
        ));
    }

    validate_withdrawal(&params.withdrawal)?;

    if product == ProductType::Fia {
        validate_allocation(&params.allocation)?;
    }

    Ok(())
}

/// Size bounds the engines rely on. Applied even when the other checks are skipped.
pub fn validate_limits(params: &ClientProductParameters) -> Result<()> {
    let years = params.first_term_years.saturating_add(params.second_term_years);
    if years > MAX_PROJECTION_YEARS {
        return Err(IllustrationError::invalid(
            "second_term",
            format!("{} projection years exceeds the maximum of {}", years, MAX_PROJECTION_YEARS),
        ));
    }

    if params.premium.abs() > MAX_AMOUNT {
        return Err(IllustrationError::invalid("premium", format!("exceeds the maximum of {}", MAX_AMOUNT)));
    }

    if params.withdrawal.withdrawal_type == WithdrawalType::Fixed && params.withdrawal.amount.abs() > MAX_AMOUNT {
        return Err(IllustrationError::invalid(
            "withdrawal_amount",
            format!("exceeds the maximum of {}", MAX_AMOUNT),
        ));
    }

    Ok(())
}

pub fn validate_withdrawal(plan: &WithdrawalPlan) -> Result<()> {
    if plan.withdrawal_type == WithdrawalType::None {
        return Ok(());
    }

    if plan.from_year == 0 {
        return Err(IllustrationError::invalid("withdrawal_from_year", "years are 1-based"));
    }
    if plan.from_year > plan.to_year {
        return Err(IllustrationError::invalid(
            "withdrawal_to_year",
            format!("year range {}..{} is reversed", plan.from_year, plan.to_year),
        ));
    }

    match plan.withdrawal_type {
        WithdrawalType::Percentage if plan.amount < Decimal::ZERO || plan.amount > dec!(100) => Err(
            IllustrationError::invalid("withdrawal_amount", format!("{}% is outside 0-100", plan.amount)),
        ),
        WithdrawalType::Fixed if plan.amount < Decimal::ZERO => {
            Err(IllustrationError::invalid("withdrawal_amount", "must not be negative"))
        }
        _ => Ok(()),
    }
}

pub fn validate_allocation(allocation: &IndexAllocation) -> Result<()> {
    let shares = [
        ("ptp_w_cap_rate", allocation.ptp_w_cap),
        ("ptp_w_participation_rate_500", allocation.ptp_w_participation_500),
        ("ptp_w_participation_rate_marc5", allocation.ptp_w_participation_marc5),
        ("ptp_w_participation_rate_tca", allocation.ptp_w_participation_tca),
        ("fixed_interest_account", allocation.fixed_account),
    ];

    for (field, share) in shares {
        if share < Decimal::ZERO || share > Decimal::ONE {
            return Err(IllustrationError::invalid(field, "allocation must be between 0% and 100%"));
        }
    }

    let total = allocation.total();
    if (total - Decimal::ONE).abs() > ALLOCATION_TOLERANCE {
        return Err(IllustrationError::invalid(
            "allocation",
            format!("allocations total {}%, expected 100%", total * dec!(100)),
        ));
    }

    Ok(())
}
