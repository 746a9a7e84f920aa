//! GLWB side ledger: benefit base, rider charge and guaranteed income by year
//!
//! Informational only. Nothing here feeds back into the accumulation or
//! surrender values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::GlwbConstants;
use crate::client::GlwbElection;
use crate::types::Money;

/// GLWB values for one projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlwbYear {
    pub year: u32,
    pub age: u32,
    /// End of year benefit base
    pub benefit_base: Money,
    pub rider_charge: Money,
    pub income_active: bool,
    /// Annual guaranteed withdrawal once income is active
    pub guaranteed_income: Money,
}

/// Rolls the benefit base forward year by year
#[derive(Debug, Clone)]
pub struct GlwbTracker<'a> {
    constants: &'a GlwbConstants,
    election: GlwbElection,
    initial_benefit_base: Money,
    benefit_base: Money,
    income_active: bool,
}

impl<'a> GlwbTracker<'a> {
    pub fn new(constants: &'a GlwbConstants, election: GlwbElection, premium: Money) -> Self {
        let initial_benefit_base = premium * (Decimal::ONE + constants.benefit_base_bonus);
        Self {
            constants,
            election,
            initial_benefit_base,
            benefit_base: initial_benefit_base,
            income_active: false,
        }
    }

    pub fn initial_benefit_base(&self) -> Money {
        self.initial_benefit_base
    }

    /// Advance one projection year at the given attained age
    pub fn advance(&mut self, year: u32, age: u32) -> GlwbYear {
        // Income switches on at the start of the first year at or past the activation age
        if !self.income_active && age >= self.election.activation_age {
            self.income_active = true;
        }

        // Simple rollup on the initial benefit base, only while deferring
        if !self.income_active && year <= self.constants.rollup_period {
            self.benefit_base =
                self.initial_benefit_base * (Decimal::ONE + self.constants.rollup * Decimal::from(year));
        }

        let guaranteed_income = if self.income_active {
            let factor = if self.election.joint {
                self.constants.payout_factors.get_joint_life(age)
            } else {
                self.constants.payout_factors.get_single_life(age)
            };
            self.benefit_base * factor
        } else {
            Decimal::ZERO
        };

        GlwbYear {
            year,
            age,
            benefit_base: self.benefit_base,
            rider_charge: self.benefit_base * self.constants.rider_charge,
            income_active: self.income_active,
            guaranteed_income,
        }
    }
}
