//! Numeric ledger output for projections

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::glwb::GlwbYear;
use super::step::YearStep;
use crate::client::ProductType;
use crate::types::{Money, Rate};

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    // Timing
    pub year: u32,
    pub age: u32,

    pub premium: Money,
    pub beginning_value: Money,

    // Crediting
    pub credited_rate: Rate,
    pub credited_interest: Money,

    // Withdrawals
    pub withdrawal: Money,
    pub free_allowance: Money,
    pub penalty: Money,

    // End of year values
    pub accumulation_value: Money,
    pub surrender_charge: Rate,
    pub surrender_value: Money,
    pub death_benefit: Money,
}

impl YearRow {
    pub fn from_step(year: u32, age: u32, premium: Money, step: &YearStep) -> Self {
        Self {
            year,
            age,
            premium,
            beginning_value: step.beginning_value,
            credited_rate: step.credited_rate,
            credited_interest: step.credited_interest,
            withdrawal: step.withdrawal,
            free_allowance: step.free_allowance,
            penalty: step.penalty,
            accumulation_value: step.accumulation_value,
            surrender_charge: step.surrender_charge,
            surrender_value: step.surrender_value,
            // Deferred annuity death benefit is the account value
            death_benefit: step.accumulation_value.max(Decimal::ZERO),
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub product: ProductType,

    /// Client age at calculation time
    pub client_age: u32,

    pub premium: Money,

    /// Account value at issue, before any year-1 crediting
    pub issue_value: Money,

    /// Yearly rows in chronological order
    pub rows: Vec<YearRow>,

    /// GLWB side ledger when the rider is elected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glwb: Option<Vec<GlwbYear>>,
}

impl ProjectionResult {
    pub fn new(product: ProductType, client_age: u32, premium: Money, issue_value: Money) -> Self {
        Self {
            product,
            client_age,
            premium,
            issue_value,
            rows: Vec::new(),
            glwb: None,
        }
    }

    /// Add a year row
    pub fn add_row(&mut self, row: YearRow) {
        self.rows.push(row);
    }

    /// Number of projected years
    pub fn durations(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn accumulation_values(&self) -> Vec<Money> {
        self.rows.iter().map(|r| r.accumulation_value).collect()
    }

    pub fn surrender_values(&self) -> Vec<Money> {
        self.rows.iter().map(|r| r.surrender_value).collect()
    }

    /// Accumulation value in the last projected year
    pub fn value_at_maturity(&self) -> Option<Money> {
        self.rows.last().map(|r| r.accumulation_value)
    }

    /// Get summary statistics
    pub fn summary(&self) -> LedgerSummary {
        let total_withdrawals: Money = self.rows.iter().map(|r| r.withdrawal).sum();
        let total_penalties: Money = self.rows.iter().map(|r| r.penalty).sum();
        let total_credited_interest: Money = self.rows.iter().map(|r| r.credited_interest).sum();

        let final_accumulation_value = self.value_at_maturity().unwrap_or(self.issue_value);
        let final_surrender_value = self.rows.last().map(|r| r.surrender_value).unwrap_or(Decimal::ZERO);
        let peak_accumulation_value = self
            .rows
            .iter()
            .map(|r| r.accumulation_value)
            .max()
            .unwrap_or(self.issue_value);

        LedgerSummary {
            total_years: self.durations(),
            total_withdrawals,
            total_penalties,
            total_credited_interest,
            final_accumulation_value,
            final_surrender_value,
            peak_accumulation_value,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_years: u32,
    pub total_withdrawals: Money,
    pub total_penalties: Money,
    pub total_credited_interest: Money,
    pub final_accumulation_value: Money,
    pub final_surrender_value: Money,
    pub peak_accumulation_value: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(year: u32, value: Money, withdrawal: Money) -> YearRow {
        YearRow {
            year,
            age: 45 + year,
            premium: dec!(1000),
            beginning_value: Decimal::ZERO,
            credited_rate: Decimal::ZERO,
            credited_interest: dec!(10),
            withdrawal,
            free_allowance: Decimal::ZERO,
            penalty: Decimal::ZERO,
            accumulation_value: value,
            surrender_charge: Decimal::ZERO,
            surrender_value: value.max(Decimal::ZERO),
            death_benefit: value.max(Decimal::ZERO),
        }
    }

    #[test]
    fn test_summary() {
        let mut result = ProjectionResult::new(ProductType::Myga, 45, dec!(1000), dec!(1000));
        result.add_row(row(1, dec!(1010), Decimal::ZERO));
        result.add_row(row(2, dec!(1020), Decimal::ZERO));
        result.add_row(row(3, dec!(930), dec!(100)));

        let summary = result.summary();
        assert_eq!(summary.total_years, 3);
        assert_eq!(summary.total_withdrawals, dec!(100));
        assert_eq!(summary.total_credited_interest, dec!(30));
        assert_eq!(summary.final_accumulation_value, dec!(930));
        assert_eq!(summary.peak_accumulation_value, dec!(1020));
    }

    #[test]
    fn test_empty_result_summary() {
        let result = ProjectionResult::new(ProductType::Fia, 60, dec!(5000), dec!(5500));
        let summary = result.summary();

        assert_eq!(result.value_at_maturity(), None);
        assert_eq!(summary.total_years, 0);
        assert_eq!(summary.final_accumulation_value, dec!(5500));
        assert_eq!(summary.final_surrender_value, Decimal::ZERO);
    }
}
