//! Wire response built from a numeric projection

use serde::{Deserialize, Serialize};

use super::currency::{format_currency, format_percent, parse_currency_or_zero};
use crate::assumptions::{FiaConstants, MygaConstants, YearSchedule};
use crate::client::IndexAllocation;
use crate::projection::{GlwbYear, ProjectionResult, YearRow};
use crate::types::Money;

/// Status string returned with every computed illustration
pub const STATUS_SUCCESS: &str = "success";

/// One ledger row on the wire:
/// `[year, age, premium, withdrawal, accumulation value, surrender value]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow(pub u32, pub u32, pub String, pub String, pub String, pub String);

impl LedgerRow {
    pub fn from_year(row: &YearRow) -> Self {
        LedgerRow(
            row.year,
            row.age,
            format_currency(row.premium),
            format_currency(row.withdrawal),
            format_currency(row.accumulation_value),
            format_currency(row.surrender_value),
        )
    }

    pub fn year(&self) -> u32 {
        self.0
    }

    pub fn age(&self) -> u32 {
        self.1
    }
}

/// Allocation shares echoed back as percent strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexAllocationEcho {
    pub ptp_w_cap_rate: String,
    pub ptp_w_participation_rate_500: String,
    pub ptp_w_participation_rate_marc5: String,
    pub ptp_w_participation_rate_tca: String,
    pub fixed_interest_account: String,
}

impl From<&IndexAllocation> for IndexAllocationEcho {
    fn from(allocation: &IndexAllocation) -> Self {
        Self {
            ptp_w_cap_rate: format_percent(allocation.ptp_w_cap),
            ptp_w_participation_rate_500: format_percent(allocation.ptp_w_participation_500),
            ptp_w_participation_rate_marc5: format_percent(allocation.ptp_w_participation_marc5),
            ptp_w_participation_rate_tca: format_percent(allocation.ptp_w_participation_tca),
            fixed_interest_account: format_percent(allocation.fixed_account),
        }
    }
}

/// Product-specific rate fields, flattened into the calc data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductEcho {
    Fia {
        premium_bonus: String,
        fixed_rate: String,
        term_1_surrender_rates: Vec<String>,
        index_allocations: IndexAllocationEcho,
    },
    Myga {
        mgir: String,
        term_1_rate: String,
        term_1_surrender_rates: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllustrationCalcData {
    pub data: Vec<LedgerRow>,
    pub durations: u32,
    /// Final accumulation value; empty when nothing was projected
    pub accumulation_value_at_maturity: Vec<String>,
    pub complete_surrender_values: Vec<String>,
    #[serde(flatten)]
    pub echo: ProductEcho,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glwb: Option<Vec<GlwbYear>>,
}

/// Response for one illustration, shaped like the illustration service's
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllustrationResponse {
    pub status: String,
    pub illustration_calc_data: IllustrationCalcData,
}

fn surrender_rate_strings<'a>(schedule: &'a YearSchedule) -> impl Iterator<Item = String> + 'a {
    schedule.iter().map(|(_, rate)| format_percent(rate))
}

impl IllustrationResponse {
    fn build(result: &ProjectionResult, echo: ProductEcho) -> Self {
        let data = result.rows.iter().map(LedgerRow::from_year).collect();

        Self {
            status: STATUS_SUCCESS.to_string(),
            illustration_calc_data: IllustrationCalcData {
                data,
                durations: result.durations(),
                accumulation_value_at_maturity: result
                    .value_at_maturity()
                    .map(format_currency)
                    .into_iter()
                    .collect(),
                complete_surrender_values: result.surrender_values().into_iter().map(format_currency).collect(),
                echo,
                age: result.client_age,
                glwb: result.glwb.clone(),
            },
        }
    }

    /// MYGA response. `term_1_rate` echoes the MGIR and the surrender rates
    /// cover the first term only.
    pub fn from_myga(result: &ProjectionResult, constants: &MygaConstants, first_term_years: u32) -> Self {
        let echo = ProductEcho::Myga {
            mgir: format_percent(constants.mgir),
            term_1_rate: format_percent(constants.mgir),
            term_1_surrender_rates: surrender_rate_strings(&constants.surrender_charges)
                .take(first_term_years as usize)
                .collect(),
        };
        Self::build(result, echo)
    }

    pub fn from_fia(result: &ProjectionResult, constants: &FiaConstants, allocation: &IndexAllocation) -> Self {
        let echo = ProductEcho::Fia {
            premium_bonus: format_percent(constants.premium_bonus),
            fixed_rate: format_percent(constants.fixed_rate),
            term_1_surrender_rates: surrender_rate_strings(&constants.surrender_charges).collect(),
            index_allocations: allocation.into(),
        };
        Self::build(result, echo)
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.illustration_calc_data.data
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Numeric view of a wire row
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub year: u32,
    pub age: u32,
    pub premium: Money,
    pub withdrawal: Money,
    pub accumulation_value: Money,
    pub surrender_value: Money,
}

/// Re-read formatted wire rows; unparseable amounts read as zero
pub fn parse_rows(rows: &[LedgerRow]) -> Vec<ParsedRow> {
    rows.iter()
        .map(|row| ParsedRow {
            year: row.0,
            age: row.1,
            premium: parse_currency_or_zero(&row.2),
            withdrawal: parse_currency_or_zero(&row.3),
            accumulation_value: parse_currency_or_zero(&row.4),
            surrender_value: parse_currency_or_zero(&row.5),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::GlwbConstants;
    use crate::client::ClientProductParameters;
    use crate::projection::{FiaEngine, FixedIndexReturns, MygaEngine};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn params(first: u32, second: u32) -> ClientProductParameters {
        let birthday = NaiveDate::from_ymd_opt(1970, 3, 10).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        ClientProductParameters::new(birthday, as_of, dec!(50000), first).with_second_term(second)
    }

    #[test]
    fn test_myga_response_shape() {
        let constants = MygaConstants::default();
        let result = MygaEngine::new(constants.clone()).project(&params(3, 2));
        let response = IllustrationResponse::from_myga(&result, &constants, 3);

        assert!(response.is_success());
        let calc = &response.illustration_calc_data;
        assert_eq!(calc.durations, 5);
        assert_eq!(calc.age, 55);
        assert_eq!(
            calc.data[0],
            LedgerRow(1, 56, "$50,000.00".into(), "$0.00".into(), "$52,750.00".into(), "$48,530.00".into())
        );
        assert_eq!(calc.complete_surrender_values.len(), 5);
        assert_eq!(calc.accumulation_value_at_maturity.len(), 1);
        assert_eq!(
            calc.echo,
            ProductEcho::Myga {
                mgir: "4.50%".into(),
                term_1_rate: "4.50%".into(),
                term_1_surrender_rates: vec!["8.00%".into(), "7.00%".into(), "6.00%".into()],
            }
        );
    }

    #[test]
    fn test_myga_wire_json() {
        let constants = MygaConstants::default();
        let result = MygaEngine::new(constants.clone()).project(&params(1, 0));
        let response = IllustrationResponse::from_myga(&result, &constants, 1);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["illustration_calc_data"]["data"][0][0], 1);
        assert_eq!(json["illustration_calc_data"]["data"][0][4], "$52,750.00");
        assert_eq!(json["illustration_calc_data"]["mgir"], "4.50%");
        assert!(json["illustration_calc_data"].get("glwb").is_none());

        let back: IllustrationResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_fia_response_echo() {
        let constants = FiaConstants::default();
        let engine = FiaEngine::new(constants.clone(), GlwbConstants::default());
        let allocation = IndexAllocation {
            ptp_w_cap: dec!(0.5),
            fixed_account: dec!(0.5),
            ..Default::default()
        };
        let params = params(10, 0).with_allocation(allocation);
        let result = engine.project(&params, &mut FixedIndexReturns::fixed_only(&constants));
        let response = IllustrationResponse::from_fia(&result, &constants, &allocation);

        match &response.illustration_calc_data.echo {
            ProductEcho::Fia { premium_bonus, fixed_rate, term_1_surrender_rates, index_allocations } => {
                assert_eq!(premium_bonus, "10.00%");
                assert_eq!(fixed_rate, "3.00%");
                assert_eq!(term_1_surrender_rates.len(), 10);
                assert_eq!(term_1_surrender_rates[0], "9.00%");
                assert_eq!(index_allocations.ptp_w_cap_rate, "50.00%");
                assert_eq!(index_allocations.ptp_w_participation_rate_500, "0.00%");
            }
            other => panic!("expected FIA echo, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_projection_has_no_maturity_value() {
        let constants = MygaConstants::default();
        let result = MygaEngine::new(constants.clone()).project(&params(0, 0));
        let response = IllustrationResponse::from_myga(&result, &constants, 0);

        assert!(response.rows().is_empty());
        assert!(response.illustration_calc_data.accumulation_value_at_maturity.is_empty());
    }

    #[test]
    fn test_parse_rows() {
        let rows = vec![
            LedgerRow(1, 56, "$50,000.00".into(), "$0.00".into(), "$52,750.00".into(), "$48,530.00".into()),
            LedgerRow(2, 57, "$50,000.00".into(), "garbled".into(), "-$10.50".into(), "$0.00".into()),
        ];
        let parsed = parse_rows(&rows);

        assert_eq!(parsed[0].accumulation_value, dec!(52750));
        assert_eq!(parsed[0].surrender_value, dec!(48530));
        assert_eq!(parsed[1].withdrawal, dec!(0));
        assert_eq!(parsed[1].accumulation_value, dec!(-10.5));
    }
}
