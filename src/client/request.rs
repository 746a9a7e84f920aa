//! Wire-format illustration request as sent by the illustration form

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::data::{
    ClientProductParameters, Frequency, GlwbElection, IndexAllocation, ProductType,
    WithdrawalPlan, WithdrawalType,
};
use crate::error::{IllustrationError, Result};
use crate::types::percent_to_fraction;

/// GLWB activation age used when the form leaves it blank
pub const DEFAULT_GLWB_ACTIVATION_AGE: u32 = 65;

/// Request payload for one illustration.
///
/// FIA allocation fields are percentages (0-100) here and fractions once
/// converted to [`ClientProductParameters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllustrationRequest {
    #[serde(default, deserialize_with = "deserialize_product_type")]
    pub product_type: Option<ProductType>,

    #[serde(default)]
    pub premium: Decimal,

    #[serde(deserialize_with = "deserialize_birthday")]
    pub birthday: NaiveDate,

    #[serde(default)]
    pub first_term: u32,

    #[serde(default)]
    pub second_term: u32,

    #[serde(default)]
    pub withdrawal_type: WithdrawalType,

    #[serde(default)]
    pub withdrawal_amount: Decimal,

    #[serde(default)]
    pub withdrawal_from_year: u32,

    #[serde(default)]
    pub withdrawal_to_year: u32,

    #[serde(default)]
    pub frequency: Frequency,

    #[serde(default)]
    pub ptp_w_cap_rate: Decimal,

    #[serde(default)]
    pub ptp_w_participation_rate_500: Decimal,

    #[serde(default)]
    pub ptp_w_participation_rate_marc5: Decimal,

    #[serde(default)]
    pub ptp_w_participation_rate_tca: Decimal,

    #[serde(default)]
    pub fixed_interest_account: Decimal,

    #[serde(default)]
    pub glwb: bool,

    #[serde(default)]
    pub glwb_activation_age: u32,

    #[serde(default)]
    pub joint_indicator: bool,
}

impl IllustrationRequest {
    /// Minimal request for a product with no withdrawals
    pub fn new(product_type: ProductType, premium: Decimal, birthday: NaiveDate, first_term: u32) -> Self {
        Self {
            product_type: Some(product_type),
            premium,
            birthday,
            first_term,
            second_term: 0,
            withdrawal_type: WithdrawalType::None,
            withdrawal_amount: Decimal::ZERO,
            withdrawal_from_year: 0,
            withdrawal_to_year: 0,
            frequency: Frequency::None,
            ptp_w_cap_rate: Decimal::ZERO,
            ptp_w_participation_rate_500: Decimal::ZERO,
            ptp_w_participation_rate_marc5: Decimal::ZERO,
            ptp_w_participation_rate_tca: Decimal::ZERO,
            fixed_interest_account: Decimal::ZERO,
            glwb: false,
            glwb_activation_age: 0,
            joint_indicator: false,
        }
    }

    /// Selected product, rejecting requests that never picked one
    pub fn product(&self) -> Result<ProductType> {
        self.product_type.ok_or(IllustrationError::MissingProductType)
    }

    /// Allocation percentages converted to fractions
    pub fn allocation(&self) -> IndexAllocation {
        IndexAllocation {
            ptp_w_cap: percent_to_fraction(self.ptp_w_cap_rate),
            ptp_w_participation_500: percent_to_fraction(self.ptp_w_participation_rate_500),
            ptp_w_participation_marc5: percent_to_fraction(self.ptp_w_participation_rate_marc5),
            ptp_w_participation_tca: percent_to_fraction(self.ptp_w_participation_rate_tca),
            fixed_account: percent_to_fraction(self.fixed_interest_account),
        }
    }

    /// Convert to engine parameters, aging the client as of `as_of`
    pub fn to_parameters(&self, as_of: NaiveDate) -> Result<(ProductType, ClientProductParameters)> {
        let product = self.product()?;

        let withdrawal = WithdrawalPlan {
            withdrawal_type: self.withdrawal_type,
            amount: self.withdrawal_amount,
            from_year: self.withdrawal_from_year,
            to_year: self.withdrawal_to_year,
            frequency: self.frequency,
        };

        let mut params = ClientProductParameters::new(self.birthday, as_of, self.premium, self.first_term)
            .with_withdrawal(withdrawal);

        match product {
            ProductType::Myga => {
                params = params.with_second_term(self.second_term);
            }
            ProductType::Fia => {
                let activation_age = if self.glwb_activation_age == 0 {
                    DEFAULT_GLWB_ACTIVATION_AGE
                } else {
                    self.glwb_activation_age
                };
                params = params
                    .with_allocation(self.allocation())
                    .with_glwb(GlwbElection {
                        elected: self.glwb,
                        activation_age,
                        joint: self.joint_indicator,
                    });
            }
        }

        Ok((product, params))
    }
}

/// Parse a birthday from an ISO date, an RFC 3339 timestamp, or `MM/DD/YYYY`
pub fn parse_birthday(text: &str) -> Result<NaiveDate> {
    let text = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%m/%d/%Y") {
        return Ok(date);
    }

    Err(IllustrationError::InvalidDate(text.to_string()))
}

fn deserialize_birthday<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<NaiveDate, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_birthday(&text).map_err(serde::de::Error::custom)
}

fn deserialize_product_type<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<ProductType>, D::Error> {
    // The form sends "" until a product is picked
    let text: Option<String> = Option::deserialize(deserializer)?;
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[test]
    fn test_parse_birthday_formats() {
        let expected = NaiveDate::from_ymd_opt(1980, 3, 14).unwrap();
        assert_eq!(parse_birthday("1980-03-14").unwrap(), expected);
        assert_eq!(parse_birthday("1980-03-14T05:00:00.000Z").unwrap(), expected);
        assert_eq!(parse_birthday("1980-03-14T05:00:00").unwrap(), expected);
        assert_eq!(parse_birthday("03/14/1980").unwrap(), expected);
        assert!(matches!(parse_birthday("yesterday"), Err(IllustrationError::InvalidDate(_))));
    }

    #[test]
    fn test_deserialize_form_payload() {
        let json = r#"{
            "product_type": "FIA",
            "premium": 50000,
            "birthday": "1980-01-01T00:00:00.000Z",
            "first_term": 10,
            "second_term": 0,
            "withdrawal_type": "percentage",
            "withdrawal_amount": 5,
            "withdrawal_from_year": 6,
            "withdrawal_to_year": 10,
            "frequency": "Yearly",
            "ptp_w_cap_rate": 20,
            "ptp_w_participation_rate_500": 20,
            "ptp_w_participation_rate_marc5": 20,
            "ptp_w_participation_rate_tca": 20,
            "fixed_interest_account": 20,
            "glwb": true,
            "glwb_activation_age": 0,
            "joint_indicator": false
        }"#;

        let request: IllustrationRequest = serde_json::from_str(json).unwrap();
        let (product, params) = request.to_parameters(as_of()).unwrap();

        assert_eq!(product, ProductType::Fia);
        assert_eq!(params.client_age, 45);
        assert_eq!(params.premium, dec!(50000));
        assert_eq!(params.allocation.ptp_w_cap, dec!(0.2));
        assert_eq!(params.allocation.total(), dec!(1));
        assert_eq!(params.withdrawal.withdrawal_type, WithdrawalType::Percentage);
        assert_eq!(params.glwb.activation_age, DEFAULT_GLWB_ACTIVATION_AGE);
        assert!(params.glwb.elected);
    }

    #[test]
    fn test_missing_product_type_rejected() {
        let json = r#"{"product_type": "", "premium": 25000, "birthday": "1970-05-05", "first_term": 5}"#;
        let request: IllustrationRequest = serde_json::from_str(json).unwrap();
        assert!(request.product_type.is_none());
        assert!(matches!(
            request.to_parameters(as_of()),
            Err(IllustrationError::MissingProductType)
        ));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let json = r#"{"product_type": "myga", "premium": "75000.50", "birthday": "1960-12-31", "first_term": 5, "second_term": 5}"#;
        let request: IllustrationRequest = serde_json::from_str(json).unwrap();
        let (_, params) = request.to_parameters(as_of()).unwrap();

        assert_eq!(params.premium, dec!(75000.50));
        assert_eq!(params.second_term_years, 5);
        assert_eq!(params.withdrawal.withdrawal_type, WithdrawalType::None);
        assert_eq!(params.withdrawal.frequency, Frequency::None);
        assert_eq!(params.allocation, IndexAllocation::default());
    }

    #[test]
    fn test_missing_premium_reads_as_zero() {
        let json = r#"{"product_type": "MYGA", "birthday": "1960-12-31", "first_term": 5}"#;
        let request: IllustrationRequest = serde_json::from_str(json).unwrap();
        let (_, params) = request.to_parameters(as_of()).unwrap();

        assert_eq!(request.premium, Decimal::ZERO);
        match crate::validation::validate(&params, ProductType::Myga, as_of()) {
            Err(IllustrationError::InvalidInput { field, .. }) => assert_eq!(field, "premium"),
            other => panic!("expected premium rejection, got {:?}", other),
        }
    }
}
