//! Load batches of illustration requests from CSV

use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use rust_decimal::Decimal;

use super::data::{Frequency, WithdrawalType};
use super::request::{parse_birthday, IllustrationRequest};
use crate::error::{IllustrationError, Result};

/// One client per row; column names follow the request payload
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    client_id: String,
    product_type: String,
    premium: Decimal,
    birthday: String,
    first_term: u32,
    second_term: u32,
    withdrawal_type: String,
    withdrawal_amount: Decimal,
    withdrawal_from_year: u32,
    withdrawal_to_year: u32,
    frequency: String,
    #[serde(default)]
    ptp_w_cap_rate: Decimal,
    #[serde(default)]
    ptp_w_participation_rate_500: Decimal,
    #[serde(default)]
    ptp_w_participation_rate_marc5: Decimal,
    #[serde(default)]
    ptp_w_participation_rate_tca: Decimal,
    #[serde(default)]
    fixed_interest_account: Decimal,
    #[serde(default)]
    glwb: bool,
    #[serde(default)]
    glwb_activation_age: u32,
    #[serde(default)]
    joint_indicator: bool,
}

impl CsvRow {
    fn into_request(self) -> Result<(String, IllustrationRequest)> {
        let withdrawal_type = match self.withdrawal_type.trim().to_ascii_lowercase().as_str() {
            "" | "none" => WithdrawalType::None,
            "fixed" => WithdrawalType::Fixed,
            "percentage" => WithdrawalType::Percentage,
            other => {
                return Err(IllustrationError::invalid(
                    "withdrawal_type",
                    format!("unknown withdrawal type '{}' for client {}", other, self.client_id),
                ))
            }
        };

        let frequency: Frequency = self.frequency.parse()?;
        let birthday: NaiveDate = parse_birthday(&self.birthday)?;
        let product_type = Some(self.product_type.parse()?);

        let request = IllustrationRequest {
            product_type,
            premium: self.premium,
            birthday,
            first_term: self.first_term,
            second_term: self.second_term,
            withdrawal_type,
            withdrawal_amount: self.withdrawal_amount,
            withdrawal_from_year: self.withdrawal_from_year,
            withdrawal_to_year: self.withdrawal_to_year,
            frequency,
            ptp_w_cap_rate: self.ptp_w_cap_rate,
            ptp_w_participation_rate_500: self.ptp_w_participation_rate_500,
            ptp_w_participation_rate_marc5: self.ptp_w_participation_rate_marc5,
            ptp_w_participation_rate_tca: self.ptp_w_participation_rate_tca,
            fixed_interest_account: self.fixed_interest_account,
            glwb: self.glwb,
            glwb_activation_age: self.glwb_activation_age,
            joint_indicator: self.joint_indicator,
        };

        Ok((self.client_id, request))
    }
}

/// Load `(client_id, request)` pairs from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<(String, IllustrationRequest)>> {
    let reader = Reader::from_path(path)?;
    collect_requests(reader)
}

/// Load requests from any reader (e.g., string buffer, network stream)
pub fn load_requests_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<(String, IllustrationRequest)>> {
    collect_requests(Reader::from_reader(reader))
}

fn collect_requests<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<(String, IllustrationRequest)>> {
    let mut requests = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        requests.push(row.into_request()?);
    }

    Ok(requests)
}
