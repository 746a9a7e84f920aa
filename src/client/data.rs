//! Client and product parameter records consumed by the projection engines

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::IllustrationError;
use crate::types::{Money, Rate};

/// Product family being illustrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Multi-year guaranteed annuity
    #[serde(alias = "MYGA", alias = "Myga")]
    Myga,
    /// Fixed index annuity
    #[serde(alias = "FIA", alias = "Fia")]
    Fia,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Myga => "myga",
            ProductType::Fia => "fia",
        }
    }
}

impl FromStr for ProductType {
    type Err = IllustrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "myga" => Ok(ProductType::Myga),
            "fia" => Ok(ProductType::Fia),
            "" => Err(IllustrationError::MissingProductType),
            other => Err(IllustrationError::UnknownProductType(other.to_string())),
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the withdrawal amount is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalType {
    #[default]
    #[serde(alias = "")]
    None,
    /// Absolute currency amount per projection year
    Fixed,
    /// Percentage (0-100) of the post-growth value
    Percentage,
}

/// Stated withdrawal frequency.
///
/// Informational only: the withdrawal amount is applied once per projection
/// year whatever the frequency says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Frequency {
    Monthly,
    Quarterly,
    #[serde(rename = "Half Yearly")]
    HalfYearly,
    Yearly,
    #[default]
    None,
}

impl Frequency {
    /// Payments per year as stated by the client
    pub fn payments_per_year(&self) -> u32 {
        match self {
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::HalfYearly => 2,
            Frequency::Yearly => 1,
            Frequency::None => 0,
        }
    }

    fn from_payments(count: u32) -> Result<Self, IllustrationError> {
        match count {
            12 => Ok(Frequency::Monthly),
            4 => Ok(Frequency::Quarterly),
            2 => Ok(Frequency::HalfYearly),
            1 => Ok(Frequency::Yearly),
            0 => Ok(Frequency::None),
            other => Err(IllustrationError::invalid(
                "frequency",
                format!("unsupported payments per year: {}", other),
            )),
        }
    }
}

impl FromStr for Frequency {
    type Err = IllustrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "half yearly" | "semi-annual" | "semiannual" => Ok(Frequency::HalfYearly),
            "yearly" | "annual" | "annually" => Ok(Frequency::Yearly),
            "none" | "" => Ok(Frequency::None),
            other => Err(IllustrationError::invalid(
                "frequency",
                format!("unknown frequency '{}'", other),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The form sends either a label or a payments-per-year count
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Label(String),
            Count(u32),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Label(label) => label.parse().map_err(serde::de::Error::custom),
            Repr::Count(count) => Frequency::from_payments(count).map_err(serde::de::Error::custom),
        }
    }
}

/// Withdrawal schedule requested by the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalPlan {
    pub withdrawal_type: WithdrawalType,

    /// Currency amount for `Fixed`, percentage value for `Percentage`
    pub amount: Decimal,

    /// First projection year with a withdrawal (1-based, inclusive)
    pub from_year: u32,

    /// Last projection year with a withdrawal (inclusive)
    pub to_year: u32,

    pub frequency: Frequency,
}

impl WithdrawalPlan {
    /// A plan that never withdraws
    pub fn none() -> Self {
        Self::default()
    }

    pub fn fixed(amount: Money, from_year: u32, to_year: u32) -> Self {
        Self {
            withdrawal_type: WithdrawalType::Fixed,
            amount,
            from_year,
            to_year,
            frequency: Frequency::Yearly,
        }
    }

    pub fn percentage(percent: Decimal, from_year: u32, to_year: u32) -> Self {
        Self {
            withdrawal_type: WithdrawalType::Percentage,
            amount: percent,
            from_year,
            to_year,
            frequency: Frequency::Yearly,
        }
    }

    /// Whether a withdrawal is taken in the given projection year
    pub fn applies_in(&self, year: u32) -> bool {
        self.withdrawal_type != WithdrawalType::None
            && year >= self.from_year
            && year <= self.to_year
    }
}

/// Share of premium allocated to each FIA crediting bucket (fractions, 0-1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexAllocation {
    /// Point-to-point with cap
    pub ptp_w_cap: Rate,
    /// Point-to-point with participation, S&P 500
    pub ptp_w_participation_500: Rate,
    /// Point-to-point with participation, MARC5
    pub ptp_w_participation_marc5: Rate,
    /// Point-to-point with participation, TCA
    pub ptp_w_participation_tca: Rate,
    /// Fixed interest account
    pub fixed_account: Rate,
}

impl IndexAllocation {
    pub fn total(&self) -> Rate {
        self.ptp_w_cap
            + self.ptp_w_participation_500
            + self.ptp_w_participation_marc5
            + self.ptp_w_participation_tca
            + self.fixed_account
    }

    /// Everything in the fixed account
    pub fn all_fixed() -> Self {
        Self {
            fixed_account: Decimal::ONE,
            ..Default::default()
        }
    }
}

/// GLWB rider election
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlwbElection {
    pub elected: bool,
    pub activation_age: u32,
    pub joint: bool,
}

/// Parameters for a single illustration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProductParameters {
    pub birthday: NaiveDate,

    /// Client age in whole years on the calculation date
    pub client_age: u32,

    pub premium: Money,

    pub first_term_years: u32,

    /// 0 for single-term contracts (always 0 for FIA)
    pub second_term_years: u32,

    pub withdrawal: WithdrawalPlan,

    /// FIA only
    pub allocation: IndexAllocation,

    /// FIA only
    pub glwb: GlwbElection,
}

impl ClientProductParameters {
    /// Build parameters for a client born on `birthday`, aged as of `as_of`
    pub fn new(birthday: NaiveDate, as_of: NaiveDate, premium: Money, first_term_years: u32) -> Self {
        Self {
            birthday,
            client_age: age_on(birthday, as_of),
            premium,
            first_term_years,
            second_term_years: 0,
            withdrawal: WithdrawalPlan::none(),
            allocation: IndexAllocation::default(),
            glwb: GlwbElection::default(),
        }
    }

    pub fn with_second_term(mut self, years: u32) -> Self {
        self.second_term_years = years;
        self
    }

    pub fn with_withdrawal(mut self, plan: WithdrawalPlan) -> Self {
        self.withdrawal = plan;
        self
    }

    pub fn with_allocation(mut self, allocation: IndexAllocation) -> Self {
        self.allocation = allocation;
        self
    }

    pub fn with_glwb(mut self, glwb: GlwbElection) -> Self {
        self.glwb = glwb;
        self
    }

    /// Attained age in a projection year (1-based)
    pub fn age_in_year(&self, year: u32) -> u32 {
        self.client_age + year
    }
}

/// Whole years elapsed between `birthday` and `as_of`; 0 if born after `as_of`
pub fn age_on(birthday: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of < birthday {
        return 0;
    }
    let mut years = as_of.year() - birthday.year();
    if (as_of.month(), as_of.day()) < (birthday.month(), birthday.day()) {
        years -= 1;
    }
    years.max(0) as u32
}
