//! Chart-ready series over a projection

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::projection::{ProjectionResult, YearRow};
use crate::types::Money;

/// Selectable ledger series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesKind {
    AccumulationValue,
    SurrenderValue,
    Withdrawals,
    InitialPremium,
    CreditedInterest,
    DeathBenefit,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 6] = [
        SeriesKind::AccumulationValue,
        SeriesKind::SurrenderValue,
        SeriesKind::Withdrawals,
        SeriesKind::InitialPremium,
        SeriesKind::CreditedInterest,
        SeriesKind::DeathBenefit,
    ];

    /// Shown by default
    pub const DEFAULT: [SeriesKind; 2] = [SeriesKind::AccumulationValue, SeriesKind::SurrenderValue];

    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::AccumulationValue => "Accumulation Value",
            SeriesKind::SurrenderValue => "Surrender Value",
            SeriesKind::Withdrawals => "Withdrawals",
            SeriesKind::InitialPremium => "Initial Premium",
            SeriesKind::CreditedInterest => "Credited Interest",
            SeriesKind::DeathBenefit => "Death Benefit",
        }
    }

    fn value(&self, row: &YearRow) -> Money {
        match self {
            SeriesKind::AccumulationValue => row.accumulation_value,
            SeriesKind::SurrenderValue => row.surrender_value,
            SeriesKind::Withdrawals => row.withdrawal,
            SeriesKind::InitialPremium => row.premium,
            SeriesKind::CreditedInterest => row.credited_interest,
            SeriesKind::DeathBenefit => row.death_benefit,
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: SeriesKind,
    pub name: &'static str,
    /// `(year, value)` points in year order
    pub points: Vec<(u32, f64)>,
}

impl ChartSeries {
    pub fn from_result(result: &ProjectionResult, kind: SeriesKind) -> Self {
        let points = result
            .rows
            .iter()
            .map(|row| (row.year, kind.value(row).to_f64().unwrap_or(0.0)))
            .collect();

        Self {
            kind,
            name: kind.label(),
            points,
        }
    }

    /// Series for each requested kind, in the order given
    pub fn select(result: &ProjectionResult, kinds: &[SeriesKind]) -> Vec<Self> {
        kinds.iter().map(|kind| Self::from_result(result, *kind)).collect()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|(_, v)| *v).reduce(f64::max)
    }
}
