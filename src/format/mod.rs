//! Display formatting: currency strings, the wire response, chart series
//!
//! The engines work in exact decimals; strings are produced here and
//! nowhere else.

mod currency;
mod response;
mod chart;

pub use currency::{
    format_compact, format_currency, format_currency_dp, format_percent, parse_currency,
    parse_currency_or_zero,
};
pub use response::{
    parse_rows, IllustrationCalcData, IllustrationResponse, IndexAllocationEcho, LedgerRow,
    ParsedRow, ProductEcho, STATUS_SUCCESS,
};
pub use chart::{ChartSeries, SeriesKind};
