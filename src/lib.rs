//! Annuity Illustration - year-by-year MYGA and FIA projection engine
//!
//! This library provides:
//! - MYGA projections over two guaranteed-rate terms
//! - FIA projections with blended index and fixed-account crediting
//! - Shared withdrawal, free-allowance and surrender-charge stepping
//! - GLWB benefit base and guaranteed income side ledger
//! - Wire-format responses, currency formatting and chart series
//! - A compare grid of up to four independent illustrations

pub mod types;
pub mod error;
pub mod client;
pub mod assumptions;
pub mod projection;
pub mod format;
pub mod validation;
pub mod scenario;

// Re-export commonly used types
pub use error::{IllustrationError, Result};
pub use types::{Money, Rate};
pub use client::{ClientProductParameters, IllustrationRequest, ProductType};
pub use assumptions::ProductConstants;
pub use projection::{FiaEngine, MygaEngine, ProjectionResult, YearRow};
pub use format::IllustrationResponse;
pub use scenario::{CompareGrid, IllustrationConfig, IllustrationRunner};
