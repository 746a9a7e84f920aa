//! Error types for loading, validation and the illustration boundary
//!
//! The projection engines themselves never fail; everything here is raised
//! before an engine runs or while reading configuration.

use thiserror::Error;

use crate::scenario::SlotId;

#[derive(Debug, Error)]
pub enum IllustrationError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Product type not selected")]
    MissingProductType,

    #[error("Unknown product type: {0}")]
    UnknownProductType(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Compare grid is full ({max} slots)")]
    TooManySlots { max: usize },

    #[error("No calculation slot with id {0}")]
    UnknownSlot(SlotId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IllustrationError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        IllustrationError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IllustrationError>;
