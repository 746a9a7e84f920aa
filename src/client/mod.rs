//! Client/product parameters, the request payload, and batch loading

mod data;
mod request;
pub mod loader;

pub use data::{
    age_on, ClientProductParameters, Frequency, GlwbElection, IndexAllocation, ProductType,
    WithdrawalPlan, WithdrawalType,
};
pub use request::{parse_birthday, IllustrationRequest, DEFAULT_GLWB_ACTIVATION_AGE};
pub use loader::{load_requests, load_requests_from_reader};
