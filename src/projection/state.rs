//! Projection state tracking for a single illustration

use crate::client::ClientProductParameters;
use crate::types::Money;

/// State of the contract at the start or end of a projection year
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current projection year (0 = issue, then 1-indexed)
    pub year: u32,

    /// Attained age in the current year
    pub attained_age: u32,

    /// Account value carried into the next year
    pub current_value: Money,
}

impl ProjectionState {
    /// Initialize state at issue with the value credited at issue
    pub fn at_issue(params: &ClientProductParameters, issue_value: Money) -> Self {
        Self {
            year: 0,
            attained_age: params.client_age,
            current_value: issue_value,
        }
    }

    /// Advance to next projection year
    pub fn advance_year(&mut self, params: &ClientProductParameters) {
        self.year += 1;
        self.attained_age = params.age_in_year(self.year);
    }
}
