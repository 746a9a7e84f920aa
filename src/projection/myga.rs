//! MYGA projection engine: guaranteed rates over two consecutive terms

use log::debug;

use super::cashflows::{ProjectionResult, YearRow};
use super::state::ProjectionState;
use super::step::step_year;
use crate::assumptions::MygaConstants;
use crate::client::{ClientProductParameters, ProductType};

/// Projects a multi-year guaranteed annuity
#[derive(Debug, Clone)]
pub struct MygaEngine {
    constants: MygaConstants,
}

impl MygaEngine {
    pub fn new(constants: MygaConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &MygaConstants {
        &self.constants
    }

    /// Run projection over `first_term_years + second_term_years` years.
    ///
    /// First-term years credit the scheduled rate (MGIR when unscheduled);
    /// second-term years always credit the MGIR.
    pub fn project(&self, params: &ClientProductParameters) -> ProjectionResult {
        let total_years = params.first_term_years + params.second_term_years;
        let mut result = ProjectionResult::new(ProductType::Myga, params.client_age, params.premium, params.premium);
        let mut state = ProjectionState::at_issue(params, params.premium);

        for _year in 1..=total_years {
            state.advance_year(params);

            let rate = self.constants.credited_rate(state.year, params.first_term_years);
            let step = step_year(state.current_value, state.year, rate, &params.withdrawal, &self.constants);

            debug!(
                "MYGA year {}: rate {} withdrawal {} value {}",
                state.year, rate, step.withdrawal, step.accumulation_value
            );

            state.current_value = step.accumulation_value;
            result.add_row(YearRow::from_step(state.year, state.attained_age, params.premium, &step));
        }

        result
    }
}
