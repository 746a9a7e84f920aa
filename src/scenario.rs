//! Illustration runner and the product compare grid
//!
//! The runner pre-loads product constants once, then runs any number of
//! illustrations against them without re-reading CSV or JSON files.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::ProductConstants;
use crate::client::{ClientProductParameters, IllustrationRequest, ProductType};
use crate::error::{IllustrationError, Result};
use crate::format::IllustrationResponse;
use crate::projection::{FiaEngine, IndexReturnModel, MygaEngine, ProjectionResult};
use crate::validation::{validate, validate_limits};

/// Maximum number of products compared side by side
pub const MAX_COMPARE_SLOTS: usize = 4;

/// Run-level settings shared by every illustration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IllustrationConfig {
    /// Date the client's age is measured on; today when unset
    pub as_of: Option<NaiveDate>,

    /// Index return generation for FIA projections
    pub index_returns: IndexReturnModel,
}

/// Pre-loaded illustration runner
///
/// # Example
/// ```ignore
/// let runner = IllustrationRunner::from_csv()?;
///
/// for request in requests {
///     let response = runner.run(&request)?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct IllustrationRunner {
    constants: ProductConstants,
    config: IllustrationConfig,
}

impl IllustrationRunner {
    /// Create runner with default in-memory constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with pre-built constants
    pub fn with_constants(constants: ProductConstants) -> Self {
        Self {
            constants,
            config: IllustrationConfig::default(),
        }
    }

    /// Create runner by loading constants from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self::with_constants(ProductConstants::from_csv()?))
    }

    /// Create runner from a specific constants directory
    pub fn from_csv_dir(path: &Path) -> Result<Self> {
        Ok(Self::with_constants(ProductConstants::from_csv_dir(path)?))
    }

    pub fn with_config(mut self, config: IllustrationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn constants(&self) -> &ProductConstants {
        &self.constants
    }

    pub fn config(&self) -> &IllustrationConfig {
        &self.config
    }

    /// Calculation date used for client ages
    pub fn as_of(&self) -> NaiveDate {
        self.config.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Validate and run one illustration
    pub fn run(&self, request: &IllustrationRequest) -> Result<IllustrationResponse> {
        let as_of = self.as_of();
        let (product, params) = request.to_parameters(as_of)?;

        if let Err(e) = validate(&params, product, as_of) {
            warn!("Rejected {} illustration: {}", product, e);
            return Err(e);
        }

        Ok(self.illustrate(product, &params))
    }

    /// Run without boundary validation. A missing product type and ledgers
    /// beyond the size limits are still rejected.
    pub fn run_unchecked(&self, request: &IllustrationRequest) -> Result<IllustrationResponse> {
        let (product, params) = request.to_parameters(self.as_of())?;
        validate_limits(&params)?;
        Ok(self.illustrate(product, &params))
    }

    /// Run many requests in parallel; results keep the input order
    pub fn run_batch(&self, requests: &[IllustrationRequest]) -> Vec<Result<IllustrationResponse>> {
        requests.par_iter().map(|request| self.run(request)).collect()
    }

    /// Numeric projection for already-built parameters
    pub fn project(&self, product: ProductType, params: &ClientProductParameters) -> ProjectionResult {
        match product {
            ProductType::Myga => MygaEngine::new(self.constants.myga.clone()).project(params),
            ProductType::Fia => {
                let engine = FiaEngine::new(self.constants.fia.clone(), self.constants.glwb.clone());
                let mut returns = self.config.index_returns.source(&self.constants.fia);
                engine.project(params, &mut returns)
            }
        }
    }

    fn illustrate(&self, product: ProductType, params: &ClientProductParameters) -> IllustrationResponse {
        info!(
            "Running {} illustration: premium {}, age {}, first term {}",
            product, params.premium, params.client_age, params.first_term_years
        );

        let result = self.project(product, params);

        match product {
            ProductType::Myga => {
                IllustrationResponse::from_myga(&result, &self.constants.myga, params.first_term_years)
            }
            ProductType::Fia => IllustrationResponse::from_fia(&result, &self.constants.fia, &params.allocation),
        }
    }
}

/// Stable identity of a compare slot; never reused within a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product in the compare grid. Records are replaced, never mutated.
#[derive(Debug, Clone)]
pub struct CalculationSlot {
    pub id: SlotId,
    pub parameters: Arc<IllustrationRequest>,
    /// Result computed from exactly these parameters
    pub result: Option<Arc<IllustrationResponse>>,
}

impl CalculationSlot {
    fn pending(id: SlotId, parameters: Arc<IllustrationRequest>) -> Self {
        Self { id, parameters, result: None }
    }

    fn calculated(&self, response: Arc<IllustrationResponse>) -> Self {
        Self {
            id: self.id,
            parameters: Arc::clone(&self.parameters),
            result: Some(response),
        }
    }
}

/// Side-by-side comparison of up to [`MAX_COMPARE_SLOTS`] illustrations
#[derive(Debug, Clone)]
pub struct CompareGrid {
    runner: IllustrationRunner,
    slots: Vec<CalculationSlot>,
    next_id: u64,
}

impl CompareGrid {
    pub fn new(runner: IllustrationRunner) -> Self {
        Self {
            runner,
            slots: Vec::with_capacity(MAX_COMPARE_SLOTS),
            next_id: 1,
        }
    }

    pub fn runner(&self) -> &IllustrationRunner {
        &self.runner
    }

    pub fn add_slot(&mut self, parameters: IllustrationRequest) -> Result<SlotId> {
        if self.slots.len() >= MAX_COMPARE_SLOTS {
            return Err(IllustrationError::TooManySlots { max: MAX_COMPARE_SLOTS });
        }

        let id = SlotId(self.next_id);
        self.next_id += 1;
        self.slots.push(CalculationSlot::pending(id, Arc::new(parameters)));
        Ok(id)
    }

    pub fn remove_slot(&mut self, id: SlotId) -> Result<CalculationSlot> {
        let index = self.index_of(id)?;
        Ok(self.slots.remove(index))
    }

    /// Swap in new parameters; the slot's previous result is dropped
    pub fn update_parameters(&mut self, id: SlotId, parameters: IllustrationRequest) -> Result<()> {
        let index = self.index_of(id)?;
        self.slots[index] = CalculationSlot::pending(id, Arc::new(parameters));
        Ok(())
    }

    /// Calculate one slot. On failure the slot keeps its previous record.
    pub fn calculate(&mut self, id: SlotId) -> Result<Arc<IllustrationResponse>> {
        let index = self.index_of(id)?;
        let response = Arc::new(self.runner.run(&self.slots[index].parameters)?);
        self.slots[index] = self.slots[index].calculated(Arc::clone(&response));
        Ok(response)
    }

    /// Calculate every slot in parallel against its own parameter snapshot
    pub fn calculate_all(&mut self) -> Vec<(SlotId, Result<Arc<IllustrationResponse>>)> {
        let runner = &self.runner;
        let outcomes: Vec<_> = self
            .slots
            .par_iter()
            .map(|slot| (slot.id, runner.run(&slot.parameters)))
            .collect();

        outcomes
            .into_iter()
            .zip(self.slots.iter_mut())
            .map(|((id, outcome), slot)| {
                let outcome = outcome.map(|response| {
                    let response = Arc::new(response);
                    *slot = slot.calculated(Arc::clone(&response));
                    response
                });
                (id, outcome)
            })
            .collect()
    }

    pub fn get(&self, id: SlotId) -> Option<&CalculationSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// Slots in the order they were added
    pub fn slots(&self) -> &[CalculationSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn index_of(&self, id: SlotId) -> Result<usize> {
        self.slots
            .iter()
            .position(|slot| slot.id == id)
            .ok_or(IllustrationError::UnknownSlot(id))
    }
}
