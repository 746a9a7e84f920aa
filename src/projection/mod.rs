//! Projection engines for MYGA and FIA illustrations

mod state;
mod step;
mod cashflows;
mod index;
mod glwb;
mod myga;
mod fia;

pub use state::ProjectionState;
pub use step::{nominal_withdrawal, step_year, ChargeSchedule, YearStep};
pub use cashflows::{LedgerSummary, ProjectionResult, YearRow};
pub use index::{
    FixedIndexReturns, IndexBucket, IndexReturnModel, IndexReturnSource, ModelReturns,
    SeededIndexReturns, DEFAULT_INDEX_SEED,
};
pub use glwb::{GlwbTracker, GlwbYear};
pub use myga::MygaEngine;
pub use fia::FiaEngine;
