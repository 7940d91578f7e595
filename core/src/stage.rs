//! Stage contract and pipeline state.
//!
//! RULE: Stages execute in registration order, exactly once per run.
//! A stage reads earlier stages' output through the store or through
//! the typed views handed forward in `PipelineViews` — it never calls
//! another stage directly. All randomness comes from the context RNG,
//! consumed in stage order; that ordering is part of the determinism
//! contract.

use crate::clock::GenClock;
use crate::config::GenConfig;
use crate::error::GenResult;
use crate::rng::GenRng;
use crate::store::DatasetStore;
use crate::types::{RowId, Segment};
use chrono::{NaiveDate, NaiveDateTime};

/// One month of the acquisition plan.
#[derive(Debug, Clone, Copy)]
pub struct MonthTarget {
    pub month: NaiveDate,
    pub target: i64,
}

/// Minimal customer view every downstream stage iterates.
#[derive(Debug, Clone, Copy)]
pub struct CustomerRef {
    pub customer_id: RowId,
    pub segment: Segment,
    pub signup: NaiveDateTime,
}

/// Typed outputs handed from one stage to the next, computed once.
#[derive(Debug, Default)]
pub struct PipelineViews {
    pub acquisition_plan: Vec<MonthTarget>,
    pub customers: Vec<CustomerRef>,
}

/// Everything a stage may touch while running.
pub struct StageContext<'a> {
    pub config: &'a GenConfig,
    pub clock: &'a GenClock,
    pub store: &'a DatasetStore,
    pub rng: &'a mut GenRng,
    pub views: &'a mut PipelineViews,
}

/// Outcome of one stage, for logging and the run summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageReport {
    pub rows_written: u64,
    /// Units skipped by design: empty product pools, customers without
    /// an anchor order, dates that have not arrived yet.
    pub units_skipped: u64,
}

impl StageReport {
    pub fn written(rows: u64) -> Self {
        Self {
            rows_written: rows,
            units_skipped: 0,
        }
    }
}

/// The contract every pipeline stage fulfills.
pub trait GenStage {
    /// Unique stable name, used in logs and the run summary.
    fn name(&self) -> &'static str;

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport>;
}
