//! The generation engine — single-shot pipeline driver.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. reference      (product catalog, office locations)
//!   2. cohort-plan    (monthly acquisition targets)
//!   3. customers      (cohorts materialized)
//!   4. commerce       (orders, items, payments)
//!   5. expansion      (upsell orders and payments)
//!   6. subscriptions  (signups and upgrades)
//!   7. support        (ticket sample)
//!   8. churn          (scores, events, inline reactivations)
//!   9. reactivation   (second-chance pass)
//!  10. auxiliary      (installs, discounts, spend, traffic)
//!  11. benchmarks     (optional file import)
//!
//! RULES:
//!   - Stages run exactly once, in this order. Later stages read
//!     earlier output through the store or the typed views.
//!   - All randomness flows through the engine's single GenRng.
//!   - The run either completes every stage or aborts on the first
//!     I/O error; committed batches persist either way.

use crate::auxiliary_stage::AuxiliaryStage;
use crate::benchmark_stage::BenchmarkStage;
use crate::churn_stage::ChurnStage;
use crate::clock::GenClock;
use crate::cohort_stage::CohortStage;
use crate::commerce_stage::CommerceStage;
use crate::config::GenConfig;
use crate::customer_stage::CustomerStage;
use crate::error::GenResult;
use crate::expansion_stage::ExpansionStage;
use crate::reactivation_stage::ReactivationStage;
use crate::reference_stage::ReferenceStage;
use crate::rng::GenRng;
use crate::stage::{GenStage, PipelineViews, StageContext, StageReport};
use crate::store::DatasetStore;
use crate::subscription_stage::SubscriptionStage;
use crate::support_stage::SupportStage;
use chrono::NaiveDateTime;
use std::path::PathBuf;

pub struct RunSummary {
    pub run_id: String,
    pub seed: u64,
    pub stages: Vec<(&'static str, StageReport)>,
}

impl RunSummary {
    pub fn total_rows(&self) -> u64 {
        self.stages.iter().map(|(_, r)| r.rows_written).sum()
    }
}

pub struct GenEngine {
    run_id: String,
    seed: u64,
    config: GenConfig,
    clock: GenClock,
    rng: GenRng,
    store: DatasetStore,
    views: PipelineViews,
    benchmarks_file: Option<PathBuf>,
}

impl GenEngine {
    /// Build an engine anchored at `now`. The anchor is injected, not
    /// read from the wall clock, so (seed, now, config) fully determine
    /// the dataset.
    pub fn new(seed: u64, now: NaiveDateTime, config: GenConfig, store: DatasetStore) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            seed,
            config,
            clock: GenClock::new(now),
            rng: GenRng::new(seed),
            store,
            views: PipelineViews::default(),
            benchmarks_file: None,
        }
    }

    /// Override the generated run id (tests pin it for stable metadata).
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Enable the benchmark import stage.
    pub fn with_benchmarks_file(mut self, path: PathBuf) -> Self {
        self.benchmarks_file = Some(path);
        self
    }

    /// Run every stage to completion. Applies the schema first, records
    /// the run, then executes the documented stage order.
    pub fn run(&mut self) -> GenResult<RunSummary> {
        self.store.migrate()?;
        self.store.insert_run(
            &self.run_id,
            self.seed,
            env!("CARGO_PKG_VERSION"),
            self.clock.now(),
        )?;
        log::info!("run {} started (seed={})", self.run_id, self.seed);

        let mut stages: Vec<Box<dyn GenStage>> = vec![
            Box::new(ReferenceStage),
            Box::new(CohortStage),
            Box::new(CustomerStage),
            Box::new(CommerceStage),
            Box::new(ExpansionStage),
            Box::new(SubscriptionStage),
            Box::new(SupportStage),
            Box::new(ChurnStage),
            Box::new(ReactivationStage),
            Box::new(AuxiliaryStage),
        ];
        if let Some(path) = &self.benchmarks_file {
            stages.push(Box::new(BenchmarkStage::new(path.clone())));
        }

        let mut reports = Vec::with_capacity(stages.len());
        for stage in &mut stages {
            let mut ctx = StageContext {
                config: &self.config,
                clock: &self.clock,
                store: &self.store,
                rng: &mut self.rng,
                views: &mut self.views,
            };
            let report = stage.run(&mut ctx)?;
            log::debug!(
                "stage {} complete: {} rows, {} skipped",
                stage.name(),
                report.rows_written,
                report.units_skipped
            );
            reports.push((stage.name(), report));
        }

        log::info!("run {} complete", self.run_id);
        Ok(RunSummary {
            run_id: self.run_id.clone(),
            seed: self.seed,
            stages: reports,
        })
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Consume the engine and hand back the sink.
    pub fn into_store(self) -> DatasetStore {
        self.store
    }

    pub fn clock(&self) -> &GenClock {
        &self.clock
    }
}
