//! hopify-core: single-shot synthesis of a multi-year B2B SaaS
//! lifecycle dataset with referential integrity and seeded
//! reproducibility.
//!
//! The pipeline plans monthly cohorts, materializes customers, derives
//! commerce activity and expansion revenue, drives the subscription
//! state machine, simulates support load, scores and fires churn, and
//! re-rolls reactivations — all against one SQLite sink, all from one
//! seeded random stream.

pub mod auxiliary_stage;
pub mod benchmark_stage;
pub mod churn_stage;
pub mod clock;
pub mod cohort_stage;
pub mod commerce_stage;
pub mod config;
pub mod customer_stage;
pub mod engine;
pub mod error;
pub mod expansion_stage;
pub mod ids;
pub mod naming;
pub mod reactivation_stage;
pub mod reference_stage;
pub mod rng;
pub mod stage;
pub mod store;
pub mod subscription_stage;
pub mod support_stage;
pub mod types;
