//! Cohort planner: one acquisition target per historical month.
//!
//! Seasonality: summer dip, winter surge, an occasional April
//! promotional spike, baseline otherwise. Each band is a uniform range.
//! Purely generative — writes nothing, only fills the acquisition-plan
//! view the customer factory consumes.

use crate::error::GenResult;
use crate::stage::{GenStage, MonthTarget, StageContext, StageReport};
use chrono::Datelike;

pub struct CohortStage;

impl GenStage for CohortStage {
    fn name(&self) -> &'static str {
        "cohort-plan"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.acquisition;
        let months = ctx.clock.history_months(ctx.config.months_of_history);

        for month in months {
            let m = month.month();
            let band = if cfg.summer_months.contains(&m) {
                cfg.summer
            } else if cfg.winter_months.contains(&m) {
                cfg.winter
            } else if m == cfg.promo_month && ctx.rng.chance(cfg.promo_probability) {
                cfg.promo
            } else {
                cfg.baseline
            };
            ctx.views.acquisition_plan.push(MonthTarget {
                month,
                target: band.sample(ctx.rng),
            });
        }

        let total: i64 = ctx.views.acquisition_plan.iter().map(|t| t.target).sum();
        log::info!(
            "cohort-plan: {} months, {} signups planned",
            ctx.views.acquisition_plan.len(),
            total
        );
        Ok(StageReport::default())
    }
}
