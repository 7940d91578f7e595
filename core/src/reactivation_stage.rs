//! Reactivation engine: the second-chance pass over every churn event.
//!
//! Runs after the churn model has finished, re-rolling each churned
//! customer with segment-specific odds. A successful roll whose date
//! has already arrived inserts a fresh subscription priced modestly
//! above the original segment ranges. The subscription id counter is
//! re-synchronized from the sink before the pass, so it composes with
//! everything the churn stage already wrote.

use crate::config::ReactivationConfig;
use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::rng::GenRng;
use crate::stage::{GenStage, StageContext, StageReport};
use crate::subscription_stage::{postdates_signup_subscription, NewSubscription};
use crate::types::{round_cents, RowId, Segment};
use chrono::{Duration, NaiveDateTime};

/// A churn event joined with its customer's segment.
#[derive(Debug, Clone)]
pub struct ChurnedCustomer {
    pub customer_id: RowId,
    pub churn_date: NaiveDateTime,
    pub segment: Segment,
}

/// Terms offered to a churned customer whose reactivation roll
/// succeeded. Separated from the roll so the construction is testable
/// on its own.
#[derive(Debug, Clone)]
pub struct ReactivationOffer {
    pub start: NaiveDateTime,
    pub plan: String,
    pub price: f64,
}

pub fn build_offer(
    cfg: &ReactivationConfig,
    segment: Segment,
    churn_date: NaiveDateTime,
    rng: &mut GenRng,
) -> ReactivationOffer {
    let start = churn_date + Duration::days(cfg.delay_days.sample(rng));
    let band = cfg.plans.get(segment);
    ReactivationOffer {
        start,
        plan: rng.pick(&band.plans).clone(),
        price: round_cents(band.price.sample(rng)),
    }
}

pub struct ReactivationStage;

impl GenStage for ReactivationStage {
    fn name(&self) -> &'static str {
        "reactivation"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.reactivation;
        let now = ctx.clock.now();
        let churned = ctx.store.churned_customers()?;
        let signup_starts = ctx.store.signup_subscription_starts()?;

        let mut sub_ids = IdAllocator::after_max(ctx.store.max_subscription_id()?, 1);
        let mut rows = 0u64;
        let mut skipped = 0u64;

        for customer in &churned {
            if !ctx.rng.chance(*cfg.chance.get(customer.segment)) {
                continue;
            }

            let offer = build_offer(cfg, customer.segment, customer.churn_date, ctx.rng);
            if offer.start >= now
                || !postdates_signup_subscription(&signup_starts, customer.customer_id, offer.start)
            {
                skipped += 1;
                continue;
            }

            ctx.store.insert_subscription(&NewSubscription {
                subscription_id: sub_ids.next(),
                customer_id: customer.customer_id,
                plan_type: offer.plan,
                price: offer.price,
                start: offer.start,
                end: None,
                status: "active",
                change_type: "reactivation",
            })?;
            rows += 1;
        }

        log::info!(
            "reactivation: {rows} subscriptions from {} churn events, {skipped} rolls skipped",
            churned.len()
        );
        Ok(StageReport {
            rows_written: rows,
            units_skipped: skipped,
        })
    }
}
