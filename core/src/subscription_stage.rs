//! Subscription lifecycle: the signup state machine's first two states.
//!
//! Every customer gets exactly one `signup` subscription; a
//! segment-weighted fraction also gets an `upgrade` 90–365 days later,
//! but only when that date has already passed. Churn-driven
//! `reactivation` rows are appended by the churn and reactivation
//! stages, which share this table's id sequence — the allocator is
//! seeded from the sink's current maximum so re-runs stay safe.

use crate::clock::{add_months, uniform_datetime};
use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::stage::{GenStage, StageContext, StageReport};
use crate::types::{round_cents, RowId};
use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;

/// True when `start` falls strictly after the customer's signup
/// subscription start. Reactivation writers check this before
/// inserting: a reactivation row presupposes an earlier signup row.
pub fn postdates_signup_subscription(
    signup_starts: &HashMap<RowId, NaiveDateTime>,
    customer_id: RowId,
    start: NaiveDateTime,
) -> bool {
    signup_starts
        .get(&customer_id)
        .is_some_and(|signup_start| start > *signup_start)
}

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub subscription_id: RowId,
    pub customer_id: RowId,
    pub plan_type: String,
    pub price: f64,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub status: &'static str,
    pub change_type: &'static str,
}

pub struct SubscriptionStage;

impl GenStage for SubscriptionStage {
    fn name(&self) -> &'static str {
        "subscriptions"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.subscription;
        let now = ctx.clock.now();
        let mut ids = IdAllocator::after_max(ctx.store.max_subscription_id()?, 1);
        let mut batch: Vec<NewSubscription> = Vec::with_capacity(ctx.views.customers.len());

        for customer in &ctx.views.customers {
            let band = cfg.plans.get(customer.segment);

            let start = uniform_datetime(
                ctx.rng,
                customer.signup,
                add_months(customer.signup, cfg.start_lag_months as i32),
            );
            let duration = cfg.duration_months.sample(ctx.rng);
            let end = add_months(start, duration as i32);
            let plan = ctx.rng.pick(&band.plans).clone();
            let price = round_cents(band.price.sample(ctx.rng));

            batch.push(NewSubscription {
                subscription_id: ids.next(),
                customer_id: customer.customer_id,
                plan_type: plan.clone(),
                price,
                start,
                end: Some(end),
                status: "active",
                change_type: "signup",
            });

            if ctx.rng.chance(*cfg.upgrade_chance.get(customer.segment)) {
                let upgrade_date = start + Duration::days(cfg.upgrade_delay_days.sample(ctx.rng));
                if upgrade_date < now {
                    let upgrade_price = round_cents(price * cfg.upgrade_multiplier.sample(ctx.rng));
                    batch.push(NewSubscription {
                        subscription_id: ids.next(),
                        customer_id: customer.customer_id,
                        plan_type: plan,
                        price: upgrade_price,
                        start: upgrade_date,
                        end: None,
                        status: "active",
                        change_type: "upgrade",
                    });
                }
            }
        }

        ctx.store.insert_subscriptions(&batch)?;
        log::info!("subscriptions: {} rows including upgrades", batch.len());
        Ok(StageReport::written(batch.len() as u64))
    }
}
