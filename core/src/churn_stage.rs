//! Churn model: scores every customer from tenure and support history,
//! then rolls for a churn event.
//!
//! The probability is a composite: segment base rate, damped hard for
//! young accounts, then nudged by ticket load, resolution latency,
//! billing-ticket frequency and first-ticket delay, clamped at 0.9.
//! A churn only materializes once the customer has survived the
//! segment's minimum tenure. Each inserted churn gets an immediate,
//! independent 10% second-chance roll that writes a reactivation
//! subscription on the spot — the broader reactivation pass runs later
//! and is a separate stage.

use crate::clock::uniform_datetime;
use crate::config::ChurnConfig;
use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::stage::{GenStage, StageContext, StageReport};
use crate::subscription_stage::{postdates_signup_subscription, NewSubscription};
use crate::types::{RowId, Segment};
use chrono::{Duration, NaiveDateTime};

/// Tickets-never-filed stand-in, far beyond any real first-ticket delay.
const FIRST_TICKET_SENTINEL_DAYS: i64 = 999;

/// One customer's aggregated support history — the typed input view
/// this stage consumes, computed once by the store.
#[derive(Debug, Clone)]
pub struct SupportProfile {
    pub customer_id: RowId,
    pub segment: Segment,
    pub signup: NaiveDateTime,
    pub total_tickets: i64,
    pub first_ticket: Option<NaiveDateTime>,
    pub avg_resolution_days: Option<f64>,
    pub billing_tickets: i64,
}

/// Composite churn probability for one customer. Pure — all randomness
/// stays with the caller, so this is directly unit-testable.
///
/// Adjustments apply in a fixed order: tenure dampener, ticket-load
/// penalty/relief, slow-resolution penalty, billing-ticket penalty,
/// first-ticket-delay penalty, then the 0.9 ceiling. A customer too
/// young to have a meaningful first-ticket delay is not penalized for
/// having filed nothing yet.
pub fn churn_probability(cfg: &ChurnConfig, profile: &SupportProfile, now: NaiveDateTime) -> f64 {
    let segment = profile.segment;
    let days_since_signup = (now - profile.signup).num_days();

    let mut p = *cfg.base_rate.get(segment);

    if days_since_signup < cfg.recent_signup_days {
        p *= cfg.recent_signup_multiplier;
    } else if days_since_signup < cfg.mid_signup_days {
        p *= cfg.mid_signup_multiplier;
    }

    if profile.total_tickets >= cfg.heavy_ticket_threshold {
        p += cfg.heavy_ticket_penalty.get(segment);
    } else if profile.total_tickets >= 1 {
        p -= cfg.light_ticket_relief;
    }

    if matches!(profile.avg_resolution_days, Some(d) if d > cfg.slow_resolution_days) {
        p += cfg.slow_resolution_penalty.get(segment);
    }

    if profile.billing_tickets >= cfg.billing_ticket_threshold {
        p += cfg.billing_ticket_penalty.get(segment);
    }

    let first_ticket_delay = match profile.first_ticket {
        Some(first) => (first - profile.signup).num_days(),
        None if days_since_signup >= cfg.first_ticket_delay_days => FIRST_TICKET_SENTINEL_DAYS,
        None => 0,
    };
    if first_ticket_delay > cfg.first_ticket_delay_days {
        p += cfg.first_ticket_delay_penalty.get(segment);
    }

    p.min(cfg.max_probability)
}

pub struct ChurnStage;

impl GenStage for ChurnStage {
    fn name(&self) -> &'static str {
        "churn"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.churn;
        let now = ctx.clock.now();
        let profiles = ctx.store.support_profiles()?;
        let signup_starts = ctx.store.signup_subscription_starts()?;

        let mut churn_ids = IdAllocator::starting_at(1);
        let mut sub_ids = IdAllocator::after_max(ctx.store.max_subscription_id()?, 1);
        let mut rows = 0u64;
        let mut under_tenure = 0u64;

        for profile in &profiles {
            let p = churn_probability(cfg, profile, now);
            if !ctx.rng.chance(p) {
                continue;
            }

            let tenure_floor =
                profile.signup + Duration::days(*cfg.min_tenure_days.get(profile.segment));
            if now < tenure_floor {
                under_tenure += 1;
                continue;
            }

            let churn_date = uniform_datetime(ctx.rng, tenure_floor, now);
            let reason = ctx.rng.pick(&cfg.reasons).clone();
            ctx.store
                .insert_churn_event(churn_ids.next(), profile.customer_id, churn_date, &reason)?;
            rows += 1;

            // Immediate second-chance roll, independent of the full
            // reactivation pass that runs later.
            let inline = &cfg.inline_reactivation;
            if ctx.rng.chance(inline.chance) {
                let start = churn_date + Duration::days(inline.delay_days.sample(ctx.rng));
                // A reactivation row must postdate the signup row it
                // presupposes; early churns with short delays can't.
                if !postdates_signup_subscription(&signup_starts, profile.customer_id, start) {
                    continue;
                }
                ctx.store.insert_subscription(&NewSubscription {
                    subscription_id: sub_ids.next(),
                    customer_id: profile.customer_id,
                    plan_type: inline.plan.clone(),
                    price: inline.price,
                    start,
                    end: None,
                    status: "active",
                    change_type: "reactivation",
                })?;
                rows += 1;
            }
        }

        log::info!("churn: {rows} rows, {under_tenure} rolls suppressed by minimum tenure");
        Ok(StageReport {
            rows_written: rows,
            units_skipped: under_tenure,
        })
    }
}
