//! Auxiliary generators: app installs, discount codes and their order
//! pairings, marketing spend, web traffic.
//!
//! Lower-complexity producers that share ids with the lifecycle tables
//! but carry no lifecycle coupling of their own. Install and discount
//! counters resume from the sink's maximum; web traffic is a
//! clear-then-refill table.

use crate::clock::{month_key, uniform_datetime};
use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::stage::{GenStage, StageContext, StageReport};
use crate::types::{round_cents, RowId, Segment};
use chrono::Duration;
use std::collections::HashSet;

pub struct AuxiliaryStage;

impl AuxiliaryStage {
    fn app_installs(ctx: &mut StageContext<'_>) -> GenResult<u64> {
        let cfg = &ctx.config.reference;
        let product_ids = ctx.store.all_product_ids()?;
        if product_ids.is_empty() {
            log::warn!("auxiliary: no products in sink, skipping app installs");
            return Ok(0);
        }

        let mut ids = IdAllocator::after_max(ctx.store.max_install_id()?, 1);
        let window_start = ctx.clock.days_ago(cfg.install_window_days);
        let now = ctx.clock.now();
        let mut rows = 0u64;

        for location_id in 1..=cfg.locations.len() as RowId {
            for _ in 0..cfg.installs_per_location.sample(ctx.rng) {
                let product_id = *ctx.rng.pick(&product_ids);
                let install_date = uniform_datetime(ctx.rng, window_start, now);
                ctx.store
                    .insert_app_install(ids.next(), location_id, product_id, install_date)?;
                rows += 1;
            }
        }
        Ok(rows)
    }

    fn discounts(ctx: &mut StageContext<'_>) -> GenResult<u64> {
        let cfg = &ctx.config.reference;
        let mut ids = IdAllocator::after_max(ctx.store.max_discount_id()?, 1);
        let first_id = ids.peek();
        let window_start = ctx.clock.days_ago(cfg.discount_start_days_ago.hi);
        let window_end = ctx.clock.days_ago(cfg.discount_start_days_ago.lo);
        let mut rows = 0u64;

        for _ in 0..cfg.discount_count {
            let id = ids.next();
            let code = format!("SALE{id:02}");
            let percent = *ctx.rng.pick(&cfg.discount_percents);
            let start = uniform_datetime(ctx.rng, window_start, window_end);
            let end = start + Duration::days(cfg.discount_length_days.sample(ctx.rng));
            ctx.store.insert_discount(id, &code, percent, start, end)?;
            rows += 1;
        }

        // Pair discounts with a random order sample. The (order_id,
        // discount_id) pair is unique; collisions get a bounded number
        // of fresh draws, then that order goes without.
        let last_id = ids.peek() - 1;
        let order_ids = ctx.store.all_order_ids()?;
        let sampled = ctx.rng.sample(&order_ids, cfg.discount_order_sample);
        let mut used_pairs: HashSet<(RowId, RowId)> = HashSet::new();

        for order_id in sampled {
            for _ in 0..cfg.discount_pair_retries {
                let discount_id = ctx.rng.int_in(first_id, last_id);
                if used_pairs.insert((order_id, discount_id)) {
                    ctx.store.insert_order_discount(order_id, discount_id)?;
                    rows += 1;
                    break;
                }
            }
        }
        Ok(rows)
    }

    fn marketing_spend(ctx: &mut StageContext<'_>) -> GenResult<u64> {
        let cfg = &ctx.config.reference;
        let mut rows = 0u64;

        for month in ctx.clock.history_months(ctx.config.months_of_history) {
            for segment in Segment::ALL {
                let band = cfg.marketing_bands.get(segment);
                let midpoint = (band.lo + band.hi) / 2.0;
                let variation =
                    ctx.rng.uniform(-cfg.marketing_fluctuation, cfg.marketing_fluctuation);
                let budget = round_cents(midpoint * (1.0 + variation));
                ctx.store
                    .insert_marketing_spend(segment.as_str(), &month_key(month), budget)?;
                rows += 1;
            }
        }
        Ok(rows)
    }

    fn web_traffic(ctx: &mut StageContext<'_>) -> GenResult<u64> {
        let cfg = &ctx.config.reference;
        ctx.store.clear_web_traffic()?;
        let mut rows = 0u64;

        // Newest month first, current month included.
        for back in 0..cfg.traffic_months {
            let month = ctx.clock.months_ago(back as i32).date();
            for channel in &cfg.traffic_channels {
                let visitors = if channel == "Organic" {
                    cfg.organic_visitors.sample(ctx.rng)
                } else {
                    cfg.paid_visitors.sample(ctx.rng)
                };
                let leads = (visitors as f64 * cfg.lead_rate.sample(ctx.rng)) as i64;
                let mqls = (leads as f64 * cfg.mql_rate.sample(ctx.rng)) as i64;
                ctx.store
                    .insert_web_traffic(&month_key(month), channel, visitors, leads, mqls)?;
                rows += 1;
            }
        }
        Ok(rows)
    }
}

impl GenStage for AuxiliaryStage {
    fn name(&self) -> &'static str {
        "auxiliary"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let mut rows = 0u64;
        rows += Self::app_installs(ctx)?;
        rows += Self::discounts(ctx)?;
        rows += Self::marketing_spend(ctx)?;
        rows += Self::web_traffic(ctx)?;

        log::info!("auxiliary: {rows} reference rows");
        Ok(StageReport::written(rows))
    }
}
