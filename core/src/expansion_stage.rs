//! Expansion revenue: supplementary high-margin upsell orders.
//!
//! A subset of customers, segment-weighted, receives 1–4 monthly-spaced
//! synthetic orders anchored on one of their existing orders. These
//! carry a direct revenue total and no line items, and draw their ids
//! from a disjoint, offset allocator so they never collide with base
//! commerce. Customers without a prior order are skipped.

use crate::clock::add_months;
use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::stage::{GenStage, StageContext, StageReport};
use crate::types::round_cents;

pub struct ExpansionStage;

impl GenStage for ExpansionStage {
    fn name(&self) -> &'static str {
        "expansion"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.expansion;
        let mut ids = IdAllocator::starting_at(cfg.id_origin);
        let mut rows = 0u64;
        let mut skipped = 0u64;

        for customer in &ctx.views.customers {
            if !ctx.rng.chance(*cfg.rate.get(customer.segment)) {
                continue;
            }

            let order_dates = ctx.store.order_dates_for_customer(customer.customer_id)?;
            if order_dates.is_empty() {
                skipped += 1;
                continue;
            }
            let anchor = *ctx.rng.pick(&order_dates);

            let months = cfg.monthly_orders.sample(ctx.rng);
            for i in 1..=months {
                let expansion_date = add_months(anchor, i as i32);
                let factor = cfg.factor.get(customer.segment).sample(ctx.rng);
                let revenue = round_cents(cfg.base_revenue.sample(ctx.rng) * factor);

                let id = ids.next();
                ctx.store
                    .insert_order(id, customer.customer_id, expansion_date, revenue)?;
                ctx.store.insert_payment(
                    id,
                    customer.customer_id,
                    revenue,
                    expansion_date,
                    "Card",
                    true,
                )?;
                rows += 2;
            }
        }

        log::info!("expansion: {rows} rows, {skipped} customers without an anchor order");
        Ok(StageReport {
            rows_written: rows,
            units_skipped: skipped,
        })
    }
}
