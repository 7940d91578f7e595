//! Commerce simulator: base orders, their line items, one payment each.
//!
//! Item categories follow segment affinity; the product itself is
//! uniform within the category pool. A sampled category with no
//! products silently skips that item — an order can legitimately end up
//! with zero items and a 0.0 total. Orders and payments share one
//! incrementing counter, so a payment's id is its order's id.

use crate::clock::uniform_datetime;
use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::stage::{GenStage, StageContext, StageReport};
use crate::types::round_cents;

pub struct CommerceStage;

impl GenStage for CommerceStage {
    fn name(&self) -> &'static str {
        "commerce"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.commerce;
        let catalog = ctx.store.products_by_category()?;
        let now = ctx.clock.now();
        let window_start = ctx.clock.months_ago(cfg.order_history_months);

        // One counter for orders and payments, scoped to this stage.
        let mut ids = IdAllocator::starting_at(1);
        let mut item_ids = IdAllocator::starting_at(1);
        let mut rows = 0u64;
        let mut skipped_items = 0u64;

        for customer in &ctx.views.customers {
            let affinity = cfg.category_affinity.get(customer.segment);
            let affinity_weights: Vec<f64> = affinity.iter().map(|(_, w)| *w).collect();
            let order_count = cfg.order_count.get(customer.segment).sample(ctx.rng);

            for _ in 0..order_count {
                let order_id = ids.next();
                let order_date = uniform_datetime(ctx.rng, window_start, now);
                ctx.store
                    .insert_order(order_id, customer.customer_id, order_date, 0.0)?;
                rows += 1;

                let mut total = 0.0;
                for _ in 0..cfg.items_per_order.sample(ctx.rng) {
                    let category = &ctx.rng.pick_weighted(affinity, &affinity_weights).0;
                    let pool = match catalog.get(category) {
                        Some(pool) if !pool.is_empty() => pool,
                        _ => {
                            skipped_items += 1;
                            continue;
                        }
                    };
                    let product = *ctx.rng.pick(pool);
                    let quantity = cfg.quantity.sample(ctx.rng);
                    let subtotal = round_cents(product.price * quantity as f64);
                    total += subtotal;
                    ctx.store.insert_order_item(
                        item_ids.next(),
                        order_id,
                        product.product_id,
                        quantity,
                        subtotal,
                    )?;
                    rows += 1;
                }

                let total = round_cents(total);
                ctx.store.update_order_total(order_id, total)?;

                let payment_date = uniform_datetime(ctx.rng, order_date, now);
                let method = ctx.rng.pick(&cfg.payment_methods).clone();
                let success = !ctx.rng.chance(cfg.payment_failure_rate);
                ctx.store.insert_payment(
                    order_id,
                    customer.customer_id,
                    total,
                    payment_date,
                    &method,
                    success,
                )?;
                rows += 1;
            }
        }

        log::info!("commerce: {rows} rows, {skipped_items} empty-category items skipped");
        Ok(StageReport {
            rows_written: rows,
            units_skipped: skipped_items,
        })
    }
}
