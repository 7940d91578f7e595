//! Reference data: the product catalog and office locations.
//!
//! Runs first so the commerce stage has category pools to sample from.
//! No lifecycle coupling — products and locations are independently
//! seeded and never mutated by later stages.

use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::rng::GenRng;
use crate::stage::{GenStage, StageContext, StageReport};
use crate::types::round_cents;

pub struct ReferenceStage;

impl ReferenceStage {
    /// Marketing-copy product name for the dynamic half of the catalog.
    fn product_name(rng: &mut GenRng) -> String {
        let opener = rng.pick(&[
            "Seamless", "Adaptive", "Modular", "Unified", "Frictionless", "Composable",
            "Streamlined", "Intuitive", "Scalable", "Headless",
        ]);
        let quality = rng.pick(&[
            "Checkout", "Inventory", "Fulfillment", "Storefront", "Loyalty", "Analytics",
            "Payments", "Catalog", "Shipping", "Campaign",
        ]);
        let noun = rng.pick(&[
            "Suite", "Toolkit", "Engine", "Hub", "Console", "Planner", "Optimizer",
            "Bridge", "Assistant", "Manager",
        ]);
        format!("{opener} {quality} {noun}")
    }
}

impl GenStage for ReferenceStage {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.reference;
        let mut ids = IdAllocator::starting_at(1);
        let mut rows = 0u64;

        for i in 0..cfg.static_products {
            let category = ctx.rng.pick(&cfg.categories).clone();
            let price = round_cents(cfg.product_price.sample(ctx.rng));
            let revenue_type = ctx.rng.pick(&cfg.revenue_types).clone();
            ctx.store.insert_product(
                ids.next(),
                &format!("Static Product {}", i + 1),
                &category,
                price,
                &revenue_type,
            )?;
            rows += 1;
        }

        for _ in 0..cfg.dynamic_products {
            let name = Self::product_name(ctx.rng);
            let category = ctx.rng.pick(&cfg.categories).clone();
            let price = round_cents(cfg.product_price.sample(ctx.rng));
            let revenue_type = ctx.rng.pick(&cfg.revenue_types).clone();
            ctx.store
                .insert_product(ids.next(), &name, &category, price, &revenue_type)?;
            rows += 1;
        }

        for (i, seed) in cfg.locations.iter().enumerate() {
            ctx.store.upsert_location(i as i64 + 1, seed)?;
            rows += 1;
        }

        log::info!(
            "reference: {} products, {} locations",
            cfg.static_products + cfg.dynamic_products,
            cfg.locations.len()
        );
        Ok(StageReport::written(rows))
    }
}
