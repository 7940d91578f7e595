//! Customer factory: materializes every planned cohort.
//!
//! Segment and acquisition channel are drawn independently per
//! individual, never per cohort. The storefront slug/domain is derived
//! deterministically from the synthesized display name.

use crate::clock::uniform_datetime;
use crate::config::CHANNELS;
use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::naming::Naming;
use crate::stage::{CustomerRef, GenStage, StageContext, StageReport};
use crate::types::{RowId, Segment};
use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct CustomerRecord {
    pub customer_id: RowId,
    pub name: String,
    pub email: String,
    pub billing_address: String,
    pub shipping_address: String,
    pub signup: NaiveDateTime,
    pub segment: Segment,
    pub source: String,
    pub slug: String,
    pub domain: String,
}

pub struct CustomerStage;

impl GenStage for CustomerStage {
    fn name(&self) -> &'static str {
        "customers"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.customer;
        let weights = [
            cfg.segment_weights.smb,
            cfg.segment_weights.mid_market,
            cfg.segment_weights.enterprise,
        ];

        let mut ids = IdAllocator::starting_at(1);
        let mut batch: Vec<CustomerRecord> = Vec::with_capacity(cfg.batch_size);
        let mut rows = 0u64;

        let plan = ctx.views.acquisition_plan.clone();
        for month_target in plan {
            let (month_start, month_end) = ctx.clock.month_window(month_target.month);

            for _ in 0..month_target.target {
                let signup = uniform_datetime(ctx.rng, month_start, month_end);
                let segment = *ctx.rng.pick_weighted(&Segment::ALL, &weights);
                let source = ctx
                    .rng
                    .pick_weighted(&CHANNELS, cfg.channel_weights.get(segment))
                    .to_string();

                let name = Naming::display_name(segment, ctx.rng);
                let (slug, domain) = Naming::store_identity(&name, &cfg.domain_suffix);

                let record = CustomerRecord {
                    customer_id: ids.next(),
                    email: Naming::email(ctx.rng),
                    billing_address: Naming::mailing_address(ctx.rng),
                    shipping_address: Naming::mailing_address(ctx.rng),
                    name,
                    signup,
                    segment,
                    source,
                    slug,
                    domain,
                };

                ctx.views.customers.push(CustomerRef {
                    customer_id: record.customer_id,
                    segment,
                    signup,
                });
                batch.push(record);

                if batch.len() >= cfg.batch_size {
                    ctx.store.insert_customers(&batch)?;
                    rows += batch.len() as u64;
                    batch.clear();
                }
            }
        }

        if !batch.is_empty() {
            ctx.store.insert_customers(&batch)?;
            rows += batch.len() as u64;
        }

        log::info!("customers: {rows} inserted");
        Ok(StageReport::written(rows))
    }
}
