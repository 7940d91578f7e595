//! Support simulator: tickets for a sampled slice of the population.
//!
//! Volume and resolution speed are segment-tuned in opposite
//! directions: Enterprise files the most tickets and gets the fastest
//! answers, SMB the fewest and slowest. Resolution is floored one hour
//! after creation so resolved_at is always strictly later.

use crate::clock::uniform_datetime;
use crate::error::GenResult;
use crate::ids::IdAllocator;
use crate::stage::{GenStage, StageContext, StageReport};
use crate::types::RowId;
use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct TicketRecord {
    pub ticket_id: RowId,
    pub customer_id: RowId,
    pub category: String,
    pub created: NaiveDateTime,
    pub resolved: NaiveDateTime,
}

pub struct SupportStage;

impl GenStage for SupportStage {
    fn name(&self) -> &'static str {
        "support"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let cfg = &ctx.config.support;
        let window_start = ctx.clock.days_ago(cfg.window_start_days_ago);
        let window_end = ctx.clock.days_ago(cfg.window_end_days_ago);

        let sampled = ctx.rng.sample(&ctx.views.customers, cfg.sample_cap);

        let mut ids = IdAllocator::starting_at(1);
        let mut batch: Vec<TicketRecord> = Vec::new();

        for customer in sampled {
            let volume = cfg.volume.get(customer.segment);
            let count = *ctx.rng.pick_weighted(&volume.counts, &volume.weights);

            for _ in 0..count {
                let created = uniform_datetime(ctx.rng, window_start, window_end);
                let hours = volume.resolution_hours.sample(ctx.rng);
                let mut resolved = created + Duration::hours(hours);
                if resolved <= created {
                    resolved = created + Duration::hours(1);
                }

                batch.push(TicketRecord {
                    ticket_id: ids.next(),
                    customer_id: customer.customer_id,
                    category: ctx.rng.pick(&cfg.categories).clone(),
                    created,
                    resolved,
                });
            }
        }

        ctx.store.insert_support_tickets(&batch)?;
        log::info!("support: {} tickets", batch.len());
        Ok(StageReport::written(batch.len() as u64))
    }
}
