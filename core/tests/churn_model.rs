//! Churn probability model: the composite scoring scenarios, plus the
//! minimum-tenure invariant on materialized churn events.

use hopify_core::{
    churn_stage::{churn_probability, SupportProfile},
    clock::parse_ts,
    config::GenConfig,
    engine::GenEngine,
    store::DatasetStore,
    types::Segment,
};
use chrono::{Duration, NaiveDateTime};

const ANCHOR: &str = "2026-08-01 00:00:00";

fn now() -> NaiveDateTime {
    parse_ts(ANCHOR).unwrap()
}

fn profile(segment: Segment, signup: NaiveDateTime) -> SupportProfile {
    SupportProfile {
        customer_id: 1,
        segment,
        signup,
        total_tickets: 0,
        first_ticket: None,
        avg_resolution_days: None,
        billing_tickets: 0,
    }
}

// ── Scoring scenarios ────────────────────────────────────────────────

/// A brand-new SMB customer with no tickets scores exactly the SMB base
/// rate times the early-tenure dampener — no ticket adjustments apply.
#[test]
fn day_zero_smb_customer_scores_dampened_base_rate_only() {
    let cfg = GenConfig::compact().churn;
    let p = churn_probability(&cfg, &profile(Segment::Smb, now()), now());

    let expected = cfg.base_rate.smb * cfg.recent_signup_multiplier;
    assert!(
        (p - expected).abs() < 1e-12,
        "expected {expected}, got {p}"
    );
}

/// Mid-Market, six tickets, five-day mean resolution: heavy-ticket and
/// slow-resolution penalties stack on the base rate.
#[test]
fn heavy_tickets_and_slow_resolution_stack_on_base() {
    let cfg = GenConfig::compact().churn;
    let signup = now() - Duration::days(400);
    let mut customer = profile(Segment::MidMarket, signup);
    customer.total_tickets = 6;
    customer.first_ticket = Some(signup + Duration::days(30));
    customer.avg_resolution_days = Some(5.0);

    let p = churn_probability(&cfg, &customer, now());
    let expected = cfg.base_rate.mid_market
        + cfg.heavy_ticket_penalty.mid_market
        + cfg.slow_resolution_penalty.mid_market;
    assert!((p - expected).abs() < 1e-12, "expected {expected}, got {p}");
}

#[test]
fn light_ticket_load_relieves_the_base_rate() {
    let cfg = GenConfig::compact().churn;
    let signup = now() - Duration::days(400);
    let mut customer = profile(Segment::Smb, signup);
    customer.total_tickets = 2;
    customer.first_ticket = Some(signup + Duration::days(20));
    customer.avg_resolution_days = Some(1.0);

    let p = churn_probability(&cfg, &customer, now());
    let expected = cfg.base_rate.smb - cfg.light_ticket_relief;
    assert!((p - expected).abs() < 1e-12, "expected {expected}, got {p}");
}

/// A mature customer who never filed a ticket hits the extreme-delay
/// sentinel and takes the first-ticket penalty.
#[test]
fn mature_ticketless_customer_takes_delay_penalty() {
    let cfg = GenConfig::compact().churn;
    let signup = now() - Duration::days(400);
    let p = churn_probability(&cfg, &profile(Segment::Smb, signup), now());

    let expected = cfg.base_rate.smb + cfg.first_ticket_delay_penalty.smb;
    assert!((p - expected).abs() < 1e-12, "expected {expected}, got {p}");
}

#[test]
fn billing_ticket_frequency_adds_segment_scaled_penalty() {
    let cfg = GenConfig::compact().churn;
    let signup = now() - Duration::days(400);
    let mut customer = profile(Segment::Enterprise, signup);
    customer.total_tickets = 3;
    customer.first_ticket = Some(signup + Duration::days(15));
    customer.avg_resolution_days = Some(1.0);
    customer.billing_tickets = 2;

    let p = churn_probability(&cfg, &customer, now());
    let expected = cfg.base_rate.enterprise - cfg.light_ticket_relief
        + cfg.billing_ticket_penalty.enterprise;
    assert!((p - expected).abs() < 1e-12, "expected {expected}, got {p}");
}

#[test]
fn probability_is_clamped_at_the_ceiling() {
    let mut cfg = GenConfig::compact().churn;
    cfg.base_rate.smb = 0.95; // force past the ceiling
    let signup = now() - Duration::days(400);
    let p = churn_probability(&cfg, &profile(Segment::Smb, signup), now());
    assert_eq!(p, cfg.max_probability);
}

// ── Materialized churn events ────────────────────────────────────────

#[test]
fn churn_dates_respect_segment_minimum_tenure() {
    let store = DatasetStore::in_memory().expect("in-memory store");
    let mut engine = GenEngine::new(42, now(), GenConfig::compact(), store)
        .with_run_id("churn-tenure-test");
    engine.run().expect("generation run");
    let store = engine.into_store();

    let tenures = store.churn_tenures().unwrap();
    for (segment, signup, churn_date) in &tenures {
        let signup = parse_ts(signup).unwrap();
        let churn_date = parse_ts(churn_date).unwrap();
        let min_days = match segment.as_str() {
            "SMB" => 30,
            "Mid-Market" => 60,
            _ => 120,
        };
        let tenure = (churn_date - signup).num_days();
        assert!(
            tenure >= min_days,
            "{segment} churned after {tenure} days, minimum is {min_days}"
        );
        assert!(churn_date <= now(), "churn date {churn_date} is in the future");
    }
}
