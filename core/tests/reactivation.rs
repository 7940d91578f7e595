//! Reactivation pass: offer construction bounds, single-row guarantee
//! per churn event, and the future-dated skip.

use hopify_core::{
    clock::parse_ts,
    config::GenConfig,
    customer_stage::CustomerRecord,
    reactivation_stage::{build_offer, ReactivationStage},
    rng::GenRng,
    stage::{GenStage, PipelineViews, StageContext},
    store::DatasetStore,
    subscription_stage::NewSubscription,
    types::Segment,
};
use chrono::{Duration, NaiveDateTime};

const ANCHOR: &str = "2026-08-01 00:00:00";

fn now() -> NaiveDateTime {
    parse_ts(ANCHOR).unwrap()
}

/// Sink holding one Enterprise customer churned `churn_days_ago` days ago.
fn churned_sink(churn_days_ago: i64) -> DatasetStore {
    let store = DatasetStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");

    let signup = now() - Duration::days(churn_days_ago + 200);
    store
        .insert_customers(&[CustomerRecord {
            customer_id: 1,
            name: "Summit Provisions Inc.".into(),
            email: "ops@summit-provisions.example".into(),
            billing_address: "1 Summit Way, Denver, CO 80202".into(),
            shipping_address: "1 Summit Way, Denver, CO 80202".into(),
            signup,
            segment: Segment::Enterprise,
            source: "Referral".into(),
            slug: "summit-provisions-inc".into(),
            domain: "summit-provisions-inc.hopify.com".into(),
        }])
        .expect("seed customer");
    store
        .insert_subscription(&NewSubscription {
            subscription_id: 1,
            customer_id: 1,
            plan_type: "Enterprise".into(),
            price: 550.0,
            start: signup + Duration::days(14),
            end: None,
            status: "active",
            change_type: "signup",
        })
        .expect("seed signup subscription");
    store
        .insert_churn_event(1, 1, now() - Duration::days(churn_days_ago), "Other")
        .expect("seed churn event");
    store
}

fn run_reactivation(store: &DatasetStore, seed: u64) {
    let config = GenConfig::compact();
    let clock = hopify_core::clock::GenClock::new(now());
    let mut rng = GenRng::new(seed);
    let mut views = PipelineViews::default();
    let mut ctx = StageContext {
        config: &config,
        clock: &clock,
        store,
        rng: &mut rng,
        views: &mut views,
    };
    ReactivationStage.run(&mut ctx).expect("reactivation stage");
}

#[test]
fn offers_land_30_to_180_days_after_churn_at_enterprise_pricing() {
    let cfg = GenConfig::compact().reactivation;
    let churn_date = now() - Duration::days(200);
    let mut rng = GenRng::new(42);

    for _ in 0..100 {
        let offer = build_offer(&cfg, Segment::Enterprise, churn_date, &mut rng);
        let delay = (offer.start - churn_date).num_days();
        assert!((30..=180).contains(&delay), "offer delay {delay} out of range");
        assert!(
            ["Pro", "Enterprise"].contains(&offer.plan.as_str()),
            "unexpected plan {}",
            offer.plan
        );
        assert!(
            offer.price >= 350.0 && offer.price <= 900.0,
            "price {} outside the enterprise reactivation band",
            offer.price
        );
    }
}

/// A successful roll against a sufficiently old churn event yields
/// exactly one reactivation subscription inside the 30–180 day window.
#[test]
fn successful_roll_inserts_exactly_one_reactivation_row() {
    let churn_date = now() - Duration::days(200);
    let mut any_success = false;

    for seed in 0..100 {
        let store = churned_sink(200);
        run_reactivation(&store, seed);

        let rows: Vec<_> = store
            .subscription_timeline()
            .unwrap()
            .into_iter()
            .filter(|(_, change_type, ..)| change_type == "reactivation")
            .collect();
        assert!(rows.len() <= 1, "one churn event may yield at most one row");

        if let Some((customer_id, _, start, plan, price)) = rows.first() {
            any_success = true;
            assert_eq!(*customer_id, 1);
            let start = parse_ts(start).unwrap();
            let delay = (start - churn_date).num_days();
            assert!((30..=180).contains(&delay), "start {delay} days after churn");
            assert!(start < now(), "reactivation must already have happened");
            assert!(["Pro", "Enterprise"].contains(&plan.as_str()));
            assert!(*price >= 350.0 && *price <= 900.0);
        }
    }

    assert!(
        any_success,
        "a 20% enterprise roll must succeed at least once across 100 seeds"
    );
}

/// A churn event too recent for the drawn delay produces nothing:
/// rolls that land in the future are skipped, never future-inserted.
#[test]
fn future_dated_offers_are_skipped() {
    for seed in 0..100 {
        let store = churned_sink(10); // every delay (>= 30d) lands in the future
        run_reactivation(&store, seed);

        let reactivations = store
            .subscription_count_by_change_type("reactivation")
            .unwrap();
        assert_eq!(
            reactivations, 0,
            "seed {seed}: churn 10 days ago cannot yield a past-dated reactivation"
        );
    }
}
