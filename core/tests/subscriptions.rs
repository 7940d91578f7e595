//! Subscription state-machine invariants: one signup per customer,
//! signup precedes every upgrade/reactivation, and the id counter
//! composes across passes.

use hopify_core::{clock::parse_ts, config::GenConfig, engine::GenEngine, store::DatasetStore};
use std::collections::HashMap;

fn generated_store(seed: u64) -> DatasetStore {
    let store = DatasetStore::in_memory().expect("in-memory store");
    let now = parse_ts("2026-08-01 00:00:00").unwrap();
    let mut engine = GenEngine::new(seed, now, GenConfig::compact(), store)
        .with_run_id(format!("subs-test-{seed}"));
    engine.run().expect("generation run");
    engine.into_store()
}

#[test]
fn every_customer_has_exactly_one_signup() {
    let store = generated_store(42);
    let customers = store.customer_directory().unwrap();
    let timeline = store.subscription_timeline().unwrap();

    let mut signups: HashMap<i64, usize> = HashMap::new();
    for (customer_id, change_type, ..) in &timeline {
        if change_type == "signup" {
            *signups.entry(*customer_id).or_default() += 1;
        }
    }

    for customer in &customers {
        assert_eq!(
            signups.get(&customer.customer_id).copied().unwrap_or(0),
            1,
            "customer {} must have exactly one signup subscription",
            customer.customer_id
        );
    }
}

#[test]
fn signup_precedes_every_upgrade_and_reactivation() {
    let store = generated_store(42);
    let timeline = store.subscription_timeline().unwrap();

    let mut signup_start: HashMap<i64, String> = HashMap::new();
    for (customer_id, change_type, start, ..) in &timeline {
        if change_type == "signup" {
            signup_start.insert(*customer_id, start.clone());
        }
    }

    for (customer_id, change_type, start, ..) in &timeline {
        if change_type == "upgrade" || change_type == "reactivation" {
            let first = signup_start
                .get(customer_id)
                .unwrap_or_else(|| panic!("customer {customer_id} has {change_type} but no signup"));
            assert!(
                start > first,
                "customer {customer_id}: {change_type} at {start} not after signup at {first}"
            );
        }
    }
}

#[test]
fn change_types_stay_in_domain() {
    let store = generated_store(7);
    for (_, change_type, ..) in store.subscription_timeline().unwrap() {
        assert!(
            ["signup", "upgrade", "reactivation"].contains(&change_type.as_str()),
            "unexpected change_type: {change_type}"
        );
    }
}

#[test]
fn signup_prices_respect_segment_bands() {
    let store = generated_store(123);
    let customers = store.customer_directory().unwrap();
    let by_id: HashMap<i64, _> = customers.iter().map(|c| (c.customer_id, c.segment)).collect();

    for (customer_id, change_type, _, _, price) in store.subscription_timeline().unwrap() {
        if change_type != "signup" {
            continue;
        }
        let (lo, hi) = match by_id[&customer_id].as_str() {
            "SMB" => (30.0, 100.0),
            "Mid-Market" => (100.0, 300.0),
            _ => (300.0, 800.0),
        };
        assert!(
            price >= lo && price <= hi,
            "customer {customer_id}: signup price {price} outside [{lo}, {hi}]"
        );
    }
}

#[test]
fn rerunning_against_a_populated_sink_allocates_fresh_ids() {
    let store = generated_store(42);
    let before = store.max_subscription_id().unwrap().expect("subscriptions exist");

    // A later pass re-seeds from the sink maximum rather than 1.
    let mut ids = hopify_core::ids::IdAllocator::after_max(Some(before), 1);
    assert_eq!(ids.next(), before + 1);
}
