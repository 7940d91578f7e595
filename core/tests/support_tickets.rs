//! Support ticket invariants: resolution strictly after creation,
//! categories in domain, creation inside the sampling window.

use hopify_core::{clock::parse_ts, config::GenConfig, engine::GenEngine, store::DatasetStore};

const ANCHOR: &str = "2026-08-01 00:00:00";

fn generated_store(seed: u64) -> DatasetStore {
    let store = DatasetStore::in_memory().expect("in-memory store");
    let now = parse_ts(ANCHOR).unwrap();
    let mut engine = GenEngine::new(seed, now, GenConfig::compact(), store)
        .with_run_id(format!("support-test-{seed}"));
    engine.run().expect("generation run");
    engine.into_store()
}

#[test]
fn resolution_is_strictly_after_creation() {
    let store = generated_store(42);
    let tickets = store.ticket_windows().unwrap();
    assert!(!tickets.is_empty(), "expected generated tickets");

    for (_, created, resolved) in &tickets {
        assert!(
            resolved > created,
            "ticket resolved at {resolved}, created at {created}"
        );
    }
}

#[test]
fn categories_stay_in_domain() {
    let store = generated_store(42);
    let categories = [
        "Billing",
        "Technical",
        "Onboarding",
        "Account Access",
        "General Inquiry",
    ];
    for (category, ..) in store.ticket_windows().unwrap() {
        assert!(
            categories.contains(&category.as_str()),
            "unexpected category: {category}"
        );
    }
}

#[test]
fn creation_falls_in_the_trailing_year_minus_recent_week() {
    let store = generated_store(7);
    let now = parse_ts(ANCHOR).unwrap();
    let window_start = now - chrono::Duration::days(365);
    let window_end = now - chrono::Duration::days(7);

    for (_, created, _) in store.ticket_windows().unwrap() {
        let created = parse_ts(&created).unwrap();
        assert!(
            created >= window_start && created <= window_end,
            "ticket created at {created} outside [{window_start}, {window_end}]"
        );
    }
}

#[test]
fn sampling_respects_the_customer_cap() {
    let store = generated_store(123);
    let with_tickets = store.customers_with_tickets().unwrap();
    let population = store.customer_directory().unwrap().len() as i64;
    assert!(
        with_tickets <= population.min(GenConfig::compact().support.sample_cap as i64),
        "ticketed customers {with_tickets} exceed the sample cap"
    );
}
