//! Customer population invariants: segment and channel domains, slug
//! derivation, signup windows.

use hopify_core::{
    clock::parse_ts, config::GenConfig, engine::GenEngine, naming::slugify, store::DatasetStore,
};

const ANCHOR: &str = "2026-08-01 00:00:00";

fn generated_store(seed: u64) -> DatasetStore {
    let store = DatasetStore::in_memory().expect("in-memory store");
    let now = parse_ts(ANCHOR).unwrap();
    let mut engine = GenEngine::new(seed, now, GenConfig::compact(), store)
        .with_run_id(format!("pop-test-{seed}"));
    engine.run().expect("generation run");
    engine.into_store()
}

#[test]
fn segments_and_channels_stay_in_domain() {
    let store = generated_store(42);
    let rows = store.customer_segment_sources().unwrap();
    assert!(!rows.is_empty(), "expected a generated population");

    let segments = ["SMB", "Mid-Market", "Enterprise"];
    let channels = ["Organic", "Social", "Paid Search", "Referral", "Direct"];
    for (segment, source) in &rows {
        assert!(segments.contains(&segment.as_str()), "bad segment: {segment}");
        assert!(channels.contains(&source.as_str()), "bad channel: {source}");
    }

    // The 60/30/10 mix should be roughly visible even at compact scale.
    let smb = rows.iter().filter(|(s, _)| s == "SMB").count();
    assert!(
        smb * 2 > rows.len(),
        "SMB should be the majority segment ({smb} of {})",
        rows.len()
    );
}

#[test]
fn store_identity_is_derived_from_name() {
    let store = generated_store(7);
    for (name, slug, domain) in store.customer_store_identities().unwrap() {
        assert_eq!(slug, slugify(&name), "slug must be derived from '{name}'");
        assert_eq!(domain, format!("{slug}.hopify.com"));
        assert!(!slug.contains(' '), "slug must be URL-safe: {slug}");
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
    }
}

#[test]
fn signups_fall_inside_the_historical_window() {
    let store = generated_store(123);
    let directory = store.customer_directory().unwrap();
    assert!(!directory.is_empty());

    let now = parse_ts(ANCHOR).unwrap();
    // Compact profile: 6 months of history ending one month before now.
    let earliest = parse_ts("2026-02-01 00:00:00").unwrap();
    for customer in &directory {
        assert!(
            customer.signup >= earliest && customer.signup < now,
            "signup {} outside the acquisition window",
            customer.signup
        );
    }

    // Ids are unique and monotone from 1.
    for (i, customer) in directory.iter().enumerate() {
        assert_eq!(customer.customer_id, i as i64 + 1);
    }
}
