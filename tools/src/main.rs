//! gen-runner: headless dataset generator for the Hopify lifecycle sink.
//!
//! Usage:
//!   gen-runner --seed 42 --db hopify_saas.db
//!   gen-runner --seed 42 --db hopify_saas.db --profile compact
//!   gen-runner --seed 42 --db hopify_saas.db --benchmarks benchmarks.csv
//!   gen-runner --seed 42 --db hopify_saas.db --now "2026-08-01 00:00:00"

use anyhow::{Context, Result};
use hopify_core::{
    clock::{parse_ts, TS_FORMAT},
    config::GenConfig,
    engine::GenEngine,
    store::{DatasetStore, TABLES},
};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let profile = str_arg(&args, "--profile").unwrap_or("standard");
    let config_path = str_arg(&args, "--config");
    let benchmarks = str_arg(&args, "--benchmarks");
    let now_arg = str_arg(&args, "--now");

    let now = match now_arg {
        Some(raw) => parse_ts(raw).with_context(|| format!("--now must be {TS_FORMAT}"))?,
        None => chrono::Local::now().naive_local(),
    };

    let config = match (config_path, profile) {
        (Some(path), _) => GenConfig::load(&PathBuf::from(path))?,
        (None, "compact") => GenConfig::compact(),
        (None, "standard") => GenConfig::standard(),
        (None, other) => anyhow::bail!("unknown profile '{other}' (standard|compact)"),
    };

    println!("Hopify lifecycle dataset — gen-runner");
    println!("  seed:    {seed}");
    println!("  db:      {db}");
    println!("  profile: {profile}");
    println!("  anchor:  {}", now.format(TS_FORMAT));
    println!();

    let store = DatasetStore::open(db)?;
    let mut engine = GenEngine::new(seed, now, config, store);
    if let Some(path) = benchmarks {
        engine = engine.with_benchmarks_file(PathBuf::from(path));
    }

    let summary = engine.run()?;
    print_summary(&engine, &summary)?;
    Ok(())
}

fn print_summary(engine: &GenEngine, summary: &hopify_core::engine::RunSummary) -> Result<()> {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:     {}", summary.run_id);
    println!("  seed:       {}", summary.seed);
    println!("  total rows: {}", summary.total_rows());
    println!();

    println!("=== STAGES ===");
    for (name, report) in &summary.stages {
        println!(
            "  {name:<14} {:>9} rows  {:>7} skipped",
            report.rows_written, report.units_skipped
        );
    }
    println!();

    println!("=== TABLES ===");
    for table in TABLES {
        let count = engine.store().row_count(table)?;
        println!("  {table:<18} {count:>9}");
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
