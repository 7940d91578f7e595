//! Benchmark import: malformed rows are skipped with a diagnostic,
//! good rows load, and re-import fully replaces the table.

use hopify_core::benchmark_stage::parse_benchmark_file;
use hopify_core::store::DatasetStore;
use std::io::Write;
use std::path::PathBuf;

const HEADER: &str =
    "benchmark_id,metric_category,segment,metric_name,target_value,description,target_period";

fn write_fixture(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("hopify-bench-{name}-{}.csv", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("create fixture");
    writeln!(file, "{HEADER}").unwrap();
    write!(file, "{body}").unwrap();
    path
}

#[test]
fn well_formed_rows_parse_completely() {
    let path = write_fixture(
        "ok",
        "B-001,Revenue,SMB,mrr_growth,0.12,Monthly recurring revenue growth,monthly\n\
         B-002,Support,Enterprise,first_response_hours,4,Time to first response,weekly\n",
    );
    let rows = parse_benchmark_file(&path).expect("parse");
    std::fs::remove_file(&path).ok();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].benchmark_id, "B-001");
    assert_eq!(rows[0].target_value, 0.12);
    assert_eq!(rows[1].segment, "Enterprise");
}

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let path = write_fixture(
        "bad",
        "B-001,Revenue,SMB,mrr_growth,0.12,ok row,monthly\n\
         ,Revenue,SMB,missing_id,0.5,skipped,monthly\n\
         B-003,Revenue,SMB,,0.5,skipped missing name,monthly\n\
         B-004,Revenue,SMB,bad_target,not-a-number,skipped,monthly\n\
         B-005,Support,Mid-Market,resolution_days,2.5,ok row,weekly\n",
    );
    let rows = parse_benchmark_file(&path).expect("parse");
    std::fs::remove_file(&path).ok();

    let ids: Vec<&str> = rows.iter().map(|r| r.benchmark_id.as_str()).collect();
    assert_eq!(ids, vec!["B-001", "B-005"], "only the two valid rows survive");
}

#[test]
fn missing_file_is_fatal() {
    let missing = std::env::temp_dir().join("hopify-bench-does-not-exist.csv");
    assert!(parse_benchmark_file(&missing).is_err());
}

#[test]
fn reimport_replaces_the_table() {
    let store = DatasetStore::in_memory().expect("store");
    store.migrate().expect("migrate");

    let first = write_fixture(
        "first",
        "B-001,Revenue,SMB,mrr_growth,0.12,row,monthly\n\
         B-002,Revenue,SMB,arpu,55,row,monthly\n\
         B-003,Revenue,SMB,nrr,1.05,row,monthly\n",
    );
    let rows = parse_benchmark_file(&first).unwrap();
    store.replace_benchmarks(&rows).unwrap();
    std::fs::remove_file(&first).ok();
    assert_eq!(store.row_count("benchmarks").unwrap(), 3);

    let second = write_fixture("second", "B-009,Support,SMB,csat,0.9,row,quarterly\n");
    let rows = parse_benchmark_file(&second).unwrap();
    store.replace_benchmarks(&rows).unwrap();
    std::fs::remove_file(&second).ok();

    assert_eq!(
        store.row_count("benchmarks").unwrap(),
        1,
        "import must replace, not append"
    );
}
