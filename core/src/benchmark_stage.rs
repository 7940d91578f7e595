//! Benchmark import: idempotent replace of the benchmarks table from a
//! delimited reference file.
//!
//! The file carries a header row naming its columns. Rows missing
//! benchmark_id, metric_name or target_value — or with a non-numeric
//! target value — are logged and skipped; only failing to read the file
//! itself is fatal. Values are plain comma-delimited with no quoting.

use crate::error::GenResult;
use crate::stage::{GenStage, StageContext, StageReport};
use anyhow::{anyhow, Context};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct BenchmarkRow {
    pub benchmark_id: String,
    pub metric_category: String,
    pub segment: String,
    pub metric_name: String,
    pub target_value: f64,
    pub description: String,
    pub target_period: String,
}

const REQUIRED_COLUMNS: [&str; 3] = ["benchmark_id", "metric_name", "target_value"];

/// Parse the benchmark file, skipping malformed rows with a diagnostic.
pub fn parse_benchmark_file(path: &Path) -> GenResult<Vec<BenchmarkRow>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading benchmark file {}", path.display()))?;
    let mut lines = raw.lines().enumerate();

    let (_, header) = lines
        .next()
        .ok_or_else(|| anyhow!("benchmark file {} is empty", path.display()))?;
    let columns: HashMap<&str, usize> = header
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, name)| (name, i))
        .collect();
    for required in REQUIRED_COLUMNS {
        if !columns.contains_key(required) {
            return Err(anyhow!(
                "benchmark file {} is missing required column '{required}'",
                path.display()
            )
            .into());
        }
    }

    let field = |values: &[&str], name: &str| -> String {
        columns
            .get(name)
            .and_then(|&i| values.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split(',').collect();

        let benchmark_id = field(&values, "benchmark_id");
        let metric_name = field(&values, "metric_name");
        let target_raw = field(&values, "target_value");
        if benchmark_id.is_empty() || metric_name.is_empty() || target_raw.is_empty() {
            log::warn!("benchmarks: row {} missing required fields, skipped", line_no + 1);
            continue;
        }

        let target_value = match target_raw.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                log::warn!(
                    "benchmarks: row {} has non-numeric target_value '{target_raw}', skipped",
                    line_no + 1
                );
                continue;
            }
        };

        rows.push(BenchmarkRow {
            benchmark_id,
            metric_category: field(&values, "metric_category"),
            segment: field(&values, "segment"),
            metric_name,
            target_value,
            description: field(&values, "description"),
            target_period: field(&values, "target_period"),
        });
    }
    Ok(rows)
}

pub struct BenchmarkStage {
    path: PathBuf,
}

impl BenchmarkStage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl GenStage for BenchmarkStage {
    fn name(&self) -> &'static str {
        "benchmarks"
    }

    fn run(&mut self, ctx: &mut StageContext<'_>) -> GenResult<StageReport> {
        let rows = parse_benchmark_file(&self.path)?;
        ctx.store.replace_benchmarks(&rows)?;
        log::info!("benchmarks: table replaced, {} rows", rows.len());
        Ok(StageReport::written(rows.len() as u64))
    }
}
