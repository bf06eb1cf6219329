use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::annotation::Dataset;
use crate::model::counter::FeatureCounter;
use crate::model::types::{FeatureCount, SummaryRow, SUMMARY_COLUMNS};
use crate::types::{canonical_rank, rounded_percent};

const SUMMARY_SUFFIX: &str = "_summary.csv";

/// Reconciles lifted and unlifted feature counts into one report.
///
/// - full outer join on feature name, missing side filled with 0
/// - totals and `total_pct` from raw counts
/// - every percentage computed from integer counts and rounded half up
///   to 2 decimals, once
/// - rows ordered by [`canonical_rank`], unknown categories after, by name
///
/// A feature with no points on either side keeps its row; both
/// per-feature percentages are then 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryMerger;

impl SummaryMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, lifted: &[FeatureCount], unlifted: &[FeatureCount]) -> Vec<SummaryRow> {
        // feature -> (lifted count, unlifted count)
        let mut joined: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for fc in lifted {
            joined.entry(fc.feature.as_str()).or_default().0 += fc.count;
        }
        for fc in unlifted {
            joined.entry(fc.feature.as_str()).or_default().1 += fc.count;
        }

        // per-side totals equal the record counts, since the counts partition each dataset
        let lifted_total: u64 = joined.values().map(|(l, _)| l).sum();
        let unlifted_total: u64 = joined.values().map(|(_, u)| u).sum();
        let grand_total = lifted_total + unlifted_total;

        let mut rows: Vec<SummaryRow> = joined
            .into_iter()
            .map(|(feature, (lifted, unlifted))| {
                let total = lifted + unlifted;
                SummaryRow {
                    feature: feature.to_string(),
                    lifted,
                    lifted_pct: rounded_percent(lifted, lifted_total),
                    unlifted,
                    unlifted_pct: rounded_percent(unlifted, unlifted_total),
                    total,
                    total_pct: rounded_percent(total, grand_total),
                    lifted_feature_pct: rounded_percent(lifted, total),
                    unlifted_feature_pct: rounded_percent(unlifted, total),
                }
            })
            .collect();

        // joined is name-ordered, so a stable sort on rank keeps unknowns lexicographic
        rows.sort_by_key(|r| canonical_rank(&r.feature));
        rows
    }
}

/// The finished report: ordered, rounded rows ready to print or save.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSummary {
    pub rows: Vec<SummaryRow>,
}

impl FeatureSummary {
    pub fn new(rows: Vec<SummaryRow>) -> Self {
        Self { rows }
    }

    /// Count both datasets and merge them.
    pub fn from_datasets(lifted: &Dataset, unlifted: &Dataset) -> Self {
        let counter = FeatureCounter::new();
        let lifted_counts = counter.count_dataset(lifted);
        let unlifted_counts = counter.count_dataset(unlifted);

        let rows = SummaryMerger::new().merge(&lifted_counts, &unlifted_counts);
        info!(
            "summarized {} lifted and {} unlifted points into {} features",
            lifted.records.len(),
            unlifted.records.len(),
            rows.len()
        );
        Self::new(rows)
    }

    pub fn row(&self, feature: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.feature == feature)
    }

    /// Write the report as comma-separated text with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);
        if self.rows.is_empty() {
            wtr.write_record(SUMMARY_COLUMNS)?;
        }
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the report to `path` as CSV.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .with_context(|| format!("create summary file {}", path.display()))?;
        self.write_csv(std::io::BufWriter::new(file))
            .with_context(|| format!("write summary to {}", path.display()))
    }
}

/// Output file name for a lifted input.
///
/// The base name is cut at its last `_` (`sample_qt.csv` -> `sample`) and
/// `_summary.csv` is appended; names without `_` are kept whole.
pub fn summary_file_name(lifted_path: impl AsRef<Path>) -> String {
    let base = lifted_path
        .as_ref()
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match base.rsplit_once('_') {
        Some((head, _)) => head,
        None => base.as_str(),
    };
    format!("{stem}{SUMMARY_SUFFIX}")
}

/// Human-readable, right-aligned table of the report.
///
/// Percentages are shown with two decimals. Meant for the console; the CSV
/// written by [`FeatureSummary::save`] is the machine-readable form.
impl fmt::Display for FeatureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 9]> = self.rows.iter().map(SummaryRow::cells).collect();

        let mut widths = SUMMARY_COLUMNS.map(str::len);
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        let header: Vec<String> = SUMMARY_COLUMNS
            .iter()
            .zip(widths)
            .map(|(name, w)| format!("{name:>w$}"))
            .collect();
        writeln!(f, "{}", header.join(" "))?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(widths)
                .map(|(cell, w)| format!("{cell:>w$}"))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
