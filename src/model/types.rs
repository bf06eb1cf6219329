use serde::Serialize;

/// Point count for one feature category within one dataset.
///
/// `percentage` is kept at full precision; rounding happens once, when the
/// two datasets are merged into [`SummaryRow`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCount {
    pub feature: String,
    pub count: u64,
    pub percentage: f64,
}

impl FeatureCount {
    pub fn new(feature: impl Into<String>, count: u64, percentage: f64) -> Self {
        Self {
            feature: feature.into(),
            count,
            percentage,
        }
    }
}

/// One line of the combined lifted/unlifted report.
///
/// Field order is the column order of the written CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub feature: String,
    pub lifted: u64,
    pub lifted_pct: f64,
    pub unlifted: u64,
    pub unlifted_pct: f64,
    pub total: u64,
    pub total_pct: f64,
    pub lifted_feature_pct: f64,
    pub unlifted_feature_pct: f64,
}

/// Column names in output order.
pub const SUMMARY_COLUMNS: [&str; 9] = [
    "feature",
    "lifted",
    "lifted_pct",
    "unlifted",
    "unlifted_pct",
    "total",
    "total_pct",
    "lifted_feature_pct",
    "unlifted_feature_pct",
];

impl SummaryRow {
    /// Cells rendered for console output, in [`SUMMARY_COLUMNS`] order.
    pub fn cells(&self) -> [String; 9] {
        [
            self.feature.clone(),
            self.lifted.to_string(),
            format!("{:.2}", self.lifted_pct),
            self.unlifted.to_string(),
            format!("{:.2}", self.unlifted_pct),
            self.total.to_string(),
            format!("{:.2}", self.total_pct),
            format!("{:.2}", self.lifted_feature_pct),
            format!("{:.2}", self.unlifted_feature_pct),
        ]
    }
}
