//! feature_summary
//!
//! Summarizes liftover point annotations by gene-feature type.
//! Lifted and unlifted point tables are counted per feature category
//! (points overlapping several features collapse into `multiple`), then
//! merged into one report in a fixed feature order.

pub mod types;
pub mod model;
pub mod annotation;
pub mod summary;

pub use summary::{summary_file_name, FeatureSummary, SummaryMerger};

pub use annotation::{Dataset, DatasetLoader, ParseError, PointRecord};

pub use types::{DatasetKind, CANONICAL_FEATURES, MULTIPLE};

pub use model::{FeatureCount, FeatureCounter, SummaryRow};
