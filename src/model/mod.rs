pub mod types;
pub mod counter;

pub use types::{FeatureCount, SummaryRow, SUMMARY_COLUMNS};
pub use counter::FeatureCounter;
