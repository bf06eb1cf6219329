use std::collections::BTreeMap;

use log::debug;

use crate::annotation::{Dataset, PointRecord};
use crate::model::types::FeatureCount;
use crate::types::{is_multi_feature, normalize_feature, percent, MULTIPLE};

/// Counts the points of one dataset per feature category.
///
/// Every record lands in exactly one category:
/// - a single-feature value counts under its (normalized) name
/// - any comma-joined value counts under `multiple`
///
/// The `multiple` row is always emitted, with count 0 if no record
/// overlaps more than one feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureCounter;

impl FeatureCounter {
    pub fn new() -> Self {
        Self
    }

    /// Count `records`; rows come back sorted by feature name.
    pub fn count(&self, records: &[PointRecord]) -> Vec<FeatureCount> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        counts.insert(MULTIPLE.to_string(), 0);

        for rec in records {
            let feature = if is_multi_feature(&rec.feature_type) {
                MULTIPLE
            } else {
                normalize_feature(&rec.feature_type)
            };
            *counts.entry(feature.to_string()).or_insert(0) += 1;
        }

        let total = records.len() as u64;
        debug!(
            "counted {} points into {} feature categories",
            total,
            counts.len()
        );

        counts
            .into_iter()
            .map(|(feature, count)| {
                let pct = percent(count, total);
                FeatureCount::new(feature, count, pct)
            })
            .collect()
    }

    /// Count all records of a loaded dataset.
    pub fn count_dataset(&self, dataset: &Dataset) -> Vec<FeatureCount> {
        self.count(&dataset.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(types: &[&str]) -> Vec<PointRecord> {
        types
            .iter()
            .enumerate()
            .map(|(i, t)| PointRecord::new(format!("p{i}"), *t))
            .collect()
    }

    fn count_of(rows: &[FeatureCount], feature: &str) -> Option<u64> {
        rows.iter().find(|r| r.feature == feature).map(|r| r.count)
    }

    #[test]
    fn counts_partition_all_records() {
        let recs = records(&[
            "intron", "intron", "CDS", "intron,CDS", "RNA", "intergenic", "CDS,3'-UTR",
        ]);
        let rows = FeatureCounter::new().count(&recs);

        let sum: u64 = rows.iter().map(|r| r.count).sum();
        assert_eq!(sum, recs.len() as u64);

        let pct_sum: f64 = rows.iter().map(|r| r.percentage).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn multi_feature_groups_collapse_into_one_row() {
        let recs = records(&["intron,CDS", "CDS,intron", "RNA,intron,CDS", "intron,CDS", "intron"]);
        let rows = FeatureCounter::new().count(&recs);

        assert_eq!(rows.iter().filter(|r| r.feature == MULTIPLE).count(), 1);
        assert_eq!(count_of(&rows, MULTIPLE), Some(4));
        assert_eq!(count_of(&rows, "intron"), Some(1));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn multiple_row_is_emitted_when_empty() {
        let rows = FeatureCounter::new().count(&records(&["intron", "intron"]));
        assert_eq!(count_of(&rows, MULTIPLE), Some(0));
        assert_eq!(rows.iter().find(|r| r.feature == MULTIPLE).unwrap().percentage, 0.0);

        let rows = FeatureCounter::new().count(&[]);
        assert_eq!(rows, vec![FeatureCount::new(MULTIPLE, 0, 0.0)]);
    }

    #[test]
    fn synonyms_are_renamed_and_rows_sorted() {
        let recs = records(&["five_prime_UTR", "three_prime_UTR", "intron", "5'-UTR"]);
        let rows = FeatureCounter::new().count(&recs);

        let names: Vec<_> = rows.iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(names, vec!["3'-UTR", "5'-UTR", "intron", "multiple"]);
        assert_eq!(count_of(&rows, "5'-UTR"), Some(2));
    }

    #[test]
    fn surrounding_whitespace_makes_a_distinct_group() {
        let rows = FeatureCounter::new().count(&records(&["intron", "intron ", " intron", "intron"]));

        assert_eq!(count_of(&rows, "intron"), Some(2));
        assert_eq!(count_of(&rows, "intron "), Some(1));
        assert_eq!(count_of(&rows, " intron"), Some(1));
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn percentages_are_not_rounded() {
        let rows = FeatureCounter::new().count(&records(&["intron", "intron", "intergenic"]));
        let intron = rows.iter().find(|r| r.feature == "intron").unwrap();
        assert_eq!(intron.count, 2);
        assert_eq!(intron.percentage, 2.0 / 3.0 * 100.0);
    }
}
