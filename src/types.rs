use std::fmt;

/// Separator used inside a feature-type field when a point overlaps
/// more than one annotated feature (e.g. `intron,CDS`).
pub const MULTI_FEATURE_DELIMITER: char = ',';

/// Synthetic category collecting every multi-feature point.
pub const MULTIPLE: &str = "multiple";

/// Fixed reporting order of the known feature categories.
pub const CANONICAL_FEATURES: [&str; 8] = [
    "pseudogene",
    "CDS",
    "5'-UTR",
    "3'-UTR",
    "RNA",
    "intron",
    "intergenic",
    MULTIPLE,
];

/// Which side of the liftover a point table describes.
///
/// The variant is read off the header: lifted tables carry `qkey`/`qftype`,
/// unlifted ones `ukey`/`uftype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Lifted,
    Unlifted,
}

impl DatasetKind {
    /// Column holding the unique point key.
    pub fn key_column(self) -> &'static str {
        match self {
            DatasetKind::Lifted => "qkey",
            DatasetKind::Unlifted => "ukey",
        }
    }

    /// Column holding the (possibly comma-joined) feature type.
    pub fn type_column(self) -> &'static str {
        match self {
            DatasetKind::Lifted => "qftype",
            DatasetKind::Unlifted => "uftype",
        }
    }

    /// Detect the variant from header names. Lifted wins if both type columns exist.
    pub fn detect<'a, I>(headers: I) -> Option<DatasetKind>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found = None;
        for h in headers {
            if h == DatasetKind::Lifted.type_column() {
                return Some(DatasetKind::Lifted);
            }
            if h == DatasetKind::Unlifted.type_column() {
                found = Some(DatasetKind::Unlifted);
            }
        }
        found
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DatasetKind::Lifted => "lifted",
            DatasetKind::Unlifted => "unlifted",
        };
        write!(f, "{s}")
    }
}

/// True if the raw feature-type value names more than one feature.
#[inline]
pub fn is_multi_feature(raw: &str) -> bool {
    raw.contains(MULTI_FEATURE_DELIMITER)
}

/// Map annotation synonyms onto the names used in reports.
pub fn normalize_feature(name: &str) -> &str {
    match name {
        "five_prime_UTR" => "5'-UTR",
        "three_prime_UTR" => "3'-UTR",
        other => other,
    }
}

/// Sort key for report rows.
///
/// Known categories rank by their position in [`CANONICAL_FEATURES`];
/// anything else ranks after all of them.
pub fn canonical_rank(name: &str) -> usize {
    CANONICAL_FEATURES
        .iter()
        .position(|f| *f == name)
        .unwrap_or(CANONICAL_FEATURES.len())
}

/// `part / whole * 100` rounded half up to two decimals, or 0 when `whole` is 0.
///
/// Done on integers so that exact midpoints (`29 / 800` = 3.625) round up
/// instead of falling on whichever side the float division lands.
pub fn rounded_percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let (part, whole) = (part as u128, whole as u128);
    let hundredths = (part * 20_000 + whole) / (2 * whole);
    hundredths as f64 / 100.0
}

/// `part / whole * 100`, or 0 when `whole` is 0.
#[inline]
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
