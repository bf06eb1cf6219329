use std::io::Read;

use crate::types::DatasetKind;

/// One annotated point from a lifted or unlifted table.
///
/// Only the two columns the summary needs are kept; everything else in the
/// row (chromosome, gene annotation, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointRecord {
    pub key: String,          // qkey / ukey
    pub feature_type: String, // qftype / uftype, may be comma-joined
}

impl PointRecord {
    pub fn new(key: impl Into<String>, feature_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            feature_type: feature_type.into(),
        }
    }
}

/// Errors raised while reading a point table.
///
/// Every variant names the input it came from so that a failing run can be
/// traced back to the offending file.
#[derive(Debug)]
pub enum ParseError {
    IoPath { path: String, source: std::io::Error },
    Table { input: String, source: csv::Error },
    MissingTypeColumn { input: String },
    MissingKeyColumn { input: String, column: &'static str },
    MalformedRow { input: String, line: u64, reason: String },
    WrongKind { input: String, expected: DatasetKind, found: DatasetKind },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IoPath { path, source } => {
                write!(f, "I/O error while reading '{}': {}", path, source)
            }
            ParseError::Table { input, source } => {
                write!(f, "'{}' is not a readable tab-delimited table: {}", input, source)
            }
            ParseError::MissingTypeColumn { input } => write!(
                f,
                "'{}' has neither a '{}' (lifted) nor a '{}' (unlifted) column",
                input,
                DatasetKind::Lifted.type_column(),
                DatasetKind::Unlifted.type_column()
            ),
            ParseError::MissingKeyColumn { input, column } => {
                write!(f, "'{}' is missing the key column '{}'", input, column)
            }
            ParseError::MalformedRow { input, line, reason } => {
                write!(f, "'{}' line {}: {}", input, line, reason)
            }
            ParseError::WrongKind { input, expected, found } => write!(
                f,
                "'{}': expected a {} point table ('{}' column) but found a {} one ('{}' column)",
                input,
                expected,
                expected.type_column(),
                found,
                found.type_column()
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::IoPath { source, .. } => Some(source),
            ParseError::Table { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Streaming reader for tab-delimited point tables.
///
/// The header is read eagerly in [`PointReader::new`] so that the table
/// variant is known (or rejected) before any row is consumed.
///
/// # Example
/// ```
/// use std::io::Cursor;
/// use feature_summary::annotation::io::PointReader;
/// use feature_summary::types::DatasetKind;
///
/// let data = "qkey\tqftype\tqgann_gene\np1\tintron\tIGF2BP2\np2\tCDS\tIGF2BP2\n";
/// let rdr = PointReader::new(Cursor::new(data), "example_qt.csv").unwrap();
/// assert_eq!(rdr.kind(), DatasetKind::Lifted);
///
/// let recs: Vec<_> = rdr.records().collect::<Result<_, _>>().unwrap();
/// assert_eq!(recs.len(), 2);
/// assert_eq!(recs[1].feature_type, "CDS");
/// ```
pub struct PointReader<R: Read> {
    inner: csv::Reader<R>,
    input: String,
    kind: DatasetKind,
    key_idx: usize,
    type_idx: usize,
}

impl<R: Read> PointReader<R> {
    /// Wrap `reader`; `input` is the name used in error messages.
    pub fn new(reader: R, input: impl Into<String>) -> Result<Self, ParseError> {
        let input = input.into();
        let mut inner = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = inner
            .headers()
            .map_err(|e| ParseError::Table {
                input: input.clone(),
                source: e,
            })?
            .clone();

        let kind = DatasetKind::detect(headers.iter()).ok_or_else(|| {
            ParseError::MissingTypeColumn {
                input: input.clone(),
            }
        })?;

        let position = |name: &str| headers.iter().position(|h| h == name);
        let type_idx = position(kind.type_column()).ok_or_else(|| {
            ParseError::MissingTypeColumn {
                input: input.clone(),
            }
        })?;
        let key_idx = position(kind.key_column()).ok_or_else(|| {
            ParseError::MissingKeyColumn {
                input: input.clone(),
                column: kind.key_column(),
            }
        })?;

        Ok(Self {
            inner,
            input,
            kind,
            key_idx,
            type_idx,
        })
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Returns an iterator over parsed records.
    ///
    /// - Blank lines are skipped
    /// - Short rows and empty feature types are errors
    pub fn records(self) -> impl Iterator<Item = Result<PointRecord, ParseError>> {
        let PointReader {
            inner,
            input,
            kind,
            key_idx,
            type_idx,
        } = self;

        inner.into_records().map(move |row| {
            let row = row.map_err(|e| ParseError::Table {
                input: input.clone(),
                source: e,
            })?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            let field = |idx: usize, column: &str| {
                row.get(idx).ok_or_else(|| ParseError::MalformedRow {
                    input: input.clone(),
                    line,
                    reason: format!("row has no '{}' column", column),
                })
            };

            let key = field(key_idx, kind.key_column())?;
            let feature_type = field(type_idx, kind.type_column())?;
            if feature_type.is_empty() {
                return Err(ParseError::MalformedRow {
                    input: input.clone(),
                    line,
                    reason: format!("empty '{}' value", kind.type_column()),
                });
            }

            Ok(PointRecord::new(key, feature_type))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LIFTED: &str = "\
qkey\tqftype\ttkey\ttftype\tqgann_gene
hg38_chr3_185802277+_1\tintron\tcanfam3_chr34_18502545+\tintron\tIGF2BP2
hg38_chr3_185802301+_2\tintron,CDS\tcanfam3_chr34_18502569+\tintron\tIGF2BP2
";

    #[test]
    fn reads_lifted_table() {
        let rdr = PointReader::new(Cursor::new(LIFTED), "a_qt.csv").unwrap();
        assert_eq!(rdr.kind(), DatasetKind::Lifted);

        let recs: Vec<_> = rdr.records().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].key, "hg38_chr3_185802277+_1");
        assert_eq!(recs[0].feature_type, "intron");
        assert_eq!(recs[1].feature_type, "intron,CDS");
    }

    #[test]
    fn reads_unlifted_table_with_columns_in_any_order() {
        let data = "uftype\tchr\tukey\nintergenic\tchr1\tu1\n\nRNA\tchr2\tu2\n";
        let rdr = PointReader::new(Cursor::new(data), "a_qu.csv").unwrap();
        assert_eq!(rdr.kind(), DatasetKind::Unlifted);

        let recs: Vec<_> = rdr.records().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(
            recs,
            vec![PointRecord::new("u1", "intergenic"), PointRecord::new("u2", "RNA")]
        );
    }

    #[test]
    fn feature_type_is_kept_verbatim() {
        let data = "qkey\tqftype\np1\tintron\np2\tintron \np3\t intron\n";
        let rdr = PointReader::new(Cursor::new(data), "ws_qt.csv").unwrap();

        let types: Vec<_> = rdr
            .records()
            .map(|r| r.unwrap().feature_type)
            .collect();
        assert_eq!(types, vec!["intron", "intron ", " intron"]);
    }

    #[test]
    fn missing_type_column_is_schema_error() {
        let data = "key\tftype\np1\tintron\n";
        let err = PointReader::new(Cursor::new(data), "bad.csv").err().unwrap();
        assert!(matches!(err, ParseError::MissingTypeColumn { .. }));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn missing_key_column_is_schema_error() {
        let data = "qftype\nintron\n";
        let err = PointReader::new(Cursor::new(data), "nokey.csv").err().unwrap();
        match err {
            ParseError::MissingKeyColumn { column, .. } => assert_eq!(column, "qkey"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_and_empty_rows_report_line() {
        let data = "qkey\tqftype\np1\tintron\np2\n";
        let rdr = PointReader::new(Cursor::new(data), "short.csv").unwrap();
        let err = rdr.records().collect::<Result<Vec<_>, _>>().unwrap_err();
        match err {
            ParseError::MalformedRow { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }

        let data = "qkey\tqftype\np1\t\n";
        let rdr = PointReader::new(Cursor::new(data), "empty.csv").unwrap();
        let err = rdr.records().collect::<Result<Vec<_>, _>>().unwrap_err();
        assert!(err.to_string().contains("empty 'qftype' value"));
    }
}
