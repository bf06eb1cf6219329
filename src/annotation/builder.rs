use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};

use crate::annotation::io::{ParseError, PointReader, PointRecord};
use crate::types::DatasetKind;

/// A fully read point table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub kind: DatasetKind,
    /// Name of the input, used in diagnostics.
    pub source: String,
    pub records: Vec<PointRecord>,
}

/// Loads lifted/unlifted point tables into memory.
///
/// - plain or gzipped (`.gz`) input
/// - optional check that the table is the variant the caller expects
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    pub expected: Option<DatasetKind>,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject tables of the other variant.
    pub fn expect(mut self, kind: DatasetKind) -> Self {
        self.expected = Some(kind);
        self
    }

    /// Load from anything implementing `Read`.
    pub fn load_from_reader<R: Read>(
        &self,
        reader: R,
        source: &str,
    ) -> Result<Dataset, ParseError> {
        let rdr = PointReader::new(reader, source)?;
        let kind = rdr.kind();

        if let Some(expected) = self.expected {
            if expected != kind {
                return Err(ParseError::WrongKind {
                    input: source.to_string(),
                    expected,
                    found: kind,
                });
            }
        }
        debug!("{}: {} table", source, kind);

        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
        info!("{} points in {}: {}", kind, source, records.len());

        Ok(Dataset {
            kind,
            source: source.to_string(),
            records,
        })
    }

    /// Load from a file path.
    ///
    /// - If path ends with `.gz`, uses gzip decoder.
    /// - Otherwise reads as plain text.
    pub fn load_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Dataset, ParseError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| ParseError::IoPath {
            path: source.clone(),
            source: e,
        })?;

        let is_gz = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);

        if is_gz {
            let decoder = flate2::read::GzDecoder::new(file);
            self.load_from_reader(BufReader::new(decoder), &source)
        } else {
            self.load_from_reader(BufReader::new(file), &source)
        }
    }
}

// -------------------- tests --------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const UNLIFTED: &str = "\
ukey\tuftype\tugann_gene
hg38_chr1_1000+_1\tintergenic\t.
hg38_chr1_2000+_2\tintron\tGENE1
";

    #[test]
    fn loads_dataset_from_reader() {
        let ds = DatasetLoader::new()
            .load_from_reader(Cursor::new(UNLIFTED), "x_qu.csv")
            .unwrap();

        assert_eq!(ds.kind, DatasetKind::Unlifted);
        assert_eq!(ds.source, "x_qu.csv");
        assert_eq!(ds.records.len(), 2);
        assert_eq!(ds.records[0].feature_type, "intergenic");
    }

    #[test]
    fn rejects_unexpected_variant() {
        let err = DatasetLoader::new()
            .expect(DatasetKind::Lifted)
            .load_from_reader(Cursor::new(UNLIFTED), "x_qu.csv")
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("x_qu.csv"));
        assert!(msg.contains("expected a lifted point table"));
    }

    #[test]
    fn loads_gzipped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample_qu.csv.gz");

        let file = std::fs::File::create(&path).unwrap();
        let mut gz = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        gz.write_all(UNLIFTED.as_bytes()).unwrap();
        gz.finish().unwrap();

        let ds = DatasetLoader::new().load_from_path(&path).unwrap();
        assert_eq!(ds.kind, DatasetKind::Unlifted);
        assert_eq!(ds.records.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DatasetLoader::new()
            .load_from_path("/definitely/not/here_qt.csv")
            .unwrap_err();
        assert!(matches!(err, ParseError::IoPath { .. }));
    }
}
