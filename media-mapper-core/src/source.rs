//! Comparison file reader.
//!
//! The comparison CSV lists candidate company matches. Only three columns
//! are used; any others are ignored.

use std::fs::File;
use std::path::Path;

use crate::error::CatalogError;

pub const COMPANY_ID_COLUMN: &str = "tmdbID";
pub const COMPANY_NAME_COLUMN: &str = "tmdbName";
pub const SCORE_COLUMN: &str = "result1Score";

/// One candidate company from the comparison file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub company_id: String,
    pub company_name: String,
    /// Match confidence in `[0, 1]`.
    pub score: f64,
}

/// Single-pass iterator over comparison rows.
pub struct SourceReader {
    records: csv::StringRecordsIntoIter<File>,
    id_idx: usize,
    name_idx: usize,
    score_idx: usize,
    row: u64,
}

impl SourceReader {
    /// Open a comparison file and locate its required columns.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);
        let headers = reader.headers()?.clone();

        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CatalogError::missing_column(name))
        };

        Ok(Self {
            id_idx: find(COMPANY_ID_COLUMN)?,
            name_idx: find(COMPANY_NAME_COLUMN)?,
            score_idx: find(SCORE_COLUMN)?,
            records: reader.into_records(),
            row: 0,
        })
    }

    fn parse(&self, record: &csv::StringRecord) -> Result<SourceRow, CatalogError> {
        let get = |i: usize| record.get(i).unwrap_or("");
        let score_text = get(self.score_idx);
        let score = score_text
            .trim()
            .parse::<f64>()
            .map_err(|_| CatalogError::InvalidScore {
                row: self.row,
                value: score_text.to_string(),
            })?;

        Ok(SourceRow {
            company_id: get(self.id_idx).to_string(),
            company_name: get(self.name_idx).to_string(),
            score,
        })
    }
}

impl Iterator for SourceReader {
    type Item = Result<SourceRow, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.row += 1;
        Some(record.map_err(CatalogError::from).and_then(|r| self.parse(&r)))
    }
}

/// Count data rows (header excluded) in a comparison file.
pub fn count_rows(path: &Path) -> Result<usize, CatalogError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(file);
    let mut count = 0usize;
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("compare.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reads_required_columns_in_any_order() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            "result1Score,wikidataID,tmdbName,tmdbID\n0.9,Q1,Acme,42\n0.5,Q2,Other,43\n",
        );

        let rows: Vec<SourceRow> = SourceReader::open(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].company_id, "42");
        assert_eq!(rows[0].company_name, "Acme");
        assert_eq!(rows[0].score, 0.9);
        assert_eq!(rows[1].score, 0.5);
    }

    #[test]
    fn test_missing_column_fails_on_open() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "tmdbID,tmdbName\n42,Acme\n");

        let err = SourceReader::open(&path).err().unwrap();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "result1Score"));
    }

    #[test]
    fn test_bad_score_reports_row() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "tmdbID,tmdbName,result1Score\n1,A,0.8\n2,B,\n");

        let mut reader = SourceReader::open(&path).unwrap();
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, CatalogError::InvalidScore { row: 2, .. }));
    }

    #[test]
    fn test_short_row_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "tmdbID,tmdbName,result1Score\n1,A\n");

        let mut reader = SourceReader::open(&path).unwrap();
        assert!(matches!(reader.next(), Some(Err(CatalogError::Csv(_)))));
    }

    #[test]
    fn test_count_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "tmdbID,tmdbName,result1Score\n1,A,0.8\n2,B,0.9\n3,C,0.1\n");
        assert_eq!(count_rows(&path).unwrap(), 3);
    }

    #[test]
    fn test_count_rows_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "tmdbID,tmdbName,result1Score\n");
        assert_eq!(count_rows(&path).unwrap(), 0);
    }

    #[test]
    fn test_count_rows_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "");
        assert_eq!(count_rows(&path).unwrap(), 0);
    }
}
