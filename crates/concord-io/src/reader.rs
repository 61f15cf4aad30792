//! CSV position-series reader with full input validation.

use std::path::{Path, PathBuf};

use concord_align::{Sample, Series};
use tracing::{debug, info, instrument, warn};

use crate::domain::LoadedSource;
use crate::mapping::ColumnMapping;
use crate::timestamp::parse_timestamp;
use crate::IoError;

/// Reads one source's position samples from a CSV file.
///
/// Expected CSV format:
/// - Header row required; columns are located by the names in the [`ColumnMapping`]
/// - Extra columns are ignored, column order does not matter
/// - One sample per row
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record (including rows of the wrong length) |
/// | [`IoError::MissingColumn`] | A mapped column is not in the header |
/// | [`IoError::InvalidTimestamp`] | Timestamp cell is not numeric seconds or a date-time |
/// | [`IoError::NonFiniteValue`] | Coordinate or range cell is NaN, Inf, empty, or unparseable |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
pub struct SourceReader {
    path: PathBuf,
    mapping: ColumnMapping,
}

/// Header positions of the mapped columns.
struct ColumnIndices {
    time: usize,
    axes: [usize; 3],
    ranges: Option<[usize; 3]>,
}

impl SourceReader {
    /// Create a new reader for the given CSV file path and column mapping.
    pub fn new(path: &Path, mapping: ColumnMapping) -> Self {
        Self {
            path: path.to_path_buf(),
            mapping,
        }
    }

    /// Read and validate the CSV file, returning a [`LoadedSource`].
    #[instrument(skip(self), fields(path = %self.path.display(), mapping = %self.mapping))]
    pub fn read(&self) -> Result<LoadedSource, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let columns = self.resolve_columns(&header)?;
        debug!(n_columns = header.len(), "read CSV header");

        let mut samples = Vec::new();
        let mut ranges = columns.ranges.map(|_| Vec::new());

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            let raw_time = record.get(columns.time).unwrap_or("");
            let timestamp = parse_timestamp(raw_time).ok_or_else(|| IoError::InvalidTimestamp {
                path: self.path.clone(),
                row_index,
                column: self.mapping.time.clone(),
                raw: raw_time.to_string(),
            })?;

            let [x, y, z] = self.parse_triple(&record, row_index, columns.axes, self.mapping.axes())?;
            samples.push(Sample::new(timestamp, x, y, z));

            if let (Some(cols), Some(names), Some(out)) = (columns.ranges, &self.mapping.ranges, ranges.as_mut()) {
                let names = [names[0].as_str(), names[1].as_str(), names[2].as_str()];
                out.push(self.parse_triple(&record, row_index, cols, names)?);
            }
        }

        if samples.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let series = Series::new(samples);
        if let Some(index) = series.first_unsorted_index() {
            warn!(first_unsorted_row = index, "timestamps are not ascending; alignment will sort");
        }

        info!(
            n_samples = series.len(),
            has_ranges = ranges.is_some(),
            "source loaded"
        );

        Ok(LoadedSource { series, ranges })
    }

    fn resolve_columns(&self, header: &csv::StringRecord) -> Result<ColumnIndices, IoError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| IoError::MissingColumn {
                    path: self.path.clone(),
                    column: name.to_string(),
                })
        };

        let time = find(&self.mapping.time)?;
        let [x, y, z] = self.mapping.axes();
        let axes = [find(x)?, find(y)?, find(z)?];
        let ranges = match &self.mapping.ranges {
            Some([rx, ry, rz]) => Some([find(rx)?, find(ry)?, find(rz)?]),
            None => None,
        };
        Ok(ColumnIndices { time, axes, ranges })
    }

    fn parse_triple(
        &self,
        record: &csv::StringRecord,
        row_index: usize,
        cols: [usize; 3],
        names: [&str; 3],
    ) -> Result<[f64; 3], IoError> {
        let mut out = [0.0; 3];
        for ((value, col), name) in out.iter_mut().zip(cols).zip(names) {
            let raw = record.get(col).unwrap_or("");
            *value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| IoError::NonFiniteValue {
                    path: self.path.clone(),
                    row_index,
                    column: name.to_string(),
                    raw: raw.to_string(),
                })?;
        }
        Ok(out)
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_uppercase_columns() {
        let csv = "Time,X,Y,Z\n0.0,1.0,2.0,3.0\n0.5,1.5,2.5,3.5\n";
        let f = write_csv(csv);
        let src = SourceReader::new(f.path(), ColumnMapping::uppercase()).read().unwrap();
        assert_eq!(src.n_samples(), 2);
        let s = src.series.as_slice()[1];
        assert_eq!(s.timestamp.as_nanos(), 500_000_000);
        assert_eq!((s.x, s.y, s.z), (1.5, 2.5, 3.5));
        assert!(src.ranges().is_none());
    }

    #[test]
    fn read_lowercase_columns_in_any_order() {
        let csv = "z,extra,x,Time,y\n3.0,ignored,1.0,2021-06-01 12:00:00,2.0\n";
        let f = write_csv(csv);
        let src = SourceReader::new(f.path(), ColumnMapping::lowercase()).read().unwrap();
        let s = src.series.as_slice()[0];
        assert_eq!((s.x, s.y, s.z), (1.0, 2.0, 3.0));
    }

    #[test]
    fn read_range_columns() {
        let csv = "Time,X,Y,Z,Xrange,Yrange,Zrange\n0,0,0,0,0.1,0.2,0.3\n1,0,0,0,0.3,0.4,0.5\n";
        let f = write_csv(csv);
        let mapping = ColumnMapping::uppercase().with_ranges("Xrange", "Yrange", "Zrange");
        let src = SourceReader::new(f.path(), mapping).read().unwrap();
        assert_eq!(src.ranges().unwrap(), &[[0.1, 0.2, 0.3], [0.3, 0.4, 0.5]]);
    }

    #[test]
    fn case_mismatch_is_missing_column() {
        let csv = "Time,x,y,z\n0,1,2,3\n";
        let f = write_csv(csv);
        let err = SourceReader::new(f.path(), ColumnMapping::uppercase()).read().unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref column, .. } if column == "X"));
    }

    #[test]
    fn missing_range_column() {
        let csv = "Time,X,Y,Z,Xrange\n0,1,2,3,0.1\n";
        let f = write_csv(csv);
        let mapping = ColumnMapping::uppercase().with_ranges("Xrange", "Yrange", "Zrange");
        let err = SourceReader::new(f.path(), mapping).read().unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref column, .. } if column == "Yrange"));
    }

    #[test]
    fn error_file_not_found() {
        let result = SourceReader::new(Path::new("/nonexistent/file.csv"), ColumnMapping::uppercase()).read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let f = write_csv("Time,X,Y,Z\n");
        let result = SourceReader::new(f.path(), ColumnMapping::uppercase()).read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_missing_coordinate_is_not_filled() {
        let f = write_csv("Time,X,Y,Z\n0,1.0,,3.0\n");
        let result = SourceReader::new(f.path(), ColumnMapping::uppercase()).read();
        assert!(matches!(
            result,
            Err(IoError::NonFiniteValue { row_index: 0, ref column, .. }) if column == "Y"
        ));
    }

    #[test]
    fn error_non_finite_nan() {
        let f = write_csv("Time,X,Y,Z\n0,1.0,2.0,NaN\n");
        let result = SourceReader::new(f.path(), ColumnMapping::uppercase()).read();
        assert!(matches!(result, Err(IoError::NonFiniteValue { .. })));
    }

    #[test]
    fn error_invalid_timestamp() {
        let f = write_csv("Time,X,Y,Z\n0,1,2,3\nlater,1,2,3\n");
        let result = SourceReader::new(f.path(), ColumnMapping::uppercase()).read();
        assert!(matches!(result, Err(IoError::InvalidTimestamp { row_index: 1, .. })));
    }

    #[test]
    fn error_inconsistent_row_length() {
        let f = write_csv("Time,X,Y,Z\n0,1,2,3\n1,2,3\n");
        let result = SourceReader::new(f.path(), ColumnMapping::uppercase()).read();
        assert!(matches!(result, Err(IoError::CsvParse { .. })));
    }

    #[test]
    fn unsorted_rows_are_kept_in_file_order() {
        let f = write_csv("Time,X,Y,Z\n2,0,0,0\n1,0,0,0\n");
        let src = SourceReader::new(f.path(), ColumnMapping::uppercase()).read().unwrap();
        assert_eq!(src.series.first_unsorted_index(), Some(1));
    }
}
