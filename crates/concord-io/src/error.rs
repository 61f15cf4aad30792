//! Error types for loading sources and writing reports.

use std::path::PathBuf;

/// Errors from CSV loading, column mapping, and report rendering.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The source file could not be opened.
    #[error("cannot open {path}")]
    FileNotFound {
        /// Source path as given.
        path: PathBuf,
        /// Error from the OS.
        source: std::io::Error,
    },

    /// A record could not be parsed as CSV (bad quoting, wrong field count).
    #[error("malformed CSV in {path} near byte {offset}")]
    CsvParse {
        /// Source path.
        path: PathBuf,
        /// Byte position reported by the parser, 0 if unknown.
        offset: u64,
        /// Parser error.
        source: csv::Error,
    },

    /// The header was present but no sample rows followed it.
    #[error("{path} has a header but no samples")]
    EmptyDataset {
        /// Source path.
        path: PathBuf,
    },

    /// A column named by the [`ColumnMapping`](crate::ColumnMapping) is not in the header.
    #[error("column \"{column}\" not found in header of {path}")]
    MissingColumn {
        /// Source path.
        path: PathBuf,
        /// Mapped column name, matched case-sensitively.
        column: String,
    },

    /// A coordinate or range cell is empty, unparseable, NaN, or infinite.
    #[error("{path}: sample {row_index}, column \"{column}\": \"{raw}\" is not a finite number")]
    NonFiniteValue {
        /// Source path.
        path: PathBuf,
        /// Zero-based sample row, header excluded.
        row_index: usize,
        /// Mapped column name.
        column: String,
        /// Cell contents.
        raw: String,
    },

    /// A timestamp cell is neither numeric seconds nor a recognized date-time.
    #[error("{path}: sample {row_index}, column \"{column}\": \"{raw}\" is not a timestamp")]
    InvalidTimestamp {
        /// Source path.
        path: PathBuf,
        /// Zero-based sample row, header excluded.
        row_index: usize,
        /// Mapped column name.
        column: String,
        /// Cell contents.
        raw: String,
    },

    /// A column mapping string has the wrong number of names or an empty name.
    #[error("invalid column mapping \"{mapping}\": {reason}")]
    InvalidColumnMapping {
        /// Mapping string as given.
        mapping: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Writing a rendered report failed.
    #[error("failed to write report")]
    Render {
        /// Error from the writer.
        source: std::io::Error,
    },
}
