//! CSV loading and report rendering for the concord pipeline.

mod domain;
mod error;
mod json;
mod mapping;
mod reader;
mod render;
mod timestamp;

pub use domain::LoadedSource;
pub use error::IoError;
pub use json::{ComparisonDocument, JsonSink, PairRecord, pair_records};
pub use mapping::ColumnMapping;
pub use reader::SourceReader;
pub use render::{TableSink, render_table};
pub use timestamp::parse_timestamp;
