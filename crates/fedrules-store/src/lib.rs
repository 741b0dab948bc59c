//! Storage layer: JSON files of scraped rule-detail records.

mod error;
pub use error::StoreError;

mod json;
pub use json::{JsonWriter, RecordSink, ensure_dir, output_path, to_json};
