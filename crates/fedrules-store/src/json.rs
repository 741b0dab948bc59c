//! JSON writer for rule-detail records.
//!
//! Records are written as one pretty-printed (2-space) UTF-8 JSON array per
//! file. The file is first written to a temp file in the target directory and
//! then renamed over `<dir>/<filename>.json`, so readers never see a partial
//! file.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fedrules_core::RuleDetailRecord;
use serde::Serialize;
use tracing::info;

use crate::StoreError;

const JSON_EXT: &str = "json";

/// Destination for scraped records.
pub trait RecordSink {
    /// Persist `records` under `directory` using `filename` as the base name.
    /// Returns the path written.
    fn persist(
        &self,
        records: &[RuleDetailRecord],
        directory: &Path,
        filename: &str,
    ) -> Result<PathBuf, StoreError>;
}

/// [`RecordSink`] writing a JSON array file via [`to_json`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonWriter;

impl RecordSink for JsonWriter {
    fn persist(
        &self,
        records: &[RuleDetailRecord],
        directory: &Path,
        filename: &str,
    ) -> Result<PathBuf, StoreError> {
        to_json(records, directory, filename)
    }
}

/// Create `dir` and any missing parents. Existing directories are fine.
pub fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Path of the JSON file for `filename` under `directory`.
///
/// `.json` is appended unless `filename` already ends with it. Filenames that
/// are empty or contain a path separator are rejected.
pub fn output_path(directory: &Path, filename: &str) -> Result<PathBuf, StoreError> {
    let name = filename.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(StoreError::InvalidFilename(filename.to_string()));
    }
    let has_ext = Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(JSON_EXT));
    let file = if has_ext {
        name.to_string()
    } else {
        format!("{name}.{JSON_EXT}")
    };
    Ok(directory.join(file))
}

/// Write `records` as a JSON array to `<directory>/<filename>.json`.
///
/// Creates `directory` if absent and replaces any existing file.
pub fn to_json<T: Serialize>(
    records: &[T],
    directory: &Path,
    filename: &str,
) -> Result<PathBuf, StoreError> {
    let path = output_path(directory, filename)?;
    ensure_dir(directory)?;

    let tmp = tempfile::NamedTempFile::new_in(directory)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&path)?;

    info!(path = %path.display(), count = records.len(), "wrote records");
    Ok(path)
}
