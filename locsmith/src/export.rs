//! Export writer: serializes the key→text table to two parallel files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{assign::ExportTable, backup::backup_tree, error::Error, table::DELIMITER};

/// File holding one value per line.
pub const TEXTS_FILE: &str = "texts.txt";

/// File holding one key per line, row-aligned with [`TEXTS_FILE`].
pub const KEYS_FILE: &str = "keys.txt";

/// Paths of the two files produced by one export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPaths {
    pub texts: PathBuf,
    pub keys: PathBuf,
}

/// Writes the export table under `dest_dir` as two line-aligned UTF-8
/// files: values (with the field delimiter replaced by a comma, so a later
/// table split cannot misread them) and keys, in the same row order.
///
/// A `dest_dir` left over from a prior run is backed up before being
/// reused.
pub fn write_export(table: &ExportTable, dest_dir: &Path) -> Result<ExportPaths, Error> {
    if dest_dir.exists() {
        backup_tree(dest_dir, dest_dir)?;
    }
    fs::create_dir_all(dest_dir)?;

    let mut texts = String::new();
    let mut keys = String::new();
    for entry in table.entries() {
        texts.push_str(&entry.value.replace(DELIMITER, ","));
        texts.push('\n');
        keys.push_str(&entry.key);
        keys.push('\n');
    }

    let paths = ExportPaths {
        texts: dest_dir.join(TEXTS_FILE),
        keys: dest_dir.join(KEYS_FILE),
    };
    fs::write(&paths.texts, texts)?;
    fs::write(&paths.keys, keys)?;
    Ok(paths)
}
