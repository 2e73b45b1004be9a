//! All error types for the locsmith crate.
//!
//! These are returned from all fallible operations (table splitting, merging,
//! key scanning, patching, export).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing input: {0}")]
    MissingInput(String),

    #[error(
        "format mismatch in {}, line {line}: expected {expected} columns, found {found}",
        .path.display()
    )]
    FormatMismatch {
        path: PathBuf,
        /// 1-based line number of the offending row.
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "row count mismatch: {} has {found} rows, but the id file has {expected}",
        .path.display()
    )]
    RowCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("unsupported table: {} uses the legacy 16-column layout", .path.display())]
    UnsupportedTable { path: PathBuf },

    #[error("unknown code page `{0}`")]
    UnknownCodePage(String),

    #[error("cannot encode {text:?} as {code_page}")]
    Encoding { code_page: String, text: String },

    #[error("unknown language `{0}`")]
    UnknownLanguage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Error {
    /// Creates a missing-input error for a path that was expected to exist.
    pub fn missing_input(path: impl AsRef<std::path::Path>) -> Self {
        Error::MissingInput(path.as_ref().display().to_string())
    }
}
