#![forbid(unsafe_code)]
//! Localization externalization and table round-trip toolkit.
//!
//! Splits and merges multi-language delimited tables column by column, and
//! externalizes the literal text of event script trees: stable synthetic
//! keys are assigned to every not-yet-keyed string, the source files are
//! rewritten to reference those keys, and a key→text export table is
//! emitted for translation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use locsmith::{ColumnSpec, ExternalizeOptions, externalize, split_columns};
//! use std::path::Path;
//!
//! // Split a published table into per-language column files.
//! let mut specs = vec![ColumnSpec::id()];
//! specs.extend(ColumnSpec::standard_set());
//! split_columns(Path::new("config/text.csv"), Path::new("work"), &specs)?;
//!
//! // Externalize the literal text of an event tree.
//! let options = ExternalizeOptions::new("db/events", "db/export")
//!     .with_table_dir("config");
//! let report = externalize(&options)?;
//! println!("assigned {} keys", report.table.len());
//! # Ok::<(), locsmith::Error>(())
//! ```
//!
//! All file mutation is sequential and non-transactional; the backup
//! manager, not rollback, is the recovery path, which is why the pipeline
//! snapshots the event tree before patching by default.

pub mod assign;
pub mod backup;
pub mod encoding;
pub mod error;
pub mod events;
pub mod export;
pub mod key_index;
pub mod merge;
pub mod options;
pub mod patch;
pub mod pipeline;
pub mod split;
pub mod table;

// Re-export most used types for easy consumption
pub use crate::{
    assign::{ExportTable, TextKeyEntry, assign_keys},
    backup::backup_tree,
    encoding::CodePage,
    error::Error,
    events::{EventAction, EventRecord, scan_events},
    export::{ExportPaths, write_export},
    key_index::ExistingKeySet,
    merge::merge_columns,
    options::ExternalizeOptions,
    patch::{PatchSummary, patch_tree},
    pipeline::{ExternalizeReport, externalize},
    split::split_columns,
    table::{ColumnSpec, Language},
};
