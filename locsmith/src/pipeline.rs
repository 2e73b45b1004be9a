//! The externalization pipeline: index, assign, back up, patch, export.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    assign::{ExportTable, assign_keys},
    backup::backup_tree,
    error::Error,
    events::scan_events,
    export::{ExportPaths, write_export},
    key_index::ExistingKeySet,
    options::ExternalizeOptions,
    patch::{PatchSummary, patch_tree},
};

/// Everything one externalization run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalizeReport {
    /// Keys already published before this run.
    pub existing_keys: usize,
    /// Event records scanned from the script tree.
    pub records: usize,
    /// The key→text table assigned by this run.
    pub table: ExportTable,
    /// Backup directory, when one was taken.
    pub backup: Option<PathBuf>,
    pub patch: PatchSummary,
    pub export: ExportPaths,
}

impl ExternalizeReport {
    /// Serializes the report to a JSON file.
    pub fn cache_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = File::create(path)?;
        serde_json::to_writer_pretty(&mut writer, self).map_err(Error::Parse)
    }
}

/// Runs the full externalization pipeline described by `options`.
///
/// Stages run strictly in order: the existing-key index is rebuilt, event
/// records are scanned, keys are assigned, the event tree is optionally
/// backed up, the tree is patched, and the export table is written. Any
/// failure aborts the run at that stage.
pub fn externalize(options: &ExternalizeOptions) -> Result<ExternalizeReport, Error> {
    let index = ExistingKeySet::scan(&options.table_dirs, &options.exclusions)?;
    let records = scan_events(&options.events_root, options.code_page)?;
    let table = assign_keys(&index, &records);

    let backup = if options.backup {
        let base = options.backup_base.as_deref().unwrap_or(&options.events_root);
        Some(backup_tree(&options.events_root, base)?)
    } else {
        None
    };

    let patch = patch_tree(&options.events_root, &table, options.code_page)?;
    let export = write_export(&table, &options.export_dir)?;

    Ok(ExternalizeReport {
        existing_keys: index.len(),
        records: records.len(),
        table,
        backup,
        patch,
        export,
    })
}
