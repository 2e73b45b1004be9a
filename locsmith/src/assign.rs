//! Key assignment: derives stable synthetic keys for the localizable
//! strings of a set of event records.

use std::{collections::HashMap, fs::File, path::Path};

use serde::{Deserialize, Serialize};

use crate::{error::Error, events::EventRecord, key_index::ExistingKeySet};

/// One key/value pair of the export table. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextKeyEntry {
    pub key: String,
    pub value: String,
}

/// The ordered key→text table produced by one externalization run.
///
/// Keys are unique within the table as stored; lookups used for collision
/// handling against the pre-existing corpus are case-insensitive on the
/// corpus side. The table is an explicit value passed between pipeline
/// stages, never ambient state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportTable {
    entries: Vec<TextKeyEntry>,
    #[serde(skip)]
    by_key: HashMap<String, usize>,
    #[serde(skip)]
    by_value: HashMap<String, usize>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[TextKeyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(|&i| self.entries[i].value.as_str())
    }

    /// The key an already-inserted `value` was assigned, if any.
    pub fn key_for_value(&self, value: &str) -> Option<&str> {
        self.by_value.get(value).map(|&i| self.entries[i].key.as_str())
    }

    fn push(&mut self, key: String, value: String) {
        let index = self.entries.len();
        self.by_key.insert(key.clone(), index);
        self.by_value.insert(value.clone(), index);
        self.entries.push(TextKeyEntry { key, value });
    }

    /// Serializes the table to a JSON file.
    pub fn cache_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = File::create(path)?;
        serde_json::to_writer(&mut writer, self).map_err(Error::Parse)
    }

    /// Loads a table from a JSON cache file, rebuilding the lookup maps.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let reader = File::open(path)?;
        let raw: ExportTable = serde_json::from_reader(reader).map_err(Error::Parse)?;
        let mut table = ExportTable::new();
        for entry in raw.entries {
            table.push(entry.key, entry.value);
        }
        Ok(table)
    }
}

/// Derives keys for every not-yet-externalized string in `records`.
///
/// Per record: `EVT_<id>_NAME` and `EVT_<id>_DESC` for the event name and
/// description, `ACTIONNAME<id><letter>` (letter = `'A' +` position) for
/// each named action. A string whose lower-cased form is already in the
/// existing-key index is itself a key and is left alone. Insertion order
/// follows record order, so the result is deterministic for a given input
/// order.
pub fn assign_keys(index: &ExistingKeySet, records: &[EventRecord]) -> ExportTable {
    let mut table = ExportTable::new();

    for record in records {
        if let Some(name) = non_empty(record.name.as_deref())
            && !index.contains(name)
        {
            propose(&mut table, index, format!("EVT_{}_NAME", record.id), name);
        }
        if let Some(desc) = non_empty(record.desc.as_deref())
            && !index.contains(desc)
        {
            propose(&mut table, index, format!("EVT_{}_DESC", record.id), desc);
        }
        for (position, action) in record.actions.iter().enumerate() {
            if action.name.is_empty() || index.contains(&action.name) {
                continue;
            }
            let letter = (b'A' + position as u8) as char;
            propose(
                &mut table,
                index,
                format!("ACTIONNAME{}{}", record.id, letter),
                &action.name,
            );
        }
    }
    table
}

/// Applies the insertion rule for one proposed (key, value) pair.
///
/// A value already in the table is never added twice; a key conflict (with
/// the table or the existing corpus) is resolved by appending `_1`, `_2`,
/// ... until an unused key is found.
fn propose(table: &mut ExportTable, index: &ExistingKeySet, key: String, value: &str) {
    if table.key_for_value(value).is_some() {
        return;
    }
    if table.get(&key).is_none() && !index.contains(&key) {
        table.push(key, value.to_string());
        return;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}_{}", key, n);
        if table.get(&candidate).is_none() && !index.contains(&candidate) {
            table.push(candidate, value.to_string());
            return;
        }
        n += 1;
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}
