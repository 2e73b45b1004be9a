//! Index of keys already published in prior localization tables.
//!
//! Rebuilt from scratch on every externalization run and read-only
//! afterwards; used to avoid re-externalizing strings that are already
//! keyed and to keep new keys globally unique.

use std::{collections::HashSet, fs::File, path::Path};

use crate::error::Error;

/// Extension of a qualifying table file.
const TABLE_EXTENSION: &str = "csv";

/// A case-insensitive set of already-assigned keys.
#[derive(Debug, Clone, Default)]
pub struct ExistingKeySet {
    keys: HashSet<String>,
}

impl ExistingKeySet {
    /// Creates an empty key set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the set from every qualifying table file in `dirs`.
    ///
    /// A file qualifies when it has the table extension and its name is not
    /// on the exclusion list (compared case-insensitively). The header row
    /// of each table is skipped; the first column of every following row is
    /// lower-cased and inserted. Empty and header-only files contribute
    /// nothing.
    pub fn scan<P: AsRef<Path>>(dirs: &[P], exclusions: &[String]) -> Result<Self, Error> {
        let mut set = ExistingKeySet::new();
        for dir in dirs {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                return Err(Error::missing_input(dir));
            }
            let mut entries: Vec<_> =
                std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
            entries.sort_by_key(|e| e.file_name());

            for entry in entries {
                let path = entry.path();
                if !path.is_file() || !qualifies(&path, exclusions) {
                    continue;
                }
                set.scan_file(&path)?;
            }
        }
        Ok(set)
    }

    fn scan_file(&mut self, path: &Path) -> Result<(), Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .comment(Some(b'#'))
            .from_reader(File::open(path)?);

        for record in reader.byte_records() {
            let record = record?;
            let Some(field) = record.get(0) else { continue };
            let key = String::from_utf8_lossy(field).trim().to_lowercase();
            if !key.is_empty() {
                self.keys.insert(key);
            }
        }
        Ok(())
    }

    /// Inserts a key, lower-cased. Returns `false` if it was already present.
    pub fn insert(&mut self, key: &str) -> bool {
        self.keys.insert(key.to_lowercase())
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn qualifies(path: &Path, exclusions: &[String]) -> bool {
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TABLE_EXTENSION));
    if !has_extension {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !exclusions.iter().any(|e| e.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_skips_header_and_lowercases_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("text.csv"),
            "KEY;ENG;FRA;;;;;;;;;X\nEVT_1_NAME;Hello;Bonjour;;;;;;;;;X\nACTIONNAME1A;OK;OK;;;;;;;;;X\n",
        )
        .unwrap();

        let set = ExistingKeySet::scan(&[dir.path()], &[]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("evt_1_name"));
        assert!(set.contains("EVT_1_NAME"));
        assert!(set.contains("ActionName1A"));
        // The header row's first column is not a key.
        assert!(!set.contains("KEY"));
    }

    #[test]
    fn test_scan_ignores_non_tables_and_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "EVT_9_NAME;x\n").unwrap();
        fs::write(
            dir.path().join("skipme.csv"),
            "KEY;ENG\nEVT_8_NAME;x\n",
        )
        .unwrap();
        fs::write(dir.path().join("text.csv"), "KEY;ENG\nEVT_7_NAME;x\n").unwrap();

        let set =
            ExistingKeySet::scan(&[dir.path()], &["SKIPME.CSV".to_string()]).unwrap();
        assert!(set.contains("EVT_7_NAME"));
        assert!(!set.contains("EVT_8_NAME"));
        assert!(!set.contains("EVT_9_NAME"));
    }

    #[test]
    fn test_scan_tolerates_empty_and_header_only_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.csv"), "").unwrap();
        fs::write(dir.path().join("header_only.csv"), "KEY;ENG;FRA\n").unwrap();

        let set = ExistingKeySet::scan(&[dir.path()], &[]).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_scan_tolerates_legacy_encoded_values() {
        let dir = tempfile::tempdir().unwrap();
        // Keys are ASCII; the value columns carry windows-1252 bytes.
        fs::write(
            dir.path().join("text.csv"),
            b"KEY;FRA\nEVT_2_DESC;caf\xe9 cr\xe8me\n",
        )
        .unwrap();

        let set = ExistingKeySet::scan(&[dir.path()], &[]).unwrap();
        assert!(set.contains("EVT_2_DESC"));
    }

    #[test]
    fn test_scan_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = ExistingKeySet::scan(&[missing], &[]).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }

    #[test]
    fn test_insert_and_contains_are_case_insensitive() {
        let mut set = ExistingKeySet::new();
        assert!(set.insert("EVT_1_NAME"));
        assert!(!set.insert("evt_1_name"));
        assert!(set.contains("Evt_1_Name"));
    }
}
