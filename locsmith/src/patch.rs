//! File patcher: rewrites event source files, substituting assigned keys
//! for literal quoted text.

use std::{fs, path::Path};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::{assign::ExportTable, encoding::CodePage, error::Error, table::strip_comment};

lazy_static! {
    // A line is patch-eligible when, after comment and whitespace
    // stripping, it contains a name or desc field assignment.
    static ref ELIGIBLE: Regex = Regex::new(r"(?i)(name|desc)\s*=").expect("valid field regex");
}

/// Counters reported after a patch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSummary {
    pub files_visited: usize,
    pub files_changed: usize,
    pub lines_changed: usize,
}

/// Rewrites every file under `root`, replacing each table entry's quoted
/// value with its bare key on eligible lines.
///
/// The replacement is a plain substring replace applied across the whole
/// table in insertion order; a value that happens to appear inside another
/// field's literal on an eligible line is replaced too. That ambiguity is
/// inherited from the table-driven design and is accepted rather than
/// disambiguated here. Every visited file is fully rewritten in
/// `code_page`, whether or not any line changed. Patching is not
/// transactional across files: an interrupted pass leaves already-visited
/// files rewritten, which is why callers take a backup first.
pub fn patch_tree(
    root: &Path,
    table: &ExportTable,
    code_page: CodePage,
) -> Result<PatchSummary, Error> {
    if !root.is_dir() {
        return Err(Error::missing_input(root));
    }

    let mut summary = PatchSummary::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        patch_file(entry.path(), table, code_page, &mut summary)?;
    }
    Ok(summary)
}

fn patch_file(
    path: &Path,
    table: &ExportTable,
    code_page: CodePage,
    summary: &mut PatchSummary,
) -> Result<(), Error> {
    let text = code_page.read_to_string(path)?;
    let had_trailing_newline = text.ends_with('\n');

    let mut changed_lines = 0;
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            let patched = patch_line(line, table);
            if patched != line {
                changed_lines += 1;
            }
            patched
        })
        .collect();

    let mut rewritten = lines.join("\n");
    if had_trailing_newline {
        rewritten.push('\n');
    }

    fs::write(path, code_page.encode(&rewritten)?)?;

    summary.files_visited += 1;
    summary.lines_changed += changed_lines;
    if changed_lines > 0 {
        summary.files_changed += 1;
    }
    Ok(())
}

fn patch_line(line: &str, table: &ExportTable) -> String {
    let stripped = strip_comment(line).trim();
    if !ELIGIBLE.is_match(stripped) {
        return line.to_string();
    }

    let mut patched = line.to_string();
    for entry in table.entries() {
        let needle = format!("\"{}\"", entry.value);
        if patched.contains(&needle) {
            patched = patched.replace(&needle, &entry.key);
        }
    }
    patched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{events::EventRecord, key_index::ExistingKeySet};
    use indoc::indoc;
    use std::fs;
    use std::path::PathBuf;

    fn table_for(pairs: &[(&str, &str)]) -> ExportTable {
        // Build a table through the assigner to keep insertion semantics.
        let index = ExistingKeySet::new();
        let records: Vec<EventRecord> = pairs
            .iter()
            .enumerate()
            .map(|(i, (_, value))| EventRecord {
                id: i as u32 + 1,
                country: None,
                name: Some(value.to_string()),
                desc: None,
                actions: Vec::new(),
                source_path: PathBuf::from("x"),
                raw_block: String::new(),
            })
            .collect();
        let table = crate::assign::assign_keys(&index, &records);
        for ((key, _), entry) in pairs.iter().zip(table.entries()) {
            assert_eq!(*key, entry.key);
        }
        table
    }

    #[test]
    fn test_patch_replaces_quoted_value_with_bare_key() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("events.txt"),
            indoc! {r#"
                event = {
                    id = 1
                    name = "Hello there"
                    picture = "Hello there"
                }
            "#},
        )
        .unwrap();

        let table = table_for(&[("EVT_1_NAME", "Hello there")]);
        let summary = patch_tree(dir.path(), &table, CodePage::windows_1252()).unwrap();

        let patched = fs::read_to_string(dir.path().join("events.txt")).unwrap();
        assert!(patched.contains("name = EVT_1_NAME"));
        // The picture line contains no name=/desc= field, so it is untouched.
        assert!(patched.contains("picture = \"Hello there\""));
        assert_eq!(summary.files_visited, 1);
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.lines_changed, 1);
    }

    #[test]
    fn test_patch_handles_desc_and_action_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("events.txt"),
            indoc! {r#"
                event = {
                    id = 2
                    desc = "Long description"
                    action_a = { name = "Press on" }
                }
            "#},
        )
        .unwrap();

        let table = table_for(&[("EVT_1_NAME", "Long description"), ("EVT_2_NAME", "Press on")]);
        patch_tree(dir.path(), &table, CodePage::windows_1252()).unwrap();

        let patched = fs::read_to_string(dir.path().join("events.txt")).unwrap();
        assert!(patched.contains("desc = EVT_1_NAME"));
        assert!(patched.contains("name = EVT_2_NAME"));
    }

    #[test]
    fn test_patch_eligibility_ignores_comments() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("events.txt"),
            "# name = \"In a comment\"\ntrigger = \"In a comment\"\n",
        )
        .unwrap();

        let table = table_for(&[("EVT_1_NAME", "In a comment")]);
        let summary = patch_tree(dir.path(), &table, CodePage::windows_1252()).unwrap();

        let patched = fs::read_to_string(dir.path().join("events.txt")).unwrap();
        // Neither line is eligible once the comment is stripped.
        assert!(patched.contains("# name = \"In a comment\""));
        assert!(patched.contains("trigger = \"In a comment\""));
        assert_eq!(summary.files_changed, 0);
    }

    #[test]
    fn test_patch_recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/more.txt"), "name = \"Deep text\"\n").unwrap();

        let table = table_for(&[("EVT_1_NAME", "Deep text")]);
        let summary = patch_tree(dir.path(), &table, CodePage::windows_1252()).unwrap();

        let patched = fs::read_to_string(dir.path().join("sub/more.txt")).unwrap();
        assert_eq!(patched, "name = EVT_1_NAME\n");
        assert_eq!(summary.files_visited, 1);
    }

    #[test]
    fn test_patch_rewrites_in_target_code_page() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("events.txt"),
            b"name = \"caf\xe9\"\n",
        )
        .unwrap();

        let table = table_for(&[("EVT_1_NAME", "café")]);
        patch_tree(dir.path(), &table, CodePage::windows_1252()).unwrap();

        let bytes = fs::read(dir.path().join("events.txt")).unwrap();
        assert_eq!(bytes, b"name = EVT_1_NAME\n");
    }

    #[test]
    fn test_patch_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let table = ExportTable::new();
        let err = patch_tree(&dir.path().join("absent"), &table, CodePage::windows_1252())
            .unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }
}
