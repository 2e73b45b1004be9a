//! Column splitter: extracts single-language columns out of one
//! multi-column table file.

use std::{fs, path::Path};

use crate::{
    error::Error,
    table::{ColumnSpec, Row, classify_row},
};

/// Splits `source` into one UTF-8 file per spec under `out_dir`.
///
/// The source is read with each spec's declared code page; specs sharing a
/// physical source file must declare the same one. Every physical source
/// line produces exactly one output line per spec: the requested column for
/// data rows, an empty line for comment/blank filler rows. Any format error
/// aborts the whole operation before a single output file is touched;
/// pre-existing output files are deleted just before their replacement is
/// written.
pub fn split_columns(source: &Path, out_dir: &Path, specs: &[ColumnSpec]) -> Result<(), Error> {
    if !source.is_file() {
        return Err(Error::missing_input(source));
    }

    // Validate everything in memory first so a mid-run failure cannot leave
    // a partial set of column files behind.
    let mut outputs = Vec::with_capacity(specs.len());
    for spec in specs {
        let lines = spec.code_page.read_lines(source)?;
        let mut content = String::new();
        for (idx, line) in lines.iter().enumerate() {
            match classify_row(line, source, idx + 1)? {
                Row::Data(fields) => content.push_str(&fields[spec.column]),
                Row::Filler => {}
            }
            content.push('\n');
        }
        outputs.push((out_dir.join(&spec.file_name), content));
    }

    fs::create_dir_all(out_dir)?;
    for (path, content) in outputs {
        if path.exists() {
            fs::remove_file(&path)?;
        }
        fs::write(&path, content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encoding::CodePage, table::Language};
    use indoc::indoc;
    use std::fs;

    fn write_source(dir: &Path, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join("text.csv");
        fs::write(&path, content).unwrap();
        path
    }

    fn spec_for(language: Language, code_page: CodePage) -> ColumnSpec {
        ColumnSpec::for_language(language).with_code_page(code_page)
    }

    #[test]
    fn test_split_extracts_requested_columns() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(
            dir.path(),
            indoc! {b"
                # header comment
                EVT_1_NAME;Hello;Bonjour;Ciao;Hola;Hallo;Czesc;Ola;Privet;;;X
                EVT_2_NAME;Bye;Au revoir;Addio;Adios;Tschuss;Czesc;Adeus;Poka;;;X
            "},
        );

        let specs = vec![
            ColumnSpec::id(),
            spec_for(Language::English, CodePage::windows_1252()),
            spec_for(Language::French, CodePage::windows_1252()),
        ];
        split_columns(&source, dir.path(), &specs).unwrap();

        let ids = fs::read_to_string(dir.path().join("ids.txt")).unwrap();
        assert_eq!(ids, "\nEVT_1_NAME\nEVT_2_NAME\n");

        let eng = fs::read_to_string(dir.path().join("ENG.txt")).unwrap();
        assert_eq!(eng, "\nHello\nBye\n");

        let fra = fs::read_to_string(dir.path().join("FRA.txt")).unwrap();
        assert_eq!(fra, "\nBonjour\nAu revoir\n");
    }

    #[test]
    fn test_split_emits_empty_line_for_commented_short_row() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), b"A;x;y;#comment\nK;a;b;c;d;e;f;g;h;;;X\n");

        let specs = vec![spec_for(Language::English, CodePage::windows_1252())];
        split_columns(&source, dir.path(), &specs).unwrap();

        let eng = fs::read_to_string(dir.path().join("ENG.txt")).unwrap();
        assert_eq!(eng, "\na\n");
    }

    #[test]
    fn test_split_aborts_on_malformed_data_row() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), b"K;a;b;c;d;e;f;g;h;;;X\nbroken;row\n");

        let specs = vec![spec_for(Language::English, CodePage::windows_1252())];
        let err = split_columns(&source, dir.path(), &specs).unwrap_err();
        assert!(matches!(err, Error::FormatMismatch { line: 2, .. }));
        // No partial output.
        assert!(!dir.path().join("ENG.txt").exists());
    }

    #[test]
    fn test_split_rejects_legacy_table() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), b"K;1;2;3;4;5;6;7;8;9;10;11;12;13;14;15\n");

        let specs = vec![spec_for(Language::English, CodePage::windows_1252())];
        let err = split_columns(&source, dir.path(), &specs).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTable { .. }));
    }

    #[test]
    fn test_split_decodes_source_code_page() {
        let dir = tempfile::tempdir().unwrap();
        // "café" in windows-1252 in the English column.
        let source = write_source(dir.path(), b"K;caf\xe9;b;c;d;e;f;g;h;;;X\n");

        let specs = vec![spec_for(Language::English, CodePage::windows_1252())];
        split_columns(&source, dir.path(), &specs).unwrap();

        let eng = fs::read_to_string(dir.path().join("ENG.txt")).unwrap();
        assert_eq!(eng, "café\n");
    }

    #[test]
    fn test_split_replaces_preexisting_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), b"K;new;b;c;d;e;f;g;h;;;X\n");
        fs::write(dir.path().join("ENG.txt"), "stale content\n").unwrap();

        let specs = vec![spec_for(Language::English, CodePage::windows_1252())];
        split_columns(&source, dir.path(), &specs).unwrap();

        let eng = fs::read_to_string(dir.path().join("ENG.txt")).unwrap();
        assert_eq!(eng, "new\n");
    }

    #[test]
    fn test_split_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let specs = vec![spec_for(Language::English, CodePage::windows_1252())];
        let err = split_columns(&dir.path().join("absent.csv"), dir.path(), &specs).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }
}
