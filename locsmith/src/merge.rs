//! Column merger: interleaves per-language column files back into one
//! multi-column table file.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    encoding::CodePage,
    error::Error,
    table::{ColumnSpec, DELIMITER, END_OF_ROW},
};

/// Filler written in place of an empty id cell.
const ID_FILLER: &str = "#";

/// Merges the id column and language columns under `dir` into `out_path`.
///
/// The id file must exist; a missing language file is not an error and
/// contributes an empty column for every row, while a present one must have
/// exactly as many lines as the id file. Columns are written in the order
/// of `specs`, each cell converted to its column's code page by the single
/// output writer before append, each cell terminated by the field
/// delimiter, each row closed with the fixed end-of-row marker. Row counts
/// are validated before the output file is created, so a failed merge
/// leaves no output behind; a pre-existing output file is deleted first.
pub fn merge_columns(
    dir: &Path,
    id_spec: &ColumnSpec,
    specs: &[ColumnSpec],
    out_path: &Path,
) -> Result<(), Error> {
    let id_path = dir.join(&id_spec.file_name);
    if !id_path.is_file() {
        return Err(Error::missing_input(&id_path));
    }
    let ids = CodePage::utf_8().read_lines(&id_path)?;

    let mut columns: Vec<Option<Vec<String>>> = Vec::with_capacity(specs.len());
    for spec in specs {
        let path = dir.join(&spec.file_name);
        if !path.is_file() {
            columns.push(None);
            continue;
        }
        let lines = CodePage::utf_8().read_lines(&path)?;
        if lines.len() != ids.len() {
            return Err(Error::RowCountMismatch {
                path,
                expected: ids.len(),
                found: lines.len(),
            });
        }
        columns.push(Some(lines));
    }

    if out_path.exists() {
        fs::remove_file(out_path)?;
    }
    let mut writer = BufWriter::new(File::create(out_path)?);
    let delimiter = [DELIMITER as u8];

    for (row, id) in ids.iter().enumerate() {
        let id_cell = if id.is_empty() { ID_FILLER } else { id };
        writer.write_all(&id_spec.code_page.encode(id_cell)?)?;
        writer.write_all(&delimiter)?;

        for (spec, column) in specs.iter().zip(&columns) {
            if let Some(lines) = column {
                writer.write_all(&spec.code_page.encode(&lines[row])?)?;
            }
            writer.write_all(&delimiter)?;
        }
        writer.write_all(END_OF_ROW.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
