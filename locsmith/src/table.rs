//! The delimited table model shared by the column splitter and merger.
//!
//! A table is a plain text file with one logical row per line, `;` as the
//! field delimiter, and `#` introducing an end-of-line comment. Data rows
//! carry exactly [`EXPECTED_WIDTH`] columns: the id column, eight language
//! columns in fixed order, two reserved columns, and the terminator column
//! written as part of the [`END_OF_ROW`] marker.

use std::{fmt, path::Path, str::FromStr};

use crate::{encoding::CodePage, error::Error};

/// Column count of a supported table row.
pub const EXPECTED_WIDTH: usize = 12;

/// Column count of the legacy table layout, which is explicitly rejected.
pub const LEGACY_WIDTH: usize = 16;

/// Field delimiter within a row.
pub const DELIMITER: char = ';';

/// Introduces an end-of-line comment.
pub const COMMENT: char = '#';

/// Marker appended after the last language column of a merged row, closing
/// the two reserved columns and the terminator column.
pub const END_OF_ROW: &str = ";;X";

/// File name used for the id column produced by the splitter and consumed
/// by the merger.
pub const ID_FILE_NAME: &str = "ids.txt";

/// Returns the row text with any trailing `#` comment removed.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// One classified physical line of a table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// A data row with exactly [`EXPECTED_WIDTH`] columns.
    Data(Vec<String>),
    /// A comment or blank line; it keeps its slot so row alignment across
    /// per-language files is preserved.
    Filler,
}

/// Classifies one physical line of a table file.
///
/// The trailing comment is stripped and the remainder split on the field
/// delimiter. A wrong-width line is fatal only when it carries no comment
/// and is not blank; a commented or blank line becomes a [`Row::Filler`].
/// `line_no` is 1-based and is reported on format errors.
pub fn classify_row(line: &str, path: &Path, line_no: usize) -> Result<Row, Error> {
    let stripped = strip_comment(line);
    let fields: Vec<&str> = stripped.split(DELIMITER).collect();

    if fields.len() == EXPECTED_WIDTH {
        return Ok(Row::Data(fields.into_iter().map(String::from).collect()));
    }
    if fields.len() == LEGACY_WIDTH {
        return Err(Error::UnsupportedTable {
            path: path.to_path_buf(),
        });
    }
    if line.contains(COMMENT) || stripped.trim().is_empty() {
        return Ok(Row::Filler);
    }
    Err(Error::FormatMismatch {
        path: path.to_path_buf(),
        line: line_no,
        expected: EXPECTED_WIDTH,
        found: fields.len(),
    })
}

/// The eight table languages, in their fixed column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
    Italian,
    Spanish,
    German,
    Polish,
    Portuguese,
    Russian,
}

impl Language {
    /// All languages in table column order.
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::French,
        Language::Italian,
        Language::Spanish,
        Language::German,
        Language::Polish,
        Language::Portuguese,
        Language::Russian,
    ];

    /// The table tag for this language (e.g. `"ENG"`).
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "ENG",
            Language::French => "FRA",
            Language::Italian => "ITA",
            Language::Spanish => "SPA",
            Language::German => "GER",
            Language::Polish => "POL",
            Language::Portuguese => "POR",
            Language::Russian => "RUS",
        }
    }

    /// Zero-based column index of this language in a table row.
    ///
    /// Column 0 is the id column; languages start at column 1.
    pub fn column(&self) -> usize {
        match self {
            Language::English => 1,
            Language::French => 2,
            Language::Italian => 3,
            Language::Spanish => 4,
            Language::German => 5,
            Language::Polish => 6,
            Language::Portuguese => 7,
            Language::Russian => 8,
        }
    }

    /// The legacy code page this language's column is published in.
    pub fn code_page(&self) -> CodePage {
        match self {
            Language::Polish => CodePage::windows_1250(),
            Language::Russian => CodePage::windows_1251(),
            _ => CodePage::windows_1252(),
        }
    }

    /// The per-language file name used by the splitter and merger.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.tag())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENG" => Ok(Language::English),
            "FRA" => Ok(Language::French),
            "ITA" => Ok(Language::Italian),
            "SPA" => Ok(Language::Spanish),
            "GER" => Ok(Language::German),
            "POL" => Ok(Language::Polish),
            "POR" => Ok(Language::Portuguese),
            "RUS" => Ok(Language::Russian),
            other => Err(Error::UnknownLanguage(other.to_string())),
        }
    }
}

/// One column extraction/insertion spec.
///
/// Identity is the language tag; specs are constructed per invocation and
/// never persisted. When splitting, `code_page` is the encoding the source
/// table is read in; when merging, it is the encoding the column is written
/// in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Language tag, or `"ID"` for the id column.
    pub language: String,
    /// Code page used to read (split) or write (merge) this column.
    pub code_page: CodePage,
    /// File this column is extracted to / merged from.
    pub file_name: String,
    /// Zero-based column index in the table row.
    pub column: usize,
}

impl ColumnSpec {
    /// The spec for one of the fixed table languages, with its default
    /// code page and file name.
    pub fn for_language(language: Language) -> Self {
        ColumnSpec {
            language: language.tag().to_string(),
            code_page: language.code_page(),
            file_name: language.file_name(),
            column: language.column(),
        }
    }

    /// The spec for the id column.
    pub fn id() -> Self {
        ColumnSpec {
            language: "ID".to_string(),
            code_page: CodePage::windows_1252(),
            file_name: ID_FILE_NAME.to_string(),
            column: 0,
        }
    }

    /// All language specs in fixed column order.
    pub fn standard_set() -> Vec<ColumnSpec> {
        Language::ALL.iter().map(|l| ColumnSpec::for_language(*l)).collect()
    }

    /// Replaces the code page, keeping everything else.
    pub fn with_code_page(mut self, code_page: CodePage) -> Self {
        self.code_page = code_page;
        self
    }
}
