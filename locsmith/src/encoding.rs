//! Code page handling for reading and writing legacy-encoded table and
//! script files.
//!
//! Decoding goes through `encoding_rs_io` so a BOM, when present, wins over
//! the declared code page; encoding is strict and fails instead of inserting
//! substitution sequences.

use std::{fmt, fs::File, io::Read, path::Path, str::FromStr};

use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::Error;

/// A character encoding used to read or write one specific file or column.
#[derive(Clone, Copy)]
pub struct CodePage(&'static Encoding);

impl CodePage {
    pub fn utf_8() -> Self {
        CodePage(encoding_rs::UTF_8)
    }

    pub fn windows_1250() -> Self {
        CodePage(encoding_rs::WINDOWS_1250)
    }

    pub fn windows_1251() -> Self {
        CodePage(encoding_rs::WINDOWS_1251)
    }

    pub fn windows_1252() -> Self {
        CodePage(encoding_rs::WINDOWS_1252)
    }

    /// Resolves a code page from a WHATWG encoding label (e.g. `"windows-1250"`).
    pub fn for_label(label: &str) -> Result<Self, Error> {
        Encoding::for_label(label.as_bytes())
            .map(CodePage)
            .ok_or_else(|| Error::UnknownCodePage(label.to_string()))
    }

    /// The canonical name of this code page.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Reads and decodes an entire file into a `String`.
    ///
    /// A BOM in the file overrides this code page.
    pub fn read_to_string<P: AsRef<Path>>(&self, path: P) -> Result<String, Error> {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = DecodeReaderBytesBuilder::new()
            .encoding(Some(self.0))
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
        Ok(decoded)
    }

    /// Reads a file and returns its physical lines, without terminators.
    pub fn read_lines<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>, Error> {
        let text = self.read_to_string(path)?;
        Ok(text.lines().map(String::from).collect())
    }

    /// Encodes `text` into this code page.
    ///
    /// Fails when any character has no representation in the target code
    /// page; nothing is ever silently substituted.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, Error> {
        let (bytes, _, had_errors) = self.0.encode(text);
        if had_errors {
            return Err(Error::Encoding {
                code_page: self.name().to_string(),
                text: text.to_string(),
            });
        }
        Ok(bytes.into_owned())
    }
}

impl PartialEq for CodePage {
    fn eq(&self, other: &Self) -> bool {
        self.0.name() == other.0.name()
    }
}

impl Eq for CodePage {}

impl fmt::Debug for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodePage").field(&self.name()).finish()
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CodePage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodePage::for_label(s.trim())
    }
}
