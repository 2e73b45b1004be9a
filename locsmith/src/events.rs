//! Line-level scanner for event script files.
//!
//! Event files are freeform text containing `event = { ... }` blocks. The
//! scanner tracks brace nesting to attribute `name`/`desc` fields to the
//! event itself or to one of its action sub-blocks. It never mutates the
//! files; patching is a separate pass over the same tree.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use crate::{encoding::CodePage, error::Error, table::strip_comment};

lazy_static! {
    // One token per match: an opening/closing brace, `key = {`,
    // `key = "quoted"`, or `key = bare`.
    static ref TOKEN: Regex = Regex::new(
        r#"(?xi)
        (?P<key>[a-z_][a-z0-9_]*)\s*=\s*
            (?: (?P<block>\{) | "(?P<quoted>[^"]*)" | (?P<bare>[^\s{}";\#]+) )
        | (?P<open>\{)
        | (?P<close>\})
        "#,
    )
    .expect("valid token regex");
}

/// One action sub-block of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAction {
    /// The action's visible name; empty when the block carries none.
    pub name: String,
}

/// One `event = { ... }` block read from a script file.
///
/// Records are read-only inputs to the key assigner; only their backing
/// files are ever rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: u32,
    pub country: Option<String>,
    /// Event name: a quoted literal still to externalize, or an already
    /// assigned key.
    pub name: Option<String>,
    pub desc: Option<String>,
    /// Actions in source order.
    pub actions: Vec<EventAction>,
    pub source_path: PathBuf,
    /// The literal text block the event was read from.
    pub raw_block: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Event,
    Action,
    Other,
}

/// Scans every file under `root` and returns all event records found, in
/// tree walk order. Files are decoded with `code_page`.
pub fn scan_events(root: &Path, code_page: CodePage) -> Result<Vec<EventRecord>, Error> {
    if !root.is_dir() {
        return Err(Error::missing_input(root));
    }

    let mut records = Vec::new();
    let mut walker: Vec<_> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| Error::Io(e.into()))?;
    walker.retain(|entry| entry.file_type().is_file());

    for entry in walker {
        scan_file(entry.path(), code_page, &mut records)?;
    }
    Ok(records)
}

fn scan_file(
    path: &Path,
    code_page: CodePage,
    records: &mut Vec<EventRecord>,
) -> Result<(), Error> {
    let lines = code_page.read_lines(path)?;

    let mut stack: Vec<Context> = Vec::new();
    let mut current: Option<PartialEvent> = None;

    for (idx, line) in lines.iter().enumerate() {
        let stripped = strip_comment(line);

        for token in TOKEN.captures_iter(stripped) {
            if token.name("close").is_some() {
                match stack.pop() {
                    Some(Context::Event) => {
                        if let Some(partial) = current.take() {
                            partial.finish(path, &lines, idx, records);
                        }
                    }
                    Some(_) => {}
                    // Unbalanced closing brace; ignore and keep scanning.
                    None => {}
                }
                continue;
            }

            if token.name("open").is_some() {
                stack.push(Context::Other);
                continue;
            }

            let key = token.name("key").map(|k| k.as_str().to_ascii_lowercase());
            let Some(key) = key else { continue };

            if token.name("block").is_some() {
                let context = if stack.is_empty() && key == "event" {
                    current = Some(PartialEvent::start(idx));
                    Context::Event
                } else if stack.last() == Some(&Context::Event) && is_action_key(&key) {
                    if let Some(partial) = current.as_mut() {
                        partial.actions.push(EventAction { name: String::new() });
                    }
                    Context::Action
                } else {
                    Context::Other
                };
                stack.push(context);
                continue;
            }

            // Scalar field: quoted or bare value.
            let value = token
                .name("quoted")
                .or_else(|| token.name("bare"))
                .map(|v| v.as_str().to_string())
                .unwrap_or_default();

            match stack.last() {
                Some(Context::Event) => {
                    if let Some(partial) = current.as_mut() {
                        partial.set_field(&key, value);
                    }
                }
                Some(Context::Action) => {
                    if key == "name" {
                        if let Some(action) =
                            current.as_mut().and_then(|p| p.actions.last_mut())
                        {
                            if action.name.is_empty() {
                                action.name = value;
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

struct PartialEvent {
    start_line: usize,
    id: Option<u32>,
    country: Option<String>,
    name: Option<String>,
    desc: Option<String>,
    actions: Vec<EventAction>,
}

impl PartialEvent {
    fn start(start_line: usize) -> Self {
        PartialEvent {
            start_line,
            id: None,
            country: None,
            name: None,
            desc: None,
            actions: Vec::new(),
        }
    }

    fn set_field(&mut self, key: &str, value: String) {
        match key {
            "id" => {
                if self.id.is_none() {
                    self.id = value.parse().ok();
                }
            }
            "country" => {
                if self.country.is_none() {
                    self.country = Some(value);
                }
            }
            "name" => {
                if self.name.is_none() {
                    self.name = Some(value);
                }
            }
            "desc" => {
                if self.desc.is_none() {
                    self.desc = Some(value);
                }
            }
            _ => {}
        }
    }

    /// Pushes the completed record; blocks without a parseable id are
    /// dropped, they cannot receive stable keys.
    fn finish(self, path: &Path, lines: &[String], end_line: usize, out: &mut Vec<EventRecord>) {
        let Some(id) = self.id else { return };
        out.push(EventRecord {
            id,
            country: self.country,
            name: self.name,
            desc: self.desc,
            actions: self.actions,
            source_path: path.to_path_buf(),
            raw_block: lines[self.start_line..=end_line].join("\n"),
        });
    }
}

fn is_action_key(key: &str) -> bool {
    key == "action"
        || (key.len() == 8 && key.starts_with("action_"))
}
