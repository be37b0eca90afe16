//! Read-only parser for `KEY=value` configuration files (`.env`).
//!
//! The launcher never exports these values into its own environment; they are
//! parsed only to report on them (`binagent check`) and to pick the port shown
//! before launch. The application inherits the launcher's environment, and a
//! variable exported there wins over the file, so [`EnvFile::effective`] is
//! what the application will actually see.

use crate::config::env_optional;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
    /// 1-based line number in the source file.
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    pub entries: Vec<EnvEntry>,
    /// `(line, raw text)` for lines that are neither blank, comments, nor `KEY=value`.
    pub malformed: Vec<(usize, String)>,
}

fn key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

impl EnvFile {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    pub fn parse(content: &str) -> Self {
        let mut file = EnvFile::default();
        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some(eq_pos) = line.find('=') else {
                file.malformed.push((line_no, raw.to_string()));
                continue;
            };
            let key = line[..eq_pos].trim();
            if !key_pattern().is_match(key) {
                file.malformed.push((line_no, raw.to_string()));
                continue;
            }
            file.entries.push(EnvEntry {
                key: key.to_string(),
                value: unquote(line[eq_pos + 1..].trim()).to_string(),
                line: line_no,
            });
        }
        file
    }

    /// Value of `key`; later assignments win, as with a shell `source`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Exported process variable (non-blank) first, then the file's value.
    pub fn effective(&self, key: &str) -> Option<String> {
        env_optional(key, &[]).or_else(|| self.get(key).map(str::to_string))
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote) {
            if let Some(end) = rest.find(quote) {
                return &rest[..end];
            }
        }
    }
    strip_inline_comment(value)
}

/// An unquoted value ends at a `#` preceded by whitespace; `abc#def` is kept whole.
fn strip_inline_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    for (i, b) in bytes.iter().enumerate().skip(1) {
        if *b == b'#' && bytes[i - 1].is_ascii_whitespace() {
            return value[..i].trim_end();
        }
    }
    value
}
