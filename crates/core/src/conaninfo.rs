//! The `conaninfo.txt` INI document model.
//!
//! Conan describes a binary's build configuration as an INI-style text
//! document: `[section]` headers followed by indented `key=value` lines.
//! Sections such as `[requires]` or `[recipe_hash]` carry bare keys with no
//! value, and keys may repeat within a section, so the model keeps ordered
//! occurrence lists rather than a flat map.

use crate::error::{Error, Result};

/// One parsed section: its name and the key/value pairs in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

/// A parsed `conaninfo.txt` document.
///
/// Section and key order is preserved, and `parse(to_text())` yields an
/// equal document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConanInfo {
    sections: Vec<Section>,
}

impl ConanInfo {
    /// Parse a document from text.
    ///
    /// Blank lines and `#`/`;` comments are skipped. A key without `=` gets
    /// an empty value. Content outside any section is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections: Vec<Section> = Vec::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::InvalidIni("empty section name".to_string()));
                }
                sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                continue;
            }
            let Some(section) = sections.last_mut() else {
                return Err(Error::InvalidIni(format!(
                    "content outside any section: {line}"
                )));
            };
            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (line, ""),
            };
            section
                .entries
                .push((key.to_string(), value.to_string()));
        }
        Ok(Self { sections })
    }

    /// Section names in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Whether the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Distinct keys of a section, in order of first occurrence.
    pub fn keys(&self, section: &str) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for s in self.sections.iter().filter(|s| s.name == section) {
            for (key, _) in &s.entries {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// First value of a key within a section.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        for s in self.sections.iter().filter(|s| s.name == section) {
            for (k, v) in &s.entries {
                if k == key {
                    return Some(v);
                }
            }
        }
        None
    }

    /// Every value of a repeated key, in file order.
    pub fn values(&self, section: &str, key: &str) -> Vec<&str> {
        let mut values = Vec::new();
        for s in self.sections.iter().filter(|s| s.name == section) {
            for (k, v) in &s.entries {
                if k == key {
                    values.push(v.as_str());
                }
            }
        }
        values
    }

    /// First value parsed as an integer, or `default`.
    pub fn as_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// First value as a string, or `default`.
    pub fn as_str(&self, section: &str, key: &str, default: &str) -> String {
        self.get(section, key).unwrap_or(default).to_string()
    }

    /// First value parsed as a boolean, or `default`. Conan writes `True`
    /// and `False`; the comparison is case-insensitive.
    pub fn as_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.get(section, key) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            _ => default,
        }
    }

    /// Serialize back to text. `parse(to_text())` equals the original
    /// document; keys with empty values are written bare, the way Conan
    /// writes its `[requires]` and `[recipe_hash]` sections.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in &section.entries {
                out.push_str("    ");
                out.push_str(key);
                if !value.is_empty() {
                    out.push('=');
                    out.push_str(value);
                }
                out.push('\n');
            }
        }
        out
    }
}
