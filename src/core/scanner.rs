//! Line-based extraction of the names a definition file declares.
//!
//! Only two declarations matter for plugin generation: the `package` line and
//! the first `message <Name>_KEYS` line. Matching is kept behind
//! [`DefinitionScanner`] so a real grammar parser can replace it without
//! touching the synthesizers.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use regex::Regex;

/// Suffix marking a message as the key-set of a definition file.
pub const KEY_SUFFIX: &str = "_KEYS";

static PACKAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^package\s+(.*);").expect("valid package regex"));

static KEY_MESSAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*message\s+(\w+_KEYS)\b").expect("valid key message regex")
});

/// Names declared by one definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionNames {
    /// Package with `.`, `[` and `]` replaced by `_`.
    pub package: Option<String>,
    /// Key-message name and its content name (suffix stripped).
    pub key: Option<KeyMessage>,
}

/// A `message <Name>_KEYS` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMessage {
    /// Full declared name, e.g. `Widget_KEYS`.
    pub key: String,
    /// Declared name without the suffix, e.g. `Widget`.
    pub content: String,
}

/// Extracts [`DefinitionNames`] from definition text.
pub trait DefinitionScanner {
    fn scan(&self, text: &str) -> DefinitionNames;
}

/// Default scanner: first matching line wins for each declaration.
///
/// A file declaring several `_KEYS` messages contributes only the first one.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineScanner;

impl DefinitionScanner for LineScanner {
    fn scan(&self, text: &str) -> DefinitionNames {
        DefinitionNames {
            package: extract_package(text),
            key: extract_key_message(text),
        }
    }
}

pub fn extract_package(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        PACKAGE_REGEX
            .captures(line)
            .map(|caps| caps[1].trim().replace(['.', '[', ']'], "_"))
    })
}

pub fn extract_key_message(text: &str) -> Option<KeyMessage> {
    text.lines().find_map(|line| {
        let caps = KEY_MESSAGE_REGEX.captures(line)?;
        let key = caps[1].to_string();
        let content = key.strip_suffix(KEY_SUFFIX)?.to_string();
        Some(KeyMessage { key, content })
    })
}

/// A definition file read once from disk.
#[derive(Debug, Clone)]
pub struct DefinitionFile {
    pub path: PathBuf,
    pub names: DefinitionNames,
}

impl DefinitionFile {
    pub fn read(path: &Path, scanner: &dyn DefinitionScanner) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read definition file: {}", path.display()))?;
        Ok(Self::from_text(path, &text, scanner))
    }

    pub fn from_text(path: &Path, text: &str, scanner: &dyn DefinitionScanner) -> Self {
        Self {
            path: path.to_path_buf(),
            names: scanner.scan(text),
        }
    }

    /// File name without its final extension (`foo.proto` -> `foo`).
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: &str = r#"
syntax = "proto3";

package cisco_ios_xr.widget.oper[1];

message Widget_KEYS {
    string name = 1;
}

message Widget {
    uint32 count = 1;
}
"#;

    #[test]
    fn test_scan_widget() {
        let names = LineScanner.scan(WIDGET);
        assert_eq!(
            names.package.as_deref(),
            Some("cisco_ios_xr_widget_oper_1_")
        );
        assert_eq!(
            names.key,
            Some(KeyMessage {
                key: "Widget_KEYS".to_string(),
                content: "Widget".to_string(),
            })
        );
    }

    #[test]
    fn test_scan_without_key_message() {
        let names = LineScanner.scan("package baz;\n\nmessage Plain {\n}\n");
        assert_eq!(names.package.as_deref(), Some("baz"));
        assert_eq!(names.key, None);
    }

    #[test]
    fn test_scan_empty() {
        assert_eq!(LineScanner.scan(""), DefinitionNames::default());
    }

    #[test]
    fn test_first_key_message_wins() {
        let text = "message First_KEYS {\n}\nmessage Second_KEYS {\n}\n";
        let key = extract_key_message(text).unwrap();
        assert_eq!(key.key, "First_KEYS");
        assert_eq!(key.content, "First");
    }

    #[test]
    fn test_first_package_wins() {
        assert_eq!(
            extract_package("package a.b;\npackage c;\n").as_deref(),
            Some("a_b")
        );
    }

    #[test]
    fn test_package_must_start_line() {
        assert_eq!(extract_package("// package foo;\n"), None);
        assert_eq!(extract_package("package foo\n"), None);
    }

    #[test]
    fn test_key_suffix_must_end_name() {
        assert_eq!(extract_key_message("message Widget_KEYS_EXTRA {\n"), None);
        assert_eq!(extract_key_message("message WidgetKEYS {\n"), None);
        assert_eq!(extract_key_message("// message Widget_KEYS {\n"), None);
    }

    #[test]
    fn test_nested_key_message() {
        let key = extract_key_message("message Outer {\n  message Inner_KEYS {\n").unwrap();
        assert_eq!(key.key, "Inner_KEYS");
    }

    #[test]
    fn test_definition_file_names() {
        let file = DefinitionFile::from_text(
            Path::new("staging/a/widget_oper.proto"),
            WIDGET,
            &LineScanner,
        );
        assert_eq!(file.base_name(), "widget_oper");
        assert_eq!(file.file_name(), "widget_oper.proto");
        assert!(file.names.key.is_some());
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = DefinitionFile::read(&dir.path().join("nope.proto"), &LineScanner).unwrap_err();
        assert!(err.to_string().contains("nope.proto"));
    }
}
