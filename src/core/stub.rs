//! Per-file plugin stubs.
//!
//! A stub is a `package main` file living in `<target>/plugin/` that dot-imports
//! the generated bindings one directory up and declares one uninitialized
//! variable of the key type and one of the content type. Building it with
//! `-buildmode=plugin` yields a plugin exporting exactly those two symbols.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::{
    identifier::to_camel_case,
    render::{GlobalVar, GoPluginSource, Import},
    scanner::DefinitionFile,
};

/// Directory, under each mirrored target directory, holding the stubs.
pub const PLUGIN_DIR: &str = "plugin";
/// Extension of stub files.
pub const STUB_EXTENSION: &str = "go";

pub const KEYS_VAR: &str = "PluginMsg_KEYS";
pub const CONTENT_VAR: &str = "PluginMsg";

/// A synthesized stub, ready to be written below the working root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginStub {
    /// Stub path relative to the working root.
    pub path: PathBuf,
    /// Plugin artifact path the build directive produces (absolute).
    pub artifact: PathBuf,
    pub source: GoPluginSource,
}

impl PluginStub {
    /// Write the stub, creating the plugin directory if needed.
    ///
    /// Returns the absolute path written.
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(&self.path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create plugin directory: {}", dir.display()))?;
        }
        fs::write(&path, self.source.render())
            .with_context(|| format!("Failed to write plugin stub: {}", path.display()))?;
        Ok(path)
    }
}

/// Build the stub for `file`, mirrored into `target_dir` (relative to `root`).
///
/// Returns `None` when the file declares no key message; such files have
/// nothing to export and are skipped.
pub fn synthesize_stub(file: &DefinitionFile, target_dir: &Path, root: &Path) -> Option<PluginStub> {
    let key = file.names.key.as_ref()?;

    let plugin_dir = target_dir.join(PLUGIN_DIR);
    let base = file.base_name();
    let path = plugin_dir.join(format!("{}.plugin.{}", base, STUB_EXTENSION));
    let artifact = root.join(&plugin_dir).join(format!("{}.so", base));

    let source = GoPluginSource {
        build_directive: format!(
            "go build -buildmode=plugin -o {} {}",
            artifact.display(),
            root.join(&path).display()
        ),
        // Sole foreign module, so unqualified access is unambiguous.
        imports: vec![Import::Anonymous {
            path: "..".to_string(),
        }],
        globals: vec![
            GlobalVar::new(KEYS_VAR, to_camel_case(&key.key)),
            GlobalVar::new(CONTENT_VAR, to_camel_case(&key.content)),
        ],
    };

    Some(PluginStub {
        path,
        artifact,
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::scanner::LineScanner;

    fn definition(path: &str, text: &str) -> DefinitionFile {
        DefinitionFile::from_text(Path::new(path), text, &LineScanner)
    }

    #[test]
    fn test_stub_text() {
        let file = definition(
            "staging/oper/bgp_nbr.proto",
            "package bgp.nbr;\nmessage bgp_nbr_KEYS {\n}\n",
        );
        let stub = synthesize_stub(&file, Path::new("proto_go/oper"), Path::new("/work")).unwrap();

        assert_eq!(stub.path, PathBuf::from("proto_go/oper/plugin/bgp_nbr.plugin.go"));
        assert_eq!(
            stub.artifact,
            PathBuf::from("/work/proto_go/oper/plugin/bgp_nbr.so")
        );
        assert_eq!(
            stub.source.render(),
            "//go:generate go build -buildmode=plugin -o /work/proto_go/oper/plugin/bgp_nbr.so /work/proto_go/oper/plugin/bgp_nbr.plugin.go\n\
             \n\
             package main\n\
             \n\
             import (\n\
             \t. \"..\"\n\
             )\n\
             \n\
             var PluginMsg_KEYS BgpNbr_KEYS\n\
             var PluginMsg BgpNbr\n"
        );
    }

    #[test]
    fn test_no_key_message_yields_nothing() {
        let file = definition("staging/baz.proto", "package baz;\nmessage Baz {\n}\n");
        assert!(synthesize_stub(&file, Path::new("proto_go"), Path::new("/work")).is_none());
    }

    #[test]
    fn test_stub_is_stable() {
        let file = definition("staging/t.proto", "message Thing_KEYS {\n");
        let first = synthesize_stub(&file, Path::new("proto_go"), Path::new("/work")).unwrap();
        let second = synthesize_stub(&file, Path::new("proto_go"), Path::new("/work")).unwrap();
        assert_eq!(first.source.render(), second.source.render());
    }

    #[test]
    fn test_write_creates_plugin_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = definition("staging/t.proto", "message Thing_KEYS {\n");
        let stub = synthesize_stub(&file, Path::new("proto_go"), dir.path()).unwrap();

        let written = stub.write(dir.path()).unwrap();
        assert_eq!(written, dir.path().join("proto_go/plugin/t.plugin.go"));
        assert_eq!(fs::read_to_string(&written).unwrap(), stub.source.render());
    }
}
