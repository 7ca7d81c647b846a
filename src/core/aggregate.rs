//! The aggregate plugin file.
//!
//! Every definition file with a key message contributes a [`SymbolEntry`]. The
//! aggregate file imports each mirrored module once under an explicit alias and
//! declares a `KEYS_<alias>` / `CONTENT_<alias>` pair per entry, so a single
//! plugin build exports the symbols of the whole tree.
//!
//! Unlike the per-file stubs, several modules are in scope here and different
//! modules may generate identically named types, so every reference is
//! qualified.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{
    identifier::to_camel_case,
    render::{GlobalVar, GoPluginSource, Import},
    scanner::DefinitionFile,
};

/// Default file name of the aggregate source, written at the working root.
pub const AGGREGATE_FILE_NAME: &str = "plugin.go";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("{file} declares key message {key} but no package")]
    MissingPackage { file: String, key: String },
    #[error(
        "module {module_path} already bound to package {existing}, {file} declares {found}"
    )]
    ConflictingPackage {
        file: String,
        module_path: String,
        existing: String,
        found: String,
    },
}

/// One aggregable key/content pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Import path of the mirrored directory, e.g. `./proto_go/oper/bgp`.
    pub module_path: String,
    /// Go package identifier of the generated bindings.
    pub package: String,
    pub key_type: String,
    pub content_type: String,
}

impl SymbolEntry {
    /// Entry for `file` mirrored into `target_dir`, imported from `root`.
    ///
    /// `Ok(None)` when the file declares no key message.
    pub fn from_definition(
        file: &DefinitionFile,
        target_dir: &Path,
        root: &Path,
    ) -> Result<Option<Self>, AggregateError> {
        let Some(key) = &file.names.key else {
            return Ok(None);
        };
        let Some(package) = &file.names.package else {
            return Err(AggregateError::MissingPackage {
                file: file.path.display().to_string(),
                key: key.key.clone(),
            });
        };

        Ok(Some(Self {
            module_path: module_path(target_dir, root),
            package: package.clone(),
            key_type: to_camel_case(&key.key),
            content_type: to_camel_case(&key.content),
        }))
    }
}

/// Go import path of `target_dir` as seen from `root`.
///
/// Go rejects absolute import paths, so an absolute directory is rewritten
/// relative to `root` (climbing with `..` when it lies outside).
pub fn module_path(target_dir: &Path, root: &Path) -> String {
    let relative = if target_dir.is_absolute() {
        relative_to(target_dir, root)
    } else {
        target_dir.to_path_buf()
    };
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();
    format!("./{}", parts.join("/"))
}

/// `path` relative to `base`, both absolute.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path: Vec<Component> = path.components().collect();
    let base: Vec<Component> = base.components().collect();
    let shared = path
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..base.len() {
        relative.push("..");
    }
    for component in &path[shared..] {
        relative.push(component);
    }
    relative
}

/// Accumulates entries in discovery order and renders the aggregate file.
#[derive(Debug, Clone)]
pub struct AggregatePlugin {
    /// Plugin artifact requested by the user.
    artifact: String,
    /// Name of the aggregate source file itself.
    file_name: String,
    entries: Vec<SymbolEntry>,
    packages: HashMap<String, String>,
}

impl AggregatePlugin {
    pub fn new(artifact: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            file_name: file_name.into(),
            entries: Vec::new(),
            packages: HashMap::new(),
        }
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Add an entry, keeping one package per module path.
    pub fn push(&mut self, entry: SymbolEntry, file: &Path) -> Result<(), AggregateError> {
        match self.packages.get(&entry.module_path) {
            Some(existing) if *existing != entry.package => {
                return Err(AggregateError::ConflictingPackage {
                    file: file.display().to_string(),
                    module_path: entry.module_path,
                    existing: existing.clone(),
                    found: entry.package,
                });
            }
            Some(_) => {}
            None => {
                self.packages
                    .insert(entry.module_path.clone(), entry.package.clone());
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn source(&self) -> GoPluginSource {
        let mut imports: Vec<Import> = Vec::new();
        // module path -> alias
        let mut aliases: HashMap<&str, String> = HashMap::new();
        let mut taken_aliases: HashSet<String> = HashSet::new();

        for entry in &self.entries {
            if aliases.contains_key(entry.module_path.as_str()) {
                continue;
            }
            let alias = unique_name(&entry.package, &mut taken_aliases);
            aliases.insert(&entry.module_path, alias.clone());
            imports.push(Import::Aliased {
                alias,
                path: entry.module_path.clone(),
            });
        }

        let mut taken_suffixes: HashSet<String> = HashSet::new();
        let mut globals = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            let alias = &aliases[entry.module_path.as_str()];
            let suffix = unique_name(alias, &mut taken_suffixes);
            globals.push(GlobalVar::new(
                format!("KEYS_{}", suffix),
                format!("{}.{}", alias, entry.key_type),
            ));
            globals.push(GlobalVar::new(
                format!("CONTENT_{}", suffix),
                format!("{}.{}", alias, entry.content_type),
            ));
        }

        GoPluginSource {
            build_directive: format!(
                "go build -buildmode=plugin -o {} {}",
                self.artifact, self.file_name
            ),
            imports,
            globals,
        }
    }

    pub fn render(&self) -> String {
        self.source().render()
    }

    /// Write the aggregate file at `root`, returning its path.
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(&self.file_name);
        fs::write(&path, self.render())
            .with_context(|| format!("Failed to write aggregate plugin: {}", path.display()))?;
        Ok(path)
    }
}

/// `base` if still free, otherwise the first free `base_2`, `base_3`, ...
fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
