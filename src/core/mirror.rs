//! Source tree discovery and mirroring into the target tree.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use walkdir::WalkDir;

/// Extension identifying definition files.
pub const DEFINITION_EXTENSION: &str = "proto";

/// Where the source and target trees live.
///
/// `source_root` and `target_root` are usually relative to `root`, the working
/// directory every generated absolute path is anchored at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub source_root: PathBuf,
    pub target_root: PathBuf,
}

impl Layout {
    pub fn new(
        root: impl Into<PathBuf>,
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    pub fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// One discovered definition file and its mirrored location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionLocation {
    /// Directory holding the file, relative to the layout root.
    pub source_dir: PathBuf,
    /// Mirrored directory, relative to the layout root.
    pub target_dir: PathBuf,
    pub file_name: String,
}

impl DefinitionLocation {
    pub fn source_path(&self) -> PathBuf {
        self.source_dir.join(&self.file_name)
    }

    pub fn target_path(&self) -> PathBuf {
        self.target_dir.join(&self.file_name)
    }
}

/// Result of walking the source tree.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Definitions in walk order (sorted by file name per directory).
    pub definitions: Vec<DefinitionLocation>,
    /// Files dropped by an exception pattern.
    pub excluded: Vec<PathBuf>,
}

/// Walk the source tree and list definition files in a stable order.
pub fn discover(layout: &Layout, exceptions: &[Pattern]) -> Result<Discovery> {
    let source_root = layout.absolute(&layout.source_root);
    if !source_root.is_dir() {
        bail!("Source directory does not exist: {}", source_root.display());
    }

    let mut discovery = Discovery::default();

    for entry in WalkDir::new(&source_root).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Cannot access path under {}", source_root.display()))?;
        if !is_definition_candidate(&entry) {
            continue;
        }

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if exceptions.iter().any(|p| p.matches(&file_name)) {
            tracing::debug!(file = %path.display(), "excluded by exception list");
            discovery.excluded.push(path.to_path_buf());
            continue;
        }
        if path.extension().is_none_or(|ext| ext != DEFINITION_EXTENSION) {
            continue;
        }

        let relative_dir = path
            .parent()
            .and_then(|dir| dir.strip_prefix(&source_root).ok())
            .unwrap_or_else(|| Path::new(""));

        discovery.definitions.push(DefinitionLocation {
            source_dir: nest(&layout.source_root, relative_dir),
            target_dir: nest(&layout.target_root, relative_dir),
            file_name,
        });
    }

    Ok(discovery)
}

/// Regular files, and symlinks that resolve to one.
fn is_definition_candidate(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file()
        || (file_type.is_symlink() && fs::metadata(entry.path()).is_ok_and(|m| m.is_file()))
}

fn nest(base: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(relative)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    AlreadyExists,
}

/// Create the mirrored directory and link the definition into it.
///
/// An existing entry at the link location counts as done.
pub fn link_definition(layout: &Layout, location: &DefinitionLocation) -> Result<LinkOutcome> {
    let target_dir = layout.absolute(&location.target_dir);
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create directory: {}", target_dir.display()))?;

    let link = layout.absolute(&location.target_path());
    let original = link_target(layout, location);

    match symlink(&original, &link) {
        Ok(()) => {
            tracing::debug!(link = %link.display(), original = %original.display(), "linked");
            Ok(LinkOutcome::Created)
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(LinkOutcome::AlreadyExists),
        Err(err) => Err(err).with_context(|| {
            format!(
                "Failed to link {} -> {}",
                link.display(),
                original.display()
            )
        }),
    }
}

/// What the link at `location.target_path()` should point to.
///
/// Relative when both roots are relative and plain: one `..` per component
/// of the target directory, then the source path. Absolute otherwise, since a
/// root that climbs out with `..` cannot be mirrored component by component.
pub fn link_target(layout: &Layout, location: &DefinitionLocation) -> PathBuf {
    if !is_plain_relative(&layout.source_root) || !is_plain_relative(&layout.target_root) {
        return layout.absolute(&location.source_path());
    }

    let depth = location
        .target_dir
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count();

    let mut target = PathBuf::new();
    for _ in 0..depth {
        target.push("..");
    }
    for component in location.source_path().components() {
        if let Component::Normal(part) = component {
            target.push(part);
        }
    }
    target
}

fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}
