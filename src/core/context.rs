use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use glob::Pattern;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        mirror::Layout,
        scanner::{DefinitionScanner, LineScanner},
    },
};

/// Everything a run needs, resolved once up front.
///
/// # Configuration Priority
///
/// 1. CLI arguments (e.g. `--src protos`)
/// 2. `.protoplugrc.json` config file
/// 3. Built-in defaults
pub struct GenerateContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Absolute working root plus source/target roots.
    pub layout: Layout,

    /// Compiled `exceptions` patterns.
    pub exceptions: Vec<Pattern>,

    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,

    scanner: Box<dyn DefinitionScanner>,
}

impl GenerateContext {
    /// Create a context from command line arguments.
    ///
    /// # Errors
    ///
    /// Returns error if the root cannot be resolved or the config file is invalid.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        let root = match &common_args.root {
            Some(root) => root.clone(),
            None => env::current_dir().context("Failed to read current directory")?,
        };
        let root = fs::canonicalize(&root)
            .with_context(|| format!("Invalid root directory: {}", root.display()))?;

        let config_result = load_config(&root)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }
        let mut config = config_result.config;

        if let Some(ref src) = common_args.src {
            config.source_root = src.to_string_lossy().to_string();
        }
        if let Some(ref dst) = common_args.dst {
            config.target_root = dst.to_string_lossy().to_string();
        }
        config.validate()?;

        Ok(Self::from_config(config, &root, verbose))
    }

    /// Build a context from an already merged config.
    pub fn from_config(config: Config, root: &Path, verbose: bool) -> Self {
        // Collecting components drops trailing separators (`proto_go/`).
        let layout = Layout::new(
            root,
            Path::new(&config.source_root).components().collect::<PathBuf>(),
            Path::new(&config.target_root).components().collect::<PathBuf>(),
        );
        let exceptions = config.exception_patterns();

        Self {
            config,
            layout,
            exceptions,
            verbose,
            scanner: Box::new(LineScanner),
        }
    }

    /// Replace the default line scanner.
    pub fn with_scanner(mut self, scanner: Box<dyn DefinitionScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn scanner(&self) -> &dyn DefinitionScanner {
        self.scanner.as_ref()
    }

    pub fn root(&self) -> &Path {
        &self.layout.root
    }
}
