use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{aggregate::AGGREGATE_FILE_NAME, directive::DIRECTIVE_LOG_NAME};

pub const CONFIG_FILE_NAME: &str = ".protoplugrc.json";

/// Protos known to break `protoc-gen-go`; skipped unless the config says otherwise.
pub const KNOWN_BAD_DEFINITIONS: &[&str] = &[
    "icpe_sdacp_cfg_sfl.proto",
    "dpm_oper_if.proto",
    "icpe_cpm_oper_sat.proto",
    "mpls_te_soft_preemption_stats.proto",
];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_target_root")]
    pub target_root: String,
    /// File-name glob patterns of definitions to leave out.
    #[serde(default = "default_exceptions")]
    pub exceptions: Vec<String>,
    #[serde(default = "default_directive_log")]
    pub directive_log: String,
    #[serde(default = "default_aggregate_file")]
    pub aggregate_file: String,
    #[serde(default = "default_generate_command")]
    pub generate_command: Vec<String>,
}

fn default_source_root() -> String {
    "staging".to_string()
}

fn default_target_root() -> String {
    "proto_go".to_string()
}

fn default_exceptions() -> Vec<String> {
    KNOWN_BAD_DEFINITIONS.iter().map(|s| s.to_string()).collect()
}

fn default_directive_log() -> String {
    DIRECTIVE_LOG_NAME.to_string()
}

fn default_aggregate_file() -> String {
    AGGREGATE_FILE_NAME.to_string()
}

fn default_generate_command() -> Vec<String> {
    ["go", "generate", "./..."].map(String::from).to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            target_root: default_target_root(),
            exceptions: default_exceptions(),
            directive_log: default_directive_log(),
            aggregate_file: default_aggregate_file(),
            generate_command: default_generate_command(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.exceptions {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'exceptions': \"{}\"", pattern))?;
        }
        if self.generate_command.is_empty() {
            bail!("'generateCommand' must name a program");
        }
        if self.directive_log.trim().is_empty() {
            bail!("'directiveLog' must not be empty");
        }
        if self.aggregate_file.trim().is_empty() {
            bail!("'aggregateFile' must not be empty");
        }
        Ok(())
    }

    /// Compiled exception patterns. Call after [`Config::validate`].
    pub fn exception_patterns(&self) -> Vec<Pattern> {
        self.exceptions
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
