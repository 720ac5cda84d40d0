use crate::cli::Cli;
use anyhow::{Context, Result};
use growforge_core::{
    resolver::{MatchPolicy, ScanMode},
    DatasetLoader,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "growforge.yaml";

/// Runtime settings. The school table itself is compiled in; this only
/// controls where data is found and where results go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_root: PathBuf,
    pub match_policy: MatchPolicy,
    pub scan_mode: ScanMode,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            match_policy: MatchPolicy::default(),
            scan_mode: ScanMode::default(),
            output_dir: PathBuf::from("./runs"),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from '{}'", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {}", path.display()))
    }

    /// An explicit path must exist; otherwise `growforge.yaml` is used when
    /// present and built-in defaults when not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(Path::new(DEFAULT_CONFIG_FILE)),
            None => {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// Command-line flags win over file settings.
    pub fn merge_with_args(&mut self, cli: &Cli) {
        if let Some(root) = &cli.root {
            self.data_root = root.clone();
        }
        if let Some(policy) = cli.match_policy {
            self.match_policy = policy;
        }
        if let Some(scan) = cli.scan_mode {
            self.scan_mode = scan;
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
    }

    pub fn loader(&self) -> DatasetLoader {
        DatasetLoader::new()
            .with_root(&self.data_root)
            .with_match_policy(self.match_policy)
            .with_scan_mode(self.scan_mode)
    }
}
