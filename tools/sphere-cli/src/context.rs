//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use sphere_data::FetchClient;
use sphere_storefront::HttpCatalogApi;
use tracing::debug;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    pub config: CliConfig,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file, or the nearest one found
    /// walking up from the working directory.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            None => match find_config(&cwd) {
                Some(path) => {
                    let path_str = path.to_string_lossy().to_string();
                    (CliConfig::load(&path_str)?, Some(path))
                }
                None => (CliConfig::default(), None),
            },
        };

        debug!(config = ?config_path, "configuration loaded");
        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Catalog API client for the configured endpoint.
    pub fn catalog_api(&self) -> Result<HttpCatalogApi> {
        let client = FetchClient::new(self.config.client_config())
            .with_context(|| format!("Invalid API base URL: {}", self.config.api.base_url))?;
        Ok(HttpCatalogApi::new(client))
    }
}

/// Nearest config file in `start` or one of its parents.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sphere-cli-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_find_config_walks_up() {
        let root = scratch_dir("walk");
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join(".sphere.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(root.join(".sphere.toml")));
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_find_config_prefers_sphere_toml() {
        let root = scratch_dir("prefer");
        std::fs::write(root.join("sphere.json"), "{}").unwrap();
        std::fs::write(root.join("sphere.toml"), "").unwrap();

        assert_eq!(find_config(&root), Some(root.join("sphere.toml")));
        std::fs::remove_dir_all(&root).unwrap();
    }
}
