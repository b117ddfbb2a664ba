//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::debug;
use vitrine_router::{Router, RouterConfig};

use crate::output::Output;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["vitrine.toml", ".vitrine.toml", "vitrine.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Router configuration, with directories resolved.
    pub config: RouterConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file, or the nearest one found
    /// walking up from the working directory.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            None => find_config(&cwd),
        };

        let config = match &config_path {
            Some(path) => {
                let base = path.parent().unwrap_or(cwd.as_path()).to_path_buf();
                RouterConfig::load(path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?
                    .rebase(&base)
            }
            None => RouterConfig::default().rebase(&cwd),
        };
        debug!(
            config = ?config_path,
            data_dir = %config.data_dir.display(),
            "configuration loaded"
        );

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Build a router from the loaded configuration.
    pub async fn router(&self) -> Result<Router> {
        self.output.debug(&format!("data dir: {}", self.config.data_dir.display()));
        Router::from_config(self.config.clone())
            .await
            .context("Failed to start router")
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Find a config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if let Some(found) = CONFIG_NAMES
            .iter()
            .map(|name| current.join(name))
            .find(|path| path.is_file())
        {
            return Some(found);
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("vitrine.toml"), "api_prefix = \"api\"\n").unwrap();

        let found = find_config(&nested).unwrap();
        assert_eq!(found, dir.path().join("vitrine.toml"));
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("vitrine.toml"), "").unwrap();
        std::fs::write(nested.join("vitrine.json"), "{}").unwrap();

        assert_eq!(find_config(&nested).unwrap(), nested.join("vitrine.json"));
    }

    #[test]
    fn test_resolve() {
        let cwd = Path::new("/srv/shop");
        assert_eq!(resolve(cwd, "data"), PathBuf::from("/srv/shop/data"));
        assert_eq!(resolve(cwd, "/etc/vitrine.toml"), PathBuf::from("/etc/vitrine.toml"));
    }
}
