//! Image path resolution and display URL construction.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Picks the image path for a record.
///
/// Precedence is the manual table, then files discovered on disk whose stem
/// is the record ID, then the path stored on the record, then the
/// placeholder.
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    manual: HashMap<u64, String>,
    discovered: HashMap<u64, String>,
    placeholder: Option<String>,
}

impl AssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit ID to path overrides.
    pub fn with_manual(mut self, table: impl IntoIterator<Item = (u64, String)>) -> Self {
        self.manual.extend(table);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Index file names whose stem is a positive integer.
    ///
    /// When several files share an ID (`3.png`, `3.webp`) the first in
    /// sorted name order wins. Paths are recorded as `{prefix}/{file}`.
    pub fn with_discovered<I, S>(mut self, file_names: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = file_names.into_iter().map(Into::into).collect();
        names.sort();

        let prefix = prefix.trim_end_matches('/');
        for name in names {
            if let Some(id) = asset_id(&name) {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", prefix, name)
                };
                self.discovered.entry(id).or_insert(path);
            }
        }
        self
    }

    /// Scan a directory once and index its images.
    ///
    /// A missing or unreadable directory leaves the discovered table empty.
    pub async fn discover(self, dir: &Path, prefix: &str) -> Self {
        let names = match scan_files(dir).await {
            Ok(names) => names,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "image directory not readable");
                return self;
            }
        };

        let resolver = self.with_discovered(names, prefix);
        debug!(
            dir = %dir.display(),
            count = resolver.discovered.len(),
            "discovered images"
        );
        resolver
    }

    /// Number of IDs with a discovered image.
    pub fn discovered_len(&self) -> usize {
        self.discovered.len()
    }

    /// The image path for a record.
    pub fn resolve_image(&self, id: u64, record_path: Option<&str>) -> Option<String> {
        self.manual
            .get(&id)
            .or_else(|| self.discovered.get(&id))
            .cloned()
            .or_else(|| {
                record_path
                    .filter(|p| !p.trim().is_empty())
                    .map(str::to_string)
            })
            .or_else(|| self.placeholder.clone())
    }
}

/// Names of the regular files directly inside `dir`.
async fn scan_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if let (true, Ok(name)) = (is_file, entry.file_name().into_string()) {
            names.push(name);
        }
    }
    Ok(names)
}

/// The record ID a file name refers to, if its stem is a positive integer.
fn asset_id(file_name: &str) -> Option<u64> {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    };
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok().filter(|&id| id > 0)
}

/// Where relative, non-bundled image paths are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetMode {
    /// Demo data shipped with the app.
    #[default]
    Bundled,
    /// A live backend.
    Remote,
}

/// Turns stored image paths into URLs a client can load.
#[derive(Debug, Clone)]
pub struct DisplayUrls {
    mode: AssetMode,
    remote_base: String,
    bundle_base: String,
    asset_base: String,
    asset_prefixes: Vec<String>,
}

impl Default for DisplayUrls {
    fn default() -> Self {
        Self {
            mode: AssetMode::Bundled,
            remote_base: "http://localhost:5000".to_string(),
            bundle_base: String::new(),
            asset_base: "/assets".to_string(),
            asset_prefixes: default_asset_prefixes(),
        }
    }
}

/// Path prefixes that point into the app's own asset tree.
pub fn default_asset_prefixes() -> Vec<String> {
    ["/src/assets/", "src/assets/", "/assets/", "assets/"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl DisplayUrls {
    pub fn new(mode: AssetMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_remote_base(mut self, base: impl Into<String>) -> Self {
        self.remote_base = base.into();
        self
    }

    pub fn with_bundle_base(mut self, base: impl Into<String>) -> Self {
        self.bundle_base = base.into();
        self
    }

    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = base.into();
        self
    }

    pub fn with_asset_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.asset_prefixes = prefixes;
        self
    }

    pub fn mode(&self) -> AssetMode {
        self.mode
    }

    /// Build the URL to display for a stored path.
    ///
    /// Blank paths give `None`. Absolute `http(s)` and `data:` URLs pass
    /// through untouched, paths under a known asset prefix map onto the
    /// local asset tree, and anything else is joined to the bundle or
    /// remote base depending on the mode.
    pub fn build_display_url(&self, path: &str) -> Option<String> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }

        let lower = path.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:") {
            return Some(path.to_string());
        }

        if let Some(rest) = self
            .asset_prefixes
            .iter()
            .find_map(|prefix| path.strip_prefix(prefix.as_str()))
        {
            return Some(join(&self.asset_base, rest));
        }

        let base = match self.mode {
            AssetMode::Bundled => &self.bundle_base,
            AssetMode::Remote => &self.remote_base,
        };
        Some(join(base, path))
    }
}

fn join(base: &str, rest: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        rest.trim_start_matches('/')
    )
}
