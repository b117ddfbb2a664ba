//! Router configuration.
//!
//! Loaded from TOML or JSON depending on the file extension. Every field has
//! a default, so an empty file (or no file at all) gives a working router
//! over `./data` with an in-memory overlay.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use vitrine_commerce::assets::{default_asset_prefixes, AssetMode, AssetResolver, DisplayUrls};

use crate::error::ConfigError;

/// Top-level router configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Directory holding `{dataset}.json` files.
    pub data_dir: PathBuf,

    /// Path prefix stripped before routing (e.g. `api`).
    pub api_prefix: String,

    pub overlay: OverlayConfig,

    pub assets: AssetConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            api_prefix: "api".to_string(),
            overlay: OverlayConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

impl RouterConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if is_json(path) {
            serde_json::from_str(&content).map_err(|source| ConfigError::ParseJson {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        };

        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve relative directories against a base (usually the config
    /// file's directory).
    pub fn rebase(mut self, base: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.data_dir);
        join(&mut self.overlay.dir);
        if let Some(dir) = self.assets.product_image_dir.as_mut() {
            join(dir);
        }
        if let Some(dir) = self.assets.category_image_dir.as_mut() {
            join(dir);
        }
        self
    }

    /// The display URL builder described by the asset settings.
    pub fn display_urls(&self) -> DisplayUrls {
        let assets = &self.assets;
        DisplayUrls::new(assets.mode)
            .with_remote_base(&assets.remote_base_url)
            .with_bundle_base(&assets.bundle_base)
            .with_asset_base(&assets.asset_base)
            .with_asset_prefixes(assets.asset_prefixes.clone())
    }

    /// Image resolver for products.
    pub async fn product_images(&self) -> AssetResolver {
        let assets = &self.assets;
        build_resolver(
            &assets.product_images,
            assets.product_image_dir.as_deref(),
            &assets.product_image_prefix,
            assets.placeholder.as_deref(),
        )
        .await
    }

    /// Image resolver for categories.
    pub async fn category_images(&self) -> AssetResolver {
        let assets = &self.assets;
        build_resolver(
            &assets.category_images,
            assets.category_image_dir.as_deref(),
            &assets.category_image_prefix,
            assets.placeholder.as_deref(),
        )
        .await
    }
}

async fn build_resolver(
    manual: &BTreeMap<String, String>,
    dir: Option<&Path>,
    prefix: &str,
    placeholder: Option<&str>,
) -> AssetResolver {
    let table = manual.iter().filter_map(|(id, path)| match id.trim().parse::<u64>() {
        Ok(id) => Some((id, path.clone())),
        Err(_) => {
            warn!(id = %id, "ignoring image override with a non-numeric id");
            None
        }
    });

    let mut resolver = AssetResolver::new().with_manual(table);
    if let Some(dir) = dir {
        resolver = resolver.discover(dir, prefix).await;
    }
    if let Some(placeholder) = placeholder {
        resolver = resolver.with_placeholder(placeholder);
    }
    resolver
}

/// Where overlay documents are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayBackend {
    /// Lost when the process exits.
    #[default]
    Memory,
    /// One JSON file per document under `dir`.
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub backend: OverlayBackend,
    pub dir: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            backend: OverlayBackend::Memory,
            dir: PathBuf::from(".vitrine/overlay"),
        }
    }
}

/// Image resolution and display URL settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    pub mode: AssetMode,

    /// Host prepended to backend-relative paths in remote mode.
    pub remote_base_url: String,

    /// Prefix for backend-relative paths in bundled mode.
    pub bundle_base: String,

    /// Where the app's own asset tree is served.
    pub asset_base: String,

    /// Path prefixes that point into the app's asset tree.
    pub asset_prefixes: Vec<String>,

    /// Scanned once at startup for `{id}.{ext}` product images.
    pub product_image_dir: Option<PathBuf>,

    pub category_image_dir: Option<PathBuf>,

    /// Path recorded for discovered product images.
    pub product_image_prefix: String,

    pub category_image_prefix: String,

    /// Used when nothing else yields an image.
    pub placeholder: Option<String>,

    /// Manual product ID to image overrides.
    pub product_images: BTreeMap<String, String>,

    pub category_images: BTreeMap<String, String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            mode: AssetMode::Bundled,
            remote_base_url: "http://localhost:5000".to_string(),
            bundle_base: String::new(),
            asset_base: "/assets".to_string(),
            asset_prefixes: default_asset_prefixes(),
            product_image_dir: None,
            category_image_dir: None,
            product_image_prefix: "assets/products".to_string(),
            category_image_prefix: "assets/categories".to_string(),
            placeholder: None,
            product_images: BTreeMap::new(),
            category_images: BTreeMap::new(),
        }
    }
}

/// Generate a commented default `vitrine.toml`.
pub fn generate_default_config() -> String {
    r#"# Vitrine storefront data layer configuration

# Directory holding products.json, categories.json, ...
data_dir = "data"

# Stripped from request paths before routing
api_prefix = "api"

[overlay]
# "memory" or "file"
backend = "file"
dir = ".vitrine/overlay"

[assets]
# "bundled" for offline/demo data, "remote" for a live backend
mode = "bundled"
remote_base_url = "http://localhost:5000"
bundle_base = ""
asset_base = "/assets"
# product_image_dir = "public/assets/products"
# category_image_dir = "public/assets/categories"
# placeholder = "assets/placeholder.png"

[assets.product_images]
# "12" = "assets/products/special-12.png"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config, RouterConfig::default());
        assert_eq!(config.api_prefix, "api");
        assert_eq!(config.overlay.backend, OverlayBackend::Memory);
    }

    #[test]
    fn test_generated_config_parses() {
        let config: RouterConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.overlay.backend, OverlayBackend::File);
        assert_eq!(config.assets.mode, AssetMode::Bundled);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("vitrine.json");
        std::fs::write(&json_path, r#"{"api_prefix": "v1", "assets": {"mode": "remote"}}"#).unwrap();
        let config = RouterConfig::load(&json_path).unwrap();
        assert_eq!(config.api_prefix, "v1");
        assert_eq!(config.assets.mode, AssetMode::Remote);

        let toml_path = dir.path().join("vitrine.toml");
        config.save(&toml_path).unwrap();
        assert_eq!(RouterConfig::load(&toml_path).unwrap(), config);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RouterConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "data_dir = [").unwrap();
        assert!(matches!(RouterConfig::load(&bad), Err(ConfigError::ParseToml { .. })));
    }

    #[tokio::test]
    async fn test_manual_image_table() {
        let mut config = RouterConfig::default();
        config
            .assets
            .product_images
            .insert("12".into(), "assets/products/special.png".into());
        config.assets.product_images.insert("abc".into(), "ignored.png".into());
        config.assets.placeholder = Some("assets/none.png".into());

        let images = config.product_images().await;
        assert_eq!(images.resolve_image(12, None).as_deref(), Some("assets/products/special.png"));
        assert_eq!(images.resolve_image(13, None).as_deref(), Some("assets/none.png"));
    }

    #[test]
    fn test_rebase_relative_dirs() {
        let config = RouterConfig::default().rebase(Path::new("/srv/shop"));
        assert_eq!(config.data_dir, PathBuf::from("/srv/shop/data"));
        assert_eq!(config.overlay.dir, PathBuf::from("/srv/shop/.vitrine/overlay"));
    }
}
