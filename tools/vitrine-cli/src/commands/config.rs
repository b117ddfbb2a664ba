//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use vitrine_router::{generate_default_config, OverlayBackend, RouterConfig};

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    ctx.output.kv("data_dir", &config.data_dir.display().to_string());
    ctx.output.kv("api_prefix", &config.api_prefix);

    ctx.output.info("");
    ctx.output.info("[overlay]");
    ctx.output.kv("backend", &format!("{:?}", config.overlay.backend).to_lowercase());
    ctx.output.kv("dir", &config.overlay.dir.display().to_string());

    let assets = &config.assets;
    ctx.output.info("");
    ctx.output.info("[assets]");
    ctx.output.kv("mode", &format!("{:?}", assets.mode).to_lowercase());
    ctx.output.kv("remote_base_url", &assets.remote_base_url);
    ctx.output.kv("asset_base", &assets.asset_base);
    if let Some(dir) = &assets.product_image_dir {
        ctx.output.kv("product_image_dir", &dir.display().to_string());
    }
    if let Some(dir) = &assets.category_image_dir {
        ctx.output.kv("category_image_dir", &dir.display().to_string());
    }
    if let Some(placeholder) = &assets.placeholder {
        ctx.output.kv("placeholder", placeholder);
    }
    if !assets.product_images.is_empty() {
        ctx.output.kv("product_images", &format!("{} mapped", assets.product_images.len()));
    }
    if !assets.category_images.is_empty() {
        ctx.output.kv("category_images", &format!("{} mapped", assets.category_images.len()));
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

/// Problems with a configuration, as `(errors, warnings)`.
fn check(config: &RouterConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !config.data_dir.is_dir() {
        errors.push(format!("data_dir does not exist: {}", config.data_dir.display()));
    }

    if config.api_prefix.contains('?') {
        errors.push("api_prefix must not contain a query string".to_string());
    }

    if config.overlay.backend == OverlayBackend::Memory {
        warnings.push("overlay.backend is memory; carts and comments are lost on exit".to_string());
    }

    let assets = &config.assets;
    for (label, dir) in [
        ("product_image_dir", &assets.product_image_dir),
        ("category_image_dir", &assets.category_image_dir),
    ] {
        if let Some(dir) = dir {
            if !dir.is_dir() {
                warnings.push(format!("assets.{} does not exist: {}", label, dir.display()));
            }
        }
    }

    for (label, map) in [
        ("product_images", &assets.product_images),
        ("category_images", &assets.category_images),
    ] {
        for key in map.keys() {
            if key.parse::<u64>().is_err() {
                warnings.push(format!("assets.{} has a non-numeric ID: {}", label, key));
            }
        }
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = RouterConfig::default().rebase(dir.path());

        let (errors, warnings) = check(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("data_dir"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_check_flags_bad_image_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();

        let mut config = RouterConfig::default().rebase(dir.path());
        config.overlay.backend = OverlayBackend::File;
        config
            .assets
            .product_images
            .insert("shirt".to_string(), "a.png".to_string());

        let (errors, warnings) = check(&config);
        assert!(errors.is_empty());
        assert_eq!(warnings, vec!["assets.product_images has a non-numeric ID: shirt"]);
    }
}
