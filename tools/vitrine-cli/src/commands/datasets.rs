//! List the bundled datasets.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;
use vitrine_data::{Dataset, DatasetCache, DatasetLoader, DirSource};

use super::DatasetsArgs;
use crate::context::Context;
use crate::output::count;

#[derive(Serialize)]
struct DatasetInfo {
    name: String,
    records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the datasets command.
pub async fn run(args: DatasetsArgs, ctx: &Context) -> Result<()> {
    let cache = DatasetCache::new(DatasetLoader::new(DirSource::new(&ctx.config.data_dir)));

    let names: Vec<String> = match &args.name {
        Some(name) => {
            if Dataset::from_name(name).is_none() {
                ctx.output.warn(&format!("{} is not a known storefront dataset", name));
            }
            vec![name.clone()]
        }
        None => Dataset::ALL.iter().map(|d| d.name().to_string()).collect(),
    };

    let mut infos = Vec::with_capacity(names.len());
    for name in names {
        let info = match cache.get::<Value>(&name).await {
            Ok(records) => DatasetInfo {
                name,
                records: Some(records.len()),
                error: None,
            },
            Err(e) => DatasetInfo {
                name,
                records: None,
                error: Some(e.to_string()),
            },
        };
        infos.push(info);
    }

    if ctx.output.is_json() {
        ctx.output.json(&infos);
        return Ok(());
    }

    ctx.output
        .header(&format!("Datasets in {}", ctx.config.data_dir.display()));
    for info in &infos {
        match (&info.records, &info.error) {
            (Some(n), _) => ctx.output.kv(&info.name, &count(*n, "record")),
            (None, Some(e)) => ctx.output.kv(&info.name, &format!("unavailable ({})", e)),
            (None, None) => ctx.output.kv(&info.name, "unavailable"),
        }
    }

    if args.name.is_some() && infos.iter().all(|i| i.records.is_none()) {
        bail!("Dataset could not be loaded");
    }
    Ok(())
}
