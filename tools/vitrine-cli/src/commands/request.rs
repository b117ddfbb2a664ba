//! Send a single request through the embedded router.

use std::fs;

use anyhow::{bail, Context as _, Result};
use serde_json::Value;
use vitrine_router::{Method, RequestOptions, RouteOutcome};

use super::RequestArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the request command.
pub async fn run(args: RequestArgs, ctx: &Context) -> Result<()> {
    let options = build_options(&args, ctx)?;
    let router = ctx.router().await?;

    ctx.output
        .debug(&format!("{} {}", options.method, args.path));

    let reply = match router.request(&args.path, options).await? {
        RouteOutcome::Handled(reply) => reply,
        RouteOutcome::Unhandled => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "handled": false }));
                return Ok(());
            }
            bail!("No route for {} {}", args.method.to_uppercase(), args.path);
        }
    };

    let body = reply.to_json()?;
    if !ctx.output.is_json() {
        eprintln!("{} {}", status_badge(reply.status()), args.path);
    }

    if args.data_only && reply.is_success() {
        ctx.output.json(body.get("data").unwrap_or(&Value::Null));
    } else {
        ctx.output.json(&body);
    }
    Ok(())
}

fn build_options(args: &RequestArgs, ctx: &Context) -> Result<RequestOptions> {
    let method = Method::from_str(&args.method)
        .with_context(|| format!("Unknown method: {}", args.method))?;
    let mut options = RequestOptions::new(method);

    for header in &args.headers {
        let (name, value) = parse_header(header)?;
        options = options.header(name, value);
    }

    if let Some(data) = &args.data {
        let body = match data.strip_prefix('@') {
            Some(path) => {
                let path = ctx.resolve_path(path);
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read body: {}", path.display()))?
            }
            None => data.clone(),
        };
        serde_json::from_str::<Value>(&body).context("Request body is not valid JSON")?;
        options = options.body(body);
    }

    Ok(options)
}

fn parse_header(header: &str) -> Result<(&str, &str)> {
    match header.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => bail!("Header must look like `Name: value`, got: {}", header),
    }
}
