//! Print or query the route table.

use anyhow::{Context as _, Result};
use serde_json::json;
use vitrine_router::{split_target, Method, RouteTable};

use super::RoutesArgs;
use crate::context::Context;
use crate::output::count;

/// Run the routes command.
pub async fn run(args: RoutesArgs, ctx: &Context) -> Result<()> {
    let table = RouteTable::storefront();
    let method = args
        .method
        .as_deref()
        .map(|m| Method::from_str(m).with_context(|| format!("Unknown method: {}", m)))
        .transpose()?;

    if let Some(path) = &args.resolve {
        let method = method.unwrap_or_default();
        let (key, query) = split_target(path, &ctx.config.api_prefix);
        let resolved = table.resolve(method, &key);

        if ctx.output.is_json() {
            ctx.output.json(&json!({
                "method": method.as_str(),
                "key": key,
                "endpoint": resolved.as_ref().map(|(e, _)| e.as_str()),
                "params": resolved.as_ref().map(|(_, p)| p),
                "query": query,
            }));
            return Ok(());
        }

        match resolved {
            Some((endpoint, params)) => {
                ctx.output.success(&format!("{} {} -> {}", method, key, endpoint));
                let mut params: Vec<_> = params.into_iter().collect();
                params.sort();
                for (name, value) in params {
                    ctx.output.kv(&name, &value);
                }
            }
            None => ctx.output.warn(&format!("{} {} is not handled", method, key)),
        }
        return Ok(());
    }

    let routes: Vec<_> = table
        .routes()
        .iter()
        .filter(|r| method.map_or(true, |m| r.method == m))
        .collect();

    if ctx.output.is_json() {
        let rows: Vec<_> = routes
            .iter()
            .map(|r| {
                json!({
                    "method": r.method.as_str(),
                    "pattern": r.pattern.as_str(),
                    "endpoint": r.endpoint.as_str(),
                    "mutation": r.endpoint.is_mutation(),
                })
            })
            .collect();
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header(&count(routes.len(), "route"));
    for route in routes {
        ctx.output.table_row(
            &[route.method.as_str(), route.pattern.as_str(), route.endpoint.as_str()],
            &[7, 42, 24],
        );
    }
    Ok(())
}
