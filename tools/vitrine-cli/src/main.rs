//! Vitrine CLI - query the storefront data layer from the command line.
//!
//! Commands:
//! - `vitrine request` - Send a request through the embedded router
//! - `vitrine datasets` - List bundled datasets and record counts
//! - `vitrine routes` - Print the route table
//! - `vitrine config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, DatasetsArgs, RequestArgs, RoutesArgs};

/// Vitrine CLI - inspect and exercise the storefront data layer
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request to the embedded router
    Request(RequestArgs),

    /// List bundled datasets
    Datasets(DatasetsArgs),

    /// Print the route table
    Routes(RoutesArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Request(args) => commands::request::run(args, &ctx).await,
        Commands::Datasets(args) => commands::datasets::run(args, &ctx).await,
        Commands::Routes(args) => commands::routes::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
