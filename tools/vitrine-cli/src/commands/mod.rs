//! CLI command implementations.

pub mod config;
pub mod datasets;
pub mod request;
pub mod routes;

use clap::{Args, Subcommand};

/// Arguments for the request command.
#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, DELETE, ...).
    pub method: String,

    /// Request path, e.g. `/api/products?page=2` or `user/7/cart`.
    pub path: String,

    /// JSON request body. Prefix with `@` to read it from a file.
    #[arg(short, long)]
    pub data: Option<String>,

    /// Extra header as `Name: value`. May be repeated.
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Print only the `data` field of a successful reply.
    #[arg(long)]
    pub data_only: bool,
}

/// Arguments for the datasets command.
#[derive(Args)]
pub struct DatasetsArgs {
    /// Show only this dataset.
    pub name: Option<String>,
}

/// Arguments for the routes command.
#[derive(Args)]
pub struct RoutesArgs {
    /// Show only routes for this method.
    #[arg(short, long)]
    pub method: Option<String>,

    /// Resolve a path against the table instead of listing it.
    #[arg(long)]
    pub resolve: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
