//! Embedded request router for the Vitrine storefront data layer.
//!
//! The router stands in for a REST backend. It takes request paths such as
//! `/api/products?page=2` or `user/7/cart`, resolves them against the
//! bundled datasets and the overlay store, and answers with backend-shaped
//! envelopes:
//!
//! ```text
//! GET  products                     -> {"success": true, "data": [...], "products": [...]}
//! GET  products/42                  -> {"success": true, "data": {...}}
//! POST user/7/cart                  -> {"success": true, "data": [...], "items": [...], "summary": {...}}
//! GET  comments/999                 -> {"success": false, "message": "Comment not found: 999"}
//! GET  orders                       -> RouteOutcome::Unhandled
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use vitrine_router::prelude::*;
//!
//! let router = Router::from_config(RouterConfig::load("vitrine.toml")?).await?;
//!
//! let outcome = router
//!     .request("user/7/cart", RequestOptions::post().json(&json!({"productId": 3, "quantity": 2}))?)
//!     .await?;
//! ```

mod catalog;
mod config;
mod error;
mod handlers;
mod pattern;
mod reply;
mod request;
mod router;
mod table;

pub use config::{generate_default_config, AssetConfig, OverlayBackend, OverlayConfig, RouterConfig};
pub use error::{ConfigError, RouterError};
pub use pattern::RoutePattern;
pub use reply::{ListEnvelope, Reply, RouteOutcome};
pub use request::{split_target, Method, QueryParams, RequestContext, RequestOptions, RouteParams};
pub use router::{Router, RouterBuilder};
pub use table::{Endpoint, Route, RouteTable};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Endpoint, ListEnvelope, Method, Reply, RequestOptions, RouteOutcome, Router, RouterConfig,
        RouterError,
    };
}
