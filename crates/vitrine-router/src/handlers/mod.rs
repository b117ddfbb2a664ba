//! Endpoint handlers, one module per resource group.
//!
//! Handlers return `Result<Reply, Rejection>`: domain errors become failure
//! replies at dispatch, loader and storage errors escape the router.

pub(crate) mod cart;
pub(crate) mod categories;
pub(crate) mod collections;
pub(crate) mod comments;
pub(crate) mod misc;
pub(crate) mod pages;
pub(crate) mod products;
pub(crate) mod wishlist;

use std::str::FromStr;

use serde::Serialize;
use vitrine_commerce::search::Page;
use vitrine_commerce::CommerceError;

use crate::error::Rejection;
use crate::reply::{ListEnvelope, Reply};
use crate::request::RequestContext;

pub(crate) type HandlerResult = Result<Reply, Rejection>;

/// A typed path parameter. Unparseable values are a validation failure.
pub(crate) fn path_param<T: FromStr>(ctx: &RequestContext, name: &str) -> Result<T, CommerceError> {
    let raw = ctx.param(name).unwrap_or_default();
    raw.trim()
        .parse()
        .map_err(|_| CommerceError::Validation(format!("invalid {}: {:?}", name, raw)))
}

/// A list reply that also exposes the records under `alias`.
pub(crate) fn list<T: Serialize>(alias: &str, records: impl IntoIterator<Item = T>) -> HandlerResult {
    Ok(Reply::list(ListEnvelope::from_records(records)?.with_alias(alias)))
}

/// A list reply with a `pagination` extra.
pub(crate) fn paged<T: Serialize>(alias: &str, page: Page<T>) -> HandlerResult {
    let envelope = ListEnvelope::from_records(page.items)?
        .with_alias(alias)
        .with_extra("pagination", &page.pagination)?;
    Ok(Reply::list(envelope))
}

pub(crate) fn object<T: Serialize>(record: &T) -> HandlerResult {
    Ok(Reply::object(record)?)
}
