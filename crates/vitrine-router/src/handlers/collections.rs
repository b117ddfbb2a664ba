//! Collection endpoints.

use vitrine_commerce::catalog::{resolve_collection, Collection};
use vitrine_commerce::CommerceError;

use super::{list, object, HandlerResult};
use crate::error::Rejection;
use crate::request::RequestContext;
use crate::router::Services;

async fn find(svc: &Services, ctx: &RequestContext) -> Result<Collection, Rejection> {
    let key = ctx.param("key").unwrap_or_default();
    let collections = svc.catalog.collections().await?;
    let collection = collections
        .iter()
        .find(|c| c.matches_key(key))
        .cloned()
        .ok_or_else(|| CommerceError::CollectionNotFound(key.to_string()))?;
    Ok(collection)
}

/// `GET collections`
///
/// Active collections ordered by `sort_order` (unordered ones last).
/// `featured=true` keeps featured ones only; `all=true` includes inactive.
pub(crate) async fn list_collections(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let collections = svc.catalog.collections().await?;
    let include_inactive = ctx.query_flag("all").unwrap_or(false);
    let featured = ctx.query_flag("featured");

    let mut selected: Vec<&Collection> = collections
        .iter()
        .filter(|c| include_inactive || c.is_active)
        .filter(|c| featured.map_or(true, |f| c.is_featured == f))
        .collect();
    selected.sort_by_key(|c| c.sort_order.unwrap_or(i64::MAX));

    list("collections", selected)
}

/// `GET collections/:key`
pub(crate) async fn get_collection(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let collection = find(svc, ctx).await?;
    object(&collection)
}

/// `GET collections/:key/products`
pub(crate) async fn collection_products(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let collection = find(svc, ctx).await?;
    let products = svc.catalog.products().await?;
    let limit = ctx.query_as::<usize>("limit").filter(|&n| n > 0);
    list("products", resolve_collection(&collection, &products, limit))
}
