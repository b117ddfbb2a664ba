//! Category and subcategory endpoints.

use vitrine_commerce::catalog::{children_of, top_level};
use vitrine_commerce::{CategoryId, CommerceError};

use super::{list, object, path_param, HandlerResult};
use crate::request::RequestContext;
use crate::router::Services;

/// `GET categories`: top-level categories only.
pub(crate) async fn list_categories(svc: &Services, _ctx: &RequestContext) -> HandlerResult {
    let categories = svc.catalog.categories().await?;
    list("categories", top_level(&categories))
}

/// `GET categories/:id`
pub(crate) async fn get_category(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: CategoryId = path_param(ctx, "id")?;
    let categories = svc.catalog.categories().await?;
    let category = categories
        .iter()
        .find(|c| c.id == id)
        .ok_or(CommerceError::CategoryNotFound(id))?;
    object(category)
}

/// `GET categories/:id/subcategories` and `GET subcategories/by-parent/:id`
pub(crate) async fn children(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: CategoryId = path_param(ctx, "id")?;
    let categories = svc.catalog.categories().await?;
    list("subcategories", children_of(&categories, id))
}

/// `GET subcategories`
pub(crate) async fn list_subcategories(svc: &Services, _ctx: &RequestContext) -> HandlerResult {
    let categories = svc.catalog.categories().await?;
    list("subcategories", categories.iter().filter(|c| !c.is_top_level()))
}

/// `GET subcategories/:id`
pub(crate) async fn get_subcategory(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: CategoryId = path_param(ctx, "id")?;
    let categories = svc.catalog.categories().await?;
    let category = categories
        .iter()
        .find(|c| c.id == id && !c.is_top_level())
        .ok_or(CommerceError::CategoryNotFound(id))?;
    object(category)
}
