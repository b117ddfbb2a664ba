//! Product endpoints.

use vitrine_commerce::catalog::Product;
use vitrine_commerce::search::{ListParams, Query};
use vitrine_commerce::{CategoryId, CommerceError, Money, ProductId};

use super::{list, object, paged, path_param, HandlerResult};
use crate::request::RequestContext;
use crate::router::Services;

/// Query parameters that switch the listing into query mode.
const QUERY_KEYS: [&str; 11] = [
    "search",
    "categoryId",
    "subcategoryId",
    "minPrice",
    "maxPrice",
    "inStock",
    "featured",
    "sortBy",
    "sortOrder",
    "page",
    "limit",
];

fn product_query(ctx: &RequestContext) -> Query<Product> {
    let mut query = Query::new();

    if let Some(id) = ctx.query_as::<u64>("categoryId") {
        let id = CategoryId::new(id);
        query = query.filter(move |p: &Product| p.category_id == Some(id));
    }
    if let Some(id) = ctx.query_as::<u64>("subcategoryId") {
        let id = CategoryId::new(id);
        query = query.filter(move |p: &Product| p.subcategory_id == Some(id));
    }
    if let Some(min) = ctx.query_as::<f64>("minPrice").filter(|v| v.is_finite()) {
        let min = Money::from_decimal(min);
        query = query.filter(move |p: &Product| p.price >= min);
    }
    if let Some(max) = ctx.query_as::<f64>("maxPrice").filter(|v| v.is_finite()) {
        let max = Money::from_decimal(max);
        query = query.filter(move |p: &Product| p.price <= max);
    }
    if let Some(in_stock) = ctx.query_flag("inStock") {
        query = query.filter(move |p: &Product| p.in_stock == in_stock);
    }
    if let Some(featured) = ctx.query_flag("featured") {
        query = query.filter(move |p: &Product| p.is_featured == featured);
    }

    ListParams::from_query(&ctx.query).apply(query)
}

/// `GET products`
pub(crate) async fn list_products(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let products = svc.catalog.products().await?;

    if !QUERY_KEYS.iter().any(|key| ctx.query_param(key).is_some()) {
        return list("products", products.iter());
    }

    let page = product_query(ctx).run(products.iter().cloned());
    paged("products", page)
}

/// `GET products/:id`
pub(crate) async fn get_product(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: ProductId = path_param(ctx, "id")?;
    let products = svc.catalog.products().await?;
    let product = products
        .iter()
        .find(|p| p.id == id)
        .ok_or(CommerceError::ProductNotFound(id))?;
    object(product)
}

/// `GET products/category/:id`
pub(crate) async fn by_category(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: CategoryId = path_param(ctx, "id")?;
    let products = svc.catalog.products().await?;
    list("products", products.iter().filter(|p| p.category_id == Some(id)))
}

/// `GET products/subcategory/:id`
pub(crate) async fn by_subcategory(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: CategoryId = path_param(ctx, "id")?;
    let products = svc.catalog.products().await?;
    list("products", products.iter().filter(|p| p.subcategory_id == Some(id)))
}
