//! Wishlist endpoints.

use serde::{Deserialize, Serialize};
use vitrine_commerce::cart::Wishlist;
use vitrine_commerce::{CommerceError, ProductId, UserId};

use super::{object, path_param, HandlerResult};
use crate::error::Rejection;
use crate::reply::{ListEnvelope, Reply};
use crate::request::RequestContext;
use crate::router::Services;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AddInput {
    #[serde(alias = "productId")]
    product_id: Option<ProductId>,
}

#[derive(Debug, Serialize)]
struct Membership {
    in_wishlist: bool,
    product_id: ProductId,
}

/// The wishlisted products in wishlist order. IDs no longer in the catalog
/// are left out of the products but kept in `product_ids`.
async fn wishlist_reply(svc: &Services, wishlist: &Wishlist) -> HandlerResult {
    let products = svc.catalog.products().await?;
    let listed = wishlist
        .product_ids
        .iter()
        .filter_map(|id| products.iter().find(|p| p.id == *id));

    let envelope = ListEnvelope::from_records(listed)?
        .with_alias("wishlist")
        .with_extra("product_ids", &wishlist.product_ids)?;
    Ok(Reply::list(envelope))
}

async fn ensure_product(svc: &Services, id: ProductId) -> Result<(), Rejection> {
    let products = svc.catalog.products().await?;
    if products.iter().any(|p| p.id == id) {
        Ok(())
    } else {
        Err(CommerceError::ProductNotFound(id).into())
    }
}

async fn add(svc: &Services, user: UserId, product_id: ProductId) -> HandlerResult {
    ensure_product(svc, product_id).await?;
    let wishlist = svc
        .wishlists
        .update(user, |wishlist| {
            wishlist.add(product_id);
            wishlist.clone()
        })
        .await?;
    wishlist_reply(svc, &wishlist).await
}

/// `GET user/:user/wishlist`
pub(crate) async fn get_wishlist(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let wishlist = svc.wishlists.load(user).await?;
    wishlist_reply(svc, &wishlist).await
}

/// `POST user/:user/wishlist` with `{productId}`
pub(crate) async fn add_from_body(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let input: AddInput = ctx.body_as();
    let product_id = input
        .product_id
        .ok_or_else(|| CommerceError::Validation("productId is required".to_string()))?;
    add(svc, user, product_id).await
}

/// `POST user/:user/wishlist/product/:product`
pub(crate) async fn add_from_path(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let product_id: ProductId = path_param(ctx, "product")?;
    add(svc, user, product_id).await
}

/// `DELETE user/:user/wishlist/:product` (and `.../product/:product`)
///
/// Removing a product that isn't saved is not an error.
pub(crate) async fn remove(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let product_id: ProductId = path_param(ctx, "product")?;
    let wishlist = svc
        .wishlists
        .update(user, |wishlist| {
            wishlist.remove(product_id);
            wishlist.clone()
        })
        .await?;
    wishlist_reply(svc, &wishlist).await
}

/// `DELETE user/:user/wishlist`
pub(crate) async fn clear(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let wishlist = svc
        .wishlists
        .update(user, |wishlist| {
            wishlist.clear();
            wishlist.clone()
        })
        .await?;
    wishlist_reply(svc, &wishlist).await
}

/// `GET user/:user/wishlist/check/:product`
pub(crate) async fn check(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let product_id: ProductId = path_param(ctx, "product")?;
    let wishlist = svc.wishlists.load(user).await?;
    object(&Membership {
        in_wishlist: wishlist.contains(product_id),
        product_id,
    })
}
