//! Cart endpoints.
//!
//! Every cart endpoint answers with the whole cart: its lines under `data`
//! and `items`, plus a `summary`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use vitrine_commerce::cart::{select_options, Cart};
use vitrine_commerce::catalog::Product;
use vitrine_commerce::ids::deserialize_lenient_int;
use vitrine_commerce::{CartItemId, CommerceError, ProductId, UserId};

use super::{path_param, HandlerResult};
use crate::error::Rejection;
use crate::reply::{ListEnvelope, Reply};
use crate::request::RequestContext;
use crate::router::Services;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AddInput {
    #[serde(alias = "productId")]
    product_id: Option<ProductId>,
    #[serde(deserialize_with = "deserialize_lenient_int")]
    quantity: Option<i64>,
    options: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateInput {
    #[serde(deserialize_with = "deserialize_lenient_int")]
    quantity: Option<i64>,
    options: Option<BTreeMap<String, Value>>,
}

/// Option selections as `name -> choice`. Scalars are accepted as choices.
fn choices(raw: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
    raw.iter()
        .filter_map(|(name, value)| {
            let choice = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((name.clone(), choice))
        })
        .collect()
}

fn cart_reply(cart: &Cart) -> Result<ListEnvelope, Rejection> {
    let summary = cart.summary()?;
    Ok(ListEnvelope::from_records(&cart.items)?
        .with_alias("items")
        .with_extra("summary", &summary)?)
}

async fn find_product(svc: &Services, id: ProductId) -> Result<Product, Rejection> {
    let products = svc.catalog.products().await?;
    let product = products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or(CommerceError::ProductNotFound(id))?;
    Ok(product)
}

/// `GET user/:user/cart`
pub(crate) async fn get_cart(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let cart = svc.carts.load(user).await?;
    Ok(Reply::list(cart_reply(&cart)?))
}

/// `POST user/:user/cart` with `{productId, quantity, options}`
pub(crate) async fn add_to_cart(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let input: AddInput = ctx.body_as();
    let product_id = input
        .product_id
        .ok_or_else(|| CommerceError::Validation("productId is required".to_string()))?;
    let product = find_product(svc, product_id).await?;
    let options = select_options(&product, &choices(&input.options));
    let quantity = input.quantity.unwrap_or(1);

    let (item_id, cart) = svc
        .carts
        .try_update(user, |cart| {
            let id = cart.add_item(&product, quantity, options)?;
            Ok::<_, Rejection>((id, cart.clone()))
        })
        .await?;
    debug!(user = %user, product = %product_id, item = %item_id, "added to cart");

    Ok(Reply::list(cart_reply(&cart)?.with_extra("item_id", &item_id)?))
}

/// `PUT user/:user/cart/:item` with `{quantity, options}`
pub(crate) async fn update_cart_item(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let item_id: CartItemId = path_param(ctx, "item")?;
    let input: UpdateInput = ctx.body_as();
    let quantity = input
        .quantity
        .ok_or_else(|| CommerceError::Validation("quantity is required".to_string()))?;

    // Option modifiers are priced against the current catalog entry.
    let options = match &input.options {
        Some(raw) => {
            let cart = svc.carts.load(user).await?;
            let item = cart
                .get_item(item_id)
                .ok_or(CommerceError::CartItemNotFound(item_id))?;
            let products = svc.catalog.products().await?;
            let selected = match products.iter().find(|p| p.id == item.product_id) {
                Some(product) => select_options(product, &choices(raw)),
                None => Vec::new(),
            };
            Some(selected)
        }
        None => None,
    };

    let cart = svc
        .carts
        .try_update(user, |cart| {
            cart.update_item(item_id, quantity, options)?;
            Ok::<_, Rejection>(cart.clone())
        })
        .await?;
    Ok(Reply::list(cart_reply(&cart)?))
}

/// `DELETE user/:user/cart/:item`
pub(crate) async fn remove_cart_item(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let item_id: CartItemId = path_param(ctx, "item")?;

    let cart = svc
        .carts
        .try_update(user, |cart| {
            if !cart.remove_item(item_id) {
                return Err(Rejection::from(CommerceError::CartItemNotFound(item_id)));
            }
            Ok(cart.clone())
        })
        .await?;
    Ok(Reply::list(cart_reply(&cart)?))
}

/// `DELETE user/:user/cart`
pub(crate) async fn clear_cart(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let cart = svc
        .carts
        .update(user, |cart| {
            cart.clear();
            cart.clone()
        })
        .await?;
    Ok(Reply::list(cart_reply(&cart)?))
}

/// `POST user/:user/cart/sync`
pub(crate) async fn sync_cart(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let user: UserId = path_param(ctx, "user")?;
    let products = svc.catalog.products().await?;

    let (dropped, cart) = svc
        .carts
        .try_update(user, |cart| {
            let dropped = cart.sync(&products)?;
            Ok::<_, Rejection>((dropped, cart.clone()))
        })
        .await?;
    if dropped > 0 {
        debug!(user = %user, dropped, "cart lines dropped on sync");
    }

    Ok(Reply::list(cart_reply(&cart)?.with_extra("removed", &dropped)?))
}
