//! Comment endpoints.

use chrono::Utc;
use vitrine_commerce::content::{Comment, CommentDraft};
use vitrine_commerce::search::{ListParams, Query};
use vitrine_commerce::{CommentId, CommerceError, ProductId};

use super::{object, paged, path_param, HandlerResult};
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::router::Services;

/// Comments filtered, sorted and paginated from the query string.
///
/// Without `sortBy` comments stay in creation order.
async fn query(svc: &Services, ctx: &RequestContext, product: Option<ProductId>) -> HandlerResult {
    let book = svc.comments.load(()).await?;

    let mut query = Query::new();
    if let Some(product) = product {
        query = query.filter(move |c: &Comment| c.product_id == product);
    }
    let page = ListParams::from_query(&ctx.query)
        .apply(query)
        .run(book.comments);
    paged("comments", page)
}

/// `GET comments`
pub(crate) async fn list_comments(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let product = ctx.query_as::<ProductId>("productId");
    query(svc, ctx, product).await
}

/// `GET comments/product/:product`
pub(crate) async fn for_product(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let product: ProductId = path_param(ctx, "product")?;
    query(svc, ctx, Some(product)).await
}

/// `GET comments/:id`
pub(crate) async fn get_comment(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: CommentId = path_param(ctx, "id")?;
    let book = svc.comments.load(()).await?;
    let comment = book.get(id).ok_or(CommerceError::CommentNotFound(id))?;
    object(comment)
}

/// `POST comments`
pub(crate) async fn create_comment(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let draft: CommentDraft = ctx.body_as();
    let comment = svc
        .comments
        .try_update((), |book| book.create(draft, Utc::now()))
        .await?;
    Ok(Reply::object(&comment)?.with_message("Comment created"))
}

/// `PUT comments/:id`
pub(crate) async fn update_comment(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: CommentId = path_param(ctx, "id")?;
    let patch: CommentDraft = ctx.body_as();
    let comment = svc
        .comments
        .try_update((), |book| book.update(id, patch, Utc::now()))
        .await?;
    Ok(Reply::object(&comment)?.with_message("Comment updated"))
}

/// `DELETE comments/:id`
pub(crate) async fn delete_comment(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: CommentId = path_param(ctx, "id")?;
    let comment = svc
        .comments
        .try_update((), |book| book.delete(id))
        .await?;
    Ok(Reply::object(&comment)?.with_message("Comment deleted"))
}
