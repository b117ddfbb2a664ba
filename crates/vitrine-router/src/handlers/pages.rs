//! Static page endpoints.
//!
//! Pages come from the overlay once anything has been written, and from the
//! seed dataset until then. The first write copies the seed into the overlay.

use chrono::Utc;
use vitrine_commerce::content::{PageBook, PageDraft, StaticPage};
use vitrine_commerce::{CommerceError, PageId};
use vitrine_data::Dataset;

use super::{list, object, path_param, HandlerResult};
use crate::error::Rejection;
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::router::Services;

async fn current(svc: &Services) -> Result<PageBook, Rejection> {
    if let Some(book) = svc.pages.find(()).await? {
        return Ok(book);
    }
    let seed = svc
        .catalog
        .datasets()
        .get::<StaticPage>(Dataset::StaticPages.name())
        .await?;
    Ok(PageBook::from_seed(seed.to_vec()))
}

/// Apply a change to the current pages and store the whole book.
async fn edit<F>(svc: &Services, f: F) -> Result<StaticPage, Rejection>
where
    F: FnOnce(&mut PageBook) -> Result<StaticPage, CommerceError>,
{
    let mut book = current(svc).await?;
    let page = f(&mut book)?;
    svc.pages.save((), &book).await?;
    Ok(page)
}

/// `GET static-pages`
pub(crate) async fn list_pages(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let book = current(svc).await?;
    let published = ctx.query_flag("published");
    let header = ctx.query_flag("header");
    let footer = ctx.query_flag("footer");

    let pages = book.pages.iter().filter(|p| {
        published.map_or(true, |f| p.is_published == f)
            && header.map_or(true, |f| p.show_in_header == f)
            && footer.map_or(true, |f| p.show_in_footer == f)
    });
    list("pages", pages)
}

/// `GET static-pages/:id`
pub(crate) async fn get_page(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: PageId = path_param(ctx, "id")?;
    let book = current(svc).await?;
    let page = book
        .get(id)
        .ok_or_else(|| CommerceError::PageNotFound(id.to_string()))?;
    object(page)
}

/// `GET static-pages/slug/:slug`
pub(crate) async fn get_by_slug(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let slug = ctx.param("slug").unwrap_or_default();
    let book = current(svc).await?;
    let page = book
        .by_slug(slug)
        .ok_or_else(|| CommerceError::PageNotFound(slug.to_string()))?;
    object(page)
}

/// `POST static-pages`
pub(crate) async fn create_page(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let draft: PageDraft = ctx.body_as();
    let page = edit(svc, |book| book.create(draft, Utc::now())).await?;
    Ok(Reply::object(&page)?.with_message("Page created"))
}

/// `PUT static-pages/:id`
pub(crate) async fn update_page(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: PageId = path_param(ctx, "id")?;
    let draft: PageDraft = ctx.body_as();
    let page = edit(svc, |book| book.update(id, draft, Utc::now())).await?;
    Ok(Reply::object(&page)?.with_message("Page updated"))
}

/// `DELETE static-pages/:id`
pub(crate) async fn delete_page(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let id: PageId = path_param(ctx, "id")?;
    let page = edit(svc, |book| book.delete(id)).await?;
    Ok(Reply::object(&page)?.with_message("Page deleted"))
}
