//! The embedded storefront router.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, instrument};
use vitrine_cache::{ChangeEvent, FileStore, Overlay, Repository};
use vitrine_commerce::assets::AssetResolver;
use vitrine_commerce::cart::{Cart, Wishlist};
use vitrine_commerce::content::{CommentBook, PageBook};
use vitrine_commerce::i18n::{Normalizer, ScriptFallback};
use vitrine_data::{Dataset, DatasetCache, DatasetLoader, DatasetSource, DirSource};

use crate::catalog::Catalog;
use crate::config::{OverlayBackend, RouterConfig};
use crate::error::{settle, RouterError};
use crate::handlers::{self, HandlerResult};
use crate::reply::RouteOutcome;
use crate::request::{split_target, RequestContext, RequestOptions};
use crate::table::{Endpoint, RouteTable};

/// Shared state behind every handler.
pub(crate) struct Services {
    pub(crate) catalog: Catalog,
    pub(crate) carts: Repository<Cart>,
    pub(crate) wishlists: Repository<Wishlist>,
    pub(crate) comments: Repository<CommentBook>,
    pub(crate) pages: Repository<PageBook>,
}

struct Inner {
    config: RouterConfig,
    table: RouteTable,
    overlay: Overlay,
    services: Services,
}

/// Answers storefront API requests from bundled datasets and the overlay.
///
/// Cheap to clone; clones share the dataset cache and overlay.
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::builder(DirSource::new("data")).build();
///
/// match router.get("/api/products?featured=true").await? {
///     RouteOutcome::Handled(reply) => println!("{}", reply.to_json()?),
///     RouteOutcome::Unhandled => { /* go to the network */ }
/// }
/// ```
#[derive(Clone)]
pub struct Router {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("api_prefix", &self.inner.config.api_prefix)
            .field("routes", &self.inner.table.len())
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Start building a router over a dataset source.
    pub fn builder(source: impl DatasetSource + 'static) -> RouterBuilder {
        RouterBuilder::new(Arc::new(source))
    }

    /// Build a router from configuration: a directory source, the
    /// configured overlay backend and the configured image settings.
    pub async fn from_config(config: RouterConfig) -> Result<Self, RouterError> {
        let overlay = match config.overlay.backend {
            OverlayBackend::Memory => Overlay::in_memory(),
            OverlayBackend::File => Overlay::new(FileStore::open(&config.overlay.dir).await?),
        };

        let product_images = config.product_images().await;
        let category_images = config.category_images().await;

        let router = RouterBuilder::new(Arc::new(DirSource::new(&config.data_dir)))
            .product_images(product_images)
            .category_images(category_images)
            .overlay(overlay)
            .config(config)
            .build();

        info!(
            data_dir = %router.inner.config.data_dir.display(),
            overlay = ?router.inner.config.overlay.backend,
            "router ready"
        );
        Ok(router)
    }

    /// Offer a request to the router.
    ///
    /// Returns [`RouteOutcome::Unhandled`] when no route matches.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<RouteOutcome, RouterError> {
        let (key, query) = split_target(path, &self.inner.config.api_prefix);

        let Some((endpoint, params)) = self.inner.table.resolve(options.method, &key) else {
            debug!(key = %key, "no route");
            return Ok(RouteOutcome::Unhandled);
        };
        debug!(key = %key, endpoint = %endpoint, "dispatching");

        let ctx = RequestContext::new(options.method, key)
            .with_params(params)
            .with_query(query)
            .with_body(options.json_body());

        let reply = settle(self.dispatch(endpoint, &ctx).await)?;
        if !reply.is_success() {
            debug!(endpoint = %endpoint, status = reply.status(), "request rejected");
        } else if endpoint.is_mutation() {
            debug!(endpoint = %endpoint, "overlay updated");
        }
        Ok(RouteOutcome::Handled(reply))
    }

    /// Shorthand for a `GET` request.
    pub async fn get(&self, path: &str) -> Result<RouteOutcome, RouterError> {
        self.request(path, RequestOptions::get()).await
    }

    async fn dispatch(&self, endpoint: Endpoint, ctx: &RequestContext) -> HandlerResult {
        use handlers::{cart, categories, collections, comments, misc, pages, products, wishlist};

        let svc = &self.inner.services;
        match endpoint {
            Endpoint::ProductList => products::list_products(svc, ctx).await,
            Endpoint::ProductGet => products::get_product(svc, ctx).await,
            Endpoint::ProductsByCategory => products::by_category(svc, ctx).await,
            Endpoint::ProductsBySubcategory => products::by_subcategory(svc, ctx).await,

            Endpoint::CategoryList => categories::list_categories(svc, ctx).await,
            Endpoint::CategoryGet => categories::get_category(svc, ctx).await,
            Endpoint::CategoryChildren | Endpoint::SubcategoriesByParent => {
                categories::children(svc, ctx).await
            }
            Endpoint::SubcategoryList => categories::list_subcategories(svc, ctx).await,
            Endpoint::SubcategoryGet => categories::get_subcategory(svc, ctx).await,

            Endpoint::CollectionList => collections::list_collections(svc, ctx).await,
            Endpoint::CollectionGet => collections::get_collection(svc, ctx).await,
            Endpoint::CollectionProducts => collections::collection_products(svc, ctx).await,

            Endpoint::CartGet => cart::get_cart(svc, ctx).await,
            Endpoint::CartAdd => cart::add_to_cart(svc, ctx).await,
            Endpoint::CartClear => cart::clear_cart(svc, ctx).await,
            Endpoint::CartSync => cart::sync_cart(svc, ctx).await,
            Endpoint::CartUpdate => cart::update_cart_item(svc, ctx).await,
            Endpoint::CartRemove => cart::remove_cart_item(svc, ctx).await,

            Endpoint::WishlistGet => wishlist::get_wishlist(svc, ctx).await,
            Endpoint::WishlistAdd => wishlist::add_from_body(svc, ctx).await,
            Endpoint::WishlistClear => wishlist::clear(svc, ctx).await,
            Endpoint::WishlistAddProduct => wishlist::add_from_path(svc, ctx).await,
            Endpoint::WishlistRemove => wishlist::remove(svc, ctx).await,
            Endpoint::WishlistCheck => wishlist::check(svc, ctx).await,

            Endpoint::CommentList => comments::list_comments(svc, ctx).await,
            Endpoint::CommentCreate => comments::create_comment(svc, ctx).await,
            Endpoint::CommentsForProduct => comments::for_product(svc, ctx).await,
            Endpoint::CommentGet => comments::get_comment(svc, ctx).await,
            Endpoint::CommentUpdate => comments::update_comment(svc, ctx).await,
            Endpoint::CommentDelete => comments::delete_comment(svc, ctx).await,

            Endpoint::PageList => pages::list_pages(svc, ctx).await,
            Endpoint::PageCreate => pages::create_page(svc, ctx).await,
            Endpoint::PageBySlug => pages::get_by_slug(svc, ctx).await,
            Endpoint::PageGet => pages::get_page(svc, ctx).await,
            Endpoint::PageUpdate => pages::update_page(svc, ctx).await,
            Endpoint::PageDelete => pages::delete_page(svc, ctx).await,

            Endpoint::CouponList => misc::list_coupons(svc, ctx).await,
            Endpoint::CouponValidate => misc::validate(svc, ctx).await,

            Endpoint::Clients => misc::reference(svc, ctx, Dataset::Clients).await,
            Endpoint::Testimonials => misc::reference(svc, ctx, Dataset::Testimonials).await,
            Endpoint::Banners => misc::reference(svc, ctx, Dataset::Banners).await,
        }
    }

    /// Drop cached datasets and catalog projections so the next request
    /// reloads them.
    pub async fn refresh(&self) {
        self.inner.services.catalog.refresh().await;
        info!("router caches refreshed");
    }

    /// Overlay change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.overlay.subscribe()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.inner.overlay
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn datasets(&self) -> &DatasetCache {
        self.inner.services.catalog.datasets()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }
}

/// Builder for [`Router`].
pub struct RouterBuilder {
    source: Arc<dyn DatasetSource>,
    overlay: Option<Overlay>,
    config: RouterConfig,
    normalizer: Arc<dyn Normalizer>,
    product_images: AssetResolver,
    category_images: AssetResolver,
}

impl RouterBuilder {
    fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            overlay: None,
            config: RouterConfig::default(),
            normalizer: Arc::new(ScriptFallback),
            product_images: AssetResolver::new(),
            category_images: AssetResolver::new(),
        }
    }

    /// Use an existing overlay. Defaults to a fresh in-memory one.
    pub fn overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// API prefix and display URL settings. The data directory and overlay
    /// settings are only read by [`Router::from_config`].
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn product_images(mut self, resolver: AssetResolver) -> Self {
        self.product_images = resolver;
        self
    }

    pub fn category_images(mut self, resolver: AssetResolver) -> Self {
        self.category_images = resolver;
        self
    }

    pub fn build(self) -> Router {
        let overlay = self.overlay.unwrap_or_else(Overlay::in_memory);
        let datasets = DatasetCache::new(DatasetLoader::from_arc(self.source));
        let catalog = Catalog::new(
            datasets,
            self.normalizer,
            self.product_images,
            self.category_images,
            self.config.display_urls(),
        );

        let services = Services {
            catalog,
            carts: Repository::new(overlay.clone()),
            wishlists: Repository::new(overlay.clone()),
            comments: Repository::new(overlay.clone()),
            pages: Repository::new(overlay.clone()),
        };

        Router {
            inner: Arc::new(Inner {
                config: self.config,
                table: RouteTable::storefront(),
                overlay,
                services,
            }),
        }
    }
}
