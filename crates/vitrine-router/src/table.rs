//! The storefront route table.

use std::fmt;

use crate::pattern::RoutePattern;
use crate::request::{Method, RouteParams};

/// Every operation the router can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    // Products
    ProductList,
    ProductGet,
    ProductsByCategory,
    ProductsBySubcategory,

    // Categories
    CategoryList,
    CategoryGet,
    CategoryChildren,
    SubcategoryList,
    SubcategoryGet,
    SubcategoriesByParent,

    // Collections
    CollectionList,
    CollectionGet,
    CollectionProducts,

    // Cart
    CartGet,
    CartAdd,
    CartClear,
    CartSync,
    CartUpdate,
    CartRemove,

    // Wishlist
    WishlistGet,
    WishlistAdd,
    WishlistClear,
    WishlistAddProduct,
    WishlistRemove,
    WishlistCheck,

    // Comments
    CommentList,
    CommentCreate,
    CommentsForProduct,
    CommentGet,
    CommentUpdate,
    CommentDelete,

    // Static pages
    PageList,
    PageCreate,
    PageBySlug,
    PageGet,
    PageUpdate,
    PageDelete,

    // Coupons
    CouponList,
    CouponValidate,

    // Reference data
    Clients,
    Testimonials,
    Banners,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::ProductList => "product_list",
            Endpoint::ProductGet => "product_get",
            Endpoint::ProductsByCategory => "products_by_category",
            Endpoint::ProductsBySubcategory => "products_by_subcategory",
            Endpoint::CategoryList => "category_list",
            Endpoint::CategoryGet => "category_get",
            Endpoint::CategoryChildren => "category_children",
            Endpoint::SubcategoryList => "subcategory_list",
            Endpoint::SubcategoryGet => "subcategory_get",
            Endpoint::SubcategoriesByParent => "subcategories_by_parent",
            Endpoint::CollectionList => "collection_list",
            Endpoint::CollectionGet => "collection_get",
            Endpoint::CollectionProducts => "collection_products",
            Endpoint::CartGet => "cart_get",
            Endpoint::CartAdd => "cart_add",
            Endpoint::CartClear => "cart_clear",
            Endpoint::CartSync => "cart_sync",
            Endpoint::CartUpdate => "cart_update",
            Endpoint::CartRemove => "cart_remove",
            Endpoint::WishlistGet => "wishlist_get",
            Endpoint::WishlistAdd => "wishlist_add",
            Endpoint::WishlistClear => "wishlist_clear",
            Endpoint::WishlistAddProduct => "wishlist_add_product",
            Endpoint::WishlistRemove => "wishlist_remove",
            Endpoint::WishlistCheck => "wishlist_check",
            Endpoint::CommentList => "comment_list",
            Endpoint::CommentCreate => "comment_create",
            Endpoint::CommentsForProduct => "comments_for_product",
            Endpoint::CommentGet => "comment_get",
            Endpoint::CommentUpdate => "comment_update",
            Endpoint::CommentDelete => "comment_delete",
            Endpoint::PageList => "page_list",
            Endpoint::PageCreate => "page_create",
            Endpoint::PageBySlug => "page_by_slug",
            Endpoint::PageGet => "page_get",
            Endpoint::PageUpdate => "page_update",
            Endpoint::PageDelete => "page_delete",
            Endpoint::CouponList => "coupon_list",
            Endpoint::CouponValidate => "coupon_validate",
            Endpoint::Clients => "clients",
            Endpoint::Testimonials => "testimonials",
            Endpoint::Banners => "banners",
        }
    }

    /// Whether the endpoint writes to the overlay.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Endpoint::CartAdd
                | Endpoint::CartClear
                | Endpoint::CartSync
                | Endpoint::CartUpdate
                | Endpoint::CartRemove
                | Endpoint::WishlistAdd
                | Endpoint::WishlistClear
                | Endpoint::WishlistAddProduct
                | Endpoint::WishlistRemove
                | Endpoint::CommentCreate
                | Endpoint::CommentUpdate
                | Endpoint::CommentDelete
                | Endpoint::PageCreate
                | Endpoint::PageUpdate
                | Endpoint::PageDelete
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the route table.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: RoutePattern,
    pub endpoint: Endpoint,
}

/// Ordered `(method, pattern) -> endpoint` table. The first matching row
/// wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route.
    pub fn route(mut self, method: Method, pattern: &str, endpoint: Endpoint) -> Self {
        self.routes.push(Route {
            method,
            pattern: RoutePattern::parse(pattern),
            endpoint,
        });
        self
    }

    /// The full storefront API.
    pub fn storefront() -> Self {
        use Endpoint::*;
        use Method::{Delete, Get, Post, Put};

        Self::new()
            // Products
            .route(Get, "products", ProductList)
            .route(Get, "products/category/:id", ProductsByCategory)
            .route(Get, "products/subcategory/:id", ProductsBySubcategory)
            .route(Get, "products/:id", ProductGet)
            // Categories
            .route(Get, "categories", CategoryList)
            .route(Get, "categories/:id/subcategories", CategoryChildren)
            .route(Get, "categories/:id", CategoryGet)
            .route(Get, "subcategories", SubcategoryList)
            .route(Get, "subcategories/by-parent/:id", SubcategoriesByParent)
            .route(Get, "subcategories/:id", SubcategoryGet)
            // Collections
            .route(Get, "collections", CollectionList)
            .route(Get, "collections/:key/products", CollectionProducts)
            .route(Get, "collections/:key", CollectionGet)
            // Cart
            .route(Get, "user/:user/cart", CartGet)
            .route(Post, "user/:user/cart", CartAdd)
            .route(Delete, "user/:user/cart", CartClear)
            .route(Post, "user/:user/cart/sync", CartSync)
            .route(Put, "user/:user/cart/:item", CartUpdate)
            .route(Delete, "user/:user/cart/:item", CartRemove)
            // Wishlist
            .route(Get, "user/:user/wishlist", WishlistGet)
            .route(Post, "user/:user/wishlist", WishlistAdd)
            .route(Delete, "user/:user/wishlist", WishlistClear)
            .route(Get, "user/:user/wishlist/check/:product", WishlistCheck)
            .route(Post, "user/:user/wishlist/product/:product", WishlistAddProduct)
            .route(Delete, "user/:user/wishlist/product/:product", WishlistRemove)
            .route(Delete, "user/:user/wishlist/:product", WishlistRemove)
            // Comments
            .route(Get, "comments", CommentList)
            .route(Post, "comments", CommentCreate)
            .route(Get, "comments/product/:product", CommentsForProduct)
            .route(Get, "comments/:id", CommentGet)
            .route(Put, "comments/:id", CommentUpdate)
            .route(Delete, "comments/:id", CommentDelete)
            // Static pages
            .route(Get, "static-pages", PageList)
            .route(Post, "static-pages", PageCreate)
            .route(Get, "static-pages/slug/:slug", PageBySlug)
            .route(Get, "static-pages/:id", PageGet)
            .route(Put, "static-pages/:id", PageUpdate)
            .route(Delete, "static-pages/:id", PageDelete)
            // Coupons
            .route(Get, "coupons", CouponList)
            .route(Post, "coupons/validate", CouponValidate)
            // Reference data
            .route(Get, "clients", Clients)
            .route(Get, "testimonials", Testimonials)
            .route(Get, "banners", Banners)
    }

    /// Find the endpoint for a request.
    pub fn resolve(&self, method: Method, path: &str) -> Option<(Endpoint, RouteParams)> {
        self.routes
            .iter()
            .filter(|r| r.method == method)
            .find_map(|r| r.pattern.matches(path).map(|params| (r.endpoint, params)))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
