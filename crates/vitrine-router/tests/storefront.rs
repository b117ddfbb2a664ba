//! End-to-end router tests over in-memory datasets and overlay.

use serde_json::{json, Value};
use vitrine_cache::ResourceFamily;
use vitrine_data::StaticSource;
use vitrine_router::{Reply, RequestOptions, RouteOutcome, Router, RouterError};

fn source() -> StaticSource {
    StaticSource::new()
        .with_json(
            "products",
            &json!([
                {"id": 1, "name_ar": "قميص", "price": 25, "category_id": 1},
                {"id": 2, "name_en": "Mug", "price": 8.5, "category_id": 1, "subcategory_id": 3, "is_featured": true},
                {"id": 3, "name_en": "Scarf", "price": 19.99, "category_id": 2, "image": "uploads/scarf.jpg"},
                {"id": 5, "name_en": "Teapot", "price": 42, "in_stock": false, "category_id": 1},
                {"id": 7, "name_en": "Tray", "price": 12, "category_id": 2,
                 "options": [{"name": "Size", "required": true,
                              "choices": [{"name": "Small", "price_modifier": 0},
                                          {"name": "Large", "price_modifier": 4}]}]}
            ]),
        )
        .with_json(
            "categories",
            &json!([
                {"id": 1, "name_en": "Kitchen"},
                {"id": 2, "name_en": "Textiles"},
                {"id": 3, "name_en": "Cups", "parent_id": 1}
            ]),
        )
        .with_json(
            "collections",
            &json!([
                {"id": "picks", "name_en": "Staff Picks", "type": "manual", "products": [5, 2, 9], "sort_order": 2},
                {"name_en": "Kitchen Deals", "type": "automated", "is_featured": true,
                 "rules": {"category_id": 1, "in_stock": true}, "sort_order": 1},
                {"id": "old", "name_en": "Old", "is_active": false}
            ]),
        )
        .with_json(
            "coupons",
            &json!([
                {"code": "SAVE10", "type": "percentage", "value": 10},
                {"code": "FIVE", "type": "fixed", "value": 5, "min_amount": 20}
            ]),
        )
        .with_json(
            "static-pages",
            &json!([
                {"id": 1, "title": "About Us", "content": "Hello", "show_in_footer": true},
                {"id": 2, "title": "Draft", "is_published": false}
            ]),
        )
        .with_json("clients", &json!([{"name": "Acme", "logo": "assets/clients/acme.png"}]))
        .with_json("testimonials", &json!([{"author": "Sam", "avatar": "https://cdn.example/sam.png"}]))
        .with_json(
            "banners",
            &json!([
                {"title": "Spring", "image": "banners/spring.jpg"},
                {"title": "Winter", "is_active": false}
            ]),
        )
}

fn router() -> Router {
    Router::builder(source()).build()
}

async fn send(router: &Router, path: &str, options: RequestOptions) -> Reply {
    router
        .request(path, options)
        .await
        .unwrap()
        .into_reply()
        .unwrap()
}

async fn get(router: &Router, path: &str) -> Reply {
    send(router, path, RequestOptions::get()).await
}

async fn post(router: &Router, path: &str, body: Value) -> Reply {
    send(router, path, RequestOptions::post().json(&body).unwrap()).await
}

fn ids(reply: &Reply) -> Vec<u64> {
    reply
        .as_list()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_unknown_path_is_unhandled() {
    let router = router();
    let outcome = router.get("/api/orders/1").await.unwrap();
    assert_eq!(outcome, RouteOutcome::Unhandled);

    let outcome = router
        .request("products", RequestOptions::delete())
        .await
        .unwrap();
    assert!(!outcome.is_handled());
}

#[tokio::test]
async fn test_missing_name_is_not_copied_across_scripts() {
    let router = router();
    let reply = get(&router, "/api/products/1").await;
    let product = reply.as_object().unwrap();

    assert_eq!(product["name_ar"], "قميص");
    assert!(product["name_en"].is_null());
    let description = product["description_en"].as_str().unwrap();
    assert!(description.contains("قميص"));
    assert!(product["description_ar"].as_str().is_some());
}

#[tokio::test]
async fn test_manual_collection_keeps_list_order() {
    let router = router();
    let reply = get(&router, "collections/picks/products").await;
    assert_eq!(ids(&reply), vec![5, 2]);

    let reply = get(&router, "collections/picks/products?limit=1").await;
    assert_eq!(ids(&reply), vec![5]);
}

#[tokio::test]
async fn test_automated_collection_by_slug() {
    let router = router();
    let reply = get(&router, "collections/kitchen-deals/products").await;
    assert_eq!(ids(&reply), vec![1, 2]);
}

#[tokio::test]
async fn test_collection_listing() {
    let router = router();
    let reply = get(&router, "collections").await;
    let list = reply.as_list().unwrap();
    let keys: Vec<&str> = list.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["kitchen-deals", "picks"]);
    assert_eq!(list.get("collections").unwrap().len(), 2);

    let featured = get(&router, "collections?featured=true").await;
    assert_eq!(featured.as_list().unwrap().len(), 1);

    let all = get(&router, "collections?all=true").await;
    assert_eq!(all.as_list().unwrap().len(), 3);

    let missing = get(&router, "collections/nope").await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_comment_pagination() {
    let router = router();
    for n in 1..=25 {
        let reply = post(
            &router,
            "comments",
            json!({"productId": 2, "content": format!("comment {}", n), "rating": 4}),
        )
        .await;
        assert!(reply.is_success());
    }

    let reply = get(&router, "comments?page=2&limit=10").await;
    assert_eq!(ids(&reply), (11..=20).collect::<Vec<_>>());

    let pagination = reply.as_list().unwrap().extra("pagination").unwrap();
    assert_eq!(pagination["total"], 25);
    assert_eq!(pagination["total_pages"], 3);
    assert_eq!(pagination["has_next"], true);
    assert_eq!(pagination["has_prev"], true);
}

#[tokio::test]
async fn test_huge_limit_puts_everything_on_one_page() {
    let router = router();
    for n in 1..=3 {
        post(&router, "comments", json!({"productId": 2, "content": format!("c{}", n)})).await;
    }

    let limit = i64::MAX;
    let reply = get(&router, &format!("comments?limit={}", limit)).await;
    assert_eq!(ids(&reply), vec![1, 2, 3]);
    let pagination = reply.as_list().unwrap().extra("pagination").unwrap();
    assert_eq!(pagination["total_pages"], 1);
    assert_eq!(pagination["has_next"], false);

    let reply = get(&router, &format!("comments?page=2&limit={}", limit)).await;
    assert!(ids(&reply).is_empty());

    let reply = get(&router, &format!("products?limit={}", limit)).await;
    assert_eq!(ids(&reply), vec![1, 2, 3, 5, 7]);
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let router = router();
    let created = post(&router, "comments", json!({"productId": 3, "comment": "Soft", "userName": "Lina"})).await;
    let id = created.as_object().unwrap()["id"].as_u64().unwrap();

    let updated = send(
        &router,
        &format!("comments/{}", id),
        RequestOptions::put().json(&json!({"rating": 5})).unwrap(),
    )
    .await;
    assert_eq!(updated.as_object().unwrap()["rating"], 5);

    let for_product = get(&router, "comments/product/3?search=soft").await;
    assert_eq!(ids(&for_product), vec![id]);
    let other = get(&router, "comments/product/2").await;
    assert!(other.as_list().unwrap().is_empty());

    let deleted = send(&router, &format!("comments/{}", id), RequestOptions::delete()).await;
    assert!(deleted.is_success());

    let missing = get(&router, &format!("comments/{}", id)).await;
    assert_eq!(missing.status(), 404);
    assert_eq!(
        missing.to_json().unwrap(),
        json!({"success": false, "message": format!("Comment not found: {}", id)})
    );
}

#[tokio::test]
async fn test_invalid_comment_is_rejected() {
    let router = router();
    let reply = post(&router, "comments", json!({"productId": 1, "rating": 9, "content": "x"})).await;
    assert_eq!(reply.status(), 400);

    let reply = send(&router, "comments", RequestOptions::post().body("{broken")).await;
    assert_eq!(reply.status(), 400);
}

#[tokio::test]
async fn test_cart_add_merges_lines() {
    let router = router();
    post(&router, "user/7/cart", json!({"productId": 3, "quantity": 2})).await;
    let reply = post(&router, "user/7/cart", json!({"productId": 3, "quantity": 1})).await;

    let cart = reply.as_list().unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["quantity"], 3);
    assert_eq!(cart.get("items").unwrap().len(), 1);
    assert_eq!(cart.extra("summary").unwrap()["item_count"], 3);
    assert_eq!(cart.extra("summary").unwrap()["subtotal"], 59.97);

    // Another user's cart is untouched.
    let other = get(&router, "user/8/cart").await;
    assert!(other.as_list().unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_add_keeps_product_when_quantity_is_malformed() {
    let router = router();
    let reply = post(&router, "user/7/cart", json!({"productId": 3, "quantity": "2"})).await;
    assert!(reply.is_success());
    assert_eq!(reply.as_list().unwrap()[0]["quantity"], 2);

    let reply = post(&router, "user/9/cart", json!({"productId": 3, "quantity": "lots"})).await;
    assert!(reply.is_success());
    let line = &reply.as_list().unwrap()[0];
    assert_eq!(line["product_id"], 3);
    assert_eq!(line["quantity"], 1);
}

#[tokio::test]
async fn test_cart_update_and_remove() {
    let router = router();
    let added = post(&router, "user/1/cart", json!({"productId": 2})).await;
    let item = added.as_list().unwrap().extra("item_id").unwrap().as_u64().unwrap();

    let updated = send(
        &router,
        &format!("user/1/cart/{}", item),
        RequestOptions::put().json(&json!({"quantity": 4})).unwrap(),
    )
    .await;
    assert_eq!(updated.as_list().unwrap()[0]["quantity"], 4);

    let removed = send(&router, &format!("user/1/cart/{}", item), RequestOptions::delete()).await;
    assert!(removed.as_list().unwrap().is_empty());

    let again = send(&router, &format!("user/1/cart/{}", item), RequestOptions::delete()).await;
    assert_eq!(again.status(), 404);

    // Item IDs are not reused after removal.
    let readded = post(&router, "user/1/cart", json!({"productId": 2})).await;
    let next = readded.as_list().unwrap().extra("item_id").unwrap().as_u64().unwrap();
    assert!(next > item);
}

#[tokio::test]
async fn test_cart_rejections() {
    let router = router();

    let reply = post(&router, "user/1/cart", json!({"productId": 99})).await;
    assert_eq!(reply.status(), 404);

    let reply = post(&router, "user/1/cart", json!({"productId": 7})).await;
    assert_eq!(reply.status(), 400);

    let reply = post(&router, "user/1/cart", json!({"productId": 2, "quantity": 0})).await;
    assert_eq!(reply.status(), 400);

    let reply = get(&router, "user/abc/cart").await;
    assert_eq!(reply.status(), 400);
}

#[tokio::test]
async fn test_cart_options_are_priced() {
    let router = router();
    let reply = post(
        &router,
        "user/3/cart",
        json!({"productId": 7, "quantity": 2, "options": {"Size": "Large"}}),
    )
    .await;
    let line = &reply.as_list().unwrap()[0];
    assert_eq!(line["pricing"]["options_price"], 4);
    assert_eq!(line["pricing"]["line_total"], 32);
}

#[tokio::test]
async fn test_cart_changes_are_broadcast() {
    let router = router();
    let mut events = router.subscribe();

    post(&router, "user/4/cart", json!({"productId": 2})).await;
    let event = events.try_recv().unwrap();
    assert_eq!(event.family, ResourceFamily::Cart);

    send(&router, "user/4/cart", RequestOptions::delete()).await;
    assert_eq!(events.try_recv().unwrap().family, ResourceFamily::Cart);
}

#[tokio::test]
async fn test_wishlist() {
    let router = router();
    post(&router, "user/2/wishlist", json!({"productId": 3})).await;
    post(&router, "user/2/wishlist/product/1", json!({})).await;
    let reply = post(&router, "user/2/wishlist", json!({"productId": 3})).await;

    assert_eq!(ids(&reply), vec![3, 1]);
    assert_eq!(reply.as_list().unwrap().get("wishlist").unwrap().len(), 2);

    let check = get(&router, "user/2/wishlist/check/3").await;
    assert_eq!(check.as_object().unwrap()["in_wishlist"], true);

    let reply = send(&router, "user/2/wishlist/3", RequestOptions::delete()).await;
    assert_eq!(ids(&reply), vec![1]);

    let check = get(&router, "user/2/wishlist/check/3").await;
    assert_eq!(check.as_object().unwrap()["in_wishlist"], false);

    let missing = post(&router, "user/2/wishlist", json!({"productId": 404})).await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_product_queries() {
    let router = router();

    let all = get(&router, "products").await;
    assert_eq!(all.as_list().unwrap().len(), 5);
    assert!(all.as_list().unwrap().extra("pagination").is_none());

    let filtered = get(&router, "products?categoryId=1&inStock=true&sortBy=price&sortOrder=desc").await;
    assert_eq!(ids(&filtered), vec![1, 2]);
    assert!(filtered.as_list().unwrap().extra("pagination").is_some());

    let priced = get(&router, "products?minPrice=10&maxPrice=20").await;
    assert_eq!(ids(&priced), vec![3, 7]);

    let featured = get(&router, "products?featured=true").await;
    assert_eq!(ids(&featured), vec![2]);

    let by_sub = get(&router, "products/subcategory/3").await;
    assert_eq!(ids(&by_sub), vec![2]);

    let missing = get(&router, "products/42").await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_display_urls_applied() {
    let router = router();
    let product = get(&router, "products/3").await;
    assert_eq!(product.as_object().unwrap()["image"], "/uploads/scarf.jpg");

    let clients = get(&router, "clients").await;
    assert_eq!(clients.as_list().unwrap()[0]["logo"], "/assets/clients/acme.png");

    let testimonials = get(&router, "testimonials").await;
    assert_eq!(testimonials.as_list().unwrap()[0]["avatar"], "https://cdn.example/sam.png");
}

#[tokio::test]
async fn test_categories() {
    let router = router();
    assert_eq!(ids(&get(&router, "categories").await), vec![1, 2]);
    assert_eq!(ids(&get(&router, "categories/1/subcategories").await), vec![3]);
    assert_eq!(ids(&get(&router, "subcategories/by-parent/1").await), vec![3]);
    assert_eq!(ids(&get(&router, "subcategories").await), vec![3]);
    assert_eq!(get(&router, "subcategories/1").await.status(), 404);
    assert_eq!(get(&router, "categories/3").await.status(), 200);
}

#[tokio::test]
async fn test_coupons() {
    let router = router();
    let quote = post(&router, "coupons/validate", json!({"code": "save10", "amount": 50})).await;
    let data = quote.as_object().unwrap();
    assert_eq!(data["discount"], 5);
    assert_eq!(data["total"], 45);

    let below = post(&router, "coupons/validate", json!({"code": "FIVE", "amount": 10})).await;
    assert_eq!(below.status(), 400);
    assert!(below.message().unwrap().contains("20.00"));

    let unknown = post(&router, "coupons/validate", json!({"code": "NOPE", "amount": 10})).await;
    assert!(!unknown.is_success());

    assert_eq!(get(&router, "coupons").await.as_list().unwrap().len(), 2);
}

#[tokio::test]
async fn test_static_pages() {
    let router = router();

    let footer = get(&router, "static-pages?footer=true").await;
    assert_eq!(ids(&footer), vec![1]);

    let about = get(&router, "static-pages/slug/about-us").await;
    assert_eq!(about.as_object().unwrap()["title"], "About Us");

    let created = post(&router, "static-pages", json!({"title": "About Us"})).await;
    let page = created.as_object().unwrap();
    assert_eq!(page["id"], 3);
    assert_eq!(page["slug"], "about-us-2");

    let published = get(&router, "static-pages?published=true").await;
    assert_eq!(ids(&published), vec![1, 3]);

    let deleted = send(&router, "static-pages/2", RequestOptions::delete()).await;
    assert!(deleted.is_success());
    assert_eq!(get(&router, "static-pages/2").await.status(), 404);
}

#[tokio::test]
async fn test_banners_active_only() {
    let router = router();
    assert_eq!(get(&router, "banners").await.as_list().unwrap().len(), 1);
    assert_eq!(get(&router, "banners?all=true").await.as_list().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_dataset_propagates() {
    let router = Router::builder(StaticSource::new()).build();
    let err = router.get("products").await.unwrap_err();
    assert!(matches!(err, RouterError::Dataset(_)));
}

#[tokio::test]
async fn test_refresh_reloads_datasets() {
    let router = router();
    get(&router, "products").await;
    assert!(!router.datasets().cached().await.is_empty());

    router.refresh().await;
    assert!(router.datasets().cached().await.is_empty());
    assert_eq!(get(&router, "products").await.as_list().unwrap().len(), 5);
}
