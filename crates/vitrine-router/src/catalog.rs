//! Presentation-ready catalog snapshots.
//!
//! Products, categories and collections are served localized and with
//! display-ready image URLs. Building that view touches every record, so the
//! result is kept until the next refresh.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use vitrine_commerce::assets::{AssetResolver, DisplayUrls};
use vitrine_commerce::catalog::{Category, Collection, Product};
use vitrine_commerce::i18n::{Localize, Normalizer};
use vitrine_data::{Dataset, DatasetCache, LoadError};

/// A lazily built, shared snapshot.
struct Projection<T> {
    slot: RwLock<Option<Arc<Vec<T>>>>,
}

impl<T> Projection<T> {
    fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    async fn current(&self) -> Option<Arc<Vec<T>>> {
        self.slot.read().await.clone()
    }

    async fn store(&self, records: Arc<Vec<T>>) {
        *self.slot.write().await = Some(records);
    }

    async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

pub(crate) struct Catalog {
    datasets: DatasetCache,
    normalizer: Arc<dyn Normalizer>,
    product_images: AssetResolver,
    category_images: AssetResolver,
    urls: DisplayUrls,
    products: Projection<Product>,
    categories: Projection<Category>,
    collections: Projection<Collection>,
}

impl Catalog {
    pub(crate) fn new(
        datasets: DatasetCache,
        normalizer: Arc<dyn Normalizer>,
        product_images: AssetResolver,
        category_images: AssetResolver,
        urls: DisplayUrls,
    ) -> Self {
        Self {
            datasets,
            normalizer,
            product_images,
            category_images,
            urls,
            products: Projection::new(),
            categories: Projection::new(),
            collections: Projection::new(),
        }
    }

    pub(crate) fn datasets(&self) -> &DatasetCache {
        &self.datasets
    }

    pub(crate) fn urls(&self) -> &DisplayUrls {
        &self.urls
    }

    pub(crate) async fn products(&self) -> Result<Arc<Vec<Product>>, LoadError> {
        if let Some(products) = self.products.current().await {
            return Ok(products);
        }
        let raw: Arc<Vec<Product>> = self.datasets.get(Dataset::Products.name()).await?;
        let built: Arc<Vec<Product>> =
            Arc::new(raw.iter().cloned().map(|p| self.present_product(p)).collect());
        debug!(count = built.len(), "product projection built");
        self.products.store(built.clone()).await;
        Ok(built)
    }

    pub(crate) async fn categories(&self) -> Result<Arc<Vec<Category>>, LoadError> {
        if let Some(categories) = self.categories.current().await {
            return Ok(categories);
        }
        let raw: Arc<Vec<Category>> = self.datasets.get(Dataset::Categories.name()).await?;
        let built: Arc<Vec<Category>> =
            Arc::new(raw.iter().cloned().map(|c| self.present_category(c)).collect());
        self.categories.store(built.clone()).await;
        Ok(built)
    }

    pub(crate) async fn collections(&self) -> Result<Arc<Vec<Collection>>, LoadError> {
        if let Some(collections) = self.collections.current().await {
            return Ok(collections);
        }
        let raw: Arc<Vec<Collection>> = self.datasets.get(Dataset::Collections.name()).await?;
        let built: Arc<Vec<Collection>> =
            Arc::new(raw.iter().cloned().map(|c| self.present_collection(c)).collect());
        self.collections.store(built.clone()).await;
        Ok(built)
    }

    /// Drop every projection and dataset snapshot.
    pub(crate) async fn refresh(&self) {
        self.products.clear().await;
        self.categories.clear().await;
        self.collections.clear().await;
        self.datasets.refresh().await;
    }

    fn display(&self, path: Option<String>) -> Option<String> {
        path.and_then(|p| self.urls.build_display_url(&p))
    }

    fn present_product(&self, mut product: Product) -> Product {
        product.localize(self.normalizer.as_ref());
        let image = self
            .product_images
            .resolve_image(product.id.get(), product.image.as_deref());
        product.image = self.display(image);
        product.images = product
            .images
            .iter()
            .filter_map(|path| self.urls.build_display_url(path))
            .collect();
        product
    }

    fn present_category(&self, mut category: Category) -> Category {
        category.localize(self.normalizer.as_ref());
        let image = self
            .category_images
            .resolve_image(category.id.get(), category.image.as_deref());
        category.image = self.display(image);
        category
    }

    fn present_collection(&self, collection: Collection) -> Collection {
        let mut collection = collection.with_resolved_key();
        collection.localize(self.normalizer.as_ref());
        collection.image = self.display(collection.image.take());
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrine_commerce::i18n::ScriptFallback;
    use vitrine_data::{DatasetLoader, StaticSource};

    fn catalog(source: StaticSource) -> Catalog {
        Catalog::new(
            DatasetCache::new(DatasetLoader::new(source)),
            Arc::new(ScriptFallback),
            AssetResolver::new().with_manual([(2, "assets/products/two.png".to_string())]),
            AssetResolver::new().with_placeholder("assets/category.png"),
            DisplayUrls::default().with_bundle_base("/demo"),
        )
    }

    #[tokio::test]
    async fn test_products_are_presented() {
        let source = StaticSource::new().with_json(
            "products",
            &json!([
                {"id": 1, "name_ar": "قميص", "price": 10, "image": "uploads/1.jpg"},
                {"id": 2, "name_en": "Mug", "price": 5, "images": ["https://cdn/x.png", " "]}
            ]),
        );
        let products = catalog(source).products().await.unwrap();

        assert_eq!(products[0].name_en, None);
        assert!(products[0].description_en.as_deref().unwrap().contains("قميص"));
        assert_eq!(products[0].image.as_deref(), Some("/demo/uploads/1.jpg"));

        assert_eq!(products[1].image.as_deref(), Some("/assets/products/two.png"));
        assert_eq!(products[1].images, vec!["https://cdn/x.png".to_string()]);
    }

    #[tokio::test]
    async fn test_categories_use_placeholder() {
        let source = StaticSource::new().with_json("categories", &json!([{"id": 4, "name_en": "Tea"}]));
        let categories = catalog(source).categories().await.unwrap();
        assert_eq!(categories[0].image.as_deref(), Some("/assets/category.png"));
    }

    #[tokio::test]
    async fn test_projection_reused_until_refresh() {
        let source = StaticSource::new().with_json("collections", &json!([{"name_en": "New In"}]));
        let catalog = catalog(source);

        let first = catalog.collections().await.unwrap();
        let second = catalog.collections().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first[0].id.as_deref(), Some("new-in"));

        catalog.refresh().await;
        let third = catalog.collections().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }
}
