//! Resolves a collection to the products it contains.

use std::collections::{HashMap, HashSet};

use crate::catalog::{Collection, CollectionType, Product};
use crate::ids::ProductId;

/// Products in a collection, in display order.
///
/// Manual collections keep their listed order; IDs that aren't in the
/// catalog are skipped and repeated IDs appear once. Automated collections
/// keep catalog order and include every product matching the rules. A
/// `limit` truncates the result.
pub fn resolve_collection<'a>(
    collection: &Collection,
    products: &'a [Product],
    limit: Option<usize>,
) -> Vec<&'a Product> {
    let limit = limit.unwrap_or(usize::MAX);

    match collection.kind {
        CollectionType::Manual => {
            let mut by_id: HashMap<ProductId, &Product> = HashMap::with_capacity(products.len());
            for product in products {
                by_id.entry(product.id).or_insert(product);
            }

            let mut seen = HashSet::new();
            collection
                .products
                .iter()
                .filter(|id| seen.insert(**id))
                .filter_map(|id| by_id.get(id).copied())
                .take(limit)
                .collect()
        }
        CollectionType::Automated => products
            .iter()
            .filter(|p| collection.rules.as_ref().map_or(true, |r| r.matches(p)))
            .take(limit)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CollectionRules;
    use crate::money::Money;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "One", Money::new(100)).with_category(2),
            Product::new(2, "Two", Money::new(200)),
            Product::new(3, "Three", Money::new(300)).with_category(2),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<u64> {
        products.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_manual_keeps_listed_order() {
        let products = catalog();
        let collection = Collection::manual("c", "Picks", &[3, 99, 1, 3]);
        assert_eq!(ids(&resolve_collection(&collection, &products, None)), vec![3, 1]);
    }

    #[test]
    fn test_manual_limit() {
        let products = catalog();
        let collection = Collection::manual("c", "Picks", &[2, 1, 3]);
        assert_eq!(ids(&resolve_collection(&collection, &products, Some(2))), vec![2, 1]);
    }

    #[test]
    fn test_automated_rules() {
        let products = catalog();
        let collection = Collection::automated(
            "cat-2",
            "Category two",
            CollectionRules {
                category_id: Some(crate::ids::CategoryId::new(2)),
                ..Default::default()
            },
        );
        assert_eq!(ids(&resolve_collection(&collection, &products, None)), vec![1, 3]);
        assert_eq!(ids(&resolve_collection(&collection, &products, Some(1))), vec![1]);
    }

    #[test]
    fn test_automated_is_deterministic() {
        let mut products: Vec<Product> = (1..=12)
            .map(|i| Product::new(i, format!("P{}", i), Money::new(i as i64 * 50)).with_category(i % 3))
            .collect();
        products.swap(2, 9);
        products.swap(0, 7);

        let collection = Collection::automated(
            "mid",
            "Mid range",
            CollectionRules {
                min_price: Some(Money::new(150)),
                max_price: Some(Money::new(500)),
                ..Default::default()
            },
        );

        let first = ids(&resolve_collection(&collection, &products, None));
        let second = ids(&resolve_collection(&collection, &products, None));
        assert_eq!(first, second);

        let catalog_order: Vec<u64> = products
            .iter()
            .map(|p| p.id.get())
            .filter(|id| (3..=10).contains(id))
            .collect();
        assert_eq!(first, catalog_order);
    }

    #[test]
    fn test_automated_without_rules_takes_everything() {
        let products = catalog();
        let mut collection = Collection::automated("all", "All", CollectionRules::default());
        collection.rules = None;
        assert_eq!(resolve_collection(&collection, &products, None).len(), 3);
    }
}
