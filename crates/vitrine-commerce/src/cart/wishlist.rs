//! Per-user wishlists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrine_cache::{Document, ResourceFamily};

use crate::ids::{ProductId, UserId};

/// An ordered set of saved products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wishlist {
    pub user_id: UserId,
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Wishlist {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            product_ids: Vec::new(),
            updated_at: None,
        }
    }

    /// Add a product. Returns false if it was already there.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.product_ids.push(product_id);
        self.updated_at = Some(Utc::now());
        true
    }

    /// Remove a product. Returns whether it was there.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let len_before = self.product_ids.len();
        self.product_ids.retain(|id| *id != product_id);
        let removed = self.product_ids.len() < len_before;
        if removed {
            self.updated_at = Some(Utc::now());
        }
        removed
    }

    pub fn clear(&mut self) {
        self.product_ids.clear();
        self.updated_at = Some(Utc::now());
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.product_ids.contains(&product_id)
    }

    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }
}

impl Document for Wishlist {
    const FAMILY: ResourceFamily = ResourceFamily::Wishlist;
    type Scope = UserId;

    fn empty(user_id: UserId) -> Self {
        Wishlist::new(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_cache::{Overlay, Repository};

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = Wishlist::new(UserId::new(1));
        assert!(wishlist.add(ProductId::new(4)));
        assert!(!wishlist.add(ProductId::new(4)));
        assert!(wishlist.add(ProductId::new(2)));
        assert_eq!(wishlist.product_ids, vec![ProductId::new(4), ProductId::new(2)]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut wishlist = Wishlist::new(UserId::new(1));
        wishlist.add(ProductId::new(1));
        wishlist.add(ProductId::new(2));

        assert!(wishlist.remove(ProductId::new(1)));
        assert!(!wishlist.remove(ProductId::new(1)));
        assert!(wishlist.contains(ProductId::new(2)));

        wishlist.clear();
        assert!(wishlist.is_empty());
    }

    #[tokio::test]
    async fn test_wishlist_change_event() {
        let overlay = Overlay::in_memory();
        let mut events = overlay.subscribe();
        let wishlists: Repository<Wishlist> = Repository::new(overlay);

        wishlists
            .update(UserId::new(3), |w| w.add(ProductId::new(9)))
            .await
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.family, ResourceFamily::Wishlist);
        assert_eq!(event.scope, vitrine_cache::Scope::User(3));
        assert!(wishlists.load(UserId::new(3)).await.unwrap().contains(ProductId::new(9)));
    }
}
