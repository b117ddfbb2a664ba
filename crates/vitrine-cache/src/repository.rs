//! Typed per-family document repositories.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, DocumentKey, Overlay, ResourceFamily, Scope};

/// A document shape stored in the overlay.
///
/// Each resource family has exactly one document type, and each document
/// type declares the key it is scoped by (a user ID, or `()` for one
/// family-wide document).
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// The family this document belongs to.
    const FAMILY: ResourceFamily;

    /// What identifies one instance of the document.
    type Scope: Copy + Into<Scope> + Send + Sync;

    /// The document to use when nothing has been stored yet.
    fn empty(scope: Self::Scope) -> Self;
}

/// Read-modify-write access to one family's documents.
///
/// # Example
///
/// ```rust,ignore
/// let carts: Repository<Cart> = Repository::new(overlay.clone());
///
/// let cart = carts
///     .try_update(user_id, |cart| cart.add_item(&product, 2, Vec::new()))
///     .await?;
/// ```
pub struct Repository<D> {
    overlay: Overlay,
    _marker: PhantomData<fn() -> D>,
}

impl<D> Clone for Repository<D> {
    fn clone(&self) -> Self {
        Self {
            overlay: self.overlay.clone(),
            _marker: PhantomData,
        }
    }
}

impl<D> std::fmt::Debug for Repository<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("family", &std::any::type_name::<D>())
            .finish_non_exhaustive()
    }
}

impl<D: Document> Repository<D> {
    pub fn new(overlay: Overlay) -> Self {
        Self {
            overlay,
            _marker: PhantomData,
        }
    }

    /// The key a scope's document is stored under.
    pub fn key(scope: D::Scope) -> DocumentKey {
        DocumentKey::new(D::FAMILY, scope)
    }

    /// The stored document, if any.
    pub async fn find(&self, scope: D::Scope) -> Result<Option<D>, CacheError> {
        self.overlay.get(&Self::key(scope)).await
    }

    /// The stored document, or an empty one.
    pub async fn load(&self, scope: D::Scope) -> Result<D, CacheError> {
        Ok(self
            .find(scope)
            .await?
            .unwrap_or_else(|| D::empty(scope)))
    }

    /// Replace the whole document.
    pub async fn save(&self, scope: D::Scope, document: &D) -> Result<(), CacheError> {
        self.overlay.put(&Self::key(scope), document).await
    }

    /// Remove the stored document.
    pub async fn clear(&self, scope: D::Scope) -> Result<bool, CacheError> {
        self.overlay.delete(&Self::key(scope)).await
    }

    /// Load, apply `f`, and write the whole document back.
    ///
    /// Nothing is written if `f` fails.
    pub async fn try_update<F, R, E>(&self, scope: D::Scope, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut D) -> Result<R, E>,
        E: From<CacheError>,
    {
        let mut document = self.load(scope).await?;
        let result = f(&mut document)?;
        self.save(scope, &document).await?;
        Ok(result)
    }

    /// Infallible variant of [`try_update`](Self::try_update).
    pub async fn update<F, R>(&self, scope: D::Scope, f: F) -> Result<R, CacheError>
    where
        F: FnOnce(&mut D) -> R,
    {
        self.try_update(scope, |doc| Ok::<_, CacheError>(f(doc))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Basket {
        owner: u64,
        items: Vec<String>,
    }

    #[derive(Clone, Copy)]
    struct Owner(u64);

    impl From<Owner> for Scope {
        fn from(owner: Owner) -> Self {
            Scope::User(owner.0)
        }
    }

    impl Document for Basket {
        const FAMILY: ResourceFamily = ResourceFamily::Cart;
        type Scope = Owner;

        fn empty(scope: Owner) -> Self {
            Basket {
                owner: scope.0,
                items: Vec::new(),
            }
        }
    }

    #[tokio::test]
    async fn test_load_defaults_to_empty() {
        let repo: Repository<Basket> = Repository::new(Overlay::in_memory());
        assert!(repo.find(Owner(1)).await.unwrap().is_none());
        assert_eq!(repo.load(Owner(1)).await.unwrap(), Basket::empty(Owner(1)));
    }

    #[tokio::test]
    async fn test_update_writes_whole_document() {
        let overlay = Overlay::in_memory();
        let repo: Repository<Basket> = Repository::new(overlay.clone());

        repo.update(Owner(4), |b| b.items.push("tea".into()))
            .await
            .unwrap();
        repo.update(Owner(4), |b| b.items.push("cup".into()))
            .await
            .unwrap();

        let stored: Basket = overlay
            .get(&DocumentKey::user(ResourceFamily::Cart, 4))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.items, vec!["tea", "cup"]);
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let overlay = Overlay::in_memory();
        let mut events = overlay.subscribe();
        let repo: Repository<Basket> = Repository::new(overlay);

        let result: Result<(), CacheError> = repo
            .try_update(Owner(2), |_| {
                Err(CacheError::Serialize(
                    serde_json::from_str::<u8>("x").unwrap_err(),
                ))
            })
            .await;

        assert!(result.is_err());
        assert!(repo.find(Owner(2)).await.unwrap().is_none());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let repo: Repository<Basket> = Repository::new(Overlay::in_memory());
        repo.update(Owner(1), |b| b.items.push("a".into()))
            .await
            .unwrap();
        assert!(repo.load(Owner(2)).await.unwrap().items.is_empty());
        assert!(repo.clear(Owner(1)).await.unwrap());
        assert!(repo.find(Owner(1)).await.unwrap().is_none());
    }
}
