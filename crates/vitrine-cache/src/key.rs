//! Typed document keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named category of persisted documents sharing one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFamily {
    Cart,
    Wishlist,
    Comments,
    StaticPages,
}

impl ResourceFamily {
    pub const ALL: [ResourceFamily; 4] = [
        ResourceFamily::Cart,
        ResourceFamily::Wishlist,
        ResourceFamily::Comments,
        ResourceFamily::StaticPages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceFamily::Cart => "cart",
            ResourceFamily::Wishlist => "wishlist",
            ResourceFamily::Comments => "comments",
            ResourceFamily::StaticPages => "static_pages",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which instance of a family a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// One document shared by every caller.
    Global,
    /// One document per user.
    User(u64),
}

impl From<()> for Scope {
    fn from(_: ()) -> Self {
        Scope::Global
    }
}

/// Identifies a single overlay document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey {
    pub family: ResourceFamily,
    pub scope: Scope,
}

impl DocumentKey {
    pub fn new(family: ResourceFamily, scope: impl Into<Scope>) -> Self {
        Self {
            family,
            scope: scope.into(),
        }
    }

    /// The family-wide document.
    pub fn global(family: ResourceFamily) -> Self {
        Self::new(family, Scope::Global)
    }

    /// A user's document within a family.
    pub fn user(family: ResourceFamily, user_id: u64) -> Self {
        Self::new(family, Scope::User(user_id))
    }

    /// Stable, filesystem-safe name (e.g. `cart.user-7`, `comments`).
    pub fn storage_name(&self) -> String {
        match self.scope {
            Scope::Global => self.family.as_str().to_string(),
            Scope::User(id) => format!("{}.user-{}", self.family, id),
        }
    }

    /// Inverse of [`storage_name`](Self::storage_name).
    pub fn parse(name: &str) -> Option<Self> {
        match name.split_once('.') {
            None => ResourceFamily::from_str(name).map(Self::global),
            Some((family, scope)) => {
                let family = ResourceFamily::from_str(family)?;
                let id = scope.strip_prefix("user-")?.parse().ok()?;
                Some(Self::user(family, id))
            }
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_names() {
        assert_eq!(DocumentKey::user(ResourceFamily::Cart, 7).storage_name(), "cart.user-7");
        assert_eq!(
            DocumentKey::global(ResourceFamily::StaticPages).storage_name(),
            "static_pages"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let keys = [
            DocumentKey::user(ResourceFamily::Wishlist, 42),
            DocumentKey::global(ResourceFamily::Comments),
        ];
        for key in keys {
            assert_eq!(DocumentKey::parse(&key.storage_name()), Some(key));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(DocumentKey::parse("orders"), None);
        assert_eq!(DocumentKey::parse("cart.guest-1"), None);
        assert_eq!(DocumentKey::parse("cart.user-abc"), None);
    }
}
