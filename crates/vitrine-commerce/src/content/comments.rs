//! Product comments and reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrine_cache::{Document, ResourceFamily};

use crate::error::CommerceError;
use crate::ids::{next_id, CommentId, ProductId, UserId};
use crate::search::{Searchable, SortKey, SortValue};

const ANONYMOUS: &str = "Anonymous";

/// A comment left on a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub content: String,
    /// 1 to 5 stars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Comment {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.content.as_str(), self.user_name.as_str()]
    }

    fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        match key {
            SortKey::CreatedAt => SortValue::Time(self.created_at),
            SortKey::UpdatedAt => SortValue::Time(self.updated_at),
            SortKey::Rating => self.rating.map(f64::from).into(),
            SortKey::Name => SortValue::Text(&self.user_name),
            SortKey::Price => SortValue::Missing,
        }
    }
}

/// Fields accepted when creating or editing a comment.
///
/// Every field is optional so a malformed body degrades to "nothing given"
/// rather than failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommentDraft {
    #[serde(alias = "productId")]
    pub product_id: Option<ProductId>,
    #[serde(alias = "userId")]
    pub user_id: Option<UserId>,
    #[serde(alias = "userName", alias = "name")]
    pub user_name: Option<String>,
    #[serde(alias = "userEmail", alias = "email")]
    pub user_email: Option<String>,
    #[serde(alias = "comment", alias = "text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "crate::ids::deserialize_lenient_int")]
    pub rating: Option<i64>,
}

fn check_rating(rating: Option<i64>) -> Result<Option<u8>, CommerceError> {
    match rating {
        None => Ok(None),
        Some(r @ 1..=5) => Ok(Some(r as u8)),
        Some(r) => Err(CommerceError::InvalidRating(r)),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Every comment, stored as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommentBook {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl CommentBook {
    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn for_product(&self, product_id: ProductId) -> impl Iterator<Item = &Comment> {
        self.comments
            .iter()
            .filter(move |c| c.product_id == product_id)
    }

    /// Validate a draft and append it. The new ID is one past the highest.
    pub fn create(&mut self, draft: CommentDraft, now: DateTime<Utc>) -> Result<Comment, CommerceError> {
        let product_id = draft
            .product_id
            .ok_or_else(|| CommerceError::Validation("productId is required".to_string()))?;
        let content = non_blank(draft.content)
            .ok_or_else(|| CommerceError::Validation("content is required".to_string()))?;
        let rating = check_rating(draft.rating)?;

        let comment = Comment {
            id: CommentId::new(next_id(self.comments.iter().map(|c| c.id.get()))),
            product_id,
            user_id: draft.user_id,
            user_name: non_blank(draft.user_name).unwrap_or_else(|| ANONYMOUS.to_string()),
            user_email: non_blank(draft.user_email),
            content,
            rating,
            created_at: now,
            updated_at: now,
        };
        self.comments.push(comment.clone());
        Ok(comment)
    }

    /// Apply the fields present in a draft.
    pub fn update(
        &mut self,
        id: CommentId,
        patch: CommentDraft,
        now: DateTime<Utc>,
    ) -> Result<Comment, CommerceError> {
        let rating = check_rating(patch.rating)?;
        if patch.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(CommerceError::Validation("content cannot be empty".to_string()));
        }

        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CommerceError::CommentNotFound(id))?;

        if let Some(content) = non_blank(patch.content) {
            comment.content = content;
        }
        if rating.is_some() {
            comment.rating = rating;
        }
        if let Some(name) = non_blank(patch.user_name) {
            comment.user_name = name;
        }
        if let Some(email) = non_blank(patch.user_email) {
            comment.user_email = Some(email);
        }
        comment.updated_at = now;
        Ok(comment.clone())
    }

    pub fn delete(&mut self, id: CommentId) -> Result<Comment, CommerceError> {
        let index = self
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or(CommerceError::CommentNotFound(id))?;
        Ok(self.comments.remove(index))
    }
}

impl Document for CommentBook {
    const FAMILY: ResourceFamily = ResourceFamily::Comments;
    type Scope = ();

    fn empty(_: ()) -> Self {
        CommentBook::default()
    }
}
