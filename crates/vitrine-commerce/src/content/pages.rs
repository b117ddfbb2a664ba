//! Editable static pages (about, shipping policy, and so on).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrine_cache::{Document, ResourceFamily};

use crate::error::CommerceError;
use crate::ids::{next_id, slugify, PageId};

fn default_true() -> bool {
    true
}

/// A static content page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaticPage {
    pub id: PageId,
    pub title: String,
    /// Derived from the title when absent.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_true", alias = "isPublished")]
    pub is_published: bool,
    #[serde(default, alias = "showInHeader")]
    pub show_in_header: bool,
    #[serde(default, alias = "showInFooter")]
    pub show_in_footer: bool,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields accepted when creating or editing a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageDraft {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "isPublished")]
    pub is_published: Option<bool>,
    #[serde(alias = "showInHeader")]
    pub show_in_header: Option<bool>,
    #[serde(alias = "showInFooter")]
    pub show_in_footer: Option<bool>,
}

/// Every static page, stored as one document.
///
/// Slugs are kept unique: a slug that collides with another page gets a
/// numeric suffix (`about`, `about-2`, `about-3`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageBook {
    #[serde(default)]
    pub pages: Vec<StaticPage>,
}

impl PageBook {
    /// Build from seed records, deriving any missing slugs.
    pub fn from_seed(pages: Vec<StaticPage>) -> Self {
        let mut book = PageBook { pages };
        for i in 0..book.pages.len() {
            if book.pages[i].slug.trim().is_empty() {
                let base = slugify(&book.pages[i].title);
                let slug = book.unique_slug(&base, Some(book.pages[i].id));
                book.pages[i].slug = slug;
            }
        }
        book
    }

    pub fn get(&self, id: PageId) -> Option<&StaticPage> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// First page with this slug.
    pub fn by_slug(&self, slug: &str) -> Option<&StaticPage> {
        let slug = slug.trim();
        self.pages.iter().find(|p| p.slug == slug)
    }

    fn unique_slug(&self, base: &str, exclude: Option<PageId>) -> String {
        let base = if base.is_empty() { "page" } else { base };
        let taken = |candidate: &str| {
            self.pages
                .iter()
                .any(|p| Some(p.id) != exclude && p.slug == candidate)
        };

        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn create(&mut self, draft: PageDraft, now: DateTime<Utc>) -> Result<StaticPage, CommerceError> {
        let title = draft
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CommerceError::Validation("title is required".to_string()))?;

        let base = draft
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&title));

        let page = StaticPage {
            id: PageId::new(next_id(self.pages.iter().map(|p| p.id.get()))),
            slug: self.unique_slug(&base, None),
            title,
            content: draft.content.unwrap_or_default(),
            is_published: draft.is_published.unwrap_or(true),
            show_in_header: draft.show_in_header.unwrap_or(false),
            show_in_footer: draft.show_in_footer.unwrap_or(false),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.pages.push(page.clone());
        Ok(page)
    }

    /// Apply the fields present in a draft.
    ///
    /// A new title doesn't change the slug; only an explicit slug does.
    pub fn update(
        &mut self,
        id: PageId,
        draft: PageDraft,
        now: DateTime<Utc>,
    ) -> Result<StaticPage, CommerceError> {
        if self.get(id).is_none() {
            return Err(CommerceError::PageNotFound(id.to_string()));
        }

        let slug = draft
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .map(|base| self.unique_slug(&base, Some(id)));

        let page = self
            .pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CommerceError::PageNotFound(id.to_string()))?;

        if let Some(title) = draft.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            page.title = title;
        }
        if let Some(slug) = slug {
            page.slug = slug;
        }
        if let Some(content) = draft.content {
            page.content = content;
        }
        if let Some(flag) = draft.is_published {
            page.is_published = flag;
        }
        if let Some(flag) = draft.show_in_header {
            page.show_in_header = flag;
        }
        if let Some(flag) = draft.show_in_footer {
            page.show_in_footer = flag;
        }
        page.updated_at = Some(now);
        Ok(page.clone())
    }

    pub fn delete(&mut self, id: PageId) -> Result<StaticPage, CommerceError> {
        let index = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CommerceError::PageNotFound(id.to_string()))?;
        Ok(self.pages.remove(index))
    }
}

impl Document for PageBook {
    const FAMILY: ResourceFamily = ResourceFamily::StaticPages;
    type Scope = ();

    fn empty(_: ()) -> Self {
        PageBook::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> PageDraft {
        PageDraft {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_seed_derives_slugs() {
        let seed: Vec<StaticPage> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "About Us"},
                {"id": 2, "title": "Returns", "slug": "returns-policy", "showInFooter": true}
            ]"#,
        )
        .unwrap();
        let book = PageBook::from_seed(seed);

        assert_eq!(book.pages[0].slug, "about-us");
        assert!(book.pages[0].is_published);
        assert_eq!(book.by_slug("returns-policy").unwrap().id, PageId::new(2));
        assert!(book.pages[1].show_in_footer);
    }

    #[test]
    fn test_create_uniquifies_slug() {
        let mut book = PageBook::default();
        let now = Utc::now();
        let a = book.create(titled("About"), now).unwrap();
        let b = book.create(titled("About"), now).unwrap();
        let c = book
            .create(PageDraft { slug: Some("About".into()), ..titled("Other") }, now)
            .unwrap();

        assert_eq!(a.slug, "about");
        assert_eq!(b.slug, "about-2");
        assert_eq!(c.slug, "about-3");
        assert_eq!(c.id, PageId::new(3));
    }

    #[test]
    fn test_create_requires_title() {
        let mut book = PageBook::default();
        assert!(matches!(
            book.create(PageDraft::default(), Utc::now()),
            Err(CommerceError::Validation(_))
        ));
    }

    #[test]
    fn test_update_keeps_own_slug() {
        let mut book = PageBook::default();
        let now = Utc::now();
        let page = book.create(titled("FAQ"), now).unwrap();

        let updated = book
            .update(
                page.id,
                PageDraft {
                    slug: Some("faq".into()),
                    title: Some("Questions".into()),
                    is_published: Some(false),
                    ..Default::default()
                },
                now,
            )
            .unwrap();
        assert_eq!(updated.slug, "faq");
        assert_eq!(updated.title, "Questions");
        assert!(!updated.is_published);
    }

    #[test]
    fn test_delete_missing() {
        let mut book = PageBook::default();
        let err = book.delete(PageId::new(4)).unwrap_err();
        assert!(err.is_not_found());
    }
}
