//! Editable content: product comments and static pages.
//!
//! Both live in the overlay as a single family-wide document.

mod comments;
mod pages;

pub use comments::{Comment, CommentBook, CommentDraft};
pub use pages::{PageBook, PageDraft, StaticPage};
