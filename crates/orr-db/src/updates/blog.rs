//! Blog post update builder.

use orr_core::enums::{ContentType, PostStatus};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogPostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

pub struct BlogPostUpdateBuilder(BlogPostUpdate);

impl BlogPostUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(BlogPostUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.0.excerpt = Some(excerpt.into());
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.0.content = Some(content.into());
        self
    }

    #[must_use]
    pub const fn content_type(mut self, content_type: ContentType) -> Self {
        self.0.content_type = Some(content_type);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: PostStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Option<String>) -> Self {
        self.0.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub const fn is_featured(mut self, is_featured: bool) -> Self {
        self.0.is_featured = Some(is_featured);
        self
    }

    #[must_use]
    pub fn build(self) -> BlogPostUpdate {
        self.0
    }
}

impl Default for BlogPostUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
