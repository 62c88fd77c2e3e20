use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ContentType, PostStatus};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BlogCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// A blog post. `content` is stored in its source format; rendering happens
/// at read time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub content_type: ContentType,
    pub status: PostStatus,
    pub category_id: Option<String>,
    pub author_id: String,
    pub is_featured: bool,
    pub reading_time_minutes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Stamped the first time the post is saved as published.
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// An image that can be placed inline in a post with `![alt](image-N)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BlogImage {
    pub id: String,
    pub post_id: String,
    pub image: String,
    pub caption: String,
    pub alt_text: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
