//! Blog repository: categories, posts, and inline images.
//!
//! Saving a post recomputes its reading time and stamps `published_at` the
//! first time it is stored as published.

use chrono::{DateTime, Utc};

use orr_core::entities::{BlogCategory, BlogImage, BlogPost};
use orr_core::enums::{ContentType, PostStatus};
use orr_core::errors::{ValidationErrors, require_max_len, require_text};
use orr_core::ids::{PREFIX_BLOG_CATEGORY, PREFIX_BLOG_IMAGE, PREFIX_POST};
use orr_core::pagination::{Page, Paginator};
use orr_core::text::{reading_time_minutes, slugify};

use crate::error::DatabaseError;
use crate::helpers::{
    WhereBuilder, count_to_u64, get_bool, get_opt_string, like_pattern, opt_datetime_text,
    parse_datetime, parse_enum, parse_optional_datetime, sql_int,
};
use crate::service::OrrService;
use crate::updates::blog::BlogPostUpdate;

const CATEGORY_COLS: &str = "id, name, slug, description";
const POST_COLS: &str = "id, title, slug, excerpt, content, content_type, status, category_id, \
     author_id, is_featured, reading_time_minutes, created_at, updated_at, published_at";
const IMAGE_COLS: &str = "id, post_id, image, caption, alt_text, sort_order";
const PUBLISHED_ORDER: &str = " ORDER BY published_at DESC, created_at DESC";

const EXCERPT_MAX: usize = 500;

fn row_to_category(row: &libsql::Row) -> Result<BlogCategory, DatabaseError> {
    Ok(BlogCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
    })
}

fn row_to_post(row: &libsql::Row) -> Result<BlogPost, DatabaseError> {
    Ok(BlogPost {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        excerpt: row.get(3)?,
        content: row.get(4)?,
        content_type: parse_enum(&row.get::<String>(5)?)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        category_id: get_opt_string(row, 7)?,
        author_id: row.get(8)?,
        is_featured: get_bool(row, 9)?,
        reading_time_minutes: row.get(10)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
        published_at: parse_optional_datetime(get_opt_string(row, 13)?.as_deref())?,
    })
}

fn row_to_image(row: &libsql::Row) -> Result<BlogImage, DatabaseError> {
    Ok(BlogImage {
        id: row.get(0)?,
        post_id: row.get(1)?,
        image: row.get(2)?,
        caption: row.get(3)?,
        alt_text: row.get(4)?,
        order: row.get(5)?,
    })
}

/// `published_at` after a save: kept if already stamped, set on first publish.
fn publish_stamp(
    status: PostStatus,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (status, current) {
        (_, Some(stamp)) => Some(stamp),
        (PostStatus::Published, None) => Some(now),
        (PostStatus::Draft, None) => None,
    }
}

#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub content_type: ContentType,
    pub status: PostStatus,
    pub category_id: Option<String>,
    pub author_id: String,
    pub is_featured: bool,
}

impl NewBlogPost {
    /// A markdown draft with no category.
    #[must_use]
    pub fn draft(
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            excerpt: String::new(),
            content: content.into(),
            content_type: ContentType::Markdown,
            status: PostStatus::Draft,
            category_id: None,
            author_id: author_id.into(),
            is_featured: false,
        }
    }
}

fn validate_post_text(errors: &mut ValidationErrors, title: &str, excerpt: &str, content: &str) {
    require_text(errors, "title", title);
    require_max_len(errors, "title", title, 200);
    require_max_len(errors, "excerpt", excerpt, EXCERPT_MAX);
    require_text(errors, "content", content);
}

/// Query-string filters for the public blog list.
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    /// Case-insensitive match on title, content, or category name.
    pub search: Option<String>,
    pub category_slug: Option<String>,
}

impl BlogFilter {
    fn to_where(&self) -> WhereBuilder {
        let mut filter = WhereBuilder::new();
        filter.bind("status = ?", PostStatus::Published.as_str());
        if let Some(ref query) = self.search {
            filter.bind(
                "(title LIKE ? ESCAPE '\\' OR content LIKE ? ESCAPE '\\' OR category_id IN \
                 (SELECT id FROM blog_categories WHERE name LIKE ? ESCAPE '\\'))",
                like_pattern(query),
            );
        }
        if let Some(ref slug) = self.category_slug {
            filter.bind(
                "category_id IN (SELECT id FROM blog_categories WHERE slug = ?)",
                slug.as_str(),
            );
        }
        filter
    }
}

impl OrrService {
    // -- categories ----------------------------------------------------------

    pub async fn create_blog_category(
        &self,
        name: &str,
        description: &str,
    ) -> Result<BlogCategory, DatabaseError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", name);
        require_max_len(&mut errors, "name", name, 100);
        errors.into_result()?;

        let id = self.db().generate_id(PREFIX_BLOG_CATEGORY).await?;
        let slug = self.unique_slug("blog_categories", &slugify(name)).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO blog_categories ({CATEGORY_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), name, slug.as_str(), description],
            )
            .await
            .map_err(|e| DatabaseError::from_write(e, &format!("blog category '{name}'")))?;

        Ok(BlogCategory {
            id,
            name: name.to_string(),
            slug,
            description: description.to_string(),
        })
    }

    pub async fn list_blog_categories(&self) -> Result<Vec<BlogCategory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CATEGORY_COLS} FROM blog_categories ORDER BY name"),
                (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }

    // -- posts ---------------------------------------------------------------

    pub async fn create_blog_post(&self, post: NewBlogPost) -> Result<BlogPost, DatabaseError> {
        let mut errors = ValidationErrors::new();
        validate_post_text(&mut errors, &post.title, &post.excerpt, &post.content);
        errors.into_result()?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_POST).await?;
        let slug = self.unique_slug("blog_posts", &slugify(&post.title)).await?;
        let reading_time = reading_time_minutes(&post.content);
        let published_at = publish_stamp(post.status, None, now);

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO blog_posts ({POST_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
                ),
                libsql::params![
                    id.as_str(),
                    post.title.as_str(),
                    slug.as_str(),
                    post.excerpt.as_str(),
                    post.content.as_str(),
                    post.content_type.as_str(),
                    post.status.as_str(),
                    post.category_id.as_deref(),
                    post.author_id.as_str(),
                    i64::from(post.is_featured),
                    reading_time,
                    now.to_rfc3339(),
                    now.to_rfc3339(),
                    opt_datetime_text(published_at)
                ],
            )
            .await?;
        tracing::debug!(%id, %slug, status = post.status.as_str(), "blog post created");

        Ok(BlogPost {
            id,
            title: post.title,
            slug,
            excerpt: post.excerpt,
            content: post.content,
            content_type: post.content_type,
            status: post.status,
            category_id: post.category_id,
            author_id: post.author_id,
            is_featured: post.is_featured,
            reading_time_minutes: reading_time,
            created_at: now,
            updated_at: now,
            published_at,
        })
    }

    pub async fn get_blog_post(&self, id: &str) -> Result<BlogPost, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {POST_COLS} FROM blog_posts WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_post(&row)
    }

    /// Drafts are reported as missing.
    pub async fn get_published_post_by_slug(&self, slug: &str) -> Result<BlogPost, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {POST_COLS} FROM blog_posts WHERE slug = ?1 AND status = ?2"),
                [slug, PostStatus::Published.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_post(&row)
    }

    pub async fn update_blog_post(
        &self,
        post_id: &str,
        update: BlogPostUpdate,
    ) -> Result<BlogPost, DatabaseError> {
        let current = self.get_blog_post(post_id).await?;

        let mut errors = ValidationErrors::new();
        validate_post_text(
            &mut errors,
            update.title.as_deref().unwrap_or(&current.title),
            update.excerpt.as_deref().unwrap_or(&current.excerpt),
            update.content.as_deref().unwrap_or(&current.content),
        );
        errors.into_result()?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.clone().into());
            idx += 1;
        }
        if let Some(ref excerpt) = update.excerpt {
            sets.push(format!("excerpt = ?{idx}"));
            params.push(excerpt.clone().into());
            idx += 1;
        }
        if let Some(ref content) = update.content {
            sets.push(format!("content = ?{idx}"));
            params.push(content.clone().into());
            idx += 1;
            sets.push(format!("reading_time_minutes = ?{idx}"));
            params.push(reading_time_minutes(content).into());
            idx += 1;
        }
        if let Some(content_type) = update.content_type {
            sets.push(format!("content_type = ?{idx}"));
            params.push(content_type.as_str().into());
            idx += 1;
        }
        if let Some(ref category_id) = update.category_id {
            sets.push(format!("category_id = ?{idx}"));
            params.push(category_id.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(is_featured) = update.is_featured {
            sets.push(format!("is_featured = ?{idx}"));
            params.push(i64::from(is_featured).into());
            idx += 1;
        }

        let now = Utc::now();
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
            let stamp = publish_stamp(status, current.published_at, now);
            if stamp != current.published_at {
                sets.push(format!("published_at = ?{idx}"));
                params.push(opt_datetime_text(stamp).map_or(libsql::Value::Null, Into::into));
                idx += 1;
            }
        }

        if sets.is_empty() {
            return Ok(current);
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(post_id.into());
        let sql = format!("UPDATE blog_posts SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        tracing::debug!(post_id, "blog post updated");

        self.get_blog_post(post_id).await
    }

    /// One page of published posts, newest first.
    pub async fn page_published_posts(
        &self,
        filter: &BlogFilter,
        per_page: u64,
        requested: Option<&str>,
    ) -> Result<Page<BlogPost>, DatabaseError> {
        let filter = filter.to_where();
        let total = self
            .count(
                &format!("SELECT COUNT(*) FROM blog_posts{}", filter.sql()),
                filter.params(),
            )
            .await?;
        let window = Paginator::new(count_to_u64(total), per_page).page(requested);
        let (tail, params) = filter.paged(window.limit, window.offset);
        let posts = self
            .query_posts(
                &format!(
                    "SELECT {POST_COLS} FROM blog_posts{}{PUBLISHED_ORDER}{tail}",
                    filter.sql()
                ),
                params,
            )
            .await?;
        Ok(Page::new(posts, window))
    }

    pub async fn recent_published_posts(&self, limit: u64) -> Result<Vec<BlogPost>, DatabaseError> {
        self.query_posts(
            &format!("SELECT {POST_COLS} FROM blog_posts WHERE status = ?1{PUBLISHED_ORDER} LIMIT ?2"),
            vec![PostStatus::Published.as_str().into(), sql_int(limit)],
        )
        .await
    }

    /// Other published posts in the same category (uncategorised matches uncategorised).
    pub async fn related_posts(
        &self,
        post: &BlogPost,
        limit: u64,
    ) -> Result<Vec<BlogPost>, DatabaseError> {
        let category: libsql::Value = post
            .category_id
            .clone()
            .map_or(libsql::Value::Null, Into::into);
        self.query_posts(
            &format!(
                "SELECT {POST_COLS} FROM blog_posts
                 WHERE category_id IS ?1 AND status = ?2 AND id != ?3{PUBLISHED_ORDER} LIMIT ?4"
            ),
            vec![
                category,
                PostStatus::Published.as_str().into(),
                post.id.clone().into(),
                sql_int(limit),
            ],
        )
        .await
    }

    async fn query_posts(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<BlogPost>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next().await? {
            posts.push(row_to_post(&row)?);
        }
        Ok(posts)
    }

    // -- images --------------------------------------------------------------

    pub async fn add_blog_image(
        &self,
        post_id: &str,
        image: &str,
        caption: &str,
        alt_text: &str,
        order: i64,
    ) -> Result<BlogImage, DatabaseError> {
        let id = self.db().generate_id(PREFIX_BLOG_IMAGE).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO blog_images ({IMAGE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![id.as_str(), post_id, image, caption, alt_text, order],
            )
            .await?;
        Ok(BlogImage {
            id,
            post_id: post_id.to_string(),
            image: image.to_string(),
            caption: caption.to_string(),
            alt_text: alt_text.to_string(),
            order,
        })
    }

    /// A post's images in display order.
    pub async fn list_blog_images(&self, post_id: &str) -> Result<Vec<BlogImage>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {IMAGE_COLS} FROM blog_images WHERE post_id = ?1 ORDER BY sort_order, id"),
                [post_id],
            )
            .await?;
        let mut images = Vec::new();
        while let Some(row) = rows.next().await? {
            images.push(row_to_image(&row)?);
        }
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::{test_service, test_user};
    use crate::updates::blog::BlogPostUpdateBuilder;

    async fn published(svc: &OrrService, author: &str, title: &str, content: &str) -> BlogPost {
        let mut post = NewBlogPost::draft(title, content, author);
        post.status = PostStatus::Published;
        svc.create_blog_post(post).await.unwrap()
    }

    #[tokio::test]
    async fn create_computes_reading_time_and_stamp() {
        let svc = test_service().await;
        let author = test_user(&svc, "ada").await;
        let body = "word ".repeat(450);

        let draft = svc
            .create_blog_post(NewBlogPost::draft("Draft", body.as_str(), author.id.as_str()))
            .await
            .unwrap();
        assert_eq!(draft.reading_time_minutes, 2);
        assert_eq!(draft.published_at, None);

        let live = published(&svc, &author.id, "Live", "short").await;
        assert_eq!(live.reading_time_minutes, 1);
        assert!(live.published_at.is_some());
    }

    #[tokio::test]
    async fn first_publish_stamps_once() {
        let svc = test_service().await;
        let author = test_user(&svc, "ada").await;
        let draft = svc
            .create_blog_post(NewBlogPost::draft("Post", "body", author.id.as_str()))
            .await
            .unwrap();

        let first = svc
            .update_blog_post(&draft.id, BlogPostUpdateBuilder::new().status(PostStatus::Published).build())
            .await
            .unwrap();
        let stamp = first.published_at.expect("stamped on publish");

        let back = svc
            .update_blog_post(&draft.id, BlogPostUpdateBuilder::new().status(PostStatus::Draft).build())
            .await
            .unwrap();
        assert_eq!(back.published_at, Some(stamp));

        let again = svc
            .update_blog_post(&draft.id, BlogPostUpdateBuilder::new().status(PostStatus::Published).build())
            .await
            .unwrap();
        assert_eq!(again.published_at, Some(stamp));
    }

    #[tokio::test]
    async fn content_update_refreshes_reading_time() {
        let svc = test_service().await;
        let author = test_user(&svc, "ada").await;
        let post = published(&svc, &author.id, "Post", "tiny").await;
        let updated = svc
            .update_blog_post(
                &post.id,
                BlogPostUpdateBuilder::new().content("w ".repeat(1000)).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.reading_time_minutes, 5);
    }

    #[tokio::test]
    async fn excerpt_limit_enforced() {
        let svc = test_service().await;
        let author = test_user(&svc, "ada").await;
        let mut post = NewBlogPost::draft("Post", "body", author.id.as_str());
        post.excerpt = "x".repeat(EXCERPT_MAX + 1);
        let err = svc.create_blog_post(post).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(ref e) if e.has("excerpt")));
    }

    #[tokio::test]
    async fn drafts_hidden_from_public_queries() {
        let svc = test_service().await;
        let author = test_user(&svc, "ada").await;
        let draft = svc
            .create_blog_post(NewBlogPost::draft("Secret", "body", author.id.as_str()))
            .await
            .unwrap();
        published(&svc, &author.id, "Public", "body").await;

        assert!(matches!(
            svc.get_published_post_by_slug(&draft.slug).await,
            Err(DatabaseError::NoResult)
        ));
        let page = svc
            .page_published_posts(&BlogFilter::default(), 6, None)
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Public");
    }

    #[tokio::test]
    async fn search_covers_title_content_and_category() {
        let svc = test_service().await;
        let author = test_user(&svc, "ada").await;
        let space = svc.create_blog_category("Deep Space", "").await.unwrap();

        published(&svc, &author.id, "Nebula notes", "gas").await;
        published(&svc, &author.id, "Other", "about a NEBULA").await;
        let mut categorised = NewBlogPost::draft("Third", "plain", author.id.as_str());
        categorised.status = PostStatus::Published;
        categorised.category_id = Some(space.id.clone());
        svc.create_blog_post(categorised).await.unwrap();

        let search = |q: &str| BlogFilter {
            search: Some(q.to_string()),
            category_slug: None,
        };
        assert_eq!(svc.page_published_posts(&search("nebula"), 6, None).await.unwrap().total, 2);
        assert_eq!(svc.page_published_posts(&search("deep"), 6, None).await.unwrap().total, 1);

        let by_category = BlogFilter {
            search: None,
            category_slug: Some(space.slug),
        };
        assert_eq!(svc.page_published_posts(&by_category, 6, None).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn images_listed_in_order() {
        let svc = test_service().await;
        let author = test_user(&svc, "ada").await;
        let post = published(&svc, &author.id, "Gallery", "![x](image-1)").await;
        svc.add_blog_image(&post.id, "blog/b.jpg", "", "", 2).await.unwrap();
        svc.add_blog_image(&post.id, "blog/a.jpg", "", "", 1).await.unwrap();

        let images = svc.list_blog_images(&post.id).await.unwrap();
        let orders: Vec<_> = images.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[tokio::test]
    async fn related_posts_share_category() {
        let svc = test_service().await;
        let author = test_user(&svc, "ada").await;
        let a = published(&svc, &author.id, "A", "x").await;
        let b = published(&svc, &author.id, "B", "x").await;
        let related = svc.related_posts(&a, 3).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, b.id);
    }
}
