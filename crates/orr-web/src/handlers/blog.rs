//! Published blog posts.

use axum::extract::{Path, Query, State};
use orr_core::entities::{BlogCategory, BlogImage, BlogPost};
use orr_core::pagination::Page;
use orr_db::repos::blog::BlogFilter;
use serde::{Deserialize, Serialize};

use super::param;
use crate::error::WebResult;
use crate::json::Json;
use crate::state::AppState;

const RECENT_POSTS: u64 = 5;
const RELATED_POSTS: u64 = 3;

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogListPage {
    pub posts: Page<BlogPost>,
    pub categories: Vec<BlogCategory>,
    pub recent_posts: Vec<BlogPost>,
    pub search: Option<String>,
    pub category: Option<String>,
}

/// GET /blog/
pub async fn post_list(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> WebResult<Json<BlogListPage>> {
    let svc = &state.service;
    let filter = BlogFilter {
        search: param(query.search.as_deref()).map(str::to_string),
        category_slug: param(query.category.as_deref()).map(str::to_string),
    };
    let posts = svc
        .page_published_posts(&filter, state.config.general.page_size_blog, query.page.as_deref())
        .await?;

    Ok(Json(BlogListPage {
        posts,
        categories: svc.list_blog_categories().await?,
        recent_posts: svc.recent_published_posts(RECENT_POSTS).await?,
        search: filter.search,
        category: filter.category_slug,
    }))
}

#[derive(Debug, Serialize)]
pub struct BlogDetailPage {
    pub post: BlogPost,
    /// Rendered body: markdown with images inserted, or the stored HTML.
    pub processed_content: String,
    pub images: Vec<BlogImage>,
    pub related_posts: Vec<BlogPost>,
}

/// GET /blog/{slug}/
pub async fn post_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> WebResult<Json<BlogDetailPage>> {
    let svc = &state.service;
    let post = svc.get_published_post_by_slug(&slug).await?;
    let images = svc.list_blog_images(&post.id).await?;
    let processed_content = orr_markup::render_post(&post, &images);
    let related_posts = svc.related_posts(&post, RELATED_POSTS).await?;

    Ok(Json(BlogDetailPage {
        post,
        processed_content,
        images,
        related_posts,
    }))
}
