use orr_core::entities::{BlogImage, BlogPost};
use orr_core::enums::ContentType;
use pulldown_cmark::{Options, Parser, html};

use crate::custom::process_custom_syntax;
use crate::images::insert_blog_images;

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render markdown to HTML, then apply the inline extensions.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, markdown_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    process_custom_syntax(&out)
}

/// Produce the HTML body of a post.
///
/// Markdown posts get image references resolved against `images` before
/// rendering. HTML posts are returned unchanged.
#[must_use]
pub fn render_post(post: &BlogPost, images: &[BlogImage]) -> String {
    match post.content_type {
        ContentType::Markdown => render_markdown(&insert_blog_images(&post.content, images)),
        ContentType::Html => post.content.clone(),
    }
}
