//! # orr-markup
//!
//! Turns stored blog content into HTML.
//!
//! Markdown goes through `pulldown-cmark` with tables, footnotes,
//! strikethrough and task lists enabled, then through a small set of inline
//! extensions (`==mark==`, `++underline++`, `{color:..}`, `{size:..}`).
//! Before rendering, `![alt](image-N|opts)` references are swapped for
//! `<figure>` markup built from the post's attached images.

mod custom;
mod escape;
mod images;
mod render;

pub use custom::{process_custom_syntax, size_to_css};
pub use images::{
    ImageOptions, ImagePosition, ImageSize, MEDIA_URL, insert_blog_images, media_url,
    parse_image_options,
};
pub use render::{render_markdown, render_post};
