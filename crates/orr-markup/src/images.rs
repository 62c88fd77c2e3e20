//! `![alt](image-N|options)` references to a post's attached images.

use std::sync::OnceLock;

use orr_core::entities::BlogImage;
use regex::{Captures, Regex};

use crate::escape::html_escape;

/// URL prefix under which uploaded files are served.
pub const MEDIA_URL: &str = "/media/";

fn image_ref_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"!\[([^\]]*)\]\(image[:-](\d+)(?:\|([^)]+))?\)")
            .expect("image reference regex is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Tiny,
    Small,
    Medium,
    Large,
    Xl,
    Full,
}

impl ImageSize {
    fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "tiny" => Self::Tiny,
            "small" => Self::Small,
            "medium" => Self::Medium,
            "large" => Self::Large,
            "xl" => Self::Xl,
            "full" => Self::Full,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Xl => "xl",
            Self::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePosition {
    Left,
    Center,
    Right,
}

impl ImagePosition {
    fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Presentation options parsed from the `|`-separated tail of a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    pub size: Option<ImageSize>,
    pub position: Option<ImagePosition>,
    /// Layout keywords (`float`, `inline`, `block`) and `class:` values.
    pub extra_classes: Vec<String>,
    pub caption: Option<String>,
}

impl ImageOptions {
    /// CSS classes for the `<figure>`, starting with `blog-image`.
    #[must_use]
    pub fn css_classes(&self) -> Vec<String> {
        let mut classes = vec!["blog-image".to_string()];
        if let Some(size) = self.size {
            classes.push(format!("img-{}", size.as_str()));
        }
        if let Some(position) = self.position {
            classes.push(format!("img-{}", position.as_str()));
        }
        classes.extend(self.extra_classes.iter().cloned());
        classes
    }
}

/// Parse `small|left|float|caption:"x"|class:y`.
///
/// Unknown tokens are ignored. A later size, position or caption replaces an
/// earlier one; classes accumulate.
#[must_use]
pub fn parse_image_options(raw: &str) -> ImageOptions {
    let mut options = ImageOptions::default();

    for token in raw.split('|').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(size) = ImageSize::parse(token) {
            options.size = Some(size);
        } else if let Some(position) = ImagePosition::parse(token) {
            options.position = Some(position);
        } else if matches!(token, "float" | "inline" | "block") {
            options.extra_classes.push(token.to_string());
        } else if let Some(caption) = token.strip_prefix("caption:") {
            options.caption = Some(caption.trim_matches(['"', '\'']).to_string());
        } else if let Some(class) = token.strip_prefix("class:") {
            let class = class.trim();
            if !class.is_empty() {
                options.extra_classes.push(class.to_string());
            }
        }
    }

    options
}

/// Public URL for a stored upload path.
#[must_use]
pub fn media_url(path: &str) -> String {
    if path.starts_with('/') || path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{MEDIA_URL}{path}")
    }
}

/// Replace image references with single-line `<figure>` markup.
///
/// `N` selects the image whose `order` equals `N`. References to images that
/// don't exist are left untouched. The stored alt text wins over the
/// markdown alt, and a `caption:` option wins over the stored caption.
#[must_use]
pub fn insert_blog_images(content: &str, images: &[BlogImage]) -> String {
    image_ref_regex()
        .replace_all(content, |caps: &Captures<'_>| {
            let Some(image) = caps[2]
                .parse::<i64>()
                .ok()
                .and_then(|order| images.iter().find(|img| img.order == order))
            else {
                tracing::debug!(reference = &caps[0], "blog image reference has no match");
                return caps[0].to_string();
            };

            let options = parse_image_options(caps.get(3).map_or("", |m| m.as_str()));
            let alt = if image.alt_text.is_empty() {
                &caps[1]
            } else {
                image.alt_text.as_str()
            };
            let caption = options
                .caption
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or(&image.caption);

            let mut html = format!(
                r#"<figure class="{}"><img src="{}" alt="{}" loading="lazy">"#,
                html_escape(&options.css_classes().join(" ")),
                html_escape(&media_url(&image.image)),
                html_escape(alt),
            );
            if !caption.is_empty() {
                html.push_str("<figcaption>");
                html.push_str(&html_escape(caption));
                html.push_str("</figcaption>");
            }
            html.push_str("</figure>");
            html
        })
        .into_owned()
}
