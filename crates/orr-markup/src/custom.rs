//! Inline extensions applied to rendered HTML.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::escape::html_escape;

fn mark_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"==(.*?)==").expect("mark regex is valid"))
}

fn underline_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\+\+(.*?)\+\+").expect("underline regex is valid"))
}

fn color_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\{color:([^}]+)\}(.*?)\{/color\}").expect("color regex is valid")
    })
}

fn size_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\{size:([^}]+)\}(.*?)\{/size\}").expect("size regex is valid")
    })
}

/// Map a named size to a CSS length; unknown names pass through unchanged.
#[must_use]
pub fn size_to_css(name: &str) -> &str {
    match name {
        "small" => "0.875rem",
        "normal" => "1rem",
        "large" => "1.25rem",
        "xl" => "1.5rem",
        "xxl" => "2rem",
        other => other,
    }
}

/// Apply highlight, underline, colour and size tags.
///
/// Each tag must open and close on the same line. Colour and size values are
/// attribute-escaped; the wrapped text is left as-is since it is already
/// HTML.
#[must_use]
pub fn process_custom_syntax(html: &str) -> String {
    let out = mark_regex().replace_all(html, "<mark>$1</mark>");
    let out = underline_regex().replace_all(&out, "<u>$1</u>");
    let out = color_regex().replace_all(&out, |caps: &Captures<'_>| {
        format!(
            r#"<span style="color: {}">{}</span>"#,
            html_escape(&caps[1]),
            &caps[2]
        )
    });
    let out = size_regex().replace_all(&out, |caps: &Captures<'_>| {
        format!(
            r#"<span style="font-size: {}">{}</span>"#,
            html_escape(size_to_css(&caps[1])),
            &caps[2]
        )
    });
    out.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("==hot== take", "<mark>hot</mark> take")]
    #[case("++under++", "<u>under</u>")]
    #[case("{color:red}warn{/color}", r#"<span style="color: red">warn</span>"#)]
    #[case("{size:large}big{/size}", r#"<span style="font-size: 1.25rem">big</span>"#)]
    #[case("{size:3em}big{/size}", r#"<span style="font-size: 3em">big</span>"#)]
    #[case("a == b", "a == b")]
    #[case("no tags here", "no tags here")]
    fn converts_tags(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(process_custom_syntax(input), expected);
    }

    #[test]
    fn multiple_tags_on_one_line() {
        assert_eq!(
            process_custom_syntax("==a== and ==b=="),
            "<mark>a</mark> and <mark>b</mark>"
        );
    }

    #[test]
    fn tags_do_not_span_lines() {
        assert_eq!(process_custom_syntax("==a\nb=="), "==a\nb==");
    }

    #[test]
    fn idempotent_on_converted_output() {
        let once = process_custom_syntax("==x== ++y++ {color:blue}z{/color} {size:xl}w{/size}");
        assert_eq!(process_custom_syntax(&once), once);
    }

    #[test]
    fn color_value_cannot_break_out_of_attribute() {
        let out = process_custom_syntax(r#"{color:red" onmouseover="x}t{/color}"#);
        assert_eq!(
            out,
            r#"<span style="color: red&quot; onmouseover=&quot;x">t</span>"#
        );
    }

    #[rstest]
    #[case("small", "0.875rem")]
    #[case("normal", "1rem")]
    #[case("xxl", "2rem")]
    #[case("huge", "huge")]
    fn size_mapping(#[case] name: &str, #[case] css: &str) {
        assert_eq!(size_to_css(name), css);
    }
}
