//! Page-number pagination with forgiving page parsing.

use std::num::IntErrorKind;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Splits `total` items into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub total: u64,
    pub per_page: u64,
}

impl Paginator {
    #[must_use]
    pub const fn new(total: u64, per_page: u64) -> Self {
        Self {
            total,
            per_page: if per_page == 0 { 1 } else { per_page },
        }
    }

    /// Number of pages; an empty list still has one page.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    /// Resolve a raw `?page=` value.
    ///
    /// Missing or non-integer values (including `"2.0"`) select page 1.
    /// Any integer outside `1..=num_pages`, zero and negatives included,
    /// selects the last page.
    #[must_use]
    pub fn page(&self, requested: Option<&str>) -> PageWindow {
        let last = self.num_pages();
        let number = match requested.map(|raw| raw.trim().parse::<i64>()) {
            None => 1,
            Some(Ok(n)) if n >= 1 => u64::try_from(n).map_or(last, |n| n.min(last)),
            Some(Ok(_)) => last,
            Some(Err(err))
                if matches!(
                    err.kind(),
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                ) =>
            {
                last
            }
            Some(Err(_)) => 1,
        };
        PageWindow {
            number,
            num_pages: last,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
            total: self.total,
        }
    }
}

/// A resolved page: SQL `LIMIT`/`OFFSET` plus navigation facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

impl PageWindow {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// One page of items as returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total: window.total,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(None, 1)]
    #[case(Some("abc"), 1)]
    #[case(Some(""), 1)]
    #[case(Some("2.0"), 1)]
    #[case(Some("0"), 3)]
    #[case(Some("-3"), 3)]
    #[case(Some("2"), 2)]
    #[case(Some(" 2 "), 2)]
    #[case(Some("99"), 3)]
    #[case(Some("99999999999999999999999"), 3)]
    fn page_resolution(#[case] raw: Option<&str>, #[case] expected: u64) {
        let paginator = Paginator::new(25, 10);
        assert_eq!(paginator.page(raw).number, expected);
    }

    #[test]
    fn empty_list_has_single_page() {
        let window = Paginator::new(0, 6).page(Some("4"));
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset, 0);
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn zero_page_of_empty_list_is_first() {
        let window = Paginator::new(0, 6).page(Some("0"));
        assert_eq!(window.number, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn offset_follows_page_number() {
        let window = Paginator::new(25, 10).page(Some("3"));
        assert_eq!(window.offset, 20);
        assert_eq!(window.limit, 10);
        assert!(window.has_previous());
        assert!(!window.has_next());
    }
}
