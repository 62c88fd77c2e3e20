//! Request handlers, one module per site section.
//!
//! Every handler answers JSON. Query-string filters arrive as raw strings:
//! blank values mean "no filter" and values that name no known choice
//! produce an empty result rather than an error.

pub mod accounts;
pub mod astronomy;
pub mod blog;
pub mod finance;
pub mod portfolio;
pub mod research;

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use orr_core::enums::UnknownChoice;
use orr_core::finance::{month_start, parse_month};
use orr_core::pagination::{Page, Paginator};
use serde::Serialize;

/// Body of every successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

/// Trimmed parameter value, `None` when absent or blank.
pub(crate) fn param(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse an optional choice parameter.
///
/// `Ok(None)` when the parameter is absent or blank.
pub(crate) fn choice_param<T>(raw: Option<&str>) -> Result<Option<T>, UnknownChoice>
where
    T: FromStr<Err = UnknownChoice>,
{
    param(raw).map(str::parse).transpose()
}

/// The page shown when a filter can never match.
pub(crate) fn empty_page<T>(per_page: u64) -> Page<T> {
    Page::new(Vec::new(), Paginator::new(0, per_page).page(None))
}

/// Selected `?month=YYYY-MM`, falling back to the current month.
pub(crate) fn month_param(raw: Option<&str>) -> NaiveDate {
    param(raw)
        .and_then(parse_month)
        .unwrap_or_else(|| month_start(today()))
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orr_core::enums::ObjectType;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_params_are_absent() {
        assert_eq!(param(Some("  ")), None);
        assert_eq!(param(Some(" x ")), Some("x"));
        assert_eq!(param(None), None);
    }

    #[test]
    fn choice_params() {
        assert_eq!(choice_param::<ObjectType>(None).unwrap(), None);
        assert_eq!(choice_param::<ObjectType>(Some("")).unwrap(), None);
        assert!(choice_param::<ObjectType>(Some("dragon")).is_err());
    }

    #[test]
    fn month_param_parses_or_defaults() {
        assert_eq!(
            month_param(Some("2025-02")),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
        assert_eq!(month_param(Some("garbage")), month_start(today()));
    }

    #[test]
    fn empty_page_has_one_page() {
        let page: Page<()> = empty_page(12);
        assert_eq!(page.total, 0);
        assert_eq!(page.num_pages, 1);
        assert!(!page.has_next);
    }
}
