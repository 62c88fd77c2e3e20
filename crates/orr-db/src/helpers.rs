//! Row-to-entity parsing helpers.
//!
//! Every repo converts a column-indexed `libsql::Row` into a typed entity.
//! These helpers isolate the decoding of the text encodings the schema uses
//! for timestamps, dates, money, JSON, and choice enums.

use chrono::{DateTime, NaiveDate, Utc};
use orr_core::enums::SkyQuality;
use rust_decimal::Decimal;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a `YYYY-MM-DD` TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` on any other shape.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a date.
pub fn parse_optional_date(s: Option<&str>) -> Result<Option<NaiveDate>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_date(s)?)),
        _ => Ok(None),
    }
}

/// Parse a money or measurement column stored as decimal text.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not a decimal number.
pub fn parse_decimal(s: &str) -> Result<Decimal, DatabaseError> {
    s.parse::<Decimal>()
        .map_err(|e| DatabaseError::Query(format!("Failed to parse decimal '{s}': {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a decimal.
pub fn parse_optional_decimal(s: Option<&str>) -> Result<Option<Decimal>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_decimal(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with every orr-core choice enum, which serialize as their stored value.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string matches no variant.
pub fn parse_optional_enum<T: serde::de::DeserializeOwned>(
    s: Option<&str>,
) -> Result<Option<T>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_enum(s)?)),
        _ => Ok(None),
    }
}

/// Decode a 1-5 sky-quality rating stored as INTEGER.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for values outside 1..=5.
pub fn parse_sky_quality(value: i64) -> Result<SkyQuality, DatabaseError> {
    u8::try_from(value)
        .ok()
        .and_then(|v| SkyQuality::try_from(v).ok())
        .ok_or_else(|| DatabaseError::Query(format!("Invalid sky quality rating {value}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a 0/1 INTEGER column as `bool`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_bool(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Parse a required JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the column holds invalid JSON.
pub fn parse_json(s: &str) -> Result<serde_json::Value, DatabaseError> {
    serde_json::from_str(s).map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_json(s)?)),
        _ => Ok(None),
    }
}

/// Encode an optional timestamp for a nullable TEXT column.
#[must_use]
pub fn opt_datetime_text(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339())
}

/// Encode an optional date for a nullable TEXT column.
#[must_use]
pub fn opt_date_text(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.to_string())
}

/// Encode an optional decimal for a nullable TEXT column.
#[must_use]
pub fn opt_decimal_text(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

/// Bind a row count or offset as an INTEGER parameter.
#[must_use]
pub fn sql_int(n: u64) -> libsql::Value {
    libsql::Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Read a `COUNT(*)` result back as an unsigned total.
#[must_use]
pub fn count_to_u64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

/// Bind an optional value, mapping `None` to SQL NULL.
#[must_use]
pub fn nullable<T: Into<libsql::Value>>(value: Option<T>) -> libsql::Value {
    value.map_or(libsql::Value::Null, Into::into)
}

/// `?1, ?2, ..., ?n` for wide INSERT statements.
#[must_use]
pub fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `%value%` pattern for `LIKE ... ESCAPE '\\'` with wildcards in `value` escaped.
#[must_use]
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Accumulates `AND`-joined conditions with numbered placeholders.
///
/// Each pushed clause writes its parameter as a bare `?`; every `?` in that
/// clause is renumbered to the same `?N`.
#[derive(Debug, Default)]
pub struct WhereBuilder {
    clauses: Vec<String>,
    params: Vec<libsql::Value>,
}

impl WhereBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition without parameters.
    pub fn raw(&mut self, clause: &str) -> &mut Self {
        self.clauses.push(clause.to_string());
        self
    }

    /// Add a condition bound to one parameter.
    pub fn bind(&mut self, clause: &str, value: impl Into<libsql::Value>) -> &mut Self {
        self.params.push(value.into());
        let placeholder = format!("?{}", self.params.len());
        self.clauses.push(clause.replace('?', &placeholder));
        self
    }

    /// ` WHERE a AND b`, or an empty string with no conditions.
    #[must_use]
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    #[must_use]
    pub fn params(&self) -> Vec<libsql::Value> {
        self.params.clone()
    }

    /// Parameters followed by `limit` and `offset`, plus the matching SQL tail.
    #[must_use]
    pub fn paged(&self, limit: u64, offset: u64) -> (String, Vec<libsql::Value>) {
        let mut params = self.params.clone();
        let n = params.len();
        params.push(sql_int(limit));
        params.push(sql_int(offset));
        (format!(" LIMIT ?{} OFFSET ?{}", n + 1, n + 2), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("2025-03-01T12:30:00+00:00")]
    #[case("2025-03-01 12:30:00")]
    fn datetime_formats(#[case] raw: &str) {
        let parsed = parse_datetime(raw).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-03-01T12:30:00+00:00");
    }

    #[test]
    fn optional_columns_treat_empty_as_none() {
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_decimal(Some("")).unwrap(), None);
        assert_eq!(parse_optional_json(Some("")).unwrap(), None);
    }

    #[test]
    fn decimal_roundtrips_through_text() {
        let amount = parse_decimal("1250000.50").unwrap();
        assert_eq!(amount.to_string(), "1250000.50");
        assert!(parse_decimal("12,5").is_err());
    }

    #[test]
    fn date_rejects_other_shapes() {
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("03/01/2025").is_err());
        assert_eq!(
            parse_date("2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn sky_quality_bounds() {
        assert_eq!(parse_sky_quality(5).unwrap(), SkyQuality::Excellent);
        assert!(parse_sky_quality(0).is_err());
        assert!(parse_sky_quality(300).is_err());
    }

    #[test]
    fn enum_from_stored_value() {
        use orr_core::enums::ResearchArea;
        let area: ResearchArea = parse_enum("AI & Machine Learning").unwrap();
        assert_eq!(area, ResearchArea::AiMachineLearning);
        assert!(parse_enum::<ResearchArea>("ai").is_err());
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("moon"), "%moon%");
    }

    #[test]
    fn where_builder_numbers_placeholders() {
        let mut filter = WhereBuilder::new();
        assert_eq!(filter.sql(), "");
        filter
            .raw("is_public = 1")
            .bind("kind = ?", "expense")
            .bind("(title LIKE ? OR notes LIKE ?)", "%x%");
        assert_eq!(
            filter.sql(),
            " WHERE is_public = 1 AND kind = ?1 AND (title LIKE ?2 OR notes LIKE ?2)"
        );
        let (tail, params) = filter.paged(6, 12);
        assert_eq!(tail, " LIMIT ?3 OFFSET ?4");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn placeholders_are_numbered() {
        assert_eq!(placeholders(3), "?1, ?2, ?3");
        assert!(matches!(nullable::<String>(None), libsql::Value::Null));
    }
}
