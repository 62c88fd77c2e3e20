//! Submitted payloads for everything a signed-in user or visitor can create.
//!
//! Handlers deserialize these from JSON bodies, call `validate`, and hand the
//! result to the repositories. Validation never touches the database;
//! ownership checks and uniqueness live in `orr-db`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{
    ExpenseField, Priority, ResearchField, ResearchStatus, SkyQuality, TransactionKind,
};
use crate::errors::{ValidationErrors, require_max_len, require_percentage, require_text};
use crate::finance::parse_month;

/// Normalize a submitted `data_schema` value into a JSON object.
///
/// Missing, `null` and blank strings become `{}`; strings are parsed as JSON.
///
/// # Errors
///
/// Returns the message to show against the field when the value is not a
/// JSON object.
pub fn normalize_json_object(value: Option<Value>) -> Result<Value, String> {
    const INVALID: &str = r#"Invalid JSON format. Please use valid JSON syntax like {"key": "value"}"#;
    match value {
        None | Some(Value::Null) => Ok(Value::Object(serde_json::Map::new())),
        Some(Value::Object(map)) => Ok(Value::Object(map)),
        Some(Value::String(raw)) if raw.trim().is_empty() => {
            Ok(Value::Object(serde_json::Map::new()))
        }
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw.trim()) {
            Ok(Value::Object(map)) => Ok(Value::Object(map)),
            _ => Err(INVALID.to_string()),
        },
        Some(_) => Err(INVALID.to_string()),
    }
}

fn require_positive(errors: &mut ValidationErrors, field: &str, amount: Decimal) {
    if amount <= Decimal::ZERO {
        errors.add(field, "Amount must be greater than 0.");
    }
}

// ---------------------------------------------------------------------------
// Accounts & contact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactInput {
    /// # Errors
    ///
    /// Returns per-field messages for blank or oversized fields and for an
    /// email address without a local part and domain.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &self.name);
        require_max_len(&mut errors, "name", &self.name, 100);
        require_text(&mut errors, "subject", &self.subject);
        require_max_len(&mut errors, "subject", &self.subject, 200);
        require_text(&mut errors, "message", &self.message);
        if !looks_like_email(self.email.trim()) {
            errors.add("email", "Enter a valid email address.");
        }
        errors.into_result()
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && domain.contains('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Research
// ---------------------------------------------------------------------------

/// Create payload for a general research project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResearchProjectInput {
    pub title: String,
    pub field: ResearchField,
    pub description: String,
    pub objectives: String,
    #[serde(default)]
    pub methodology: String,
    #[serde(default)]
    pub hypothesis: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_research_status")]
    pub status: ResearchStatus,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub progress_percentage: i64,
    #[serde(default)]
    pub findings: String,
    #[serde(default)]
    pub conclusions: String,
    #[serde(default)]
    pub future_work: String,
    #[serde(default)]
    pub data_schema: Option<Value>,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub supervisor: String,
    #[serde(default)]
    pub collaborators: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_published: bool,
}

const fn default_research_status() -> ResearchStatus {
    ResearchStatus::Planning
}

const fn default_priority() -> Priority {
    Priority::Medium
}

impl ResearchProjectInput {
    /// Validate and normalize `data_schema` in place.
    ///
    /// # Errors
    ///
    /// Returns per-field messages when required text is blank, progress is
    /// outside 0..=100, the end date precedes the start, or `data_schema`
    /// is not a JSON object.
    pub fn validate(&mut self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_max_len(&mut errors, "title", &self.title, 200);
        require_text(&mut errors, "description", &self.description);
        require_text(&mut errors, "objectives", &self.objectives);
        require_max_len(&mut errors, "institution", &self.institution, 200);
        require_max_len(&mut errors, "supervisor", &self.supervisor, 200);
        require_percentage(&mut errors, "progress_percentage", self.progress_percentage);

        let start = *self.start_date.get_or_insert(today);
        if self.end_date.is_some_and(|end| end < start) {
            errors.add("end_date", "End date cannot be before the start date.");
        }

        match normalize_json_object(self.data_schema.take()) {
            Ok(value) => self.data_schema = Some(value),
            Err(message) => errors.add("data_schema", message),
        }

        errors.into_result()
    }
}

/// One measurement submitted against an astronomy research project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DataEntryInput {
    pub observation_datetime: DateTime<Utc>,
    #[serde(default)]
    pub observation_id: Option<String>,
    #[serde(default)]
    #[schemars(with = "Option<u8>")]
    pub data_quality: Option<SkyQuality>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_outlier: bool,
    /// Measurement fields; their shape depends on the project's research type.
    pub data: Value,
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransactionInput {
    pub kind: TransactionKind,
    pub amount: Decimal,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

impl TransactionInput {
    /// Fill the date with `today` when missing and check amount and category.
    ///
    /// # Errors
    ///
    /// Returns per-field messages for a non-positive amount or a missing
    /// category.
    pub fn validate(&mut self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_positive(&mut errors, "amount", self.amount);
        if self
            .category_id
            .as_deref()
            .is_none_or(|id| id.trim().is_empty())
        {
            errors.add("category_id", "Category is required.");
        }
        self.date.get_or_insert(today);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FinanceCategoryInput {
    pub name: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl FinanceCategoryInput {
    /// # Errors
    ///
    /// Returns per-field messages for a blank name or a colour that is not
    /// `#rrggbb`.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &self.name);
        require_max_len(&mut errors, "name", &self.name, 100);
        if let Some(icon) = &self.icon {
            require_max_len(&mut errors, "icon", icon, 50);
        }
        if self.color.as_deref().is_some_and(|c| !is_hex_color(c)) {
            errors.add("color", "Enter a colour as #rrggbb.");
        }
        errors.into_result()
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BudgetInput {
    pub category_id: String,
    pub amount: Decimal,
    /// `YYYY-MM`.
    pub month: String,
}

impl BudgetInput {
    /// Return the first day of the budget month.
    ///
    /// # Errors
    ///
    /// Returns per-field messages for a non-positive amount, a blank
    /// category, or an unparsable month.
    pub fn validate(&self) -> Result<NaiveDate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "category_id", &self.category_id);
        require_positive(&mut errors, "amount", self.amount);
        let month = parse_month(&self.month);
        if month.is_none() {
            errors.add("month", "Enter a month as YYYY-MM.");
        }
        errors.into_result()?;
        month.ok_or_else(|| ValidationErrors::single("month", "Enter a month as YYYY-MM."))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchExpenseInput {
    pub field: ExpenseField,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub invoice_number: String,
}

impl ResearchExpenseInput {
    /// # Errors
    ///
    /// Returns per-field messages for blank title or description and a
    /// non-positive amount.
    pub fn validate(&mut self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_max_len(&mut errors, "title", &self.title, 200);
        require_text(&mut errors, "description", &self.description);
        require_positive(&mut errors, "amount", self.amount);
        require_max_len(&mut errors, "vendor", &self.vendor, 200);
        require_max_len(&mut errors, "invoice_number", &self.invoice_number, 100);
        self.date.get_or_insert(today);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn research() -> ResearchProjectInput {
        serde_json::from_value(json!({
            "title": "Pulsar timing",
            "field": "physics",
            "description": "Timing residuals",
            "objectives": "Detect glitches"
        }))
        .unwrap()
    }

    #[test]
    fn research_defaults_apply() {
        let mut input = research();
        input.validate(today()).unwrap();
        assert_eq!(input.status, ResearchStatus::Planning);
        assert_eq!(input.priority, Priority::Medium);
        assert_eq!(input.start_date, Some(today()));
        assert_eq!(input.data_schema, Some(json!({})));
    }

    #[test]
    fn research_rejects_out_of_range_progress() {
        let mut input = research();
        input.progress_percentage = 150;
        let err = input.validate(today()).unwrap_err();
        assert!(err.has("progress_percentage"));
    }

    #[test]
    fn research_rejects_end_before_start() {
        let mut input = research();
        input.start_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        input.end_date = NaiveDate::from_ymd_opt(2025, 4, 1);
        assert!(input.validate(today()).unwrap_err().has("end_date"));
    }

    #[rstest]
    #[case(None, Ok(json!({})))]
    #[case(Some(json!("")), Ok(json!({})))]
    #[case(Some(json!("{\"epochs\": 3}")), Ok(json!({"epochs": 3})))]
    #[case(Some(json!({"a": 1})), Ok(json!({"a": 1})))]
    #[case(Some(json!("{not json")), Err(()))]
    #[case(Some(json!("[1,2]")), Err(()))]
    #[case(Some(json!(42)), Err(()))]
    fn json_object_normalization(#[case] raw: Option<Value>, #[case] expected: Result<Value, ()>) {
        assert_eq!(normalize_json_object(raw).map_err(|_| ()), expected);
    }

    #[test]
    fn transaction_requires_positive_amount_and_category() {
        let mut input: TransactionInput =
            serde_json::from_value(json!({"kind": "expense", "amount": "0"})).unwrap();
        let err = input.validate(today()).unwrap_err();
        assert!(err.has("amount"));
        assert!(err.has("category_id"));
    }

    #[test]
    fn transaction_date_defaults_to_today() {
        let mut input: TransactionInput = serde_json::from_value(
            json!({"kind": "income", "amount": "1500.00", "category_id": "fcat-1"}),
        )
        .unwrap();
        input.validate(today()).unwrap();
        assert_eq!(input.date, Some(today()));
    }

    #[test]
    fn budget_month_must_parse() {
        let input = BudgetInput {
            category_id: "fcat-1".into(),
            amount: Decimal::from(100),
            month: "2025-02".into(),
        };
        assert_eq!(input.validate().unwrap(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        let bad = BudgetInput {
            month: "Feb".into(),
            ..input
        };
        assert!(bad.validate().unwrap_err().has("month"));
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("ada@localhost", false)]
    #[case("@example.com", false)]
    #[case("ada example@x.org", false)]
    #[case("", false)]
    fn email_shape(#[case] email: &str, #[case] ok: bool) {
        let input = ContactInput {
            name: "Ada".into(),
            email: email.into(),
            subject: "Hi".into(),
            message: "Hello".into(),
        };
        assert_eq!(input.validate().is_ok(), ok);
    }

    #[test]
    fn category_color_shape() {
        let input = FinanceCategoryInput {
            name: "Food".into(),
            kind: TransactionKind::Expense,
            icon: None,
            color: Some("red".into()),
        };
        assert!(input.validate().unwrap_err().has("color"));
    }
}
