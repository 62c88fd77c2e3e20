//! Field validation errors shared by every Orrery crate.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `AuthError`) are defined in
//! their respective crates and converge in `orr-web`'s `WebError`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Per-field validation messages, collected before anything is written.
///
/// Keys are submitted field names; `__all__` holds form-level messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Field key used for messages that don't belong to a single field.
    pub const NON_FIELD: &'static str = "__all__";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` has at least one message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Convert into `Err(self)` when any message was recorded.
    ///
    /// # Errors
    ///
    /// Returns the collected errors when non-empty.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Build a single-message error.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Require a non-blank string field.
pub fn require_text(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
    }
}

/// Require `value` to fit within `max` characters.
pub fn require_max_len(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters."),
        );
    }
}

/// Require an integer percentage between 0 and 100 inclusive.
pub fn require_percentage(errors: &mut ValidationErrors, field: &str, value: i64) {
    if !(0..=100).contains(&value) {
        errors.add(field, "Ensure this value is between 0 and 100.");
    }
}
