//! Transaction update builder.

use chrono::NaiveDate;
use orr_core::enums::TransactionKind;
use orr_core::inputs::TransactionInput;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct TransactionUpdateBuilder(TransactionUpdate);

impl TransactionUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TransactionUpdate::default())
    }

    #[must_use]
    pub const fn kind(mut self, kind: TransactionKind) -> Self {
        self.0.kind = Some(kind);
        self
    }

    #[must_use]
    pub const fn amount(mut self, amount: Decimal) -> Self {
        self.0.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Option<String>) -> Self {
        self.0.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub const fn date(mut self, date: NaiveDate) -> Self {
        self.0.date = Some(date);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn build(self) -> TransactionUpdate {
        self.0
    }
}

impl Default for TransactionUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated edit form replaces every editable field.
impl From<TransactionInput> for TransactionUpdate {
    fn from(input: TransactionInput) -> Self {
        let mut builder = TransactionUpdateBuilder::new()
            .kind(input.kind)
            .amount(input.amount)
            .category_id(input.category_id)
            .description(input.description);
        if let Some(date) = input.date {
            builder = builder.date(date);
        }
        builder.build()
    }
}
