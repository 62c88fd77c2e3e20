use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, ResearchField, ResearchStatus};

/// A user-owned research project in any discipline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchProject {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub slug: String,
    pub field: ResearchField,
    pub description: String,
    pub objectives: String,
    pub methodology: String,
    pub hypothesis: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ResearchStatus,
    pub priority: Priority,
    /// 0..=100, maintained by hand.
    pub progress_percentage: i64,
    pub findings: String,
    pub conclusions: String,
    pub future_work: String,
    /// Free-form per-field data; always a JSON object.
    pub data_schema: serde_json::Value,
    pub institution: String,
    pub supervisor: String,
    /// One collaborator per line.
    pub collaborators: String,
    pub is_public: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResearchProject {
    /// Days from start to end, or to `today` while the project is open-ended.
    #[must_use]
    pub fn duration_days(&self, today: NaiveDate) -> i64 {
        let end = self.end_date.unwrap_or(today);
        (end - self.start_date).num_days()
    }

    #[must_use]
    pub const fn status_badge_color(&self) -> &'static str {
        self.status.badge_color()
    }

    #[must_use]
    pub const fn priority_badge_color(&self) -> &'static str {
        self.priority.badge_color()
    }

    /// Non-blank collaborator names, trimmed.
    #[must_use]
    pub fn collaborator_list(&self) -> Vec<&str> {
        self.collaborators
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}
