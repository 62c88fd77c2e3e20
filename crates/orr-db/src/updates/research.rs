//! Research project update builder.

use chrono::NaiveDate;
use orr_core::enums::{Priority, ResearchField, ResearchStatus};
use orr_core::inputs::ResearchProjectInput;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResearchProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<ResearchField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objectives: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methodology: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResearchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub findings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future_work: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

pub struct ResearchProjectUpdateBuilder(ResearchProjectUpdate);

impl ResearchProjectUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ResearchProjectUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn field(mut self, field: ResearchField) -> Self {
        self.0.field = Some(field);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn objectives(mut self, objectives: impl Into<String>) -> Self {
        self.0.objectives = Some(objectives.into());
        self
    }

    #[must_use]
    pub fn methodology(mut self, methodology: impl Into<String>) -> Self {
        self.0.methodology = Some(methodology.into());
        self
    }

    #[must_use]
    pub fn hypothesis(mut self, hypothesis: impl Into<String>) -> Self {
        self.0.hypothesis = Some(hypothesis.into());
        self
    }

    #[must_use]
    pub const fn start_date(mut self, start_date: NaiveDate) -> Self {
        self.0.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub const fn end_date(mut self, end_date: Option<NaiveDate>) -> Self {
        self.0.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: ResearchStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub const fn progress_percentage(mut self, progress: i64) -> Self {
        self.0.progress_percentage = Some(progress);
        self
    }

    #[must_use]
    pub fn findings(mut self, findings: impl Into<String>) -> Self {
        self.0.findings = Some(findings.into());
        self
    }

    #[must_use]
    pub fn conclusions(mut self, conclusions: impl Into<String>) -> Self {
        self.0.conclusions = Some(conclusions.into());
        self
    }

    #[must_use]
    pub fn future_work(mut self, future_work: impl Into<String>) -> Self {
        self.0.future_work = Some(future_work.into());
        self
    }

    #[must_use]
    pub fn data_schema(mut self, data_schema: serde_json::Value) -> Self {
        self.0.data_schema = Some(data_schema);
        self
    }

    #[must_use]
    pub fn institution(mut self, institution: impl Into<String>) -> Self {
        self.0.institution = Some(institution.into());
        self
    }

    #[must_use]
    pub fn supervisor(mut self, supervisor: impl Into<String>) -> Self {
        self.0.supervisor = Some(supervisor.into());
        self
    }

    #[must_use]
    pub fn collaborators(mut self, collaborators: impl Into<String>) -> Self {
        self.0.collaborators = Some(collaborators.into());
        self
    }

    #[must_use]
    pub const fn is_public(mut self, is_public: bool) -> Self {
        self.0.is_public = Some(is_public);
        self
    }

    #[must_use]
    pub const fn is_published(mut self, is_published: bool) -> Self {
        self.0.is_published = Some(is_published);
        self
    }

    #[must_use]
    pub fn build(self) -> ResearchProjectUpdate {
        self.0
    }
}

impl Default for ResearchProjectUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated edit form replaces every editable field.
impl From<ResearchProjectInput> for ResearchProjectUpdate {
    fn from(input: ResearchProjectInput) -> Self {
        let mut builder = ResearchProjectUpdateBuilder::new()
            .title(input.title)
            .field(input.field)
            .description(input.description)
            .objectives(input.objectives)
            .methodology(input.methodology)
            .hypothesis(input.hypothesis)
            .end_date(input.end_date)
            .status(input.status)
            .priority(input.priority)
            .progress_percentage(input.progress_percentage)
            .findings(input.findings)
            .conclusions(input.conclusions)
            .future_work(input.future_work)
            .institution(input.institution)
            .supervisor(input.supervisor)
            .collaborators(input.collaborators)
            .is_public(input.is_public)
            .is_published(input.is_published);
        if let Some(start) = input.start_date {
            builder = builder.start_date(start);
        }
        if let Some(schema) = input.data_schema {
            builder = builder.data_schema(schema);
        }
        builder.build()
    }
}
