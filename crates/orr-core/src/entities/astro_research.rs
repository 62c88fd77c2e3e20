use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AnalysisType, AstroResearchType, QualityRating, ResearchStatus, SkyQuality};

/// A structured astronomy research programme (orbital periods, meteor counts...).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AstroResearchProject {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub research_type: AstroResearchType,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub target_duration_days: i64,
    pub status: ResearchStatus,
    pub hypothesis: String,
    pub expected_results: String,
    pub actual_results: String,
    pub conclusions: String,
    pub data_template: serde_json::Value,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AstroResearchProject {
    /// Share of the planned date span already elapsed on `today`.
    ///
    /// `None` when the project has no end date. A zero or negative span
    /// counts as finished; a start in the future counts as zero.
    #[must_use]
    pub fn progress_percentage(&self, today: NaiveDate) -> Option<u8> {
        let end = self.end_date?;
        let total = (end - self.start_date).num_days();
        if total <= 0 {
            return Some(100);
        }
        let elapsed = (today - self.start_date).num_days().max(0);
        let percent = (elapsed * 100 / total).min(100);
        Some(u8::try_from(percent).unwrap_or(100))
    }
}

/// One measurement row of an astronomy research project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResearchDataEntry {
    pub id: String,
    pub project_id: String,
    pub observation_id: Option<String>,
    pub observation_datetime: DateTime<Utc>,
    /// Fractional days since the project start, derived on save.
    pub days_from_start: f64,
    pub data: serde_json::Value,
    #[schemars(with = "Option<u8>")]
    pub data_quality: Option<SkyQuality>,
    pub notes: String,
    pub is_outlier: bool,
    pub is_validated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchAnalysis {
    pub id: String,
    pub project_id: String,
    pub analysis_type: AnalysisType,
    pub title: String,
    pub results: serde_json::Value,
    pub theoretical_values: Option<serde_json::Value>,
    pub error_percentage: Option<serde_json::Value>,
    pub quality_rating: Option<QualityRating>,
    pub methodology: String,
    pub interpretation: String,
    pub created_at: DateTime<Utc>,
}

/// Reusable setup for a common research type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchTemplate {
    pub id: String,
    pub name: String,
    pub research_type: AstroResearchType,
    pub description: String,
    pub template_config: serde_json::Value,
    pub instructions: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn project(start: NaiveDate, end: Option<NaiveDate>) -> AstroResearchProject {
        let now = Utc::now();
        AstroResearchProject {
            id: "ast-00000001".into(),
            title: "Jupiter moons".into(),
            slug: "jupiter-moons".into(),
            research_type: AstroResearchType::Orbital,
            description: String::new(),
            start_date: start,
            end_date: end,
            target_duration_days: 30,
            status: ResearchStatus::Active,
            hypothesis: String::new(),
            expected_results: String::new(),
            actual_results: String::new(),
            conclusions: String::new(),
            data_template: serde_json::json!({}),
            is_public: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn progress_without_end_date_is_none() {
        assert_eq!(project(d(2025, 1, 1), None).progress_percentage(d(2025, 1, 5)), None);
    }

    #[rstest]
    #[case(d(2025, 1, 11), 33)]
    #[case(d(2025, 1, 1), 0)]
    #[case(d(2025, 1, 31), 100)]
    #[case(d(2025, 3, 1), 100)]
    #[case(d(2024, 12, 1), 0)]
    fn progress_tracks_elapsed_share(#[case] today: NaiveDate, #[case] expected: u8) {
        let p = project(d(2025, 1, 1), Some(d(2025, 1, 31)));
        assert_eq!(p.progress_percentage(today), Some(expected));
    }

    #[test]
    fn zero_length_span_counts_as_finished() {
        let p = project(d(2025, 1, 1), Some(d(2025, 1, 1)));
        assert_eq!(p.progress_percentage(d(2025, 1, 1)), Some(100));
    }
}
