use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ProjectStatus, ProjectType, ResearchArea, SkillType};

/// A skill shown on the home and about pages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub skill_type: SkillType,
    pub icon: Option<String>,
    pub image_icon: Option<String>,
    /// 0..=100.
    pub proficiency: i64,
    pub order: i64,
    pub is_featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// Research area tag for portfolio research entries, optionally tied to an
/// astronomy research project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResearchCategory {
    pub id: String,
    pub astro_project_id: Option<String>,
    pub area: ResearchArea,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PortfolioProject {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub full_description: String,
    pub category_id: Option<String>,
    pub status: ProjectStatus,
    pub skill_ids: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub thumbnail: Option<String>,
    pub project_type: ProjectType,
    pub research_category_id: Option<String>,
    pub is_featured: bool,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A downloadable document attached to a portfolio project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProjectDocument {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub file: String,
}
