//! Astronomy research programmes: projects, data entries, analyses, and
//! reusable templates.

use chrono::{NaiveDate, Utc};
use serde_json::json;

use orr_core::data_entry::{build_entry_data, days_from_start};
use orr_core::entities::{
    AstroResearchProject, ResearchAnalysis, ResearchDataEntry, ResearchTemplate,
};
use orr_core::enums::{AnalysisType, AstroResearchType, QualityRating, ResearchStatus};
use orr_core::errors::{ValidationErrors, require_max_len, require_text};
use orr_core::ids::{PREFIX_ANALYSIS, PREFIX_ASTRO_RESEARCH, PREFIX_DATA_ENTRY, PREFIX_TEMPLATE};
use orr_core::inputs::DataEntryInput;
use orr_core::text::slugify;

use crate::error::DatabaseError;
use crate::helpers::{
    WhereBuilder, get_bool, get_opt_string, nullable, opt_date_text, parse_date, parse_datetime,
    parse_enum, parse_json, parse_optional_date, parse_optional_enum, parse_optional_json,
    parse_sky_quality, sql_int,
};
use crate::service::OrrService;

const PROJECT_COLS: &str = "id, title, slug, research_type, description, start_date, end_date, \
     target_duration_days, status, hypothesis, expected_results, actual_results, conclusions, \
     data_template, is_public, created_at, updated_at";
const ENTRY_COLS: &str = "id, project_id, observation_id, observation_datetime, days_from_start, \
     data, data_quality, notes, is_outlier, is_validated, created_at, updated_at";
const ANALYSIS_COLS: &str = "id, project_id, analysis_type, title, results, theoretical_values, \
     error_percentage, quality_rating, methodology, interpretation, created_at";
const TEMPLATE_COLS: &str =
    "id, name, research_type, description, template_config, instructions, is_active";

/// Name of the built-in Galilean moons template.
pub const JUPITER_TEMPLATE_NAME: &str = "Jupiter Galilean Moons - Orbital Period";

fn row_to_project(row: &libsql::Row) -> Result<AstroResearchProject, DatabaseError> {
    Ok(AstroResearchProject {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        research_type: parse_enum(&row.get::<String>(3)?)?,
        description: row.get(4)?,
        start_date: parse_date(&row.get::<String>(5)?)?,
        end_date: parse_optional_date(get_opt_string(row, 6)?.as_deref())?,
        target_duration_days: row.get(7)?,
        status: parse_enum(&row.get::<String>(8)?)?,
        hypothesis: row.get(9)?,
        expected_results: row.get(10)?,
        actual_results: row.get(11)?,
        conclusions: row.get(12)?,
        data_template: parse_json(&row.get::<String>(13)?)?,
        is_public: get_bool(row, 14)?,
        created_at: parse_datetime(&row.get::<String>(15)?)?,
        updated_at: parse_datetime(&row.get::<String>(16)?)?,
    })
}

fn row_to_entry(row: &libsql::Row) -> Result<ResearchDataEntry, DatabaseError> {
    let data_quality = match row.get::<Option<i64>>(6)? {
        Some(value) => Some(parse_sky_quality(value)?),
        None => None,
    };
    Ok(ResearchDataEntry {
        id: row.get(0)?,
        project_id: row.get(1)?,
        observation_id: get_opt_string(row, 2)?,
        observation_datetime: parse_datetime(&row.get::<String>(3)?)?,
        days_from_start: row.get(4)?,
        data: parse_json(&row.get::<String>(5)?)?,
        data_quality,
        notes: row.get(7)?,
        is_outlier: get_bool(row, 8)?,
        is_validated: get_bool(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

fn row_to_analysis(row: &libsql::Row) -> Result<ResearchAnalysis, DatabaseError> {
    Ok(ResearchAnalysis {
        id: row.get(0)?,
        project_id: row.get(1)?,
        analysis_type: parse_enum(&row.get::<String>(2)?)?,
        title: row.get(3)?,
        results: parse_json(&row.get::<String>(4)?)?,
        theoretical_values: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        error_percentage: parse_optional_json(get_opt_string(row, 6)?.as_deref())?,
        quality_rating: parse_optional_enum(get_opt_string(row, 7)?.as_deref())?,
        methodology: row.get(8)?,
        interpretation: row.get(9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

fn row_to_template(row: &libsql::Row) -> Result<ResearchTemplate, DatabaseError> {
    Ok(ResearchTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        research_type: parse_enum(&row.get::<String>(2)?)?,
        description: row.get(3)?,
        template_config: parse_json(&row.get::<String>(4)?)?,
        instructions: row.get(5)?,
        is_active: get_bool(row, 6)?,
    })
}

fn json_text(value: &serde_json::Value) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Query(format!("JSON encode: {e}")))
}

#[derive(Debug, Clone)]
pub struct NewAstroResearchProject {
    pub title: String,
    pub research_type: AstroResearchType,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub target_duration_days: i64,
    pub status: ResearchStatus,
    pub hypothesis: String,
    pub expected_results: String,
    pub data_template: serde_json::Value,
    pub is_public: bool,
}

impl NewAstroResearchProject {
    /// A public 30-day programme in planning.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        research_type: AstroResearchType,
        description: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            research_type,
            description: description.into(),
            start_date,
            end_date: None,
            target_duration_days: 30,
            status: ResearchStatus::Planning,
            hypothesis: String::new(),
            expected_results: String::new(),
            data_template: json!({}),
            is_public: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewResearchAnalysis {
    pub analysis_type: AnalysisType,
    pub title: String,
    pub results: serde_json::Value,
    pub theoretical_values: Option<serde_json::Value>,
    pub error_percentage: Option<serde_json::Value>,
    pub quality_rating: Option<QualityRating>,
    pub methodology: String,
    pub interpretation: String,
}

#[derive(Debug, Clone)]
pub struct NewResearchTemplate {
    pub name: String,
    pub research_type: AstroResearchType,
    pub description: String,
    pub template_config: serde_json::Value,
    pub instructions: String,
    pub is_active: bool,
}

impl NewResearchTemplate {
    /// Measurement setup for timing the four Galilean moons.
    #[must_use]
    pub fn jupiter_moons() -> Self {
        let moon_field = |name: &str, label: &str| {
            json!({
                "name": format!("{name}_position"),
                "type": "float",
                "unit": "DJ",
                "label": format!("{label} Position (DJ)"),
                "required": false,
            })
        };
        Self {
            name: JUPITER_TEMPLATE_NAME.to_string(),
            research_type: AstroResearchType::Orbital,
            description: "Track the orbital periods of Jupiter's 4 Galilean moons".to_string(),
            template_config: json!({
                "fields": [
                    moon_field("io", "Io"),
                    moon_field("europa", "Europa"),
                    moon_field("ganymede", "Ganymede"),
                    moon_field("callisto", "Callisto"),
                ],
                "analysis_types": ["period", "kepler"],
                "theoretical_values": {
                    "io": {"period": 1.769, "semi_major_axis": 421_700},
                    "europa": {"period": 3.551, "semi_major_axis": 671_100},
                    "ganymede": {"period": 7.155, "semi_major_axis": 1_070_400},
                    "callisto": {"period": 16.689, "semi_major_axis": 1_882_700},
                },
                "minimum_observations": 14,
                "recommended_duration": 30,
            }),
            instructions: [
                "1. Observe Jupiter every night at approximately the same time",
                "2. Take photos/video showing Jupiter and all 4 moons",
                "3. Measure position of each moon in Jupiter Diameters (DJ)",
                "4. Positive = East, Negative = West",
                "5. Record for minimum 14 days (30 days recommended)",
                "6. Analysis will calculate orbital periods and verify Kepler's 3rd Law",
            ]
            .join("\n"),
            is_active: true,
        }
    }
}

impl OrrService {
    // -- projects ------------------------------------------------------------

    pub async fn create_astro_research_project(
        &self,
        project: NewAstroResearchProject,
    ) -> Result<AstroResearchProject, DatabaseError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &project.title);
        require_max_len(&mut errors, "title", &project.title, 200);
        require_text(&mut errors, "description", &project.description);
        if project.end_date.is_some_and(|end| end < project.start_date) {
            errors.add("end_date", "End date cannot be before the start date.");
        }
        if project.target_duration_days <= 0 {
            errors.add("target_duration_days", "Ensure this value is greater than 0.");
        }
        errors.into_result()?;

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_ASTRO_RESEARCH).await?;
        let slug = self
            .unique_slug("astro_research_projects", &slugify(&project.title))
            .await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO astro_research_projects ({PROJECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, '', '', ?12, ?13, ?14, ?14)"
                ),
                libsql::params![
                    id.as_str(),
                    project.title.as_str(),
                    slug.as_str(),
                    project.research_type.as_str(),
                    project.description.as_str(),
                    project.start_date.to_string(),
                    opt_date_text(project.end_date),
                    project.target_duration_days,
                    project.status.as_str(),
                    project.hypothesis.as_str(),
                    project.expected_results.as_str(),
                    json_text(&project.data_template)?,
                    i64::from(project.is_public),
                    now.as_str()
                ],
            )
            .await?;
        tracing::debug!(%id, %slug, "astro research project created");

        self.get_astro_research_project_by_slug(&slug).await
    }

    pub async fn get_astro_research_project_by_slug(
        &self,
        slug: &str,
    ) -> Result<AstroResearchProject, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PROJECT_COLS} FROM astro_research_projects WHERE slug = ?1"),
                [slug],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_project(&row)
    }

    /// Programmes filtered by status and research type, most recently touched first.
    pub async fn list_astro_research_projects(
        &self,
        status: Option<ResearchStatus>,
        research_type: Option<AstroResearchType>,
    ) -> Result<Vec<AstroResearchProject>, DatabaseError> {
        let mut filter = WhereBuilder::new();
        if let Some(status) = status {
            filter.bind("status = ?", status.as_str());
        }
        if let Some(kind) = research_type {
            filter.bind("research_type = ?", kind.as_str());
        }
        self.query_astro_projects(
            &format!(
                "SELECT {PROJECT_COLS} FROM astro_research_projects{} ORDER BY updated_at DESC",
                filter.sql()
            ),
            filter.params(),
        )
        .await
    }

    pub async fn recent_astro_research_projects(
        &self,
        limit: u64,
    ) -> Result<Vec<AstroResearchProject>, DatabaseError> {
        self.query_astro_projects(
            &format!(
                "SELECT {PROJECT_COLS} FROM astro_research_projects ORDER BY updated_at DESC LIMIT ?1"
            ),
            vec![sql_int(limit)],
        )
        .await
    }

    /// Number of astronomy programmes, optionally only those in `status`.
    pub async fn count_astro_research_projects(
        &self,
        status: Option<ResearchStatus>,
    ) -> Result<i64, DatabaseError> {
        let mut filter = WhereBuilder::new();
        if let Some(status) = status {
            filter.bind("status = ?", status.as_str());
        }
        self.count(
            &format!("SELECT COUNT(*) FROM astro_research_projects{}", filter.sql()),
            filter.params(),
        )
        .await
    }

    async fn query_astro_projects(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<AstroResearchProject>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }

    // -- data entries --------------------------------------------------------

    /// Validate a measurement against the project's research type and store it.
    ///
    /// The project's `updated_at` is bumped so it rises in recent lists.
    pub async fn add_research_data_entry(
        &self,
        project: &AstroResearchProject,
        input: DataEntryInput,
    ) -> Result<ResearchDataEntry, DatabaseError> {
        let data = build_entry_data(project.research_type, input.data)?;
        if let Some(observation_id) = input.observation_id.as_deref() {
            match self.get_observation(observation_id).await {
                Ok(_) => {}
                Err(DatabaseError::NoResult) => {
                    return Err(ValidationErrors::single(
                        "observation_id",
                        "Select a valid choice. That observation does not exist.",
                    )
                    .into());
                }
                Err(e) => return Err(e),
            }
        }

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_DATA_ENTRY).await?;
        let offset = days_from_start(project.start_date, input.observation_datetime);
        let params: Vec<libsql::Value> = vec![
            id.clone().into(),
            project.id.clone().into(),
            nullable(input.observation_id),
            input.observation_datetime.to_rfc3339().into(),
            offset.into(),
            json_text(&data)?.into(),
            nullable(input.data_quality.map(|q| i64::from(q.as_u8()))),
            input.notes.into(),
            i64::from(input.is_outlier).into(),
            now.clone().into(),
            now.clone().into(),
        ];
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO research_data_entries ({ENTRY_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?11)"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        self.db()
            .conn()
            .execute(
                "UPDATE astro_research_projects SET updated_at = ?1 WHERE id = ?2",
                libsql::params![now.as_str(), project.id.as_str()],
            )
            .await?;
        tracing::debug!(%id, project = %project.slug, days = offset, "data entry recorded");

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ENTRY_COLS} FROM research_data_entries WHERE id = ?1"),
                [id.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_entry(&row)
    }

    /// Entries of a project, latest observation first.
    pub async fn list_data_entries(
        &self,
        project_id: &str,
    ) -> Result<Vec<ResearchDataEntry>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {ENTRY_COLS} FROM research_data_entries
                     WHERE project_id = ?1 ORDER BY observation_datetime DESC"
                ),
                [project_id],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    // -- analyses ------------------------------------------------------------

    pub async fn create_research_analysis(
        &self,
        project_id: &str,
        analysis: NewResearchAnalysis,
    ) -> Result<ResearchAnalysis, DatabaseError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &analysis.title);
        require_max_len(&mut errors, "title", &analysis.title, 200);
        require_text(&mut errors, "methodology", &analysis.methodology);
        errors.into_result()?;

        let id = self.db().generate_id(PREFIX_ANALYSIS).await?;
        let params: Vec<libsql::Value> = vec![
            id.clone().into(),
            project_id.into(),
            analysis.analysis_type.as_str().into(),
            analysis.title.into(),
            json_text(&analysis.results)?.into(),
            nullable(analysis.theoretical_values.as_ref().map(json_text).transpose()?),
            nullable(analysis.error_percentage.as_ref().map(json_text).transpose()?),
            nullable(analysis.quality_rating.map(QualityRating::as_str)),
            analysis.methodology.into(),
            analysis.interpretation.into(),
            Utc::now().to_rfc3339().into(),
        ];
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO research_analyses ({ANALYSIS_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        tracing::debug!(%id, project_id, "analysis stored");

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ANALYSIS_COLS} FROM research_analyses WHERE id = ?1"),
                [id.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_analysis(&row)
    }

    /// Analyses of a project, newest first.
    pub async fn list_analyses(
        &self,
        project_id: &str,
    ) -> Result<Vec<ResearchAnalysis>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {ANALYSIS_COLS} FROM research_analyses
                     WHERE project_id = ?1 ORDER BY created_at DESC"
                ),
                [project_id],
            )
            .await?;
        let mut analyses = Vec::new();
        while let Some(row) = rows.next().await? {
            analyses.push(row_to_analysis(&row)?);
        }
        Ok(analyses)
    }

    // -- templates -----------------------------------------------------------

    pub async fn create_research_template(
        &self,
        template: NewResearchTemplate,
    ) -> Result<ResearchTemplate, DatabaseError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &template.name);
        require_max_len(&mut errors, "name", &template.name, 200);
        errors.into_result()?;

        let id = self.db().generate_id(PREFIX_TEMPLATE).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO research_templates ({TEMPLATE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ),
                libsql::params![
                    id.as_str(),
                    template.name.as_str(),
                    template.research_type.as_str(),
                    template.description.as_str(),
                    json_text(&template.template_config)?,
                    template.instructions.as_str(),
                    i64::from(template.is_active)
                ],
            )
            .await
            .map_err(|e| DatabaseError::from_write(e, &format!("template '{}'", template.name)))?;
        tracing::debug!(%id, name = %template.name, "research template created");

        Ok(ResearchTemplate {
            id,
            name: template.name,
            research_type: template.research_type,
            description: template.description,
            template_config: template.template_config,
            instructions: template.instructions,
            is_active: template.is_active,
        })
    }

    pub async fn get_research_template_by_name(
        &self,
        name: &str,
    ) -> Result<ResearchTemplate, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {TEMPLATE_COLS} FROM research_templates WHERE name = ?1"),
                [name],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_template(&row)
    }

    pub async fn list_active_templates(&self) -> Result<Vec<ResearchTemplate>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {TEMPLATE_COLS} FROM research_templates WHERE is_active = 1 ORDER BY name"
                ),
                (),
            )
            .await?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next().await? {
            templates.push(row_to_template(&row)?);
        }
        Ok(templates)
    }

    /// Make sure the Galilean moons template exists.
    ///
    /// Returns the stored template and whether this call created it.
    pub async fn seed_jupiter_template(&self) -> Result<(ResearchTemplate, bool), DatabaseError> {
        match self.get_research_template_by_name(JUPITER_TEMPLATE_NAME).await {
            Ok(existing) => Ok((existing, false)),
            Err(DatabaseError::NoResult) => {
                let created = self
                    .create_research_template(NewResearchTemplate::jupiter_moons())
                    .await?;
                tracing::info!(name = JUPITER_TEMPLATE_NAME, "seeded research template");
                Ok((created, true))
            }
            Err(e) => Err(e),
        }
    }
}
