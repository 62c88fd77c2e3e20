//! Signed-in research pages: the general project tracker and the
//! astronomy research programmes.

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use orr_core::entities::{
    AstroPhoto, AstroResearchProject, ObservationLog, ResearchAnalysis, ResearchDataEntry,
    ResearchProject,
};
use orr_core::enums::{AstroResearchType, ResearchStatus};
use orr_core::inputs::{DataEntryInput, ResearchProjectInput};
use orr_core::responses::{ResearchDashboard, ResearchProjectList};
use orr_db::repos::research::ResearchFilter;
use serde::{Deserialize, Serialize};

use super::{Deleted, choice_param, param, today};
use crate::csv::{RESEARCH_CSV_FILENAME, research_projects_csv};
use crate::error::WebResult;
use crate::json::Json;
use crate::session::CurrentUser;
use crate::state::AppState;

/// GET /research/
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> WebResult<Json<ResearchDashboard>> {
    Ok(Json(state.service.research_dashboard(user.id()).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub field: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

impl ProjectQuery {
    fn to_filter(&self) -> ResearchFilter {
        let owned = |raw: &Option<String>| param(raw.as_deref()).map(str::to_string);
        ResearchFilter {
            field: owned(&self.field),
            status: owned(&self.status),
            priority: owned(&self.priority),
            search: owned(&self.search),
        }
    }
}

/// GET /research/projects/
pub async fn project_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ProjectQuery>,
) -> WebResult<Json<ResearchProjectList>> {
    let list = state
        .service
        .list_research_projects(user.id(), &query.to_filter())
        .await?;
    Ok(Json(list))
}

/// POST /research/projects/
pub async fn project_create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<ResearchProjectInput>,
) -> WebResult<(StatusCode, Json<ResearchProject>)> {
    let project = state
        .service
        .create_research_project(user.id(), input, today())
        .await?;
    tracing::info!(slug = %project.slug, "research project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /research/projects/export-csv/
pub async fn export_csv(
    State(state): State<AppState>,
    user: CurrentUser,
) -> WebResult<impl IntoResponse> {
    let projects = state.service.research_projects_for_export(user.id()).await?;
    let body = research_projects_csv(&projects);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{RESEARCH_CSV_FILENAME}\""),
            ),
        ],
        body,
    ))
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailPage {
    pub project: ResearchProject,
    pub duration_days: i64,
    pub collaborators: Vec<String>,
    pub status_badge_color: &'static str,
    pub priority_badge_color: &'static str,
}

impl From<ResearchProject> for ProjectDetailPage {
    fn from(project: ResearchProject) -> Self {
        Self {
            duration_days: project.duration_days(today()),
            collaborators: project
                .collaborator_list()
                .into_iter()
                .map(str::to_string)
                .collect(),
            status_badge_color: project.status_badge_color(),
            priority_badge_color: project.priority_badge_color(),
            project,
        }
    }
}

/// GET /research/projects/{slug}/
pub async fn project_detail(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> WebResult<Json<ProjectDetailPage>> {
    let project = state.service.get_research_project(user.id(), &slug).await?;
    Ok(Json(project.into()))
}

/// POST /research/projects/{slug}/edit/
///
/// The body is the full edit form; every editable field is replaced.
pub async fn project_edit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(slug): Path<String>,
    Json(input): Json<ResearchProjectInput>,
) -> WebResult<Json<ProjectDetailPage>> {
    let project = state
        .service
        .update_research_project(user.id(), &slug, input.into(), today())
        .await?;
    tracing::info!(%slug, "research project updated");
    Ok(Json(project.into()))
}

/// POST /research/projects/{slug}/delete/
pub async fn project_delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> WebResult<Json<Deleted>> {
    state
        .service
        .delete_research_project(user.id(), &slug)
        .await?;
    tracing::info!(%slug, "research project deleted");
    Ok(Json(Deleted { deleted: true }))
}

// -- astronomy research -----------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AstroQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AstroProjectSummary {
    #[serde(flatten)]
    pub project: AstroResearchProject,
    pub progress_percentage: Option<u8>,
}

impl From<AstroResearchProject> for AstroProjectSummary {
    fn from(project: AstroResearchProject) -> Self {
        Self {
            progress_percentage: project.progress_percentage(today()),
            project,
        }
    }
}

/// GET /research/astronomy/
pub async fn astro_list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<AstroQuery>,
) -> WebResult<Json<Vec<AstroProjectSummary>>> {
    let status = choice_param::<ResearchStatus>(query.status.as_deref());
    let kind = choice_param::<AstroResearchType>(query.kind.as_deref());
    let (Ok(status), Ok(kind)) = (status, kind) else {
        return Ok(Json(Vec::new()));
    };

    let projects = state
        .service
        .list_astro_research_projects(status, kind)
        .await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Serialize)]
pub struct AstroCounts {
    pub data_entries: usize,
    pub analyses: usize,
    pub observations: usize,
    pub photos: usize,
}

#[derive(Debug, Serialize)]
pub struct AstroDetailPage {
    pub project: AstroProjectSummary,
    pub data_entries: Vec<ResearchDataEntry>,
    pub analyses: Vec<ResearchAnalysis>,
    pub observations: Vec<ObservationLog>,
    pub photos: Vec<AstroPhoto>,
    pub counts: AstroCounts,
}

/// GET /research/astronomy/{slug}/
pub async fn astro_detail(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(slug): Path<String>,
) -> WebResult<Json<AstroDetailPage>> {
    let svc = &state.service;
    let project = svc.get_astro_research_project_by_slug(&slug).await?;
    let data_entries = svc.list_data_entries(&project.id).await?;
    let analyses = svc.list_analyses(&project.id).await?;
    let observations = svc.observations_for_research(&project.id).await?;
    let photos = svc.photos_for_research(&project.id).await?;

    let counts = AstroCounts {
        data_entries: data_entries.len(),
        analyses: analyses.len(),
        observations: observations.len(),
        photos: photos.len(),
    };
    Ok(Json(AstroDetailPage {
        project: project.into(),
        data_entries,
        analyses,
        observations,
        photos,
        counts,
    }))
}

/// POST /research/astronomy/{slug}/entries/
pub async fn astro_add_entry(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(slug): Path<String>,
    Json(input): Json<DataEntryInput>,
) -> WebResult<(StatusCode, Json<ResearchDataEntry>)> {
    let svc = &state.service;
    let project = svc.get_astro_research_project_by_slug(&slug).await?;
    let entry = svc.add_research_data_entry(&project, input).await?;
    tracing::info!(%slug, id = %entry.id, "research data entry added");
    Ok((StatusCode::CREATED, Json(entry)))
}
