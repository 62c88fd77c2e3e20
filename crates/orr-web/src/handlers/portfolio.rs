//! Home, about, portfolio projects and the contact form.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use orr_core::entities::{
    AstroPhoto, BlogPost, ContactMessage, PortfolioProject, ProjectCategory, ProjectDocument,
    ResearchCategory, Skill,
};
use orr_core::enums::ProjectType;
use orr_core::inputs::ContactInput;
use orr_core::pagination::Page;
use orr_db::repos::portfolio::ProjectFilter;
use serde::{Deserialize, Serialize};

use super::{choice_param, empty_page, param};
use crate::error::WebResult;
use crate::json::Json;
use crate::state::AppState;

const HOME_PROJECTS: u64 = 3;
const HOME_SKILLS: u64 = 6;
const HOME_POSTS: u64 = 3;
const HOME_PHOTOS: u64 = 6;
const RELATED_PROJECTS: u64 = 3;

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub featured_projects: Vec<PortfolioProject>,
    pub featured_skills: Vec<Skill>,
    pub latest_posts: Vec<BlogPost>,
    pub astro_photos: Vec<AstroPhoto>,
}

/// GET /
pub async fn home(State(state): State<AppState>) -> WebResult<Json<HomePage>> {
    let svc = &state.service;
    Ok(Json(HomePage {
        featured_projects: svc.featured_portfolio_projects(HOME_PROJECTS).await?,
        featured_skills: svc.featured_skills(HOME_SKILLS).await?,
        latest_posts: svc.recent_published_posts(HOME_POSTS).await?,
        astro_photos: svc.featured_public_photos(HOME_PHOTOS).await?,
    }))
}

#[derive(Debug, Serialize)]
pub struct AboutPage {
    pub page_title: &'static str,
    pub skills: Vec<Skill>,
}

/// GET /about/
pub async fn about(State(state): State<AppState>) -> WebResult<Json<AboutPage>> {
    Ok(Json(AboutPage {
        page_title: "About Me",
        skills: state.service.list_skills().await?,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub research_category: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectListPage {
    pub projects: Page<PortfolioProject>,
    pub categories: Vec<ProjectCategory>,
    pub research_categories: Vec<ResearchCategory>,
}

/// GET /projects/
pub async fn project_list(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> WebResult<Json<ProjectListPage>> {
    let svc = &state.service;
    let per_page = state.config.general.page_size_projects;

    let projects = match choice_param::<ProjectType>(query.kind.as_deref()) {
        Ok(project_type) => {
            let filter = ProjectFilter {
                project_type,
                category_slug: param(query.category.as_deref()).map(str::to_string),
                research_area: param(query.research_category.as_deref()).map(str::to_string),
            };
            svc.page_portfolio_projects(&filter, per_page, query.page.as_deref())
                .await?
        }
        Err(_) => empty_page(per_page),
    };

    Ok(Json(ProjectListPage {
        projects,
        categories: svc.list_project_categories().await?,
        research_categories: svc.list_research_categories().await?,
    }))
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailPage {
    pub project: PortfolioProject,
    pub category: Option<ProjectCategory>,
    pub skills: Vec<Skill>,
    pub documents: Vec<ProjectDocument>,
    pub related_projects: Vec<PortfolioProject>,
}

/// GET /projects/{slug}/
pub async fn project_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> WebResult<Json<ProjectDetailPage>> {
    let svc = &state.service;
    let project = svc.get_portfolio_project_by_slug(&slug).await?;

    let category = match project.category_id.as_deref() {
        Some(id) => svc
            .list_project_categories()
            .await?
            .into_iter()
            .find(|c| c.id == id),
        None => None,
    };
    let skills = svc
        .list_skills()
        .await?
        .into_iter()
        .filter(|s| project.skill_ids.contains(&s.id))
        .collect();
    let documents = svc.list_project_documents(&project.id).await?;
    let related_projects = svc
        .related_portfolio_projects(&project, RELATED_PROJECTS)
        .await?;

    Ok(Json(ProjectDetailPage {
        project,
        category,
        skills,
        documents,
        related_projects,
    }))
}

#[derive(Debug, Serialize)]
pub struct ContactReceipt {
    pub message: &'static str,
    pub contact: ContactMessage,
}

/// POST /contact/
pub async fn contact(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> WebResult<(StatusCode, Json<ContactReceipt>)> {
    let contact = state.service.create_contact_message(input).await?;
    tracing::info!(id = %contact.id, "contact message received");
    Ok((
        StatusCode::CREATED,
        Json(ContactReceipt {
            message: "Thank you for your message! I will get back to you soon.",
            contact,
        }),
    ))
}
