//! Portfolio repository: skills, categories, projects, and documents.

use chrono::Utc;

use orr_core::entities::{
    PortfolioProject, ProjectCategory, ProjectDocument, ResearchCategory, Skill,
};
use orr_core::enums::{ProjectStatus, ProjectType, ResearchArea, SkillType};
use orr_core::errors::{ValidationErrors, require_max_len, require_percentage, require_text};
use orr_core::ids::{
    PREFIX_DOCUMENT, PREFIX_PROJECT, PREFIX_PROJECT_CATEGORY, PREFIX_RESEARCH_CATEGORY,
    PREFIX_SKILL,
};
use orr_core::pagination::{Page, Paginator};
use orr_core::text::slugify;

use crate::error::DatabaseError;
use crate::helpers::{
    WhereBuilder, count_to_u64, get_bool, get_opt_string, parse_datetime, parse_enum, sql_int,
};
use crate::service::OrrService;

const SKILL_COLS: &str = "id, name, skill_type, icon, image_icon, proficiency, sort_order, is_featured";
const CATEGORY_COLS: &str = "id, name, slug, description";
const RESEARCH_CATEGORY_COLS: &str = "id, astro_project_id, area";
const PROJECT_COLS: &str = "id, title, slug, short_description, full_description, category_id, \
     status, github_url, live_url, thumbnail, project_type, research_category_id, is_featured, \
     sort_order, created_at, updated_at";
const DOCUMENT_COLS: &str = "id, project_id, title, file";
const PROJECT_ORDER: &str = " ORDER BY is_featured DESC, sort_order, created_at DESC";

/// Proficiency given to skills created without one.
pub const DEFAULT_PROFICIENCY: i64 = 80;

fn row_to_skill(row: &libsql::Row) -> Result<Skill, DatabaseError> {
    Ok(Skill {
        id: row.get(0)?,
        name: row.get(1)?,
        skill_type: parse_enum(&row.get::<String>(2)?)?,
        icon: get_opt_string(row, 3)?,
        image_icon: get_opt_string(row, 4)?,
        proficiency: row.get(5)?,
        order: row.get(6)?,
        is_featured: get_bool(row, 7)?,
    })
}

fn row_to_category(row: &libsql::Row) -> Result<ProjectCategory, DatabaseError> {
    Ok(ProjectCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
    })
}

fn row_to_research_category(row: &libsql::Row) -> Result<ResearchCategory, DatabaseError> {
    Ok(ResearchCategory {
        id: row.get(0)?,
        astro_project_id: get_opt_string(row, 1)?,
        area: parse_enum(&row.get::<String>(2)?)?,
    })
}

/// Decodes everything except `skill_ids`, which live in the join table.
fn row_to_project(row: &libsql::Row) -> Result<PortfolioProject, DatabaseError> {
    Ok(PortfolioProject {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        short_description: row.get(3)?,
        full_description: row.get(4)?,
        category_id: get_opt_string(row, 5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        skill_ids: Vec::new(),
        github_url: get_opt_string(row, 7)?,
        live_url: get_opt_string(row, 8)?,
        thumbnail: get_opt_string(row, 9)?,
        project_type: parse_enum(&row.get::<String>(10)?)?,
        research_category_id: get_opt_string(row, 11)?,
        is_featured: get_bool(row, 12)?,
        order: row.get(13)?,
        created_at: parse_datetime(&row.get::<String>(14)?)?,
        updated_at: parse_datetime(&row.get::<String>(15)?)?,
    })
}

fn row_to_document(row: &libsql::Row) -> Result<ProjectDocument, DatabaseError> {
    Ok(ProjectDocument {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        file: row.get(3)?,
    })
}

#[derive(Debug, Clone)]
pub struct NewSkill {
    pub name: String,
    pub skill_type: SkillType,
    pub icon: Option<String>,
    pub image_icon: Option<String>,
    pub proficiency: i64,
    pub order: i64,
    pub is_featured: bool,
}

impl NewSkill {
    #[must_use]
    pub fn new(name: impl Into<String>, skill_type: SkillType) -> Self {
        Self {
            name: name.into(),
            skill_type,
            icon: None,
            image_icon: None,
            proficiency: DEFAULT_PROFICIENCY,
            order: 0,
            is_featured: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPortfolioProject {
    pub title: String,
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
}

impl NewPortfolioProject {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        short_description: impl Into<String>,
        full_description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            short_description: short_description.into(),
            full_description: full_description.into(),
            category_id: None,
            status: ProjectStatus::InProgress,
            skill_ids: Vec::new(),
            github_url: None,
            live_url: None,
            thumbnail: None,
            project_type: ProjectType::Projects,
            research_category_id: None,
            is_featured: false,
            order: 0,
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_max_len(&mut errors, "title", &self.title, 200);
        require_text(&mut errors, "short_description", &self.short_description);
        require_max_len(&mut errors, "short_description", &self.short_description, 300);
        require_text(&mut errors, "full_description", &self.full_description);
        errors.into_result()
    }
}

/// Query-string filters for the public project list.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub project_type: Option<ProjectType>,
    pub category_slug: Option<String>,
    /// Stored `area` value; restricts to research-type projects.
    pub research_area: Option<String>,
}

impl ProjectFilter {
    fn to_where(&self) -> WhereBuilder {
        let mut filter = WhereBuilder::new();
        if let Some(kind) = self.project_type {
            filter.bind("project_type = ?", kind.as_str());
        }
        if let Some(ref slug) = self.category_slug {
            filter.bind(
                "category_id IN (SELECT id FROM project_categories WHERE slug = ?)",
                slug.as_str(),
            );
        }
        if let Some(ref area) = self.research_area {
            filter
                .bind("project_type = ?", ProjectType::Research.as_str())
                .bind(
                    "research_category_id IN (SELECT id FROM research_categories WHERE area = ?)",
                    area.as_str(),
                );
        }
        filter
    }
}

impl OrrService {
    // -- skills ------------------------------------------------------------

    pub async fn create_skill(&self, skill: NewSkill) -> Result<Skill, DatabaseError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &skill.name);
        require_max_len(&mut errors, "name", &skill.name, 100);
        require_percentage(&mut errors, "proficiency", skill.proficiency);
        errors.into_result()?;

        let id = self.db().generate_id(PREFIX_SKILL).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO skills ({SKILL_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                libsql::params![
                    id.as_str(),
                    skill.name.as_str(),
                    skill.skill_type.as_str(),
                    skill.icon.as_deref(),
                    skill.image_icon.as_deref(),
                    skill.proficiency,
                    skill.order,
                    i64::from(skill.is_featured)
                ],
            )
            .await?;
        tracing::debug!(%id, name = %skill.name, "skill created");

        Ok(Skill {
            id,
            name: skill.name,
            skill_type: skill.skill_type,
            icon: skill.icon,
            image_icon: skill.image_icon,
            proficiency: skill.proficiency,
            order: skill.order,
            is_featured: skill.is_featured,
        })
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, DatabaseError> {
        self.query_skills(
            &format!("SELECT {SKILL_COLS} FROM skills ORDER BY sort_order, name"),
            Vec::new(),
        )
        .await
    }

    pub async fn featured_skills(&self, limit: u64) -> Result<Vec<Skill>, DatabaseError> {
        self.query_skills(
            &format!(
                "SELECT {SKILL_COLS} FROM skills WHERE is_featured = 1 \
                 ORDER BY sort_order, name LIMIT ?1"
            ),
            vec![sql_int(limit)],
        )
        .await
    }

    async fn query_skills(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<Skill>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut skills = Vec::new();
        while let Some(row) = rows.next().await? {
            skills.push(row_to_skill(&row)?);
        }
        Ok(skills)
    }

    // -- categories ----------------------------------------------------------

    pub async fn create_project_category(
        &self,
        name: &str,
        description: &str,
    ) -> Result<ProjectCategory, DatabaseError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", name);
        require_max_len(&mut errors, "name", name, 100);
        errors.into_result()?;

        let id = self.db().generate_id(PREFIX_PROJECT_CATEGORY).await?;
        let slug = self.unique_slug("project_categories", &slugify(name)).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO project_categories ({CATEGORY_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), name, slug.as_str(), description],
            )
            .await
            .map_err(|e| DatabaseError::from_write(e, &format!("project category '{name}'")))?;

        Ok(ProjectCategory {
            id,
            name: name.to_string(),
            slug,
            description: description.to_string(),
        })
    }

    pub async fn list_project_categories(&self) -> Result<Vec<ProjectCategory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CATEGORY_COLS} FROM project_categories ORDER BY name"),
                (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_category(&row)?);
        }
        Ok(categories)
    }

    pub async fn create_research_category(
        &self,
        area: ResearchArea,
        astro_project_id: Option<&str>,
    ) -> Result<ResearchCategory, DatabaseError> {
        let id = self.db().generate_id(PREFIX_RESEARCH_CATEGORY).await?;
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO research_categories ({RESEARCH_CATEGORY_COLS}) VALUES (?1, ?2, ?3)"
                ),
                libsql::params![id.as_str(), astro_project_id, area.as_str()],
            )
            .await?;
        Ok(ResearchCategory {
            id,
            astro_project_id: astro_project_id.map(String::from),
            area,
        })
    }

    pub async fn list_research_categories(&self) -> Result<Vec<ResearchCategory>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {RESEARCH_CATEGORY_COLS} FROM research_categories ORDER BY area"),
                (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row_to_research_category(&row)?);
        }
        Ok(categories)
    }

    // -- projects ------------------------------------------------------------

    pub async fn create_portfolio_project(
        &self,
        project: NewPortfolioProject,
    ) -> Result<PortfolioProject, DatabaseError> {
        project.validate()?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;
        let slug = self
            .unique_slug("portfolio_projects", &slugify(&project.title))
            .await?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO portfolio_projects ({PROJECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
                ),
                libsql::params![
                    id.as_str(),
                    project.title.as_str(),
                    slug.as_str(),
                    project.short_description.as_str(),
                    project.full_description.as_str(),
                    project.category_id.as_deref(),
                    project.status.as_str(),
                    project.github_url.as_deref(),
                    project.live_url.as_deref(),
                    project.thumbnail.as_deref(),
                    project.project_type.as_str(),
                    project.research_category_id.as_deref(),
                    i64::from(project.is_featured),
                    project.order,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        for skill_id in &project.skill_ids {
            self.db()
                .conn()
                .execute(
                    "INSERT OR IGNORE INTO portfolio_project_skills (project_id, skill_id) VALUES (?1, ?2)",
                    [id.as_str(), skill_id.as_str()],
                )
                .await?;
        }
        tracing::debug!(%id, %slug, "portfolio project created");

        self.get_portfolio_project(&id).await
    }

    pub async fn get_portfolio_project(&self, id: &str) -> Result<PortfolioProject, DatabaseError> {
        self.one_project("id", id).await
    }

    pub async fn get_portfolio_project_by_slug(
        &self,
        slug: &str,
    ) -> Result<PortfolioProject, DatabaseError> {
        self.one_project("slug", slug).await
    }

    async fn one_project(&self, column: &str, value: &str) -> Result<PortfolioProject, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {PROJECT_COLS} FROM portfolio_projects WHERE {column} = ?1"),
                [value],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let mut project = row_to_project(&row)?;
        project.skill_ids = self.project_skill_ids(&project.id).await?;
        Ok(project)
    }

    /// One page of projects matching `filter`, featured first.
    pub async fn page_portfolio_projects(
        &self,
        filter: &ProjectFilter,
        per_page: u64,
        requested: Option<&str>,
    ) -> Result<Page<PortfolioProject>, DatabaseError> {
        let filter = filter.to_where();
        let total = self
            .count(
                &format!("SELECT COUNT(*) FROM portfolio_projects{}", filter.sql()),
                filter.params(),
            )
            .await?;
        let window = Paginator::new(count_to_u64(total), per_page).page(requested);
        let (tail, params) = filter.paged(window.limit, window.offset);
        let projects = self
            .query_projects(
                &format!(
                    "SELECT {PROJECT_COLS} FROM portfolio_projects{}{PROJECT_ORDER}{tail}",
                    filter.sql()
                ),
                params,
            )
            .await?;
        Ok(Page::new(projects, window))
    }

    pub async fn featured_portfolio_projects(
        &self,
        limit: u64,
    ) -> Result<Vec<PortfolioProject>, DatabaseError> {
        self.query_projects(
            &format!(
                "SELECT {PROJECT_COLS} FROM portfolio_projects WHERE is_featured = 1{PROJECT_ORDER} LIMIT ?1"
            ),
            vec![sql_int(limit)],
        )
        .await
    }

    /// Newest projects sharing `project`'s category (uncategorised matches uncategorised).
    pub async fn related_portfolio_projects(
        &self,
        project: &PortfolioProject,
        limit: u64,
    ) -> Result<Vec<PortfolioProject>, DatabaseError> {
        let category: libsql::Value = project
            .category_id
            .clone()
            .map_or(libsql::Value::Null, Into::into);
        self.query_projects(
            &format!(
                "SELECT {PROJECT_COLS} FROM portfolio_projects
                 WHERE category_id IS ?1 AND id != ?2
                 ORDER BY created_at DESC LIMIT ?3"
            ),
            vec![category, project.id.clone().into(), sql_int(limit)],
        )
        .await
    }

    async fn query_projects(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<PortfolioProject>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        for project in &mut projects {
            project.skill_ids = self.project_skill_ids(&project.id).await?;
        }
        Ok(projects)
    }

    async fn project_skill_ids(&self, project_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT ps.skill_id FROM portfolio_project_skills ps
                 JOIN skills s ON s.id = ps.skill_id
                 WHERE ps.project_id = ?1 ORDER BY s.sort_order, s.name",
                [project_id],
            )
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }

    // -- documents -----------------------------------------------------------

    pub async fn add_project_document(
        &self,
        project_id: &str,
        title: &str,
        file: &str,
    ) -> Result<ProjectDocument, DatabaseError> {
        let id = self.db().generate_id(PREFIX_DOCUMENT).await?;
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO project_documents ({DOCUMENT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                [id.as_str(), project_id, title, file],
            )
            .await?;
        Ok(ProjectDocument {
            id,
            project_id: project_id.to_string(),
            title: title.to_string(),
            file: file.to_string(),
        })
    }

    pub async fn list_project_documents(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProjectDocument>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {DOCUMENT_COLS} FROM project_documents WHERE project_id = ?1 ORDER BY title"
                ),
                [project_id],
            )
            .await?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next().await? {
            documents.push(row_to_document(&row)?);
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::test_service;

    async fn project(svc: &OrrService, title: &str, setup: impl FnOnce(&mut NewPortfolioProject)) -> PortfolioProject {
        let mut new = NewPortfolioProject::new(title, "short", "full");
        setup(&mut new);
        svc.create_portfolio_project(new).await.unwrap()
    }

    #[tokio::test]
    async fn skills_ordered_by_order_then_name() {
        let svc = test_service().await;
        for (name, order) in [("Rust", 1), ("Python", 0), ("Axum", 1)] {
            let mut skill = NewSkill::new(name, SkillType::Language);
            skill.order = order;
            skill.is_featured = name != "Axum";
            svc.create_skill(skill).await.unwrap();
        }

        let names: Vec<_> = svc.list_skills().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Python", "Axum", "Rust"]);

        let featured = svc.featured_skills(6).await.unwrap();
        assert_eq!(featured.len(), 2);
        assert_eq!(featured[0].proficiency, DEFAULT_PROFICIENCY);
    }

    #[tokio::test]
    async fn skill_proficiency_out_of_range_rejected() {
        let svc = test_service().await;
        let mut skill = NewSkill::new("Rust", SkillType::Language);
        skill.proficiency = 101;
        let err = svc.create_skill(skill).await.unwrap_err();
        match err {
            DatabaseError::Validation(errors) => assert!(errors.has("proficiency")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn project_slugs_are_unique() {
        let svc = test_service().await;
        let a = project(&svc, "Star Tracker", |_| {}).await;
        let b = project(&svc, "Star Tracker", |_| {}).await;
        assert_eq!(a.slug, "star-tracker");
        assert_eq!(b.slug, "star-tracker-2");
        assert_eq!(b.status, ProjectStatus::InProgress);
    }

    #[tokio::test]
    async fn project_keeps_skill_links() {
        let svc = test_service().await;
        let rust = svc.create_skill(NewSkill::new("Rust", SkillType::Language)).await.unwrap();
        let created = project(&svc, "Orrery", |p| p.skill_ids = vec![rust.id.clone()]).await;

        let fetched = svc.get_portfolio_project_by_slug(&created.slug).await.unwrap();
        assert_eq!(fetched.skill_ids, vec![rust.id]);
    }

    #[tokio::test]
    async fn list_filters_and_orders() {
        let svc = test_service().await;
        let web = svc.create_project_category("Web Apps", "").await.unwrap();
        let area = svc
            .create_research_category(ResearchArea::Astronomy, None)
            .await
            .unwrap();

        project(&svc, "Plain", |p| p.category_id = Some(web.id.clone())).await;
        project(&svc, "Featured", |p| {
            p.category_id = Some(web.id.clone());
            p.is_featured = true;
        })
        .await;
        project(&svc, "Moon Study", |p| {
            p.project_type = ProjectType::Research;
            p.research_category_id = Some(area.id.clone());
        })
        .await;

        let all = svc
            .page_portfolio_projects(&ProjectFilter::default(), 6, None)
            .await
            .unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.items[0].title, "Featured");

        let by_category = svc
            .page_portfolio_projects(
                &ProjectFilter {
                    category_slug: Some("web-apps".into()),
                    ..ProjectFilter::default()
                },
                6,
                None,
            )
            .await
            .unwrap();
        assert_eq!(by_category.total, 2);

        let research = svc
            .page_portfolio_projects(
                &ProjectFilter {
                    research_area: Some("Astronomy".into()),
                    ..ProjectFilter::default()
                },
                6,
                None,
            )
            .await
            .unwrap();
        assert_eq!(research.items.len(), 1);
        assert_eq!(research.items[0].title, "Moon Study");
    }

    #[tokio::test]
    async fn pagination_clamps_to_last_page() {
        let svc = test_service().await;
        for i in 0..7 {
            project(&svc, &format!("Project {i}"), |_| {}).await;
        }
        let page = svc
            .page_portfolio_projects(&ProjectFilter::default(), 6, Some("99"))
            .await
            .unwrap();
        assert_eq!(page.number, 2);
        assert_eq!(page.items.len(), 1);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn related_excludes_self_and_other_categories() {
        let svc = test_service().await;
        let web = svc.create_project_category("Web", "").await.unwrap();
        let tools = svc.create_project_category("Tools", "").await.unwrap();
        let a = project(&svc, "A", |p| p.category_id = Some(web.id.clone())).await;
        project(&svc, "B", |p| p.category_id = Some(web.id.clone())).await;
        project(&svc, "C", |p| p.category_id = Some(tools.id.clone())).await;

        let related = svc.related_portfolio_projects(&a, 3).await.unwrap();
        let titles: Vec<_> = related.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["B"]);
    }

    #[tokio::test]
    async fn documents_belong_to_project() {
        let svc = test_service().await;
        let p = project(&svc, "Paper", |_| {}).await;
        svc.add_project_document(&p.id, "Report", "documents/report.pdf")
            .await
            .unwrap();
        let docs = svc.list_project_documents(&p.id).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file, "documents/report.pdf");
    }
}
