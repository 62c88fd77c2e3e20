//! General research projects. Every query is scoped to the owning user; a
//! project owned by someone else is reported as missing.

use chrono::{NaiveDate, Utc};

use orr_core::entities::ResearchProject;
use orr_core::enums::{Priority, ResearchField, ResearchStatus};
use orr_core::ids::PREFIX_RESEARCH;
use orr_core::inputs::ResearchProjectInput;
use orr_core::responses::{CountPoint, ResearchDashboard, ResearchProjectList};
use orr_core::text::slugify;

use crate::error::DatabaseError;
use crate::helpers::{
    WhereBuilder, get_bool, get_opt_string, like_pattern, nullable, opt_date_text, parse_date,
    parse_datetime, parse_enum, parse_json, parse_optional_date, placeholders, sql_int,
};
use crate::service::OrrService;
use crate::updates::research::ResearchProjectUpdate;

const SELECT_COLS: &str = "id, user_id, title, slug, field, description, objectives, \
     methodology, hypothesis, start_date, end_date, status, priority, progress_percentage, \
     findings, conclusions, future_work, data_schema, institution, supervisor, collaborators, \
     is_public, is_published, created_at, updated_at";

const RECENT_LIMIT: u64 = 5;
const RECENT_ASTRO_LIMIT: u64 = 3;
const HIGH_PRIORITY_LIMIT: usize = 5;

fn row_to_project(row: &libsql::Row) -> Result<ResearchProject, DatabaseError> {
    Ok(ResearchProject {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        slug: row.get(3)?,
        field: parse_enum(&row.get::<String>(4)?)?,
        description: row.get(5)?,
        objectives: row.get(6)?,
        methodology: row.get(7)?,
        hypothesis: row.get(8)?,
        start_date: parse_date(&row.get::<String>(9)?)?,
        end_date: parse_optional_date(get_opt_string(row, 10)?.as_deref())?,
        status: parse_enum(&row.get::<String>(11)?)?,
        priority: parse_enum(&row.get::<String>(12)?)?,
        progress_percentage: row.get(13)?,
        findings: row.get(14)?,
        conclusions: row.get(15)?,
        future_work: row.get(16)?,
        data_schema: parse_json(&row.get::<String>(17)?)?,
        institution: row.get(18)?,
        supervisor: row.get(19)?,
        collaborators: row.get(20)?,
        is_public: get_bool(row, 21)?,
        is_published: get_bool(row, 22)?,
        created_at: parse_datetime(&row.get::<String>(23)?)?,
        updated_at: parse_datetime(&row.get::<String>(24)?)?,
    })
}

/// List filters as submitted in the query string.
///
/// Values are matched verbatim against stored choices, so an unknown value
/// simply matches nothing.
#[derive(Debug, Clone, Default)]
pub struct ResearchFilter {
    pub field: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Case-insensitive match on title, description and objectives.
    pub search: Option<String>,
}

impl ResearchFilter {
    fn to_where(&self, user_id: &str) -> WhereBuilder {
        let mut filter = WhereBuilder::new();
        filter.bind("user_id = ?", user_id);
        if let Some(ref field) = self.field {
            filter.bind("field = ?", field.as_str());
        }
        if let Some(ref status) = self.status {
            filter.bind("status = ?", status.as_str());
        }
        if let Some(ref priority) = self.priority {
            filter.bind("priority = ?", priority.as_str());
        }
        if let Some(ref search) = self.search {
            filter.bind(
                "(title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\' \
                 OR objectives LIKE ? ESCAPE '\\')",
                like_pattern(search),
            );
        }
        filter
    }
}

/// Merge an edit onto the stored project so the whole result can be validated.
fn merged_input(current: &ResearchProject, update: &ResearchProjectUpdate) -> ResearchProjectInput {
    ResearchProjectInput {
        title: update.title.clone().unwrap_or_else(|| current.title.clone()),
        field: update.field.unwrap_or(current.field),
        description: update
            .description
            .clone()
            .unwrap_or_else(|| current.description.clone()),
        objectives: update
            .objectives
            .clone()
            .unwrap_or_else(|| current.objectives.clone()),
        methodology: update
            .methodology
            .clone()
            .unwrap_or_else(|| current.methodology.clone()),
        hypothesis: update
            .hypothesis
            .clone()
            .unwrap_or_else(|| current.hypothesis.clone()),
        start_date: Some(update.start_date.unwrap_or(current.start_date)),
        end_date: update.end_date.unwrap_or(current.end_date),
        status: update.status.unwrap_or(current.status),
        priority: update.priority.unwrap_or(current.priority),
        progress_percentage: update
            .progress_percentage
            .unwrap_or(current.progress_percentage),
        findings: String::new(),
        conclusions: String::new(),
        future_work: String::new(),
        data_schema: Some(
            update
                .data_schema
                .clone()
                .unwrap_or_else(|| current.data_schema.clone()),
        ),
        institution: update
            .institution
            .clone()
            .unwrap_or_else(|| current.institution.clone()),
        supervisor: update
            .supervisor
            .clone()
            .unwrap_or_else(|| current.supervisor.clone()),
        collaborators: String::new(),
        is_public: false,
        is_published: false,
    }
}

/// Append `column = ?N` for the next parameter.
fn push_set(sets: &mut Vec<String>, params: &mut Vec<libsql::Value>, column: &str, value: libsql::Value) {
    params.push(value);
    sets.push(format!("{column} = ?{}", params.len()));
}

impl OrrService {
    /// Validate and store a project owned by `user_id`.
    pub async fn create_research_project(
        &self,
        user_id: &str,
        mut input: ResearchProjectInput,
        today: NaiveDate,
    ) -> Result<ResearchProject, DatabaseError> {
        input.validate(today)?;
        let start_date = input.start_date.unwrap_or(today);
        let data_schema = input
            .data_schema
            .take()
            .unwrap_or_else(|| serde_json::json!({}));

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_RESEARCH).await?;
        let slug = self
            .unique_slug("research_projects", &slugify(&input.title))
            .await?;

        let params: Vec<libsql::Value> = vec![
            id.clone().into(),
            user_id.into(),
            input.title.into(),
            slug.clone().into(),
            input.field.as_str().into(),
            input.description.into(),
            input.objectives.into(),
            input.methodology.into(),
            input.hypothesis.into(),
            start_date.to_string().into(),
            nullable(opt_date_text(input.end_date)),
            input.status.as_str().into(),
            input.priority.as_str().into(),
            input.progress_percentage.into(),
            input.findings.into(),
            input.conclusions.into(),
            input.future_work.into(),
            data_schema.to_string().into(),
            input.institution.into(),
            input.supervisor.into(),
            input.collaborators.into(),
            i64::from(input.is_public).into(),
            i64::from(input.is_published).into(),
            now.clone().into(),
            now.into(),
        ];
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO research_projects ({SELECT_COLS}) VALUES ({})",
                    placeholders(params.len())
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        tracing::debug!(%id, %slug, user_id, "research project created");

        self.get_research_project(user_id, &slug).await
    }

    pub async fn get_research_project(
        &self,
        user_id: &str,
        slug: &str,
    ) -> Result<ResearchProject, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM research_projects WHERE slug = ?1 AND user_id = ?2"
                ),
                [slug, user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_project(&row)
    }

    /// Apply an edit. The slug stays fixed so existing links keep working.
    pub async fn update_research_project(
        &self,
        user_id: &str,
        slug: &str,
        update: ResearchProjectUpdate,
        today: NaiveDate,
    ) -> Result<ResearchProject, DatabaseError> {
        let current = self.get_research_project(user_id, slug).await?;
        let mut merged = merged_input(&current, &update);
        merged.validate(today)?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(title) = update.title {
            push_set(&mut sets, &mut params, "title", title.into());
        }
        if let Some(field) = update.field {
            push_set(&mut sets, &mut params, "field", field.as_str().into());
        }
        if let Some(description) = update.description {
            push_set(&mut sets, &mut params, "description", description.into());
        }
        if let Some(objectives) = update.objectives {
            push_set(&mut sets, &mut params, "objectives", objectives.into());
        }
        if let Some(methodology) = update.methodology {
            push_set(&mut sets, &mut params, "methodology", methodology.into());
        }
        if let Some(hypothesis) = update.hypothesis {
            push_set(&mut sets, &mut params, "hypothesis", hypothesis.into());
        }
        if let Some(start_date) = update.start_date {
            push_set(&mut sets, &mut params, "start_date", start_date.to_string().into());
        }
        if let Some(end_date) = update.end_date {
            push_set(&mut sets, &mut params, "end_date", nullable(opt_date_text(end_date)));
        }
        if let Some(status) = update.status {
            push_set(&mut sets, &mut params, "status", status.as_str().into());
        }
        if let Some(priority) = update.priority {
            push_set(&mut sets, &mut params, "priority", priority.as_str().into());
        }
        if let Some(progress) = update.progress_percentage {
            push_set(&mut sets, &mut params, "progress_percentage", progress.into());
        }
        if let Some(findings) = update.findings {
            push_set(&mut sets, &mut params, "findings", findings.into());
        }
        if let Some(conclusions) = update.conclusions {
            push_set(&mut sets, &mut params, "conclusions", conclusions.into());
        }
        if let Some(future_work) = update.future_work {
            push_set(&mut sets, &mut params, "future_work", future_work.into());
        }
        if update.data_schema.is_some() {
            let schema = merged.data_schema.take().unwrap_or_else(|| serde_json::json!({}));
            push_set(&mut sets, &mut params, "data_schema", schema.to_string().into());
        }
        if let Some(institution) = update.institution {
            push_set(&mut sets, &mut params, "institution", institution.into());
        }
        if let Some(supervisor) = update.supervisor {
            push_set(&mut sets, &mut params, "supervisor", supervisor.into());
        }
        if let Some(collaborators) = update.collaborators {
            push_set(&mut sets, &mut params, "collaborators", collaborators.into());
        }
        if let Some(is_public) = update.is_public {
            push_set(&mut sets, &mut params, "is_public", i64::from(is_public).into());
        }
        if let Some(is_published) = update.is_published {
            push_set(&mut sets, &mut params, "is_published", i64::from(is_published).into());
        }

        if sets.is_empty() {
            return Ok(current);
        }

        push_set(&mut sets, &mut params, "updated_at", Utc::now().to_rfc3339().into());
        params.push(current.id.clone().into());
        let sql = format!(
            "UPDATE research_projects SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );
        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        tracing::debug!(id = %current.id, slug, "research project updated");

        self.get_research_project(user_id, slug).await
    }

    pub async fn delete_research_project(&self, user_id: &str, slug: &str) -> Result<(), DatabaseError> {
        let affected = self
            .db()
            .conn()
            .execute(
                "DELETE FROM research_projects WHERE slug = ?1 AND user_id = ?2",
                [slug, user_id],
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(slug, user_id, "research project deleted");
        Ok(())
    }

    /// Filtered project list, most recently touched first, with counts of
    /// the filtered set.
    pub async fn list_research_projects(
        &self,
        user_id: &str,
        filter: &ResearchFilter,
    ) -> Result<ResearchProjectList, DatabaseError> {
        let filter = filter.to_where(user_id);
        let projects = self
            .query_research_projects(
                &format!(
                    "SELECT {SELECT_COLS} FROM research_projects{} ORDER BY updated_at DESC",
                    filter.sql()
                ),
                filter.params(),
            )
            .await?;

        let count_status = |status: ResearchStatus| {
            i64::try_from(projects.iter().filter(|p| p.status == status).count()).unwrap_or(i64::MAX)
        };
        let active_count = count_status(ResearchStatus::Active);
        let completed_count = count_status(ResearchStatus::Completed);
        let total_count = i64::try_from(projects.len()).unwrap_or(i64::MAX);

        Ok(ResearchProjectList {
            projects,
            total_count,
            active_count,
            completed_count,
        })
    }

    /// Every project of the user, newest first, for CSV export.
    pub async fn research_projects_for_export(
        &self,
        user_id: &str,
    ) -> Result<Vec<ResearchProject>, DatabaseError> {
        self.query_research_projects(
            &format!(
                "SELECT {SELECT_COLS} FROM research_projects WHERE user_id = ?1 ORDER BY created_at DESC"
            ),
            vec![user_id.into()],
        )
        .await
    }

    /// Totals span the user's projects and every astronomy programme;
    /// charts and lists cover the user's projects only.
    pub async fn research_dashboard(&self, user_id: &str) -> Result<ResearchDashboard, DatabaseError> {
        let general_status = |status: Option<ResearchStatus>| {
            let mut filter = WhereBuilder::new();
            filter.bind("user_id = ?", user_id);
            if let Some(status) = status {
                filter.bind("status = ?", status.as_str());
            }
            filter
        };

        let mut totals = [0_i64; 4];
        for (slot, status) in totals.iter_mut().zip([
            None,
            Some(ResearchStatus::Active),
            Some(ResearchStatus::Completed),
            Some(ResearchStatus::Planning),
        ]) {
            let filter = general_status(status);
            let general = self
                .count(
                    &format!("SELECT COUNT(*) FROM research_projects{}", filter.sql()),
                    filter.params(),
                )
                .await?;
            *slot = general + self.count_astro_research_projects(status).await?;
        }
        let [total_projects, active_projects, completed_projects, planning_projects] = totals;

        let by_field = self
            .grouped_counts(
                "SELECT field, COUNT(*) AS n FROM research_projects WHERE user_id = ?1
                 GROUP BY field ORDER BY n DESC, field",
                user_id,
            )
            .await?
            .into_iter()
            .map(|(key, count)| {
                let field = key.parse::<ResearchField>().ok();
                CountPoint {
                    label: field.map_or_else(|| key.clone(), |f| f.label().to_string()),
                    color: Some(field.unwrap_or(ResearchField::Other).chart_color().to_string()),
                    key,
                    count,
                }
            })
            .collect();

        let by_status = self
            .grouped_counts(
                "SELECT status, COUNT(*) FROM research_projects WHERE user_id = ?1
                 GROUP BY status ORDER BY status",
                user_id,
            )
            .await?
            .into_iter()
            .map(|(key, count)| {
                let status = key.parse::<ResearchStatus>().ok();
                CountPoint {
                    label: status.map_or_else(|| key.clone(), |s| s.label().to_string()),
                    color: status.map(|s| s.badge_color().to_string()),
                    key,
                    count,
                }
            })
            .collect();

        let recent_general = self
            .query_research_projects(
                &format!(
                    "SELECT {SELECT_COLS} FROM research_projects WHERE user_id = ?1
                     ORDER BY updated_at DESC LIMIT ?2"
                ),
                vec![user_id.into(), sql_int(RECENT_LIMIT)],
            )
            .await?;
        let recent_astro = self.recent_astro_research_projects(RECENT_ASTRO_LIMIT).await?;

        let mut high_priority = self
            .query_research_projects(
                &format!(
                    "SELECT {SELECT_COLS} FROM research_projects
                     WHERE user_id = ?1 AND priority IN (?2, ?3) AND status IN (?4, ?5)
                     ORDER BY updated_at DESC"
                ),
                vec![
                    user_id.into(),
                    Priority::High.as_str().into(),
                    Priority::Urgent.as_str().into(),
                    ResearchStatus::Active.as_str().into(),
                    ResearchStatus::Planning.as_str().into(),
                ],
            )
            .await?;
        // Stable sort keeps updated_at DESC within each priority.
        high_priority.sort_by_key(|p| std::cmp::Reverse(p.priority.rank()));
        high_priority.truncate(HIGH_PRIORITY_LIMIT);

        let mut active = WhereBuilder::new();
        active
            .bind("user_id = ?", user_id)
            .bind("status = ?", ResearchStatus::Active.as_str());
        let progress = self
            .query_research_projects(
                &format!("SELECT {SELECT_COLS} FROM research_projects{}", active.sql()),
                active.params(),
            )
            .await?
            .iter()
            .map(|p| p.progress_percentage)
            .collect::<Vec<_>>();

        Ok(ResearchDashboard {
            total_projects,
            active_projects,
            completed_projects,
            planning_projects,
            by_field,
            by_status,
            recent_general,
            recent_astro,
            high_priority,
            avg_progress: average_progress(&progress),
        })
    }

    async fn grouped_counts(&self, sql: &str, user_id: &str) -> Result<Vec<(String, i64)>, DatabaseError> {
        let mut rows = self.db().conn().query(sql, [user_id]).await?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next().await? {
            counts.push((row.get::<String>(0)?, row.get::<i64>(1)?));
        }
        Ok(counts)
    }

    async fn query_research_projects(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<ResearchProject>, DatabaseError> {
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
}

/// Mean of the given percentages rounded to one decimal; zero when empty.
#[allow(clippy::cast_precision_loss)]
fn average_progress(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<i64>() as f64 / values.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use orr_core::enums::AstroResearchType;
    use pretty_assertions::assert_eq;

    use crate::repos::astro_research::NewAstroResearchProject;
    use crate::test_support::helpers::{test_service, test_user};
    use crate::updates::research::ResearchProjectUpdateBuilder;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn input(title: &str) -> ResearchProjectInput {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "field": "ai",
            "description": "Pruning large models",
            "objectives": "Halve parameter count",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_fills_defaults() {
        let svc = test_service().await;
        let user = test_user(&svc, "ana").await;
        let project = svc
            .create_research_project(&user.id, input("Sparse Attention"), today())
            .await
            .unwrap();
        assert_eq!(project.slug, "sparse-attention");
        assert_eq!(project.start_date, today());
        assert_eq!(project.status, ResearchStatus::Planning);
        assert_eq!(project.priority, Priority::Medium);
        assert_eq!(project.data_schema, serde_json::json!({}));
    }

    #[tokio::test]
    async fn invalid_schema_is_rejected() {
        let svc = test_service().await;
        let user = test_user(&svc, "ana").await;
        let mut bad = input("Broken");
        bad.data_schema = Some(serde_json::json!("[1, 2]"));
        bad.progress_percentage = 140;
        match svc.create_research_project(&user.id, bad, today()).await {
            Err(DatabaseError::Validation(errors)) => {
                assert!(errors.has("data_schema"));
                assert!(errors.has("progress_percentage"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_users_projects_are_invisible() {
        let svc = test_service().await;
        let owner = test_user(&svc, "owner").await;
        let intruder = test_user(&svc, "intruder").await;
        let project = svc
            .create_research_project(&owner.id, input("Private Work"), today())
            .await
            .unwrap();

        assert!(matches!(
            svc.get_research_project(&intruder.id, &project.slug).await,
            Err(DatabaseError::NoResult)
        ));
        assert!(matches!(
            svc.delete_research_project(&intruder.id, &project.slug).await,
            Err(DatabaseError::NoResult)
        ));
        let update = ResearchProjectUpdateBuilder::new().title("Hijacked").build();
        assert!(matches!(
            svc.update_research_project(&intruder.id, &project.slug, update, today())
                .await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn update_keeps_slug_and_validates_dates() {
        let svc = test_service().await;
        let user = test_user(&svc, "ana").await;
        let project = svc
            .create_research_project(&user.id, input("Original Title"), today())
            .await
            .unwrap();

        let update = ResearchProjectUpdateBuilder::new()
            .title("Renamed")
            .progress_percentage(55)
            .status(ResearchStatus::Active)
            .build();
        let updated = svc
            .update_research_project(&user.id, &project.slug, update, today())
            .await
            .unwrap();
        assert_eq!(updated.slug, "original-title");
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.progress_percentage, 55);

        let backwards = ResearchProjectUpdateBuilder::new()
            .end_date(NaiveDate::from_ymd_opt(2020, 1, 1))
            .build();
        assert!(matches!(
            svc.update_research_project(&user.id, &project.slug, backwards, today())
                .await,
            Err(DatabaseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_and_counts() {
        let svc = test_service().await;
        let user = test_user(&svc, "ana").await;
        let mut physics = input("Quantum Dots");
        physics.field = ResearchField::Physics;
        physics.status = ResearchStatus::Active;
        svc.create_research_project(&user.id, physics, today()).await.unwrap();
        let mut done = input("Finished Pruning");
        done.status = ResearchStatus::Completed;
        svc.create_research_project(&user.id, done, today()).await.unwrap();
        svc.create_research_project(&user.id, input("Idea"), today()).await.unwrap();

        let all = svc
            .list_research_projects(&user.id, &ResearchFilter::default())
            .await
            .unwrap();
        assert_eq!((all.total_count, all.active_count, all.completed_count), (3, 1, 1));

        let ai = svc
            .list_research_projects(
                &user.id,
                &ResearchFilter {
                    field: Some("ai".into()),
                    ..ResearchFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!((ai.total_count, ai.active_count, ai.completed_count), (2, 0, 1));

        let search = svc
            .list_research_projects(
                &user.id,
                &ResearchFilter {
                    search: Some("QUANTUM".into()),
                    ..ResearchFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(search.projects.len(), 1);
        assert_eq!(search.projects[0].title, "Quantum Dots");

        let unknown = svc
            .list_research_projects(
                &user.id,
                &ResearchFilter {
                    status: Some("bogus".into()),
                    ..ResearchFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(unknown.total_count, 0);
    }

    #[tokio::test]
    async fn dashboard_combines_general_and_astro() {
        let svc = test_service().await;
        let user = test_user(&svc, "ana").await;
        let mut urgent = input("Urgent Work");
        urgent.priority = Priority::Urgent;
        urgent.status = ResearchStatus::Active;
        urgent.progress_percentage = 40;
        svc.create_research_project(&user.id, urgent, today()).await.unwrap();
        let mut high = input("High Work");
        high.priority = Priority::High;
        high.status = ResearchStatus::Active;
        high.progress_percentage = 75;
        svc.create_research_project(&user.id, high, today()).await.unwrap();
        let mut physics = input("Lattice");
        physics.field = ResearchField::Physics;
        svc.create_research_project(&user.id, physics, today()).await.unwrap();

        let mut astro = NewAstroResearchProject::new(
            "Io transits",
            AstroResearchType::Orbital,
            "Timing",
            today(),
        );
        astro.status = ResearchStatus::Active;
        svc.create_astro_research_project(astro).await.unwrap();

        let dashboard = svc.research_dashboard(&user.id).await.unwrap();
        assert_eq!(dashboard.total_projects, 4);
        assert_eq!(dashboard.active_projects, 3);
        assert_eq!(dashboard.planning_projects, 1);
        assert_eq!(dashboard.completed_projects, 0);
        assert!((dashboard.avg_progress - 57.5).abs() < f64::EPSILON);

        assert_eq!(dashboard.by_field[0].key, "ai");
        assert_eq!(dashboard.by_field[0].count, 2);
        assert_eq!(dashboard.by_field[0].color.as_deref(), Some("#667eea"));
        let statuses: Vec<_> = dashboard.by_status.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(statuses, vec!["active", "planning"]);

        let priorities: Vec<_> = dashboard.high_priority.iter().map(|p| p.priority).collect();
        assert_eq!(priorities, vec![Priority::Urgent, Priority::High]);
        assert_eq!(dashboard.recent_astro.len(), 1);
        assert_eq!(dashboard.recent_general.len(), 3);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert!((average_progress(&[10, 20, 25]) - 18.3).abs() < 1e-9);
        assert!(average_progress(&[]).abs() < f64::EPSILON);
    }
}
