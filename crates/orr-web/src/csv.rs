//! RFC 4180 writer for the research project export.

use orr_core::entities::ResearchProject;

pub const RESEARCH_CSV_FILENAME: &str = "research_projects.csv";

pub const RESEARCH_CSV_HEADER: [&str; 11] = [
    "Title",
    "Field",
    "Status",
    "Priority",
    "Progress (%)",
    "Start Date",
    "End Date",
    "Institution",
    "Supervisor",
    "Created At",
    "Updated At",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Quote `field` when it holds a comma, quote or line break.
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

fn push_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field.as_ref());
    }
    out.push_str("\r\n");
}

/// Header plus one row per project, in the order given.
#[must_use]
pub fn research_projects_csv(projects: &[ResearchProject]) -> String {
    let mut out = String::new();
    push_record(&mut out, &RESEARCH_CSV_HEADER);
    for project in projects {
        push_record(
            &mut out,
            &[
                project.title.clone(),
                project.field.label().to_string(),
                project.status.label().to_string(),
                project.priority.label().to_string(),
                project.progress_percentage.to_string(),
                project.start_date.format("%Y-%m-%d").to_string(),
                project
                    .end_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                project.institution.clone(),
                project.supervisor.clone(),
                project.created_at.format(TIMESTAMP_FORMAT).to_string(),
                project.updated_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use orr_core::enums::{Priority, ResearchField, ResearchStatus};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("a,b", "\"a,b\"")]
    #[case("say \"hi\"", "\"say \"\"hi\"\"\"")]
    #[case("two\nlines", "\"two\nlines\"")]
    #[case("", "")]
    fn quoting(#[case] raw: &str, #[case] expected: &str) {
        let mut out = String::new();
        push_field(&mut out, raw);
        assert_eq!(out, expected);
    }

    #[test]
    fn rows_use_labels_and_blank_end_date() {
        let stamp = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let project = ResearchProject {
            id: "rsp-1".into(),
            user_id: "usr-1".into(),
            title: "Dark matter, revisited".into(),
            slug: "dark-matter-revisited".into(),
            field: ResearchField::Ai,
            description: "d".into(),
            objectives: "o".into(),
            methodology: String::new(),
            hypothesis: String::new(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            end_date: None,
            status: ResearchStatus::Active,
            priority: Priority::Urgent,
            progress_percentage: 40,
            findings: String::new(),
            conclusions: String::new(),
            future_work: String::new(),
            data_schema: serde_json::json!({}),
            institution: "ITB".into(),
            supervisor: String::new(),
            collaborators: String::new(),
            is_public: false,
            is_published: false,
            created_at: stamp,
            updated_at: stamp,
        };

        let csv = research_projects_csv(&[project]);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "Title,Field,Status,Priority,Progress (%),Start Date,End Date,Institution,Supervisor,Created At,Updated At"
        );
        assert_eq!(
            lines[1],
            "\"Dark matter, revisited\",AI & Machine Learning,Active,Urgent,40,2025-01-02,,ITB,,2025-03-04 05:06:07,2025-03-04 05:06:07"
        );
        assert_eq!(lines[2], "");
    }
}
