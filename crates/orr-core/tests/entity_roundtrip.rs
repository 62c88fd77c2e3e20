//! Serde roundtrip and JsonSchema validation tests for entity types.

use chrono::{NaiveDate, TimeZone, Utc};
use schemars::schema_for;
use serde_json::json;
use orr_core::entities::*;
use orr_core::enums::*;

fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    skill_roundtrip,
    Skill,
    Skill {
        id: "skl-0a1b2c3d".into(),
        name: "Rust".into(),
        skill_type: SkillType::Language,
        icon: Some("fab fa-rust".into()),
        image_icon: None,
        proficiency: 85,
        order: 1,
        is_featured: true,
    }
);

roundtrip_and_validate!(
    blog_post_roundtrip,
    BlogPost,
    BlogPost {
        id: "pst-a3f8b2c1".into(),
        title: "Saturn at opposition".into(),
        slug: "saturn-at-opposition".into(),
        excerpt: "Rings wide open".into(),
        content: "# Saturn\n\n![ring](image-1|large|center)".into(),
        content_type: ContentType::Markdown,
        status: PostStatus::Published,
        category_id: Some("bcat-00000001".into()),
        author_id: "usr-00000001".into(),
        is_featured: false,
        reading_time_minutes: 1,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        published_at: Some(Utc::now()),
    }
);

roundtrip_and_validate!(
    observation_roundtrip,
    ObservationLog,
    ObservationLog {
        id: "obs-11223344".into(),
        title: "Jupiter".into(),
        slug: "jupiter-20250110".into(),
        observation_date: Utc.with_ymd_and_hms(2025, 1, 10, 20, 30, 0).unwrap(),
        celestial_object_id: None,
        object_name: "Jupiter".into(),
        location: "Backyard".into(),
        latitude: None,
        longitude: None,
        seeing: SkyQuality::Good,
        transparency: SkyQuality::Average,
        moon_phase: "Waxing gibbous".into(),
        temperature: Some(24),
        cloud_cover: 10,
        telescope: "8\" Dobsonian".into(),
        eyepiece: "10mm".into(),
        magnification: "120x".into(),
        camera: String::new(),
        notes: "GRS visible".into(),
        research_project_id: Some("ast-00000001".into()),
        is_public: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    astro_photo_roundtrip,
    AstroPhoto,
    AstroPhoto {
        id: "pho-deadbeef".into(),
        title: "Diamond ring".into(),
        slug: "diamond-ring".into(),
        image: "astronomy/photos/2024/04/ring.jpg".into(),
        thumbnail: None,
        celestial_object_id: None,
        object_name: "Sun".into(),
        capture_date: Utc::now(),
        exposure_time: "1/4000s".into(),
        iso: Some(100),
        aperture: "f/8".into(),
        focal_length: "600mm".into(),
        frames: None,
        telescope: String::new(),
        camera: "Z6".into(),
        mount: String::new(),
        processing_software: String::new(),
        processing_notes: String::new(),
        observation_id: None,
        research_project_id: None,
        is_featured: true,
        is_public: true,
        description: String::new(),
        is_processed: false,
        sequence_number: Some(3),
        eclipse_phase: Some(EclipsePhase::SolarDiamond2),
        solar_photo_method: Some(SolarPhotoMethod::WhiteLight),
        filter_used: None,
        exact_time: None,
        is_composite: false,
        frame_count: None,
        ambient_temperature: None,
        hdr_brackets: String::new(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    data_entry_roundtrip,
    ResearchDataEntry,
    ResearchDataEntry {
        id: "dat-00000001".into(),
        project_id: "ast-00000001".into(),
        observation_id: None,
        observation_datetime: Utc::now(),
        days_from_start: 3.75,
        data: json!({"io": 2.3, "europa": -1.5}),
        data_quality: Some(SkyQuality::Excellent),
        notes: String::new(),
        is_outlier: false,
        is_validated: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    research_project_roundtrip,
    ResearchProject,
    ResearchProject {
        id: "res-00000001".into(),
        user_id: "usr-00000001".into(),
        title: "Graph kernels".into(),
        slug: "graph-kernels".into(),
        field: ResearchField::Mathematics,
        description: "d".into(),
        objectives: "o".into(),
        methodology: String::new(),
        hypothesis: String::new(),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end_date: None,
        status: ResearchStatus::Paused,
        priority: Priority::High,
        progress_percentage: 25,
        findings: String::new(),
        conclusions: String::new(),
        future_work: String::new(),
        data_schema: json!({"dataset": "ogbn-arxiv"}),
        institution: "ITB".into(),
        supervisor: String::new(),
        collaborators: String::new(),
        is_public: false,
        is_published: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

#[test]
fn choice_enum_schema_lists_storage_strings() {
    let schema = serde_json::to_value(schema_for!(PostStatus)).unwrap();
    let text = schema.to_string();
    assert!(text.contains("\"draft\""));
    assert!(text.contains("\"published\""));
}

#[test]
fn photo_safety_follows_phase() {
    let mut photo: AstroPhoto = serde_json::from_value(json!({
        "id": "pho-1", "title": "t", "slug": "t", "image": "i.jpg", "thumbnail": null,
        "celestial_object_id": null, "object_name": "Sun",
        "capture_date": "2024-04-08T18:00:00Z", "exposure_time": "", "iso": null,
        "aperture": "", "focal_length": "", "frames": null, "telescope": "", "camera": "",
        "mount": "", "processing_software": "", "processing_notes": "",
        "observation_id": null, "research_project_id": null, "is_featured": false,
        "is_public": true, "description": "", "is_processed": false,
        "sequence_number": null, "eclipse_phase": "solar_c1", "solar_photo_method": null,
        "filter_used": "baader", "exact_time": null, "is_composite": false,
        "frame_count": null, "ambient_temperature": null, "hdr_brackets": "",
        "created_at": "2024-04-08T18:00:00Z"
    }))
    .unwrap();
    assert!(photo.is_solar_eclipse());
    assert!(photo.requires_safety_equipment());

    photo.eclipse_phase = None;
    assert!(!photo.is_solar_eclipse());
    assert!(!photo.is_lunar_eclipse());
    assert!(!photo.requires_safety_equipment());
}
