//! Astronomy repository: celestial catalog, observation logs, eclipse
//! records, and the astrophotography gallery.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use orr_core::entities::{AstroPhoto, CelestialObject, EclipseObservation, ObservationLog};
use orr_core::enums::{
    DanjonScale, EclipsePhase, EclipseType, ObjectType, SkyQuality, SolarFilter, SolarPhotoMethod,
};
use orr_core::errors::{ValidationErrors, require_max_len, require_percentage, require_text};
use orr_core::ids::{PREFIX_CELESTIAL, PREFIX_ECLIPSE, PREFIX_OBSERVATION, PREFIX_PHOTO};
use orr_core::pagination::{Page, Paginator};
use orr_core::text::slugify;

use crate::error::DatabaseError;
use crate::helpers::{
    WhereBuilder, count_to_u64, get_bool, get_opt_string, nullable, opt_datetime_text,
    opt_decimal_text, parse_datetime, parse_enum, parse_optional_datetime, parse_optional_decimal,
    parse_optional_enum, parse_sky_quality, placeholders, sql_int,
};
use crate::service::OrrService;

const OBJECT_COLS: &str = "id, name, object_type, constellation, distance_ly, magnitude, \
     description, parent_id, orbital_period, semi_major_axis";
const OBSERVATION_COLS: &str = "id, title, slug, observation_date, celestial_object_id, \
     object_name, location, latitude, longitude, seeing, transparency, moon_phase, temperature, \
     cloud_cover, telescope, eyepiece, magnification, camera, notes, research_project_id, \
     is_public, created_at, updated_at";
const ECLIPSE_COLS: &str = "id, observation_id, eclipse_type, safety_equipment, c1_time, \
     c2_time, max_time, c3_time, c4_time, p1_time, u1_time, u2_time, u3_time, u4_time, p2_time, \
     danjon_scale, magnitude, obscuration, duration_seconds, temperature_drop, \
     shadow_bands_observed, shadow_bands_notes, baileys_beads_observed, diamond_ring_observed, \
     corona_shape, corona_extent, prominences_observed, prominences_notes, \
     animal_behaviour_notes, weather_impact, viewing_success";
const PHOTO_COLS: &str = "id, title, slug, image, thumbnail, celestial_object_id, object_name, \
     capture_date, exposure_time, iso, aperture, focal_length, frames, telescope, camera, mount, \
     processing_software, processing_notes, observation_id, research_project_id, is_featured, \
     is_public, description, is_processed, sequence_number, eclipse_phase, solar_photo_method, \
     filter_used, exact_time, is_composite, frame_count, ambient_temperature, hdr_brackets, \
     created_at";
const PHOTO_ORDER: &str = " ORDER BY capture_date DESC, sequence_number";

fn row_to_object(row: &libsql::Row) -> Result<CelestialObject, DatabaseError> {
    Ok(CelestialObject {
        id: row.get(0)?,
        name: row.get(1)?,
        object_type: parse_enum(&row.get::<String>(2)?)?,
        constellation: row.get(3)?,
        distance_ly: row.get(4)?,
        magnitude: row.get(5)?,
        description: row.get(6)?,
        parent_id: get_opt_string(row, 7)?,
        orbital_period: row.get::<Option<f64>>(8)?,
        semi_major_axis: row.get::<Option<f64>>(9)?,
    })
}

fn row_to_observation(row: &libsql::Row) -> Result<ObservationLog, DatabaseError> {
    Ok(ObservationLog {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        observation_date: parse_datetime(&row.get::<String>(3)?)?,
        celestial_object_id: get_opt_string(row, 4)?,
        object_name: row.get(5)?,
        location: row.get(6)?,
        latitude: parse_optional_decimal(get_opt_string(row, 7)?.as_deref())?,
        longitude: parse_optional_decimal(get_opt_string(row, 8)?.as_deref())?,
        seeing: parse_sky_quality(row.get(9)?)?,
        transparency: parse_sky_quality(row.get(10)?)?,
        moon_phase: row.get(11)?,
        temperature: row.get::<Option<i64>>(12)?,
        cloud_cover: row.get(13)?,
        telescope: row.get(14)?,
        eyepiece: row.get(15)?,
        magnification: row.get(16)?,
        camera: row.get(17)?,
        notes: row.get(18)?,
        research_project_id: get_opt_string(row, 19)?,
        is_public: get_bool(row, 20)?,
        created_at: parse_datetime(&row.get::<String>(21)?)?,
        updated_at: parse_datetime(&row.get::<String>(22)?)?,
    })
}

fn opt_time(row: &libsql::Row, idx: i32) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    parse_optional_datetime(get_opt_string(row, idx)?.as_deref())
}

fn row_to_eclipse(row: &libsql::Row) -> Result<EclipseObservation, DatabaseError> {
    Ok(EclipseObservation {
        id: row.get(0)?,
        observation_id: row.get(1)?,
        eclipse_type: parse_enum(&row.get::<String>(2)?)?,
        safety_equipment: parse_optional_enum(get_opt_string(row, 3)?.as_deref())?,
        c1_time: opt_time(row, 4)?,
        c2_time: opt_time(row, 5)?,
        max_time: opt_time(row, 6)?,
        c3_time: opt_time(row, 7)?,
        c4_time: opt_time(row, 8)?,
        p1_time: opt_time(row, 9)?,
        u1_time: opt_time(row, 10)?,
        u2_time: opt_time(row, 11)?,
        u3_time: opt_time(row, 12)?,
        u4_time: opt_time(row, 13)?,
        p2_time: opt_time(row, 14)?,
        danjon_scale: parse_optional_enum(get_opt_string(row, 15)?.as_deref())?,
        magnitude: parse_optional_decimal(get_opt_string(row, 16)?.as_deref())?,
        obscuration: parse_optional_decimal(get_opt_string(row, 17)?.as_deref())?,
        duration_seconds: row.get::<Option<i64>>(18)?,
        temperature_drop: parse_optional_decimal(get_opt_string(row, 19)?.as_deref())?,
        shadow_bands_observed: get_bool(row, 20)?,
        shadow_bands_notes: row.get(21)?,
        baileys_beads_observed: get_bool(row, 22)?,
        diamond_ring_observed: get_bool(row, 23)?,
        corona_shape: row.get(24)?,
        corona_extent: row.get(25)?,
        prominences_observed: get_bool(row, 26)?,
        prominences_notes: row.get(27)?,
        animal_behaviour_notes: row.get(28)?,
        weather_impact: row.get(29)?,
        viewing_success: row.get::<Option<i64>>(30)?,
    })
}

fn row_to_photo(row: &libsql::Row) -> Result<AstroPhoto, DatabaseError> {
    Ok(AstroPhoto {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        image: row.get(3)?,
        thumbnail: get_opt_string(row, 4)?,
        celestial_object_id: get_opt_string(row, 5)?,
        object_name: row.get(6)?,
        capture_date: parse_datetime(&row.get::<String>(7)?)?,
        exposure_time: row.get(8)?,
        iso: row.get::<Option<i64>>(9)?,
        aperture: row.get(10)?,
        focal_length: row.get(11)?,
        frames: row.get::<Option<i64>>(12)?,
        telescope: row.get(13)?,
        camera: row.get(14)?,
        mount: row.get(15)?,
        processing_software: row.get(16)?,
        processing_notes: row.get(17)?,
        observation_id: get_opt_string(row, 18)?,
        research_project_id: get_opt_string(row, 19)?,
        is_featured: get_bool(row, 20)?,
        is_public: get_bool(row, 21)?,
        description: row.get(22)?,
        is_processed: get_bool(row, 23)?,
        sequence_number: row.get::<Option<i64>>(24)?,
        eclipse_phase: parse_optional_enum(get_opt_string(row, 25)?.as_deref())?,
        solar_photo_method: parse_optional_enum(get_opt_string(row, 26)?.as_deref())?,
        filter_used: parse_optional_enum(get_opt_string(row, 27)?.as_deref())?,
        exact_time: opt_time(row, 28)?,
        is_composite: get_bool(row, 29)?,
        frame_count: row.get::<Option<i64>>(30)?,
        ambient_temperature: parse_optional_decimal(get_opt_string(row, 31)?.as_deref())?,
        hdr_brackets: row.get(32)?,
        created_at: parse_datetime(&row.get::<String>(33)?)?,
    })
}

fn require_range(errors: &mut ValidationErrors, field: &str, value: Option<Decimal>, bound: i64) {
    if value.is_some_and(|v| v.abs() > Decimal::from(bound)) {
        errors.add(field, format!("Ensure this value is between -{bound} and {bound}."));
    }
}

// ---------------------------------------------------------------------------
// Creation payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewCelestialObject {
    pub name: String,
    pub object_type: ObjectType,
    pub constellation: String,
    pub distance_ly: String,
    pub magnitude: String,
    pub description: String,
    pub parent_id: Option<String>,
    pub orbital_period: Option<f64>,
    pub semi_major_axis: Option<f64>,
}

impl NewCelestialObject {
    #[must_use]
    pub fn new(name: impl Into<String>, object_type: ObjectType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_type,
            constellation: String::new(),
            distance_ly: String::new(),
            magnitude: String::new(),
            description: description.into(),
            parent_id: None,
            orbital_period: None,
            semi_major_axis: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewObservation {
    pub title: String,
    pub observation_date: DateTime<Utc>,
    pub celestial_object_id: Option<String>,
    pub object_name: String,
    pub location: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub seeing: SkyQuality,
    pub transparency: SkyQuality,
    pub moon_phase: String,
    pub temperature: Option<i64>,
    pub cloud_cover: i64,
    pub telescope: String,
    pub eyepiece: String,
    pub magnification: String,
    pub camera: String,
    pub notes: String,
    pub research_project_id: Option<String>,
    pub is_public: bool,
}

impl NewObservation {
    /// A public observation with average conditions and clear skies.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        observation_date: DateTime<Utc>,
        object_name: impl Into<String>,
        location: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            observation_date,
            celestial_object_id: None,
            object_name: object_name.into(),
            location: location.into(),
            latitude: None,
            longitude: None,
            seeing: SkyQuality::Average,
            transparency: SkyQuality::Average,
            moon_phase: String::new(),
            temperature: None,
            cloud_cover: 0,
            telescope: String::new(),
            eyepiece: String::new(),
            magnification: String::new(),
            camera: String::new(),
            notes: notes.into(),
            research_project_id: None,
            is_public: true,
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &self.title);
        require_max_len(&mut errors, "title", &self.title, 200);
        require_text(&mut errors, "object_name", &self.object_name);
        require_text(&mut errors, "location", &self.location);
        require_text(&mut errors, "notes", &self.notes);
        require_percentage(&mut errors, "cloud_cover", self.cloud_cover);
        require_range(&mut errors, "latitude", self.latitude, 90);
        require_range(&mut errors, "longitude", self.longitude, 180);
        errors.into_result()
    }
}

/// Eclipse-specific measurements attached to one observation.
#[derive(Debug, Clone)]
pub struct EclipseDetails {
    pub eclipse_type: EclipseType,
    pub safety_equipment: Option<SolarFilter>,
    pub c1_time: Option<DateTime<Utc>>,
    pub c2_time: Option<DateTime<Utc>>,
    pub max_time: Option<DateTime<Utc>>,
    pub c3_time: Option<DateTime<Utc>>,
    pub c4_time: Option<DateTime<Utc>>,
    pub p1_time: Option<DateTime<Utc>>,
    pub u1_time: Option<DateTime<Utc>>,
    pub u2_time: Option<DateTime<Utc>>,
    pub u3_time: Option<DateTime<Utc>>,
    pub u4_time: Option<DateTime<Utc>>,
    pub p2_time: Option<DateTime<Utc>>,
    pub danjon_scale: Option<DanjonScale>,
    pub magnitude: Option<Decimal>,
    pub obscuration: Option<Decimal>,
    pub duration_seconds: Option<i64>,
    pub temperature_drop: Option<Decimal>,
    pub shadow_bands_observed: bool,
    pub shadow_bands_notes: String,
    pub baileys_beads_observed: bool,
    pub diamond_ring_observed: bool,
    pub corona_shape: String,
    pub corona_extent: String,
    pub prominences_observed: bool,
    pub prominences_notes: String,
    pub animal_behaviour_notes: String,
    pub weather_impact: String,
    pub viewing_success: Option<i64>,
}

impl EclipseDetails {
    #[must_use]
    pub const fn new(eclipse_type: EclipseType) -> Self {
        Self {
            eclipse_type,
            safety_equipment: None,
            c1_time: None,
            c2_time: None,
            max_time: None,
            c3_time: None,
            c4_time: None,
            p1_time: None,
            u1_time: None,
            u2_time: None,
            u3_time: None,
            u4_time: None,
            p2_time: None,
            danjon_scale: None,
            magnitude: None,
            obscuration: None,
            duration_seconds: None,
            temperature_drop: None,
            shadow_bands_observed: false,
            shadow_bands_notes: String::new(),
            baileys_beads_observed: false,
            diamond_ring_observed: false,
            corona_shape: String::new(),
            corona_extent: String::new(),
            prominences_observed: false,
            prominences_notes: String::new(),
            animal_behaviour_notes: String::new(),
            weather_impact: String::new(),
            viewing_success: None,
        }
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(success) = self.viewing_success {
            require_percentage(&mut errors, "viewing_success", success);
        }
        if self.danjon_scale.is_some() && !self.eclipse_type.is_lunar() {
            errors.add("danjon_scale", "The Danjon scale only applies to lunar eclipses.");
        }
        if self.duration_seconds.is_some_and(|d| d < 0) {
            errors.add("duration_seconds", "Duration cannot be negative.");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone)]
pub struct NewAstroPhoto {
    pub title: String,
    pub image: String,
    pub thumbnail: Option<String>,
    pub celestial_object_id: Option<String>,
    pub object_name: String,
    pub capture_date: DateTime<Utc>,
    pub exposure_time: String,
    pub iso: Option<i64>,
    pub aperture: String,
    pub focal_length: String,
    pub frames: Option<i64>,
    pub telescope: String,
    pub camera: String,
    pub mount: String,
    pub processing_software: String,
    pub processing_notes: String,
    pub observation_id: Option<String>,
    pub research_project_id: Option<String>,
    pub is_featured: bool,
    pub is_public: bool,
    pub description: String,
    pub is_processed: bool,
    pub sequence_number: Option<i64>,
    pub eclipse_phase: Option<EclipsePhase>,
    pub solar_photo_method: Option<SolarPhotoMethod>,
    pub filter_used: Option<SolarFilter>,
    pub exact_time: Option<DateTime<Utc>>,
    pub is_composite: bool,
    pub frame_count: Option<i64>,
    pub ambient_temperature: Option<Decimal>,
    pub hdr_brackets: String,
}

impl NewAstroPhoto {
    /// A public, unprocessed photo with no equipment details.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        image: impl Into<String>,
        object_name: impl Into<String>,
        capture_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            image: image.into(),
            thumbnail: None,
            celestial_object_id: None,
            object_name: object_name.into(),
            capture_date,
            exposure_time: String::new(),
            iso: None,
            aperture: String::new(),
            focal_length: String::new(),
            frames: None,
            telescope: String::new(),
            camera: String::new(),
            mount: String::new(),
            processing_software: String::new(),
            processing_notes: String::new(),
            observation_id: None,
            research_project_id: None,
            is_featured: false,
            is_public: true,
            description: String::new(),
            is_processed: false,
            sequence_number: None,
            eclipse_phase: None,
            solar_photo_method: None,
            filter_used: None,
            exact_time: None,
            is_composite: false,
            frame_count: None,
            ambient_temperature: None,
            hdr_brackets: String::new(),
        }
    }
}

impl OrrService {
    // -- catalog -------------------------------------------------------------

    pub async fn create_celestial_object(
        &self,
        object: NewCelestialObject,
    ) -> Result<CelestialObject, DatabaseError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "name", &object.name);
        require_max_len(&mut errors, "name", &object.name, 100);
        require_text(&mut errors, "description", &object.description);
        errors.into_result()?;

        let id = self.db().generate_id(PREFIX_CELESTIAL).await?;
        let params: Vec<libsql::Value> = vec![
            id.clone().into(),
            object.name.clone().into(),
            object.object_type.as_str().into(),
            object.constellation.clone().into(),
            object.distance_ly.clone().into(),
            object.magnitude.clone().into(),
            object.description.clone().into(),
            nullable(object.parent_id.clone()),
            nullable(object.orbital_period),
            nullable(object.semi_major_axis),
        ];
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO celestial_objects ({OBJECT_COLS}) VALUES ({})",
                    placeholders(params.len())
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        tracing::debug!(%id, name = %object.name, "celestial object created");

        Ok(CelestialObject {
            id,
            name: object.name,
            object_type: object.object_type,
            constellation: object.constellation,
            distance_ly: object.distance_ly,
            magnitude: object.magnitude,
            description: object.description,
            parent_id: object.parent_id,
            orbital_period: object.orbital_period,
            semi_major_axis: object.semi_major_axis,
        })
    }

    pub async fn get_celestial_object(&self, id: &str) -> Result<CelestialObject, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {OBJECT_COLS} FROM celestial_objects WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_object(&row)
    }

    /// Catalog ordered by type then name.
    pub async fn list_celestial_objects(&self) -> Result<Vec<CelestialObject>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {OBJECT_COLS} FROM celestial_objects ORDER BY object_type, name"),
                (),
            )
            .await?;
        let mut objects = Vec::new();
        while let Some(row) = rows.next().await? {
            objects.push(row_to_object(&row)?);
        }
        Ok(objects)
    }

    /// Bodies orbiting `parent_id`, e.g. a planet's moons.
    pub async fn list_satellites(&self, parent_id: &str) -> Result<Vec<CelestialObject>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {OBJECT_COLS} FROM celestial_objects WHERE parent_id = ?1 \
                     ORDER BY orbital_period, name"
                ),
                [parent_id],
            )
            .await?;
        let mut objects = Vec::new();
        while let Some(row) = rows.next().await? {
            objects.push(row_to_object(&row)?);
        }
        Ok(objects)
    }

    // -- observations --------------------------------------------------------

    /// Store an observation; its slug comes from `title-YYYYMMDD`.
    pub async fn create_observation(
        &self,
        observation: NewObservation,
    ) -> Result<ObservationLog, DatabaseError> {
        observation.validate()?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_OBSERVATION).await?;
        let base = slugify(&format!(
            "{}-{}",
            observation.title,
            observation.observation_date.format("%Y%m%d")
        ));
        let slug = self.unique_slug("observation_logs", &base).await?;

        let params: Vec<libsql::Value> = vec![
            id.clone().into(),
            observation.title.clone().into(),
            slug.clone().into(),
            observation.observation_date.to_rfc3339().into(),
            nullable(observation.celestial_object_id.clone()),
            observation.object_name.clone().into(),
            observation.location.clone().into(),
            nullable(opt_decimal_text(observation.latitude)),
            nullable(opt_decimal_text(observation.longitude)),
            i64::from(observation.seeing.as_u8()).into(),
            i64::from(observation.transparency.as_u8()).into(),
            observation.moon_phase.clone().into(),
            nullable(observation.temperature),
            observation.cloud_cover.into(),
            observation.telescope.clone().into(),
            observation.eyepiece.clone().into(),
            observation.magnification.clone().into(),
            observation.camera.clone().into(),
            observation.notes.clone().into(),
            nullable(observation.research_project_id.clone()),
            i64::from(observation.is_public).into(),
            now.to_rfc3339().into(),
            now.to_rfc3339().into(),
        ];
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO observation_logs ({OBSERVATION_COLS}) VALUES ({})",
                    placeholders(params.len())
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        tracing::debug!(%id, %slug, "observation logged");

        self.get_observation(&id).await
    }

    pub async fn get_observation(&self, id: &str) -> Result<ObservationLog, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {OBSERVATION_COLS} FROM observation_logs WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_observation(&row)
    }

    /// Private observations are reported as missing.
    pub async fn get_public_observation_by_slug(
        &self,
        slug: &str,
    ) -> Result<ObservationLog, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {OBSERVATION_COLS} FROM observation_logs WHERE slug = ?1 AND is_public = 1"
                ),
                [slug],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_observation(&row)
    }

    /// One page of public observations, most recent first.
    pub async fn page_public_observations(
        &self,
        per_page: u64,
        requested: Option<&str>,
    ) -> Result<Page<ObservationLog>, DatabaseError> {
        let mut filter = WhereBuilder::new();
        filter.raw("is_public = 1");
        let total = self
            .count(
                &format!("SELECT COUNT(*) FROM observation_logs{}", filter.sql()),
                filter.params(),
            )
            .await?;
        let window = Paginator::new(count_to_u64(total), per_page).page(requested);
        let (tail, params) = filter.paged(window.limit, window.offset);
        let observations = self
            .query_observations(
                &format!(
                    "SELECT {OBSERVATION_COLS} FROM observation_logs{} ORDER BY observation_date DESC{tail}",
                    filter.sql()
                ),
                params,
            )
            .await?;
        Ok(Page::new(observations, window))
    }

    /// Other public observations of the same catalog object.
    pub async fn related_observations(
        &self,
        observation: &ObservationLog,
        limit: u64,
    ) -> Result<Vec<ObservationLog>, DatabaseError> {
        self.query_observations(
            &format!(
                "SELECT {OBSERVATION_COLS} FROM observation_logs
                 WHERE celestial_object_id IS ?1 AND is_public = 1 AND id != ?2
                 ORDER BY observation_date DESC LIMIT ?3"
            ),
            vec![
                nullable(observation.celestial_object_id.clone()),
                observation.id.clone().into(),
                sql_int(limit),
            ],
        )
        .await
    }

    /// Observations feeding an astronomy research project, most recent first.
    pub async fn observations_for_research(
        &self,
        project_id: &str,
    ) -> Result<Vec<ObservationLog>, DatabaseError> {
        self.query_observations(
            &format!(
                "SELECT {OBSERVATION_COLS} FROM observation_logs
                 WHERE research_project_id = ?1 ORDER BY observation_date DESC"
            ),
            vec![project_id.into()],
        )
        .await
    }

    async fn query_observations(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<ObservationLog>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut observations = Vec::new();
        while let Some(row) = rows.next().await? {
            observations.push(row_to_observation(&row)?);
        }
        Ok(observations)
    }

    // -- eclipses ------------------------------------------------------------

    /// Attach eclipse measurements to an observation (at most one per observation).
    pub async fn record_eclipse(
        &self,
        observation_id: &str,
        details: EclipseDetails,
    ) -> Result<EclipseObservation, DatabaseError> {
        details.validate()?;

        let id = self.db().generate_id(PREFIX_ECLIPSE).await?;
        let params: Vec<libsql::Value> = vec![
            id.clone().into(),
            observation_id.into(),
            details.eclipse_type.as_str().into(),
            nullable(details.safety_equipment.map(SolarFilter::as_str)),
            nullable(opt_datetime_text(details.c1_time)),
            nullable(opt_datetime_text(details.c2_time)),
            nullable(opt_datetime_text(details.max_time)),
            nullable(opt_datetime_text(details.c3_time)),
            nullable(opt_datetime_text(details.c4_time)),
            nullable(opt_datetime_text(details.p1_time)),
            nullable(opt_datetime_text(details.u1_time)),
            nullable(opt_datetime_text(details.u2_time)),
            nullable(opt_datetime_text(details.u3_time)),
            nullable(opt_datetime_text(details.u4_time)),
            nullable(opt_datetime_text(details.p2_time)),
            nullable(details.danjon_scale.map(DanjonScale::as_str)),
            nullable(opt_decimal_text(details.magnitude)),
            nullable(opt_decimal_text(details.obscuration)),
            nullable(details.duration_seconds),
            nullable(opt_decimal_text(details.temperature_drop)),
            i64::from(details.shadow_bands_observed).into(),
            details.shadow_bands_notes.into(),
            i64::from(details.baileys_beads_observed).into(),
            i64::from(details.diamond_ring_observed).into(),
            details.corona_shape.into(),
            details.corona_extent.into(),
            i64::from(details.prominences_observed).into(),
            details.prominences_notes.into(),
            details.animal_behaviour_notes.into(),
            details.weather_impact.into(),
            nullable(details.viewing_success),
        ];
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO eclipse_observations ({ECLIPSE_COLS}) VALUES ({})",
                    placeholders(params.len())
                ),
                libsql::params_from_iter(params),
            )
            .await
            .map_err(|e| {
                DatabaseError::from_write(e, &format!("eclipse data for observation {observation_id}"))
            })?;
        tracing::debug!(%id, observation_id, "eclipse recorded");

        self.eclipse_for_observation(observation_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    pub async fn eclipse_for_observation(
        &self,
        observation_id: &str,
    ) -> Result<Option<EclipseObservation>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ECLIPSE_COLS} FROM eclipse_observations WHERE observation_id = ?1"),
                [observation_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_eclipse(&row)?)),
            None => Ok(None),
        }
    }

    // -- photos --------------------------------------------------------------

    pub async fn create_astro_photo(&self, photo: NewAstroPhoto) -> Result<AstroPhoto, DatabaseError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", &photo.title);
        require_max_len(&mut errors, "title", &photo.title, 200);
        require_text(&mut errors, "image", &photo.image);
        require_text(&mut errors, "object_name", &photo.object_name);
        errors.into_result()?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PHOTO).await?;
        let slug = self.unique_slug("astro_photos", &slugify(&photo.title)).await?;

        let params: Vec<libsql::Value> = vec![
            id.clone().into(),
            photo.title.into(),
            slug.clone().into(),
            photo.image.into(),
            nullable(photo.thumbnail),
            nullable(photo.celestial_object_id),
            photo.object_name.into(),
            photo.capture_date.to_rfc3339().into(),
            photo.exposure_time.into(),
            nullable(photo.iso),
            photo.aperture.into(),
            photo.focal_length.into(),
            nullable(photo.frames),
            photo.telescope.into(),
            photo.camera.into(),
            photo.mount.into(),
            photo.processing_software.into(),
            photo.processing_notes.into(),
            nullable(photo.observation_id),
            nullable(photo.research_project_id),
            i64::from(photo.is_featured).into(),
            i64::from(photo.is_public).into(),
            photo.description.into(),
            i64::from(photo.is_processed).into(),
            nullable(photo.sequence_number),
            nullable(photo.eclipse_phase.map(EclipsePhase::as_str)),
            nullable(photo.solar_photo_method.map(SolarPhotoMethod::as_str)),
            nullable(photo.filter_used.map(SolarFilter::as_str)),
            nullable(opt_datetime_text(photo.exact_time)),
            i64::from(photo.is_composite).into(),
            nullable(photo.frame_count),
            nullable(opt_decimal_text(photo.ambient_temperature)),
            photo.hdr_brackets.into(),
            now.to_rfc3339().into(),
        ];
        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO astro_photos ({PHOTO_COLS}) VALUES ({})",
                    placeholders(params.len())
                ),
                libsql::params_from_iter(params),
            )
            .await?;
        tracing::debug!(%id, %slug, "astro photo added");

        self.get_astro_photo(&id).await
    }

    pub async fn get_astro_photo(&self, id: &str) -> Result<AstroPhoto, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {PHOTO_COLS} FROM astro_photos WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_photo(&row)
    }

    /// One gallery page of public photos, optionally limited to one object type.
    pub async fn page_gallery(
        &self,
        object_type: Option<ObjectType>,
        per_page: u64,
        requested: Option<&str>,
    ) -> Result<Page<AstroPhoto>, DatabaseError> {
        let mut filter = WhereBuilder::new();
        filter.raw("is_public = 1");
        if let Some(kind) = object_type {
            filter.bind(
                "celestial_object_id IN (SELECT id FROM celestial_objects WHERE object_type = ?)",
                kind.as_str(),
            );
        }
        let total = self
            .count(
                &format!("SELECT COUNT(*) FROM astro_photos{}", filter.sql()),
                filter.params(),
            )
            .await?;
        let window = Paginator::new(count_to_u64(total), per_page).page(requested);
        let (tail, params) = filter.paged(window.limit, window.offset);
        let photos = self
            .query_photos(
                &format!("SELECT {PHOTO_COLS} FROM astro_photos{}{PHOTO_ORDER}{tail}", filter.sql()),
                params,
            )
            .await?;
        Ok(Page::new(photos, window))
    }

    pub async fn featured_public_photos(&self, limit: u64) -> Result<Vec<AstroPhoto>, DatabaseError> {
        self.query_photos(
            &format!(
                "SELECT {PHOTO_COLS} FROM astro_photos WHERE is_featured = 1 AND is_public = 1{PHOTO_ORDER} LIMIT ?1"
            ),
            vec![sql_int(limit)],
        )
        .await
    }

    pub async fn photos_for_observation(
        &self,
        observation_id: &str,
    ) -> Result<Vec<AstroPhoto>, DatabaseError> {
        self.query_photos(
            &format!("SELECT {PHOTO_COLS} FROM astro_photos WHERE observation_id = ?1{PHOTO_ORDER}"),
            vec![observation_id.into()],
        )
        .await
    }

    pub async fn photos_for_research(&self, project_id: &str) -> Result<Vec<AstroPhoto>, DatabaseError> {
        self.query_photos(
            &format!(
                "SELECT {PHOTO_COLS} FROM astro_photos WHERE research_project_id = ?1{PHOTO_ORDER}"
            ),
            vec![project_id.into()],
        )
        .await
    }

    async fn query_photos(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<AstroPhoto>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut photos = Vec::new();
        while let Some(row) = rows.next().await? {
            photos.push(row_to_photo(&row)?);
        }
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::test_service;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 21, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn observation_slug_includes_date() {
        let svc = test_service().await;
        let first = svc
            .create_observation(NewObservation::new("Jupiter Opposition", at(2025, 1, 10), "Jupiter", "Backyard", "Bands visible"))
            .await
            .unwrap();
        let second = svc
            .create_observation(NewObservation::new("Jupiter Opposition", at(2025, 1, 10), "Jupiter", "Backyard", "Again"))
            .await
            .unwrap();
        assert_eq!(first.slug, "jupiter-opposition-20250110");
        assert_eq!(second.slug, "jupiter-opposition-20250110-2");
        assert_eq!(first.seeing, SkyQuality::Average);
    }

    #[tokio::test]
    async fn observation_validation() {
        let svc = test_service().await;
        let mut bad = NewObservation::new("", at(2025, 1, 1), "Moon", "Roof", "n");
        bad.cloud_cover = 120;
        bad.latitude = Some(Decimal::from(95));
        let err = svc.create_observation(bad).await.unwrap_err();
        match err {
            DatabaseError::Validation(errors) => {
                assert!(errors.has("title"));
                assert!(errors.has("cloud_cover"));
                assert!(errors.has("latitude"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn public_list_and_detail_hide_private() {
        let svc = test_service().await;
        let mut private = NewObservation::new("Private", at(2025, 2, 1), "Moon", "Roof", "n");
        private.is_public = false;
        let private = svc.create_observation(private).await.unwrap();
        svc.create_observation(NewObservation::new("Public", at(2025, 2, 2), "Moon", "Roof", "n"))
            .await
            .unwrap();

        let page = svc.page_public_observations(10, None).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(matches!(
            svc.get_public_observation_by_slug(&private.slug).await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn related_observations_share_object() {
        let svc = test_service().await;
        let moon = svc
            .create_celestial_object(NewCelestialObject::new("Moon", ObjectType::Moon, "Earth's satellite"))
            .await
            .unwrap();
        let mut a = NewObservation::new("A", at(2025, 3, 1), "Moon", "Roof", "n");
        a.celestial_object_id = Some(moon.id.clone());
        let a = svc.create_observation(a).await.unwrap();
        let mut b = NewObservation::new("B", at(2025, 3, 2), "Moon", "Roof", "n");
        b.celestial_object_id = Some(moon.id.clone());
        svc.create_observation(b).await.unwrap();
        svc.create_observation(NewObservation::new("C", at(2025, 3, 3), "Mars", "Roof", "n"))
            .await
            .unwrap();

        let related = svc.related_observations(&a, 3).await.unwrap();
        let titles: Vec<_> = related.into_iter().map(|o| o.title).collect();
        assert_eq!(titles, vec!["B"]);
    }

    #[tokio::test]
    async fn eclipse_is_one_to_one() {
        let svc = test_service().await;
        let obs = svc
            .create_observation(NewObservation::new("Blood Moon", at(2025, 3, 14), "Moon", "Roof", "n"))
            .await
            .unwrap();
        let mut details = EclipseDetails::new(EclipseType::LunarTotal);
        details.danjon_scale = Some(DanjonScale::L2);
        details.magnitude = Some("1.178".parse().unwrap());
        details.max_time = Some(at(2025, 3, 14));

        let eclipse = svc.record_eclipse(&obs.id, details.clone()).await.unwrap();
        assert!(eclipse.is_total_lunar());
        assert_eq!(eclipse.danjon_scale, Some(DanjonScale::L2));
        assert_eq!(eclipse.magnitude.unwrap().to_string(), "1.178");

        let err = svc.record_eclipse(&obs.id, details).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn danjon_rejected_for_solar() {
        let svc = test_service().await;
        let obs = svc
            .create_observation(NewObservation::new("Sun", at(2025, 3, 29), "Sun", "Field", "n"))
            .await
            .unwrap();
        let mut details = EclipseDetails::new(EclipseType::SolarPartial);
        details.danjon_scale = Some(DanjonScale::L0);
        assert!(matches!(
            svc.record_eclipse(&obs.id, details).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(svc.eclipse_for_observation(&obs.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn gallery_filters_by_object_type() {
        let svc = test_service().await;
        let m42 = svc
            .create_celestial_object(NewCelestialObject::new("Orion Nebula", ObjectType::Nebula, "M42"))
            .await
            .unwrap();
        let mut nebula = NewAstroPhoto::new("M42 stack", "astro/m42.jpg", "M42", at(2025, 1, 5));
        nebula.celestial_object_id = Some(m42.id.clone());
        nebula.is_featured = true;
        svc.create_astro_photo(nebula).await.unwrap();
        svc.create_astro_photo(NewAstroPhoto::new("Moon", "astro/moon.jpg", "Moon", at(2025, 1, 6)))
            .await
            .unwrap();
        let mut hidden = NewAstroPhoto::new("Hidden", "astro/h.jpg", "M42", at(2025, 1, 7));
        hidden.is_public = false;
        svc.create_astro_photo(hidden).await.unwrap();

        assert_eq!(svc.page_gallery(None, 12, None).await.unwrap().total, 2);
        let nebulae = svc
            .page_gallery(Some(ObjectType::Nebula), 12, None)
            .await
            .unwrap();
        assert_eq!(nebulae.items.len(), 1);
        assert_eq!(nebulae.items[0].title, "M42 stack");
        assert_eq!(svc.featured_public_photos(6).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn eclipse_photo_fields_roundtrip() {
        let svc = test_service().await;
        let mut photo = NewAstroPhoto::new("Second contact", "astro/c2.jpg", "Sun", at(2024, 4, 8));
        photo.eclipse_phase = Some(EclipsePhase::SolarC2);
        photo.filter_used = Some(SolarFilter::Projection);
        photo.ambient_temperature = Some("18.5".parse().unwrap());
        photo.sequence_number = Some(3);

        let saved = svc.create_astro_photo(photo).await.unwrap();
        assert!(saved.is_solar_eclipse());
        assert!(saved.requires_safety_equipment());
        assert_eq!(saved.filter_used, Some(SolarFilter::Projection));
        assert_eq!(saved.ambient_temperature.unwrap().to_string(), "18.5");
    }

    #[tokio::test]
    async fn satellites_ordered_by_period() {
        let svc = test_service().await;
        let jupiter = svc
            .create_celestial_object(NewCelestialObject::new("Jupiter", ObjectType::Planet, "Gas giant"))
            .await
            .unwrap();
        for (name, period) in [("Europa", 3.551), ("Io", 1.769)] {
            let mut moon = NewCelestialObject::new(name, ObjectType::Moon, "Galilean moon");
            moon.parent_id = Some(jupiter.id.clone());
            moon.orbital_period = Some(period);
            svc.create_celestial_object(moon).await.unwrap();
        }
        let names: Vec<_> = svc
            .list_satellites(&jupiter.id)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["Io", "Europa"]);
    }
}
