use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{
    DanjonScale, EclipsePhase, EclipseType, ObjectType, SkyQuality, SolarFilter, SolarPhotoMethod,
};

/// A catalog entry: planet, moon, galaxy and so on.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CelestialObject {
    pub id: String,
    pub name: String,
    pub object_type: ObjectType,
    pub constellation: String,
    /// Free text, e.g. "2.5 million".
    pub distance_ly: String,
    pub magnitude: String,
    pub description: String,
    pub parent_id: Option<String>,
    /// Days.
    pub orbital_period: Option<f64>,
    /// Kilometres.
    pub semi_major_axis: Option<f64>,
}

/// A single night's observing record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ObservationLog {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub observation_date: DateTime<Utc>,
    pub celestial_object_id: Option<String>,
    pub object_name: String,
    pub location: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    #[schemars(with = "u8")]
    pub seeing: SkyQuality,
    #[schemars(with = "u8")]
    pub transparency: SkyQuality,
    pub moon_phase: String,
    /// Celsius.
    pub temperature: Option<i64>,
    pub cloud_cover: i64,
    pub telescope: String,
    pub eyepiece: String,
    pub magnification: String,
    pub camera: String,
    pub notes: String,
    pub research_project_id: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Eclipse-specific details attached one-to-one to an observation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EclipseObservation {
    pub id: String,
    pub observation_id: String,
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
    /// 0..=100.
    pub viewing_success: Option<i64>,
}

impl EclipseObservation {
    #[must_use]
    pub fn is_solar(&self) -> bool {
        self.eclipse_type.is_solar()
    }

    #[must_use]
    pub fn is_lunar(&self) -> bool {
        self.eclipse_type.is_lunar()
    }

    #[must_use]
    pub fn is_total_lunar(&self) -> bool {
        self.eclipse_type == EclipseType::LunarTotal
    }
}

/// An astrophotograph with capture and processing metadata.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AstroPhoto {
    pub id: String,
    pub title: String,
    pub slug: String,
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
    pub created_at: DateTime<Utc>,
}

impl AstroPhoto {
    #[must_use]
    pub fn is_solar_eclipse(&self) -> bool {
        self.eclipse_phase.is_some_and(EclipsePhase::is_solar)
    }

    #[must_use]
    pub fn is_lunar_eclipse(&self) -> bool {
        self.eclipse_phase.is_some_and(EclipsePhase::is_lunar)
    }

    #[must_use]
    pub fn requires_safety_equipment(&self) -> bool {
        self.eclipse_phase
            .is_some_and(EclipsePhase::requires_safety_equipment)
    }
}
