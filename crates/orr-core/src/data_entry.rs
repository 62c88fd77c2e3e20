//! Per-research-type measurement payloads for astronomy data entries.
//!
//! Submitted fields are validated into a typed payload, then flattened into
//! the JSON `data` column. Research types without a dedicated payload accept
//! any JSON object.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::AstroResearchType;
use crate::errors::ValidationErrors;

/// Fractional days between the project start and an observation.
///
/// Whole days come from the calendar date; the hour of the observation adds
/// `hour / 24`. Minutes are ignored.
#[must_use]
pub fn days_from_start(start: NaiveDate, observed_at: DateTime<Utc>) -> f64 {
    let days = (observed_at.date_naive() - start).num_days();
    #[allow(clippy::cast_precision_loss)]
    let days = days as f64;
    days + f64::from(observed_at.hour()) / 24.0
}

/// Zenithal hourly rate estimate rounded to one decimal place, with exact
/// halves going to the even digit (2.25 becomes 2.2, 0.75 becomes 0.8).
///
/// `None` when the observing window is not positive.
#[must_use]
pub fn zhr_estimate(meteor_count: i64, sporadic_count: i64, duration_minutes: i64) -> Option<f64> {
    if duration_minutes <= 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = (meteor_count - sporadic_count) as f64 / (duration_minutes as f64 / 60.0);
    Some((rate * 10.0).round_ties_even() / 10.0)
}

/// Positions of the Galilean moons in Jupiter diameters (east positive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JupiterMoonPositions {
    pub io_position: Option<f64>,
    pub europa_position: Option<f64>,
    pub ganymede_position: Option<f64>,
    pub callisto_position: Option<f64>,
}

impl JupiterMoonPositions {
    /// # Errors
    ///
    /// Fails when no moon position is given.
    pub fn into_data(self) -> Result<Value, ValidationErrors> {
        let mut data = Map::new();
        for (moon, position) in [
            ("io", self.io_position),
            ("europa", self.europa_position),
            ("ganymede", self.ganymede_position),
            ("callisto", self.callisto_position),
        ] {
            if let Some(position) = position {
                data.insert(moon.to_string(), Value::from(position));
            }
        }
        if data.is_empty() {
            return Err(ValidationErrors::single(
                ValidationErrors::NON_FIELD,
                "At least one moon position must be provided",
            ));
        }
        Ok(Value::Object(data))
    }
}

/// A visual magnitude estimate of a variable star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableStarEstimate {
    pub magnitude: f64,
    #[serde(default)]
    pub comparison_star: Option<String>,
}

impl VariableStarEstimate {
    #[must_use]
    pub fn into_data(self) -> Value {
        let mut data = Map::new();
        data.insert("magnitude".into(), Value::from(self.magnitude));
        if let Some(star) = self.comparison_star.filter(|s| !s.trim().is_empty()) {
            data.insert("comparison_star".into(), Value::from(star));
        }
        Value::Object(data)
    }
}

/// A meteor watch tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteorCount {
    pub meteor_count: i64,
    #[serde(default)]
    pub sporadic_count: Option<i64>,
    #[serde(default)]
    pub fireball_count: Option<i64>,
    #[serde(default)]
    pub limiting_magnitude: Option<f64>,
    pub observation_duration_minutes: i64,
}

impl MeteorCount {
    /// # Errors
    ///
    /// Fails on negative counts or a negative duration.
    pub fn into_data(self) -> Result<Value, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.meteor_count < 0 {
            errors.add("meteor_count", "Ensure this value is greater than or equal to 0.");
        }
        if self.observation_duration_minutes < 0 {
            errors.add(
                "observation_duration_minutes",
                "Ensure this value is greater than or equal to 0.",
            );
        }
        errors.into_result()?;

        let mut data = Map::new();
        data.insert("meteor_count".into(), Value::from(self.meteor_count));
        data.insert(
            "observation_duration".into(),
            Value::from(self.observation_duration_minutes),
        );
        if let Some(sporadic) = self.sporadic_count {
            data.insert("sporadic_count".into(), Value::from(sporadic));
        }
        if let Some(fireballs) = self.fireball_count {
            data.insert("fireball_count".into(), Value::from(fireballs));
        }
        if let Some(limit) = self.limiting_magnitude {
            data.insert("limiting_magnitude".into(), Value::from(limit));
        }
        if let Some(zhr) = zhr_estimate(
            self.meteor_count,
            self.sporadic_count.unwrap_or(0),
            self.observation_duration_minutes,
        ) {
            data.insert("zhr_estimate".into(), Value::from(zhr));
        }
        Ok(Value::Object(data))
    }
}

/// Validate submitted measurement fields for `research_type` and produce the
/// JSON stored in the entry's `data` column.
///
/// # Errors
///
/// Returns per-field messages when the fields don't match the payload the
/// research type expects.
pub fn build_entry_data(
    research_type: AstroResearchType,
    fields: Value,
) -> Result<Value, ValidationErrors> {
    match research_type {
        AstroResearchType::Orbital => parse_fields::<JupiterMoonPositions>(fields)?.into_data(),
        AstroResearchType::VariableStar => {
            Ok(parse_fields::<VariableStarEstimate>(fields)?.into_data())
        }
        AstroResearchType::Meteor => parse_fields::<MeteorCount>(fields)?.into_data(),
        _ => match fields {
            Value::Object(_) => Ok(fields),
            _ => Err(ValidationErrors::single("data", "Enter a JSON object.")),
        },
    }
}

fn parse_fields<T: serde::de::DeserializeOwned>(fields: Value) -> Result<T, ValidationErrors> {
    serde_json::from_value(fields).map_err(|e| ValidationErrors::single("data", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn days_from_start_adds_hour_fraction() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 1, 4, 18, 45, 0).unwrap();
        assert!((days_from_start(start, at) - 3.75).abs() < f64::EPSILON);
    }

    #[test]
    fn days_from_start_before_project_is_negative() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 1, 9, 0, 0, 0).unwrap();
        assert!((days_from_start(start, at) + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zhr_rounds_to_one_decimal() {
        assert_eq!(zhr_estimate(15, 3, 45), Some(16.0));
        assert_eq!(zhr_estimate(10, 0, 90), Some(6.7));
        assert_eq!(zhr_estimate(10, 0, 0), None);
    }

    #[test]
    fn zhr_halves_round_to_even() {
        assert_eq!(zhr_estimate(3, 0, 80), Some(2.2));
        assert_eq!(zhr_estimate(3, 0, 240), Some(0.8));
        assert_eq!(zhr_estimate(1, 0, 16), Some(3.8));
    }

    #[test]
    fn jupiter_requires_one_position() {
        let err = build_entry_data(AstroResearchType::Orbital, json!({})).unwrap_err();
        assert!(err.has(ValidationErrors::NON_FIELD));

        let data = build_entry_data(
            AstroResearchType::Orbital,
            json!({"io_position": 2.3, "callisto_position": -8.2}),
        )
        .unwrap();
        assert_eq!(data, json!({"io": 2.3, "callisto": -8.2}));
    }

    #[test]
    fn zero_position_counts_as_given() {
        let data =
            build_entry_data(AstroResearchType::Orbital, json!({"europa_position": 0.0})).unwrap();
        assert_eq!(data, json!({"europa": 0.0}));
    }

    #[test]
    fn variable_star_keeps_optional_comparison() {
        let data = build_entry_data(
            AstroResearchType::VariableStar,
            json!({"magnitude": 3.2, "comparison_star": ""}),
        )
        .unwrap();
        assert_eq!(data, json!({"magnitude": 3.2}));
    }

    #[test]
    fn meteor_count_adds_zhr() {
        let data = build_entry_data(
            AstroResearchType::Meteor,
            json!({"meteor_count": 15, "sporadic_count": 3, "observation_duration_minutes": 60}),
        )
        .unwrap();
        assert_eq!(
            data,
            json!({
                "meteor_count": 15,
                "observation_duration": 60,
                "sporadic_count": 3,
                "zhr_estimate": 12.0
            })
        );
    }

    #[test]
    fn meteor_missing_duration_is_rejected() {
        let err =
            build_entry_data(AstroResearchType::Meteor, json!({"meteor_count": 3})).unwrap_err();
        assert!(err.has("data"));
    }

    #[test]
    fn custom_research_takes_any_object() {
        let payload = json!({"spots": 42});
        assert_eq!(
            build_entry_data(AstroResearchType::Sunspot, payload.clone()).unwrap(),
            payload
        );
        assert!(build_entry_data(AstroResearchType::Custom, json!([1, 2])).is_err());
    }
}
