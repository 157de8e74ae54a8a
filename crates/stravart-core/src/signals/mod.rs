//! Categorical signals derived from an activity.
//!
//! Signals are a small, deterministic summary (how hard, how hilly, what time
//! of day) used to describe an activity without its raw numbers.

mod classify;
mod derived;

pub use classify::{
    classify_elevation, classify_intensity, classify_time_of_day, extract_brands, extract_tags,
    pace_seconds_per_km,
};
pub use derived::{
    classify_atmosphere, classify_environment, classify_mood, classify_style, classify_subject,
    classify_terrain, Atmosphere, DerivedSignals, Environment, Mood, Style, Subject, Terrain,
};

use crate::activity::Activity;
use crate::error::{ActivityError, ErrorCode};
use crate::validate::{ActivityGuardrails, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Elevation {
    Flat,
    Rolling,
    Mountainous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Day,
    Evening,
    Night,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        })
    }
}

impl fmt::Display for Elevation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Elevation::Flat => "flat",
            Elevation::Rolling => "rolling",
            Elevation::Mountainous => "mountainous",
        })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Day => "day",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySignals {
    /// `sport_type`, falling back to `type`.
    pub activity_type: String,
    pub intensity: Intensity,
    pub elevation: Elevation,
    pub time_of_day: TimeOfDay,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<String>,
    pub derived: DerivedSignals,
}

/// Derive signals for an activity that passes [`ActivityGuardrails`].
pub fn get_activity_signals(activity: &Activity) -> Result<ActivitySignals, ActivityError> {
    let check = ActivityGuardrails.validate(activity);
    if !check.valid {
        return Err(ActivityError::new(
            ErrorCode::ValidationFailed,
            format!("Activity validation failed: {}", check.errors.join(", ")),
        ));
    }

    let activity_type = if activity.sport_type.trim().is_empty() {
        activity.activity_type.clone()
    } else {
        activity.sport_type.clone()
    };

    let intensity = classify_intensity(activity);
    let elevation = classify_elevation(activity);
    let time_of_day = classify_time_of_day(activity);
    let tags = extract_tags(activity);
    let derived = DerivedSignals {
        mood: classify_mood(&tags, intensity),
        style: classify_style(&tags, elevation, intensity, &activity_type),
        subject: classify_subject(&activity_type),
        terrain: classify_terrain(elevation),
        environment: classify_environment(&activity_type),
        atmosphere: classify_atmosphere(time_of_day),
    };

    Ok(ActivitySignals {
        activity_type,
        intensity,
        elevation,
        time_of_day,
        tags,
        brands: extract_brands(activity),
        derived,
    })
}
