//! Activity validation collaborators.
//!
//! A [`Validator`] is consulted after a fetched activity has been mapped.
//! Validators only read the activity, so running one any number of times has
//! no effect on it.

use crate::activity::Activity;
use crate::signals::pace_seconds_per_km;

/// Runs faster than this (seconds per km) are flagged as unrealistic.
pub const MIN_REALISTIC_RUN_PACE: f64 = 120.0;

/// Outcome of a validation pass.
///
/// `errors` may be non-empty for a valid activity; those entries are warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

pub trait Validator: Send + Sync {
    fn validate(&self, activity: &Activity) -> ValidationResult;
}

impl<F> Validator for F
where
    F: Fn(&Activity) -> ValidationResult + Send + Sync,
{
    fn validate(&self, activity: &Activity) -> ValidationResult {
        self(activity)
    }
}

/// Stock sanity checks for Strava activities.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityGuardrails;

impl Validator for ActivityGuardrails {
    fn validate(&self, activity: &Activity) -> ValidationResult {
        let mut errors = Vec::new();
        if activity.activity_type.trim().is_empty() {
            errors.push("Activity type is required and must be a string".to_string());
        }
        if activity.sport_type.trim().is_empty() {
            errors.push("Activity sport_type is required and must be a string".to_string());
        }
        if !errors.is_empty() {
            return ValidationResult::invalid(errors);
        }

        if matches!(activity.distance, Some(d) if d <= 0.0) {
            errors.push("Distance must be greater than 0".to_string());
        }
        if matches!(activity.elevation_gain, Some(e) if e < 0.0) {
            errors.push("Elevation gain must be non-negative".to_string());
        }
        if !errors.is_empty() {
            return ValidationResult::invalid(errors);
        }

        // Semantic findings are warnings only.
        let mut warnings = Vec::new();
        if let (Some(distance), Some(moving_time)) = (activity.distance, activity.moving_time) {
            let pace = pace_seconds_per_km(moving_time as f64, distance);
            if activity.activity_type == "Run" && pace > 0.0 && pace < MIN_REALISTIC_RUN_PACE {
                warnings.push("Running pace is faster than realistic human limits".to_string());
            }
        }
        ValidationResult {
            valid: true,
            errors: warnings,
        }
    }
}
