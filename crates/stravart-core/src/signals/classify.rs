//! Threshold classifiers. Each one reads a few activity fields and returns a bucket.

use super::{Elevation, Intensity, TimeOfDay};
use crate::activity::Activity;

/// Pace at or above this (s/km) is low intensity.
pub const LOW_PACE_THRESHOLD: f64 = 360.0;
/// Pace at or below this (s/km) is high intensity.
pub const HIGH_PACE_THRESHOLD: f64 = 240.0;
pub const HIGH_WATTS_THRESHOLD: f64 = 250.0;
pub const LOW_WATTS_THRESHOLD: f64 = 150.0;

/// Gain below this (m) is flat.
pub const FLAT_ELEVATION_MAX: f64 = 50.0;
/// Gain at or above this (m) is mountainous.
pub const MOUNTAINOUS_ELEVATION_MIN: f64 = 500.0;

const MORNING_START: u32 = 5;
const DAY_START: u32 = 10;
const EVENING_START: u32 = 17;
const NIGHT_START: u32 = 20;

/// Seconds per kilometre, or 0 when either input is not positive.
pub fn pace_seconds_per_km(moving_time: f64, distance: f64) -> f64 {
    if moving_time <= 0.0 || distance <= 0.0 {
        return 0.0;
    }
    moving_time / (distance / 1000.0)
}

pub fn classify_intensity(activity: &Activity) -> Intensity {
    let pace = match (activity.distance, activity.moving_time) {
        (Some(distance), Some(moving_time)) if distance > 0.0 => {
            Some(pace_seconds_per_km(moving_time as f64, distance))
        }
        _ => None,
    };

    match pace {
        Some(p) if p >= LOW_PACE_THRESHOLD => return Intensity::Low,
        Some(p) if p <= HIGH_PACE_THRESHOLD => return Intensity::High,
        _ => {}
    }

    for watts in [activity.average_watts, activity.weighted_average_watts]
        .into_iter()
        .flatten()
    {
        if watts > HIGH_WATTS_THRESHOLD {
            return Intensity::High;
        }
        if watts < LOW_WATTS_THRESHOLD {
            return Intensity::Low;
        }
    }
    Intensity::Medium
}

pub fn classify_elevation(activity: &Activity) -> Elevation {
    match activity.elevation_gain {
        Some(gain) if gain >= MOUNTAINOUS_ELEVATION_MIN => Elevation::Mountainous,
        Some(gain) if gain >= FLAT_ELEVATION_MAX => Elevation::Rolling,
        _ => Elevation::Flat,
    }
}

/// Bucket the start hour. `start_date_local` already carries the athlete's
/// wall-clock time, so the hour is read straight from the timestamp.
pub fn classify_time_of_day(activity: &Activity) -> TimeOfDay {
    let stamp = activity
        .start_date_local
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(activity.start_date.as_deref().filter(|s| !s.is_empty()));
    let Some(stamp) = stamp else {
        return TimeOfDay::Day;
    };
    match start_hour(stamp) {
        Some(h) if (MORNING_START..DAY_START).contains(&h) => TimeOfDay::Morning,
        Some(h) if (DAY_START..EVENING_START).contains(&h) => TimeOfDay::Day,
        Some(h) if (EVENING_START..NIGHT_START).contains(&h) => TimeOfDay::Evening,
        Some(_) => TimeOfDay::Night,
        None => TimeOfDay::Day,
    }
}

/// Hour from an ISO-8601 timestamp such as `2024-06-01T07:12:00Z`.
fn start_hour(stamp: &str) -> Option<u32> {
    let (_, time) = stamp.split_once(['T', ' '])?;
    let hour: u32 = time.get(..2)?.parse().ok()?;
    (hour < 24).then_some(hour)
}

/// Strava exposes no free-form tags; the commute flag is the only source.
pub fn extract_tags(activity: &Activity) -> Vec<String> {
    if activity.commute == Some(true) {
        vec!["commute".to_string()]
    } else {
        Vec::new()
    }
}

pub fn extract_brands(activity: &Activity) -> Vec<String> {
    activity
        .gear
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(|g| vec![g.to_string()])
        .unwrap_or_default()
}
