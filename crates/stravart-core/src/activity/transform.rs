//! Map raw Strava JSON into [`Activity`] records.

use super::types::{Activity, RawActivity, RawGear};
use crate::error::ActivityError;

const INVALID_FORMAT: &str = "Invalid response format from Strava API";

/// Parse a single-activity response body.
pub fn transform_activity(body: &[u8]) -> Result<Activity, ActivityError> {
    let raw: RawActivity =
        serde_json::from_slice(body).map_err(|_| ActivityError::malformed(INVALID_FORMAT))?;
    Ok(Activity::from(raw))
}

/// Parse an activity-list response body; the payload must be a JSON array.
pub fn transform_activities(body: &[u8]) -> Result<Vec<Activity>, ActivityError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ActivityError::malformed(INVALID_FORMAT))?;
    let serde_json::Value::Array(items) = value else {
        return Err(ActivityError::malformed(
            "Expected array response from Strava API",
        ));
    };
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<RawActivity>(item)
                .map(Activity::from)
                .map_err(|_| ActivityError::malformed(INVALID_FORMAT))
        })
        .collect()
}

impl From<RawActivity> for Activity {
    fn from(raw: RawActivity) -> Self {
        let gear_name = match raw.gear {
            Some(RawGear::Name(name)) => Some(name),
            Some(RawGear::Summary { name, .. }) => name,
            None => None,
        };
        Activity {
            id: raw.id,
            activity_type: raw.activity_type,
            sport_type: raw.sport_type,
            name: raw.name,
            description: raw.description,
            distance: raw.distance,
            moving_time: raw.moving_time,
            elapsed_time: raw.elapsed_time,
            elevation_gain: raw.total_elevation_gain,
            start_date: raw.start_date,
            start_date_local: raw.start_date_local,
            timezone: raw.timezone,
            average_speed: raw.average_speed,
            max_speed: raw.max_speed,
            average_cadence: raw.average_cadence,
            average_temp: raw.average_temp,
            average_watts: raw.average_watts,
            weighted_average_watts: raw.weighted_average_watts,
            kilojoules: raw.kilojoules,
            device_watts: raw.device_watts,
            has_heartrate: raw.has_heartrate,
            avg_hr: raw.average_heartrate,
            max_watts: raw.max_watts,
            elev_high: raw.elev_high,
            elev_low: raw.elev_low,
            calories: raw.calories,
            commute: raw.commute,
            trainer: raw.trainer,
            gear: gear_name.or(raw.gear_id),
        }
    }
}
