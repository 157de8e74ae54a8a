use serde::{Deserialize, Serialize};

/// Gear as returned by Strava: usually a summary object, occasionally a bare string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawGear {
    Name(String),
    Summary {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

/// Subset of the Strava `DetailedActivity` / `SummaryActivity` payload we consume.
///
/// Unknown fields are ignored; `id`, `type` and `sport_type` are required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawActivity {
    pub id: u64,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub sport_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub moving_time: Option<u64>,
    #[serde(default)]
    pub elapsed_time: Option<u64>,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub start_date_local: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub average_cadence: Option<f64>,
    #[serde(default)]
    pub average_temp: Option<f64>,
    #[serde(default)]
    pub average_watts: Option<f64>,
    #[serde(default)]
    pub weighted_average_watts: Option<f64>,
    #[serde(default)]
    pub kilojoules: Option<f64>,
    #[serde(default)]
    pub device_watts: Option<bool>,
    #[serde(default)]
    pub has_heartrate: Option<bool>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub max_watts: Option<f64>,
    #[serde(default)]
    pub elev_high: Option<f64>,
    #[serde(default)]
    pub elev_low: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub commute: Option<bool>,
    #[serde(default)]
    pub trainer: Option<bool>,
    #[serde(default)]
    pub gear: Option<RawGear>,
    #[serde(default)]
    pub gear_id: Option<String>,
}

/// Internal activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub sport_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<u64>,
    /// Total elevation gain in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_local: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_watts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_average_watts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kilojoules: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_watts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_heartrate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_hr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_watts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elev_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elev_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commute: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer: Option<bool>,
    /// Gear name, or the gear id when no name was returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear: Option<String>,
}

impl Activity {
    /// Minimal activity with only the required fields set.
    pub fn new(id: u64, activity_type: impl Into<String>, sport_type: impl Into<String>) -> Self {
        Self {
            id,
            activity_type: activity_type.into(),
            sport_type: sport_type.into(),
            name: None,
            description: None,
            distance: None,
            moving_time: None,
            elapsed_time: None,
            elevation_gain: None,
            start_date: None,
            start_date_local: None,
            timezone: None,
            average_speed: None,
            max_speed: None,
            average_cadence: None,
            average_temp: None,
            average_watts: None,
            weighted_average_watts: None,
            kilojoules: None,
            device_watts: None,
            has_heartrate: None,
            avg_hr: None,
            max_watts: None,
            elev_high: None,
            elev_low: None,
            calories: None,
            commute: None,
            trainer: None,
            gear: None,
        }
    }
}
