//! Strava activities: id validation, API calls, response mapping and the
//! retrying fetch pipeline.

mod api;
mod fetch;
mod id;
mod transform;
mod types;

pub use api::{ApiFailure, ListQuery, StravaApi};
pub use fetch::ActivityFetcher;
pub use id::validate_activity_id;
pub use transform::{transform_activities, transform_activity};
pub use types::{Activity, RawActivity, RawGear};
