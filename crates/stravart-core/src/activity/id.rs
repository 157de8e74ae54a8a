use crate::error::ActivityError;

/// Validate a Strava activity id and return it as a number.
///
/// Surrounding whitespace is ignored. Ids must be positive whole numbers.
pub fn validate_activity_id(activity_id: &str) -> Result<u64, ActivityError> {
    let trimmed = activity_id.trim();
    if trimmed.is_empty() {
        return Err(ActivityError::invalid_id("Activity ID cannot be empty"));
    }
    if let Ok(id) = trimmed.parse::<u64>() {
        if id == 0 {
            return Err(ActivityError::invalid_id("Activity ID must be a positive number"));
        }
        return Ok(id);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n <= 0.0 => Err(ActivityError::invalid_id(
            "Activity ID must be a positive number",
        )),
        _ => Err(ActivityError::invalid_id("Activity ID must be a valid number")),
    }
}
