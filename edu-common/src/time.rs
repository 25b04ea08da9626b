//! Timestamp and identifier utilities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Generate a new UUIDv4 for a pipeline artifact
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Format whole minutes as fractional hours with one decimal ("1.5")
pub fn minutes_as_hours(minutes: u32) -> String {
    format!("{:.1}", minutes as f64 / 60.0)
}
