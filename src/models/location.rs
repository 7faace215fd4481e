use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inclusive ordinal interval of the dataset and the place it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRange {
    pub lower: u32,
    pub upper: u32,
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub city: String,
}

impl LocationRange {
    pub fn contains(&self, ordinal: u32) -> bool {
        self.lower <= ordinal && ordinal <= self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub city: String,
}

impl From<LocationRange> for LocationResponse {
    fn from(range: LocationRange) -> Self {
        Self {
            country: range.country,
            country_code: range.country_code,
            region: range.region,
            city: range.city,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}
