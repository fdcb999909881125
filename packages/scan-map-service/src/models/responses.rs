use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapResponse {
    pub success: bool,

    // false when no map access token is configured
    pub initialized: bool,

    pub record_count: usize,
    pub marker_count: usize,

    // Rendered surface as a GeoJSON FeatureCollection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}
