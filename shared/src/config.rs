use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Cars shown per garage page.
pub const PAGE_LIMIT: usize = 7;

/// Status the engine endpoint answers with when a car breaks down mid-drive.
pub const BREAKDOWN_STATUS: u16 = 500;

/// Track length assumed when the start reply carries velocity only.
pub const DEFAULT_DISTANCE: f64 = 500_000.0;

/// Pixels kept free at the end of a road so the car stays visible.
pub const TRACK_CORRECTION: f64 = 180.0;

pub const GENERATE_COUNT: usize = 100;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GarageConfig {
    /// Backend origin, without a trailing slash.
    pub base_url: String,
    pub page_limit: usize,
    pub breakdown_status: u16,
    pub default_distance: f64,
    pub track_correction: f64,
    pub generate_count: usize,
}

impl Default for GarageConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_limit: PAGE_LIMIT,
            breakdown_status: BREAKDOWN_STATUS,
            default_distance: DEFAULT_DISTANCE,
            track_correction: TRACK_CORRECTION,
            generate_count: GENERATE_COUNT,
        }
    }
}

impl GarageConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
