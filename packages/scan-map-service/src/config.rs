use serde::Deserialize;

use crate::libraries::map_surface::Viewport;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    // Base URL of the trade-tracking API (serves /item/map and /event/:key)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    // Map provider access token; maps are not rendered without it
    #[serde(default)]
    pub map_access_token: Option<String>,

    // Pixels kept around the markers when fitting the viewport
    #[serde(default = "default_fit_padding")]
    pub map_fit_padding: u32,

    // Viewport used until there is something to fit
    #[serde(default)]
    pub map_default_latitude: f64,
    #[serde(default)]
    pub map_default_longitude: f64,
    #[serde(default = "default_zoom")]
    pub map_default_zoom: f64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()
    }

    /// The map access token, unless unset or blank.
    pub fn map_token(&self) -> Option<&str> {
        self.map_access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn initial_viewport(&self) -> Viewport {
        Viewport::Center {
            latitude: self.map_default_latitude,
            longitude: self.map_default_longitude,
            zoom: self.map_default_zoom,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            api_base_url: default_api_base_url(),
            map_access_token: None, // Must be provided via environment
            map_fit_padding: default_fit_padding(),
            map_default_latitude: 0.0,
            map_default_longitude: 0.0,
            map_default_zoom: default_zoom(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_fit_padding() -> u32 {
    50
}

fn default_zoom() -> f64 {
    2.0
}

fn default_user_agent() -> String {
    format!("scan-map-service/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_iter_applies_defaults() {
        let config: Config = envy::from_iter(vec![(
            "MAP_ACCESS_TOKEN".to_string(),
            "pk.abc".to_string(),
        )])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.map_access_token.as_deref(), Some("pk.abc"));
        assert_eq!(config.map_fit_padding, 50);
        assert_eq!(
            config.initial_viewport(),
            Viewport::Center {
                latitude: 0.0,
                longitude: 0.0,
                zoom: 2.0
            }
        );
    }

    #[test]
    fn test_from_iter_overrides() {
        let config: Config = envy::from_iter(vec![
            ("PORT".to_string(), "8088".to_string()),
            ("API_BASE_URL".to_string(), "https://api.example.com".to_string()),
            ("MAP_FIT_PADDING".to_string(), "20".to_string()),
            ("MAP_DEFAULT_LATITUDE".to_string(), "45.8".to_string()),
            ("MAP_DEFAULT_ZOOM".to_string(), "11".to_string()),
        ])
        .unwrap();

        assert_eq!(config.port, 8088);
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert!(config.map_access_token.is_none());
        assert_eq!(config.map_fit_padding, 20);
        assert_eq!(config.map_default_latitude, 45.8);
        assert_eq!(config.map_default_zoom, 11.0);
    }

    #[test]
    fn test_blank_map_token_counts_as_missing() {
        let config: Config = envy::from_iter(vec![(
            "MAP_ACCESS_TOKEN".to_string(),
            "   ".to_string(),
        )])
        .unwrap();
        assert_eq!(config.map_access_token.as_deref(), Some("   "));
        assert!(config.map_token().is_none());

        let config = Config {
            map_access_token: Some(" pk.abc ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.map_token(), Some("pk.abc"));
        assert!(Config::default().map_token().is_none());
    }
}
