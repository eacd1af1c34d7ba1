//! Settings of the [`MapClient`](crate::MapClient).

use std::str::FromStr;
use std::time::Duration;

use arbor_types::cartesian::Size;
use arbor_types::geo::{GeoPoint, GeoPoint2d};
use arbor_types::latlon;
use serde::{Deserialize, Serialize};

use crate::error::ArborError;
use crate::layer::raster_tile_layer::OSM_TILE_URL;
use crate::layer::Attribution;
use crate::trees::DEFAULT_PREVIEW_LEN;

/// Prefix of the environment variables read by [`ClientConfig::from_env`].
pub const ENV_PREFIX: &str = "ARBOR_";

/// What happens to the markers of the previous load when new trees are loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// New markers are added on top of the existing ones.
    #[default]
    Append,
    /// Marker layers of previous loads are removed first.
    Replace,
}

impl FromStr for LoadMode {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            other => Err(ArborError::Configuration(format!(
                "unknown load mode '{other}', expected 'append' or 'replace'"
            ))),
        }
    }
}

/// Client configuration. Missing fields of a deserialized config take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the tree server. `None` means urls relative to the current page, which only
    /// works in the browser.
    pub base_url: Option<String>,
    /// Path of the trees endpoint.
    pub trees_path: String,
    /// Url template of the base map tiles.
    pub tile_url_template: String,
    /// Attribution text of the base map.
    pub attribution_text: String,
    /// Link shown with the base map attribution.
    pub attribution_url: Option<String>,
    /// Center of the map at startup.
    pub initial_center: GeoPoint2d,
    /// Zoom level of the map at startup.
    pub initial_zoom: u32,
    /// Most detailed zoom level used when fitting the view to loaded trees.
    pub max_zoom: u32,
    /// Size of the map viewport in pixels.
    pub viewport: Size,
    /// Space in pixels kept free around the trees when fitting the view.
    pub fit_padding: f64,
    /// Number of features shown in the info preview.
    pub preview_len: usize,
    /// Handling of the markers of previous loads.
    pub load_mode: LoadMode,
    /// `User-Agent` header of native requests.
    pub user_agent: String,
    /// Timeout of native requests, in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            trees_path: "/api/trees".to_string(),
            tile_url_template: OSM_TILE_URL.to_string(),
            attribution_text: "© OpenStreetMap".to_string(),
            attribution_url: Some("https://www.openstreetmap.org/copyright".to_string()),
            initial_center: latlon!(0.0, 0.0),
            initial_zoom: 2,
            max_zoom: 18,
            viewport: Size::new(1024.0, 768.0),
            fit_padding: 0.0,
            preview_len: DEFAULT_PREVIEW_LEN,
            load_mode: LoadMode::default(),
            user_agent: concat!("arbor/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: Some(30),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_base_url() -> Option<String> {
    Some("http://127.0.0.1:8000".to_string())
}

#[cfg(target_arch = "wasm32")]
fn default_base_url() -> Option<String> {
    None
}

impl ClientConfig {
    /// Reads the configuration from `ARBOR_*` environment variables on top of the defaults.
    ///
    /// Recognized variables: `ARBOR_BASE_URL`, `ARBOR_TREES_PATH`, `ARBOR_TILE_URL`,
    /// `ARBOR_ATTRIBUTION`, `ARBOR_CENTER_LAT`, `ARBOR_CENTER_LON`, `ARBOR_ZOOM`,
    /// `ARBOR_MAX_ZOOM`, `ARBOR_VIEWPORT_WIDTH`, `ARBOR_VIEWPORT_HEIGHT`, `ARBOR_FIT_PADDING`,
    /// `ARBOR_PREVIEW_LEN`, `ARBOR_LOAD_MODE`, `ARBOR_USER_AGENT` and `ARBOR_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ArborError> {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`ClientConfig::from_env`], but reads the variables from the iterator.
    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ArborError> {
        let mut config = Self::default();
        let mut center = (config.initial_center.lat(), config.initial_center.lon());

        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match name {
                "BASE_URL" => config.base_url = (!value.is_empty()).then_some(value),
                "TREES_PATH" => config.trees_path = value,
                "TILE_URL" => config.tile_url_template = value,
                "ATTRIBUTION" => config.attribution_text = value,
                "CENTER_LAT" => center.0 = parse_var(&key, &value)?,
                "CENTER_LON" => center.1 = parse_var(&key, &value)?,
                "ZOOM" => config.initial_zoom = parse_var(&key, &value)?,
                "MAX_ZOOM" => config.max_zoom = parse_var(&key, &value)?,
                "VIEWPORT_WIDTH" => {
                    config.viewport = Size::new(parse_var(&key, &value)?, config.viewport.height())
                }
                "VIEWPORT_HEIGHT" => {
                    config.viewport = Size::new(config.viewport.width(), parse_var(&key, &value)?)
                }
                "FIT_PADDING" => config.fit_padding = parse_var(&key, &value)?,
                "PREVIEW_LEN" => config.preview_len = parse_var(&key, &value)?,
                "LOAD_MODE" => config.load_mode = value.parse()?,
                "USER_AGENT" => config.user_agent = value,
                "TIMEOUT_SECS" => config.request_timeout_secs = Some(parse_var(&key, &value)?),
                _ => log::warn!("Unknown configuration variable {key}"),
            }
        }

        config.initial_center = latlon!(center.0, center.1);
        Ok(config)
    }

    /// Full url of the trees endpoint.
    pub fn trees_url(&self) -> String {
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                self.trees_path.trim_start_matches('/')
            ),
            None => self.trees_path.clone(),
        }
    }

    /// Attribution of the base map.
    pub fn attribution(&self) -> Attribution {
        Attribution::new(self.attribution_text.clone(), self.attribution_url.clone())
    }

    /// Request timeout of native requests.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Sets the origin of the tree server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the viewport size.
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    /// Sets the handling of previously loaded markers.
    pub fn with_load_mode(mut self, load_mode: LoadMode) -> Self {
        self.load_mode = load_mode;
        self
    }

    /// Sets the url template of the base map.
    pub fn with_tile_url_template(mut self, template: impl Into<String>) -> Self {
        self.tile_url_template = template.into();
        self
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, ArborError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|err| ArborError::Configuration(format!("invalid value of {key} '{value}': {err}")))
}
