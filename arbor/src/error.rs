//! Error types used by the crate.

use thiserror::Error;

/// Arbor error type.
#[derive(Debug, Error)]
pub enum ArborError {
    /// Server responded with a non-success HTTP status.
    #[error("request to {url} failed with status {status}")]
    Http {
        /// Requested url.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// Transport level failure (connection refused, DNS, timeout...).
    #[error("failed to load data: {0}")]
    Network(String),
    /// Response body is not valid JSON.
    #[error("failed to decode data")]
    Decoding(#[from] serde_json::Error),
    /// Response body is JSON, but not a GeoJSON feature collection.
    #[error("invalid GeoJSON: {0}")]
    GeoJson(String),
    /// A feature of the collection cannot be displayed.
    #[error("feature #{index} is invalid: {reason}")]
    InvalidFeature {
        /// Position of the feature in the collection.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// The load was superseded by a newer one.
    #[error("load request was cancelled")]
    Cancelled,
    /// Invalid client or layer configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Error interacting with WASM runtime.
    #[error("wasm error: {0:?}")]
    Wasm(Option<String>),
}

impl ArborError {
    pub(crate) fn invalid_feature(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidFeature {
            index,
            reason: reason.into(),
        }
    }
}

impl From<geojson::Error> for ArborError {
    fn from(value: geojson::Error) -> Self {
        Self::GeoJson(value.to_string())
    }
}

impl From<strfmt::FmtError> for ArborError {
    fn from(value: strfmt::FmtError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl From<futures::future::Aborted> for ArborError {
    fn from(_value: futures::future::Aborted) -> Self {
        Self::Cancelled
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for ArborError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::Http {
                url: value.url().map(|url| url.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            },
            None => Self::Network(value.to_string()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ArborError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ArborError::Wasm(Some(format!("{value:?}")))
    }
}
