//! Credits of the data sources displayed on the map.

use serde::{Deserialize, Serialize};

/// Attribution text of a layer with an optional link to the source terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    text: String,
    url: Option<String>,
}

impl Attribution {
    /// Creates a new `Attribution` with the given text and optional URL.
    pub fn new(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            text: text.into(),
            url,
        }
    }

    /// Attribution text, e.g. `© OpenStreetMap`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Link to the source or its terms of use.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
