//! Viewer configuration.

use crate::error::PageViewResult;
use crate::transform::Interpolation;
use crate::zoom::{validate_zoom_factor, ZoomCatalog};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings a page is created with.
///
/// Read from JSON with camelCase keys; every key is optional:
///
/// ```json
/// { "catalog": [0.5, 1, 2], "interpolation": "nearest", "initialZoom": 0.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Levels used by stepped zoom in/out.
    pub catalog: ZoomCatalog,
    /// Resampling used when resizing the page.
    pub interpolation: Interpolation,
    /// Zoom factor the page starts at. Need not be a catalog entry.
    pub initial_zoom: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            catalog: ZoomCatalog::default(),
            interpolation: Interpolation::default(),
            initial_zoom: 1.0,
        }
    }
}

/// The JSON shape, before any values are checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct RawViewerConfig {
    catalog: Option<Vec<f64>>,
    interpolation: Option<Interpolation>,
    initial_zoom: Option<f64>,
}

impl ViewerConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// Malformed JSON is a [`PageViewError::Config`](crate::PageViewError::Config);
    /// a bad catalog or initial zoom is an
    /// [`InvalidZoomFactor`](crate::PageViewError::InvalidZoomFactor).
    pub fn from_json_str(json: &str) -> PageViewResult<Self> {
        let raw: RawViewerConfig = serde_json::from_str(json)?;
        let defaults = Self::default();
        let config = Self {
            catalog: match raw.catalog {
                Some(levels) => ZoomCatalog::new(levels)?,
                None => defaults.catalog,
            },
            interpolation: raw.interpolation.unwrap_or(defaults.interpolation),
            initial_zoom: raw.initial_zoom.unwrap_or(defaults.initial_zoom),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> PageViewResult<Self> {
        let path = path.as_ref();
        log::debug!(target: "pageview", "loading config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the values serde cannot check on its own.
    pub fn validate(&self) -> PageViewResult<()> {
        validate_zoom_factor(self.initial_zoom)?;
        Ok(())
    }
}
