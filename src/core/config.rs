//! Configuration for the map view
//!
//! Every field has a default matching the stock India map, so a config
//! file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    core::{
        constants::{DEFAULT_ZOOM, INDIA_CENTER_LAT, INDIA_CENTER_LNG},
        geo::LatLng,
    },
    data::annotations::{Annotation, INDIA_CITIES},
    style::document::StyleSource,
    MapError, Result,
};

/// Options for the style reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Add the grey country mask layer. Only has an effect when a source
    /// with `iso_3166_1_alpha_3`-tagged world features is active.
    pub mask: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub style: StyleSource,
    pub center: LatLng,
    pub zoom: f64,
    pub annotations: Vec<Annotation>,
    pub reconcile: ReconcileOptions,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            style: StyleSource::default(),
            center: LatLng::from_lng_lat(INDIA_CENTER_LNG, INDIA_CENTER_LAT),
            zoom: DEFAULT_ZOOM,
            annotations: INDIA_CITIES.clone(),
            reconcile: ReconcileOptions::default(),
        }
    }
}

impl MapViewConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(MapError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(MapError::Io)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.center.validate()?;
        if !self.zoom.is_finite() || self.zoom < 0.0 {
            return Err(MapError::Configuration(format!("invalid zoom level {}", self.zoom)).into());
        }
        for annotation in &self.annotations {
            annotation.position().validate()?;
        }
        Ok(())
    }
}
