use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{MapError, Result};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from GeoJSON axis order (longitude first).
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the coordinate in GeoJSON axis order.
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Like [`LatLng::is_valid`], but reports which coordinate is out of range.
    pub fn validate(&self) -> Result<Self> {
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(MapError::InvalidCoordinates(format!(
                "longitude {} outside [-180, 180]",
                self.lng
            ))
            .into());
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(MapError::InvalidCoordinates(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            ))
            .into());
        }
        Ok(*self)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LngLat({:.4}, {:.4})", self.lng, self.lat)
    }
}
