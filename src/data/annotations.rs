//! Labelled city annotations shown as markers.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{core::geo::LatLng, MapError, Result};

/// Configuration form of an annotation:
/// `{"label": ..., "longitude": ..., "latitude": ..., "url": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnnotationEntry {
    label: String,
    longitude: f64,
    latitude: f64,
    url: String,
}

/// A labelled point linking to an external page. Immutable once built;
/// the position is always within geographic range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnnotationEntry", into = "AnnotationEntry")]
pub struct Annotation {
    label: String,
    position: LatLng,
    target_url: String,
}

impl TryFrom<AnnotationEntry> for Annotation {
    type Error = MapError;

    fn try_from(entry: AnnotationEntry) -> std::result::Result<Self, Self::Error> {
        let position = LatLng::from_lng_lat(entry.longitude, entry.latitude);
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "annotation '{}' at {}",
                entry.label, position
            )));
        }
        Ok(Self {
            label: entry.label,
            position,
            target_url: entry.url,
        })
    }
}

impl From<Annotation> for AnnotationEntry {
    fn from(annotation: Annotation) -> Self {
        AnnotationEntry {
            label: annotation.label,
            longitude: annotation.position.lng,
            latitude: annotation.position.lat,
            url: annotation.target_url,
        }
    }
}

impl Annotation {
    pub fn new(
        label: impl Into<String>,
        longitude: f64,
        latitude: f64,
        target_url: impl Into<String>,
    ) -> Result<Self> {
        let annotation: Self = AnnotationEntry {
            label: label.into(),
            longitude,
            latitude,
            url: target_url.into(),
        }
        .try_into()?;
        Ok(annotation)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

/// Loads an ordered annotation list from a JSON array.
pub fn load_annotations(json: &str) -> Result<Vec<Annotation>> {
    let annotations = serde_json::from_str(json).map_err(MapError::Serialization)?;
    Ok(annotations)
}

pub fn load_annotations_from_path(path: impl AsRef<Path>) -> Result<Vec<Annotation>> {
    let text = std::fs::read_to_string(path).map_err(MapError::Io)?;
    load_annotations(&text)
}

fn city(label: &str, longitude: f64, latitude: f64, url: &str) -> Annotation {
    Annotation {
        label: label.to_string(),
        position: LatLng::from_lng_lat(longitude, latitude),
        target_url: url.to_string(),
    }
}

/// The stock city list, in display order.
pub static INDIA_CITIES: Lazy<Vec<Annotation>> = Lazy::new(|| {
    vec![
        city(
            "New Delhi",
            77.2090,
            28.6139,
            "https://heyzine.com/flip-book/d8c1c5c1e9.html#page/4",
        ),
        city("Mumbai", 72.8777, 19.0759, "https://en.wikipedia.org/wiki/Mumbai"),
        city(
            "Bengaluru",
            77.5946,
            12.9716,
            "https://heyzine.com/flip-book/d8c1c5c1e9.html#page/6",
        ),
        city(
            "Hyderabad",
            78.4867,
            17.3850,
            "https://en.wikipedia.org/wiki/Hyderabad",
        ),
        city("Chennai", 80.2707, 13.0827, "https://en.wikipedia.org/wiki/Chennai"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_cities() {
        let labels: Vec<&str> = INDIA_CITIES.iter().map(Annotation::label).collect();
        assert_eq!(labels, ["New Delhi", "Mumbai", "Bengaluru", "Hyderabad", "Chennai"]);
        assert!(INDIA_CITIES.iter().all(|a| a.position().is_valid()));
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"[
            {"label": "Kolkata", "longitude": 88.3639, "latitude": 22.5726,
             "url": "https://en.wikipedia.org/wiki/Kolkata"}
        ]"#;
        let annotations = load_annotations(json).unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].position(), LatLng::new(22.5726, 88.3639));
        assert_eq!(annotations[0].target_url(), "https://en.wikipedia.org/wiki/Kolkata");
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(Annotation::new("Nowhere", 200.0, 10.0, "https://example.org").is_err());
        let json = r#"[{"label": "x", "longitude": 0, "latitude": -91, "url": ""}]"#;
        assert!(load_annotations(json).is_err());
    }

    #[test]
    fn test_serializes_to_config_form() {
        let value = serde_json::to_value(&INDIA_CITIES[1]).unwrap();
        assert_eq!(value["label"], "Mumbai");
        assert_eq!(value["longitude"], 72.8777);
        assert_eq!(value["latitude"], 19.0759);
    }
}
