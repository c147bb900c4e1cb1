use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::{MapError, Result};

/// GeoJSON geometry types. Positions keep longitude and latitude; an
/// altitude or any further element is dropped on parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", try_from = "RawGeometry")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// Geometry as written, with positions of any length.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Point { coordinates: Vec<f64> },
    LineString { coordinates: Vec<Vec<f64>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    GeometryCollection { geometries: Vec<GeoJsonGeometry> },
}

fn position(raw: Vec<f64>) -> std::result::Result<[f64; 2], MapError> {
    match raw.as_slice() {
        [lng, lat, ..] => Ok([*lng, *lat]),
        _ => Err(MapError::ParseError(format!(
            "position needs at least 2 coordinates, found {}",
            raw.len()
        ))),
    }
}

fn positions(raw: Vec<Vec<f64>>) -> std::result::Result<Vec<[f64; 2]>, MapError> {
    raw.into_iter().map(position).collect()
}

fn rings(raw: Vec<Vec<Vec<f64>>>) -> std::result::Result<Vec<Vec<[f64; 2]>>, MapError> {
    raw.into_iter().map(positions).collect()
}

impl TryFrom<RawGeometry> for GeoJsonGeometry {
    type Error = MapError;

    fn try_from(raw: RawGeometry) -> std::result::Result<Self, Self::Error> {
        let geometry = match raw {
            RawGeometry::Point { coordinates } => GeoJsonGeometry::Point {
                coordinates: position(coordinates)?,
            },
            RawGeometry::LineString { coordinates } => GeoJsonGeometry::LineString {
                coordinates: positions(coordinates)?,
            },
            RawGeometry::Polygon { coordinates } => GeoJsonGeometry::Polygon {
                coordinates: rings(coordinates)?,
            },
            RawGeometry::MultiPoint { coordinates } => GeoJsonGeometry::MultiPoint {
                coordinates: positions(coordinates)?,
            },
            RawGeometry::MultiLineString { coordinates } => GeoJsonGeometry::MultiLineString {
                coordinates: rings(coordinates)?,
            },
            RawGeometry::MultiPolygon { coordinates } => GeoJsonGeometry::MultiPolygon {
                coordinates: coordinates
                    .into_iter()
                    .map(rings)
                    .collect::<std::result::Result<_, _>>()?,
            },
            RawGeometry::GeometryCollection { geometries } => {
                GeoJsonGeometry::GeometryCollection { geometries }
            }
        };
        Ok(geometry)
    }
}

impl GeoJsonGeometry {
    /// The GeoJSON `type` name, e.g. `"MultiPolygon"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJsonGeometry::Point { .. } => "Point",
            GeoJsonGeometry::LineString { .. } => "LineString",
            GeoJsonGeometry::Polygon { .. } => "Polygon",
            GeoJsonGeometry::MultiPoint { .. } => "MultiPoint",
            GeoJsonGeometry::MultiLineString { .. } => "MultiLineString",
            GeoJsonGeometry::MultiPolygon { .. } => "MultiPolygon",
            GeoJsonGeometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// The type as seen by `$type` filters: multi-geometries collapse to
    /// their single counterpart. Collections have no filter type.
    pub fn filter_type_name(&self) -> Option<&'static str> {
        match self {
            GeoJsonGeometry::Point { .. } | GeoJsonGeometry::MultiPoint { .. } => Some("Point"),
            GeoJsonGeometry::LineString { .. } | GeoJsonGeometry::MultiLineString { .. } => {
                Some("LineString")
            }
            GeoJsonGeometry::Polygon { .. } | GeoJsonGeometry::MultiPolygon { .. } => {
                Some("Polygon")
            }
            GeoJsonGeometry::GeometryCollection { .. } => None,
        }
    }

    pub fn is_areal(&self) -> bool {
        self.filter_type_name() == Some("Polygon")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type", default)]
    pub tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, Value>>,
}

impl GeoJsonFeature {
    pub fn new(geometry: GeoJsonGeometry) -> Self {
        Self {
            tag: FeatureTag::Feature,
            id: None,
            geometry: Some(geometry),
            properties: None,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

/// Administrative boundary polygons, one feature per region, used as the
/// data of the `india` source. Treated as read-only input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryFeatureCollection {
    features: Vec<GeoJsonFeature>,
}

impl BoundaryFeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self { features }
    }

    /// Parses a GeoJSON document whose root must be a FeatureCollection.
    pub fn from_str(geojson_str: &str) -> Result<Self> {
        let data: GeoJson = serde_json::from_str(geojson_str)
            .map_err(|e| MapError::ParseError(format!("Invalid GeoJSON: {}", e)))?;

        match data {
            GeoJson::FeatureCollection { features } => Ok(Self { features }),
            GeoJson::Feature(_) => Err(MapError::ParseError(
                "boundary data must be a FeatureCollection, found a Feature".to_string(),
            )
            .into()),
        }
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(MapError::Io)?;
        Self::from_str(&text)
    }

    pub fn features(&self) -> &[GeoJsonFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of features with polygon or multipolygon geometry.
    pub fn polygon_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| f.geometry.as_ref().is_some_and(GeoJsonGeometry::is_areal))
            .count()
    }

    /// The collection as a GeoJSON value, ready to embed in a source.
    pub fn to_value(&self) -> Result<Value> {
        let root = serde_json::json!({
            "type": "FeatureCollection",
            "features": serde_json::to_value(&self.features).map_err(MapError::Serialization)?,
        });
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: &str = r#"
    {
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"st_nm": "Goa"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[73.7, 15.7], [74.3, 15.7], [74.3, 14.9], [73.7, 15.7]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"st_nm": "Lakshadweep"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[72.6, 10.5], [72.7, 10.5], [72.7, 10.6], [72.6, 10.5]]]]
                }
            }
        ]
    }
    "#;

    #[test]
    fn test_boundary_parsing() {
        let boundaries = BoundaryFeatureCollection::from_str(STATES).unwrap();
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries.polygon_count(), 2);
        assert_eq!(
            boundaries.features()[0].property("st_nm"),
            Some(&Value::from("Goa"))
        );
    }

    #[test]
    fn test_altitude_is_dropped() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"st_nm": "Sikkim"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[88.0, 27.0, 610.0], [88.9, 27.0, 5000.0], [88.9, 28.1, 0.0], [88.0, 27.0, 610.0]]]
                }
            }]
        }"#;
        let boundaries = BoundaryFeatureCollection::from_str(json).unwrap();

        assert_eq!(
            boundaries.features()[0].geometry,
            Some(GeoJsonGeometry::Polygon {
                coordinates: vec![vec![[88.0, 27.0], [88.9, 27.0], [88.9, 28.1], [88.0, 27.0]]],
            })
        );
    }

    #[test]
    fn test_short_position_is_rejected() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": null,
                          "geometry": {"type": "Point", "coordinates": [77.0]}}]
        }"#;
        let err = BoundaryFeatureCollection::from_str(json).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<MapError>(),
            Some(MapError::ParseError(_))
        ));
    }

    #[test]
    fn test_single_feature_root_is_rejected() {
        let feature = r#"{"type": "Feature", "geometry": null, "properties": null}"#;
        assert!(BoundaryFeatureCollection::from_str(feature).is_err());
    }

    #[test]
    fn test_filter_type_names() {
        let multi = GeoJsonGeometry::MultiPolygon {
            coordinates: Vec::new(),
        };
        assert_eq!(multi.type_name(), "MultiPolygon");
        assert_eq!(multi.filter_type_name(), Some("Polygon"));

        let line = GeoJsonGeometry::MultiLineString {
            coordinates: Vec::new(),
        };
        assert_eq!(line.filter_type_name(), Some("LineString"));
        assert!(!line.is_areal());
    }

    #[test]
    fn test_to_value_is_feature_collection() {
        let boundaries = BoundaryFeatureCollection::from_str(STATES).unwrap();
        let value = boundaries.to_value().unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][1]["geometry"]["type"], "MultiPolygon");
    }
}
