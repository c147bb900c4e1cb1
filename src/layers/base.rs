use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

use crate::style::expression::Expression;

/// Rendering kind of a style layer, as named by the `type` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerKind {
    Fill,
    Line,
    Symbol,
    Circle,
    Heatmap,
    FillExtrusion,
    Raster,
    Hillshade,
    Background,
    Sky,
    /// Any kind this crate does not model, kept verbatim.
    Other(String),
}

impl LayerKind {
    pub fn as_str(&self) -> &str {
        match self {
            LayerKind::Fill => "fill",
            LayerKind::Line => "line",
            LayerKind::Symbol => "symbol",
            LayerKind::Circle => "circle",
            LayerKind::Heatmap => "heatmap",
            LayerKind::FillExtrusion => "fill-extrusion",
            LayerKind::Raster => "raster",
            LayerKind::Hillshade => "hillshade",
            LayerKind::Background => "background",
            LayerKind::Sky => "sky",
            LayerKind::Other(kind) => kind,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "fill" => LayerKind::Fill,
            "line" => LayerKind::Line,
            "symbol" => LayerKind::Symbol,
            "circle" => LayerKind::Circle,
            "heatmap" => LayerKind::Heatmap,
            "fill-extrusion" => LayerKind::FillExtrusion,
            "raster" => LayerKind::Raster,
            "hillshade" => LayerKind::Hillshade,
            "background" => LayerKind::Background,
            "sky" => LayerKind::Sky,
            other => LayerKind::Other(other.to_string()),
        })
    }
}

impl From<String> for LayerKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<LayerKind> for String {
    fn from(kind: LayerKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Value of the `visibility` layout property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    None,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::None => "none",
        }
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::None
        }
    }
}

/// A single entry of a style document's `layers` array.
///
/// Keys this crate does not interpret (`source-layer`, `minzoom`,
/// `metadata`, ...) are kept in `extra` so a document survives a
/// parse/serialize cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub paint: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub layout: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expression>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LayerDescriptor {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            source: None,
            paint: Map::new(),
            layout: Map::new(),
            filter: None,
            extra: Map::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_paint(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.paint.insert(name.into(), value.into());
        self
    }

    pub fn with_filter(mut self, filter: Expression) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn paint_property(&self, name: &str) -> Option<&Value> {
        self.paint.get(name)
    }

    pub fn layout_property(&self, name: &str) -> Option<&Value> {
        self.layout.get(name)
    }

    /// Effective visibility. Layers without a `visibility` layout property
    /// are visible, as the renderer treats them.
    pub fn visibility(&self) -> Visibility {
        match self.layout.get("visibility").and_then(Value::as_str) {
            Some("none") => Visibility::None,
            _ => Visibility::Visible,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility() == Visibility::Visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_kind_display() {
        assert_eq!(LayerKind::Fill.to_string(), "fill");
        assert_eq!(LayerKind::FillExtrusion.to_string(), "fill-extrusion");
        assert_eq!(LayerKind::Background.to_string(), "background");
        assert_eq!(
            "color-relief".parse::<LayerKind>().unwrap(),
            LayerKind::Other("color-relief".to_string())
        );
    }

    #[test]
    fn test_descriptor_parsing_keeps_unknown_keys() {
        let json = r##"{
            "id": "water",
            "type": "fill",
            "source": "openmaptiles",
            "source-layer": "water",
            "minzoom": 2,
            "paint": {"fill-color": "#a0c8f0"}
        }"##;
        let layer: LayerDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(layer.kind, LayerKind::Fill);
        assert_eq!(layer.source.as_deref(), Some("openmaptiles"));
        assert_eq!(layer.extra.get("source-layer"), Some(&Value::from("water")));
        assert!(layer.is_visible());

        let back = serde_json::to_value(&layer).unwrap();
        assert_eq!(back["source-layer"], "water");
        assert_eq!(back["type"], "fill");
        assert!(back.get("layout").is_none());
    }

    #[test]
    fn test_visibility_defaults_to_visible() {
        let mut layer = LayerDescriptor::new("roads", LayerKind::Line);
        assert_eq!(layer.visibility(), Visibility::Visible);

        layer
            .layout
            .insert("visibility".to_string(), Value::from("none"));
        assert!(!layer.is_visible());
    }
}
