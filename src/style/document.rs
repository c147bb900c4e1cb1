use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, path::Path};

use crate::{
    layers::base::{LayerDescriptor, Visibility},
    prelude::HashMap,
    style::expression::Expression,
    MapError, Result,
};

/// A named data source entry of a style document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceDefinition {
    pub fn geojson(data: Value) -> Self {
        Self {
            kind: "geojson".to_string(),
            data: Some(data),
            url: None,
            extra: Map::new(),
        }
    }

    pub fn vector(url: impl Into<String>) -> Self {
        Self {
            kind: "vector".to_string(),
            data: None,
            url: Some(url.into()),
            extra: Map::new(),
        }
    }

    pub fn is_geojson(&self) -> bool {
        self.kind == "geojson"
    }

    /// Whether features of this source can carry `key`. Inline GeoJSON is
    /// inspected; tiled and remote sources cannot be, so they count as
    /// possible providers.
    pub fn may_provide_property(&self, key: &str) -> bool {
        match (&self.data, self.is_geojson()) {
            (Some(data), true) => geojson_has_property(data, key),
            _ => true,
        }
    }
}

fn geojson_has_property(data: &Value, key: &str) -> bool {
    let has = |feature: &Value| {
        feature
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|props| props.contains_key(key))
    };
    match data.get("features").and_then(Value::as_array) {
        Some(features) => features.iter().any(has),
        None => has(data),
    }
}

/// Where the surface gets its style from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleSource {
    Url(String),
    Inline(Box<StyleDocument>),
}

impl Default for StyleSource {
    fn default() -> Self {
        StyleSource::Url(crate::core::constants::DEFAULT_STYLE_URL.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawStyleDocument {
    #[serde(default)]
    sources: BTreeMap<String, SourceDefinition>,
    #[serde(default)]
    layers: Vec<LayerDescriptor>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// An ordered list of layers plus the sources they draw from.
///
/// Fields are private: the document changes only through the mutation
/// methods, which keep the id index in step with the layer order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStyleDocument", into = "RawStyleDocument")]
pub struct StyleDocument {
    sources: BTreeMap<String, SourceDefinition>,
    layers: Vec<LayerDescriptor>,
    /// Layer id to position in `layers`
    layer_index: HashMap<String, usize>,
    extra: Map<String, Value>,
}

impl TryFrom<RawStyleDocument> for StyleDocument {
    type Error = MapError;

    fn try_from(raw: RawStyleDocument) -> std::result::Result<Self, Self::Error> {
        let mut document = StyleDocument {
            sources: raw.sources,
            layers: Vec::with_capacity(raw.layers.len()),
            layer_index: HashMap::default(),
            extra: raw.extra,
        };
        for layer in raw.layers {
            if document.layer_index.contains_key(&layer.id) {
                return Err(MapError::Layer(format!("duplicate layer id '{}'", layer.id)));
            }
            document.push_layer(layer);
        }
        Ok(document)
    }
}

impl From<StyleDocument> for RawStyleDocument {
    fn from(document: StyleDocument) -> Self {
        RawStyleDocument {
            sources: document.sources,
            layers: document.layers,
            extra: document.extra,
        }
    }
}

impl StyleDocument {
    /// An empty version 8 style.
    pub fn new() -> Self {
        let mut extra = Map::new();
        extra.insert("version".to_string(), Value::from(8));
        Self {
            extra,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let document = serde_json::from_str(json).map_err(MapError::Serialization)?;
        Ok(document)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(MapError::Io)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self).map_err(MapError::Serialization)?;
        Ok(json)
    }

    pub fn sources(&self) -> &BTreeMap<String, SourceDefinition> {
        &self.sources
    }

    pub fn source(&self, id: &str) -> Option<&SourceDefinition> {
        self.sources.get(id)
    }

    /// Layers in render order.
    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&LayerDescriptor> {
        self.layer_index.get(id).map(|&i| &self.layers[i])
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn add_source(&mut self, id: &str, source: SourceDefinition) -> Result<()> {
        if self.sources.contains_key(id) {
            return Err(MapError::SourceConflict { id: id.to_string() }.into());
        }
        self.sources.insert(id.to_string(), source);
        Ok(())
    }

    /// Appends a layer on top of the current stack.
    pub fn add_layer(&mut self, layer: LayerDescriptor) -> Result<()> {
        if self.layer_index.contains_key(&layer.id) {
            return Err(MapError::Layer(format!("layer '{}' already exists", layer.id)).into());
        }
        if let Some(source) = &layer.source {
            if !self.sources.contains_key(source) {
                return Err(MapError::Layer(format!(
                    "layer '{}' references unknown source '{}'",
                    layer.id, source
                ))
                .into());
            }
        }
        self.push_layer(layer);
        Ok(())
    }

    pub fn set_paint_property(&mut self, layer_id: &str, name: &str, value: Value) -> Result<()> {
        self.layer_mut(layer_id)?
            .paint
            .insert(name.to_string(), value);
        Ok(())
    }

    pub fn set_layout_property(&mut self, layer_id: &str, name: &str, value: Value) -> Result<()> {
        self.layer_mut(layer_id)?
            .layout
            .insert(name.to_string(), value);
        Ok(())
    }

    pub fn set_filter(&mut self, layer_id: &str, filter: Option<Expression>) -> Result<()> {
        self.layer_mut(layer_id)?.filter = filter;
        Ok(())
    }

    pub fn set_visibility(&mut self, layer_id: &str, visibility: Visibility) -> Result<()> {
        self.set_layout_property(layer_id, "visibility", Value::from(visibility.as_str()))
    }

    fn push_layer(&mut self, layer: LayerDescriptor) {
        self.layer_index.insert(layer.id.clone(), self.layers.len());
        self.layers.push(layer);
    }

    fn layer_mut(&mut self, layer_id: &str) -> Result<&mut LayerDescriptor> {
        match self.layer_index.get(layer_id) {
            Some(&i) => Ok(&mut self.layers[i]),
            None => Err(MapError::Layer(format!("no layer with id '{}'", layer_id)).into()),
        }
    }
}
