//! Shared trait abstractions for common patterns
//!
//! This module provides the trait seams shared between the plain style
//! document and the rendering engines that own one.

use serde_json::Value;

use crate::{
    layers::base::{LayerDescriptor, Visibility},
    style::{
        document::{SourceDefinition, StyleDocument},
        expression::Expression,
    },
    Result,
};

/// Trait for style mutation operations
/// Everything that changes a style goes through these calls, so an engine
/// can keep its render order and caches in step with the document.
pub trait StyleApi {
    /// The current style. Engines fail here until a style has loaded.
    fn style(&self) -> Result<&StyleDocument>;

    /// Register a new source; fails if the id is taken
    fn add_source(&mut self, id: &str, source: SourceDefinition) -> Result<()>;

    /// Append a layer on top of the stack; fails if the id is taken
    fn add_layer(&mut self, layer: LayerDescriptor) -> Result<()>;

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: Value) -> Result<()>;

    fn set_filter(&mut self, layer_id: &str, filter: Option<Expression>) -> Result<()>;

    fn set_visibility(&mut self, layer_id: &str, visibility: Visibility) -> Result<()>;
}

impl StyleApi for StyleDocument {
    fn style(&self) -> Result<&StyleDocument> {
        Ok(self)
    }

    fn add_source(&mut self, id: &str, source: SourceDefinition) -> Result<()> {
        StyleDocument::add_source(self, id, source)
    }

    fn add_layer(&mut self, layer: LayerDescriptor) -> Result<()> {
        StyleDocument::add_layer(self, layer)
    }

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: Value) -> Result<()> {
        StyleDocument::set_paint_property(self, layer_id, name, value)
    }

    fn set_filter(&mut self, layer_id: &str, filter: Option<Expression>) -> Result<()> {
        StyleDocument::set_filter(self, layer_id, filter)
    }

    fn set_visibility(&mut self, layer_id: &str, visibility: Visibility) -> Result<()> {
        StyleDocument::set_visibility(self, layer_id, visibility)
    }
}
