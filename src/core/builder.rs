//! Fluent construction of a map view
//!
//! Collects the configuration, boundary data and click sink, then mounts
//! a [`MapView`] on a surface from any [`SurfaceFactory`].

use crate::{
    core::{
        config::MapViewConfig,
        geo::LatLng,
        view::{MapView, MountPoint},
    },
    data::{annotations::Annotation, geojson::BoundaryFeatureCollection},
    input::sink::{DiagnosticSink, LogSink},
    rendering::surface::SurfaceFactory,
    style::document::StyleSource,
    Result,
};

pub struct MapViewBuilder {
    config: MapViewConfig,
    boundaries: BoundaryFeatureCollection,
    sink: Box<dyn DiagnosticSink>,
}

impl MapViewBuilder {
    /// India defaults, no boundary features, clicks written to the log.
    pub fn new() -> Self {
        Self {
            config: MapViewConfig::default(),
            boundaries: BoundaryFeatureCollection::default(),
            sink: Box::new(LogSink),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: MapViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_style(mut self, style: StyleSource) -> Self {
        self.config.style = style;
        self
    }

    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: f64) -> Self {
        self.config.center = center;
        self.config.zoom = zoom;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.config.annotations = annotations;
        self
    }

    /// Enable or disable the country mask layer
    pub fn with_mask(mut self, enabled: bool) -> Self {
        self.config.reconcile.mask = enabled;
        self
    }

    pub fn with_boundaries(mut self, boundaries: BoundaryFeatureCollection) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    /// Mount the view. See [`MapView::mount`] for the failure cases.
    pub fn mount<F>(self, mount_point: Option<&MountPoint>, factory: &F) -> Result<MapView<F::Surface>>
    where
        F: SurfaceFactory,
    {
        MapView::mount(mount_point, factory, self.config, self.boundaries, self.sink)
    }
}

impl Default for MapViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{input::sink::NullSink, rendering::headless::HeadlessFactory, StyleDocument};

    #[test]
    fn test_builder_defaults() {
        let builder = MapViewBuilder::new();
        assert_eq!(builder.config(), &MapViewConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let builder = MapViewBuilder::new()
            .with_center_and_zoom(LatLng::new(28.6139, 77.209), 7.0)
            .with_annotations(Vec::new())
            .with_mask(true);

        let config = builder.config();
        assert_eq!(config.center, LatLng::new(28.6139, 77.209));
        assert_eq!(config.zoom, 7.0);
        assert!(config.annotations.is_empty());
        assert!(config.reconcile.mask);
    }

    #[test]
    fn test_builder_mounts() {
        let factory = HeadlessFactory::new();
        let view = MapViewBuilder::new()
            .with_style(StyleSource::Inline(Box::new(StyleDocument::new())))
            .with_sink(NullSink)
            .mount(Some(&MountPoint::new("map")), &factory)
            .unwrap();

        assert_eq!(factory.created_count(), 1);
        assert!(!view.is_style_applied());
    }

    #[test]
    fn test_builder_rejects_bad_zoom() {
        let factory = HeadlessFactory::new();
        let result = MapViewBuilder::new()
            .with_center_and_zoom(LatLng::default(), f64::NAN)
            .mount(Some(&MountPoint::new("map")), &factory);

        assert!(result.is_err());
        assert_eq!(factory.created_count(), 0);
    }
}
