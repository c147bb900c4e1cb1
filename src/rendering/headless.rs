//! In-memory render surface
//!
//! Holds the style, viewport and markers a real engine would draw, without
//! drawing anything. Style loading and pointer input are driven by the
//! caller, which makes the whole map lifecycle scriptable.

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    core::{geo::LatLng, view::MountPoint},
    input::{
        events::{EventKind, SubscriptionId, SurfaceEvent},
        handler::EventManager,
    },
    layers::{
        base::{LayerDescriptor, Visibility},
        marker::Marker,
    },
    rendering::surface::{RenderSurface, SurfaceFactory, SurfaceOptions},
    style::{
        document::{SourceDefinition, StyleDocument, StyleSource},
        expression::Expression,
    },
    traits::StyleApi,
    MapError, Result,
};

/// Turns a style URL into a document.
pub type StyleResolver = Box<dyn Fn(&str) -> Result<StyleDocument> + Send + Sync>;

/// Resolves local file paths. Remote styles need a real engine.
fn resolve_local_style(url: &str) -> Result<StyleDocument> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return Err(MapError::StyleLoadFailure(format!(
            "cannot fetch remote style '{}' without a network-backed engine",
            url
        ))
        .into());
    }
    StyleDocument::from_path(url)
}

pub struct HeadlessSurface {
    container: MountPoint,
    style_source: StyleSource,
    style: Option<StyleDocument>,
    center: LatLng,
    zoom: f64,
    markers: Vec<Marker>,
    events: EventManager,
    resolver: StyleResolver,
    released: bool,
    mutations: usize,
    subscriptions_at_release: Option<usize>,
}

impl std::fmt::Debug for HeadlessSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessSurface")
            .field("container", &self.container)
            .field("style_loaded", &self.style.is_some())
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("markers", &self.markers.len())
            .field("released", &self.released)
            .finish()
    }
}

impl HeadlessSurface {
    pub fn new(container: MountPoint, options: SurfaceOptions) -> Self {
        log::debug!(
            "headless surface attached to '{}' at {} zoom {}",
            container.id(),
            options.center,
            options.zoom
        );
        Self {
            container,
            style_source: options.style,
            style: None,
            center: options.center,
            zoom: options.zoom,
            markers: Vec::new(),
            events: EventManager::new(),
            resolver: Box::new(resolve_local_style),
            released: false,
            mutations: 0,
            subscriptions_at_release: None,
        }
    }

    pub fn with_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> Result<StyleDocument> + Send + Sync + 'static,
    {
        self.resolver = Box::new(resolver);
        self
    }

    /// Loads the configured style and emits `StyleLoaded`, or
    /// `StyleLoadFailed` if it cannot be resolved. Loading again replaces
    /// the current style, as a style switch on a real engine does.
    pub fn complete_style_load(&mut self) -> Result<()> {
        self.ensure_live()?;
        let loaded = match &self.style_source {
            StyleSource::Inline(document) => Ok((**document).clone()),
            StyleSource::Url(url) => (self.resolver)(url),
        };

        match loaded {
            Ok(document) => {
                log::debug!("style loaded with {} layer(s)", document.len());
                self.style = Some(document);
                self.events.emit(SurfaceEvent::StyleLoaded);
            }
            Err(e) => self.fail_style_load(e.to_string()),
        }
        Ok(())
    }

    pub fn fail_style_load(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("style failed to load: {}", reason);
        self.events.emit(SurfaceEvent::StyleLoadFailed { reason });
    }

    /// Simulates a pointer click. Returns whether an observer will see it.
    pub fn click(&mut self, lat_lng: LatLng) -> bool {
        !self.released && self.events.emit(SurfaceEvent::Click { lat_lng })
    }

    pub fn container(&self) -> &MountPoint {
        &self.container
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn style_source(&self) -> &StyleSource {
        &self.style_source
    }

    pub fn is_style_loaded(&self) -> bool {
        self.style.is_some()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker_mut(&mut self, id: &str) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id() == id)
    }

    /// Number of style and marker mutations applied so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    pub fn active_subscriptions(&self) -> usize {
        self.events.active_subscriptions()
    }

    /// Subscriptions still attached when the surface was released.
    pub fn subscriptions_at_release(&self) -> Option<usize> {
        self.subscriptions_at_release
    }

    fn ensure_live(&self) -> Result<()> {
        if self.released {
            return Err(MapError::SurfaceReleased.into());
        }
        Ok(())
    }

    /// Applies `change` to the loaded style. Only successful changes count
    /// as mutations.
    fn mutate_style<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut StyleDocument) -> Result<()>,
    {
        self.ensure_live()?;
        let style = self.style.as_mut().ok_or(MapError::StyleNotLoaded)?;
        change(style)?;
        self.mutations += 1;
        Ok(())
    }
}

impl StyleApi for HeadlessSurface {
    fn style(&self) -> Result<&StyleDocument> {
        self.ensure_live()?;
        self.style
            .as_ref()
            .ok_or_else(|| MapError::StyleNotLoaded.into())
    }

    fn add_source(&mut self, id: &str, source: SourceDefinition) -> Result<()> {
        self.mutate_style(|style| style.add_source(id, source))
    }

    fn add_layer(&mut self, layer: LayerDescriptor) -> Result<()> {
        self.mutate_style(|style| style.add_layer(layer))
    }

    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: Value) -> Result<()> {
        self.mutate_style(|style| style.set_paint_property(layer_id, name, value))
    }

    fn set_filter(&mut self, layer_id: &str, filter: Option<Expression>) -> Result<()> {
        self.mutate_style(|style| style.set_filter(layer_id, filter))
    }

    fn set_visibility(&mut self, layer_id: &str, visibility: Visibility) -> Result<()> {
        self.mutate_style(|style| style.set_visibility(layer_id, visibility))
    }
}

impl RenderSurface for HeadlessSurface {
    fn add_marker(&mut self, marker: Marker) -> Result<()> {
        self.ensure_live()?;
        if self.markers.iter().any(|m| m.id() == marker.id()) {
            return Err(MapError::Layer(format!("marker '{}' already attached", marker.id())).into());
        }
        self.mutations += 1;
        self.markers.push(marker);
        Ok(())
    }

    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId {
        self.events.subscribe(kind)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        if self.released {
            return None;
        }
        self.events.poll()
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.subscriptions_at_release = Some(self.events.active_subscriptions());
        self.events.clear();
        self.markers.clear();
        self.style = None;
        self.released = true;
        log::debug!("headless surface on '{}' released", self.container.id());
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

/// Builds [`HeadlessSurface`]s and counts how many it has made.
#[derive(Debug, Default)]
pub struct HeadlessFactory {
    created: AtomicUsize,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}

impl SurfaceFactory for HeadlessFactory {
    type Surface = HeadlessSurface;

    fn create(&self, mount_point: &MountPoint, options: SurfaceOptions) -> Result<HeadlessSurface> {
        self.created.fetch_add(1, Ordering::Relaxed);
        Ok(HeadlessSurface::new(mount_point.clone(), options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::LayerKind;

    fn options(style: StyleSource) -> SurfaceOptions {
        SurfaceOptions {
            style,
            center: LatLng::new(20.5937, 78.9629),
            zoom: 5.0,
        }
    }

    fn inline_surface() -> HeadlessSurface {
        HeadlessSurface::new(
            MountPoint::new("map"),
            options(StyleSource::Inline(Box::new(StyleDocument::new()))),
        )
    }

    #[test]
    fn test_style_is_unavailable_before_load() {
        let mut surface = inline_surface();
        assert!(surface.style().is_err());
        assert!(surface
            .add_layer(LayerDescriptor::new("a", LayerKind::Fill))
            .is_err());

        surface.complete_style_load().unwrap();
        assert!(surface.is_style_loaded());
        surface
            .add_layer(LayerDescriptor::new("a", LayerKind::Fill))
            .unwrap();
        assert_eq!(surface.style().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_mutations_are_not_counted() {
        let mut surface = inline_surface();
        assert!(surface
            .add_layer(LayerDescriptor::new("a", LayerKind::Fill))
            .is_err());
        assert_eq!(surface.mutation_count(), 0);

        surface.complete_style_load().unwrap();
        surface
            .add_layer(LayerDescriptor::new("a", LayerKind::Fill))
            .unwrap();
        assert!(surface
            .add_layer(LayerDescriptor::new("a", LayerKind::Line))
            .is_err());
        assert!(surface.set_visibility("missing", Visibility::None).is_err());
        assert!(surface
            .set_paint_property("missing", "fill-color", Value::from("#000"))
            .is_err());
        assert_eq!(surface.mutation_count(), 1);
    }

    #[test]
    fn test_load_event_needs_subscription() {
        let mut surface = inline_surface();
        surface.complete_style_load().unwrap();
        assert_eq!(surface.poll_event(), None);

        surface.subscribe(EventKind::StyleLoaded);
        surface.complete_style_load().unwrap();
        assert_eq!(surface.poll_event(), Some(SurfaceEvent::StyleLoaded));
    }

    #[test]
    fn test_url_resolution() {
        let mut surface = HeadlessSurface::new(
            MountPoint::new("map"),
            options(StyleSource::Url("memory://basic".to_string())),
        )
        .with_resolver(|url| {
            assert_eq!(url, "memory://basic");
            Ok(StyleDocument::new())
        });
        surface.complete_style_load().unwrap();
        assert!(surface.is_style_loaded());
    }

    #[test]
    fn test_remote_url_fails_on_error_channel() {
        let mut surface = HeadlessSurface::new(
            MountPoint::new("map"),
            options(StyleSource::Url("https://example.org/style.json".to_string())),
        );
        surface.complete_style_load().unwrap();
        assert!(!surface.is_style_loaded());
        assert!(matches!(
            surface.poll_event(),
            Some(SurfaceEvent::StyleLoadFailed { .. })
        ));
    }

    #[test]
    fn test_release() {
        let mut surface = inline_surface();
        surface.subscribe(EventKind::Click);
        surface.release();
        surface.release();

        assert!(surface.is_released());
        assert_eq!(surface.subscriptions_at_release(), Some(1));
        assert!(!surface.click(LatLng::default()));
        assert!(surface.complete_style_load().is_err());
        assert!(surface
            .add_marker(Marker::new("m".to_string(), LatLng::default()))
            .is_err());
    }

    #[test]
    fn test_factory_counts_surfaces() {
        let factory = HeadlessFactory::new();
        let surface = factory
            .create(&MountPoint::new("map"), options(StyleSource::default()))
            .unwrap();
        assert_eq!(factory.created_count(), 1);
        assert_eq!(surface.container().id(), "map");
        assert_eq!(surface.zoom(), 5.0);
    }
}
