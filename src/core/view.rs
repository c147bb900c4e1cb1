//! Map view lifecycle
//!
//! A [`MapView`] owns exactly one render surface between mount and
//! unmount. The first `StyleLoaded` event runs style reconciliation and
//! then the marker overlay; clicks go to a diagnostic sink. The surface is
//! released on unmount, or on drop if the view is never unmounted.

use crate::{
    core::config::{MapViewConfig, ReconcileOptions},
    data::geojson::BoundaryFeatureCollection,
    input::{
        events::{EventKind, SubscriptionId, SurfaceEvent},
        sink::DiagnosticSink,
    },
    layers::overlay::MarkerOverlay,
    rendering::surface::{RenderSurface, SurfaceFactory, SurfaceOptions},
    style::reconcile::{reconcile, ReconcileReport},
    LatLng, MapError, Result,
};

/// The container a surface draws into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountPoint {
    id: String,
    width: u32,
    height: u32,
}

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: 0,
            height: 0,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub struct MapView<S: RenderSurface> {
    surface: Option<S>,
    subscriptions: Vec<SubscriptionId>,
    boundaries: BoundaryFeatureCollection,
    overlay: MarkerOverlay,
    reconcile_options: ReconcileOptions,
    sink: Box<dyn DiagnosticSink>,
    /// Set by the first `StyleLoaded`; later ones are ignored
    style_applied: bool,
    last_report: Option<ReconcileReport>,
}

impl<S: RenderSurface> MapView<S> {
    /// Creates the surface and subscribes to load and click events.
    ///
    /// Fails with `MapError::Configuration` before touching the factory if
    /// there is no mount point or the config is invalid.
    pub fn mount<F>(
        mount_point: Option<&MountPoint>,
        factory: &F,
        config: MapViewConfig,
        boundaries: BoundaryFeatureCollection,
        sink: Box<dyn DiagnosticSink>,
    ) -> Result<Self>
    where
        F: SurfaceFactory<Surface = S>,
    {
        let Some(mount_point) = mount_point else {
            log::error!("Map container is null");
            return Err(MapError::Configuration("map container is missing".to_string()).into());
        };
        if let Err(e) = config.validate() {
            log::error!("invalid map configuration: {}", e);
            return Err(MapError::Configuration(e.to_string()).into());
        }

        let mut surface = factory.create(mount_point, SurfaceOptions::from(&config))?;
        let subscriptions = vec![
            surface.subscribe(EventKind::StyleLoaded),
            surface.subscribe(EventKind::Click),
        ];
        log::info!(
            "map mounted on '{}' at {} zoom {}",
            mount_point.id(),
            config.center,
            config.zoom
        );

        Ok(Self {
            surface: Some(surface),
            subscriptions,
            boundaries,
            overlay: MarkerOverlay::new(config.annotations),
            reconcile_options: config.reconcile,
            sink,
            style_applied: false,
            last_report: None,
        })
    }

    /// Drains the surface's event queue. Returns the number of events seen.
    ///
    /// A reconciliation error or a style load failure stops processing and
    /// is returned; neither is retried.
    pub fn process_events(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Some(event) = self.surface.as_mut().and_then(|s| s.poll_event()) {
            handled += 1;
            match event {
                SurfaceEvent::StyleLoaded => self.on_style_loaded()?,
                SurfaceEvent::Click { lat_lng } => self.on_click(lat_lng),
                SurfaceEvent::StyleLoadFailed { reason } => {
                    log::error!("style failed to load: {}", reason);
                    return Err(MapError::StyleLoadFailure(reason).into());
                }
            }
        }
        Ok(handled)
    }

    fn on_style_loaded(&mut self) -> Result<()> {
        if self.style_applied {
            log::debug!("ignoring repeated style load");
            return Ok(());
        }
        self.style_applied = true;

        let surface = self.surface.as_mut().ok_or(MapError::SurfaceReleased)?;
        let report = reconcile(surface, &self.boundaries, &self.reconcile_options)?;
        self.last_report = Some(report);
        self.overlay.attach(surface)?;
        Ok(())
    }

    fn on_click(&self, lat_lng: LatLng) {
        if let Err(e) = self.sink.record_click(lat_lng) {
            log::trace!("dropped click diagnostic: {}", e);
        }
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn is_style_applied(&self) -> bool {
        self.style_applied
    }

    /// Report of the reconciliation pass, once it has run successfully.
    pub fn last_report(&self) -> Option<&ReconcileReport> {
        self.last_report.as_ref()
    }

    pub fn overlay(&self) -> &MarkerOverlay {
        &self.overlay
    }

    /// Detaches the observers and releases the surface, handing it back.
    pub fn unmount(mut self) -> Option<S> {
        self.teardown()
    }

    fn teardown(&mut self) -> Option<S> {
        let mut surface = self.surface.take()?;
        for id in self.subscriptions.drain(..) {
            if !surface.unsubscribe(id) {
                log::debug!("subscription {:?} was already detached", id);
            }
        }
        surface.release();
        log::info!("map unmounted");
        Some(surface)
    }
}

impl<S: RenderSurface> Drop for MapView<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        input::sink::{ChannelSink, NullSink},
        rendering::headless::{HeadlessFactory, HeadlessSurface},
        style::document::{StyleDocument, StyleSource},
    };

    fn inline_config() -> MapViewConfig {
        MapViewConfig {
            style: StyleSource::Inline(Box::new(StyleDocument::new())),
            ..MapViewConfig::default()
        }
    }

    fn mount(factory: &HeadlessFactory) -> MapView<HeadlessSurface> {
        MapView::mount(
            Some(&MountPoint::new("map")),
            factory,
            inline_config(),
            BoundaryFeatureCollection::default(),
            Box::new(NullSink),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_mount_point() {
        let factory = HeadlessFactory::new();
        let result = MapView::mount(
            None,
            &factory,
            inline_config(),
            BoundaryFeatureCollection::default(),
            Box::new(NullSink),
        );

        let err = result.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<MapError>(),
            Some(MapError::Configuration(_))
        ));
        assert_eq!(factory.created_count(), 0);
    }

    #[test]
    fn test_mount_configures_surface() {
        let factory = HeadlessFactory::new();
        let view = mount(&factory);
        let surface = view.surface().unwrap();

        assert_eq!(factory.created_count(), 1);
        assert_eq!(surface.center(), LatLng::new(20.5937, 78.9629));
        assert_eq!(surface.zoom(), 5.0);
        assert_eq!(surface.active_subscriptions(), 2);
    }

    #[test]
    fn test_style_load_runs_once() {
        let factory = HeadlessFactory::new();
        let mut view = mount(&factory);

        view.surface_mut().unwrap().complete_style_load().unwrap();
        assert_eq!(view.process_events().unwrap(), 1);
        assert!(view.is_style_applied());
        let mutations = view.surface().unwrap().mutation_count();
        assert_eq!(view.surface().unwrap().markers().len(), 5);

        view.surface_mut().unwrap().complete_style_load().unwrap();
        view.process_events().unwrap();
        assert_eq!(view.surface().unwrap().mutation_count(), mutations);
        assert_eq!(view.surface().unwrap().markers().len(), 5);
    }

    #[test]
    fn test_clicks_reach_sink() {
        let factory = HeadlessFactory::new();
        let (sink, receiver) = ChannelSink::bounded(4);
        let mut view = MapView::mount(
            Some(&MountPoint::new("map")),
            &factory,
            inline_config(),
            BoundaryFeatureCollection::default(),
            Box::new(sink),
        )
        .unwrap();

        let point = LatLng::from_lng_lat(77.5946, 12.9716);
        assert!(view.surface_mut().unwrap().click(point));
        view.process_events().unwrap();
        assert_eq!(receiver.try_recv(), Ok(point));
    }

    #[test]
    fn test_unmount_without_style_load() {
        let factory = HeadlessFactory::new();
        let view = mount(&factory);

        let surface = view.unmount().unwrap();
        assert!(surface.is_released());
        assert_eq!(surface.subscriptions_at_release(), Some(0));
        assert_eq!(surface.active_subscriptions(), 0);
    }
}
