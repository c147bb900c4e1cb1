use crate::{
    core::{config::MapViewConfig, geo::LatLng, view::MountPoint},
    input::events::{EventKind, SubscriptionId, SurfaceEvent},
    layers::marker::Marker,
    style::document::StyleSource,
    traits::StyleApi,
    Result,
};

/// Construction options handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    pub style: StyleSource,
    pub center: LatLng,
    pub zoom: f64,
}

impl From<&MapViewConfig> for SurfaceOptions {
    fn from(config: &MapViewConfig) -> Self {
        Self {
            style: config.style.clone(),
            center: config.center,
            zoom: config.zoom,
        }
    }
}

/// A live map-rendering engine instance.
///
/// The engine owns its style document; every change goes through the
/// [`StyleApi`] calls. Events are queued by the engine and pulled by the
/// owner with [`RenderSurface::poll_event`], so no callback runs while the
/// surface is borrowed.
pub trait RenderSurface: StyleApi {
    fn add_marker(&mut self, marker: Marker) -> Result<()>;

    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId;

    /// Returns false if the subscription was not active.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    fn poll_event(&mut self) -> Option<SurfaceEvent>;

    /// Frees the engine. Later calls are no-ops.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

/// Creates engine instances attached to a mount point.
pub trait SurfaceFactory {
    type Surface: RenderSurface;

    fn create(&self, mount_point: &MountPoint, options: SurfaceOptions) -> Result<Self::Surface>;
}
