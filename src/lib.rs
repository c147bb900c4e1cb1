//! # indiamap
//!
//! An interactive map of India built on top of an external map-rendering
//! engine: a highlighted state-boundary overlay, an optional country mask,
//! and city markers whose popups link to external pages.
//!
//! The engine itself is abstracted behind [`RenderSurface`]. The crate owns
//! the surface lifecycle ([`MapView`]), the style reconciliation pass that
//! converges an arbitrary base style to the India overlay, and the marker
//! overlay. [`HeadlessSurface`] is an in-memory engine for driving all of it
//! without a GPU or browser.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod style;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapViewBuilder,
    config::{MapViewConfig, ReconcileOptions},
    geo::LatLng,
    view::{MapView, MountPoint},
};

pub use crate::layers::{
    base::{LayerDescriptor, LayerKind, Visibility},
    marker::{Marker, MarkerStyle},
    overlay::MarkerOverlay,
};

pub use crate::style::{
    document::{SourceDefinition, StyleDocument, StyleSource},
    expression::Expression,
    reconcile::{reconcile, ReconcileReport},
};

pub use crate::data::{
    annotations::{Annotation, INDIA_CITIES},
    geojson::{BoundaryFeatureCollection, GeoJsonFeature, GeoJsonGeometry},
};

pub use crate::input::{
    events::{EventKind, SurfaceEvent},
    sink::{ChannelSink, DiagnosticSink, LogSink, NullSink, SinkError},
};

pub use crate::rendering::{
    headless::{HeadlessFactory, HeadlessSurface},
    surface::{RenderSurface, SurfaceFactory, SurfaceOptions},
};

pub use crate::traits::StyleApi;

pub use crate::ui::popup::{Hyperlink, LinkTarget, Popup};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Source conflict: source '{id}' already exists with incompatible data")]
    SourceConflict { id: String },

    #[error("Style load failure: {0}")]
    StyleLoadFailure(String),

    #[error("Style has not finished loading")]
    StyleNotLoaded,

    #[error("Render surface has been released")]
    SurfaceReleased,

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Initializes `env_logger` from `RUST_LOG`. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
