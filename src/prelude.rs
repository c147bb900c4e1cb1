//! Prelude module for common indiamap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use indiamap::prelude::*;`

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
    events::{EventKind, SubscriptionId, SurfaceEvent},
    sink::{ChannelSink, DiagnosticSink, LogSink, NullSink},
};

pub use crate::rendering::{
    headless::{HeadlessFactory, HeadlessSurface},
    surface::{RenderSurface, SurfaceFactory, SurfaceOptions},
};

pub use crate::traits::StyleApi;

pub use crate::{Error as MapError, Result};

pub use std::collections::VecDeque;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
