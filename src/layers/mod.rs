pub mod base;
pub mod marker;
pub mod overlay;

pub use base::{LayerDescriptor, LayerKind, Visibility};
pub use marker::{Marker, MarkerStyle};
pub use overlay::MarkerOverlay;
