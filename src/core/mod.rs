pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod view;

pub use builder::MapViewBuilder;
pub use config::{MapViewConfig, ReconcileOptions};
pub use geo::LatLng;
pub use view::{MapView, MountPoint};
