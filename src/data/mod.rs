pub mod annotations;
pub mod geojson;

pub use annotations::{load_annotations, load_annotations_from_path, Annotation, INDIA_CITIES};
pub use geojson::{BoundaryFeatureCollection, GeoJsonFeature, GeoJsonGeometry};
