//! Component-wide constants: layer and source ids, colours and the initial
//! view. Keeping them in a single place makes the overlay easy to retheme.

/// Initial view center longitude (geographic center of India).
pub const INDIA_CENTER_LNG: f64 = 78.9629;

/// Initial view center latitude.
pub const INDIA_CENTER_LAT: f64 = 20.5937;

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 5.0;

/// Style reference used when none is configured.
pub const DEFAULT_STYLE_URL: &str = "/style.json";

/// Id of the GeoJSON source holding the state boundaries.
pub const INDIA_SOURCE_ID: &str = "india";

/// Id of the filled state-boundary layer.
pub const INDIA_LAYER_ID: &str = "india-layer";

/// Id of the state border line layer.
pub const STATE_BORDERS_LAYER_ID: &str = "state-borders";

/// Id of the optional country mask layer.
pub const MASK_LAYER_ID: &str = "mask-layer";

/// Id given to a background layer appended during reconciliation.
pub const BACKGROUND_LAYER_ID: &str = "background";

/// Feature property carrying the ISO 3166-1 alpha-3 country code.
pub const ISO_ALPHA3_PROPERTY: &str = "iso_3166_1_alpha_3";

/// Country code left unmasked by the mask layer.
pub const INDIA_ISO_ALPHA3: &str = "IND";

pub const INDIA_FILL_COLOR: &str = "#FFA500";
pub const INDIA_FILL_OPACITY: f64 = 0.8;
pub const BORDER_LINE_COLOR: &str = "#000000";
pub const BORDER_LINE_WIDTH: f64 = 1.0;
pub const MASK_FILL_COLOR: &str = "rgba(128,128,128,0.5)";
pub const BACKGROUND_COLOR: &str = "#FFFFFF";

/// Marker fill: orange at 80% opacity.
pub const MARKER_COLOR: &str = "rgba(255, 165, 0, 0.8)";

/// Markers are drawn at half the engine's default size.
pub const MARKER_SCALE: f64 = 0.5;

/// Vertical distance between a marker and its popup, in pixels.
pub const POPUP_OFFSET: f64 = 25.0;
