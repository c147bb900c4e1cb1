pub mod headless;
pub mod surface;

// Re-export main types
pub use headless::{HeadlessFactory, HeadlessSurface, StyleResolver};
pub use surface::{RenderSurface, SurfaceFactory, SurfaceOptions};
