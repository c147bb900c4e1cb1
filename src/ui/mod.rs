pub mod popup;

pub use popup::{Hyperlink, LinkTarget, Popup};
