use serde::{Deserialize, Serialize};

use crate::{
    core::{
        constants::{MARKER_COLOR, MARKER_SCALE},
        geo::LatLng,
    },
    ui::popup::Popup,
};

/// Visual style shared by every marker of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: String,
    pub scale: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: MARKER_COLOR.to_string(),
            scale: MARKER_SCALE,
        }
    }
}

/// A point annotation drawn above the style layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: String,
    position: LatLng,
    style: MarkerStyle,
    popup: Option<Popup>,
}

impl Marker {
    pub fn new(id: String, position: LatLng) -> Self {
        Self {
            id,
            position,
            style: MarkerStyle::default(),
            popup: None,
        }
    }

    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn set_position(&mut self, position: LatLng) {
        self.position = position;
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Shows or hides the popup, as a click on the marker does.
    pub fn toggle_popup(&mut self) {
        if let Some(popup) = self.popup.as_mut() {
            popup.toggle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::popup::Hyperlink;

    #[test]
    fn test_marker_defaults() {
        let marker = Marker::new("m".to_string(), LatLng::from_lng_lat(80.2707, 13.0827));
        assert_eq!(marker.style().color, "rgba(255, 165, 0, 0.8)");
        assert_eq!(marker.style().scale, 0.5);
        assert!(marker.popup().is_none());
    }

    #[test]
    fn test_toggle_popup() {
        let mut marker = Marker::new("m".to_string(), LatLng::default())
            .with_popup(Popup::new(Hyperlink::new_tab("https://example.org", "x")));
        marker.toggle_popup();
        assert!(marker.popup().unwrap().visible);
    }
}
