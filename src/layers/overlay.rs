use crate::{
    core::constants::POPUP_OFFSET,
    data::annotations::Annotation,
    layers::marker::{Marker, MarkerStyle},
    rendering::surface::RenderSurface,
    ui::popup::{Hyperlink, Popup},
    Result,
};

/// Places one marker with a link popup per annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOverlay {
    annotations: Vec<Annotation>,
    style: MarkerStyle,
    popup_offset: f64,
}

impl MarkerOverlay {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations,
            style: MarkerStyle::default(),
            popup_offset: POPUP_OFFSET,
        }
    }

    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_popup_offset(mut self, offset: f64) -> Self {
        self.popup_offset = offset;
        self
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Markers in annotation order, ids numbered from zero.
    pub fn markers(&self) -> Vec<Marker> {
        self.annotations
            .iter()
            .enumerate()
            .map(|(index, annotation)| {
                let link = Hyperlink::new_tab(annotation.target_url(), annotation.label());
                Marker::new(format!("marker-{}", index), annotation.position())
                    .with_style(self.style.clone())
                    .with_popup(Popup::new(link).with_offset(self.popup_offset))
            })
            .collect()
    }

    /// Attaches every marker to `surface`, stopping at the first failure.
    /// Returns the number attached.
    pub fn attach<S>(&self, surface: &mut S) -> Result<usize>
    where
        S: RenderSurface + ?Sized,
    {
        let mut attached = 0;
        for marker in self.markers() {
            log::debug!("attaching marker '{}' at {}", marker.id(), marker.position());
            surface.add_marker(marker)?;
            attached += 1;
        }
        log::info!("attached {} marker(s)", attached);
        Ok(attached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::annotations::INDIA_CITIES;

    #[test]
    fn test_markers_follow_annotation_order() {
        let overlay = MarkerOverlay::new(INDIA_CITIES.clone());
        let markers = overlay.markers();

        assert_eq!(markers.len(), 5);
        for (marker, annotation) in markers.iter().zip(INDIA_CITIES.iter()) {
            assert_eq!(marker.position(), annotation.position());
            let popup = marker.popup().unwrap();
            assert_eq!(popup.offset, 25.0);
            assert_eq!(popup.content.text, annotation.label());
            assert_eq!(popup.content.href, annotation.target_url());
        }
        assert_eq!(markers[0].id(), "marker-0");
    }

    #[test]
    fn test_custom_style() {
        let style = MarkerStyle {
            color: "#00FF00".to_string(),
            scale: 1.0,
        };
        let overlay = MarkerOverlay::new(INDIA_CITIES.clone())
            .with_style(style.clone())
            .with_popup_offset(10.0);
        let marker = &overlay.markers()[2];
        assert_eq!(marker.style(), &style);
        assert_eq!(marker.popup().unwrap().offset, 10.0);
    }
}
