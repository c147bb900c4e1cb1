use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::core::constants::POPUP_OFFSET;

/// Browsing context a link opens in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// A new tab or window
    #[default]
    Blank,
    /// The current page
    Current,
}

impl LinkTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkTarget::Blank => "_blank",
            LinkTarget::Current => "_self",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub href: String,
    pub target: LinkTarget,
    pub text: String,
}

impl Hyperlink {
    /// A link that opens `href` in a new browsing context.
    pub fn new_tab(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            target: LinkTarget::Blank,
            text: text.into(),
        }
    }

    /// Renders the anchor element. Text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(self.href.len() + self.text.len() + 32);
        let _ = write!(
            html,
            r#"<a href="{}" target="{}">{}</a>"#,
            escape_html(&self.href),
            self.target.as_str(),
            escape_html(&self.text)
        );
        html
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Popup attached to a marker; hidden until the marker is activated.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub offset: f64,
    pub content: Hyperlink,
    pub visible: bool,
}

impl Popup {
    pub fn new(content: Hyperlink) -> Self {
        Self {
            offset: POPUP_OFFSET,
            content,
            visible: false,
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn html(&self) -> String {
        self.content.to_html()
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}
