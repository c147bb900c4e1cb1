use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::geo::LatLng;

/// Event kinds an observer can subscribe to on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// The style finished loading and can be mutated
    StyleLoaded,
    /// Pointer click on the map
    Click,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::StyleLoaded => "load",
            EventKind::Click => "click",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by a subscription, used to detach it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Events emitted by a render surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    StyleLoaded,
    /// The engine could not load its style. Delivered on the engine's own
    /// error channel, regardless of subscriptions.
    StyleLoadFailed { reason: String },
    Click { lat_lng: LatLng },
}

impl SurfaceEvent {
    /// The subscription kind gating this event, if any
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            SurfaceEvent::StyleLoaded => Some(EventKind::StyleLoaded),
            SurfaceEvent::Click { .. } => Some(EventKind::Click),
            SurfaceEvent::StyleLoadFailed { .. } => None,
        }
    }
}
