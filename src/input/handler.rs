use crate::{
    input::events::{EventKind, SubscriptionId, SurfaceEvent},
    prelude::{HashMap, VecDeque},
};

/// Subscription registry and event queue for a surface.
///
/// Events whose kind has no active subscription are dropped on emit, so
/// nothing is queued for observers that were never attached or have been
/// detached.
#[derive(Debug, Default)]
pub struct EventManager {
    /// Active subscriptions by handle
    subscriptions: HashMap<SubscriptionId, EventKind>,
    /// Event queue for processing
    event_queue: VecDeque<SurfaceEvent>,
    next_id: u64,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in an event kind
    pub fn subscribe(&mut self, kind: EventKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(id, kind);
        id
    }

    /// Detach a subscription. Returns false if it was not active.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.remove(&id).is_some();
        if removed {
            let remaining: Vec<EventKind> = self.subscriptions.values().copied().collect();
            self.event_queue
                .retain(|event| event.kind().map_or(true, |kind| remaining.contains(&kind)));
        }
        removed
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions.values().any(|k| *k == kind)
    }

    /// Queue an event. Returns whether it was queued.
    pub fn emit(&mut self, event: SurfaceEvent) -> bool {
        let wanted = event.kind().map_or(true, |kind| self.is_subscribed(kind));
        if wanted {
            self.event_queue.push_back(event);
        }
        wanted
    }

    /// Take the next queued event
    pub fn poll(&mut self) -> Option<SurfaceEvent> {
        self.event_queue.pop_front()
    }

    /// Detach everything and drop pending events
    pub fn clear(&mut self) {
        self.subscriptions.clear();
        self.event_queue.clear();
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn click() -> SurfaceEvent {
        SurfaceEvent::Click {
            lat_lng: LatLng::new(20.0, 78.0),
        }
    }

    #[test]
    fn test_events_without_subscribers_are_dropped() {
        let mut events = EventManager::new();
        assert!(!events.emit(click()));
        assert_eq!(events.pending_events(), 0);

        let id = events.subscribe(EventKind::Click);
        assert!(events.emit(click()));
        assert_eq!(events.poll(), Some(click()));

        assert!(events.unsubscribe(id));
        assert!(!events.unsubscribe(id));
        assert!(!events.emit(click()));
    }

    #[test]
    fn test_unsubscribe_drops_pending_events() {
        let mut events = EventManager::new();
        let load = events.subscribe(EventKind::StyleLoaded);
        let clicks = events.subscribe(EventKind::Click);
        events.emit(SurfaceEvent::StyleLoaded);
        events.emit(click());

        events.unsubscribe(clicks);
        assert_eq!(events.pending_events(), 1);
        assert_eq!(events.poll(), Some(SurfaceEvent::StyleLoaded));

        events.unsubscribe(load);
        assert_eq!(events.active_subscriptions(), 0);
    }

    #[test]
    fn test_errors_are_always_queued() {
        let mut events = EventManager::new();
        assert!(events.emit(SurfaceEvent::StyleLoadFailed {
            reason: "missing".to_string()
        }));
        assert_eq!(events.pending_events(), 1);
    }
}
