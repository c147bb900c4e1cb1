//! Diagnostic sinks for pointer clicks.
//!
//! Recording is best-effort: callers ignore the returned error, and no
//! sink may block the thread that owns the surface.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::sync::Arc;

use crate::core::geo::LatLng;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("diagnostic channel is full")]
    Full,
    #[error("diagnostic channel is disconnected")]
    Disconnected,
}

pub trait DiagnosticSink: Send + Sync {
    fn record_click(&self, lat_lng: LatLng) -> Result<(), SinkError>;
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn record_click(&self, lat_lng: LatLng) -> Result<(), SinkError> {
        (**self).record_click(lat_lng)
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Box<T> {
    fn record_click(&self, lat_lng: LatLng) -> Result<(), SinkError> {
        (**self).record_click(lat_lng)
    }
}

/// Writes clicks to the log at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record_click(&self, lat_lng: LatLng) -> Result<(), SinkError> {
        log::info!("Map clicked at {}", lat_lng);
        Ok(())
    }
}

/// Discards clicks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record_click(&self, _lat_lng: LatLng) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Forwards clicks over a bounded channel without blocking.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<LatLng>,
}

impl ChannelSink {
    pub fn new(sender: Sender<LatLng>) -> Self {
        Self { sender }
    }

    /// A sink and the receiving end of a channel holding `capacity` clicks.
    pub fn bounded(capacity: usize) -> (Self, Receiver<LatLng>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl DiagnosticSink for ChannelSink {
    fn record_click(&self, lat_lng: LatLng) -> Result<(), SinkError> {
        self.sender.try_send(lat_lng).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Disconnected(_) => SinkError::Disconnected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink() {
        let (sink, receiver) = ChannelSink::bounded(1);
        let point = LatLng::from_lng_lat(77.2090, 28.6139);

        assert_eq!(sink.record_click(point), Ok(()));
        assert_eq!(sink.record_click(point), Err(SinkError::Full));
        assert_eq!(receiver.try_recv(), Ok(point));

        drop(receiver);
        assert_eq!(sink.record_click(point), Err(SinkError::Disconnected));
    }

    #[test]
    fn test_shared_sink() {
        let sink: Arc<dyn DiagnosticSink> = Arc::new(NullSink);
        assert!(sink.record_click(LatLng::default()).is_ok());
        assert!(LogSink.record_click(LatLng::default()).is_ok());
    }
}
