pub mod events;
pub mod handler;
pub mod sink;

// Re-export the essential types
pub use events::{EventKind, SubscriptionId, SurfaceEvent};
pub use handler::EventManager;
pub use sink::{ChannelSink, DiagnosticSink, LogSink, NullSink, SinkError};
