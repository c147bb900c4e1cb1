pub mod document;
pub mod expression;
pub mod reconcile;

pub use document::{SourceDefinition, StyleDocument, StyleSource};
pub use expression::Expression;
pub use reconcile::{reconcile, BackgroundChange, ReconcileReport};
