//! Domain models for the drainage simulator

pub mod curve;
pub mod event;
pub mod network;
pub mod series;
pub mod storage;

// Re-exports
pub use curve::{CurveError, VolumeCurve};
pub use event::{Event, EventLog};
pub use network::{DrainageModel, ModelError};
pub use series::OutfallSeries;
pub use storage::{StorageGeometry, StorageNode, StorageSpec};
