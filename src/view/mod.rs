//! View layer: the explicit context driven once per frame, its mutable
//! state and the 2D topology diff-updater.

pub mod context;
pub mod state;
pub mod topology;

pub use context::{FrameSummary, ViewContext};
pub use state::{ViewMode, ViewState};
pub use topology::{ActiveEdge, TopologyDiffer};
