//! Node, sample and link-event types.

pub mod types;

pub use types::*;
