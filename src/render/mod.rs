//! Rendering collaborators.
//!
//! The 3D scene and the 2D force-directed graph are external; they are
//! reached only through [`SceneRenderer`] and [`GraphRenderer`]. The
//! recording implementations back the headless replay and the tests.

pub mod recording;
pub mod types;

use crate::model::Coordinate;

pub use recording::{RecordingGraph, RecordingScene};
pub use types::*;

/// 3D globe scene: node entities, link polylines and the camera
pub trait SceneRenderer {
    /// Create a node entity (called once per node at load time)
    fn add_entity(&mut self, entity: &EntityDescriptor);

    /// Current interpolated position of a node, `None` to hide it
    fn update_node(&mut self, id: &str, position: Option<&Coordinate>);

    /// Current state of the polyline between a node pair
    fn update_link(&mut self, link: &LinkVisual);

    /// Follow a node from the given camera offset
    fn track(&mut self, id: &str, offset: Coordinate);

    /// Stop following any node
    fn untrack(&mut self);

    /// Frame every entity
    fn zoom_to_all(&mut self);
}

/// 2D topology graph with its own layout physics
pub trait GraphRenderer {
    /// Initial node placement before the first update
    fn seed(&mut self, nodes: &[GraphNodeSeed]);

    /// Replace the node and edge sets, keeping existing layout positions
    fn apply(&mut self, update: &TopologyUpdate);

    /// Drop everything shown
    fn clear(&mut self);
}
