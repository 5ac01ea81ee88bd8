//! Interactive view state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::NodeId;

/// Camera mode of the 3D scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViewMode {
    /// Free-roam view framing every entity
    #[default]
    Overview,
    /// Camera follows the selected node
    Follow,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Overview => write!(f, "OVERVIEW"),
            ViewMode::Follow => write!(f, "FOLLOW"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OVERVIEW" => Ok(ViewMode::Overview),
            "FOLLOW" => Ok(ViewMode::Follow),
            other => Err(format!("Unknown view mode: {}", other)),
        }
    }
}

/// User-controlled view settings, changed only by control handlers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub show_topology: bool,
    pub show_analytics: bool,
    pub current_target: Option<NodeId>,
    pub view_mode: ViewMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            show_topology: true,
            show_analytics: false,
            current_target: None,
            view_mode: ViewMode::Overview,
        }
    }
}

impl ViewState {
    pub fn is_target(&self, id: &str) -> bool {
        self.current_target.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ViewState::default();
        assert!(state.show_topology);
        assert!(!state.show_analytics);
        assert_eq!(state.current_target, None);
        assert_eq!(state.view_mode, ViewMode::Overview);
        assert!(!state.is_target("GS_01"));
    }

    #[test]
    fn test_view_mode_parsing() {
        assert_eq!("follow".parse::<ViewMode>(), Ok(ViewMode::Follow));
        assert_eq!(" OVERVIEW ".parse::<ViewMode>(), Ok(ViewMode::Overview));
        assert!("orbit".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::Follow.to_string(), "FOLLOW");
    }
}
