//! Interaction tool modes

use serde::{Deserialize, Serialize};

/// The active interaction tool, supplied by the embedding UI
///
/// A closed enum so every gesture dispatch site matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Place new objects on pointer-down
    Draw,
    /// Click/marquee selection and object dragging
    #[default]
    Select,
    /// Drag the viewport itself
    Pan,
}

impl ToolMode {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolMode::Draw => "Draw",
            ToolMode::Select => "Select",
            ToolMode::Pan => "Pan",
        }
    }

    /// Returns all tool variants for UI enumeration
    pub fn all() -> &'static [ToolMode] {
        &[ToolMode::Draw, ToolMode::Select, ToolMode::Pan]
    }
}
