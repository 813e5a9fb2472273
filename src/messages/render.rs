//! Render state - data structure sent from App layer to UI for rendering

use crate::app::AppState;
use crate::diagram::{Edge, Node};
use crate::messages::ui_events::{InputMode, Panel};
use crate::models::{AddedCountry, CountryOption};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,

    // Search box
    pub search_input: String,
    pub cursor_position: usize,
    pub is_loading: bool,

    // Suggestions
    pub suggestions: Vec<CountryOption>,
    pub selected_suggestion: usize,
    /// Shown in place of an empty suggestion list
    pub suggestion_hint: String,
    pub selected_option: Option<CountryOption>,

    // Added countries
    pub added: Vec<AddedCountry>,
    pub added_scroll: u16,

    // Diagram
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub selected_node: Option<String>,
    pub connect_from: Option<String>,

    // Status line and popups
    pub status: Option<String>,
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        AppState::new().to_render_state()
    }
}
