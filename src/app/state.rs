//! App state - pure data structure with no I/O logic

use crate::constants::HINT_TYPE_TO_SEARCH;
use crate::diagram::Diagram;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{AddedCountry, CountryOption};

/// Main application state - pure data, no I/O
pub struct AppState {
    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,

    // Search box
    pub search_input: String,
    pub cursor_position: usize,

    // Lookup bookkeeping
    pub is_loading: bool,
    pub next_search_id: u64,
    /// Only the response to this search is applied; older ones are stale
    pub pending_search_id: Option<u64>,
    /// The query the current suggestions were computed for
    pub last_query: Option<String>,

    // Suggestions and selection
    pub suggestions: Vec<CountryOption>,
    pub selected_suggestion: usize,
    pub selected_option: Option<CountryOption>,

    // Added countries
    pub added: Vec<AddedCountry>,
    pub added_scroll: u16,

    // Diagram
    pub diagram: Diagram,
    pub selected_node: usize,
    pub connect_from: Option<String>,

    // Status line and popups
    pub status: Option<String>,
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            active_panel: Panel::Search,
            input_mode: InputMode::Editing,
            search_input: String::new(),
            cursor_position: 0,
            is_loading: false,
            next_search_id: 1,
            pending_search_id: None,
            last_query: None,
            suggestions: Vec::new(),
            selected_suggestion: 0,
            selected_option: None,
            added: Vec::new(),
            added_scroll: 0,
            diagram: Diagram::new(),
            selected_node: 0,
            connect_from: None,
            status: None,
            show_help: false,
        }
    }

    /// Generate a unique search ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_search_id;
        self.next_search_id += 1;
        id
    }

    /// Id of the diagram node under the cursor
    pub fn selected_node_id(&self) -> Option<&str> {
        self.diagram
            .nodes
            .get(self.selected_node)
            .map(|n| n.id.as_str())
    }

    /// What to show when there are no suggestions
    pub fn suggestion_hint(&self) -> String {
        if self.search_input.trim().is_empty() {
            HINT_TYPE_TO_SEARCH.to_string()
        } else if self.is_loading {
            String::from("Searching...")
        } else {
            let query = self
                .last_query
                .as_deref()
                .unwrap_or_else(|| self.search_input.trim());
            format!("No countries found for \"{}\"", query)
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            search_input: self.search_input.clone(),
            cursor_position: self.cursor_position,
            is_loading: self.is_loading,
            suggestions: self.suggestions.clone(),
            selected_suggestion: self.selected_suggestion,
            suggestion_hint: self.suggestion_hint(),
            selected_option: self.selected_option.clone(),
            added: self.added.clone(),
            added_scroll: self.added_scroll,
            nodes: self.diagram.nodes.clone(),
            edges: self.diagram.edges.clone(),
            selected_node: self.selected_node_id().map(str::to_string),
            connect_from: self.connect_from.clone(),
            status: self.status.clone(),
            show_help: self.show_help,
        }
    }
}
