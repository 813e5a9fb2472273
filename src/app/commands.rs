//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::constants::NODE_MOVE_STEP;
use crate::messages::ui_events::{InputMode, MoveDirection, Panel};
use crate::messages::{LookupCommand, LookupResponse};
use crate::models::AddedCountry;

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    pub fn scroll_up(&mut self) {
        self.added_scroll = self.added_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = self.added.len().saturating_sub(1) as u16;
        self.added_scroll = self.added_scroll.saturating_add(1).min(max);
    }

    // ========================
    // Search input editing
    // ========================

    pub fn start_editing(&mut self) {
        self.active_panel = Panel::Search;
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.search_input.len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
        if !self.suggestions.is_empty() {
            self.active_panel = Panel::Suggestions;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position = self.search_input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.search_input.len() {
            self.cursor_position = self.search_input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(self.search_input.len());
        }
    }

    /// Insert at the cursor; returns the search to send, if any
    pub fn enter_char(&mut self, c: char) -> Option<LookupCommand> {
        if self.cursor_position > self.search_input.len() {
            return None;
        }
        self.search_input.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
        self.query_changed()
    }

    /// Delete before the cursor; returns the search to send, if any
    pub fn delete_char(&mut self) -> Option<LookupCommand> {
        if self.cursor_position == 0 {
            return None;
        }
        let prev_pos = self.search_input[..self.cursor_position]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.search_input.remove(prev_pos);
        self.cursor_position = prev_pos;
        self.query_changed()
    }

    /// Blank input never reaches the lookup: suggestions are cleared and any
    /// search still in flight is made stale.
    fn query_changed(&mut self) -> Option<LookupCommand> {
        let query = self.search_input.trim();
        if query.is_empty() {
            self.suggestions.clear();
            self.selected_suggestion = 0;
            self.last_query = None;
            self.pending_search_id = None;
            self.is_loading = false;
            return None;
        }

        let query = query.to_string();
        let id = self.next_id();
        self.pending_search_id = Some(id);
        self.is_loading = true;
        Some(LookupCommand::Search { id, query })
    }

    // ========================
    // Lookup responses
    // ========================

    pub fn handle_response(&mut self, response: LookupResponse) {
        if self.pending_search_id != Some(response.id()) {
            tracing::trace!(id = response.id(), "Ignoring stale search response");
            return;
        }
        self.pending_search_id = None;
        self.is_loading = false;
        self.selected_suggestion = 0;

        match response {
            LookupResponse::Suggestions { query, options, .. } => {
                self.suggestions = options;
                self.last_query = Some(query);
                self.status = None;
            }
            LookupResponse::Failed { query, message, .. } => {
                self.suggestions.clear();
                self.last_query = Some(query);
                self.status = Some(format!("Lookup failed: {}", message));
            }
        }
    }

    // ========================
    // Suggestions and selection
    // ========================

    pub fn next_suggestion(&mut self) {
        if !self.suggestions.is_empty() {
            self.selected_suggestion = (self.selected_suggestion + 1) % self.suggestions.len();
        }
    }

    pub fn prev_suggestion(&mut self) {
        if !self.suggestions.is_empty() {
            self.selected_suggestion = self
                .selected_suggestion
                .checked_sub(1)
                .unwrap_or(self.suggestions.len() - 1);
        }
    }

    pub fn select_suggestion(&mut self) {
        if let Some(option) = self.suggestions.get(self.selected_suggestion) {
            self.status = Some(format!("Selected {} - press 'a' to add", option.display()));
            self.selected_option = Some(option.clone());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_option = None;
    }

    /// Append the selected country to the list and the diagram.
    /// Returns false when nothing is selected.
    pub fn add_country(&mut self) -> bool {
        let Some(option) = self.selected_option.clone() else {
            self.status = Some(String::from("Select a country first"));
            return false;
        };

        let node_id = self.diagram.add_country(&option);
        tracing::info!(country = %option.value, node = %node_id, "Country added");
        self.status = Some(format!("Added {}", option.display()));
        self.added.push(AddedCountry::new(option));
        self.selected_node = self.diagram.nodes.len() - 1;
        true
    }

    // ========================
    // Diagram
    // ========================

    pub fn next_node(&mut self) {
        if !self.diagram.nodes.is_empty() {
            self.selected_node = (self.selected_node + 1) % self.diagram.nodes.len();
        }
    }

    pub fn prev_node(&mut self) {
        if !self.diagram.nodes.is_empty() {
            self.selected_node = self
                .selected_node
                .checked_sub(1)
                .unwrap_or(self.diagram.nodes.len() - 1);
        }
    }

    pub fn move_node(&mut self, direction: MoveDirection) {
        let (dx, dy) = direction.delta();
        if let Some(id) = self.selected_node_id().map(str::to_string) {
            self.diagram.move_node(&id, dx * NODE_MOVE_STEP, dy * NODE_MOVE_STEP);
        }
    }

    /// First press picks the source, second press picks the target
    pub fn connect_node(&mut self) {
        let Some(current) = self.selected_node_id().map(str::to_string) else {
            return;
        };

        match self.connect_from.take() {
            None => {
                self.status = Some(format!("Connecting from {} - select target, press 'c'", current));
                self.connect_from = Some(current);
            }
            Some(source) => {
                self.status = match self.diagram.connect(&source, &current) {
                    Some(edge) => Some(format!("Connected {} -> {}", edge.source, edge.target)),
                    None => Some(String::from("Connection ignored")),
                };
            }
        }
    }

    pub fn delete_node(&mut self) {
        let Some(id) = self.selected_node_id().map(str::to_string) else {
            return;
        };
        if let Some(node) = self.diagram.remove_node(&id) {
            self.status = Some(format!("Removed {}", node.label));
        }
        if self.connect_from.as_deref() == Some(id.as_str()) {
            self.connect_from = None;
        }
        if self.selected_node >= self.diagram.nodes.len() {
            self.selected_node = self.diagram.nodes.len().saturating_sub(1);
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}
