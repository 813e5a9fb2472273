//! App actor - message loop processing UI events and lookup responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{LookupCommand, LookupResponse, RenderState, UiEvent};

/// App actor that processes UI events and lookup responses
pub struct AppActor {
    state: AppState,
    lookup_tx: mpsc::UnboundedSender<LookupCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        lookup_tx: mpsc::UnboundedSender<LookupCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(),
            lookup_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut lookup_rx: mpsc::UnboundedReceiver<LookupResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.lookup_tx.send(LookupCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = lookup_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send_lookup(&self, command: Option<LookupCommand>) {
        if let Some(cmd) = command {
            let _ = self.lookup_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Search input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => {
                let cmd = self.state.enter_char(c);
                self.send_lookup(cmd);
            }
            UiEvent::Backspace => {
                let cmd = self.state.delete_char();
                self.send_lookup(cmd);
            }
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Suggestions and selection
            UiEvent::NextSuggestion => self.state.next_suggestion(),
            UiEvent::PrevSuggestion => self.state.prev_suggestion(),
            UiEvent::SelectSuggestion => self.state.select_suggestion(),
            UiEvent::ClearSelection => self.state.clear_selection(),
            UiEvent::AddCountry => {
                self.state.add_country();
            }

            // Diagram
            UiEvent::NextNode => self.state.next_node(),
            UiEvent::PrevNode => self.state.prev_node(),
            UiEvent::MoveNode(direction) => self.state.move_node(direction),
            UiEvent::ConnectNode => self.state.connect_node(),
            UiEvent::DeleteNode => self.state.delete_node(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
