//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Direction for moving a diagram node
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    /// Unit delta in diagram coordinates (y grows downwards)
    pub fn delta(&self) -> (f64, f64) {
        match self {
            MoveDirection::Left => (-1.0, 0.0),
            MoveDirection::Right => (1.0, 0.0),
            MoveDirection::Up => (0.0, -1.0),
            MoveDirection::Down => (0.0, 1.0),
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    ScrollUp,
    ScrollDown,

    // Search input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Suggestions and selection
    NextSuggestion,
    PrevSuggestion,
    SelectSuggestion,
    ClearSelection,
    AddCountry,

    // Diagram
    NextNode,
    PrevNode,
    MoveNode(MoveDirection),
    ConnectNode,
    DeleteNode,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Panel {
    Search,
    Suggestions,
    Added,
    Diagram,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Search => Panel::Suggestions,
            Panel::Suggestions => Panel::Added,
            Panel::Added => Panel::Diagram,
            Panel::Diagram => Panel::Search,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Search => Panel::Diagram,
            Panel::Suggestions => Panel::Search,
            Panel::Added => Panel::Suggestions,
            Panel::Diagram => Panel::Added,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => handle_normal_keys(key, active_panel),
        InputMode::Editing => handle_editing_keys(key),
    }
}

fn handle_normal_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Tab => Some(UiEvent::NextPanel),
        KeyCode::BackTab => Some(UiEvent::PrevPanel),
        KeyCode::Char('/') => Some(UiEvent::StartEditing),
        KeyCode::Char('a') => Some(UiEvent::AddCountry),
        _ => match active_panel {
            Panel::Search => match key.code {
                KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
                KeyCode::Char('x') => Some(UiEvent::ClearSelection),
                KeyCode::Down => Some(UiEvent::NextSuggestion),
                KeyCode::Up => Some(UiEvent::PrevSuggestion),
                _ => None,
            },
            Panel::Suggestions => match key.code {
                KeyCode::Down => Some(UiEvent::NextSuggestion),
                KeyCode::Up => Some(UiEvent::PrevSuggestion),
                KeyCode::Enter => Some(UiEvent::SelectSuggestion),
                KeyCode::Char('x') => Some(UiEvent::ClearSelection),
                _ => None,
            },
            Panel::Added => match key.code {
                KeyCode::Down => Some(UiEvent::ScrollDown),
                KeyCode::Up => Some(UiEvent::ScrollUp),
                _ => None,
            },
            Panel::Diagram => match key.code {
                KeyCode::Char(']') | KeyCode::Char('n') => Some(UiEvent::NextNode),
                KeyCode::Char('[') | KeyCode::Char('p') => Some(UiEvent::PrevNode),
                KeyCode::Left => Some(UiEvent::MoveNode(MoveDirection::Left)),
                KeyCode::Right => Some(UiEvent::MoveNode(MoveDirection::Right)),
                KeyCode::Up => Some(UiEvent::MoveNode(MoveDirection::Up)),
                KeyCode::Down => Some(UiEvent::MoveNode(MoveDirection::Down)),
                KeyCode::Char('c') => Some(UiEvent::ConnectNode),
                KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteNode),
                _ => None,
            },
        },
    }
}

fn handle_editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Down => Some(UiEvent::NextSuggestion),
        KeyCode::Up => Some(UiEvent::PrevSuggestion),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}
