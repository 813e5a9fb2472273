//! Country Picker - actor-based terminal country picker
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Lookup Layer (Tokio) - debounced country search

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use country_picker::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_FILE};
use country_picker::lookup::load_options;
use country_picker::messages::ui_events::{key_to_ui_event, InputMode, Panel};
use country_picker::ui::{added_items, diagram_canvas, panel_block, suggestion_items};
use country_picker::{
    AppActor, Config, LookupActor, LookupCommand, LookupResponse, RenderState,
    RestCountriesClient, UiEvent,
};

/// Search countries by name, with a node diagram of everything you add
#[derive(Parser, Debug)]
#[command(name = "country-picker", version, about)]
struct Args {
    /// Run a single lookup, print the suggestions and exit
    #[arg(short, long, value_name = "QUERY")]
    search: Option<String>,

    /// Config file (default: ~/.country-picker/config.yaml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref());

    // Initialize logging to file; the terminal belongs to the UI
    let log_path = Path::new(&config.log_file);
    let log_dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let log_name = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.into());
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(version = APP_VERSION, config = ?config, "Starting {}", APP_NAME);

    let client = RestCountriesClient::new(&config.lookup);

    if let Some(query) = args.search {
        for option in load_options(&client, &query).await {
            println!("{} {} ({})", option.flag, option.label, option.value);
        }
        return Ok(());
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (lookup_cmd_tx, lookup_cmd_rx) = mpsc::unbounded_channel::<LookupCommand>();
    let (lookup_resp_tx, lookup_resp_rx) = mpsc::unbounded_channel::<LookupResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn lookup actor
    let lookup_actor = LookupActor::new(Arc::new(client), config.lookup.debounce(), lookup_resp_tx);
    tokio::spawn(lookup_actor.run(lookup_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(lookup_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, lookup_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Search box
            Constraint::Length(10), // Suggestions + added list
            Constraint::Min(6),     // Diagram
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_search_bar(f, state, rows[0]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    draw_suggestions(f, state, lists[0]);
    draw_added(f, state, lists[1]);

    draw_diagram(f, state, rows[2]);
    draw_status_bar(f, state, rows[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_search_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Search;
    let is_editing = state.input_mode == InputMode::Editing;

    let selection = match &state.selected_option {
        Some(option) => format!(" [{}] ", option.display()),
        None => String::new(),
    };
    let loading = if state.is_loading { " [...]" } else { "" };
    let block = panel_block(
        format!(" Search for a country...{}{} ", loading, selection),
        is_focused,
        is_editing,
    );

    let input = Paragraph::new(state.search_input.as_str()).block(block);
    f.render_widget(input, area);

    if is_focused && is_editing {
        let prefix_width = state.search_input[..state.cursor_position].chars().count() as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + prefix_width + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_suggestions(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Suggestions;
    let block = panel_block(
        format!(" Suggestions ({}) ", state.suggestions.len()),
        is_focused,
        false,
    );

    if state.suggestions.is_empty() {
        let hint = Paragraph::new(state.suggestion_hint.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(hint, area);
        return;
    }

    let list = List::new(suggestion_items(&state.suggestions, &state.selected_option))
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold());

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_suggestion));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_added(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Added;
    let block = panel_block(
        format!(" Added countries ({}) ", state.added.len()),
        is_focused,
        false,
    );

    let items = added_items(&state.added);
    let mut list_state = ListState::default().with_offset(state.added_scroll as usize);
    f.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

fn draw_diagram(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Diagram;
    let title = format!(
        " Diagram - {} nodes, {} edges{} ",
        state.nodes.len(),
        state.edges.len(),
        if state.connect_from.is_some() { " (connecting)" } else { "" }
    );
    let block = panel_block(title, is_focused, false);

    let canvas = diagram_canvas(
        &state.nodes,
        &state.edges,
        state.selected_node.as_deref(),
        state.connect_from.as_deref(),
        block,
    );
    f.render_widget(canvas, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hint = if state.input_mode == InputMode::Editing {
        " ESC/Enter:stop editing | ↑/↓:suggestions "
    } else {
        match state.active_panel {
            Panel::Diagram => " [/]:node | arrows:move | c:connect | d:delete | Tab:panel | q:quit ",
            _ => " /:search | Enter:select | a:add | x:clear | Tab:panel | ?:help | q:quit ",
        }
    };

    let text = match &state.status {
        Some(status) => format!(" {} |{}", status, hint),
        None => hint.to_string(),
    };

    let bar = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 COUNTRY PICKER - Keyboard Shortcuts

 SEARCH
   / or e             Edit the search box
   ↑ / ↓              Move through suggestions
   Enter              Select suggestion
   x                  Clear selection
   a                  Add selected country

 DIAGRAM
   [ / ]              Previous / next node
   arrows             Move node
   c                  Connect (source, then target)
   d                  Delete node

 GENERAL
   Tab / Shift+Tab    Switch panels
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
