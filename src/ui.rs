use ratatui::{
    prelude::*,
    widgets::canvas::{self, Canvas, Context},
    widgets::*,
};

use crate::diagram::{Edge, Node};
use crate::models::{AddedCountry, CountryOption};

/// Smallest visible diagram area, in diagram units
const MIN_DIAGRAM_WIDTH: f64 = 600.0;
const MIN_DIAGRAM_HEIGHT: f64 = 300.0;

/// Border color for a panel: yellow while editing, cyan when focused
pub fn border_style(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

pub fn panel_block(title: String, is_focused: bool, is_editing: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, is_editing))
        .title(title)
}

/// Suggestion list rows, flag first
pub fn suggestion_items(options: &[CountryOption], selected: &Option<CountryOption>) -> Vec<ListItem<'static>> {
    options
        .iter()
        .map(|option| {
            let chosen = selected.as_ref().map(|s| s.value == option.value).unwrap_or(false);
            let marker = if chosen { "* " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::raw(format!("{} ", option.flag)),
                Span::styled(option.label.clone(), Style::default().bold()),
            ]))
        })
        .collect()
}

/// Rows of the added-countries list
pub fn added_items(added: &[AddedCountry]) -> Vec<ListItem<'static>> {
    added
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(entry.option.display()),
                Span::styled(
                    format!("  {}", entry.added_at.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect()
}

/// Diagram bounds: at least the minimum, grown to fit every node
fn diagram_bounds(nodes: &[Node]) -> (f64, f64) {
    nodes.iter().fold((MIN_DIAGRAM_WIDTH, MIN_DIAGRAM_HEIGHT), |(w, h), n| {
        (w.max(n.position.x + 200.0), h.max(n.position.y + 40.0))
    })
}

/// Nodes as labels, edges as lines. Diagram y grows downwards, canvas y up.
pub fn diagram_canvas<'a>(
    nodes: &'a [Node],
    edges: &'a [Edge],
    selected: Option<&'a str>,
    connect_from: Option<&'a str>,
    block: Block<'a>,
) -> Canvas<'a, impl Fn(&mut Context) + 'a> {
    let (width, height) = diagram_bounds(nodes);

    Canvas::default()
        .block(block)
        .marker(ratatui::symbols::Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            let flip = |y: f64| height - y;

            for edge in edges {
                let source = nodes.iter().find(|n| n.id == edge.source);
                let target = nodes.iter().find(|n| n.id == edge.target);
                if let (Some(s), Some(t)) = (source, target) {
                    ctx.draw(&canvas::Line {
                        x1: s.position.x,
                        y1: flip(s.position.y),
                        x2: t.position.x,
                        y2: flip(t.position.y),
                        color: Color::DarkGray,
                    });
                }
            }

            ctx.layer();

            for node in nodes {
                let style = if Some(node.id.as_str()) == connect_from {
                    Style::default().fg(Color::Magenta).bold()
                } else if Some(node.id.as_str()) == selected {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default().fg(Color::White)
                };
                ctx.print(
                    node.position.x,
                    flip(node.position.y),
                    Line::styled(format!("[{}]", node.label), style),
                );
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::Position;

    #[test]
    fn test_diagram_bounds_grow_with_nodes() {
        let nodes = vec![Node {
            id: "far_1".to_string(),
            label: "far".to_string(),
            position: Position::new(900.0, 700.0),
        }];
        assert_eq!(diagram_bounds(&nodes), (1100.0, 740.0));
        assert_eq!(diagram_bounds(&[]), (MIN_DIAGRAM_WIDTH, MIN_DIAGRAM_HEIGHT));
    }

    #[test]
    fn test_border_style_precedence() {
        assert_eq!(border_style(true, true), Style::default().fg(Color::Yellow));
        assert_eq!(border_style(false, true), Style::default());
    }
}
