//! Node/edge diagram - every added country becomes a node
//!
//! Plain data plus a handful of edit operations. Rendering lives in the UI
//! layer; this module only appends, moves, connects and removes.

use crate::constants::{INITIAL_NODE_POSITION, NEW_NODE_POSITION};
use crate::models::CountryOption;

/// Position in diagram units (origin top-left, y grows downwards)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub position: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    next_node: u64,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// A diagram seeded with the Germany node
    pub fn new() -> Self {
        let mut diagram = Self::empty();
        let germany = CountryOption::new("Germany", "🇩🇪");
        diagram.push_node(&germany, INITIAL_NODE_POSITION);
        diagram
    }

    pub fn empty() -> Self {
        Diagram {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_node: 1,
        }
    }

    /// Add a node for a country at the default drop position, returns its id
    pub fn add_country(&mut self, option: &CountryOption) -> String {
        self.push_node(option, NEW_NODE_POSITION)
    }

    fn push_node(&mut self, option: &CountryOption, position: Position) -> String {
        let id = format!("{}_{}", option.value, self.next_node);
        self.next_node += 1;
        self.nodes.push(Node {
            id: id.clone(),
            label: option.display(),
            position,
        });
        id
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Move a node by a delta; returns false for an unknown id
    pub fn move_node(&mut self, id: &str, dx: f64, dy: f64) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position.x = (node.position.x + dx).max(0.0);
                node.position.y = (node.position.y + dy).max(0.0);
                true
            }
            None => false,
        }
    }

    /// Connect two nodes. Self-loops, unknown nodes and duplicates are ignored.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<&Edge> {
        if source == target || self.node(source).is_none() || self.node(target).is_none() {
            return None;
        }
        if self.edges.iter().any(|e| e.source == source && e.target == target) {
            return None;
        }
        self.edges.push(Edge {
            id: format!("edge-{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
        });
        self.edges.last()
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.edges.retain(|e| e.source != id && e.target != id);
        Some(self.nodes.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn france() -> CountryOption {
        CountryOption::new("France", "🇫🇷")
    }

    #[test]
    fn test_new_diagram_has_germany() {
        let diagram = Diagram::new();
        assert_eq!(diagram.nodes.len(), 1);
        assert_eq!(diagram.nodes[0].label, "🇩🇪 Germany");
        assert_eq!(diagram.nodes[0].position, INITIAL_NODE_POSITION);
        assert!(diagram.edges.is_empty());
    }

    #[test]
    fn test_same_country_twice_gets_distinct_nodes() {
        let mut diagram = Diagram::empty();
        let a = diagram.add_country(&france());
        let b = diagram.add_country(&france());

        assert_ne!(a, b);
        assert!(a.starts_with("france_"));
        assert_eq!(diagram.node(&b).unwrap().position, NEW_NODE_POSITION);
    }

    #[test]
    fn test_connect_rejects_loops_and_duplicates() {
        let mut diagram = Diagram::new();
        let germany = diagram.nodes[0].id.clone();
        let france = diagram.add_country(&france());

        assert!(diagram.connect(&germany, &france).is_some());
        assert!(diagram.connect(&germany, &france).is_none());
        assert!(diagram.connect(&france, &france).is_none());
        assert!(diagram.connect(&france, "nowhere_9").is_none());
        // Reverse direction is a different edge
        assert!(diagram.connect(&france, &germany).is_some());
        assert_eq!(diagram.edges.len(), 2);
    }

    #[test]
    fn test_remove_node_drops_its_edges() {
        let mut diagram = Diagram::new();
        let germany = diagram.nodes[0].id.clone();
        let france = diagram.add_country(&france());
        let spain = diagram.add_country(&CountryOption::new("Spain", "🇪🇸"));
        diagram.connect(&germany, &france);
        diagram.connect(&spain, &germany);
        diagram.connect(&france, &spain);

        let removed = diagram.remove_node(&germany).unwrap();
        assert_eq!(removed.label, "🇩🇪 Germany");
        assert_eq!(diagram.edges.len(), 1);
        assert_eq!(diagram.edges[0].source, france);
    }

    #[test]
    fn test_move_node_clamps_at_origin() {
        let mut diagram = Diagram::new();
        let id = diagram.nodes[0].id.clone();

        assert!(diagram.move_node(&id, -1000.0, 10.0));
        assert_eq!(diagram.node(&id).unwrap().position, Position::new(0.0, 15.0));
        assert!(!diagram.move_node("missing", 1.0, 1.0));
    }
}
