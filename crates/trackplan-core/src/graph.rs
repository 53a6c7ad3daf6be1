//! Reference graph of parameters and events

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::parameter::Parameter;

/// Direction for edge queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
    #[default]
    Both,
}

/// Kind of definition a node carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Parameter,
    Event,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parameter => write!(f, "parameter"),
            Self::Event => write!(f, "event"),
        }
    }
}

/// A graph node, keyed by the name of the definition it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Parameter(Parameter),
    Event(Event),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Self::Parameter(p) => &p.name,
            Self::Event(e) => &e.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Parameter(_) => NodeKind::Parameter,
            Self::Event(_) => NodeKind::Event,
        }
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            Self::Parameter(p) => Some(p),
            Self::Event(_) => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            Self::Parameter(_) => None,
        }
    }
}

/// Directed edge from an event to a parameter it uses
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// An event reference to a name that is not a declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    pub event: String,
    pub parameter: String,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Event '{}' references undeclared parameter '{}'",
            self.event, self.parameter
        )
    }
}

/// Directed graph of definitions
///
/// Nodes keep insertion order (parameters, then events). Edges are ordered by
/// event, then by the event's declaration order. Names are unique per node
/// kind; whether a parameter and an event may share a name is decided by the
/// validator's namespace policy before the graph is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefinitionGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    parameter_index: HashMap<String, usize>,
    #[serde(skip)]
    event_index: HashMap<String, usize>,
}

impl DefinitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a validated aggregate
    ///
    /// Every name an event references must be a declared parameter. All
    /// offending references are collected into one
    /// [`Error::DanglingReferences`].
    pub fn build(aggregate: &Aggregate) -> Result<Self> {
        let mut graph = Self::new();

        for param in &aggregate.parameters {
            graph.add_node(Node::Parameter(param.clone()))?;
        }
        for event in &aggregate.events {
            graph.add_node(Node::Event(event.clone()))?;
        }

        let mut dangling = Vec::new();
        for event in &aggregate.events {
            for param in &event.parameters {
                match graph.add_edge(&event.name, param) {
                    Ok(()) => {}
                    Err(Error::NodeNotFound(_)) => dangling.push(DanglingReference {
                        event: event.name.clone(),
                        parameter: param.clone(),
                    }),
                    Err(e) => return Err(e),
                }
            }
        }

        if !dangling.is_empty() {
            tracing::debug!("Graph build found {} dangling reference(s)", dangling.len());
            return Err(Error::DanglingReferences(dangling));
        }

        tracing::debug!(
            "Built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Add a node, refusing a name already used by a node of the same kind
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        let name = node.name().to_string();
        let index = match node.kind() {
            NodeKind::Parameter => &mut self.parameter_index,
            NodeKind::Event => &mut self.event_index,
        };
        if index.contains_key(&name) {
            return Err(Error::DuplicateNode(name));
        }
        index.insert(name, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Add an edge from an event to a parameter; both must already be nodes
    pub fn add_edge(&mut self, event: &str, parameter: &str) -> Result<()> {
        if !self.event_index.contains_key(event) {
            return Err(Error::NodeNotFound(event.to_string()));
        }
        if !self.parameter_index.contains_key(parameter) {
            return Err(Error::NodeNotFound(parameter.to_string()));
        }
        self.edges.push(Edge::new(event, parameter));
        Ok(())
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges as (event, parameter) pairs
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by name; a parameter wins when an event shares its name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.parameter_index
            .get(name)
            .or_else(|| self.event_index.get(name))
            .map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameter_index.contains_key(name) || self.event_index.contains_key(name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameter_index
            .get(name)
            .and_then(|&i| self.nodes[i].as_parameter())
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.event_index
            .get(name)
            .and_then(|&i| self.nodes[i].as_event())
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.nodes.iter().filter_map(Node::as_parameter)
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.nodes.iter().filter_map(Node::as_event)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges touching a node in the given direction
    pub fn neighbors(&self, name: &str, direction: Direction) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|edge| match direction {
                Direction::Outgoing => edge.from == name,
                Direction::Incoming => edge.to == name,
                Direction::Both => edge.from == name || edge.to == name,
            })
            .collect()
    }

    /// Names of the parameters an event points to, each once, in edge order
    pub fn outgoing(&self, name: &str) -> Vec<&str> {
        distinct(
            self.neighbors(name, Direction::Outgoing)
                .into_iter()
                .map(|edge| edge.to.as_str()),
        )
    }

    /// Names of the events pointing to a parameter, each once, in edge order
    pub fn incoming(&self, name: &str) -> Vec<&str> {
        distinct(
            self.neighbors(name, Direction::Incoming)
                .into_iter()
                .map(|edge| edge.from.as_str()),
        )
    }

    /// Parameters used by an event
    pub fn dependencies(&self, event: &str) -> Result<Vec<&Parameter>> {
        if self.event(event).is_none() {
            return Err(Error::NodeNotFound(event.to_string()));
        }
        Ok(self
            .outgoing(event)
            .into_iter()
            .filter_map(|name| self.parameter(name))
            .collect())
    }

    /// Events that use a parameter
    pub fn dependents(&self, parameter: &str) -> Result<Vec<&Event>> {
        if self.parameter(parameter).is_none() {
            return Err(Error::NodeNotFound(parameter.to_string()));
        }
        Ok(self
            .incoming(parameter)
            .into_iter()
            .filter_map(|name| self.event(name))
            .collect())
    }
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    names.filter(|name| seen.insert(*name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{validate, NamespacePolicy};

    fn create_test_aggregate() -> Aggregate {
        // signup --> age, plan
        // upgrade --> plan
        // country is unused
        Aggregate {
            parameters: vec![
                Parameter::new("age", "number"),
                Parameter::new("plan", "string"),
                Parameter::new("country", "string"),
            ],
            events: vec![
                Event::new("signup").with_parameter("age").with_parameter("plan"),
                Event::new("upgrade").with_parameter("plan"),
                Event::new("logout"),
            ],
        }
    }

    #[test]
    fn test_minimal_graph() {
        let aggregate = Aggregate {
            parameters: vec![Parameter::new("age", "number")],
            events: vec![Event::new("signup").with_parameter("age")],
        };
        assert!(validate(&aggregate, NamespacePolicy::Shared).is_empty());

        let graph = DefinitionGraph::build(&aggregate).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges(), &[Edge::new("signup", "age")]);
    }

    #[test]
    fn test_node_and_edge_counts() {
        let aggregate = create_test_aggregate();
        let graph = DefinitionGraph::build(&aggregate).unwrap();

        let expected_edges: usize = aggregate.events.iter().map(|e| e.parameters.len()).sum();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), expected_edges);
        assert_eq!(graph.parameters().count(), 3);
        assert_eq!(graph.events().count(), 3);
    }

    #[test]
    fn test_lookup_and_payloads() {
        let graph = DefinitionGraph::build(&create_test_aggregate()).unwrap();

        assert_eq!(graph.node("age").map(Node::kind), Some(NodeKind::Parameter));
        assert_eq!(graph.node("signup").map(Node::kind), Some(NodeKind::Event));
        assert_eq!(graph.parameter("plan").unwrap().param_type, "string");
        assert!(graph.event("plan").is_none());
        assert!(graph.node("missing").is_none());
        assert!(graph.contains("age"));
        assert!(graph.contains("signup"));
        assert!(!graph.contains("missing"));
    }

    #[test]
    fn test_edge_queries() {
        let graph = DefinitionGraph::build(&create_test_aggregate()).unwrap();

        assert_eq!(graph.outgoing("signup"), vec!["age", "plan"]);
        assert_eq!(graph.incoming("plan"), vec!["signup", "upgrade"]);
        assert!(graph.incoming("country").is_empty());
        assert_eq!(graph.neighbors("plan", Direction::Both).len(), 2);
        assert!(graph.neighbors("plan", Direction::Outgoing).is_empty());

        let deps: Vec<_> = graph
            .dependencies("signup")
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(deps, vec!["age", "plan"]);

        let users: Vec<_> = graph
            .dependents("plan")
            .unwrap()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(users, vec!["signup", "upgrade"]);

        assert_eq!(
            graph.dependencies("age"),
            Err(Error::NodeNotFound("age".to_string()))
        );
    }

    #[test]
    fn test_repeated_reference_listed_once() {
        let aggregate = Aggregate {
            parameters: vec![Parameter::new("age", "number")],
            events: vec![Event::new("signup")
                .with_parameter("age")
                .with_parameter("age")],
        };
        let graph = DefinitionGraph::build(&aggregate).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors("age", Direction::Incoming).len(), 2);
        assert_eq!(graph.incoming("age"), vec!["signup"]);
        assert_eq!(graph.outgoing("signup"), vec!["age"]);
        assert_eq!(graph.dependents("age").unwrap().len(), 1);
        assert_eq!(graph.dependencies("signup").unwrap().len(), 1);
    }

    #[test]
    fn test_dangling_references_fail_build() {
        let aggregate = Aggregate {
            parameters: vec![Parameter::new("age", "number")],
            events: vec![
                Event::new("signup").with_parameter("age").with_parameter("email"),
                Event::new("share").with_parameter("signup"),
            ],
        };

        let err = DefinitionGraph::build(&aggregate).unwrap_err();
        assert_eq!(
            err,
            Error::DanglingReferences(vec![
                DanglingReference {
                    event: "signup".to_string(),
                    parameter: "email".to_string(),
                },
                // Events are not valid edge targets
                DanglingReference {
                    event: "share".to_string(),
                    parameter: "signup".to_string(),
                },
            ])
        );
        assert!(err.to_string().contains("undeclared parameter 'email'"));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = DefinitionGraph::new();
        graph.add_node(Node::Parameter(Parameter::new("age", "number"))).unwrap();

        let err = graph
            .add_node(Node::Parameter(Parameter::new("age", "string")))
            .unwrap_err();
        assert_eq!(err, Error::DuplicateNode("age".to_string()));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_parameter_and_event_may_share_a_name() {
        let aggregate = Aggregate {
            parameters: vec![Parameter::new("checkout", "string")],
            events: vec![Event::new("checkout").with_parameter("checkout")],
        };
        assert!(validate(&aggregate, NamespacePolicy::Separate).is_empty());

        let graph = DefinitionGraph::build(&aggregate).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges(), &[Edge::new("checkout", "checkout")]);
        assert_eq!(graph.node("checkout").map(Node::kind), Some(NodeKind::Parameter));
        assert!(graph.event("checkout").is_some());
    }

    #[test]
    fn test_build_is_deterministic() {
        let aggregate = create_test_aggregate();
        let first = DefinitionGraph::build(&aggregate).unwrap();
        let second = DefinitionGraph::build(&aggregate).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_graph() {
        let graph = DefinitionGraph::build(&Aggregate::new()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
