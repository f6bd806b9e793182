use std::collections::HashMap;

use log::debug;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use strata_core::semantic::{Node, Pipeline};

use crate::error::StrataError;

/// Arena of the pipeline nodes with one edge per dependency.
///
/// Node indices follow declaration order.
#[derive(Debug)]
pub struct PipelineGraph<'a> {
    graph: DiGraph<&'a Node, ()>,
    indices: HashMap<&'a str, NodeIndex>,
}

impl<'a> PipelineGraph<'a> {
    /// Builds the arena and the name → index map.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Configuration`] if two nodes share a name or a
    /// dependency names a node that is not declared.
    pub fn from_pipeline(pipeline: &'a Pipeline) -> Result<Self, StrataError> {
        let mut graph = DiGraph::with_capacity(pipeline.nodes().len(), 0);
        let mut indices = HashMap::with_capacity(pipeline.nodes().len());

        for node in pipeline.nodes() {
            let idx = graph.add_node(node);
            if indices.insert(node.name(), idx).is_some() {
                return Err(StrataError::Configuration(format!(
                    "node `{}` is declared more than once",
                    node.name()
                )));
            }
        }

        let lookup = |name: &str| {
            indices.get(name).copied().ok_or_else(|| {
                StrataError::Configuration(format!("dependency names undeclared node `{name}`"))
            })
        };

        for (parent, child) in pipeline.edges() {
            let edge = (lookup(parent)?, lookup(child)?);
            graph.add_edge(edge.0, edge.1, ());
        }

        debug!(
            pipeline = pipeline.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Pipeline graph built"
        );

        Ok(Self { graph, indices })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn name(&self, idx: NodeIndex) -> &'a str {
        self.graph[idx].name()
    }

    /// Looks a node up by name.
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.indices.get(name).copied()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Nodes with an edge into `idx`.
    pub fn parents(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    /// Nodes `idx` has an edge to.
    pub fn children(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Every `(parent, child)` edge, in the pipeline's canonical order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline(nodes: &[&str], edges: &[(&str, &str)]) -> Pipeline {
        edges.iter().fold(
            Pipeline::new("test", nodes.iter().map(Node::new).collect(), Default::default()),
            |pipeline, (parent, child)| pipeline.with_dependency(parent, child),
        )
    }

    #[test]
    fn test_graph_follows_declaration_order() {
        let pipeline = pipeline(&["C", "A", "B"], &[("A", "B"), ("C", "B")]);
        let graph = PipelineGraph::from_pipeline(&pipeline).unwrap();

        let names: Vec<_> = graph.node_indices().map(|idx| graph.name(idx)).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(graph.edge_count(), 2);

        let b = graph.index_of("B").unwrap();
        let mut parents: Vec<_> = graph.parents(b).map(|idx| graph.name(idx)).collect();
        parents.sort_unstable();
        assert_eq!(parents, vec!["A", "C"]);
        assert_eq!(graph.children(b).count(), 0);
    }

    #[test]
    fn test_edges_in_canonical_order() {
        let pipeline = pipeline(&["A", "B", "C"], &[("B", "C"), ("A", "C"), ("A", "B")]);
        let graph = PipelineGraph::from_pipeline(&pipeline).unwrap();

        let edges: Vec<_> = graph
            .edges()
            .map(|(parent, child)| (graph.name(parent), graph.name(child)))
            .collect();
        assert_eq!(edges, vec![("A", "B"), ("A", "C"), ("B", "C")]);
    }

    #[test]
    fn test_undeclared_node_is_configuration_error() {
        let pipeline = pipeline(&["Wake up", "Live"], &[("Wake Up", "Live")]);
        let err = PipelineGraph::from_pipeline(&pipeline).unwrap_err();
        assert!(matches!(&err, StrataError::Configuration(msg) if msg.contains("Wake Up")));
    }

    #[test]
    fn test_duplicate_node_is_configuration_error() {
        let pipeline = pipeline(&["A", " A"], &[]);
        assert!(matches!(
            PipelineGraph::from_pipeline(&pipeline),
            Err(StrataError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = pipeline(&[], &[]);
        let graph = PipelineGraph::from_pipeline(&pipeline).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }
}
