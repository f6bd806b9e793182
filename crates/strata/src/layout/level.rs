//! Topological leveling by iterative peeling.
//!
//! Level 0 holds the nodes without parents. Every following level holds
//! the nodes whose parents all sit in earlier levels. A pass that places no
//! node means the remaining nodes form or hang off a cycle.

use log::{debug, trace};
use petgraph::graph::NodeIndex;

use crate::{error::StrataError, structure::PipelineGraph};

/// One topological tier: node indices sorted by node name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    index: usize,
    nodes: Vec<NodeIndex>,
}

impl Level {
    /// Position of this level, 0 being the leftmost.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Arena of all levels of a pipeline, leftmost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Levels {
    levels: Vec<Level>,
}

impl Levels {
    /// Levels every node of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::GraphCycle`] with the sorted names of every
    /// node that could not be placed.
    pub fn compute(graph: &PipelineGraph<'_>) -> Result<Self, StrataError> {
        let mut pooled = vec![true; graph.len()];
        let mut remaining = graph.len();
        let mut levels = Vec::new();

        while remaining > 0 {
            let mut level: Vec<NodeIndex> = graph
                .node_indices()
                .filter(|idx| pooled[idx.index()])
                .filter(|&idx| graph.parents(idx).all(|parent| !pooled[parent.index()]))
                .collect();

            if level.is_empty() {
                let mut nodes: Vec<String> = graph
                    .node_indices()
                    .filter(|idx| pooled[idx.index()])
                    .map(|idx| graph.name(idx).to_string())
                    .collect();
                nodes.sort_unstable();
                debug!(unresolved = nodes.len(); "Leveling found a cycle");
                return Err(StrataError::GraphCycle { nodes });
            }

            // Placed together so a node never sees a sibling of its own pass
            for idx in &level {
                pooled[idx.index()] = false;
            }
            remaining -= level.len();

            level.sort_by(|a, b| graph.name(*a).cmp(graph.name(*b)));
            trace!(level = levels.len(), nodes = level.len(); "Level resolved");
            levels.push(Level {
                index: levels.len(),
                nodes: level,
            });
        }

        debug!(levels = levels.len(); "Pipeline leveled");
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// Node names per level.
    pub fn names<'a>(&self, graph: &PipelineGraph<'a>) -> Vec<Vec<&'a str>> {
        self.levels
            .iter()
            .map(|level| level.nodes.iter().map(|&idx| graph.name(idx)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use strata_core::semantic::{Node, Pipeline};

    use super::*;

    fn pipeline(nodes: &[&str], edges: &[(&str, &str)]) -> Pipeline {
        edges.iter().fold(
            Pipeline::new("test", nodes.iter().map(Node::new).collect(), Default::default()),
            |pipeline, (parent, child)| pipeline.with_dependency(parent, child),
        )
    }

    fn level_names(pipeline: &Pipeline) -> Result<Vec<Vec<String>>, StrataError> {
        let graph = PipelineGraph::from_pipeline(pipeline)?;
        let levels = Levels::compute(&graph)?;
        Ok(levels
            .names(&graph)
            .into_iter()
            .map(|level| level.into_iter().map(str::to_string).collect())
            .collect())
    }

    #[test]
    fn test_chain() {
        let levels = level_names(&pipeline(&["C", "B", "A"], &[("A", "B"), ("B", "C")])).unwrap();
        assert_eq!(levels, vec![vec!["A"], vec!["B"], vec!["C"]]);
    }

    #[test]
    fn test_join() {
        let levels = level_names(&pipeline(&["C", "B", "A"], &[("A", "C"), ("B", "C")])).unwrap();
        assert_eq!(levels, vec![vec!["A", "B"], vec!["C"]]);
    }

    #[test]
    fn test_node_waits_for_its_deepest_parent() {
        // D depends on A (level 0) and C (level 2)
        let pipeline = pipeline(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("A", "D")],
        );
        let levels = level_names(&pipeline).unwrap();
        assert_eq!(levels, vec![vec!["A"], vec!["B"], vec!["C"], vec!["D"]]);
    }

    #[test]
    fn test_isolated_nodes_share_level_zero() {
        let levels = level_names(&pipeline(&["b", "a", "B"], &[])).unwrap();
        assert_eq!(levels, vec![vec!["B", "a", "b"]]);
    }

    #[test]
    fn test_empty_pipeline_has_no_levels() {
        let pipeline = pipeline(&[], &[]);
        let graph = PipelineGraph::from_pipeline(&pipeline).unwrap();
        assert!(Levels::compute(&graph).unwrap().is_empty());
    }

    #[test]
    fn test_cycle_is_reported_with_sorted_names() {
        let err = level_names(&pipeline(&["B", "A"], &[("A", "B"), ("B", "A")])).unwrap_err();
        match err {
            StrataError::GraphCycle { nodes } => assert_eq!(nodes, vec!["A", "B"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_downstream_nodes_are_unresolved() {
        let pipeline = pipeline(
            &["Root", "X", "Y", "Tail"],
            &[("Root", "X"), ("X", "Y"), ("Y", "X"), ("Y", "Tail")],
        );
        match level_names(&pipeline).unwrap_err() {
            StrataError::GraphCycle { nodes } => assert_eq!(nodes, vec!["Tail", "X", "Y"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let err = level_names(&pipeline(&["A"], &[("A", "A")])).unwrap_err();
        assert!(matches!(err, StrataError::GraphCycle { .. }));
    }

    #[test]
    fn test_level_accessors() {
        let pipeline = pipeline(&["A", "B"], &[("A", "B")]);
        let graph = PipelineGraph::from_pipeline(&pipeline).unwrap();
        let levels = Levels::compute(&graph).unwrap();

        let b = graph.index_of("B").unwrap();
        assert_eq!(levels.get(1).map(Level::nodes), Some(&[b][..]));
        assert_eq!(levels.get(1).map(Level::index), Some(1));
        assert_eq!(levels.get(0).map(Level::len), Some(1));
    }
}
