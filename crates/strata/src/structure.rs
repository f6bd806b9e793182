//! Index-based graph view of a pipeline.
//!
//! Later stages never look nodes up by name: they work on the
//! [`NodeIndex`](petgraph::graph::NodeIndex) handles of one
//! [`PipelineGraph`] built per layout pass.

mod graph;

pub use graph::PipelineGraph;
