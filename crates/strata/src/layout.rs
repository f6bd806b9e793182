//! Layout of a pipeline graph.
//!
//! [`EngineBuilder`] runs the three layout stages in order and collects
//! their output into a [`Layout`]:
//!
//! 1. [`Levels`] - topological leveling
//! 2. [`CoordinateAssigner`] - node boxes and level extents
//! 3. [`ArrowRouter`] - one arrow per dependency

mod level;
mod position;
mod route;

pub use level::{Level, Levels};
pub use position::{CoordinateAssigner, LevelExtent, Positions};
pub use route::{ArrowRoute, ArrowRouter};

use log::{debug, info};
use petgraph::graph::NodeIndex;

use strata_core::{
    draw::{FixedWidthMeasure, TextDefinition, TextMeasure},
    geometry::{Bounds, Size},
};

use crate::{error::StrataError, structure::PipelineGraph};

/// A node with its final box.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    name: String,
    level: usize,
    order: usize,
    bounds: Bounds,
}

impl PositionedNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the level the node belongs to.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Position of the node inside its level, 0 being the top.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// An arrow between two nodes of a [`Layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutArrow {
    parent_index: usize,
    child_index: usize,
    route: ArrowRoute,
}

impl LayoutArrow {
    pub fn route(&self) -> &ArrowRoute {
        &self.route
    }
}

/// A fully laid out pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Level by level, top to bottom inside a level
    nodes: Vec<PositionedNode>,
    extents: Vec<LevelExtent>,
    arrows: Vec<LayoutArrow>,
    canvas: Size,
}

impl Layout {
    /// Every node, level by level.
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    /// Looks a node up by name.
    pub fn node(&self, name: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Horizontal span of every level.
    pub fn extents(&self) -> &[LevelExtent] {
        &self.extents
    }

    /// Nodes of level `index`, top to bottom.
    pub fn level(&self, index: usize) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter().filter(move |node| node.level == index)
    }

    /// Arrows in the canonical order of their dependencies.
    pub fn arrows(&self) -> &[LayoutArrow] {
        &self.arrows
    }

    pub fn parent(&self, arrow: &LayoutArrow) -> &PositionedNode {
        &self.nodes[arrow.parent_index]
    }

    pub fn child(&self, arrow: &LayoutArrow) -> &PositionedNode {
        &self.nodes[arrow.child_index]
    }

    /// Extent of the drawing: the end of the last level by the bottom of
    /// the lowest node. Zero for an empty pipeline.
    pub fn canvas(&self) -> Size {
        self.canvas
    }
}

/// Builder for configuring and running the layout engine.
#[derive(Debug)]
pub struct EngineBuilder {
    level_gap_x: f32,
    level_gap_y: f32,
    padding_factor: f32,
    head_width: f32,
    head_height: f32,
    text: TextDefinition,
    measure: Box<dyn TextMeasure>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            level_gap_x: 20.0,
            level_gap_y: 10.0,
            padding_factor: 1.8,
            head_width: 4.0,
            head_height: 2.0,
            text: TextDefinition::default(),
            measure: Box::new(FixedWidthMeasure::new()),
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal gap between levels and the vertical gap between
    /// nodes of one level.
    pub fn with_level_gaps(mut self, x: f32, y: f32) -> Self {
        self.level_gap_x = x;
        self.level_gap_y = y;
        self
    }

    /// Set the factor applied to label extents to get node sizes.
    pub fn with_padding_factor(mut self, factor: f32) -> Self {
        self.padding_factor = factor;
        self
    }

    /// Set the arrowhead length and half-width.
    pub fn with_arrowhead(mut self, width: f32, height: f32) -> Self {
        self.head_width = width;
        self.head_height = height;
        self
    }

    /// Set the font labels are measured with.
    pub fn with_text_definition(mut self, text: TextDefinition) -> Self {
        self.text = text;
        self
    }

    /// Set how labels are measured.
    pub fn with_text_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Lays out `graph`.
    ///
    /// # Errors
    ///
    /// - [`StrataError::GraphCycle`] if the dependencies form a cycle
    /// - [`StrataError::DegenerateGeometry`] if an arrow has zero length
    pub fn build(&self, graph: &PipelineGraph<'_>) -> Result<Layout, StrataError> {
        let levels = Levels::compute(graph)?;

        let sizes: Vec<Size> = graph
            .node_indices()
            .map(|idx| {
                self.measure
                    .measure(graph.name(idx), &self.text)
                    .scale(self.padding_factor)
            })
            .collect();

        let positions =
            CoordinateAssigner::new(self.level_gap_x, self.level_gap_y).assign(&levels, &sizes);
        debug!(levels = levels.len(); "Node positions assigned");

        let mut slots = vec![0; graph.len()];
        let mut nodes = Vec::with_capacity(graph.len());
        for level in levels.iter() {
            for (order, &idx) in level.nodes().iter().enumerate() {
                slots[idx.index()] = nodes.len();
                nodes.push(PositionedNode {
                    name: graph.name(idx).to_string(),
                    level: level.index(),
                    order,
                    bounds: positions.bounds(idx),
                });
            }
        }

        let router = ArrowRouter::new(self.head_width, self.head_height);
        let arrows = graph
            .edges()
            .map(|(parent, child)| self.route(&router, graph, &positions, parent, child))
            .map(|route| {
                route.map(|(parent, child, route)| LayoutArrow {
                    parent_index: slots[parent.index()],
                    child_index: slots[child.index()],
                    route,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let canvas = Size::new(
            positions.extents().last().map_or(0.0, LevelExtent::x_end),
            nodes
                .iter()
                .map(|node| node.bounds.max_y())
                .fold(0.0, f32::max),
        );

        info!(
            nodes = nodes.len(),
            arrows = arrows.len(),
            width = canvas.width(),
            height = canvas.height();
            "Layout calculated"
        );

        Ok(Layout {
            nodes,
            extents: positions.extents().to_vec(),
            arrows,
            canvas,
        })
    }

    fn route(
        &self,
        router: &ArrowRouter,
        graph: &PipelineGraph<'_>,
        positions: &Positions,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<(NodeIndex, NodeIndex, ArrowRoute), StrataError> {
        router
            .route(positions.bounds(parent), positions.bounds(child))
            .map(|route| (parent, child, route))
            .ok_or_else(|| StrataError::DegenerateGeometry {
                parent: graph.name(parent).to_string(),
                child: graph.name(child).to_string(),
            })
    }
}
