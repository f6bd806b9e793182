//! Coordinate assignment for leveled nodes.
//!
//! Levels are columns laid out left to right, `gap_x` apart. Inside a level
//! nodes are stacked top to bottom in level order, `gap_y` apart. A level
//! is as wide as its widest node.

use std::cmp::Ordering;

use log::trace;
use petgraph::graph::NodeIndex;

use strata_core::geometry::{Bounds, Point, Size};

use crate::layout::level::Levels;

/// Horizontal span of one level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelExtent {
    x_start: f32,
    x_end: f32,
}

impl LevelExtent {
    pub fn x_start(&self) -> f32 {
        self.x_start
    }

    pub fn x_end(&self) -> f32 {
        self.x_end
    }

    pub fn width(&self) -> f32 {
        self.x_end - self.x_start
    }
}

/// Places nodes given their sizes.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateAssigner {
    gap_x: f32,
    gap_y: f32,
}

/// Output of [`CoordinateAssigner::assign`].
#[derive(Debug, Clone, Default)]
pub struct Positions {
    extents: Vec<LevelExtent>,
    /// Indexed by `NodeIndex::index()`
    bounds: Vec<Bounds>,
}

impl Positions {
    pub fn extents(&self) -> &[LevelExtent] {
        &self.extents
    }

    pub fn bounds(&self, node: NodeIndex) -> Bounds {
        self.bounds[node.index()]
    }
}

impl CoordinateAssigner {
    pub fn new(gap_x: f32, gap_y: f32) -> Self {
        Self { gap_x, gap_y }
    }

    /// Computes the extent of every level and the box of every node.
    ///
    /// `sizes` is indexed by `NodeIndex::index()` and must cover every
    /// node of `levels`.
    pub fn assign(&self, levels: &Levels, sizes: &[Size]) -> Positions {
        let mut extents: Vec<LevelExtent> = Vec::with_capacity(levels.len());
        let mut bounds = vec![Bounds::default(); sizes.len()];

        for level in levels.iter() {
            let x_start = match level.index() {
                0 => 0.0,
                k => extents[k - 1].x_end + self.gap_x,
            };
            let widest = level
                .nodes()
                .iter()
                .map(|idx| sizes[idx.index()].width())
                .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Less))
                .unwrap_or_default();

            let mut y = 0.0;
            for (order, &idx) in level.nodes().iter().enumerate() {
                if order > 0 {
                    y += self.gap_y;
                }
                let size = sizes[idx.index()];
                bounds[idx.index()] = Bounds::new_from_top_left(Point::new(x_start, y), size);
                y += size.height();
            }

            trace!(level = level.index(), x_start, widest; "Level placed");
            extents.push(LevelExtent {
                x_start,
                x_end: x_start + widest,
            });
        }

        Positions { extents, bounds }
    }
}
