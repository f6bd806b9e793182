//! Straight arrows between node boxes.
//!
//! An arrow leaves the parent at its right-center and points at the
//! child's left-center. The visible line stops half an arrowhead short of
//! that anchor; the arrowhead triangle covers the rest, its tip exactly on
//! the anchor.

use strata_core::geometry::{Bounds, Point};

/// Geometry of one arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowRoute {
    start: Point,
    end: Point,
    head: [Point; 3],
}

impl ArrowRoute {
    /// Where the line starts, on the parent box.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Where the visible line stops.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Arrowhead corners: tip first, then the two base corners.
    pub fn head(&self) -> [Point; 3] {
        self.head
    }

    /// The arrowhead tip, on the child box.
    pub fn tip(&self) -> Point {
        self.head[0]
    }
}

/// Computes [`ArrowRoute`]s for a fixed arrowhead size.
#[derive(Debug, Clone, Copy)]
pub struct ArrowRouter {
    head_width: f32,
    head_height: f32,
}

impl ArrowRouter {
    /// `head_width` is the arrowhead length along the line, `head_height`
    /// how far its base reaches to each side.
    pub fn new(head_width: f32, head_height: f32) -> Self {
        Self {
            head_width,
            head_height,
        }
    }

    /// Routes an arrow from `parent` to `child`.
    ///
    /// Returns `None` when both anchors coincide and no direction exists.
    pub fn route(&self, parent: Bounds, child: Bounds) -> Option<ArrowRoute> {
        let start = parent.right_center();
        let anchor = child.left_center();
        let direction = anchor.sub_point(start).normalize()?;

        let end = anchor.sub_point(direction.scale(self.head_width * 0.5));

        let base = anchor.sub_point(direction.scale(self.head_width));
        let side = direction.perpendicular().scale(self.head_height);
        let head = [anchor, base.sub_point(side), base.add_point(side)];

        Some(ArrowRoute { start, end, head })
    }
}
