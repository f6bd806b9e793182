//! Drawable primitives for pipeline diagrams.
//!
//! Shapes render to one or more [`RenderLayer`]s, which are ordered during
//! final SVG generation. Text measurement lives here too because node sizes
//! derive from their labels.

mod layer;
mod shape;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use shape::{ArrowDefinition, RectangleDefinition, Shape};
pub use text::{
    FixedWidthMeasure, FontMetricsMeasure, TextDefinition, TextMeasure, TextMeasureKind,
};
