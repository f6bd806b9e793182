//! The closed set of shapes a pipeline diagram is made of.
//!
//! Every node becomes a [`Shape::Rectangle`] and a [`Shape::Label`]; every
//! dependency edge becomes a [`Shape::Arrow`]. All shapes are rendered by the
//! single exhaustive [`Shape::render_to_layers`].

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{LayeredOutput, RenderLayer, TextDefinition},
    geometry::{Bounds, Point},
};

/// Fill and corner rounding of node boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleDefinition {
    fill_color: Color,
    corner_radius: f32,
}

impl RectangleDefinition {
    pub fn new(fill_color: Color, corner_radius: f32) -> Self {
        Self {
            fill_color,
            corner_radius,
        }
    }

    pub fn fill_color(&self) -> &Color {
        &self.fill_color
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }
}

impl Default for RectangleDefinition {
    fn default() -> Self {
        Self {
            fill_color: Color::new("red").expect("'red' is a valid CSS color"),
            corner_radius: 2.0,
        }
    }
}

/// Line and arrowhead colors of dependency arrows.
///
/// The arrowhead geometry comes with the arrow itself, see [`Shape::Arrow`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowDefinition {
    line_color: Color,
    line_width: f32,
    head_color: Color,
}

impl ArrowDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_color(&self) -> &Color {
        &self.line_color
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn head_color(&self) -> &Color {
        &self.head_color
    }

    pub fn set_line_color(&mut self, color: Color) {
        self.line_color = color;
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    pub fn set_head_color(&mut self, color: Color) {
        self.head_color = color;
    }
}

impl Default for ArrowDefinition {
    fn default() -> Self {
        Self {
            line_color: Color::default(),
            line_width: 1.0,
            head_color: Color::new("blue").expect("'blue' is a valid CSS color"),
        }
    }
}

/// A drawable element of a pipeline diagram.
#[derive(Debug, Clone)]
pub enum Shape<'a> {
    /// A node box.
    Rectangle {
        bounds: Bounds,
        definition: &'a RectangleDefinition,
    },
    /// Text centered on `center`.
    Label {
        content: &'a str,
        center: Point,
        definition: &'a TextDefinition,
    },
    /// A straight line from `start` to `end` plus an arrowhead triangle.
    ///
    /// `head` lists the triangle corners: tip first, then the two base corners.
    Arrow {
        start: Point,
        end: Point,
        head: [Point; 3],
        definition: &'a ArrowDefinition,
    },
}

impl Shape<'_> {
    /// Renders this shape to its layers.
    pub fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        match self {
            Shape::Rectangle { bounds, definition } => {
                let fill = definition.fill_color();
                let rect = svg_element::Rectangle::new()
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("fill", fill.to_string())
                    .set("fill-opacity", fill.alpha())
                    .set("rx", definition.corner_radius());
                output.add_to_layer(RenderLayer::Content, Box::new(rect));
            }
            Shape::Label {
                content,
                center,
                definition,
            } => {
                let mut text = svg_element::Text::new(*content)
                    .set("x", center.x())
                    .set("y", center.y())
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "central")
                    .set("font-family", definition.font_family())
                    .set("font-size", definition.font_size());

                if let Some(color) = definition.color() {
                    text = text
                        .set("fill", color.to_string())
                        .set("fill-opacity", color.alpha());
                }

                output.add_to_layer(RenderLayer::Text, Box::new(text));
            }
            Shape::Arrow {
                start,
                end,
                head,
                definition,
            } => {
                let line = svg_element::Line::new()
                    .set("x1", start.x())
                    .set("y1", start.y())
                    .set("x2", end.x())
                    .set("y2", end.y())
                    .set("stroke", definition.line_color().to_string())
                    .set("stroke-width", definition.line_width());

                let points = head
                    .iter()
                    .map(|point| format!("{},{}", point.x(), point.y()))
                    .collect::<Vec<_>>()
                    .join(" ");
                let arrowhead = svg_element::Polygon::new()
                    .set("points", points)
                    .set("fill", definition.head_color().to_string());

                output.add_to_layer(RenderLayer::Arrow, Box::new(line));
                output.add_to_layer(RenderLayer::Arrow, Box::new(arrowhead));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::geometry::Size;

    fn render_to_string(shape: &Shape) -> String {
        shape
            .render_to_layers()
            .render()
            .into_iter()
            .map(|node| node.to_string())
            .collect()
    }

    #[test]
    fn test_rectangle_renders_to_content_layer() {
        let definition = RectangleDefinition::default();
        let shape = Shape::Rectangle {
            bounds: Bounds::new_from_top_left(Point::new(5.0, 10.0), Size::new(20.0, 8.0)),
            definition: &definition,
        };

        let output = shape.render_to_layers();
        assert_eq!(output.layer_len(RenderLayer::Content), 1);

        let svg = render_to_string(&shape);
        assert!(svg.contains("<rect"));
        assert!(svg.contains("x=\"5\""));
        assert!(svg.contains("width=\"20\""));
        assert!(svg.contains("rx=\"2\""));
    }

    #[test]
    fn test_label_renders_centered_text() {
        let definition = TextDefinition::default();
        let shape = Shape::Label {
            content: "Load",
            center: Point::new(10.0, 4.0),
            definition: &definition,
        };

        let output = shape.render_to_layers();
        assert_eq!(output.layer_len(RenderLayer::Text), 1);

        let svg = render_to_string(&shape);
        assert!(svg.contains("Load"));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("font-family=\"Arial\""));
    }

    #[test]
    fn test_arrow_renders_line_and_head() {
        let definition = ArrowDefinition::default();
        let shape = Shape::Arrow {
            start: Point::new(0.0, 5.0),
            end: Point::new(18.0, 5.0),
            head: [
                Point::new(20.0, 5.0),
                Point::new(16.0, 3.0),
                Point::new(16.0, 7.0),
            ],
            definition: &definition,
        };

        let output = shape.render_to_layers();
        assert_eq!(output.layer_len(RenderLayer::Arrow), 2);

        let svg = render_to_string(&shape);
        assert!(svg.contains("<line"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("points=\"20,5 16,3 16,7\""));
    }

    #[test]
    fn test_arrow_definition_defaults() {
        let definition = ArrowDefinition::new();
        assert_approx_eq!(f32, definition.line_width(), 1.0);
        assert_eq!(definition.line_color().to_string(), "black");
        assert_eq!(definition.head_color().to_string(), "blue");
    }
}
