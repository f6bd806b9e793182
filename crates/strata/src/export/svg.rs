//! SVG and HTML output.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info};
use svg::{Document, node::element::Rectangle};

use strata_core::draw::{LayeredOutput, RenderLayer, Shape};

use crate::{Styles, config::OutputFormat, export, layout::Layout};

/// Produces the shapes of a layout: arrows first, then one box and one
/// label per node.
pub fn shapes<'a>(layout: &'a Layout, styles: &'a Styles) -> Vec<Shape<'a>> {
    let arrows = layout.arrows().iter().map(|arrow| {
        let route = arrow.route();
        Shape::Arrow {
            start: route.start(),
            end: route.end(),
            head: route.head(),
            definition: styles.arrow(),
        }
    });

    let nodes = layout.nodes().iter().flat_map(|node| {
        [
            Shape::Rectangle {
                bounds: node.bounds(),
                definition: styles.rectangle(),
            },
            Shape::Label {
                content: node.name(),
                center: node.bounds().center(),
                definition: styles.text(),
            },
        ]
    });

    arrows.chain(nodes).collect()
}

/// Builder for [`Svg`].
#[derive(Debug)]
pub struct SvgBuilder<'a> {
    file_name: PathBuf,
    format: OutputFormat,
    styles: Option<&'a Styles>,
}

impl<'a> SvgBuilder<'a> {
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            format: OutputFormat::default(),
            styles: None,
        }
    }

    pub fn with_styles(mut self, styles: &'a Styles) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> Result<Svg<'a>, export::Error> {
        let styles = self
            .styles
            .ok_or_else(|| export::Error::Render("styles are not set".to_string()))?;

        Ok(Svg {
            file_name: self.file_name,
            format: self.format,
            styles,
        })
    }
}

/// Renders layouts with one set of styles.
#[derive(Debug)]
pub struct Svg<'a> {
    file_name: PathBuf,
    format: OutputFormat,
    styles: &'a Styles,
}

impl Svg<'_> {
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Builds the SVG document of `layout`, sized to its canvas.
    pub fn render_document(&self, layout: &Layout) -> Document {
        let canvas = layout.canvas();
        let mut output = LayeredOutput::new();

        let background = Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", canvas.width())
            .set("height", canvas.height())
            .set("fill", self.styles.background());
        output.add_to_layer(RenderLayer::Background, Box::new(background));

        for shape in shapes(layout, self.styles) {
            output.merge(shape.render_to_layers());
        }

        let doc = output.render().into_iter().fold(
            Document::new()
                .set(
                    "viewBox",
                    format!("0 0 {} {}", canvas.width(), canvas.height()),
                )
                .set("width", canvas.width())
                .set("height", canvas.height()),
            |doc, node| doc.add(node),
        );

        debug!(width = canvas.width(), height = canvas.height(); "SVG document rendered");
        doc
    }

    /// Renders `layout` in the configured format.
    pub fn render_string(&self, layout: &Layout) -> String {
        let doc = self.render_document(layout);
        match self.format {
            OutputFormat::Svg => doc.to_string(),
            OutputFormat::Html => html_page(&doc),
        }
    }

    /// Writes `content` to the output file, creating missing directories.
    pub fn write_content(&self, content: &str) -> Result<(), export::Error> {
        let file_name = self.file_name.display().to_string();
        info!(file_name; "Creating output file");

        if let Some(parent) = self.file_name.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(parent) {
                error!(file_name, err:err; "Failed to create output directory");
                return Err(export::Error::Io(err));
            }
        }

        let mut f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name, err:err; "Failed to create output file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = f.write_all(content.as_bytes()) {
            error!(file_name, err:err; "Failed to write output content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg<'_> {
    fn export_layout(&self, layout: &Layout) -> Result<(), export::Error> {
        let content = self.render_string(layout);
        self.write_content(&content)
    }
}

/// Wraps an SVG document in a minimal HTML page.
fn html_page(doc: &Document) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n</head>\n<body style=\"margin: 0\">\n{doc}\n</body>\n</html>\n"
    )
}
