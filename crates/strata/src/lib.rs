//! Strata - leveled diagrams of pipeline DAGs.
//!
//! A pipeline is a set of named nodes with dependency edges. Strata places
//! the nodes in columns by topological depth, connects them with arrows and
//! writes the result as SVG, optionally wrapped in an HTML page.
//!
//! # Example
//!
//! ```
//! use strata::{PipelineDiagram, config::AppConfig};
//!
//! let source = r#"
//! name: etl
//! nodes:
//!   - name: Extract
//!     nexts: [Transform]
//!   - name: Transform
//!     nexts: [Load]
//!   - name: Load
//! "#;
//!
//! let diagram = PipelineDiagram::from_source(source, AppConfig::default()).unwrap();
//! assert_eq!(diagram.levels().unwrap(), vec![vec!["Extract"], vec!["Transform"], vec!["Load"]]);
//!
//! let svg = diagram.render_svg().unwrap();
//! assert!(svg.contains("</svg>"));
//! ```

pub mod config;
pub mod export;
pub mod layout;
pub mod structure;

mod error;
mod styles;

pub use strata_core::{color, draw, geometry, semantic};
pub use strata_parser::{NodeEntry, OneOrMany, ParseConfig, PipelineDocument};

pub use error::StrataError;
pub use styles::Styles;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use config::{AppConfig, OutputFormat};
use draw::Shape;
use export::Exporter;
use geometry::Size;
use layout::{EngineBuilder, Layout, Levels};
use semantic::Pipeline;
use structure::PipelineGraph;

/// A pipeline together with the configuration it is drawn with.
///
/// Two diagrams are equal when their pipelines are equal; the
/// configuration is not compared.
#[derive(Debug, Clone)]
pub struct PipelineDiagram {
    pipeline: Pipeline,
    config: AppConfig,
    styles: Styles,
}

impl PipelineDiagram {
    /// Wraps an already built pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Configuration`] for invalid style or layout
    /// settings.
    pub fn new(pipeline: Pipeline, config: AppConfig) -> Result<Self, StrataError> {
        let styles = Styles::from_config(&config)?;
        Ok(Self {
            pipeline,
            config,
            styles,
        })
    }

    /// Builds the diagram from a structured document.
    pub fn from_document(
        document: &PipelineDocument,
        config: AppConfig,
    ) -> Result<Self, StrataError> {
        let pipeline = strata_parser::build(document, Self::parse_config(&config))
            .map_err(|err| StrataError::new_parse_error(err, String::new()))?;
        Self::new(pipeline, config)
    }

    /// Parses a YAML pipeline document.
    pub fn from_source(source: &str, config: AppConfig) -> Result<Self, StrataError> {
        info!("Parsing pipeline");

        let pipeline = strata_parser::parse(source, Self::parse_config(&config))
            .map_err(|err| StrataError::new_parse_error(err, source))?;

        debug!(pipeline = pipeline.name(); "Pipeline parsed successfully");
        trace!(pipeline:?; "Parsed pipeline");

        Self::new(pipeline, config)
    }

    /// Reads and parses the YAML pipeline document at `path`.
    pub fn from_path(path: impl AsRef<Path>, config: AppConfig) -> Result<Self, StrataError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading pipeline file");
        let source = fs::read_to_string(path)?;
        Self::from_source(&source, config)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Node names per level, leftmost level first.
    pub fn levels(&self) -> Result<Vec<Vec<String>>, StrataError> {
        let graph = PipelineGraph::from_pipeline(&self.pipeline)?;
        let levels = Levels::compute(&graph)?;

        Ok(levels
            .names(&graph)
            .into_iter()
            .map(|level| level.into_iter().map(str::to_string).collect())
            .collect())
    }

    /// Levels, positions and routes every node and dependency.
    pub fn layout(&self) -> Result<Layout, StrataError> {
        info!(pipeline = self.pipeline.name(); "Building pipeline structure");
        let graph = PipelineGraph::from_pipeline(&self.pipeline)?;

        let layout_config = self.config.layout();
        let engine = EngineBuilder::new()
            .with_level_gaps(layout_config.level_gap_x(), layout_config.level_gap_y())
            .with_padding_factor(layout_config.padding_factor())
            .with_arrowhead(
                layout_config.arrowhead_width(),
                layout_config.arrowhead_height(),
            )
            .with_text_definition(self.styles.text().clone())
            .with_text_measure(layout_config.text_measure().measurer());

        engine.build(&graph)
    }

    /// The shapes `layout` is drawn with.
    pub fn shapes<'a>(&'a self, layout: &'a Layout) -> Vec<Shape<'a>> {
        export::svg::shapes(layout, &self.styles)
    }

    /// Renders the diagram to an SVG string, without touching the file
    /// system.
    pub fn render_svg(&self) -> Result<String, StrataError> {
        let layout = self.layout()?;
        let svg = export::svg::SvgBuilder::new(self.config.output().path())
            .with_styles(&self.styles)
            .with_format(OutputFormat::Svg)
            .build()?;

        info!("SVG rendered successfully");
        Ok(svg.render_string(&layout))
    }

    /// Runs the whole pipeline and writes the drawing to the configured
    /// output path.
    pub fn draw(&self) -> Result<Drawing, StrataError> {
        let layout = self.layout()?;
        let output = self.config.output();

        let exporter = export::svg::SvgBuilder::new(output.path())
            .with_styles(&self.styles)
            .with_format(output.format())
            .build()?;
        exporter.export_layout(&layout)?;

        info!(path:? = output.path(), format:? = output.format(); "Pipeline drawn");
        Ok(Drawing {
            path: output.path().to_path_buf(),
            format: output.format(),
            size: layout.canvas(),
        })
    }

    fn parse_config(config: &AppConfig) -> ParseConfig {
        ParseConfig::new(config.layout().undeclared_nodes())
    }
}

impl PartialEq for PipelineDiagram {
    fn eq(&self, other: &Self) -> bool {
        self.pipeline == other.pipeline
    }
}

impl Eq for PipelineDiagram {}

/// What [`PipelineDiagram::draw`] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    path: PathBuf,
    format: OutputFormat,
    size: Size,
}

impl Drawing {
    /// The file the drawing was written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Canvas size of the drawing.
    pub fn size(&self) -> Size {
        self.size
    }
}
