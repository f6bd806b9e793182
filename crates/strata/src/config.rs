//! Configuration types for Strata pipeline rendering.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a configuration file only needs the keys it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Gaps, padding, text measurement and arrowhead size.
//! - [`StyleConfig`] - Colors and fonts.
//! - [`OutputConfig`] - Where the drawing is written and in which format.
//!
//! # Example
//!
//! ```
//! # use strata::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().level_gap_x(), 20.0);
//! assert_eq!(config.style().background_color(), "#dedede");
//! ```

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use strata_core::{draw::TextMeasureKind, semantic::UndeclaredNodePolicy};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig, output: OutputConfig) -> Self {
        Self {
            layout,
            style,
            output,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Replaces the output section (builder style).
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }
}

/// Layout parameters.
///
/// | Key | Default |
/// |-----|---------|
/// | `level_gap_x` | `20` |
/// | `level_gap_y` | `10` |
/// | `padding_factor` | `1.8` |
/// | `text_measure` | `fixed` |
/// | `undeclared_nodes` | `error` |
/// | `arrowhead_width` | `4` |
/// | `arrowhead_height` | `2` |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    level_gap_x: f32,
    level_gap_y: f32,
    padding_factor: f32,
    text_measure: TextMeasureKind,
    undeclared_nodes: UndeclaredNodePolicy,
    arrowhead_width: f32,
    arrowhead_height: f32,
}

impl LayoutConfig {
    /// Horizontal gap between consecutive levels.
    pub fn level_gap_x(&self) -> f32 {
        self.level_gap_x
    }

    /// Vertical gap between consecutive nodes of one level.
    pub fn level_gap_y(&self) -> f32 {
        self.level_gap_y
    }

    /// Node box size as a multiple of its label extent.
    pub fn padding_factor(&self) -> f32 {
        self.padding_factor
    }

    pub fn text_measure(&self) -> TextMeasureKind {
        self.text_measure
    }

    pub fn undeclared_nodes(&self) -> UndeclaredNodePolicy {
        self.undeclared_nodes
    }

    pub fn arrowhead_width(&self) -> f32 {
        self.arrowhead_width
    }

    pub fn arrowhead_height(&self) -> f32 {
        self.arrowhead_height
    }

    pub fn with_level_gaps(mut self, x: f32, y: f32) -> Self {
        self.level_gap_x = x;
        self.level_gap_y = y;
        self
    }

    pub fn with_padding_factor(mut self, factor: f32) -> Self {
        self.padding_factor = factor;
        self
    }

    pub fn with_text_measure(mut self, kind: TextMeasureKind) -> Self {
        self.text_measure = kind;
        self
    }

    pub fn with_undeclared_nodes(mut self, policy: UndeclaredNodePolicy) -> Self {
        self.undeclared_nodes = policy;
        self
    }

    pub fn with_arrowhead(mut self, width: f32, height: f32) -> Self {
        self.arrowhead_width = width;
        self.arrowhead_height = height;
        self
    }

    /// Checks the numeric settings.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid key.
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("level_gap_x", self.level_gap_x),
            ("level_gap_y", self.level_gap_y),
            ("arrowhead_height", self.arrowhead_height),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("`layout.{key}` must be a non-negative number, got {value}"));
            }
        }

        if !self.arrowhead_width.is_finite() || self.arrowhead_width <= 0.0 {
            return Err(format!(
                "`layout.arrowhead_width` must be positive, got {}",
                self.arrowhead_width
            ));
        }

        if !self.padding_factor.is_finite() || self.padding_factor <= 1.0 {
            return Err(format!(
                "`layout.padding_factor` must be greater than 1, got {}",
                self.padding_factor
            ));
        }

        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_gap_x: 20.0,
            level_gap_y: 10.0,
            padding_factor: 1.8,
            text_measure: TextMeasureKind::default(),
            undeclared_nodes: UndeclaredNodePolicy::default(),
            arrowhead_width: 4.0,
            arrowhead_height: 2.0,
        }
    }
}

/// Visual styling. Colors are CSS color strings and are only parsed when a
/// drawing is prepared, see [`Styles`](crate::Styles).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: String,
    node_fill: String,
    node_corner_radius: f32,
    font_family: String,
    font_size: u16,
    arrow_color: String,
    arrowhead_color: String,
}

impl StyleConfig {
    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn node_fill(&self) -> &str {
        &self.node_fill
    }

    pub fn node_corner_radius(&self) -> f32 {
        self.node_corner_radius
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn arrow_color(&self) -> &str {
        &self.arrow_color
    }

    pub fn arrowhead_color(&self) -> &str {
        &self.arrowhead_color
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_node_fill(mut self, color: impl Into<String>) -> Self {
        self.node_fill = color.into();
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: u16) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: "#dedede".to_string(),
            node_fill: "red".to_string(),
            node_corner_radius: 2.0,
            font_family: "Arial".to_string(),
            font_size: 8,
            arrow_color: "black".to_string(),
            arrowhead_color: "blue".to_string(),
        }
    }
}

/// The container a drawing is written in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// SVG inside a minimal HTML page (default)
    #[default]
    Html,
    /// A bare SVG document
    Svg,
}

impl OutputFormat {
    /// Picks the format from a file extension: `.svg` is SVG, anything else
    /// is HTML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Html,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "svg" => Ok(Self::Svg),
            _ => Err("Unsupported output format"),
        }
    }
}

/// Where [`PipelineDiagram::draw`](crate::PipelineDiagram::draw) writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    path: PathBuf,
    format: OutputFormat,
}

impl OutputConfig {
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Output at `path`, format inferred from its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = OutputFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("temp/draw.html"),
            format: OutputFormat::Html,
        }
    }
}
