//! Text styling and measurement for node labels.
//!
//! Layout needs the rendered extent of every label before it can size the
//! node boxes. Measurement is an injected capability: the layout engine only
//! sees the [`TextMeasure`] trait, and the caller picks an implementation.
//!
//! - [`FixedWidthMeasure`] - character count heuristic, deterministic on
//!   every machine
//! - [`FontMetricsMeasure`] - real font metrics through cosmic-text shaping
//!
//! # Quick Start
//!
//! ```
//! # use strata_core::draw::{FixedWidthMeasure, TextDefinition, TextMeasure};
//! let mut style = TextDefinition::new();
//! style.set_font_size(10);
//!
//! let size = FixedWidthMeasure::new().measure("Load", &style);
//! assert!((size.width() - 24.0).abs() < 1e-3);
//! assert!((size.height() - 12.0).abs() < 1e-3);
//! ```

use std::{
    fmt,
    str::FromStr,
    sync::{Mutex, OnceLock},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{color::Color, geometry::Size};

/// Font settings shared by every label of a diagram.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"Arial"` |
/// | Font size | `8` |
/// | Text color | `None` (SVG default, black) |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size, in pixels.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the font family for the text.
    ///
    /// # Arguments
    ///
    /// * `family` - The font family name (e.g., "Arial", "monospace")
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the text color. `None` keeps the SVG default.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 8,
            color: None,
        }
    }
}

/// Measures the rendered extent of a piece of text.
pub trait TextMeasure: fmt::Debug {
    /// Returns the width and height `content` occupies when rendered with
    /// `definition`. Multi-line content is as wide as its widest line.
    fn measure(&self, content: &str, definition: &TextDefinition) -> Size;
}

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_EM: f32 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_EM: f32 = 1.2;

/// Estimates text extent as `chars × 0.6 em` by `lines × 1.2 em`.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthMeasure {
    char_width_em: f32,
    line_height_em: f32,
}

impl FixedWidthMeasure {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for FixedWidthMeasure {
    fn default() -> Self {
        Self {
            char_width_em: CHAR_WIDTH_EM,
            line_height_em: LINE_HEIGHT_EM,
        }
    }
}

impl TextMeasure for FixedWidthMeasure {
    fn measure(&self, content: &str, definition: &TextDefinition) -> Size {
        if content.is_empty() {
            return Size::default();
        }

        let font_size = f32::from(definition.font_size());
        let widest = content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or_default();
        let lines = content.lines().count().max(1);

        Size::new(
            widest as f32 * font_size * self.char_width_em,
            lines as f32 * font_size * self.line_height_em,
        )
    }
}

/// Measures text with real font metrics using cosmic-text.
///
/// The underlying `FontSystem` is expensive to build, so one instance is
/// created lazily and shared by every `FontMetricsMeasure`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMetricsMeasure;

impl FontMetricsMeasure {
    pub fn new() -> Self {
        Self
    }
}

impl TextMeasure for FontMetricsMeasure {
    fn measure(&self, content: &str, definition: &TextDefinition) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(content, definition)
    }
}

/// Which [`TextMeasure`] implementation to use.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMeasureKind {
    /// [`FixedWidthMeasure`] (default)
    #[default]
    Fixed,
    /// [`FontMetricsMeasure`]
    Font,
}

impl TextMeasureKind {
    /// Builds the measurer this kind stands for.
    pub fn measurer(self) -> Box<dyn TextMeasure> {
        match self {
            Self::Fixed => Box::new(FixedWidthMeasure::new()),
            Self::Font => Box::new(FontMetricsMeasure::new()),
        }
    }
}

impl FromStr for TextMeasureKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "font" => Ok(Self::Font),
            _ => Err("Unsupported text measure"),
        }
    }
}

/// Handles text measurement and keeps a reusable FontSystem instance
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Calculate the size of text in pixels using cosmic-text shaping.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");

        let font_size_px = f32::from(text_def.font_size());
        let line_height = font_size_px * LINE_HEIGHT_EM;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));

        // Unbounded so every line is laid out on its own
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if !layout_runs.is_empty() {
            for last in layout_runs.iter().map(|run| run.glyphs.last()) {
                if let Some(last) = last {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        } else {
            // No font available, fall back to the fixed-width estimate
            max_width = text.chars().count() as f32 * font_size_px * CHAR_WIDTH_EM;
            total_height = metrics.line_height;
        }

        Size::new(max_width, total_height)
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
