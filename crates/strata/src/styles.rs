//! Drawing definitions resolved from configuration.

use strata_core::{
    color::Color,
    draw::{ArrowDefinition, RectangleDefinition, TextDefinition},
};

use crate::{config::AppConfig, error::StrataError};

/// Every definition a drawing needs, with colors already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Styles {
    background: Color,
    rectangle: RectangleDefinition,
    text: TextDefinition,
    arrow: ArrowDefinition,
}

impl Styles {
    /// Resolves the style section of `config`. The layout section is only
    /// validated here; arrowhead geometry belongs to the layout.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Configuration`] for an unparsable color or an
    /// invalid layout setting.
    pub fn from_config(config: &AppConfig) -> Result<Self, StrataError> {
        config.layout().validate().map_err(StrataError::Configuration)?;

        let style = config.style();
        let color = |key: &str, value: &str| {
            Color::new(value)
                .map_err(|err| StrataError::Configuration(format!("`style.{key}`: {err}")))
        };

        if style.font_size() == 0 {
            return Err(StrataError::Configuration(
                "`style.font_size` must be positive".to_string(),
            ));
        }
        if !style.node_corner_radius().is_finite() || style.node_corner_radius() < 0.0 {
            return Err(StrataError::Configuration(
                "`style.node_corner_radius` must be a non-negative number".to_string(),
            ));
        }

        let mut text = TextDefinition::new();
        text.set_font_family(style.font_family());
        text.set_font_size(style.font_size());

        let mut arrow = ArrowDefinition::new();
        arrow.set_line_color(color("arrow_color", style.arrow_color())?);
        arrow.set_head_color(color("arrowhead_color", style.arrowhead_color())?);

        Ok(Self {
            background: color("background_color", style.background_color())?,
            rectangle: RectangleDefinition::new(
                color("node_fill", style.node_fill())?,
                style.node_corner_radius(),
            ),
            text,
            arrow,
        })
    }

    pub fn background(&self) -> &Color {
        &self.background
    }

    pub fn rectangle(&self) -> &RectangleDefinition {
        &self.rectangle
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    pub fn arrow(&self) -> &ArrowDefinition {
        &self.arrow
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::config::{LayoutConfig, OutputConfig, StyleConfig};

    #[test]
    fn test_default_styles() {
        let styles = Styles::from_config(&AppConfig::default()).unwrap();

        assert_eq!(styles.background().to_string(), Color::new("#dedede").unwrap().to_string());
        assert_eq!(styles.rectangle().fill_color().to_string(), "red");
        assert_approx_eq!(f32, styles.rectangle().corner_radius(), 2.0);
        assert_eq!(styles.text().font_family(), "Arial");
        assert_eq!(styles.text().font_size(), 8);
        assert_eq!(styles.arrow().head_color().to_string(), "blue");
    }

    #[test]
    fn test_invalid_color_is_configuration_error() {
        let config = AppConfig::new(
            LayoutConfig::default(),
            StyleConfig::default().with_node_fill("not-a-color"),
            OutputConfig::default(),
        );

        let err = Styles::from_config(&config).unwrap_err();
        assert!(matches!(&err, StrataError::Configuration(msg) if msg.contains("node_fill")));
    }

    #[test]
    fn test_invalid_layout_is_configuration_error() {
        let config = AppConfig::new(
            LayoutConfig::default().with_padding_factor(0.5),
            StyleConfig::default(),
            OutputConfig::default(),
        );
        assert!(matches!(
            Styles::from_config(&config),
            Err(StrataError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_font_size_is_rejected() {
        let config = AppConfig::new(
            LayoutConfig::default(),
            StyleConfig::default().with_font("Arial", 0),
            OutputConfig::default(),
        );
        assert!(Styles::from_config(&config).is_err());
    }
}
