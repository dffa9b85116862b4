//! Text layer.

use super::{Color, LayerCommon};
use serde::{Deserialize, Serialize};

/// Default font family for new text layers.
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

/// Default font size in canvas units.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Bold,
}

/// Style attributes for a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub family: String,
    pub size: f64,
    pub color: Color,
    pub align: TextAlign,
    pub weight: FontWeight,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            color: Color::black(),
            align: TextAlign::default(),
            weight: FontWeight::default(),
        }
    }
}

/// A text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub common: LayerCommon,
    /// The text content.
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

impl TextLayer {
    pub fn new(common: LayerCommon, content: String) -> Self {
        Self {
            common,
            content,
            style: TextStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style_defaults() {
        let style = TextStyle::default();
        assert_eq!(style.family, DEFAULT_FONT_FAMILY);
        assert!((style.size - DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert_eq!(style.color, Color::black());
        assert_eq!(style.align, TextAlign::Left);
        assert_eq!(style.weight, FontWeight::Regular);
    }
}
