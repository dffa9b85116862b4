//! Layer definitions for the composition document.

mod image;
mod shape;
mod text;

pub use image::{ImageFilters, ImageLayer};
pub use shape::{ShapeKind, ShapeLayer};
pub use text::{FontWeight, TextAlign, TextLayer, TextStyle, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for layers.
pub type LayerId = Uuid;

/// Identifier shared by every member of a group.
pub type GroupId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS-style hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.strip_prefix('#')?.trim();
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b, 255))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }
}

/// Drop shadow attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Color,
}

fn unit_scale() -> f64 {
    1.0
}

fn full_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// Geometry and visibility fields shared by every layer variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerCommon {
    pub(crate) id: LayerId,
    /// Display name shown in the layer list.
    pub name: String,
    /// Group membership tag (`None` = standalone layer).
    pub group_id: Option<GroupId>,
    /// Top-left corner position in canvas units.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
    /// Horizontal flip scalar (1.0 or -1.0).
    #[serde(default = "unit_scale")]
    pub flip_x: f64,
    /// Vertical flip scalar (1.0 or -1.0).
    #[serde(default = "unit_scale")]
    pub flip_y: f64,
    /// Dense paint-order index (1 = bottom-most).
    pub z_index: usize,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "full_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Locked layers reject pointer gestures entirely.
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default)]
    pub shadow: Option<Shadow>,
}

impl LayerCommon {
    /// Create a common base with structural defaults filled in.
    /// The z_index is assigned by the document store on insertion.
    pub fn new(name: String, position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            group_id: None,
            position,
            width: size.width,
            height: size.height,
            rotation: 0.0,
            flip_x: 1.0,
            flip_y: 1.0,
            z_index: 0,
            opacity: 1.0,
            visible: true,
            locked: false,
            corner_radius: 0.0,
            shadow: None,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Axis-aligned bounding box, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

/// Content payload used when creating a layer.
#[derive(Debug, Clone)]
pub enum LayerContent {
    Image { src: String },
    Text { content: String },
    Shape { kind: ShapeKind, fill: Color },
}

/// Partial description of a new layer; `DocumentStore::add_layer` fills in
/// everything left unspecified (id, z_index, name, centered position,
/// type-specific defaults).
#[derive(Debug, Clone)]
pub struct LayerSpec {
    pub content: LayerContent,
    pub name: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
}

impl LayerSpec {
    pub fn image(src: impl Into<String>) -> Self {
        Self {
            content: LayerContent::Image { src: src.into() },
            name: None,
            position: None,
            size: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: LayerContent::Text {
                content: content.into(),
            },
            name: None,
            position: None,
            size: None,
        }
    }

    pub fn shape(kind: ShapeKind, fill: Color) -> Self {
        Self {
            content: LayerContent::Shape { kind, fill },
            name: None,
            position: None,
            size: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }
}

/// Field-wise partial update applied by `DocumentStore::update_layer`.
/// `None` fields are left untouched. Variant-specific fields are ignored
/// when the target layer is of a different type.
#[derive(Debug, Clone, Default)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub flip_x: Option<f64>,
    pub flip_y: Option<f64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub corner_radius: Option<f64>,
    /// `Some(None)` clears the shadow.
    pub shadow: Option<Option<Shadow>>,
    /// Image layers: replace the source.
    pub src: Option<String>,
    /// Image layers: replace the filter bundle.
    pub filters: Option<ImageFilters>,
    /// Text layers: replace the content.
    pub content: Option<String>,
    /// Text layers: replace the text style.
    pub text_style: Option<TextStyle>,
    /// Shape layers: replace the fill color.
    pub fill: Option<Color>,
}

impl LayerPatch {
    /// Patch that moves the layer to a new position.
    pub fn move_to(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Self::default()
        }
    }

    /// Patch that sets position and size together.
    pub fn frame(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that sets the rotation angle (radians).
    pub fn rotate(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }
}

/// Enum wrapper for all layer variants (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Layer {
    Image(ImageLayer),
    Text(TextLayer),
    Shape(ShapeLayer),
}

impl Layer {
    pub fn id(&self) -> LayerId {
        self.common().id
    }

    pub fn common(&self) -> &LayerCommon {
        match self {
            Layer::Image(l) => &l.common,
            Layer::Text(l) => &l.common,
            Layer::Shape(l) => &l.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut LayerCommon {
        match self {
            Layer::Image(l) => &mut l.common,
            Layer::Text(l) => &mut l.common,
            Layer::Shape(l) => &mut l.common,
        }
    }

    /// Axis-aligned bounding box, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        self.common().bounds()
    }

    pub fn center(&self) -> Point {
        self.common().center()
    }

    pub fn group_id(&self) -> Option<GroupId> {
        self.common().group_id
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Layer::Image(_) => "image",
            Layer::Text(_) => "text",
            Layer::Shape(_) => "shape",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Layer::Image(_))
    }

    /// Assign a fresh unique identifier. Used when duplicating layers.
    pub(crate) fn regenerate_id(&mut self) {
        self.common_mut().id = Uuid::new_v4();
    }

    /// Merge a partial update into this layer.
    pub(crate) fn apply_patch(&mut self, patch: &LayerPatch) {
        {
            let common = self.common_mut();
            if let Some(name) = &patch.name {
                common.name = name.clone();
            }
            if let Some(x) = patch.x {
                common.position.x = x;
            }
            if let Some(y) = patch.y {
                common.position.y = y;
            }
            if let Some(width) = patch.width {
                common.width = width;
            }
            if let Some(height) = patch.height {
                common.height = height;
            }
            if let Some(rotation) = patch.rotation {
                common.rotation = rotation;
            }
            if let Some(flip_x) = patch.flip_x {
                common.flip_x = flip_x;
            }
            if let Some(flip_y) = patch.flip_y {
                common.flip_y = flip_y;
            }
            if let Some(opacity) = patch.opacity {
                common.opacity = opacity;
            }
            if let Some(visible) = patch.visible {
                common.visible = visible;
            }
            if let Some(locked) = patch.locked {
                common.locked = locked;
            }
            if let Some(corner_radius) = patch.corner_radius {
                common.corner_radius = corner_radius;
            }
            if let Some(shadow) = patch.shadow {
                common.shadow = shadow;
            }
        }

        match self {
            Layer::Image(img) => {
                if let Some(src) = &patch.src {
                    img.src = src.clone();
                }
                if let Some(filters) = patch.filters {
                    img.filters = filters;
                }
            }
            Layer::Text(txt) => {
                if let Some(content) = &patch.content {
                    txt.content = content.clone();
                }
                if let Some(style) = &patch.text_style {
                    txt.style = style.clone();
                }
            }
            Layer::Shape(shp) => {
                if let Some(fill) = patch.fill {
                    shp.fill = fill;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_layer() -> Layer {
        Layer::Shape(ShapeLayer::new(
            LayerCommon::new("Shape".to_string(), Point::new(10.0, 20.0), Size::new(100.0, 50.0)),
            ShapeKind::Rectangle,
            Color::black(),
        ))
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#000000"), Some(Color::black()));
        assert_eq!(Color::from_hex("#ffffff"), Some(Color::white()));
        assert_eq!(Color::from_hex("#f00"), Some(Color::new(255, 0, 0, 255)));
        assert_eq!(Color::from_hex("#11223344"), Some(Color::new(0x11, 0x22, 0x33, 0x44)));
        assert_eq!(Color::from_hex("red"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn test_common_defaults() {
        let layer = shape_layer();
        let common = layer.common();
        assert!((common.opacity - 1.0).abs() < f64::EPSILON);
        assert!((common.flip_x - 1.0).abs() < f64::EPSILON);
        assert!((common.flip_y - 1.0).abs() < f64::EPSILON);
        assert!((common.rotation).abs() < f64::EPSILON);
        assert!(common.visible);
        assert!(!common.locked);
        assert!(common.group_id.is_none());
    }

    #[test]
    fn test_bounds() {
        let layer = shape_layer();
        let bounds = layer.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_patch_merges_only_given_fields() {
        let mut layer = shape_layer();
        layer.apply_patch(&LayerPatch {
            x: Some(50.0),
            opacity: Some(0.5),
            ..LayerPatch::default()
        });

        let common = layer.common();
        assert!((common.position.x - 50.0).abs() < f64::EPSILON);
        assert!((common.position.y - 20.0).abs() < f64::EPSILON);
        assert!((common.opacity - 0.5).abs() < f64::EPSILON);
        assert!((common.width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_patch_ignores_foreign_variant_fields() {
        let mut layer = shape_layer();
        layer.apply_patch(&LayerPatch {
            src: Some("https://example.com/a.png".to_string()),
            content: Some("hello".to_string()),
            ..LayerPatch::default()
        });

        // A shape layer has no src or text content; the patch is a no-op.
        assert_eq!(layer, shape_layer_unchanged(&layer));
    }

    fn shape_layer_unchanged(layer: &Layer) -> Layer {
        let mut copy = shape_layer();
        copy.common_mut().id = layer.id();
        copy
    }

    #[test]
    fn test_regenerate_id() {
        let mut layer = shape_layer();
        let original = layer.id();
        layer.regenerate_id();
        assert_ne!(layer.id(), original);
    }

    #[test]
    fn test_patch_clears_shadow() {
        let mut layer = shape_layer();
        layer.common_mut().shadow = Some(Shadow {
            offset_x: 2.0,
            offset_y: 2.0,
            blur: 4.0,
            color: Color::black(),
        });

        layer.apply_patch(&LayerPatch {
            shadow: Some(None),
            ..LayerPatch::default()
        });
        assert!(layer.common().shadow.is_none());
    }
}
