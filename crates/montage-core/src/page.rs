//! Page model: an ordered stack of layers.

use crate::layer::{Color, Layer, LayerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageBackground {
    Color(Color),
    Image { src: String },
}

/// A single composition page.
///
/// Layer order is paint order (back to front) and always matches ascending
/// `z_index` after any reorder operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: Uuid,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub background: Option<PageBackground>,
}

impl Page {
    /// Create a new empty page.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            layers: Vec::new(),
            background: None,
        }
    }

    /// Get a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    /// Get a mutable reference to a layer by id.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    /// Find a layer's position in the paint-order list.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Rewrite every layer's z_index to its list position + 1, restoring the
    /// dense-permutation invariant after a reorder.
    pub fn normalize_z_indices(&mut self) {
        for (index, layer) in self.layers.iter_mut().enumerate() {
            layer.common_mut().z_index = index + 1;
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerCommon, ShapeKind, ShapeLayer};
    use kurbo::{Point, Size};

    fn layer(name: &str) -> Layer {
        Layer::Shape(ShapeLayer::new(
            LayerCommon::new(name.to_string(), Point::ZERO, Size::new(10.0, 10.0)),
            ShapeKind::Rectangle,
            Color::black(),
        ))
    }

    #[test]
    fn test_lookup_by_id() {
        let mut page = Page::new();
        let a = layer("a");
        let id = a.id();
        page.layers.push(a);

        assert!(page.layer(id).is_some());
        assert_eq!(page.index_of(id), Some(0));
        assert!(page.layer(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_normalize_z_indices() {
        let mut page = Page::new();
        page.layers.push(layer("a"));
        page.layers.push(layer("b"));
        page.layers.push(layer("c"));
        page.layers.swap(0, 2);

        page.normalize_z_indices();

        let zs: Vec<usize> = page.layers.iter().map(|l| l.common().z_index).collect();
        assert_eq!(zs, vec![1, 2, 3]);
    }
}
