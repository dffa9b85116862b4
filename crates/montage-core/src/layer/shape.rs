//! Vector shape layer.

use super::{Color, LayerCommon};
use serde::{Deserialize, Serialize};

/// Shape primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
}

/// A filled vector shape layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeLayer {
    pub common: LayerCommon,
    pub kind: ShapeKind,
    pub fill: Color,
}

impl ShapeLayer {
    pub fn new(common: LayerCommon, kind: ShapeKind, fill: Color) -> Self {
        Self { common, kind, fill }
    }
}
