//! Image layer.

use super::LayerCommon;
use serde::{Deserialize, Serialize};

/// Filter bundle applied to an image layer.
///
/// Defaults are the identity: the image renders untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFilters {
    /// Brightness multiplier (1.0 = unchanged).
    pub brightness: f64,
    /// Contrast multiplier (1.0 = unchanged).
    pub contrast: f64,
    /// Saturation multiplier (1.0 = unchanged).
    pub saturation: f64,
    /// Blur radius in canvas units (0.0 = none).
    pub blur: f64,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            blur: 0.0,
        }
    }
}

impl ImageFilters {
    /// Check whether this bundle leaves the image untouched.
    pub fn is_identity(&self) -> bool {
        (self.brightness - 1.0).abs() < f64::EPSILON
            && (self.contrast - 1.0).abs() < f64::EPSILON
            && (self.saturation - 1.0).abs() < f64::EPSILON
            && self.blur.abs() < f64::EPSILON
    }
}

/// A raster image layer.
///
/// The source string is opaque to the core (a URL or data URI); decoding and
/// painting are the renderer's concern. External collaborators replace `src`
/// through `DocumentStore::update_layer` (e.g. after an upscale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    pub common: LayerCommon,
    pub src: String,
    #[serde(default)]
    pub filters: ImageFilters,
}

impl ImageLayer {
    pub fn new(common: LayerCommon, src: String) -> Self {
        Self {
            common,
            src,
            filters: ImageFilters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_are_identity() {
        assert!(ImageFilters::default().is_identity());

        let tweaked = ImageFilters {
            brightness: 1.2,
            ..ImageFilters::default()
        };
        assert!(!tweaked.is_identity());
    }
}
