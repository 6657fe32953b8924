// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Visual style of boundary polygons.

/// Stroke and fill settings for one boundary layer.
///
/// The active style is also the "rest" state that hover transitions return to.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryStyle {
    pub stroke_color: String,
    pub stroke_weight: f64,
    pub stroke_opacity: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
    /// Polyline simplification applied by the renderer (higher = smoother)
    pub smooth_factor: f64,
}

impl BoundaryStyle {
    /// Dark borders with a light blue, mostly transparent fill.
    pub fn region() -> Self {
        Self {
            stroke_color: "#2c3e50".to_string(),
            stroke_weight: 1.5,
            stroke_opacity: 0.8,
            fill_color: "#3498db".to_string(),
            fill_opacity: 0.15,
            smooth_factor: 1.5,
        }
    }

    /// Single color, opaque stroke.
    pub fn simple() -> Self {
        Self {
            stroke_color: "#3388ff".to_string(),
            stroke_weight: 2.0,
            stroke_opacity: 1.0,
            fill_color: "#3388ff".to_string(),
            fill_opacity: 0.1,
            smooth_factor: 1.0,
        }
    }

    /// Same style with a different fill opacity.
    pub fn with_fill_opacity(&self, fill_opacity: f64) -> Self {
        Self {
            fill_opacity,
            ..self.clone()
        }
    }
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        Self::region()
    }
}
