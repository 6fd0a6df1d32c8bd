//! Reference resolution scaling
//!
//! Every length in [`crate::Tuning`] is authored against a fixed design
//! resolution. A [`ScalingContext`] converts those reference values into the
//! current window's pixels. Radii, lengths and thresholds go through the
//! uniform factor so circles stay circular under non-uniform resizes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{REFERENCE_HEIGHT, REFERENCE_WIDTH};

/// Smallest accepted window dimension
const MIN_DIMENSION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingContext {
    reference_width: f32,
    reference_height: f32,
    width: f32,
    height: f32,
    scale_x: f32,
    scale_y: f32,
    uniform: f32,
}

impl Default for ScalingContext {
    fn default() -> Self {
        Self::new(REFERENCE_WIDTH, REFERENCE_HEIGHT)
    }
}

impl ScalingContext {
    /// Context for the default reference resolution at the given window size
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_reference(REFERENCE_WIDTH, REFERENCE_HEIGHT, width, height)
    }

    pub fn with_reference(
        reference_width: f32,
        reference_height: f32,
        width: f32,
        height: f32,
    ) -> Self {
        let mut ctx = Self {
            reference_width: clamp_dimension(reference_width),
            reference_height: clamp_dimension(reference_height),
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            uniform: 1.0,
        };
        ctx.set_dimensions(width, height);
        ctx
    }

    /// Recompute all factors for a new window size
    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.width = clamp_dimension(width);
        self.height = clamp_dimension(height);
        self.scale_x = self.width / self.reference_width;
        self.scale_y = self.height / self.reference_height;
        self.uniform = self.scale_x.min(self.scale_y);
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn reference_size(&self) -> (f32, f32) {
        (self.reference_width, self.reference_height)
    }

    #[inline]
    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    #[inline]
    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    #[inline]
    pub fn uniform_scale(&self) -> f32 {
        self.uniform
    }

    /// Scale an isotropic length (radius, offset, threshold)
    #[inline]
    pub fn uniform(&self, value: f32) -> f32 {
        value * self.uniform
    }

    #[inline]
    pub fn x(&self, value: f32) -> f32 {
        value * self.scale_x
    }

    #[inline]
    pub fn y(&self, value: f32) -> f32 {
        value * self.scale_y
    }

    /// Font sizes follow the uniform factor
    #[inline]
    pub fn font(&self, base: f32) -> f32 {
        base * self.uniform
    }

    /// Screen position given as fractions of the current window
    #[inline]
    pub fn ratio_point(&self, rx: f32, ry: f32) -> Vec2 {
        Vec2::new(self.width * rx, self.height * ry)
    }
}

fn clamp_dimension(value: f32) -> f32 {
    if value.is_finite() {
        value.max(MIN_DIMENSION)
    } else {
        MIN_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_size_is_identity() {
        let ctx = ScalingContext::default();
        assert_eq!(ctx.uniform_scale(), 1.0);
        assert_eq!(ctx.uniform(280.0), 280.0);
    }

    #[test]
    fn test_half_scale() {
        let ctx = ScalingContext::new(540.0, 960.0);
        assert!((ctx.uniform(280.0) - 140.0).abs() < 1e-4);
        assert!((ctx.x(100.0) - 50.0).abs() < 1e-4);
        assert!((ctx.y(100.0) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_uses_smaller_axis() {
        // Wide window: height limits the uniform factor
        let ctx = ScalingContext::new(2160.0, 960.0);
        assert!((ctx.scale_x() - 2.0).abs() < 1e-6);
        assert!((ctx.scale_y() - 0.5).abs() < 1e-6);
        assert!((ctx.uniform_scale() - 0.5).abs() < 1e-6);
        assert!((ctx.font(48.0) - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_dimensions_clamped() {
        let mut ctx = ScalingContext::default();
        ctx.set_dimensions(0.0, -20.0);
        assert!(ctx.width() > 0.0);
        assert!(ctx.height() > 0.0);
        assert!(ctx.uniform_scale() > 0.0);

        ctx.set_dimensions(f32::NAN, 1920.0);
        assert!(ctx.uniform_scale().is_finite());
    }

    #[test]
    fn test_ratio_point() {
        let ctx = ScalingContext::new(540.0, 960.0);
        let p = ctx.ratio_point(0.5, 0.25);
        assert_eq!(p, Vec2::new(270.0, 240.0));
    }
}
