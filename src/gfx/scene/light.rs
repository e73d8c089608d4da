//! Point lights.

use cgmath::Vector3;

use crate::color::ColorRGB;

/// A point light. Lit programs upload up to
/// [`MAX_LIGHTS`](crate::gfx::shaders::MAX_LIGHTS) of them per pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    pub color: ColorRGB,
}

impl Light {
    pub fn new(position: Vector3<f32>, color: ColorRGB) -> Self {
        Self { position, color }
    }
}
