//! RGB and RGBA colour values as used by materials, lights and the sky.

use cgmath::Vector3;

/// An opaque RGB colour with float components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorRGB {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorRGB {
    pub const BLACK: ColorRGB = ColorRGB::new(0.0, 0.0, 0.0);
    pub const WHITE: ColorRGB = ColorRGB::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Extends the colour with an alpha component.
    pub fn with_alpha(self, a: f32) -> ColorRGBA {
        ColorRGBA::new(self.r, self.g, self.b, a)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for ColorRGB {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<ColorRGB> for Vector3<f32> {
    fn from(c: ColorRGB) -> Self {
        Vector3::new(c.r, c.g, c.b)
    }
}

/// An RGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorRGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRGBA {
    /// Fully transparent black, used when a texture supplies the diffuse colour.
    pub const TRANSPARENT: ColorRGBA = ColorRGBA::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: ColorRGBA = ColorRGBA::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0.0
    }

    pub fn rgb(&self) -> ColorRGB {
        ColorRGB::new(self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<ColorRGB> for ColorRGBA {
    fn from(c: ColorRGB) -> Self {
        c.with_alpha(1.0)
    }
}
