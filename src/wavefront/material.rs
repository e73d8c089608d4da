//! Materials as described by a Wavefront `.mtl` file.

use std::collections::HashMap;
use std::sync::Arc;

use crate::color::ColorRGB;

/// Materials of one or more libraries, keyed by material name.
pub type MaterialLibrary = HashMap<String, Arc<ExternalMaterial>>;

/// A material exactly as declared by one `newmtl` block.
///
/// Every attribute is optional because MTL files only list what they set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalMaterial {
    pub name: String,
    /// `Ns`
    pub specular_weight: Option<f32>,
    /// `Ka`
    pub ambient_color: Option<ColorRGB>,
    /// `Kd`
    pub diffuse_color: Option<ColorRGB>,
    /// `Ks`
    pub specular_color: Option<ColorRGB>,
    /// `Ke`
    pub emissive_color: Option<ColorRGB>,
    /// `Ni`
    pub optical_density: Option<f32>,
    /// `d`, or `1 - Tr`
    pub dissolve: Option<f32>,
    /// `illum`
    pub illumination: Option<i32>,
    /// `Tf`
    pub transmission_filter: Option<ColorRGB>,
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub ambient_texture: Option<String>,
    pub bump_texture: Option<String>,
    pub dissolve_texture: Option<String>,
}

impl ExternalMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// True when a non-empty diffuse texture file is referenced.
    pub fn has_diffuse_texture(&self) -> bool {
        self.diffuse_texture
            .as_deref()
            .is_some_and(|file| !file.is_empty())
    }
}
