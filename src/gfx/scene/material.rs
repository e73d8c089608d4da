//! # Materials
//!
//! Resolved lighting parameters for one uploaded sub-mesh, and the groupings
//! the entity pass iterates over.
//!
//! - [`Material`] - diffuse lighting plus shine and flags
//! - [`RawModelMaterial`] - a device mesh paired with its material
//! - [`MaterialGroup`] - the sub-meshes of one logical mesh part

use crate::color::ColorRGBA;
use crate::gfx::render_api::{RawModel, TextureId};
use crate::wavefront::ExternalMaterial;

/// How the diffuse colour of a surface is obtained.
///
/// Texture and constant colour are exclusive: a textured surface has weight
/// 1.0 and a transparent constant colour, a flat surface has weight 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffuseLighting {
    /// Texture file to load, when the surface is textured
    pub texture_file: Option<String>,
    /// Loaded texture, once uploaded
    pub texture: Option<TextureId>,
    pub texture_weight: f32,
    pub color: ColorRGBA,
    /// Colour drawn when the texture cannot be loaded: `Kd`, else opaque white
    pub fallback_color: ColorRGBA,
}

impl Default for DiffuseLighting {
    fn default() -> Self {
        Self {
            texture_file: None,
            texture: None,
            texture_weight: 0.0,
            color: ColorRGBA::TRANSPARENT,
            fallback_color: ColorRGBA::WHITE,
        }
    }
}

impl DiffuseLighting {
    /// Resolves the diffuse component of an external material.
    ///
    /// # Returns
    ///
    /// * textured: weight 1.0, fully transparent constant colour
    /// * untextured: weight 0.0, colour = `Kd` (transparent when absent)
    pub fn from_external(external: &ExternalMaterial) -> Self {
        let kd = external.diffuse_color.map(ColorRGBA::from);
        if external.has_diffuse_texture() {
            Self {
                texture_file: external.diffuse_texture.clone(),
                texture: None,
                texture_weight: 1.0,
                color: ColorRGBA::TRANSPARENT,
                fallback_color: kd.unwrap_or(ColorRGBA::WHITE),
            }
        } else {
            Self {
                texture_file: None,
                texture: None,
                texture_weight: 0.0,
                color: kd.unwrap_or(ColorRGBA::TRANSPARENT),
                fallback_color: kd.unwrap_or(ColorRGBA::WHITE),
            }
        }
    }

    /// Attaches the uploaded texture. When the texture could not be loaded
    /// the surface turns flat, drawn with the fallback colour.
    pub fn attach_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
        if texture.is_none() && self.texture_weight > 0.0 {
            self.texture_weight = 0.0;
            self.color = self.fallback_color;
        }
    }

    pub fn is_textured(&self) -> bool {
        self.texture_weight > 0.0
    }
}

/// Lighting parameters of a sub-mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: DiffuseLighting,
    pub shine_damper: f32,
    pub reflectivity: f32,
    /// Rendered without back-face culling
    pub has_transparency: bool,
    /// Lighting uses an up-pointing normal (grass, ferns)
    pub normals_pointing_up: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse: DiffuseLighting::default(),
            shine_damper: 1.0,
            reflectivity: 0.0,
            has_transparency: false,
            normals_pointing_up: false,
        }
    }
}

impl Material {
    /// Builds a material from an external one; `None` gives the defaults.
    pub fn from_external(external: Option<&ExternalMaterial>) -> Self {
        match external {
            Some(external) => Self {
                name: external.name.clone(),
                diffuse: DiffuseLighting::from_external(external),
                ..Default::default()
            },
            None => Self::default(),
        }
    }

    pub fn with_shine(mut self, shine_damper: f32, reflectivity: f32) -> Self {
        self.shine_damper = shine_damper;
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_transparency(mut self, has_transparency: bool) -> Self {
        self.has_transparency = has_transparency;
        self
    }

    pub fn with_normals_pointing_up(mut self, up: bool) -> Self {
        self.normals_pointing_up = up;
        self
    }
}

/// A device mesh and the material it is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct RawModelMaterial {
    pub model: RawModel,
    pub material: Material,
}

impl RawModelMaterial {
    pub fn new(model: RawModel, material: Material) -> Self {
        Self { model, material }
    }
}

/// Ordered sub-meshes sharing one group name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialGroup {
    pub name: String,
    pub materials: Vec<RawModelMaterial>,
}

impl MaterialGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
        }
    }

    pub fn push(&mut self, item: RawModelMaterial) {
        self.materials.push(item);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawModelMaterial> {
        self.materials.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, RawModelMaterial> {
        self.materials.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorRGB;

    #[test]
    fn test_textured_material_ignores_diffuse_color() {
        let mut external = ExternalMaterial::new("A");
        external.diffuse_texture = Some("head.png".into());
        external.diffuse_color = Some(ColorRGB::new(1.0, 0.0, 0.0));

        let material = Material::from_external(Some(&external));
        assert_eq!(material.diffuse.texture_weight, 1.0);
        assert_eq!(material.diffuse.color, ColorRGBA::TRANSPARENT);
        assert_eq!(material.diffuse.texture_file.as_deref(), Some("head.png"));
    }

    #[test]
    fn test_flat_material_uses_kd() {
        let mut external = ExternalMaterial::new("B");
        external.diffuse_color = Some(ColorRGB::new(0.2, 0.3, 0.4));

        let material = Material::from_external(Some(&external));
        assert_eq!(material.diffuse.texture_weight, 0.0);
        assert_eq!(material.diffuse.color, ColorRGBA::new(0.2, 0.3, 0.4, 1.0));
        assert!(material.diffuse.texture_file.is_none());
    }

    #[test]
    fn test_flat_material_without_kd_is_transparent() {
        let material = Material::from_external(Some(&ExternalMaterial::new("C")));
        assert_eq!(material.diffuse.texture_weight, 0.0);
        assert_eq!(material.diffuse.color, ColorRGBA::TRANSPARENT);
    }

    #[test]
    fn test_empty_texture_name_counts_as_untextured() {
        let mut external = ExternalMaterial::new("D");
        external.diffuse_texture = Some(String::new());
        assert_eq!(DiffuseLighting::from_external(&external).texture_weight, 0.0);
    }

    #[test]
    fn test_defaults_and_builders() {
        let material = Material::from_external(None);
        assert_eq!(material.shine_damper, 1.0);
        assert_eq!(material.reflectivity, 0.0);
        assert!(!material.has_transparency);
        assert!(!material.normals_pointing_up);

        let material = material
            .with_shine(10.0, 1.0)
            .with_transparency(true)
            .with_normals_pointing_up(true);
        assert_eq!((material.shine_damper, material.reflectivity), (10.0, 1.0));
        assert!(material.has_transparency && material.normals_pointing_up);
    }

    #[test]
    fn test_failed_texture_falls_back_to_flat() {
        let mut external = ExternalMaterial::new("A");
        external.diffuse_texture = Some("head.png".into());
        let mut diffuse = DiffuseLighting::from_external(&external);
        diffuse.attach_texture(None);
        assert!(!diffuse.is_textured());
        assert_eq!(diffuse.color, ColorRGBA::WHITE);

        external.diffuse_color = Some(ColorRGB::new(0.2, 0.6, 0.2));
        let mut diffuse = DiffuseLighting::from_external(&external);
        assert_eq!(diffuse.color, ColorRGBA::TRANSPARENT);
        diffuse.attach_texture(None);
        assert_eq!(diffuse.texture_weight, 0.0);
        assert_eq!(diffuse.color, ColorRGBA::new(0.2, 0.6, 0.2, 1.0));

        let mut diffuse = DiffuseLighting::from_external(&external);
        diffuse.attach_texture(Some(TextureId(3)));
        assert!(diffuse.is_textured());
    }
}
