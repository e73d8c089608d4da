//! # Loader
//!
//! Turns parsed shapes into device-resident entities: every shape becomes a
//! [`RawModelMaterial`] in the [`MaterialGroup`](crate::gfx::scene::MaterialGroup)
//! named after its group, with its material resolved from the MTL data and
//! its diffuse texture uploaded once per distinct file.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::GroveError;
use crate::gfx::render_api::{LoaderRenderApi, TextureId};
use crate::gfx::scene::{EntityKind, GenericEntity, Material, RawModelMaterial};
use crate::resources::{ResourceProvider, ShapeCache};
use crate::wavefront::{ObjOptions, Shape};

/// Directory diffuse texture names are resolved against.
pub const TEXTURE_DIR: &str = "textures";

/// Per-kind material flags and shine applied on top of the MTL data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialOptions {
    pub shine_damper: f32,
    pub reflectivity: f32,
    pub has_transparency: bool,
    pub normals_pointing_up: bool,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            shine_damper: 10.0,
            reflectivity: 1.0,
            has_transparency: false,
            normals_pointing_up: false,
        }
    }
}

impl MaterialOptions {
    pub fn with_transparency(mut self, has_transparency: bool) -> Self {
        self.has_transparency = has_transparency;
        self
    }

    pub fn with_normals_pointing_up(mut self, up: bool) -> Self {
        self.normals_pointing_up = up;
        self
    }
}

/// Resolved material of a shape, before its texture is uploaded.
pub fn resolve_material(shape: &Shape, options: MaterialOptions) -> Material {
    Material::from_external(shape.material.as_deref())
        .with_shine(options.shine_damper, options.reflectivity)
        .with_transparency(options.has_transparency)
        .with_normals_pointing_up(options.normals_pointing_up)
}

/// Uploads `shapes` as a generic entity of `kind`.
pub fn build_generic_entity<A: LoaderRenderApi + ?Sized>(
    api: &mut A,
    kind: EntityKind,
    shapes: &[Shape],
    options: MaterialOptions,
) -> GenericEntity {
    let mut generic = GenericEntity::new(kind);
    let mut textures: HashMap<String, Option<TextureId>> = HashMap::new();

    for shape in shapes {
        let model = api.load_to_raw_model(shape);
        let mut material = resolve_material(shape, options);
        if let Some(file) = material.diffuse.texture_file.clone() {
            let texture = *textures.entry(file).or_insert_with_key(|file| {
                let path = format!("{TEXTURE_DIR}/{file}");
                let texture = api.load_texture(&path, true);
                if texture.is_none() {
                    warn!("{kind:?}: texture `{path}` not found, using flat colour");
                }
                texture
            });
            material.diffuse.attach_texture(texture);
        }
        generic.add(&shape.group_name, RawModelMaterial::new(model, material));
    }

    debug!(
        "Built {kind:?}: {} groups, {} textures",
        generic.groups().len(),
        generic.textures().len()
    );
    generic
}

/// Loads entity models through a [`ShapeCache`].
#[derive(Debug)]
pub struct Loader {
    cache: ShapeCache,
    options: ObjOptions,
}

impl Loader {
    pub fn new(options: ObjOptions) -> Self {
        Self {
            cache: ShapeCache::new(),
            options,
        }
    }

    /// Parses (or reuses) the model of `kind` and uploads it.
    pub fn load_generic_entity<A: LoaderRenderApi + ?Sized>(
        &mut self,
        api: &mut A,
        provider: &dyn ResourceProvider,
        kind: EntityKind,
        options: MaterialOptions,
    ) -> Result<GenericEntity, GroveError> {
        let shapes = self
            .cache
            .get_or_load(kind.model_name(), provider, self.options)?;
        Ok(build_generic_entity(api, kind, &shapes, options))
    }

    pub fn cache(&self) -> &ShapeCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorRGBA;
    use crate::gfx::headless::HeadlessDevice;
    use crate::resources::MemoryResourceProvider;

    const PLAYER_OBJ: &str = "\
mtllib player.mtl
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
g head
usemtl A
f 1/1/1 2/2/1 3/3/1
g body
usemtl B
f 2/2/1 4/3/1 3/1/1
g head
usemtl C
f 1/1/1 2/2/1 4/3/1
";

    const PLAYER_MTL: &str = "\
newmtl A
map_Kd skin.png
newmtl B
Kd 0.2 0.3 0.4
newmtl C
Kd 0.2 0.6 0.2
map_Kd skin.png
";

    fn provider() -> MemoryResourceProvider {
        MemoryResourceProvider::new()
            .with_text("models/player.obj", PLAYER_OBJ)
            .with_text("player.mtl", PLAYER_MTL)
    }

    #[test]
    fn test_groups_and_materials() {
        let mut device = HeadlessDevice::new();
        let mut loader = Loader::new(ObjOptions::default());
        let generic = loader
            .load_generic_entity(&mut device, &provider(), EntityKind::Player, MaterialOptions::default())
            .unwrap();

        let names: Vec<&str> = generic.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["head", "body"]);
        let head = generic.group("head").unwrap();
        assert_eq!(head.len(), 2);
        for item in head.iter() {
            assert_eq!(item.material.diffuse.texture_weight, 1.0);
            assert_eq!(item.material.diffuse.color, ColorRGBA::TRANSPARENT);
            assert!(item.material.diffuse.texture.is_some());
            assert_eq!(item.material.shine_damper, 10.0);
        }
        let body = generic.group("body").unwrap().iter().next().unwrap();
        assert_eq!(body.material.diffuse.texture_weight, 0.0);
        assert_eq!(body.material.diffuse.color, ColorRGBA::new(0.2, 0.3, 0.4, 1.0));

        // one upload for the shared texture, three meshes
        assert_eq!(generic.textures().len(), 1);
        assert_eq!(device.live_textures(), 1);
        assert_eq!(device.live_models(), 3);
    }

    #[test]
    fn test_missing_texture_falls_back_to_colour() {
        let mut device = HeadlessDevice::new().with_missing_texture("textures/skin.png");
        let mut loader = Loader::new(ObjOptions::default());
        let generic = loader
            .load_generic_entity(&mut device, &provider(), EntityKind::Player, MaterialOptions::default())
            .unwrap();
        let head: Vec<_> = generic.group("head").unwrap().iter().collect();
        for item in &head {
            assert_eq!(item.material.diffuse.texture, None);
            assert_eq!(item.material.diffuse.texture_weight, 0.0);
        }
        // A has no Kd and turns opaque white, C keeps its Kd
        assert_eq!(head[0].material.diffuse.color, ColorRGBA::WHITE);
        assert_eq!(head[1].material.diffuse.color, ColorRGBA::new(0.2, 0.6, 0.2, 1.0));
        assert!(head.iter().all(|i| !i.material.diffuse.color.is_transparent()));
        assert_eq!(device.live_textures(), 0);
    }

    #[test]
    fn test_flags_and_cache_reuse() {
        let mut device = HeadlessDevice::new();
        let mut loader = Loader::new(ObjOptions::default());
        let options = MaterialOptions::default()
            .with_transparency(true)
            .with_normals_pointing_up(true);
        let first = loader
            .load_generic_entity(&mut device, &provider(), EntityKind::Player, options)
            .unwrap();
        assert!(first
            .raw_model_materials()
            .all(|i| i.material.has_transparency && i.material.normals_pointing_up));

        loader
            .load_generic_entity(&mut device, &provider(), EntityKind::Player, options)
            .unwrap();
        assert_eq!(loader.cache().len(), 1);
    }

    #[test]
    fn test_missing_model() {
        let mut device = HeadlessDevice::new();
        let mut loader = Loader::new(ObjOptions::default());
        let err = loader
            .load_generic_entity(&mut device, &provider(), EntityKind::Fern, MaterialOptions::default())
            .unwrap_err();
        assert!(err.is_missing_resource());
        assert_eq!(device.live_models(), 0);
    }
}
