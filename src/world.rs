//! # World
//!
//! The scene gameplay updates and the renderer draws, and the generator that
//! builds it from resources.
//!
//! Generation loads the terrain textures and heightmap, uploads one
//! [`GenericEntity`] per spawn kind and scatters its instances over the
//! terrain, then adds the player, lights, skybox and GUI overlays. A model
//! that does not exist skips its kind; a malformed one fails generation.

use std::collections::HashSet;
use std::rc::Rc;

use cgmath::{Vector2, Vector3};
use log::{debug, info, warn};
use rand::Rng;

use crate::color::ColorRGB;
use crate::config::EngineConfig;
use crate::error::GroveError;
use crate::gfx::camera::{Camera, ThirdPersonCamera};
use crate::gfx::render_api::LoaderRenderApi;
use crate::gfx::scene::skybox::{SKYBOX_FACES, SKYBOX_SIZE};
use crate::gfx::scene::{
    Entity, EntityKind, GenericEntity, GuiTexture, HeightGrid, Light, Player, SkyBox, Terrain,
    TerrainHeight, TerrainTexturesPack,
};
use crate::input::{GamePadKey, InputState};
use crate::loader::{Loader, MaterialOptions};
use crate::resources::ResourceProvider;
use crate::wavefront::ObjOptions;

pub const HEIGHT_MAP: &str = "textures/height_map.png";
pub const LOGO: &str = "textures/logo.png";

/// How many instances of a model kind to scatter, and how.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySpawn {
    pub kind: EntityKind,
    pub count: usize,
    /// Upper bound of the random instance scale
    pub scale: f32,
    pub has_transparency: bool,
    pub normals_pointing_up: bool,
}

impl EntitySpawn {
    pub const fn new(kind: EntityKind, count: usize, scale: f32) -> Self {
        Self {
            kind,
            count,
            scale,
            has_transparency: false,
            normals_pointing_up: false,
        }
    }

    pub const fn with_transparency(mut self) -> Self {
        self.has_transparency = true;
        self
    }

    pub const fn with_normals_pointing_up(mut self) -> Self {
        self.normals_pointing_up = true;
        self
    }

    fn material_options(&self) -> MaterialOptions {
        MaterialOptions::default()
            .with_transparency(self.has_transparency)
            .with_normals_pointing_up(self.normals_pointing_up)
    }
}

/// The default vegetation and props.
pub const DEFAULT_SPAWNS: [EntitySpawn; 6] = [
    EntitySpawn::new(EntityKind::BananaTree, 30, 1.0).with_transparency(),
    EntitySpawn::new(EntityKind::Fern, 100, 1.0)
        .with_transparency()
        .with_normals_pointing_up(),
    EntitySpawn::new(EntityKind::Tree, 100, 10.0),
    EntitySpawn::new(EntityKind::Grass, 20, 1.0)
        .with_transparency()
        .with_normals_pointing_up(),
    EntitySpawn::new(EntityKind::Flower, 100, 1.0).with_transparency(),
    EntitySpawn::new(EntityKind::Marble, 10, 5.0),
];

/// Everything in the scene.
#[derive(Debug)]
pub struct World {
    pub terrains: Vec<Terrain>,
    pub entities: Vec<Entity>,
    pub player: Player,
    pub skybox: SkyBox,
    pub guis: Vec<GuiTexture>,
    pub lights: Vec<Light>,
    pub camera: ThirdPersonCamera,
    generics: Vec<Rc<GenericEntity>>,
}

impl World {
    /// Advances gameplay by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &mut InputState) {
        input.update_game_pad(&self.guis);
        let terrain = self.terrains.as_slice();
        self.player.update(dt, input, terrain);
        self.camera
            .update(input, self.player.position(), self.player.rot_y(), terrain);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera.camera
    }

    /// Ground height under world `(x, z)`.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.terrains.as_slice().height_at(x, z)
    }

    /// Releases every mesh and texture the world owns.
    pub fn dispose<A: LoaderRenderApi + ?Sized>(&mut self, api: &mut A) {
        for generic in self.generics.drain(..) {
            generic.dispose(api);
        }

        let mut textures = HashSet::new();
        for terrain in self.terrains.drain(..) {
            api.dispose_raw_model(terrain.model);
            textures.extend(terrain.textures.units().into_iter().flatten());
        }
        textures.extend(self.guis.drain(..).filter_map(|gui| gui.texture));
        for texture in textures {
            api.dispose_texture(texture);
        }

        self.skybox.dispose(api);
        self.entities.clear();
        debug!("World disposed");
    }
}

/// Releases what a failed generation had already uploaded.
fn release_partial<A: LoaderRenderApi + ?Sized>(
    api: &mut A,
    terrains: &[Terrain],
    generics: Vec<Rc<GenericEntity>>,
) {
    for generic in generics {
        generic.dispose(api);
    }
    let mut textures = HashSet::new();
    for terrain in terrains {
        api.dispose_raw_model(terrain.model);
        textures.extend(terrain.textures.units().into_iter().flatten());
    }
    for texture in textures {
        api.dispose_texture(texture);
    }
}

/// Builds a [`World`] from resources.
pub struct WorldGenerator<'a> {
    provider: &'a dyn ResourceProvider,
    config: EngineConfig,
    spawns: Vec<EntitySpawn>,
    touch_pad: bool,
    loader: Loader,
}

impl<'a> WorldGenerator<'a> {
    pub fn new(provider: &'a dyn ResourceProvider, config: EngineConfig) -> Self {
        Self {
            provider,
            config,
            spawns: DEFAULT_SPAWNS.to_vec(),
            touch_pad: false,
            loader: Loader::new(ObjOptions::default().with_flip_texture_v(true)),
        }
    }

    pub fn with_spawns(mut self, spawns: Vec<EntitySpawn>) -> Self {
        self.spawns = spawns;
        self
    }

    /// Adds on-screen direction and jump pads.
    pub fn with_touch_pad(mut self, enabled: bool) -> Self {
        self.touch_pad = enabled;
        self
    }

    pub fn generate<A: LoaderRenderApi + ?Sized>(mut self, api: &mut A) -> Result<World, GroveError> {
        let terrain = self.terrain(api)?;
        let terrains = vec![terrain];

        let mut generics = Vec::new();
        let mut entities = Vec::new();
        let player_generic = match self.populate(api, &terrains, &mut generics, &mut entities) {
            Ok(generic) => generic,
            Err(err) => {
                warn!("World generation failed, releasing {} loaded models", generics.len());
                release_partial(api, &terrains, generics);
                return Err(err);
            }
        };
        let start = Vector3::new(20.0, 0.0, 0.0);
        let player_entity = Entity::new(player_generic, start).with_scale(0.5);
        let player = Player::new(player_entity, self.config.player);

        let world = World {
            skybox: SkyBox::load(api, &SKYBOX_FACES, SKYBOX_SIZE),
            guis: self.guis(api),
            lights: lights(),
            camera: ThirdPersonCamera::new(self.config.camera),
            terrains,
            entities,
            player,
            generics,
        };
        info!(
            "World generated: {} terrains, {} entities, {} guis",
            world.terrains.len(),
            world.entities.len(),
            world.guis.len()
        );
        Ok(world)
    }

    /// Loads every spawn kind and scatters its entities, then loads the
    /// player model. Loaded generic entities land in `generics` even on error.
    fn populate<A: LoaderRenderApi + ?Sized>(
        &mut self,
        api: &mut A,
        terrains: &[Terrain],
        generics: &mut Vec<Rc<GenericEntity>>,
        entities: &mut Vec<Entity>,
    ) -> Result<Rc<GenericEntity>, GroveError> {
        let mut rng = rand::rng();
        for spawn in self.spawns.clone() {
            let Some(generic) = self.generic_entity(api, spawn.kind, spawn.material_options())? else {
                continue;
            };
            for _ in 0..spawn.count {
                let x = 20.0 + rng.random::<f32>() * 400.0;
                let z = rng.random::<f32>() * 400.0;
                let y = terrains.height_at(x, z);
                let entity = Entity::new(Rc::clone(&generic), Vector3::new(x, y, z))
                    .with_scale(rng.random::<f32>() * spawn.scale);
                entities.push(entity);
            }
            generics.push(generic);
        }

        let player_generic = self
            .generic_entity(api, EntityKind::Player, MaterialOptions::default())?
            .unwrap_or_else(|| Rc::new(GenericEntity::new(EntityKind::Player)));
        generics.push(Rc::clone(&player_generic));
        Ok(player_generic)
    }

    fn terrain<A: LoaderRenderApi + ?Sized>(&self, api: &mut A) -> Result<Terrain, GroveError> {
        let config = &self.config.terrain;
        let heights = match self.provider.texture_data(HEIGHT_MAP) {
            Ok(image) => HeightGrid::from_heightmap(&image, config),
            Err(err) if err.is_missing() => {
                warn!("`{HEIGHT_MAP}` not found, terrain is flat");
                HeightGrid::flat(config.vertex_count)
            }
            Err(err) => return Err(err.into()),
        };
        let textures = TerrainTexturesPack::load(api);
        Ok(Terrain::new(api, 0, 0, heights, textures, config.size))
    }

    fn generic_entity<A: LoaderRenderApi + ?Sized>(
        &mut self,
        api: &mut A,
        kind: EntityKind,
        options: MaterialOptions,
    ) -> Result<Option<Rc<GenericEntity>>, GroveError> {
        match self
            .loader
            .load_generic_entity(api, self.provider, kind, options)
        {
            Ok(generic) => Ok(Some(Rc::new(generic))),
            Err(err) if err.is_missing_resource() => {
                warn!("{kind:?} skipped: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn guis<A: LoaderRenderApi + ?Sized>(&self, api: &mut A) -> Vec<GuiTexture> {
        let mut guis = vec![GuiTexture::new(
            api.load_texture(LOGO, false),
            Vector2::new(0.0, 0.9),
            Vector2::new(0.1, 0.1),
        )];
        if self.touch_pad {
            let pads = [
                ("up", GamePadKey::Up, -0.8, -0.5),
                ("down", GamePadKey::Down, -0.8, -0.9),
                ("left", GamePadKey::Left, -0.9, -0.7),
                ("right", GamePadKey::Right, -0.7, -0.7),
                ("x", GamePadKey::X, 0.8, -0.7),
            ];
            for (name, key, x, y) in pads {
                let texture = api.load_texture(&format!("textures/pad/{name}.png"), false);
                guis.push(
                    GuiTexture::new(texture, Vector2::new(x, y), Vector2::new(0.1, 0.1))
                        .with_key(key),
                );
            }
        }
        guis
    }
}

/// The sun plus a red, a green and a blue light above the origin.
fn lights() -> Vec<Light> {
    let position = Vector3::new(10.0, 100.0, 10.0);
    vec![
        Light::new(position, ColorRGB::WHITE),
        Light::new(position, ColorRGB::new(1.0, 0.0, 0.0)),
        Light::new(position, ColorRGB::new(0.0, 1.0, 0.0)),
        Light::new(position, ColorRGB::new(0.0, 0.0, 1.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::headless::HeadlessDevice;
    use crate::resources::{MemoryResourceProvider, TextureData};

    const QUAD_OBJ: &str = "\
mtllib leaf.mtl
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
g leaf
usemtl green
f 1/1/1 2/2/1 3/3/1
";

    const LEAF_MTL: &str = "newmtl green\nmap_Kd leaf.png\n";

    fn provider() -> MemoryResourceProvider {
        MemoryResourceProvider::new()
            .with_text("models/fern.obj", QUAD_OBJ)
            .with_text("models/player.obj", QUAD_OBJ)
            .with_text("leaf.mtl", LEAF_MTL)
    }

    fn small_config() -> EngineConfig {
        let config = EngineConfig::default();
        config.with_terrain(config.terrain.with_vertex_count(8))
    }

    #[test]
    fn test_missing_models_are_skipped() {
        let provider = provider();
        let mut device = HeadlessDevice::new();
        let world = WorldGenerator::new(&provider, small_config())
            .generate(&mut device)
            .unwrap();

        // only ferns have a model
        assert_eq!(world.entities.len(), 100);
        assert!(world.entities.iter().all(|e| e.kind() == EntityKind::Fern));
        assert!(world
            .entities
            .iter()
            .all(|e| e.scale >= 0.0 && e.scale <= 1.0));
        assert_eq!(world.lights.len(), 4);
        assert_eq!(world.guis.len(), 1);
        assert_eq!(world.terrains.len(), 1);
    }

    #[test]
    fn test_malformed_model_fails() {
        let provider = provider().with_text("models/tree.obj", "v 0 zero 0\n");
        let mut device = HeadlessDevice::new();
        let result = WorldGenerator::new(&provider, small_config()).generate(&mut device);
        assert!(matches!(result, Err(GroveError::Parse(_))));
        // terrain and the fern loaded before the tree are released again
        assert_eq!(device.live_models(), 0);
        assert_eq!(device.live_textures(), 0);
    }

    #[test]
    fn test_malformed_player_releases_spawns() {
        let provider = provider().with_text("models/player.obj", "f 1 2 3\n");
        let mut device = HeadlessDevice::new();
        let result = WorldGenerator::new(&provider, small_config())
            .with_spawns(vec![EntitySpawn::new(EntityKind::Fern, 4, 1.0)])
            .generate(&mut device);
        assert!(result.is_err());
        assert_eq!(device.live_models(), 0);
        assert_eq!(device.live_textures(), 0);
    }

    #[test]
    fn test_entities_sit_on_terrain() {
        let values: Vec<u32> = (0..64).map(|i| (i * 260_000) as u32).collect();
        let provider = provider().with_texture(HEIGHT_MAP, TextureData::from_rgb_values(8, 8, &values));
        let mut device = HeadlessDevice::new();
        let world = WorldGenerator::new(&provider, small_config())
            .with_spawns(vec![EntitySpawn::new(EntityKind::Fern, 25, 1.0)])
            .generate(&mut device)
            .unwrap();
        for entity in &world.entities {
            let p = entity.position;
            assert_eq!(p.y, world.height_at(p.x, p.z));
        }
    }

    #[test]
    fn test_update_keeps_player_on_ground() {
        let provider = provider();
        let mut device = HeadlessDevice::new();
        let mut world = WorldGenerator::new(&provider, small_config())
            .with_spawns(Vec::new())
            .generate(&mut device)
            .unwrap();
        let mut input = InputState::new();
        input.set_key(GamePadKey::Up, true);
        for _ in 0..60 {
            world.update(1.0 / 60.0, &mut input);
            input.end_frame();
        }
        let p = world.player.position();
        assert!(p.z > 19.0);
        assert!(p.y >= world.height_at(p.x, p.z));
        assert!(world.camera().position.z < p.z);
    }

    #[test]
    fn test_touch_pad_drives_player() {
        let provider = provider();
        let mut device = HeadlessDevice::new();
        let mut world = WorldGenerator::new(&provider, small_config())
            .with_spawns(Vec::new())
            .with_touch_pad(true)
            .generate(&mut device)
            .unwrap();
        let mut input = InputState::new();
        input.set_pointer(Some((-0.8, -0.5)));
        world.update(0.5, &mut input);
        assert!(input.is_pressed(GamePadKey::Up));
        assert!(world.player.position().z > 0.0);
    }

    #[test]
    fn test_dispose_releases_everything() {
        let provider = provider();
        let mut device = HeadlessDevice::new();
        let mut world = WorldGenerator::new(&provider, small_config())
            .with_touch_pad(true)
            .generate(&mut device)
            .unwrap();
        assert!(device.live_models() > 0);
        assert!(device.live_textures() > 0);

        world.dispose(&mut device);
        assert_eq!(device.live_models(), 0);
        assert_eq!(device.live_textures(), 0);
    }
}
