//! Per-kind shader programs with the load helpers the render passes use.

use std::ops::Deref;

use cgmath::{Matrix4, Vector2};

use super::manager::ShaderManager;
use super::uniforms::{EntityUniform, GuiUniform, SkyBoxUniform, TerrainUniform};
use super::{ShaderKind, ShaderSource};
use crate::color::ColorRGBA;
use crate::gfx::render_api::{ShaderApi, VertexAttribute};
use crate::gfx::scene::light::Light;
use crate::math;

/// Program used for entities and the player.
#[derive(Debug)]
pub struct EntityShader {
    manager: ShaderManager<EntityUniform>,
}

impl EntityShader {
    pub fn new<A: ShaderApi + ?Sized>(source: &dyn ShaderSource, api: &mut A) -> Self {
        Self {
            manager: ShaderManager::new(ShaderKind::Entity, source, &VertexAttribute::MESH, api),
        }
    }

    pub fn manager_mut(&mut self) -> &mut ShaderManager<EntityUniform> {
        &mut self.manager
    }

    pub fn load_projection_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, m: &Matrix4<f32>) {
        self.manager.load_matrix(api, EntityUniform::ProjectionMatrix, m);
    }

    pub fn load_view_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, m: &Matrix4<f32>) {
        self.manager.load_matrix(api, EntityUniform::ViewMatrix, m);
    }

    pub fn load_transformation_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, m: &Matrix4<f32>) {
        self.manager.load_matrix(api, EntityUniform::TransformationMatrix, m);
    }

    pub fn load_lights<A: ShaderApi + ?Sized>(&self, api: &mut A, lights: &[Light]) {
        self.manager.load_lights(api, lights);
    }

    pub fn load_shine_variables<A: ShaderApi + ?Sized>(&self, api: &mut A, damper: f32, reflectivity: f32) {
        self.manager.load_float(api, EntityUniform::ShineDamper, damper);
        self.manager.load_float(api, EntityUniform::Reflectivity, reflectivity);
    }

    pub fn load_sky_color<A: ShaderApi + ?Sized>(&self, api: &mut A, color: ColorRGBA) {
        self.manager.load_color_rgba(api, EntityUniform::SkyColor, color);
    }

    pub fn load_normals_pointing_up<A: ShaderApi + ?Sized>(&self, api: &mut A, up: bool) {
        self.manager.load_bool(api, EntityUniform::NormalsPointingUp, up);
    }

    pub fn load_texture_weight<A: ShaderApi + ?Sized>(&self, api: &mut A, weight: f32) {
        self.manager.load_float(api, EntityUniform::TextureWeight, weight);
    }

    pub fn load_diffuse_color<A: ShaderApi + ?Sized>(&self, api: &mut A, color: ColorRGBA) {
        self.manager.load_color_rgba(api, EntityUniform::DiffuseColor, color);
    }
}

impl Deref for EntityShader {
    type Target = ShaderManager<EntityUniform>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

/// Program used for terrains.
#[derive(Debug)]
pub struct TerrainShader {
    manager: ShaderManager<TerrainUniform>,
}

impl TerrainShader {
    pub fn new<A: ShaderApi + ?Sized>(source: &dyn ShaderSource, api: &mut A) -> Self {
        Self {
            manager: ShaderManager::new(ShaderKind::Terrain, source, &VertexAttribute::MESH, api),
        }
    }

    pub fn manager_mut(&mut self) -> &mut ShaderManager<TerrainUniform> {
        &mut self.manager
    }

    /// Ties each terrain sampler to its fixed texture unit (0..4).
    pub fn connect_texture_units<A: ShaderApi + ?Sized>(&self, api: &mut A) {
        for (unit, sampler) in TerrainUniform::SAMPLERS.iter().enumerate() {
            self.manager.load_int(api, *sampler, unit as i32);
        }
    }

    pub fn load_projection_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, m: &Matrix4<f32>) {
        self.manager.load_matrix(api, TerrainUniform::ProjectionMatrix, m);
    }

    pub fn load_view_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, m: &Matrix4<f32>) {
        self.manager.load_matrix(api, TerrainUniform::ViewMatrix, m);
    }

    pub fn load_transformation_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, m: &Matrix4<f32>) {
        self.manager.load_matrix(api, TerrainUniform::TransformationMatrix, m);
    }

    pub fn load_lights<A: ShaderApi + ?Sized>(&self, api: &mut A, lights: &[Light]) {
        self.manager.load_lights(api, lights);
    }

    pub fn load_shine_variables<A: ShaderApi + ?Sized>(&self, api: &mut A, damper: f32, reflectivity: f32) {
        self.manager.load_float(api, TerrainUniform::ShineDamper, damper);
        self.manager.load_float(api, TerrainUniform::Reflectivity, reflectivity);
    }

    pub fn load_sky_color<A: ShaderApi + ?Sized>(&self, api: &mut A, color: ColorRGBA) {
        self.manager.load_color_rgba(api, TerrainUniform::SkyColor, color);
    }
}

impl Deref for TerrainShader {
    type Target = ShaderManager<TerrainUniform>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

/// Program used for the skybox.
#[derive(Debug)]
pub struct SkyBoxShader {
    manager: ShaderManager<SkyBoxUniform>,
}

impl SkyBoxShader {
    pub fn new<A: ShaderApi + ?Sized>(source: &dyn ShaderSource, api: &mut A) -> Self {
        Self {
            manager: ShaderManager::new(ShaderKind::SkyBox, source, &[VertexAttribute::Position], api),
        }
    }

    pub fn manager_mut(&mut self) -> &mut ShaderManager<SkyBoxUniform> {
        &mut self.manager
    }

    pub fn load_projection_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, m: &Matrix4<f32>) {
        self.manager.load_matrix(api, SkyBoxUniform::ProjectionMatrix, m);
    }

    /// Loads `view` with its translation removed, so the sky never moves
    /// relative to the camera.
    pub fn load_view_matrix<A: ShaderApi + ?Sized>(&self, api: &mut A, view: &Matrix4<f32>) {
        let rotation_only = math::without_translation(*view);
        self.manager.load_matrix(api, SkyBoxUniform::ViewMatrix, &rotation_only);
    }
}

impl Deref for SkyBoxShader {
    type Target = ShaderManager<SkyBoxUniform>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

/// Program used for GUI quads.
#[derive(Debug)]
pub struct GuiShader {
    manager: ShaderManager<GuiUniform>,
}

impl GuiShader {
    pub fn new<A: ShaderApi + ?Sized>(source: &dyn ShaderSource, api: &mut A) -> Self {
        Self {
            manager: ShaderManager::new(ShaderKind::Gui, source, &[VertexAttribute::Position], api),
        }
    }

    pub fn manager_mut(&mut self) -> &mut ShaderManager<GuiUniform> {
        &mut self.manager
    }

    pub fn load_transformation<A: ShaderApi + ?Sized>(
        &self,
        api: &mut A,
        position: Vector2<f32>,
        scale: Vector2<f32>,
    ) {
        let m = math::gui_transformation_matrix(position, scale);
        self.manager.load_matrix(api, GuiUniform::TransformationMatrix, &m);
    }
}

impl Deref for GuiShader {
    type Target = ShaderManager<GuiUniform>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}
