use cgmath::Matrix4;
use log::trace;

use crate::color::ColorRGBA;
use crate::gfx::render_api::{FrameRenderApi, ShaderApi, VertexAttribute};
use crate::gfx::scene::{Light, Terrain};
use crate::gfx::shaders::{ShaderSource, TerrainShader};

/// Terrain is matte.
const SHINE_DAMPER: f32 = 1.0;
const REFLECTIVITY: f32 = 0.0;

#[derive(Debug)]
pub struct TerrainRender {
    shader: TerrainShader,
}

impl TerrainRender {
    /// Compiles the program, then loads the projection and connects the five
    /// texture units.
    pub fn new<A: ShaderApi + ?Sized>(
        source: &dyn ShaderSource,
        api: &mut A,
        projection: &Matrix4<f32>,
    ) -> Self {
        let shader = TerrainShader::new(source, api);
        if shader.start(api) {
            shader.load_projection_matrix(api, projection);
            shader.connect_texture_units(api);
            shader.stop(api);
        }
        Self { shader }
    }

    pub fn shader(&self) -> &TerrainShader {
        &self.shader
    }

    pub fn render<A: FrameRenderApi + ShaderApi + ?Sized>(
        &self,
        api: &mut A,
        terrains: &[Terrain],
        lights: &[Light],
        sky_color: ColorRGBA,
        view: &Matrix4<f32>,
    ) {
        if !self.shader.is_ready() {
            trace!("terrain pass skipped, shader not ready");
            return;
        }
        self.shader.start(api);
        self.shader.load_sky_color(api, sky_color);
        self.shader.load_lights(api, lights);
        self.shader.load_view_matrix(api, view);

        for terrain in terrains {
            terrain.textures.bind(api);
            self.shader
                .load_shine_variables(api, SHINE_DAMPER, REFLECTIVITY);
            self.shader
                .load_transformation_matrix(api, &terrain.transformation_matrix());
            api.prepare_model(&terrain.model, &VertexAttribute::MESH);
            api.draw_triangles_indexed(&terrain.model);
            api.unprepare_model(&VertexAttribute::MESH);
        }
        self.shader.stop(api);
    }

    pub fn dispose<A: ShaderApi + ?Sized>(&mut self, api: &mut A) {
        self.shader.manager_mut().dispose(api);
    }
}
