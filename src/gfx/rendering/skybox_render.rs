use cgmath::Matrix4;
use log::trace;

use crate::gfx::render_api::{FrameRenderApi, ShaderApi, VertexAttribute};
use crate::gfx::scene::SkyBox;
use crate::gfx::shaders::{ShaderSource, SkyBoxShader};

const CUBE_UNIT: u32 = 0;

#[derive(Debug)]
pub struct SkyBoxRender {
    shader: SkyBoxShader,
}

impl SkyBoxRender {
    pub fn new<A: ShaderApi + ?Sized>(
        source: &dyn ShaderSource,
        api: &mut A,
        projection: &Matrix4<f32>,
    ) -> Self {
        let shader = SkyBoxShader::new(source, api);
        if shader.start(api) {
            shader.load_projection_matrix(api, projection);
            shader.stop(api);
        }
        Self { shader }
    }

    pub fn shader(&self) -> &SkyBoxShader {
        &self.shader
    }

    /// Draws the sky around the camera. Only the view rotation applies.
    pub fn render<A: FrameRenderApi + ShaderApi + ?Sized>(
        &self,
        api: &mut A,
        skybox: &SkyBox,
        view: &Matrix4<f32>,
    ) {
        if !self.shader.is_ready() {
            trace!("skybox pass skipped, shader not ready");
            return;
        }
        self.shader.start(api);
        self.shader.load_view_matrix(api, view);
        api.prepare_model(&skybox.model, &[VertexAttribute::Position]);
        if let Some(texture) = skybox.texture {
            api.bind_cube_texture(CUBE_UNIT, texture);
        }
        api.draw_triangles_arrays(&skybox.model);
        api.unprepare_model(&[VertexAttribute::Position]);
        self.shader.stop(api);
    }

    pub fn dispose<A: ShaderApi + ?Sized>(&mut self, api: &mut A) {
        self.shader.manager_mut().dispose(api);
    }
}
