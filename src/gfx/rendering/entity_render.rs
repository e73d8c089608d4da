//! Entity pass. Also draws the player.

use cgmath::Matrix4;
use log::trace;

use crate::color::ColorRGBA;
use crate::gfx::render_api::{FrameRenderApi, ShaderApi, VertexAttribute};
use crate::gfx::scene::{batch_by_generic, Entity, Light, RawModelMaterial};
use crate::gfx::shaders::{EntityShader, ShaderSource};

/// Texture unit of the diffuse texture.
const DIFFUSE_UNIT: u32 = 0;

#[derive(Debug)]
pub struct EntityRender {
    shader: EntityShader,
}

impl EntityRender {
    pub fn new<A: ShaderApi + ?Sized>(
        source: &dyn ShaderSource,
        api: &mut A,
        projection: &Matrix4<f32>,
    ) -> Self {
        let shader = EntityShader::new(source, api);
        if shader.start(api) {
            shader.load_projection_matrix(api, projection);
            shader.stop(api);
        }
        Self { shader }
    }

    pub fn shader(&self) -> &EntityShader {
        &self.shader
    }

    /// Draws `entities`, batched by their shared model.
    pub fn render<A: FrameRenderApi + ShaderApi + ?Sized>(
        &self,
        api: &mut A,
        entities: &[Entity],
        lights: &[Light],
        sky_color: ColorRGBA,
        view: &Matrix4<f32>,
    ) {
        if !self.shader.is_ready() {
            trace!("entity pass skipped, shader not ready");
            return;
        }
        self.shader.start(api);
        self.shader.load_sky_color(api, sky_color);
        self.shader.load_lights(api, lights);
        self.shader.load_view_matrix(api, view);

        for (generic, batch) in batch_by_generic(entities) {
            for item in generic.raw_model_materials() {
                self.prepare(api, item);
                for entity in &batch {
                    self.shader
                        .load_transformation_matrix(api, &entity.transformation_matrix());
                    api.draw_triangles_indexed(&item.model);
                }
                Self::unprepare(api);
            }
        }
        self.shader.stop(api);
    }

    fn prepare<A: FrameRenderApi + ShaderApi + ?Sized>(&self, api: &mut A, item: &RawModelMaterial) {
        let material = &item.material;
        if material.has_transparency {
            api.disable_culling();
        } else {
            api.enable_culling();
        }
        self.shader
            .load_normals_pointing_up(api, material.normals_pointing_up);
        self.shader
            .load_shine_variables(api, material.shine_damper, material.reflectivity);

        let diffuse = &material.diffuse;
        if diffuse.is_textured() {
            if let Some(texture) = diffuse.texture {
                api.bind_texture(DIFFUSE_UNIT, texture);
            }
        }
        self.shader.load_texture_weight(api, diffuse.texture_weight);
        self.shader.load_diffuse_color(api, diffuse.color);
        api.prepare_model(&item.model, &VertexAttribute::MESH);
    }

    fn unprepare<A: FrameRenderApi + ?Sized>(api: &mut A) {
        api.unprepare_model(&VertexAttribute::MESH);
        api.enable_culling();
    }

    pub fn dispose<A: ShaderApi + ?Sized>(&mut self, api: &mut A) {
        self.shader.manager_mut().dispose(api);
    }
}
