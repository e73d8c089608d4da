use log::trace;

use crate::gfx::render_api::{FrameRenderApi, LoaderRenderApi, RawModel, ShaderApi, VertexAttribute};
use crate::gfx::scene::gui::{self, GuiTexture};
use crate::gfx::shaders::{GuiShader, ShaderSource};

/// Overlay pass. Owns the quad every GUI element is drawn with.
#[derive(Debug)]
pub struct GuiRender {
    shader: GuiShader,
    quad: RawModel,
}

impl GuiRender {
    pub fn new<A: LoaderRenderApi + ShaderApi + ?Sized>(source: &dyn ShaderSource, api: &mut A) -> Self {
        Self {
            shader: GuiShader::new(source, api),
            quad: gui::load_quad(api),
        }
    }

    pub fn shader(&self) -> &GuiShader {
        &self.shader
    }

    /// Draws `guis` in order, later ones on top.
    pub fn render<A: FrameRenderApi + ShaderApi + ?Sized>(&self, api: &mut A, guis: &[GuiTexture]) {
        if guis.is_empty() {
            return;
        }
        if !self.shader.is_ready() {
            trace!("gui pass skipped, shader not ready");
            return;
        }
        self.shader.start(api);
        api.prepare_model(&self.quad, &[VertexAttribute::Position]);
        api.enable_blend();
        api.disable_depth_test();
        for gui in guis {
            if let Some(texture) = gui.texture {
                api.bind_texture(0, texture);
            }
            self.shader.load_transformation(api, gui.position, gui.scale);
            api.draw_quad(&self.quad);
        }
        api.enable_depth_test();
        api.disable_blend();
        api.unprepare_model(&[VertexAttribute::Position]);
        self.shader.stop(api);
    }

    pub fn dispose<A: LoaderRenderApi + ShaderApi + ?Sized>(&mut self, api: &mut A) {
        self.shader.manager_mut().dispose(api);
        api.dispose_raw_model(self.quad);
    }
}
